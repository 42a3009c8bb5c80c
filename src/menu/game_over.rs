use super::*;

use crate::player::state::PlayerLives;
use crate::score::ScoreBoard;

/// Spawn the game-over overlay centred over the frozen world.
///
/// Shows the final score and collision count, plus a "FLY AGAIN" button that
/// restarts the round from level 1.
pub(super) fn setup_game_over(
    mut commands: Commands,
    score: Res<ScoreBoard>,
    lives: Res<PlayerLives>,
) {
    commands
        .spawn((
            Node {
                width: Val::Percent(100.0),
                height: Val::Percent(100.0),
                justify_content: JustifyContent::Center,
                align_items: AlignItems::Center,
                position_type: PositionType::Absolute,
                ..default()
            },
            BackgroundColor(Color::srgba(0.05, 0.0, 0.0, 0.85)),
            ZIndex(250),
            GameOverRoot,
        ))
        .with_children(|overlay| {
            overlay
                .spawn((
                    Node {
                        flex_direction: FlexDirection::Column,
                        align_items: AlignItems::Center,
                        padding: UiRect::all(Val::Px(36.0)),
                        row_gap: Val::Px(14.0),
                        border: UiRect::all(Val::Px(3.0)),
                        min_width: Val::Px(340.0),
                        ..default()
                    },
                    BackgroundColor(Color::srgb(0.07, 0.02, 0.03)),
                    BorderColor::all(Color::srgb(0.60, 0.12, 0.12)),
                ))
                .with_children(|card| {
                    card.spawn((
                        Text::new("GAME OVER"),
                        TextFont {
                            font_size: 48.0,
                            ..default()
                        },
                        TextColor(Color::srgb(1.0, 0.22, 0.22)),
                    ));

                    card.spawn((
                        Text::new(format!(
                            "Final score: {}   (high: {})",
                            score.score, score.high_score
                        )),
                        TextFont {
                            font_size: 17.0,
                            ..default()
                        },
                        TextColor(subtitle_color()),
                    ));

                    card.spawn((
                        Text::new(format!("Hits taken: {}", lives.collision_count)),
                        TextFont {
                            font_size: 14.0,
                            ..default()
                        },
                        TextColor(subtitle_color()),
                    ));

                    menu_button(
                        card,
                        PlayAgainButton,
                        "FLY AGAIN",
                        start_bg(),
                        start_border(),
                        start_text(),
                    );

                    card.spawn((
                        Text::new("Press Space to fly again"),
                        TextFont {
                            font_size: 13.0,
                            ..default()
                        },
                        TextColor(hint_color()),
                    ));
                });
        });
}

/// Recursively despawn all game-over overlay entities.
pub(super) fn cleanup_game_over(mut commands: Commands, query: Query<Entity, With<GameOverRoot>>) {
    for entity in query.iter() {
        commands.entity(entity).despawn();
    }
}

/// Handle FLY AGAIN (button, Space, or Enter) on the game-over overlay.
#[allow(clippy::type_complexity)]
pub(super) fn game_over_input_system(
    play_query: Query<(&Interaction, &Children), (Changed<Interaction>, With<PlayAgainButton>)>,
    mut btn_text: Query<&mut TextColor>,
    keys: Res<ButtonInput<KeyCode>>,
    mut next_state: ResMut<NextState<GameState>>,
) {
    let wants_restart = keys.just_pressed(KeyCode::Space)
        || keys.just_pressed(KeyCode::Enter)
        || play_query.iter().any(|(i, _)| *i == Interaction::Pressed);

    if wants_restart {
        next_state.set(GameState::Playing);
        return;
    }

    for (interaction, children) in play_query.iter() {
        match interaction {
            Interaction::Hovered => tint_labels(children, &mut btn_text, Color::WHITE),
            Interaction::None => tint_labels(children, &mut btn_text, start_text()),
            Interaction::Pressed => {}
        }
    }
}
