use super::*;

/// Toggle between `Playing` and `Paused` on `P` or `Escape`.
pub(super) fn pause_toggle_system(
    keys: Res<ButtonInput<KeyCode>>,
    state: Res<State<GameState>>,
    mut next_state: ResMut<NextState<GameState>>,
) {
    if !(keys.just_pressed(KeyCode::KeyP) || keys.just_pressed(KeyCode::Escape)) {
        return;
    }

    match state.get() {
        GameState::Playing => next_state.set(GameState::Paused),
        GameState::Paused => next_state.set(GameState::Playing),
        _ => {}
    }
}

/// Spawn the translucent pause overlay centred over the frozen world.
pub(super) fn setup_pause_overlay(mut commands: Commands) {
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
            BackgroundColor(Color::srgba(0.0, 0.0, 0.04, 0.65)),
            ZIndex(200),
            PauseRoot,
        ))
        .with_children(|overlay| {
            overlay
                .spawn((
                    Node {
                        flex_direction: FlexDirection::Column,
                        align_items: AlignItems::Center,
                        padding: UiRect::axes(Val::Px(48.0), Val::Px(28.0)),
                        row_gap: Val::Px(10.0),
                        border: UiRect::all(Val::Px(2.0)),
                        ..default()
                    },
                    BackgroundColor(Color::srgb(0.05, 0.05, 0.1)),
                    BorderColor::all(Color::srgb(0.3, 0.3, 0.42)),
                ))
                .with_children(|card| {
                    card.spawn((
                        Text::new("PAUSED"),
                        TextFont {
                            font_size: 44.0,
                            ..default()
                        },
                        TextColor(title_color()),
                    ));

                    card.spawn((
                        Text::new("Press P to resume"),
                        TextFont {
                            font_size: 14.0,
                            ..default()
                        },
                        TextColor(hint_color()),
                    ));
                });
        });
}

/// Recursively despawn all pause-overlay entities.
pub(super) fn cleanup_pause_overlay(mut commands: Commands, query: Query<Entity, With<PauseRoot>>) {
    for entity in query.iter() {
        commands.entity(entity).despawn();
    }
}
