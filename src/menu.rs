//! Start-screen splash — `GameState` definition and `MenuPlugin`.
//!
//! ## States
//!
//! | State         | Description                                 |
//! |---------------|---------------------------------------------|
//! | `StartScreen` | Initial state; title splash shown           |
//! | `Playing`     | Simulation running; all game systems active |
//! | `Paused`      | Frozen mid-round; overlay shown (`P`)       |
//! | `GameOver`    | Round finished; final score overlay shown   |
//!
//! Every gameplay system runs under `.run_if(in_state(GameState::Playing))`,
//! so the whole simulation is inert on the splash, pause, and game-over
//! screens.  Entering `Playing` from `StartScreen` or `GameOver` resets the
//! round: all collidable entities, effects, and per-round resources go back
//! to their defaults (the saved high score survives).

mod game_over;
mod pause;

use bevy::ecs::hierarchy::ChildSpawnerCommands;
use bevy::prelude::*;

use crate::boss::BossDirector;
use crate::collision::Hitbox;
use crate::combat::{ProcessedCollisions, ShieldedKills};
use crate::config::GameConfig;
use crate::effects::{CollisionPulse, Explosion, FlashState, Particle};
use crate::enemy::SpawnState;
use crate::formation::FormationState;
use crate::hud::HudMessages;
use crate::player::state::{EscortState, FireControl, PlayerLives, SpecialWeapon};
use crate::powerup::ActiveEffects;
use crate::schedule::ShotSchedule;
use crate::score::ScoreBoard;

// ── Game state ────────────────────────────────────────────────────────────────

/// Top-level application state machine.
#[derive(States, Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum GameState {
    /// Title splash; shown on startup.
    #[default]
    StartScreen,
    /// Active gameplay.
    Playing,
    /// Mid-round freeze; toggled with `P`.
    Paused,
    /// Lives exhausted; final-score overlay.
    GameOver,
}

// ── Component markers ─────────────────────────────────────────────────────────

/// Root node of the start-screen UI; despawned on `OnExit(StartScreen)`.
#[derive(Component)]
pub struct StartScreenRoot;

/// Tags the "START" button.
#[derive(Component)]
pub struct StartButton;

/// Tags the "QUIT" button on the start screen.
#[derive(Component)]
pub struct MenuQuitButton;

/// Root node of the pause overlay.
#[derive(Component)]
pub struct PauseRoot;

/// Root node of the game-over overlay.
#[derive(Component)]
pub struct GameOverRoot;

/// Tags the "FLY AGAIN" button on the game-over overlay.
#[derive(Component)]
pub struct PlayAgainButton;

// ── Plugin ────────────────────────────────────────────────────────────────────

/// Registers `GameState`, the menu screens, and the round-reset flow.
///
/// Must be added before any plugin that calls
/// `.run_if(in_state(GameState::Playing))`, so the state is registered first.
pub struct MenuPlugin;

impl Plugin for MenuPlugin {
    fn build(&self, app: &mut App) {
        app.init_state::<GameState>()
            .add_systems(OnEnter(GameState::StartScreen), setup_start_screen)
            .add_systems(OnExit(GameState::StartScreen), cleanup_start_screen)
            .add_systems(
                Update,
                start_screen_input_system.run_if(in_state(GameState::StartScreen)),
            )
            .add_systems(OnEnter(GameState::Paused), pause::setup_pause_overlay)
            .add_systems(OnExit(GameState::Paused), pause::cleanup_pause_overlay)
            .add_systems(
                Update,
                pause::pause_toggle_system
                    .run_if(in_state(GameState::Playing).or(in_state(GameState::Paused))),
            )
            .add_systems(OnEnter(GameState::GameOver), game_over::setup_game_over)
            .add_systems(OnExit(GameState::GameOver), game_over::cleanup_game_over)
            .add_systems(
                Update,
                game_over::game_over_input_system.run_if(in_state(GameState::GameOver)),
            )
            .add_systems(
                OnTransition {
                    exited: GameState::StartScreen,
                    entered: GameState::Playing,
                },
                (
                    despawn_round_entities_system,
                    reset_round_resources_system,
                    crate::player::spawn_player,
                )
                    .chain(),
            )
            .add_systems(
                OnTransition {
                    exited: GameState::GameOver,
                    entered: GameState::Playing,
                },
                (
                    despawn_round_entities_system,
                    reset_round_resources_system,
                    crate::player::spawn_player,
                )
                    .chain(),
            );
    }
}

// ── Colour helpers ────────────────────────────────────────────────────────────

fn start_bg() -> Color {
    Color::srgb(0.08, 0.36, 0.14)
}
fn start_border() -> Color {
    Color::srgb(0.18, 0.72, 0.28)
}
fn start_text() -> Color {
    Color::srgb(0.75, 1.0, 0.80)
}
fn quit_bg() -> Color {
    Color::srgb(0.28, 0.06, 0.06)
}
fn quit_border() -> Color {
    Color::srgb(0.60, 0.12, 0.12)
}
fn quit_text() -> Color {
    Color::srgb(1.0, 0.65, 0.65)
}
fn title_color() -> Color {
    Color::srgb(0.95, 0.88, 0.45)
}
fn subtitle_color() -> Color {
    Color::srgb(0.55, 0.55, 0.65)
}
fn hint_color() -> Color {
    Color::srgb(0.28, 0.28, 0.35)
}

// ── Shared UI builders ────────────────────────────────────────────────────────

/// Spawn one bordered menu button with a centred text label.
fn menu_button(
    parent: &mut ChildSpawnerCommands<'_>,
    marker: impl Component,
    label: &str,
    bg: Color,
    border: Color,
    text: Color,
) {
    parent
        .spawn((
            Button,
            Node {
                width: Val::Px(230.0),
                height: Val::Px(52.0),
                justify_content: JustifyContent::Center,
                align_items: AlignItems::Center,
                border: UiRect::all(Val::Px(2.0)),
                ..default()
            },
            BackgroundColor(bg),
            BorderColor::all(border),
            marker,
        ))
        .with_children(|btn| {
            btn.spawn((
                Text::new(label),
                TextFont {
                    font_size: 19.0,
                    ..default()
                },
                TextColor(text),
            ));
        });
}

/// Recolour every text label under a button, for hover feedback.
fn tint_labels(children: &Children, btn_text: &mut Query<&mut TextColor>, color: Color) {
    for child in children.iter() {
        if let Ok(mut text_color) = btn_text.get_mut(child) {
            *text_color = TextColor(color);
        }
    }
}

// ── OnEnter(StartScreen): spawn UI ────────────────────────────────────────────

/// Spawn the full-screen title splash.
pub fn setup_start_screen(mut commands: Commands, score: Res<ScoreBoard>) {
    commands
        .spawn((
            Node {
                width: Val::Percent(100.0),
                height: Val::Percent(100.0),
                justify_content: JustifyContent::Center,
                align_items: AlignItems::Center,
                flex_direction: FlexDirection::Column,
                ..default()
            },
            BackgroundColor(Color::BLACK),
            StartScreenRoot,
        ))
        .with_children(|root| {
            root.spawn((
                Text::new("THUNDERBOLT"),
                TextFont {
                    font_size: 56.0,
                    ..default()
                },
                TextColor(title_color()),
            ));

            spacer(root, 10.0);

            root.spawn((
                Text::new("A vertical-scrolling arcade shooter"),
                TextFont {
                    font_size: 18.0,
                    ..default()
                },
                TextColor(subtitle_color()),
            ));

            spacer(root, 16.0);

            root.spawn((
                Text::new(format!("High score: {}", score.high_score)),
                TextFont {
                    font_size: 16.0,
                    ..default()
                },
                TextColor(subtitle_color()),
            ));

            spacer(root, 40.0);

            menu_button(
                root,
                StartButton,
                "START",
                start_bg(),
                start_border(),
                start_text(),
            );
            spacer(root, 14.0);
            menu_button(
                root,
                MenuQuitButton,
                "QUIT",
                quit_bg(),
                quit_border(),
                quit_text(),
            );

            spacer(root, 40.0);

            root.spawn((
                Text::new("Arrows: move · Space: fire · B: special · P: pause"),
                TextFont {
                    font_size: 12.0,
                    ..default()
                },
                TextColor(hint_color()),
            ));
        });
}

/// Spawn a fixed-height invisible spacer node.
fn spacer(parent: &mut ChildSpawnerCommands<'_>, px: f32) {
    parent.spawn(Node {
        height: Val::Px(px),
        ..default()
    });
}

/// Recursively despawn all start-screen entities.
pub fn cleanup_start_screen(mut commands: Commands, query: Query<Entity, With<StartScreenRoot>>) {
    for entity in query.iter() {
        commands.entity(entity).despawn();
    }
}

// ── Update (StartScreen only): input ──────────────────────────────────────────

/// Handle START / QUIT on the splash.  Space starts the round too.
#[allow(clippy::type_complexity)]
pub fn start_screen_input_system(
    start_query: Query<(&Interaction, &Children), (Changed<Interaction>, With<StartButton>)>,
    quit_query: Query<(&Interaction, &Children), (Changed<Interaction>, With<MenuQuitButton>)>,
    mut btn_text: Query<&mut TextColor>,
    keys: Res<ButtonInput<KeyCode>>,
    mut next_state: ResMut<NextState<GameState>>,
    mut exit: MessageWriter<bevy::app::AppExit>,
) {
    let wants_start = keys.just_pressed(KeyCode::Space)
        || start_query.iter().any(|(i, _)| *i == Interaction::Pressed);

    if wants_start {
        next_state.set(GameState::Playing);
        return;
    }

    for (interaction, children) in start_query.iter() {
        match interaction {
            Interaction::Hovered => tint_labels(children, &mut btn_text, Color::WHITE),
            Interaction::None => tint_labels(children, &mut btn_text, start_text()),
            Interaction::Pressed => {}
        }
    }

    for (interaction, children) in quit_query.iter() {
        match interaction {
            Interaction::Pressed => {
                exit.write(bevy::app::AppExit::Success);
            }
            Interaction::Hovered => tint_labels(children, &mut btn_text, Color::WHITE),
            Interaction::None => tint_labels(children, &mut btn_text, quit_text()),
        }
    }
}

// ── Round reset ───────────────────────────────────────────────────────────────

/// Despawn every gameplay entity from the previous round.
///
/// Runs on the transition into `Playing` from `StartScreen` or `GameOver`,
/// chained before the resource reset and `spawn_player`.
#[allow(clippy::type_complexity)]
pub fn despawn_round_entities_system(
    mut commands: Commands,
    q_gameplay: Query<
        Entity,
        Or<(
            With<Hitbox>,
            With<Explosion>,
            With<Particle>,
            With<CollisionPulse>,
        )>,
    >,
) {
    for entity in q_gameplay.iter() {
        commands.entity(entity).despawn();
    }
}

/// Reset the per-round resources to their defaults.  The high score survives.
#[allow(clippy::too_many_arguments)]
pub fn reset_round_resources_system(
    config: Res<GameConfig>,
    mut score: ResMut<ScoreBoard>,
    mut lives: ResMut<PlayerLives>,
    mut special: ResMut<SpecialWeapon>,
    mut fire: ResMut<FireControl>,
    mut escort: ResMut<EscortState>,
    mut effects: ResMut<ActiveEffects>,
    mut processed: ResMut<ProcessedCollisions>,
    mut shield_kills: ResMut<ShieldedKills>,
    mut flash: ResMut<FlashState>,
    mut spawn: ResMut<SpawnState>,
    mut boss: ResMut<BossDirector>,
    mut formation: ResMut<FormationState>,
    mut shots: ResMut<ShotSchedule>,
    mut messages: ResMut<HudMessages>,
) {
    score.reset_round();
    *lives = PlayerLives::new(config.player_max_lives);
    *special = SpecialWeapon::default();
    *fire = FireControl::default();
    *escort = EscortState::default();
    *effects = ActiveEffects::default();
    *processed = ProcessedCollisions::default();
    *shield_kills = ShieldedKills::default();
    *flash = FlashState::default();
    *spawn = SpawnState::default();
    *boss = BossDirector::new(&config);
    *formation = FormationState::default();
    *shots = ShotSchedule::default();
    *messages = HudMessages::default();

    info!("Round reset: level 1, {} lives", config.player_max_lives);
}
