//! Headless unit tests for the [`GameState`] state machine.
//!
//! These tests use [`MinimalPlugins`] — no window, no rendering, no audio —
//! so they run fast and deterministically in CI.
//!
//! Covered scenarios:
//! 1. Default initial state is `StartScreen`.
//! 2. A `NextState` request transitions `StartScreen` → `Playing`.
//! 3. `Playing` persists across frames with no new transition request.
//! 4. `Playing` → `Paused` → `Playing` round-trips.
//! 5. `GameOver` can be re-entered into `Playing` (restart path).

use bevy::prelude::*;
use bevy::state::app::StatesPlugin;
use thunderbolt::menu::GameState;

// ── Helpers ───────────────────────────────────────────────────────────────────

/// Build a minimal headless app with just the state registered via
/// `init_state`.  `StatesPlugin` adds the `StateTransition` schedule.
fn app_with_default_state() -> App {
    let mut app = App::new();
    app.add_plugins((MinimalPlugins, StatesPlugin));
    app.init_state::<GameState>();
    app
}

fn set_state(app: &mut App, state: GameState) {
    app.world_mut()
        .resource_mut::<NextState<GameState>>()
        .set(state);
    app.update();
}

fn current_state(app: &App) -> GameState {
    app.world().resource::<State<GameState>>().get().clone()
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[test]
fn default_state_is_start_screen() {
    let mut app = app_with_default_state();
    app.update();
    assert_eq!(
        current_state(&app),
        GameState::StartScreen,
        "initial state must be StartScreen"
    );
}

#[test]
fn transition_start_screen_to_playing() {
    let mut app = app_with_default_state();
    app.update();

    set_state(&mut app, GameState::Playing);
    assert_eq!(current_state(&app), GameState::Playing);
}

#[test]
fn playing_state_persists_across_frames() {
    let mut app = app_with_default_state();
    app.update();
    set_state(&mut app, GameState::Playing);

    for _ in 0..5 {
        app.update();
    }

    assert_eq!(
        current_state(&app),
        GameState::Playing,
        "Playing must remain stable without a new transition"
    );
}

#[test]
fn pause_round_trips_back_to_playing() {
    let mut app = app_with_default_state();
    app.update();

    set_state(&mut app, GameState::Playing);
    set_state(&mut app, GameState::Paused);
    assert_eq!(current_state(&app), GameState::Paused);

    set_state(&mut app, GameState::Playing);
    assert_eq!(current_state(&app), GameState::Playing);
}

#[test]
fn game_over_can_restart_into_playing() {
    let mut app = app_with_default_state();
    app.update();

    set_state(&mut app, GameState::Playing);
    set_state(&mut app, GameState::GameOver);
    assert_eq!(current_state(&app), GameState::GameOver);

    set_state(&mut app, GameState::Playing);
    assert_eq!(current_state(&app), GameState::Playing);
}
