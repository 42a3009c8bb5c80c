use bevy::prelude::*;
use bevy::window::WindowResolution;

use thunderbolt::audio::SoundPlugin;
use thunderbolt::boss::BossPlugin;
use thunderbolt::combat::CombatPlugin;
use thunderbolt::config::{self, GameConfig};
use thunderbolt::constants::{ARENA_HEIGHT, ARENA_WIDTH};
use thunderbolt::effects::EffectsPlugin;
use thunderbolt::enemy::EnemyPlugin;
use thunderbolt::formation::FormationPlugin;
use thunderbolt::graphics;
use thunderbolt::hazard::HazardPlugin;
use thunderbolt::hud::HudPlugin;
use thunderbolt::menu::MenuPlugin;
use thunderbolt::motion::MotionPlugin;
use thunderbolt::player::PlayerPlugin;
use thunderbolt::powerup::PowerUpPlugin;
use thunderbolt::schedule::SchedulePlugin;
use thunderbolt::score::ScorePlugin;
use thunderbolt::sprites::SpritesPlugin;

fn main() {
    App::new()
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "Thunderbolt".into(),
                resolution: WindowResolution::new(ARENA_WIDTH as u32, ARENA_HEIGHT as u32),
                resizable: false,
                ..Default::default()
            }),
            ..Default::default()
        }))
        .insert_resource(ClearColor(Color::BLACK))
        // Insert GameConfig with compiled defaults; load_game_config will
        // overwrite it from assets/game.toml (if present) in Startup.
        .insert_resource(GameConfig::default())
        .add_plugins((
            MenuPlugin,
            SchedulePlugin,
            MotionPlugin,
            SpritesPlugin,
            EffectsPlugin,
            SoundPlugin,
            ScorePlugin,
            PlayerPlugin,
            EnemyPlugin,
            BossPlugin,
            HazardPlugin,
            FormationPlugin,
            PowerUpPlugin,
            CombatPlugin,
            HudPlugin,
        ))
        .add_systems(
            Startup,
            (
                // Load config first so every other startup system sees the
                // final values.
                config::load_game_config,
                graphics::setup_camera.after(config::load_game_config),
            ),
        )
        .run();
}
