//! Player module: aircraft entity, input handling, firing, and the escort.
//!
//! ## Sub-module layout
//!
//! | Module | Responsibility |
//! |--------|----------------|
//! | [`state`] | ECS components (`Player`, `EscortPlane`, `PlayerBullet`) and resources (`PlayerLives`, `SpecialWeapon`, `FireControl`, `EscortState`) |
//! | [`control`] | Arrow-key movement |
//! | [`combat`] | Tap/hold firing, the special-weapon ring, bullet lifetimes |
//!
//! Escort handling lives at this level: milestone granting, follow, expiry.

pub mod combat;
pub mod control;
pub mod state;

pub use combat::{bullet_size, spawn_special_ring};
pub use state::{
    EscortPlane, EscortState, FireControl, Player, PlayerBullet, PlayerLives, ShotKind,
    SpecialWeapon,
};

use bevy::prelude::*;

use crate::collision::Hitbox;
use crate::config::GameConfig;
use crate::constants::ESCORT_OFFSET_X;
use crate::hud::HudMessages;
use crate::menu::GameState;
use crate::score::ScoreBoard;
use crate::sprites::{aircraft_polygon, ShapeKind, VisualShape};

pub struct PlayerPlugin;

impl Plugin for PlayerPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<PlayerLives>()
            .init_resource::<SpecialWeapon>()
            .init_resource::<FireControl>()
            .init_resource::<EscortState>()
            .add_systems(
                Update,
                (
                    control::player_move_system,
                    combat::fire_input_system,
                    combat::player_fire_system,
                    combat::special_weapon_system,
                    combat::special_bullet_life_system,
                    escort_grant_system,
                    escort_follow_system,
                    escort_expire_system,
                )
                    .chain()
                    .run_if(in_state(GameState::Playing)),
            );
    }
}

// ── Ship spawn ────────────────────────────────────────────────────────────────

/// Spawn the player's aircraft near the bottom of the arena.
pub fn spawn_player(mut commands: Commands, config: Res<GameConfig>) {
    let start_y = config.arena_bottom() + 100.0;
    commands.spawn((
        Player,
        Hitbox::square(config.player_size),
        Transform::from_translation(Vec3::new(0.0, start_y, 0.1)),
        Visibility::default(),
        VisualShape::new(
            ShapeKind::Polygon(aircraft_polygon(config.player_size, true)),
            Color::srgb(0.92, 0.92, 0.95),
        ),
    ));

    info!("Player aircraft spawned");
}

// ── Escort plane ──────────────────────────────────────────────────────────────

/// Grant an escort each time the score crosses another milestone boundary.
pub fn escort_grant_system(
    mut commands: Commands,
    config: Res<GameConfig>,
    score: Res<ScoreBoard>,
    mut escort: ResMut<EscortState>,
    q_player: Query<&Transform, With<Player>>,
    q_escorts: Query<(), With<EscortPlane>>,
    mut messages: ResMut<HudMessages>,
) {
    if score.score < config.escort_score_interval
        || !q_escorts.is_empty()
        || score.score < escort.last_grant_score + config.escort_score_interval
    {
        return;
    }
    let Ok(player_transform) = q_player.single() else {
        return;
    };

    escort.last_grant_score = score.score;

    let pos = player_transform.translation.truncate() + Vec2::new(ESCORT_OFFSET_X, 0.0);
    commands.spawn((
        EscortPlane::default(),
        Hitbox::square(config.player_size),
        Transform::from_translation(pos.extend(0.1)),
        Visibility::default(),
        VisualShape::new(
            ShapeKind::Polygon(aircraft_polygon(config.player_size * 0.9, true)),
            Color::srgb(0.75, 0.85, 1.0),
        ),
    ));

    messages.post("Escort wing joined!".to_string());
}

/// Keep the escort glued to the player at its fixed offset.
pub fn escort_follow_system(
    q_player: Query<&Transform, (With<Player>, Without<EscortPlane>)>,
    mut q_escorts: Query<&mut Transform, With<EscortPlane>>,
) {
    let Ok(player_transform) = q_player.single() else {
        return;
    };
    for mut transform in q_escorts.iter_mut() {
        transform.translation.x = player_transform.translation.x + ESCORT_OFFSET_X;
        transform.translation.y = player_transform.translation.y;
    }
}

/// Age escorts out after their lifetime.
pub fn escort_expire_system(
    mut commands: Commands,
    time: Res<Time>,
    config: Res<GameConfig>,
    mut q_escorts: Query<(Entity, &mut EscortPlane)>,
    mut messages: ResMut<HudMessages>,
) {
    let dt = time.delta_secs();
    for (entity, mut escort) in q_escorts.iter_mut() {
        escort.age += dt;
        if escort.age >= config.escort_lifetime_secs {
            commands.entity(entity).despawn();
            messages.post("Escort wing departed".to_string());
        }
    }
}
