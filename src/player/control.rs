//! Arrow-key movement for the player's aircraft.

use bevy::prelude::*;

use super::state::Player;
use crate::config::GameConfig;
use crate::constants::PLAYER_EDGE_MARGIN;
use crate::powerup::ActiveEffects;

/// Move the player with the arrow keys, clamped to the arena with a small
/// margin.  The speed-up power-up multiplies the traversal speed.
pub fn player_move_system(
    keys: Res<ButtonInput<KeyCode>>,
    time: Res<Time>,
    config: Res<GameConfig>,
    effects: Res<ActiveEffects>,
    mut q_player: Query<&mut Transform, With<Player>>,
) {
    let Ok(mut transform) = q_player.single_mut() else {
        return;
    };

    let mut direction = Vec2::ZERO;
    if keys.pressed(KeyCode::ArrowLeft) {
        direction.x -= 1.0;
    }
    if keys.pressed(KeyCode::ArrowRight) {
        direction.x += 1.0;
    }
    if keys.pressed(KeyCode::ArrowUp) {
        direction.y += 1.0;
    }
    if keys.pressed(KeyCode::ArrowDown) {
        direction.y -= 1.0;
    }

    if direction == Vec2::ZERO {
        return;
    }

    let speed = config.player_speed * effects.speed_multiplier();
    let step = direction.normalize() * speed * time.delta_secs();

    let half = config.player_size / 2.0;
    let limit_x = config.arena_width / 2.0 - half - PLAYER_EDGE_MARGIN;
    let limit_y = config.arena_height / 2.0 - half - PLAYER_EDGE_MARGIN;

    transform.translation.x = (transform.translation.x + step.x).clamp(-limit_x, limit_x);
    transform.translation.y = (transform.translation.y + step.y).clamp(-limit_y, limit_y);
}
