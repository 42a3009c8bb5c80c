//! Straight-line motion for projectiles, hazards, and pickups.
//!
//! Enemies steer themselves through their behaviour systems; everything else
//! that simply travels along a fixed velocity carries a [`Motion`] component
//! and is advanced by one shared system.  Entities tagged
//! [`DespawnOffscreen`] are removed once they leave the arena by their margin.

use bevy::prelude::*;

use crate::config::GameConfig;
use crate::menu::GameState;

/// Fixed world-space velocity (units/s).
#[derive(Component, Debug, Clone, Copy)]
pub struct Motion {
    pub velocity: Vec2,
}

impl Motion {
    #[inline]
    pub fn new(velocity: Vec2) -> Self {
        Self { velocity }
    }

    /// Velocity from a heading angle (radians, +X = 0) and a speed.
    #[inline]
    pub fn from_angle(angle: f32, speed: f32) -> Self {
        Self {
            velocity: Vec2::new(angle.cos(), angle.sin()) * speed,
        }
    }
}

/// Despawn the entity once it strays this far outside the arena.
#[derive(Component, Debug, Clone, Copy)]
pub struct DespawnOffscreen {
    pub margin: f32,
}

impl Default for DespawnOffscreen {
    fn default() -> Self {
        Self { margin: 50.0 }
    }
}

pub struct MotionPlugin;

impl Plugin for MotionPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            Update,
            (apply_motion_system, despawn_offscreen_system)
                .chain()
                .run_if(in_state(GameState::Playing)),
        );
    }
}

/// Advance every [`Motion`] entity by `velocity * dt`.
pub fn apply_motion_system(time: Res<Time>, mut query: Query<(&Motion, &mut Transform)>) {
    let dt = time.delta_secs();
    for (motion, mut transform) in query.iter_mut() {
        transform.translation.x += motion.velocity.x * dt;
        transform.translation.y += motion.velocity.y * dt;
    }
}

/// Remove entities that have left the arena past their own margin.
pub fn despawn_offscreen_system(
    mut commands: Commands,
    config: Res<GameConfig>,
    query: Query<(Entity, &Transform, &DespawnOffscreen)>,
) {
    let half_w = config.arena_width / 2.0;
    let half_h = config.arena_height / 2.0;

    for (entity, transform, bounds) in query.iter() {
        let pos = transform.translation;
        if pos.x < -half_w - bounds.margin
            || pos.x > half_w + bounds.margin
            || pos.y < -half_h - bounds.margin
            || pos.y > half_h + bounds.margin
        {
            commands.entity(entity).despawn();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn motion_from_angle_points_along_heading() {
        let right = Motion::from_angle(0.0, 10.0);
        assert!((right.velocity - Vec2::new(10.0, 0.0)).length() < 1e-4);

        let up = Motion::from_angle(std::f32::consts::FRAC_PI_2, 10.0);
        assert!((up.velocity - Vec2::new(0.0, 10.0)).length() < 1e-4);
    }
}
