//! Falling hazards: bombs and fused dynamite.
//!
//! Both are dropped by enemies and fall straight down via [`Motion`].
//! Dynamite carries a burning fuse and self-detonates when it runs out;
//! bombs only explode on contact.  Each carries a `has_collided` latch so a
//! single physical collision is never counted twice across the independent
//! per-frame checks in the combat module.

use bevy::prelude::*;

use crate::collision::Hitbox;
use crate::config::GameConfig;
use crate::constants::{
    BOMB_SIZE, DYNAMITE_HEIGHT, DYNAMITE_WIDTH,
};
use crate::effects::{spawn_explosion, ExplosionKind};
use crate::menu::GameState;
use crate::motion::{DespawnOffscreen, Motion};
use crate::sprites::{ShapeKind, VisualShape};

/// Falling bomb.
#[derive(Component, Debug, Clone, Copy)]
pub struct Bomb {
    pub from_boss: bool,
    /// Latch preventing one bomb from registering two collisions.
    pub has_collided: bool,
}

/// Falling dynamite stick with a burning fuse.
#[derive(Component, Debug, Clone, Copy)]
pub struct Dynamite {
    pub fuse_secs: f32,
    pub has_collided: bool,
}

/// Simple constant spin for tumbling hazards.
#[derive(Component, Debug, Clone, Copy)]
pub struct Tumble {
    pub rate: f32,
}

pub struct HazardPlugin;

impl Plugin for HazardPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            Update,
            (dynamite_fuse_system, tumble_system).run_if(in_state(GameState::Playing)),
        );
    }
}

/// Drop a bomb below `pos`.
pub fn spawn_bomb(commands: &mut Commands, pos: Vec2, from_boss: bool, config: &GameConfig) {
    commands.spawn((
        Bomb {
            from_boss,
            has_collided: false,
        },
        Hitbox::square(BOMB_SIZE),
        Motion::new(Vec2::new(0.0, -config.bomb_fall_speed)),
        DespawnOffscreen::default(),
        Tumble { rate: 6.0 },
        Transform::from_translation(pos.extend(0.2)),
        Visibility::default(),
        VisualShape::new(
            ShapeKind::Circle {
                radius: BOMB_SIZE / 2.0,
            },
            Color::srgb(1.0, 0.0, 0.0),
        ),
    ));
}

/// Drop a dynamite stick below `pos`.
pub fn spawn_dynamite(commands: &mut Commands, pos: Vec2, config: &GameConfig) {
    commands.spawn((
        Dynamite {
            fuse_secs: config.dynamite_fuse_secs,
            has_collided: false,
        },
        Hitbox::new(DYNAMITE_WIDTH, DYNAMITE_HEIGHT),
        Motion::new(Vec2::new(0.0, -config.dynamite_fall_speed)),
        DespawnOffscreen::default(),
        Tumble { rate: 3.0 },
        Transform::from_translation(pos.extend(0.2)),
        Visibility::default(),
        VisualShape::new(
            ShapeKind::Rect {
                width: DYNAMITE_WIDTH,
                height: DYNAMITE_HEIGHT,
            },
            Color::srgb(0.55, 0.27, 0.07),
        ),
    ));
}

/// Burn fuses down; a spent fuse detonates into a final explosion.
pub fn dynamite_fuse_system(
    mut commands: Commands,
    time: Res<Time>,
    config: Res<GameConfig>,
    mut query: Query<(Entity, &Transform, &mut Dynamite)>,
) {
    let dt = time.delta_secs();
    let arena_top = config.arena_top();

    for (entity, transform, mut dynamite) in query.iter_mut() {
        dynamite.fuse_secs -= dt;
        if dynamite.fuse_secs <= 0.0 {
            spawn_explosion(
                &mut commands,
                transform.translation.truncate(),
                ExplosionKind::Final,
                arena_top,
            );
            commands.entity(entity).despawn();
        }
    }
}

/// Rotate tumbling hazards.
pub fn tumble_system(time: Res<Time>, mut query: Query<(&Tumble, &mut Transform)>) {
    let dt = time.delta_secs();
    for (tumble, mut transform) in query.iter_mut() {
        transform.rotate_z(tumble.rate * dt);
    }
}
