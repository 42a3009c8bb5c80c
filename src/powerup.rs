//! Falling power-up pickups and their timed effects.
//!
//! Pickups drift down from the top edge on a level-scaled probability roll.
//! Collecting one starts (or refreshes) a ten-second effect; the shield is
//! the exception — it lasts until it absorbs one collision or its timer runs
//! out, whichever comes first.

use bevy::prelude::*;
use rand::Rng;

use crate::audio::{SoundCue, SoundRequest};
use crate::collision::{overlaps, Aabb, Hitbox};
use crate::config::GameConfig;
use crate::constants::{POWERUP_FALL_SPEED, POWERUP_SIZE, RAPID_FIRE_MULTIPLIER};
use crate::menu::GameState;
use crate::motion::{DespawnOffscreen, Motion};
use crate::player::state::Player;
use crate::score::ScoreBoard;
use crate::sprites::{ShapeKind, VisualShape};

/// The four pickup flavours.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PowerUpKind {
    SpeedUp,
    Shield,
    DoubleDamage,
    RapidFire,
}

impl PowerUpKind {
    pub const ALL: [PowerUpKind; 4] = [
        PowerUpKind::SpeedUp,
        PowerUpKind::Shield,
        PowerUpKind::DoubleDamage,
        PowerUpKind::RapidFire,
    ];

    fn color(self) -> Color {
        match self {
            PowerUpKind::SpeedUp => Color::srgb(0.0, 1.0, 0.0),
            PowerUpKind::Shield => Color::srgb(0.2, 0.4, 1.0),
            PowerUpKind::DoubleDamage => Color::srgb(1.0, 0.1, 0.1),
            PowerUpKind::RapidFire => Color::srgb(1.0, 0.0, 1.0),
        }
    }
}

/// A pickup in flight.
#[derive(Component, Debug, Clone, Copy)]
pub struct PowerUp {
    pub kind: PowerUpKind,
}

/// Remaining durations of the timed effects, ticked every frame.
#[derive(Resource, Debug, Clone, Copy, Default)]
pub struct ActiveEffects {
    pub speed_secs: f32,
    pub shield: bool,
    pub shield_secs: f32,
    pub double_damage_secs: f32,
    pub rapid_fire_secs: f32,
}

impl ActiveEffects {
    #[inline]
    pub fn speed_multiplier(&self) -> f32 {
        if self.speed_secs > 0.0 {
            1.5
        } else {
            1.0
        }
    }

    #[inline]
    pub fn damage_multiplier(&self) -> f32 {
        if self.double_damage_secs > 0.0 {
            2.0
        } else {
            1.0
        }
    }

    #[inline]
    pub fn rapid_multiplier(&self) -> f32 {
        if self.rapid_fire_secs > 0.0 {
            RAPID_FIRE_MULTIPLIER
        } else {
            1.0
        }
    }

    /// Spend the one-hit shield.  Returns `true` when a hit was absorbed.
    #[inline]
    pub fn consume_shield(&mut self) -> bool {
        if self.shield {
            self.shield = false;
            self.shield_secs = 0.0;
            true
        } else {
            false
        }
    }

    fn apply(&mut self, kind: PowerUpKind, duration: f32) {
        match kind {
            PowerUpKind::SpeedUp => self.speed_secs = duration,
            PowerUpKind::Shield => {
                self.shield = true;
                self.shield_secs = duration;
            }
            PowerUpKind::DoubleDamage => self.double_damage_secs = duration,
            PowerUpKind::RapidFire => self.rapid_fire_secs = duration,
        }
    }

    fn tick(&mut self, dt: f32) {
        self.speed_secs = (self.speed_secs - dt).max(0.0);
        self.double_damage_secs = (self.double_damage_secs - dt).max(0.0);
        self.rapid_fire_secs = (self.rapid_fire_secs - dt).max(0.0);
        if self.shield {
            self.shield_secs = (self.shield_secs - dt).max(0.0);
            if self.shield_secs <= 0.0 {
                self.shield = false;
            }
        }
    }
}

pub struct PowerUpPlugin;

impl Plugin for PowerUpPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<ActiveEffects>().add_systems(
            Update,
            (powerup_drop_system, powerup_pickup_system, effects_tick_system)
                .chain()
                .run_if(in_state(GameState::Playing)),
        );
    }
}

/// Probability-per-second roll for a new pickup, scaled by level.
pub fn powerup_drop_system(
    mut commands: Commands,
    time: Res<Time>,
    config: Res<GameConfig>,
    score: Res<ScoreBoard>,
) {
    let rate = (config.powerup_drop_rate_per_level * score.level as f32)
        .min(config.powerup_drop_rate_cap);
    let chance = rate * time.delta_secs();

    let mut rng = rand::thread_rng();
    if !rng.gen_bool(chance.clamp(0.0, 1.0) as f64) {
        return;
    }

    let kind = PowerUpKind::ALL[rng.gen_range(0..PowerUpKind::ALL.len())];
    let half_w = config.arena_width / 2.0 - POWERUP_SIZE;
    let x = rng.gen_range(-half_w..half_w);

    commands.spawn((
        PowerUp { kind },
        Hitbox::square(POWERUP_SIZE),
        Motion::new(Vec2::new(0.0, -POWERUP_FALL_SPEED)),
        DespawnOffscreen::default(),
        Transform::from_translation(Vec3::new(x, config.arena_top() + POWERUP_SIZE, 0.2)),
        Visibility::default(),
        VisualShape::new(
            ShapeKind::Circle {
                radius: POWERUP_SIZE / 2.0,
            },
            kind.color(),
        ),
    ));
}

/// Collect pickups that touch the player.
pub fn powerup_pickup_system(
    mut commands: Commands,
    config: Res<GameConfig>,
    mut effects: ResMut<ActiveEffects>,
    q_player: Query<(&Transform, &Hitbox), With<Player>>,
    q_powerups: Query<(Entity, &Transform, &Hitbox, &PowerUp)>,
    mut sounds: MessageWriter<SoundRequest>,
) {
    let Ok((player_transform, player_hitbox)) = q_player.single() else {
        return;
    };
    let player_rect = Aabb::of(player_transform, player_hitbox);
    let arena_top = config.arena_top();

    for (entity, transform, hitbox, powerup) in q_powerups.iter() {
        let rect = Aabb::of(transform, hitbox);
        if overlaps(&player_rect, &rect, arena_top) {
            effects.apply(powerup.kind, config.powerup_duration_secs);
            sounds.write(SoundRequest::new(SoundCue::LevelUp));
            commands.entity(entity).despawn();
        }
    }
}

/// Count the timed effects down.
pub fn effects_tick_system(time: Res<Time>, mut effects: ResMut<ActiveEffects>) {
    effects.tick(time.delta_secs());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shield_absorbs_exactly_one_hit() {
        let mut effects = ActiveEffects::default();
        effects.apply(PowerUpKind::Shield, 10.0);
        assert!(effects.consume_shield());
        assert!(!effects.consume_shield(), "shield is single-use");
    }

    #[test]
    fn shield_expires_with_its_timer() {
        let mut effects = ActiveEffects::default();
        effects.apply(PowerUpKind::Shield, 1.0);
        effects.tick(1.5);
        assert!(!effects.consume_shield());
    }

    #[test]
    fn multipliers_reflect_active_timers() {
        let mut effects = ActiveEffects::default();
        assert_eq!(effects.speed_multiplier(), 1.0);
        assert_eq!(effects.damage_multiplier(), 1.0);
        assert_eq!(effects.rapid_multiplier(), 1.0);

        effects.apply(PowerUpKind::SpeedUp, 10.0);
        effects.apply(PowerUpKind::DoubleDamage, 10.0);
        effects.apply(PowerUpKind::RapidFire, 10.0);
        assert_eq!(effects.speed_multiplier(), 1.5);
        assert_eq!(effects.damage_multiplier(), 2.0);
        assert_eq!(effects.rapid_multiplier(), RAPID_FIRE_MULTIPLIER);

        effects.tick(11.0);
        assert_eq!(effects.damage_multiplier(), 1.0);
    }
}
