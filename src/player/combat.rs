//! Player firing: tap/hold shots, the 360° special weapon, and bullet upkeep.

use bevy::prelude::*;

use super::state::{EscortPlane, FireControl, Player, PlayerBullet, SpecialWeapon};
use crate::audio::{SoundCue, SoundRequest};
use crate::collision::Hitbox;
use crate::config::GameConfig;
use crate::motion::{DespawnOffscreen, Motion};
use crate::powerup::ActiveEffects;
use crate::score::ScoreBoard;
use crate::sprites::{ShapeKind, VisualShape};

/// Base damage of one player bullet before the double-damage power-up.
const BULLET_DAMAGE: f32 = 100.0;

/// Bullet width for the current score and level.
///
/// Milestones at 5 000 / 10 000 points and at levels 3 / 4 fatten the shot;
/// whichever of the two ladders is further along wins.
pub fn bullet_size(score: u32, level: u32, base: f32) -> f32 {
    let mut size = base;
    if score >= 10_000 {
        size = 7.5;
    } else if score >= 5_000 {
        size = 6.75;
    }

    if level >= 4 {
        size = size.max(7.5);
    } else if level >= 3 {
        size = size.max(6.75);
    }

    size
}

/// Feed Space press/release edges into the [`FireControl`] state machine.
pub fn fire_input_system(
    keys: Res<ButtonInput<KeyCode>>,
    time: Res<Time>,
    mut fire: ResMut<FireControl>,
) {
    let now = time.elapsed_secs();
    if keys.just_pressed(KeyCode::Space) {
        fire.on_press(now);
    }
    if keys.just_released(KeyCode::Space) {
        fire.on_release(now);
    }
}

/// Fire straight shots from the player and any escort when the state machine
/// says so.
#[allow(clippy::too_many_arguments)]
pub fn player_fire_system(
    mut commands: Commands,
    time: Res<Time>,
    config: Res<GameConfig>,
    score: Res<ScoreBoard>,
    effects: Res<ActiveEffects>,
    mut fire: ResMut<FireControl>,
    q_player: Query<&Transform, With<Player>>,
    q_escorts: Query<&Transform, With<EscortPlane>>,
    mut sounds: MessageWriter<SoundRequest>,
) {
    let Ok(player_transform) = q_player.single() else {
        return;
    };

    if fire
        .poll(time.elapsed_secs(), effects.rapid_multiplier())
        .is_none()
    {
        return;
    }

    let size = bullet_size(score.score, score.level, config.player_bullet_base_size);
    let damage = BULLET_DAMAGE * effects.damage_multiplier();

    let mut muzzles = vec![nose_of(player_transform, &config)];
    for escort in q_escorts.iter() {
        muzzles.push(nose_of(escort, &config));
    }

    for muzzle in muzzles {
        spawn_straight_bullet(&mut commands, muzzle, size, damage, &config);
    }

    sounds.write(SoundRequest::with_volume(SoundCue::Shoot, 0.4));
}

fn nose_of(transform: &Transform, config: &GameConfig) -> Vec2 {
    transform.translation.truncate() + Vec2::new(0.0, config.player_size / 2.0)
}

fn spawn_straight_bullet(
    commands: &mut Commands,
    pos: Vec2,
    size: f32,
    damage: f32,
    config: &GameConfig,
) {
    commands.spawn((
        PlayerBullet {
            damage,
            special: false,
            life_secs: None,
        },
        Hitbox::new(size, size * 2.0),
        Motion::new(Vec2::new(0.0, config.player_bullet_speed)),
        DespawnOffscreen::default(),
        Transform::from_translation(pos.extend(0.3)),
        Visibility::default(),
        VisualShape::new(
            ShapeKind::Rect {
                width: size,
                height: size * 2.0,
            },
            Color::srgb(1.0, 1.0, 0.3),
        ),
    ));
}

/// `B` spends one banked special-weapon unit and fires a full 360° ring —
/// one bullet every 5 degrees — from the player and every active escort.
#[allow(clippy::too_many_arguments)]
pub fn special_weapon_system(
    mut commands: Commands,
    keys: Res<ButtonInput<KeyCode>>,
    config: Res<GameConfig>,
    mut special: ResMut<SpecialWeapon>,
    q_player: Query<&Transform, With<Player>>,
    q_escorts: Query<&Transform, With<EscortPlane>>,
    mut sounds: MessageWriter<SoundRequest>,
) {
    if !keys.just_pressed(KeyCode::KeyB) {
        return;
    }
    let Ok(player_transform) = q_player.single() else {
        return;
    };
    if !special.try_consume() {
        return;
    }

    let mut origins = vec![player_transform.translation.truncate()];
    for escort in q_escorts.iter() {
        origins.push(escort.translation.truncate());
    }

    for origin in origins {
        spawn_special_ring(&mut commands, origin, &config);
    }

    sounds.write(SoundRequest::new(SoundCue::Shoot));
}

/// One 72-bullet ring.
pub fn spawn_special_ring(commands: &mut Commands, origin: Vec2, config: &GameConfig) {
    for deg in (0..360).step_by(crate::constants::SPECIAL_WEAPON_ANGLE_STEP_DEG as usize) {
        let angle = (deg as f32).to_radians();
        commands.spawn((
            PlayerBullet {
                damage: BULLET_DAMAGE,
                special: true,
                life_secs: Some(config.special_bullet_life_secs),
            },
            Hitbox::square(12.0),
            Motion::from_angle(angle, config.special_bullet_speed),
            DespawnOffscreen::default(),
            Transform::from_translation(origin.extend(0.3)),
            Visibility::default(),
            VisualShape::new(
                ShapeKind::Rect {
                    width: 12.0,
                    height: 12.0,
                },
                Color::srgb(0.0, 1.0, 1.0),
            ),
        ));
    }
}

/// Age special bullets out; normal shots despawn at the screen edge instead.
pub fn special_bullet_life_system(
    mut commands: Commands,
    time: Res<Time>,
    mut query: Query<(Entity, &mut PlayerBullet)>,
) {
    let dt = time.delta_secs();
    for (entity, mut bullet) in query.iter_mut() {
        if let Some(life) = bullet.life_secs.as_mut() {
            *life -= dt;
            if *life <= 0.0 {
                commands.entity(entity).despawn();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bullet_size_grows_with_score_milestones() {
        let base = 4.5;
        assert_eq!(bullet_size(0, 1, base), 4.5);
        assert_eq!(bullet_size(5_000, 1, base), 6.75);
        assert_eq!(bullet_size(10_000, 1, base), 7.5);
    }

    #[test]
    fn bullet_size_takes_the_larger_of_score_and_level_tiers() {
        let base = 4.5;
        assert_eq!(bullet_size(0, 3, base), 6.75);
        assert_eq!(bullet_size(0, 4, base), 7.5);
        assert_eq!(bullet_size(10_000, 3, base), 7.5, "score tier wins here");
    }
}
