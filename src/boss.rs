//! The multi-phase boss: score-gated spawning, hover movement, phase
//! escalation, and the fourteen shape-named spread patterns.
//!
//! Spread patterns are data: each is a list of [`WaveSpec`] rows giving
//! bullet count, angular layout, and timing.  Wave zero fires immediately;
//! later waves go through the [`ShotSchedule`] so they freeze under pause and
//! are cancelled if the boss dies mid-sequence.  A `pattern_running` guard
//! keeps patterns from overlapping.

use bevy::prelude::*;
use rand::Rng;

use crate::audio::{SoundCue, SoundRequest};
use crate::collision::Hitbox;
use crate::config::GameConfig;
use crate::constants::{BOSS_HOVER_DEPTH, BOSS_SIZE};
use crate::effects::{spawn_explosion, ExplosionKind};
use crate::hazard::Tumble;
use crate::hud::HudMessages;
use crate::menu::GameState;
use crate::motion::{DespawnOffscreen, Motion};
use crate::player::state::{PlayerLives, SpecialWeapon};
use crate::schedule::{DeferredAction, ShotSchedule};
use crate::score::{award_points, ScoreBoard};
use crate::sprites::{ShapeKind, VisualShape};

/// Speed multiplier per phase (hull speed).
const PHASE_SPEED_MULT: [f32; 4] = [1.0, 1.25, 1.5, 1.75];

/// Bullet-speed multiplier per phase.
const PHASE_BULLET_MULT: [f32; 4] = [1.0, 1.2, 1.4, 1.6];

/// Health fractions at which the next phase begins.
const PHASE_THRESHOLDS: [f32; 3] = [0.75, 0.5, 0.25];

/// Horizontal speed while fleeing off screen.
const EXIT_SPEED: f32 = 180.0;

// ── Components ────────────────────────────────────────────────────────────────

/// The boss hull and its behavioural scratch state.
#[derive(Component, Debug, Clone)]
pub struct Boss {
    pub health: f32,
    pub max_health: f32,
    pub phase: usize,
    pub speed: f32,
    pub bullet_speed: f32,
    /// Set while a multi-wave pattern still has queued waves.
    pub pattern_running: bool,
    /// Altitude the boss descends to before hovering.
    pub hover_y: f32,
    /// Current goal of the bounded random walk inside the hover box.
    pub wander_target: Vec2,
    pub jitter_t: f32,
    /// True while bullets are landing (gap under a second).
    pub being_hit: bool,
    pub secs_since_hit: f32,
    /// Accumulated time spent under fire; triggers the escape rule.
    pub time_under_fire: f32,
    /// `Some(direction)` once the boss has given up and is strafing out.
    pub exit_dir: Option<f32>,
}

/// A bullet fired by a boss spread pattern.
#[derive(Component, Debug, Clone, Copy)]
pub struct BossBullet {
    pub damage: f32,
    pub life_secs: f32,
}

// ── Resources ─────────────────────────────────────────────────────────────────

/// Boss lifecycle outside the entity itself: spawn cooldown and the spread
/// attack cadence.
#[derive(Resource, Debug, Clone, Copy)]
pub struct BossDirector {
    /// Seconds until the next boss may spawn (only ticks while none exists).
    pub cooldown_secs: f32,
    /// Seconds until the next spread attack (only ticks while one exists).
    pub spread_timer_secs: f32,
}

impl BossDirector {
    pub fn new(config: &GameConfig) -> Self {
        Self {
            cooldown_secs: config.boss_spawn_cooldown_secs,
            spread_timer_secs: 0.0,
        }
    }
}

impl Default for BossDirector {
    fn default() -> Self {
        Self::new(&GameConfig::default())
    }
}

// ── Patterns ──────────────────────────────────────────────────────────────────

/// The fourteen shape-named spread patterns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BossPattern {
    Snowflake,
    Pinwheel,
    Triangle,
    Rectangle,
    Pentagon,
    Hexagon,
    Octagon,
    Circle,
    Cross,
    Heart,
    Star,
    Flower,
    Gear,
    Moon,
}

/// One wave of a spread pattern.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WaveSpec {
    /// Delay from pattern start (s); wave 0 must use 0.0.
    pub delay_secs: f32,
    pub bullets: u32,
    /// Uniform rotation applied to the whole ring.
    pub rotation_offset: f32,
    /// Per-bullet sine wobble: `amp * sin(i * freq)`.
    pub wobble_amp: f32,
    pub wobble_freq: f32,
    /// Extra per-bullet rotation, producing spirals.
    pub spiral_step: f32,
    /// Bullet speed; `None` inherits the boss's phase bullet speed.
    pub speed: Option<f32>,
    /// Per-bullet speed ramp on top of `speed`.
    pub speed_ramp: f32,
}

impl WaveSpec {
    const fn ring(delay_secs: f32, bullets: u32, rotation_offset: f32, speed: Option<f32>) -> Self {
        Self {
            delay_secs,
            bullets,
            rotation_offset,
            wobble_amp: 0.0,
            wobble_freq: 0.0,
            spiral_step: 0.0,
            speed,
            speed_ramp: 0.0,
        }
    }
}

impl BossPattern {
    pub const ALL: [BossPattern; 14] = [
        BossPattern::Snowflake,
        BossPattern::Pinwheel,
        BossPattern::Triangle,
        BossPattern::Rectangle,
        BossPattern::Pentagon,
        BossPattern::Hexagon,
        BossPattern::Octagon,
        BossPattern::Circle,
        BossPattern::Cross,
        BossPattern::Heart,
        BossPattern::Star,
        BossPattern::Flower,
        BossPattern::Gear,
        BossPattern::Moon,
    ];

    /// The wave rows of this pattern.  Wave 0 always has zero delay.
    pub fn waves(self) -> Vec<WaveSpec> {
        use std::f32::consts::PI;
        match self {
            BossPattern::Snowflake => vec![
                WaveSpec {
                    wobble_amp: 0.3,
                    wobble_freq: PI / 3.0,
                    ..WaveSpec::ring(0.0, 6, 0.0, Some(240.0))
                },
                WaveSpec {
                    wobble_amp: 0.3,
                    wobble_freq: PI / 3.0,
                    ..WaveSpec::ring(0.3, 6, PI / 6.0, Some(300.0))
                },
            ],
            BossPattern::Pinwheel => vec![WaveSpec {
                wobble_amp: 0.4,
                wobble_freq: PI / 2.0,
                spiral_step: PI / 6.0,
                speed_ramp: 18.0,
                ..WaveSpec::ring(0.0, 6, 0.0, Some(180.0))
            }],
            BossPattern::Triangle => (0..3)
                .map(|wave| {
                    WaveSpec::ring(
                        wave as f32 * 0.2,
                        4,
                        (wave as f32 * PI / 3.0).sin() * 0.5,
                        Some(240.0),
                    )
                })
                .collect(),
            BossPattern::Rectangle => (0..4)
                .map(|wave| WaveSpec::ring(wave as f32 * 0.15, 3, wave as f32 * PI / 4.0, Some(300.0)))
                .collect(),
            BossPattern::Pentagon => (0..3)
                .map(|ring| {
                    WaveSpec::ring(
                        ring as f32 * 0.1,
                        5,
                        ring as f32 * 0.2,
                        Some(240.0 + ring as f32 * 60.0),
                    )
                })
                .collect(),
            BossPattern::Hexagon => (0..3)
                .map(|wave| WaveSpec::ring(wave as f32 * 0.15, 6, wave as f32 * PI / 3.0, Some(240.0)))
                .collect(),
            BossPattern::Octagon => (0..3)
                .map(|wave| WaveSpec::ring(wave as f32 * 0.12, 8, wave as f32 * PI / 4.0, Some(300.0)))
                .collect(),
            BossPattern::Circle => (0..3)
                .map(|wave| {
                    WaveSpec::ring(
                        wave as f32 * 0.2,
                        8,
                        (wave as f32 * PI / 2.0).sin() * 0.3,
                        Some(240.0),
                    )
                })
                .collect(),
            BossPattern::Cross => (0..3)
                .map(|burst| WaveSpec::ring(burst as f32 * 0.2, 4, burst as f32 * 0.2, Some(360.0)))
                .collect(),
            BossPattern::Heart => (0..3)
                .map(|layer| WaveSpec::ring(layer as f32 * 0.15, 6, layer as f32 * 0.3, Some(240.0)))
                .collect(),
            BossPattern::Star => (0..5)
                .map(|star| WaveSpec::ring(star as f32 * 0.12, 5, star as f32 * PI / 5.0, Some(300.0)))
                .collect(),
            BossPattern::Flower => vec![WaveSpec::ring(0.0, 6, 0.0, None)],
            BossPattern::Gear => vec![WaveSpec::ring(0.0, 6, 0.0, None)],
            BossPattern::Moon => vec![WaveSpec::ring(0.0, 4, 0.0, None)],
        }
    }

    /// Bullet tint for this pattern.
    pub fn color(self) -> Color {
        match self {
            BossPattern::Snowflake => Color::srgb(1.0, 1.0, 1.0),
            BossPattern::Pinwheel => Color::srgb(0.56, 0.93, 0.56),
            BossPattern::Triangle => Color::srgb(0.2, 0.8, 0.2),
            BossPattern::Rectangle => Color::srgb(0.68, 1.0, 0.18),
            BossPattern::Pentagon => Color::srgb(1.0, 0.65, 0.0),
            BossPattern::Hexagon => Color::srgb(0.83, 0.83, 0.83),
            BossPattern::Octagon => Color::srgb(1.0, 0.84, 0.0),
            BossPattern::Circle => Color::srgb(0.13, 0.7, 0.67),
            BossPattern::Cross => Color::srgb(1.0, 0.27, 0.0),
            BossPattern::Heart => Color::srgb(1.0, 0.41, 0.71),
            BossPattern::Star => Color::srgb(1.0, 1.0, 0.0),
            BossPattern::Flower => Color::srgb(1.0, 0.08, 0.58),
            BossPattern::Gear => Color::srgb(0.75, 0.75, 0.75),
            BossPattern::Moon => Color::srgb(0.94, 0.9, 0.55),
        }
    }

    /// Bullet silhouette for this pattern.
    pub fn shape(self) -> ShapeKind {
        match self {
            BossPattern::Snowflake => ShapeKind::Star {
                points: 6,
                outer: 7.0,
                inner: 3.0,
            },
            BossPattern::Pinwheel => ShapeKind::Star {
                points: 4,
                outer: 8.0,
                inner: 3.0,
            },
            BossPattern::Triangle => ShapeKind::Regular {
                sides: 3,
                radius: 7.0,
            },
            BossPattern::Rectangle => ShapeKind::Rect {
                width: 14.0,
                height: 14.0,
            },
            BossPattern::Pentagon => ShapeKind::Regular {
                sides: 5,
                radius: 7.0,
            },
            BossPattern::Hexagon => ShapeKind::Regular {
                sides: 6,
                radius: 7.0,
            },
            BossPattern::Octagon => ShapeKind::Regular {
                sides: 8,
                radius: 7.0,
            },
            BossPattern::Circle => ShapeKind::Circle { radius: 8.0 },
            BossPattern::Cross => ShapeKind::Cross {
                size: 12.0,
                thickness: 4.0,
            },
            BossPattern::Heart => ShapeKind::Circle { radius: 8.0 },
            BossPattern::Star => ShapeKind::Star {
                points: 5,
                outer: 7.0,
                inner: 3.0,
            },
            BossPattern::Flower => ShapeKind::Star {
                points: 6,
                outer: 7.0,
                inner: 4.0,
            },
            BossPattern::Gear => ShapeKind::Star {
                points: 8,
                outer: 7.0,
                inner: 5.0,
            },
            BossPattern::Moon => ShapeKind::Circle { radius: 7.0 },
        }
    }
}

/// Firing angles of one wave.
pub fn wave_angles(spec: &WaveSpec) -> Vec<f32> {
    (0..spec.bullets)
        .map(|i| {
            let i = i as f32;
            std::f32::consts::TAU * i / spec.bullets as f32
                + spec.rotation_offset
                + spec.spiral_step * i
                + spec.wobble_amp * (i * spec.wobble_freq).sin()
        })
        .collect()
}

/// Phase index for a health value: non-decreasing as health drops.
pub fn phase_for_health(health: f32, max_health: f32) -> usize {
    let ratio = health / max_health.max(1.0);
    PHASE_THRESHOLDS.iter().filter(|&&t| ratio <= t).count()
}

// ── Plugin ────────────────────────────────────────────────────────────────────

pub struct BossPlugin;

impl Plugin for BossPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<BossDirector>().add_systems(
            Update,
            (
                boss_spawn_system,
                boss_movement_system,
                boss_phase_system,
                boss_endurance_system,
                boss_spread_system,
                boss_deferred_wave_system,
                boss_bullet_life_system,
            )
                .chain()
                .run_if(in_state(GameState::Playing)),
        );
    }
}

// ── Systems ───────────────────────────────────────────────────────────────────

/// Spawn the boss once the score threshold and cooldown are both met.
#[allow(clippy::too_many_arguments)]
pub fn boss_spawn_system(
    mut commands: Commands,
    time: Res<Time>,
    config: Res<GameConfig>,
    score: Res<ScoreBoard>,
    mut director: ResMut<BossDirector>,
    q_boss: Query<(), With<Boss>>,
    mut messages: ResMut<HudMessages>,
    mut sounds: MessageWriter<SoundRequest>,
) {
    if !q_boss.is_empty() {
        return;
    }

    director.cooldown_secs -= time.delta_secs();
    if director.cooldown_secs > 0.0 {
        return;
    }
    if score.score < config.boss_spawn_score(score.level) {
        return;
    }

    let mut rng = rand::thread_rng();
    let hover_y = config.arena_top() - BOSS_HOVER_DEPTH;

    commands.spawn((
        Boss {
            health: config.boss_health,
            max_health: config.boss_health,
            phase: 0,
            speed: config.boss_speed,
            bullet_speed: config.boss_bullet_speed,
            pattern_running: false,
            hover_y,
            wander_target: Vec2::new(rng.gen_range(-120.0..120.0), hover_y),
            jitter_t: rng.gen_range(0.0..10.0),
            being_hit: false,
            secs_since_hit: 0.0,
            time_under_fire: 0.0,
            exit_dir: None,
        },
        Hitbox::square(BOSS_SIZE),
        Transform::from_translation(Vec3::new(0.0, config.arena_top() + BOSS_SIZE, 0.18)),
        Visibility::default(),
        VisualShape::new(
            ShapeKind::Regular {
                sides: 6,
                radius: BOSS_SIZE / 2.0,
            },
            Color::srgb(1.0, 0.55, 0.0),
        ),
    ));

    // First spread lands shortly after the entrance.
    director.spread_timer_secs = config.boss_first_spread_delay_secs;

    messages.post("WARNING: boss helicopter inbound!".to_string());
    sounds.write(SoundRequest::new(SoundCue::Explosion));
    info!("Boss spawned at score {}", score.score);
}

/// Entry descent, hover wander, and the escape strafe.
pub fn boss_movement_system(
    mut commands: Commands,
    time: Res<Time>,
    config: Res<GameConfig>,
    mut director: ResMut<BossDirector>,
    mut q_boss: Query<(Entity, &mut Boss, &mut Transform)>,
) {
    let Ok((entity, mut boss, mut transform)) = q_boss.single_mut() else {
        return;
    };
    let dt = time.delta_secs();
    boss.jitter_t += dt;

    if let Some(dir) = boss.exit_dir {
        transform.translation.x += dir * EXIT_SPEED * dt;
        if transform.translation.x.abs() > config.arena_width / 2.0 + BOSS_SIZE {
            commands.entity(entity).despawn();
            director.cooldown_secs = config.boss_spawn_cooldown_secs;
            info!("Boss escaped off screen");
        }
        return;
    }

    if transform.translation.y > boss.hover_y {
        transform.translation.y -= boss.speed * dt;
        return;
    }

    // Bounded random walk toward a wander target, plus sine jitter.
    let pos = transform.translation.truncate();
    let to_target = boss.wander_target - pos;
    if to_target.length() < 8.0 {
        let mut rng = rand::thread_rng();
        let half_w = config.arena_width / 2.0 - BOSS_SIZE;
        boss.wander_target = Vec2::new(
            rng.gen_range(-half_w..half_w),
            boss.hover_y + rng.gen_range(-40.0..40.0),
        );
    } else {
        let step = to_target.normalize_or_zero() * boss.speed * dt;
        transform.translation.x += step.x;
        transform.translation.y += step.y;
    }

    transform.translation.x += (boss.jitter_t * 2.0).sin() * 30.0 * dt;
    transform.translation.y += (boss.jitter_t * 3.0).cos() * 18.0 * dt;
}

/// Escalate phases as health drops; each transition is announced.
pub fn boss_phase_system(
    config: Res<GameConfig>,
    mut q_boss: Query<&mut Boss>,
    mut messages: ResMut<HudMessages>,
    mut sounds: MessageWriter<SoundRequest>,
) {
    let Ok(mut boss) = q_boss.single_mut() else {
        return;
    };

    let phase = phase_for_health(boss.health, boss.max_health);
    if phase <= boss.phase {
        return;
    }

    boss.phase = phase;
    boss.speed = config.boss_speed * PHASE_SPEED_MULT[phase.min(3)];
    boss.bullet_speed = config.boss_bullet_speed * PHASE_BULLET_MULT[phase.min(3)];

    messages.post(format!("Boss phase {}!", phase + 1));
    sounds.write(SoundRequest::new(SoundCue::Warning));
}

/// Track time under sustained fire; too much of it sends the boss fleeing.
pub fn boss_endurance_system(
    time: Res<Time>,
    config: Res<GameConfig>,
    mut q_boss: Query<(Entity, &mut Boss)>,
    mut schedule: ResMut<ShotSchedule>,
    mut messages: ResMut<HudMessages>,
) {
    let Ok((entity, mut boss)) = q_boss.single_mut() else {
        return;
    };
    let dt = time.delta_secs();

    boss.secs_since_hit += dt;
    if boss.secs_since_hit > 1.0 {
        boss.being_hit = false;
    }
    if boss.being_hit {
        boss.time_under_fire += dt;
    }

    if boss.exit_dir.is_none() && boss.time_under_fire >= config.boss_endurance_secs {
        let dir = if rand::thread_rng().gen_bool(0.5) {
            1.0
        } else {
            -1.0
        };
        boss.exit_dir = Some(dir);
        boss.pattern_running = false;
        schedule.cancel_owner(entity);
        messages.post("The boss is fleeing!".to_string());
    }
}

/// Periodic spread attacks: pick a random pattern, fire wave zero, queue the
/// rest.  The concurrency guard keeps patterns from overlapping.
pub fn boss_spread_system(
    mut commands: Commands,
    time: Res<Time>,
    config: Res<GameConfig>,
    mut director: ResMut<BossDirector>,
    mut schedule: ResMut<ShotSchedule>,
    mut q_boss: Query<(Entity, &mut Boss, &Transform)>,
) {
    let Ok((entity, mut boss, transform)) = q_boss.single_mut() else {
        return;
    };
    if boss.exit_dir.is_some() {
        return;
    }

    // A pattern counts as finished once its queued waves have all fired.
    if boss.pattern_running && !schedule.has_pending_for(entity) {
        boss.pattern_running = false;
    }

    director.spread_timer_secs -= time.delta_secs();
    if director.spread_timer_secs > 0.0 || boss.pattern_running {
        return;
    }

    let mut rng = rand::thread_rng();
    let pattern = BossPattern::ALL[rng.gen_range(0..BossPattern::ALL.len())];
    let waves = pattern.waves();

    fire_boss_wave(
        &mut commands,
        transform.translation.truncate(),
        boss.bullet_speed,
        pattern,
        &waves[0],
    );

    for (index, wave) in waves.iter().enumerate().skip(1) {
        schedule.push_in(
            wave.delay_secs,
            entity,
            DeferredAction::BossWave {
                pattern,
                wave_index: index,
            },
        );
    }

    boss.pattern_running = waves.len() > 1;
    director.spread_timer_secs = config.boss_spread_period_secs;
}

/// Fire queued pattern waves whose boss is still alive.
pub fn boss_deferred_wave_system(
    mut commands: Commands,
    mut schedule: ResMut<ShotSchedule>,
    q_boss: Query<(&Boss, &Transform)>,
) {
    for entry in schedule.take_due(|a| matches!(a, DeferredAction::BossWave { .. })) {
        let DeferredAction::BossWave {
            pattern,
            wave_index,
        } = entry.action
        else {
            continue;
        };
        let Ok((boss, transform)) = q_boss.get(entry.owner) else {
            // Boss died mid-pattern; the rest of the burst is void.
            continue;
        };
        if boss.exit_dir.is_some() {
            continue;
        }

        let waves = pattern.waves();
        if let Some(wave) = waves.get(wave_index) {
            fire_boss_wave(
                &mut commands,
                transform.translation.truncate(),
                boss.bullet_speed,
                pattern,
                wave,
            );
        }
    }
}

/// Spawn one wave of pattern bullets from `origin`.
pub fn fire_boss_wave(
    commands: &mut Commands,
    origin: Vec2,
    boss_bullet_speed: f32,
    pattern: BossPattern,
    wave: &WaveSpec,
) {
    let mut rng = rand::thread_rng();
    let base_speed = wave.speed.unwrap_or(boss_bullet_speed);

    for (i, angle) in wave_angles(wave).into_iter().enumerate() {
        let speed = base_speed + wave.speed_ramp * i as f32;
        commands.spawn((
            BossBullet {
                damage: crate::constants::BOSS_BULLET_DAMAGE,
                life_secs: 10.0,
            },
            Hitbox::square(14.0),
            Motion::from_angle(angle, speed),
            DespawnOffscreen::default(),
            Tumble {
                rate: rng.gen_range(-4.5..4.5),
            },
            Transform::from_translation(origin.extend(0.22)),
            Visibility::default(),
            VisualShape::new(pattern.shape(), pattern.color()),
        ));
    }
}

/// Age boss bullets out on their life timer.
pub fn boss_bullet_life_system(
    mut commands: Commands,
    time: Res<Time>,
    mut query: Query<(Entity, &mut BossBullet)>,
) {
    let dt = time.delta_secs();
    for (entity, mut bullet) in query.iter_mut() {
        bullet.life_secs -= dt;
        if bullet.life_secs <= 0.0 {
            commands.entity(entity).despawn();
        }
    }
}

/// Shared destruction path: bonus score, a life reward, the explosion ring,
/// and director/schedule cleanup.  Used for both hull depletion and the
/// special-weapon instant kill.
#[allow(clippy::too_many_arguments)]
pub fn destroy_boss(
    commands: &mut Commands,
    entity: Entity,
    pos: Vec2,
    config: &GameConfig,
    director: &mut BossDirector,
    schedule: &mut ShotSchedule,
    score: &mut ScoreBoard,
    special: &mut SpecialWeapon,
    lives: &mut PlayerLives,
    messages: &mut HudMessages,
    big_blast: bool,
) {
    award_points(score, special, config, config.boss_bonus_score);
    lives.grant_life();

    let kind = if big_blast {
        ExplosionKind::Final
    } else {
        ExplosionKind::ShieldBreak
    };
    spawn_explosion(commands, pos, kind, config.arena_top());
    for i in 0..8 {
        let angle = std::f32::consts::TAU * i as f32 / 8.0;
        spawn_explosion(
            commands,
            pos + Vec2::new(angle.cos(), angle.sin()) * 50.0,
            ExplosionKind::Normal,
            config.arena_top(),
        );
    }

    schedule.cancel_owner(entity);
    commands.entity(entity).despawn();
    director.cooldown_secs = config.boss_spawn_cooldown_secs;
    messages.post("Boss destroyed! +1 life".to_string());
    info!("Boss destroyed ({} bonus points)", config.boss_bonus_score);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phase_is_monotonic_as_health_drops() {
        let max = 1500.0;
        let mut last_phase = 0;
        let mut health = max;
        while health > 0.0 {
            let phase = phase_for_health(health, max);
            assert!(phase >= last_phase, "phase regressed at health {health}");
            last_phase = phase;
            health -= 50.0;
        }
        assert_eq!(phase_for_health(max, max), 0);
        assert_eq!(phase_for_health(0.0, max), 3);
    }

    #[test]
    fn phase_thresholds_match_the_quarter_marks() {
        let max = 1000.0;
        assert_eq!(phase_for_health(800.0, max), 0);
        assert_eq!(phase_for_health(750.0, max), 1);
        assert_eq!(phase_for_health(500.0, max), 2);
        assert_eq!(phase_for_health(250.0, max), 3);
    }

    #[test]
    fn every_pattern_has_waves_and_wave_zero_is_immediate() {
        for pattern in BossPattern::ALL {
            let waves = pattern.waves();
            assert!(!waves.is_empty(), "{pattern:?} has no waves");
            assert_eq!(waves[0].delay_secs, 0.0, "{pattern:?} wave 0 must be immediate");
            for wave in &waves {
                assert!(wave.bullets >= 3, "{pattern:?} fires too few bullets");
            }
        }
    }

    #[test]
    fn later_waves_are_strictly_staggered() {
        for pattern in BossPattern::ALL {
            let waves = pattern.waves();
            for pair in waves.windows(2) {
                assert!(
                    pair[1].delay_secs > pair[0].delay_secs,
                    "{pattern:?} waves out of order"
                );
            }
        }
    }

    #[test]
    fn wave_angles_are_distinct_within_a_wave() {
        for pattern in BossPattern::ALL {
            for wave in pattern.waves() {
                let angles = wave_angles(&wave);
                assert_eq!(angles.len(), wave.bullets as usize);
                for i in 0..angles.len() {
                    for j in (i + 1)..angles.len() {
                        assert!(
                            (angles[i] - angles[j]).abs() > 1e-3,
                            "{pattern:?} duplicate angle"
                        );
                    }
                }
            }
        }
    }

    #[test]
    fn snowflake_fires_twelve_bullets_total() {
        let total: u32 = BossPattern::Snowflake
            .waves()
            .iter()
            .map(|w| w.bullets)
            .sum();
        assert_eq!(total, 12);
    }
}
