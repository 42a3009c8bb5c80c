//! Enemy foundation: level-gated spawning, per-kind movement, and fire.
//!
//! Three kinds share the [`Enemy`] component: planes scroll down the screen
//! along pattern-tagged paths, while the two helicopter variants climb to a
//! hover altitude and bob there behind a rotating shield.  The spawner rolls
//! kind, elite status, and special abilities per spawn against the current
//! [`DifficultyProfile`].

use bevy::prelude::*;
use rand::Rng;

use crate::boss::Boss;
use crate::collision::Hitbox;
use crate::config::GameConfig;
use crate::constants::{
    ENEMY_BULLET_HEIGHT, ENEMY_BULLET_WIDTH, HELICOPTER_BULLET_HEIGHT, HELICOPTER_BULLET_WIDTH,
    HELICOPTER_FIRE_COOLDOWN_MAX, HELICOPTER_FIRE_COOLDOWN_MIN, HELICOPTER_SIZE, PLANE_BOMB_SALVO,
    PLANE_SIZE, SHIELD_RADIUS_ELITE, SHIELD_RADIUS_HELICOPTER, SHIELD_RADIUS_HELICOPTER2,
    SHIELD_ROTATION_SPEED,
};
use crate::difficulty::DifficultyProfile;
use crate::hazard::{spawn_bomb, spawn_dynamite};
use crate::menu::GameState;
use crate::motion::{DespawnOffscreen, Motion};
use crate::player::state::Player;
use crate::schedule::{DeferredAction, ShotSchedule};
use crate::score::ScoreBoard;
use crate::sprites::{aircraft_polygon, ShapeKind, VisualShape};

// ── Components ────────────────────────────────────────────────────────────────

/// Enemy kind discriminator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnemyKind {
    Plane,
    Helicopter,
    Helicopter2,
}

impl EnemyKind {
    #[inline]
    pub fn is_helicopter(self) -> bool {
        matches!(self, EnemyKind::Helicopter | EnemyKind::Helicopter2)
    }
}

/// Shared enemy state.
#[derive(Component, Debug, Clone, Copy)]
pub struct Enemy {
    pub kind: EnemyKind,
    pub speed: f32,
    pub score_value: u32,
    pub elite: bool,
}

#[derive(Component, Debug, Clone, Copy)]
pub struct EnemyHealth {
    pub hp: f32,
}

/// Depletable hit-point pool that guards a helicopter hull.
///
/// While `active`, every player bullet is absorbed here instead of the hull;
/// the hull can only be damaged once the shield has broken.
#[derive(Component, Debug, Clone, Copy)]
pub struct Shield {
    pub hp: u32,
    pub max_hp: u32,
    pub radius: f32,
    pub rotation: f32,
    pub active: bool,
}

impl Shield {
    pub fn new(hp: u32, radius: f32) -> Self {
        Self {
            hp,
            max_hp: hp,
            radius,
            rotation: 0.0,
            active: true,
        }
    }

    /// Absorb one hit.  Returns `true` when this hit broke the shield.
    pub fn absorb_hit(&mut self) -> bool {
        if !self.active {
            return false;
        }
        self.hp = self.hp.saturating_sub(1);
        if self.hp == 0 {
            self.active = false;
            return true;
        }
        false
    }
}

/// Rotating ring child entity visualising a [`Shield`].
#[derive(Component)]
pub struct ShieldRing;

/// Movement pattern tags for planes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlightPattern {
    Normal,
    Zigzag,
    Circle,
    Diagonal,
}

impl FlightPattern {
    const NON_NORMAL: [FlightPattern; 3] = [
        FlightPattern::Zigzag,
        FlightPattern::Circle,
        FlightPattern::Diagonal,
    ];

    const ALL: [FlightPattern; 4] = [
        FlightPattern::Normal,
        FlightPattern::Zigzag,
        FlightPattern::Circle,
        FlightPattern::Diagonal,
    ];
}

/// Per-plane movement scratch state.
#[derive(Component, Debug, Clone, Copy)]
pub struct PlaneMovement {
    pub pattern: FlightPattern,
    /// Distance travelled down-screen; drives the sine phases.
    pub travelled: f32,
    pub circle_angle: f32,
    pub circle_center: Vec2,
    pub circle_radius: f32,
    /// Lateral direction for the diagonal pattern (+1 right, -1 left).
    pub lateral_dir: f32,
    pub diving: bool,
    pub dive_start_y: f32,
}

impl PlaneMovement {
    fn new(pattern: FlightPattern, lateral_dir: f32) -> Self {
        Self {
            pattern,
            travelled: 0.0,
            circle_angle: 0.0,
            circle_center: Vec2::ZERO,
            circle_radius: 50.0,
            lateral_dir,
            diving: false,
            dive_start_y: 0.0,
        }
    }
}

/// Hover state for helicopters.
#[derive(Component, Debug, Clone, Copy)]
pub struct Hover {
    /// World Y the helicopter settles at.
    pub altitude_y: f32,
    pub timer: f32,
    pub drift_dir: f32,
}

/// Ranged attack state shared by planes and helicopters.
#[derive(Component, Debug, Clone, Copy)]
pub struct EnemyGun {
    pub fire_interval: f32,
    pub cooldown: f32,
    pub bullet_speed: f32,
    /// Planes hold fire until they have been on screen this long.
    pub entry_delay: f32,
    pub on_screen_secs: f32,
    pub ability: Option<SpecialAbility>,
}

/// Bomb-drop state for enemies that carry bombs.
#[derive(Component, Debug, Clone, Copy)]
pub struct BombDropper {
    pub interval: f32,
    pub cooldown: f32,
}

/// Per-spawn attack modifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpecialAbility {
    RapidFire,
    TripleShot,
    HomingShot,
    Bomb,
    Dynamite,
}

impl SpecialAbility {
    const ALL: [SpecialAbility; 5] = [
        SpecialAbility::RapidFire,
        SpecialAbility::TripleShot,
        SpecialAbility::HomingShot,
        SpecialAbility::Bomb,
        SpecialAbility::Dynamite,
    ];
}

/// Marker for plane bullets.
#[derive(Component, Debug, Clone, Copy)]
pub struct EnemyBullet;

/// Marker for aimed helicopter bullets.
#[derive(Component, Debug, Clone, Copy)]
pub struct HelicopterBullet;

// ── Resources ─────────────────────────────────────────────────────────────────

/// Countdown until the next spawn attempt may roll.
#[derive(Resource, Debug, Clone, Copy, Default)]
pub struct SpawnState {
    pub cooldown_secs: f32,
}

// ── Spawn maths (pure helpers) ────────────────────────────────────────────────

/// Probability that a spawn roll yields a helicopter at this level.
#[inline]
pub fn helicopter_chance(config: &GameConfig, level: u32) -> f32 {
    config.helicopter_base_chance + config.helicopter_chance_per_level * level as f32
}

/// Probability that a fresh spawn rolls elite at this level.
#[inline]
pub fn elite_chance(config: &GameConfig, level: u32) -> f32 {
    config.elite_base_chance + config.elite_chance_per_level * level as f32
}

/// Probability that a fresh spawn carries any special ability.
#[inline]
pub fn special_ability_chance(level: u32) -> f32 {
    (0.1 + 0.05 * level.saturating_sub(1) as f32).min(0.5)
}

/// Stat bundle computed at spawn time, before the entity exists.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpawnStats {
    pub hp: f32,
    pub speed: f32,
    pub score_value: u32,
    pub fire_interval: f32,
    pub bullet_speed: f32,
    pub shield_hp: u32,
    pub shield_radius: f32,
}

/// Roll the base stats for `kind` at `level`, then apply elite bonuses.
pub fn spawn_stats(
    config: &GameConfig,
    profile: &DifficultyProfile,
    kind: EnemyKind,
    level: u32,
    elite: bool,
) -> SpawnStats {
    let (speed, score_value, shield_hp, shield_radius) = match kind {
        EnemyKind::Plane => (profile.enemy_speed, config.plane_kill_score, 0, 0.0),
        EnemyKind::Helicopter => (
            profile.enemy_speed * 0.8,
            150 * level.max(1),
            config.shield_hp_helicopter,
            SHIELD_RADIUS_HELICOPTER,
        ),
        EnemyKind::Helicopter2 => (
            profile.enemy_speed,
            100 * level.max(1),
            config.shield_hp_helicopter2,
            SHIELD_RADIUS_HELICOPTER2,
        ),
    };

    let mut stats = SpawnStats {
        hp: profile.enemy_health,
        speed,
        score_value,
        fire_interval: profile.fire_interval,
        bullet_speed: profile.bullet_speed,
        shield_hp,
        shield_radius,
    };

    if elite {
        stats.hp *= 1.5 + 0.2 * level as f32;
        stats.speed *= 1.2;
        stats.score_value *= 2;
        stats.bullet_speed *= 1.2;
        stats.fire_interval *= 0.8;
        if kind.is_helicopter() {
            stats.shield_hp = config.shield_hp_elite;
            stats.shield_radius = SHIELD_RADIUS_ELITE;
        }
    }

    stats
}

// ── Plugin ────────────────────────────────────────────────────────────────────

pub struct EnemyPlugin;

impl Plugin for EnemyPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<SpawnState>().add_systems(
            Update,
            (
                enemy_spawn_system,
                plane_move_system,
                helicopter_move_system,
                shield_spin_system,
                shield_ring_sync_system,
                plane_fire_system,
                plane_deferred_shot_system,
                helicopter_fire_system,
                bomb_drop_system,
                enemy_offscreen_system,
            )
                .chain()
                .run_if(in_state(GameState::Playing)),
        );
    }
}

// ── Spawner ───────────────────────────────────────────────────────────────────

/// Timed, probability-gated enemy creation under the level's concurrency cap.
#[allow(clippy::too_many_arguments)]
pub fn enemy_spawn_system(
    mut commands: Commands,
    time: Res<Time>,
    config: Res<GameConfig>,
    score: Res<ScoreBoard>,
    mut state: ResMut<SpawnState>,
    q_enemies: Query<&Enemy>,
    q_shields: Query<&Shield>,
    q_boss: Query<(), With<Boss>>,
) {
    state.cooldown_secs -= time.delta_secs();
    if state.cooldown_secs > 0.0 {
        return;
    }

    let profile = DifficultyProfile::for_level(score.level);
    if q_enemies.iter().count() >= profile.max_enemies {
        return;
    }

    let mut rng = rand::thread_rng();
    if !rng.gen_bool(profile.spawn_rate.clamp(0.0, 1.0) as f64) {
        return;
    }

    state.cooldown_secs = config.min_spawn_interval_secs;

    let boss_active = !q_boss.is_empty();
    let wants_helicopter =
        rng.gen_bool(helicopter_chance(&config, score.level).clamp(0.0, 1.0) as f64);

    if !boss_active && wants_helicopter {
        // Shielded spawns share a global budget across both variants.
        let shield_active = q_shields.iter().filter(|s| s.active).count();
        if shield_active >= config.shielded_helicopter_cap {
            return;
        }

        let heavy = rng.gen_bool(config.helicopter2_chance.clamp(0.0, 1.0) as f64);
        spawn_helicopter(&mut commands, &mut rng, &config, &profile, score.level, heavy);
        return;
    }

    spawn_plane(&mut commands, &mut rng, &config, &profile, score.level);
}

fn roll_ability(rng: &mut impl Rng, level: u32) -> Option<SpecialAbility> {
    if rng.gen_bool(special_ability_chance(level).clamp(0.0, 1.0) as f64) {
        Some(SpecialAbility::ALL[rng.gen_range(0..SpecialAbility::ALL.len())])
    } else {
        None
    }
}

fn spawn_plane(
    commands: &mut Commands,
    rng: &mut impl Rng,
    config: &GameConfig,
    profile: &DifficultyProfile,
    level: u32,
) {
    let elite = rng.gen_bool(elite_chance(config, level).clamp(0.0, 1.0) as f64);
    let stats = spawn_stats(config, profile, EnemyKind::Plane, level, elite);

    let pattern = if rng.gen_bool(profile.pattern_chance.clamp(0.0, 1.0) as f64) {
        FlightPattern::NON_NORMAL[rng.gen_range(0..FlightPattern::NON_NORMAL.len())]
    } else {
        FlightPattern::Normal
    };

    let half_w = config.arena_width / 2.0 - PLANE_SIZE;
    let x = rng.gen_range(-half_w..half_w);
    let y = config.arena_top() + PLANE_SIZE;
    let lateral_dir = if rng.gen_bool(0.5) { 1.0 } else { -1.0 };

    let tint = if elite {
        Color::srgb(0.95, 0.55, 0.15)
    } else {
        Color::srgb(0.75, 0.25, 0.25)
    };

    commands.spawn((
        Enemy {
            kind: EnemyKind::Plane,
            speed: stats.speed,
            score_value: stats.score_value,
            elite,
        },
        EnemyHealth { hp: stats.hp },
        PlaneMovement::new(pattern, lateral_dir),
        EnemyGun {
            fire_interval: stats.fire_interval,
            cooldown: stats.fire_interval,
            bullet_speed: stats.bullet_speed,
            entry_delay: rng.gen_range(1.0..3.0),
            on_screen_secs: 0.0,
            ability: roll_ability(rng, level),
        },
        BombDropper {
            interval: config.bomb_drop_interval_secs,
            cooldown: config.bomb_drop_interval_secs,
        },
        Hitbox::square(PLANE_SIZE),
        Transform::from_translation(Vec3::new(x, y, 0.15)),
        Visibility::default(),
        VisualShape::new(ShapeKind::Polygon(aircraft_polygon(PLANE_SIZE, false)), tint),
    ));
}

fn spawn_helicopter(
    commands: &mut Commands,
    rng: &mut impl Rng,
    config: &GameConfig,
    profile: &DifficultyProfile,
    level: u32,
    heavy: bool,
) {
    let kind = if heavy {
        EnemyKind::Helicopter2
    } else {
        EnemyKind::Helicopter
    };
    let elite = rng.gen_bool(elite_chance(config, level).clamp(0.0, 1.0) as f64);
    let stats = spawn_stats(config, profile, kind, level, elite);

    let half_w = config.arena_width / 2.0 - HELICOPTER_SIZE;
    let x = rng.gen_range(-half_w..half_w);
    let y = config.arena_top() + HELICOPTER_SIZE;
    let altitude_y = config.arena_top() - rng.gen_range(100.0..300.0);

    let tint = match (heavy, elite) {
        (_, true) => Color::srgb(0.95, 0.65, 0.1),
        (true, false) => Color::srgb(1.0, 0.65, 0.0),
        (false, false) => Color::srgb(0.0, 0.55, 0.55),
    };

    let heli = commands
        .spawn((
            Enemy {
                kind,
                speed: stats.speed,
                score_value: stats.score_value,
                elite,
            },
            EnemyHealth { hp: stats.hp },
            Shield::new(stats.shield_hp, stats.shield_radius),
            Hover {
                altitude_y,
                timer: rng.gen_range(0.0..10.0),
                drift_dir: 1.0,
            },
            EnemyGun {
                fire_interval: rng
                    .gen_range(HELICOPTER_FIRE_COOLDOWN_MIN..HELICOPTER_FIRE_COOLDOWN_MAX),
                cooldown: rng
                    .gen_range(HELICOPTER_FIRE_COOLDOWN_MIN..HELICOPTER_FIRE_COOLDOWN_MAX),
                bullet_speed: config.helicopter_bullet_speed,
                entry_delay: 0.0,
                on_screen_secs: 0.0,
                ability: roll_ability(rng, level),
            },
            Hitbox::square(HELICOPTER_SIZE),
            Transform::from_translation(Vec3::new(x, y, 0.15)),
            Visibility::default(),
            VisualShape::new(
                ShapeKind::Regular {
                    sides: 6,
                    radius: HELICOPTER_SIZE / 2.0,
                },
                tint,
            ),
        ))
        .id();

    if rng.gen_bool(profile.bomb_drop_chance.clamp(0.0, 1.0) as f64) {
        commands.entity(heli).insert(BombDropper {
            interval: rng.gen_range(2.0..5.0),
            cooldown: rng.gen_range(2.0..5.0),
        });
    }

    // Rotating shield ring child.
    commands.entity(heli).with_children(|parent| {
        parent.spawn((
            ShieldRing,
            Transform::from_translation(Vec3::new(0.0, 0.0, 0.02)),
            Visibility::default(),
            VisualShape::new(
                ShapeKind::Ring {
                    radius: stats.shield_radius,
                    thickness: 3.0,
                },
                Color::srgba(0.4, 0.8, 1.0, 0.7),
            ),
        ));
    });
}

// ── Movement ──────────────────────────────────────────────────────────────────

/// Advance planes along their pattern-tagged paths.
pub fn plane_move_system(
    time: Res<Time>,
    config: Res<GameConfig>,
    mut query: Query<(&mut Enemy, &mut PlaneMovement, &mut Transform)>,
) {
    let dt = time.delta_secs();
    let half_w = config.arena_width / 2.0;
    let mut rng = rand::thread_rng();

    for (mut enemy, mut movement, mut transform) in query.iter_mut() {
        if enemy.kind != EnemyKind::Plane {
            continue;
        }

        let base = enemy.speed;
        movement.travelled += base * dt;
        let phase = movement.travelled;

        match movement.pattern {
            FlightPattern::Normal => {
                transform.translation.x += (phase * 0.02).sin() * 90.0 * dt;
                transform.translation.y -= base * (1.0 + (phase * 0.01).sin() * 0.2) * dt;
            }
            FlightPattern::Zigzag => {
                transform.translation.x += (phase * 0.05).sin() * base * 2.5 * dt;
                transform.translation.y -= base * (1.0 + (phase * 0.02).sin() * 0.3) * dt;
            }
            FlightPattern::Circle => {
                if movement.circle_center == Vec2::ZERO {
                    movement.circle_center = transform.translation.truncate();
                }
                movement.circle_angle += 3.6 * dt;
                movement.circle_center.y -= base * dt;
                let wobble = (movement.circle_angle * 2.0).sin() * 10.0;
                let radius = movement.circle_radius + wobble;
                transform.translation.x =
                    movement.circle_center.x + movement.circle_angle.cos() * radius;
                transform.translation.y =
                    movement.circle_center.y + movement.circle_angle.sin() * radius;
            }
            FlightPattern::Diagonal => {
                if !movement.diving {
                    transform.translation.x += movement.lateral_dir * base * 1.2 * dt;
                    transform.translation.y -= base * 0.6 * dt;
                    if transform.translation.x.abs() >= half_w - PLANE_SIZE / 2.0 {
                        movement.diving = true;
                        movement.dive_start_y = transform.translation.y;
                    }
                } else {
                    transform.translation.y -= base * 2.5 * dt;
                    if transform.translation.y <= movement.dive_start_y - config.dive_distance {
                        movement.diving = false;
                        movement.lateral_dir *= -1.0;
                    }
                }
            }
        }

        // Rare abrupt swerve: speed kick, and normal-pattern planes may
        // switch patterns entirely.
        if rng.gen_bool(config.plane_swerve_chance as f64) {
            enemy.speed *= if rng.gen_bool(0.5) { 1.5 } else { 0.7 };
            if movement.pattern == FlightPattern::Normal {
                movement.pattern = FlightPattern::ALL[rng.gen_range(0..FlightPattern::ALL.len())];
            }
        }
    }
}

/// Helicopters climb to altitude, then bob and drift there.
pub fn helicopter_move_system(
    time: Res<Time>,
    config: Res<GameConfig>,
    mut query: Query<(&Enemy, &mut Hover, &mut Transform)>,
) {
    let dt = time.delta_secs();
    let half_w = config.arena_width / 2.0 - HELICOPTER_SIZE / 2.0;
    let mut rng = rand::thread_rng();

    for (enemy, mut hover, mut transform) in query.iter_mut() {
        if !enemy.kind.is_helicopter() {
            continue;
        }

        hover.timer += dt;
        let t = hover.timer;

        transform.translation.x += t.sin() * 180.0 * hover.drift_dir * dt;
        transform.translation.x = transform.translation.x.clamp(-half_w, half_w);

        if transform.translation.y > hover.altitude_y {
            transform.translation.y -= enemy.speed * 1.2 * dt;
        } else {
            let bob = (t * 2.0).sin() * 30.0;
            let sway = t.cos() * 2.0;
            transform.translation.y = hover.altitude_y + bob + sway;
        }

        if rng.gen_bool(config.helicopter_swerve_chance as f64) {
            hover.drift_dir *= -1.0;
            hover.altitude_y = config.arena_top() - rng.gen_range(100.0..300.0);
        }
    }
}

/// Spin every active shield.
pub fn shield_spin_system(time: Res<Time>, mut query: Query<&mut Shield>) {
    let dt = time.delta_secs();
    for mut shield in query.iter_mut() {
        if shield.active {
            shield.rotation += SHIELD_ROTATION_SPEED * dt;
        }
    }
}

/// Mirror shield rotation/visibility onto the ring child.
pub fn shield_ring_sync_system(
    q_shields: Query<(&Shield, &Children)>,
    mut q_rings: Query<(&mut Transform, &mut Visibility), With<ShieldRing>>,
) {
    for (shield, children) in q_shields.iter() {
        for child in children.iter() {
            if let Ok((mut transform, mut visibility)) = q_rings.get_mut(child) {
                transform.rotation = Quat::from_rotation_z(shield.rotation);
                *visibility = if shield.active {
                    Visibility::Visible
                } else {
                    Visibility::Hidden
                };
            }
        }
    }
}

// ── Fire ──────────────────────────────────────────────────────────────────────

/// Spawn one plane bullet travelling along `velocity`.
pub fn spawn_enemy_bullet(commands: &mut Commands, pos: Vec2, velocity: Vec2) {
    let angle = velocity.y.atan2(velocity.x) + std::f32::consts::FRAC_PI_2;
    commands.spawn((
        EnemyBullet,
        Hitbox::new(ENEMY_BULLET_WIDTH, ENEMY_BULLET_HEIGHT),
        Motion::new(velocity),
        DespawnOffscreen::default(),
        Transform::from_translation(pos.extend(0.25)).with_rotation(Quat::from_rotation_z(angle)),
        Visibility::default(),
        VisualShape::new(
            ShapeKind::Rect {
                width: ENEMY_BULLET_WIDTH,
                height: ENEMY_BULLET_HEIGHT,
            },
            Color::srgb(1.0, 1.0, 0.2),
        ),
    ));
}

/// Twin wing-mounted shots straight down.
fn fire_twin_volley(commands: &mut Commands, transform: &Transform, gun: &EnemyGun) {
    let pos = transform.translation.truncate();
    let muzzle_y = pos.y - PLANE_SIZE / 2.0;
    for dx in [-PLANE_SIZE * 0.32, PLANE_SIZE * 0.32] {
        spawn_enemy_bullet(
            commands,
            Vec2::new(pos.x + dx, muzzle_y),
            Vec2::new(0.0, -gun.bullet_speed),
        );
    }
}

/// Plane fire: entry-delay gated, cooldown-driven, ability-dispatched.
#[allow(clippy::too_many_arguments)]
pub fn plane_fire_system(
    mut commands: Commands,
    time: Res<Time>,
    config: Res<GameConfig>,
    mut schedule: ResMut<ShotSchedule>,
    q_player: Query<&Transform, With<Player>>,
    mut q_planes: Query<(Entity, &Enemy, &Transform, &mut EnemyGun)>,
) {
    let dt = time.delta_secs();
    let arena_top = config.arena_top();
    let mut rng = rand::thread_rng();

    for (entity, enemy, transform, mut gun) in q_planes.iter_mut() {
        if enemy.kind != EnemyKind::Plane {
            continue;
        }

        // Entry clock only runs once the plane is actually on screen.
        if transform.translation.y < arena_top {
            gun.on_screen_secs += dt;
        }
        if gun.on_screen_secs < gun.entry_delay {
            continue;
        }

        gun.cooldown -= dt;
        if gun.cooldown > 0.0 {
            continue;
        }
        gun.cooldown = gun.fire_interval;

        let pos = transform.translation.truncate();
        let muzzle = Vec2::new(pos.x, pos.y - PLANE_SIZE / 2.0);

        match gun.ability {
            Some(SpecialAbility::RapidFire) => {
                fire_twin_volley(&mut commands, transform, &gun);
                schedule.push_in(0.2, entity, DeferredAction::PlaneShot);
                schedule.push_in(0.4, entity, DeferredAction::PlaneShot);
            }
            Some(SpecialAbility::TripleShot) => {
                for offset_deg in [-30.0_f32, 0.0, 30.0] {
                    let angle = -std::f32::consts::FRAC_PI_2 + offset_deg.to_radians();
                    spawn_enemy_bullet(
                        &mut commands,
                        muzzle,
                        Vec2::new(angle.cos(), angle.sin()) * gun.bullet_speed,
                    );
                }
            }
            Some(SpecialAbility::HomingShot) => {
                let target = q_player
                    .single()
                    .map(|t| t.translation.truncate())
                    .unwrap_or(Vec2::new(pos.x, config.arena_bottom()));
                let angle = (target.y - muzzle.y).atan2(target.x - muzzle.x);
                spawn_enemy_bullet(
                    &mut commands,
                    muzzle,
                    Vec2::new(angle.cos(), angle.sin()) * gun.bullet_speed,
                );
            }
            Some(SpecialAbility::Bomb) => {
                spawn_bomb(&mut commands, muzzle, false, &config);
            }
            Some(SpecialAbility::Dynamite) => {
                spawn_dynamite(&mut commands, muzzle, &config);
            }
            None => {
                // Mostly bullets, occasionally a bomb salvo.
                if rng.gen_bool(config.plane_twin_shot_chance as f64) {
                    fire_twin_volley(&mut commands, transform, &gun);
                } else {
                    for _ in 0..PLANE_BOMB_SALVO {
                        spawn_bomb(&mut commands, muzzle, false, &config);
                    }
                }
            }
        }
    }
}

/// Fire the queued rapid-fire follow-up shots whose owners are still alive.
pub fn plane_deferred_shot_system(
    mut commands: Commands,
    mut schedule: ResMut<ShotSchedule>,
    q_planes: Query<(&Transform, &EnemyGun), With<Enemy>>,
) {
    for entry in schedule.take_due(|a| matches!(a, DeferredAction::PlaneShot)) {
        let Ok((transform, gun)) = q_planes.get(entry.owner) else {
            // Owner died mid-salvo; the burst dies with it.
            continue;
        };
        fire_twin_volley(&mut commands, transform, gun);
    }
}

/// Aimed helicopter fire: at most one helicopter shoots per frame.
pub fn helicopter_fire_system(
    mut commands: Commands,
    time: Res<Time>,
    config: Res<GameConfig>,
    q_player: Query<&Transform, With<Player>>,
    mut q_helis: Query<(&Enemy, &Transform, &mut EnemyGun)>,
) {
    let Ok(player_transform) = q_player.single() else {
        return;
    };
    let target = player_transform.translation.truncate();
    let dt = time.delta_secs();
    let mut rng = rand::thread_rng();
    let mut fired_this_frame = false;

    for (enemy, transform, mut gun) in q_helis.iter_mut() {
        if !enemy.kind.is_helicopter() {
            continue;
        }

        gun.cooldown -= dt;
        if gun.cooldown > 0.0 || fired_this_frame {
            continue;
        }

        let pos = transform.translation.truncate();
        let angle = (target.y - pos.y).atan2(target.x - pos.x);

        commands.spawn((
            HelicopterBullet,
            Hitbox::new(HELICOPTER_BULLET_WIDTH, HELICOPTER_BULLET_HEIGHT),
            Motion::from_angle(angle, gun.bullet_speed),
            DespawnOffscreen::default(),
            Transform::from_translation(pos.extend(0.25))
                .with_rotation(Quat::from_rotation_z(angle)),
            Visibility::default(),
            VisualShape::new(
                ShapeKind::Rect {
                    width: HELICOPTER_BULLET_WIDTH,
                    height: HELICOPTER_BULLET_HEIGHT,
                },
                Color::srgb(1.0, 0.55, 0.2),
            ),
        ));

        gun.cooldown = rng.gen_range(HELICOPTER_FIRE_COOLDOWN_MIN..HELICOPTER_FIRE_COOLDOWN_MAX);
        fired_this_frame = true;
    }
}

/// Cooldown-gated bomb drops for any enemy carrying a [`BombDropper`].
pub fn bomb_drop_system(
    mut commands: Commands,
    time: Res<Time>,
    config: Res<GameConfig>,
    mut query: Query<(&Transform, &Hitbox, &mut BombDropper)>,
) {
    let dt = time.delta_secs();
    for (transform, hitbox, mut dropper) in query.iter_mut() {
        dropper.cooldown -= dt;
        if dropper.cooldown > 0.0 {
            continue;
        }
        dropper.cooldown = dropper.interval;

        let pos = transform.translation.truncate() - Vec2::new(0.0, hitbox.half.y);
        spawn_bomb(&mut commands, pos, false, &config);
    }
}

/// Remove enemies that have wandered far off the arena.
pub fn enemy_offscreen_system(
    mut commands: Commands,
    config: Res<GameConfig>,
    query: Query<(Entity, &Transform), With<Enemy>>,
) {
    let half_w = config.arena_width / 2.0;
    let half_h = config.arena_height / 2.0;
    let margin = config.offscreen_margin;

    for (entity, transform) in query.iter() {
        let pos = transform.translation;
        if pos.y < -half_h - margin
            || pos.y > half_h + margin
            || pos.x < -half_w - margin
            || pos.x > half_w + margin
        {
            commands.entity(entity).despawn();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shield_absorbs_exactly_its_hit_points() {
        let mut shield = Shield::new(8, 50.0);
        for hit in 1..8 {
            assert!(!shield.absorb_hit(), "hit {hit} must not break the shield");
            assert!(shield.active);
        }
        assert!(shield.absorb_hit(), "eighth hit breaks the shield");
        assert!(!shield.active);
        assert!(!shield.absorb_hit(), "a broken shield absorbs nothing");
    }

    #[test]
    fn elite_bonus_multiplies_the_right_stats() {
        let config = GameConfig::default();
        let profile = DifficultyProfile::for_level(2);

        let base = spawn_stats(&config, &profile, EnemyKind::Plane, 2, false);
        let elite = spawn_stats(&config, &profile, EnemyKind::Plane, 2, true);

        assert_eq!(elite.score_value, base.score_value * 2);
        assert!((elite.hp - base.hp * 1.9).abs() < 1e-3);
        assert!((elite.speed - base.speed * 1.2).abs() < 1e-3);
        assert!((elite.fire_interval - base.fire_interval * 0.8).abs() < 1e-3);
    }

    #[test]
    fn elite_helicopters_get_the_reinforced_shield() {
        let config = GameConfig::default();
        let profile = DifficultyProfile::for_level(1);

        let base = spawn_stats(&config, &profile, EnemyKind::Helicopter, 1, false);
        let elite = spawn_stats(&config, &profile, EnemyKind::Helicopter, 1, true);

        assert_eq!(base.shield_hp, config.shield_hp_helicopter);
        assert_eq!(elite.shield_hp, config.shield_hp_elite);
        assert!(elite.shield_radius > base.shield_radius);
    }

    #[test]
    fn heavy_variant_carries_the_stronger_shield() {
        let config = GameConfig::default();
        let profile = DifficultyProfile::for_level(1);

        let light = spawn_stats(&config, &profile, EnemyKind::Helicopter, 1, false);
        let heavy = spawn_stats(&config, &profile, EnemyKind::Helicopter2, 1, false);
        assert!(heavy.shield_hp > light.shield_hp);
    }

    #[test]
    fn spawn_chances_scale_with_level_and_stay_bounded() {
        let config = GameConfig::default();
        assert!(helicopter_chance(&config, 5) > helicopter_chance(&config, 1));
        assert!(elite_chance(&config, 5) > elite_chance(&config, 1));
        assert!(special_ability_chance(1) < special_ability_chance(4));
        assert!(special_ability_chance(100) <= 0.5);
    }
}
