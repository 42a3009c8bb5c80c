//! Centralised gameplay constants.
//!
//! All tuneable values live here so they can be found, reasoned-about, and
//! modified in one place without source-diving across multiple modules.
//! Balance-relevant constants are mirrored by fields on
//! [`crate::config::GameConfig`], which can override them at startup from
//! `assets/game.toml`.

// ── Arena ─────────────────────────────────────────────────────────────────────

/// Playfield width in world units (1 unit = 1 pixel at default zoom).
pub const ARENA_WIDTH: f32 = 600.0;

/// Playfield height in world units.  The arena is centred on the origin, so
/// the top edge sits at `ARENA_HEIGHT / 2` and enemies scroll toward −Y.
pub const ARENA_HEIGHT: f32 = 800.0;

/// Depth of the strip below the top edge in which collisions and explosion
/// effects are suppressed.  Prevents unfair hits against enemies that have
/// only just crossed the spawn line.
pub const TOP_EFFECT_ZONE: f32 = 20.0;

/// Entities further than this beyond any arena edge are despawned.
pub const OFFSCREEN_MARGIN: f32 = 100.0;

// ── Player: Movement ──────────────────────────────────────────────────────────

/// Player traversal speed (units/s).  480 u/s crosses the arena in ~1.25 s.
pub const PLAYER_SPEED: f32 = 480.0;

/// Minimum gap kept between the player hull and the arena edges.
pub const PLAYER_EDGE_MARGIN: f32 = 10.0;

/// Player hitbox edge length (square).
pub const PLAYER_SIZE: f32 = 54.0;

/// Starting life budget.  Effective lives are `max_lives - collision_count`.
pub const PLAYER_MAX_LIVES: u32 = 5;

// ── Player: Firing ────────────────────────────────────────────────────────────

/// Shortest Space press that registers as a deliberate tap (s).
pub const TAP_MIN_PRESS_SECS: f32 = 0.05;

/// Longest Space press still treated as a tap; beyond this the press is on
/// its way to becoming a hold (s).
pub const TAP_MAX_PRESS_SECS: f32 = 0.15;

/// Press duration at which tap firing hands over to continuous fire (s).
pub const HOLD_THRESHOLD_SECS: f32 = 0.2;

/// Cooldown between two single (tap) shots (s).
pub const SINGLE_SHOT_COOLDOWN_SECS: f32 = 0.5;

/// Minimum time Space must have been released before the next tap counts (s).
pub const TAP_MIN_RELEASE_SECS: f32 = 0.1;

/// Delay between shots while holding (s).  Divided by the rapid-fire
/// power-up multiplier when that effect is active.
pub const CONTINUOUS_FIRE_DELAY_SECS: f32 = 0.05;

/// Player bullet speed (units/s).
pub const PLAYER_BULLET_SPEED: f32 = 720.0;

/// Base player bullet width; height is twice the width.  Score and level
/// milestones grow it (see `player::combat::bullet_size`).
pub const PLAYER_BULLET_BASE_SIZE: f32 = 4.5;

// ── Player: Special weapon ────────────────────────────────────────────────────

/// Score-charge required to bank one special-weapon unit.
pub const SPECIAL_WEAPON_MAX_CHARGE: u32 = 2000;

/// Maximum banked special-weapon units.
pub const SPECIAL_WEAPON_MAX_COUNT: u32 = 5;

/// Angular step of the 360° ring, in degrees.  5° → 72 bullets per plane.
pub const SPECIAL_WEAPON_ANGLE_STEP_DEG: u32 = 5;

/// Ring bullet speed (units/s).
pub const SPECIAL_BULLET_SPEED: f32 = 720.0;

/// Ring bullet lifetime in simulation seconds.
pub const SPECIAL_BULLET_LIFE_SECS: f32 = 1.7;

// ── Player: Escort plane ──────────────────────────────────────────────────────

/// Score interval at which another escort plane is granted.
pub const ESCORT_SCORE_INTERVAL: u32 = 2000;

/// Escort plane lifetime (s).
pub const ESCORT_LIFETIME_SECS: f32 = 10.0;

/// Horizontal offset of the escort from the player.
pub const ESCORT_OFFSET_X: f32 = -60.0;

// ── Enemies: Spawning ─────────────────────────────────────────────────────────

/// Hard floor between two spawn attempts (s), regardless of spawn-rate rolls.
pub const MIN_SPAWN_INTERVAL_SECS: f32 = 0.5;

/// Base probability that a spawn roll produces a helicopter; grows with level.
pub const HELICOPTER_BASE_CHANCE: f32 = 0.3;

/// Per-level increment to the helicopter chance.
pub const HELICOPTER_CHANCE_PER_LEVEL: f32 = 0.05;

/// Probability that a helicopter spawn is the heavy-shield variant.
pub const HELICOPTER2_CHANCE: f32 = 0.3;

/// Global cap on concurrently shield-active helicopters (both variants).
pub const SHIELDED_HELICOPTER_CAP: usize = 4;

/// Base elite probability; grows by [`ELITE_CHANCE_PER_LEVEL`] per level.
pub const ELITE_BASE_CHANCE: f32 = 0.05;
pub const ELITE_CHANCE_PER_LEVEL: f32 = 0.02;

// ── Enemies: Geometry & behaviour ─────────────────────────────────────────────

/// Plane hitbox edge length.
pub const PLANE_SIZE: f32 = 72.0;

/// Helicopter hitbox edge length (both variants).
pub const HELICOPTER_SIZE: f32 = 48.0;

/// Per-frame probability that a plane abruptly perturbs its speed and,
/// if flying the normal pattern, re-rolls its movement pattern.
pub const PLANE_SWERVE_CHANCE: f32 = 0.003;

/// Per-frame probability that a helicopter re-rolls hover direction/altitude.
pub const HELICOPTER_SWERVE_CHANCE: f32 = 0.005;

/// Plane dive length for the diagonal pattern before it resumes cruising.
pub const DIVE_DISTANCE: f32 = 250.0;

/// Chance that a ready plane fires twin bullets; otherwise it drops bombs.
pub const PLANE_TWIN_SHOT_CHANCE: f32 = 0.7;

/// Bombs released when a plane opts for a bomb drop instead of bullets.
pub const PLANE_BOMB_SALVO: u32 = 3;

/// Helicopter aimed-shot cooldown range (s).
pub const HELICOPTER_FIRE_COOLDOWN_MIN: f32 = 1.25;
pub const HELICOPTER_FIRE_COOLDOWN_MAX: f32 = 1.75;

/// Helicopter bullet speed (units/s) and hitbox.
pub const HELICOPTER_BULLET_SPEED: f32 = 420.0;
pub const HELICOPTER_BULLET_WIDTH: f32 = 36.0;
pub const HELICOPTER_BULLET_HEIGHT: f32 = 8.0;

/// Enemy bullet (plane) hitbox.
pub const ENEMY_BULLET_WIDTH: f32 = 8.0;
pub const ENEMY_BULLET_HEIGHT: f32 = 18.0;

/// Shield strength for the base helicopter / heavy variant / any elite.
pub const SHIELD_HP_HELICOPTER: u32 = 8;
pub const SHIELD_HP_HELICOPTER2: u32 = 10;
pub const SHIELD_HP_ELITE: u32 = 15;

/// Shield visual radii.
pub const SHIELD_RADIUS_HELICOPTER: f32 = 50.0;
pub const SHIELD_RADIUS_HELICOPTER2: f32 = 60.0;
pub const SHIELD_RADIUS_ELITE: f32 = 70.0;

/// Shield ring rotation speed (rad/s).
pub const SHIELD_ROTATION_SPEED: f32 = 1.2;

/// Score awarded for a plane kill (non-elite baseline).
pub const PLANE_KILL_SCORE: u32 = 10;

// ── Hazards ───────────────────────────────────────────────────────────────────

/// Bomb fall speed (units/s) and hitbox edge.
pub const BOMB_FALL_SPEED: f32 = 300.0;
pub const BOMB_SIZE: f32 = 15.0;

/// Dynamite fall speed, hitbox, and fuse length (s).
pub const DYNAMITE_FALL_SPEED: f32 = 240.0;
pub const DYNAMITE_WIDTH: f32 = 20.0;
pub const DYNAMITE_HEIGHT: f32 = 30.0;
pub const DYNAMITE_FUSE_SECS: f32 = 1.7;

/// Cooldown between consecutive bomb drops from one enemy (s).
pub const BOMB_DROP_INTERVAL_SECS: f32 = 3.0;

// ── Boss ──────────────────────────────────────────────────────────────────────

/// Boss hull hit points.  An earlier balance pass of this game shipped 3000;
/// override via `assets/game.toml` to restore that tuning.
pub const BOSS_HEALTH: f32 = 1500.0;

/// Damage one player bullet deals to the boss hull.
pub const BOSS_BULLET_DAMAGE: f32 = 50.0;

/// Boss hitbox edge length.
pub const BOSS_SIZE: f32 = 68.0;

/// Boss base movement speed and bullet speed (phase 0).
pub const BOSS_SPEED: f32 = 120.0;
pub const BOSS_BULLET_SPEED: f32 = 300.0;

/// Minimum score before the first boss can appear, and the per-level ramp.
pub const BOSS_SPAWN_SCORE_FLOOR: u32 = 50;
pub const BOSS_SPAWN_SCORE_PER_LEVEL: u32 = 100;

/// Cooldown between boss visits (s).
pub const BOSS_SPAWN_COOLDOWN_SECS: f32 = 10.0;

/// Delay from boss spawn to its first spread attack, and the repeat period.
pub const BOSS_FIRST_SPREAD_DELAY_SECS: f32 = 1.0;
pub const BOSS_SPREAD_PERIOD_SECS: f32 = 3.5;

/// Bonus score for destroying the boss.
pub const BOSS_BONUS_SCORE: u32 = 500;

/// Sustained time under fire after which the boss gives up and strafes off
/// screen without awarding score.
pub const BOSS_ENDURANCE_SECS: f32 = 15.0;

/// Hover altitude below the arena top at which the boss holds position.
pub const BOSS_HOVER_DEPTH: f32 = 150.0;

// ── Formations ────────────────────────────────────────────────────────────────

/// Lifetime of one snake-formation group (s).
pub const FORMATION_DURATION_SECS: f32 = 10.0;

/// Minimum gap between two formation activations (s).
pub const FORMATION_COOLDOWN_SECS: f32 = 4.0;

/// Spacing between follower spawns inside a group (s).
pub const FORMATION_MEMBER_INTERVAL_SECS: f32 = 0.3;

/// Members per group.
pub const FORMATION_GROUP_SIZE: usize = 8;

/// Follower hitbox edge and score value.
pub const FORMATION_MEMBER_SIZE: f32 = 30.0;
pub const FORMATION_MEMBER_SCORE: u32 = 10;

// ── Power-ups ─────────────────────────────────────────────────────────────────

/// Base per-second drop probability, scaled by level and capped.
pub const POWERUP_DROP_RATE_PER_LEVEL: f32 = 0.02;
pub const POWERUP_DROP_RATE_CAP: f32 = 0.08;

/// Timed effect duration (s) and pickup geometry.
pub const POWERUP_DURATION_SECS: f32 = 10.0;
pub const POWERUP_SIZE: f32 = 30.0;
pub const POWERUP_FALL_SPEED: f32 = 180.0;

/// Hold-fire delay divisor while rapid fire is active.
pub const RAPID_FIRE_MULTIPLIER: f32 = 4.0;

// ── Score & levels ────────────────────────────────────────────────────────────

/// Level-up threshold; level score resets to zero on each level-up.
pub const LEVEL_UP_SCORE: u32 = 3000;

/// Interval of the best-effort high-score autosave (s).
pub const SCORE_AUTOSAVE_SECS: f32 = 5.0;

/// Window in which a second press of `R` confirms a high-score reset (s).
pub const SCORE_RESET_CONFIRM_SECS: f32 = 3.0;

/// Life-reward cadence: a life is granted every Nth shielded-helicopter
/// shield break.  The alternate balance pass used 3.
pub const SHIELD_KILL_LIFE_REWARD_EVERY: u32 = 1;

// ── Effects ───────────────────────────────────────────────────────────────────

/// Explosion growth radii (units) and growth speeds (units/s).
pub const EXPLOSION_MAX_RADIUS: f32 = 30.0;
pub const EXPLOSION_FINAL_MAX_RADIUS: f32 = 100.0;
pub const EXPLOSION_SHIELD_BREAK_RADIUS: f32 = 80.0;
pub const EXPLOSION_GROWTH_SPEED: f32 = 120.0;
pub const EXPLOSION_FINAL_GROWTH_SPEED: f32 = 60.0;

/// Particles in a final explosion's radial burst.
pub const EXPLOSION_PARTICLE_COUNT: usize = 20;

/// Screen-flash duration after the player is hit (s).
pub const HIT_FLASH_SECS: f32 = 0.5;

/// Low-life warning blink duration (s).
pub const LIFE_WARNING_BLINK_SECS: f32 = 2.0;

// ── Audio ─────────────────────────────────────────────────────────────────────

/// Minimum gap between two collision/warning cues (s).
pub const COLLISION_SOUND_COOLDOWN_SECS: f32 = 0.1;

// ── HUD ───────────────────────────────────────────────────────────────────────

/// HUD text size.
pub const HUD_FONT_SIZE: f32 = 16.0;

/// Lifetime of transient centre-screen messages (s).
pub const HUD_MESSAGE_SECS: f32 = 3.0;
