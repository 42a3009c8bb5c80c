//! Runtime gameplay configuration loaded from `assets/game.toml`.
//!
//! [`GameConfig`] is a Bevy [`Resource`] that mirrors the balance constants in
//! [`crate::constants`].  At startup, [`load_game_config`] reads
//! `assets/game.toml` and overwrites the defaults with any values present in
//! the file.  Missing keys fall back to the compile-time defaults, so a
//! minimal TOML can override just the constants you care about.
//!
//! The two historical balance passes of this game disagreed on a handful of
//! values (boss hit points, boss spawn thresholds, the shield-kill life
//! reward cadence).  Those all live here as named fields so either tuning can
//! be restored from the config file without touching code.

use crate::constants::*;
use bevy::prelude::*;
use serde::Deserialize;

/// Runtime-tunable gameplay configuration.
///
/// All fields default to the corresponding compile-time constant from
/// `src/constants.rs`.  Override any subset by setting the value in
/// `assets/game.toml`.
#[derive(Resource, Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    // ── Arena ────────────────────────────────────────────────────────────────
    pub arena_width: f32,
    pub arena_height: f32,
    pub offscreen_margin: f32,

    // ── Player ───────────────────────────────────────────────────────────────
    pub player_speed: f32,
    pub player_size: f32,
    pub player_max_lives: u32,
    pub player_bullet_speed: f32,
    pub player_bullet_base_size: f32,

    // ── Special weapon / escort ──────────────────────────────────────────────
    pub special_weapon_max_charge: u32,
    pub special_weapon_max_count: u32,
    pub special_bullet_speed: f32,
    pub special_bullet_life_secs: f32,
    pub escort_score_interval: u32,
    pub escort_lifetime_secs: f32,

    // ── Enemy spawning ───────────────────────────────────────────────────────
    pub min_spawn_interval_secs: f32,
    pub helicopter_base_chance: f32,
    pub helicopter_chance_per_level: f32,
    pub helicopter2_chance: f32,
    pub shielded_helicopter_cap: usize,
    pub elite_base_chance: f32,
    pub elite_chance_per_level: f32,

    // ── Enemy behaviour ──────────────────────────────────────────────────────
    pub plane_swerve_chance: f32,
    pub helicopter_swerve_chance: f32,
    pub dive_distance: f32,
    pub plane_twin_shot_chance: f32,
    pub helicopter_bullet_speed: f32,
    pub shield_hp_helicopter: u32,
    pub shield_hp_helicopter2: u32,
    pub shield_hp_elite: u32,
    pub plane_kill_score: u32,

    // ── Hazards ──────────────────────────────────────────────────────────────
    pub bomb_fall_speed: f32,
    pub dynamite_fall_speed: f32,
    pub dynamite_fuse_secs: f32,
    pub bomb_drop_interval_secs: f32,

    // ── Boss ─────────────────────────────────────────────────────────────────
    pub boss_health: f32,
    pub boss_bullet_damage: f32,
    pub boss_speed: f32,
    pub boss_bullet_speed: f32,
    pub boss_spawn_score_floor: u32,
    pub boss_spawn_score_per_level: u32,
    pub boss_spawn_cooldown_secs: f32,
    pub boss_first_spread_delay_secs: f32,
    pub boss_spread_period_secs: f32,
    pub boss_bonus_score: u32,
    pub boss_endurance_secs: f32,

    // ── Formations / power-ups ───────────────────────────────────────────────
    pub formation_duration_secs: f32,
    pub formation_cooldown_secs: f32,
    pub powerup_drop_rate_per_level: f32,
    pub powerup_drop_rate_cap: f32,
    pub powerup_duration_secs: f32,

    // ── Score & rewards ──────────────────────────────────────────────────────
    pub level_up_score: u32,
    pub score_autosave_secs: f32,
    pub shield_kill_life_reward_every: u32,

    // ── Audio ────────────────────────────────────────────────────────────────
    pub collision_sound_cooldown_secs: f32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            // Arena
            arena_width: ARENA_WIDTH,
            arena_height: ARENA_HEIGHT,
            offscreen_margin: OFFSCREEN_MARGIN,
            // Player
            player_speed: PLAYER_SPEED,
            player_size: PLAYER_SIZE,
            player_max_lives: PLAYER_MAX_LIVES,
            player_bullet_speed: PLAYER_BULLET_SPEED,
            player_bullet_base_size: PLAYER_BULLET_BASE_SIZE,
            // Special weapon / escort
            special_weapon_max_charge: SPECIAL_WEAPON_MAX_CHARGE,
            special_weapon_max_count: SPECIAL_WEAPON_MAX_COUNT,
            special_bullet_speed: SPECIAL_BULLET_SPEED,
            special_bullet_life_secs: SPECIAL_BULLET_LIFE_SECS,
            escort_score_interval: ESCORT_SCORE_INTERVAL,
            escort_lifetime_secs: ESCORT_LIFETIME_SECS,
            // Enemy spawning
            min_spawn_interval_secs: MIN_SPAWN_INTERVAL_SECS,
            helicopter_base_chance: HELICOPTER_BASE_CHANCE,
            helicopter_chance_per_level: HELICOPTER_CHANCE_PER_LEVEL,
            helicopter2_chance: HELICOPTER2_CHANCE,
            shielded_helicopter_cap: SHIELDED_HELICOPTER_CAP,
            elite_base_chance: ELITE_BASE_CHANCE,
            elite_chance_per_level: ELITE_CHANCE_PER_LEVEL,
            // Enemy behaviour
            plane_swerve_chance: PLANE_SWERVE_CHANCE,
            helicopter_swerve_chance: HELICOPTER_SWERVE_CHANCE,
            dive_distance: DIVE_DISTANCE,
            plane_twin_shot_chance: PLANE_TWIN_SHOT_CHANCE,
            helicopter_bullet_speed: HELICOPTER_BULLET_SPEED,
            shield_hp_helicopter: SHIELD_HP_HELICOPTER,
            shield_hp_helicopter2: SHIELD_HP_HELICOPTER2,
            shield_hp_elite: SHIELD_HP_ELITE,
            plane_kill_score: PLANE_KILL_SCORE,
            // Hazards
            bomb_fall_speed: BOMB_FALL_SPEED,
            dynamite_fall_speed: DYNAMITE_FALL_SPEED,
            dynamite_fuse_secs: DYNAMITE_FUSE_SECS,
            bomb_drop_interval_secs: BOMB_DROP_INTERVAL_SECS,
            // Boss
            boss_health: BOSS_HEALTH,
            boss_bullet_damage: BOSS_BULLET_DAMAGE,
            boss_speed: BOSS_SPEED,
            boss_bullet_speed: BOSS_BULLET_SPEED,
            boss_spawn_score_floor: BOSS_SPAWN_SCORE_FLOOR,
            boss_spawn_score_per_level: BOSS_SPAWN_SCORE_PER_LEVEL,
            boss_spawn_cooldown_secs: BOSS_SPAWN_COOLDOWN_SECS,
            boss_first_spread_delay_secs: BOSS_FIRST_SPREAD_DELAY_SECS,
            boss_spread_period_secs: BOSS_SPREAD_PERIOD_SECS,
            boss_bonus_score: BOSS_BONUS_SCORE,
            boss_endurance_secs: BOSS_ENDURANCE_SECS,
            // Formations / power-ups
            formation_duration_secs: FORMATION_DURATION_SECS,
            formation_cooldown_secs: FORMATION_COOLDOWN_SECS,
            powerup_drop_rate_per_level: POWERUP_DROP_RATE_PER_LEVEL,
            powerup_drop_rate_cap: POWERUP_DROP_RATE_CAP,
            powerup_duration_secs: POWERUP_DURATION_SECS,
            // Score & rewards
            level_up_score: LEVEL_UP_SCORE,
            score_autosave_secs: SCORE_AUTOSAVE_SECS,
            shield_kill_life_reward_every: SHIELD_KILL_LIFE_REWARD_EVERY,
            // Audio
            collision_sound_cooldown_secs: COLLISION_SOUND_COOLDOWN_SECS,
        }
    }
}

impl GameConfig {
    /// World-space Y coordinate of the arena's top edge.
    #[inline]
    pub fn arena_top(&self) -> f32 {
        self.arena_height / 2.0
    }

    /// World-space Y coordinate of the arena's bottom edge.
    #[inline]
    pub fn arena_bottom(&self) -> f32 {
        -self.arena_height / 2.0
    }

    /// Score threshold the player must reach before a boss may spawn.
    #[inline]
    pub fn boss_spawn_score(&self, level: u32) -> u32 {
        self.boss_spawn_score_floor
            .max(level.saturating_mul(self.boss_spawn_score_per_level))
    }
}

/// Startup system: attempt to load `assets/game.toml` and overwrite the
/// `GameConfig` resource with any values present in the file.
///
/// Missing keys retain their compiled defaults.  TOML parse errors are logged
/// but do not abort the game.  A missing file is silently ignored (defaults
/// are already in place from `insert_resource`).
pub fn load_game_config(mut config: ResMut<GameConfig>) {
    let path = "assets/game.toml";
    match std::fs::read_to_string(path) {
        Ok(contents) => match toml::from_str::<GameConfig>(&contents) {
            Ok(loaded) => {
                *config = loaded;
                info!("Loaded game config from {path}");
            }
            Err(e) => {
                warn!("Failed to parse {path}: {e}; using defaults");
            }
        },
        Err(_) => {
            // File not present; defaults are already in place.
            info!("No {path} found; using compiled defaults");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn boss_spawn_score_respects_floor_and_ramp() {
        let cfg = GameConfig::default();
        assert_eq!(cfg.boss_spawn_score(0), BOSS_SPAWN_SCORE_FLOOR);
        assert_eq!(cfg.boss_spawn_score(1), 100);
        assert_eq!(cfg.boss_spawn_score(7), 700);
    }

    #[test]
    fn partial_toml_overrides_only_named_fields() {
        let cfg: GameConfig = toml::from_str("boss_health = 3000.0").unwrap();
        assert_eq!(cfg.boss_health, 3000.0);
        assert_eq!(cfg.player_max_lives, PLAYER_MAX_LIVES);
        assert_eq!(cfg.boss_spawn_cooldown_secs, BOSS_SPAWN_COOLDOWN_SECS);
    }
}
