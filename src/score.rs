//! Score keeping, level progression, and best-effort high-score persistence.
//!
//! The high score survives restarts through three redundant backends: a
//! primary TOML file, a backup TOML file, and a session-scoped file in the
//! OS temp directory.  Loading takes the maximum across every backend that
//! decodes; saving writes to all of them.  Any backend failure is logged and
//! skipped — persistence must never interrupt a round.
//!
//! Saves fire on: a beaten high score, level-up, game over, and a rolling
//! autosave timer.

use std::fs;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::audio::{SoundCue, SoundRequest};
use crate::config::GameConfig;
use crate::constants::SCORE_RESET_CONFIRM_SECS;
use crate::difficulty::difficulty_name;
use crate::error::{ScoreStoreError, ScoreStoreResult};
use crate::hud::HudMessages;
use crate::menu::GameState;
use crate::player::state::SpecialWeapon;

const RECORD_VERSION: u32 = 1;

// ── Score board ───────────────────────────────────────────────────────────────

/// Round score, level progression, and the persistent high score.
#[derive(Resource, Debug, Clone)]
pub struct ScoreBoard {
    pub score: u32,
    pub high_score: u32,
    /// 1-based difficulty level.
    pub level: u32,
    /// Points accumulated toward the next level-up.
    pub level_score: u32,
    /// Set when the high score has changed since the last successful save.
    pub dirty: bool,
}

impl Default for ScoreBoard {
    fn default() -> Self {
        Self {
            score: 0,
            high_score: 0,
            level: 1,
            level_score: 0,
            dirty: false,
        }
    }
}

impl ScoreBoard {
    /// Zero the round state while keeping the persistent high score.
    pub fn reset_round(&mut self) {
        self.score = 0;
        self.level = 1;
        self.level_score = 0;
    }
}

/// Award points: bumps score and level progress, feeds the special-weapon
/// charge, and tracks a beaten high score.
///
/// This is the single scoring entry point used by every combat system.
pub fn award_points(
    score: &mut ScoreBoard,
    special: &mut SpecialWeapon,
    config: &GameConfig,
    points: u32,
) {
    score.score += points;
    score.level_score += points;

    special.charge_from_points(
        points,
        config.special_weapon_max_charge,
        config.special_weapon_max_count,
    );

    if score.score > score.high_score {
        score.high_score = score.score;
        score.dirty = true;
    }
}

// ── Persistent record ─────────────────────────────────────────────────────────

#[derive(Serialize, Deserialize, Debug, Clone, Copy)]
struct HighScoreRecord {
    version: u32,
    high_score: u32,
    saved_at_unix: u64,
}

fn current_unix_timestamp() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

/// Paths of the three high-score backends.
#[derive(Resource, Debug, Clone)]
pub struct HighScoreStore {
    backends: Vec<PathBuf>,
}

impl Default for HighScoreStore {
    fn default() -> Self {
        let save_dir = PathBuf::from("saves");
        Self {
            backends: vec![
                save_dir.join("highscore.toml"),
                save_dir.join("highscore_backup.toml"),
                std::env::temp_dir().join("thunderbolt_session_score.toml"),
            ],
        }
    }
}

impl HighScoreStore {
    /// Store rooted at explicit paths (used by tests).
    pub fn with_backends(backends: Vec<PathBuf>) -> Self {
        Self { backends }
    }

    fn read_backend(path: &PathBuf) -> ScoreStoreResult<u32> {
        let contents = fs::read_to_string(path).map_err(|source| ScoreStoreError::Read {
            path: path.clone(),
            source,
        })?;
        let record: HighScoreRecord =
            toml::from_str(&contents).map_err(|e| ScoreStoreError::Corrupt {
                path: path.clone(),
                detail: e.to_string(),
            })?;
        Ok(record.high_score)
    }

    fn write_backend(path: &PathBuf, record: &HighScoreRecord) -> ScoreStoreResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|source| ScoreStoreError::Write {
                path: path.clone(),
                source,
            })?;
        }
        let serialized = toml::to_string_pretty(record).map_err(|e| ScoreStoreError::Corrupt {
            path: path.clone(),
            detail: e.to_string(),
        })?;
        fs::write(path, serialized).map_err(|source| ScoreStoreError::Write {
            path: path.clone(),
            source,
        })
    }

    /// Best score across every readable backend; 0 when all fail.
    pub fn load_best(&self) -> u32 {
        let mut best = 0;
        for path in &self.backends {
            match Self::read_backend(path) {
                Ok(score) => best = best.max(score),
                Err(ScoreStoreError::Read { .. }) => {
                    // Absent backend; normal on first launch.
                }
                Err(err) => warn!("Skipping high-score backend: {err}"),
            }
        }
        best
    }

    /// Write `score` to every backend; failures are logged, never raised.
    pub fn save_all(&self, score: u32) {
        let record = HighScoreRecord {
            version: RECORD_VERSION,
            high_score: score,
            saved_at_unix: current_unix_timestamp(),
        };
        for path in &self.backends {
            if let Err(err) = Self::write_backend(path, &record) {
                warn!("High-score save failed: {err}");
            }
        }
    }

    /// Delete every backend file (hard reset).
    pub fn wipe_all(&self) {
        for path in &self.backends {
            if let Err(err) = fs::remove_file(path) {
                if err.kind() != std::io::ErrorKind::NotFound {
                    warn!("Failed to remove {}: {err}", path.display());
                }
            }
        }
    }
}

// ── Plugin & systems ──────────────────────────────────────────────────────────

/// Countdown until the next autosave and the pending `R` reset confirmation.
#[derive(Resource, Default)]
pub struct ScoreTimers {
    autosave_secs: f32,
    reset_confirm_secs: f32,
}

pub struct ScorePlugin;

impl Plugin for ScorePlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<ScoreBoard>()
            .init_resource::<HighScoreStore>()
            .init_resource::<ScoreTimers>()
            .add_systems(Startup, load_high_score)
            .add_systems(
                Update,
                (level_up_system, autosave_system).run_if(in_state(GameState::Playing)),
            )
            .add_systems(Update, score_reset_keys_system)
            .add_systems(OnEnter(GameState::GameOver), save_on_game_over);
    }
}

/// Populate the score board's high score from the best readable backend.
fn load_high_score(store: Res<HighScoreStore>, mut score: ResMut<ScoreBoard>) {
    score.high_score = store.load_best();
    info!("High score loaded: {}", score.high_score);
}

/// Level up every `level_up_score` points of level progress.
pub fn level_up_system(
    config: Res<GameConfig>,
    mut score: ResMut<ScoreBoard>,
    store: Res<HighScoreStore>,
    mut messages: ResMut<HudMessages>,
    mut sounds: MessageWriter<SoundRequest>,
) {
    if score.level_score < config.level_up_score {
        return;
    }

    score.level_score = 0;
    score.level += 1;
    messages.post(format!(
        "Level {}!  {}",
        score.level,
        difficulty_name(score.level)
    ));
    sounds.write(SoundRequest::new(SoundCue::LevelUp));

    store.save_all(score.high_score);
    score.dirty = false;
}

/// Rolling best-effort save while a round is in progress.
fn autosave_system(
    time: Res<Time>,
    config: Res<GameConfig>,
    mut timers: ResMut<ScoreTimers>,
    mut score: ResMut<ScoreBoard>,
    store: Res<HighScoreStore>,
) {
    timers.autosave_secs -= time.delta_secs();
    if timers.autosave_secs > 0.0 {
        return;
    }
    timers.autosave_secs = config.score_autosave_secs;

    if score.dirty {
        store.save_all(score.high_score);
        score.dirty = false;
    }
}

/// Always save when the round ends.
fn save_on_game_over(mut score: ResMut<ScoreBoard>, store: Res<HighScoreStore>) {
    store.save_all(score.high_score);
    score.dirty = false;
    info!("Final score {} saved (high: {})", score.score, score.high_score);
}

/// `R` twice within the confirm window resets the high score;
/// `Ctrl+Shift+R` wipes every persisted backend immediately.
pub fn score_reset_keys_system(
    time: Res<Time>,
    keys: Res<ButtonInput<KeyCode>>,
    mut timers: ResMut<ScoreTimers>,
    mut score: ResMut<ScoreBoard>,
    store: Res<HighScoreStore>,
    mut messages: ResMut<HudMessages>,
) {
    timers.reset_confirm_secs = (timers.reset_confirm_secs - time.delta_secs()).max(0.0);

    if !keys.just_pressed(KeyCode::KeyR) {
        return;
    }

    let ctrl = keys.pressed(KeyCode::ControlLeft) || keys.pressed(KeyCode::ControlRight);
    let shift = keys.pressed(KeyCode::ShiftLeft) || keys.pressed(KeyCode::ShiftRight);

    if ctrl && shift {
        store.wipe_all();
        score.high_score = score.score;
        messages.post("All saved scores wiped".to_string());
        warn!("Hard reset: all high-score backends removed");
        return;
    }

    if timers.reset_confirm_secs > 0.0 {
        score.high_score = score.score;
        store.save_all(score.high_score);
        timers.reset_confirm_secs = 0.0;
        messages.post("High score reset".to_string());
    } else {
        timers.reset_confirm_secs = SCORE_RESET_CONFIRM_SECS;
        messages.post("Press R again to reset the high score".to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    static DIR_SEQ: AtomicU32 = AtomicU32::new(0);

    fn scratch_store(backends: usize) -> (HighScoreStore, PathBuf) {
        let seq = DIR_SEQ.fetch_add(1, Ordering::SeqCst);
        let root = std::env::temp_dir().join(format!(
            "thunderbolt_score_test_{}_{seq}",
            std::process::id()
        ));
        let paths = (0..backends)
            .map(|i| root.join(format!("backend_{i}.toml")))
            .collect();
        (HighScoreStore::with_backends(paths), root)
    }

    #[test]
    fn load_best_returns_zero_when_nothing_is_saved() {
        let (store, root) = scratch_store(3);
        assert_eq!(store.load_best(), 0);
        let _ = fs::remove_dir_all(root);
    }

    #[test]
    fn save_all_then_load_best_round_trips() {
        let (store, root) = scratch_store(3);
        store.save_all(4200);
        assert_eq!(store.load_best(), 4200);
        let _ = fs::remove_dir_all(root);
    }

    #[test]
    fn load_best_takes_the_maximum_across_backends() {
        let (store, root) = scratch_store(2);
        store.save_all(100);
        // Simulate a stale backup left behind by an older session.
        let record = HighScoreRecord {
            version: RECORD_VERSION,
            high_score: 900,
            saved_at_unix: 0,
        };
        HighScoreStore::write_backend(&store.backends[1], &record).unwrap();
        assert_eq!(store.load_best(), 900);
        let _ = fs::remove_dir_all(root);
    }

    #[test]
    fn corrupt_backend_is_skipped_not_fatal() {
        let (store, root) = scratch_store(2);
        store.save_all(250);
        fs::write(&store.backends[0], "not really toml [").unwrap();
        assert_eq!(store.load_best(), 250);
        let _ = fs::remove_dir_all(root);
    }

    #[test]
    fn wipe_all_removes_every_backend() {
        let (store, root) = scratch_store(3);
        store.save_all(77);
        store.wipe_all();
        assert_eq!(store.load_best(), 0);
        let _ = fs::remove_dir_all(root);
    }

    #[test]
    fn award_points_feeds_level_progress_and_high_score() {
        let config = GameConfig::default();
        let mut board = ScoreBoard::default();
        let mut special = SpecialWeapon::default();

        award_points(&mut board, &mut special, &config, 150);
        assert_eq!(board.score, 150);
        assert_eq!(board.level_score, 150);
        assert_eq!(board.high_score, 150);
        assert!(board.dirty);

        board.dirty = false;
        board.high_score = 1000;
        award_points(&mut board, &mut special, &config, 10);
        assert!(!board.dirty, "no save needed while under the high score");
    }

    #[test]
    fn reset_round_preserves_the_high_score() {
        let mut board = ScoreBoard {
            score: 500,
            high_score: 900,
            level: 3,
            level_score: 120,
            dirty: false,
        };
        board.reset_round();
        assert_eq!(board.score, 0);
        assert_eq!(board.level, 1);
        assert_eq!(board.level_score, 0);
        assert_eq!(board.high_score, 900);
    }
}
