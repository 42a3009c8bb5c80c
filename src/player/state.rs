//! Player components and resources.
//!
//! All ECS components and Bevy resources that describe player state live
//! here.  Systems that mutate this state are in the sibling modules:
//! - [`super::control`] — arrow-key movement
//! - [`super::combat`] — firing, the special weapon, and bullet upkeep

use bevy::prelude::*;

use crate::constants::{
    CONTINUOUS_FIRE_DELAY_SECS, HOLD_THRESHOLD_SECS, PLAYER_MAX_LIVES, SINGLE_SHOT_COOLDOWN_SECS,
    TAP_MAX_PRESS_SECS, TAP_MIN_PRESS_SECS, TAP_MIN_RELEASE_SECS,
};

// ── Components ────────────────────────────────────────────────────────────────

/// Marker component for the player's aircraft.
#[derive(Component)]
pub struct Player;

/// Temporary wingman granted at score milestones.  Mirrors the player's
/// position at a fixed offset and fires alongside every player shot.
#[derive(Component, Default)]
pub struct EscortPlane {
    /// Seconds since the escort joined; expires at the configured lifetime.
    pub age: f32,
}

/// Per-bullet state for player fire.
#[derive(Component, Debug, Clone, Copy)]
pub struct PlayerBullet {
    pub damage: f32,
    /// Special-weapon ring bullets instant-kill the boss and expire on a
    /// life timer instead of the screen edge.
    pub special: bool,
    /// Remaining life (s) for special bullets; `None` for normal shots.
    pub life_secs: Option<f32>,
}

// ── Resources ─────────────────────────────────────────────────────────────────

/// Life accounting: a fixed budget of `max_lives` minus accumulated hits.
///
/// `max_lives` can grow mid-round (shield-kill and boss rewards), so the
/// remaining-life figure is always derived, never stored.
#[derive(Resource, Debug, Clone, Copy)]
pub struct PlayerLives {
    pub max_lives: u32,
    pub collision_count: u32,
}

impl Default for PlayerLives {
    fn default() -> Self {
        Self::new(PLAYER_MAX_LIVES)
    }
}

impl PlayerLives {
    pub fn new(max_lives: u32) -> Self {
        Self {
            max_lives,
            collision_count: 0,
        }
    }

    /// Lives remaining; saturates at zero and never reads negative.
    #[inline]
    pub fn effective_lives(&self) -> u32 {
        self.max_lives.saturating_sub(self.collision_count)
    }

    /// Record one unshielded hit.  Returns `true` when the round is over.
    #[inline]
    pub fn register_hit(&mut self) -> bool {
        self.collision_count += 1;
        self.collision_count >= self.max_lives
    }

    /// Reward path: raises the life ceiling by one.
    #[inline]
    pub fn grant_life(&mut self) {
        self.max_lives += 1;
    }
}

/// Charge-based super attack: score gains accumulate charge, whole charge
/// units convert into banked activations.
#[derive(Resource, Debug, Clone, Copy, Default)]
pub struct SpecialWeapon {
    pub charge: u32,
    pub count: u32,
}

impl SpecialWeapon {
    /// Feed score points into the charge meter.
    ///
    /// While banked units are below `max_count`, each `max_charge` of
    /// accumulated charge converts into one unit; the remainder carries
    /// over.  Reaching the bank cap zeroes the meter, and a capped bank
    /// stops accumulating entirely.
    pub fn charge_from_points(&mut self, points: u32, max_charge: u32, max_count: u32) {
        if self.count >= max_count {
            self.charge = 0;
            return;
        }

        self.charge += points;
        if self.charge >= max_charge {
            let new_units = self.charge / max_charge;
            self.count += new_units;
            if self.count >= max_count {
                self.count = max_count;
                self.charge = 0;
            } else {
                self.charge %= max_charge;
            }
        }
    }

    /// Spend one banked unit.  Returns `false` when the bank is empty.
    #[inline]
    pub fn try_consume(&mut self) -> bool {
        if self.count == 0 {
            return false;
        }
        self.count -= 1;
        if self.count == 0 {
            self.charge = 0;
        }
        true
    }
}

/// Which firing mode produced a shot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShotKind {
    /// Deliberate short press.
    Tap,
    /// Continuous fire from a sustained hold.
    Hold,
}

/// The Space-bar firing state machine.
///
/// A **tap** must land in a narrow press-duration window, respect the
/// single-shot cooldown, and follow a real release of the key; a **hold**
/// past the threshold switches to continuous fire on a much shorter delay.
/// The asymmetry stops key-mashing from out-pacing deliberate play.
#[derive(Resource, Debug, Clone, Copy)]
pub struct FireControl {
    pressed: bool,
    continuous: bool,
    press_started: f32,
    last_shot: f32,
    last_release: f32,
}

impl Default for FireControl {
    fn default() -> Self {
        Self {
            pressed: false,
            continuous: false,
            press_started: 0.0,
            last_shot: -10.0,
            last_release: -10.0,
        }
    }
}

impl FireControl {
    pub fn on_press(&mut self, now: f32) {
        if !self.pressed {
            self.pressed = true;
            self.press_started = now;
        }
    }

    pub fn on_release(&mut self, now: f32) {
        self.pressed = false;
        self.continuous = false;
        self.last_release = now;
    }

    #[inline]
    pub fn is_holding(&self) -> bool {
        self.continuous
    }

    /// Advance the state machine and report whether a shot fires this frame.
    ///
    /// `rapid_multiplier` divides the continuous-fire delay (rapid-fire
    /// power-up); it never affects tap timing.
    pub fn poll(&mut self, now: f32, rapid_multiplier: f32) -> Option<ShotKind> {
        if !self.pressed {
            return None;
        }

        let held = now - self.press_started;
        if held >= HOLD_THRESHOLD_SECS {
            self.continuous = true;
        }

        if self.continuous {
            let delay = CONTINUOUS_FIRE_DELAY_SECS / rapid_multiplier.max(1.0);
            if now - self.last_shot >= delay {
                self.last_shot = now;
                return Some(ShotKind::Hold);
            }
            return None;
        }

        // Tap path: all four gates must pass.
        if now - self.last_shot < SINGLE_SHOT_COOLDOWN_SECS {
            return None;
        }
        if !(TAP_MIN_PRESS_SECS..=TAP_MAX_PRESS_SECS).contains(&held) {
            return None;
        }
        if now - self.last_release < TAP_MIN_RELEASE_SECS {
            return None;
        }

        self.last_shot = now;
        Some(ShotKind::Tap)
    }
}

/// Tracks the score at which the last escort plane was granted.
#[derive(Resource, Debug, Clone, Copy, Default)]
pub struct EscortState {
    pub last_grant_score: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── Lives ────────────────────────────────────────────────────────────────

    #[test]
    fn effective_lives_never_reads_negative() {
        let mut lives = PlayerLives::new(2);
        assert_eq!(lives.effective_lives(), 2);
        lives.register_hit();
        lives.register_hit();
        lives.register_hit();
        assert_eq!(lives.effective_lives(), 0);
    }

    #[test]
    fn game_over_triggers_exactly_at_max_lives() {
        let mut lives = PlayerLives::new(3);
        assert!(!lives.register_hit());
        assert!(!lives.register_hit());
        assert!(lives.register_hit(), "third hit of three lives ends the round");
    }

    #[test]
    fn granted_lives_extend_the_budget() {
        let mut lives = PlayerLives::new(1);
        lives.grant_life();
        assert!(!lives.register_hit());
        assert!(lives.register_hit());
    }

    // ── Special weapon ───────────────────────────────────────────────────────

    #[test]
    fn charge_converts_whole_units_and_carries_remainder() {
        let mut special = SpecialWeapon::default();
        special.charge_from_points(2500, 2000, 5);
        assert_eq!(special.count, 1);
        assert_eq!(special.charge, 500);

        special.charge_from_points(4100, 2000, 5);
        assert_eq!(special.count, 3);
        assert_eq!(special.charge, 600);
    }

    #[test]
    fn charge_zeroes_when_the_bank_caps() {
        let mut special = SpecialWeapon { charge: 0, count: 4 };
        special.charge_from_points(4500, 2000, 5);
        assert_eq!(special.count, 5);
        assert_eq!(special.charge, 0, "cap clamps and wipes the meter");

        // Further gains are discarded while capped.
        special.charge_from_points(999, 2000, 5);
        assert_eq!(special.count, 5);
        assert_eq!(special.charge, 0);
    }

    #[test]
    fn consuming_the_last_unit_clears_residual_charge() {
        let mut special = SpecialWeapon {
            charge: 700,
            count: 1,
        };
        assert!(special.try_consume());
        assert_eq!(special.count, 0);
        assert_eq!(special.charge, 0);
        assert!(!special.try_consume());
    }

    // ── Fire control ─────────────────────────────────────────────────────────

    #[test]
    fn tap_fires_inside_the_press_window() {
        let mut fire = FireControl::default();
        fire.on_press(1.0);
        assert_eq!(fire.poll(1.02, 1.0), None, "too early");
        assert_eq!(fire.poll(1.08, 1.0), Some(ShotKind::Tap));
        assert_eq!(fire.poll(1.1, 1.0), None, "single-shot cooldown holds");
    }

    #[test]
    fn overlong_press_misses_the_tap_window_then_goes_continuous() {
        let mut fire = FireControl::default();
        fire.on_press(0.0);
        assert_eq!(fire.poll(0.18, 1.0), None, "past the tap window");
        assert_eq!(fire.poll(0.25, 1.0), Some(ShotKind::Hold));
        assert!(fire.is_holding());
        assert_eq!(fire.poll(0.27, 1.0), None, "within hold delay");
        assert_eq!(fire.poll(0.31, 1.0), Some(ShotKind::Hold));
    }

    #[test]
    fn rapid_fire_multiplier_shortens_the_hold_delay() {
        let mut fire = FireControl::default();
        fire.on_press(0.0);
        assert_eq!(fire.poll(0.25, 4.0), Some(ShotKind::Hold));
        assert_eq!(fire.poll(0.265, 4.0), Some(ShotKind::Hold));
    }

    #[test]
    fn release_resets_continuous_fire() {
        let mut fire = FireControl::default();
        fire.on_press(0.0);
        assert_eq!(fire.poll(0.3, 1.0), Some(ShotKind::Hold));
        fire.on_release(0.35);

        // Immediate re-press: tap is blocked by the minimum-release gate.
        fire.on_press(0.4);
        assert_eq!(fire.poll(0.46, 1.0), None);

        fire.on_release(0.5);
        fire.on_press(1.2);
        assert_eq!(fire.poll(1.28, 1.0), Some(ShotKind::Tap));
    }
}
