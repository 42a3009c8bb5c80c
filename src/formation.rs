//! Scripted "snake" formation waves.
//!
//! A formation group streams a column of small followers in from a random
//! quarter-screen lane, all tracing the same parametric path (snake, spiral,
//! and friends) with per-group amplitude and frequency.  Groups are gated by
//! the level's special-pattern chance, run for ten seconds, and leave their
//! surviving members to finish their path off screen.

use bevy::prelude::*;
use rand::Rng;

use crate::collision::Hitbox;
use crate::config::GameConfig;
use crate::constants::{
    FORMATION_GROUP_SIZE, FORMATION_MEMBER_INTERVAL_SECS, FORMATION_MEMBER_SCORE,
    FORMATION_MEMBER_SIZE,
};
use crate::difficulty::DifficultyProfile;
use crate::menu::GameState;
use crate::motion::DespawnOffscreen;
use crate::score::ScoreBoard;
use crate::sprites::{ShapeKind, VisualShape};

/// Path family a group follows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathPattern {
    Snake,
    Vertical,
    Diagonal,
    Horizontal,
    Spiral,
}

impl PathPattern {
    const ALL: [PathPattern; 5] = [
        PathPattern::Snake,
        PathPattern::Vertical,
        PathPattern::Diagonal,
        PathPattern::Horizontal,
        PathPattern::Spiral,
    ];
}

/// Parameters shared by every member of one group.
#[derive(Debug, Clone, Copy)]
pub struct GroupParams {
    pub pattern: PathPattern,
    pub start: Vec2,
    pub direction: f32,
    pub amplitude: f32,
    pub frequency: f32,
    pub speed: f32,
}

/// One follower tracing its group's path.
#[derive(Component, Debug, Clone, Copy)]
pub struct FormationMember {
    pub params: GroupParams,
    /// Seconds since this member entered.
    pub t: f32,
}

impl FormationMember {
    /// Score for shooting a follower down.
    pub const SCORE: u32 = FORMATION_MEMBER_SCORE;
}

/// Group lifecycle: the active group (if any) and the inter-group cooldown.
#[derive(Resource, Debug, Clone, Copy, Default)]
pub struct FormationState {
    pub active: Option<ActiveGroup>,
    pub cooldown_secs: f32,
}

/// Spawn bookkeeping of the in-flight group.
#[derive(Debug, Clone, Copy)]
pub struct ActiveGroup {
    pub params: GroupParams,
    pub remaining_secs: f32,
    pub spawned: usize,
    pub member_timer_secs: f32,
}

/// Parametric position of a member after `t` seconds.
pub fn path_position(params: &GroupParams, t: f32) -> Vec2 {
    let start = params.start;
    match params.pattern {
        PathPattern::Snake => Vec2::new(
            start.x + (t * params.frequency * std::f32::consts::TAU).sin() * params.amplitude,
            start.y - params.speed * t,
        ),
        PathPattern::Vertical => Vec2::new(
            start.x + (t * 1.5).sin() * 12.0,
            start.y - params.speed * 1.2 * t,
        ),
        PathPattern::Diagonal => Vec2::new(
            start.x + params.direction * params.speed * 0.8 * t,
            start.y - params.speed * 0.8 * t,
        ),
        PathPattern::Horizontal => Vec2::new(
            start.x + params.direction * (t * params.frequency * 2.0).sin() * params.amplitude,
            start.y - params.speed * 0.4 * t,
        ),
        PathPattern::Spiral => {
            let radius = 30.0 + 20.0 * t;
            Vec2::new(
                start.x + (t * 3.0).cos() * radius,
                start.y - params.speed * 0.7 * t + (t * 3.0).sin() * radius,
            )
        }
    }
}

pub struct FormationPlugin;

impl Plugin for FormationPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<FormationState>().add_systems(
            Update,
            (formation_director_system, formation_move_system)
                .chain()
                .run_if(in_state(GameState::Playing)),
        );
    }
}

/// Roll for new groups and stream members of the active one.
pub fn formation_director_system(
    mut commands: Commands,
    time: Res<Time>,
    config: Res<GameConfig>,
    score: Res<ScoreBoard>,
    mut state: ResMut<FormationState>,
) {
    let dt = time.delta_secs();
    state.cooldown_secs = (state.cooldown_secs - dt).max(0.0);

    if let Some(group) = state.active.as_mut() {
        group.remaining_secs -= dt;
        group.member_timer_secs -= dt;

        if group.spawned < FORMATION_GROUP_SIZE && group.member_timer_secs <= 0.0 {
            group.member_timer_secs = FORMATION_MEMBER_INTERVAL_SECS;
            group.spawned += 1;
            spawn_member(&mut commands, group.params);
        }

        if group.remaining_secs <= 0.0 && group.spawned >= FORMATION_GROUP_SIZE {
            state.active = None;
            state.cooldown_secs = config.formation_cooldown_secs;
        }
        return;
    }

    if state.cooldown_secs > 0.0 {
        return;
    }

    let profile = DifficultyProfile::for_level(score.level);
    let mut rng = rand::thread_rng();
    let chance = (profile.special_pattern_chance * dt).clamp(0.0, 1.0);
    if !rng.gen_bool(chance as f64) {
        return;
    }

    // Lane start: one of four quarter-screen sections.
    let section = rng.gen_range(0..4) as f32;
    let section_width = config.arena_width / 4.0;
    let x = -config.arena_width / 2.0
        + section * section_width
        + rng.gen_range(0.0..section_width * 0.5)
        + 25.0;

    state.active = Some(ActiveGroup {
        params: GroupParams {
            pattern: PathPattern::ALL[rng.gen_range(0..PathPattern::ALL.len())],
            start: Vec2::new(x, config.arena_top() + FORMATION_MEMBER_SIZE),
            direction: if rng.gen_bool(0.5) { 1.0 } else { -1.0 },
            amplitude: rng.gen_range(150.0..250.0),
            frequency: rng.gen_range(0.1..0.2),
            speed: 120.0,
        },
        remaining_secs: config.formation_duration_secs,
        spawned: 0,
        member_timer_secs: 0.0,
    });
}

fn spawn_member(commands: &mut Commands, params: GroupParams) {
    commands.spawn((
        FormationMember { params, t: 0.0 },
        crate::enemy::EnemyHealth { hp: 1.0 },
        Hitbox::square(FORMATION_MEMBER_SIZE),
        DespawnOffscreen { margin: 120.0 },
        Transform::from_translation(params.start.extend(0.15)),
        Visibility::default(),
        VisualShape::new(
            ShapeKind::Regular {
                sides: 4,
                radius: FORMATION_MEMBER_SIZE / 2.0,
            },
            Color::srgb(0.8, 0.35, 0.1),
        ),
    ));
}

/// Advance every member along its group path.
pub fn formation_move_system(
    time: Res<Time>,
    mut query: Query<(&mut FormationMember, &mut Transform)>,
) {
    let dt = time.delta_secs();
    for (mut member, mut transform) in query.iter_mut() {
        member.t += dt;
        let pos = path_position(&member.params, member.t);
        transform.translation.x = pos.x;
        transform.translation.y = pos.y;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(pattern: PathPattern) -> GroupParams {
        GroupParams {
            pattern,
            start: Vec2::new(0.0, 400.0),
            direction: 1.0,
            amplitude: 200.0,
            frequency: 0.15,
            speed: 120.0,
        }
    }

    #[test]
    fn every_pattern_descends_over_time() {
        for pattern in PathPattern::ALL {
            let p = params(pattern);
            let early = path_position(&p, 0.5);
            let late = path_position(&p, 6.0);
            assert!(
                late.y < early.y,
                "{pattern:?} must make net downward progress"
            );
        }
    }

    #[test]
    fn snake_path_oscillates_around_the_lane() {
        let p = params(PathPattern::Snake);
        let mut left = false;
        let mut right = false;
        for step in 0..200 {
            let pos = path_position(&p, step as f32 * 0.05);
            if pos.x > p.start.x + 50.0 {
                right = true;
            }
            if pos.x < p.start.x - 50.0 {
                left = true;
            }
        }
        assert!(left && right, "snake must swing both ways across its lane");
    }

    #[test]
    fn members_of_one_group_share_the_path() {
        let p = params(PathPattern::Spiral);
        let a = path_position(&p, 2.0);
        let b = path_position(&p, 2.0);
        assert_eq!(a, b);
    }
}
