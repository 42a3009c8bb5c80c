//! Simulation-owned queue for deferred shots.
//!
//! Staggered attack waves (boss multi-wave spreads, rapid-fire plane salvos)
//! are queued here instead of being parked on wall-clock timers, so they tick
//! with the simulation, freeze under pause, and die with their owner: an
//! entry whose owner has despawned is dropped when it comes due, and
//! [`ShotSchedule::cancel_owner`] removes everything for an entity up front.

use bevy::prelude::*;

use crate::boss::BossPattern;
use crate::menu::GameState;

/// What to do when a deferred entry comes due.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DeferredAction {
    /// Fire wave `wave_index` of a boss spread pattern.
    BossWave {
        pattern: BossPattern,
        wave_index: usize,
    },
    /// One follow-up shot of a rapid-fire plane salvo.
    PlaneShot,
}

/// A queued shot with its countdown and owning entity.
#[derive(Debug, Clone, Copy)]
pub struct ScheduledShot {
    pub remaining_secs: f32,
    pub owner: Entity,
    pub action: DeferredAction,
}

/// The queue itself.  Entries are unordered; `tick` + `take_due` drive it.
#[derive(Resource, Debug, Default)]
pub struct ShotSchedule {
    entries: Vec<ScheduledShot>,
}

impl ShotSchedule {
    /// Queue `action` to fire after `delay_secs` on behalf of `owner`.
    pub fn push_in(&mut self, delay_secs: f32, owner: Entity, action: DeferredAction) {
        self.entries.push(ScheduledShot {
            remaining_secs: delay_secs,
            owner,
            action,
        });
    }

    /// Advance every countdown by `dt`.
    pub fn tick(&mut self, dt: f32) {
        for entry in &mut self.entries {
            entry.remaining_secs -= dt;
        }
    }

    /// Remove and return the due entries matching `filter`.
    pub fn take_due(&mut self, filter: impl Fn(&DeferredAction) -> bool) -> Vec<ScheduledShot> {
        let mut due = Vec::new();
        self.entries.retain(|entry| {
            if entry.remaining_secs <= 0.0 && filter(&entry.action) {
                due.push(*entry);
                false
            } else {
                true
            }
        });
        due
    }

    /// Drop every pending entry owned by `owner`.
    pub fn cancel_owner(&mut self, owner: Entity) {
        self.entries.retain(|entry| entry.owner != owner);
    }

    /// Whether any entry is still pending for `owner`.
    pub fn has_pending_for(&self, owner: Entity) -> bool {
        self.entries.iter().any(|entry| entry.owner == owner)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

pub struct SchedulePlugin;

impl Plugin for SchedulePlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<ShotSchedule>().add_systems(
            Update,
            tick_shot_schedule_system.run_if(in_state(GameState::Playing)),
        );
    }
}

/// Tick the queue with simulation time.  Consumers (`boss`, `enemy`) drain
/// their own due entries after this runs.
pub fn tick_shot_schedule_system(time: Res<Time>, mut schedule: ResMut<ShotSchedule>) {
    schedule.tick(time.delta_secs());
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plane_entry(schedule: &mut ShotSchedule, delay: f32, owner: Entity) {
        schedule.push_in(delay, owner, DeferredAction::PlaneShot);
    }

    fn fresh_entity(world: &mut World) -> Entity {
        world.spawn_empty().id()
    }

    #[test]
    fn entries_come_due_in_countdown_order() {
        let mut world = World::new();
        let mut schedule = ShotSchedule::default();
        let owner = fresh_entity(&mut world);
        plane_entry(&mut schedule, 0.2, owner);
        plane_entry(&mut schedule, 0.5, owner);

        schedule.tick(0.25);
        let due = schedule.take_due(|_| true);
        assert_eq!(due.len(), 1);
        assert_eq!(schedule.len(), 1);

        schedule.tick(0.3);
        assert_eq!(schedule.take_due(|_| true).len(), 1);
        assert!(schedule.is_empty());
    }

    #[test]
    fn take_due_honours_the_action_filter() {
        let mut world = World::new();
        let mut schedule = ShotSchedule::default();
        let owner = fresh_entity(&mut world);
        plane_entry(&mut schedule, 0.0, owner);
        schedule.push_in(
            0.0,
            owner,
            DeferredAction::BossWave {
                pattern: BossPattern::Snowflake,
                wave_index: 1,
            },
        );

        schedule.tick(0.1);
        let boss_only = schedule.take_due(|a| matches!(a, DeferredAction::BossWave { .. }));
        assert_eq!(boss_only.len(), 1);
        assert_eq!(schedule.len(), 1, "plane entry must remain queued");
    }

    #[test]
    fn cancel_owner_drops_pending_bursts() {
        let mut world = World::new();
        let mut schedule = ShotSchedule::default();
        let boss = fresh_entity(&mut world);
        let plane = fresh_entity(&mut world);
        plane_entry(&mut schedule, 1.0, boss);
        plane_entry(&mut schedule, 1.0, boss);
        plane_entry(&mut schedule, 1.0, plane);

        schedule.cancel_owner(boss);
        assert_eq!(schedule.len(), 1);

        schedule.tick(2.0);
        let due = schedule.take_due(|_| true);
        assert!(due.iter().all(|e| e.owner == plane));
    }
}
