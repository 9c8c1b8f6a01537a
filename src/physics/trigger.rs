//! Trigger zone bookkeeping: per-frame overlap sets diffed into enter/exit
//! notifications.

use std::collections::{HashMap, HashSet};

use crate::events::PhysicsEvent;

/// Tracks, per trigger shape, which entities overlapped it last frame.
///
/// Identity is the entity id, never geometry: an entity that despawns
/// mid-frame simply stops appearing in the current set and produces exactly
/// one exit. Both maps are scratch storage owned across frames and reused to
/// avoid reallocation.
#[derive(Debug, Default)]
pub struct TriggerTracker {
    previous: HashMap<hecs::Entity, HashSet<hecs::Entity>>,
    current: HashMap<hecs::Entity, HashSet<hecs::Entity>>,
}

impl TriggerTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a frame: forget this frame's recordings (previous-frame sets are
    /// kept for diffing).
    pub fn begin_frame(&mut self) {
        for set in self.current.values_mut() {
            set.clear();
        }
    }

    /// Record that `other` overlaps `trigger` this frame.
    pub fn record_overlap(&mut self, trigger: hecs::Entity, other: hecs::Entity) {
        self.current.entry(trigger).or_default().insert(other);
    }

    /// Diff current against previous overlap sets, emit enter/exit events,
    /// and roll the frame over.
    pub fn finish_frame(&mut self, events: &mut Vec<PhysicsEvent>) {
        // Entered: in current, not in previous
        for (&trigger, now) in &self.current {
            let before = self.previous.get(&trigger);
            for &other in now {
                if before.map_or(true, |set| !set.contains(&other)) {
                    events.push(PhysicsEvent::TriggerEnter { trigger, other });
                }
            }
        }

        // Exited: in previous, not in current (including triggers with no
        // recordings at all this frame)
        for (&trigger, before) in &self.previous {
            let now = self.current.get(&trigger);
            for &other in before {
                if now.map_or(true, |set| !set.contains(&other)) {
                    events.push(PhysicsEvent::TriggerExit { trigger, other });
                }
            }
        }

        std::mem::swap(&mut self.previous, &mut self.current);
        // Drop sets for triggers that recorded nothing and are empty on both
        // sides, so despawned triggers do not accumulate.
        self.previous.retain(|_, set| !set.is_empty());
        self.current.retain(|_, set| !set.is_empty());
    }

    /// Forget a trigger entirely, without emitting exits. Used when the
    /// trigger entity itself despawned.
    pub fn forget(&mut self, trigger: hecs::Entity) {
        self.previous.remove(&trigger);
        self.current.remove(&trigger);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entities(world: &mut hecs::World, n: usize) -> Vec<hecs::Entity> {
        (0..n).map(|_| world.spawn(())).collect()
    }

    fn count_enters(events: &[PhysicsEvent]) -> usize {
        events
            .iter()
            .filter(|e| matches!(e, PhysicsEvent::TriggerEnter { .. }))
            .count()
    }

    fn count_exits(events: &[PhysicsEvent]) -> usize {
        events
            .iter()
            .filter(|e| matches!(e, PhysicsEvent::TriggerExit { .. }))
            .count()
    }

    #[test]
    fn test_enter_then_exit_fire_once_each() {
        let mut world = hecs::World::new();
        let ids = entities(&mut world, 2);
        let (zone, player) = (ids[0], ids[1]);
        let mut tracker = TriggerTracker::new();

        // Frame 1: overlap begins
        let mut events = Vec::new();
        tracker.begin_frame();
        tracker.record_overlap(zone, player);
        tracker.finish_frame(&mut events);
        assert_eq!(count_enters(&events), 1);
        assert_eq!(count_exits(&events), 0);

        // Frame 2: still overlapping, nothing new
        events.clear();
        tracker.begin_frame();
        tracker.record_overlap(zone, player);
        tracker.finish_frame(&mut events);
        assert!(events.is_empty());

        // Frame 3: overlap ends, exactly one exit
        events.clear();
        tracker.begin_frame();
        tracker.finish_frame(&mut events);
        assert_eq!(count_exits(&events), 1);
        assert!(matches!(
            events[0],
            PhysicsEvent::TriggerExit { trigger, other } if trigger == zone && other == player
        ));

        // Frame 4: no repeat exit
        events.clear();
        tracker.begin_frame();
        tracker.finish_frame(&mut events);
        assert!(events.is_empty());
    }

    #[test]
    fn test_despawned_entity_counts_as_exited() {
        let mut world = hecs::World::new();
        let ids = entities(&mut world, 2);
        let (zone, ghost) = (ids[0], ids[1]);
        let mut tracker = TriggerTracker::new();

        let mut events = Vec::new();
        tracker.begin_frame();
        tracker.record_overlap(zone, ghost);
        tracker.finish_frame(&mut events);

        // Entity despawns; it simply never gets recorded again
        world.despawn(ghost).unwrap();
        events.clear();
        tracker.begin_frame();
        tracker.finish_frame(&mut events);
        assert_eq!(count_exits(&events), 1);
    }

    #[test]
    fn test_multiple_triggers_tracked_independently() {
        let mut world = hecs::World::new();
        let ids = entities(&mut world, 3);
        let (zone_a, zone_b, player) = (ids[0], ids[1], ids[2]);
        let mut tracker = TriggerTracker::new();

        let mut events = Vec::new();
        tracker.begin_frame();
        tracker.record_overlap(zone_a, player);
        tracker.record_overlap(zone_b, player);
        tracker.finish_frame(&mut events);
        assert_eq!(count_enters(&events), 2);

        // Leaving only zone_a
        events.clear();
        tracker.begin_frame();
        tracker.record_overlap(zone_b, player);
        tracker.finish_frame(&mut events);
        assert_eq!(count_exits(&events), 1);
        assert!(matches!(
            events[0],
            PhysicsEvent::TriggerExit { trigger, .. } if trigger == zone_a
        ));
    }

    #[test]
    fn test_forget_drops_without_exits() {
        let mut world = hecs::World::new();
        let ids = entities(&mut world, 2);
        let (zone, player) = (ids[0], ids[1]);
        let mut tracker = TriggerTracker::new();

        let mut events = Vec::new();
        tracker.begin_frame();
        tracker.record_overlap(zone, player);
        tracker.finish_frame(&mut events);

        tracker.forget(zone);
        events.clear();
        tracker.begin_frame();
        tracker.finish_frame(&mut events);
        assert!(events.is_empty());
    }
}
