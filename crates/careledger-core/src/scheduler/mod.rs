//! Periodic goal resolution.
//!
//! The scheduler is a wall-clock component with no internal thread: the
//! caller invokes [`ResolutionScheduler::tick`] as often as it likes (the
//! CLI `watch` loop does so every second) and scans actually run on load
//! and then at the configured interval.
//!
//! Instead of re-walking every goal per scan, the scheduler keeps a min-heap
//! of per-goal overdue deadlines and only touches goals whose deadline has
//! passed. Heap entries may be stale -- the goal may have been completed,
//! reverted, or deleted since the entry was pushed -- which is harmless:
//! each popped goal is re-checked by the registry, and idempotence lives in
//! `resolution_applied` plus the ledger dedup guard, not here. The heap is
//! rebuilt whenever the registry's revision counter moves.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use chrono::{DateTime, Duration, Utc};

use crate::events::Event;
use crate::goal::GoalRegistry;
use crate::ledger::LedgerEngine;
use crate::storage::ResolutionConfig;

/// Drives time-based goal transitions.
pub struct ResolutionScheduler {
    interval: Duration,
    last_scan: Option<DateTime<Utc>>,
    seen_revision: Option<u64>,
    /// Overdue deadline per unresolved, uncompleted goal.
    deadlines: BinaryHeap<Reverse<(DateTime<Utc>, String)>>,
}

impl ResolutionScheduler {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last_scan: None,
            seen_revision: None,
            deadlines: BinaryHeap::new(),
        }
    }

    pub fn from_config(config: &ResolutionConfig) -> Self {
        Self::new(Duration::seconds(config.scan_interval_secs as i64))
    }

    /// Earliest pending overdue deadline, if any.
    pub fn next_deadline(&self) -> Option<DateTime<Utc>> {
        self.deadlines.peek().map(|Reverse((at, _))| *at)
    }

    /// Advance the scheduler.
    ///
    /// The first tick always scans (the on-load scan); later ticks scan once
    /// per interval. Returns the transition events applied, with a trailing
    /// [`Event::ScanCompleted`] whenever a scan ran.
    pub fn tick(
        &mut self,
        registry: &mut GoalRegistry,
        ledger: &mut LedgerEngine,
        now: DateTime<Utc>,
    ) -> Vec<Event> {
        self.refresh_deadlines(registry);

        let due = match self.last_scan {
            None => true,
            Some(last) => now - last >= self.interval,
        };
        if !due {
            return Vec::new();
        }

        let mut events = if self.last_scan.is_none() {
            // On-load scan: a full pass also settles goals restored from
            // storage in a completed-but-unresolved state, which the
            // deadline heap does not track.
            registry.resolve_due(ledger, now)
        } else {
            let mut events = Vec::new();
            while let Some(Reverse((deadline, _))) = self.deadlines.peek() {
                if *deadline > now {
                    break;
                }
                let Reverse((_, id)) = self.deadlines.pop().unwrap();
                if let Some(event) = registry.resolve_goal(&id, ledger, now) {
                    events.push(event);
                }
            }
            events
        };

        self.last_scan = Some(now);
        self.refresh_deadlines(registry);

        events.push(Event::ScanCompleted {
            resolved: events.len(),
            at: now,
        });
        events
    }

    /// Rebuild the deadline heap when the goal collection has changed.
    fn refresh_deadlines(&mut self, registry: &GoalRegistry) {
        if self.seen_revision == Some(registry.revision()) {
            return;
        }
        let window = registry.window();
        self.deadlines = registry
            .goals()
            .iter()
            .filter(|g| !g.resolution_applied && !g.completed)
            .map(|g| Reverse((g.overdue_at(window), g.id.clone())))
            .collect();
        self.seen_revision = Some(registry.revision());
    }
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use chrono::TimeZone;

    use super::*;
    use crate::goal::GoalStatus;
    use crate::scope::Scope;
    use crate::storage::kv::KvStore;
    use crate::storage::{AwardConfig, MemoryStore};

    fn setup() -> (ResolutionScheduler, GoalRegistry, LedgerEngine) {
        let store = Rc::new(MemoryStore::new());
        let ledger = LedgerEngine::load(store.clone(), Scope::Patient);
        let registry = GoalRegistry::load(
            store,
            Scope::Patient,
            Duration::hours(24),
            AwardConfig::default(),
        );
        let scheduler = ResolutionScheduler::new(Duration::seconds(60));
        (scheduler, registry, ledger)
    }

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0).unwrap()
    }

    #[test]
    fn test_first_tick_scans_immediately() {
        let (mut scheduler, mut registry, mut ledger) = setup();
        registry.create("old goal", &mut ledger, t0() - Duration::hours(25));

        let events = scheduler.tick(&mut registry, &mut ledger, t0());
        assert_eq!(events.len(), 2);
        assert!(matches!(events[0], Event::GoalOverdue { .. }));
        assert!(matches!(events[1], Event::ScanCompleted { resolved: 1, .. }));
        assert_eq!(ledger.total(), -5);
    }

    #[test]
    fn test_scans_are_interval_gated() {
        let (mut scheduler, mut registry, mut ledger) = setup();
        registry.create("goal", &mut ledger, t0());

        assert!(!scheduler.tick(&mut registry, &mut ledger, t0()).is_empty());
        // 30s later: not due yet, nothing at all happens.
        assert!(scheduler
            .tick(&mut registry, &mut ledger, t0() + Duration::seconds(30))
            .is_empty());
        // 60s later: a scan runs (and finds nothing to resolve).
        let events = scheduler.tick(&mut registry, &mut ledger, t0() + Duration::seconds(60));
        assert_eq!(events.len(), 1);
        assert!(matches!(events[0], Event::ScanCompleted { resolved: 0, .. }));
    }

    #[test]
    fn test_goal_goes_overdue_after_window() {
        let (mut scheduler, mut registry, mut ledger) = setup();
        let (goal, _) = registry.create("exercise", &mut ledger, t0());

        scheduler.tick(&mut registry, &mut ledger, t0());
        assert_eq!(scheduler.next_deadline(), Some(t0() + Duration::hours(24)));

        // Just before the deadline: nothing resolves.
        let events = scheduler.tick(&mut registry, &mut ledger, t0() + Duration::hours(23));
        assert_eq!(events.len(), 1);
        assert_eq!(ledger.total(), 5);

        // After 25 simulated hours the goal is overdue: +5 create, -10 overdue.
        let events = scheduler.tick(&mut registry, &mut ledger, t0() + Duration::hours(25));
        assert!(matches!(events[0], Event::GoalOverdue { .. }));
        assert_eq!(ledger.total(), -5);
        assert_eq!(registry.get(&goal.id).unwrap().status, GoalStatus::Overdue);

        // The deadline was consumed; re-scans stay idempotent.
        let events = scheduler.tick(&mut registry, &mut ledger, t0() + Duration::hours(26));
        assert_eq!(events.len(), 1);
        assert_eq!(ledger.total(), -5);
    }

    #[test]
    fn test_completed_goal_is_not_marked_overdue() {
        let (mut scheduler, mut registry, mut ledger) = setup();
        let (goal, _) = registry.create("walk", &mut ledger, t0());
        scheduler.tick(&mut registry, &mut ledger, t0());

        registry.toggle(&goal.id, &mut ledger, t0() + Duration::hours(1));
        assert_eq!(ledger.total(), 15);

        let events = scheduler.tick(&mut registry, &mut ledger, t0() + Duration::hours(25));
        assert_eq!(events.len(), 1); // ScanCompleted only
        assert_eq!(ledger.total(), 15);
        assert_eq!(registry.get(&goal.id).unwrap().status, GoalStatus::Completed);
    }

    #[test]
    fn test_reverted_goal_rejoins_overdue_track() {
        let (mut scheduler, mut registry, mut ledger) = setup();
        let (goal, _) = registry.create("stretch", &mut ledger, t0());
        scheduler.tick(&mut registry, &mut ledger, t0());

        // Completed at 1h; the scan at 24h pops the deadline and skips the
        // resolved goal.
        registry.toggle(&goal.id, &mut ledger, t0() + Duration::hours(1));
        scheduler.tick(&mut registry, &mut ledger, t0() + Duration::hours(24));

        // Un-checked at 24.5h, still within the grace window of the 1h
        // completion: award reverted, goal active again and already past its
        // overdue deadline. The rebuilt heap must pick it up.
        registry.toggle(&goal.id, &mut ledger, t0() + Duration::hours(24) + Duration::minutes(30));
        let events = scheduler.tick(
            &mut registry,
            &mut ledger,
            t0() + Duration::hours(24) + Duration::minutes(32),
        );
        assert!(matches!(events[0], Event::GoalOverdue { .. }));
        // +5 create +10 complete -10 revert -10 overdue
        assert_eq!(ledger.total(), -5);
        assert_eq!(registry.get(&goal.id).unwrap().status, GoalStatus::Overdue);
    }

    #[test]
    fn test_on_load_scan_settles_completed_unresolved_goals() {
        let store = Rc::new(MemoryStore::new());
        let mut ledger = LedgerEngine::load(store.clone(), Scope::Patient);
        let id;
        {
            let mut registry = GoalRegistry::load(
                store.clone(),
                Scope::Patient,
                Duration::hours(24),
                AwardConfig::default(),
            );
            let (goal, _) = registry.create("from last session", &mut ledger, t0());
            id = goal.id;
        }

        // Next session: mark completed directly in storage, resolution never
        // applied (the old session never scanned).
        let raw = store.get(Scope::Patient.goals_key()).unwrap().unwrap();
        let patched = raw
            .replace("\"completed\":false", "\"completed\":true")
            .replace(
                "\"completed_at\":null",
                &format!(
                    "\"completed_at\":\"{}\"",
                    (t0() + Duration::hours(2)).to_rfc3339()
                ),
            );
        store.set(Scope::Patient.goals_key(), &patched).unwrap();

        let mut registry = GoalRegistry::load(
            store,
            Scope::Patient,
            Duration::hours(24),
            AwardConfig::default(),
        );
        let mut scheduler = ResolutionScheduler::new(Duration::seconds(60));
        let events = scheduler.tick(&mut registry, &mut ledger, t0() + Duration::hours(3));
        assert!(matches!(events[0], Event::GoalCompleted { award_applied: true, .. }));
        assert_eq!(ledger.total(), 15);
        assert!(registry.get(&id).unwrap().resolution_applied);
    }
}
