//! Goal registry: the persisted goal collection and its transition rules.

use std::rc::Rc;

use chrono::{DateTime, Duration, Utc};

use super::{Goal, GoalStatus};
use crate::events::Event;
use crate::ledger::{reason, EventMeta, LedgerEngine};
use crate::scope::Scope;
use crate::storage::{AwardConfig, KvStore};

/// The goal collection for one scope.
///
/// All mutations apply their ledger effects through the engine passed in by
/// the caller; the registry itself never owns a ledger. Persistence is
/// best-effort like the ledger's: a failing store degrades to in-memory
/// state for the session.
pub struct GoalRegistry {
    scope: Scope,
    store: Rc<dyn KvStore>,
    /// Newest first.
    goals: Vec<Goal>,
    window: Duration,
    awards: AwardConfig,
    /// Bumped on every mutation; the scheduler uses it to refresh deadlines.
    revision: u64,
}

impl GoalRegistry {
    /// Load the registry for a scope. Missing or malformed persisted data
    /// is treated as an empty collection.
    pub fn load(store: Rc<dyn KvStore>, scope: Scope, window: Duration, awards: AwardConfig) -> Self {
        let goals = match store.get(scope.goals_key()) {
            Ok(Some(raw)) => serde_json::from_str::<Vec<Goal>>(&raw).unwrap_or_default(),
            _ => Vec::new(),
        };
        Self {
            scope,
            store,
            goals,
            window,
            awards,
            revision: 0,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn scope(&self) -> Scope {
        self.scope
    }

    /// All goals, newest first.
    pub fn goals(&self) -> &[Goal] {
        &self.goals
    }

    pub fn get(&self, id: &str) -> Option<&Goal> {
        self.goals.iter().find(|g| g.id == id)
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    /// Mutation counter; changes whenever the collection changes.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Create a goal in the active state and grant the creation award.
    pub fn create(
        &mut self,
        text: &str,
        ledger: &mut LedgerEngine,
        now: DateTime<Utc>,
    ) -> (Goal, Event) {
        let goal = Goal::new(self.fresh_id(now), text, now);
        let _ = ledger.add(
            self.awards.create,
            reason::GOAL_CREATE,
            EventMeta::for_goal(goal.id.as_str()),
            now,
        );
        self.goals.insert(0, goal.clone());
        self.touch();
        let event = Event::GoalCreated {
            goal_id: goal.id.clone(),
            at: now,
        };
        (goal, event)
    }

    /// Flip a goal's completion state, applying award or reversal rules.
    ///
    /// Returns `None` when no goal matches `id`.
    pub fn toggle(
        &mut self,
        id: &str,
        ledger: &mut LedgerEngine,
        now: DateTime<Utc>,
    ) -> Option<Event> {
        let window = self.window;
        let complete_award = self.awards.complete;
        let goal = self.goals.iter_mut().find(|g| g.id == id)?;

        let event = if !goal.completed {
            goal.completed = true;
            goal.completed_at = Some(now);
            let mut award_applied = false;
            if !goal.resolution_applied && goal.completed_in_window(window) {
                let _ = ledger.add(
                    complete_award,
                    reason::GOAL_COMPLETED_IN_WINDOW,
                    EventMeta::for_goal(id),
                    now,
                );
                goal.resolution_applied = true;
                award_applied = true;
            }
            goal.status = GoalStatus::Completed;
            Event::GoalCompleted {
                goal_id: id.to_string(),
                award_applied,
                at: now,
            }
        } else {
            goal.completed = false;
            let in_grace = goal
                .completed_at
                .map(|done| now - done <= window)
                .unwrap_or(false);
            let mut award_reverted = false;
            if in_grace && goal.resolution_applied && goal.status == GoalStatus::Completed {
                let _ = ledger.add(
                    -complete_award,
                    reason::GOAL_REVERT_COMPLETED,
                    EventMeta::for_goal(id),
                    now,
                );
                goal.resolution_applied = false;
                goal.status = GoalStatus::Active;
                award_reverted = true;
            } else if !goal.resolution_applied {
                goal.status = GoalStatus::Active;
            }
            // Un-checking after the grace window leaves `resolution_applied`
            // set and keeps the terminal status: the settled resolution
            // stands, the checkbox only reflects current intent.
            goal.completed_at = None;
            Event::GoalReopened {
                goal_id: id.to_string(),
                award_reverted,
                at: now,
            }
        };

        self.touch();
        Some(event)
    }

    /// Remove a goal, refunding the creation award when deleted strictly
    /// under one window after creation.
    pub fn delete(
        &mut self,
        id: &str,
        ledger: &mut LedgerEngine,
        now: DateTime<Utc>,
    ) -> Option<Event> {
        let index = self.goals.iter().position(|g| g.id == id)?;
        let goal = &self.goals[index];

        let mut award_reverted = false;
        if goal.creation_award_granted && now - goal.created_at < self.window {
            let _ = ledger.add(
                -self.awards.create,
                reason::GOAL_DELETED_IN_WINDOW,
                EventMeta::for_goal(id),
                now,
            );
            award_reverted = true;
        }

        self.goals.remove(index);
        self.touch();
        Some(Event::GoalDeleted {
            goal_id: id.to_string(),
            award_reverted,
            at: now,
        })
    }

    /// Apply the resolution rule to a single goal. Idempotent: resolved
    /// goals are skipped, and the ledger dedup guard backstops replays.
    pub fn resolve_goal(
        &mut self,
        id: &str,
        ledger: &mut LedgerEngine,
        now: DateTime<Utc>,
    ) -> Option<Event> {
        let window = self.window;
        let complete_award = self.awards.complete;
        let overdue_award = self.awards.overdue;
        let goal = self.goals.iter_mut().find(|g| g.id == id)?;

        if goal.resolution_applied {
            return None;
        }

        let event = if goal.completed && goal.completed_in_window(window) {
            let _ = ledger.add(
                complete_award,
                reason::GOAL_COMPLETED_IN_WINDOW,
                EventMeta::for_goal(id),
                now,
            );
            goal.resolution_applied = true;
            goal.status = GoalStatus::Completed;
            Event::GoalCompleted {
                goal_id: id.to_string(),
                award_applied: true,
                at: now,
            }
        } else if !goal.completed && now - goal.created_at >= window {
            let _ = ledger.add(
                overdue_award,
                reason::GOAL_OVERDUE,
                EventMeta::for_goal(id),
                now,
            );
            goal.resolution_applied = true;
            goal.status = GoalStatus::Overdue;
            Event::GoalOverdue {
                goal_id: id.to_string(),
                at: now,
            }
        } else {
            return None;
        };

        self.touch();
        Some(event)
    }

    /// Apply the resolution rule to every unresolved goal.
    pub fn resolve_due(&mut self, ledger: &mut LedgerEngine, now: DateTime<Utc>) -> Vec<Event> {
        let ids: Vec<String> = self
            .goals
            .iter()
            .filter(|g| !g.resolution_applied)
            .map(|g| g.id.clone())
            .collect();
        ids.iter()
            .filter_map(|id| self.resolve_goal(id, ledger, now))
            .collect()
    }

    // ── Internals ────────────────────────────────────────────────────

    /// Ids derive from the creation epoch millis; a counter suffix keeps
    /// them unique when two goals land on the same millisecond.
    fn fresh_id(&self, now: DateTime<Utc>) -> String {
        let base = now.timestamp_millis().to_string();
        if self.get(&base).is_none() {
            return base;
        }
        let mut n = 1;
        loop {
            let candidate = format!("{base}-{n}");
            if self.get(&candidate).is_none() {
                return candidate;
            }
            n += 1;
        }
    }

    fn touch(&mut self) {
        self.revision += 1;
        self.persist();
    }

    /// Best-effort persistence of the goal collection.
    fn persist(&self) {
        if let Ok(json) = serde_json::to_string(&self.goals) {
            let _ = self.store.set(self.scope.goals_key(), &json);
        }
    }
}
