use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::scope::Scope;

/// Every state change in the system produces an Event.
/// A frontend polls for these; badges and timelines re-render on them.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    /// The ledger total moved.
    PointsChanged {
        scope: Scope,
        delta: i64,
        total: i64,
        reason: String,
        at: DateTime<Utc>,
    },
    /// The ledger was explicitly zeroed.
    PointsReset { scope: Scope, at: DateTime<Utc> },
    GoalCreated {
        goal_id: String,
        at: DateTime<Utc>,
    },
    /// A goal was checked off. `award_applied` is false when the completion
    /// fell outside the resolution window or the goal was already resolved.
    GoalCompleted {
        goal_id: String,
        award_applied: bool,
        at: DateTime<Utc>,
    },
    /// A completed goal was un-checked. `award_reverted` is true when the
    /// completion award was taken back (un-check within the grace window).
    GoalReopened {
        goal_id: String,
        award_reverted: bool,
        at: DateTime<Utc>,
    },
    /// The resolution scan found a goal past its window.
    GoalOverdue {
        goal_id: String,
        at: DateTime<Utc>,
    },
    /// A goal was removed. `award_reverted` is true when the creation award
    /// was refunded (deletion within the window).
    GoalDeleted {
        goal_id: String,
        award_reverted: bool,
        at: DateTime<Utc>,
    },
    /// A periodic resolution scan finished.
    ScanCompleted {
        resolved: usize,
        at: DateTime<Utc>,
    },
}
