//! Goal records and their lifecycle registry.
//!
//! ## State transitions
//!
//! ```text
//! active ──(completed within window)──> completed
//! active ──(window elapses)───────────> overdue
//! completed ──(un-check in grace)─────> active
//! any ──(explicit delete)─────────────> removed
//! ```
//!
//! Each terminal transition applies a ledger award exactly once, guarded by
//! `resolution_applied` and backstopped by the ledger dedup rule.

mod registry;

pub use registry::GoalRegistry;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Lifecycle status of a goal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GoalStatus {
    Active,
    Overdue,
    Completed,
}

impl Default for GoalStatus {
    fn default() -> Self {
        GoalStatus::Active
    }
}

/// A user goal subject to the resolution window.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Goal {
    /// Unique identifier, derived from the creation time.
    pub id: String,
    /// User-supplied description.
    pub text: String,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
    /// Set when marked complete, cleared when unmarked.
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
    /// True once the creation award has been recorded. Items restored from
    /// older storage may carry false; those never get a surprise back-award.
    #[serde(default)]
    pub creation_award_granted: bool,
    /// True once the terminal (completed-in-window or overdue) award has
    /// been recorded. The sole guard against re-applying it.
    #[serde(default)]
    pub resolution_applied: bool,
    #[serde(default)]
    pub status: GoalStatus,
}

impl Goal {
    pub(crate) fn new(id: String, text: &str, now: DateTime<Utc>) -> Self {
        Self {
            id,
            text: text.trim().to_string(),
            completed: false,
            created_at: now,
            completed_at: None,
            creation_award_granted: true,
            resolution_applied: false,
            status: GoalStatus::Active,
        }
    }

    /// Whether the goal was completed within `window` of its creation.
    pub fn completed_in_window(&self, window: Duration) -> bool {
        match self.completed_at {
            Some(done) => done - self.created_at <= window,
            None => false,
        }
    }

    /// Instant at which an uncompleted goal becomes overdue.
    pub fn overdue_at(&self, window: Duration) -> DateTime<Utc> {
        self.created_at + window
    }
}
