//! Ledger event types.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Machine-readable reason tags for ledger events.
pub mod reason {
    pub const GOAL_CREATE: &str = "goal:create";
    pub const GOAL_COMPLETED_IN_WINDOW: &str = "goal:completed-within-24h";
    pub const GOAL_REVERT_COMPLETED: &str = "goal:revert-completed-within-24h";
    pub const GOAL_OVERDUE: &str = "goal:overdue-24h";
    pub const GOAL_DELETED_IN_WINDOW: &str = "goal:deleted-within-24h";
    pub const ADJUST: &str = "adjust";
    pub const SET: &str = "set";
    pub const RESET: &str = "reset";
}

/// Contextual attributes attached to a ledger event.
///
/// `goal_id` participates in the dedup guard; `extra` is free-form context
/// that is stored but never matched on.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventMeta {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub goal_id: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub extra: BTreeMap<String, String>,
}

impl EventMeta {
    /// Meta referencing a goal, for award/reversal events.
    pub fn for_goal(goal_id: impl Into<String>) -> Self {
        Self {
            goal_id: Some(goal_id.into()),
            extra: BTreeMap::new(),
        }
    }
}

/// A single point-change entry in the ledger.
///
/// Events are immutable once created; the ledger is append-only except for
/// full resets.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PointEvent {
    pub id: Uuid,
    pub delta: i64,
    pub reason: String,
    #[serde(default)]
    pub meta: EventMeta,
    pub at: DateTime<Utc>,
}

impl PointEvent {
    pub(crate) fn new(delta: i64, reason: &str, meta: EventMeta, at: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            delta,
            reason: reason.to_string(),
            meta,
            at,
        }
    }
}
