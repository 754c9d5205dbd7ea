//! Ledger engine implementation.
//!
//! One engine exists per [`Scope`], constructed at session start and passed
//! by reference to consumers. The in-memory state is authoritative;
//! persistence to the key-value store is best-effort and every storage
//! failure is swallowed. The worst observable effect of a failing store is
//! loss of history on the next load, never a wrong total within the session.

use std::rc::Rc;

use chrono::{DateTime, Utc};

use super::event::{reason, EventMeta, PointEvent};
use crate::events::Event;
use crate::scope::Scope;
use crate::storage::KvStore;

/// Append-only point ledger with a derived running total.
///
/// Invariant: after every mutating operation,
/// `total == events.iter().map(|e| e.delta).sum()`.
pub struct LedgerEngine {
    scope: Scope,
    store: Rc<dyn KvStore>,
    total: i64,
    /// Newest first.
    events: Vec<PointEvent>,
}

impl LedgerEngine {
    /// Load the ledger for a scope from the store.
    ///
    /// Missing or malformed persisted data is treated as empty state.
    pub fn load(store: Rc<dyn KvStore>, scope: Scope) -> Self {
        let total = match store.get(scope.total_key()) {
            Ok(Some(raw)) => raw.trim().parse().unwrap_or(0),
            _ => 0,
        };
        let events: Vec<PointEvent> = match store.get(scope.events_key()) {
            Ok(Some(raw)) => serde_json::from_str(&raw).unwrap_or_default(),
            _ => Vec::new(),
        };
        Self {
            scope,
            store,
            total,
            events,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn scope(&self) -> Scope {
        self.scope
    }

    pub fn total(&self) -> i64 {
        self.total
    }

    /// All recorded events, newest first.
    pub fn events(&self) -> &[PointEvent] {
        &self.events
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Append an event for `delta` and adjust the total.
    ///
    /// Dedup guard: when `meta` names a goal and an existing event carries
    /// the same goal id, reason, and delta, the candidate is silently
    /// dropped and the total is left unchanged. Returns the change signal,
    /// or `None` when the event was deduplicated.
    pub fn add(
        &mut self,
        delta: i64,
        reason: &str,
        meta: EventMeta,
        now: DateTime<Utc>,
    ) -> Option<Event> {
        if !self.push_event(delta, reason, meta, now) {
            return None;
        }
        self.total += delta;
        self.persist();
        Some(Event::PointsChanged {
            scope: self.scope,
            delta,
            total: self.total,
            reason: reason.to_string(),
            at: now,
        })
    }

    /// Set the total to an absolute value by recording the difference
    /// against the persisted total. A zero difference is a no-op.
    pub fn set_total(
        &mut self,
        value: i64,
        reason: &str,
        meta: EventMeta,
        now: DateTime<Utc>,
    ) -> Option<Event> {
        let delta = value - self.stored_total();
        if delta == 0 {
            return None;
        }
        self.add(delta, reason, meta, now)
    }

    /// Zero the total, appending one zero-delta marker event.
    ///
    /// Resets bypass the dedup guard; an explicit reset always takes effect.
    pub fn reset(&mut self, tag: Option<&str>, now: DateTime<Utc>) -> Event {
        let tag = tag.unwrap_or(reason::RESET);
        // No goal id in the meta, so push_event never dedups this.
        self.push_event(0, tag, EventMeta::default(), now);
        self.total = 0;
        self.persist();
        Event::PointsReset {
            scope: self.scope,
            at: now,
        }
    }

    // ── Internals ────────────────────────────────────────────────────

    /// Append an event unless the dedup guard rejects it.
    fn push_event(&mut self, delta: i64, reason: &str, meta: EventMeta, now: DateTime<Utc>) -> bool {
        if let Some(goal_id) = meta.goal_id.as_deref() {
            let dup = self.events.iter().any(|e| {
                e.meta.goal_id.as_deref() == Some(goal_id) && e.reason == reason && e.delta == delta
            });
            if dup {
                return false;
            }
        }
        self.events.insert(0, PointEvent::new(delta, reason, meta, now));
        true
    }

    /// Read the persisted total, falling back to the in-memory total when
    /// the store is unreadable.
    fn stored_total(&self) -> i64 {
        match self.store.get(self.scope.total_key()) {
            Ok(Some(raw)) => raw.trim().parse().unwrap_or(self.total),
            Ok(None) => 0,
            Err(_) => self.total,
        }
    }

    /// Persist total and events. Best-effort: failures leave the in-memory
    /// state authoritative for the rest of the session.
    fn persist(&self) {
        let _ = self.store.set(self.scope.total_key(), &self.total.to_string());
        if let Ok(json) = serde_json::to_string(&self.events) {
            let _ = self.store.set(self.scope.events_key(), &json);
        }
    }
}
