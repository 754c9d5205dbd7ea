//! Experience ledger.
//!
//! An append-only log of point-change events plus the derived running total.
//! The engine enforces the dedup guard: the same logical goal transition can
//! be replayed any number of times (user toggles racing the periodic scan)
//! and at most one event takes effect.

mod engine;
mod event;

pub use engine::LedgerEngine;
pub use event::{reason, EventMeta, PointEvent};
