//! # Careledger Core Library
//!
//! This library provides the gamification core of the Careledger health
//! portal: an append-only experience-point ledger and a goal registry with
//! time-based resolution. The CLI binary is a thin layer over this crate,
//! and a GUI front end is expected to consume the same operations.
//!
//! ## Architecture
//!
//! - **Ledger Engine**: an append-only event log with a derived running
//!   total and a dedup guard that makes goal awards idempotent
//! - **Goal Registry**: the persisted goal collection and its lifecycle
//!   state machine (active -> completed/overdue, with grace-window reversals)
//! - **Resolution Scheduler**: a caller-driven periodic scan that settles
//!   each goal's terminal award exactly once
//! - **Storage**: an opaque key-value store (SQLite-backed) plus TOML-based
//!   configuration
//!
//! Everything is scoped: patient and doctor each get an isolated ledger and
//! registry that never share storage keys.
//!
//! ## Key Components
//!
//! - [`LedgerEngine`]: point ledger with dedup guard
//! - [`GoalRegistry`]: goal lifecycle operations
//! - [`ResolutionScheduler`]: 24-hour resolution scans
//! - [`Config`]: award table and timing configuration

pub mod error;
pub mod events;
pub mod goal;
pub mod ledger;
pub mod scheduler;
pub mod scope;
pub mod storage;

pub use error::{ConfigError, CoreError, StorageError};
pub use events::Event;
pub use goal::{Goal, GoalRegistry, GoalStatus};
pub use ledger::{EventMeta, LedgerEngine, PointEvent};
pub use scheduler::ResolutionScheduler;
pub use scope::Scope;
pub use storage::{AwardConfig, Config, KvStore, MemoryStore, ResolutionConfig, SqliteStore};
