//! Shared helpers for CLI commands.

use std::rc::Rc;

use careledger_core::{Config, GoalRegistry, KvStore, LedgerEngine, Scope, SqliteStore};
use chrono::Duration;

pub type CliResult = Result<(), Box<dyn std::error::Error>>;

/// One scope's ledger and goal registry, loaded from the on-disk store.
///
/// Both components persist themselves on mutation, so commands do not need
/// an explicit save step.
pub struct Session {
    pub config: Config,
    pub ledger: LedgerEngine,
    pub registry: GoalRegistry,
}

pub fn parse_scope(raw: &str) -> Result<Scope, Box<dyn std::error::Error>> {
    raw.parse::<Scope>().map_err(Into::into)
}

pub fn open_session(scope: Scope) -> Result<Session, Box<dyn std::error::Error>> {
    let config = Config::load()?;
    let store: Rc<dyn KvStore> = Rc::new(SqliteStore::open()?);
    let ledger = LedgerEngine::load(store.clone(), scope);
    let registry = GoalRegistry::load(
        store,
        scope,
        Duration::hours(config.resolution.window_hours),
        config.awards,
    );
    Ok(Session {
        config,
        ledger,
        registry,
    })
}
