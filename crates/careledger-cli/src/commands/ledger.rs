use careledger_core::ledger::{reason, EventMeta};
use chrono::Utc;
use clap::Subcommand;

use super::common::{open_session, parse_scope, CliResult};

#[derive(Subcommand)]
pub enum LedgerAction {
    /// Print the current total
    Status {
        #[arg(long, default_value = "patient")]
        scope: String,
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print recorded events, newest first
    Events {
        #[arg(long, default_value = "patient")]
        scope: String,
        /// Limit the number of events printed
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Record a point adjustment
    Add {
        /// Signed point change
        #[arg(allow_hyphen_values = true)]
        delta: i64,
        #[arg(long)]
        reason: Option<String>,
        /// Goal id to attach (participates in dedup)
        #[arg(long)]
        goal: Option<String>,
        #[arg(long, default_value = "patient")]
        scope: String,
    },
    /// Set the total to an absolute value
    Set {
        #[arg(allow_hyphen_values = true)]
        value: i64,
        #[arg(long)]
        reason: Option<String>,
        #[arg(long)]
        goal: Option<String>,
        #[arg(long, default_value = "patient")]
        scope: String,
    },
    /// Zero the total
    Reset {
        #[arg(long)]
        reason: Option<String>,
        #[arg(long, default_value = "patient")]
        scope: String,
    },
}

pub fn run(action: LedgerAction) -> CliResult {
    match action {
        LedgerAction::Status { scope, json } => {
            let session = open_session(parse_scope(&scope)?)?;
            if json {
                println!(
                    "{}",
                    serde_json::json!({
                        "scope": session.ledger.scope(),
                        "total": session.ledger.total(),
                        "events": session.ledger.events().len(),
                    })
                );
            } else {
                println!(
                    "{}: {} points ({} events)",
                    session.ledger.scope(),
                    session.ledger.total(),
                    session.ledger.events().len()
                );
            }
            Ok(())
        }
        LedgerAction::Events { scope, limit } => {
            let session = open_session(parse_scope(&scope)?)?;
            let events = session.ledger.events();
            let shown = limit.unwrap_or(events.len()).min(events.len());
            for event in &events[..shown] {
                println!("{}", serde_json::to_string(event)?);
            }
            Ok(())
        }
        LedgerAction::Add {
            delta,
            reason: tag,
            goal,
            scope,
        } => {
            let mut session = open_session(parse_scope(&scope)?)?;
            let meta = match goal {
                Some(id) => EventMeta::for_goal(id),
                None => EventMeta::default(),
            };
            let tag = tag.as_deref().unwrap_or(reason::ADJUST);
            match session.ledger.add(delta, tag, meta, Utc::now()) {
                Some(_) => println!("Recorded {delta:+}; total = {}", session.ledger.total()),
                None => println!("Skipped (duplicate award); total = {}", session.ledger.total()),
            }
            Ok(())
        }
        LedgerAction::Set {
            value,
            reason: tag,
            goal,
            scope,
        } => {
            let mut session = open_session(parse_scope(&scope)?)?;
            let meta = match goal {
                Some(id) => EventMeta::for_goal(id),
                None => EventMeta::default(),
            };
            let tag = tag.as_deref().unwrap_or(reason::SET);
            match session.ledger.set_total(value, tag, meta, Utc::now()) {
                Some(_) => println!("Total = {}", session.ledger.total()),
                None => println!("No change; total = {}", session.ledger.total()),
            }
            Ok(())
        }
        LedgerAction::Reset { reason: tag, scope } => {
            let mut session = open_session(parse_scope(&scope)?)?;
            session.ledger.reset(tag.as_deref(), Utc::now());
            println!("Ledger reset; total = 0");
            Ok(())
        }
    }
}
