use careledger_core::ResolutionScheduler;
use chrono::{Duration, Utc};
use clap::Subcommand;

use super::common::{open_session, parse_scope, CliResult};

#[derive(Subcommand)]
pub enum GoalAction {
    /// Create a goal (grants the creation award)
    Add {
        text: String,
        #[arg(long, default_value = "patient")]
        scope: String,
    },
    /// List goals, newest first
    List {
        #[arg(long, default_value = "patient")]
        scope: String,
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// Flip a goal's completion state
    Toggle {
        id: String,
        #[arg(long, default_value = "patient")]
        scope: String,
    },
    /// Delete a goal (refunds the creation award within the window)
    Delete {
        id: String,
        #[arg(long, default_value = "patient")]
        scope: String,
    },
    /// Run one resolution scan now
    Scan {
        #[arg(long, default_value = "patient")]
        scope: String,
    },
    /// Run the resolution scheduler until interrupted
    Watch {
        #[arg(long, default_value = "patient")]
        scope: String,
        /// Override the configured scan interval
        #[arg(long)]
        interval_secs: Option<u64>,
    },
}

pub fn run(action: GoalAction) -> CliResult {
    match action {
        GoalAction::Add { text, scope } => {
            let mut session = open_session(parse_scope(&scope)?)?;
            let (goal, _) = session
                .registry
                .create(&text, &mut session.ledger, Utc::now());
            println!("Goal created: {} ({})", goal.text, goal.id);
            println!("Total: {} points", session.ledger.total());
            Ok(())
        }
        GoalAction::List { scope, json } => {
            let session = open_session(parse_scope(&scope)?)?;
            if json {
                println!("{}", serde_json::to_string(session.registry.goals())?);
                return Ok(());
            }
            if session.registry.goals().is_empty() {
                println!("No goals.");
            }
            for goal in session.registry.goals() {
                let mark = if goal.completed { "x" } else { " " };
                println!(
                    "[{mark}] {:9} {}  {} (created {})",
                    format!("{:?}", goal.status).to_lowercase(),
                    goal.id,
                    goal.text,
                    goal.created_at.to_rfc3339()
                );
            }
            Ok(())
        }
        GoalAction::Toggle { id, scope } => {
            let mut session = open_session(parse_scope(&scope)?)?;
            match session.registry.toggle(&id, &mut session.ledger, Utc::now()) {
                Some(event) => {
                    println!("{}", serde_json::to_string(&event)?);
                    println!("Total: {} points", session.ledger.total());
                    Ok(())
                }
                None => Err(format!("no goal with id '{id}'").into()),
            }
        }
        GoalAction::Delete { id, scope } => {
            let mut session = open_session(parse_scope(&scope)?)?;
            match session.registry.delete(&id, &mut session.ledger, Utc::now()) {
                Some(event) => {
                    println!("{}", serde_json::to_string(&event)?);
                    println!("Total: {} points", session.ledger.total());
                    Ok(())
                }
                None => Err(format!("no goal with id '{id}'").into()),
            }
        }
        GoalAction::Scan { scope } => {
            let mut session = open_session(parse_scope(&scope)?)?;
            let events = session
                .registry
                .resolve_due(&mut session.ledger, Utc::now());
            for event in &events {
                println!("{}", serde_json::to_string(event)?);
            }
            println!(
                "Scan resolved {} goal(s); total = {}",
                events.len(),
                session.ledger.total()
            );
            Ok(())
        }
        GoalAction::Watch {
            scope,
            interval_secs,
        } => {
            let mut session = open_session(parse_scope(&scope)?)?;
            let interval = interval_secs
                .unwrap_or(session.config.resolution.scan_interval_secs);
            let mut scheduler = ResolutionScheduler::new(Duration::seconds(interval as i64));

            // Single-threaded runtime: the core types are deliberately not
            // Send, all work happens on this thread.
            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_time()
                .build()?;
            runtime.block_on(async {
                let mut ticker = tokio::time::interval(std::time::Duration::from_secs(1));
                loop {
                    ticker.tick().await;
                    let events =
                        scheduler.tick(&mut session.registry, &mut session.ledger, Utc::now());
                    for event in &events {
                        match serde_json::to_string(event) {
                            Ok(line) => println!("{line}"),
                            Err(e) => eprintln!("error: {e}"),
                        }
                    }
                }
            })
        }
    }
}
