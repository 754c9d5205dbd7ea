use careledger_core::Config;
use clap::Subcommand;

use super::common::CliResult;

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Print the effective configuration
    Show {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print the configuration file path
    Path,
    /// Write the effective configuration back to disk
    Init,
}

pub fn run(action: ConfigAction) -> CliResult {
    match action {
        ConfigAction::Show { json } => {
            let config = Config::load()?;
            if json {
                println!("{}", serde_json::to_string_pretty(&config)?);
            } else {
                print!("{}", toml::to_string_pretty(&config)?);
            }
            Ok(())
        }
        ConfigAction::Path => {
            println!("{}", Config::path()?.display());
            Ok(())
        }
        ConfigAction::Init => {
            let config = Config::load()?;
            config.save()?;
            println!("Wrote {}", Config::path()?.display());
            Ok(())
        }
    }
}
