use clap::Subcommand;

use focusquest_core::Config;

use super::common::CliResult;

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Read a value by dotted path (e.g. goal.daily_minutes)
    Get {
        /// Dotted key
        key: String,
    },
    /// Set a value by dotted path
    Set {
        /// Dotted key
        key: String,
        /// New value
        value: String,
    },
    /// Print the whole configuration
    List,
}

pub fn run(action: ConfigAction) -> CliResult {
    match action {
        ConfigAction::Get { key } => {
            let config = Config::load()?;
            println!("{}", config.get(&key)?);
        }
        ConfigAction::Set { key, value } => {
            let mut config = Config::load()?;
            config.set(&key, &value)?;
            config.save()?;
            println!("{key} = {value}");
        }
        ConfigAction::List => {
            let config = Config::load()?;
            print!("{}", toml::to_string_pretty(&config).map_err(|e| e.to_string())?);
        }
    }
    Ok(())
}
