use anyhow::{Context, Result};
use std::fs::OpenOptions;
use std::path::PathBuf;

use crate::cli::{Cli, Commands};
use crate::database::default_db_path;

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub db_path: PathBuf,
    pub log_file: Option<PathBuf>,
}

impl Config {
    pub fn from_cli(cli: &Cli) -> Self {
        let interactive = matches!(cli.command, None | Some(Commands::Tui));
        let log_file = cli
            .log_file
            .clone()
            .or_else(|| interactive.then(default_log_path));

        Config {
            db_path: cli.db.clone().unwrap_or_else(default_db_path),
            log_file,
        }
    }
}

fn default_log_path() -> PathBuf {
    let home_dir = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
    PathBuf::from(home_dir).join(".keeper.log")
}

/// Installs the env_logger backend. `RUST_LOG` overrides the default `warn` level.
pub fn init_logging(config: &Config) -> Result<()> {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));

    if let Some(path) = &config.log_file {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .with_context(|| format!("Failed to open log file {}", path.display()))?;
        builder.target(env_logger::Target::Pipe(Box::new(file)));
    }

    builder.init();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn tui_logs_to_file_by_default() {
        let cli = Cli::try_parse_from(["keeper", "--db", "x.db", "tui"]).unwrap();
        let config = Config::from_cli(&cli);
        assert_eq!(config.db_path, PathBuf::from("x.db"));
        assert!(config.log_file.is_some());
    }

    #[test]
    fn commands_log_to_stderr_unless_asked() {
        let cli = Cli::try_parse_from(["keeper", "--db", "x.db", "list"]).unwrap();
        assert_eq!(Config::from_cli(&cli).log_file, None);

        let cli = Cli::try_parse_from(["keeper", "--db", "x.db", "--log-file", "k.log", "list"]).unwrap();
        assert_eq!(Config::from_cli(&cli).log_file, Some(PathBuf::from("k.log")));
    }
}
