use clap::{Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

use crate::models::Theme;

#[derive(Parser)]
#[command(author, version, about = "Keep a small ordered to-do list", long_about = None)]
pub struct Cli {
    /// Path to the SQLite database holding todos and theme
    #[arg(long, global = true, env = "KEEPER_DB", value_name = "PATH")]
    pub db: Option<PathBuf>,

    /// Write logs to this file instead of stderr
    #[arg(long, global = true, env = "KEEPER_LOG_FILE", value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List todos in display order
    List,
    /// Show total, completed and remaining counts
    Stats,
    /// Add a new todo
    Add {
        #[arg(value_name = "TEXT", num_args = 1.., required = true)]
        text: Vec<String>,
    },
    /// Toggle a todo between done and not done
    Toggle {
        /// Todo id or (fuzzy) text
        #[arg(value_name = "SELECTOR")]
        selector: String,
    },
    /// Replace the text of a todo
    Edit {
        #[arg(value_name = "SELECTOR")]
        selector: String,
        #[arg(value_name = "TEXT", num_args = 1.., required = true)]
        text: Vec<String>,
    },
    /// Delete a todo after confirmation
    Delete {
        #[arg(value_name = "SELECTOR")]
        selector: String,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
    /// Move a todo to the position of another one
    Reorder {
        #[arg(value_name = "SELECTOR")]
        selector: String,
        #[arg(value_name = "TARGET")]
        target: String,
    },
    /// Set the theme, or toggle it when no value is given
    Theme {
        #[arg(value_enum, value_name = "THEME")]
        value: Option<Theme>,
    },
    /// Reset all data (WARNING: restores the sample todos)
    Reset,
    /// Launch TUI interface
    Tui,
    /// Generate shell completions
    Completions {
        #[arg(value_enum, value_name = "SHELL")]
        shell: Shell,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_multi_word_text_and_flags() {
        let cli = Cli::try_parse_from(["keeper", "--db", "/tmp/k.db", "add", "Buy", "milk"]).unwrap();
        assert_eq!(cli.db, Some(PathBuf::from("/tmp/k.db")));
        match cli.command {
            Some(Commands::Add { text }) => assert_eq!(text.join(" "), "Buy milk"),
            _ => panic!("expected add"),
        }

        let cli = Cli::try_parse_from(["keeper", "delete", "12", "-y"]).unwrap();
        assert!(matches!(cli.command, Some(Commands::Delete { yes: true, .. })));
    }

    #[test]
    fn theme_accepts_only_light_or_dark() {
        let cli = Cli::try_parse_from(["keeper", "theme", "dark"]).unwrap();
        assert!(matches!(cli.command, Some(Commands::Theme { value: Some(Theme::Dark) })));

        let cli = Cli::try_parse_from(["keeper", "theme"]).unwrap();
        assert!(matches!(cli.command, Some(Commands::Theme { value: None })));

        assert!(Cli::try_parse_from(["keeper", "theme", "blue"]).is_err());
    }

    #[test]
    fn no_subcommand_is_allowed() {
        let cli = Cli::try_parse_from(["keeper"]).unwrap();
        assert!(cli.command.is_none());
    }
}
