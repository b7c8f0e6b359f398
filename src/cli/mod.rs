//! Command-line interface

pub mod commands;
pub mod output;

use crate::core::BoardKind;
use clap::{Parser, Subcommand};
use commands::{
    AddCommand, CalendarCommand, ChatCommand, DetailCommand, EditCommand, MoveCommand, RemoveCommand,
    ShowCommand, ValidateCommand,
};
use std::ffi::OsString;
use std::path::PathBuf;

/// Pipeline boards, event calendar and chat for the parent-support back-office
#[derive(Debug, Parser, Clone)]
#[command(name = "pipeboard")]
#[command(version)]
#[command(about = "Stage pipeline boards, event calendar and chat", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to board configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Built-in board to use when no config file is given
    #[arg(short, long, global = true, value_enum, default_value_t = BoardKind::Grants)]
    pub kind: BoardKind,

    /// Keep items in memory only
    #[arg(long, global = true)]
    pub no_persist: bool,

    /// Database file (defaults to the user data directory)
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,
}

/// Available commands
#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Show the board
    Show(ShowCommand),

    /// Add an item
    Add(AddCommand),

    /// Move an item to another stage
    Move(MoveCommand),

    /// Edit an item
    Edit(EditCommand),

    /// Remove an item
    Remove(RemoveCommand),

    /// Show one item in detail
    Detail(DetailCommand),

    /// List the board's stages
    Stages,

    /// Validate a board configuration
    Validate(ValidateCommand),

    /// Render the event calendar
    Calendar(CalendarCommand),

    /// Chat with the assistant
    Chat(ChatCommand),
}

impl Cli {
    /// Parse CLI arguments from environment
    pub fn from_args() -> Self {
        Self::parse()
    }

    /// Parse CLI arguments from a slice
    pub fn try_parse_from<I, T>(itr: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        <Self as Parser>::try_parse_from(itr)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_move() {
        let cli = Cli::try_parse_from(["pipeboard", "move", "1a2b", "submitted", "--drag"]).unwrap();
        match cli.command {
            Command::Move(cmd) => {
                assert_eq!(cmd.id, "1a2b");
                assert_eq!(cmd.stage, "submitted");
                assert!(cmd.drag);
            }
            other => panic!("Expected move, got {:?}", other),
        }
        assert_eq!(cli.kind, BoardKind::Grants);
    }

    #[test]
    fn test_parse_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "pipeboard",
            "add",
            "--title",
            "Wintergruss",
            "--kind",
            "newsletter",
            "--no-persist",
        ])
        .unwrap();
        assert_eq!(cli.kind, BoardKind::Newsletter);
        assert!(cli.no_persist);
        match cli.command {
            Command::Add(cmd) => assert_eq!(cmd.fields.title.as_deref(), Some("Wintergruss")),
            other => panic!("Expected add, got {:?}", other),
        }
    }

    #[test]
    fn test_regex_requires_search() {
        assert!(Cli::try_parse_from(["pipeboard", "show", "--regex"]).is_err());
    }

    #[test]
    fn test_calendar_month_validated() {
        assert!(Cli::try_parse_from(["pipeboard", "calendar", "--month", "2026-13"]).is_err());
        let cli = Cli::try_parse_from(["pipeboard", "calendar", "--month", "2026-11"]).unwrap();
        match cli.command {
            Command::Calendar(cmd) => assert_eq!(cmd.month, Some((2026, 11))),
            other => panic!("Expected calendar, got {:?}", other),
        }
    }
}
