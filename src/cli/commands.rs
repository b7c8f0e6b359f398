//! CLI command definitions

use crate::core::{GrantFields, ItemFields, NewsletterFields};
use chrono::NaiveDate;
use clap::Args;
use std::path::PathBuf;

/// Show the board, one column per stage
#[derive(Debug, Args, Clone)]
pub struct ShowCommand {
    /// Only show items whose text matches
    #[arg(short, long)]
    pub search: Option<String>,

    /// Treat the search as a regular expression
    #[arg(long, requires = "search")]
    pub regex: bool,

    /// Output in JSON format
    #[arg(long)]
    pub json: bool,
}

/// Add an item to the first stage
#[derive(Debug, Args, Clone)]
pub struct AddCommand {
    #[command(flatten)]
    pub fields: FieldArgs,
}

/// Move an item to another stage
#[derive(Debug, Args, Clone)]
pub struct MoveCommand {
    /// Item id (a unique prefix is enough)
    pub id: String,

    /// Target stage key
    pub stage: String,

    /// Apply as a drag-and-drop gesture instead of a detail-panel button
    #[arg(long)]
    pub drag: bool,
}

/// Edit an item's fields
#[derive(Debug, Args, Clone)]
pub struct EditCommand {
    /// Item id (a unique prefix is enough)
    pub id: String,

    #[command(flatten)]
    pub fields: FieldArgs,
}

/// Remove an item
#[derive(Debug, Args, Clone)]
pub struct RemoveCommand {
    /// Item id (a unique prefix is enough)
    pub id: String,
}

/// Show one item with its "move to" targets
#[derive(Debug, Args, Clone)]
pub struct DetailCommand {
    /// Item id (a unique prefix is enough)
    pub id: String,

    /// Output in JSON format
    #[arg(long)]
    pub json: bool,
}

/// Validate a board configuration
#[derive(Debug, Args, Clone)]
pub struct ValidateCommand {
    /// Path to board YAML file
    #[arg(short, long)]
    pub file: PathBuf,

    /// Output in JSON format
    #[arg(long)]
    pub json: bool,
}

/// Render an event month
#[derive(Debug, Args, Clone)]
pub struct CalendarCommand {
    /// Month to show as YYYY-MM (defaults to the current month)
    #[arg(short, long, value_parser = parse_month)]
    pub month: Option<(i32, u32)>,

    /// Start weeks on Sunday instead of Monday
    #[arg(long)]
    pub sunday_first: bool,

    /// Number of upcoming events to list under the grid
    #[arg(long, default_value_t = 5)]
    pub upcoming: usize,
}

/// Chat with the assistant endpoint
#[derive(Debug, Args, Clone)]
pub struct ChatCommand {
    /// Send one message and exit; interactive when omitted
    pub message: Vec<String>,

    /// Endpoint URL (overrides config and PIPEBOARD_CHAT_URL)
    #[arg(short, long)]
    pub endpoint: Option<String>,

    /// Request timeout in seconds
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Send only the most recent N messages
    #[arg(long)]
    pub window: Option<usize>,
}

/// Item fields shared by `add` and `edit`
///
/// Flags map onto the board's item type; see [`ApplyFields`].
#[derive(Debug, Args, Clone, Default)]
pub struct FieldArgs {
    /// Grant foundation or newsletter title
    #[arg(short, long)]
    pub title: Option<String>,

    /// Requested amount in CHF (grants)
    #[arg(long)]
    pub amount: Option<u64>,

    /// Grant deadline or newsletter send date (YYYY-MM-DD or DD.MM.YYYY)
    #[arg(long, value_parser = parse_date)]
    pub date: Option<NaiveDate>,

    /// Grant contact or newsletter author
    #[arg(long)]
    pub contact: Option<String>,

    /// Grant notes or newsletter summary
    #[arg(long)]
    pub notes: Option<String>,
}

/// Copy the given flags onto a form draft, leaving other fields alone
pub trait ApplyFields: ItemFields {
    fn apply(&mut self, args: &FieldArgs);
}

impl ApplyFields for GrantFields {
    fn apply(&mut self, args: &FieldArgs) {
        if let Some(title) = &args.title {
            self.foundation = title.clone();
        }
        if let Some(amount) = args.amount {
            self.amount = amount;
        }
        if args.date.is_some() {
            self.deadline = args.date;
        }
        if let Some(contact) = &args.contact {
            self.contact = contact.clone();
        }
        if let Some(notes) = &args.notes {
            self.notes = notes.clone();
        }
    }
}

impl ApplyFields for NewsletterFields {
    fn apply(&mut self, args: &FieldArgs) {
        if let Some(title) = &args.title {
            self.title = title.clone();
        }
        if args.date.is_some() {
            self.scheduled_for = args.date;
        }
        if let Some(contact) = &args.contact {
            self.author = contact.clone();
        }
        if let Some(notes) = &args.notes {
            self.summary = notes.clone();
        }
    }
}

/// Parse YYYY-MM-DD or the Swiss DD.MM.YYYY
pub fn parse_date(s: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(s, "%d.%m.%Y"))
        .map_err(|_| format!("Invalid date: {} (expected YYYY-MM-DD or DD.MM.YYYY)", s))
}

/// Parse YYYY-MM
pub fn parse_month(s: &str) -> Result<(i32, u32), String> {
    let (year, month) = s
        .split_once('-')
        .ok_or_else(|| format!("Invalid month: {} (expected YYYY-MM)", s))?;
    let year: i32 = year.parse().map_err(|_| format!("Invalid year in {}", s))?;
    let month: u32 = month.parse().map_err(|_| format!("Invalid month in {}", s))?;
    if !(1..=12).contains(&month) {
        return Err(format!("Month out of range: {}", month));
    }
    Ok((year, month))
}
