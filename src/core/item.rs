//! Pipeline item domain model

use crate::board::form::FormDraft;
use crate::core::stage::StageKey;
use chrono::{DateTime, Utc};
use regex::{Regex, RegexBuilder};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Opaque item identifier, generated at creation and never reused
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(Uuid);

impl ItemId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn parse(s: &str) -> Result<Self, uuid::Error> {
        Uuid::parse_str(s).map(Self)
    }

    /// Short prefix shown in terminal output
    pub fn short(&self) -> String {
        self.0.to_string()[..8].to_string()
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Instance-specific fields carried by an item (grant, newsletter issue, ...)
pub trait ItemFields: FormDraft + fmt::Debug + Serialize + DeserializeOwned + Send + Sync + 'static {
    /// Name of the item type, used in logs
    const KIND: &'static str;

    /// Card title
    fn title(&self) -> &str;

    /// Label/value rows for the detail panel
    fn detail_rows(&self) -> Vec<(&'static str, String)>;

    /// Text fields considered by board search
    fn search_text(&self) -> Vec<&str>;

    /// Demo records as (stage key, fields), loaded into empty boards on request
    fn demo() -> Vec<(&'static str, Self)> {
        Vec::new()
    }
}

/// A record moving through the stages of one board
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineItem<F> {
    /// Unique identifier
    pub id: ItemId,

    /// Current column, always a key of the board's registry
    pub stage: StageKey,

    /// Instance-specific fields
    pub fields: F,

    /// When the item was created (keeps insertion order across reloads)
    pub created_at: DateTime<Utc>,
}

impl<F: ItemFields> PipelineItem<F> {
    pub fn new(fields: F, stage: StageKey) -> Self {
        Self {
            id: ItemId::generate(),
            stage,
            fields,
            created_at: Utc::now(),
        }
    }

    /// Copy of this item with the stage replaced
    pub fn with_stage(&self, stage: StageKey) -> Self {
        Self {
            stage,
            ..self.clone()
        }
    }

    /// Copy of this item with the fields replaced
    pub fn with_fields(&self, fields: F) -> Self {
        Self {
            fields,
            ..self.clone()
        }
    }
}

/// Search pattern applied to item text
#[derive(Debug, Clone)]
pub enum SearchPattern {
    /// Case-insensitive substring match
    Simple(String),
    /// Regular expression match
    Regex(Regex),
}

impl SearchPattern {
    /// Build a pattern
    ///
    /// # Errors
    /// Returns the compilation error when `use_regex` is set and `pattern`
    /// is not a valid regular expression.
    pub fn new(pattern: &str, use_regex: bool) -> Result<Self, regex::Error> {
        if use_regex {
            let regex = RegexBuilder::new(pattern).case_insensitive(true).build()?;
            Ok(SearchPattern::Regex(regex))
        } else {
            Ok(SearchPattern::Simple(pattern.to_lowercase()))
        }
    }

    pub fn matches(&self, text: &str) -> bool {
        match self {
            SearchPattern::Simple(pattern) => text.to_lowercase().contains(pattern),
            SearchPattern::Regex(regex) => regex.is_match(text),
        }
    }

    /// Whether any searchable field of the item matches
    pub fn matches_item<F: ItemFields>(&self, item: &PipelineItem<F>) -> bool {
        item.fields.search_text().iter().any(|text| self.matches(text))
    }
}
