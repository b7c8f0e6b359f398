//! Built-in board instances: fundraising grants and the newsletter editorial flow

use crate::board::{form::FormDraft, BoardError};
use crate::core::{
    item::ItemFields,
    stage::{ColorToken, Stage, StageRegistry},
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A grant application tracked on the fundraising board
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GrantFields {
    /// Foundation or donor name (required)
    pub foundation: String,

    /// Requested amount in CHF
    #[serde(default)]
    pub amount: u64,

    /// Submission deadline
    #[serde(default)]
    pub deadline: Option<NaiveDate>,

    /// Contact person at the foundation
    #[serde(default)]
    pub contact: String,

    #[serde(default)]
    pub notes: String,
}

impl GrantFields {
    pub fn new(foundation: &str, amount: u64) -> Self {
        Self {
            foundation: foundation.to_string(),
            amount,
            ..Default::default()
        }
    }
}

impl FormDraft for GrantFields {
    fn required_present(&self) -> bool {
        !self.foundation.trim().is_empty()
    }
}

impl ItemFields for GrantFields {
    const KIND: &'static str = "grant";

    fn title(&self) -> &str {
        &self.foundation
    }

    fn detail_rows(&self) -> Vec<(&'static str, String)> {
        vec![
            ("Foundation", self.foundation.clone()),
            ("Amount", format_chf(self.amount)),
            (
                "Deadline",
                self.deadline.map(|d| d.format("%d.%m.%Y").to_string()).unwrap_or_else(|| "-".to_string()),
            ),
            ("Contact", or_dash(&self.contact)),
            ("Notes", or_dash(&self.notes)),
        ]
    }

    fn search_text(&self) -> Vec<&str> {
        vec![self.foundation.as_str(), self.contact.as_str(), self.notes.as_str()]
    }

    fn demo() -> Vec<(&'static str, Self)> {
        seed_grants()
    }
}

/// A newsletter issue moving through the editorial flow
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewsletterFields {
    /// Issue title (required)
    pub title: String,

    #[serde(default)]
    pub author: String,

    /// Planned send date
    #[serde(default)]
    pub scheduled_for: Option<NaiveDate>,

    #[serde(default)]
    pub summary: String,
}

impl NewsletterFields {
    pub fn new(title: &str, author: &str) -> Self {
        Self {
            title: title.to_string(),
            author: author.to_string(),
            ..Default::default()
        }
    }
}

impl FormDraft for NewsletterFields {
    fn required_present(&self) -> bool {
        !self.title.trim().is_empty()
    }
}

impl ItemFields for NewsletterFields {
    const KIND: &'static str = "newsletter issue";

    fn title(&self) -> &str {
        &self.title
    }

    fn detail_rows(&self) -> Vec<(&'static str, String)> {
        vec![
            ("Title", self.title.clone()),
            ("Author", or_dash(&self.author)),
            (
                "Scheduled",
                self.scheduled_for.map(|d| d.format("%d.%m.%Y").to_string()).unwrap_or_else(|| "-".to_string()),
            ),
            ("Summary", or_dash(&self.summary)),
        ]
    }

    fn search_text(&self) -> Vec<&str> {
        vec![self.title.as_str(), self.author.as_str(), self.summary.as_str()]
    }

    fn demo() -> Vec<(&'static str, Self)> {
        seed_newsletter()
    }
}

fn or_dash(value: &str) -> String {
    if value.trim().is_empty() {
        "-".to_string()
    } else {
        value.to_string()
    }
}

/// Format an amount with Swiss thousands separators, e.g. `CHF 15'000`
pub fn format_chf(amount: u64) -> String {
    let digits = amount.to_string();
    let mut out = String::new();
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push('\'');
        }
        out.push(ch);
    }
    format!("CHF {}", out)
}

/// Stages of the fundraising grants board
pub fn grant_stages() -> Vec<Stage> {
    vec![
        Stage::new("research", "Research", ColorToken::Slate),
        Stage::new("contacted", "Contacted", ColorToken::Sky),
        Stage::new("submitted", "Submitted", ColorToken::Violet),
        Stage::new("approved", "Approved", ColorToken::Emerald),
        Stage::new("rejected", "Rejected", ColorToken::Rose),
    ]
}

/// Stages of the newsletter editorial board
pub fn newsletter_stages() -> Vec<Stage> {
    vec![
        Stage::new("idea", "Idea", ColorToken::Slate),
        Stage::new("draft", "Draft", ColorToken::Sky),
        Stage::new("review", "Review", ColorToken::Amber),
        Stage::new("scheduled", "Scheduled", ColorToken::Violet),
        Stage::new("sent", "Sent", ColorToken::Brand),
    ]
}

pub fn grant_registry() -> Result<StageRegistry, BoardError> {
    StageRegistry::new(grant_stages())
}

pub fn newsletter_registry() -> Result<StageRegistry, BoardError> {
    StageRegistry::new(newsletter_stages())
}

/// Demo grants, as (stage, fields)
pub fn seed_grants() -> Vec<(&'static str, GrantFields)> {
    vec![
        (
            "research",
            GrantFields {
                foundation: "Ernst Göhner Stiftung".to_string(),
                amount: 25_000,
                deadline: NaiveDate::from_ymd_opt(2026, 11, 30),
                contact: "Sekretariat".to_string(),
                notes: "Family support programme".to_string(),
            },
        ),
        (
            "contacted",
            GrantFields {
                foundation: "Pro Juventute".to_string(),
                amount: 15_000,
                deadline: NaiveDate::from_ymd_opt(2026, 12, 15),
                contact: "M. Keller".to_string(),
                notes: String::new(),
            },
        ),
        (
            "submitted",
            GrantFields {
                foundation: "Stiftung Kinderhilfe".to_string(),
                amount: 8_000,
                deadline: None,
                contact: String::new(),
                notes: "Parent café in Bern".to_string(),
            },
        ),
    ]
}

/// Demo newsletter issues, as (stage, fields)
pub fn seed_newsletter() -> Vec<(&'static str, NewsletterFields)> {
    vec![
        ("idea", NewsletterFields::new("Kangaroo care at home", "")),
        (
            "draft",
            NewsletterFields {
                title: "Winter issue".to_string(),
                author: "Redaktion".to_string(),
                scheduled_for: NaiveDate::from_ymd_opt(2026, 12, 1),
                summary: "Events, peer groups and a NICU parent story".to_string(),
            },
        ),
    ]
}
