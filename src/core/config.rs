//! Board configuration from YAML

use crate::core::{
    presets,
    stage::{ColorToken, Stage, StageKey, StageRegistry},
};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Which built-in item type a board carries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum BoardKind {
    /// Fundraising grants pipeline
    Grants,
    /// Newsletter editorial flow
    Newsletter,
}

impl BoardKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            BoardKind::Grants => "grants",
            BoardKind::Newsletter => "newsletter",
        }
    }

    /// Stages used when the config does not list its own
    pub fn default_stages(&self) -> Vec<Stage> {
        match self {
            BoardKind::Grants => presets::grant_stages(),
            BoardKind::Newsletter => presets::newsletter_stages(),
        }
    }
}

/// Top-level board configuration loaded from YAML
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoardConfig {
    /// Board name, also the persistence namespace
    pub name: String,

    /// Item type carried by the board
    pub kind: BoardKind,

    /// Ordered stages; the built-in set for `kind` when omitted
    #[serde(default)]
    pub stages: Vec<StageConfig>,

    /// Load the demo items into an empty board
    #[serde(default)]
    pub seed_demo: bool,

    /// Chat endpoint settings
    #[serde(default)]
    pub chat: Option<ChatSettings>,
}

/// Stage as written in YAML
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StageConfig {
    pub key: String,

    pub label: String,

    #[serde(default)]
    pub color: ColorToken,
}

/// Chat endpoint settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatSettings {
    /// URL the conversation is POSTed to
    pub endpoint: String,

    /// Request timeout in seconds
    #[serde(default)]
    pub timeout_secs: Option<u64>,

    /// Send only the most recent N messages (full history when unset)
    #[serde(default)]
    pub history_window: Option<usize>,
}

impl BoardConfig {
    /// Configuration of a built-in board with its default stages
    pub fn builtin(kind: BoardKind) -> Self {
        Self {
            name: kind.as_str().to_string(),
            kind,
            stages: Vec::new(),
            seed_demo: true,
            chat: None,
        }
    }

    /// Load board configuration from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read board config: {}", path.display()))?;
        Self::from_yaml(&content)
    }

    /// Parse board configuration from YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: BoardConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the board configuration
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            anyhow::bail!("Board name must not be empty");
        }

        // Registry construction checks emptiness and duplicate keys
        self.to_registry()?;

        if let Some(chat) = &self.chat {
            if chat.endpoint.trim().is_empty() {
                anyhow::bail!("Board '{}' has an empty chat endpoint", self.name);
            }
            if chat.history_window == Some(0) {
                anyhow::bail!("Board '{}' chat history_window must be at least 1", self.name);
            }
        }

        Ok(())
    }

    /// Effective stage list
    pub fn stages(&self) -> Vec<Stage> {
        if self.stages.is_empty() {
            return self.kind.default_stages();
        }

        self.stages
            .iter()
            .map(|s| Stage {
                key: StageKey::new(s.key.trim()),
                label: s.label.clone(),
                color: s.color,
            })
            .collect()
    }

    /// Build the stage registry for this board
    pub fn to_registry(&self) -> Result<StageRegistry> {
        StageRegistry::new(self.stages())
            .with_context(|| format!("Invalid stages for board '{}'", self.name))
    }
}
