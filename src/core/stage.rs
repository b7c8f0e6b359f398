//! Stage registry - the ordered set of columns a board moves items through

use crate::board::BoardError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Presentation variant used for column accents and badges
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorToken {
    Brand,
    Violet,
    Sky,
    Amber,
    Emerald,
    Rose,
    Slate,
}

impl ColorToken {
    pub fn as_str(&self) -> &'static str {
        match self {
            ColorToken::Brand => "brand",
            ColorToken::Violet => "violet",
            ColorToken::Sky => "sky",
            ColorToken::Amber => "amber",
            ColorToken::Emerald => "emerald",
            ColorToken::Rose => "rose",
            ColorToken::Slate => "slate",
        }
    }
}

impl Default for ColorToken {
    fn default() -> Self {
        ColorToken::Slate
    }
}

/// Short identifier of a stage, unique within one board
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StageKey(String);

impl StageKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for StageKey {
    fn from(key: &str) -> Self {
        Self(key.to_string())
    }
}

impl PartialEq<str> for StageKey {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for StageKey {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// One column of a pipeline board
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stage {
    /// Grouping key, stable across renders
    pub key: StageKey,

    /// Human-readable column title
    pub label: String,

    /// Accent color of the column
    #[serde(default)]
    pub color: ColorToken,
}

impl Stage {
    pub fn new(key: &str, label: &str, color: ColorToken) -> Self {
        Self {
            key: StageKey::new(key),
            label: label.to_string(),
            color,
        }
    }
}

/// Ordered, immutable list of stages for one board
///
/// Display order is the order of construction. Adding or removing stages
/// is a configuration change, there is no runtime mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageRegistry {
    stages: Vec<Stage>,
}

impl StageRegistry {
    /// Build a registry, rejecting empty lists, blank keys and duplicates
    pub fn new(stages: Vec<Stage>) -> Result<Self, BoardError> {
        if stages.is_empty() {
            return Err(BoardError::EmptyRegistry);
        }

        let mut seen = std::collections::HashSet::new();
        for stage in &stages {
            if stage.key.as_str().trim().is_empty() {
                return Err(BoardError::InvalidStage("stage key must not be blank".to_string()));
            }
            if stage.label.trim().is_empty() {
                return Err(BoardError::InvalidStage(format!(
                    "stage '{}' has a blank label",
                    stage.key
                )));
            }
            if !seen.insert(stage.key.clone()) {
                return Err(BoardError::DuplicateStage(stage.key.to_string()));
            }
        }

        Ok(Self { stages })
    }

    /// Stage new items land in
    pub fn first(&self) -> &Stage {
        // Non-empty is checked in `new`
        &self.stages[0]
    }

    pub fn get(&self, key: &str) -> Option<&Stage> {
        self.stages.iter().find(|s| s.key == key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Column index of a stage
    pub fn position(&self, key: &str) -> Option<usize> {
        self.stages.iter().position(|s| s.key == key)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Stage> {
        self.stages.iter()
    }

    pub fn len(&self) -> usize {
        self.stages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &StageKey> {
        self.stages.iter().map(|s| &s.key)
    }
}

impl<'a> IntoIterator for &'a StageRegistry {
    type Item = &'a Stage;
    type IntoIter = std::slice::Iter<'a, Stage>;

    fn into_iter(self) -> Self::IntoIter {
        self.stages.iter()
    }
}
