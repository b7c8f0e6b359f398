//! Core domain models for pipeline boards
//!
//! This module defines stages, the items that move through them, board
//! configuration and the built-in grant/newsletter instances.

pub mod config;
pub mod item;
pub mod presets;
pub mod stage;

pub use config::{BoardConfig, BoardKind};
pub use item::*;
pub use presets::{GrantFields, NewsletterFields};
pub use stage::*;
