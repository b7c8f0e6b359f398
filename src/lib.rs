//! pipeboard - stage pipeline boards, event calendar and chat client

pub mod board;
pub mod calendar;
pub mod chat;
pub mod cli;
pub mod core;
pub mod persistence;

// Re-export commonly used types
pub use board::{Board, BoardError, BoardEvent, BoardView, DragController, FormModal, Transition, TransitionSource};
pub use calendar::{CalendarError, CalendarEvent, EventList, MonthGrid, WeekStart};
pub use chat::{ChatBackend, ChatError, ChatMessage, ChatSession, HttpChatClient};
pub use crate::core::{BoardConfig, BoardKind, GrantFields, NewsletterFields, PipelineItem, Stage, StageKey, StageRegistry};
pub use persistence::{InMemoryPersistence, PersistenceBackend};
