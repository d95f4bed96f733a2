//! Core domain models for abacus-rs.
//!
//! This module contains the fundamental data structures used throughout the
//! calculator: conversation messages, derived segments, content units, and
//! the calculation history. These are pure domain models with no I/O
//! dependencies.

pub mod history;
pub mod message;
pub mod segment;
pub mod unit;

pub use history::{EntryKind, HISTORY_CAP, History, HistoryEntry};
pub use message::{ChatMessage, RenderedUnit, Role};
pub use segment::{ANSWER_SEPARATOR, Segments};
pub use unit::{ContentUnit, EXEC_TAG};
