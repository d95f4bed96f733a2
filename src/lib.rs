//! # abacus-rs
//!
//! Agentic calculator REPL.
//!
//! abacus-rs evaluates expressions directly, and in agent mode streams a
//! model reply token by token, splits it into reasoning and answer segments
//! on a separator marker, extracts fenced code regions tagged as
//! executable, and runs each region exactly once against a fixed capability
//! set with a fresh rendering surface per block.
//!
//! ## Features
//!
//! - **Streaming segmentation**: reasoning/answer derivation re-run on every
//!   arrival increment, chunk-boundary safe
//! - **Executable blocks**: fenced `javascript:exec` regions, at-most-once
//!   execution, per-block failure isolation
//! - **Capability sandbox**: embedded JavaScript engine bound to an explicit
//!   set of math, statistics, and drawing handles
//! - **Manual mode**: direct expression evaluation with a bounded history

#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![warn(missing_docs)]
#![warn(unsafe_code)]

pub mod agent;
pub mod calc;
pub mod cli;
pub mod core;
pub mod error;
pub mod exec;
pub mod parse;
pub mod provider;
pub mod stream;

// Re-export commonly used types at crate root
pub use error::{Error, Result};

// Re-export core domain types
pub use self::core::{
    ANSWER_SEPARATOR, ChatMessage, ContentUnit, EXEC_TAG, EntryKind, HISTORY_CAP, History,
    HistoryEntry, RenderedUnit, Role, Segments,
};

// Re-export agent types
pub use agent::{AGENT_SYSTEM_PROMPT, Conversation, PromptSet, TRANSPORT_NOTICE, run_turn};

// Re-export execution types
pub use exec::{
    Artifact, CAPABILITY_NAMES, ExecutionResult, ExecutionSlot, Outcome, RenderSurface, Runner,
};

// Re-export calculator types
pub use calc::CalcValue;

// Re-export streaming types
pub use stream::{FragmentStream, Increment, TokenStreamAdapter};

// Re-export provider types
pub use provider::{ModelProvider, ScriptedFragment, ScriptedProvider};
#[cfg(feature = "openai")]
pub use provider::OpenAiProvider;

// Re-export CLI types
pub use cli::{Cli, Commands, OutputFormat};
