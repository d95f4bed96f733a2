//! Sandboxed execution of model-authored code blocks.
//!
//! This module provides the capability-injection boundary: code bodies are
//! evaluated in an embedded JavaScript engine against a fixed, enumerated
//! set of named handles plus one fresh rendering surface per attempt. This
//! is a best-effort isolation boundary for semi-trusted model output, not a
//! security sandbox, and no resource or time limits are imposed.

pub mod capabilities;
pub mod runner;
pub mod surface;

pub use capabilities::CAPABILITY_NAMES;
pub use runner::{ExecutionResult, ExecutionSlot, Outcome, Runner};
pub use surface::{Artifact, RenderSurface};
