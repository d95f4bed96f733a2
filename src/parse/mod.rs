//! Text derivations over streaming response buffers.
//!
//! This module provides the two total, side-effect-free parsing passes of
//! the agent pipeline:
//!
//! - **Splitter**: derives reasoning/answer segments from the growing buffer
//! - **Blocks**: extracts executable fenced regions from finalized segments
//!
//! Neither pass has a failure path; malformed input degrades to a reasonable
//! default interpretation (all-reasoning, or all-prose).

pub mod blocks;
pub mod splitter;

pub use blocks::{extract, extract_tagged};
pub use splitter::derive;
