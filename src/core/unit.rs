//! Content units produced by scanning segment text for executable fences.
//!
//! A segment splits into an ordered sequence of prose and executable units.
//! Each unit keeps the byte span it was parsed from, so concatenating the
//! raw spans of all units reconstructs the segment text exactly.

use serde::{Deserialize, Serialize};
use std::ops::Range;

/// Language tag that marks a fenced region as executable.
///
/// Fenced regions must carry this literal immediately after the opening
/// fence marker to be recognized; any other tag is left as prose.
pub const EXEC_TAG: &str = "javascript:exec";

/// One parsed unit of segment text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ContentUnit {
    /// Plain prose between (or around) executable regions.
    Prose {
        /// Trimmed prose text for display.
        text: String,
        /// Raw byte span in the source segment, including surrounding
        /// whitespace.
        span: Range<usize>,
    },

    /// One executable fenced region.
    Executable {
        /// Trimmed code body, fences stripped.
        code: String,
        /// Raw byte span in the source segment, including both fences.
        span: Range<usize>,
    },
}

impl ContentUnit {
    /// Returns the raw byte span of this unit in its source segment.
    #[must_use]
    pub const fn span(&self) -> &Range<usize> {
        match self {
            Self::Prose { span, .. } | Self::Executable { span, .. } => span,
        }
    }

    /// Returns true for executable units.
    #[must_use]
    pub const fn is_executable(&self) -> bool {
        matches!(self, Self::Executable { .. })
    }

    /// Returns the display text: trimmed prose, or the code body.
    #[must_use]
    pub fn text(&self) -> &str {
        match self {
            Self::Prose { text, .. } => text,
            Self::Executable { code, .. } => code,
        }
    }
}
