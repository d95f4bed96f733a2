//! Segment splitter for streaming response buffers.
//!
//! Splits a growing response buffer into reasoning and answer segments on
//! the first occurrence of a separator marker. The derivation is a pure
//! function over the full buffer, so it is safe to call after every arrival
//! increment: a separator split across two increments resolves correctly
//! once both are present, regardless of how the buffer was chunked.

use crate::core::Segments;

/// Derives reasoning/answer segments from a response buffer.
///
/// Splits on the **first** occurrence of `separator` only; any later
/// occurrence is included verbatim in the answer. While the separator has
/// not fully arrived the whole buffer is reasoning, so partial marker text
/// at the buffer's tail is displayed as "thinking" until completed.
///
/// Total over all inputs: there is no failure path, and malformed input
/// degrades to an all-reasoning interpretation. O(buffer length) per call.
///
/// # Arguments
///
/// * `buffer` - The full response buffer received so far.
/// * `separator` - The non-empty separator marker.
///
/// # Examples
///
/// ```
/// use abacus_rs::parse::splitter;
///
/// let segments = splitter::derive("No marker here", "===EQUALS===");
/// assert_eq!(segments.reasoning, "No marker here");
/// assert_eq!(segments.answer, "");
/// ```
#[must_use]
pub fn derive(buffer: &str, separator: &str) -> Segments {
    debug_assert!(!separator.is_empty(), "separator must be non-empty");

    buffer.find(separator).map_or_else(
        || Segments::reasoning_only(buffer.to_string()),
        |pos| Segments {
            reasoning: buffer[..pos].trim().to_string(),
            answer: buffer[pos + separator.len()..].trim().to_string(),
            separator_found: true,
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ANSWER_SEPARATOR;
    use proptest::prelude::*;
    use test_case::test_case;

    #[test_case("", "", "" ; "empty buffer")]
    #[test_case("===EQUALS===", "", "" ; "buffer equal to separator")]
    #[test_case("No marker here", "No marker here", "" ; "separator absent")]
    #[test_case("a===EQUALS===b", "a", "b" ; "simple split")]
    #[test_case("  pad  ===EQUALS===  out  ", "pad", "out" ; "both sides trimmed")]
    #[test_case("===EQUALS===answer only", "", "answer only" ; "empty reasoning")]
    #[test_case("reasoning===EQUALS===", "reasoning", "" ; "empty answer")]
    fn test_derive(buffer: &str, reasoning: &str, answer: &str) {
        let segments = derive(buffer, ANSWER_SEPARATOR);
        assert_eq!(segments.reasoning, reasoning);
        assert_eq!(segments.answer, answer);
    }

    #[test]
    fn test_first_occurrence_wins() {
        let segments = derive("r===EQUALS===a===EQUALS===b", ANSWER_SEPARATOR);
        assert_eq!(segments.reasoning, "r");
        // The second occurrence is part of the answer, verbatim
        assert_eq!(segments.answer, "a===EQUALS===b");
    }

    #[test]
    fn test_partial_separator_stays_in_reasoning() {
        // Scenario: the marker is split across two arrival increments
        let after_first = derive("Step 1: compute deriv===EQ", ANSWER_SEPARATOR);
        assert_eq!(after_first.reasoning, "Step 1: compute deriv===EQ");
        assert_eq!(after_first.answer, "");
        assert!(!after_first.separator_found);

        let full = derive("Step 1: compute deriv===EQUALS===Result is 4", ANSWER_SEPARATOR);
        assert_eq!(full.reasoning, "Step 1: compute deriv");
        assert_eq!(full.answer, "Result is 4");
        assert!(full.separator_found);
    }

    #[test]
    fn test_derive_is_idempotent() {
        let buffer = "work===EQUALS===done";
        assert_eq!(derive(buffer, ANSWER_SEPARATOR), derive(buffer, ANSWER_SEPARATOR));
    }

    proptest! {
        /// Derivation terminates and reconstructs the trim-normalized buffer
        /// around the first separator occurrence.
        #[test]
        fn prop_totality(s in ".{0,200}") {
            let segments = derive(&s, ANSWER_SEPARATOR);
            if let Some(pos) = s.find(ANSWER_SEPARATOR) {
                prop_assert!(segments.separator_found);
                prop_assert_eq!(segments.reasoning.as_str(), s[..pos].trim());
                prop_assert_eq!(segments.answer.as_str(), s[pos + ANSWER_SEPARATOR.len()..].trim());
            } else {
                prop_assert!(!segments.separator_found);
                prop_assert_eq!(segments.reasoning.as_str(), s.as_str());
                prop_assert_eq!(segments.answer.as_str(), "");
            }
        }

        /// Splitting the final buffer is independent of how it was chunked
        /// into arrival increments.
        #[test]
        fn prop_chunk_invariance(
            parts in proptest::collection::vec("[a-zA-Z=QULSE ]{0,12}", 0..8),
            cut in 0usize..40,
        ) {
            let full: String = parts.concat();
            let whole = derive(&full, ANSWER_SEPARATOR);

            // Rebuild through an arbitrary prefix boundary and re-derive;
            // only the final derivation matters and it must match.
            let cut = cut.min(full.len());
            let cut = (0..=cut).rev().find(|i| full.is_char_boundary(*i)).unwrap_or(0);
            let mut rebuilt = full[..cut].to_string();
            let _ = derive(&rebuilt, ANSWER_SEPARATOR);
            rebuilt.push_str(&full[cut..]);
            prop_assert_eq!(derive(&rebuilt, ANSWER_SEPARATOR), whole);
        }
    }
}
