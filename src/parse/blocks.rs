//! Executable block extraction from finalized segment text.
//!
//! Scans a segment for fenced regions tagged as executable and splits it
//! into an ordered sequence of alternating prose and code units. The scan is
//! total and side-effect-free: malformed or unterminated fences degrade to
//! prose, and re-running on the same text yields an identical sequence.

use crate::core::unit::{ContentUnit, EXEC_TAG};

/// Fence marker delimiting code regions.
const FENCE: &str = "```";

/// Extracts content units from segment text using the standard
/// [`EXEC_TAG`] language tag.
///
/// Each opening fence pairs with the **nearest following** closing fence.
/// An opening fence with no closing fence before end of text is not a
/// block: the whole remainder joins the current prose run.
///
/// # Examples
///
/// ```
/// use abacus_rs::parse::blocks;
///
/// let units = blocks::extract("Sum:\n```javascript:exec\nreturn 1+2;\n```\n");
/// assert_eq!(units.len(), 3);
/// assert_eq!(units[1].text(), "return 1+2;");
/// ```
#[must_use]
pub fn extract(segment: &str) -> Vec<ContentUnit> {
    extract_tagged(segment, EXEC_TAG)
}

/// Extracts content units for an arbitrary executable language tag.
///
/// # Arguments
///
/// * `segment` - Segment text to scan.
/// * `tag` - Language tag expected immediately after the opening fence.
#[must_use]
pub fn extract_tagged(segment: &str, tag: &str) -> Vec<ContentUnit> {
    let open_marker = format!("{FENCE}{tag}");
    let mut units = Vec::new();
    let mut prose_start = 0usize;
    let mut search_from = 0usize;

    while let Some(rel) = segment[search_from..].find(&open_marker) {
        let open_start = search_from + rel;
        let tag_end = open_start + open_marker.len();

        // The tag must end here: anything but whitespace after it means a
        // longer, unrecognized tag, which stays prose.
        match segment[tag_end..].chars().next() {
            Some(c) if c.is_whitespace() => {}
            Some(_) => {
                search_from = tag_end;
                continue;
            }
            None => break,
        }

        let Some(close_rel) = segment[tag_end..].find(FENCE) else {
            // Unterminated opening fence: remainder joins the prose run
            break;
        };
        let close_start = tag_end + close_rel;
        let unit_end = close_start + FENCE.len();

        if open_start > prose_start {
            units.push(prose_unit(segment, prose_start, open_start));
        }
        units.push(ContentUnit::Executable {
            code: segment[tag_end..close_start].trim().to_string(),
            span: open_start..unit_end,
        });

        prose_start = unit_end;
        search_from = unit_end;
    }

    if prose_start < segment.len() {
        units.push(prose_unit(segment, prose_start, segment.len()));
    }

    units
}

/// Builds a prose unit over the given raw span, trimming the display text.
fn prose_unit(segment: &str, start: usize, end: usize) -> ContentUnit {
    ContentUnit::Prose {
        text: segment[start..end].trim().to_string(),
        span: start..end,
    }
}
