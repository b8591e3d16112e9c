//! Page range expression parsing
//!
//! Turns user text like "1-3, 5, 7-9" into a canonical set of zero-based
//! page indices.

use std::collections::BTreeSet;

/// Parse a one-based page range expression into sorted, unique,
/// zero-based page indices.
///
/// Tokens are split on commas; each token is either a single integer or
/// a `start-end` pair. Parsing is best-effort: malformed tokens
/// (non-numeric, reversed ranges) and pages outside `1..=page_count` are
/// silently skipped rather than raised as errors. The result is always
/// strictly ascending with no duplicates, regardless of token order.
///
/// An empty result means nothing in the expression selected a valid
/// page. Callers must treat that as a validation failure, not a no-op.
pub fn parse_page_ranges(expr: &str, page_count: u32) -> Vec<u32> {
    let mut indices = BTreeSet::new();

    for token in expr.split(',') {
        let token = token.trim();
        if token.is_empty() {
            continue;
        }

        if let Some((start, end)) = token.split_once('-') {
            let start: Option<u32> = start.trim().parse().ok();
            let end: Option<u32> = end.trim().parse().ok();
            if let (Some(start), Some(end)) = (start, end) {
                for page in start..=end {
                    if page >= 1 && page <= page_count {
                        indices.insert(page - 1);
                    }
                }
            }
        } else if let Ok(page) = token.parse::<u32>() {
            if page >= 1 && page <= page_count {
                indices.insert(page - 1);
            }
        }
    }

    indices.into_iter().collect()
}
