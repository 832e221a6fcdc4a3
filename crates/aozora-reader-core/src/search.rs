//! Exact keyword search over line-addressed plain text.
//!
//! # Algorithm
//!
//! 1. Split the text on `\n`; line numbers are 0-based indices.
//! 2. Scan each line for non-overlapping occurrences of the keyword,
//!    resuming after the end of each match.
//! 3. Report each match with its char column and a context window of
//!    `radius` chars on either side, clamped to the line.
//!
//! Matching is case-sensitive and literal. An empty keyword matches
//! nothing.

use crate::models::SearchMatch;

/// Context chars kept on each side of a match by [`search`].
pub const DEFAULT_CONTEXT_RADIUS: usize = 20;

/// Find every occurrence of `keyword` in `text`.
pub fn search(text: &str, keyword: &str) -> Vec<SearchMatch> {
    search_with_radius(text, keyword, DEFAULT_CONTEXT_RADIUS)
}

/// [`search`] with a custom context radius.
pub fn search_with_radius(text: &str, keyword: &str, radius: usize) -> Vec<SearchMatch> {
    if keyword.is_empty() {
        return Vec::new();
    }

    let keyword_chars = keyword.chars().count();
    let mut results = Vec::new();

    for (line_number, line) in text.split('\n').enumerate() {
        for (byte_pos, _) in line.match_indices(keyword) {
            let column_number = line[..byte_pos].chars().count();
            let from = column_number.saturating_sub(radius);
            let to = column_number + keyword_chars + radius;
            let context: String = line.chars().skip(from).take(to - from).collect();

            results.push(SearchMatch {
                line_number,
                column_number,
                context,
            });
        }
    }

    results
}
