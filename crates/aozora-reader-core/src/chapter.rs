//! Chapter detection over line-addressed plain text.
//!
//! A chapter starts at any line that opens with an ordinal heading such as
//! `第一章`, `第３話` or `第十二回`, optionally indented. Each chapter runs
//! until the line before the next one; the last runs to the end of the text.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::models::Chapter;

static RE_CHAPTER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[\s　]*第[〇一二三四五六七八九十百千万零壱弐参0-9０-９]+[章節話回部編幕]").unwrap()
});

/// Whether `line` opens with a chapter heading.
pub fn is_chapter_heading(line: &str) -> bool {
    RE_CHAPTER.is_match(line)
}

/// Detect chapters in `text`, in line order.
///
/// Line indices address `text.split('\n')`. Repeated headings are all kept.
pub fn chapters(text: &str) -> Vec<Chapter> {
    let lines: Vec<&str> = text.split('\n').collect();
    let last_line = lines.len().saturating_sub(1);

    let starts: Vec<(usize, &str)> = lines
        .iter()
        .enumerate()
        .filter(|(_, line)| is_chapter_heading(line))
        .map(|(i, line)| (i, line.trim()))
        .collect();

    starts
        .iter()
        .enumerate()
        .map(|(k, &(start_line, title))| {
            let end_line = match starts.get(k + 1) {
                Some(&(next, _)) => next.saturating_sub(1).max(start_line),
                None => last_line,
            };
            Chapter {
                title: title.to_string(),
                start_line,
                end_line,
            }
        })
        .collect()
}
