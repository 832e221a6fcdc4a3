//! Size statistics for normalized text.

use crate::models::TextStats;

/// Count chars, lines and blank-line separated paragraphs of `text`.
///
/// `average_line_length` is the rounded mean char count per line.
pub fn text_stats(text: &str) -> TextStats {
    let characters = text.chars().count();
    let lines = if text.is_empty() {
        0
    } else {
        text.split('\n').count()
    };

    let mut paragraphs = 0;
    let mut in_paragraph = false;
    for line in text.split('\n') {
        if line.trim().is_empty() {
            in_paragraph = false;
        } else if !in_paragraph {
            paragraphs += 1;
            in_paragraph = true;
        }
    }

    let line_chars: usize = text.split('\n').map(|l| l.chars().count()).sum();
    let average_line_length = if lines == 0 {
        0
    } else {
        (line_chars + lines / 2) / lines
    };

    TextStats {
        characters,
        lines,
        paragraphs,
        average_line_length,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts() {
        let stats = text_stats("一二三\n四五\n\n六");
        assert_eq!(stats.characters, 9);
        assert_eq!(stats.lines, 4);
        assert_eq!(stats.paragraphs, 2);
        // 6 chars over 4 lines rounds to 2.
        assert_eq!(stats.average_line_length, 2);
    }

    #[test]
    fn test_whitespace_lines_separate_paragraphs() {
        assert_eq!(text_stats("あ\n　\nい\n \nう").paragraphs, 3);
    }

    #[test]
    fn test_empty() {
        let stats = text_stats("");
        assert_eq!(stats.characters, 0);
        assert_eq!(stats.lines, 0);
        assert_eq!(stats.paragraphs, 0);
        assert_eq!(stats.average_line_length, 0);
    }
}
