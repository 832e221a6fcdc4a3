//! Fixed-size line pagination.
//!
//! Pages are windows of `lines_per_page` consecutive lines of
//! `text.split('\n')`, joined back with `\n`. Only the last page may be
//! shorter. A page size of zero is treated as one.

/// Lazy page iterator returned by [`paginate`].
#[derive(Debug, Clone)]
pub struct Pages<'a> {
    lines: Vec<&'a str>,
    lines_per_page: usize,
    next_line: usize,
}

impl<'a> Iterator for Pages<'a> {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        if self.next_line >= self.lines.len() {
            return None;
        }
        let end = (self.next_line + self.lines_per_page).min(self.lines.len());
        let page = self.lines[self.next_line..end].join("\n");
        self.next_line = end;
        Some(page)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = (self.lines.len() - self.next_line).div_ceil(self.lines_per_page);
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Pages<'_> {}

impl std::iter::FusedIterator for Pages<'_> {}

/// Split `text` into pages of `lines_per_page` lines.
pub fn paginate(text: &str, lines_per_page: usize) -> Pages<'_> {
    Pages {
        lines: text.split('\n').collect(),
        lines_per_page: lines_per_page.max(1),
        next_line: 0,
    }
}

/// Number of pages [`paginate`] would yield.
pub fn page_count(text: &str, lines_per_page: usize) -> usize {
    line_count(text).div_ceil(lines_per_page.max(1))
}

/// 0-based page holding `line_number`.
pub fn page_index_for_line(line_number: usize, lines_per_page: usize) -> usize {
    line_number / lines_per_page.max(1)
}

/// A page-sized window centred on `line_number`.
///
/// The line is clamped into the document. The window starts half a page
/// above it and is pulled back near the end so it stays full whenever the
/// document has enough lines.
pub fn page_around_line(text: &str, line_number: i64, lines_per_page: usize) -> String {
    let lines: Vec<&str> = text.split('\n').collect();
    let lines_per_page = lines_per_page.max(1);
    let last = lines.len() - 1;

    let line = usize::try_from(line_number.max(0)).unwrap_or(usize::MAX).min(last);
    let latest_full_start = lines.len().saturating_sub(lines_per_page);
    let start = line.saturating_sub(lines_per_page / 2).min(latest_full_start);
    let end = (start + lines_per_page).min(lines.len());

    lines[start..end].join("\n")
}

fn line_count(text: &str) -> usize {
    text.split('\n').count()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn numbered(n: usize) -> String {
        (0..n).map(|i| format!("L{}", i)).collect::<Vec<_>>().join("\n")
    }

    #[test]
    fn test_exact_multiple() {
        let text = numbered(90);
        let pages: Vec<String> = paginate(&text, 30).collect();
        assert_eq!(pages.len(), 3);
        assert!(pages.iter().all(|p| p.split('\n').count() == 30));
    }

    #[test]
    fn test_one_extra_line() {
        let text = numbered(91);
        let pages: Vec<String> = paginate(&text, 30).collect();
        assert_eq!(pages.len(), 4);
        assert_eq!(pages[3], "L90");
        assert_eq!(page_count(&text, 30), 4);
    }

    #[test]
    fn test_exact_size_and_restartable() {
        let text = numbered(10);
        let mut pages = paginate(&text, 4);
        assert_eq!(pages.len(), 3);
        let replay = pages.clone();
        assert_eq!(pages.next().as_deref(), Some("L0\nL1\nL2\nL3"));
        assert_eq!(pages.len(), 2);
        assert_eq!(replay.count(), 3);
    }

    #[test]
    fn test_zero_page_size_clamped() {
        let text = numbered(3);
        assert_eq!(paginate(&text, 0).count(), 3);
        assert_eq!(page_count(&text, 0), 3);
    }

    #[test]
    fn test_pages_rejoin_to_text() {
        let text = numbered(47);
        let joined = paginate(&text, 8).collect::<Vec<_>>().join("\n");
        assert_eq!(joined, text);
    }

    #[test]
    fn test_empty_text_is_one_empty_page() {
        let pages: Vec<String> = paginate("", 30).collect();
        assert_eq!(pages, vec![String::new()]);
    }

    #[test]
    fn test_page_index_for_line() {
        assert_eq!(page_index_for_line(0, 30), 0);
        assert_eq!(page_index_for_line(29, 30), 0);
        assert_eq!(page_index_for_line(30, 30), 1);
        assert_eq!(page_index_for_line(5, 0), 5);
    }

    #[test]
    fn test_page_around_line_centres() {
        let text = numbered(100);
        let page = page_around_line(&text, 50, 10);
        let lines: Vec<&str> = page.split('\n').collect();
        assert_eq!(lines.len(), 10);
        assert_eq!(lines[0], "L45");
        assert!(lines.contains(&"L50"));
    }

    #[test]
    fn test_page_around_line_clamps() {
        let text = numbered(100);
        let top = page_around_line(&text, -5, 10);
        assert!(top.starts_with("L0\n"));
        let bottom = page_around_line(&text, 10_000, 10);
        let lines: Vec<&str> = bottom.split('\n').collect();
        assert_eq!(lines.len(), 10);
        assert_eq!(lines[9], "L99");
    }

    #[test]
    fn test_page_around_line_short_document() {
        let text = numbered(3);
        assert_eq!(page_around_line(&text, 1, 30), text);
        assert_eq!(page_around_line("", 7, 30), "");
    }
}
