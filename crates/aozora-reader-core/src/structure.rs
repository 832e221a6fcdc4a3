//! Header / body / colophon splitting for Aozora Bunko texts.
//!
//! An Aozora text opens with a short preamble (title, author), followed by a
//! legend of the markup symbols fenced between two rule lines of dashes.
//! The body follows the second rule line and ends where the colophon
//! (`底本：`, the source edition) begins.
//!
//! ```text
//! 羅生門
//! 芥川龍之介
//!
//! -------------------------------------------------------
//! 【テキスト中に現れる記号について】
//! 《》：ルビ
//! -------------------------------------------------------
//!
//! 　ある日の暮方の事である。…
//!
//! 底本：「芥川龍之介全集1」ちくま文庫、筑摩書房
//! ```
//!
//! The colophon marker only counts at the start of a line, so prose that
//! merely mentions the phrase stays in the body. Colophons that cite more
//! than one source edition are cut at the earliest such line.
//!
//! Dividers are whole lines of dashes. Fewer than two means "no header" and
//! the whole text is body. Divider lines past the header pair are dropped
//! from the body, so parsing a stripped body again changes nothing.
//!
//! Parsing never fails.
//!
//! # Example
//!
//! ```rust
//! use aozora_reader_core::structure::parse;
//!
//! let doc = parse("本文だけ。\n\n底本：某書");
//! assert_eq!(doc.body, "本文だけ。");
//! assert_eq!(doc.footer.as_deref(), Some("底本：某書"));
//! assert!(doc.title.is_none());
//! ```

use std::borrow::Cow;

use tracing::debug;

use crate::models::ParsedDocument;

/// The rule line fencing the symbol legend: 55 ASCII hyphens.
pub const HEADER_DIVIDER: &str = "-------------------------------------------------------";

/// Colophon marker meaning "base text:".
pub const COLOPHON_MARKER: &str = "底本：";

/// Label that prefixes the author line in some header variants.
pub const AUTHOR_LABEL: &str = "【著者名】";

const LABEL_OPEN: char = '【';

/// Split `text` into header, body and footer regions.
pub fn parse(text: &str) -> ParsedDocument {
    let mut doc = ParsedDocument::default();

    let body_region: Cow<'_, str> = match locate_header(text) {
        Some(span) => {
            let header_region = &text[..span.second_start];
            let preamble = &text[..span.first_start];
            doc.header_lines = header_region
                .lines()
                .map(str::trim_end)
                .filter(|line| !line.is_empty() && !is_divider_line(line))
                .map(str::to_string)
                .collect();
            doc.title = find_title(&doc.header_lines);
            doc.author = find_author(&doc.header_lines, preamble);
            strip_divider_lines(&text[span.body_start..])
        }
        None => {
            debug!(chars = text.len(), "No header dividers found; treating whole text as body");
            Cow::Borrowed(text)
        }
    };

    let body_region = match find_colophon(&body_region) {
        Some(pos) => {
            doc.footer = Some(body_region[pos..].trim().to_string());
            &body_region[..pos]
        }
        None => &body_region[..],
    };

    doc.body = trim_body(body_region).to_string();
    doc
}

struct HeaderSpan {
    first_start: usize,
    second_start: usize,
    body_start: usize,
}

/// Each line (newline included) with its start and end offsets.
fn line_spans(text: &str) -> impl Iterator<Item = (usize, &str, usize)> {
    text.split_inclusive('\n').scan(0, |offset, line| {
        let start = *offset;
        *offset += line.len();
        Some((start, line, *offset))
    })
}

/// Locate the first two divider lines. Returns `None` when fewer than two
/// exist.
fn locate_header(text: &str) -> Option<HeaderSpan> {
    let mut dividers = line_spans(text).filter(|(_, line, _)| is_divider_line(line));
    let (first_start, _, _) = dividers.next()?;
    let Some((second_start, _, body_start)) = dividers.next() else {
        debug!(first = first_start, "Only one header divider found; ignoring header");
        return None;
    };

    Some(HeaderSpan {
        first_start,
        second_start,
        body_start,
    })
}

/// Remove divider lines left in the body after the header pair, so a
/// stripped body never presents a header of its own.
fn strip_divider_lines(body: &str) -> Cow<'_, str> {
    if !line_spans(body).any(|(_, line, _)| is_divider_line(line)) {
        return Cow::Borrowed(body);
    }
    debug!("Removing stray divider lines from body");
    Cow::Owned(
        line_spans(body)
            .filter(|(_, line, _)| !is_divider_line(line))
            .map(|(_, line, _)| line)
            .collect(),
    )
}

/// Start of the colophon: scanning back from the end, it extends over every
/// line-initial marker, so the body that remains carries none.
fn find_colophon(body: &str) -> Option<usize> {
    line_spans(body)
        .find(|(_, line, _)| line.starts_with(COLOPHON_MARKER))
        .map(|(start, _, _)| start)
}

/// A whole line of at least [`HEADER_DIVIDER`]'s length made only of `-`.
fn is_divider_line(line: &str) -> bool {
    let trimmed = line.trim();
    trimmed.len() >= HEADER_DIVIDER.len() && trimmed.bytes().all(|b| b == b'-')
}

fn find_title(header_lines: &[String]) -> Option<String> {
    header_lines
        .iter()
        .map(|line| line.trim())
        .find(|line| !line.is_empty() && !line.starts_with(LABEL_OPEN))
        .map(str::to_string)
}

fn find_author(header_lines: &[String], preamble: &str) -> Option<String> {
    if let Some(line) = header_lines.iter().find(|line| line.contains(AUTHOR_LABEL)) {
        let author = line.replace(AUTHOR_LABEL, "");
        let author = author.trim();
        if !author.is_empty() {
            return Some(author.to_string());
        }
    }

    // Title on the first preamble line, author on the second.
    preamble
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with(LABEL_OPEN))
        .nth(1)
        .map(str::to_string)
}

fn trim_body(body: &str) -> &str {
    body.trim_start_matches(['\r', '\n']).trim_end()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> String {
        format!(
            "羅生門\n芥川龍之介\n\n{d}\n【テキスト中に現れる記号について】\n\n《》：ルビ\n（例）下人《げにん》\n{d}\n\n　ある日の暮方の事である。\n　一人の下人が、羅生門の下で雨やみを待っていた。\n\n\n\n底本：「芥川龍之介全集1」ちくま文庫、筑摩書房\n入力：j.utiyama\n",
            d = HEADER_DIVIDER
        )
    }

    #[test]
    fn test_parse_full_document() {
        let doc = parse(&sample());
        assert_eq!(doc.title.as_deref(), Some("羅生門"));
        assert_eq!(doc.author.as_deref(), Some("芥川龍之介"));
        assert!(doc.body.starts_with("　ある日の暮方の事である。"));
        assert!(doc.body.ends_with("雨やみを待っていた。"));
        assert!(doc
            .footer
            .as_deref()
            .unwrap()
            .starts_with("底本：「芥川龍之介全集1」"));
        assert!(doc.footer.as_deref().unwrap().contains("入力：j.utiyama"));
    }

    #[test]
    fn test_body_excludes_markers() {
        let doc = parse(&sample());
        assert!(!doc.body.contains(HEADER_DIVIDER));
        assert!(!doc.body.contains(COLOPHON_MARKER));
        assert!(!doc.body.contains("《》：ルビ"));
    }

    #[test]
    fn test_header_lines_skip_dividers() {
        let doc = parse(&sample());
        assert!(doc.has_header());
        assert_eq!(doc.header_lines[0], "羅生門");
        assert!(doc.header_lines.iter().all(|l| !is_divider_line(l)));
        assert!(doc
            .header_lines
            .iter()
            .any(|l| l == "【テキスト中に現れる記号について】"));
    }

    #[test]
    fn test_reparse_is_noop() {
        let first = parse(&sample());
        let second = parse(&first.body);
        assert_eq!(second.body, first.body);
        assert!(second.footer.is_none());
        assert!(!second.has_header());
    }

    #[test]
    fn test_author_label() {
        let text = format!(
            "【作品名】蜘蛛の糸\n【著者名】 芥川龍之介\n{d}\n記号\n{d}\n本文",
            d = HEADER_DIVIDER
        );
        let doc = parse(&text);
        assert_eq!(doc.title.as_deref(), Some("記号"));
        assert_eq!(doc.author.as_deref(), Some("芥川龍之介"));
        assert_eq!(doc.body, "本文");
    }

    #[test]
    fn test_no_divider_whole_body() {
        let doc = parse("吾輩は猫である。\n名前はまだ無い。");
        assert!(doc.title.is_none());
        assert!(doc.author.is_none());
        assert!(doc.header_lines.is_empty());
        assert_eq!(doc.body, "吾輩は猫である。\n名前はまだ無い。");
    }

    #[test]
    fn test_single_divider_is_no_header() {
        let text = format!("題\n{d}\n本文", d = HEADER_DIVIDER);
        let doc = parse(&text);
        assert!(!doc.has_header());
        assert!(doc.body.contains(HEADER_DIVIDER));
    }

    #[test]
    fn test_collapsed_dividers_are_no_header() {
        // 110 dashes on one line: the second match sits on the same line.
        let text = format!("題\n{d}{d}\n本文", d = HEADER_DIVIDER);
        let doc = parse(&text);
        assert!(!doc.has_header());
        assert!(doc.title.is_none());
    }

    #[test]
    fn test_long_divider_tail_not_in_body() {
        let long = format!("{}-----", HEADER_DIVIDER);
        let text = format!("題\n著者\n{l}\n記号\n{l}\n本文", l = long);
        let doc = parse(&text);
        assert_eq!(doc.body, "本文");
    }

    #[test]
    fn test_colophon_must_start_a_line() {
        let doc = parse("本文に底本：という語。\n\n底本：本当の底本");
        assert_eq!(doc.body, "本文に底本：という語。");
        assert_eq!(doc.footer.as_deref(), Some("底本：本当の底本"));
        assert_eq!(parse(&doc.body).body, doc.body);
    }

    #[test]
    fn test_colophon_with_two_source_editions() {
        let doc = parse("本文。\n底本：第一の底本\n入力：某\n底本：第二の底本");
        assert_eq!(doc.body, "本文。");
        assert_eq!(
            doc.footer.as_deref(),
            Some("底本：第一の底本\n入力：某\n底本：第二の底本")
        );
        assert_eq!(parse(&doc.body).body, doc.body);
    }

    #[test]
    fn test_dividers_after_header_stay_out_of_body() {
        let text = format!(
            "題\n著者\n{d}\n記号\n{d}\n本文一\n{d}\n挿入\n{d}\n本文二",
            d = HEADER_DIVIDER
        );
        let first = parse(&text);
        assert_eq!(first.title.as_deref(), Some("題"));
        assert_eq!(first.body, "本文一\n挿入\n本文二");
        assert!(!first.body.contains(HEADER_DIVIDER));

        let second = parse(&first.body);
        assert_eq!(second.body, first.body);
        assert!(!second.has_header());
    }

    #[test]
    fn test_dash_run_inside_prose_is_not_a_divider() {
        let text = format!("題\n{d}\n記号\n{d}\n本文{d}続き", d = HEADER_DIVIDER);
        let doc = parse(&text);
        assert!(doc.has_header());
        assert_eq!(doc.body, format!("本文{}続き", HEADER_DIVIDER));
        assert_eq!(parse(&doc.body).body, doc.body);
    }

    #[test]
    fn test_empty_text() {
        let doc = parse("");
        assert_eq!(doc.body, "");
        assert!(doc.footer.is_none());
    }
}
