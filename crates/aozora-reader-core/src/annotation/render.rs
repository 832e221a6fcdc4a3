//! Per-mode rendering of a parsed annotation tree.

use once_cell::sync::Lazy;
use quick_xml::escape::escape;
use regex::Regex;

use super::{HeadingLevel, Node};
use crate::models::FidelityMode;

static RE_BLANK_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n\s*\n\s*\n").unwrap());
static RE_WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

/// Render `nodes` and apply the mode's finishing pass.
pub fn render(nodes: &[Node], mode: FidelityMode) -> String {
    let mut out = String::new();
    match mode {
        FidelityMode::Render => write_html(nodes, &mut out),
        FidelityMode::Speech | FidelityMode::PlainStrip => write_plain(nodes, &mut out),
    }

    let collapsed = collapse_blank_lines(&out);
    // U+3000 is prose here; only Speech flattens it.
    let trimmed = collapsed.trim_matches(|c: char| c.is_ascii_whitespace());
    match mode {
        FidelityMode::Render => trimmed.replace('\n', "<br>\n"),
        FidelityMode::PlainStrip => trimmed.to_string(),
        FidelityMode::Speech => RE_WHITESPACE.replace_all(trimmed, " ").trim().to_string(),
    }
}

/// Collapse runs of three or more line breaks (with only whitespace between
/// them) into a single blank line.
pub fn collapse_blank_lines(text: &str) -> String {
    RE_BLANK_RUN.replace_all(text, "\n\n").into_owned()
}

fn heading_class(level: HeadingLevel) -> &'static str {
    match level {
        HeadingLevel::Large => "chapter-title",
        HeadingLevel::Medium => "section-title",
        HeadingLevel::Small => "subsection-title",
    }
}

fn write_html(nodes: &[Node], out: &mut String) {
    for node in nodes {
        match node {
            Node::Text(t) => out.push_str(&escape(t.as_str())),
            Node::Ruby { base, gloss } => {
                out.push_str("<ruby>");
                out.push_str(&escape(base.as_str()));
                out.push_str("<rt>");
                out.push_str(&escape(gloss.as_str()));
                out.push_str("</rt></ruby>");
            }
            Node::Emphasis(children) => {
                out.push_str("<em class=\"emphasis-dots\">");
                write_html(children, out);
                out.push_str("</em>");
            }
            Node::Bold(children) => {
                out.push_str("<strong>");
                write_html(children, out);
                out.push_str("</strong>");
            }
            Node::Heading { level, children } => {
                let rank = level.rank();
                out.push_str(&format!("<h{} class=\"{}\">", rank, heading_class(*level)));
                write_html(children, out);
                out.push_str(&format!("</h{}>", rank));
            }
            Node::PageBreak => out.push_str("<div class=\"page-break\"></div>"),
            Node::Indent { level, children } => {
                out.push_str(&format!("<div class=\"indent-{}\">", level));
                write_html(children, out);
                out.push_str("</div>");
            }
            Node::ParagraphIndent(width) => {
                out.push_str(&format!("<span class=\"indent-{}\"></span>", width));
            }
            Node::LineBreak => out.push('\n'),
        }
    }
}

fn write_plain(nodes: &[Node], out: &mut String) {
    for node in nodes {
        match node {
            Node::Text(t) => out.push_str(t),
            Node::Ruby { base, .. } => out.push_str(base),
            Node::Emphasis(children)
            | Node::Bold(children)
            | Node::Heading { children, .. }
            | Node::Indent { children, .. } => write_plain(children, out),
            Node::PageBreak | Node::LineBreak => out.push('\n'),
            Node::ParagraphIndent(_) => {}
        }
    }
}
