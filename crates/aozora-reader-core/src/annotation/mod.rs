//! Aozora annotation transformer.
//!
//! Rewrites the inline typesetting annotations of an Aozora body (ruby
//! glosses, emphasis marks, indentation blocks, page breaks, headings and
//! free-form notes) into the representation chosen by a [`FidelityMode`].
//!
//! # Algorithm
//!
//! 1. A single left-to-right scan tokenizes the body into a [`Node`] tree.
//!    At each position the rule that owns the current character wins:
//!    `｜` starts an explicit ruby, `《` closes an implicit ruby over the
//!    trailing ideograph run, `［＃` opens a directive, `\n` is a line
//!    break and `　` at line start is a paragraph indent.
//! 2. Paired directives (indent blocks, `傍点`…`傍点終わり` ranges) are
//!    matched nesting-aware and their contents are scanned recursively.
//! 3. Quoted directives (`［＃「X」に傍点］`) re-wrap the text just before
//!    them when it ends with `X`; otherwise `X` is emitted wrapped in place.
//! 4. The tree is rendered per mode, blank-line runs are collapsed, and
//!    Speech output is flattened to single-spaced prose.
//!
//! See [`RULES`] for the ordered rule table.
//!
//! Malformed annotations are never fatal. An unterminated `《`, `｜` or
//! `［＃` stays in the text as a literal; an unmatched block directive is
//! removed like any other unknown directive, leaving its span as ordinary
//! text.
//!
//! # Example
//!
//! ```rust
//! use aozora_reader_core::annotation::transform;
//! use aozora_reader_core::FidelityMode;
//!
//! let html = transform("道具《どうぐ》", FidelityMode::Render);
//! assert_eq!(html, "<ruby>道具<rt>どうぐ</rt></ruby>");
//! assert_eq!(transform("道具《どうぐ》", FidelityMode::Speech), "道具");
//! ```

mod directive;
mod render;

pub use directive::{classify, Directive, HeadingLevel, SpanStyle};
pub use render::{collapse_blank_lines, render};

use crate::models::FidelityMode;

pub const RUBY_BOUNDARY: char = '｜';
pub const RUBY_OPEN: char = '《';
pub const RUBY_CLOSE: char = '》';
pub const DIRECTIVE_OPEN: &str = "［＃";
pub const DIRECTIVE_CLOSE: char = '］';
pub const PARAGRAPH_SPACE: char = '　';

/// One row of the annotation rule table.
#[derive(Debug, Clone, Copy)]
pub struct AnnotationRule {
    pub order: u8,
    pub name: &'static str,
    pub syntax: &'static str,
    pub render: &'static str,
    /// Speech and PlainStrip output.
    pub speech: &'static str,
}

/// The annotation rules in precedence order.
pub const RULES: &[AnnotationRule] = &[
    AnnotationRule {
        order: 1,
        name: "explicit-ruby",
        syntax: "｜base《gloss》",
        render: "<ruby>base<rt>gloss</rt></ruby>",
        speech: "base",
    },
    AnnotationRule {
        order: 2,
        name: "implicit-ruby",
        syntax: "漢字《gloss》",
        render: "<ruby>漢字<rt>gloss</rt></ruby>",
        speech: "漢字",
    },
    AnnotationRule {
        order: 3,
        name: "emphasis-dots",
        syntax: "［＃「X」に傍点］",
        render: "<em class=\"emphasis-dots\">X</em>",
        speech: "X",
    },
    AnnotationRule {
        order: 4,
        name: "bold",
        syntax: "［＃「X」は太字］",
        render: "<strong>X</strong>",
        speech: "X",
    },
    AnnotationRule {
        order: 5,
        name: "page-break",
        syntax: "［＃改ページ］",
        render: "<div class=\"page-break\"></div>",
        speech: "\\n",
    },
    AnnotationRule {
        order: 6,
        name: "indent-block",
        syntax: "［＃ここからN字下げ］…［＃ここで字下げ終わり］",
        render: "<div class=\"indent-N\">…</div>",
        speech: "…",
    },
    AnnotationRule {
        order: 7,
        name: "heading",
        syntax: "［＃「X」は大見出し］ / 中見出し / 小見出し",
        render: "<h1>X</h1> / <h2>X</h2> / <h3>X</h3>",
        speech: "X",
    },
    AnnotationRule {
        order: 8,
        name: "catch-all",
        syntax: "［＃…］",
        render: "",
        speech: "",
    },
    AnnotationRule {
        order: 9,
        name: "paragraph-indent",
        syntax: "line-initial 　…",
        render: "<span class=\"indent-N\"></span>",
        speech: "",
    },
    AnnotationRule {
        order: 10,
        name: "line-break",
        syntax: "\\n",
        render: "<br>\\n",
        speech: "\\n",
    },
];

/// A parsed fragment of an annotated body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Text(String),
    Ruby { base: String, gloss: String },
    Emphasis(Vec<Node>),
    Bold(Vec<Node>),
    Heading { level: HeadingLevel, children: Vec<Node> },
    PageBreak,
    Indent { level: u32, children: Vec<Node> },
    /// Line-initial run of full-width spaces, by length.
    ParagraphIndent(usize),
    LineBreak,
}

impl Node {
    /// Visible base text of an inline node (glosses excluded).
    ///
    /// `None` for block-level and layout nodes.
    pub fn inline_text(&self) -> Option<String> {
        match self {
            Node::Text(t) => Some(t.clone()),
            Node::Ruby { base, .. } => Some(base.clone()),
            Node::Emphasis(children) | Node::Bold(children) => children
                .iter()
                .map(Node::inline_text)
                .collect::<Option<Vec<_>>>()
                .map(|parts| parts.concat()),
            _ => None,
        }
    }
}

impl SpanStyle {
    fn wrap(self, children: Vec<Node>) -> Node {
        match self {
            SpanStyle::Emphasis => Node::Emphasis(children),
            SpanStyle::Bold => Node::Bold(children),
            SpanStyle::Heading(level) => Node::Heading { level, children },
        }
    }
}

/// Transform an annotated body into the representation for `mode`.
pub fn transform(body: &str, mode: FidelityMode) -> String {
    render(&parse_nodes(body), mode)
}

/// Tokenize an annotated body into a node tree.
pub fn parse_nodes(body: &str) -> Vec<Node> {
    Parser { src: body }.parse_range(0, body.len())
}

fn is_special(c: char) -> bool {
    matches!(c, '\n' | RUBY_BOUNDARY | RUBY_OPEN | '［' | PARAGRAPH_SPACE)
}

/// CJK ideographs, including the iteration and abbreviation marks that
/// take ruby in Aozora texts.
pub fn is_ideograph(c: char) -> bool {
    matches!(c,
        '\u{3400}'..='\u{4DBF}'
        | '\u{4E00}'..='\u{9FFF}'
        | '\u{F900}'..='\u{FAFF}'
        | '\u{20000}'..='\u{2FFFF}'
        | '々' | '〆' | '〇' | 'ヶ')
}

fn push_text(out: &mut Vec<Node>, s: &str) {
    if s.is_empty() {
        return;
    }
    if let Some(Node::Text(t)) = out.last_mut() {
        t.push_str(s);
    } else {
        out.push(Node::Text(s.to_string()));
    }
}

/// Split the trailing ideograph run off the last text node.
fn take_trailing_ideographs(out: &mut Vec<Node>) -> Option<String> {
    let Some(Node::Text(t)) = out.last_mut() else {
        return None;
    };
    let split = t
        .char_indices()
        .rev()
        .take_while(|(_, c)| is_ideograph(*c))
        .last()
        .map(|(i, _)| i)?;
    let base = t.split_off(split);
    if t.is_empty() {
        out.pop();
    }
    Some(base)
}

/// Detach the nodes at the end of `out` that repeat the tail of `span`.
///
/// Matching walks back from the directive over same-line inline nodes. A
/// text node may be split to take just the matching suffix. An inline node
/// whose text only ends with the rest of the span is taken whole, so the
/// wrapped text can slightly exceed `span`. `None` when nothing before the
/// directive overlaps the span at all.
fn take_preceding(out: &mut Vec<Node>, span: &str) -> Option<Vec<Node>> {
    let mut remaining = span;
    let mut idx = out.len();
    let mut partial: Option<String> = None;

    while !remaining.is_empty() && idx > 0 {
        match &out[idx - 1] {
            Node::Text(t) if t.ends_with(remaining) => {
                if t.len() == remaining.len() {
                    idx -= 1;
                } else {
                    partial = Some(remaining.to_string());
                }
                remaining = "";
            }
            Node::Text(t) if !t.is_empty() && remaining.ends_with(t.as_str()) => {
                remaining = &remaining[..remaining.len() - t.len()];
                idx -= 1;
            }
            Node::Text(_) => break,
            node => match node.inline_text() {
                Some(text) if !text.is_empty() && remaining.ends_with(text.as_str()) => {
                    remaining = &remaining[..remaining.len() - text.len()];
                    idx -= 1;
                }
                Some(text) if text.ends_with(remaining) => {
                    remaining = "";
                    idx -= 1;
                }
                _ => break,
            },
        }
    }

    if idx == out.len() && partial.is_none() {
        return None;
    }

    let mut taken: Vec<Node> = out.drain(idx..).collect();
    if let Some(piece) = partial {
        if let Some(Node::Text(t)) = out.last_mut() {
            t.truncate(t.len() - piece.len());
            if t.is_empty() {
                out.pop();
            }
        }
        taken.insert(0, Node::Text(piece));
    }
    Some(taken)
}

struct Parser<'a> {
    src: &'a str,
}

impl<'a> Parser<'a> {
    fn parse_range(&self, start: usize, end: usize) -> Vec<Node> {
        let mut out = Vec::new();
        let mut pos = start;

        while pos < end {
            let rest = &self.src[pos..end];
            let Some(ch) = rest.chars().next() else {
                break;
            };

            if ch == PARAGRAPH_SPACE && self.is_line_start(pos) {
                let run = rest.chars().take_while(|c| *c == PARAGRAPH_SPACE).count();
                out.push(Node::ParagraphIndent(run));
                pos += run * PARAGRAPH_SPACE.len_utf8();
                continue;
            }

            pos = match ch {
                '\n' => {
                    out.push(Node::LineBreak);
                    pos + 1
                }
                RUBY_BOUNDARY => self.explicit_ruby(pos, end, &mut out),
                RUBY_OPEN => self.implicit_ruby(pos, end, &mut out),
                '［' if rest.starts_with(DIRECTIVE_OPEN) => self.directive(pos, end, &mut out),
                _ => {
                    let first = ch.len_utf8();
                    let len = first + rest[first..].find(is_special).unwrap_or(rest.len() - first);
                    push_text(&mut out, &rest[..len]);
                    pos + len
                }
            };
        }

        out
    }

    fn is_line_start(&self, pos: usize) -> bool {
        pos == 0 || self.src[..pos].ends_with('\n')
    }

    fn line_end(&self, from: usize, limit: usize) -> usize {
        self.src[from..limit]
            .find('\n')
            .map(|i| from + i)
            .unwrap_or(limit)
    }

    /// Position after a directive spanning `start..after`, also consuming
    /// the newline when the directive is alone on its line.
    fn skip_whole_line(&self, start: usize, after: usize, limit: usize) -> usize {
        if self.is_line_start(start) && self.src[after..limit].starts_with('\n') {
            after + 1
        } else {
            after
        }
    }

    /// `｜base《gloss》` on a single line.
    fn explicit_ruby(&self, pos: usize, end: usize, out: &mut Vec<Node>) -> usize {
        let base_start = pos + RUBY_BOUNDARY.len_utf8();
        let line = &self.src[base_start..self.line_end(base_start, end)];

        if let Some(open) = line.find(RUBY_OPEN) {
            let gloss_start = open + RUBY_OPEN.len_utf8();
            if let Some(close) = line[gloss_start..].find(RUBY_CLOSE) {
                let base = &line[..open];
                let gloss = &line[gloss_start..gloss_start + close];
                if !base.is_empty() && !gloss.is_empty() {
                    out.push(Node::Ruby {
                        base: base.to_string(),
                        gloss: gloss.to_string(),
                    });
                    return base_start + gloss_start + close + RUBY_CLOSE.len_utf8();
                }
            }
        }

        push_text(out, &self.src[pos..base_start]);
        base_start
    }

    /// `《gloss》` attached to the preceding ideograph run.
    fn implicit_ruby(&self, pos: usize, end: usize, out: &mut Vec<Node>) -> usize {
        let gloss_start = pos + RUBY_OPEN.len_utf8();
        let line = &self.src[gloss_start..self.line_end(gloss_start, end)];

        if let Some(close) = line.find(RUBY_CLOSE) {
            let gloss = &line[..close];
            if !gloss.is_empty() {
                if let Some(base) = take_trailing_ideographs(out) {
                    out.push(Node::Ruby {
                        base,
                        gloss: gloss.to_string(),
                    });
                    return gloss_start + close + RUBY_CLOSE.len_utf8();
                }
            }
        }

        push_text(out, &self.src[pos..gloss_start]);
        gloss_start
    }

    /// `［＃…］`, dispatched on its classified body.
    fn directive(&self, pos: usize, end: usize, out: &mut Vec<Node>) -> usize {
        let content_start = pos + DIRECTIVE_OPEN.len();
        let line = &self.src[content_start..self.line_end(content_start, end)];
        let Some(close) = line.find(DIRECTIVE_CLOSE) else {
            let bracket = pos + '［'.len_utf8();
            push_text(out, &self.src[pos..bracket]);
            return bracket;
        };
        let content = &line[..close];
        let after = content_start + close + DIRECTIVE_CLOSE.len_utf8();

        match classify(content) {
            Directive::PageBreak => {
                out.push(Node::PageBreak);
                self.skip_whole_line(pos, after, end)
            }
            Directive::IndentBegin(level) => {
                let matched = self.find_block_end(
                    after,
                    end,
                    |d| matches!(d, Directive::IndentBegin(_)),
                    |d| matches!(d, Directive::IndentEnd),
                );
                match matched {
                    Some((end_start, end_after)) => {
                        let inner_start = self.skip_whole_line(pos, after, end_start);
                        let children = self.parse_range(inner_start, end_start);
                        out.push(Node::Indent { level, children });
                        self.skip_whole_line(end_start, end_after, end)
                    }
                    None => self.skip_whole_line(pos, after, end),
                }
            }
            Directive::RangeBegin(style) => {
                let matched = self.find_block_end(
                    after,
                    end,
                    |d| *d == Directive::RangeBegin(style),
                    |d| *d == Directive::RangeEnd(style),
                );
                match matched {
                    Some((end_start, end_after)) => {
                        let children = self.parse_range(after, end_start);
                        out.push(style.wrap(children));
                        end_after
                    }
                    None => after,
                }
            }
            Directive::Quoted { span, style } => {
                if !span.is_empty() {
                    let children = take_preceding(out, span)
                        .unwrap_or_else(|| vec![Node::Text(span.to_string())]);
                    out.push(style.wrap(children));
                }
                after
            }
            Directive::IndentEnd | Directive::RangeEnd(_) | Directive::Other => {
                self.skip_whole_line(pos, after, end)
            }
        }
    }

    /// Find the directive closing a block opened just before `from`,
    /// honouring nested blocks of the same kind. Returns the closing
    /// directive's `start..after` span.
    fn find_block_end(
        &self,
        from: usize,
        limit: usize,
        is_begin: impl Fn(&Directive<'_>) -> bool,
        is_end: impl Fn(&Directive<'_>) -> bool,
    ) -> Option<(usize, usize)> {
        let mut depth = 1usize;
        let mut cursor = from;

        while let Some(rel) = self.src[cursor..limit].find(DIRECTIVE_OPEN) {
            let start = cursor + rel;
            let content_start = start + DIRECTIVE_OPEN.len();
            let line = &self.src[content_start..self.line_end(content_start, limit)];
            let Some(close) = line.find(DIRECTIVE_CLOSE) else {
                cursor = content_start;
                continue;
            };
            let after = content_start + close + DIRECTIVE_CLOSE.len_utf8();
            let directive = classify(&line[..close]);
            if is_begin(&directive) {
                depth += 1;
            } else if is_end(&directive) {
                depth -= 1;
                if depth == 0 {
                    return Some((start, after));
                }
            }
            cursor = after;
        }

        None
    }
}
