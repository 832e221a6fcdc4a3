//! Core data models shared by the structure parser, the annotation
//! transformer and the reading views.
//!
//! All of these are request-scoped values: they are produced once per
//! source text and never mutated afterwards.

use serde::{Deserialize, Serialize};

/// Output target that decides how each annotation is resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum FidelityMode {
    /// Semantic HTML for on-screen reading.
    #[default]
    Render,
    /// Continuous prose for a text-to-speech engine.
    Speech,
    /// Line-oriented plain text for search, chaptering and summaries.
    PlainStrip,
}

impl FidelityMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            FidelityMode::Render => "render",
            FidelityMode::Speech => "speech",
            FidelityMode::PlainStrip => "plain-strip",
        }
    }
}

impl std::fmt::Display for FidelityMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A decoded text split into header, body and colophon regions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ParsedDocument {
    /// Work title from the header block.
    pub title: Option<String>,
    /// Author name from the header block.
    pub author: Option<String>,
    /// Non-divider lines preceding the body.
    pub header_lines: Vec<String>,
    /// Body text, annotations still in place.
    pub body: String,
    /// Colophon starting at the `底本：` marker.
    pub footer: Option<String>,
}

impl ParsedDocument {
    /// Whether a well-formed header block was found.
    pub fn has_header(&self) -> bool {
        !self.header_lines.is_empty()
    }
}

/// A detected chapter heading and the line span it governs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Chapter {
    pub title: String,
    pub start_line: usize,
    pub end_line: usize,
}

/// One occurrence of a search keyword.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchMatch {
    /// 0-based line index.
    pub line_number: usize,
    /// 0-based column, counted in chars.
    pub column_number: usize,
    /// Window around the match, clamped to the line.
    pub context: String,
}

/// Basic size statistics for a normalized text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TextStats {
    pub characters: usize,
    pub lines: usize,
    pub paragraphs: usize,
    pub average_line_length: usize,
}
