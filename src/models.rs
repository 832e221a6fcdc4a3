//! Data types produced by the pipeline and exchanged with collaborators.
//!
//! The text-side types ([`Chapter`], [`FidelityMode`], [`ParsedDocument`],
//! [`SearchMatch`], [`TextStats`]) live in `aozora-reader-core` and are
//! re-exported here.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

pub use aozora_reader_core::models::{
    Chapter, FidelityMode, ParsedDocument, SearchMatch, TextStats,
};

use crate::decode::DetectedEncoding;

/// The outcome of running one archive through the pipeline.
#[derive(Debug, Clone, Serialize)]
pub struct TransformResult {
    /// Body transformed for [`mode`](Self::mode).
    pub normalized_text: String,
    /// PlainStrip rendering of the same body. Chapters and search
    /// results address its lines.
    pub plain_text: String,
    pub mode: FidelityMode,
    pub title: Option<String>,
    pub author: Option<String>,
    pub chapters: Vec<Chapter>,
    pub encoding: DetectedEncoding,
}

/// One work as listed by a catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookRecord {
    pub id: String,
    pub title: String,
    /// Kana reading of the title, when the catalog lists one.
    #[serde(default)]
    pub title_yomi: Option<String>,
    pub author: String,
    #[serde(default)]
    pub author_yomi: Option<String>,
    /// Direct link to the ZIP archive of the text.
    pub archive_url: String,
    /// Link to the work's bibliographic card page.
    #[serde(default)]
    pub card_url: Option<String>,
    #[serde(default)]
    pub release_date: Option<NaiveDate>,
}
