//! End-to-end text pipeline.
//!
//! Wires the stages together for one request:
//!
//! ```text
//! fetch → extract → decode → structure::parse → annotation::transform
//!                                                    └→ plain text → chapters
//! ```
//!
//! Only `fetch` suspends; everything after it is synchronous. Nothing is
//! shared between requests.

use std::time::Duration;

use tracing::{debug, info};

use aozora_reader_core::{annotation, chapter, paginate, search, sentence, structure};

use crate::config::Config;
use crate::decode::TextDecoder;
use crate::error::Result;
use crate::extract::extract_text_entry;
use crate::fetch::ArchiveFetcher;
use crate::models::{FidelityMode, SearchMatch, TransformResult};

/// Stage wiring configured once and reused across requests.
pub struct Pipeline {
    config: Config,
    fetcher: ArchiveFetcher,
    decoder: TextDecoder,
}

impl Pipeline {
    pub fn new(config: Config) -> Result<Self> {
        let fetcher = ArchiveFetcher::new(&config.fetch)?;
        let decoder = TextDecoder::new(config.decode.encoding);
        Ok(Self {
            config,
            fetcher,
            decoder,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Fetch the archive at `url` within `fetch.deadline_secs` and run it
    /// through every stage.
    pub async fn load(&self, url: &str, mode: FidelityMode) -> Result<TransformResult> {
        let deadline = Duration::from_secs(self.config.fetch.deadline_secs);
        let bytes = self.fetcher.fetch_with_deadline(url, deadline).await?;
        self.process_archive(&bytes, mode)
    }

    /// Run already-downloaded archive bytes through the pipeline.
    pub fn process_archive(&self, bytes: &[u8], mode: FidelityMode) -> Result<TransformResult> {
        let entry = extract_text_entry(bytes, &self.config.extract)?;
        debug!(entry = %entry.name, bytes = entry.bytes.len(), "Extracted text entry");
        Ok(self.process_text_bytes(&entry.bytes, mode))
    }

    /// Decode, parse and transform a raw text file. Never fails.
    pub fn process_text_bytes(&self, bytes: &[u8], mode: FidelityMode) -> TransformResult {
        let decoded = self.decoder.decode(bytes);
        let doc = structure::parse(&decoded.text);

        let nodes = annotation::parse_nodes(&doc.body);
        let plain_text = annotation::render(&nodes, FidelityMode::PlainStrip);
        let normalized_text = match mode {
            FidelityMode::PlainStrip => plain_text.clone(),
            _ => annotation::render(&nodes, mode),
        };
        let chapters = chapter::chapters(&plain_text);

        info!(
            title = doc.title.as_deref().unwrap_or(""),
            mode = %mode,
            encoding = ?decoded.encoding,
            chapters = chapters.len(),
            chars = normalized_text.chars().count(),
            "Transformed text"
        );

        TransformResult {
            normalized_text,
            plain_text,
            mode,
            title: doc.title,
            author: doc.author,
            chapters,
            encoding: decoded.encoding,
        }
    }

    /// Pages of a result's plain text at the configured page size.
    pub fn pages<'a>(&self, result: &'a TransformResult) -> paginate::Pages<'a> {
        paginate::paginate(&result.plain_text, self.config.reading.lines_per_page)
    }

    /// Search a result's plain text with the configured context radius.
    pub fn search(&self, result: &TransformResult, keyword: &str) -> Vec<SearchMatch> {
        search::search_with_radius(
            &result.plain_text,
            keyword,
            self.config.reading.search_context_chars,
        )
    }

    /// Sentence-sized utterances to hand a speech engine one at a time.
    pub fn utterances(&self, result: &TransformResult) -> Vec<String> {
        sentence::split_sentences(&result.plain_text)
    }

    /// The page-sized window around a search hit or bookmark.
    pub fn page_around_line(&self, result: &TransformResult, line_number: i64) -> String {
        paginate::page_around_line(
            &result.plain_text,
            line_number,
            self.config.reading.lines_per_page,
        )
    }
}
