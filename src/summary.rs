//! Summary input preparation.
//!
//! Language models have bounded context, so the text handed to a
//! [`Summarizer`] is cut to `max_chars` chars and marked as truncated.

use anyhow::{bail, Result};
use tracing::{debug, info};

use crate::config::SummaryConfig;
use crate::traits::Summarizer;

/// Truncate `text` to `config.max_chars` chars, appending the truncation
/// marker after a blank line when anything was cut.
pub fn prepare_summary_input(text: &str, config: &SummaryConfig) -> String {
    match text.char_indices().nth(config.max_chars) {
        Some((cut, _)) => format!("{}\n\n{}", &text[..cut], config.truncation_marker),
        None => text.to_string(),
    }
}

/// Summarize a work through `summarizer`.
///
/// The collaborator's reply is returned trimmed; an empty reply is an error.
pub async fn summarize(
    summarizer: &dyn Summarizer,
    title: &str,
    author: &str,
    text: &str,
    config: &SummaryConfig,
) -> Result<String> {
    let input = prepare_summary_input(text, config);
    debug!(title, chars = input.chars().count(), "Requesting summary");

    let summary = summarizer.summarize(title, author, &input).await?;
    let summary = summary.trim();
    if summary.is_empty() {
        bail!("Summarizer returned an empty summary for '{}'", title);
    }

    info!(title, chars = summary.chars().count(), "Summary generated");
    Ok(summary.to_string())
}
