//! Error taxonomy for the text pipeline.
//!
//! Only retrieval and archive handling can fail. Decoding, structure
//! parsing, annotation transformation, chaptering, pagination and search
//! always produce a (possibly degraded) result.
//!
//! Every variant maps to one of two user-facing categories so a UI can
//! distinguish "could not retrieve this work" from "this work is not
//! available in a usable format".

use thiserror::Error;

/// Failure of the fetch or extract stage.
#[derive(Error, Debug)]
pub enum ReaderError {
    #[error("failed to fetch {url} after {attempts} attempt(s): {reason}")]
    FetchFailed {
        url: String,
        attempts: u32,
        reason: String,
    },

    #[error("archive too small: {size} bytes (minimum {minimum})")]
    ArchiveTooSmall { size: usize, minimum: usize },

    #[error("invalid archive: {0}")]
    InvalidArchive(String),

    #[error("no text entry found in archive (entries: {})", .entries.join(", "))]
    NoTextEntryFound { entries: Vec<String> },
}

/// What the user is told about a [`ReaderError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// The origin could not be reached or kept failing.
    Unreachable,
    /// Something came back but it is not a readable text.
    Unusable,
}

impl ReaderError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            ReaderError::FetchFailed { .. } => ErrorCategory::Unreachable,
            ReaderError::ArchiveTooSmall { .. }
            | ReaderError::InvalidArchive(_)
            | ReaderError::NoTextEntryFound { .. } => ErrorCategory::Unusable,
        }
    }

    /// Sentence suitable for showing to a reader.
    pub fn user_message(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Unreachable => "Could not retrieve this work. Please try again later.",
            ErrorCategory::Unusable => "This work is not available in a usable text format.",
        }
    }
}

pub type Result<T> = std::result::Result<T, ReaderError>;
