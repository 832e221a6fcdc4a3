//! # Aozora Reader Core
//!
//! Pure, synchronous text logic for Aozora Reader: document structure
//! parsing, annotation transformation, chaptering, pagination, search,
//! sentence splitting and text statistics.
//!
//! This crate contains no tokio, reqwest, zip, filesystem I/O, or other
//! native-only dependencies. Every function here runs in time proportional
//! to the length of its input and never fails: degraded input produces a
//! degraded but usable result.

pub mod annotation;
pub mod chapter;
pub mod models;
pub mod paginate;
pub mod search;
pub mod sentence;
pub mod stats;
pub mod structure;

pub use annotation::transform;
pub use models::{Chapter, FidelityMode, ParsedDocument, SearchMatch, TextStats};
