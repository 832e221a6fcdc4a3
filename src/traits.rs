//! Collaborator traits.
//!
//! The pipeline itself talks to no catalog and no language model. Callers
//! that need either implement these traits and hand them to
//! [`CachedCatalog`](crate::catalog::CachedCatalog) or
//! [`summarize`](crate::summary::summarize).
//!
//! # Example
//!
//! ```rust
//! use async_trait::async_trait;
//! use anyhow::Result;
//! use aozora_reader::models::BookRecord;
//! use aozora_reader::traits::CatalogSource;
//!
//! pub struct FixedCatalog(Vec<BookRecord>);
//!
//! #[async_trait]
//! impl CatalogSource for FixedCatalog {
//!     fn name(&self) -> &str { "fixed" }
//!
//!     async fn list_books(&self) -> Result<Vec<BookRecord>> {
//!         Ok(self.0.clone())
//!     }
//! }
//! ```

use anyhow::Result;
use async_trait::async_trait;

use crate::models::BookRecord;

/// A source of catalog listings (an index CSV, a web API…).
#[async_trait]
pub trait CatalogSource: Send + Sync {
    /// Short identifier used in logs.
    fn name(&self) -> &str;

    /// Return every work the source knows about.
    ///
    /// Called on the tokio runtime; may perform I/O.
    async fn list_books(&self) -> Result<Vec<BookRecord>>;
}

/// Produces a short synopsis of a work.
#[async_trait]
pub trait Summarizer: Send + Sync {
    /// Summarize `text`, already cut down to the configured length.
    async fn summarize(&self, title: &str, author: &str, text: &str) -> Result<String>;
}
