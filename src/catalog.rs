//! Time-bounded catalog cache.
//!
//! [`CachedCatalog`] wraps a [`CatalogSource`] and keeps its last listing
//! for a configurable TTL (default 24 hours). Lookups filter the cached
//! listing by keyword and page through it. The cache is the only shared
//! state in the crate and sits behind a `tokio::sync::RwLock`; the text
//! pipeline never reads it.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tokio::sync::RwLock;
use tokio::time::Instant;
use tracing::{debug, info};

use crate::config::CatalogConfig;
use crate::models::BookRecord;
use crate::traits::CatalogSource;

/// Keyword filter and paging for [`CachedCatalog::search`].
#[derive(Debug, Clone, Default)]
pub struct CatalogQuery {
    /// Matched against title and author. Latin letters ignore case.
    pub keyword: Option<String>,
    pub offset: usize,
    pub limit: Option<usize>,
}

/// Title, author or either kana reading contains `needle` (already
/// lowercased).
fn matches_keyword(book: &BookRecord, needle: &str) -> bool {
    [
        Some(book.title.as_str()),
        book.title_yomi.as_deref(),
        Some(book.author.as_str()),
        book.author_yomi.as_deref(),
    ]
    .into_iter()
    .flatten()
    .any(|field| field.to_lowercase().contains(needle))
}

struct Snapshot {
    books: Arc<Vec<BookRecord>>,
    fetched_at: Instant,
}

pub struct CachedCatalog {
    source: Arc<dyn CatalogSource>,
    ttl: Duration,
    snapshot: RwLock<Option<Snapshot>>,
}

impl CachedCatalog {
    pub fn new(source: Arc<dyn CatalogSource>, config: &CatalogConfig) -> Self {
        Self::with_ttl(source, Duration::from_secs(config.cache_ttl_secs))
    }

    pub fn with_ttl(source: Arc<dyn CatalogSource>, ttl: Duration) -> Self {
        Self {
            source,
            ttl,
            snapshot: RwLock::new(None),
        }
    }

    fn fresh(&self, snapshot: &Option<Snapshot>) -> Option<Arc<Vec<BookRecord>>> {
        snapshot
            .as_ref()
            .filter(|s| s.fetched_at.elapsed() < self.ttl)
            .map(|s| Arc::clone(&s.books))
    }

    /// The full listing, refreshed from the source when stale.
    pub async fn books(&self) -> Result<Arc<Vec<BookRecord>>> {
        if let Some(books) = self.fresh(&*self.snapshot.read().await) {
            return Ok(books);
        }

        let mut guard = self.snapshot.write().await;
        // Another task may have refreshed while we waited for the lock.
        if let Some(books) = self.fresh(&guard) {
            return Ok(books);
        }

        debug!(source = self.source.name(), "Refreshing catalog");
        let books = Arc::new(self.source.list_books().await?);
        info!(source = self.source.name(), books = books.len(), "Catalog refreshed");

        *guard = Some(Snapshot {
            books: Arc::clone(&books),
            fetched_at: Instant::now(),
        });
        Ok(books)
    }

    /// Filter and page the cached listing.
    pub async fn search(&self, query: &CatalogQuery) -> Result<Vec<BookRecord>> {
        let books = self.books().await?;
        let needle = query
            .keyword
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .map(str::to_lowercase);

        let matches = books.iter().filter(|book| match &needle {
            Some(needle) => matches_keyword(book, needle),
            None => true,
        });

        Ok(matches
            .skip(query.offset)
            .take(query.limit.unwrap_or(usize::MAX))
            .cloned()
            .collect())
    }

    /// Look a work up by id.
    pub async fn find(&self, id: &str) -> Result<Option<BookRecord>> {
        let books = self.books().await?;
        Ok(books.iter().find(|book| book.id == id).cloned())
    }

    /// Drop the cached listing; the next lookup refetches.
    pub async fn invalidate(&self) {
        *self.snapshot.write().await = None;
    }
}
