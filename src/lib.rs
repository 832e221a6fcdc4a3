//! # Aozora Reader
//!
//! Fetches Aozora Bunko archives and turns their annotated Japanese text
//! into something a reader UI or a speech engine can use directly.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────┐   ┌─────────┐   ┌─────────┐   ┌───────────┐   ┌────────────┐
//! │  fetch  │──▶│ extract │──▶│ decode  │──▶│ structure │──▶│ annotation │
//! │ (HTTP)  │   │  (ZIP)  │   │ (SJIS)  │   │  header/  │   │  render /  │
//! └─────────┘   └─────────┘   └─────────┘   │  colophon │   │  speech /  │
//!                                           └───────────┘   │  plain     │
//!                                                           └─────┬──────┘
//!                                        ┌────────────────────────┤
//!                                        ▼                        ▼
//!                                  ┌──────────┐            ┌────────────┐
//!                                  │ chapters │            │ pages and  │
//!                                  │          │            │ search     │
//!                                  └──────────┘            └────────────┘
//! ```
//!
//! Network, archive and encoding handling live in this crate. The text
//! logic (structure, annotations, chapters, pages, search) is in
//! `aozora-reader-core`, which has no I/O dependencies.
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration parsing |
//! | [`error`] | Pipeline error taxonomy |
//! | [`fetch`] | HTTP download with retry |
//! | [`extract`] | Text entry extraction from ZIP archives |
//! | [`decode`] | Shift_JIS / UTF-8 decoding |
//! | [`models`] | Result and catalog types |
//! | [`pipeline`] | End-to-end wiring |
//! | [`traits`] | Catalog and summarizer collaborators |
//! | [`catalog`] | TTL cache over a catalog source |
//! | [`summary`] | Summary input preparation |
//!
//! ## Example
//!
//! ```rust,no_run
//! use aozora_reader::config::Config;
//! use aozora_reader::models::FidelityMode;
//! use aozora_reader::pipeline::Pipeline;
//!
//! # async fn run() -> Result<(), aozora_reader::error::ReaderError> {
//! let pipeline = Pipeline::new(Config::default())?;
//! let result = pipeline
//!     .load(
//!         "https://www.aozora.gr.jp/cards/000879/files/127_ruby_150.zip",
//!         FidelityMode::Render,
//!     )
//!     .await?;
//! println!("{:?} has {} chapters", result.title, result.chapters.len());
//! # Ok(())
//! # }
//! ```

pub mod catalog;
pub mod config;
pub mod decode;
pub mod error;
pub mod extract;
pub mod fetch;
pub mod models;
pub mod pipeline;
pub mod summary;
pub mod traits;
