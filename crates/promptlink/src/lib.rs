// ABOUTME: Main library entry point for the promptlink link-scraping pipeline.
// ABOUTME: Re-exports the public API: LinkScraper, ScrapeRequest, documents, classifier, cache, errors.

//! promptlink - extracts structured, prompt-ready content from URLs in
//! user-authored text.
//!
//! The pipeline detects URLs in free text, classifies each one, dispatches it
//! to a platform-specific extraction strategy, normalizes the resulting body,
//! and caches the document under a TTL. Batches isolate failures per URL:
//! callers always get exactly one document back per input URL.
//!
//! # Example
//!
//! ```no_run
//! use promptlink::{LinkScraper, ScrapeRequest};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), promptlink::ScrapeError> {
//!     let scraper = LinkScraper::builder().build();
//!     let result = scraper
//!         .scrape_text("see https://github.com/acme/widget", "user-42")
//!         .await?;
//!     for doc in &result.documents {
//!         println!("{}", doc.to_prompt_block());
//!     }
//!     Ok(())
//! }
//! ```

pub mod batch;
pub mod cache;
pub mod classify;
pub mod client;
pub mod detect;
pub mod document;
pub mod error;
pub mod extractors;
pub mod fetch;
pub mod normalize;
pub mod options;

pub use crate::batch::ScrapeRequest;
pub use crate::cache::{CacheEntry, CacheStore, MemoryCache};
pub use crate::classify::{classify, Classification, LinkType};
pub use crate::client::LinkScraper;
pub use crate::detect::{detect_links, DetectedLink};
pub use crate::document::{
    BatchResult, BatchSummary, DocumentMetadata, DocumentStatus, ExtractedDocument, Manifest,
    ProjectFile, RepoMetadata,
};
pub use crate::error::{ErrorCode, ScrapeError};
pub use crate::normalize::{normalize, normalize_with_limit, truncate};
pub use crate::options::{ScrapeOptions, ScraperBuilder, DEFAULT_CACHE_TTL};
