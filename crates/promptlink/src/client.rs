// ABOUTME: The LinkScraper facade owning the HTTP client, options, and cache store.
// ABOUTME: Provides the single-URL pipeline: validate, classify, extract, normalize, cache.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::cache::{CacheEntry, CacheStore, MemoryCache};
use crate::classify::classify;
use crate::document::ExtractedDocument;
use crate::error::ScrapeError;
use crate::extractors;
use crate::fetch::build_http_client;
use crate::normalize::normalize_with_limit;
use crate::options::{ScrapeOptions, ScraperBuilder};

/// The main scraper, cheap to clone handles aside, built once per caller.
pub struct LinkScraper {
    opts: ScrapeOptions,
    http_client: reqwest::Client,
    cache: Arc<dyn CacheStore>,
}

impl LinkScraper {
    /// Create a new ScraperBuilder for configuring the scraper.
    pub fn builder() -> ScraperBuilder {
        ScraperBuilder::new()
    }

    /// Create a new LinkScraper with the given options and optional cache store.
    pub fn new(opts: ScrapeOptions, cache: Option<Arc<dyn CacheStore>>) -> Self {
        let http_client = opts
            .http_client
            .clone()
            .unwrap_or_else(|| build_http_client(&opts.user_agent, opts.follow_redirects));
        let cache = cache.unwrap_or_else(|| Arc::new(MemoryCache::new()));
        Self {
            opts,
            http_client,
            cache,
        }
    }

    /// The configured options.
    pub fn options(&self) -> &ScrapeOptions {
        &self.opts
    }

    /// Scrape one URL, always producing a document.
    ///
    /// Strategy failures become `status=error` documents with an empty body;
    /// they never propagate as errors from this method.
    pub async fn scrape_url(&self, url: &str) -> ExtractedDocument {
        self.scrape_url_with(url, &self.opts).await
    }

    /// Scrape one URL under explicit options (used by batch overrides).
    pub(crate) async fn scrape_url_with(
        &self,
        url: &str,
        opts: &ScrapeOptions,
    ) -> ExtractedDocument {
        // Validate syntax before anything else.
        let classification = match validate_url(url) {
            Ok(()) => classify(url),
            Err(err) => {
                debug!(url, %err, "rejected before fetch");
                return ExtractedDocument::failed(
                    url,
                    crate::classify::LinkType::Website,
                    err.code.as_str(),
                );
            }
        };

        if opts.cache_results {
            if let Some(cached) = self.cache.get(url) {
                debug!(url, "cache hit");
                return cached;
            }
        }

        match extractors::extract(&self.http_client, &classification, opts).await {
            Ok(mut document) => {
                document.body_text = normalize_with_limit(&document.body_text, opts.max_content_length);
                if let Some(repo) = document.metadata.repo.as_mut() {
                    repo.readme = normalize_with_limit(&repo.readme, opts.max_content_length);
                }
                if opts.cache_results {
                    let entry = CacheEntry::new(document.clone(), opts.cache_ttl);
                    // Best-effort: a failed write must never fail or delay the scrape.
                    if let Err(err) = self.cache.put(entry) {
                        warn!(url, %err, "cache write failed");
                    }
                }
                document
            }
            Err(err) => {
                debug!(url, %err, "extraction failed");
                ExtractedDocument::failed(url, classification.link_type, err.code.as_str())
            }
        }
    }
}

/// Pre-fetch URL validation: parseable, http(s) scheme, has a host.
fn validate_url(url: &str) -> Result<(), ScrapeError> {
    let parsed = url::Url::parse(url).map_err(|e| {
        ScrapeError::invalid_url(url, "Validate", Some(anyhow::anyhow!("{}", e)))
    })?;
    if parsed.scheme() != "http" && parsed.scheme() != "https" {
        return Err(ScrapeError::invalid_url(
            url,
            "Validate",
            Some(anyhow::anyhow!("scheme must be http or https")),
        ));
    }
    if parsed.host_str().is_none() {
        return Err(ScrapeError::invalid_url(
            url,
            "Validate",
            Some(anyhow::anyhow!("URL has no host")),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::DocumentStatus;
    use httpmock::prelude::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn validate_rejects_garbage_and_bad_schemes() {
        assert!(validate_url("not a url").is_err());
        assert!(validate_url("ftp://files.test/x").is_err());
        assert!(validate_url("https://ok.test/x").is_ok());
    }

    #[tokio::test]
    async fn invalid_url_becomes_error_document() {
        let scraper = LinkScraper::builder().cache_results(false).build();
        let doc = scraper.scrape_url("not a url").await;
        assert_eq!(doc.status, DocumentStatus::Error);
        assert_eq!(doc.error.as_deref(), Some("invalid_url"));
        assert_eq!(doc.body_text, "");
    }

    #[tokio::test]
    async fn unreachable_host_becomes_error_document() {
        let scraper = LinkScraper::builder().cache_results(false).build();
        let doc = scraper.scrape_url("http://127.0.0.1:1/x").await;
        assert_eq!(doc.status, DocumentStatus::Error);
        assert!(doc.body_text.is_empty());
    }

    #[tokio::test]
    async fn successful_scrape_is_normalized_and_cached() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET).path("/page");
            then.status(200).header("content-type", "text/html").body(
                "<html><head><title>T</title></head><body><main><p>A   paragraph with   messy spacing that runs well past every threshold we enforce here today.</p><p>Another paragraph with enough words in it to clear the two hundred character container floor comfortably.</p><p>And one more for good measure so the totals work out over the container acceptance line.</p></main></body></html>",
            );
        });

        let scraper = LinkScraper::builder().build();
        let url = server.url("/page");
        let doc = scraper.scrape_url(&url).await;
        assert_eq!(doc.status, DocumentStatus::Success);
        assert!(!doc.body_text.contains("  "), "whitespace collapsed");

        // Second scrape is served from cache: the mock is hit exactly once.
        let again = scraper.scrape_url(&url).await;
        mock.assert_hits(1);
        assert_eq!(again, doc);
    }

    #[tokio::test]
    async fn cache_disabled_refetches() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET).path("/page");
            then.status(200)
                .header("content-type", "text/html")
                .body("<html><head><title>T</title></head><body><p>Enough text for a paragraph fallback to find something useful.</p></body></html>");
        });

        let scraper = LinkScraper::builder().cache_results(false).build();
        let url = server.url("/page");
        scraper.scrape_url(&url).await;
        scraper.scrape_url(&url).await;
        mock.assert_hits(2);
    }

    #[tokio::test]
    async fn error_documents_are_not_cached() {
        let scraper = LinkScraper::builder().build();
        let doc = scraper.scrape_url("http://127.0.0.1:1/x").await;
        assert_eq!(doc.status, DocumentStatus::Error);
        // A second attempt goes through the full pipeline again rather than
        // replaying the failure from cache.
        let doc2 = scraper.scrape_url("http://127.0.0.1:1/x").await;
        assert_eq!(doc2.status, DocumentStatus::Error);
        assert_ne!(doc.id, doc2.id);
    }
}
