// ABOUTME: Batch orchestrator driving detect→classify→extract→normalize→cache across URL lists.
// ABOUTME: Bounded concurrent fan-out with per-URL failure isolation and cooperative cancellation.

use futures::stream::{self, StreamExt};
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::classify::LinkType;
use crate::client::LinkScraper;
use crate::detect::detect_links;
use crate::document::{BatchResult, ExtractedDocument};
use crate::error::{ErrorCode, ScrapeError};
use crate::options::ScrapeOptions;

/// One caller request: a list of URLs processed with isolated outcomes.
#[derive(Debug, Clone, Default)]
pub struct ScrapeRequest {
    pub urls: Vec<String>,
    /// Attribution only; authorization is external.
    pub requester_id: String,
    /// Per-call option overrides; falls back to the scraper's options.
    pub options: Option<ScrapeOptions>,
    /// Cooperative cancellation, checked before each URL starts.
    pub cancel: Option<CancellationToken>,
}

impl ScrapeRequest {
    pub fn new(urls: Vec<String>, requester_id: impl Into<String>) -> Self {
        Self {
            urls,
            requester_id: requester_id.into(),
            options: None,
            cancel: None,
        }
    }

    pub fn with_options(mut self, options: ScrapeOptions) -> Self {
        self.options = Some(options);
        self
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }
}

impl LinkScraper {
    /// Scrape every URL in the request.
    ///
    /// Exactly one document comes back per input URL, in input order; callers
    /// never special-case partial failure. The only hard error is an empty
    /// URL list. Cancellation keeps whatever completed: URLs not yet started
    /// synthesize cancelled error documents instead of being dropped.
    pub async fn scrape_batch(&self, request: ScrapeRequest) -> Result<BatchResult, ScrapeError> {
        if request.urls.is_empty() {
            return Err(ScrapeError::invalid_url(
                "",
                "ScrapeBatch",
                Some(anyhow::anyhow!("request contains no URLs")),
            ));
        }

        let opts = request.options.as_ref().unwrap_or(self.options());
        let cancel = request.cancel.clone().unwrap_or_default();

        // buffered() polls up to `concurrency` futures at once and yields in
        // stream order, which preserves input order in the output.
        let documents: Vec<ExtractedDocument> = stream::iter(request.urls.iter())
            .map(|url| {
                let cancel = cancel.clone();
                async move {
                    if cancel.is_cancelled() {
                        return ExtractedDocument::failed(
                            url.as_str(),
                            LinkType::Website,
                            ErrorCode::Cancelled.as_str(),
                        );
                    }
                    self.scrape_url_with(url, opts).await
                }
            })
            .buffered(opts.concurrency.max(1))
            .collect()
            .await;

        let result = BatchResult::from_documents(documents);
        info!(
            requester = %request.requester_id,
            total = result.summary.total,
            succeeded = result.summary.succeeded,
            failed = result.summary.failed,
            "batch complete"
        );
        Ok(result)
    }

    /// Detect links in user-authored text and scrape them as one batch.
    ///
    /// Returns an empty result when the text contains no URLs.
    pub async fn scrape_text(
        &self,
        text: &str,
        requester_id: impl Into<String>,
    ) -> Result<BatchResult, ScrapeError> {
        let urls: Vec<String> = detect_links(text).into_iter().map(|l| l.url).collect();
        if urls.is_empty() {
            return Ok(BatchResult::default());
        }
        self.scrape_batch(ScrapeRequest::new(urls, requester_id)).await
    }
}
