// ABOUTME: Configuration options for the scraper including ScrapeOptions and ScraperBuilder.
// ABOUTME: ScraperBuilder provides a fluent API for constructing LinkScraper instances.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use crate::cache::CacheStore;
use crate::client::LinkScraper;

/// Default time-to-live for cache entries (24 hours).
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(24 * 60 * 60);

/// Configuration options for the scraper.
///
/// Passed explicitly into every strategy call; there is no ambient global
/// configuration.
#[derive(Debug, Clone)]
pub struct ScrapeOptions {
    /// Deadline for each page fetch.
    pub timeout: Duration,
    /// Shorter deadline for speculative manifest/README probes.
    pub probe_timeout: Duration,
    /// User-Agent sent on every outbound request.
    pub user_agent: String,
    /// Maximum normalized body length in characters, before the ellipsis marker.
    pub max_content_length: usize,
    /// Whether the HTTP client follows redirects.
    pub follow_redirects: bool,
    /// Whether results are written to and served from the cache.
    pub cache_results: bool,
    /// Time-to-live for cache entries.
    pub cache_ttl: Duration,
    /// Bounded fan-out width for batch scrapes.
    pub concurrency: usize,
    /// Extra headers sent on every outbound request.
    pub headers: HashMap<String, String>,
    pub http_client: Option<reqwest::Client>,
}

impl Default for ScrapeOptions {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(15),
            probe_timeout: Duration::from_secs(5),
            user_agent: "promptlink/0.1".to_string(),
            max_content_length: 10_000,
            follow_redirects: true,
            cache_results: true,
            cache_ttl: DEFAULT_CACHE_TTL,
            concurrency: 4,
            headers: HashMap::new(),
            http_client: None,
        }
    }
}

/// Builder for constructing LinkScraper instances with custom configuration.
#[derive(Clone, Default)]
pub struct ScraperBuilder {
    opts: ScrapeOptions,
    cache: Option<Arc<dyn CacheStore>>,
}

impl std::fmt::Debug for ScraperBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScraperBuilder")
            .field("opts", &self.opts)
            .finish_non_exhaustive()
    }
}

impl ScraperBuilder {
    /// Create a new ScraperBuilder with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the per-fetch timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.opts.timeout = timeout;
        self
    }

    /// Set the shorter timeout used for README/manifest probes.
    pub fn probe_timeout(mut self, timeout: Duration) -> Self {
        self.opts.probe_timeout = timeout;
        self
    }

    /// Set the User-Agent header.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.opts.user_agent = user_agent.into();
        self
    }

    /// Set the maximum normalized body length.
    pub fn max_content_length(mut self, max: usize) -> Self {
        self.opts.max_content_length = max;
        self
    }

    /// Enable or disable redirect following.
    pub fn follow_redirects(mut self, follow: bool) -> Self {
        self.opts.follow_redirects = follow;
        self
    }

    /// Enable or disable the cache layer.
    pub fn cache_results(mut self, enabled: bool) -> Self {
        self.opts.cache_results = enabled;
        self
    }

    /// Set the cache time-to-live.
    pub fn cache_ttl(mut self, ttl: Duration) -> Self {
        self.opts.cache_ttl = ttl;
        self
    }

    /// Set the bounded fan-out width for batch scrapes.
    ///
    /// Values below 1 are clamped to 1.
    pub fn concurrency(mut self, n: usize) -> Self {
        self.opts.concurrency = n.max(1);
        self
    }

    /// Add a custom header to all requests.
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.opts.headers.insert(key.into(), value.into());
        self
    }

    /// Use a custom HTTP client.
    pub fn http_client(mut self, client: reqwest::Client) -> Self {
        self.opts.http_client = Some(client);
        self
    }

    /// Use a custom cache store.
    pub fn cache_store(mut self, store: Arc<dyn CacheStore>) -> Self {
        self.cache = Some(store);
        self
    }

    /// Build the LinkScraper with the configured options.
    pub fn build(self) -> LinkScraper {
        LinkScraper::new(self.opts, self.cache)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_ttl_is_24_hours() {
        assert_eq!(ScrapeOptions::default().cache_ttl, DEFAULT_CACHE_TTL);
        assert_eq!(DEFAULT_CACHE_TTL, Duration::from_secs(86_400));
    }

    #[test]
    fn concurrency_is_clamped_to_one() {
        let builder = ScraperBuilder::new().concurrency(0);
        assert_eq!(builder.opts.concurrency, 1);
    }

    #[test]
    fn builder_sets_fields() {
        let builder = ScraperBuilder::new()
            .timeout(Duration::from_secs(3))
            .user_agent("test-agent")
            .max_content_length(100)
            .cache_results(false)
            .header("accept", "text/html");
        assert_eq!(builder.opts.timeout, Duration::from_secs(3));
        assert_eq!(builder.opts.user_agent, "test-agent");
        assert_eq!(builder.opts.max_content_length, 100);
        assert!(!builder.opts.cache_results);
        assert_eq!(builder.opts.headers.get("accept").unwrap(), "text/html");
    }
}
