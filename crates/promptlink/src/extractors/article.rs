// ABOUTME: Article-platform extraction strategies (Medium, Dev.to, Substack, Hashnode).
// ABOUTME: One selector profile per platform, shared fetch+parse engine with fallback chains.

use chrono::{DateTime, Utc};
use scraper::Html;

use crate::classify::LinkType;
use crate::document::ExtractedDocument;
use crate::error::ScrapeError;
use crate::fetch::{fetch, FetchOptions};
use crate::options::ScrapeOptions;

use super::{extract_all_text, extract_first_text, first_qualifying_container, whole_document_text};

/// Placeholder title when every selector in the chain comes up empty.
const UNTITLED: &str = "Untitled article";

/// Minimum assembled body length for a content container to qualify.
const MIN_CONTAINER_LEN: usize = 100;

/// Maximum number of tags kept per article.
const MAX_TAGS: usize = 5;

/// Selector profile for one article platform.
struct PlatformProfile {
    platform: &'static str,
    title: &'static [&'static str],
    description: &'static [&'static str],
    author: &'static [&'static str],
    publish_date: &'static [&'static str],
    reading_time: &'static [&'static str],
    tags: &'static str,
    containers: &'static [&'static str],
}

static MEDIUM: PlatformProfile = PlatformProfile {
    platform: "medium",
    title: &["h1[data-testid='storyTitle']", "meta[property='og:title']", "h1", "title"],
    description: &["meta[property='og:description']", "meta[name='description']", "h2.pw-subtitle"],
    author: &["meta[name='author']", "a[data-testid='authorName']", "a[rel='author']"],
    publish_date: &["meta[property='article:published_time']", "time[datetime]"],
    reading_time: &["span[data-testid='storyReadTime']"],
    tags: "a[href*='/tag/']",
    containers: &["article section", "article", "main"],
};

static DEV_TO: PlatformProfile = PlatformProfile {
    platform: "dev.to",
    title: &["h1.crayons-title", "meta[property='og:title']", "h1", "title"],
    description: &["meta[property='og:description']", "meta[name='description']"],
    author: &["meta[name='author']", ".crayons-article__header a.crayons-link", "a[rel='author']"],
    publish_date: &["meta[property='article:published_time']", "time[datetime]"],
    reading_time: &[".crayons-article__header .reading-time"],
    tags: "a.crayons-tag",
    containers: &["#article-body", ".crayons-article__body", "article", "main"],
};

static SUBSTACK: PlatformProfile = PlatformProfile {
    platform: "substack",
    title: &["h1.post-title", "meta[property='og:title']", "h1", "title"],
    description: &["h3.subtitle", "meta[property='og:description']", "meta[name='description']"],
    author: &["meta[name='author']", ".byline-names a", "a[rel='author']"],
    publish_date: &["meta[property='article:published_time']", "time[datetime]"],
    reading_time: &[],
    tags: "a[href*='/t/']",
    containers: &[".available-content", "div.body.markup", "article", "main"],
};

static HASHNODE: PlatformProfile = PlatformProfile {
    platform: "hashnode",
    title: &["h1[data-query='post-title']", "meta[property='og:title']", "h1", "title"],
    description: &["meta[property='og:description']", "meta[name='description']"],
    author: &["meta[name='author']", "a[data-query='post-author-name']", "a[rel='author']"],
    publish_date: &["meta[property='article:published_time']", "time[datetime]"],
    reading_time: &[],
    tags: "a[href*='/tag/']",
    containers: &["#post-content-parent", "article", "main"],
};

/// Profile for article URLs matched by path heuristics (`/blog/` paths).
static GENERIC_BLOG: PlatformProfile = PlatformProfile {
    platform: "blog",
    title: &["meta[property='og:title']", "h1.post-title", "h1.entry-title", "h1", "title"],
    description: &["meta[property='og:description']", "meta[name='description']"],
    author: &["meta[name='author']", "meta[property='article:author']", ".byline", ".author", "a[rel='author']"],
    publish_date: &["meta[property='article:published_time']", "meta[name='date']", "time[datetime]"],
    reading_time: &[],
    tags: "a[rel='tag']",
    containers: &["article", ".post-content", ".entry-content", ".post", "main"],
};

fn profile_for_host(host: &str) -> &'static PlatformProfile {
    if host == "medium.com" || host.ends_with(".medium.com") {
        &MEDIUM
    } else if host == "dev.to" {
        &DEV_TO
    } else if host.ends_with("substack.com") {
        &SUBSTACK
    } else if host.ends_with("hashnode.com") || host.ends_with("hashnode.dev") {
        &HASHNODE
    } else {
        &GENERIC_BLOG
    }
}

/// Browser-like headers sent with article fetches; some platforms serve
/// stripped-down pages to unknown agents.
fn browser_headers(opts: &ScrapeOptions) -> std::collections::HashMap<String, String> {
    let mut headers = opts.headers.clone();
    headers
        .entry("accept".to_string())
        .or_insert_with(|| "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8".to_string());
    headers
        .entry("accept-language".to_string())
        .or_insert_with(|| "en-US,en;q=0.9".to_string());
    headers
}

pub(crate) fn parse_publish_date(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    dateparser::parse(raw).ok()
}

/// Estimate reading time from word count at ~200 wpm.
pub(crate) fn estimate_reading_time(body: &str) -> Option<String> {
    let words = body.split_whitespace().count();
    if words == 0 {
        return None;
    }
    let minutes = words.div_ceil(200).max(1);
    Some(format!("{} min read", minutes))
}

/// Extract an article-platform page.
pub async fn extract(
    client: &reqwest::Client,
    url: &str,
    opts: &ScrapeOptions,
) -> Result<ExtractedDocument, ScrapeError> {
    let host = url::Url::parse(url)
        .map_err(|e| {
            ScrapeError::invalid_url(url, "ExtractArticle", Some(anyhow::anyhow!("{}", e)))
        })?
        .host_str()
        .map(|h| h.to_lowercase())
        .unwrap_or_default();
    let profile = profile_for_host(&host);

    let fetch_opts = FetchOptions {
        headers: browser_headers(opts),
        timeout: opts.timeout,
        accept_non_200: false,
    };
    let page = fetch(client, url, &fetch_opts).await?;
    let html = page.text();
    let doc = Html::parse_document(&html);

    let title = extract_first_text(&doc, profile.title).unwrap_or_else(|| UNTITLED.to_string());
    let description = extract_first_text(&doc, profile.description).unwrap_or_default();
    let author = extract_first_text(&doc, profile.author);
    let publish_date =
        extract_first_text(&doc, profile.publish_date).and_then(|raw| parse_publish_date(&raw));

    let body_text =
        first_qualifying_container(&doc, profile.containers, 0, MIN_CONTAINER_LEN, false)
            .unwrap_or_else(|| whole_document_text(&doc));

    let reading_time = extract_first_text(&doc, profile.reading_time)
        .or_else(|| estimate_reading_time(&body_text));
    let tags = extract_all_text(&doc, profile.tags, MAX_TAGS);

    let mut document = ExtractedDocument::success(url, LinkType::Article);
    document.title = title;
    document.description = description;
    document.body_text = body_text;
    document.metadata.author = author;
    document.metadata.publish_date = publish_date;
    document.metadata.reading_time = reading_time;
    document.metadata.tags = tags;
    document.metadata.platform = Some(profile.platform.to_string());
    Ok(document)
}
