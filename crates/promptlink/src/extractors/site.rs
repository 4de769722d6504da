// ABOUTME: Generic website extraction strategy for URLs outside the known platform families.
// ABOUTME: Longer container chain, structural-noise stripping, and two text fallbacks.

use scraper::{Html, Selector};

use crate::classify::LinkType;
use crate::document::ExtractedDocument;
use crate::error::ScrapeError;
use crate::fetch::{fetch, FetchOptions};
use crate::options::ScrapeOptions;

use super::{
    extract_first_attr, extract_first_text, first_qualifying_container, has_noisy_ancestor,
    normalize_whitespace, whole_document_text,
};

/// Placeholder when no title selector yields text.
const UNTITLED: &str = "Untitled page";

/// Container candidates, most specific first.
const CONTAINER_SELECTORS: &[&str] = &[
    "article",
    "main",
    "[role='main']",
    "#content",
    ".content",
    ".post-content",
    ".entry-content",
    ".article-body",
    "#main",
    ".main",
    "body",
];

const TITLE_SELECTORS: &[&str] = &["meta[property='og:title']", "title", "h1", "h2"];

const DESCRIPTION_SELECTORS: &[&str] = &[
    "meta[name='description']",
    "meta[property='og:description']",
];

/// Minimum characters for a text block inside the chosen container.
const MIN_BLOCK_LEN: usize = 20;

/// Minimum assembled length to accept a container.
const MIN_CONTAINER_LEN: usize = 200;

/// Minimum characters for the paragraph-only fallback.
const MIN_PARAGRAPH_LEN: usize = 30;

/// Concatenate all paragraphs longer than `min_len`, noise subtrees excluded.
fn paragraph_fallback(doc: &Html, min_len: usize) -> String {
    let Ok(sel) = Selector::parse("p") else {
        return String::new();
    };
    doc.select(&sel)
        .filter(|el| !has_noisy_ancestor(el))
        .filter_map(|el| {
            let text: String = el.text().collect::<Vec<_>>().join(" ");
            let normalized = normalize_whitespace(&text);
            (normalized.chars().count() > min_len).then_some(normalized)
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Extract a generic website page.
///
/// The document keeps whatever type the classifier assigned; documentation,
/// social, video, and Q&A URLs all flow through here.
pub async fn extract(
    client: &reqwest::Client,
    url: &str,
    link_type: LinkType,
    opts: &ScrapeOptions,
) -> Result<ExtractedDocument, ScrapeError> {
    let fetch_opts = FetchOptions {
        headers: opts.headers.clone(),
        timeout: opts.timeout,
        accept_non_200: false,
    };
    let page = fetch(client, url, &fetch_opts).await?;
    let html = page.text();
    let doc = Html::parse_document(&html);

    let title = extract_first_text(&doc, TITLE_SELECTORS).unwrap_or_else(|| UNTITLED.to_string());
    let description = extract_first_text(&doc, DESCRIPTION_SELECTORS).unwrap_or_default();
    let language = extract_first_attr(&doc, &["html"], "lang")
        .map(|l| l.to_lowercase())
        .and_then(|l| l.split(['-', '_']).next().map(String::from))
        .filter(|l| !l.is_empty());

    // Container chain first; then paragraphs; then whole-document text with
    // structural noise removed.
    let mut body_text = first_qualifying_container(
        &doc,
        CONTAINER_SELECTORS,
        MIN_BLOCK_LEN,
        MIN_CONTAINER_LEN,
        true,
    )
    .unwrap_or_default();
    if body_text.is_empty() {
        body_text = paragraph_fallback(&doc, MIN_PARAGRAPH_LEN);
    }
    if body_text.is_empty() {
        body_text = whole_document_text(&doc);
    }

    let mut document = ExtractedDocument::success(url, link_type);
    document.title = title;
    document.description = description;
    document.body_text = body_text;
    document.metadata.language = language;
    Ok(document)
}
