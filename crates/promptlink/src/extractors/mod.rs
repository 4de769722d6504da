// ABOUTME: Extraction strategy dispatch plus shared selector fallback-chain helpers.
// ABOUTME: Each strategy is a fetch+parse pipeline producing an ExtractedDocument or a typed error.

//! Platform-specific extraction strategies.
//!
//! Strategies share one contract: `(client, url, options)` in, a success
//! document or a typed [`ScrapeError`] out. The orchestrator converts errors
//! into `status=error` documents; nothing here panics across the boundary.
//!
//! Field extraction uses ordered selector fallback chains: selectors are
//! tried in order and the first non-empty result wins.

pub mod article;
pub mod repo;
pub mod site;

use scraper::{ElementRef, Html, Selector};

use crate::classify::{Classification, LinkType};
use crate::document::ExtractedDocument;
use crate::error::ScrapeError;
use crate::options::ScrapeOptions;

/// Dispatch a classified URL to the matching strategy.
pub async fn extract(
    client: &reqwest::Client,
    classification: &Classification,
    opts: &ScrapeOptions,
) -> Result<ExtractedDocument, ScrapeError> {
    match classification.link_type {
        LinkType::SourceRepo => repo::extract(client, &classification.url, opts).await,
        LinkType::Article => article::extract(client, &classification.url, opts).await,
        // Documentation, social, video, and Q&A pages read well enough through
        // the generic pipeline; they keep their classified type on the document.
        _ => site::extract(client, &classification.url, classification.link_type, opts).await,
    }
}

/// Normalizes whitespace by collapsing runs into single spaces.
pub(crate) fn normalize_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Extracts text from the first selector yielding a non-empty match.
///
/// Selectors targeting `meta[` elements read the `content` attribute;
/// everything else reads normalized inner text.
pub(crate) fn extract_first_text(doc: &Html, selectors: &[&str]) -> Option<String> {
    for &sel_str in selectors {
        if sel_str.starts_with("meta[") {
            if let Some(value) = extract_meta_content(doc, sel_str) {
                return Some(value);
            }
            continue;
        }

        let sel = match Selector::parse(sel_str) {
            Ok(s) => s,
            Err(_) => continue,
        };

        for el in doc.select(&sel) {
            let text: String = el.text().collect::<Vec<_>>().join(" ");
            let normalized = normalize_whitespace(&text);
            if !normalized.is_empty() {
                return Some(normalized);
            }
        }
    }
    None
}

/// Extracts the `content` attribute from the first matching meta tag.
pub(crate) fn extract_meta_content(doc: &Html, selector: &str) -> Option<String> {
    let sel = Selector::parse(selector).ok()?;
    for el in doc.select(&sel) {
        if let Some(content) = el.value().attr("content") {
            let trimmed = content.trim();
            if !trimmed.is_empty() {
                return Some(trimmed.to_string());
            }
        }
    }
    None
}

/// Extracts an attribute from the first selector yielding a non-empty value.
pub(crate) fn extract_first_attr(doc: &Html, selectors: &[&str], attr: &str) -> Option<String> {
    for &sel_str in selectors {
        let sel = match Selector::parse(sel_str) {
            Ok(s) => s,
            Err(_) => continue,
        };
        for el in doc.select(&sel) {
            if let Some(value) = el.value().attr(attr) {
                let trimmed = value.trim();
                if !trimmed.is_empty() {
                    return Some(trimmed.to_string());
                }
            }
        }
    }
    None
}

/// Collects text from multiple elements matching one selector, normalized per element.
pub(crate) fn extract_all_text(doc: &Html, selector: &str, limit: usize) -> Vec<String> {
    let Ok(sel) = Selector::parse(selector) else {
        return Vec::new();
    };
    doc.select(&sel)
        .filter_map(|el| {
            let text: String = el.text().collect::<Vec<_>>().join(" ");
            let normalized = normalize_whitespace(&text);
            (!normalized.is_empty()).then_some(normalized)
        })
        .take(limit)
        .collect()
}

/// Block-level elements whose text makes up an assembled body.
pub(crate) const BLOCK_SELECTOR: &str = "p, h1, h2, h3, h4, blockquote, li";

/// Tags whose subtrees are structural noise, never body text.
const NOISE_TAGS: &[&str] = &[
    "nav", "header", "footer", "aside", "script", "style", "noscript", "form", "button",
];

/// Class/id fragments marking advertisement or chrome containers.
const NOISE_MARKERS: &[&str] = &["ad-", "ads", "advert", "promo", "sidebar", "banner", "cookie"];

/// Returns true if the element sits under a structural-noise ancestor.
pub(crate) fn has_noisy_ancestor(el: &ElementRef) -> bool {
    for ancestor in el.ancestors() {
        let Some(parent) = ElementRef::wrap(ancestor) else {
            continue;
        };
        let tag = parent.value().name();
        if NOISE_TAGS.contains(&tag) {
            return true;
        }
        let marker_hit = parent
            .value()
            .attr("class")
            .into_iter()
            .chain(parent.value().attr("id"))
            .any(|v| {
                let lower = v.to_lowercase();
                NOISE_MARKERS.iter().any(|m| lower.contains(m))
            });
        if marker_hit {
            return true;
        }
    }
    false
}

/// Assemble body text from block-level elements inside a container.
///
/// Blocks shorter than `min_block_len` characters are dropped. When
/// `strip_noise` is set, blocks under navigation/ad/script ancestors are
/// dropped too.
pub(crate) fn assemble_block_text(
    container: &ElementRef,
    min_block_len: usize,
    strip_noise: bool,
) -> String {
    let Ok(block_sel) = Selector::parse(BLOCK_SELECTOR) else {
        return String::new();
    };

    let mut blocks = Vec::new();
    for el in container.select(&block_sel) {
        if strip_noise && has_noisy_ancestor(&el) {
            continue;
        }
        let text: String = el.text().collect::<Vec<_>>().join(" ");
        let normalized = normalize_whitespace(&text);
        if normalized.chars().count() > min_block_len {
            blocks.push(normalized);
        }
    }
    blocks.join("\n\n")
}

/// Find the first container from an ordered selector list whose assembled
/// block text exceeds `min_total_len` characters.
pub(crate) fn first_qualifying_container(
    doc: &Html,
    container_selectors: &[&str],
    min_block_len: usize,
    min_total_len: usize,
    strip_noise: bool,
) -> Option<String> {
    for &sel_str in container_selectors {
        let Ok(sel) = Selector::parse(sel_str) else {
            continue;
        };
        if let Some(container) = doc.select(&sel).next() {
            let text = assemble_block_text(&container, min_block_len, strip_noise);
            if text.chars().count() > min_total_len {
                return Some(text);
            }
        }
    }
    None
}

/// Whole-document text fallback: every text node, noise subtrees excluded.
pub(crate) fn whole_document_text(doc: &Html) -> String {
    let Ok(sel) = Selector::parse("body *") else {
        return String::new();
    };
    let mut parts = Vec::new();
    for el in doc.select(&sel) {
        let tag = el.value().name();
        if NOISE_TAGS.contains(&tag) || has_noisy_ancestor(&el) {
            continue;
        }
        // Only leaf-ish text: own text nodes, to avoid repeating nested content.
        let own_text: String = el
            .children()
            .filter_map(|c| c.value().as_text().map(|t| t.to_string()))
            .collect::<Vec<_>>()
            .join(" ");
        let normalized = normalize_whitespace(&own_text);
        if !normalized.is_empty() {
            parts.push(normalized);
        }
    }
    parts.join("\n")
}
