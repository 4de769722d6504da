// ABOUTME: Link detector that scans free text for http(s) URL substrings.
// ABOUTME: Returns URLs with byte offsets in first-appearance order, duplicates included.

use once_cell::sync::Lazy;
use regex::Regex;

/// A URL found in free text, with the byte offset where it starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetectedLink {
    pub url: String,
    pub offset: usize,
}

static URL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"https?://[^\s<>]+").expect("valid URL regex"));

/// Scan raw text for every `http(s)://` URL substring.
///
/// Syntax only, no reachability check. Output is ordered by first appearance
/// and keeps duplicates. Trailing sentence punctuation and unbalanced closing
/// brackets are trimmed so that prose like "see https://a.test/x." detects
/// `https://a.test/x`.
pub fn detect_links(text: &str) -> Vec<DetectedLink> {
    URL_RE
        .find_iter(text)
        .filter_map(|m| {
            let trimmed = trim_trailing(m.as_str());
            if trimmed.is_empty() {
                None
            } else {
                Some(DetectedLink {
                    url: trimmed.to_string(),
                    offset: m.start(),
                })
            }
        })
        .collect()
}

/// Trim characters that belong to the surrounding prose, not the URL.
fn trim_trailing(raw: &str) -> &str {
    let mut url = raw;
    loop {
        let Some(last) = url.chars().last() else {
            return url;
        };
        let trim = match last {
            '.' | ',' | ';' | ':' | '!' | '?' | '\'' | '"' => true,
            ')' => url.matches(')').count() > url.matches('(').count(),
            ']' => url.matches(']').count() > url.matches('[').count(),
            '}' => url.matches('}').count() > url.matches('{').count(),
            _ => false,
        };
        if !trim {
            return url;
        }
        url = &url[..url.len() - last.len_utf8()];
    }
}
