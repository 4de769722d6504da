// ABOUTME: Deterministic text cleanup applied to every extracted body before length-capping.
// ABOUTME: Collapses whitespace, strips boilerplate phrases, and truncates with an ellipsis marker.

use once_cell::sync::Lazy;
use regex::Regex;

/// Marker appended to truncated bodies.
pub const ELLIPSIS: &str = "…";

static HORIZONTAL_WS_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^\S\n]+").expect("valid regex"));

static EXCESS_NEWLINES_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n{3,}").expect("valid regex"));

/// Whole-line boilerplate phrases stripped from extracted bodies.
static BOILERPLATE_RES: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"(?i)^(share( this( article| post| story)?)?|share on \w+)[.!]?$",
        r"(?i)^follow( us| me)?( on \w+)?[.!]?$",
        r"(?i)^(subscribe|sign up|sign in|log in|get started|become a member)( .{0,40})?$",
        r"(?i)^.{0,60}\bcookies?\b.{0,80}$",
        r"(?i)^.{0,40}\b(terms of (service|use)|privacy policy)\b.{0,40}$",
        r"(?i)^\d+\s*min(ute)?s?\s+read$",
        r"(?i)^(published|updated|posted)(\s+on)?\s*:?\s+[a-z]{3,9}\.?\s+\d{1,2},?\s+\d{4}$",
        r"(?i)^(published|updated|posted)(\s+on)?\s*:?\s+\d{4}-\d{2}-\d{2}$",
        r"(?i)^[\d,.]+[km]?\s+(claps?|likes?|comments?|followers?|views?|reactions?)$",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("valid boilerplate regex"))
    .collect()
});

fn is_boilerplate_line(line: &str) -> bool {
    BOILERPLATE_RES.iter().any(|re| re.is_match(line))
}

/// Normalize extracted body text.
///
/// Collapses horizontal whitespace runs to one space, trims each line, drops
/// known boilerplate lines, collapses 3+ consecutive newlines to exactly two,
/// and trims the result. Idempotent: normalizing already-normalized text is a
/// no-op.
pub fn normalize(text: &str) -> String {
    let collapsed = HORIZONTAL_WS_RE.replace_all(text, " ");

    let lines: Vec<&str> = collapsed
        .lines()
        .map(str::trim)
        .filter(|line| !is_boilerplate_line(line))
        .collect();
    let joined = lines.join("\n");

    EXCESS_NEWLINES_RE
        .replace_all(&joined, "\n\n")
        .trim()
        .to_string()
}

/// Cap text at `max_len` characters, appending the ellipsis marker when cut.
///
/// The returned text minus the marker is always a prefix of the input.
pub fn truncate(text: &str, max_len: usize) -> String {
    if text.chars().count() <= max_len {
        return text.to_string();
    }
    let mut capped: String = text.chars().take(max_len).collect();
    capped.push_str(ELLIPSIS);
    capped
}

/// Normalize and length-cap in one pass, the form every strategy output goes through.
pub fn normalize_with_limit(text: &str, max_len: usize) -> String {
    truncate(&normalize(text), max_len)
}
