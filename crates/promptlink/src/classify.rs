// ABOUTME: Link classifier mapping a URL to a content-type category via a fixed-priority rule table.
// ABOUTME: Pure function of the URL string; confidence scores are advisory only.

use serde::{Deserialize, Serialize};
use url::Url;

/// Content-type category for a URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum LinkType {
    SourceRepo,
    Article,
    Documentation,
    Social,
    Video,
    Qa,
    #[default]
    Website,
}

impl LinkType {
    pub fn as_str(&self) -> &'static str {
        match self {
            LinkType::SourceRepo => "source_repo",
            LinkType::Article => "article",
            LinkType::Documentation => "documentation",
            LinkType::Social => "social",
            LinkType::Video => "video",
            LinkType::Qa => "qa",
            LinkType::Website => "website",
        }
    }
}

/// Classification of one URL.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    pub url: String,
    pub link_type: LinkType,
    /// Advisory only; never changes downstream behavior.
    pub confidence: f32,
}

const SOURCE_REPO_HOSTS: &[&str] = &["github.com", "gitlab.com", "bitbucket.org"];

const ARTICLE_HOSTS: &[&str] = &["medium.com", "dev.to", "substack.com", "hashnode.com", "hashnode.dev"];

const SOCIAL_HOSTS: &[&str] = &[
    "linkedin.com",
    "twitter.com",
    "x.com",
    "facebook.com",
    "instagram.com",
    "mastodon.social",
    "reddit.com",
];

const VIDEO_HOSTS: &[&str] = &["youtube.com", "youtu.be", "vimeo.com"];

const QA_HOSTS: &[&str] = &["stackoverflow.com", "stackexchange.com", "quora.com"];

/// Returns true if `host` is `domain` or a subdomain of it.
fn host_matches(host: &str, domain: &str) -> bool {
    host == domain || host.ends_with(&format!(".{}", domain))
}

fn any_host_matches(host: &str, domains: &[&str]) -> bool {
    domains.iter().any(|d| host_matches(host, d))
}

/// Classify a URL into a content-type category.
///
/// Rules are evaluated in fixed priority order; the first match wins.
/// Unparseable URLs fall through to `Website` with minimum confidence.
pub fn classify(url: &str) -> Classification {
    let (link_type, confidence) = match Url::parse(url) {
        Ok(parsed) => {
            let host = parsed
                .host_str()
                .map(|h| h.to_lowercase())
                .unwrap_or_default();
            let path = parsed.path().to_lowercase();
            classify_host_path(&host, &path)
        }
        Err(_) => (LinkType::Website, 0.1),
    };

    Classification {
        url: url.to_string(),
        link_type,
        confidence,
    }
}

fn classify_host_path(host: &str, path: &str) -> (LinkType, f32) {
    if any_host_matches(host, SOURCE_REPO_HOSTS) {
        return (LinkType::SourceRepo, 0.95);
    }
    if any_host_matches(host, ARTICLE_HOSTS) {
        return (LinkType::Article, 0.9);
    }
    if path.contains("/blog/") {
        return (LinkType::Article, 0.6);
    }
    // "docs." may appear anywhere in the host: docs.rs, api.docs.example.com,
    // widget.readthedocs.io.
    if host.contains("docs.") || host.contains("documentation.") {
        return (LinkType::Documentation, 0.85);
    }
    if any_host_matches(host, SOCIAL_HOSTS) {
        return (LinkType::Social, 0.9);
    }
    if any_host_matches(host, VIDEO_HOSTS) {
        return (LinkType::Video, 0.9);
    }
    if any_host_matches(host, QA_HOSTS) {
        return (LinkType::Qa, 0.9);
    }
    (LinkType::Website, 0.3)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn classifies_source_repo_hosts() {
        assert_eq!(
            classify("https://github.com/acme/widget").link_type,
            LinkType::SourceRepo
        );
        assert_eq!(
            classify("https://gitlab.com/acme/widget").link_type,
            LinkType::SourceRepo
        );
    }

    #[test]
    fn classifies_article_platforms() {
        assert_eq!(
            classify("https://medium.com/@x/post-1").link_type,
            LinkType::Article
        );
        assert_eq!(
            classify("https://dev.to/someone/a-post").link_type,
            LinkType::Article
        );
        assert_eq!(
            classify("https://mynewsletter.substack.com/p/hello").link_type,
            LinkType::Article
        );
    }

    #[test]
    fn blog_path_is_article_with_lower_confidence() {
        let c = classify("https://acme.dev/blog/launch");
        assert_eq!(c.link_type, LinkType::Article);
        assert!(c.confidence < classify("https://medium.com/@x/p").confidence);
    }

    #[test]
    fn classifies_documentation_hosts() {
        assert_eq!(
            classify("https://docs.rs/serde").link_type,
            LinkType::Documentation
        );
        assert_eq!(
            classify("https://widget.readthedocs.io/en/latest/").link_type,
            LinkType::Documentation
        );
    }

    #[test]
    fn documentation_label_matches_anywhere_in_host() {
        assert_eq!(
            classify("https://api.docs.example.com/reference").link_type,
            LinkType::Documentation
        );
        assert_eq!(
            classify("https://documentation.acme.dev/guide").link_type,
            LinkType::Documentation
        );
    }

    #[test]
    fn classifies_social_video_and_qa() {
        assert_eq!(
            classify("https://www.linkedin.com/in/someone").link_type,
            LinkType::Social
        );
        assert_eq!(
            classify("https://www.youtube.com/watch?v=abc").link_type,
            LinkType::Video
        );
        assert_eq!(
            classify("https://stackoverflow.com/questions/1").link_type,
            LinkType::Qa
        );
    }

    #[test]
    fn unknown_hosts_fall_back_to_website() {
        let c = classify("https://example.com/page");
        assert_eq!(c.link_type, LinkType::Website);
        assert!(c.confidence <= 0.3);
    }

    #[test]
    fn priority_source_repo_beats_blog_path() {
        // github.com/.../blog/... is still a repo URL
        assert_eq!(
            classify("https://github.com/acme/blog/tree/main").link_type,
            LinkType::SourceRepo
        );
    }

    #[test]
    fn classification_is_pure() {
        let a = classify("https://dev.to/x/y");
        let b = classify("https://dev.to/x/y");
        assert_eq!(a, b);
    }

    #[test]
    fn subdomain_matching_does_not_overreach() {
        // "notgithub.com" must not match "github.com"
        assert_eq!(
            classify("https://notgithub.com/a/b").link_type,
            LinkType::Website
        );
    }
}
