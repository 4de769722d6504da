// ABOUTME: Source-repo extraction strategy: repo page parse, README probe with branch retry, manifest probes.
// ABOUTME: Missing README or manifests degrade the result, they never fail the strategy.

use once_cell::sync::Lazy;
use regex::Regex;
use scraper::Html;

use crate::classify::LinkType;
use crate::document::{ExtractedDocument, Manifest, ProjectFile, RepoMetadata};
use crate::error::ScrapeError;
use crate::fetch::{fetch, FetchOptions};
use crate::options::ScrapeOptions;

use super::{extract_all_text, extract_first_text, extract_meta_content};

/// Branches probed for raw content, in order.
const BRANCH_CANDIDATES: &[&str] = &["main", "master"];

/// Characters of each probed file kept as a preview.
const PREVIEW_LEN: usize = 500;

/// Well-known project files probed on every repo: (filename, kind, description).
const PROJECT_FILE_PROBES: &[(&str, &str, &str)] = &[
    ("package.json", "manifest", "Node.js dependency manifest"),
    ("Cargo.toml", "manifest", "Rust crate manifest"),
    ("pyproject.toml", "manifest", "Python project manifest"),
    ("go.mod", "manifest", "Go module definition"),
    ("Dockerfile", "container", "Container build descriptor"),
    ("LICENSE", "license", "Project license"),
    ("Makefile", "build", "Build entry points"),
];

/// Owner/repo pair parsed from a source-host URL.
#[derive(Debug, Clone, PartialEq, Eq)]
struct RepoRef {
    origin: String,
    host: String,
    owner: String,
    repo: String,
}

impl RepoRef {
    fn parse(url: &str) -> Result<Self, ScrapeError> {
        let parsed = url::Url::parse(url).map_err(|e| {
            ScrapeError::invalid_url(url, "ExtractRepo", Some(anyhow::anyhow!("{}", e)))
        })?;
        let host = parsed
            .host_str()
            .map(|h| h.to_lowercase())
            .unwrap_or_default();
        let mut segments = parsed
            .path_segments()
            .map(|s| s.filter(|p| !p.is_empty()))
            .ok_or_else(|| {
                ScrapeError::parse(url, "ExtractRepo", Some(anyhow::anyhow!("no path")))
            })?;
        let owner = segments.next().unwrap_or_default().to_string();
        let repo = segments
            .next()
            .unwrap_or_default()
            .trim_end_matches(".git")
            .to_string();
        if owner.is_empty() || repo.is_empty() {
            return Err(ScrapeError::parse(
                url,
                "ExtractRepo",
                Some(anyhow::anyhow!("URL does not name an owner/repo pair")),
            ));
        }
        Ok(Self {
            origin: parsed.origin().ascii_serialization(),
            host,
            owner,
            repo,
        })
    }

    /// Raw-content endpoint for a file on a branch.
    ///
    /// github.com serves raw files from a dedicated host; other source hosts
    /// (and test servers) use the conventional `/raw/` path on the same origin.
    fn raw_url(&self, branch: &str, file: &str) -> String {
        if self.host == "github.com" {
            format!(
                "https://raw.githubusercontent.com/{}/{}/{}/{}",
                self.owner, self.repo, branch, file
            )
        } else {
            format!(
                "{}/{}/{}/raw/{}/{}",
                self.origin, self.owner, self.repo, branch, file
            )
        }
    }

    fn slug(&self) -> String {
        format!("{}/{}", self.owner, self.repo)
    }
}

static COUNT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([\d][\d,.]*)\s*([kKmM])?").expect("valid count regex"));

/// Parse a lenient social count like "1.2k", "5,321", or "12".
fn parse_count(text: &str) -> Option<u64> {
    let caps = COUNT_RE.captures(text.trim())?;
    let number: f64 = caps[1].replace(',', "").parse().ok()?;
    let multiplier = match caps.get(2).map(|m| m.as_str().to_lowercase()) {
        Some(s) if s == "k" => 1_000.0,
        Some(s) if s == "m" => 1_000_000.0,
        _ => 1.0,
    };
    Some((number * multiplier) as u64)
}

/// Fetch a raw file from the default branch, retrying once on the alternate
/// conventional branch name. Returns the body and the branch that served it.
async fn probe_raw_file(
    client: &reqwest::Client,
    repo: &RepoRef,
    file: &str,
    opts: &ScrapeOptions,
) -> Option<(String, &'static str)> {
    let fetch_opts = FetchOptions {
        headers: opts.headers.clone(),
        timeout: opts.probe_timeout,
        accept_non_200: false,
    };
    for &branch in BRANCH_CANDIDATES {
        match fetch(client, &repo.raw_url(branch, file), &fetch_opts).await {
            Ok(result) => return Some((result.text(), branch)),
            Err(err) => {
                tracing::debug!(file, branch, %err, "raw probe miss");
            }
        }
    }
    None
}

/// Parse a recognized manifest into its typed record.
fn parse_manifest(filename: &str, content: &str) -> Option<Manifest> {
    match filename {
        "package.json" => {
            let value: serde_json::Value = serde_json::from_str(content).ok()?;
            let dependencies = value
                .get("dependencies")
                .and_then(|d| d.as_object())
                .map(|d| d.keys().cloned().collect())
                .unwrap_or_default();
            Some(Manifest::Package {
                name: value.get("name").and_then(|v| v.as_str()).map(String::from),
                version: value
                    .get("version")
                    .and_then(|v| v.as_str())
                    .map(String::from),
                description: value
                    .get("description")
                    .and_then(|v| v.as_str())
                    .map(String::from),
                dependencies,
            })
        }
        "Cargo.toml" => {
            let value: toml::Value = toml::from_str(content).ok()?;
            let package = value.get("package");
            let field = |key: &str| {
                package
                    .and_then(|p| p.get(key))
                    .and_then(|v| v.as_str())
                    .map(String::from)
            };
            let dependencies = value
                .get("dependencies")
                .and_then(|d| d.as_table())
                .map(|d| d.keys().cloned().collect())
                .unwrap_or_default();
            Some(Manifest::Package {
                name: field("name"),
                version: field("version"),
                description: field("description"),
                dependencies,
            })
        }
        _ => None,
    }
}

fn preview_of(content: &str) -> String {
    content.chars().take(PREVIEW_LEN).collect()
}

/// Extract a source-repo page.
///
/// Partial results are a success: a missing README (after the branch retry)
/// or missing manifests leave those fields empty without failing the strategy.
pub async fn extract(
    client: &reqwest::Client,
    url: &str,
    opts: &ScrapeOptions,
) -> Result<ExtractedDocument, ScrapeError> {
    let repo_ref = RepoRef::parse(url)?;

    let fetch_opts = FetchOptions {
        headers: opts.headers.clone(),
        timeout: opts.timeout,
        accept_non_200: false,
    };
    let page = fetch(client, url, &fetch_opts).await?;
    let html = page.text();
    let doc = Html::parse_document(&html);

    let title = extract_first_text(
        &doc,
        &["meta[property='og:title']", "strong[itemprop='name'] a", "h1"],
    )
    .unwrap_or_else(|| repo_ref.slug());
    let description = extract_meta_content(&doc, "meta[property='og:description']")
        .or_else(|| extract_first_text(&doc, &["p.f4", "meta[name='description']"]))
        .unwrap_or_default();

    let stars = extract_first_text(&doc, &["#repo-stars-counter-star", "a[href$='/stargazers']"])
        .and_then(|t| parse_count(&t));
    let forks = extract_first_text(&doc, &["#repo-network-counter", "a[href$='/forks']"])
        .and_then(|t| parse_count(&t));
    let language = extract_first_text(&doc, &["span[itemprop='programmingLanguage']"]);
    let topics = extract_all_text(&doc, "a.topic-tag, a[href^='/topics/']", 10);

    let mut repo_meta = RepoMetadata {
        stars,
        forks,
        language,
        topics,
        default_branch: BRANCH_CANDIDATES[0].to_string(),
        ..Default::default()
    };

    // README probe: default branch then the alternate conventional name.
    // Missing on both is an empty body, not a failure.
    let mut body_text = String::new();
    if let Some((readme, branch)) = probe_raw_file(client, &repo_ref, "README.md", opts).await {
        repo_meta.default_branch = branch.to_string();
        repo_meta.readme = readme.clone();
        body_text = readme;
    }

    // Manifest probe loop: each file independently fetched and independently
    // skippable; one miss never aborts the loop.
    for (filename, kind, file_description) in PROJECT_FILE_PROBES {
        let Some((content, _)) = probe_raw_file(client, &repo_ref, filename, opts).await else {
            continue;
        };
        let manifest = parse_manifest(filename, &content);
        repo_meta.project_files.insert(
            filename.to_string(),
            ProjectFile {
                kind: kind.to_string(),
                description: file_description.to_string(),
                content_preview: preview_of(&content),
                size: content.len(),
                manifest,
            },
        );
    }

    let mut document = ExtractedDocument::success(url, LinkType::SourceRepo);
    document.title = title;
    document.description = description;
    document.body_text = body_text;
    document.metadata.platform = Some(repo_ref.host.clone());
    document.metadata.language = repo_meta.language.clone();
    document.metadata.tags = repo_meta.topics.clone();
    document.metadata.repo = Some(repo_meta);
    Ok(document)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn repo_ref_parses_owner_and_repo() {
        let r = RepoRef::parse("https://github.com/acme/widget").unwrap();
        assert_eq!(r.owner, "acme");
        assert_eq!(r.repo, "widget");
        assert_eq!(r.host, "github.com");

        let r = RepoRef::parse("https://gitlab.com/acme/widget.git").unwrap();
        assert_eq!(r.repo, "widget");
    }

    #[test]
    fn repo_ref_rejects_bare_host() {
        let err = RepoRef::parse("https://github.com/").unwrap_err();
        assert!(err.is_parse());
        let err = RepoRef::parse("https://github.com/acme").unwrap_err();
        assert!(err.is_parse());
    }

    #[test]
    fn raw_url_uses_dedicated_host_for_github() {
        let r = RepoRef::parse("https://github.com/acme/widget").unwrap();
        assert_eq!(
            r.raw_url("main", "README.md"),
            "https://raw.githubusercontent.com/acme/widget/main/README.md"
        );
    }

    #[test]
    fn raw_url_uses_raw_path_for_other_hosts() {
        let r = RepoRef::parse("http://127.0.0.1:8080/acme/widget").unwrap();
        assert_eq!(
            r.raw_url("master", "Cargo.toml"),
            "http://127.0.0.1:8080/acme/widget/raw/master/Cargo.toml"
        );
    }

    #[test]
    fn parse_count_handles_suffixes() {
        assert_eq!(parse_count("1.2k"), Some(1200));
        assert_eq!(parse_count(" 5,321 "), Some(5321));
        assert_eq!(parse_count("12"), Some(12));
        assert_eq!(parse_count("3.1M"), Some(3_100_000));
        assert_eq!(parse_count("no digits"), None);
    }

    #[test]
    fn parses_package_json_manifest() {
        let content = r#"{
            "name": "widget",
            "version": "2.1.0",
            "description": "A widget",
            "dependencies": {"react": "^18", "lodash": "^4"}
        }"#;
        let m = parse_manifest("package.json", content).unwrap();
        let Manifest::Package {
            name,
            version,
            description,
            dependencies,
        } = m;
        assert_eq!(name.as_deref(), Some("widget"));
        assert_eq!(version.as_deref(), Some("2.1.0"));
        assert_eq!(description.as_deref(), Some("A widget"));
        assert_eq!(dependencies, vec!["lodash".to_string(), "react".to_string()]);
    }

    #[test]
    fn parses_cargo_toml_manifest() {
        let content = r#"
            [package]
            name = "widget"
            version = "0.3.0"

            [dependencies]
            serde = "1"
            tokio = { version = "1", features = ["full"] }
        "#;
        let m = parse_manifest("Cargo.toml", content).unwrap();
        let Manifest::Package {
            name,
            version,
            dependencies,
            ..
        } = m;
        assert_eq!(name.as_deref(), Some("widget"));
        assert_eq!(version.as_deref(), Some("0.3.0"));
        assert_eq!(dependencies, vec!["serde".to_string(), "tokio".to_string()]);
    }

    #[test]
    fn unrecognized_files_have_no_manifest() {
        assert!(parse_manifest("Dockerfile", "FROM rust:1.80").is_none());
        assert!(parse_manifest("package.json", "not json").is_none());
    }

    #[test]
    fn preview_caps_at_500_chars() {
        let content = "x".repeat(900);
        assert_eq!(preview_of(&content).chars().count(), 500);
        assert_eq!(preview_of("short"), "short");
    }
}
