// ABOUTME: Integration tests for the source-repo strategy against a mock source host.
// ABOUTME: Covers the README main→master retry, partial-result success, and manifest probes.

use httpmock::prelude::*;
use pretty_assertions::assert_eq;
use promptlink::extractors::repo;
use promptlink::{DocumentStatus, Manifest, ScrapeOptions};

const REPO_PAGE: &str = r#"
    <html>
    <head>
        <meta property="og:description" content="A fine widget.">
    </head>
    <body>
        <strong itemprop="name"><a href="/acme/widget">widget</a></strong>
        <span id="repo-stars-counter-star">1.2k</span>
        <span id="repo-network-counter">34</span>
        <span itemprop="programmingLanguage">Rust</span>
        <a class="topic-tag" href="/topics/cli">cli</a>
        <a class="topic-tag" href="/topics/parsing">parsing</a>
    </body>
    </html>
"#;

fn scraper_client() -> reqwest::Client {
    promptlink::fetch::build_http_client("test-agent", true)
}

#[tokio::test]
async fn readme_miss_on_main_retries_master_once() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/acme/widget");
        then.status(200).header("content-type", "text/html").body(REPO_PAGE);
    });
    let main_readme = server.mock(|when, then| {
        when.method(GET).path("/acme/widget/raw/main/README.md");
        then.status(404);
    });
    let master_readme = server.mock(|when, then| {
        when.method(GET).path("/acme/widget/raw/master/README.md");
        then.status(200)
            .header("content-type", "text/plain")
            .body("# widget\n\nDoes widget things.");
    });

    let doc = repo::extract(
        &scraper_client(),
        &server.url("/acme/widget"),
        &ScrapeOptions::default(),
    )
    .await
    .expect("repo extraction succeeds");

    main_readme.assert_hits(1);
    master_readme.assert_hits(1);

    assert_eq!(doc.status, DocumentStatus::Success);
    assert!(doc.body_text.contains("Does widget things"));
    let repo_meta = doc.metadata.repo.expect("repo metadata present");
    assert_eq!(repo_meta.default_branch, "master");
    assert!(repo_meta.readme.contains("# widget"));
}

#[tokio::test]
async fn readme_missing_on_both_branches_is_still_success() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/acme/widget");
        then.status(200).header("content-type", "text/html").body(REPO_PAGE);
    });
    let main_readme = server.mock(|when, then| {
        when.method(GET).path("/acme/widget/raw/main/README.md");
        then.status(404);
    });
    let master_readme = server.mock(|when, then| {
        when.method(GET).path("/acme/widget/raw/master/README.md");
        then.status(404);
    });

    let doc = repo::extract(
        &scraper_client(),
        &server.url("/acme/widget"),
        &ScrapeOptions::default(),
    )
    .await
    .expect("partial results are a success");

    // Exactly one retry against the alternate branch, then give up.
    main_readme.assert_hits(1);
    master_readme.assert_hits(1);

    assert_eq!(doc.status, DocumentStatus::Success);
    assert_eq!(doc.body_text, "");
    assert_eq!(doc.title, "widget");
    assert_eq!(doc.description, "A fine widget.");

    let repo_meta = doc.metadata.repo.expect("repo metadata present");
    assert_eq!(repo_meta.readme, "");
    assert_eq!(repo_meta.stars, Some(1200));
    assert_eq!(repo_meta.forks, Some(34));
    assert_eq!(repo_meta.language.as_deref(), Some("Rust"));
    assert_eq!(repo_meta.topics, vec!["cli".to_string(), "parsing".to_string()]);
}

#[tokio::test]
async fn manifest_probe_parses_recognized_files_and_skips_misses() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/acme/widget");
        then.status(200).header("content-type", "text/html").body(REPO_PAGE);
    });
    server.mock(|when, then| {
        when.method(GET).path("/acme/widget/raw/main/README.md");
        then.status(200).body("# widget");
    });
    server.mock(|when, then| {
        when.method(GET).path("/acme/widget/raw/main/package.json");
        then.status(200)
            .header("content-type", "application/json")
            .body(r#"{"name":"widget","version":"2.0.0","dependencies":{"react":"^18"}}"#);
    });
    server.mock(|when, then| {
        when.method(GET).path("/acme/widget/raw/main/LICENSE");
        then.status(200).body("MIT License");
    });
    // Cargo.toml, pyproject.toml, go.mod, Dockerfile, Makefile stay unmocked
    // and 404 on both branches; misses are skipped, never fatal.

    let doc = repo::extract(
        &scraper_client(),
        &server.url("/acme/widget"),
        &ScrapeOptions::default(),
    )
    .await
    .expect("repo extraction succeeds");

    let repo_meta = doc.metadata.repo.expect("repo metadata present");
    assert_eq!(repo_meta.default_branch, "main");
    assert_eq!(repo_meta.project_files.len(), 2);

    let pkg = &repo_meta.project_files["package.json"];
    assert_eq!(pkg.kind, "manifest");
    assert_eq!(pkg.size, pkg.content_preview.len());
    match pkg.manifest.as_ref().expect("package.json parses") {
        Manifest::Package {
            name,
            version,
            dependencies,
            ..
        } => {
            assert_eq!(name.as_deref(), Some("widget"));
            assert_eq!(version.as_deref(), Some("2.0.0"));
            assert_eq!(dependencies, &vec!["react".to_string()]);
        }
    }

    let license = &repo_meta.project_files["LICENSE"];
    assert_eq!(license.kind, "license");
    assert_eq!(license.content_preview, "MIT License");
    assert!(license.manifest.is_none());
}

#[tokio::test]
async fn long_manifest_preview_is_capped_at_500_chars() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/acme/widget");
        then.status(200).header("content-type", "text/html").body(REPO_PAGE);
    });
    let license_body = "L".repeat(2000);
    server.mock(|when, then| {
        when.method(GET).path("/acme/widget/raw/main/LICENSE");
        then.status(200).body(&license_body);
    });

    let doc = repo::extract(
        &scraper_client(),
        &server.url("/acme/widget"),
        &ScrapeOptions::default(),
    )
    .await
    .expect("repo extraction succeeds");

    let repo_meta = doc.metadata.repo.expect("repo metadata present");
    let license = &repo_meta.project_files["LICENSE"];
    assert_eq!(license.content_preview.chars().count(), 500);
    assert_eq!(license.size, 2000);
}
