// ABOUTME: Data model for extraction results: ExtractedDocument, metadata, manifests, BatchResult.
// ABOUTME: Includes the prompt-block rendering helper consumed by downstream prompt builders.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::classify::LinkType;

/// Outcome of a single extraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum DocumentStatus {
    #[default]
    Success,
    Error,
}

/// A recognized, structured project manifest.
///
/// Represented as a tagged union: recognized manifest kinds parse into the
/// `Package` record; everything else stays as an opaque preview on the
/// surrounding [`ProjectFile`] with no `manifest` attached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Manifest {
    Package {
        name: Option<String>,
        version: Option<String>,
        description: Option<String>,
        dependencies: Vec<String>,
    },
}

/// A well-known project file found during the manifest probe.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectFile {
    /// File category, e.g. "manifest", "license", "container", "build".
    pub kind: String,
    /// Human description of what the file is.
    pub description: String,
    /// First 500 characters of the file.
    pub content_preview: String,
    /// Byte length of the fetched file.
    pub size: usize,
    /// Structured record for recognized manifest kinds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manifest: Option<Manifest>,
}

/// Repository-specific metadata attached to source-repo documents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct RepoMetadata {
    pub stars: Option<u64>,
    pub forks: Option<u64>,
    pub language: Option<String>,
    /// Full README text; empty when missing on both probed branches.
    pub readme: String,
    pub topics: Vec<String>,
    /// Keyed by filename, ordered for deterministic output.
    pub project_files: BTreeMap<String, ProjectFile>,
    pub default_branch: String,
}

/// Metadata shared by all document kinds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct DocumentMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub platform: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub publish_date: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reading_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repo: Option<RepoMetadata>,
}

/// A structured, prompt-ready document extracted from one URL.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractedDocument {
    pub id: String,
    pub url: String,
    pub link_type: LinkType,
    pub title: String,
    pub description: String,
    pub body_text: String,
    pub metadata: DocumentMetadata,
    pub fetched_at: DateTime<Utc>,
    pub status: DocumentStatus,
    /// Machine-readable failure indicator for error documents.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ExtractedDocument {
    /// Create a success document skeleton for a URL.
    pub fn success(url: impl Into<String>, link_type: LinkType) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            url: url.into(),
            link_type,
            title: String::new(),
            description: String::new(),
            body_text: String::new(),
            metadata: DocumentMetadata::default(),
            fetched_at: Utc::now(),
            status: DocumentStatus::Success,
            error: None,
        }
    }

    /// Create an error document for a URL that could not be extracted.
    ///
    /// Error documents always carry an empty body.
    pub fn failed(url: impl Into<String>, link_type: LinkType, error: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            url: url.into(),
            link_type,
            title: String::new(),
            description: String::new(),
            body_text: String::new(),
            metadata: DocumentMetadata::default(),
            fetched_at: Utc::now(),
            status: DocumentStatus::Error,
            error: Some(error.into()),
        }
    }

    /// Returns true if extraction succeeded.
    pub fn is_success(&self) -> bool {
        self.status == DocumentStatus::Success
    }

    /// Render the document as a compact text block for prompt interpolation.
    ///
    /// Downstream generators splice this into their prompts; the format favors
    /// short labeled lines over structure.
    pub fn to_prompt_block(&self) -> String {
        let mut lines = Vec::new();

        if !self.title.is_empty() {
            lines.push(format!("Title: {}", self.title));
        }
        lines.push(format!("Source: {}", self.url));
        if !self.description.is_empty() {
            lines.push(format!("Summary: {}", self.description));
        }
        if let Some(ref author) = self.metadata.author {
            lines.push(format!("Author: {}", author));
        }
        if !self.metadata.tags.is_empty() {
            lines.push(format!("Tags: {}", self.metadata.tags.join(", ")));
        }
        if let Some(ref repo) = self.metadata.repo {
            let mut facts = Vec::new();
            if let Some(stars) = repo.stars {
                facts.push(format!("{} stars", stars));
            }
            if let Some(forks) = repo.forks {
                facts.push(format!("{} forks", forks));
            }
            if let Some(ref lang) = repo.language {
                facts.push(lang.clone());
            }
            if !facts.is_empty() {
                lines.push(format!("Repository: {}", facts.join(", ")));
            }
        }
        if !self.body_text.is_empty() {
            lines.push(String::new());
            lines.push(self.body_text.clone());
        }

        lines.join("\n")
    }
}

/// Summary counters for one batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct BatchSummary {
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
}

/// The result of one batch scrape: one document per input URL, in input order.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct BatchResult {
    pub documents: Vec<ExtractedDocument>,
    pub summary: BatchSummary,
}

impl BatchResult {
    /// Build a result from an ordered document list, deriving the summary.
    pub fn from_documents(documents: Vec<ExtractedDocument>) -> Self {
        let succeeded = documents.iter().filter(|d| d.is_success()).count();
        let summary = BatchSummary {
            total: documents.len(),
            succeeded,
            failed: documents.len() - succeeded,
        };
        Self { documents, summary }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn failed_documents_have_empty_body() {
        let doc = ExtractedDocument::failed("https://x.test", LinkType::Website, "timeout");
        assert_eq!(doc.status, DocumentStatus::Error);
        assert_eq!(doc.body_text, "");
        assert_eq!(doc.error.as_deref(), Some("timeout"));
    }

    #[test]
    fn summary_counts_match_statuses() {
        let docs = vec![
            ExtractedDocument::success("https://a.test", LinkType::Website),
            ExtractedDocument::failed("https://b.test", LinkType::Website, "network_failure"),
            ExtractedDocument::success("https://c.test", LinkType::Article),
        ];
        let result = BatchResult::from_documents(docs);
        assert_eq!(result.summary.total, 3);
        assert_eq!(result.summary.succeeded, 2);
        assert_eq!(result.summary.failed, 1);
    }

    #[test]
    fn prompt_block_includes_labeled_fields() {
        let mut doc = ExtractedDocument::success("https://a.test/post", LinkType::Article);
        doc.title = "A Post".to_string();
        doc.description = "About things".to_string();
        doc.metadata.author = Some("Jane".to_string());
        doc.metadata.tags = vec!["rust".to_string(), "web".to_string()];
        doc.body_text = "Body goes here.".to_string();

        let block = doc.to_prompt_block();
        assert!(block.contains("Title: A Post"));
        assert!(block.contains("Source: https://a.test/post"));
        assert!(block.contains("Summary: About things"));
        assert!(block.contains("Author: Jane"));
        assert!(block.contains("Tags: rust, web"));
        assert!(block.ends_with("Body goes here."));
    }

    #[test]
    fn prompt_block_includes_repo_facts() {
        let mut doc = ExtractedDocument::success("https://github.com/a/b", LinkType::SourceRepo);
        doc.title = "a/b".to_string();
        doc.metadata.repo = Some(RepoMetadata {
            stars: Some(120),
            forks: Some(7),
            language: Some("Rust".to_string()),
            ..Default::default()
        });
        let block = doc.to_prompt_block();
        assert!(block.contains("Repository: 120 stars, 7 forks, Rust"));
    }

    #[test]
    fn manifest_serializes_tagged() {
        let m = Manifest::Package {
            name: Some("widget".to_string()),
            version: Some("1.0.0".to_string()),
            description: None,
            dependencies: vec!["serde".to_string()],
        };
        let json = serde_json::to_value(&m).unwrap();
        assert_eq!(json["kind"], "package");
        assert_eq!(json["name"], "widget");
    }
}
