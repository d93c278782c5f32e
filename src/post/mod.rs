//! Post assembly and persistence.
//!
//! Builds the final markdown file (Jekyll-style front matter plus body) and
//! writes it to the posts directory, recording coverage so the topic is not
//! picked again.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use tracing::{info, warn};

use crate::error::StorageError;
use crate::topic::{slugify, CoverageEntry, Topic};

/// Post metadata produced by the writing phase (or synthesized from the
/// topic when the metadata stage fails).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostMeta {
    pub title: String,
    pub excerpt: String,
    pub tags: Vec<String>,
}

impl PostMeta {
    /// Defaults used whenever the metadata stage yields nothing usable.
    pub fn fallback(topic: &Topic) -> Self {
        let title = topic.title.clone();
        let excerpt = topic
            .summary
            .clone()
            .unwrap_or_else(|| format!("Learn about {title}"));
        let tags = if topic.tags.is_empty() {
            vec!["ai".to_string()]
        } else {
            topic.tags.clone()
        };
        Self {
            title,
            excerpt,
            tags,
        }
    }
}

/// Maximum tags carried into the front matter.
const MAX_TAGS: usize = 8;

/// Build the post filename and full file content.
///
/// Filename is `YYYY-MM-DD-<kind>-<slug>.md`, with a `-vN` suffix when the
/// topic has been covered before.
pub fn build_post(
    date: DateTime<Utc>,
    topic: &Topic,
    body: &str,
    meta: &PostMeta,
) -> (String, String) {
    let date_iso = date.format("%Y-%m-%dT09:00:00+00:00").to_string();
    let date_prefix = date.format("%Y-%m-%d").to_string();

    let version_suffix = if topic.version > 1 {
        format!("-v{}", topic.version)
    } else {
        String::new()
    };
    let slug = format!("{}-{}{}", topic.kind, slugify(&topic.title), version_suffix);
    let filename = format!("{date_prefix}-{slug}.md");

    // Double quotes would break the quoted YAML scalar.
    let safe_excerpt = meta.excerpt.replace('"', "'");

    let mut tag_lines = String::new();
    for tag in meta.tags.iter().take(MAX_TAGS) {
        tag_lines.push_str(&format!("\n  - {tag}"));
    }

    let content = format!(
        "---\n\
         title: \"{title}\"\n\
         date: {date_iso}\n\
         last_modified_at: {date_iso}\n\
         categories:\n  - Engineering\n  - AI\n\
         tags:{tag_lines}\n\
         excerpt: \"{safe_excerpt}\"\n\
         ---\n\
         \n\
         {body}\n\
         \n\
         ---\n\
         \n\
         <small>Generated by blogforge</small>\n",
        title = meta.title,
        body = body.trim(),
    );

    (filename, content)
}

/// Durable storage for posts and the coverage history.
pub struct PostStore {
    posts_dir: PathBuf,
    coverage_path: PathBuf,
}

impl PostStore {
    pub fn new(posts_dir: impl Into<PathBuf>, data_dir: impl AsRef<Path>) -> Self {
        Self {
            posts_dir: posts_dir.into(),
            coverage_path: data_dir.as_ref().join("coverage.json"),
        }
    }

    /// Write a post file, de-duplicating the filename with a timestamp
    /// suffix if it already exists.
    pub fn save(&self, filename: &str, content: &str) -> Result<PathBuf, StorageError> {
        fs::create_dir_all(&self.posts_dir).map_err(|source| StorageError::DirectoryCreation {
            path: self.posts_dir.display().to_string(),
            source,
        })?;

        let mut path = self.posts_dir.join(filename);
        if path.exists() {
            let stem = path
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or(filename)
                .to_string();
            let deduped = format!("{}-{}.md", stem, Utc::now().format("%H%M%S"));
            warn!(filename = %deduped, "post file exists, using suffixed name");
            path = self.posts_dir.join(deduped);
        }

        fs::write(&path, content)?;
        info!(path = %path.display(), "saved post");
        Ok(path)
    }

    /// Load the coverage history. A missing file means no coverage yet; a
    /// corrupt file is logged and treated the same so one bad write cannot
    /// brick topic selection.
    pub fn load_coverage(&self) -> Vec<CoverageEntry> {
        let raw = match fs::read_to_string(&self.coverage_path) {
            Ok(raw) => raw,
            Err(_) => return Vec::new(),
        };
        match serde_json::from_str(&raw) {
            Ok(entries) => entries,
            Err(e) => {
                warn!(error = %e, "coverage file unreadable, starting fresh");
                Vec::new()
            }
        }
    }

    /// Append a coverage record for a generated post.
    pub fn record_coverage(&self, topic: &Topic, filename: &str) -> Result<(), StorageError> {
        if let Some(parent) = self.coverage_path.parent() {
            fs::create_dir_all(parent).map_err(|source| StorageError::DirectoryCreation {
                path: parent.display().to_string(),
                source,
            })?;
        }

        let mut coverage = self.load_coverage();
        coverage.push(CoverageEntry::for_topic(topic, filename));
        let serialized = serde_json::to_string_pretty(&coverage)?;
        fs::write(&self.coverage_path, serialized)?;
        info!(kind = %topic.kind, id = %topic.id, version = topic.version, "recorded coverage");
        Ok(())
    }
}
