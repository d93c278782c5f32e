//! Topic selection from JSON data feeds.
//!
//! Feeds live in the data directory as `packages.json`, `repositories.json`,
//! `papers.json`, and `tutorials.json`. Selection walks the feeds in
//! priority order and returns the first entry that has no coverage record
//! yet; a run with nothing left to cover is an error the operator resolves
//! by refreshing the feeds.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::Utc;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::OnceLock;
use tracing::{debug, info, warn};

use crate::error::TopicError;

/// Which feed a topic came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TopicKind {
    Package,
    Repo,
    Paper,
    Tutorial,
}

impl TopicKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TopicKind::Package => "package",
            TopicKind::Repo => "repo",
            TopicKind::Paper => "paper",
            TopicKind::Tutorial => "tutorial",
        }
    }
}

impl std::fmt::Display for TopicKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Subject of one pipeline run. Selected once, immutable afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Topic {
    pub kind: TopicKind,
    pub id: String,
    pub title: String,
    pub url: Option<String>,
    pub summary: Option<String>,
    pub tags: Vec<String>,
    /// How many times this topic has been written about, starting at 1.
    pub version: u32,
}

/// How the research phase should approach a topic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResearchTarget {
    /// A published package; research starts from its registry entry.
    Package,
    /// A repository; research starts from its README.
    Repo,
    /// Anything else; research leans on web search.
    General,
}

/// Classify a topic and pick the identifier research should start from.
pub fn detect_topic_type(topic: &Topic) -> (ResearchTarget, String) {
    match topic.kind {
        TopicKind::Package => (ResearchTarget::Package, topic.id.clone()),
        TopicKind::Repo => {
            if let Some(url) = topic.url.as_deref().filter(|u| u.contains("github.com")) {
                (ResearchTarget::Repo, url.to_string())
            } else {
                (ResearchTarget::Repo, topic.id.clone())
            }
        }
        _ => {
            if let Some(url) = topic
                .url
                .as_deref()
                .filter(|u| u.to_lowercase().contains("github.com"))
            {
                (ResearchTarget::Repo, url.to_string())
            } else {
                (ResearchTarget::General, topic.title.clone())
            }
        }
    }
}

/// Convert text to a URL-friendly slug.
pub fn slugify(text: &str) -> String {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = RE.get_or_init(|| Regex::new(r"[^a-z0-9]+").expect("Invalid slug regex"));
    let slug = re
        .replace_all(&text.to_lowercase(), "-")
        .trim_matches('-')
        .to_string();
    if slug.is_empty() {
        "topic".to_string()
    } else {
        slug
    }
}

/// One line of the coverage history: which topic produced which post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoverageEntry {
    pub kind: TopicKind,
    pub id: String,
    pub version: u32,
    pub date: String,
    pub filename: String,
}

impl CoverageEntry {
    pub fn for_topic(topic: &Topic, filename: &str) -> Self {
        Self {
            kind: topic.kind,
            id: topic.id.clone(),
            version: topic.version,
            date: Utc::now().format("%Y-%m-%d").to_string(),
            filename: filename.to_string(),
        }
    }
}

/// JSON-feed-backed topic selection.
pub struct TopicStore {
    data_dir: PathBuf,
}

/// Feed files in priority order, with the alternate top-level keys each
/// feed has been observed to use.
const FEEDS: &[(TopicKind, &str, &[&str])] = &[
    (TopicKind::Package, "packages.json", &["packages", "top_packages"]),
    (
        TopicKind::Repo,
        "repositories.json",
        &["repositories", "top_repositories"],
    ),
    (TopicKind::Paper, "papers.json", &["papers", "most_cited"]),
    (TopicKind::Tutorial, "tutorials.json", &["tutorials"]),
];

impl TopicStore {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Select the next uncovered topic across all feeds.
    ///
    /// Feeds are consulted in priority order (packages, then repositories,
    /// papers, tutorials) and within each feed the first entry without a
    /// coverage record wins.
    pub fn select_next(&self, coverage: &[CoverageEntry]) -> Result<Topic, TopicError> {
        let mut any_feed_present = false;

        for (kind, file, keys) in FEEDS {
            let path = self.data_dir.join(file);
            let items = match self.load_feed(&path, keys)? {
                Some(items) => {
                    any_feed_present = true;
                    items
                }
                None => continue,
            };
            debug!(feed = file, count = items.len(), "loaded topic feed");

            for item in &items {
                let Some(topic) = parse_feed_item(*kind, item) else {
                    warn!(feed = file, "skipping malformed feed entry");
                    continue;
                };
                let covered = coverage
                    .iter()
                    .any(|entry| entry.kind == topic.kind && entry.id == topic.id);
                if !covered {
                    info!(kind = %topic.kind, title = %topic.title, "selected topic");
                    return Ok(topic);
                }
            }
        }

        if !any_feed_present {
            return Err(TopicError::NoFeeds(self.data_dir.display().to_string()));
        }
        Err(TopicError::NothingToCover)
    }

    /// Load one feed file, tolerating a bare top-level array or any of the
    /// known object keys. Missing files are not an error; broken JSON is.
    fn load_feed(&self, path: &Path, keys: &[&str]) -> Result<Option<Vec<Value>>, TopicError> {
        if !path.exists() {
            return Ok(None);
        }
        let raw = fs::read_to_string(path)?;
        let value: Value = serde_json::from_str(&raw)?;

        if let Value::Array(items) = value {
            return Ok(Some(items));
        }
        for key in keys {
            if let Some(Value::Array(items)) = value.get(key) {
                return Ok(Some(items.clone()));
            }
        }
        Ok(Some(Vec::new()))
    }
}

fn str_field<'a>(item: &'a Value, keys: &[&str]) -> Option<&'a str> {
    keys.iter().find_map(|key| item.get(*key)?.as_str())
}

fn tags_field(item: &Value, fallback: &[&str]) -> Vec<String> {
    let tags: Vec<String> = item
        .get("tags")
        .and_then(Value::as_array)
        .map(|arr| {
            arr.iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default();
    if tags.is_empty() {
        fallback.iter().map(|t| t.to_string()).collect()
    } else {
        tags.into_iter().take(6).collect()
    }
}

/// Map one feed entry to a Topic. Returns None when the entry lacks the
/// fields that identify it.
fn parse_feed_item(kind: TopicKind, item: &Value) -> Option<Topic> {
    let (id, title, summary, tags, url) = match kind {
        TopicKind::Package => {
            let id = str_field(item, &["name", "id"])?.to_string();
            let title = str_field(item, &["name"]).unwrap_or(&id).to_string();
            let summary = str_field(item, &["summary", "description"])
                .map(str::to_string)
                .unwrap_or_else(|| format!("Python package: {title}"));
            let tags = tags_field(item, &["python", "package"]);
            let url = str_field(item, &["url", "homepage"]).map(str::to_string);
            (id, title, summary, tags, url)
        }
        TopicKind::Repo => {
            let id = str_field(item, &["full_name", "name"])?.to_string();
            let title = str_field(item, &["name"])
                .map(str::to_string)
                .unwrap_or_else(|| {
                    id.rsplit('/').next().unwrap_or(id.as_str()).to_string()
                });
            let summary = str_field(item, &["description"])
                .map(str::to_string)
                .unwrap_or_else(|| format!("GitHub repository: {title}"));
            let tags = tags_field(item, &["github", "repository"]);
            let url = str_field(item, &["url", "html_url"]).map(str::to_string);
            (id, title, summary, tags, url)
        }
        TopicKind::Paper => {
            let id = str_field(item, &["title", "doi", "id"])?.to_string();
            let title = str_field(item, &["title"]).unwrap_or(&id).to_string();
            let summary = str_field(item, &["abstract", "summary"])
                .map(str::to_string)
                .unwrap_or_else(|| format!("Research: {title}"));
            let tags = tags_field(item, &["research", "paper"]);
            let url = str_field(item, &["url", "link"]).map(str::to_string);
            (id, title, summary, tags, url)
        }
        TopicKind::Tutorial => {
            let title = str_field(item, &["title"])?.to_string();
            let id = str_field(item, &["id", "slug"])
                .map(str::to_string)
                .unwrap_or_else(|| slugify(&title));
            let summary = str_field(item, &["excerpt", "description"])
                .map(str::to_string)
                .unwrap_or_else(|| format!("Tutorial: {title}"));
            let tags = tags_field(item, &["tutorial"]);
            let url = str_field(item, &["url", "link"]).map(str::to_string);
            (id, title, summary, tags, url)
        }
    };

    Some(Topic {
        kind,
        id,
        title,
        url,
        summary: Some(summary),
        tags,
        version: 1,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write_feed(dir: &TempDir, name: &str, content: &str) {
        fs::write(dir.path().join(name), content).unwrap();
    }

    fn sample_topic() -> Topic {
        Topic {
            kind: TopicKind::Package,
            id: "polars".to_string(),
            title: "Polars".to_string(),
            url: Some("https://pypi.org/project/polars/".to_string()),
            summary: Some("Fast DataFrames".to_string()),
            tags: vec!["python".to_string()],
            version: 1,
        }
    }

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Hello World!"), "hello-world");
        assert_eq!(slugify("  PyTorch 2.0: What's New  "), "pytorch-2-0-what-s-new");
        assert_eq!(slugify("!!!"), "topic");
    }

    #[test]
    fn test_detect_topic_type() {
        let mut topic = sample_topic();
        assert_eq!(
            detect_topic_type(&topic),
            (ResearchTarget::Package, "polars".to_string())
        );

        topic.kind = TopicKind::Repo;
        topic.url = Some("https://github.com/pola-rs/polars".to_string());
        assert_eq!(
            detect_topic_type(&topic),
            (
                ResearchTarget::Repo,
                "https://github.com/pola-rs/polars".to_string()
            )
        );

        topic.kind = TopicKind::Paper;
        topic.url = None;
        assert_eq!(
            detect_topic_type(&topic),
            (ResearchTarget::General, "Polars".to_string())
        );
    }

    #[test]
    fn test_select_prefers_packages() {
        let dir = TempDir::new().unwrap();
        write_feed(
            &dir,
            "packages.json",
            r#"{"packages": [{"name": "ruff", "summary": "Fast linter"}]}"#,
        );
        write_feed(
            &dir,
            "repositories.json",
            r#"{"repositories": [{"full_name": "org/repo"}]}"#,
        );

        let store = TopicStore::new(dir.path());
        let topic = store.select_next(&[]).unwrap();
        assert_eq!(topic.kind, TopicKind::Package);
        assert_eq!(topic.id, "ruff");
    }

    #[test]
    fn test_select_skips_covered_items() {
        let dir = TempDir::new().unwrap();
        write_feed(
            &dir,
            "packages.json",
            r#"{"packages": [{"name": "ruff"}, {"name": "uv"}]}"#,
        );

        let store = TopicStore::new(dir.path());
        let coverage = vec![CoverageEntry {
            kind: TopicKind::Package,
            id: "ruff".to_string(),
            version: 1,
            date: "2026-08-01".to_string(),
            filename: "2026-08-01-package-ruff.md".to_string(),
        }];
        let topic = store.select_next(&coverage).unwrap();
        assert_eq!(topic.id, "uv");
    }

    #[test]
    fn test_exhausted_feeds_error() {
        let dir = TempDir::new().unwrap();
        write_feed(&dir, "packages.json", r#"{"packages": [{"name": "ruff"}]}"#);

        let store = TopicStore::new(dir.path());
        let coverage = vec![CoverageEntry {
            kind: TopicKind::Package,
            id: "ruff".to_string(),
            version: 1,
            date: "2026-08-01".to_string(),
            filename: "x.md".to_string(),
        }];
        assert!(matches!(
            store.select_next(&coverage),
            Err(TopicError::NothingToCover)
        ));
    }

    #[test]
    fn test_missing_feeds_error() {
        let dir = TempDir::new().unwrap();
        let store = TopicStore::new(dir.path());
        assert!(matches!(
            store.select_next(&[]),
            Err(TopicError::NoFeeds(_))
        ));
    }

    #[test]
    fn test_bare_array_feed_and_malformed_entries() {
        let dir = TempDir::new().unwrap();
        write_feed(
            &dir,
            "tutorials.json",
            r#"[{"no_title": true}, {"title": "Intro to RAG"}]"#,
        );

        let store = TopicStore::new(dir.path());
        let topic = store.select_next(&[]).unwrap();
        assert_eq!(topic.kind, TopicKind::Tutorial);
        assert_eq!(topic.id, "intro-to-rag");
    }
}
