// Integration test utilities: a scripted literature source and a scratch
// workspace for pipeline runs.

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use coauthor_core::collect::{CollectSettings, LiteratureSource, Pacing};
use coauthor_core::config::CoauthorConfig;
use coauthor_core::error::CollectError;
use coauthor_core::normalize::normalize;
use coauthor_core::pipeline::{CoauthorPipeline, PipelineResult};
use coauthor_core::types::{ArticleId, RawArticle, RawAuthor};

/// Build a raw record from `(fore_name, last_name)` pairs.
pub fn article(id: &str, authors: &[(&str, &str)]) -> RawArticle {
    RawArticle {
        id: ArticleId::from(id),
        authors: authors.iter().map(|(f, l)| RawAuthor::new(f, l)).collect(),
    }
}

/// The three-article corpus used across the end-to-end tests:
/// `[A B, C D]`, `[A B, E F]`, `[A B, C D]`.
pub fn three_article_corpus() -> Vec<RawArticle> {
    vec![
        article("101", &[("A", "B"), ("C", "D")]),
        article("102", &[("A", "B"), ("E", "F")]),
        article("103", &[("A", "B"), ("C", "D")]),
    ]
}

/// In-memory source that answers from a record list and can be told to fail.
///
/// Search matches on the normalized "Given Family" name. Every call is
/// recorded so tests can assert on what was asked.
#[derive(Debug, Default)]
pub struct ScriptedSource {
    articles: Vec<RawArticle>,
    failing_authors: HashSet<String>,
    failing_batches: HashSet<usize>,
    searches: RefCell<Vec<String>>,
    fetches: RefCell<Vec<Vec<ArticleId>>>,
}

impl ScriptedSource {
    pub fn new(articles: Vec<RawArticle>) -> Self {
        Self {
            articles,
            ..Self::default()
        }
    }

    /// Make the search for `author` fail with an HTTP error.
    #[must_use]
    pub fn failing_search(mut self, author: &str) -> Self {
        self.failing_authors.insert(normalize(author));
        self
    }

    /// Make the `n`th fetch call (zero-based) fail with a parse error.
    #[must_use]
    pub fn failing_batch(mut self, n: usize) -> Self {
        self.failing_batches.insert(n);
        self
    }

    pub fn searches(&self) -> Vec<String> {
        self.searches.borrow().clone()
    }

    pub fn fetches(&self) -> Vec<Vec<ArticleId>> {
        self.fetches.borrow().clone()
    }

    /// How many times each id was requested across all fetch calls.
    pub fn fetch_counts(&self) -> HashMap<ArticleId, usize> {
        let mut counts = HashMap::new();
        for id in self.fetches.borrow().iter().flatten() {
            *counts.entry(id.clone()).or_insert(0) += 1;
        }
        counts
    }
}

#[async_trait::async_trait(?Send)]
impl LiteratureSource for ScriptedSource {
    fn name(&self) -> &'static str {
        "scripted"
    }

    async fn search(&self, author: &str, max_results: u32) -> Result<Vec<ArticleId>, CollectError> {
        self.searches.borrow_mut().push(author.to_string());
        let key = normalize(author);
        if self.failing_authors.contains(&key) {
            return Err(CollectError::Api {
                status: 503,
                body: "service unavailable".into(),
            });
        }
        Ok(self
            .articles
            .iter()
            .filter(|a| {
                a.authors
                    .iter()
                    .filter_map(RawAuthor::display_name)
                    .any(|name| normalize(&name) == key)
            })
            .map(|a| a.id.clone())
            .take(max_results as usize)
            .collect())
    }

    async fn fetch(&self, ids: &[ArticleId]) -> Result<Vec<RawArticle>, CollectError> {
        let call = {
            let mut fetches = self.fetches.borrow_mut();
            fetches.push(ids.to_vec());
            fetches.len() - 1
        };
        if self.failing_batches.contains(&call) {
            return Err(CollectError::Parse("mismatched end tag".into()));
        }
        Ok(ids
            .iter()
            .filter_map(|id| self.articles.iter().find(|a| &a.id == id))
            .cloned()
            .collect())
    }
}

/// Scratch directory holding the run's output and fixture files.
#[derive(Debug)]
pub struct TestWorkspace {
    pub dir: tempfile::TempDir,
}

impl TestWorkspace {
    pub fn new() -> Self {
        Self {
            dir: tempfile::tempdir().expect("create tempdir"),
        }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Default config with `authors` as targets, writing into this workspace.
    pub fn config(&self, authors: &[&str]) -> CoauthorConfig {
        let mut config = CoauthorConfig::default();
        config.search.authors = authors.iter().map(ToString::to_string).collect();
        config.render.output = self.output_path();
        config
    }

    pub fn output_path(&self) -> PathBuf {
        self.path().join("author_network.html")
    }

    /// Write records as a fixture file and return its path.
    pub fn write_fixture(&self, articles: &[RawArticle]) -> PathBuf {
        let path = self.path().join("articles.json");
        let body = serde_json::json!({ "articles": articles });
        std::fs::write(&path, body.to_string()).expect("write fixture");
        path
    }
}

impl Default for TestWorkspace {
    fn default() -> Self {
        Self::new()
    }
}

/// Run the pipeline without pacing.
pub async fn run_unpaced(config: &CoauthorConfig, source: &dyn LiteratureSource) -> PipelineResult {
    let settings = CollectSettings {
        pacing: Pacing::none(),
        ..CollectSettings::from_config(config)
    };
    CoauthorPipeline::new(config)
        .with_settings(settings)
        .run(source)
        .await
        .expect("pipeline run")
}
