// Article collection: search per target author, dedupe identifiers, fetch
// author lists in batches, normalize names.
//
// Calls run strictly one at a time with a fixed pause after each. Any failed
// search or batch is logged and recorded, then skipped.

pub mod fixture;
pub mod pubmed;
pub mod source;

use std::collections::HashSet;
use std::time::{Duration, Instant};

use tracing::{debug, info, instrument, warn};

use crate::config::CoauthorConfig;
use crate::error::CollectError;
use crate::progress::ProgressReporter;
use crate::types::{Article, ArticleId, NormalizedName, RawArticle};

pub use source::LiteratureSource;

// ── Settings ───────────────────────────────────────────────────────

/// Mandatory waits between service calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Pacing {
    pub after_search: Duration,
    pub after_fetch: Duration,
}

impl Pacing {
    /// No waiting at all, for canned sources.
    pub fn none() -> Self {
        Self::default()
    }

    async fn pause(wait: Duration) {
        if !wait.is_zero() {
            tokio::time::sleep(wait).await;
        }
    }
}

#[derive(Debug, Clone)]
pub struct CollectSettings {
    pub max_results: u32,
    pub batch_size: usize,
    pub pacing: Pacing,
}

impl CollectSettings {
    pub fn from_config(config: &CoauthorConfig) -> Self {
        Self {
            max_results: config.search.max_results,
            batch_size: config.fetch.batch_size.max(1),
            pacing: Pacing {
                after_search: config.pubmed.search_delay(),
                after_fetch: config.pubmed.fetch_delay(),
            },
        }
    }
}

impl Default for CollectSettings {
    fn default() -> Self {
        Self::from_config(&CoauthorConfig::default())
    }
}

// ── Report ─────────────────────────────────────────────────────────

/// Search outcome for one target author.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorHits {
    pub author: String,
    /// Identifiers the search returned (before cross-author dedupe).
    pub found: usize,
    pub failed: bool,
}

/// Everything the collector produced, plus what it had to skip.
#[derive(Debug, Default)]
pub struct CollectReport {
    pub articles: Vec<Article>,
    pub per_author: Vec<AuthorHits>,
    pub unique_ids: usize,
    pub batches: usize,
    /// Records the service returned across all batches.
    pub records: usize,
    /// Author entries missing a given or family name.
    pub skipped_authors: usize,
    /// Records left with no usable author.
    pub dropped_articles: usize,
    pub duration: Duration,
    pub errors: Vec<(String, CollectError)>,
}

// ── Collector ──────────────────────────────────────────────────────

/// Drives a [`LiteratureSource`] through the search → fetch sequence.
pub struct ArticleCollector<'a> {
    source: &'a dyn LiteratureSource,
    settings: CollectSettings,
}

impl std::fmt::Debug for ArticleCollector<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ArticleCollector")
            .field("source", &self.source.name())
            .field("settings", &self.settings)
            .finish()
    }
}

impl<'a> ArticleCollector<'a> {
    pub fn new(source: &'a dyn LiteratureSource, settings: CollectSettings) -> Self {
        Self { source, settings }
    }

    /// Collect normalized articles for `targets`. Never fails: upstream
    /// problems shrink the result and land in [`CollectReport::errors`].
    #[instrument(skip_all, name = "collect", fields(source = self.source.name()))]
    pub async fn collect(
        &self,
        targets: &[String],
        progress: &dyn ProgressReporter,
    ) -> CollectReport {
        let start = Instant::now();
        let mut report = CollectReport::default();

        let ids = self.search_all(targets, progress, &mut report).await;
        report.unique_ids = ids.len();
        info!(unique_ids = ids.len(), "Article identifiers collected");

        self.fetch_all(&ids, progress, &mut report).await;

        report.duration = start.elapsed();
        info!(
            articles = report.articles.len(),
            skipped_authors = report.skipped_authors,
            dropped_articles = report.dropped_articles,
            errors = report.errors.len(),
            duration = ?report.duration,
            "Collection complete"
        );
        report
    }

    async fn search_all(
        &self,
        targets: &[String],
        progress: &dyn ProgressReporter,
        report: &mut CollectReport,
    ) -> Vec<ArticleId> {
        let mut seen = HashSet::new();
        let mut ids = Vec::new();

        progress.start("Searching authors", Some(targets.len() as u64));
        for author in targets {
            match self.source.search(author, self.settings.max_results).await {
                Ok(found) => {
                    info!(author = %author, found = found.len(), "Articles found for author");
                    report.per_author.push(AuthorHits {
                        author: author.clone(),
                        found: found.len(),
                        failed: false,
                    });
                    for id in found {
                        if seen.insert(id.clone()) {
                            ids.push(id);
                        }
                    }
                }
                Err(e) => {
                    warn!(author = %author, error = %e, "Search failed, author contributes no articles");
                    report.per_author.push(AuthorHits {
                        author: author.clone(),
                        found: 0,
                        failed: true,
                    });
                    report.errors.push((format!("search:{author}"), e));
                }
            }
            progress.advance(1);
            Pacing::pause(self.settings.pacing.after_search).await;
        }
        progress.finish();

        ids
    }

    async fn fetch_all(
        &self,
        ids: &[ArticleId],
        progress: &dyn ProgressReporter,
        report: &mut CollectReport,
    ) {
        let batch_size = self.settings.batch_size.max(1);
        progress.start(
            "Fetching author lists",
            Some(ids.len().div_ceil(batch_size) as u64),
        );

        for (n, batch) in ids.chunks(batch_size).enumerate() {
            report.batches += 1;
            match self.source.fetch(batch).await {
                Ok(records) => {
                    debug!(batch = n, requested = batch.len(), returned = records.len(), "Batch fetched");
                    report.records += records.len();
                    for record in &records {
                        let (article, skipped) = normalize_record(record);
                        report.skipped_authors += skipped;
                        match article {
                            Some(article) => report.articles.push(article),
                            None => {
                                debug!(id = %record.id, "Record has no usable authors, dropped");
                                report.dropped_articles += 1;
                            }
                        }
                    }
                }
                Err(e) => {
                    warn!(batch = n, size = batch.len(), error = %e, "Fetch failed, batch contributes no articles");
                    report.errors.push((format!("fetch:batch-{n}"), e));
                }
            }
            progress.advance(1);
            Pacing::pause(self.settings.pacing.after_fetch).await;
        }
        progress.finish();
    }
}

/// Turn a raw record into an [`Article`], skipping author entries that lack
/// either name component. Returns `None` when nothing usable is left, along
/// with the number of skipped entries.
pub fn normalize_record(record: &RawArticle) -> (Option<Article>, usize) {
    let mut skipped = 0;
    let mut names = Vec::with_capacity(record.authors.len());
    for author in &record.authors {
        match author.display_name() {
            Some(name) => names.push(NormalizedName::new(&name)),
            None => skipped += 1,
        }
    }
    if names.is_empty() {
        (None, skipped)
    } else {
        (Some(Article::from_normalized(names)), skipped)
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;
    use crate::progress::NoopReporter;
    use crate::types::RawAuthor;

    /// Canned source that records every call it receives.
    #[derive(Default)]
    struct ScriptedSource {
        hits: Vec<(&'static str, Vec<&'static str>)>,
        records: Vec<RawArticle>,
        fail_search_for: Option<&'static str>,
        fail_batch: Option<usize>,
        fetch_calls: RefCell<Vec<Vec<ArticleId>>>,
    }

    #[async_trait::async_trait(?Send)]
    impl LiteratureSource for ScriptedSource {
        fn name(&self) -> &'static str {
            "scripted"
        }

        async fn search(&self, author: &str, max_results: u32) -> Result<Vec<ArticleId>, CollectError> {
            if self.fail_search_for == Some(author) {
                return Err(CollectError::Network("connection reset".into()));
            }
            Ok(self
                .hits
                .iter()
                .find(|(a, _)| *a == author)
                .map(|(_, ids)| {
                    ids.iter()
                        .take(max_results as usize)
                        .map(|id| ArticleId::from(*id))
                        .collect()
                })
                .unwrap_or_default())
        }

        async fn fetch(&self, ids: &[ArticleId]) -> Result<Vec<RawArticle>, CollectError> {
            let call = self.fetch_calls.borrow().len();
            self.fetch_calls.borrow_mut().push(ids.to_vec());
            if self.fail_batch == Some(call) {
                return Err(CollectError::Parse("unexpected end of XML".into()));
            }
            Ok(self
                .records
                .iter()
                .filter(|r| ids.contains(&r.id))
                .cloned()
                .collect())
        }
    }

    fn record(id: &str, authors: &[(&str, &str)]) -> RawArticle {
        RawArticle {
            id: ArticleId::from(id),
            authors: authors.iter().map(|(f, l)| RawAuthor::new(f, l)).collect(),
        }
    }

    fn settings(batch_size: usize) -> CollectSettings {
        CollectSettings {
            max_results: 50,
            batch_size,
            pacing: Pacing::none(),
        }
    }

    fn targets(names: &[&str]) -> Vec<String> {
        names.iter().map(ToString::to_string).collect()
    }

    #[tokio::test]
    async fn shared_article_is_fetched_once() {
        let source = ScriptedSource {
            hits: vec![("Ann Lee", vec!["1", "2"]), ("Bo Chan", vec!["2", "3"])],
            records: vec![
                record("1", &[("Ann", "Lee"), ("Zed", "Roe")]),
                record("2", &[("Ann", "Lee"), ("Bo", "Chan")]),
                record("3", &[("Bo", "Chan"), ("Zed", "Roe")]),
            ],
            ..ScriptedSource::default()
        };
        let collector = ArticleCollector::new(&source, settings(10));
        let report = collector
            .collect(&targets(&["Ann Lee", "Bo Chan"]), &NoopReporter)
            .await;

        assert_eq!(report.unique_ids, 3);
        assert_eq!(report.articles.len(), 3);
        let calls = source.fetch_calls.borrow();
        assert_eq!(calls.len(), 1);
        assert_eq!(
            calls[0],
            vec![ArticleId::from("1"), ArticleId::from("2"), ArticleId::from("3")]
        );
        assert_eq!(
            report.per_author,
            vec![
                AuthorHits { author: "Ann Lee".into(), found: 2, failed: false },
                AuthorHits { author: "Bo Chan".into(), found: 2, failed: false },
            ]
        );
    }

    #[tokio::test]
    async fn identifiers_are_split_into_batches() {
        let ids: Vec<&'static str> = vec!["1", "2", "3", "4", "5"];
        let source = ScriptedSource {
            hits: vec![("Ann Lee", ids)],
            ..ScriptedSource::default()
        };
        let collector = ArticleCollector::new(&source, settings(2));
        let report = collector.collect(&targets(&["Ann Lee"]), &NoopReporter).await;

        assert_eq!(report.batches, 3);
        let sizes: Vec<usize> = source.fetch_calls.borrow().iter().map(Vec::len).collect();
        assert_eq!(sizes, vec![2, 2, 1]);
    }

    #[tokio::test]
    async fn failed_search_and_batch_degrade_to_less_data() {
        let source = ScriptedSource {
            hits: vec![("Ann Lee", vec!["1", "2", "3"]), ("Bo Chan", vec!["9"])],
            records: vec![
                record("1", &[("Ann", "Lee"), ("Cy", "Dee")]),
                record("2", &[("Ann", "Lee"), ("Cy", "Dee")]),
                record("3", &[("Ann", "Lee"), ("Eve", "Fox")]),
            ],
            fail_search_for: Some("Bo Chan"),
            fail_batch: Some(0),
            ..ScriptedSource::default()
        };
        let collector = ArticleCollector::new(&source, settings(2));
        let report = collector
            .collect(&targets(&["Ann Lee", "Bo Chan"]), &NoopReporter)
            .await;

        // Batch 0 ({1, 2}) failed; batch 1 ({3}) survived.
        assert_eq!(report.articles.len(), 1);
        assert_eq!(report.errors.len(), 2);
        assert!(report.errors.iter().any(|(stage, _)| stage == "search:Bo Chan"));
        assert!(report.errors.iter().any(|(stage, _)| stage == "fetch:batch-0"));
        assert!(report.per_author[1].failed);
    }

    #[tokio::test]
    async fn malformed_authors_are_skipped_and_empty_records_dropped() {
        let mut partial = record("1", &[("Ann", "Lee")]);
        partial.authors.push(RawAuthor {
            fore_name: None,
            last_name: Some("Consortium".into()),
        });
        let empty = RawArticle {
            id: ArticleId::from("2"),
            authors: vec![RawAuthor {
                fore_name: Some("Only".into()),
                last_name: None,
            }],
        };
        let source = ScriptedSource {
            hits: vec![("Ann Lee", vec!["1", "2"])],
            records: vec![partial, empty],
            ..ScriptedSource::default()
        };
        let collector = ArticleCollector::new(&source, settings(10));
        let report = collector.collect(&targets(&["Ann Lee"]), &NoopReporter).await;

        assert_eq!(report.records, 2);
        assert_eq!(report.articles.len(), 1);
        assert_eq!(report.skipped_authors, 2);
        assert_eq!(report.dropped_articles, 1);
        assert_eq!(report.articles[0].authors()[0].as_str(), "ann lee");
    }

    #[tokio::test]
    async fn no_identifiers_means_no_fetch() {
        let source = ScriptedSource::default();
        let collector = ArticleCollector::new(&source, settings(10));
        let report = collector.collect(&targets(&["Nobody Here"]), &NoopReporter).await;

        assert!(report.articles.is_empty());
        assert_eq!(report.batches, 0);
        assert!(source.fetch_calls.borrow().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn pacing_waits_after_every_call() {
        let source = ScriptedSource {
            hits: vec![("Ann Lee", vec!["1", "2", "3"]), ("Bo Chan", vec![])],
            ..ScriptedSource::default()
        };
        let collector = ArticleCollector::new(
            &source,
            CollectSettings {
                max_results: 50,
                batch_size: 2,
                pacing: Pacing {
                    after_search: Duration::from_secs(1),
                    after_fetch: Duration::from_secs(2),
                },
            },
        );

        let start = tokio::time::Instant::now();
        collector
            .collect(&targets(&["Ann Lee", "Bo Chan"]), &NoopReporter)
            .await;

        // Two searches at 1s each, two batches at 2s each.
        assert_eq!(start.elapsed(), Duration::from_secs(6));
    }

    #[test]
    fn settings_follow_config() {
        let mut config = CoauthorConfig::default();
        config.search.max_results = 5;
        config.fetch.batch_size = 3;
        let settings = CollectSettings::from_config(&config);
        assert_eq!(settings.max_results, 5);
        assert_eq!(settings.batch_size, 3);
        assert_eq!(settings.pacing.after_fetch, Duration::from_secs(2));
    }
}
