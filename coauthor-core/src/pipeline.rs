// Pipeline orchestrator. Collect, Build, Style and Render run strictly in order.
//
// Upstream failures shrink the data and are reported as non-fatal errors.
// An empty graph ends the run without artifacts. Only a render failure
// aborts.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use tracing::{info, instrument, warn};

use crate::collect::{ArticleCollector, AuthorHits, CollectSettings, LiteratureSource};
use crate::config::CoauthorConfig;
use crate::error::{CoauthorError, ConfigError};
use crate::graph::{CoAuthorshipGraph, build_graph};
use crate::progress::{NoopReporter, ProgressReporter};
use crate::render::build_renderer;
use crate::style::{StyleOutcome, StylePolicy};
use crate::types::TargetAuthorSet;

/// How the run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineStatus {
    /// Artifacts were written.
    Rendered,
    /// The graph had no nodes; nothing was rendered.
    EmptyGraph,
}

/// A non-fatal problem recorded during the run.
#[derive(Debug)]
pub struct PipelineError {
    pub stage: String,
    pub error: CoauthorError,
}

impl std::fmt::Display for PipelineError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.stage, self.error)
    }
}

#[derive(Debug)]
pub struct PipelineResult {
    pub status: PipelineStatus,
    pub per_author: Vec<AuthorHits>,
    pub unique_ids: usize,
    pub articles: usize,
    pub skipped_authors: usize,
    pub dropped_articles: usize,
    pub graph: CoAuthorshipGraph,
    /// Edges that passed the weight filter.
    pub rendered_edges: usize,
    pub artifacts: Vec<PathBuf>,
    pub errors: Vec<PipelineError>,
    pub duration: Duration,
}

impl PipelineResult {
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }
}

/// Orchestrates one run over a fixed configuration.
#[derive(Debug)]
pub struct CoauthorPipeline<'a> {
    config: &'a CoauthorConfig,
    settings: CollectSettings,
}

impl<'a> CoauthorPipeline<'a> {
    pub fn new(config: &'a CoauthorConfig) -> Self {
        Self {
            config,
            settings: CollectSettings::from_config(config),
        }
    }

    /// Replace the collection settings (e.g. to drop pacing for canned sources).
    #[must_use]
    pub fn with_settings(mut self, settings: CollectSettings) -> Self {
        self.settings = settings;
        self
    }

    pub async fn run(&self, source: &dyn LiteratureSource) -> crate::error::Result<PipelineResult> {
        self.run_with_progress(source, &NoopReporter).await
    }

    #[instrument(skip_all, name = "pipeline", fields(source = source.name()))]
    pub async fn run_with_progress(
        &self,
        source: &dyn LiteratureSource,
        progress: &dyn ProgressReporter,
    ) -> crate::error::Result<PipelineResult> {
        let start = Instant::now();
        let targets = &self.config.search.authors;
        if targets.is_empty() {
            return Err(ConfigError::Invalid("no target authors to search for".into()).into());
        }

        // Collect
        let collector = ArticleCollector::new(source, self.settings.clone());
        let report = collector.collect(targets, progress).await;
        let errors: Vec<PipelineError> = report
            .errors
            .into_iter()
            .map(|(stage, error)| PipelineError {
                stage: format!("collect:{stage}"),
                error: error.into(),
            })
            .collect();

        // Build
        let graph = build_graph(&report.articles);
        info!(
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            "Co-authorship graph complete"
        );

        let mut result = PipelineResult {
            status: PipelineStatus::EmptyGraph,
            per_author: report.per_author,
            unique_ids: report.unique_ids,
            articles: report.articles.len(),
            skipped_authors: report.skipped_authors,
            dropped_articles: report.dropped_articles,
            graph,
            rendered_edges: 0,
            artifacts: Vec::new(),
            errors,
            duration: Duration::ZERO,
        };

        // Style
        let target_set = TargetAuthorSet::new(targets);
        let policy = StylePolicy::from_config(&self.config.style);
        let spec = match policy.style(&result.graph, &target_set) {
            StyleOutcome::Empty => {
                warn!("No nodes found, check whether the upstream query returned results");
                result.duration = start.elapsed();
                return Ok(result);
            }
            StyleOutcome::Styled(spec) => spec,
        };
        result.rendered_edges = spec.edges.len();

        // Render
        for name in &self.config.render.formats {
            let renderer = build_renderer(name).ok_or_else(|| {
                ConfigError::Invalid(format!("unknown render format '{name}'"))
            })?;
            let path = renderer.write(&spec, &self.config.render.layout, &self.config.render.output)?;
            info!(renderer = renderer.name(), path = %path.display(), "Artifact written");
            result.artifacts.push(path);
        }

        result.status = PipelineStatus::Rendered;
        result.duration = start.elapsed();
        info!(
            artifacts = result.artifacts.len(),
            rendered_edges = result.rendered_edges,
            errors = result.errors.len(),
            duration = ?result.duration,
            "Pipeline complete"
        );
        Ok(result)
    }
}
