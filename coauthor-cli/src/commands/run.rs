use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Args;
use tracing::info;

use coauthor_core::collect::fixture::FixtureSource;
use coauthor_core::collect::pubmed::PubMedSource;
use coauthor_core::collect::{CollectSettings, LiteratureSource, Pacing};
use coauthor_core::config::CoauthorConfig;
use coauthor_core::pipeline::{CoauthorPipeline, PipelineResult, PipelineStatus};
use coauthor_core::progress::IndicatifReporter;

#[derive(Args, Debug)]
pub struct RunArgs {
    /// Config file (default: ./coauthor.toml if present)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Target author to search for (repeatable; replaces configured authors)
    #[arg(short, long = "author")]
    pub authors: Vec<String>,

    /// Maximum identifiers requested per author
    #[arg(long)]
    pub max_results: Option<u32>,

    /// Output path; each renderer swaps in its own extension
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Comma-separated renderers: html, json
    #[arg(long, value_delimiter = ',')]
    pub format: Vec<String>,

    /// Read articles from a JSON fixture instead of querying PubMed
    #[arg(long)]
    pub fixture: Option<PathBuf>,

    /// Print the N strongest collaborations
    #[arg(long)]
    pub top: Option<usize>,

    /// Print the effective configuration and exit
    #[arg(long)]
    pub dry_run: bool,
}

pub async fn run(args: RunArgs, quiet: bool) -> anyhow::Result<()> {
    let cwd = std::env::current_dir().context("Cannot resolve current directory")?;
    let config = effective_config(&args, &cwd)?;

    if args.dry_run {
        let text = config
            .to_toml()
            .context("Cannot serialize effective config")?;
        print!("{text}");
        return Ok(());
    }

    let (source, settings) = open_source(args.fixture.as_deref(), &config)?;
    let progress = if quiet {
        IndicatifReporter::hidden()
    } else {
        IndicatifReporter::new()
    };

    let result = CoauthorPipeline::new(&config)
        .with_settings(settings)
        .run_with_progress(source.as_ref(), &progress)
        .await
        .context("Pipeline execution failed")?;

    if !quiet {
        print_summary(&result, args.top);
    }
    Ok(())
}

/// Load the config file (if any), apply command-line overrides, validate.
fn effective_config(args: &RunArgs, cwd: &Path) -> anyhow::Result<CoauthorConfig> {
    let path = super::resolve_config_path(args.config.as_deref(), cwd);
    let mut config = if args.config.is_some() || path.exists() {
        info!(path = %path.display(), "Loading config");
        CoauthorConfig::load(&path)
            .with_context(|| format!("Cannot load config: {}", path.display()))?
    } else {
        CoauthorConfig::default()
    };

    if !args.authors.is_empty() {
        config.search.authors.clone_from(&args.authors);
    }
    if let Some(max) = args.max_results {
        config.search.max_results = max;
    }
    if let Some(output) = &args.output {
        config.render.output.clone_from(output);
    }
    if !args.format.is_empty() {
        config.render.formats = args.format.iter().map(|f| f.trim().to_lowercase()).collect();
    }

    config.validate().context("Invalid config after overrides")?;
    if config.search.authors.is_empty() {
        anyhow::bail!("No target authors: pass --author or set search.authors in the config");
    }
    Ok(config)
}

fn open_source(
    fixture: Option<&Path>,
    config: &CoauthorConfig,
) -> anyhow::Result<(Box<dyn LiteratureSource>, CollectSettings)> {
    let settings = CollectSettings::from_config(config);
    match fixture {
        Some(path) => {
            if !path.exists() {
                anyhow::bail!("Fixture not found: {}", path.display());
            }
            let source = FixtureSource::from_path(path)
                .with_context(|| format!("Cannot load fixture: {}", path.display()))?;
            info!(path = %path.display(), articles = source.len(), "Using fixture source");
            let settings = CollectSettings {
                pacing: Pacing::none(),
                ..settings
            };
            Ok((Box::new(source), settings))
        }
        None => {
            let source = PubMedSource::from_config(&config.pubmed)
                .context("Cannot set up literature source")?;
            Ok((Box::new(source), settings))
        }
    }
}

fn print_summary(result: &PipelineResult, top: Option<usize>) {
    for hits in &result.per_author {
        if hits.failed {
            println!("{}: search failed", hits.author);
        } else {
            println!("Found {} articles for {}", hits.found, hits.author);
        }
    }
    println!();
    println!("  Unique articles:  {}", result.unique_ids);
    println!("  Usable articles:  {}", result.articles);
    println!("  Total nodes:      {}", result.node_count());
    println!("  Total edges:      {}", result.edge_count());
    println!("  Edges shown:      {}", result.rendered_edges);
    println!("  Duration:         {:.2?}", result.duration);

    if result.skipped_authors > 0 || result.dropped_articles > 0 {
        println!(
            "  Skipped:          {} author entries, {} articles",
            result.skipped_authors, result.dropped_articles
        );
    }

    match result.status {
        PipelineStatus::EmptyGraph => {
            println!();
            println!("No nodes found. Check whether the PubMed query returned results.");
        }
        PipelineStatus::Rendered => {
            println!();
            for path in &result.artifacts {
                println!("Wrote {}", path.display());
            }
        }
    }

    if let Some(n) = top.filter(|n| *n > 0) {
        let strongest = result.graph.strongest_edges(n);
        if !strongest.is_empty() {
            println!();
            println!("Strongest collaborations:");
            for c in strongest {
                println!("  {:>4}  {} / {}", c.weight, c.a, c.b);
            }
        }
    }

    if !result.errors.is_empty() {
        println!();
        println!("  Warnings ({}):", result.errors.len());
        for error in &result.errors {
            println!("    - {error}");
        }
    }
}
