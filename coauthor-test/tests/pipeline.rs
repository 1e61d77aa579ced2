use std::time::Duration;

use coauthor_core::collect::fixture::FixtureSource;
use coauthor_core::pipeline::{CoauthorPipeline, PipelineStatus};
use coauthor_core::types::{ArticleId, NormalizedName};
use coauthor_test::{ScriptedSource, TestWorkspace, article, run_unpaced, three_article_corpus};

fn name(s: &str) -> NormalizedName {
    NormalizedName::new(s)
}

// ── End to end ───────────────────────────────────────────────────

#[tokio::test]
async fn two_targets_three_articles() {
    let ws = TestWorkspace::new();
    let mut config = ws.config(&["A B", "C D"]);
    config.render.formats = vec!["html".into(), "json".into()];
    let source = ScriptedSource::new(three_article_corpus());

    let result = run_unpaced(&config, &source).await;

    assert_eq!(result.status, PipelineStatus::Rendered);
    assert_eq!(result.unique_ids, 3);
    assert_eq!(result.articles, 3);
    assert!(result.errors.is_empty());

    let graph = &result.graph;
    assert_eq!(
        graph.names(),
        vec![&name("a b"), &name("c d"), &name("e f")]
    );
    assert_eq!(graph.weight(&name("a b"), &name("c d")), Some(2));
    assert_eq!(graph.weight(&name("a b"), &name("e f")), Some(1));
    assert_eq!(graph.weight(&name("c d"), &name("e f")), None);
    assert_eq!(result.rendered_edges, 1);

    let export: serde_json::Value = serde_json::from_str(
        &std::fs::read_to_string(ws.path().join("author_network.json")).unwrap(),
    )
    .unwrap();
    let node = |id: &str| {
        export["nodes"]
            .as_array()
            .unwrap()
            .iter()
            .find(|n| n["id"] == id)
            .cloned()
            .unwrap()
    };
    assert_eq!(node("a b")["is_target"], true);
    assert_eq!(node("a b")["size"], 20);
    assert_eq!(node("c d")["is_target"], true);
    assert_eq!(node("c d")["color"], "red");
    assert_eq!(node("e f")["is_target"], false);
    assert_eq!(node("e f")["size"], 12);
    assert_eq!(node("e f")["color"], "#1f78b4");

    let edges = export["edges"].as_array().unwrap();
    assert_eq!(edges.len(), 1);
    assert_eq!(edges[0]["from"], "a b");
    assert_eq!(edges[0]["to"], "c d");
    assert_eq!(edges[0]["value"], 2);

    let html = std::fs::read_to_string(ws.output_path()).unwrap();
    assert!(html.contains("\"id\":\"e f\""));
}

#[tokio::test]
async fn shared_article_is_fetched_once() {
    let ws = TestWorkspace::new();
    let config = ws.config(&["A B", "C D"]);
    let source = ScriptedSource::new(three_article_corpus());

    run_unpaced(&config, &source).await;

    assert_eq!(source.searches(), vec!["A B".to_string(), "C D".to_string()]);
    let counts = source.fetch_counts();
    assert_eq!(counts.len(), 3);
    assert!(counts.values().all(|&c| c == 1));
}

#[tokio::test]
async fn fixture_file_source_matches_scripted_source() {
    let ws = TestWorkspace::new();
    let config = ws.config(&["A B", "C D"]);
    let fixture = ws.write_fixture(&three_article_corpus());
    let source = FixtureSource::from_path(&fixture).unwrap();

    let result = run_unpaced(&config, &source).await;

    assert_eq!(result.node_count(), 3);
    assert_eq!(result.edge_count(), 2);
    assert_eq!(result.rendered_edges, 1);
}

// ── Degradation ──────────────────────────────────────────────────

#[tokio::test]
async fn failed_search_contributes_nothing() {
    let ws = TestWorkspace::new();
    let config = ws.config(&["A B", "C D"]);
    let source = ScriptedSource::new(three_article_corpus()).failing_search("a b");

    let result = run_unpaced(&config, &source).await;

    assert_eq!(result.status, PipelineStatus::Rendered);
    assert!(result.per_author[0].failed);
    assert_eq!(result.per_author[1].found, 2);
    // Only C D's articles survive.
    assert_eq!(result.articles, 2);
    assert!(!result.graph.contains(&name("e f")));
    assert_eq!(result.errors.len(), 1);
    assert_eq!(result.errors[0].stage, "collect:search:A B");
}

#[tokio::test]
async fn failed_batch_contributes_nothing() {
    let ws = TestWorkspace::new();
    let mut config = ws.config(&["A B"]);
    config.fetch.batch_size = 2;
    let source = ScriptedSource::new(three_article_corpus()).failing_batch(0);

    let result = run_unpaced(&config, &source).await;

    assert_eq!(source.fetches().len(), 2);
    assert_eq!(result.articles, 1);
    assert_eq!(result.edge_count(), 1);
    // The lone surviving edge has weight 1, so nothing passes the filter.
    assert_eq!(result.rendered_edges, 0);
    assert_eq!(result.status, PipelineStatus::Rendered);
    assert_eq!(result.errors.len(), 1);
}

#[tokio::test]
async fn every_call_failing_yields_empty_graph() {
    let ws = TestWorkspace::new();
    let config = ws.config(&["A B", "C D"]);
    let source = ScriptedSource::new(three_article_corpus())
        .failing_search("A B")
        .failing_search("C D");

    let result = run_unpaced(&config, &source).await;

    assert_eq!(result.status, PipelineStatus::EmptyGraph);
    assert!(source.fetches().is_empty());
    assert!(result.artifacts.is_empty());
    assert!(!ws.output_path().exists());
    assert_eq!(result.errors.len(), 2);
}

#[tokio::test]
async fn malformed_authors_are_skipped() {
    let ws = TestWorkspace::new();
    let config = ws.config(&["A B"]);
    let mut broken = article("201", &[("A", "B")]);
    broken.authors.push(coauthor_core::types::RawAuthor {
        fore_name: None,
        last_name: Some("Consortium".into()),
    });
    let lonely = article("202", &[("A", "B")]);
    let source = ScriptedSource::new(vec![broken, lonely]);

    let result = run_unpaced(&config, &source).await;

    assert_eq!(result.skipped_authors, 1);
    assert_eq!(result.articles, 2);
    assert_eq!(result.node_count(), 1);
    assert_eq!(result.edge_count(), 0);
    assert_eq!(result.status, PipelineStatus::Rendered);
}

// ── Pacing ───────────────────────────────────────────────────────

#[tokio::test(start_paused = true)]
async fn default_pacing_waits_after_every_call() {
    let ws = TestWorkspace::new();
    let mut config = ws.config(&["A B", "C D"]);
    config.fetch.batch_size = 2;
    let source = ScriptedSource::new(three_article_corpus());

    let start = tokio::time::Instant::now();
    let result = CoauthorPipeline::new(&config).run(&source).await.unwrap();

    // Two searches at 1 s, two batches at 2 s.
    assert_eq!(start.elapsed(), Duration::from_secs(6));
    assert_eq!(
        source.fetches(),
        vec![
            vec![ArticleId::from("101"), ArticleId::from("102")],
            vec![ArticleId::from("103")],
        ]
    );
    assert_eq!(result.status, PipelineStatus::Rendered);
}
