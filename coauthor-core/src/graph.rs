// Co-authorship graph: undirected, weighted by the number of shared articles.
//
// The graph is an owned value. `build_graph` folds every article into it once;
// after that callers only read it.

use std::collections::HashMap;

use petgraph::graph::{NodeIndex, UnGraph};
use petgraph::visit::EdgeRef;
use serde::Serialize;
use tracing::debug;

use crate::types::{Article, NormalizedName};

/// Role tag carried by every node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeRole {
    Author,
}

/// Node payload stored in the petgraph graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorNode {
    pub name: NormalizedName,
    pub role: NodeRole,
}

/// One collaboration: an unordered pair plus its shared-article count.
///
/// Endpoints are ordered so that `a < b`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Collaboration<'g> {
    pub a: &'g NormalizedName,
    pub b: &'g NormalizedName,
    pub weight: u32,
}

/// Weighted undirected co-authorship graph with a name → index map.
#[derive(Debug, Default)]
pub struct CoAuthorshipGraph {
    graph: UnGraph<AuthorNode, u32>,
    index: HashMap<NormalizedName, NodeIndex>,
}

impl CoAuthorshipGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one article into the graph.
    ///
    /// Repeated names inside the article are collapsed first, so a parsing
    /// artifact never yields a self-loop or a double-counted pair.
    pub fn add_article(&mut self, article: &Article) {
        let authors = article.distinct_authors();
        let indices: Vec<NodeIndex> = authors.iter().map(|name| self.ensure_node(name)).collect();

        for (i, &a) in indices.iter().enumerate() {
            for &b in &indices[i + 1..] {
                match self.graph.find_edge(a, b) {
                    Some(edge) => self.graph[edge] += 1,
                    None => {
                        self.graph.add_edge(a, b, 1);
                    }
                }
            }
        }
    }

    fn ensure_node(&mut self, name: &NormalizedName) -> NodeIndex {
        if let Some(&idx) = self.index.get(name) {
            return idx;
        }
        let idx = self.graph.add_node(AuthorNode {
            name: name.clone(),
            role: NodeRole::Author,
        });
        self.index.insert(name.clone(), idx);
        idx
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    pub fn contains(&self, name: &NormalizedName) -> bool {
        self.index.contains_key(name)
    }

    pub fn role(&self, name: &NormalizedName) -> Option<NodeRole> {
        self.index.get(name).map(|&idx| self.graph[idx].role)
    }

    /// Number of distinct co-authors of `name` over the whole graph.
    pub fn degree(&self, name: &NormalizedName) -> Option<usize> {
        self.index.get(name).map(|&idx| self.graph.edges(idx).count())
    }

    /// Shared-article count between two authors, `None` if they never co-authored.
    pub fn weight(&self, a: &NormalizedName, b: &NormalizedName) -> Option<u32> {
        let (&ia, &ib) = (self.index.get(a)?, self.index.get(b)?);
        self.graph.find_edge(ia, ib).map(|e| self.graph[e])
    }

    /// All author names, sorted.
    pub fn names(&self) -> Vec<&NormalizedName> {
        let mut names: Vec<&NormalizedName> = self.graph.node_weights().map(|n| &n.name).collect();
        names.sort();
        names
    }

    /// All collaborations, sorted by endpoint names.
    pub fn collaborations(&self) -> Vec<Collaboration<'_>> {
        let mut out: Vec<Collaboration<'_>> = self
            .graph
            .edge_references()
            .map(|e| {
                let x = &self.graph[e.source()].name;
                let y = &self.graph[e.target()].name;
                let (a, b) = if x <= y { (x, y) } else { (y, x) };
                Collaboration {
                    a,
                    b,
                    weight: *e.weight(),
                }
            })
            .collect();
        out.sort_by(|l, r| (l.a, l.b).cmp(&(r.a, r.b)));
        out
    }

    /// The `n` heaviest collaborations, ties broken by endpoint names.
    pub fn strongest_edges(&self, n: usize) -> Vec<Collaboration<'_>> {
        let mut all = self.collaborations();
        all.sort_by(|l, r| r.weight.cmp(&l.weight).then((l.a, l.b).cmp(&(r.a, r.b))));
        all.truncate(n);
        all
    }
}

/// Build the co-authorship graph in a single pass over `articles`.
pub fn build_graph<'a, I>(articles: I) -> CoAuthorshipGraph
where
    I: IntoIterator<Item = &'a Article>,
{
    let mut graph = CoAuthorshipGraph::new();
    let mut folded = 0usize;
    for article in articles {
        graph.add_article(article);
        folded += 1;
    }
    debug!(
        articles = folded,
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        "Co-authorship graph built"
    );
    graph
}

#[cfg(test)]
mod tests {
    use super::*;

    fn name(s: &str) -> NormalizedName {
        NormalizedName::new(s)
    }

    #[test]
    fn weight_counts_shared_articles() {
        let articles = vec![
            Article::new(["A", "B"]),
            Article::new(["A", "B"]),
            Article::new(["A", "C"]),
        ];
        let graph = build_graph(&articles);

        assert_eq!(graph.node_count(), 3);
        assert_eq!(graph.edge_count(), 2);
        assert_eq!(graph.weight(&name("a"), &name("b")), Some(2));
        assert_eq!(graph.weight(&name("b"), &name("a")), Some(2));
        assert_eq!(graph.weight(&name("a"), &name("c")), Some(1));
        assert_eq!(graph.weight(&name("b"), &name("c")), None);
    }

    #[test]
    fn repeated_name_in_article_is_not_a_self_loop() {
        let articles = vec![Article::new(["A", "a", "B"])];
        let graph = build_graph(&articles);

        assert_eq!(graph.node_count(), 2);
        assert_eq!(graph.edge_count(), 1);
        assert_eq!(graph.weight(&name("a"), &name("b")), Some(1));
        assert_eq!(graph.weight(&name("a"), &name("a")), None);
        assert_eq!(graph.degree(&name("a")), Some(1));
    }

    #[test]
    fn single_author_article_adds_node_only() {
        let articles = vec![Article::new(["Solo Author"])];
        let graph = build_graph(&articles);

        assert_eq!(graph.node_count(), 1);
        assert_eq!(graph.edge_count(), 0);
        assert_eq!(graph.degree(&name("solo author")), Some(0));
        assert_eq!(graph.role(&name("solo author")), Some(NodeRole::Author));
    }

    #[test]
    fn empty_input_builds_empty_graph() {
        let graph = build_graph(&Vec::<Article>::new());
        assert!(graph.is_empty());
        assert_eq!(graph.edge_count(), 0);
        assert!(graph.collaborations().is_empty());
    }

    #[test]
    fn pairs_per_article_are_all_unordered_pairs() {
        let articles = vec![Article::new(["a", "b", "c", "d"])];
        let graph = build_graph(&articles);
        // 4 * 3 / 2
        assert_eq!(graph.edge_count(), 6);
        for n in ["a", "b", "c", "d"] {
            assert_eq!(graph.degree(&name(n)), Some(3));
        }
    }

    #[test]
    fn collaborations_are_sorted_with_ordered_endpoints() {
        let articles = vec![Article::new(["zed", "amy"]), Article::new(["amy", "bob"])];
        let graph = build_graph(&articles);
        let collabs: Vec<(&str, &str, u32)> = graph
            .collaborations()
            .iter()
            .map(|c| (c.a.as_str(), c.b.as_str(), c.weight))
            .collect();
        assert_eq!(collabs, vec![("amy", "bob", 1), ("amy", "zed", 1)]);
    }

    #[test]
    fn strongest_edges_orders_by_weight() {
        let articles = vec![
            Article::new(["a", "b"]),
            Article::new(["c", "d"]),
            Article::new(["c", "d"]),
            Article::new(["c", "d", "a"]),
        ];
        let graph = build_graph(&articles);
        let top = graph.strongest_edges(2);
        assert_eq!(top.len(), 2);
        assert_eq!((top[0].a.as_str(), top[0].b.as_str(), top[0].weight), ("c", "d", 3));
        assert_eq!(top[1].weight, 1);
        assert_eq!((top[1].a.as_str(), top[1].b.as_str()), ("a", "b"));
    }

    mod props {
        use super::*;
        use proptest::prelude::*;

        fn arb_article() -> impl Strategy<Value = Article> {
            prop::collection::vec(prop::sample::select(vec!["a", "b", "c", "d", "e"]), 1..5)
                .prop_map(Article::new)
        }

        fn snapshot(graph: &CoAuthorshipGraph) -> (Vec<String>, Vec<(String, String, u32)>) {
            let names = graph.names().iter().map(ToString::to_string).collect();
            let edges = graph
                .collaborations()
                .iter()
                .map(|c| (c.a.to_string(), c.b.to_string(), c.weight))
                .collect();
            (names, edges)
        }

        proptest! {
            #![proptest_config(ProptestConfig::with_cases(100))]

            #[test]
            fn article_order_does_not_change_graph(articles in prop::collection::vec(arb_article(), 0..12)) {
                let forward = build_graph(&articles);
                let reversed: Vec<Article> = articles.iter().rev().cloned().collect();
                let backward = build_graph(&reversed);
                prop_assert_eq!(snapshot(&forward), snapshot(&backward));
            }

            #[test]
            fn weight_equals_co_occurrence_count(articles in prop::collection::vec(arb_article(), 0..12)) {
                let graph = build_graph(&articles);
                for c in graph.collaborations() {
                    let expected = articles
                        .iter()
                        .filter(|art| art.authors().contains(c.a) && art.authors().contains(c.b))
                        .count();
                    prop_assert!(c.weight >= 1);
                    prop_assert_ne!(c.a, c.b);
                    prop_assert_eq!(c.weight as usize, expected);
                }
            }
        }
    }
}
