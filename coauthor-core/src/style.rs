// Styling & filtering: node color/size from target membership and true
// degree; edges below the minimum weight are left out.

use serde::Serialize;

use crate::config::StyleSection;
use crate::graph::{CoAuthorshipGraph, NodeRole};
use crate::types::{NormalizedName, TargetAuthorSet};

/// Node as handed to a renderer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StyledNode {
    pub id: NormalizedName,
    pub label: String,
    /// Hover text.
    pub title: String,
    pub role: NodeRole,
    pub color: String,
    pub size: u32,
    pub is_target: bool,
    /// Unfiltered degree.
    pub degree: usize,
}

/// Edge as handed to a renderer; `value` is the shared-article count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StyledEdge {
    pub from: NormalizedName,
    pub to: NormalizedName,
    pub value: u32,
}

/// Styled nodes and filtered edges, sorted by name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RenderSpec {
    pub nodes: Vec<StyledNode>,
    pub edges: Vec<StyledEdge>,
}

impl RenderSpec {
    pub fn node(&self, name: &str) -> Option<&StyledNode> {
        self.nodes.iter().find(|n| n.id.as_str() == name)
    }
}

/// Result of styling. An empty graph is its own outcome so the caller can
/// tell the user the upstream query found nothing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StyleOutcome {
    Empty,
    Styled(RenderSpec),
}

/// Colors, sizes, and the edge threshold.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StylePolicy {
    pub target_color: String,
    pub default_color: String,
    pub target_size: u32,
    pub base_size: u32,
    pub degree_factor: u32,
    pub min_edge_weight: u32,
}

impl Default for StylePolicy {
    fn default() -> Self {
        Self::from_config(&StyleSection::default())
    }
}

impl StylePolicy {
    pub fn from_config(section: &StyleSection) -> Self {
        Self {
            target_color: section.target_color.clone(),
            default_color: section.default_color.clone(),
            target_size: section.target_size,
            base_size: section.base_size,
            degree_factor: section.degree_factor,
            min_edge_weight: section.min_edge_weight.max(1),
        }
    }

    /// `degree_factor * degree + base_size`, saturating.
    pub fn size_for_degree(&self, degree: usize) -> u32 {
        let degree = u32::try_from(degree).unwrap_or(u32::MAX);
        self.degree_factor
            .saturating_mul(degree)
            .saturating_add(self.base_size)
    }

    pub fn style(&self, graph: &CoAuthorshipGraph, targets: &TargetAuthorSet) -> StyleOutcome {
        if graph.is_empty() {
            return StyleOutcome::Empty;
        }

        let nodes = graph
            .names()
            .into_iter()
            .map(|name| {
                let degree = graph.degree(name).unwrap_or(0);
                let is_target = targets.contains(name);
                let (color, size) = if is_target {
                    (self.target_color.clone(), self.target_size)
                } else {
                    (self.default_color.clone(), self.size_for_degree(degree))
                };
                StyledNode {
                    id: name.clone(),
                    label: name.to_string(),
                    title: name.to_string(),
                    role: graph.role(name).unwrap_or(NodeRole::Author),
                    color,
                    size,
                    is_target,
                    degree,
                }
            })
            .collect();

        let edges = graph
            .collaborations()
            .into_iter()
            .filter(|c| c.weight >= self.min_edge_weight)
            .map(|c| StyledEdge {
                from: c.a.clone(),
                to: c.b.clone(),
                value: c.weight,
            })
            .collect();

        StyleOutcome::Styled(RenderSpec { nodes, edges })
    }
}

/// Style `graph` with the default policy.
pub fn style(graph: &CoAuthorshipGraph, targets: &TargetAuthorSet) -> StyleOutcome {
    StylePolicy::default().style(graph, targets)
}
