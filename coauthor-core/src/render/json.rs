// JSON renderer: the render spec and layout as a machine-readable export.

use chrono::Utc;
use serde::Serialize;
use tracing::{info, instrument};

use crate::config::LayoutConfig;
use crate::error::RenderError;
use crate::style::{RenderSpec, StyledEdge, StyledNode};

use super::traits::Renderer;

#[derive(Debug)]
pub struct JsonRenderer;

#[derive(Serialize)]
struct Export<'a> {
    generated_at: String,
    layout: &'a LayoutConfig,
    nodes: &'a [StyledNode],
    edges: &'a [StyledEdge],
}

impl Renderer for JsonRenderer {
    fn name(&self) -> &'static str {
        "json"
    }

    fn extension(&self) -> &'static str {
        "json"
    }

    #[instrument(skip_all, name = "json_render")]
    fn render(&self, spec: &RenderSpec, layout: &LayoutConfig) -> Result<String, RenderError> {
        let export = Export {
            generated_at: Utc::now().to_rfc3339(),
            layout,
            nodes: &spec.nodes,
            edges: &spec.edges,
        };
        let out = serde_json::to_string_pretty(&export)?;
        info!(bytes = out.len(), "Network export rendered");
        Ok(out)
    }
}
