// HTML renderer: a single page drawing the network with vis-network.
//
// Node and edge data are embedded as JSON; layout options come from
// `LayoutConfig`. The page loads vis-network from a CDN and needs nothing else.

use std::fmt::Write as _;

use serde_json::{Value, json};
use tracing::{info, instrument};

use crate::config::{CanvasConfig, LayoutConfig, is_css_value};
use crate::error::RenderError;
use crate::style::RenderSpec;

use super::traits::Renderer;

const VIS_NETWORK_JS: &str = "https://unpkg.com/vis-network@9.1.9/standalone/umd/vis-network.min.js";

#[derive(Debug)]
pub struct HtmlRenderer;

impl Renderer for HtmlRenderer {
    fn name(&self) -> &'static str {
        "html"
    }

    fn extension(&self) -> &'static str {
        "html"
    }

    #[instrument(skip_all, name = "html_render")]
    fn render(&self, spec: &RenderSpec, layout: &LayoutConfig) -> Result<String, RenderError> {
        let out = render_page(spec, layout)?;
        info!(
            nodes = spec.nodes.len(),
            edges = spec.edges.len(),
            bytes = out.len(),
            "Network page rendered"
        );
        Ok(out)
    }
}

/// vis-network `options` object for a layout.
pub fn network_options(layout: &LayoutConfig) -> Value {
    let smooth = if layout.edge_smoothing {
        json!({ "enabled": true, "type": "dynamic" })
    } else {
        json!(false)
    };
    json!({
        "physics": { "enabled": layout.physics },
        "layout": {
            "hierarchical": {
                "enabled": layout.hierarchical,
                "direction": layout.direction.code(),
                "sortMethod": "directed",
            }
        },
        "edges": {
            "smooth": smooth,
            "color": { "inherit": true },
        },
        "nodes": {
            "shape": "dot",
            "font": { "color": layout.canvas.font_color },
        },
        "interaction": { "hover": true },
    })
}

fn node_data(spec: &RenderSpec) -> Value {
    Value::Array(
        spec.nodes
            .iter()
            .map(|n| {
                json!({
                    "id": n.id,
                    "label": n.label,
                    "title": n.title,
                    "color": n.color,
                    "size": n.size,
                })
            })
            .collect(),
    )
}

fn edge_data(spec: &RenderSpec, layout: &LayoutConfig) -> Value {
    Value::Array(
        spec.edges
            .iter()
            .map(|e| {
                json!({
                    "from": e.from,
                    "to": e.to,
                    "value": e.value,
                    "title": format!("{} shared articles", e.value),
                    "physics": layout.physics,
                })
            })
            .collect(),
    )
}

/// JSON safe to drop inside a `<script>` element.
fn script_json(value: &Value) -> Result<String, RenderError> {
    Ok(serde_json::to_string(value)?.replace("</", "<\\/"))
}

/// A canvas value as written into the stylesheet. Values that are not plain
/// CSS (possible when the layout skipped `CoauthorConfig::validate`) are
/// replaced by the default.
fn css_value<'a>(value: &'a str, default: &'a str) -> &'a str {
    if is_css_value(value) { value } else { default }
}

fn render_page(spec: &RenderSpec, layout: &LayoutConfig) -> Result<String, RenderError> {
    let canvas = &layout.canvas;
    let defaults = CanvasConfig::default();
    let nodes = script_json(&node_data(spec))?;
    let edges = script_json(&edge_data(spec, layout))?;
    let options = script_json(&network_options(layout))?;

    let mut h = String::with_capacity(4096 + nodes.len() + edges.len());

    let _ = writeln!(h, "<!DOCTYPE html>");
    let _ = writeln!(h, "<html lang=\"en\">");
    let _ = writeln!(h, "<head>");
    let _ = writeln!(h, "<meta charset=\"utf-8\">");
    let _ = writeln!(h, "<title>Co-authorship network</title>");
    let _ = writeln!(h, "<script src=\"{VIS_NETWORK_JS}\"></script>");
    let _ = writeln!(
        h,
        "<style>body{{margin:0;background:{bg};color:{fg};font-family:sans-serif}}\
         #network{{width:{w};height:{ht};background-color:{bg};border:1px solid lightgray}}</style>",
        bg = css_value(&canvas.background, &defaults.background),
        fg = css_value(&canvas.font_color, &defaults.font_color),
        w = css_value(&canvas.width, &defaults.width),
        ht = css_value(&canvas.height, &defaults.height),
    );
    let _ = writeln!(h, "</head>");
    let _ = writeln!(h, "<body>");
    let _ = writeln!(h, "<div id=\"network\"></div>");
    let _ = writeln!(h, "<script>");
    let _ = writeln!(h, "const nodes = new vis.DataSet({nodes});");
    let _ = writeln!(h, "const edges = new vis.DataSet({edges});");
    let _ = writeln!(h, "const options = {options};");
    let _ = writeln!(
        h,
        "const network = new vis.Network(document.getElementById(\"network\"), {{ nodes, edges }}, options);"
    );
    let _ = writeln!(h, "</script>");
    let _ = writeln!(
        h,
        "<!-- {} authors, {} collaborations shown; generated {} -->",
        spec.nodes.len(),
        spec.edges.len(),
        chrono::Utc::now().format("%Y-%m-%d %H:%M UTC")
    );
    let _ = writeln!(h, "</body>");
    let _ = writeln!(h, "</html>");

    Ok(h)
}
