//! Graph view output for saved query results.
//!
//! Output formats:
//! - JSON (extraction + canvas + stats, for custom frontends)
//! - Graphviz DOT (external layout tooling)
//! - Self-contained HTML explorer page (vis-network canvas)

use anyhow::{anyhow, Result};
use serde::Serialize;
use serde_json::Value;

use loregraph_core::canvas::{self, CanvasGraph, CanvasNode, LegendEntry};
use loregraph_core::stats::GraphStats;
use loregraph_core::Extraction;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VizFormat {
    Dot,
    Html,
    Json,
}

impl VizFormat {
    pub fn parse(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "dot" => Ok(Self::Dot),
            "html" | "htm" => Ok(Self::Html),
            "json" => Ok(Self::Json),
            other => Err(anyhow!(
                "unknown viz format `{other}` (expected dot|html|json)"
            )),
        }
    }
}

/// Everything a frontend needs to draw one result set.
#[derive(Debug, Clone, Serialize)]
pub struct VizDocument {
    pub stats: GraphStats,
    pub graph: Extraction,
    pub canvas: CanvasGraph,
    pub legend: Vec<LegendEntry>,
    pub options: Value,
}

impl VizDocument {
    pub fn new(graph: Extraction, stats: GraphStats, canvas: CanvasGraph) -> Self {
        Self {
            stats,
            graph,
            canvas,
            legend: canvas::legend(),
            options: canvas::network_options(),
        }
    }
}

pub fn render(doc: &VizDocument, format: VizFormat) -> Result<String> {
    match format {
        VizFormat::Dot => Ok(render_dot(doc)),
        VizFormat::Html => render_html(doc),
        VizFormat::Json => render_json(doc),
    }
}

pub fn render_dot(doc: &VizDocument) -> String {
    fn dot_escape(s: &str) -> String {
        s.replace('\\', "\\\\").replace('"', "\\\"").replace('\n', "\\n")
    }

    fn node_line(node: &CanvasNode) -> String {
        // Stand-ins for unreturned endpoints are drawn dashed.
        let style = if node.referenced {
            "rounded,filled,dashed"
        } else {
            "rounded,filled"
        };
        format!(
            "  \"{}\" [label=\"{}\\n({})\", fillcolor=\"{}\", style=\"{}\"];\n",
            dot_escape(&node.id),
            dot_escape(&node.label),
            dot_escape(&node.group),
            node.color,
            style
        )
    }

    let mut out = String::new();
    out.push_str("digraph loregraph {\n");
    out.push_str("  rankdir=LR;\n");
    out.push_str("  node [shape=box, style=\"rounded,filled\", fontname=\"Helvetica\"];\n");
    out.push_str("  edge [fontname=\"Helvetica\", color=\"#888888\"];\n\n");

    for node in &doc.canvas.nodes {
        out.push_str(&node_line(node));
    }
    out.push('\n');

    for edge in &doc.canvas.edges {
        out.push_str(&format!(
            "  \"{}\" -> \"{}\" [label=\"{}\"];\n",
            dot_escape(&edge.from),
            dot_escape(&edge.to),
            dot_escape(&edge.label)
        ));
    }

    out.push_str("}\n");
    out
}

pub fn render_json(doc: &VizDocument) -> Result<String> {
    Ok(serde_json::to_string_pretty(doc)?)
}

pub fn render_html(doc: &VizDocument) -> Result<String> {
    // Escape `</` so embedded data can't close the `<script>` tag.
    let canvas_json = serde_json::to_string(&doc.canvas)?.replace("</", "<\\/");
    let options_json = serde_json::to_string(&doc.options)?;
    let legend_json = serde_json::to_string(&doc.legend)?.replace("</", "<\\/");

    let template = include_str!("../templates/explorer.html");
    let mut html = template.to_string();
    html = html.replace("{{CANVAS_JSON}}", &canvas_json);
    html = html.replace("{{OPTIONS_JSON}}", &options_json);
    html = html.replace("{{LEGEND_JSON}}", &legend_json);
    html = html.replace("{{NODES_COUNT}}", &doc.canvas.nodes.len().to_string());
    html = html.replace("{{EDGES_COUNT}}", &doc.canvas.edges.len().to_string());
    Ok(html)
}

// =============================================================================
// Tests
// =============================================================================
