// Rendering of materialized graphs

use crate::error::ReportError;
use crate::map::{Category, GraphView, LinkKind, MapNode};
use petgraph::dot::Dot;
use petgraph::graph::{NodeIndex, UnGraph};
use rfcgraph_scanner::DocumentId;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs::File;
use std::io::Write;
use std::path::Path;

const ECHARTS_URL: &str = "https://cdn.jsdelivr.net/npm/echarts@5/dist/echarts.min.js";

const SEED_COLOR: &str = "#FF0000";
const OBSOLETED_COLOR: &str = "#9999CC";
const CURRENT_COLOR: &str = "#80FF00";
const UPDATE_LINK_COLOR: &str = "#66CCCC";
const OBSOLETE_LINK_COLOR: &str = "#FF0000";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReportFormat {
    Html,
    Json,
    Dot,
    Text,
}

impl ReportFormat {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "html" => Some(ReportFormat::Html),
            "json" => Some(ReportFormat::Json),
            "dot" | "graphviz" => Some(ReportFormat::Dot),
            "text" | "txt" => Some(ReportFormat::Text),
            _ => None,
        }
    }

    pub fn extension(&self) -> &'static str {
        self.renderer().extension()
    }

    pub fn renderer(&self) -> Box<dyn GraphRenderer> {
        match self {
            ReportFormat::Html => Box::new(HtmlRenderer),
            ReportFormat::Json => Box::new(JsonRenderer),
            ReportFormat::Dot => Box::new(DotRenderer),
            ReportFormat::Text => Box::new(TextRenderer),
        }
    }
}

/// Sink for a materialized graph.
pub trait GraphRenderer {
    fn render(&self, view: &GraphView) -> Result<String, ReportError>;

    /// File extension of the rendered document, without the dot.
    fn extension(&self) -> &'static str;
}

pub fn render(view: &GraphView, format: ReportFormat) -> Result<String, ReportError> {
    format.renderer().render(view)
}

/// `rfc{seed}-depth-{depth}-dependency.{ext}`
pub fn default_file_name(seed: DocumentId, max_depth: usize, format: ReportFormat) -> String {
    format!("rfc{}-depth-{}-dependency.{}", seed, max_depth, format.extension())
}

pub fn save_report(content: &str, path: &Path) -> std::io::Result<()> {
    let mut file = File::create(path)?;
    file.write_all(content.as_bytes())?;
    Ok(())
}

fn node_color(node: &MapNode) -> &'static str {
    if node.seed {
        SEED_COLOR
    } else if node.category == Category::Obsoleted {
        OBSOLETED_COLOR
    } else {
        CURRENT_COLOR
    }
}

fn link_color(kind: LinkKind) -> &'static str {
    match kind {
        LinkKind::Update => UPDATE_LINK_COLOR,
        LinkKind::Obsolete => OBSOLETE_LINK_COLOR,
    }
}

/// Self-contained ECharts force-layout page.
pub struct HtmlRenderer;

impl HtmlRenderer {
    pub fn chart_option(view: &GraphView) -> serde_json::Value {
        let legend_selected: serde_json::Map<String, serde_json::Value> = Category::ALL
            .iter()
            .map(|c| (c.as_str().to_string(), serde_json::json!(c.shown_by_default())))
            .collect();

        let data: Vec<serde_json::Value> = view
            .nodes
            .iter()
            .map(|node| {
                serde_json::json!({
                    "name": node.id.to_string(),
                    "value": node.title,
                    "category": node.category.index(),
                    "symbolSize": 70,
                    "itemStyle": { "color": node_color(node) },
                })
            })
            .collect();

        let links: Vec<serde_json::Value> = view
            .links
            .iter()
            .map(|link| {
                serde_json::json!({
                    "source": link.source.to_string(),
                    "target": link.target.to_string(),
                    "value": link.relation.as_str(),
                    "lineStyle": { "color": link_color(link.relation) },
                })
            })
            .collect();

        let categories: Vec<serde_json::Value> = view
            .categories
            .iter()
            .map(|name| serde_json::json!({ "name": name }))
            .collect();

        serde_json::json!({
            "title": { "text": view.title() },
            "tooltip": {},
            "legend": [{ "data": view.categories, "selected": legend_selected }],
            "series": [{
                "type": "graph",
                "layout": "force",
                "roam": true,
                "draggable": true,
                "label": { "show": true },
                "force": { "repulsion": 200 },
                "categories": categories,
                "data": data,
                "links": links,
            }],
        })
    }
}

impl GraphRenderer for HtmlRenderer {
    fn extension(&self) -> &'static str {
        "html"
    }

    fn render(&self, view: &GraphView) -> Result<String, ReportError> {
        // Keep "</script>" inside string values from closing the script element
        let option = serde_json::to_string(&Self::chart_option(view))?.replace("</", "<\\/");
        let title = html_escape(&view.title());

        Ok(format!(
            r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="UTF-8">
    <title>{title}</title>
    <script type="text/javascript" src="{ECHARTS_URL}"></script>
</head>
<body>
    <div id="graph" style="width:2000px; height:2000px;"></div>
    <script type="text/javascript">
        var chart = echarts.init(document.getElementById('graph'));
        chart.setOption({option});
    </script>
</body>
</html>
"#
        ))
    }
}

pub struct JsonRenderer;

impl GraphRenderer for JsonRenderer {
    fn extension(&self) -> &'static str {
        "json"
    }

    fn render(&self, view: &GraphView) -> Result<String, ReportError> {
        let report = serde_json::json!({
            "metadata": {
                "generator": "rfcgraph",
                "version": env!("CARGO_PKG_VERSION"),
                "generated_at": chrono::Utc::now().to_rfc3339(),
                "title": view.title(),
            },
            "graph": view,
        });
        Ok(serde_json::to_string_pretty(&report)?)
    }
}

/// Undirected Graphviz document.
pub struct DotRenderer;

impl DotRenderer {
    pub fn to_petgraph(view: &GraphView) -> UnGraph<String, &'static str> {
        let mut graph = UnGraph::new_undirected();
        let mut indices: HashMap<DocumentId, NodeIndex> = HashMap::new();

        for node in &view.nodes {
            let label = if node.title.is_empty() {
                format!("RFC{}", node.id)
            } else {
                format!("RFC{}: {}", node.id, node.title)
            };
            indices.insert(node.id, graph.add_node(label));
        }

        for link in &view.links {
            if let (Some(&a), Some(&b)) = (indices.get(&link.source), indices.get(&link.target)) {
                graph.add_edge(a, b, link.relation.as_str());
            }
        }

        graph
    }
}

impl GraphRenderer for DotRenderer {
    fn extension(&self) -> &'static str {
        "dot"
    }

    fn render(&self, view: &GraphView) -> Result<String, ReportError> {
        let graph = Self::to_petgraph(view);
        Ok(format!("{}", Dot::with_config(&graph, &[])))
    }
}

pub struct TextRenderer;

impl GraphRenderer for TextRenderer {
    fn extension(&self) -> &'static str {
        "txt"
    }

    fn render(&self, view: &GraphView) -> Result<String, ReportError> {
        let mut report = String::new();

        report.push_str("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━\n");
        report.push_str(&format!("{}\n", view.title()));
        report.push_str("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━\n\n");

        report.push_str(&format!("Seed:       rfc{}\n", view.seed));
        report.push_str(&format!("Root:       rfc{}\n", view.root));
        let depth = if view.max_depth == 0 {
            "unbounded".to_string()
        } else {
            view.max_depth.to_string()
        };
        report.push_str(&format!("Max depth:  {}\n", depth));
        report.push_str(&format!("Documents:  {}\n", view.nodes.len()));
        report.push_str(&format!("Links:      {}\n\n", view.links.len()));

        report.push_str("# Categories:\n");
        for (category, count) in view.category_counts() {
            report.push_str(&format!("  {:<10} {}\n", category.as_str(), count));
        }

        report.push_str("\n# Documents:\n");
        for node in &view.nodes {
            let marker = if node.seed { "*" } else { " " };
            report.push_str(&format!(
                "  {} rfc{:<6} [{}] {}\n",
                marker,
                node.id,
                node.category.as_str(),
                node.title
            ));
        }

        report.push_str("\n# Links:\n");
        for link in &view.links {
            report.push_str(&format!(
                "  rfc{} -- rfc{} ({})\n",
                link.source,
                link.target,
                link.relation.as_str()
            ));
        }

        Ok(report)
    }
}

fn html_escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
