use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::config::LayoutConfig;
use crate::error::LayoutError;
use crate::ir::{ContentNode, ContentTree, DiagramCategory, Relation};
use crate::layout::{
    CanvasBounds, ConnectorKind, NodeShape, PlacementResult, compute_layout,
};
use crate::metrics::FontMetrics;
use crate::theme::StyleTokens;

/// A classified diagram request as produced by the upstream
/// text-understanding service: a category tag plus the extracted content.
#[derive(Debug, Clone, Deserialize)]
pub struct DiagramRequest {
    pub category: String,
    pub topic: String,
    #[serde(default)]
    pub nodes: Vec<ContentNode>,
    #[serde(default)]
    pub relations: Vec<Relation>,
    #[serde(default)]
    pub tokens: StyleTokens,
}

impl DiagramRequest {
    /// Validate into the typed inputs of a layout invocation.
    pub fn into_parts(self) -> Result<(DiagramCategory, ContentTree, StyleTokens), LayoutError> {
        let category = DiagramCategory::from_tag(&self.category)?;
        let tree = ContentTree::new(self.topic, self.nodes, self.relations)?;
        Ok((category, tree, self.tokens))
    }
}

/// One-call convenience wrapper: request in, geometry out.
pub fn layout_request(
    request: DiagramRequest,
    config: &LayoutConfig,
    metrics: &dyn FontMetrics,
) -> Result<PlacementResult, LayoutError> {
    let (category, tree, tokens) = request.into_parts()?;
    compute_layout(&tree, category, config, metrics, tokens)
}

/// The wire format consumed by the rendering runtime. Carries no algorithmic
/// state and round-trips through JSON, so a renderer can reproduce the exact
/// visual result from the serialized form alone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeometryDoc {
    pub category: String,
    pub canvas: CanvasBounds,
    pub nodes: Vec<NodeGeometry>,
    pub connectors: Vec<ConnectorGeometry>,
    #[serde(default)]
    pub tokens: StyleTokens,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeGeometry {
    pub id: String,
    pub shape: NodeShape,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub label: Vec<String>,
    pub style_ref: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConnectorGeometry {
    pub from: String,
    pub to: String,
    pub kind: ConnectorKind,
    pub points: Vec<[f32; 2]>,
}

impl GeometryDoc {
    pub fn from_result(result: &PlacementResult) -> Self {
        let nodes = result
            .nodes
            .iter()
            .map(|node| NodeGeometry {
                id: node.id.clone(),
                shape: node.shape,
                x: node.x,
                y: node.y,
                width: node.width,
                height: node.height,
                label: node.label.lines.clone(),
                style_ref: node.style_ref.clone(),
            })
            .collect();
        let connectors = result
            .connectors
            .iter()
            .map(|connector| ConnectorGeometry {
                from: connector.from.clone(),
                to: connector.to.clone(),
                kind: connector.kind,
                points: connector.points.iter().map(|(x, y)| [*x, *y]).collect(),
            })
            .collect();
        GeometryDoc {
            category: result.category.tag().to_string(),
            canvas: result.canvas,
            nodes,
            connectors,
            tokens: result.tokens.clone(),
            warnings: result.warnings.iter().map(|w| w.to_string()).collect(),
        }
    }

    pub fn to_json(&self, pretty: bool) -> serde_json::Result<String> {
        if pretty {
            serde_json::to_string_pretty(self)
        } else {
            serde_json::to_string(self)
        }
    }
}

pub fn write_geometry(path: &Path, result: &PlacementResult) -> anyhow::Result<()> {
    let file = File::create(path)?;
    let writer = BufWriter::new(file);
    serde_json::to_writer_pretty(writer, &GeometryDoc::from_result(result))?;
    Ok(())
}
