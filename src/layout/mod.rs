mod canvas;
pub mod collision;
mod double_bubble;
mod flow;
mod mindmap;
mod multi_flow;
mod radial;
mod stack;
mod text;
pub(crate) mod types;

pub use types::*;

use std::collections::BTreeMap;

use crate::config::LayoutConfig;
use crate::error::{LayoutError, ValidationError};
use crate::ir::{ContentNode, ContentTree, DiagramCategory, RelationKind, TOPIC_ID};
use crate::metrics::FontMetrics;
use crate::theme::{StyleTokens, roles};

use text::{measure_label, node_box};

/// The closed set of geometry algorithms. Every category maps onto exactly
/// one of these; the mapping is total, so adding a category forces a choice
/// here at compile time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutAlgorithm {
    HierarchicalStack,
    RadialDistribution,
    DualRadial,
    SequentialFlow,
    MultiFlow,
    ClockwiseRadial,
}

/// Strategy selection. Pure and side-effect free; unsupported tags never
/// reach this point because `DiagramCategory` parsing already rejected them.
pub fn select(category: DiagramCategory) -> LayoutAlgorithm {
    match category {
        DiagramCategory::BraceMap | DiagramCategory::TreeMap => LayoutAlgorithm::HierarchicalStack,
        DiagramCategory::BubbleMap | DiagramCategory::CircleMap | DiagramCategory::ConceptMap => {
            LayoutAlgorithm::RadialDistribution
        }
        DiagramCategory::DoubleBubbleMap => LayoutAlgorithm::DualRadial,
        DiagramCategory::FlowMap => LayoutAlgorithm::SequentialFlow,
        DiagramCategory::MultiFlowMap => LayoutAlgorithm::MultiFlow,
        DiagramCategory::Mindmap => LayoutAlgorithm::ClockwiseRadial,
    }
}

/// Lay out one content tree. Pure function of its inputs: no I/O, no global
/// state, deterministic down to the bit for identical arguments.
pub fn compute_layout(
    tree: &ContentTree,
    category: DiagramCategory,
    config: &LayoutConfig,
    metrics: &dyn FontMetrics,
    tokens: StyleTokens,
) -> Result<PlacementResult, LayoutError> {
    log::debug!(
        "laying out {} with {} nodes",
        category.tag(),
        tree.nodes().len()
    );
    let mut placed = match select(category) {
        LayoutAlgorithm::HierarchicalStack => stack::compute(
            tree,
            category == DiagramCategory::BraceMap,
            config,
            metrics,
        )?,
        LayoutAlgorithm::RadialDistribution => {
            let variant = match category {
                DiagramCategory::CircleMap => radial::RadialVariant::Circle,
                DiagramCategory::ConceptMap => radial::RadialVariant::Concept,
                _ => radial::RadialVariant::Bubble,
            };
            radial::compute(tree, variant, config, metrics)?
        }
        LayoutAlgorithm::DualRadial => double_bubble::compute(tree, config, metrics)?,
        LayoutAlgorithm::SequentialFlow => flow::compute(tree, config, metrics)?,
        LayoutAlgorithm::MultiFlow => multi_flow::compute(tree, config, metrics)?,
        LayoutAlgorithm::ClockwiseRadial => mindmap::compute(tree, config, metrics)?,
    };

    let canvas = canvas::fit(&mut placed.nodes, &mut placed.connectors, config);
    Ok(PlacementResult {
        category,
        nodes: placed.nodes,
        connectors: placed.connectors,
        canvas,
        tokens,
        warnings: placed.warnings,
    })
}

fn font_for_depth(depth: u32, config: &LayoutConfig) -> f32 {
    match depth {
        0 => config.topic_font_size,
        1 => config.node_font_size,
        _ => config.sub_font_size,
    }
}

fn make_node(
    id: impl Into<String>,
    label: TextBlock,
    shape: NodeShape,
    style_ref: &str,
    config: &LayoutConfig,
) -> PlacedNode {
    let (width, height) = node_box(&label, shape, config);
    PlacedNode {
        id: id.into(),
        x: 0.0,
        y: 0.0,
        width,
        height,
        shape,
        label,
        style_ref: style_ref.to_string(),
    }
}

fn straight(from: &PlacedNode, to: &PlacedNode) -> PlacedConnector {
    PlacedConnector {
        from: from.id.clone(),
        to: to.id.clone(),
        points: vec![from.center(), to.center()],
        kind: ConnectorKind::Straight,
    }
}

/// Re-point center-to-center connectors after the collision resolver has
/// moved their endpoints.
fn repoint_straight_connectors(set: &mut PlacedSet) {
    for connector in &mut set.connectors {
        if connector.kind != ConnectorKind::Straight {
            continue;
        }
        let from = set.nodes.iter().find(|node| node.id == connector.from);
        let to = set.nodes.iter().find(|node| node.id == connector.to);
        if let (Some(from), Some(to)) = (from, to) {
            connector.points = vec![from.center(), to.center()];
        }
    }
}
