use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::error::{LayoutError, ValidationError};

/// Reserved id for the root topic. Relations may target it (multi-flow maps
/// link causes and effects to the event this way) and every layout emits the
/// topic's placed node under this id, so user nodes must not claim it.
pub const TOPIC_ID: &str = "_topic";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagramCategory {
    CircleMap,
    BubbleMap,
    DoubleBubbleMap,
    TreeMap,
    BraceMap,
    FlowMap,
    MultiFlowMap,
    Mindmap,
    ConceptMap,
}

impl DiagramCategory {
    pub const ALL: [DiagramCategory; 9] = [
        Self::CircleMap,
        Self::BubbleMap,
        Self::DoubleBubbleMap,
        Self::TreeMap,
        Self::BraceMap,
        Self::FlowMap,
        Self::MultiFlowMap,
        Self::Mindmap,
        Self::ConceptMap,
    ];

    /// Parse a classifier tag. The set is closed; unknown tags are an error,
    /// never mapped to a default category.
    pub fn from_tag(tag: &str) -> Result<Self, LayoutError> {
        match tag {
            "circle_map" => Ok(Self::CircleMap),
            "bubble_map" => Ok(Self::BubbleMap),
            "double_bubble_map" => Ok(Self::DoubleBubbleMap),
            "tree_map" => Ok(Self::TreeMap),
            "brace_map" => Ok(Self::BraceMap),
            "flow_map" => Ok(Self::FlowMap),
            "multi_flow_map" => Ok(Self::MultiFlowMap),
            "mindmap" | "mind_map" => Ok(Self::Mindmap),
            "concept_map" => Ok(Self::ConceptMap),
            _ => Err(LayoutError::UnsupportedCategory(tag.to_string())),
        }
    }

    pub fn tag(&self) -> &'static str {
        match self {
            Self::CircleMap => "circle_map",
            Self::BubbleMap => "bubble_map",
            Self::DoubleBubbleMap => "double_bubble_map",
            Self::TreeMap => "tree_map",
            Self::BraceMap => "brace_map",
            Self::FlowMap => "flow_map",
            Self::MultiFlowMap => "multi_flow_map",
            Self::Mindmap => "mindmap",
            Self::ConceptMap => "concept_map",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationKind {
    Sequence,
    CauseEffect,
    AnalogyPair,
    SharedTrait,
    UniqueTrait,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Relation {
    pub from: String,
    pub to: String,
    pub kind: RelationKind,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentNode {
    pub id: String,
    pub label: String,
    #[serde(default)]
    pub parent: Option<String>,
    pub order: u32,
    /// Distance from the topic (direct children are depth 1). Derived from
    /// the parent chain during validation; incoming values are ignored.
    #[serde(default, skip_deserializing)]
    pub depth: u32,
}

/// Validated logical structure of one diagram. Immutable once constructed;
/// a layout invocation consumes it read-only.
#[derive(Debug, Clone)]
pub struct ContentTree {
    topic: String,
    nodes: Vec<ContentNode>,
    relations: Vec<Relation>,
    index: BTreeMap<String, usize>,
}

impl ContentTree {
    pub fn new(
        topic: impl Into<String>,
        mut nodes: Vec<ContentNode>,
        relations: Vec<Relation>,
    ) -> Result<Self, ValidationError> {
        let topic = topic.into();
        if topic.trim().is_empty() {
            return Err(ValidationError::EmptyTopic);
        }

        let mut index = BTreeMap::new();
        for (i, node) in nodes.iter().enumerate() {
            if node.id.is_empty() {
                return Err(ValidationError::Structure("node id is empty".to_string()));
            }
            if node.id == TOPIC_ID || node.id.starts_with('_') {
                return Err(ValidationError::ReservedId(node.id.clone()));
            }
            if node.label.trim().is_empty() {
                return Err(ValidationError::EmptyLabel(node.id.clone()));
            }
            if index.insert(node.id.clone(), i).is_some() {
                return Err(ValidationError::DuplicateId(node.id.clone()));
            }
        }

        let depths = derive_depths(&nodes, &index)?;
        for (node, depth) in nodes.iter_mut().zip(depths) {
            node.depth = depth;
        }

        let mut seen_orders: BTreeSet<(String, u32)> = BTreeSet::new();
        for node in &nodes {
            let parent = node.parent.clone().unwrap_or_else(|| TOPIC_ID.to_string());
            if !seen_orders.insert((parent.clone(), node.order)) {
                return Err(ValidationError::DuplicateOrder {
                    parent,
                    order: node.order,
                });
            }
        }

        for relation in &relations {
            for end in [&relation.from, &relation.to] {
                if end != TOPIC_ID && !index.contains_key(end) {
                    return Err(ValidationError::DanglingRelation(end.clone()));
                }
            }
        }

        Ok(Self {
            topic,
            nodes,
            relations,
            index,
        })
    }

    pub fn topic(&self) -> &str {
        &self.topic
    }

    pub fn nodes(&self) -> &[ContentNode] {
        &self.nodes
    }

    pub fn relations(&self) -> &[Relation] {
        &self.relations
    }

    pub fn node(&self, id: &str) -> Option<&ContentNode> {
        self.index.get(id).map(|i| &self.nodes[*i])
    }

    /// Children of `parent` (or of the topic when `None`), in `order`.
    pub fn children_of(&self, parent: Option<&str>) -> Vec<&ContentNode> {
        let mut children: Vec<&ContentNode> = self
            .nodes
            .iter()
            .filter(|node| node.parent.as_deref() == parent)
            .collect();
        children.sort_by_key(|node| node.order);
        children
    }

    pub fn roots(&self) -> Vec<&ContentNode> {
        self.children_of(None)
    }

    pub fn max_depth(&self) -> u32 {
        self.nodes.iter().map(|node| node.depth).max().unwrap_or(0)
    }
}

fn derive_depths(
    nodes: &[ContentNode],
    index: &BTreeMap<String, usize>,
) -> Result<Vec<u32>, ValidationError> {
    let mut depths = Vec::with_capacity(nodes.len());
    for node in nodes {
        let mut depth = 1u32;
        let mut visited: BTreeSet<&str> = BTreeSet::new();
        visited.insert(node.id.as_str());
        let mut current = node.parent.as_deref();
        while let Some(parent_id) = current {
            if !visited.insert(parent_id) {
                return Err(ValidationError::Cycle(node.id.clone()));
            }
            let Some(parent_index) = index.get(parent_id) else {
                return Err(ValidationError::DanglingParent {
                    id: node.id.clone(),
                    parent: parent_id.to_string(),
                });
            };
            depth += 1;
            current = nodes[*parent_index].parent.as_deref();
        }
        depths.push(depth);
    }
    Ok(depths)
}
