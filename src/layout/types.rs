use std::fmt;

use serde::{Deserialize, Serialize};

use crate::ir::DiagramCategory;
use crate::theme::{StyleTokens, roles};

#[derive(Debug, Clone, PartialEq, Default)]
pub struct TextBlock {
    pub lines: Vec<String>,
    pub width: f32,
    pub height: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NodeShape {
    Rectangle,
    Ellipse,
    BraceSegment,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectorKind {
    Straight,
    Elbow,
    Arrow,
}

/// Axis-aligned box with its top-left corner at (x, y).
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedNode {
    pub id: String,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub shape: NodeShape,
    pub label: TextBlock,
    pub style_ref: String,
}

impl PlacedNode {
    pub fn center(&self) -> (f32, f32) {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    pub fn set_center(&mut self, cx: f32, cy: f32) {
        self.x = cx - self.width / 2.0;
        self.y = cy - self.height / 2.0;
    }

    pub fn rect(&self) -> Rect {
        Rect {
            x: self.x,
            y: self.y,
            width: self.width,
            height: self.height,
        }
    }

    /// Brace segments share boundaries with their child groups and the
    /// circle-map ring encloses its content, so both sit outside the
    /// non-overlap invariant.
    pub fn collidable(&self) -> bool {
        self.shape != NodeShape::BraceSegment && self.style_ref != roles::BOUNDARY
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlacedConnector {
    pub from: String,
    pub to: String,
    pub points: Vec<(f32, f32)>,
    pub kind: ConnectorKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CanvasBounds {
    pub width: f32,
    pub height: f32,
    pub padding: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub enum LayoutWarning {
    /// The collision resolver hit its iteration cap; geometry is the best
    /// achieved state, with this much margin-expanded overlap area left.
    PartialResolution {
        residual_overlap: f32,
        iterations: u32,
    },
}

impl fmt::Display for LayoutWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PartialResolution {
                residual_overlap,
                iterations,
            } => write!(
                f,
                "collision resolution incomplete after {iterations} iterations \
                 ({residual_overlap:.1}px² overlap remains)"
            ),
        }
    }
}

/// Geometry for one diagram. Created by a single layout invocation, consumed
/// once by serialization; holds no algorithmic state.
#[derive(Debug, Clone)]
pub struct PlacementResult {
    pub category: DiagramCategory,
    pub nodes: Vec<PlacedNode>,
    pub connectors: Vec<PlacedConnector>,
    pub canvas: CanvasBounds,
    pub tokens: StyleTokens,
    pub warnings: Vec<LayoutWarning>,
}

impl PlacementResult {
    pub fn node(&self, id: &str) -> Option<&PlacedNode> {
        self.nodes.iter().find(|node| node.id == id)
    }
}

/// Nodes and connectors produced by one algorithm, before canvas fitting.
#[derive(Debug, Default)]
pub(crate) struct PlacedSet {
    pub nodes: Vec<PlacedNode>,
    pub connectors: Vec<PlacedConnector>,
    pub warnings: Vec<LayoutWarning>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn expand(self, margin: f32) -> Rect {
        Rect {
            x: self.x - margin,
            y: self.y - margin,
            width: self.width + margin * 2.0,
            height: self.height + margin * 2.0,
        }
    }

    pub fn intersects(&self, other: &Rect) -> bool {
        self.overlap_x(other) > 0.0 && self.overlap_y(other) > 0.0
    }

    /// Horizontal penetration depth; non-positive when separated on x.
    pub fn overlap_x(&self, other: &Rect) -> f32 {
        (self.x + self.width).min(other.x + other.width) - self.x.max(other.x)
    }

    pub fn overlap_y(&self, other: &Rect) -> f32 {
        (self.y + self.height).min(other.y + other.height) - self.y.max(other.y)
    }

    pub fn overlap_area(&self, other: &Rect) -> f32 {
        let dx = self.overlap_x(other);
        let dy = self.overlap_y(other);
        if dx > 0.0 && dy > 0.0 { dx * dy } else { 0.0 }
    }

    pub fn union(self, other: Rect) -> Rect {
        let x = self.x.min(other.x);
        let y = self.y.min(other.y);
        Rect {
            x,
            y,
            width: (self.x + self.width).max(other.x + other.width) - x,
            height: (self.y + self.height).max(other.y + other.height) - y,
        }
    }

    pub fn center(&self) -> (f32, f32) {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rect(x: f32, y: f32, width: f32, height: f32) -> Rect {
        Rect {
            x,
            y,
            width,
            height,
        }
    }

    #[test]
    fn separated_rects_do_not_intersect() {
        let a = rect(0.0, 0.0, 10.0, 10.0);
        let b = rect(20.0, 0.0, 10.0, 10.0);
        assert!(!a.intersects(&b));
        assert_eq!(a.overlap_area(&b), 0.0);
    }

    #[test]
    fn touching_rects_do_not_intersect() {
        let a = rect(0.0, 0.0, 10.0, 10.0);
        let b = rect(10.0, 0.0, 10.0, 10.0);
        assert!(!a.intersects(&b));
    }

    #[test]
    fn expanded_rects_detect_near_misses() {
        let a = rect(0.0, 0.0, 10.0, 10.0).expand(3.0);
        let b = rect(12.0, 0.0, 10.0, 10.0).expand(3.0);
        assert!(a.intersects(&b));
    }

    #[test]
    fn overlap_area_matches_penetration() {
        let a = rect(0.0, 0.0, 10.0, 10.0);
        let b = rect(6.0, 4.0, 10.0, 10.0);
        assert_eq!(a.overlap_area(&b), 4.0 * 6.0);
    }

    #[test]
    fn union_covers_both() {
        let a = rect(0.0, 0.0, 10.0, 10.0);
        let b = rect(30.0, -5.0, 10.0, 10.0);
        let u = a.union(b);
        assert_eq!(u.x, 0.0);
        assert_eq!(u.y, -5.0);
        assert_eq!(u.width, 40.0);
        assert_eq!(u.height, 15.0);
    }

    #[test]
    fn brace_segments_are_exempt_from_collision() {
        let node = PlacedNode {
            id: "_brace:a".to_string(),
            x: 0.0,
            y: 0.0,
            width: 16.0,
            height: 80.0,
            shape: NodeShape::BraceSegment,
            label: TextBlock::default(),
            style_ref: roles::BRACE.to_string(),
        };
        assert!(!node.collidable());
    }
}
