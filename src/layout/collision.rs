//! Shared post-placement collision resolver. Operates on abstract boxes
//! only; it knows nothing about diagram categories.

use super::types::PlacedNode;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Resolution {
    Complete {
        iterations: u32,
    },
    /// The iteration cap was reached. Positions are the best state seen;
    /// `residual_overlap` is strictly smaller than the input overlap.
    Partial {
        iterations: u32,
        residual_overlap: f32,
    },
}

/// Separate overlapping boxes by greedy pairwise push-apart along the
/// shorter separating axis, sweeping until a fixed point or `max_iterations`.
/// Boxes count as overlapping when their rectangles expanded by half the
/// clearance intersect, so resolved boxes end up at least `clearance` apart.
/// Deterministic for a given input; displacement accumulates in half-steps,
/// which keeps total movement small.
pub fn resolve(nodes: &mut [PlacedNode], clearance: f32, max_iterations: u32) -> Resolution {
    let margin = clearance * 0.5;
    let initial = total_overlap(nodes, clearance);
    if initial <= 0.0 {
        return Resolution::Complete { iterations: 0 };
    }

    let mut best_positions: Vec<(f32, f32)> = nodes.iter().map(|n| (n.x, n.y)).collect();
    let mut best_overlap = initial;

    for iteration in 1..=max_iterations.max(1) {
        for i in 0..nodes.len() {
            for j in (i + 1)..nodes.len() {
                if !nodes[i].collidable() || !nodes[j].collidable() {
                    continue;
                }
                let a = nodes[i].rect().expand(margin);
                let b = nodes[j].rect().expand(margin);
                let dx = a.overlap_x(&b);
                let dy = a.overlap_y(&b);
                if dx <= 0.0 || dy <= 0.0 {
                    continue;
                }
                // Push along the axis with the smaller penetration. Ties and
                // coincident centers break toward index order so reruns move
                // the same boxes the same way.
                if dx <= dy {
                    let sign = if a.center().0 <= b.center().0 { 1.0 } else { -1.0 };
                    nodes[i].x -= sign * dx / 2.0;
                    nodes[j].x += sign * dx / 2.0;
                } else {
                    let sign = if a.center().1 <= b.center().1 { 1.0 } else { -1.0 };
                    nodes[i].y -= sign * dy / 2.0;
                    nodes[j].y += sign * dy / 2.0;
                }
            }
        }

        let remaining = total_overlap(nodes, clearance);
        if remaining < best_overlap {
            best_overlap = remaining;
            for (slot, node) in best_positions.iter_mut().zip(nodes.iter()) {
                *slot = (node.x, node.y);
            }
        }
        if remaining <= 0.0 {
            return Resolution::Complete { iterations: iteration };
        }
    }

    // Cap reached: roll back to the lowest-overlap state seen.
    for (node, (x, y)) in nodes.iter_mut().zip(best_positions) {
        node.x = x;
        node.y = y;
    }
    log::warn!(
        "collision resolution capped at {max_iterations} iterations, \
         {best_overlap:.1}px² overlap remains"
    );
    Resolution::Partial {
        iterations: max_iterations,
        residual_overlap: best_overlap,
    }
}

/// Total pairwise margin-expanded overlap area across collidable boxes.
pub fn total_overlap(nodes: &[PlacedNode], clearance: f32) -> f32 {
    let margin = clearance * 0.5;
    let mut total = 0.0;
    for i in 0..nodes.len() {
        for j in (i + 1)..nodes.len() {
            if !nodes[i].collidable() || !nodes[j].collidable() {
                continue;
            }
            total += nodes[i]
                .rect()
                .expand(margin)
                .overlap_area(&nodes[j].rect().expand(margin));
        }
    }
    total
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::types::{NodeShape, TextBlock};
    use proptest::prelude::*;

    fn boxed(id: &str, x: f32, y: f32, width: f32, height: f32) -> PlacedNode {
        PlacedNode {
            id: id.to_string(),
            x,
            y,
            width,
            height,
            shape: NodeShape::Rectangle,
            label: TextBlock::default(),
            style_ref: "attribute".to_string(),
        }
    }

    #[test]
    fn disjoint_input_is_untouched() {
        let mut nodes = vec![boxed("a", 0.0, 0.0, 20.0, 20.0), boxed("b", 100.0, 0.0, 20.0, 20.0)];
        let before = nodes.clone();
        let outcome = resolve(&mut nodes, 10.0, 32);
        assert_eq!(outcome, Resolution::Complete { iterations: 0 });
        assert_eq!(nodes, before);
    }

    #[test]
    fn overlapping_pair_is_separated() {
        let mut nodes = vec![boxed("a", 0.0, 0.0, 40.0, 20.0), boxed("b", 10.0, 5.0, 40.0, 20.0)];
        let outcome = resolve(&mut nodes, 8.0, 32);
        assert!(matches!(outcome, Resolution::Complete { .. }));
        assert_eq!(total_overlap(&nodes, 8.0), 0.0);
    }

    #[test]
    fn coincident_boxes_are_separated_deterministically() {
        let make = || vec![boxed("a", 0.0, 0.0, 30.0, 30.0), boxed("b", 0.0, 0.0, 30.0, 30.0)];
        let mut first = make();
        let mut second = make();
        resolve(&mut first, 6.0, 64);
        resolve(&mut second, 6.0, 64);
        assert_eq!(total_overlap(&first, 6.0), 0.0);
        assert_eq!(first, second);
    }

    #[test]
    fn capped_run_reports_partial_with_smaller_residual() {
        // A dense pile that one sweep cannot untangle.
        let mut nodes: Vec<PlacedNode> = (0..12)
            .map(|i| boxed(&format!("n{i}"), (i % 3) as f32 * 4.0, (i / 3) as f32 * 4.0, 60.0, 40.0))
            .collect();
        let before = total_overlap(&nodes, 10.0);
        match resolve(&mut nodes, 10.0, 1) {
            Resolution::Partial {
                residual_overlap, ..
            } => assert!(residual_overlap < before),
            Resolution::Complete { .. } => {
                assert_eq!(total_overlap(&nodes, 10.0), 0.0);
            }
        }
    }

    proptest! {
        #[test]
        fn resolve_clears_overlap_or_strictly_reduces_it(
            coords in prop::collection::vec((0.0f32..200.0, 0.0f32..200.0), 2..10)
        ) {
            let mut nodes: Vec<PlacedNode> = coords
                .iter()
                .enumerate()
                .map(|(i, (x, y))| boxed(&format!("n{i}"), *x, *y, 50.0, 24.0))
                .collect();
            let before = total_overlap(&nodes, 12.0);
            match resolve(&mut nodes, 12.0, 64) {
                Resolution::Complete { .. } => {
                    prop_assert_eq!(total_overlap(&nodes, 12.0), 0.0);
                }
                Resolution::Partial { residual_overlap, .. } => {
                    prop_assert!(residual_overlap < before);
                    prop_assert!((total_overlap(&nodes, 12.0) - residual_overlap).abs() < 1e-3);
                }
            }
        }

        #[test]
        fn resolve_is_deterministic(
            coords in prop::collection::vec((0.0f32..120.0, 0.0f32..120.0), 2..8)
        ) {
            let build = || -> Vec<PlacedNode> {
                coords
                    .iter()
                    .enumerate()
                    .map(|(i, (x, y))| boxed(&format!("n{i}"), *x, *y, 40.0, 18.0))
                    .collect()
            };
            let mut a = build();
            let mut b = build();
            resolve(&mut a, 10.0, 48);
            resolve(&mut b, 10.0, 48);
            prop_assert_eq!(a, b);
        }
    }
}
