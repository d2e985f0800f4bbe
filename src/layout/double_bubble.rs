use super::*;

/// Dual-comparison layout: two focus topics mirrored around a shared lane.
/// Attributes carrying a `SharedTrait` relation stack on the center line;
/// each focus's remaining attributes fan over an outward-facing arc.
pub(super) fn compute(
    tree: &ContentTree,
    config: &LayoutConfig,
    metrics: &dyn FontMetrics,
) -> Result<PlacedSet, LayoutError> {
    let foci = tree.roots();
    if foci.len() != 2 {
        return Err(ValidationError::Structure(format!(
            "double bubble maps need exactly two focus topics, found {}",
            foci.len()
        ))
        .into());
    }
    if tree.max_depth() > 2 {
        return Err(ValidationError::Structure(
            "double bubble maps take attributes directly under a focus".to_string(),
        )
        .into());
    }
    let (left_focus, right_focus) = (foci[0], foci[1]);

    let shared_ids: std::collections::BTreeSet<&str> = tree
        .relations()
        .iter()
        .filter(|rel| rel.kind == RelationKind::SharedTrait)
        .flat_map(|rel| [rel.from.as_str(), rel.to.as_str()])
        .filter(|id| tree.node(id).map(|n| n.depth == 2).unwrap_or(false))
        .collect();

    let mut shared: Vec<PlacedNode> = Vec::new();
    let mut left_unique: Vec<PlacedNode> = Vec::new();
    let mut right_unique: Vec<PlacedNode> = Vec::new();
    for focus in [left_focus, right_focus] {
        for attr in tree.children_of(Some(&focus.id)) {
            let label = measure_label(&attr.label, config.node_font_size, metrics, config);
            if shared_ids.contains(attr.id.as_str()) {
                shared.push(make_node(
                    &attr.id,
                    label,
                    NodeShape::Ellipse,
                    roles::SHARED,
                    config,
                ));
            } else {
                let node =
                    make_node(&attr.id, label, NodeShape::Ellipse, roles::UNIQUE, config);
                if focus.id == left_focus.id {
                    left_unique.push(node);
                } else {
                    right_unique.push(node);
                }
            }
        }
    }

    let left_label = measure_label(&left_focus.label, config.topic_font_size, metrics, config);
    let right_label = measure_label(&right_focus.label, config.topic_font_size, metrics, config);
    let mut left_box = make_node(
        &left_focus.id,
        left_label,
        NodeShape::Ellipse,
        roles::FOCUS,
        config,
    );
    let mut right_box = make_node(
        &right_focus.id,
        right_label,
        NodeShape::Ellipse,
        roles::FOCUS,
        config,
    );

    // Shared lane on the center line.
    let lane_width = shared.iter().map(|n| n.width).fold(0.0f32, f32::max);
    let lane_height: f32 = shared.iter().map(|n| n.height).sum::<f32>()
        + config.double_bubble.lane_item_gap * shared.len().saturating_sub(1) as f32;
    let mut cursor = -lane_height / 2.0;
    for node in &mut shared {
        let half = node.height / 2.0;
        node.set_center(0.0, cursor + half);
        cursor += node.height + config.double_bubble.lane_item_gap;
    }

    let left_cx =
        -(lane_width / 2.0 + config.double_bubble.column_gap + left_box.width / 2.0);
    let right_cx = lane_width / 2.0 + config.double_bubble.column_gap + right_box.width / 2.0;
    left_box.set_center(left_cx, 0.0);
    right_box.set_center(right_cx, 0.0);

    place_fan(&mut left_unique, (left_cx, 0.0), &left_box, 180.0, config);
    place_fan(&mut right_unique, (right_cx, 0.0), &right_box, 0.0, config);

    let mut set = PlacedSet::default();
    for node in &shared {
        set.connectors.push(straight(&left_box, node));
        set.connectors.push(straight(&right_box, node));
    }
    for node in &left_unique {
        set.connectors.push(straight(&left_box, node));
    }
    for node in &right_unique {
        set.connectors.push(straight(&right_box, node));
    }

    set.nodes.push(left_box);
    set.nodes.push(right_box);
    set.nodes.extend(shared);
    set.nodes.extend(left_unique);
    set.nodes.extend(right_unique);

    let outcome = collision::resolve(
        &mut set.nodes,
        config.clearance,
        config.collision_max_iterations,
    );
    if let collision::Resolution::Partial {
        iterations,
        residual_overlap,
    } = outcome
    {
        set.warnings.push(LayoutWarning::PartialResolution {
            residual_overlap,
            iterations,
        });
    }

    repoint_straight_connectors(&mut set);

    Ok(set)
}

/// Distribute `nodes` on an arc around `center`, opening away from the
/// shared lane. `axis_deg` is the fan's middle direction (180 = left).
fn place_fan(
    nodes: &mut [PlacedNode],
    center: (f32, f32),
    focus: &PlacedNode,
    axis_deg: f32,
    config: &LayoutConfig,
) {
    let n = nodes.len();
    if n == 0 {
        return;
    }
    let max_w = nodes.iter().map(|p| p.width).fold(0.0f32, f32::max);
    let max_h = nodes.iter().map(|p| p.height).fold(0.0f32, f32::max);
    let mut radius = config
        .double_bubble
        .min_radius
        .max(focus.width / 2.0 + max_w / 2.0 + config.double_bubble.radial_gap)
        .max(focus.height / 2.0 + max_h / 2.0 + config.double_bubble.radial_gap);

    let span = config.double_bubble.fan_span_deg.to_radians();
    if n >= 2 {
        let step = span / (n - 1) as f32;
        let needed = max_w.max(max_h) + config.clearance;
        radius = radius.max(needed / (2.0 * (step / 2.0).sin()));
    }

    let axis = axis_deg.to_radians();
    for (i, node) in nodes.iter_mut().enumerate() {
        let angle = if n == 1 {
            axis
        } else {
            axis - span / 2.0 + span * i as f32 / (n - 1) as f32
        };
        node.set_center(
            center.0 + radius * angle.cos(),
            center.1 + radius * angle.sin(),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::{ContentNode, Relation, RelationKind};
    use crate::metrics::CharTableMetrics;

    fn node(id: &str, parent: Option<&str>, order: u32) -> ContentNode {
        ContentNode {
            id: id.to_string(),
            label: format!("{id} label"),
            parent: parent.map(str::to_string),
            order,
            depth: 0,
        }
    }

    fn shared_rel(focus: &str, attr: &str) -> Relation {
        Relation {
            from: focus.to_string(),
            to: attr.to_string(),
            kind: RelationKind::SharedTrait,
        }
    }

    fn comparison_tree() -> ContentTree {
        ContentTree::new(
            "Cats vs dogs",
            vec![
                node("cats", None, 0),
                node("dogs", None, 1),
                node("purr", Some("cats"), 0),
                node("fur", Some("cats"), 1),
                node("bark", Some("dogs"), 0),
                node("loyal", Some("dogs"), 1),
            ],
            vec![shared_rel("cats", "fur"), shared_rel("dogs", "fur")],
        )
        .unwrap()
    }

    #[test]
    fn shared_attributes_sit_between_the_foci() {
        let set = compute(
            &comparison_tree(),
            &LayoutConfig::default(),
            &CharTableMetrics,
        )
        .unwrap();
        let cats = set.nodes.iter().find(|n| n.id == "cats").unwrap();
        let dogs = set.nodes.iter().find(|n| n.id == "dogs").unwrap();
        let fur = set.nodes.iter().find(|n| n.id == "fur").unwrap();
        assert!(cats.center().0 < fur.center().0);
        assert!(fur.center().0 < dogs.center().0);
        assert_eq!(fur.style_ref, roles::SHARED);
    }

    #[test]
    fn unique_attributes_fan_outward() {
        let set = compute(
            &comparison_tree(),
            &LayoutConfig::default(),
            &CharTableMetrics,
        )
        .unwrap();
        let cats = set.nodes.iter().find(|n| n.id == "cats").unwrap();
        let dogs = set.nodes.iter().find(|n| n.id == "dogs").unwrap();
        let purr = set.nodes.iter().find(|n| n.id == "purr").unwrap();
        let bark = set.nodes.iter().find(|n| n.id == "bark").unwrap();
        assert!(purr.center().0 < cats.center().0);
        assert!(bark.center().0 > dogs.center().0);
    }

    #[test]
    fn shared_items_connect_to_both_foci() {
        let set = compute(
            &comparison_tree(),
            &LayoutConfig::default(),
            &CharTableMetrics,
        )
        .unwrap();
        let to_fur: Vec<&str> = set
            .connectors
            .iter()
            .filter(|c| c.to == "fur")
            .map(|c| c.from.as_str())
            .collect();
        assert_eq!(to_fur, vec!["cats", "dogs"]);
    }

    #[test]
    fn wrong_focus_count_is_a_structure_error() {
        let tree = ContentTree::new("T", vec![node("only", None, 0)], vec![]).unwrap();
        let err = compute(&tree, &LayoutConfig::default(), &CharTableMetrics).unwrap_err();
        assert!(matches!(
            err,
            LayoutError::Validation(ValidationError::Structure(_))
        ));
    }

    #[test]
    fn result_is_overlap_free() {
        let config = LayoutConfig::default();
        let set = compute(&comparison_tree(), &config, &CharTableMetrics).unwrap();
        assert_eq!(collision::total_overlap(&set.nodes, config.clearance), 0.0);
    }
}
