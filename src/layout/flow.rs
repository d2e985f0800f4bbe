use super::*;

/// Sequential flow: ordered steps in a vertical list, each optionally
/// carrying a substep stack. Substeps are positioned first; a step's box is
/// then stretched to cover its substep group, so substep groups drive the
/// spacing rather than the other way around.
pub(super) fn compute(
    tree: &ContentTree,
    config: &LayoutConfig,
    metrics: &dyn FontMetrics,
) -> Result<PlacedSet, LayoutError> {
    if tree.max_depth() > 2 {
        return Err(ValidationError::Structure(
            "flow maps take steps and substeps only, found deeper nesting".to_string(),
        )
        .into());
    }

    let mut set = PlacedSet::default();
    let topic_label = measure_label(tree.topic(), config.topic_font_size, metrics, config);
    let mut topic = make_node(TOPIC_ID, topic_label, NodeShape::Rectangle, roles::TOPIC, config);

    let steps = tree.roots();
    let mut step_boxes: Vec<PlacedNode> = Vec::with_capacity(steps.len());
    let mut substep_stacks: Vec<Vec<PlacedNode>> = Vec::with_capacity(steps.len());

    // Substep-first: measure every substep group before any step spacing is
    // chosen, then give each step the union of its own box and the group.
    for step in &steps {
        let label = measure_label(&step.label, config.node_font_size, metrics, config);
        let mut step_box = make_node(&step.id, label, NodeShape::Rectangle, roles::STEP, config);

        let mut stack: Vec<PlacedNode> = Vec::new();
        for sub in tree.children_of(Some(&step.id)) {
            let sub_label = measure_label(&sub.label, config.sub_font_size, metrics, config);
            stack.push(make_node(
                &sub.id,
                sub_label,
                NodeShape::Rectangle,
                roles::SUBSTEP,
                config,
            ));
        }
        let stack_height: f32 = stack.iter().map(|s| s.height).sum::<f32>()
            + config.flow.substep_gap * stack.len().saturating_sub(1) as f32;
        step_box.height = step_box.height.max(stack_height);
        step_boxes.push(step_box);
        substep_stacks.push(stack);
    }

    let step_col_width = step_boxes.iter().map(|s| s.width).fold(0.0f32, f32::max);
    let substep_x = step_col_width + config.flow.substep_offset_x;

    // Topic heads the list, centered over the step column.
    topic.set_center(step_col_width / 2.0, topic.height / 2.0);
    let mut cursor = topic.height + config.flow.step_gap;

    for (step_box, stack) in step_boxes.iter_mut().zip(&mut substep_stacks) {
        step_box.set_center(step_col_width / 2.0, cursor + step_box.height / 2.0);
        let (_, step_cy) = step_box.center();

        let stack_height: f32 = stack.iter().map(|s| s.height).sum::<f32>()
            + config.flow.substep_gap * stack.len().saturating_sub(1) as f32;
        let mut sub_cursor = step_cy - stack_height / 2.0;
        for sub in stack.iter_mut() {
            sub.x = substep_x;
            sub.y = sub_cursor;
            sub_cursor += sub.height + config.flow.substep_gap;

            let (_, sub_cy) = sub.center();
            let start = (step_box.x + step_box.width, step_cy);
            let turn_x = sub.x - config.flow.elbow_stub;
            set.connectors.push(PlacedConnector {
                from: step_box.id.clone(),
                to: sub.id.clone(),
                points: vec![start, (turn_x, step_cy), (turn_x, sub_cy), (sub.x, sub_cy)],
                kind: ConnectorKind::Elbow,
            });
        }

        cursor += step_box.height + config.flow.step_gap;
    }

    for pair in step_boxes.windows(2) {
        let (from_cx, _) = pair[0].center();
        let (to_cx, _) = pair[1].center();
        set.connectors.push(PlacedConnector {
            from: pair[0].id.clone(),
            to: pair[1].id.clone(),
            points: vec![
                (from_cx, pair[0].y + pair[0].height),
                (to_cx, pair[1].y),
            ],
            kind: ConnectorKind::Arrow,
        });
    }
    if let Some(first) = step_boxes.first() {
        let (topic_cx, _) = topic.center();
        let (first_cx, _) = first.center();
        set.connectors.push(PlacedConnector {
            from: TOPIC_ID.to_string(),
            to: first.id.clone(),
            points: vec![(topic_cx, topic.y + topic.height), (first_cx, first.y)],
            kind: ConnectorKind::Arrow,
        });
    }

    set.nodes.push(topic);
    for (step_box, stack) in step_boxes.into_iter().zip(substep_stacks) {
        set.nodes.push(step_box);
        set.nodes.extend(stack);
    }
    Ok(set)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::ContentNode;
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

    fn coffee_tree() -> ContentTree {
        ContentTree::new(
            "Coffee",
            vec![
                node("grind", None, 0),
                node("heat", None, 1),
                node("brew", None, 2),
                node("serve", None, 3),
                node("kettle", Some("heat"), 0),
                node("boil", Some("heat"), 1),
            ],
            vec![],
        )
        .unwrap()
    }

    fn layout(tree: &ContentTree) -> PlacedSet {
        compute(tree, &LayoutConfig::default(), &CharTableMetrics).unwrap()
    }

    #[test]
    fn steps_are_vertically_ordered() {
        let set = layout(&coffee_tree());
        let ids = ["grind", "heat", "brew", "serve"];
        let ys: Vec<f32> = ids
            .iter()
            .map(|id| set.nodes.iter().find(|n| &n.id == id).unwrap().y)
            .collect();
        assert!(ys.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn step_box_spans_its_substep_union() {
        let set = layout(&coffee_tree());
        let heat = set.nodes.iter().find(|n| n.id == "heat").unwrap();
        let kettle = set.nodes.iter().find(|n| n.id == "kettle").unwrap();
        let boil = set.nodes.iter().find(|n| n.id == "boil").unwrap();
        assert!(heat.y <= kettle.y);
        assert!(heat.y + heat.height >= boil.y + boil.height);
    }

    #[test]
    fn substeps_sit_laterally_offset_with_elbows() {
        let set = layout(&coffee_tree());
        let heat = set.nodes.iter().find(|n| n.id == "heat").unwrap();
        let kettle = set.nodes.iter().find(|n| n.id == "kettle").unwrap();
        assert!(kettle.x > heat.x + heat.width);
        let elbow = set
            .connectors
            .iter()
            .find(|c| c.from == "heat" && c.to == "kettle")
            .unwrap();
        assert_eq!(elbow.kind, ConnectorKind::Elbow);
        assert_eq!(elbow.points.len(), 4);
    }

    #[test]
    fn consecutive_steps_are_linked_with_arrows() {
        let set = layout(&coffee_tree());
        let arrows: Vec<(&str, &str)> = set
            .connectors
            .iter()
            .filter(|c| c.kind == ConnectorKind::Arrow)
            .map(|c| (c.from.as_str(), c.to.as_str()))
            .collect();
        assert!(arrows.contains(&("grind", "heat")));
        assert!(arrows.contains(&("heat", "brew")));
        assert!(arrows.contains(&("brew", "serve")));
        assert!(arrows.contains(&(TOPIC_ID, "grind")));
    }

    #[test]
    fn layout_is_overlap_free() {
        let config = LayoutConfig::default();
        let set = layout(&coffee_tree());
        assert_eq!(collision::total_overlap(&set.nodes, config.clearance), 0.0);
    }

    #[test]
    fn stepless_flow_renders_topic_only() {
        let tree = ContentTree::new("Idle", vec![], vec![]).unwrap();
        let set = layout(&tree);
        assert_eq!(set.nodes.len(), 1);
        assert!(set.connectors.is_empty());
    }
}
