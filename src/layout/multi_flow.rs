use super::*;

/// Multi-flow (cause/effect) layout: a central event flanked by a cause
/// group above and an effect group below. Sides are classified through
/// `CauseEffect` relations against the reserved topic id and measured
/// independently before the event's position is fixed, mirroring the
/// substep-first rule of the sequential flow.
pub(super) fn compute(
    tree: &ContentTree,
    config: &LayoutConfig,
    metrics: &dyn FontMetrics,
) -> Result<PlacedSet, LayoutError> {
    if tree.max_depth() > 1 {
        return Err(ValidationError::Structure(
            "multi-flow maps take a flat cause/effect list, found nested nodes".to_string(),
        )
        .into());
    }

    let mut causes: Vec<&ContentNode> = Vec::new();
    let mut effects: Vec<&ContentNode> = Vec::new();
    for node in tree.roots() {
        let is_cause = tree.relations().iter().any(|rel| {
            rel.kind == RelationKind::CauseEffect && rel.from == node.id && rel.to == TOPIC_ID
        });
        let is_effect = tree.relations().iter().any(|rel| {
            rel.kind == RelationKind::CauseEffect && rel.from == TOPIC_ID && rel.to == node.id
        });
        match (is_cause, is_effect) {
            (true, false) => causes.push(node),
            (false, true) => effects.push(node),
            (true, true) => {
                return Err(ValidationError::Structure(format!(
                    "node `{}` is linked as both cause and effect",
                    node.id
                ))
                .into());
            }
            (false, false) => {
                return Err(ValidationError::Structure(format!(
                    "node `{}` has no cause-effect relation to the event",
                    node.id
                ))
                .into());
            }
        }
    }

    let event_label = measure_label(tree.topic(), config.topic_font_size, metrics, config);
    let mut event = make_node(TOPIC_ID, event_label, NodeShape::Rectangle, roles::EVENT, config);
    event.set_center(0.0, 0.0);

    let mut set = PlacedSet::default();

    let mut cause_row = measure_row(&causes, roles::CAUSE, config, metrics);
    let cause_height = row_height(&cause_row);
    place_row(
        &mut cause_row,
        -(event.height / 2.0 + config.multi_flow.section_gap + cause_height / 2.0),
        config,
    );
    for node in &cause_row {
        let (cx, _) = node.center();
        let (ex, _) = event.center();
        set.connectors.push(PlacedConnector {
            from: node.id.clone(),
            to: TOPIC_ID.to_string(),
            points: vec![(cx, node.y + node.height), (ex, event.y)],
            kind: ConnectorKind::Arrow,
        });
    }

    let mut effect_row = measure_row(&effects, roles::EFFECT, config, metrics);
    let effect_height = row_height(&effect_row);
    place_row(
        &mut effect_row,
        event.height / 2.0 + config.multi_flow.section_gap + effect_height / 2.0,
        config,
    );
    for node in &effect_row {
        let (cx, _) = node.center();
        let (ex, _) = event.center();
        set.connectors.push(PlacedConnector {
            from: TOPIC_ID.to_string(),
            to: node.id.clone(),
            points: vec![(ex, event.y + event.height), (cx, node.y)],
            kind: ConnectorKind::Arrow,
        });
    }

    set.nodes.push(event);
    set.nodes.extend(cause_row);
    set.nodes.extend(effect_row);
    Ok(set)
}

fn measure_row(
    items: &[&ContentNode],
    role: &str,
    config: &LayoutConfig,
    metrics: &dyn FontMetrics,
) -> Vec<PlacedNode> {
    items
        .iter()
        .map(|item| {
            let label = measure_label(&item.label, config.node_font_size, metrics, config);
            make_node(&item.id, label, NodeShape::Rectangle, role, config)
        })
        .collect()
}

fn row_height(row: &[PlacedNode]) -> f32 {
    row.iter().map(|n| n.height).fold(0.0f32, f32::max)
}

/// Center the row horizontally on the event axis, boxes side by side.
fn place_row(row: &mut [PlacedNode], center_y: f32, config: &LayoutConfig) {
    let total_width: f32 = row.iter().map(|n| n.width).sum::<f32>()
        + config.multi_flow.item_gap * row.len().saturating_sub(1) as f32;
    let mut cursor = -total_width / 2.0;
    for node in row.iter_mut() {
        let half = node.width / 2.0;
        node.set_center(cursor + half, center_y);
        cursor += node.width + config.multi_flow.item_gap;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::{ContentNode, Relation, RelationKind};
    use crate::metrics::CharTableMetrics;

    fn node(id: &str, order: u32) -> ContentNode {
        ContentNode {
            id: id.to_string(),
            label: format!("{id} label"),
            parent: None,
            order,
            depth: 0,
        }
    }

    fn cause(id: &str) -> Relation {
        Relation {
            from: id.to_string(),
            to: TOPIC_ID.to_string(),
            kind: RelationKind::CauseEffect,
        }
    }

    fn effect(id: &str) -> Relation {
        Relation {
            from: TOPIC_ID.to_string(),
            to: id.to_string(),
            kind: RelationKind::CauseEffect,
        }
    }

    fn storm_tree() -> ContentTree {
        ContentTree::new(
            "Flooding",
            vec![node("rain", 0), node("tide", 1), node("damage", 2), node("delays", 3)],
            vec![cause("rain"), cause("tide"), effect("damage"), effect("delays")],
        )
        .unwrap()
    }

    #[test]
    fn causes_sit_above_and_effects_below_the_event() {
        let set = compute(&storm_tree(), &LayoutConfig::default(), &CharTableMetrics).unwrap();
        let event = set.nodes.iter().find(|n| n.id == TOPIC_ID).unwrap();
        let rain = set.nodes.iter().find(|n| n.id == "rain").unwrap();
        let damage = set.nodes.iter().find(|n| n.id == "damage").unwrap();
        assert!(rain.y + rain.height < event.y);
        assert!(damage.y > event.y + event.height);
    }

    #[test]
    fn arrows_run_cause_to_event_to_effect() {
        let set = compute(&storm_tree(), &LayoutConfig::default(), &CharTableMetrics).unwrap();
        assert!(set
            .connectors
            .iter()
            .any(|c| c.from == "rain" && c.to == TOPIC_ID && c.kind == ConnectorKind::Arrow));
        assert!(set
            .connectors
            .iter()
            .any(|c| c.from == TOPIC_ID && c.to == "damage" && c.kind == ConnectorKind::Arrow));
    }

    #[test]
    fn unlinked_node_is_a_structure_error() {
        let tree = ContentTree::new("Event", vec![node("stray", 0)], vec![]).unwrap();
        let err = compute(&tree, &LayoutConfig::default(), &CharTableMetrics).unwrap_err();
        assert!(matches!(
            err,
            LayoutError::Validation(ValidationError::Structure(_))
        ));
    }

    #[test]
    fn doubly_linked_node_is_a_structure_error() {
        let tree = ContentTree::new(
            "Event",
            vec![node("both", 0)],
            vec![cause("both"), effect("both")],
        )
        .unwrap();
        let err = compute(&tree, &LayoutConfig::default(), &CharTableMetrics).unwrap_err();
        assert!(matches!(
            err,
            LayoutError::Validation(ValidationError::Structure(_))
        ));
    }

    #[test]
    fn layout_is_overlap_free() {
        let config = LayoutConfig::default();
        let set = compute(&storm_tree(), &config, &CharTableMetrics).unwrap();
        assert_eq!(collision::total_overlap(&set.nodes, config.clearance), 0.0);
    }
}
