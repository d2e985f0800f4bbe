use super::*;

/// Hierarchical stack for whole→part structures (brace and tree maps).
/// Children stack vertically inside their parent's span; a parent's vertical
/// span is the union of its children's spans; each depth level shifts right
/// into its own column. Brace maps additionally get a brace segment spanning
/// each child group; tree maps use elbow connectors instead.
pub(super) fn compute(
    tree: &ContentTree,
    with_braces: bool,
    config: &LayoutConfig,
    metrics: &dyn FontMetrics,
) -> Result<PlacedSet, LayoutError> {
    let mut boxes: BTreeMap<String, PlacedNode> = BTreeMap::new();

    let topic_label = measure_label(tree.topic(), config.topic_font_size, metrics, config);
    boxes.insert(
        TOPIC_ID.to_string(),
        make_node(TOPIC_ID, topic_label, NodeShape::Rectangle, roles::TOPIC, config),
    );
    for node in tree.nodes() {
        let style = if node.depth == 1 {
            roles::PART
        } else {
            roles::SUBPART
        };
        let label = measure_label(&node.label, font_for_depth(node.depth, config), metrics, config);
        boxes.insert(
            node.id.clone(),
            make_node(&node.id, label, NodeShape::Rectangle, style, config),
        );
    }

    // One column per depth; each column advances by the widest box of the
    // previous depth plus the indent (plus brace room when applicable).
    let max_depth = tree.max_depth() as usize;
    let mut col_width = vec![0.0f32; max_depth + 1];
    col_width[0] = boxes[TOPIC_ID].width;
    for node in tree.nodes() {
        let depth = node.depth as usize;
        col_width[depth] = col_width[depth].max(boxes[&node.id].width);
    }
    let brace_room = if with_braces {
        config.stack.brace_width + config.stack.brace_gap * 2.0
    } else {
        0.0
    };
    let mut col_x = vec![0.0f32; max_depth + 1];
    for depth in 1..=max_depth {
        col_x[depth] = col_x[depth - 1] + col_width[depth - 1] + config.stack.indent + brace_room;
    }

    let mut spans: BTreeMap<String, f32> = BTreeMap::new();
    let roots = tree.roots();
    for root in &roots {
        group_span(tree, &root.id, &boxes, config.stack.sibling_gap, &mut spans);
    }

    let total_span: f32 = roots.iter().map(|r| spans[&r.id]).sum::<f32>()
        + config.stack.group_gap * roots.len().saturating_sub(1) as f32;

    let mut extents: BTreeMap<String, (f32, f32)> = BTreeMap::new();
    let mut cursor = 0.0f32;
    for root in &roots {
        place_subtree(
            tree,
            &root.id,
            cursor,
            &col_x,
            &mut boxes,
            &spans,
            config.stack.sibling_gap,
            &mut extents,
        );
        cursor += spans[&root.id] + config.stack.group_gap;
    }
    {
        let topic = boxes.get_mut(TOPIC_ID).expect("topic box");
        topic.x = col_x[0];
        topic.y = if roots.is_empty() {
            0.0
        } else {
            (total_span - topic.height) / 2.0
        };
    }

    let mut set = PlacedSet::default();
    let mut connectors = Vec::new();
    let mut braces = Vec::new();

    let mut parent_groups: Vec<(String, Vec<&ContentNode>)> =
        vec![(TOPIC_ID.to_string(), roots.clone())];
    for node in tree.nodes() {
        let children = tree.children_of(Some(&node.id));
        if !children.is_empty() {
            parent_groups.push((node.id.clone(), children));
        }
    }

    for (parent_id, children) in &parent_groups {
        if children.is_empty() {
            continue;
        }
        let child_depth = children[0].depth as usize;
        let group_top = extents[&children[0].id].0;
        let group_bottom = extents[&children[children.len() - 1].id].1;
        if with_braces {
            braces.push(PlacedNode {
                id: format!("_brace:{parent_id}"),
                x: col_x[child_depth] - config.stack.brace_gap - config.stack.brace_width,
                y: group_top,
                width: config.stack.brace_width,
                height: group_bottom - group_top,
                shape: NodeShape::BraceSegment,
                label: TextBlock::default(),
                style_ref: roles::BRACE.to_string(),
            });
        }
        for child in children {
            let parent = &boxes[parent_id];
            let child_box = &boxes[&child.id];
            let (_, pcy) = parent.center();
            let (_, ccy) = child_box.center();
            let start = (parent.x + parent.width, pcy);
            let end = (child_box.x, ccy);
            let connector = if with_braces {
                PlacedConnector {
                    from: parent_id.clone(),
                    to: child.id.clone(),
                    points: vec![start, end],
                    kind: ConnectorKind::Straight,
                }
            } else {
                let mid = (start.0 + end.0) / 2.0;
                PlacedConnector {
                    from: parent_id.clone(),
                    to: child.id.clone(),
                    points: vec![start, (mid, start.1), (mid, end.1), end],
                    kind: ConnectorKind::Elbow,
                }
            };
            connectors.push(connector);
        }
    }

    // Topic first, then depth-first in sibling order, then brace segments.
    set.nodes.push(boxes[TOPIC_ID].clone());
    let mut stack: Vec<&ContentNode> = roots.into_iter().rev().collect();
    while let Some(node) = stack.pop() {
        set.nodes.push(boxes[&node.id].clone());
        for child in tree.children_of(Some(&node.id)).into_iter().rev() {
            stack.push(child);
        }
    }
    set.nodes.extend(braces);
    set.connectors = connectors;
    Ok(set)
}

fn group_span(
    tree: &ContentTree,
    id: &str,
    boxes: &BTreeMap<String, PlacedNode>,
    gap: f32,
    memo: &mut BTreeMap<String, f32>,
) -> f32 {
    if let Some(span) = memo.get(id) {
        return *span;
    }
    let own = boxes[id].height;
    let children = tree.children_of(Some(id));
    let span = if children.is_empty() {
        own
    } else {
        let mut total = gap * children.len().saturating_sub(1) as f32;
        for child in &children {
            total += group_span(tree, &child.id, boxes, gap, memo);
        }
        own.max(total)
    };
    memo.insert(id.to_string(), span);
    span
}

#[allow(clippy::too_many_arguments)]
fn place_subtree(
    tree: &ContentTree,
    id: &str,
    top: f32,
    col_x: &[f32],
    boxes: &mut BTreeMap<String, PlacedNode>,
    spans: &BTreeMap<String, f32>,
    gap: f32,
    extents: &mut BTreeMap<String, (f32, f32)>,
) {
    let span = spans[id];
    extents.insert(id.to_string(), (top, top + span));
    let depth = tree.node(id).map(|n| n.depth).unwrap_or(0) as usize;
    let children = tree.children_of(Some(id));
    {
        let node = boxes.get_mut(id).expect("measured box");
        node.x = col_x[depth];
        node.y = top + (span - node.height) / 2.0;
    }
    if children.is_empty() {
        return;
    }
    let total: f32 = children.iter().map(|c| spans[&c.id]).sum::<f32>()
        + gap * children.len().saturating_sub(1) as f32;
    let mut cursor = top + (span - total) / 2.0;
    for child in children {
        place_subtree(tree, &child.id, cursor, col_x, boxes, spans, gap, extents);
        cursor += spans[&child.id] + gap;
    }
}
