use super::*;

/// Clockwise mind-map: branches fan around the topic in reading order,
/// right side first (top to bottom), then left side (bottom to top), so the
/// walk is one clockwise sweep from the top-right anchor. Side counts differ
/// by at most one, and an odd-count side puts its middle branch on the
/// horizontal axis through the topic center. Branch subtrees stack outward
/// with the same gap rules at every depth.
pub(super) fn compute(
    tree: &ContentTree,
    config: &LayoutConfig,
    metrics: &dyn FontMetrics,
) -> Result<PlacedSet, LayoutError> {
    let mut boxes: BTreeMap<String, PlacedNode> = BTreeMap::new();
    let topic_label = measure_label(tree.topic(), config.topic_font_size, metrics, config);
    let mut topic = make_node(TOPIC_ID, topic_label, NodeShape::Ellipse, roles::TOPIC, config);
    topic.set_center(0.0, 0.0);

    for node in tree.nodes() {
        let (style, shape) = if node.depth == 1 {
            (roles::BRANCH, NodeShape::Ellipse)
        } else {
            (roles::CHILD, NodeShape::Rectangle)
        };
        let label = measure_label(&node.label, font_for_depth(node.depth, config), metrics, config);
        boxes.insert(node.id.clone(), make_node(&node.id, label, shape, style, config));
    }

    let mut heights: BTreeMap<String, f32> = BTreeMap::new();
    let branches = tree.roots();
    for branch in &branches {
        subtree_height(tree, &branch.id, &boxes, config.mindmap.child_gap_y, &mut heights);
    }

    let n = branches.len();
    match n {
        0 => {}
        1 => {
            let branch = branches[0];
            let width = boxes[&branch.id].width;
            let cx = topic.width / 2.0 + config.mindmap.radial_gap + width / 2.0;
            place_branch(tree, &branch.id, (cx, 0.0), 1.0, &mut boxes, &heights, config);
        }
        _ => {
            let right_count = n.div_ceil(2);
            let max_branch_w = branches
                .iter()
                .map(|b| boxes[&b.id].width)
                .fold(0.0f32, f32::max);

            let right_angles = side_angles(right_count, 0.0, config);
            let left_angles = side_angles(n - right_count, 180.0, config);

            let radius = fan_radius(
                &branches,
                &right_angles,
                &left_angles,
                &heights,
                &topic,
                max_branch_w,
                config,
            );

            for (i, branch) in branches.iter().enumerate() {
                let (angle, direction) = if i < right_count {
                    (right_angles[i], 1.0)
                } else {
                    (left_angles[i - right_count], -1.0)
                };
                let rad = angle.to_radians();
                let center = (radius * rad.cos(), -radius * rad.sin());
                place_branch(tree, &branch.id, center, direction, &mut boxes, &heights, config);
            }
        }
    }

    let mut set = PlacedSet::default();
    for branch in &branches {
        set.connectors.push(straight(&topic, &boxes[&branch.id]));
    }
    for node in tree.nodes() {
        if let Some(parent_id) = node.parent.as_deref() {
            set.connectors.push(straight(&boxes[parent_id], &boxes[&node.id]));
        }
    }

    set.nodes.push(topic);
    let mut walk: Vec<&ContentNode> = branches.iter().rev().copied().collect();
    while let Some(node) = walk.pop() {
        set.nodes.push(boxes[&node.id].clone());
        for child in tree.children_of(Some(&node.id)).into_iter().rev() {
            walk.push(child);
        }
    }

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

/// Angles for one side, in degrees with 0 = east and 90 = up. The fan is
/// symmetric about `axis_deg` and listed in clockwise walk order (descending
/// relative angle), so an odd count lands its middle entry on the axis.
fn side_angles(count: usize, axis_deg: f32, config: &LayoutConfig) -> Vec<f32> {
    if count == 0 {
        return Vec::new();
    }
    let mut step = config.mindmap.fan_step_deg;
    if count > 1 {
        step = step.min(config.mindmap.max_fan_span_deg / (count - 1) as f32);
    }
    let half = (count - 1) as f32 / 2.0;
    (0..count)
        .map(|k| axis_deg + (half - k as f32) * step)
        .collect()
}

/// Radius large enough that adjacent branch anchors leave room for both
/// subtrees plus the clearance margin, and that no branch touches the topic.
fn fan_radius(
    branches: &[&ContentNode],
    right_angles: &[f32],
    left_angles: &[f32],
    heights: &BTreeMap<String, f32>,
    topic: &PlacedNode,
    max_branch_w: f32,
    config: &LayoutConfig,
) -> f32 {
    let max_subtree_h = branches
        .iter()
        .map(|b| heights[&b.id])
        .fold(0.0f32, f32::max);
    let mut radius = config
        .mindmap
        .min_radius
        .max(topic.width / 2.0 + max_branch_w / 2.0 + config.mindmap.radial_gap)
        .max(topic.height / 2.0 + max_subtree_h / 2.0 + config.mindmap.radial_gap);

    let right_count = right_angles.len();
    for (offset, angles) in [(0usize, right_angles), (right_count, left_angles)] {
        for (k, pair) in angles.windows(2).enumerate() {
            let h0 = heights[&branches[offset + k].id];
            let h1 = heights[&branches[offset + k + 1].id];
            let needed = (h0 + h1) / 2.0 + config.clearance;
            let separation = (pair[0].to_radians().sin() - pair[1].to_radians().sin()).abs();
            if separation > f32::EPSILON {
                radius = radius.max(needed / separation);
            }
        }
    }
    radius
}

fn subtree_height(
    tree: &ContentTree,
    id: &str,
    boxes: &BTreeMap<String, PlacedNode>,
    gap: f32,
    memo: &mut BTreeMap<String, f32>,
) -> f32 {
    if let Some(height) = memo.get(id) {
        return *height;
    }
    let own = boxes[id].height;
    let children = tree.children_of(Some(id));
    let height = if children.is_empty() {
        own
    } else {
        let mut total = gap * children.len().saturating_sub(1) as f32;
        for child in &children {
            total += subtree_height(tree, &child.id, boxes, gap, memo);
        }
        own.max(total)
    };
    memo.insert(id.to_string(), height);
    height
}

/// Place a branch at `center` and stack its subtree outward. `direction` is
/// +1 on the right side of the topic and -1 on the left.
fn place_branch(
    tree: &ContentTree,
    id: &str,
    center: (f32, f32),
    direction: f32,
    boxes: &mut BTreeMap<String, PlacedNode>,
    heights: &BTreeMap<String, f32>,
    config: &LayoutConfig,
) {
    let parent_width = {
        let node = boxes.get_mut(id).expect("measured box");
        node.set_center(center.0, center.1);
        node.width
    };
    let children = tree.children_of(Some(id));
    if children.is_empty() {
        return;
    }
    let total: f32 = children.iter().map(|c| heights[&c.id]).sum::<f32>()
        + config.mindmap.child_gap_y * children.len().saturating_sub(1) as f32;
    let mut cursor = center.1 - total / 2.0;
    for child in children {
        let child_height = heights[&child.id];
        let child_width = boxes[&child.id].width;
        let child_cx = center.0
            + direction * (parent_width / 2.0 + child_width / 2.0 + config.mindmap.child_gap_x);
        place_branch(
            tree,
            &child.id,
            (child_cx, cursor + child_height / 2.0),
            direction,
            boxes,
            heights,
            config,
        );
        cursor += child_height + config.mindmap.child_gap_y;
    }
}
