use super::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum RadialVariant {
    Bubble,
    Circle,
    Concept,
}

/// Place attribute nodes at equal angular increments around a central topic.
/// The ring radius is the largest of a content-driven minimum and two
/// angular-spacing minima (arc and chord), so adjacent boxes stay separated
/// by the clearance margin no matter how many attributes arrive.
pub(super) fn compute(
    tree: &ContentTree,
    variant: RadialVariant,
    config: &LayoutConfig,
    metrics: &dyn FontMetrics,
) -> Result<PlacedSet, LayoutError> {
    if tree.max_depth() > 1 {
        return Err(ValidationError::Structure(
            "radial layouts take a flat attribute list, found nested nodes".to_string(),
        )
        .into());
    }

    let (attr_shape, attr_role) = match variant {
        RadialVariant::Concept => (NodeShape::Rectangle, roles::CONCEPT),
        _ => (NodeShape::Ellipse, roles::ATTRIBUTE),
    };

    let mut set = PlacedSet::default();
    let topic_label = measure_label(tree.topic(), config.topic_font_size, metrics, config);
    let mut topic = make_node(TOPIC_ID, topic_label, NodeShape::Ellipse, roles::TOPIC, config);
    topic.set_center(0.0, 0.0);

    let attrs = tree.roots();
    let mut placed: Vec<PlacedNode> = Vec::with_capacity(attrs.len());
    for attr in &attrs {
        let label = measure_label(&attr.label, config.node_font_size, metrics, config);
        placed.push(make_node(&attr.id, label, attr_shape, attr_role, config));
    }

    let n = placed.len();
    if n > 0 {
        let max_w = placed.iter().map(|p| p.width).fold(0.0f32, f32::max);
        let max_h = placed.iter().map(|p| p.height).fold(0.0f32, f32::max);
        let radius = ring_radius(n, &topic, max_w, max_h, config);

        let start = config.radial.start_angle_deg.to_radians();
        let step = std::f32::consts::TAU / n as f32;
        for (i, node) in placed.iter_mut().enumerate() {
            let angle = start + step * i as f32;
            node.set_center(radius * angle.cos(), radius * angle.sin());
        }
    }

    match variant {
        RadialVariant::Bubble => {
            for node in &placed {
                set.connectors.push(straight(&topic, node));
            }
        }
        RadialVariant::Circle => {}
        RadialVariant::Concept => {
            for node in &placed {
                set.connectors.push(straight(&topic, node));
            }
        }
    }

    set.nodes.push(topic);
    set.nodes.extend(placed);

    if n > 0 {
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
    }

    repoint_straight_connectors(&mut set);

    // Concept maps draw one connector per extracted relation on top of the
    // topic spokes; endpoints resolve after any collision adjustment.
    if variant == RadialVariant::Concept {
        for relation in tree.relations() {
            let Some(from) = set.nodes.iter().find(|node| node.id == relation.from) else {
                continue;
            };
            let Some(to) = set.nodes.iter().find(|node| node.id == relation.to) else {
                continue;
            };
            set.connectors.push(straight(from, to));
        }
    }

    if variant == RadialVariant::Circle {
        let mut rx = 0.0f32;
        let mut ry = 0.0f32;
        for node in &set.nodes {
            rx = rx.max(node.x.abs()).max((node.x + node.width).abs());
            ry = ry.max(node.y.abs()).max((node.y + node.height).abs());
        }
        rx += config.radial.ring_padding;
        ry += config.radial.ring_padding;
        // The outer ring encloses everything; render order puts it first.
        set.nodes.insert(
            0,
            PlacedNode {
                id: "_boundary".to_string(),
                x: -rx,
                y: -ry,
                width: rx * 2.0,
                height: ry * 2.0,
                shape: NodeShape::Ellipse,
                label: TextBlock::default(),
                style_ref: roles::BOUNDARY.to_string(),
            },
        );
    }

    Ok(set)
}

fn ring_radius(n: usize, topic: &PlacedNode, max_w: f32, max_h: f32, config: &LayoutConfig) -> f32 {
    let content_min = topic.width / 2.0 + max_w / 2.0 + config.radial.radial_gap;
    let content_min_v = topic.height / 2.0 + max_h / 2.0 + config.radial.radial_gap;
    let mut radius = config
        .radial
        .min_radius
        .max(content_min)
        .max(content_min_v);
    if n >= 2 {
        let needed = max_w + config.clearance;
        let step = std::f32::consts::TAU / n as f32;
        let arc_min = needed * n as f32 / std::f32::consts::TAU;
        let chord_min = needed / (2.0 * (step / 2.0).sin());
        radius = radius.max(arc_min).max(chord_min);
    }
    radius
}
