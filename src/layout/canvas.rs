use crate::config::LayoutConfig;

use super::types::{CanvasBounds, PlacedConnector, PlacedNode, Rect};

/// Fit the canvas around everything placed: translate geometry into a
/// non-negative, padded coordinate space and return the enclosing bounds.
/// The canvas never shrinks below the content (nothing is ever clipped);
/// when the configured minimum exceeds the content, the content is centered
/// inside the larger canvas.
pub(super) fn fit(
    nodes: &mut [PlacedNode],
    connectors: &mut [PlacedConnector],
    config: &LayoutConfig,
) -> CanvasBounds {
    let pad = config.canvas_padding.max(0.0);

    let mut bounds: Option<Rect> = None;
    for node in nodes.iter() {
        let rect = node.rect();
        bounds = Some(match bounds {
            Some(acc) => acc.union(rect),
            None => rect,
        });
    }
    for connector in connectors.iter() {
        for (x, y) in &connector.points {
            let point = Rect {
                x: *x,
                y: *y,
                width: 0.0,
                height: 0.0,
            };
            bounds = Some(match bounds {
                Some(acc) => acc.union(point),
                None => point,
            });
        }
    }

    let Some(content) = bounds else {
        return CanvasBounds {
            width: config.canvas_min_width.max(pad * 2.0),
            height: config.canvas_min_height.max(pad * 2.0),
            padding: pad,
        };
    };

    let width = (content.width + pad * 2.0).max(config.canvas_min_width);
    let height = (content.height + pad * 2.0).max(config.canvas_min_height);

    // Slack is zero unless the minimum clamp engaged.
    let slack_x = (width - content.width - pad * 2.0) / 2.0;
    let slack_y = (height - content.height - pad * 2.0) / 2.0;
    let dx = pad + slack_x - content.x;
    let dy = pad + slack_y - content.y;

    for node in nodes.iter_mut() {
        node.x += dx;
        node.y += dy;
    }
    for connector in connectors.iter_mut() {
        for point in &mut connector.points {
            point.0 += dx;
            point.1 += dy;
        }
    }

    CanvasBounds {
        width,
        height,
        padding: pad,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::types::{NodeShape, TextBlock};

    fn boxed(x: f32, y: f32, width: f32, height: f32) -> PlacedNode {
        PlacedNode {
            id: "n".to_string(),
            x,
            y,
            width,
            height,
            shape: NodeShape::Rectangle,
            label: TextBlock::default(),
            style_ref: "attribute".to_string(),
        }
    }

    fn tight_config() -> LayoutConfig {
        LayoutConfig {
            canvas_min_width: 0.0,
            canvas_min_height: 0.0,
            canvas_padding: 10.0,
            ..LayoutConfig::default()
        }
    }

    #[test]
    fn canvas_is_tight_when_minimums_do_not_clamp() {
        let config = tight_config();
        let mut nodes = vec![boxed(-50.0, -20.0, 40.0, 30.0), boxed(60.0, 35.0, 40.0, 30.0)];
        let mut connectors = vec![];
        let canvas = fit(&mut nodes, &mut connectors, &config);
        // Content spans 150 x 85; padding adds 10 per side.
        assert_eq!(canvas.width, 170.0);
        assert_eq!(canvas.height, 105.0);
        assert_eq!(nodes[0].x, 10.0);
        assert_eq!(nodes[0].y, 10.0);
    }

    #[test]
    fn clamped_canvas_centers_content() {
        let config = LayoutConfig {
            canvas_min_width: 400.0,
            canvas_min_height: 300.0,
            canvas_padding: 20.0,
            ..LayoutConfig::default()
        };
        let mut nodes = vec![boxed(0.0, 0.0, 100.0, 50.0)];
        let mut connectors = vec![];
        let canvas = fit(&mut nodes, &mut connectors, &config);
        assert_eq!(canvas.width, 400.0);
        assert_eq!(canvas.height, 300.0);
        let (cx, cy) = nodes[0].center();
        assert_eq!(cx, 200.0);
        assert_eq!(cy, 150.0);
    }

    #[test]
    fn connector_waypoints_extend_the_bounds() {
        let config = tight_config();
        let mut nodes = vec![boxed(0.0, 0.0, 40.0, 20.0)];
        let mut connectors = vec![PlacedConnector {
            from: "n".to_string(),
            to: "n".to_string(),
            points: vec![(80.0, 60.0)],
            kind: crate::layout::types::ConnectorKind::Straight,
        }];
        let canvas = fit(&mut nodes, &mut connectors, &config);
        assert_eq!(canvas.width, 100.0);
        assert_eq!(canvas.height, 80.0);
        assert_eq!(connectors[0].points[0], (90.0, 70.0));
    }

    #[test]
    fn empty_placement_yields_minimum_canvas() {
        let config = LayoutConfig::default();
        let canvas = fit(&mut [], &mut [], &config);
        assert_eq!(canvas.width, config.canvas_min_width);
        assert_eq!(canvas.height, config.canvas_min_height);
    }

    #[test]
    fn geometry_ends_up_non_negative() {
        let config = tight_config();
        let mut nodes = vec![boxed(-300.0, -400.0, 50.0, 50.0)];
        let mut connectors = vec![];
        fit(&mut nodes, &mut connectors, &config);
        assert!(nodes[0].x >= 0.0);
        assert!(nodes[0].y >= 0.0);
    }
}
