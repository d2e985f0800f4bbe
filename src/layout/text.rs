use crate::config::LayoutConfig;
use crate::metrics::FontMetrics;

use super::types::{NodeShape, TextBlock};

// Wrap-width heuristic: average glyph is ~0.56em in the calibrated table.
const AVG_CHAR_EM: f32 = 0.56;

pub(super) fn measure_label(
    text: &str,
    font_size: f32,
    metrics: &dyn FontMetrics,
    config: &LayoutConfig,
) -> TextBlock {
    let max_width_px = config.max_label_width_chars.max(1) as f32 * font_size * AVG_CHAR_EM;
    let mut lines = Vec::new();
    for raw in split_lines(text) {
        wrap_line(&raw, max_width_px, font_size, metrics, &mut lines);
    }
    if lines.is_empty() {
        lines.push(String::new());
    }

    let mut width = 0.0f32;
    let mut line_height = 0.0f32;
    for line in &lines {
        let size = metrics.measure(line, font_size);
        width = width.max(size.width);
        line_height = line_height.max(size.height);
    }
    if line_height <= 0.0 {
        line_height = font_size * 1.25;
    }
    let height = lines.len() as f32 * line_height;

    TextBlock {
        lines,
        width,
        height,
    }
}

/// Box dimensions for a label in the given shape. Width adapts to the
/// measured text; nothing here is a fixed node size.
pub(super) fn node_box(label: &TextBlock, shape: NodeShape, config: &LayoutConfig) -> (f32, f32) {
    match shape {
        NodeShape::Ellipse => (
            label.width * config.ellipse_text_scale + config.node_padding_x * 2.0,
            label.height * config.ellipse_text_scale + config.node_padding_y * 2.0,
        ),
        _ => (
            label.width + config.node_padding_x * 2.0,
            label.height + config.node_padding_y * 2.0,
        ),
    }
}

pub(super) fn split_lines(text: &str) -> Vec<String> {
    let normalized = text.replace("\\n", "\n");
    normalized
        .split('\n')
        .map(|line| line.trim().to_string())
        .collect()
}

fn wrap_line(
    line: &str,
    max_width: f32,
    font_size: f32,
    metrics: &dyn FontMetrics,
    out: &mut Vec<String>,
) {
    if metrics.measure(line, font_size).width <= max_width {
        out.push(line.to_string());
        return;
    }

    let mut current = String::new();
    for word in line.split_whitespace() {
        let candidate = if current.is_empty() {
            word.to_string()
        } else {
            format!("{current} {word}")
        };
        if metrics.measure(&candidate, font_size).width > max_width && !current.is_empty() {
            out.push(std::mem::take(&mut current));
            current.push_str(word);
        } else {
            current = candidate;
        }
    }
    if !current.is_empty() {
        out.push(current);
    }
}
