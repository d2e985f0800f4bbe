use std::path::Path;

use serde::{Deserialize, Serialize};

/// Layout tuning knobs. Every spacing constant a diagram family needs lives
/// here rather than inside an algorithm, so callers can retune density
/// without touching layout code. Values are pixels unless noted.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub canvas_min_width: f32,
    pub canvas_min_height: f32,
    pub canvas_padding: f32,
    /// Minimum clear gap required between any two placed boxes.
    pub clearance: f32,
    pub node_padding_x: f32,
    pub node_padding_y: f32,
    pub topic_font_size: f32,
    pub node_font_size: f32,
    pub sub_font_size: f32,
    pub max_label_width_chars: usize,
    /// Extra box scale for elliptical nodes so the label stays inside the arc.
    pub ellipse_text_scale: f32,
    pub collision_max_iterations: u32,
    pub stack: StackConfig,
    pub radial: RadialConfig,
    pub double_bubble: DoubleBubbleConfig,
    pub flow: FlowConfig,
    pub multi_flow: MultiFlowConfig,
    pub mindmap: MindmapConfig,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            canvas_min_width: 320.0,
            canvas_min_height: 240.0,
            canvas_padding: 40.0,
            clearance: 12.0,
            node_padding_x: 14.0,
            node_padding_y: 8.0,
            topic_font_size: 22.0,
            node_font_size: 16.0,
            sub_font_size: 13.0,
            max_label_width_chars: 28,
            ellipse_text_scale: 1.2,
            collision_max_iterations: 64,
            stack: StackConfig::default(),
            radial: RadialConfig::default(),
            double_bubble: DoubleBubbleConfig::default(),
            flow: FlowConfig::default(),
            multi_flow: MultiFlowConfig::default(),
            mindmap: MindmapConfig::default(),
        }
    }
}

/// Hierarchical-stack family (brace and tree maps).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StackConfig {
    /// Horizontal gap added between consecutive depth columns.
    pub indent: f32,
    pub sibling_gap: f32,
    /// Vertical gap between top-level part groups.
    pub group_gap: f32,
    pub brace_width: f32,
    pub brace_gap: f32,
}

impl Default for StackConfig {
    fn default() -> Self {
        Self {
            indent: 56.0,
            sibling_gap: 14.0,
            group_gap: 30.0,
            brace_width: 16.0,
            brace_gap: 8.0,
        }
    }
}

/// Radial family (bubble, circle, and concept maps).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RadialConfig {
    /// Minimum clear distance between the topic box and the attribute ring.
    pub radial_gap: f32,
    pub min_radius: f32,
    /// Ring start angle; -90 puts the first attribute at twelve o'clock.
    pub start_angle_deg: f32,
    /// Clearance between the outermost box corner and the circle-map boundary.
    pub ring_padding: f32,
}

impl Default for RadialConfig {
    fn default() -> Self {
        Self {
            radial_gap: 48.0,
            min_radius: 90.0,
            start_angle_deg: -90.0,
            ring_padding: 36.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DoubleBubbleConfig {
    /// Gap between the shared lane and each focus column.
    pub column_gap: f32,
    pub lane_item_gap: f32,
    /// Total angular span of each outward difference fan, in degrees.
    pub fan_span_deg: f32,
    pub radial_gap: f32,
    pub min_radius: f32,
}

impl Default for DoubleBubbleConfig {
    fn default() -> Self {
        Self {
            column_gap: 56.0,
            lane_item_gap: 18.0,
            fan_span_deg: 140.0,
            radial_gap: 48.0,
            min_radius: 90.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FlowConfig {
    pub step_gap: f32,
    pub substep_gap: f32,
    /// Lateral offset from the step column to the substep column.
    pub substep_offset_x: f32,
    /// Horizontal run of an elbow connector before it turns.
    pub elbow_stub: f32,
}

impl Default for FlowConfig {
    fn default() -> Self {
        Self {
            step_gap: 36.0,
            substep_gap: 16.0,
            substep_offset_x: 64.0,
            elbow_stub: 18.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MultiFlowConfig {
    /// Vertical gap between the event box and each side group.
    pub section_gap: f32,
    pub item_gap: f32,
}

impl Default for MultiFlowConfig {
    fn default() -> Self {
        Self {
            section_gap: 64.0,
            item_gap: 24.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MindmapConfig {
    pub radial_gap: f32,
    pub min_radius: f32,
    /// Angular step between adjacent branches on one side, in degrees.
    pub fan_step_deg: f32,
    /// Upper bound on one side's total fan span, in degrees.
    pub max_fan_span_deg: f32,
    pub child_gap_x: f32,
    pub child_gap_y: f32,
}

impl Default for MindmapConfig {
    fn default() -> Self {
        Self {
            radial_gap: 64.0,
            min_radius: 110.0,
            fan_step_deg: 40.0,
            max_fan_span_deg: 150.0,
            child_gap_x: 36.0,
            child_gap_y: 16.0,
        }
    }
}

/// Load a JSON5 config file, or defaults when no path is given.
pub fn load_config(path: Option<&Path>) -> anyhow::Result<LayoutConfig> {
    let Some(path) = path else {
        return Ok(LayoutConfig::default());
    };
    let raw = std::fs::read_to_string(path)
        .map_err(|err| anyhow::anyhow!("failed to read config {}: {err}", path.display()))?;
    let config: LayoutConfig = json5::from_str(&raw)
        .map_err(|err| anyhow::anyhow!("failed to parse config {}: {err}", path.display()))?;
    Ok(config)
}
