#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod error;
pub mod ir;
pub mod layout;
pub mod metrics;
pub mod theme;
pub mod wire;

pub use config::{LayoutConfig, load_config};
pub use error::{LayoutError, ValidationError};
pub use ir::{ContentNode, ContentTree, DiagramCategory, Relation, RelationKind, TOPIC_ID};
pub use layout::{
    CanvasBounds, ConnectorKind, LayoutWarning, NodeShape, PlacedConnector, PlacedNode,
    PlacementResult, compute_layout,
};
pub use metrics::{CharTableMetrics, FontMetrics, SystemFontMetrics, TextSize};
pub use theme::StyleTokens;
pub use wire::{DiagramRequest, GeometryDoc, layout_request, write_geometry};

#[cfg(feature = "cli")]
pub use cli::run;
