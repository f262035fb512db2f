//! Rendering constants for the traverse canvas.
//! Pixel values are canvas backing-store pixels.

pub const BACKGROUND_COLOR: &str = "#0f172a";
pub const GRID_COLOR: &str = "rgba(255,255,255,0.05)";
pub const AXIS_COLOR: &str = "rgba(255,255,255,0.12)";
pub const EDGE_COLOR: &str = "#22c55e";
pub const EDGE_WIDTH_PX: f64 = 2.0;
pub const POLYGON_FILL: &str = "rgba(34,197,94,0.07)";
pub const OPEN_HINT_COLOR: &str = "rgba(251,191,36,0.40)";
pub const VERTEX_FILL: &str = "#22c55e";
pub const VERTEX_HIGHLIGHT: &str = "#f0fdf4";
pub const VERTEX_STROKE: &str = "#15803d";
pub const LABEL_TEXT: &str = "#86efac";
pub const LABEL_FAINT: &str = "rgba(134,239,172,0.55)";
pub const LABEL_BACKDROP: &str = "rgba(0,0,0,0.65)";
pub const AREA_BACKDROP: &str = "rgba(0,0,0,0.70)";

/// Edges shorter than this on screen skip their distance label.
pub const MIN_LABELED_EDGE_PX: f64 = 36.0;

pub const COMPASS_MARGIN_PX: f64 = 36.0;
pub const COMPASS_RADIUS_PX: f64 = 16.0;
