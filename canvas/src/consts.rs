//! Shared numeric constants for the canvas crate.

// ── Drawing ─────────────────────────────────────────────────────

/// Minimum width and height, in display pixels, for a drawn shape to be kept.
///
/// Both dimensions must strictly exceed this value; smaller drags are treated
/// as accidental clicks.
pub const MIN_SHAPE_SIZE_PX: f64 = 5.0;

// ── Layout ──────────────────────────────────────────────────────

/// Container width assumed when the host cannot measure one.
pub const DEFAULT_CONTAINER_WIDTH: f64 = 800.0;

/// Container height assumed when the host cannot measure one.
pub const DEFAULT_CONTAINER_HEIGHT: f64 = 600.0;

// ── Units ───────────────────────────────────────────────────────

pub const INCHES_PER_FOOT: f64 = 12.0;

// ── Render ──────────────────────────────────────────────────────

pub const CALIBRATION_STROKE: &str = "red";
pub const SHAPE_STROKE: &str = "black";
pub const SELECTED_STROKE: &str = "blue";
pub const SELECTED_FILL: &str = "rgba(0, 0, 255, 0.1)";
pub const PREVIEW_STROKE: &str = "green";

/// Stroke width for unselected shapes and the calibration line.
pub const STROKE_WIDTH: f64 = 2.0;

/// Stroke width for the selected shape.
pub const SELECTED_STROKE_WIDTH: f64 = 3.0;

/// Dash pattern (on, off) for in-progress previews, in display pixels.
pub const PREVIEW_DASH: [f64; 2] = [5.0, 5.0];
