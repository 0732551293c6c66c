//! Rendering: turns a floor plan and the current gesture into draw commands.
//!
//! This module does not paint. It produces an ordered, backend-neutral list of
//! [`DrawCommand`]s in display space that a 2D backend replays verbatim. It
//! reads document state through a [`CoordinateMapper`] and never mutates it.
//!
//! Layer order: image, calibration line, shapes in z-order, then the dashed
//! preview of whatever is being drawn.

#[cfg(test)]
#[path = "render_test.rs"]
mod render_test;

use serde::Serialize;

use crate::consts::{
    CALIBRATION_STROKE, PREVIEW_DASH, PREVIEW_STROKE, SELECTED_FILL, SELECTED_STROKE, SELECTED_STROKE_WIDTH,
    SHAPE_STROKE, STROKE_WIDTH,
};
use crate::doc::{FloorPlan, Shape, ShapeId, ShapeKind};
use crate::input::Preview;
use crate::mapper::{CoordinateMapper, Point, Size};

/// Stroke parameters for an outline.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Stroke {
    pub color: &'static str,
    pub width: f64,
    /// Dash pattern; empty for a solid line.
    pub dash: Vec<f64>,
}

impl Stroke {
    fn solid(color: &'static str, width: f64) -> Self {
        Self { color, width, dash: Vec::new() }
    }

    fn dashed(color: &'static str, width: f64) -> Self {
        Self { color, width, dash: PREVIEW_DASH.to_vec() }
    }
}

/// One primitive for a 2D backend, in display space.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum DrawCommand {
    /// Blit the plan image stretched to the surface.
    Image { url: String, size: Size },
    Line { start: Point, end: Point, stroke: Stroke },
    Rect { origin: Point, size: Size, stroke: Stroke, fill: Option<&'static str> },
    /// Axis-aligned ellipse inscribed in the box at `origin`/`size`.
    Ellipse { origin: Point, size: Size, stroke: Stroke, fill: Option<&'static str> },
}

/// Build the full scene for `plan`.
#[must_use]
pub fn draw(
    plan: &FloorPlan,
    mapper: &CoordinateMapper,
    selected: Option<ShapeId>,
    preview: Option<Preview>,
) -> Vec<DrawCommand> {
    let mut out = Vec::with_capacity(plan.shapes.len() + 3);

    // Layer 1: image.
    if plan.has_image() {
        out.push(DrawCommand::Image { url: plan.image_url().to_string(), size: mapper.display_size() });
    }

    // Layer 2: calibration line.
    if let Some(line) = plan.calibration_line() {
        out.push(DrawCommand::Line {
            start: mapper.to_display(line.start),
            end: mapper.to_display(line.end),
            stroke: Stroke::solid(CALIBRATION_STROKE, STROKE_WIDTH),
        });
    }

    // Layer 3: shapes, bottom first.
    for shape in &plan.shapes {
        out.push(draw_shape(shape, mapper, selected == Some(shape.id)));
    }

    // Layer 4: in-progress preview.
    if let Some(preview) = preview {
        out.push(draw_preview(preview));
    }

    out
}

fn draw_shape(shape: &Shape, mapper: &CoordinateMapper, is_selected: bool) -> DrawCommand {
    let origin = mapper.to_display(shape.position);
    let size = mapper.size_to_display(shape.size());
    let (stroke, fill) = if is_selected {
        (Stroke::solid(SELECTED_STROKE, SELECTED_STROKE_WIDTH), Some(SELECTED_FILL))
    } else {
        (Stroke::solid(SHAPE_STROKE, STROKE_WIDTH), None)
    };
    shape_command(shape.kind, origin, size, stroke, fill)
}

fn draw_preview(preview: Preview) -> DrawCommand {
    let stroke = Stroke::dashed(PREVIEW_STROKE, STROKE_WIDTH);
    match preview {
        Preview::CalibrationLine { start, end } => DrawCommand::Line { start, end, stroke },
        Preview::Shape { kind, origin, size } => shape_command(kind, origin, size, stroke, None),
    }
}

fn shape_command(kind: ShapeKind, origin: Point, size: Size, stroke: Stroke, fill: Option<&'static str>) -> DrawCommand {
    match kind {
        ShapeKind::Rectangle => DrawCommand::Rect { origin, size, stroke, fill },
        ShapeKind::Oval => DrawCommand::Ellipse { origin, size, stroke, fill },
    }
}
