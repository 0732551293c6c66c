//! Input model: drawing modes and the gesture state machine states.
//!
//! `DrawingMode` is the user's intent, owned by the host and passed in on
//! every pointer-down. `InputState` is the gesture tracked between pointer-down
//! and pointer-up, carrying everything needed to emit intents on move and on
//! release. Every active gesture captures the [`CoordinateMapper`] that was in
//! force when it started, so a container resize mid-gesture cannot skew the
//! stored coordinates it produces.

#[cfg(test)]
#[path = "input_test.rs"]
mod input_test;

use crate::doc::{ShapeId, ShapeKind};
use crate::mapper::{CoordinateMapper, Point, Size};

/// What a pointer gesture on the surface produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DrawingMode {
    /// Select and drag existing shapes (default).
    #[default]
    None,
    /// Draw the scale reference line.
    Calibration,
    /// Draw a rectangle.
    Rectangle,
    /// Draw an oval.
    Oval,
}

impl DrawingMode {
    /// Whether pointer-down starts a drawing gesture rather than a selection.
    #[must_use]
    pub fn is_drawing(self) -> bool {
        !matches!(self, Self::None)
    }

    /// The shape kind this mode creates, if it creates one.
    #[must_use]
    pub fn shape_kind(self) -> Option<ShapeKind> {
        match self {
            Self::Rectangle => Some(ShapeKind::Rectangle),
            Self::Oval => Some(ShapeKind::Oval),
            Self::None | Self::Calibration => None,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Calibration => "calibration",
            Self::Rectangle => "rectangle",
            Self::Oval => "oval",
        }
    }
}

/// Internal state for the input state machine.
#[derive(Debug, Clone, Default)]
pub enum InputState {
    /// No gesture in progress; waiting for the next pointer-down.
    #[default]
    Idle,
    /// The user is moving an existing shape.
    Dragging {
        /// Id of the shape being dragged.
        id: ShapeId,
        /// Pointer position minus the shape's display position at pointer-down.
        offset: Point,
        mapper: CoordinateMapper,
    },
    /// The user is drawing the calibration reference line.
    DrawingCalibration {
        /// Display-space point where the drag started.
        anchor: Point,
        /// Display-space point of the latest pointer event.
        current: Point,
        mapper: CoordinateMapper,
    },
    /// The user is drawing a new shape by dragging from an anchor corner.
    DrawingShape {
        kind: ShapeKind,
        /// Display-space corner where the drag started.
        anchor: Point,
        /// Display-space point of the latest pointer event.
        current: Point,
        mapper: CoordinateMapper,
    },
}

impl InputState {
    #[must_use]
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }
}

/// In-progress drawing for the render pass, in display space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Preview {
    CalibrationLine { start: Point, end: Point },
    Shape { kind: ShapeKind, origin: Point, size: Size },
}

/// Axis-aligned bounding box spanned by two display-space corners.
#[must_use]
pub fn drag_rect(anchor: Point, current: Point) -> (Point, Size) {
    let origin = Point::new(anchor.x.min(current.x), anchor.y.min(current.y));
    let size = Size::new((current.x - anchor.x).abs(), (current.y - anchor.y).abs());
    (origin, size)
}
