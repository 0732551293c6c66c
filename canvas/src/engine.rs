//! Pointer-driven interaction engine.
//!
//! `EngineCore` turns pointer events on the display surface into [`Action`]s.
//! It never owns floor-plan data: each pointer-down borrows the active plan to
//! hit-test and to build a coordinate mapper, and everything the host must do
//! (select, move, add, calibrate) comes back as an intent. The only state kept
//! between calls is the in-progress gesture, the display size, and a mirror of
//! the current selection.

use tracing::debug;

use crate::consts::MIN_SHAPE_SIZE_PX;
use crate::doc::{FloorPlan, ShapeId, ShapeKind};
use crate::hit::hit_test;
use crate::input::{DrawingMode, InputState, Preview, drag_rect};
use crate::mapper::{CoordinateMapper, Point, Size};

#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;

/// Intents returned from input handlers for the host to apply.
///
/// Positions and sizes are in stored space.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// The selected shape changed (or was cleared).
    SelectionChanged(Option<ShapeId>),
    /// Move a shape's top-left corner.
    MoveShape { id: ShapeId, position: Point },
    /// Create a shape; the host assigns id, name and inch size.
    AddShape { kind: ShapeKind, position: Point, size: Size },
    /// A calibration line was drawn; the host asks for its real length next.
    CalibrationDrawn { start: Point, end: Point },
    /// The preview changed and the surface should be repainted.
    RenderNeeded,
}

/// Gesture state plus the display size it maps against.
#[derive(Debug, Clone, Default)]
pub struct EngineCore {
    pub input: InputState,
    /// Current display surface size, in display pixels.
    pub display: Size,
    selected_id: Option<ShapeId>,
}

impl EngineCore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // --- Viewport ---

    /// Update the display surface size. A gesture already in progress keeps
    /// the mapper it started with.
    pub fn set_display_size(&mut self, display: Size) {
        self.display = display;
    }

    /// Mapper between `plan`'s stored space and the current display surface.
    #[must_use]
    pub fn mapper_for(&self, plan: &FloorPlan) -> CoordinateMapper {
        plan.mapper(self.display)
    }

    // --- Selection ---

    /// The currently selected shape, if any.
    #[must_use]
    pub fn selection(&self) -> Option<ShapeId> {
        self.selected_id
    }

    /// Set the selection from outside a gesture (a list click, a new shape).
    pub fn select(&mut self, id: Option<ShapeId>) {
        self.selected_id = id;
    }

    /// Drop any gesture in progress and clear the selection, e.g. when the
    /// active plan changes underneath the engine.
    pub fn reset(&mut self) {
        self.input = InputState::Idle;
        self.selected_id = None;
    }

    // --- Input events ---

    /// Start a gesture. `mode` decides whether this selects/drags or draws.
    pub fn on_pointer_down(&mut self, plan: &FloorPlan, pt: Point, mode: DrawingMode) -> Vec<Action> {
        let mapper = self.mapper_for(plan);

        if !mode.is_drawing() {
            return match hit_test(pt, &plan.shapes, &mapper) {
                Some(shape) => {
                    let offset = pt - mapper.to_display(shape.position);
                    debug!(shape_id = %shape.id, "drag started");
                    self.selected_id = Some(shape.id);
                    self.input = InputState::Dragging { id: shape.id, offset, mapper };
                    vec![Action::SelectionChanged(Some(shape.id)), Action::RenderNeeded]
                }
                None => {
                    self.selected_id = None;
                    vec![Action::SelectionChanged(None), Action::RenderNeeded]
                }
            };
        }

        if !mapper.is_ready() {
            debug!(mode = mode.as_str(), "image size unknown; ignoring draw");
            return Vec::new();
        }

        self.input = match mode.shape_kind() {
            Some(kind) => InputState::DrawingShape { kind, anchor: pt, current: pt, mapper },
            None => InputState::DrawingCalibration { anchor: pt, current: pt, mapper },
        };
        debug!(mode = mode.as_str(), x = pt.x, y = pt.y, "draw started");
        Vec::new()
    }

    /// Continue a gesture. Drags stream a move intent per event; draws only
    /// track the pointer for the preview.
    pub fn on_pointer_move(&mut self, pt: Point) -> Vec<Action> {
        match &mut self.input {
            InputState::Idle => Vec::new(),
            InputState::Dragging { id, offset, mapper } => {
                let position = mapper.to_stored(pt - *offset);
                vec![Action::MoveShape { id: *id, position }, Action::RenderNeeded]
            }
            InputState::DrawingCalibration { current, .. } | InputState::DrawingShape { current, .. } => {
                *current = pt;
                vec![Action::RenderNeeded]
            }
        }
    }

    /// Finish the gesture using the last tracked pointer position.
    pub fn on_pointer_up(&mut self) -> Vec<Action> {
        let finished = std::mem::take(&mut self.input);
        match finished {
            InputState::Idle => Vec::new(),
            InputState::Dragging { id, .. } => {
                debug!(shape_id = %id, "drag finished");
                Vec::new()
            }
            InputState::DrawingCalibration { anchor, current, mapper } => {
                let start = mapper.to_stored(anchor);
                let end = mapper.to_stored(current);
                debug!(?start, ?end, "calibration line drawn");
                vec![Action::CalibrationDrawn { start, end }, Action::RenderNeeded]
            }
            InputState::DrawingShape { kind, anchor, current, mapper } => {
                let (origin, size) = drag_rect(anchor, current);
                if size.width <= MIN_SHAPE_SIZE_PX || size.height <= MIN_SHAPE_SIZE_PX {
                    debug!(width = size.width, height = size.height, "shape below minimum size; discarded");
                    return vec![Action::RenderNeeded];
                }
                let position = mapper.to_stored(origin);
                let size = mapper.size_to_stored(size);
                debug!(kind = kind.as_str(), "shape drawn");
                vec![Action::AddShape { kind, position, size }, Action::RenderNeeded]
            }
        }
    }

    /// The pointer left the surface; finalized exactly like pointer-up.
    pub fn on_pointer_leave(&mut self) -> Vec<Action> {
        self.on_pointer_up()
    }

    // --- Queries ---

    /// The in-progress drawing, for the render pass.
    #[must_use]
    pub fn preview(&self) -> Option<Preview> {
        match self.input {
            InputState::DrawingCalibration { anchor, current, .. } => {
                Some(Preview::CalibrationLine { start: anchor, end: current })
            }
            InputState::DrawingShape { kind, anchor, current, .. } => {
                let (origin, size) = drag_rect(anchor, current);
                Some(Preview::Shape { kind, origin, size })
            }
            InputState::Idle | InputState::Dragging { .. } => None,
        }
    }
}
