//! Session — the controller between pointer input and the workspace tree.
//!
//! ARCHITECTURE
//! ============
//! A `Session` owns the `AppState`, the storage it was loaded from, an
//! [`EngineCore`], the current [`DrawingMode`], and the endpoints of a drawn
//! calibration line that is still waiting for its real length. Pointer events
//! go to the engine together with the active plan; the intents that come back
//! are applied through the service functions, and the tree is saved after
//! every mutation.
//!
//! The engine's selection mirror is the session's selection. Anything that
//! changes which plan is active (select, create, delete, duplicate) drops the
//! gesture, the selection, the pending calibration, and the drawing mode.

use canvas::doc::{AppState, FloorPlan, FloorPlanId, ShapeId, ShapeKind};
use canvas::engine::{Action, EngineCore};
use canvas::input::DrawingMode;
use canvas::mapper::{Point, Size};
use canvas::render::{DrawCommand, draw};
use tracing::{debug, info};

use crate::ErrorCode;
use crate::services::calibration::{self, CalibrationError};
use crate::services::floor_plan::{self, FloorPlanError};
use crate::services::persistence::{self, PersistenceError};
use crate::services::shape::{self, ShapeError};
use crate::storage::Storage;

// =============================================================================
// TYPES
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("no active floor plan")]
    NoActivePlan,
    #[error("image dimensions are not known yet")]
    DimensionsUnknown,
    #[error("floor plan is not calibrated")]
    NotCalibrated,
    #[error("no calibration line is waiting for a length")]
    NoPendingCalibration,
    #[error(transparent)]
    FloorPlan(#[from] FloorPlanError),
    #[error(transparent)]
    Shape(#[from] ShapeError),
    #[error(transparent)]
    Calibration(#[from] CalibrationError),
    #[error(transparent)]
    Persistence(#[from] PersistenceError),
}

impl ErrorCode for SessionError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::NoActivePlan => "E_NO_ACTIVE_PLAN",
            Self::DimensionsUnknown => "E_DIMENSIONS_UNKNOWN",
            Self::NotCalibrated => "E_NOT_CALIBRATED",
            Self::NoPendingCalibration => "E_NO_PENDING_CALIBRATION",
            Self::FloorPlan(e) => e.error_code(),
            Self::Shape(e) => e.error_code(),
            Self::Calibration(e) => e.error_code(),
            Self::Persistence(e) => e.error_code(),
        }
    }
}

/// Endpoints of a drawn calibration line, stored space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PendingCalibration {
    pub start: Point,
    pub end: Point,
}

pub struct Session<S: Storage> {
    state: AppState,
    storage: S,
    key: String,
    engine: EngineCore,
    mode: DrawingMode,
    pending_calibration: Option<PendingCalibration>,
    container: Size,
}

impl<S: Storage> Session<S> {
    /// Load the workspace under `key` and start with no gesture, selection or mode.
    ///
    /// # Errors
    ///
    /// Returns `Persistence` if the stored state cannot be read or parsed.
    pub fn open(storage: S, key: impl Into<String>, container: Size) -> Result<Self, SessionError> {
        let key = key.into();
        let state = persistence::load_state(&storage, &key)?;
        let mut session = Self {
            state,
            storage,
            key,
            engine: EngineCore::new(),
            mode: DrawingMode::None,
            pending_calibration: None,
            container,
        };
        session.sync_display();
        Ok(session)
    }

    // --- Accessors ---

    #[must_use]
    pub fn state(&self) -> &AppState {
        &self.state
    }

    #[must_use]
    pub fn storage(&self) -> &S {
        &self.storage
    }

    #[must_use]
    pub fn active_plan(&self) -> Option<&FloorPlan> {
        self.state.active_floor_plan()
    }

    #[must_use]
    pub fn mode(&self) -> DrawingMode {
        self.mode
    }

    #[must_use]
    pub fn selection(&self) -> Option<ShapeId> {
        self.engine.selection()
    }

    #[must_use]
    pub fn pending_calibration(&self) -> Option<PendingCalibration> {
        self.pending_calibration
    }

    /// Rendered surface size for the active plan in the current container.
    #[must_use]
    pub fn display_size(&self) -> Size {
        match self.state.active_floor_plan() {
            Some(plan) => plan.display_size(self.container),
            None => self.container,
        }
    }

    /// Change the container the image is fitted into.
    pub fn set_container(&mut self, container: Size) {
        self.container = container;
        self.sync_display();
    }

    fn sync_display(&mut self) {
        let display = self.display_size();
        self.engine.set_display_size(display);
    }

    fn active_id(&self) -> Result<FloorPlanId, SessionError> {
        self.state.active_floor_plan().map(|fp| fp.id).ok_or(SessionError::NoActivePlan)
    }

    fn save(&mut self) -> Result<(), SessionError> {
        persistence::save_state(&mut self.storage, &self.key, &self.state)?;
        Ok(())
    }

    /// Forget everything tied to the previously active plan.
    fn reset_for_plan_change(&mut self) {
        self.engine.reset();
        self.mode = DrawingMode::None;
        self.pending_calibration = None;
        self.sync_display();
    }

    // =========================================================================
    // DRAWING MODE
    // =========================================================================

    /// Switch the drawing mode. Calibration needs the image's native size;
    /// shape modes additionally need a scale.
    ///
    /// # Errors
    ///
    /// Returns `NoActivePlan`, `DimensionsUnknown` or `NotCalibrated`; the
    /// mode is unchanged on error.
    pub fn set_drawing_mode(&mut self, mode: DrawingMode) -> Result<(), SessionError> {
        if mode.is_drawing() {
            let plan = self.state.active_floor_plan().ok_or(SessionError::NoActivePlan)?;
            if plan.image_dimensions().is_none() {
                return Err(SessionError::DimensionsUnknown);
            }
            if mode.shape_kind().is_some() && !plan.is_calibrated() {
                return Err(SessionError::NotCalibrated);
            }
        }
        info!(mode = mode.as_str(), "drawing mode changed");
        self.mode = mode;
        Ok(())
    }

    // =========================================================================
    // FLOOR PLANS
    // =========================================================================

    /// # Errors
    ///
    /// Returns `Persistence` if the save fails.
    pub fn create_floor_plan(&mut self) -> Result<FloorPlanId, SessionError> {
        let id = floor_plan::create_floor_plan(&mut self.state);
        self.reset_for_plan_change();
        self.save()?;
        Ok(id)
    }

    /// # Errors
    ///
    /// Returns `FloorPlan` for an unknown id, or `Persistence`.
    pub fn delete_floor_plan(&mut self, id: FloorPlanId) -> Result<(), SessionError> {
        let was_active = self.state.active_floor_plan_id == Some(id);
        floor_plan::delete_floor_plan(&mut self.state, id)?;
        if was_active {
            self.reset_for_plan_change();
        }
        self.save()
    }

    /// # Errors
    ///
    /// Returns `FloorPlan` for an unknown id, or `Persistence`.
    pub fn duplicate_floor_plan(&mut self, id: FloorPlanId) -> Result<FloorPlanId, SessionError> {
        let copy = floor_plan::duplicate_floor_plan(&mut self.state, id)?;
        self.reset_for_plan_change();
        self.save()?;
        Ok(copy)
    }

    /// # Errors
    ///
    /// Returns `FloorPlan` for an unknown id, or `Persistence`.
    pub fn rename_floor_plan(&mut self, id: FloorPlanId, name: &str) -> Result<(), SessionError> {
        floor_plan::rename_floor_plan(&mut self.state, id, name)?;
        self.save()
    }

    /// # Errors
    ///
    /// Returns `FloorPlan` for an unknown id, or `Persistence`.
    pub fn select_floor_plan(&mut self, id: FloorPlanId) -> Result<(), SessionError> {
        floor_plan::select_floor_plan(&mut self.state, id)?;
        self.reset_for_plan_change();
        self.save()
    }

    // =========================================================================
    // IMAGE / CALIBRATION
    // =========================================================================

    /// Replace the active plan's image and enter calibration mode.
    ///
    /// # Errors
    ///
    /// Returns `NoActivePlan` or `Persistence`.
    pub fn set_image(&mut self, image_url: &str) -> Result<(), SessionError> {
        let id = self.active_id()?;
        floor_plan::set_image(&mut self.state, id, image_url)?;
        self.engine.reset();
        self.pending_calibration = None;
        self.mode = DrawingMode::Calibration;
        self.sync_display();
        self.save()
    }

    /// Record the active image's decoded size. Returns `false` if it was already known.
    ///
    /// # Errors
    ///
    /// Returns `NoActivePlan`, `FloorPlan` for a missing image or bad size, or
    /// `Persistence`.
    pub fn resolve_image_dimensions(&mut self, native: Size) -> Result<bool, SessionError> {
        let id = self.active_id()?;
        let changed = floor_plan::resolve_image_dimensions(&mut self.state, id, native)?;
        if changed {
            self.sync_display();
            self.save()?;
        }
        Ok(changed)
    }

    /// Calibrate the active plan from a stored-space line, bypassing the pointer.
    ///
    /// # Errors
    ///
    /// Returns `NoActivePlan`, `Calibration` or `Persistence`.
    pub fn calibrate(&mut self, start: Point, end: Point, length_in_inches: f64) -> Result<f64, SessionError> {
        let id = self.active_id()?;
        let scale = calibration::set_calibration(&mut self.state, id, start, end, length_in_inches)?;
        self.pending_calibration = None;
        self.save()?;
        Ok(scale)
    }

    /// Apply the real length to the drawn calibration line.
    ///
    /// # Errors
    ///
    /// Returns `NoPendingCalibration`, or whatever [`Self::calibrate`] returns.
    /// The line stays pending on error so the length can be re-entered.
    pub fn confirm_calibration(&mut self, length_in_inches: f64) -> Result<f64, SessionError> {
        let pending = self.pending_calibration.ok_or(SessionError::NoPendingCalibration)?;
        self.calibrate(pending.start, pending.end, length_in_inches)
    }

    /// Drop the active plan's scale and calibration line. Shape modes fall
    /// back to `None` since they need a scale.
    ///
    /// # Errors
    ///
    /// Returns `NoActivePlan`, `Calibration` or `Persistence`.
    pub fn clear_calibration(&mut self) -> Result<(), SessionError> {
        let id = self.active_id()?;
        calibration::clear_calibration(&mut self.state, id)?;
        self.pending_calibration = None;
        if self.mode.shape_kind().is_some() {
            self.mode = DrawingMode::None;
        }
        self.save()?;
        Ok(())
    }

    /// Discard the drawn calibration line without calibrating.
    pub fn cancel_calibration(&mut self) {
        if self.pending_calibration.take().is_some() {
            debug!("pending calibration discarded");
        }
    }

    // =========================================================================
    // SHAPES
    // =========================================================================

    /// Add a shape to the active plan in stored space and select it.
    ///
    /// # Errors
    ///
    /// Returns `NoActivePlan`, `Shape` or `Persistence`.
    pub fn add_shape(&mut self, kind: ShapeKind, position: Point, size: Size) -> Result<ShapeId, SessionError> {
        let plan_id = self.active_id()?;
        let id = shape::add_shape(&mut self.state, plan_id, kind, position, size)?;
        self.engine.select(Some(id));
        self.mode = DrawingMode::None;
        self.save()?;
        Ok(id)
    }

    /// # Errors
    ///
    /// Returns `NoActivePlan`, `Shape` or `Persistence`.
    pub fn move_shape(&mut self, id: ShapeId, position: Point) -> Result<(), SessionError> {
        let plan_id = self.active_id()?;
        shape::move_shape(&mut self.state, plan_id, id, position)?;
        self.save()
    }

    /// # Errors
    ///
    /// Returns `NoActivePlan`, `Shape` or `Persistence`.
    pub fn resize_shape_inches(&mut self, id: ShapeId, size_in_inches: Size) -> Result<(), SessionError> {
        let plan_id = self.active_id()?;
        shape::resize_shape_inches(&mut self.state, plan_id, id, size_in_inches)?;
        self.save()
    }

    /// # Errors
    ///
    /// Returns `NoActivePlan`, `Shape` or `Persistence`.
    pub fn resize_shape(&mut self, id: ShapeId, size: Size) -> Result<(), SessionError> {
        let plan_id = self.active_id()?;
        shape::resize_shape(&mut self.state, plan_id, id, size)?;
        self.save()
    }

    /// # Errors
    ///
    /// Returns `NoActivePlan`, `Shape` or `Persistence`.
    pub fn rename_shape(&mut self, id: ShapeId, name: &str) -> Result<(), SessionError> {
        let plan_id = self.active_id()?;
        shape::rename_shape(&mut self.state, plan_id, id, name)?;
        self.save()
    }

    /// Delete a shape from the active plan and clear the selection.
    ///
    /// # Errors
    ///
    /// Returns `NoActivePlan`, `Shape` or `Persistence`.
    pub fn delete_shape(&mut self, id: ShapeId) -> Result<(), SessionError> {
        let plan_id = self.active_id()?;
        shape::delete_shape(&mut self.state, plan_id, id)?;
        self.engine.select(None);
        self.save()
    }

    /// Select a shape from outside the surface (e.g. a list), or clear with `None`.
    ///
    /// # Errors
    ///
    /// Returns `NoActivePlan`, or `Shape` if the id is not on the active plan.
    pub fn select_shape(&mut self, id: Option<ShapeId>) -> Result<(), SessionError> {
        if let Some(id) = id {
            let plan = self.state.active_floor_plan().ok_or(SessionError::NoActivePlan)?;
            if plan.shape(&id).is_none() {
                return Err(ShapeError::NotFound(id).into());
            }
        }
        self.engine.select(id);
        Ok(())
    }

    // =========================================================================
    // POINTER INPUT
    // =========================================================================

    /// Pointer pressed at `pt` in display space. Without an active plan this is a no-op.
    ///
    /// # Errors
    ///
    /// Returns the first error from applying the engine's intents.
    pub fn pointer_down(&mut self, pt: Point) -> Result<Vec<Action>, SessionError> {
        self.sync_display();
        let Some(plan) = self.state.active_floor_plan() else {
            return Ok(Vec::new());
        };
        let actions = self.engine.on_pointer_down(plan, pt, self.mode);
        self.apply(&actions)?;
        Ok(actions)
    }

    /// # Errors
    ///
    /// Returns the first error from applying the engine's intents.
    pub fn pointer_move(&mut self, pt: Point) -> Result<Vec<Action>, SessionError> {
        let actions = self.engine.on_pointer_move(pt);
        self.apply(&actions)?;
        Ok(actions)
    }

    /// # Errors
    ///
    /// Returns the first error from applying the engine's intents.
    pub fn pointer_up(&mut self) -> Result<Vec<Action>, SessionError> {
        let actions = self.engine.on_pointer_up();
        self.apply(&actions)?;
        Ok(actions)
    }

    /// # Errors
    ///
    /// Returns the first error from applying the engine's intents.
    pub fn pointer_leave(&mut self) -> Result<Vec<Action>, SessionError> {
        let actions = self.engine.on_pointer_leave();
        self.apply(&actions)?;
        Ok(actions)
    }

    fn apply(&mut self, actions: &[Action]) -> Result<(), SessionError> {
        for action in actions {
            match *action {
                Action::MoveShape { id, position } => self.move_shape(id, position)?,
                Action::AddShape { kind, position, size } => {
                    self.add_shape(kind, position, size)?;
                }
                Action::CalibrationDrawn { start, end } => {
                    self.pending_calibration = Some(PendingCalibration { start, end });
                    self.mode = DrawingMode::None;
                    info!(?start, ?end, "calibration line awaiting length");
                }
                Action::SelectionChanged(_) | Action::RenderNeeded => {}
            }
        }
        Ok(())
    }

    // =========================================================================
    // RENDER
    // =========================================================================

    /// Draw commands for the active plan and any gesture in progress.
    #[must_use]
    pub fn render(&self) -> Vec<DrawCommand> {
        let Some(plan) = self.state.active_floor_plan() else {
            return Vec::new();
        };
        let mapper = plan.mapper(plan.display_size(self.container));
        draw(plan, &mapper, self.engine.selection(), self.engine.preview())
    }
}

#[cfg(test)]
#[path = "session_test.rs"]
mod tests;
