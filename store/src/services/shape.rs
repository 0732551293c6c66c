//! Shape service — add, move, resize, rename, delete on the active plan.
//!
//! DESIGN
//! ======
//! Shapes only exist on calibrated plans: adding one needs the plan's scale to
//! derive its inch size, and every resize recomputes the pixel/inch pair from
//! the scale in force at that moment. Positions are never validated against
//! the image bounds; a shape may be dragged partly off the plan.
//!
//! ERROR HANDLING
//! ==============
//! A resize with a non-positive or non-finite dimension is rejected before
//! touching the shape, so a failed edit leaves the previous size intact.

use canvas::doc::{AppState, FloorPlanId, Shape, ShapeId, ShapeKind};
use canvas::mapper::{Point, Size};
use tracing::info;

// =============================================================================
// TYPES
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum ShapeError {
    #[error("floor plan not found: {0}")]
    FloorPlanNotFound(FloorPlanId),
    #[error("shape not found: {0}")]
    NotFound(ShapeId),
    #[error("floor plan {0} is not calibrated")]
    NotCalibrated(FloorPlanId),
    #[error("invalid shape size: {width}x{height}")]
    InvalidSize { width: f64, height: f64 },
}

impl crate::ErrorCode for ShapeError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::FloorPlanNotFound(_) => "E_FLOOR_PLAN_NOT_FOUND",
            Self::NotFound(_) => "E_SHAPE_NOT_FOUND",
            Self::NotCalibrated(_) => "E_NOT_CALIBRATED",
            Self::InvalidSize { .. } => "E_INVALID_SIZE",
        }
    }
}

fn validate_size(size: Size) -> Result<(), ShapeError> {
    if size.is_positive() && size.width.is_finite() && size.height.is_finite() {
        Ok(())
    } else {
        Err(ShapeError::InvalidSize { width: size.width, height: size.height })
    }
}

// =============================================================================
// ADD
// =============================================================================

/// Append a shape in stored space, named `Shape N` after the new count.
///
/// # Errors
///
/// Returns `FloorPlanNotFound`, `NotCalibrated` when the plan has no scale,
/// or `InvalidSize`.
pub fn add_shape(
    state: &mut AppState,
    plan_id: FloorPlanId,
    kind: ShapeKind,
    position: Point,
    size: Size,
) -> Result<ShapeId, ShapeError> {
    let plan = state.floor_plan_mut(&plan_id).ok_or(ShapeError::FloorPlanNotFound(plan_id))?;
    let scale = plan.scale().ok_or(ShapeError::NotCalibrated(plan_id))?;
    validate_size(size)?;

    let shape = Shape::new(kind, position, size, scale, format!("Shape {}", plan.shapes.len() + 1));
    let id = shape.id;
    info!(
        plan_id = %plan_id,
        shape_id = %id,
        kind = kind.as_str(),
        width_in = shape.size_in_inches().width,
        height_in = shape.size_in_inches().height,
        "shape added"
    );
    plan.shapes.push(shape);
    Ok(id)
}

// =============================================================================
// EDIT
// =============================================================================

fn find_shape(state: &mut AppState, plan_id: FloorPlanId, id: ShapeId) -> Result<(&mut Shape, Option<f64>), ShapeError> {
    let plan = state.floor_plan_mut(&plan_id).ok_or(ShapeError::FloorPlanNotFound(plan_id))?;
    let scale = plan.scale();
    let shape = plan.shape_mut(&id).ok_or(ShapeError::NotFound(id))?;
    Ok((shape, scale))
}

/// Set a shape's stored-space top-left corner. Size is untouched.
///
/// # Errors
///
/// Returns `FloorPlanNotFound` or `NotFound`.
pub fn move_shape(state: &mut AppState, plan_id: FloorPlanId, id: ShapeId, position: Point) -> Result<(), ShapeError> {
    let (shape, _) = find_shape(state, plan_id, id)?;
    shape.position = position;
    Ok(())
}

/// Set a shape's real-world size; the pixel size follows from the plan's scale.
///
/// # Errors
///
/// Returns `FloorPlanNotFound`, `NotFound`, `NotCalibrated` or `InvalidSize`.
pub fn resize_shape_inches(
    state: &mut AppState,
    plan_id: FloorPlanId,
    id: ShapeId,
    size_in_inches: Size,
) -> Result<(), ShapeError> {
    validate_size(size_in_inches)?;
    let (shape, scale) = find_shape(state, plan_id, id)?;
    let scale = scale.ok_or(ShapeError::NotCalibrated(plan_id))?;
    shape.resize_inches(size_in_inches, scale);
    info!(shape_id = %id, width_in = size_in_inches.width, height_in = size_in_inches.height, "shape resized");
    Ok(())
}

/// Set a shape's stored-space pixel size; the inch size follows from the scale.
///
/// # Errors
///
/// Returns `FloorPlanNotFound`, `NotFound`, `NotCalibrated` or `InvalidSize`.
pub fn resize_shape(state: &mut AppState, plan_id: FloorPlanId, id: ShapeId, size: Size) -> Result<(), ShapeError> {
    validate_size(size)?;
    let (shape, scale) = find_shape(state, plan_id, id)?;
    let scale = scale.ok_or(ShapeError::NotCalibrated(plan_id))?;
    shape.resize(size, scale);
    info!(shape_id = %id, width = size.width, height = size.height, "shape resized");
    Ok(())
}

/// # Errors
///
/// Returns `FloorPlanNotFound` or `NotFound`.
pub fn rename_shape(state: &mut AppState, plan_id: FloorPlanId, id: ShapeId, name: &str) -> Result<(), ShapeError> {
    let (shape, _) = find_shape(state, plan_id, id)?;
    shape.name = name.to_string();
    info!(shape_id = %id, name, "shape renamed");
    Ok(())
}

/// Remove a shape from its plan.
///
/// # Errors
///
/// Returns `FloorPlanNotFound` or `NotFound`.
pub fn delete_shape(state: &mut AppState, plan_id: FloorPlanId, id: ShapeId) -> Result<Shape, ShapeError> {
    let plan = state.floor_plan_mut(&plan_id).ok_or(ShapeError::FloorPlanNotFound(plan_id))?;
    let removed = plan.remove_shape(&id).ok_or(ShapeError::NotFound(id))?;
    info!(plan_id = %plan_id, shape_id = %id, "shape deleted");
    Ok(removed)
}

#[cfg(test)]
#[path = "shape_test.rs"]
mod tests;
