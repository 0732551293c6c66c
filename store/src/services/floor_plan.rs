//! Floor-plan service — create, delete, duplicate, rename, select, image swap.
//!
//! DESIGN
//! ======
//! New and duplicated plans become active immediately. Deleting the active
//! plan hands activity to the first remaining plan. An image swap discards
//! every pixel-space fact derived from the previous image, and the image's
//! native size is recorded once per image when decoding completes.

use canvas::doc::{AppState, FloorPlan, FloorPlanId};
use canvas::mapper::Size;
use tracing::{debug, info};

// =============================================================================
// TYPES
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum FloorPlanError {
    #[error("floor plan not found: {0}")]
    NotFound(FloorPlanId),
    #[error("floor plan {0} has no image")]
    NoImage(FloorPlanId),
    #[error("invalid image dimensions: {width}x{height}")]
    InvalidDimensions { width: f64, height: f64 },
}

impl crate::ErrorCode for FloorPlanError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "E_FLOOR_PLAN_NOT_FOUND",
            Self::NoImage(_) => "E_NO_IMAGE",
            Self::InvalidDimensions { .. } => "E_INVALID_DIMENSIONS",
        }
    }
}

// =============================================================================
// CREATE / DELETE
// =============================================================================

/// Append a new empty plan named `Floor Plan N` and make it active.
pub fn create_floor_plan(state: &mut AppState) -> FloorPlanId {
    let plan = FloorPlan::new(format!("Floor Plan {}", state.floor_plans.len() + 1));
    let id = plan.id;
    info!(%id, name = %plan.name, "floor plan created");
    state.floor_plans.push(plan);
    state.active_floor_plan_id = Some(id);
    id
}

/// Remove a plan. If it was active, the first remaining plan (or none) becomes active.
///
/// # Errors
///
/// Returns `NotFound` if no plan has `id`.
pub fn delete_floor_plan(state: &mut AppState, id: FloorPlanId) -> Result<FloorPlan, FloorPlanError> {
    let index = state
        .floor_plans
        .iter()
        .position(|fp| fp.id == id)
        .ok_or(FloorPlanError::NotFound(id))?;
    let removed = state.floor_plans.remove(index);

    if state.active_floor_plan_id == Some(id) {
        state.active_floor_plan_id = state.floor_plans.first().map(|fp| fp.id);
    }

    info!(%id, active = ?state.active_floor_plan_id, "floor plan deleted");
    Ok(removed)
}

// =============================================================================
// DUPLICATE
// =============================================================================

/// Deep-copy a plan with fresh shape ids, append it, and make it active.
///
/// The copy is named `Base (copy)` for the first duplicate of `Base`, then
/// `Base (copy N)` one above the highest existing copy number. Duplicating a
/// copy counts against the original base name.
///
/// # Errors
///
/// Returns `NotFound` if no plan has `id`.
pub fn duplicate_floor_plan(state: &mut AppState, id: FloorPlanId) -> Result<FloorPlanId, FloorPlanError> {
    let source = state.floor_plan(&id).ok_or(FloorPlanError::NotFound(id))?;

    let base = match split_copy_suffix(&source.name) {
        Some((base, _)) if source.name[base.len()..].starts_with(char::is_whitespace) => base,
        _ => source.name.as_str(),
    };
    let highest = state
        .floor_plans
        .iter()
        .filter_map(|fp| split_copy_suffix(&fp.name))
        .filter(|(other_base, _)| *other_base == base)
        .map(|(_, n)| n)
        .max()
        .unwrap_or(0);
    let name = if highest == 0 {
        format!("{base} (copy)")
    } else {
        format!("{base} (copy {})", highest + 1)
    };

    let copy = source.duplicate(name);
    let copy_id = copy.id;
    info!(source = %id, id = %copy_id, name = %copy.name, "floor plan duplicated");
    state.floor_plans.push(copy);
    state.active_floor_plan_id = Some(copy_id);
    Ok(copy_id)
}

/// Split `Base (copy)` / `Base (copy N)` into `("Base", N)`, where a bare
/// `(copy)` counts as 1. Whitespace before the parenthesis is optional and
/// not part of the base.
fn split_copy_suffix(name: &str) -> Option<(&str, u32)> {
    let inner = name.strip_suffix(')')?;
    let open = inner.rfind("(copy")?;
    let digits = inner[open + "(copy".len()..].trim_start();
    if !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let number = if digits.is_empty() {
        1
    } else {
        match digits.parse::<u32>() {
            Ok(n) => n,
            Err(_) => return None,
        }
    };
    let base = name[..open].trim_end();
    if base.is_empty() {
        return None;
    }
    Some((base, number))
}

// =============================================================================
// RENAME / SELECT
// =============================================================================

/// # Errors
///
/// Returns `NotFound` if no plan has `id`.
pub fn rename_floor_plan(state: &mut AppState, id: FloorPlanId, name: &str) -> Result<(), FloorPlanError> {
    let plan = state.floor_plan_mut(&id).ok_or(FloorPlanError::NotFound(id))?;
    plan.name = name.to_string();
    info!(%id, name, "floor plan renamed");
    Ok(())
}

/// # Errors
///
/// Returns `NotFound` if no plan has `id`.
pub fn select_floor_plan(state: &mut AppState, id: FloorPlanId) -> Result<(), FloorPlanError> {
    if state.floor_plan(&id).is_none() {
        return Err(FloorPlanError::NotFound(id));
    }
    state.active_floor_plan_id = Some(id);
    info!(%id, "floor plan selected");
    Ok(())
}

// =============================================================================
// IMAGE
// =============================================================================

/// Replace a plan's image, clearing its dimensions, calibration and shapes.
///
/// # Errors
///
/// Returns `NotFound` if no plan has `id`.
pub fn set_image(state: &mut AppState, id: FloorPlanId, image_url: &str) -> Result<(), FloorPlanError> {
    let plan = state.floor_plan_mut(&id).ok_or(FloorPlanError::NotFound(id))?;
    let dropped = plan.shapes.len();
    plan.set_image(image_url);
    info!(%id, dropped_shapes = dropped, "floor plan image replaced");
    Ok(())
}

/// Record the decoded native size of a plan's image.
///
/// Returns `false` without changes when the size is already known for the
/// current image.
///
/// # Errors
///
/// Returns `NotFound`, `NoImage` when the plan has no image to measure, or
/// `InvalidDimensions` for a non-positive size.
pub fn resolve_image_dimensions(state: &mut AppState, id: FloorPlanId, native: Size) -> Result<bool, FloorPlanError> {
    let plan = state.floor_plan_mut(&id).ok_or(FloorPlanError::NotFound(id))?;
    if !plan.has_image() {
        return Err(FloorPlanError::NoImage(id));
    }
    if !native.is_positive() {
        return Err(FloorPlanError::InvalidDimensions { width: native.width, height: native.height });
    }
    let changed = plan.resolve_image_dimensions(native);
    if changed {
        info!(%id, width = native.width, height = native.height, "image dimensions resolved");
    } else {
        debug!(%id, "image dimensions already known");
    }
    Ok(changed)
}

#[cfg(test)]
#[path = "floor_plan_test.rs"]
mod tests;
