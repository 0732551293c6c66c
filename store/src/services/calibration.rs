//! Calibration service — apply or clear a plan's scale.
//!
//! A calibration line lives in stored space, so a plan can only be calibrated
//! once its image's native size is known. Recalibrating overwrites the scale
//! and line; shapes already on the plan keep their cached inch sizes.

use canvas::calibrate::{CalibrateError, calibrate};
use canvas::doc::{AppState, FloorPlanId};
use canvas::mapper::Point;
use tracing::{info, warn};

#[derive(Debug, thiserror::Error)]
pub enum CalibrationError {
    #[error("floor plan not found: {0}")]
    FloorPlanNotFound(FloorPlanId),
    #[error("image dimensions unknown for floor plan {0}")]
    DimensionsUnknown(FloorPlanId),
    #[error(transparent)]
    Invalid(#[from] CalibrateError),
}

impl crate::ErrorCode for CalibrationError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::FloorPlanNotFound(_) => "E_FLOOR_PLAN_NOT_FOUND",
            Self::DimensionsUnknown(_) => "E_DIMENSIONS_UNKNOWN",
            Self::Invalid(CalibrateError::NonPositiveLength(_) | CalibrateError::NonFiniteLength) => {
                "E_INVALID_LENGTH"
            }
            Self::Invalid(CalibrateError::DegenerateLine) => "E_DEGENERATE_LINE",
        }
    }
}

/// Calibrate a plan from a stored-space line and its real length in inches.
/// Returns the new scale in pixels per inch.
///
/// # Errors
///
/// Returns `FloorPlanNotFound`, `DimensionsUnknown` before the image has been
/// measured, or `Invalid` for a bad length or zero-length line. The plan is
/// unchanged on error.
pub fn set_calibration(
    state: &mut AppState,
    plan_id: FloorPlanId,
    start: Point,
    end: Point,
    length_in_inches: f64,
) -> Result<f64, CalibrationError> {
    let plan = state.floor_plan_mut(&plan_id).ok_or(CalibrationError::FloorPlanNotFound(plan_id))?;
    if plan.image_dimensions().is_none() {
        return Err(CalibrationError::DimensionsUnknown(plan_id));
    }

    let calibration = calibrate(start, end, length_in_inches).inspect_err(|error| {
        warn!(%plan_id, %error, "calibration rejected");
    })?;
    let scale = calibration.scale;
    let previous = plan.scale();
    plan.set_calibration(calibration);
    info!(%plan_id, scale, ?previous, length_in_inches, "floor plan calibrated");
    Ok(scale)
}

/// Drop a plan's scale and calibration line.
///
/// # Errors
///
/// Returns `FloorPlanNotFound`.
pub fn clear_calibration(state: &mut AppState, plan_id: FloorPlanId) -> Result<(), CalibrationError> {
    let plan = state.floor_plan_mut(&plan_id).ok_or(CalibrationError::FloorPlanNotFound(plan_id))?;
    plan.clear_calibration();
    info!(%plan_id, "calibration cleared");
    Ok(())
}

#[cfg(test)]
#[path = "calibration_test.rs"]
mod tests;
