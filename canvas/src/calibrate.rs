//! Scale calibration: pixels-per-inch from a reference line of known length.
//!
//! The user draws a line over something whose real length they know (a door,
//! a dimensioned wall) and types that length. The line's endpoints are in
//! stored space, so the resulting scale is independent of how large the image
//! happens to be rendered.

#[cfg(test)]
#[path = "calibrate_test.rs"]
mod calibrate_test;

use serde::{Deserialize, Serialize};

use crate::mapper::{Point, Size};

#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
pub enum CalibrateError {
    #[error("calibration length must be positive, got {0}")]
    NonPositiveLength(f64),
    #[error("calibration length must be finite")]
    NonFiniteLength,
    #[error("calibration line has zero length")]
    DegenerateLine,
}

/// The user-drawn reference segment and its declared real-world length.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalibrationLine {
    /// First endpoint, stored space.
    pub start: Point,
    /// Second endpoint, stored space.
    pub end: Point,
    /// Real-world length of the segment, in inches.
    pub length_in_inches: f64,
}

/// Result of a successful calibration: the scale plus the line it came from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Calibration {
    /// Pixels per inch in stored space.
    pub scale: f64,
    pub line: CalibrationLine,
}

/// Pixels per inch for a stored-space segment of known length.
///
/// # Errors
///
/// Returns `NonPositiveLength` / `NonFiniteLength` for an unusable length and
/// `DegenerateLine` when the endpoints coincide.
pub fn compute_scale(start: Point, end: Point, length_in_inches: f64) -> Result<f64, CalibrateError> {
    if !length_in_inches.is_finite() {
        return Err(CalibrateError::NonFiniteLength);
    }
    if length_in_inches <= 0.0 {
        return Err(CalibrateError::NonPositiveLength(length_in_inches));
    }
    let pixels = start.distance(end);
    if pixels <= 0.0 || !pixels.is_finite() {
        return Err(CalibrateError::DegenerateLine);
    }
    Ok(pixels / length_in_inches)
}

/// Compute the scale and package it with the line to persist verbatim.
///
/// # Errors
///
/// Same as [`compute_scale`].
pub fn calibrate(start: Point, end: Point, length_in_inches: f64) -> Result<Calibration, CalibrateError> {
    let scale = compute_scale(start, end, length_in_inches)?;
    Ok(Calibration { scale, line: CalibrationLine { start, end, length_in_inches } })
}

/// Stored-space pixel size to inches.
#[must_use]
pub fn pixels_to_inches(size: Size, scale: f64) -> Size {
    Size { width: size.width / scale, height: size.height / scale }
}

/// Inches to stored-space pixel size.
#[must_use]
pub fn inches_to_pixels(size: Size, scale: f64) -> Size {
    Size { width: size.width * scale, height: size.height * scale }
}
