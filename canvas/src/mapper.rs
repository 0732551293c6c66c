//! Coordinate mapping between stored space and display space.
//!
//! Stored space is the native pixel grid of the uploaded image; every shape
//! position, shape size and calibration endpoint is persisted there. Display
//! space is the rendered surface, which is the image fitted to its container.
//! The mapper is a plain value rebuilt per query from the two sizes, so a
//! container resize never leaves stale cached coordinates behind.

#[cfg(test)]
#[path = "mapper_test.rs"]
mod mapper_test;

use serde::{Deserialize, Serialize};

use crate::consts::{DEFAULT_CONTAINER_HEIGHT, DEFAULT_CONTAINER_WIDTH};

/// A point in either stored or display space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to `other`.
    #[must_use]
    pub fn distance(self, other: Point) -> f64 {
        (other.x - self.x).hypot(other.y - self.y)
    }
}

impl std::ops::Sub for Point {
    type Output = Point;

    fn sub(self, other: Point) -> Point {
        Point { x: self.x - other.x, y: self.y - other.y }
    }
}

/// A width/height pair in either stored or display space (or inches).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    #[must_use]
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Whether both dimensions are finite and strictly positive.
    #[must_use]
    pub fn is_positive(self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }
}

/// Bidirectional transform between stored and display space.
///
/// Each axis is scaled independently. When the native size is unknown (the
/// image has not finished decoding) or either size is degenerate, the mapper
/// passes coordinates through unchanged.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoordinateMapper {
    native: Option<Size>,
    display: Size,
}

impl CoordinateMapper {
    #[must_use]
    pub fn new(native: Option<Size>, display: Size) -> Self {
        Self { native, display }
    }

    /// A pass-through mapper.
    #[must_use]
    pub fn identity() -> Self {
        Self { native: None, display: Size::default() }
    }

    /// Whether both sizes are known and non-degenerate, so conversions are real.
    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.ratios().is_some()
    }

    /// The display surface size this mapper was built for.
    #[must_use]
    pub fn display_size(&self) -> Size {
        self.display
    }

    /// Display-per-stored ratio on each axis, or `None` when not ready.
    fn ratios(&self) -> Option<(f64, f64)> {
        let native = self.native?;
        if !native.is_positive() || !self.display.is_positive() {
            return None;
        }
        Some((self.display.width / native.width, self.display.height / native.height))
    }

    /// Convert a stored-space point to display space.
    #[must_use]
    pub fn to_display(&self, stored: Point) -> Point {
        match self.ratios() {
            Some((rx, ry)) => Point { x: stored.x * rx, y: stored.y * ry },
            None => stored,
        }
    }

    /// Convert a display-space point to stored space.
    #[must_use]
    pub fn to_stored(&self, display: Point) -> Point {
        match self.ratios() {
            Some((rx, ry)) => Point { x: display.x / rx, y: display.y / ry },
            None => display,
        }
    }

    /// Convert a stored-space size to display space.
    #[must_use]
    pub fn size_to_display(&self, stored: Size) -> Size {
        match self.ratios() {
            Some((rx, ry)) => Size { width: stored.width * rx, height: stored.height * ry },
            None => stored,
        }
    }

    /// Convert a display-space size to stored space.
    #[must_use]
    pub fn size_to_stored(&self, display: Size) -> Size {
        match self.ratios() {
            Some((rx, ry)) => Size { width: display.width / rx, height: display.height / ry },
            None => display,
        }
    }
}

/// Fit `native` inside `container`, preserving aspect ratio and never upscaling.
///
/// A container with a non-positive dimension falls back to the default
/// 800×600 surface. A degenerate native size is returned as-is.
#[must_use]
pub fn fit_to_container(native: Size, container: Size) -> Size {
    if !native.is_positive() {
        return native;
    }
    let container = if container.is_positive() {
        container
    } else {
        Size::new(DEFAULT_CONTAINER_WIDTH, DEFAULT_CONTAINER_HEIGHT)
    };
    let factor = (container.width / native.width)
        .min(container.height / native.height)
        .min(1.0);
    Size { width: native.width * factor, height: native.height * factor }
}
