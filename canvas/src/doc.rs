//! Document model: floor plans, their shapes, and the workspace root.
//!
//! All geometry here is in stored space (the native pixel grid of the plan's
//! image). The JSON shape of these types is the persisted workspace format,
//! so field names follow the camelCase keys written by earlier versions
//! (`imageUrl`, `sizeInInches`, `activeFloorPlanId`, ...).
//!
//! Two invariants are held by keeping the relevant fields private:
//! a plan's `scale` and `calibrationLine` are set and cleared together, and a
//! shape's `sizeInInches` always equals `size / scale` for the scale in force
//! when its size was last written.

#[cfg(test)]
#[path = "doc_test.rs"]
mod doc_test;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::calibrate::{Calibration, CalibrationLine, inches_to_pixels, pixels_to_inches};
use crate::mapper::{CoordinateMapper, Point, Size, fit_to_container};

/// Unique identifier for a shape.
pub type ShapeId = Uuid;

/// Unique identifier for a floor plan.
pub type FloorPlanId = Uuid;

/// The geometry of a shape. Both kinds are anchored at their bounding box's top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeKind {
    /// Axis-aligned rectangle.
    Rectangle,
    /// Axis-aligned ellipse inscribed within the bounding box.
    Oval,
}

impl ShapeKind {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Rectangle => "rectangle",
            Self::Oval => "oval",
        }
    }
}

/// A rectangle or oval annotation on a floor plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Shape {
    pub id: ShapeId,
    #[serde(rename = "type")]
    pub kind: ShapeKind,
    /// Top-left corner of the bounding box, stored space.
    pub position: Point,
    size: Size,
    size_in_inches: Size,
    /// Display label; independent of geometry.
    #[serde(default)]
    pub name: String,
}

impl Shape {
    /// Create a shape with a fresh id, deriving its inch size from `scale`.
    #[must_use]
    pub fn new(kind: ShapeKind, position: Point, size: Size, scale: f64, name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind,
            position,
            size,
            size_in_inches: pixels_to_inches(size, scale),
            name: name.into(),
        }
    }

    /// Bounding-box size in stored-space pixels.
    #[must_use]
    pub fn size(&self) -> Size {
        self.size
    }

    /// Cached real-world size. Not rescaled on recalibration.
    #[must_use]
    pub fn size_in_inches(&self) -> Size {
        self.size_in_inches
    }

    /// Set the pixel size and recompute inches from the current scale.
    pub fn resize(&mut self, size: Size, scale: f64) {
        self.size = size;
        self.size_in_inches = pixels_to_inches(size, scale);
    }

    /// Set the inch size and recompute pixels from the current scale.
    pub fn resize_inches(&mut self, size_in_inches: Size, scale: f64) {
        self.size = inches_to_pixels(size_in_inches, scale);
        self.size_in_inches = size_in_inches;
    }
}

/// One floor plan: an image, an optional calibration, and its shapes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FloorPlan {
    pub id: FloorPlanId,
    pub name: String,
    #[serde(default)]
    image_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    original_image_dimensions: Option<Size>,
    #[serde(default)]
    scale: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    calibration_line: Option<CalibrationLine>,
    /// Insertion order is z-order: later shapes draw and hit-test on top.
    #[serde(default)]
    pub shapes: Vec<Shape>,
}

impl FloorPlan {
    /// A new plan with no image.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            image_url: String::new(),
            original_image_dimensions: None,
            scale: None,
            calibration_line: None,
            shapes: Vec::new(),
        }
    }

    /// Opaque reference to the plan's raster image; empty until one is uploaded.
    #[must_use]
    pub fn image_url(&self) -> &str {
        &self.image_url
    }

    #[must_use]
    pub fn has_image(&self) -> bool {
        !self.image_url.is_empty()
    }

    /// Native pixel size of the image, once it has been decoded.
    #[must_use]
    pub fn image_dimensions(&self) -> Option<Size> {
        self.original_image_dimensions
    }

    /// Pixels per inch, once calibrated.
    #[must_use]
    pub fn scale(&self) -> Option<f64> {
        self.scale
    }

    #[must_use]
    pub fn calibration_line(&self) -> Option<&CalibrationLine> {
        self.calibration_line.as_ref()
    }

    #[must_use]
    pub fn is_calibrated(&self) -> bool {
        self.scale.is_some()
    }

    /// Replace the image. Every pixel-space fact derived from the old image
    /// (dimensions, scale, calibration line, shapes) is discarded.
    pub fn set_image(&mut self, image_url: impl Into<String>) {
        self.image_url = image_url.into();
        self.original_image_dimensions = None;
        self.scale = None;
        self.calibration_line = None;
        self.shapes.clear();
    }

    /// Record the decoded image size. Returns `false` (and changes nothing) if
    /// the size was already known for this image.
    pub fn resolve_image_dimensions(&mut self, native: Size) -> bool {
        if self.original_image_dimensions.is_some() {
            return false;
        }
        self.original_image_dimensions = Some(native);
        true
    }

    /// Overwrite scale and calibration line together. Existing shapes keep
    /// their cached inch sizes.
    pub fn set_calibration(&mut self, calibration: Calibration) {
        self.scale = Some(calibration.scale);
        self.calibration_line = Some(calibration.line);
    }

    /// Drop scale and calibration line together.
    pub fn clear_calibration(&mut self) {
        self.scale = None;
        self.calibration_line = None;
    }

    #[must_use]
    pub fn shape(&self, id: &ShapeId) -> Option<&Shape> {
        self.shapes.iter().find(|s| &s.id == id)
    }

    pub fn shape_mut(&mut self, id: &ShapeId) -> Option<&mut Shape> {
        self.shapes.iter_mut().find(|s| &s.id == id)
    }

    /// Remove a shape, returning it if present.
    pub fn remove_shape(&mut self, id: &ShapeId) -> Option<Shape> {
        let index = self.shapes.iter().position(|s| &s.id == id)?;
        Some(self.shapes.remove(index))
    }

    /// The rendered surface size for a container: the image fitted inside it.
    /// Falls back to the container itself while the image size is unknown.
    #[must_use]
    pub fn display_size(&self, container: Size) -> Size {
        match self.original_image_dimensions {
            Some(native) => fit_to_container(native, container),
            None => container,
        }
    }

    /// A mapper between this plan's stored space and a display surface.
    #[must_use]
    pub fn mapper(&self, display: Size) -> CoordinateMapper {
        CoordinateMapper::new(self.original_image_dimensions, display)
    }

    /// Deep copy under a new id and name, with fresh shape identities.
    #[must_use]
    pub fn duplicate(&self, name: impl Into<String>) -> Self {
        let mut copy = self.clone();
        copy.id = Uuid::new_v4();
        copy.name = name.into();
        for shape in &mut copy.shapes {
            shape.id = Uuid::new_v4();
        }
        copy
    }
}

/// The whole persisted workspace.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppState {
    #[serde(default)]
    pub floor_plans: Vec<FloorPlan>,
    /// Reference to the plan being edited; not ownership.
    #[serde(default)]
    pub active_floor_plan_id: Option<FloorPlanId>,
}

impl AppState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn floor_plan(&self, id: &FloorPlanId) -> Option<&FloorPlan> {
        self.floor_plans.iter().find(|fp| &fp.id == id)
    }

    pub fn floor_plan_mut(&mut self, id: &FloorPlanId) -> Option<&mut FloorPlan> {
        self.floor_plans.iter_mut().find(|fp| &fp.id == id)
    }

    /// The active plan, if the active id still resolves.
    #[must_use]
    pub fn active_floor_plan(&self) -> Option<&FloorPlan> {
        self.active_floor_plan_id.as_ref().and_then(|id| self.floor_plan(id))
    }

    pub fn active_floor_plan_mut(&mut self) -> Option<&mut FloorPlan> {
        let id = self.active_floor_plan_id?;
        self.floor_plan_mut(&id)
    }
}
