#[cfg(test)]
#[path = "hit_test.rs"]
mod hit_test;

use crate::doc::{Shape, ShapeKind};
use crate::mapper::{CoordinateMapper, Point, Size};

/// Whether a display-space bounding box of `kind` contains `pt`. Boundaries are inclusive.
#[must_use]
pub fn contains(kind: ShapeKind, origin: Point, size: Size, pt: Point) -> bool {
    match kind {
        ShapeKind::Rectangle => {
            pt.x >= origin.x && pt.x <= origin.x + size.width && pt.y >= origin.y && pt.y <= origin.y + size.height
        }
        ShapeKind::Oval => {
            let rx = size.width / 2.0;
            let ry = size.height / 2.0;
            if rx <= 0.0 || ry <= 0.0 {
                return false;
            }
            let nx = (pt.x - (origin.x + rx)) / rx;
            let ny = (pt.y - (origin.y + ry)) / ry;
            nx * nx + ny * ny <= 1.0
        }
    }
}

/// The top-most shape under `display_pt`, if any.
///
/// Shapes are scanned from last to first since later shapes sit on top.
/// Shape geometry is projected to display space through `mapper` per query.
#[must_use]
pub fn hit_test<'a>(display_pt: Point, shapes: &'a [Shape], mapper: &CoordinateMapper) -> Option<&'a Shape> {
    shapes.iter().rev().find(|shape| {
        let origin = mapper.to_display(shape.position);
        let size = mapper.size_to_display(shape.size());
        contains(shape.kind, origin, size, display_pt)
    })
}
