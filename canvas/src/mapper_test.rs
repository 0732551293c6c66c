#![allow(clippy::float_cmp)]

use super::*;

const EPSILON: f64 = 1e-6;

fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < EPSILON
}

fn point_approx_eq(a: Point, b: Point) -> bool {
    approx_eq(a.x, b.x) && approx_eq(a.y, b.y)
}

fn half_scale() -> CoordinateMapper {
    CoordinateMapper::new(Some(Size::new(2000.0, 1000.0)), Size::new(1000.0, 500.0))
}

// --- Point / Size ---

#[test]
fn point_sub_is_component_wise() {
    let d = Point::new(10.0, 7.0) - Point::new(4.0, 2.0);
    assert_eq!(d, Point::new(6.0, 5.0));
}

#[test]
fn point_distance_three_four_five() {
    assert!(approx_eq(Point::new(0.0, 0.0).distance(Point::new(30.0, 40.0)), 50.0));
}

#[test]
fn size_is_positive_rejects_zero_and_nan() {
    assert!(Size::new(1.0, 1.0).is_positive());
    assert!(!Size::new(0.0, 1.0).is_positive());
    assert!(!Size::new(1.0, -1.0).is_positive());
    assert!(!Size::new(f64::NAN, 1.0).is_positive());
}

#[test]
fn point_serializes_with_plain_fields() {
    let json = serde_json::to_value(Point::new(1.5, 2.0)).unwrap();
    assert_eq!(json, serde_json::json!({ "x": 1.5, "y": 2.0 }));
}

// --- Identity fallback ---

#[test]
fn identity_without_native_size() {
    let m = CoordinateMapper::new(None, Size::new(400.0, 300.0));
    assert!(!m.is_ready());
    assert_eq!(m.to_display(Point::new(12.0, 34.0)), Point::new(12.0, 34.0));
    assert_eq!(m.to_stored(Point::new(12.0, 34.0)), Point::new(12.0, 34.0));
}

#[test]
fn identity_with_zero_display_size() {
    let m = CoordinateMapper::new(Some(Size::new(1000.0, 800.0)), Size::default());
    assert!(!m.is_ready());
    assert_eq!(m.size_to_display(Size::new(5.0, 6.0)), Size::new(5.0, 6.0));
}

#[test]
fn identity_with_zero_native_size() {
    let m = CoordinateMapper::new(Some(Size::new(0.0, 800.0)), Size::new(100.0, 80.0));
    assert!(!m.is_ready());
    assert_eq!(m.size_to_stored(Size::new(5.0, 6.0)), Size::new(5.0, 6.0));
}

#[test]
fn identity_constructor_is_not_ready() {
    assert!(!CoordinateMapper::identity().is_ready());
}

// --- Conversions ---

#[test]
fn to_display_scales_down() {
    let m = half_scale();
    assert!(m.is_ready());
    assert!(point_approx_eq(m.to_display(Point::new(400.0, 200.0)), Point::new(200.0, 100.0)));
}

#[test]
fn to_stored_scales_up() {
    let m = half_scale();
    assert!(point_approx_eq(m.to_stored(Point::new(200.0, 100.0)), Point::new(400.0, 200.0)));
}

#[test]
fn size_conversions_use_same_ratios() {
    let m = half_scale();
    assert_eq!(m.size_to_display(Size::new(100.0, 60.0)), Size::new(50.0, 30.0));
    assert_eq!(m.size_to_stored(Size::new(50.0, 30.0)), Size::new(100.0, 60.0));
}

#[test]
fn non_uniform_axes_are_independent() {
    let m = CoordinateMapper::new(Some(Size::new(100.0, 100.0)), Size::new(50.0, 200.0));
    let d = m.to_display(Point::new(10.0, 10.0));
    assert!(point_approx_eq(d, Point::new(5.0, 20.0)));
}

#[test]
fn display_size_is_exposed() {
    assert_eq!(half_scale().display_size(), Size::new(1000.0, 500.0));
}

// --- Round trip ---

#[test]
fn round_trip_stored_display_stored() {
    let cases = [
        (Size::new(3024.0, 4032.0), Size::new(450.0, 600.0)),
        (Size::new(800.0, 600.0), Size::new(800.0, 600.0)),
        (Size::new(1234.5, 987.25), Size::new(333.3, 111.1)),
    ];
    for (native, display) in cases {
        let m = CoordinateMapper::new(Some(native), display);
        for p in [
            Point::new(0.0, 0.0),
            Point::new(native.width, native.height),
            Point::new(native.width * 0.37, native.height * 0.81),
        ] {
            assert!(point_approx_eq(m.to_stored(m.to_display(p)), p), "{p:?} via {native:?}/{display:?}");
            assert!(point_approx_eq(m.to_display(m.to_stored(p)), p), "{p:?} via {native:?}/{display:?}");
        }
    }
}

// --- fit_to_container ---

#[test]
fn fit_never_upscales() {
    let fitted = fit_to_container(Size::new(400.0, 300.0), Size::new(1600.0, 1200.0));
    assert_eq!(fitted, Size::new(400.0, 300.0));
}

#[test]
fn fit_limited_by_width() {
    let fitted = fit_to_container(Size::new(2000.0, 1000.0), Size::new(1000.0, 1000.0));
    assert!(approx_eq(fitted.width, 1000.0));
    assert!(approx_eq(fitted.height, 500.0));
}

#[test]
fn fit_limited_by_height() {
    let fitted = fit_to_container(Size::new(1000.0, 2000.0), Size::new(1000.0, 500.0));
    assert!(approx_eq(fitted.width, 250.0));
    assert!(approx_eq(fitted.height, 500.0));
}

#[test]
fn fit_preserves_aspect_ratio() {
    let native = Size::new(3024.0, 4032.0);
    let fitted = fit_to_container(native, Size::new(700.0, 500.0));
    assert!(approx_eq(fitted.width / fitted.height, native.width / native.height));
}

#[test]
fn fit_uses_default_container_when_unmeasured() {
    let fitted = fit_to_container(Size::new(1600.0, 1200.0), Size::default());
    assert!(approx_eq(fitted.width, 800.0));
    assert!(approx_eq(fitted.height, 600.0));
}

#[test]
fn fit_returns_degenerate_native_unchanged() {
    let fitted = fit_to_container(Size::new(0.0, 10.0), Size::new(100.0, 100.0));
    assert_eq!(fitted, Size::new(0.0, 10.0));
}
