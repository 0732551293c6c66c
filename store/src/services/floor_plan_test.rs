use super::*;
use crate::ErrorCode;
use canvas::calibrate::calibrate;
use canvas::doc::{Shape, ShapeKind};
use canvas::mapper::Point;
use uuid::Uuid;

fn state_with(names: &[&str]) -> AppState {
    let mut state = AppState::new();
    for name in names {
        state.floor_plans.push(FloorPlan::new(*name));
    }
    state.active_floor_plan_id = state.floor_plans.first().map(|fp| fp.id);
    state
}

/// Image, dimensions, calibration and one shape.
fn furnish(plan: &mut FloorPlan) {
    plan.set_image("old.png");
    plan.resolve_image_dimensions(Size::new(100.0, 100.0));
    plan.set_calibration(calibrate(Point::new(0.0, 0.0), Point::new(10.0, 0.0), 1.0).expect("calibrate"));
    plan.shapes
        .push(Shape::new(ShapeKind::Oval, Point::new(0.0, 0.0), Size::new(10.0, 10.0), 10.0, "S"));
}

fn names(state: &AppState) -> Vec<&str> {
    state.floor_plans.iter().map(|fp| fp.name.as_str()).collect()
}

// =============================================================================
// create / delete
// =============================================================================

#[test]
fn create_names_by_count_and_activates() {
    let mut state = AppState::new();
    let first = create_floor_plan(&mut state);
    let second = create_floor_plan(&mut state);
    assert_eq!(names(&state), vec!["Floor Plan 1", "Floor Plan 2"]);
    assert_ne!(first, second);
    assert_eq!(state.active_floor_plan_id, Some(second));
}

#[test]
fn delete_active_falls_back_to_first_remaining() {
    let mut state = state_with(&["A", "B", "C"]);
    let b = state.floor_plans[1].id;
    state.active_floor_plan_id = Some(b);

    let removed = delete_floor_plan(&mut state, b).expect("delete should succeed");
    assert_eq!(removed.name, "B");
    assert_eq!(state.active_floor_plan_id, Some(state.floor_plans[0].id));
}

#[test]
fn delete_inactive_keeps_active() {
    let mut state = state_with(&["A", "B"]);
    let a = state.floor_plans[0].id;
    let b = state.floor_plans[1].id;
    delete_floor_plan(&mut state, b).expect("delete should succeed");
    assert_eq!(state.active_floor_plan_id, Some(a));
}

#[test]
fn delete_last_plan_clears_active() {
    let mut state = state_with(&["Only"]);
    let id = state.floor_plans[0].id;
    delete_floor_plan(&mut state, id).expect("delete should succeed");
    assert!(state.floor_plans.is_empty());
    assert_eq!(state.active_floor_plan_id, None);
}

#[test]
fn delete_unknown_is_not_found() {
    let mut state = state_with(&["A"]);
    let err = delete_floor_plan(&mut state, Uuid::new_v4()).unwrap_err();
    assert_eq!(err.error_code(), "E_FLOOR_PLAN_NOT_FOUND");
    assert_eq!(state.floor_plans.len(), 1);
}

// =============================================================================
// duplicate
// =============================================================================

#[test]
fn duplicate_names_follow_copy_sequence() {
    let mut state = state_with(&["Kitchen"]);
    let source = state.floor_plans[0].id;

    duplicate_floor_plan(&mut state, source).expect("first duplicate");
    duplicate_floor_plan(&mut state, source).expect("second duplicate");
    duplicate_floor_plan(&mut state, source).expect("third duplicate");

    assert_eq!(names(&state), vec!["Kitchen", "Kitchen (copy)", "Kitchen (copy 2)", "Kitchen (copy 3)"]);
}

#[test]
fn duplicating_a_copy_counts_against_the_base_name() {
    let mut state = state_with(&["Kitchen", "Kitchen (copy)"]);
    let copy = state.floor_plans[1].id;
    duplicate_floor_plan(&mut state, copy).expect("duplicate");
    assert_eq!(state.floor_plans[2].name, "Kitchen (copy 2)");
}

#[test]
fn duplicate_skips_past_highest_copy_number() {
    let mut state = state_with(&["Kitchen", "Kitchen (copy 7)"]);
    let source = state.floor_plans[0].id;
    duplicate_floor_plan(&mut state, source).expect("duplicate");
    assert_eq!(state.floor_plans[2].name, "Kitchen (copy 8)");
}

#[test]
fn duplicate_ignores_copies_of_other_bases() {
    let mut state = state_with(&["Kitchen", "Kitchenette (copy 4)"]);
    let source = state.floor_plans[0].id;
    duplicate_floor_plan(&mut state, source).expect("duplicate");
    assert_eq!(state.floor_plans[2].name, "Kitchen (copy)");
}

#[test]
fn duplicate_is_deep_with_fresh_ids_and_becomes_active() {
    let mut state = state_with(&["Plan"]);
    let source = state.floor_plans[0].id;
    {
        let plan = &mut state.floor_plans[0];
        plan.set_image("plan.png");
        plan.resolve_image_dimensions(Size::new(1000.0, 800.0));
        plan.set_calibration(calibrate(Point::new(0.0, 0.0), Point::new(100.0, 0.0), 10.0).expect("calibrate"));
        plan.shapes
            .push(Shape::new(ShapeKind::Rectangle, Point::new(1.0, 2.0), Size::new(30.0, 40.0), 10.0, "Desk"));
    }

    let copy_id = duplicate_floor_plan(&mut state, source).expect("duplicate");
    assert_eq!(state.active_floor_plan_id, Some(copy_id));

    let original = state.floor_plan(&source).expect("original").clone();
    let copy = state.floor_plan_mut(&copy_id).expect("copy");
    assert_eq!(copy.scale(), original.scale());
    assert_eq!(copy.image_dimensions(), original.image_dimensions());
    assert_ne!(copy.shapes[0].id, original.shapes[0].id);

    copy.shapes[0].name = "Changed".into();
    assert_eq!(state.floor_plan(&source).expect("original").shapes[0].name, "Desk");
}

#[test]
fn split_copy_suffix_parses_forms() {
    assert_eq!(split_copy_suffix("A (copy)"), Some(("A", 1)));
    assert_eq!(split_copy_suffix("A (copy 12)"), Some(("A", 12)));
    assert_eq!(split_copy_suffix("A(copy 3)"), Some(("A", 3)));
    assert_eq!(split_copy_suffix("A (copy x)"), None);
    assert_eq!(split_copy_suffix("(copy)"), None);
    assert_eq!(split_copy_suffix("A"), None);
}

// =============================================================================
// rename / select
// =============================================================================

#[test]
fn rename_and_select() {
    let mut state = state_with(&["A", "B"]);
    let b = state.floor_plans[1].id;
    rename_floor_plan(&mut state, b, "Basement").expect("rename");
    select_floor_plan(&mut state, b).expect("select");
    assert_eq!(state.active_floor_plan().map(|fp| fp.name.as_str()), Some("Basement"));
}

#[test]
fn select_unknown_leaves_active_untouched() {
    let mut state = state_with(&["A"]);
    let a = state.floor_plans[0].id;
    assert!(select_floor_plan(&mut state, Uuid::new_v4()).is_err());
    assert_eq!(state.active_floor_plan_id, Some(a));
}

// =============================================================================
// image
// =============================================================================

#[test]
fn set_image_resets_plan() {
    let mut state = state_with(&["A"]);
    let id = state.floor_plans[0].id;
    furnish(&mut state.floor_plans[0]);

    set_image(&mut state, id, "new.png").expect("set image");
    let plan = &state.floor_plans[0];
    assert_eq!(plan.image_url(), "new.png");
    assert!(plan.image_dimensions().is_none());
    assert!(!plan.is_calibrated());
    assert!(plan.calibration_line().is_none());
    assert!(plan.shapes.is_empty());
}

#[test]
fn set_image_leaves_other_plans_untouched() {
    let mut state = state_with(&["A", "B"]);
    furnish(&mut state.floor_plans[0]);
    furnish(&mut state.floor_plans[1]);
    let target = state.floor_plans[0].id;
    let other = state.floor_plans[1].clone();

    set_image(&mut state, target, "new.png").expect("set image");

    let untouched = state.floor_plan(&other.id).expect("other plan");
    assert_eq!(untouched, &other);
    assert_eq!(untouched.image_url(), "old.png");
    assert_eq!(untouched.image_dimensions(), Some(Size::new(100.0, 100.0)));
    assert_eq!(untouched.scale(), Some(10.0));
    assert!(untouched.calibration_line().is_some());
    assert_eq!(untouched.shapes.len(), 1);
    assert!(state.floor_plans[0].shapes.is_empty());
}

#[test]
fn resolve_dimensions_is_idempotent() {
    let mut state = state_with(&["A"]);
    let id = state.floor_plans[0].id;
    set_image(&mut state, id, "plan.png").expect("set image");

    assert!(resolve_image_dimensions(&mut state, id, Size::new(1200.0, 900.0)).expect("resolve"));
    assert!(!resolve_image_dimensions(&mut state, id, Size::new(1.0, 1.0)).expect("resolve again"));
    assert_eq!(state.floor_plans[0].image_dimensions(), Some(Size::new(1200.0, 900.0)));
}

#[test]
fn resolve_dimensions_requires_image_and_positive_size() {
    let mut state = state_with(&["A"]);
    let id = state.floor_plans[0].id;

    let err = resolve_image_dimensions(&mut state, id, Size::new(10.0, 10.0)).unwrap_err();
    assert_eq!(err.error_code(), "E_NO_IMAGE");

    set_image(&mut state, id, "plan.png").expect("set image");
    let err = resolve_image_dimensions(&mut state, id, Size::new(0.0, 10.0)).unwrap_err();
    assert_eq!(err.error_code(), "E_INVALID_DIMENSIONS");
    assert!(state.floor_plans[0].image_dimensions().is_none());
}
