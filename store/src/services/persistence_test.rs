#![allow(clippy::float_cmp)]

use super::*;
use crate::ErrorCode;
use crate::storage::MemoryStorage;
use canvas::calibrate::calibrate;
use canvas::doc::{FloorPlan, Shape, ShapeKind};
use canvas::mapper::{Point, Size};

const KEY: &str = "floorplan-app-state";

fn populated_state() -> AppState {
    let mut plan = FloorPlan::new("Ground");
    plan.set_image("data:image/png;base64,AAAA");
    plan.resolve_image_dimensions(Size::new(1600.0, 1200.0));
    plan.set_calibration(calibrate(Point::new(0.0, 0.0), Point::new(0.0, 240.0), 24.0).expect("calibrate"));
    plan.shapes
        .push(Shape::new(ShapeKind::Oval, Point::new(10.0, 20.0), Size::new(50.0, 30.0), 10.0, "Table"));
    let mut state = AppState::new();
    state.active_floor_plan_id = Some(plan.id);
    state.floor_plans.push(plan);
    state
}

// =============================================================================
// load
// =============================================================================

#[test]
fn missing_entry_loads_empty_state() {
    let storage = MemoryStorage::new();
    let state = load_state(&storage, KEY).expect("load");
    assert!(state.floor_plans.is_empty());
    assert_eq!(state.active_floor_plan_id, None);
}

#[test]
fn saved_state_loads_back_equal() {
    let mut storage = MemoryStorage::new();
    let state = populated_state();
    save_state(&mut storage, KEY, &state).expect("save");
    assert_eq!(load_state(&storage, KEY).expect("load"), state);
}

#[test]
fn corrupt_entry_is_an_error_and_left_in_place() {
    let mut storage = MemoryStorage::new();
    storage.write(KEY, "{not json").expect("seed");

    let err = load_state(&storage, KEY).unwrap_err();
    assert_eq!(err.error_code(), "E_STATE_CORRUPT");
    assert_eq!(storage.read(KEY).expect("read").as_deref(), Some("{not json"));
}

#[test]
fn dangling_active_id_falls_back_to_first_plan() {
    let mut storage = MemoryStorage::new();
    let mut state = populated_state();
    let first = state.floor_plans[0].id;
    state.active_floor_plan_id = Some(uuid::Uuid::new_v4());
    save_state(&mut storage, KEY, &state).expect("save");

    let loaded = load_state(&storage, KEY).expect("load");
    assert_eq!(loaded.active_floor_plan_id, Some(first));
}

// =============================================================================
// wire format
// =============================================================================

#[test]
fn saved_document_uses_camel_case_keys() {
    let mut storage = MemoryStorage::new();
    save_state(&mut storage, KEY, &populated_state()).expect("save");
    let raw = storage.read(KEY).expect("read").expect("present");
    let json: serde_json::Value = serde_json::from_str(&raw).expect("valid json");

    let plan = &json["floorPlans"][0];
    assert!(json["activeFloorPlanId"].is_string());
    assert_eq!(plan["imageUrl"], "data:image/png;base64,AAAA");
    assert_eq!(plan["originalImageDimensions"]["width"], 1600.0);
    assert_eq!(plan["scale"], 10.0);
    assert_eq!(plan["calibrationLine"]["lengthInInches"], 24.0);
    assert_eq!(plan["shapes"][0]["type"], "oval");
    assert_eq!(plan["shapes"][0]["sizeInInches"]["width"], 5.0);
}

#[test]
fn loads_document_written_by_earlier_versions() {
    let raw = r#"{
        "floorPlans": [{
            "id": "6f1c2a7e-3d1b-4f7e-9a53-0b6f2f1c9d11",
            "name": "Upstairs",
            "imageUrl": "plan.png",
            "scale": null,
            "shapes": []
        }],
        "activeFloorPlanId": "6f1c2a7e-3d1b-4f7e-9a53-0b6f2f1c9d11"
    }"#;
    let mut storage = MemoryStorage::new();
    storage.write(KEY, raw).expect("seed");

    let state = load_state(&storage, KEY).expect("load");
    let plan = state.active_floor_plan().expect("active plan");
    assert_eq!(plan.name, "Upstairs");
    assert!(plan.image_dimensions().is_none());
    assert!(!plan.is_calibrated());
}

#[test]
fn scale_without_calibration_line_is_cleared_on_load() {
    let raw = r#"{
        "floorPlans": [{
            "id": "0d7e4c2b-8a61-4a4f-b1d3-5c9e2f7a6b10",
            "name": "A",
            "imageUrl": "x",
            "scale": 10.0,
            "shapes": []
        }],
        "activeFloorPlanId": "0d7e4c2b-8a61-4a4f-b1d3-5c9e2f7a6b10"
    }"#;
    let mut storage = MemoryStorage::new();
    storage.write(KEY, raw).expect("seed");

    let state = load_state(&storage, KEY).expect("load");
    let plan = state.active_floor_plan().expect("active plan");
    assert_eq!(plan.scale(), None);
    assert!(plan.calibration_line().is_none());
}

#[test]
fn calibration_line_without_scale_is_cleared_on_load() {
    let raw = r#"{
        "floorPlans": [{
            "id": "0d7e4c2b-8a61-4a4f-b1d3-5c9e2f7a6b10",
            "name": "A",
            "imageUrl": "x",
            "scale": null,
            "calibrationLine": {
                "start": { "x": 0.0, "y": 0.0 },
                "end": { "x": 100.0, "y": 0.0 },
                "lengthInInches": 10.0
            },
            "shapes": []
        }],
        "activeFloorPlanId": "0d7e4c2b-8a61-4a4f-b1d3-5c9e2f7a6b10"
    }"#;
    let mut storage = MemoryStorage::new();
    storage.write(KEY, raw).expect("seed");

    let state = load_state(&storage, KEY).expect("load");
    let plan = state.active_floor_plan().expect("active plan");
    assert_eq!(plan.scale(), None);
    assert!(plan.calibration_line().is_none());
}

#[test]
fn consistent_calibration_survives_load() {
    let mut storage = MemoryStorage::new();
    save_state(&mut storage, KEY, &populated_state()).expect("save");
    let state = load_state(&storage, KEY).expect("load");
    let plan = state.active_floor_plan().expect("active plan");
    assert_eq!(plan.scale(), Some(10.0));
    assert!(plan.calibration_line().is_some());
}
