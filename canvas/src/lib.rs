//! Geometry engine for the floor-plan drawing surface.
//!
//! This crate owns everything that turns pointer gestures on a scaled image
//! into floor-plan mutations: converting between the image's native pixel
//! space and the fitted display surface, deriving a pixels-per-inch scale from
//! a reference line, hit-testing shapes, and the pointer state machine that
//! emits [`engine::Action`]s. It performs no I/O; the host (see the `store`
//! crate) owns the floor plans and applies the actions.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`engine`] | Testable [`engine::EngineCore`] and the [`engine::Action`] intents it emits |
//! | [`doc`] | Floor plan, shape and calibration data model |
//! | [`mapper`] | Stored/display coordinate conversions and fit-to-container sizing |
//! | [`calibrate`] | Pixels-per-inch computation from a reference line |
//! | [`units`] | Free-form length parsing (`5'6"`, `24"`, `24`) and formatting |
//! | [`input`] | Drawing modes and the gesture state machine states |
//! | [`hit`] | Hit-testing against rectangles and ovals |
//! | [`render`] | Backend-neutral draw command list |
//! | [`consts`] | Shared numeric constants (thresholds, defaults, colors) |

pub mod calibrate;
pub mod consts;
pub mod doc;
pub mod engine;
pub mod hit;
pub mod input;
pub mod mapper;
pub mod render;
pub mod units;
