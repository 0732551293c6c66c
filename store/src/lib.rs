//! Floor-plan workspace: the owner of all plans, shapes and calibrations.
//!
//! ARCHITECTURE
//! ============
//! The `canvas` crate is a pure geometry engine that emits intents. This
//! crate is the collaborator on the other side: it owns the [`AppState`]
//! tree, applies intents through the service functions, keeps the drawing
//! mode and pending calibration in a [`session::Session`], and persists the
//! tree after every mutation.
//!
//! | Module | Role |
//! |--------|------|
//! | [`services`] | Floor-plan, shape, calibration and persistence operations on an `AppState` |
//! | [`session`] | Controller tying the engine, drawing mode and storage together |
//! | [`storage`] | Key/value storage backends for the persisted JSON tree |
//! | [`config`] | Environment-driven configuration |
//!
//! [`AppState`]: canvas::doc::AppState

pub mod config;
pub mod services;
pub mod session;
pub mod storage;

/// Stable machine-readable code for an error, for callers that report
/// failures outside of Rust (CLI exit output, logs).
pub trait ErrorCode: std::fmt::Display {
    fn error_code(&self) -> &'static str;
}
