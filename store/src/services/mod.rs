//! Workspace services.
//!
//! ARCHITECTURE
//! ============
//! Each service is a set of free functions over `&mut AppState` that validate
//! their inputs, mutate exactly one plan, and log the outcome. They never
//! persist; the session decides when to write.

pub mod calibration;
pub mod floor_plan;
pub mod persistence;
pub mod shape;
