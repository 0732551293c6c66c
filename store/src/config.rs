//! Workspace configuration parsed from environment variables.

use std::path::PathBuf;

use canvas::consts::{DEFAULT_CONTAINER_HEIGHT, DEFAULT_CONTAINER_WIDTH};
use canvas::mapper::Size;

/// Storage key the workspace tree is saved under.
pub const DEFAULT_STATE_KEY: &str = "floorplan-app-state";
pub const DEFAULT_STATE_DIR: &str = ".";

#[derive(Debug, Clone, PartialEq)]
pub struct StoreConfig {
    /// Directory holding `<key>.json`.
    pub state_dir: PathBuf,
    pub state_key: String,
    /// Container the image is fitted into.
    pub container: Size,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            state_dir: PathBuf::from(DEFAULT_STATE_DIR),
            state_key: DEFAULT_STATE_KEY.to_string(),
            container: Size::new(DEFAULT_CONTAINER_WIDTH, DEFAULT_CONTAINER_HEIGHT),
        }
    }
}

impl StoreConfig {
    /// Build config from environment variables.
    ///
    /// Optional:
    /// - `FLOORPLAN_STATE_DIR`: default `.`
    /// - `FLOORPLAN_STATE_KEY`: default `floorplan-app-state`
    /// - `FLOORPLAN_CONTAINER`: `WIDTHxHEIGHT`, default `800x600`; malformed
    ///   values fall back to the default
    #[must_use]
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let state_dir = std::env::var("FLOORPLAN_STATE_DIR").map_or(defaults.state_dir, PathBuf::from);
        let state_key = std::env::var("FLOORPLAN_STATE_KEY").unwrap_or(defaults.state_key);
        let container = match std::env::var("FLOORPLAN_CONTAINER") {
            Ok(raw) => parse_container(&raw).unwrap_or(defaults.container),
            Err(_) => defaults.container,
        };
        Self { state_dir, state_key, container }
    }
}

/// Parse `WIDTHxHEIGHT` (e.g. `1024x768`). Both sides must be positive.
#[must_use]
pub fn parse_container(raw: &str) -> Option<Size> {
    let (w, h) = raw.trim().split_once(['x', 'X'])?;
    let (Ok(width), Ok(height)) = (w.trim().parse::<f64>(), h.trim().parse::<f64>()) else {
        return None;
    };
    let size = Size::new(width, height);
    (size.is_positive() && width.is_finite() && height.is_finite()).then_some(size)
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
