//! Persistence service — load and save the workspace tree.
//!
//! DESIGN
//! ======
//! The whole `AppState` is one JSON document under a single storage key. It
//! is read once when a session opens and rewritten after every mutation;
//! there is no partial or incremental save.
//!
//! ERROR HANDLING
//! ==============
//! A missing entry is a fresh workspace. An entry that cannot be read or
//! parsed is an error: the caller decides what to do, and nothing here ever
//! overwrites a document it failed to understand. Two inconsistencies are
//! repaired on load rather than rejected: an active id that no longer
//! resolves, and a plan carrying only one of `scale` and `calibrationLine`
//! (both are dropped).

use canvas::doc::AppState;
use tracing::{debug, info, warn};

use crate::storage::Storage;

#[derive(Debug, thiserror::Error)]
pub enum PersistenceError {
    #[error("storage read failed for {key}: {source}")]
    Read { key: String, source: std::io::Error },
    #[error("storage write failed for {key}: {source}")]
    Write { key: String, source: std::io::Error },
    #[error("stored state under {key} is corrupt: {source}")]
    Corrupt { key: String, source: serde_json::Error },
    #[error("state serialization failed: {0}")]
    Serialize(serde_json::Error),
}

impl crate::ErrorCode for PersistenceError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Read { .. } => "E_STORAGE_READ",
            Self::Write { .. } => "E_STORAGE_WRITE",
            Self::Corrupt { .. } => "E_STATE_CORRUPT",
            Self::Serialize(_) => "E_STATE_SERIALIZE",
        }
    }
}

/// Load the workspace stored under `key`, or an empty one if none exists.
///
/// # Errors
///
/// Returns `Read` on storage failure and `Corrupt` if the stored text is not
/// a valid workspace document.
pub fn load_state(storage: &impl Storage, key: &str) -> Result<AppState, PersistenceError> {
    let Some(raw) = storage.read(key).map_err(|source| PersistenceError::Read { key: key.to_string(), source })?
    else {
        info!(key, "no stored state; starting empty");
        return Ok(AppState::new());
    };

    let mut state: AppState =
        serde_json::from_str(&raw).map_err(|source| PersistenceError::Corrupt { key: key.to_string(), source })?;

    for plan in &mut state.floor_plans {
        if plan.scale().is_some() != plan.calibration_line().is_some() {
            warn!(key, plan_id = %plan.id, scale = ?plan.scale(), "half-present calibration; clearing");
            plan.clear_calibration();
        }
    }

    if let Some(active) = state.active_floor_plan_id {
        if state.floor_plan(&active).is_none() {
            let fallback = state.floor_plans.first().map(|fp| fp.id);
            warn!(key, %active, ?fallback, "active floor plan missing; falling back");
            state.active_floor_plan_id = fallback;
        }
    }

    info!(key, floor_plans = state.floor_plans.len(), "state loaded");
    Ok(state)
}

/// Write the whole workspace under `key`.
///
/// # Errors
///
/// Returns `Serialize` or `Write`.
pub fn save_state(storage: &mut impl Storage, key: &str, state: &AppState) -> Result<(), PersistenceError> {
    let raw = serde_json::to_string(state).map_err(PersistenceError::Serialize)?;
    storage
        .write(key, &raw)
        .map_err(|source| PersistenceError::Write { key: key.to_string(), source })?;
    debug!(key, bytes = raw.len(), "state saved");
    Ok(())
}

#[cfg(test)]
#[path = "persistence_test.rs"]
mod tests;
