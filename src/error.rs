//! Error taxonomy for the simulation core
//!
//! Running out of balls is not an error: it is the `GameOver` phase
//! transition reported by the simulation loop.

use thiserror::Error;

/// Errors that can occur while loading a level or resolving a tick.
#[derive(Debug, Error)]
pub enum SimError {
    /// An entity with a degenerate shape reached collision resolution.
    #[error("invalid geometry for {entity}: {reason}")]
    InvalidGeometry {
        entity: &'static str,
        reason: String,
    },

    /// Level descriptor with inconsistent grid dimensions or cells.
    #[error("invalid level descriptor: {0}")]
    InvalidLevelDescriptor(String),

    /// Level descriptor text could not be decoded.
    #[error("level descriptor parse error: {0}")]
    LevelParse(#[from] serde_json::Error),
}

impl SimError {
    pub(crate) fn geometry(entity: &'static str, reason: impl Into<String>) -> Self {
        SimError::InvalidGeometry {
            entity,
            reason: reason.into(),
        }
    }
}
