//! Collaborator access errors.

use crate::error::{ErrorSeverity, GameError};

/// Errors that occur when a required collaborator is missing from the [`super::Env`].
///
/// These are fatal for the cast in progress: without a spatial provider or an
/// entity oracle nothing can be resolved.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum OracleError {
    /// SpatialQuery is not available in the environment.
    #[error("SpatialQuery not available")]
    SpatialNotAvailable,

    /// EntityOracle is not available in the environment.
    #[error("EntityOracle not available")]
    EntitiesNotAvailable,

    /// CollisionProbe is not available in the environment.
    #[error("CollisionProbe not available")]
    ProbeNotAvailable,
}

impl GameError for OracleError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Fatal
    }

    fn error_code(&self) -> &'static str {
        match self {
            OracleError::SpatialNotAvailable => "ORACLE_SPATIAL_NOT_AVAILABLE",
            OracleError::EntitiesNotAvailable => "ORACLE_ENTITIES_NOT_AVAILABLE",
            OracleError::ProbeNotAvailable => "ORACLE_PROBE_NOT_AVAILABLE",
        }
    }
}
