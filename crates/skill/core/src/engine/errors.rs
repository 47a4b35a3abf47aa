//! Error types for skill casts.

use crate::env::OracleError;
use crate::error::{ErrorContext, ErrorSeverity, GameError};
use crate::skill::{DefinitionError, SkillId};

/// Why a cast produced no effect.
///
/// Every variant is local to one cast. Duplicate sessions and stale session
/// ticks are not errors: they surface as [`crate::combat::SessionEnd`] values.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum SkillError {
    /// Geometry or homing resolution found nothing to hit.
    #[error("{skill}: no valid target")]
    NoValidTarget {
        skill: SkillId,
        context: ErrorContext,
    },

    /// The definition cannot be executed as authored.
    #[error("{skill}: invalid configuration: {source}")]
    InvalidConfiguration {
        skill: SkillId,
        source: DefinitionError,
        context: ErrorContext,
    },

    #[error(transparent)]
    Oracle(#[from] OracleError),
}

impl SkillError {
    pub fn skill(&self) -> Option<SkillId> {
        match self {
            SkillError::NoValidTarget { skill, .. }
            | SkillError::InvalidConfiguration { skill, .. } => Some(*skill),
            SkillError::Oracle(_) => None,
        }
    }
}

impl GameError for SkillError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            SkillError::NoValidTarget { .. } => ErrorSeverity::Recoverable,
            SkillError::InvalidConfiguration { .. } => ErrorSeverity::Validation,
            SkillError::Oracle(err) => err.severity(),
        }
    }

    fn context(&self) -> Option<&ErrorContext> {
        match self {
            SkillError::NoValidTarget { context, .. }
            | SkillError::InvalidConfiguration { context, .. } => Some(context),
            SkillError::Oracle(_) => None,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            SkillError::NoValidTarget { .. } => "SKILL_NO_VALID_TARGET",
            SkillError::InvalidConfiguration { .. } => "SKILL_INVALID_CONFIGURATION",
            SkillError::Oracle(err) => err.error_code(),
        }
    }
}
