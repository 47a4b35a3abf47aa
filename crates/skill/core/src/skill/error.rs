//! Skill definition validation errors.

use crate::config::SkillConfig;
use crate::error::{ErrorSeverity, GameError};

/// Reasons a [`super::SkillDefinition`] cannot be executed.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum DefinitionError {
    #[error("tick interval must be positive for time-window skills (got {0})")]
    NonPositiveTickInterval(f32),

    #[error("time-window duration must be positive (got {0})")]
    NonPositiveDuration(f32),

    #[error("cone angle must be in (0, 360] degrees (got {0})")]
    ConeAngleOutOfRange(f32),

    #[error("{field} must not be negative (got {value})")]
    NegativeValue { field: &'static str, value: f32 },

    #[error("projectile skill has no projectile parameters")]
    MissingProjectile,

    #[error("projectile skill has no prefab reference")]
    MissingProjectilePrefab,

    #[error("homing count {count} outside 1..={max}", max = SkillConfig::MAX_HOMING_TARGETS)]
    HomingCountOutOfRange { count: u8 },

    #[error("summon skill has no summon parameters")]
    MissingSummon,

    #[error("summon skill has no prefab reference")]
    MissingSummonPrefab,

    #[error("buff skill has no buff parameters")]
    MissingBuff,

    #[error("motion curve keyframes are not sorted by time")]
    UnsortedKeyframes,
}

impl GameError for DefinitionError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Validation
    }

    fn error_code(&self) -> &'static str {
        use DefinitionError::*;
        match self {
            NonPositiveTickInterval(_) => "DEFINITION_NON_POSITIVE_TICK_INTERVAL",
            NonPositiveDuration(_) => "DEFINITION_NON_POSITIVE_DURATION",
            ConeAngleOutOfRange(_) => "DEFINITION_CONE_ANGLE_OUT_OF_RANGE",
            NegativeValue { .. } => "DEFINITION_NEGATIVE_VALUE",
            MissingProjectile => "DEFINITION_MISSING_PROJECTILE",
            MissingProjectilePrefab => "DEFINITION_MISSING_PROJECTILE_PREFAB",
            HomingCountOutOfRange { .. } => "DEFINITION_HOMING_COUNT_OUT_OF_RANGE",
            MissingSummon => "DEFINITION_MISSING_SUMMON",
            MissingSummonPrefab => "DEFINITION_MISSING_SUMMON_PREFAB",
            MissingBuff => "DEFINITION_MISSING_BUFF",
            UnsortedKeyframes => "DEFINITION_UNSORTED_KEYFRAMES",
        }
    }
}
