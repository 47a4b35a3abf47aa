//! Errors surfaced by the simulation driver.

use skill_core::{EntityId, ErrorSeverity, GameError, OracleError, SkillId};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, SimulationError>;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SimulationError {
    #[error("{0} is not in the skill catalog")]
    UnknownSkill(SkillId),

    #[error("no entity {0} in the world")]
    UnknownEntity(EntityId),

    #[error("{0} is dead and cannot cast")]
    CasterDead(EntityId),

    #[error(transparent)]
    Oracle(#[from] OracleError),
}

impl GameError for SimulationError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            SimulationError::UnknownSkill(_) | SimulationError::UnknownEntity(_) => {
                ErrorSeverity::Validation
            }
            SimulationError::CasterDead(_) => ErrorSeverity::Recoverable,
            SimulationError::Oracle(err) => err.severity(),
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            SimulationError::UnknownSkill(_) => "SIM_UNKNOWN_SKILL",
            SimulationError::UnknownEntity(_) => "SIM_UNKNOWN_ENTITY",
            SimulationError::CasterDead(_) => "SIM_CASTER_DEAD",
            SimulationError::Oracle(err) => err.error_code(),
        }
    }
}
