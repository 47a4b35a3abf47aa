//! Immutable skill data.
//!
//! A [`SkillDefinition`] describes one cast: what shape it resolves, who it
//! may hit, how long it lasts and what it spawns. Definitions are authored as
//! data (see `skill-content`) and validated before the engine acts on them.
mod context;
mod definition;
mod error;
mod params;

pub use context::{CastContext, SpawnTransform};
pub use definition::{Affinity, DamageTiming, SkillCategory, SkillCues, SkillDefinition, SkillId};
pub use error::DefinitionError;
pub use params::{
    AoeShape, BoxExtents, BuffParams, ConeParams, MovementParams, ProjectileKind,
    ProjectileParams, SummonParams,
};
