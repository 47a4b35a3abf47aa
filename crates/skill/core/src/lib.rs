//! Frame-driven skill effect resolution.
//!
//! `skill-core` decides what a skill cast hits and keeps the effects that
//! outlive a frame running: continuous damage sessions, caster displacements
//! and projectiles. It never owns world entities. Hosts plug in through the
//! collaborator traits in [`env`] and receive every effect through an
//! [`env::EffectSink`]. All state mutation of the pipeline flows through
//! [`engine::SkillEngine`].
pub mod combat;
pub mod config;
pub mod engine;
pub mod env;
pub mod error;
pub mod motion;
pub mod projectile;
pub mod skill;
pub mod state;
pub mod targeting;

#[cfg(test)]
mod testing;

pub use combat::{
    ContinuousScheduler, DamageDispatcher, DispatchOutcome, SessionEnd, SessionId, SessionKey,
    TickSchedule,
};
pub use config::{SkillConfig, TieBreak};
pub use engine::{CastOutcome, CastResult, SkillEngine, SkillError, TickReport};
pub use env::{
    CollisionProbe, EffectSink, EntityOracle, Env, LayerMask, OracleError, SkillEnv,
    SpatialQuery, SummonSpawn,
};
pub use error::{ErrorContext, ErrorSeverity, GameError};
pub use motion::{
    DisplacementExecutor, DisplacementPhase, DisplacementRequest, DisplacementState, MotionCurve,
    MoveType,
};
pub use projectile::{Projectile, ProjectileEnd, ProjectileId, ProjectileSpawn, ProjectileStatus};
pub use skill::{
    Affinity, AoeShape, BoxExtents, BuffParams, CastContext, ConeParams, DamageTiming,
    DefinitionError, MovementParams, ProjectileKind, ProjectileParams, SkillCategory, SkillCues,
    SkillDefinition, SkillId, SpawnTransform, SummonParams,
};
pub use state::{DamageRoute, EntityId, EntityInfo, EntityKind, Faction, Facing, Frame, SlotIndex};
pub use targeting::{
    GeometryResolver, GizmoShape, HomingQuery, HomingSelection, HomingSelector, QueryShape,
    TargetValidator, TargetingMode,
};
