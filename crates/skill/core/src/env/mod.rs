//! Traits describing the host world the skill pipeline runs against.
//!
//! Read-only collaborators (spatial queries, entity snapshots, collision
//! probes) are bundled in [`Env`]. Effects flow out through the separate
//! mutable [`EffectSink`], which keeps reads and writes from aliasing.
mod entities;
mod error;
mod probe;
mod sink;
mod spatial;

pub use entities::EntityOracle;
pub use error::OracleError;
pub use probe::CollisionProbe;
pub use sink::{EffectSink, SummonSpawn};
pub use spatial::{LayerMask, SpatialQuery};

/// Aggregates read-only collaborators required by the skill engine.
pub struct Env<'a, S, E, P>
where
    S: SpatialQuery + ?Sized,
    E: EntityOracle + ?Sized,
    P: CollisionProbe + ?Sized,
{
    spatial: Option<&'a S>,
    entities: Option<&'a E>,
    probe: Option<&'a P>,
}

// Manual impls: derives would demand `S: Clone`, which trait objects are not.
impl<S, E, P> Clone for Env<'_, S, E, P>
where
    S: SpatialQuery + ?Sized,
    E: EntityOracle + ?Sized,
    P: CollisionProbe + ?Sized,
{
    fn clone(&self) -> Self {
        *self
    }
}

impl<S, E, P> Copy for Env<'_, S, E, P>
where
    S: SpatialQuery + ?Sized,
    E: EntityOracle + ?Sized,
    P: CollisionProbe + ?Sized,
{
}

pub type SkillEnv<'a> =
    Env<'a, dyn SpatialQuery + 'a, dyn EntityOracle + 'a, dyn CollisionProbe + 'a>;

impl<'a, S, E, P> Env<'a, S, E, P>
where
    S: SpatialQuery + ?Sized,
    E: EntityOracle + ?Sized,
    P: CollisionProbe + ?Sized,
{
    pub fn new(spatial: Option<&'a S>, entities: Option<&'a E>, probe: Option<&'a P>) -> Self {
        Self {
            spatial,
            entities,
            probe,
        }
    }

    pub fn with_all(spatial: &'a S, entities: &'a E, probe: &'a P) -> Self {
        Self::new(Some(spatial), Some(entities), Some(probe))
    }

    pub fn empty() -> Self {
        Self {
            spatial: None,
            entities: None,
            probe: None,
        }
    }

    /// Returns the SpatialQuery, or an error if not available.
    ///
    /// # Errors
    ///
    /// Returns `OracleError::SpatialNotAvailable` if no spatial provider was given.
    pub fn spatial(&self) -> Result<&'a S, OracleError> {
        self.spatial.ok_or(OracleError::SpatialNotAvailable)
    }

    /// Returns the EntityOracle, or an error if not available.
    ///
    /// # Errors
    ///
    /// Returns `OracleError::EntitiesNotAvailable` if no entity oracle was given.
    pub fn entities(&self) -> Result<&'a E, OracleError> {
        self.entities.ok_or(OracleError::EntitiesNotAvailable)
    }

    /// Returns the CollisionProbe, or an error if not available.
    ///
    /// # Errors
    ///
    /// Returns `OracleError::ProbeNotAvailable` if no probe was given.
    pub fn probe(&self) -> Result<&'a P, OracleError> {
        self.probe.ok_or(OracleError::ProbeNotAvailable)
    }
}

impl<'a, S, E, P> Env<'a, S, E, P>
where
    S: SpatialQuery + 'a,
    E: EntityOracle + 'a,
    P: CollisionProbe + 'a,
{
    /// Converts this environment into a trait-object based `SkillEnv`.
    pub fn into_skill_env(self) -> SkillEnv<'a> {
        let spatial: Option<&'a dyn SpatialQuery> = self.spatial.map(|spatial| spatial as _);
        let entities: Option<&'a dyn EntityOracle> = self.entities.map(|entities| entities as _);
        let probe: Option<&'a dyn CollisionProbe> = self.probe.map(|probe| probe as _);
        Env::new(spatial, entities, probe)
    }
}
