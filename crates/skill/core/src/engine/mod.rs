//! Skill engine facade.
//!
//! [`SkillEngine`] is the single entry point hosts talk to: it validates and
//! executes casts, owns every piece of state that outlives a frame
//! (continuous sessions, displacements, projectiles) and advances that state
//! once per driver frame.
//!
//! Within a frame the order is fixed: continuous sessions, then
//! displacements, then projectiles.
mod errors;

use std::collections::BTreeMap;

use glam::Vec2;

pub use errors::SkillError;

use crate::combat::{
    ContinuousScheduler, DamageDispatcher, SessionEnd, SessionId, SessionKey,
};
use crate::config::SkillConfig;
use crate::env::{EffectSink, OracleError, SkillEnv, SummonSpawn};
use crate::error::ErrorContext;
use crate::motion::{DisplacementExecutor, DisplacementPhase, DisplacementRequest};
use crate::projectile::{Projectile, ProjectileEnd, ProjectileId, ProjectileSpawn, ProjectileStatus};
use crate::skill::{
    CastContext, DefinitionError, MovementParams, ProjectileKind, SkillCategory, SkillDefinition,
};
use crate::state::{EntityId, Frame, SlotIndex};
use crate::targeting::{GeometryResolver, GizmoShape, HomingQuery, HomingSelector};

/// Spacing between consecutive summons of one cast, in caster-local x.
const SUMMON_SPACING: f32 = 1.0;

/// What a successful cast did.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CastOutcome {
    /// Entities damaged, healed or buffed on cast.
    pub targets: Vec<EntityId>,
    /// Continuous session registered by a time-window skill.
    pub session: Option<SessionId>,
    pub projectiles: Vec<ProjectileId>,
    pub summons: u8,
    /// The caster started a displacement.
    pub displaced: bool,
}

impl CastOutcome {
    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
            && self.session.is_none()
            && self.projectiles.is_empty()
            && self.summons == 0
            && !self.displaced
    }
}

/// Result of [`SkillEngine::cast`].
#[derive(Clone, Debug, PartialEq)]
pub enum CastResult {
    Success(CastOutcome),
    /// Nothing to hit; the cast had no effect.
    NoTarget,
    Failure(SkillError),
}

impl CastResult {
    pub fn is_success(&self) -> bool {
        matches!(self, CastResult::Success(_))
    }

    pub fn outcome(&self) -> Option<&CastOutcome> {
        match self {
            CastResult::Success(outcome) => Some(outcome),
            _ => None,
        }
    }
}

impl From<Result<CastOutcome, SkillError>> for CastResult {
    fn from(result: Result<CastOutcome, SkillError>) -> Self {
        match result {
            Ok(outcome) => CastResult::Success(outcome),
            Err(SkillError::NoValidTarget { .. }) => CastResult::NoTarget,
            Err(err) => CastResult::Failure(err),
        }
    }
}

/// Per-frame summary returned by [`SkillEngine::tick`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TickReport {
    /// Frame that was just processed.
    pub frame: Frame,
    pub ticks_fired: u32,
    /// Damage and heal applications made by continuous sessions.
    pub applications: u32,
    pub sessions_finished: Vec<(SessionKey, SessionEnd)>,
    pub displacements_finished: Vec<(EntityId, DisplacementPhase)>,
    pub projectiles_finished: Vec<(ProjectileId, ProjectileEnd)>,
    pub projectiles_alive: usize,
}

/// Executes skills and drives their frame-spanning effects.
#[derive(Debug, Default)]
pub struct SkillEngine {
    config: SkillConfig,
    scheduler: ContinuousScheduler,
    displacements: BTreeMap<EntityId, DisplacementExecutor>,
    projectiles: Vec<Projectile>,
    next_projectile: u32,
    frame: Frame,
}

impl SkillEngine {
    pub fn new(config: SkillConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    pub fn config(&self) -> &SkillConfig {
        &self.config
    }

    pub fn frame(&self) -> Frame {
        self.frame
    }

    pub fn scheduler(&self) -> &ContinuousScheduler {
        &self.scheduler
    }

    pub fn is_session_active(&self, caster: EntityId, slot: SlotIndex) -> bool {
        self.scheduler.is_active(SessionKey::new(caster, slot))
    }

    pub fn displacement(&self, entity: EntityId) -> Option<&DisplacementExecutor> {
        self.displacements.get(&entity)
    }

    pub fn projectiles(&self) -> &[Projectile] {
        &self.projectiles
    }

    /// Casts `skill` from `ctx`, fired from `slot`.
    ///
    /// Failures never escape as panics or affect other casts: they are logged
    /// and reported through the returned [`CastResult`].
    pub fn cast(
        &mut self,
        skill: &SkillDefinition,
        ctx: &CastContext,
        slot: SlotIndex,
        env: &SkillEnv<'_>,
        sink: &mut dyn EffectSink,
    ) -> CastResult {
        let result = self.try_cast(skill, ctx, slot, env, sink);
        match &result {
            Ok(outcome) => tracing::debug!(
                skill = %skill.id,
                caster = %ctx.caster,
                targets = outcome.targets.len(),
                projectiles = outcome.projectiles.len(),
                "cast resolved"
            ),
            Err(err @ SkillError::NoValidTarget { .. }) => {
                tracing::warn!(caster = %ctx.caster, "{err}");
            }
            Err(err) => tracing::error!(caster = %ctx.caster, "cast failed: {err}"),
        }
        result.into()
    }

    /// Same as [`Self::cast`] but returns the raw result.
    ///
    /// # Errors
    ///
    /// Returns [`SkillError`] when the definition is invalid, a collaborator
    /// is missing, or nothing could be targeted.
    pub fn try_cast(
        &mut self,
        skill: &SkillDefinition,
        ctx: &CastContext,
        slot: SlotIndex,
        env: &SkillEnv<'_>,
        sink: &mut dyn EffectSink,
    ) -> Result<CastOutcome, SkillError> {
        skill
            .validate()
            .map_err(|source| self.invalid(skill, ctx, source))?;

        if let Some(cue) = &skill.cues.start {
            sink.play_cue(cue);
        }

        let mut outcome = CastOutcome::default();
        if let Some(movement) = &skill.movement {
            self.start_displacement(ctx, movement, sink);
            outcome.displaced = true;
        }

        match skill.category {
            category if category.is_damaging() || category == SkillCategory::Heal => {
                if skill.timing.is_time_window() {
                    outcome.session =
                        self.scheduler.start(SessionKey::new(ctx.caster, slot), skill, *ctx);
                } else {
                    outcome.targets = self.apply_instant(skill, ctx, env, sink)?;
                }
            }
            SkillCategory::Buff => {
                let buff = skill
                    .buff
                    .ok_or_else(|| self.invalid(skill, ctx, DefinitionError::MissingBuff))?;
                let targets = self.instant_targets(skill, ctx, env)?;
                for target in &targets {
                    sink.apply_buff(*target, buff);
                }
                outcome.targets = targets;
            }
            SkillCategory::Summon => outcome.summons = self.spawn_summons(skill, ctx, sink)?,
            SkillCategory::Projectile => {
                outcome.projectiles = self.spawn_projectiles(skill, ctx, env, sink)?;
            }
            _ => {}
        }

        if outcome.is_empty() {
            return Err(SkillError::NoValidTarget {
                skill: skill.id,
                context: self.context(ctx),
            });
        }
        Ok(outcome)
    }

    /// Removes the `(caster, slot)` session. It stops at its next tick.
    pub fn stop_continuous(&mut self, caster: EntityId, slot: SlotIndex) -> bool {
        self.scheduler.stop(SessionKey::new(caster, slot))
    }

    /// Stops everything `caster` owns: sessions, its displacement and any
    /// attached damage-over-time projectiles.
    pub fn stop_caster(&mut self, caster: EntityId, sink: &mut dyn EffectSink) {
        let sessions = self.scheduler.stop_caster(caster);
        if let Some(mut displacement) = self.displacements.remove(&caster) {
            displacement.cancel(sink);
        }
        self.projectiles.retain(|projectile| {
            let owned = projectile.owner() == caster && projectile.is_attached();
            if owned {
                sink.despawn_projectile(projectile.id());
            }
            !owned
        });
        tracing::debug!(%caster, sessions, "caster stopped");
    }

    /// Advances all frame-spanning state by `dt` seconds.
    ///
    /// # Errors
    ///
    /// Returns [`OracleError`] if the spatial provider or entity oracle is
    /// missing. The collision probe is optional.
    pub fn tick(
        &mut self,
        dt: f32,
        env: &SkillEnv<'_>,
        sink: &mut dyn EffectSink,
    ) -> Result<TickReport, OracleError> {
        let resolver = GeometryResolver::from_env(env, &self.config)?;
        let probe = env.probe().ok();

        let sessions = self.scheduler.tick(dt, &resolver, sink);

        let mut displacements_finished = Vec::new();
        self.displacements.retain(|entity, displacement| {
            let phase = displacement.tick(dt, probe, sink);
            if phase == DisplacementPhase::Moving {
                return true;
            }
            displacements_finished.push((*entity, phase));
            false
        });

        let mut projectiles_finished = Vec::new();
        let config = &self.config;
        self.projectiles.retain_mut(|projectile| {
            match projectile.advance(dt, &resolver, config, sink) {
                ProjectileStatus::Finished(end) => {
                    sink.despawn_projectile(projectile.id());
                    projectiles_finished.push((projectile.id(), end));
                    false
                }
                ProjectileStatus::Flying | ProjectileStatus::Attached(_) => true,
            }
        });

        let report = TickReport {
            frame: self.frame,
            ticks_fired: sessions.ticks_fired,
            applications: sessions.applications,
            sessions_finished: sessions.finished,
            displacements_finished,
            projectiles_finished,
            projectiles_alive: self.projectiles.len(),
        };
        tracing::trace!(
            frame = %self.frame,
            ticks = report.ticks_fired,
            projectiles = report.projectiles_alive,
            "frame advanced"
        );
        self.frame = self.frame.next();
        Ok(report)
    }

    /// Debug shape of `skill` as it would resolve from `ctx`.
    pub fn gizmo(&self, skill: &SkillDefinition, ctx: &CastContext) -> GizmoShape {
        GizmoShape::for_skill(skill, ctx)
    }

    fn context(&self, ctx: &CastContext) -> ErrorContext {
        ErrorContext::new(self.frame.0)
            .with_caster(ctx.caster)
            .with_position(ctx.position)
    }

    fn invalid(
        &self,
        skill: &SkillDefinition,
        ctx: &CastContext,
        source: DefinitionError,
    ) -> SkillError {
        SkillError::InvalidConfiguration {
            skill: skill.id,
            source,
            context: self.context(ctx),
        }
    }

    fn start_displacement(
        &mut self,
        ctx: &CastContext,
        movement: &MovementParams,
        sink: &mut dyn EffectSink,
    ) {
        let request = DisplacementRequest::from_params(movement, ctx.facing);
        self.displacements
            .entry(ctx.caster)
            .or_insert_with(|| DisplacementExecutor::new(ctx.caster))
            .start(ctx.position, request, sink);
    }

    fn instant_targets(
        &self,
        skill: &SkillDefinition,
        ctx: &CastContext,
        env: &SkillEnv<'_>,
    ) -> Result<Vec<EntityId>, SkillError> {
        if skill.is_self_cast() {
            return Ok(vec![ctx.caster]);
        }
        let resolver = GeometryResolver::from_env(env, &self.config)?;
        Ok(resolver.resolve_targets(skill, ctx))
    }

    fn apply_instant(
        &self,
        skill: &SkillDefinition,
        ctx: &CastContext,
        env: &SkillEnv<'_>,
        sink: &mut dyn EffectSink,
    ) -> Result<Vec<EntityId>, SkillError> {
        let targets = self.instant_targets(skill, ctx, env)?;
        let dispatcher =
            DamageDispatcher::new(env.entities()?).with_hit_cue(skill.cues.hit.as_deref());
        let amount = skill.hit_amount();

        Ok(targets
            .into_iter()
            .filter(|target| {
                let outcome = match skill.category {
                    SkillCategory::Heal => dispatcher.heal(*target, amount, sink),
                    _ => dispatcher.apply(*target, amount, sink),
                };
                outcome.is_applied()
            })
            .collect())
    }

    fn spawn_summons(
        &self,
        skill: &SkillDefinition,
        ctx: &CastContext,
        sink: &mut dyn EffectSink,
    ) -> Result<u8, SkillError> {
        let params = skill
            .summon
            .as_ref()
            .ok_or_else(|| self.invalid(skill, ctx, DefinitionError::MissingSummon))?;
        let prefab = params
            .prefab
            .as_deref()
            .ok_or_else(|| self.invalid(skill, ctx, DefinitionError::MissingSummonPrefab))?;

        let (anchor, facing) = match ctx.spawn {
            Some(spawn) => (spawn.position, spawn.facing),
            None => (ctx.position + ctx.facing.mirror(params.offset), ctx.facing),
        };
        for index in 0..params.count {
            let spread = facing.mirror(Vec2::new(f32::from(index) * SUMMON_SPACING, 0.0));
            sink.spawn_summon(&SummonSpawn {
                owner: ctx.caster,
                faction: ctx.faction,
                prefab: prefab.to_owned(),
                position: anchor + spread,
                lifetime: params.lifetime,
            });
        }
        Ok(params.count)
    }

    fn spawn_projectiles(
        &mut self,
        skill: &SkillDefinition,
        ctx: &CastContext,
        env: &SkillEnv<'_>,
        sink: &mut dyn EffectSink,
    ) -> Result<Vec<ProjectileId>, SkillError> {
        let params = skill
            .projectile
            .as_ref()
            .ok_or_else(|| self.invalid(skill, ctx, DefinitionError::MissingProjectile))?;
        let prefab = params
            .prefab
            .clone()
            .ok_or_else(|| self.invalid(skill, ctx, DefinitionError::MissingProjectilePrefab))?;

        let (origin, facing) = match ctx.spawn {
            Some(spawn) => (spawn.position, spawn.facing),
            None => (ctx.position + ctx.facing.mirror(params.spawn_offset), ctx.facing),
        };

        // (lock, initial direction) per projectile
        let launches: Vec<(Option<EntityId>, Vec2)> = match params.kind {
            ProjectileKind::Homing => {
                let resolver = GeometryResolver::from_env(env, &self.config)?;
                let query = HomingQuery {
                    origin,
                    radius: params.homing_radius,
                    affinity: skill.affinity,
                    max_count: usize::from(params.homing_count),
                    facing,
                };
                let selection =
                    HomingSelector::new(&resolver).select_targets(&query, &ctx.validator());
                selection
                    .into_iter()
                    .map(|target| {
                        let direction = resolver
                            .entities()
                            .entity(target)
                            .map(|info| (info.position - origin).normalize_or(facing.vector()))
                            .unwrap_or(facing.vector());
                        (Some(target), direction)
                    })
                    .collect()
            }
            ProjectileKind::Standard | ProjectileKind::Dot | ProjectileKind::Aoe => {
                vec![(None, facing.vector())]
            }
        };

        let mut spawned = Vec::with_capacity(launches.len());
        for (homing_target, direction) in launches {
            let id = ProjectileId(self.next_projectile);
            self.next_projectile = self.next_projectile.wrapping_add(1);

            let spawn = ProjectileSpawn {
                id,
                owner: ctx.caster,
                faction: ctx.faction,
                skill: skill.id,
                prefab: prefab.clone(),
                kind: params.kind,
                position: origin,
                direction,
                homing_target,
            };
            sink.spawn_projectile(&spawn);
            self.projectiles.push(Projectile::new(spawn, skill, params));
            spawned.push(id);
        }
        tracing::debug!(
            skill = %skill.id,
            count = spawned.len(),
            kind = %params.kind,
            "projectiles spawned"
        );
        Ok(spawned)
    }
}
