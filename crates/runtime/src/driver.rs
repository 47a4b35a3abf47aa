//! Fixed-step frame driver.
use serde::Serialize;
use skill_content::SkillCatalog;
use skill_core::{
    CastContext, CastResult, EntityId, Frame, GameError, SkillConfig, SkillEngine, SkillId,
    SlotIndex, TickReport,
};

use crate::error::{Result, SimulationError};
use crate::events::{CommandBuffer, EventLog, SimEvent};
use crate::world::{Hit, MemoryWorld};

/// Aggregate counters over a [`Simulation::run`].
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct RunSummary {
    pub frames: u32,
    pub ticks_fired: u32,
    pub applications: u32,
    pub sessions_finished: usize,
    pub projectiles_finished: usize,
}

impl RunSummary {
    fn record(&mut self, report: &TickReport) {
        self.frames += 1;
        self.ticks_fired += report.ticks_fired;
        self.applications += report.applications;
        self.sessions_finished += report.sessions_finished.len();
        self.projectiles_finished += report.projectiles_finished.len();
    }
}

/// A [`SkillEngine`] running over a [`MemoryWorld`].
pub struct Simulation {
    world: MemoryWorld,
    engine: SkillEngine,
    catalog: SkillCatalog,
    log: EventLog,
    dt: f32,
}

impl Simulation {
    pub fn new(
        world: MemoryWorld,
        catalog: SkillCatalog,
        config: SkillConfig,
        frame_rate: f32,
    ) -> Self {
        Self {
            world,
            engine: SkillEngine::new(config),
            catalog,
            log: EventLog::default(),
            dt: 1.0 / frame_rate.max(1.0),
        }
    }

    pub fn world(&self) -> &MemoryWorld {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut MemoryWorld {
        &mut self.world
    }

    pub fn engine(&self) -> &SkillEngine {
        &self.engine
    }

    pub fn catalog(&self) -> &SkillCatalog {
        &self.catalog
    }

    pub fn log(&self) -> &EventLog {
        &self.log
    }

    pub fn dt(&self) -> f32 {
        self.dt
    }

    pub fn frame(&self) -> Frame {
        self.engine.frame()
    }

    /// Casts catalog skill `skill` from `caster`'s current position and facing.
    ///
    /// # Errors
    ///
    /// Fails when the skill or caster is unknown or the caster is dead. Engine
    /// level failures come back inside the [`CastResult`].
    pub fn cast(
        &mut self,
        caster: EntityId,
        skill: SkillId,
        slot: SlotIndex,
    ) -> Result<CastResult> {
        let body = self
            .world
            .body(caster)
            .ok_or(SimulationError::UnknownEntity(caster))?;
        if !body.is_alive() {
            return Err(SimulationError::CasterDead(caster));
        }
        let ctx = CastContext::from_entity(&body.info);
        self.cast_with(&ctx, skill, slot)
    }

    /// Casts with an explicit context (custom attack point or spawn transform).
    pub fn cast_with(
        &mut self,
        ctx: &CastContext,
        skill: SkillId,
        slot: SlotIndex,
    ) -> Result<CastResult> {
        let definition = self
            .catalog
            .get(skill)
            .ok_or(SimulationError::UnknownSkill(skill))?;

        let mut buffer = CommandBuffer::default();
        let env = self.world.env();
        let result = self.engine.cast(definition, ctx, slot, &env, &mut buffer);

        let frame = self.engine.frame();
        self.log.push(
            frame,
            SimEvent::CastStarted {
                caster: ctx.caster,
                skill,
                slot,
            },
        );
        if let CastResult::Failure(err) = &result {
            self.log.push(
                frame,
                SimEvent::CastRejected {
                    caster: ctx.caster,
                    skill,
                    code: err.error_code().to_string(),
                    reason: err.to_string(),
                },
            );
        }
        self.apply(frame, buffer);
        Ok(result)
    }

    /// Removes the `(caster, slot)` continuous session.
    pub fn stop(&mut self, caster: EntityId, slot: SlotIndex) -> bool {
        self.engine.stop_continuous(caster, slot)
    }

    /// Advances one frame: engine first, then deaths, then world timers.
    ///
    /// # Errors
    ///
    /// Propagates a missing collaborator from the engine. `MemoryWorld`
    /// provides all of them, so this only fails for custom environments.
    pub fn step(&mut self) -> Result<TickReport> {
        let frame = self.engine.frame();
        let mut buffer = CommandBuffer::default();
        let env = self.world.env();
        let report = self.engine.tick(self.dt, &env, &mut buffer)?;
        self.apply(frame, buffer);

        for entity in self.world.advance(self.dt) {
            tracing::debug!(%entity, "summon expired");
            self.log.push(frame, SimEvent::Despawned { entity });
            self.release(frame, entity);
        }
        Ok(report)
    }

    /// Runs `frames` frames.
    pub fn run(&mut self, frames: u32) -> Result<RunSummary> {
        let mut summary = RunSummary::default();
        for _ in 0..frames {
            let report = self.step()?;
            summary.record(&report);
        }
        Ok(summary)
    }

    // Stops everything an entity that left play still owns.
    fn release(&mut self, frame: Frame, entity: EntityId) {
        let mut buffer = CommandBuffer::default();
        self.engine.stop_caster(entity, &mut buffer);
        self.apply(frame, buffer);
    }

    fn apply(&mut self, frame: Frame, buffer: CommandBuffer) {
        let mut died = Vec::new();
        for event in buffer.into_events() {
            let event = match event {
                SimEvent::Damage {
                    target,
                    amount,
                    route,
                } => match self.world.damage(target, amount) {
                    Hit::Ignored => SimEvent::Blocked { target, amount },
                    Hit::Wounded => SimEvent::Damage {
                        target,
                        amount,
                        route,
                    },
                    Hit::Killed => {
                        died.push(target);
                        SimEvent::Damage {
                            target,
                            amount,
                            route,
                        }
                    }
                },
                SimEvent::Heal { target, amount } => SimEvent::Heal {
                    target,
                    amount: self.world.heal(target, amount),
                },
                SimEvent::Buff { target, buff } => {
                    if !self.world.apply_buff(target, buff) {
                        continue;
                    }
                    SimEvent::Buff { target, buff }
                }
                SimEvent::ProjectileSpawned { spawn } => {
                    self.world.track_projectile(spawn.id, spawn.position);
                    SimEvent::ProjectileSpawned { spawn }
                }
                SimEvent::ProjectileMoved { id, position } => {
                    self.world.track_projectile(id, position);
                    SimEvent::ProjectileMoved { id, position }
                }
                SimEvent::ProjectileDespawned { id } => {
                    self.world.untrack_projectile(id);
                    SimEvent::ProjectileDespawned { id }
                }
                SimEvent::SummonSpawned { summon, .. } => SimEvent::SummonSpawned {
                    entity: self.world.spawn_summon(&summon),
                    summon,
                },
                SimEvent::Moved { entity, position } => {
                    self.world.move_entity(entity, position);
                    SimEvent::Moved { entity, position }
                }
                SimEvent::Invincible { entity, on } => {
                    self.world.set_invincible(entity, on);
                    SimEvent::Invincible { entity, on }
                }
                other => other,
            };
            self.log.push(frame, event);
        }

        for entity in died {
            tracing::info!(%entity, %frame, "entity died");
            self.log.push(frame, SimEvent::Died { entity });
            self.release(frame, entity);
        }
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec2;
    use skill_core::{Faction, SkillCategory, SkillDefinition};

    use super::*;

    fn catalog(skills: Vec<SkillDefinition>) -> SkillCatalog {
        let mut catalog = SkillCatalog::default();
        catalog.extend(skills).unwrap();
        catalog
    }

    #[test]
    fn unknown_skill_and_entity_are_rejected() {
        let mut world = MemoryWorld::new();
        let player = world.spawn(Faction::Player, Vec2::ZERO);
        let mut sim = Simulation::new(world, SkillCatalog::default(), SkillConfig::default(), 60.0);

        assert_eq!(
            sim.cast(player, SkillId(1), SlotIndex(0)),
            Err(SimulationError::UnknownSkill(SkillId(1)))
        );
        assert_eq!(
            sim.cast(EntityId(99), SkillId(1), SlotIndex(0)),
            Err(SimulationError::UnknownEntity(EntityId(99)))
        );
    }

    #[test]
    fn dead_casters_cannot_cast() {
        let mut world = MemoryWorld::new();
        let player = world.spawn(Faction::Player, Vec2::ZERO);
        world.kill(player);
        let skills = catalog(vec![SkillDefinition::new(1, "jab", SkillCategory::SingleNearest)]);
        let mut sim = Simulation::new(world, skills, SkillConfig::default(), 60.0);
        assert_eq!(
            sim.cast(player, SkillId(1), SlotIndex(0)),
            Err(SimulationError::CasterDead(player))
        );
    }

    #[test]
    fn lethal_hit_logs_death() {
        let mut world = MemoryWorld::new();
        let player = world.spawn(Faction::Player, Vec2::ZERO);
        let enemy = world.spawn_with(
            Faction::Hostile,
            Vec2::new(1.0, 0.0),
            Default::default(),
            10.0,
        );
        let skills = catalog(vec![
            SkillDefinition::new(1, "smite", SkillCategory::SingleNearest).with_damage(25.0),
        ]);
        let mut sim = Simulation::new(world, skills, SkillConfig::default(), 60.0);

        let result = sim.cast(player, SkillId(1), SlotIndex(0)).unwrap();
        assert!(result.is_success());
        assert!(!sim.world().is_alive(enemy));
        assert_eq!(sim.log().deaths(), vec![enemy]);

        // Nothing left to hit.
        assert_eq!(
            sim.cast(player, SkillId(1), SlotIndex(0)).unwrap(),
            CastResult::NoTarget
        );
    }

    #[test]
    fn run_counts_frames() {
        let mut sim = Simulation::new(
            MemoryWorld::new(),
            SkillCatalog::default(),
            SkillConfig::default(),
            30.0,
        );
        let summary = sim.run(45).unwrap();
        assert_eq!(summary.frames, 45);
        assert_eq!(sim.frame(), Frame(45));
    }
}
