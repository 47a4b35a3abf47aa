//! Projectile flight and impact.
//!
//! Projectiles are owned by the engine and advanced once per frame. The host
//! only hears about them through [`EffectSink`] spawn/move/despawn calls.

use std::fmt;

use glam::Vec2;

use crate::combat::{DamageDispatcher, TickSchedule};
use crate::config::SkillConfig;
use crate::env::EffectSink;
use crate::skill::{Affinity, ProjectileKind, ProjectileParams, SkillDefinition, SkillId};
use crate::state::{EntityId, EntityInfo, Faction};
use crate::targeting::{GeometryResolver, QueryShape, TargetValidator};

/// Engine-assigned projectile handle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ProjectileId(pub u32);

impl fmt::Display for ProjectileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "proj:{}", self.0)
    }
}

/// Everything the host needs to instantiate a projectile.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ProjectileSpawn {
    pub id: ProjectileId,
    pub owner: EntityId,
    pub faction: Faction,
    pub skill: SkillId,
    pub prefab: String,
    pub kind: ProjectileKind,
    pub position: Vec2,
    pub direction: Vec2,
    /// Lock chosen at spawn time. Only homing projectiles carry one.
    pub homing_target: Option<EntityId>,
}

/// How a projectile left play.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ProjectileEnd {
    Hit(EntityId),
    Detonated { hits: u32 },
    /// Reached max range or lifetime without hitting anything.
    Expired,
    /// Attached target died or vanished.
    TargetLost,
    DotFinished,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ProjectileStatus {
    Flying,
    Attached(EntityId),
    Finished(ProjectileEnd),
}

impl ProjectileStatus {
    pub fn is_finished(self) -> bool {
        matches!(self, ProjectileStatus::Finished(_))
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct Attachment {
    target: EntityId,
    schedule: TickSchedule,
}

/// One projectile in flight.
#[derive(Clone, Debug)]
pub struct Projectile {
    spawn: ProjectileSpawn,
    position: Vec2,
    direction: Vec2,
    travelled: f32,
    age: f32,
    speed: f32,
    max_range: f32,
    damage: f32,
    affinity: Affinity,
    aoe_radius: f32,
    dot_interval: f32,
    dot_duration: f32,
    hit_cue: Option<String>,
    attached: Option<Attachment>,
}

impl Projectile {
    /// Creates a projectile at `spawn.position`. A homing lock, if any, is
    /// fixed here and never reassigned.
    pub fn new(spawn: ProjectileSpawn, skill: &SkillDefinition, params: &ProjectileParams) -> Self {
        let direction = spawn.direction.normalize_or(Vec2::X);
        Self {
            position: spawn.position,
            direction,
            travelled: 0.0,
            age: 0.0,
            speed: params.speed,
            max_range: params.max_range,
            damage: skill.damage,
            affinity: skill.affinity,
            aoe_radius: params.aoe_radius,
            dot_interval: params.dot_interval,
            dot_duration: params.dot_duration,
            hit_cue: skill.cues.hit.clone(),
            attached: None,
            spawn,
        }
    }

    pub fn id(&self) -> ProjectileId {
        self.spawn.id
    }

    pub fn owner(&self) -> EntityId {
        self.spawn.owner
    }

    pub fn kind(&self) -> ProjectileKind {
        self.spawn.kind
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn homing_target(&self) -> Option<EntityId> {
        self.spawn.homing_target
    }

    pub fn is_attached(&self) -> bool {
        self.attached.is_some()
    }

    pub fn spawn(&self) -> &ProjectileSpawn {
        &self.spawn
    }

    /// Moves the projectile by one frame and resolves impacts.
    pub fn advance(
        &mut self,
        dt: f32,
        resolver: &GeometryResolver<'_>,
        config: &SkillConfig,
        sink: &mut dyn EffectSink,
    ) -> ProjectileStatus {
        if let Some(attachment) = self.attached {
            return self.tick_attached(attachment, dt, resolver, sink);
        }

        self.age += dt;
        if self.age > config.max_projectile_lifetime {
            return self.expire(resolver, sink);
        }

        self.steer(resolver);
        let remaining = (self.max_range - self.travelled).max(0.0);
        let step = (self.speed * dt).min(remaining);
        let from = self.position;
        self.position += self.direction * step;
        self.travelled += step;

        if let Some((target, contact)) = self.pick_hit(from, resolver, config) {
            self.position = contact;
            sink.move_projectile(self.spawn.id, self.position);
            return self.impact(target, resolver, sink);
        }
        sink.move_projectile(self.spawn.id, self.position);
        if self.travelled + SkillConfig::TIMING_EPSILON >= self.max_range {
            return self.expire(resolver, sink);
        }
        ProjectileStatus::Flying
    }

    fn validator(&self) -> TargetValidator {
        TargetValidator::new(self.spawn.owner, self.spawn.faction)
    }

    fn dispatcher<'a>(&'a self, resolver: &GeometryResolver<'a>) -> DamageDispatcher<'a> {
        DamageDispatcher::new(resolver.entities()).with_hit_cue(self.hit_cue.as_deref())
    }

    // Homing projectiles chase their lock; once it is gone they fly straight.
    fn steer(&mut self, resolver: &GeometryResolver<'_>) {
        let Some(target) = self.spawn.homing_target else {
            return;
        };
        if let Some(info) = resolver.entities().entity(target).filter(|info| info.alive) {
            self.direction = (info.position - self.position).normalize_or(self.direction);
        }
    }

    fn candidates(
        &self,
        resolver: &GeometryResolver<'_>,
        center: Vec2,
        radius: f32,
    ) -> Vec<EntityInfo> {
        let validator = self.validator();
        resolver
            .scan(
                QueryShape::Circle { center, radius },
                validator.layer_mask_for(self.affinity),
                &validator,
                self.affinity,
            )
            .into_iter()
            .filter(|info| info.id != self.spawn.owner)
            .collect()
    }

    // Sweeps the segment travelled this frame so fast projectiles cannot
    // step over a target. Returns the hit and the point on the path where
    // it was struck.
    fn pick_hit(
        &self,
        from: Vec2,
        resolver: &GeometryResolver<'_>,
        config: &SkillConfig,
    ) -> Option<(EntityId, Vec2)> {
        let to = self.position;
        let hit_radius = config.projectile_hit_radius;
        let reach = from.distance(to) * 0.5 + hit_radius;
        let mut hits: Vec<(f32, EntityInfo)> = self
            .candidates(resolver, from.lerp(to, 0.5), reach)
            .into_iter()
            .filter_map(|info| {
                let t = closest_on_segment(from, to, info.position);
                let point = from.lerp(to, t);
                (point.distance(info.position) <= hit_radius).then_some((t, info))
            })
            .collect();

        if let Some(lock) = self.spawn.homing_target {
            if let Some((t, info)) = hits.iter().find(|(_, info)| info.id == lock) {
                return Some((info.id, from.lerp(to, *t)));
            }
        }
        hits.sort_by(|(a, left), (b, right)| a.total_cmp(b).then(left.id.cmp(&right.id)));
        hits.first().map(|(t, info)| (info.id, from.lerp(to, *t)))
    }

    fn impact(
        &mut self,
        target: EntityId,
        resolver: &GeometryResolver<'_>,
        sink: &mut dyn EffectSink,
    ) -> ProjectileStatus {
        match self.spawn.kind {
            ProjectileKind::Standard | ProjectileKind::Homing => {
                self.dispatcher(resolver).apply(target, self.damage, sink);
                tracing::debug!(projectile = %self.spawn.id, %target, "projectile hit");
                ProjectileStatus::Finished(ProjectileEnd::Hit(target))
            }
            ProjectileKind::Aoe => self.detonate(resolver, sink),
            ProjectileKind::Dot => {
                self.attached = Some(Attachment {
                    target,
                    schedule: TickSchedule::new(self.dot_interval, self.dot_duration),
                });
                tracing::debug!(projectile = %self.spawn.id, %target, "projectile attached");
                ProjectileStatus::Attached(target)
            }
        }
    }

    fn tick_attached(
        &mut self,
        mut attachment: Attachment,
        dt: f32,
        resolver: &GeometryResolver<'_>,
        sink: &mut dyn EffectSink,
    ) -> ProjectileStatus {
        let target = attachment.target;
        let Some(info) = resolver.entities().entity(target).filter(|info| info.alive) else {
            return ProjectileStatus::Finished(ProjectileEnd::TargetLost);
        };
        self.position = info.position;
        sink.move_projectile(self.spawn.id, self.position);

        if attachment.schedule.is_finished() {
            return ProjectileStatus::Finished(ProjectileEnd::DotFinished);
        }
        if attachment.schedule.is_due() {
            attachment.schedule.fire();
            self.dispatcher(resolver).apply(target, self.damage, sink);
        }
        attachment.schedule.advance(dt);
        self.attached = Some(attachment);
        ProjectileStatus::Attached(target)
    }

    fn expire(
        &mut self,
        resolver: &GeometryResolver<'_>,
        sink: &mut dyn EffectSink,
    ) -> ProjectileStatus {
        match self.spawn.kind {
            ProjectileKind::Aoe => self.detonate(resolver, sink),
            _ => ProjectileStatus::Finished(ProjectileEnd::Expired),
        }
    }

    fn detonate(
        &mut self,
        resolver: &GeometryResolver<'_>,
        sink: &mut dyn EffectSink,
    ) -> ProjectileStatus {
        let mut targets = self.candidates(resolver, self.position, self.aoe_radius);
        targets.sort_by_key(|info| info.id);

        let dispatcher = self.dispatcher(resolver);
        let hits = targets
            .iter()
            .filter(|info| dispatcher.apply(info.id, self.damage, sink).is_applied())
            .count() as u32;
        tracing::debug!(projectile = %self.spawn.id, hits, "projectile detonated");
        ProjectileStatus::Finished(ProjectileEnd::Detonated { hits })
    }
}

/// Parameter in `[0, 1]` of the point on `from..to` closest to `point`.
fn closest_on_segment(from: Vec2, to: Vec2, point: Vec2) -> f32 {
    let delta = to - from;
    let length_sq = delta.length_squared();
    if length_sq <= f32::EPSILON {
        return 0.0;
    }
    ((point - from).dot(delta) / length_sq).clamp(0.0, 1.0)
}
