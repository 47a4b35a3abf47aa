//! In-memory world serving every `skill-core` collaborator trait.
//!
//! Entities live in a `BTreeMap` so query results come back in id order.
//! Static geometry is a list of axis-aligned walls that only the collision
//! probe consults; spatial queries ignore them.
use std::collections::BTreeMap;

use glam::Vec2;
use serde::{Deserialize, Serialize};
use skill_core::{
    BuffParams, CollisionProbe, EntityId, EntityInfo, EntityKind, EntityOracle, Env, Facing,
    Faction, LayerMask, ProjectileId, SkillEnv, SpatialQuery, SummonSpawn,
};

/// Health given to entities spawned without an explicit value.
pub const DEFAULT_HP: f32 = 100.0;
/// Health of summoned entities.
pub const SUMMON_HP: f32 = 30.0;

/// Buff with the time it has left.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ActiveBuff {
    pub params: BuffParams,
    pub remaining: f32,
}

/// Dynamic state of one entity.
#[derive(Clone, Debug, PartialEq)]
pub struct Body {
    pub info: EntityInfo,
    pub hp: f32,
    pub max_hp: f32,
    pub buffs: Vec<ActiveBuff>,
    pub invincible: bool,
    /// Seconds until despawn, for summons with a lifetime.
    pub lifetime: Option<f32>,
}

impl Body {
    pub fn new(info: EntityInfo, max_hp: f32) -> Self {
        Self {
            info,
            hp: max_hp,
            max_hp,
            buffs: Vec::new(),
            invincible: false,
            lifetime: None,
        }
    }

    pub fn is_alive(&self) -> bool {
        self.info.alive
    }

    /// Sum of attack modifiers from active buffs.
    pub fn attack_bonus(&self) -> f32 {
        self.buffs.iter().map(|buff| buff.params.attack).sum()
    }
}

/// Outcome of applying damage to a body.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Hit {
    /// Target missing, dead or invincible.
    Ignored,
    Wounded,
    Killed,
}

/// Axis-aligned blocking rectangle.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Wall {
    pub min: Vec2,
    pub max: Vec2,
}

impl Wall {
    pub fn new(a: Vec2, b: Vec2) -> Self {
        Self {
            min: a.min(b),
            max: a.max(b),
        }
    }

    /// Returns true if the segment `from -> from + delta` touches the wall.
    pub fn blocks(&self, from: Vec2, delta: Vec2) -> bool {
        let mut t_min = 0.0f32;
        let mut t_max = 1.0f32;
        for axis in 0..2 {
            let origin = from[axis];
            let step = delta[axis];
            let (lo, hi) = (self.min[axis], self.max[axis]);
            if step.abs() < f32::EPSILON {
                if origin < lo || origin > hi {
                    return false;
                }
                continue;
            }
            let inv = 1.0 / step;
            let (mut near, mut far) = ((lo - origin) * inv, (hi - origin) * inv);
            if near > far {
                std::mem::swap(&mut near, &mut far);
            }
            t_min = t_min.max(near);
            t_max = t_max.min(far);
            if t_min > t_max {
                return false;
            }
        }
        true
    }
}

/// Entities, walls and in-flight projectile positions.
#[derive(Clone, Debug, Default)]
pub struct MemoryWorld {
    bodies: BTreeMap<EntityId, Body>,
    walls: Vec<Wall>,
    projectiles: BTreeMap<ProjectileId, Vec2>,
    next_id: u32,
}

impl MemoryWorld {
    pub fn new() -> Self {
        Self::default()
    }

    /// Spawns an actor facing right with [`DEFAULT_HP`].
    pub fn spawn(&mut self, faction: Faction, position: Vec2) -> EntityId {
        self.spawn_with(faction, position, Facing::Right, DEFAULT_HP)
    }

    pub fn spawn_with(
        &mut self,
        faction: Faction,
        position: Vec2,
        facing: Facing,
        hp: f32,
    ) -> EntityId {
        let id = EntityId(self.next_id);
        let info = EntityInfo::actor(id, position, faction).with_facing(facing);
        self.insert(Body::new(info, hp));
        id
    }

    /// Inserts or replaces a body under its own id.
    pub fn insert(&mut self, body: Body) {
        self.next_id = self.next_id.max(body.info.id.0.saturating_add(1));
        self.bodies.insert(body.info.id, body);
    }

    pub fn add_wall(&mut self, wall: Wall) {
        self.walls.push(wall);
    }

    pub fn body(&self, id: EntityId) -> Option<&Body> {
        self.bodies.get(&id)
    }

    pub fn bodies(&self) -> impl Iterator<Item = &Body> {
        self.bodies.values()
    }

    pub fn hp(&self, id: EntityId) -> Option<f32> {
        self.bodies.get(&id).map(|body| body.hp)
    }

    pub fn is_alive(&self, id: EntityId) -> bool {
        self.bodies.get(&id).is_some_and(Body::is_alive)
    }

    /// Number of living entities of `faction`.
    pub fn living(&self, faction: Faction) -> usize {
        self.bodies
            .values()
            .filter(|body| body.is_alive() && body.info.faction == faction)
            .count()
    }

    pub fn projectiles(&self) -> &BTreeMap<ProjectileId, Vec2> {
        &self.projectiles
    }

    /// Collaborator bundle borrowing this world.
    pub fn env(&self) -> SkillEnv<'_> {
        Env::with_all(self, self, self).into_skill_env()
    }

    pub fn set_facing(&mut self, id: EntityId, facing: Facing) {
        if let Some(body) = self.bodies.get_mut(&id) {
            body.info.facing = facing;
        }
    }

    pub fn move_entity(&mut self, id: EntityId, position: Vec2) {
        if let Some(body) = self.bodies.get_mut(&id) {
            body.info.position = position;
        }
    }

    pub fn set_invincible(&mut self, id: EntityId, invincible: bool) {
        if let Some(body) = self.bodies.get_mut(&id) {
            body.invincible = invincible;
        }
    }

    /// Marks `id` dead without touching its health.
    pub fn kill(&mut self, id: EntityId) {
        if let Some(body) = self.bodies.get_mut(&id) {
            body.info.alive = false;
        }
    }

    pub fn damage(&mut self, id: EntityId, amount: f32) -> Hit {
        let Some(body) = self.bodies.get_mut(&id) else {
            return Hit::Ignored;
        };
        if !body.is_alive() || body.invincible {
            return Hit::Ignored;
        }
        body.hp = (body.hp - amount).max(0.0);
        if body.hp <= 0.0 {
            body.info.alive = false;
            Hit::Killed
        } else {
            Hit::Wounded
        }
    }

    /// Returns the health actually restored.
    pub fn heal(&mut self, id: EntityId, amount: f32) -> f32 {
        let Some(body) = self.bodies.get_mut(&id).filter(|body| body.is_alive()) else {
            return 0.0;
        };
        let before = body.hp;
        body.hp = (body.hp + amount).min(body.max_hp);
        body.hp - before
    }

    pub fn apply_buff(&mut self, id: EntityId, params: BuffParams) -> bool {
        let Some(body) = self.bodies.get_mut(&id).filter(|body| body.is_alive()) else {
            return false;
        };
        body.buffs.push(ActiveBuff {
            params,
            remaining: params.duration,
        });
        true
    }

    pub fn spawn_summon(&mut self, summon: &SummonSpawn) -> EntityId {
        let id = EntityId(self.next_id);
        let info =
            EntityInfo::actor(id, summon.position, summon.faction).with_kind(EntityKind::Summon);
        let mut body = Body::new(info, SUMMON_HP);
        if summon.lifetime > 0.0 {
            body.lifetime = Some(summon.lifetime);
        }
        self.insert(body);
        id
    }

    pub fn track_projectile(&mut self, id: ProjectileId, position: Vec2) {
        self.projectiles.insert(id, position);
    }

    pub fn untrack_projectile(&mut self, id: ProjectileId) {
        self.projectiles.remove(&id);
    }

    /// Ages buffs and summon lifetimes. Returns the summons that expired,
    /// which are removed from the world.
    pub fn advance(&mut self, dt: f32) -> Vec<EntityId> {
        let mut expired = Vec::new();
        for body in self.bodies.values_mut() {
            body.buffs.retain_mut(|buff| {
                buff.remaining -= dt;
                buff.remaining > 0.0
            });
            if let Some(lifetime) = body.lifetime.as_mut() {
                *lifetime -= dt;
                if *lifetime <= 0.0 {
                    expired.push(body.info.id);
                }
            }
        }
        for id in &expired {
            self.bodies.remove(id);
        }
        expired
    }

    fn matching(&self, mask: LayerMask, inside: impl Fn(Vec2) -> bool) -> Vec<EntityId> {
        self.bodies
            .values()
            .filter(|body| mask.intersects(LayerMask::for_entity(&body.info)))
            .filter(|body| inside(body.info.position))
            .map(|body| body.info.id)
            .collect()
    }
}

impl SpatialQuery for MemoryWorld {
    fn query_circle(&self, center: Vec2, radius: f32, mask: LayerMask) -> Vec<EntityId> {
        self.matching(mask, |position| position.distance(center) <= radius)
    }

    fn query_box(&self, center: Vec2, size: Vec2, rotation: f32, mask: LayerMask) -> Vec<EntityId> {
        let half = size * 0.5;
        let unrotate = Vec2::from_angle(-rotation);
        self.matching(mask, |position| {
            let local = unrotate.rotate(position - center).abs();
            local.x < half.x && local.y < half.y
        })
    }
}

impl EntityOracle for MemoryWorld {
    fn entity(&self, id: EntityId) -> Option<EntityInfo> {
        self.bodies.get(&id).map(|body| body.info)
    }
}

impl CollisionProbe for MemoryWorld {
    fn probe(&self, from: Vec2, delta: Vec2) -> bool {
        self.walls.iter().any(|wall| wall.blocks(from, delta))
    }
}
