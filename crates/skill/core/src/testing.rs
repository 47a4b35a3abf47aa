//! In-crate fakes shared by unit tests.
use std::collections::BTreeMap;

use glam::Vec2;

use crate::env::{
    CollisionProbe, EffectSink, EntityOracle, Env, LayerMask, SkillEnv, SpatialQuery, SummonSpawn,
};
use crate::projectile::{ProjectileId, ProjectileSpawn};
use crate::skill::BuffParams;
use crate::state::{DamageRoute, EntityId, EntityInfo, Faction};

/// Brute-force world: circle queries inclusive, box queries strict.
#[derive(Default)]
pub struct Scene {
    entities: BTreeMap<EntityId, EntityInfo>,
    order: Vec<EntityId>,
}

impl Scene {
    pub fn add(&mut self, id: u32, x: f32, y: f32, faction: Faction) -> &mut Self {
        self.insert(EntityInfo::actor(EntityId(id), Vec2::new(x, y), faction))
    }

    pub fn insert(&mut self, info: EntityInfo) -> &mut Self {
        if self.entities.insert(info.id, info).is_none() {
            self.order.push(info.id);
        }
        self
    }

    pub fn kill(&mut self, id: u32) {
        if let Some(info) = self.entities.get_mut(&EntityId(id)) {
            info.alive = false;
        }
    }

    pub fn move_to(&mut self, id: u32, position: Vec2) {
        if let Some(info) = self.entities.get_mut(&EntityId(id)) {
            info.position = position;
        }
    }

    pub fn env(&self) -> SkillEnv<'_> {
        Env::with_all(self, self, self).into_skill_env()
    }

    fn matching<'s>(
        &'s self,
        mask: LayerMask,
        inside: impl Fn(Vec2) -> bool + 's,
    ) -> impl Iterator<Item = EntityId> + 's {
        self.order.iter().copied().filter(move |id| {
            self.entities.get(id).is_some_and(|info| {
                mask.intersects(LayerMask::for_entity(info)) && inside(info.position)
            })
        })
    }
}

impl SpatialQuery for Scene {
    fn query_circle(&self, center: Vec2, radius: f32, mask: LayerMask) -> Vec<EntityId> {
        self.matching(mask, move |p| p.distance(center) <= radius).collect()
    }

    fn query_box(&self, center: Vec2, size: Vec2, _: f32, mask: LayerMask) -> Vec<EntityId> {
        let half = size * 0.5;
        self.matching(mask, move |p| {
            let d = (p - center).abs();
            d.x < half.x && d.y < half.y
        })
        .collect()
    }
}

impl EntityOracle for Scene {
    fn entity(&self, id: EntityId) -> Option<EntityInfo> {
        self.entities.get(&id).copied()
    }
}

// Open floor: nothing ever blocks movement.
impl CollisionProbe for Scene {
    fn probe(&self, _: Vec2, _: Vec2) -> bool {
        false
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Effect {
    Damage(EntityId, f32, DamageRoute),
    Heal(EntityId, f32),
    Buff(EntityId, BuffParams),
    ProjectileSpawned(ProjectileSpawn),
    ProjectileMoved(ProjectileId, Vec2),
    ProjectileDespawned(ProjectileId),
    Summon(SummonSpawn),
    Moved(EntityId, Vec2),
    Invincible(EntityId, bool),
    Cue(String),
}

#[derive(Default)]
pub struct RecordingSink {
    pub effects: Vec<Effect>,
}

impl RecordingSink {
    pub fn damage_to(&self, target: u32) -> usize {
        self.effects
            .iter()
            .filter(|effect| matches!(effect, Effect::Damage(id, _, _) if *id == EntityId(target)))
            .count()
    }

    pub fn total_damage(&self) -> usize {
        self.effects
            .iter()
            .filter(|effect| matches!(effect, Effect::Damage(..)))
            .count()
    }

    /// Heal targets in application order.
    pub fn healed(&self) -> Vec<EntityId> {
        self.effects
            .iter()
            .filter_map(|effect| match effect {
                Effect::Heal(id, _) => Some(*id),
                _ => None,
            })
            .collect()
    }

    pub fn cues(&self) -> Vec<&str> {
        self.effects
            .iter()
            .filter_map(|effect| match effect {
                Effect::Cue(cue) => Some(cue.as_str()),
                _ => None,
            })
            .collect()
    }
}

impl EffectSink for RecordingSink {
    fn damage_hostile(&mut self, target: EntityId, amount: f32) {
        self.effects.push(Effect::Damage(target, amount, DamageRoute::Hostile));
    }

    fn damage_friendly(&mut self, target: EntityId, amount: f32) {
        self.effects.push(Effect::Damage(target, amount, DamageRoute::Friendly));
    }

    fn heal(&mut self, target: EntityId, amount: f32) {
        self.effects.push(Effect::Heal(target, amount));
    }

    fn apply_buff(&mut self, target: EntityId, buff: BuffParams) {
        self.effects.push(Effect::Buff(target, buff));
    }

    fn spawn_projectile(&mut self, spawn: &ProjectileSpawn) {
        self.effects.push(Effect::ProjectileSpawned(spawn.clone()));
    }

    fn move_projectile(&mut self, id: ProjectileId, position: Vec2) {
        self.effects.push(Effect::ProjectileMoved(id, position));
    }

    fn despawn_projectile(&mut self, id: ProjectileId) {
        self.effects.push(Effect::ProjectileDespawned(id));
    }

    fn spawn_summon(&mut self, summon: &SummonSpawn) {
        self.effects.push(Effect::Summon(summon.clone()));
    }

    fn move_entity(&mut self, id: EntityId, position: Vec2) {
        self.effects.push(Effect::Moved(id, position));
    }

    fn set_invincible(&mut self, id: EntityId, invincible: bool) {
        self.effects.push(Effect::Invincible(id, invincible));
    }

    fn play_cue(&mut self, cue: &str) {
        self.effects.push(Effect::Cue(cue.to_owned()));
    }
}
