use glam::Vec2;

use crate::projectile::{ProjectileId, ProjectileSpawn};
use crate::skill::BuffParams;
use crate::state::{EntityId, Faction};

/// Summon the host should instantiate.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SummonSpawn {
    pub owner: EntityId,
    pub faction: Faction,
    pub prefab: String,
    pub position: Vec2,
    /// Seconds until despawn; zero means permanent.
    pub lifetime: f32,
}

/// Mutable outputs of the skill pipeline.
///
/// The engine never mutates world state directly. Every effect it decides on
/// is pushed through this trait, so hosts can apply effects immediately or
/// buffer them until the end of the frame.
pub trait EffectSink {
    /// Damage against the enemy side.
    fn damage_hostile(&mut self, target: EntityId, amount: f32);

    /// Damage against the player side.
    fn damage_friendly(&mut self, target: EntityId, amount: f32);

    fn heal(&mut self, target: EntityId, amount: f32);

    fn apply_buff(&mut self, target: EntityId, buff: BuffParams);

    fn spawn_projectile(&mut self, spawn: &ProjectileSpawn);

    fn move_projectile(&mut self, id: ProjectileId, position: Vec2);

    fn despawn_projectile(&mut self, id: ProjectileId);

    fn spawn_summon(&mut self, summon: &SummonSpawn);

    /// Teleport an entity to `position` (displacement step).
    fn move_entity(&mut self, id: EntityId, position: Vec2);

    fn set_invincible(&mut self, id: EntityId, invincible: bool);

    /// Fire-and-forget audio/VFX trigger.
    fn play_cue(&mut self, cue: &str);
}
