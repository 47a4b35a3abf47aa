use glam::Vec2;

use crate::state::{EntityId, EntityInfo, Facing, Faction};
use crate::targeting::TargetValidator;

/// Explicit placement for spawned projectiles and summons.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SpawnTransform {
    pub position: Vec2,
    pub facing: Facing,
}

/// Who is casting, from where, facing which way.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CastContext {
    pub caster: EntityId,
    pub faction: Faction,
    pub position: Vec2,
    pub facing: Facing,
    /// Origin of directional boxes and area effects. Defaults to `position`.
    pub attack_point: Option<Vec2>,
    pub spawn: Option<SpawnTransform>,
}

impl CastContext {
    pub fn new(caster: EntityId, faction: Faction, position: Vec2, facing: Facing) -> Self {
        Self {
            caster,
            faction,
            position,
            facing,
            attack_point: None,
            spawn: None,
        }
    }

    /// Context for a caster as the world currently sees it.
    pub fn from_entity(info: &EntityInfo) -> Self {
        Self::new(info.id, info.faction, info.position, info.facing)
    }

    pub fn with_attack_point(mut self, attack_point: Vec2) -> Self {
        self.attack_point = Some(attack_point);
        self
    }

    pub fn with_spawn(mut self, position: Vec2, facing: Facing) -> Self {
        self.spawn = Some(SpawnTransform { position, facing });
        self
    }

    pub fn attack_point(&self) -> Vec2 {
        self.attack_point.unwrap_or(self.position)
    }

    pub fn validator(&self) -> TargetValidator {
        TargetValidator::new(self.caster, self.faction)
    }

    /// Re-anchors the context on the caster's current transform.
    ///
    /// The attack point keeps its caster-local offset, mirrored if the caster
    /// turned around since the cast.
    pub fn follow(&self, info: &EntityInfo) -> Self {
        let local = self.facing.mirror(self.attack_point() - self.position);
        let mut next = *self;
        next.position = info.position;
        next.facing = info.facing;
        next.attack_point = self
            .attack_point
            .map(|_| info.position + info.facing.mirror(local));
        next
    }
}
