use bitflags::bitflags;
use glam::Vec2;

use crate::state::{EntityId, EntityInfo, EntityKind, Faction};

bitflags! {
    /// Collision layers a spatial query scans.
    ///
    /// Each faction lives on its own layer; projectiles get a separate one so
    /// hosts can keep them out of skill queries entirely.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct LayerMask: u8 {
        const PLAYER     = 1 << 0;
        const ALLY       = 1 << 1;
        const ENEMY      = 1 << 2;
        const NEUTRAL    = 1 << 3;
        const PROJECTILE = 1 << 4;

        const FRIENDLY = Self::PLAYER.bits() | Self::ALLY.bits();
    }
}

impl LayerMask {
    /// Layer an entity of the given faction is registered on.
    pub fn for_faction(faction: Faction) -> Self {
        match faction {
            Faction::Player => LayerMask::PLAYER,
            Faction::Ally => LayerMask::ALLY,
            Faction::Hostile => LayerMask::ENEMY,
            Faction::Neutral => LayerMask::NEUTRAL,
        }
    }

    /// Layer an entity snapshot lives on.
    pub fn for_entity(info: &EntityInfo) -> Self {
        match info.kind {
            EntityKind::Projectile => LayerMask::PROJECTILE,
            EntityKind::Actor | EntityKind::Summon => Self::for_faction(info.faction),
        }
    }
}

/// Raw overlap queries provided by the host's physics backend.
///
/// Results are unordered sets of colliders touching the shape; no validation
/// or sorting is expected from the provider.
pub trait SpatialQuery {
    /// Colliders overlapping a circle.
    fn query_circle(&self, center: Vec2, radius: f32, mask: LayerMask) -> Vec<EntityId>;

    /// Colliders overlapping a box of full `size`, rotated by `rotation`
    /// radians around its center.
    fn query_box(&self, center: Vec2, size: Vec2, rotation: f32, mask: LayerMask)
    -> Vec<EntityId>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn friendly_is_player_and_ally() {
        assert!(LayerMask::FRIENDLY.contains(LayerMask::PLAYER));
        assert!(LayerMask::FRIENDLY.contains(LayerMask::ALLY));
        assert!(!LayerMask::FRIENDLY.contains(LayerMask::ENEMY));
    }

    #[test]
    fn projectiles_live_on_their_own_layer() {
        let info = EntityInfo::actor(EntityId(3), Vec2::ZERO, Faction::Hostile)
            .with_kind(EntityKind::Projectile);
        assert_eq!(LayerMask::for_entity(&info), LayerMask::PROJECTILE);
        let actor = EntityInfo::actor(EntityId(4), Vec2::ZERO, Faction::Hostile);
        assert_eq!(LayerMask::for_entity(&actor), LayerMask::ENEMY);
    }
}
