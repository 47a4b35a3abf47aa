use crate::env::LayerMask;
use crate::skill::Affinity;
use crate::state::{EntityId, EntityInfo, Faction};

/// Classifies candidates relative to one caster.
///
/// Pure function of faction tags. Projectiles, dead entities and anything the
/// affinity rejects are invalid.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TargetValidator {
    caster: EntityId,
    faction: Faction,
}

impl TargetValidator {
    pub fn new(caster: EntityId, faction: Faction) -> Self {
        Self { caster, faction }
    }

    pub fn caster(&self) -> EntityId {
        self.caster
    }

    pub fn faction(&self) -> Faction {
        self.faction
    }

    pub fn is_valid_target(&self, candidate: &EntityInfo, affinity: Affinity) -> bool {
        if !candidate.alive || candidate.is_projectile() {
            return false;
        }
        match affinity {
            Affinity::Enemy => self.faction.is_hostile_to(&candidate.faction),
            Affinity::SelfOnly => candidate.faction == self.faction,
            Affinity::Ally => {
                candidate.faction == self.faction || self.faction.is_friendly_to(&candidate.faction)
            }
            Affinity::All => true,
        }
    }

    /// Layers worth querying for `affinity`. Never includes projectiles.
    pub fn layer_mask_for(&self, affinity: Affinity) -> LayerMask {
        let own = LayerMask::for_faction(self.faction);
        match affinity {
            Affinity::Enemy => match self.faction {
                Faction::Player | Faction::Ally => LayerMask::ENEMY,
                Faction::Hostile => LayerMask::FRIENDLY,
                Faction::Neutral => LayerMask::empty(),
            },
            Affinity::SelfOnly => own,
            Affinity::Ally => match self.faction {
                Faction::Player | Faction::Ally => LayerMask::FRIENDLY,
                Faction::Hostile | Faction::Neutral => own,
            },
            Affinity::All => LayerMask::FRIENDLY | LayerMask::ENEMY | LayerMask::NEUTRAL,
        }
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec2;

    use super::*;
    use crate::state::EntityKind;

    fn entity(id: u32, faction: Faction) -> EntityInfo {
        EntityInfo::actor(EntityId(id), Vec2::ZERO, faction)
    }

    #[test]
    fn enemy_affinity_is_caster_relative() {
        let player = TargetValidator::new(EntityId(1), Faction::Player);
        assert!(player.is_valid_target(&entity(2, Faction::Hostile), Affinity::Enemy));
        assert!(!player.is_valid_target(&entity(3, Faction::Ally), Affinity::Enemy));
        assert!(!player.is_valid_target(&entity(4, Faction::Neutral), Affinity::Enemy));

        let monster = TargetValidator::new(EntityId(5), Faction::Hostile);
        assert!(monster.is_valid_target(&entity(1, Faction::Player), Affinity::Enemy));
        assert!(monster.is_valid_target(&entity(3, Faction::Ally), Affinity::Enemy));
        assert_eq!(monster.layer_mask_for(Affinity::Enemy), LayerMask::FRIENDLY);
    }

    #[test]
    fn self_and_ally() {
        let player = TargetValidator::new(EntityId(1), Faction::Player);
        assert!(player.is_valid_target(&entity(1, Faction::Player), Affinity::SelfOnly));
        assert!(!player.is_valid_target(&entity(2, Faction::Ally), Affinity::SelfOnly));
        assert!(player.is_valid_target(&entity(2, Faction::Ally), Affinity::Ally));
        assert!(!player.is_valid_target(&entity(3, Faction::Hostile), Affinity::Ally));
        assert_eq!(player.layer_mask_for(Affinity::SelfOnly), LayerMask::PLAYER);
        assert_eq!(player.layer_mask_for(Affinity::Ally), LayerMask::FRIENDLY);
    }

    #[test]
    fn all_accepts_everything_but_projectiles_and_dead() {
        let player = TargetValidator::new(EntityId(1), Faction::Player);
        assert!(player.is_valid_target(&entity(4, Faction::Neutral), Affinity::All));

        let projectile = entity(5, Faction::Hostile).with_kind(EntityKind::Projectile);
        assert!(!player.is_valid_target(&projectile, Affinity::All));

        let mut corpse = entity(6, Faction::Hostile);
        corpse.alive = false;
        assert!(!player.is_valid_target(&corpse, Affinity::Enemy));

        assert!(!player.layer_mask_for(Affinity::All).contains(LayerMask::PROJECTILE));
    }
}
