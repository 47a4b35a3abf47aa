use glam::Vec2;

use super::{EntityId, Facing};

/// Entity faction (allegiance).
///
/// Faction decides:
/// - Which candidates a skill's affinity accepts
/// - Which spatial layers a query scans
/// - Which damage sink receives a hit
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum Faction {
    /// Player-controlled characters.
    Player,
    /// Friendly to the player (companions, summons).
    Ally,
    /// Never fights, only reachable by `All` affinity.
    #[default]
    Neutral,
    /// Hostile to the player.
    Hostile,
}

impl Faction {
    /// Check if this faction is hostile to another faction.
    pub fn is_hostile_to(&self, other: &Faction) -> bool {
        match (self, other) {
            (Faction::Player | Faction::Ally, Faction::Hostile)
            | (Faction::Hostile, Faction::Player | Faction::Ally) => true,

            // Neutral doesn't take part in combat; same side never fights
            _ => false,
        }
    }

    /// Check if this faction fights on the same side as another.
    pub fn is_friendly_to(&self, other: &Faction) -> bool {
        match (self, other) {
            (Faction::Player | Faction::Ally, Faction::Player | Faction::Ally) => true,
            (Faction::Hostile, Faction::Hostile) => true,
            _ => false,
        }
    }

    /// Which damage sink a hit against this faction is routed to.
    pub fn damage_route(&self) -> DamageRoute {
        match self {
            Faction::Player | Faction::Ally => DamageRoute::Friendly,
            Faction::Hostile | Faction::Neutral => DamageRoute::Hostile,
        }
    }
}

/// Destination sink for a damage application.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum DamageRoute {
    /// Enemy-side health handling.
    Hostile,
    /// Player-side health handling.
    Friendly,
}

/// What kind of object an entity is.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum EntityKind {
    /// Characters and monsters.
    #[default]
    Actor,
    /// In-flight projectiles. Never valid as a skill target.
    Projectile,
    /// Summoned helpers.
    Summon,
}

/// Read-only snapshot of an entity as seen by the skill pipeline.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EntityInfo {
    pub id: EntityId,
    pub position: Vec2,
    pub facing: Facing,
    pub faction: Faction,
    pub kind: EntityKind,
    pub alive: bool,
}

impl EntityInfo {
    /// Creates a live actor snapshot facing right.
    pub fn actor(id: EntityId, position: Vec2, faction: Faction) -> Self {
        Self {
            id,
            position,
            facing: Facing::Right,
            faction,
            kind: EntityKind::Actor,
            alive: true,
        }
    }

    pub fn with_kind(mut self, kind: EntityKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn with_facing(mut self, facing: Facing) -> Self {
        self.facing = facing;
        self
    }

    pub fn is_projectile(&self) -> bool {
        matches!(self.kind, EntityKind::Projectile)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hostility_is_symmetric() {
        assert!(Faction::Player.is_hostile_to(&Faction::Hostile));
        assert!(Faction::Hostile.is_hostile_to(&Faction::Ally));
        assert!(!Faction::Player.is_hostile_to(&Faction::Ally));
        assert!(!Faction::Neutral.is_hostile_to(&Faction::Hostile));
        assert!(!Faction::Hostile.is_hostile_to(&Faction::Hostile));
    }

    #[test]
    fn damage_routes_follow_side() {
        assert_eq!(Faction::Hostile.damage_route(), DamageRoute::Hostile);
        assert_eq!(Faction::Ally.damage_route(), DamageRoute::Friendly);
        assert_eq!(Faction::Player.damage_route(), DamageRoute::Friendly);
    }

    #[test]
    fn faction_parses_case_insensitively() {
        assert_eq!("HOSTILE".parse::<Faction>().ok(), Some(Faction::Hostile));
        assert_eq!(Faction::Ally.to_string(), "ally");
    }
}
