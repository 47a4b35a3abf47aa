use crate::state::{EntityId, EntityInfo};

/// Read access to the entities the host world tracks.
pub trait EntityOracle {
    /// Snapshot of an entity, or `None` if the id is unknown.
    fn entity(&self, id: EntityId) -> Option<EntityInfo>;

    /// Returns true if the entity exists and is alive.
    fn is_alive(&self, id: EntityId) -> bool {
        self.entity(id).is_some_and(|info| info.alive)
    }
}
