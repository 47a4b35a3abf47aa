use glam::Vec2;

/// Movement collision test used by displacements.
pub trait CollisionProbe {
    /// Returns true if moving from `from` by `delta` would hit an obstacle.
    fn probe(&self, from: Vec2, delta: Vec2) -> bool;
}
