use arrayvec::ArrayVec;
use glam::Vec2;

use super::resolver::GeometryResolver;
use super::shape::QueryShape;
use super::validator::TargetValidator;
use crate::config::SkillConfig;
use crate::skill::Affinity;
use crate::state::{EntityId, EntityInfo, Facing};

/// Targets locked by one homing cast, nearest first.
pub type HomingSelection = ArrayVec<EntityId, { SkillConfig::MAX_HOMING_TARGETS }>;

/// Search parameters for a homing lock.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HomingQuery {
    pub origin: Vec2,
    pub radius: f32,
    pub affinity: Affinity,
    /// Clamped to [`SkillConfig::MAX_HOMING_TARGETS`].
    pub max_count: usize,
    pub facing: Facing,
}

/// Picks and ranks targets for auto-tracking projectiles.
pub struct HomingSelector<'r, 'a> {
    resolver: &'r GeometryResolver<'a>,
}

impl<'r, 'a> HomingSelector<'r, 'a> {
    pub fn new(resolver: &'r GeometryResolver<'a>) -> Self {
        Self { resolver }
    }

    /// Selects up to `max_count` targets around `origin`.
    ///
    /// A single-target lock only considers candidates ahead of the caster;
    /// multi-target locks take whatever is nearby. The caster is never
    /// selected. An empty selection is final: callers spawn nothing.
    pub fn select_targets(
        &self,
        query: &HomingQuery,
        validator: &TargetValidator,
    ) -> HomingSelection {
        let mut selection = HomingSelection::new();
        let max_count = query.max_count.min(SkillConfig::MAX_HOMING_TARGETS);
        if max_count == 0 {
            return selection;
        }

        let forward = query.facing.vector();
        let forward_only = max_count == 1;
        let mut candidates: Vec<EntityInfo> = self
            .resolver
            .scan(
                QueryShape::Circle {
                    center: query.origin,
                    radius: query.radius,
                },
                validator.layer_mask_for(query.affinity),
                validator,
                query.affinity,
            )
            .into_iter()
            .filter(|candidate| candidate.id != validator.caster())
            .filter(|candidate| {
                !forward_only || forward.dot(candidate.position - query.origin) > 0.0
            })
            .collect();

        self.resolver.sort_by_distance(query.origin, &mut candidates);
        for candidate in candidates.into_iter().take(max_count) {
            if selection.try_push(candidate.id).is_err() {
                break;
            }
        }

        tracing::debug!(
            caster = %validator.caster(),
            requested = max_count,
            locked = selection.len(),
            "homing targets selected"
        );
        selection
    }
}
