use std::cmp::Ordering;
use std::collections::BTreeSet;

use glam::Vec2;

use super::shape::{QueryShape, directional_box};
use super::validator::TargetValidator;
use crate::config::{SkillConfig, TieBreak};
use crate::env::{EntityOracle, LayerMask, OracleError, SkillEnv, SpatialQuery};
use crate::skill::{Affinity, AoeShape, CastContext, SkillCategory, SkillDefinition};
use crate::state::{EntityId, EntityInfo};

/// Shape family a skill category resolves through.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum TargetingMode {
    /// Circle of `range`, forward half only, reduced to one.
    NearestInDirection,
    Cone,
    DirectionalBox,
    /// Circle or world-axis rectangle, never reduced.
    Area,
    /// Category spawns something instead of resolving geometry.
    None,
}

impl TargetingMode {
    pub fn of(category: SkillCategory) -> Self {
        match category {
            SkillCategory::SingleNearest => TargetingMode::NearestInDirection,
            SkillCategory::SingleCone | SkillCategory::AoeCone => TargetingMode::Cone,
            SkillCategory::SingleBox | SkillCategory::AoeBox => TargetingMode::DirectionalBox,
            SkillCategory::AreaOfEffect | SkillCategory::Buff | SkillCategory::Heal => {
                TargetingMode::Area
            }
            SkillCategory::Summon | SkillCategory::Projectile => TargetingMode::None,
        }
    }
}

/// Turns a skill and a cast context into a concrete list of targets.
pub struct GeometryResolver<'a> {
    spatial: &'a dyn SpatialQuery,
    entities: &'a dyn EntityOracle,
    tie_break: TieBreak,
}

impl<'a> GeometryResolver<'a> {
    pub fn new(
        spatial: &'a dyn SpatialQuery,
        entities: &'a dyn EntityOracle,
        tie_break: TieBreak,
    ) -> Self {
        Self {
            spatial,
            entities,
            tie_break,
        }
    }

    /// Builds a resolver from the spatial provider and entity oracle in `env`.
    ///
    /// # Errors
    ///
    /// Returns [`OracleError`] if either collaborator is missing.
    pub fn from_env(env: &SkillEnv<'a>, config: &SkillConfig) -> Result<Self, OracleError> {
        Ok(Self::new(env.spatial()?, env.entities()?, config.tie_break))
    }

    pub fn entities(&self) -> &'a dyn EntityOracle {
        self.entities
    }

    pub fn tie_break(&self) -> TieBreak {
        self.tie_break
    }

    /// Targets one application of `skill` affects.
    ///
    /// Self casts yield the caster alone. Everything else goes through
    /// [`Self::resolve`] with the category's single-target rule.
    pub fn resolve_targets(&self, skill: &SkillDefinition, ctx: &CastContext) -> Vec<EntityId> {
        if skill.is_self_cast() {
            return vec![ctx.caster];
        }
        self.resolve(skill, ctx, skill.category.is_single_target())
    }

    /// Resolves the targets `skill` hits when cast from `ctx`.
    ///
    /// Nearest-in-direction always yields at most one target. Cones and boxes
    /// reduce to the closest candidate when `single_target_only` is set. Area
    /// skills always return every qualifying overlap.
    pub fn resolve(
        &self,
        skill: &SkillDefinition,
        ctx: &CastContext,
        single_target_only: bool,
    ) -> Vec<EntityId> {
        let validator = ctx.validator();
        let affinity = skill.affinity;
        let mask = validator.layer_mask_for(affinity);
        let mode = TargetingMode::of(skill.category);

        let targets = match mode {
            TargetingMode::NearestInDirection => {
                let origin = ctx.position;
                let forward = ctx.facing.vector();
                let shape = QueryShape::Circle {
                    center: origin,
                    radius: skill.range,
                };
                let candidates: Vec<EntityInfo> = self
                    .scan(shape, mask, &validator, affinity)
                    .into_iter()
                    .filter(|candidate| forward.dot(candidate.position - origin) > 0.0)
                    .collect();
                self.reduce(origin, candidates, true)
            }
            TargetingMode::Cone => {
                let origin = ctx.position;
                let forward = ctx.facing.vector();
                let threshold = skill.cone.half_angle_cos();
                let shape = QueryShape::Circle {
                    center: origin,
                    radius: skill.cone.radius,
                };
                let candidates: Vec<EntityInfo> = self
                    .scan(shape, mask, &validator, affinity)
                    .into_iter()
                    .filter(|candidate| {
                        forward.dot((candidate.position - origin).normalize_or_zero()) > threshold
                    })
                    .collect();
                self.reduce(origin, candidates, single_target_only)
            }
            TargetingMode::DirectionalBox => {
                let origin = ctx.attack_point();
                let (center, size) = directional_box(origin, &skill.extents, Some(ctx.facing));
                let shape = QueryShape::Box {
                    center,
                    size,
                    rotation: 0.0,
                };
                let candidates = self.scan(shape, mask, &validator, affinity);
                self.reduce(origin, candidates, single_target_only)
            }
            TargetingMode::Area => {
                let origin = ctx.attack_point();
                let shape = match &skill.aoe {
                    AoeShape::Circle => QueryShape::Circle {
                        center: origin,
                        radius: skill.range,
                    },
                    AoeShape::Rectangle(extents) => {
                        let (center, size) = directional_box(origin, extents, None);
                        QueryShape::Box {
                            center,
                            size,
                            rotation: 0.0,
                        }
                    }
                };
                let candidates = self.scan(shape, mask, &validator, affinity);
                self.reduce(origin, candidates, false)
            }
            TargetingMode::None => Vec::new(),
        };

        tracing::debug!(
            skill = %skill.id,
            caster = %ctx.caster,
            %mode,
            selected = targets.len(),
            "resolved targets"
        );
        targets
    }

    /// Runs one overlap query and keeps the validator-passing candidates.
    pub fn scan(
        &self,
        shape: QueryShape,
        mask: LayerMask,
        validator: &TargetValidator,
        affinity: Affinity,
    ) -> Vec<EntityInfo> {
        let hits = match shape {
            QueryShape::Circle { center, radius } => {
                self.spatial.query_circle(center, radius, mask)
            }
            QueryShape::Box { center, size, rotation } => {
                self.spatial.query_box(center, size, rotation, mask)
            }
        };
        let raw = hits.len();

        // Providers return sets; tolerate duplicates anyway.
        let mut seen = BTreeSet::new();
        let candidates: Vec<EntityInfo> = hits
            .into_iter()
            .filter(|id| seen.insert(*id))
            .filter_map(|id| self.entities.entity(id))
            .filter(|info| validator.is_valid_target(info, affinity))
            .collect();

        tracing::trace!(?shape, raw, valid = candidates.len(), "spatial scan");
        candidates
    }

    /// Closest candidate to `origin`.
    pub fn nearest(&self, origin: Vec2, candidates: &[EntityInfo]) -> Option<EntityInfo> {
        candidates
            .iter()
            .min_by(|a, b| self.compare(origin, a, b))
            .copied()
    }

    /// Sorts ascending by distance to `origin`, then by the configured tie-break.
    pub fn sort_by_distance(&self, origin: Vec2, candidates: &mut [EntityInfo]) {
        candidates.sort_by(|a, b| self.compare(origin, a, b));
    }

    fn reduce(&self, origin: Vec2, mut candidates: Vec<EntityInfo>, single: bool) -> Vec<EntityId> {
        if single {
            return self.nearest(origin, &candidates).map(|info| info.id).into_iter().collect();
        }
        if self.tie_break == TieBreak::EntityId {
            candidates.sort_by_key(|info| info.id);
        }
        candidates.into_iter().map(|info| info.id).collect()
    }

    fn compare(&self, origin: Vec2, a: &EntityInfo, b: &EntityInfo) -> Ordering {
        let by_distance = a
            .position
            .distance_squared(origin)
            .total_cmp(&b.position.distance_squared(origin));
        match self.tie_break {
            TieBreak::EntityId => by_distance.then_with(|| a.id.cmp(&b.id)),
            TieBreak::QueryOrder => by_distance,
        }
    }
}
