use glam::Vec2;

use crate::skill::{AoeShape, BoxExtents, CastContext, SkillCategory, SkillDefinition};
use crate::state::Facing;

/// Rectangle built from four extents around an attack point.
///
/// With `facing` set the left/right extents follow the caster's right axis;
/// `None` keeps the rectangle on world axes.
pub fn directional_box(
    attack_point: Vec2,
    extents: &BoxExtents,
    facing: Option<Facing>,
) -> (Vec2, Vec2) {
    (attack_point + extents.center_offset(facing), extents.size())
}

/// Concrete overlap shape handed to the spatial provider.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum QueryShape {
    Circle { center: Vec2, radius: f32 },
    Box { center: Vec2, size: Vec2, rotation: f32 },
}

/// Debug-visualisation description of a skill's footprint.
///
/// Not behavior-bearing: hosts draw it, nothing reads it back.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum GizmoShape {
    Circle {
        center: Vec2,
        radius: f32,
    },
    Cone {
        origin: Vec2,
        direction: Vec2,
        angle_deg: f32,
        radius: f32,
    },
    Rect {
        center: Vec2,
        size: Vec2,
    },
    /// Straight flight path of a projectile.
    Ray {
        origin: Vec2,
        direction: Vec2,
        length: f32,
    },
    /// Summons and the like have no footprint.
    None,
}

impl GizmoShape {
    pub fn for_skill(skill: &SkillDefinition, ctx: &CastContext) -> Self {
        match skill.category {
            SkillCategory::SingleNearest
            | SkillCategory::Buff
            | SkillCategory::Heal => GizmoShape::Circle {
                center: ctx.position,
                radius: skill.range,
            },
            SkillCategory::SingleCone | SkillCategory::AoeCone => GizmoShape::Cone {
                origin: ctx.position,
                direction: ctx.facing.vector(),
                angle_deg: skill.cone.angle_deg,
                radius: skill.cone.radius,
            },
            SkillCategory::SingleBox | SkillCategory::AoeBox => {
                let (center, size) =
                    directional_box(ctx.attack_point(), &skill.extents, Some(ctx.facing));
                GizmoShape::Rect { center, size }
            }
            SkillCategory::AreaOfEffect => match &skill.aoe {
                AoeShape::Circle => GizmoShape::Circle {
                    center: ctx.attack_point(),
                    radius: skill.range,
                },
                AoeShape::Rectangle(extents) => {
                    let (center, size) = directional_box(ctx.attack_point(), extents, None);
                    GizmoShape::Rect { center, size }
                }
            },
            SkillCategory::Projectile => match &skill.projectile {
                Some(params) => GizmoShape::Ray {
                    origin: ctx.position + ctx.facing.mirror(params.spawn_offset),
                    direction: ctx.facing.vector(),
                    length: params.max_range,
                },
                None => GizmoShape::None,
            },
            SkillCategory::Summon => GizmoShape::None,
        }
    }
}

impl From<QueryShape> for GizmoShape {
    fn from(shape: QueryShape) -> Self {
        match shape {
            QueryShape::Circle { center, radius } => GizmoShape::Circle { center, radius },
            QueryShape::Box { center, size, .. } => GizmoShape::Rect { center, size },
        }
    }
}
