//! Parameter blocks grouped by the skill categories that read them.

use glam::Vec2;

use crate::motion::{MotionCurve, MoveType};
use crate::state::Facing;

/// Cone shape used by `SingleCone` and `AoeCone`.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ConeParams {
    /// Full opening angle in degrees.
    pub angle_deg: f32,
    /// Reach of the cone from the cast position.
    pub radius: f32,
}

impl ConeParams {
    pub fn new(angle_deg: f32, radius: f32) -> Self {
        Self { angle_deg, radius }
    }

    /// Cosine of the half angle; candidates must beat this dot product.
    pub fn half_angle_cos(&self) -> f32 {
        (self.angle_deg.to_radians() * 0.5).cos()
    }
}

impl Default for ConeParams {
    fn default() -> Self {
        Self::new(90.0, 3.0)
    }
}

/// Four independently configurable reaches around an attack point.
///
/// `forward`/`backward` run along the world up axis, `left`/`right` along the
/// caster's right axis.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BoxExtents {
    pub forward: f32,
    pub backward: f32,
    pub left: f32,
    pub right: f32,
}

impl BoxExtents {
    pub fn new(forward: f32, backward: f32, left: f32, right: f32) -> Self {
        Self {
            forward,
            backward,
            left,
            right,
        }
    }

    /// Total size as (left + right, forward + backward).
    pub fn size(&self) -> Vec2 {
        Vec2::new(self.left + self.right, self.forward + self.backward)
    }

    /// Offset of the rectangle center from the attack point.
    ///
    /// With `facing` set, the horizontal component follows the caster's right
    /// axis (so left and right swap when mirrored). With `None` the rectangle
    /// stays on world axes.
    pub fn center_offset(&self, facing: Option<Facing>) -> Vec2 {
        let up = (self.forward - self.backward) * 0.5;
        let right = (self.right - self.left) * 0.5;
        let right_axis = facing.map_or(1.0, Facing::sign);
        Vec2::new(right * right_axis, up)
    }

    pub(crate) fn has_negative(&self) -> Option<(&'static str, f32)> {
        [
            ("forward", self.forward),
            ("backward", self.backward),
            ("left", self.left),
            ("right", self.right),
        ]
        .into_iter()
        .find(|(_, value)| *value < 0.0)
    }
}

/// Footprint of an `AreaOfEffect` skill.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AoeShape {
    /// Circle of the skill's `range`.
    #[default]
    Circle,
    /// World-axis rectangle around the attack point.
    Rectangle(BoxExtents),
}

/// Temporary stat modifiers granted by a `Buff` skill.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct BuffParams {
    pub move_speed: f32,
    pub attack: f32,
    pub defense: f32,
    /// Seconds the modifiers last.
    pub duration: f32,
}

/// Projectile flavours.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, strum::Display, strum::EnumString,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum ProjectileKind {
    /// Flies straight, damages the first valid target it touches.
    #[default]
    Standard,
    /// Sticks to the first target and damages it on an interval.
    Dot,
    /// Steers toward targets chosen at spawn time.
    Homing,
    /// Explodes on impact or at max range, damaging everything nearby.
    Aoe,
}

/// Sub-parameters of a `Projectile` skill.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ProjectileParams {
    /// Host-side asset the projectile is rendered with. Required.
    pub prefab: Option<String>,
    pub kind: ProjectileKind,
    pub speed: f32,
    pub max_range: f32,
    /// Search radius for homing target selection.
    pub homing_radius: f32,
    /// Number of homing projectiles (one per selected target).
    pub homing_count: u8,
    /// Caster-local spawn offset, mirrored with facing.
    pub spawn_offset: Vec2,
    pub dot_interval: f32,
    pub dot_duration: f32,
    /// Explosion radius for `Aoe` projectiles.
    pub aoe_radius: f32,
}

impl Default for ProjectileParams {
    fn default() -> Self {
        Self {
            prefab: None,
            kind: ProjectileKind::Standard,
            speed: 10.0,
            max_range: 10.0,
            homing_radius: 8.0,
            homing_count: 1,
            spawn_offset: Vec2::ZERO,
            dot_interval: 0.5,
            dot_duration: 2.0,
            aoe_radius: 2.0,
        }
    }
}

impl ProjectileParams {
    pub fn new(prefab: impl Into<String>, kind: ProjectileKind) -> Self {
        Self {
            prefab: Some(prefab.into()),
            kind,
            ..Self::default()
        }
    }
}

/// Sub-parameters of a `Summon` skill.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SummonParams {
    /// Host-side asset to instantiate. Required.
    pub prefab: Option<String>,
    pub count: u8,
    /// Caster-local offset, mirrored with facing.
    pub offset: Vec2,
    /// Seconds before the host despawns the summon; zero means permanent.
    pub lifetime: f32,
}

impl Default for SummonParams {
    fn default() -> Self {
        Self {
            prefab: None,
            count: 1,
            offset: Vec2::new(1.0, 0.0),
            lifetime: 0.0,
        }
    }
}

/// Caster displacement attached to a skill (dash strikes, backsteps, leaps).
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct MovementParams {
    pub move_type: MoveType,
    pub distance: f32,
    /// Seconds the displacement takes.
    pub duration: f32,
    pub curve: MotionCurve,
    pub stop_on_collision: bool,
    /// Grant invincibility while moving.
    pub invincible: bool,
}

impl Default for MovementParams {
    fn default() -> Self {
        Self {
            move_type: MoveType::Dash,
            distance: 3.0,
            duration: 0.2,
            curve: MotionCurve::Linear,
            stop_on_collision: true,
            invincible: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn box_center_uses_up_axis_for_forward() {
        let extents = BoxExtents::new(3.0, 1.0, 2.0, 2.0);
        assert_eq!(extents.center_offset(Some(Facing::Right)), Vec2::new(0.0, 1.0));
        assert_eq!(extents.size(), Vec2::new(4.0, 4.0));
    }

    #[test]
    fn box_right_extent_mirrors_with_facing() {
        let extents = BoxExtents::new(1.0, 1.0, 0.0, 4.0);
        assert_eq!(extents.center_offset(Some(Facing::Right)), Vec2::new(2.0, 0.0));
        assert_eq!(extents.center_offset(Some(Facing::Left)), Vec2::new(-2.0, 0.0));
        // World-axis rectangles ignore facing entirely
        assert_eq!(extents.center_offset(None), Vec2::new(2.0, 0.0));
    }

    #[test]
    fn cone_half_angle() {
        let cone = ConeParams::new(90.0, 5.0);
        assert!((cone.half_angle_cos() - std::f32::consts::FRAC_1_SQRT_2).abs() < 1e-6);
    }
}
