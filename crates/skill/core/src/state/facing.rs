use glam::Vec2;

/// Horizontal orientation of a caster.
///
/// Derived from the sign of the caster's horizontal scale: sprites are
/// mirrored rather than rotated, so facing is one of two world directions.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, strum::Display, strum::EnumString)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum Facing {
    #[default]
    Right,
    Left,
}

impl Facing {
    /// Facing from a horizontal scale sign. Zero counts as right.
    pub fn from_sign(sign: f32) -> Self {
        if sign < 0.0 { Facing::Left } else { Facing::Right }
    }

    /// +1 when facing right, -1 when mirrored.
    #[inline]
    pub fn sign(self) -> f32 {
        match self {
            Facing::Right => 1.0,
            Facing::Left => -1.0,
        }
    }

    /// Unit vector the caster looks along.
    #[inline]
    pub fn vector(self) -> Vec2 {
        Vec2::new(self.sign(), 0.0)
    }

    pub fn flipped(self) -> Self {
        match self {
            Facing::Right => Facing::Left,
            Facing::Left => Facing::Right,
        }
    }

    /// Mirrors a caster-local offset horizontally.
    #[inline]
    pub fn mirror(self, local: Vec2) -> Vec2 {
        Vec2::new(local.x * self.sign(), local.y)
    }
}
