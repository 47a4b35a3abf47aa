/// Engine configuration constants and tunable parameters.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SkillConfig {
    /// Radius of the overlap circle a projectile uses to detect hits.
    pub projectile_hit_radius: f32,
    /// How "nearest" reductions order candidates at exactly equal distance.
    pub tie_break: TieBreak,
    /// Hard cap on projectile lifetime in seconds, regardless of range.
    pub max_projectile_lifetime: f32,
}

impl SkillConfig {
    // ===== compile-time constants used as type parameters =====
    /// Maximum number of targets a single homing cast can lock onto.
    pub const MAX_HOMING_TARGETS: usize = 16;
    /// Slack used when comparing accumulated frame time against tick deadlines.
    pub const TIMING_EPSILON: f32 = 1e-4;

    // ===== runtime-tunable defaults =====
    pub const DEFAULT_PROJECTILE_HIT_RADIUS: f32 = 0.5;
    pub const DEFAULT_MAX_PROJECTILE_LIFETIME: f32 = 10.0;

    pub fn new() -> Self {
        Self {
            projectile_hit_radius: Self::DEFAULT_PROJECTILE_HIT_RADIUS,
            tie_break: TieBreak::default(),
            max_projectile_lifetime: Self::DEFAULT_MAX_PROJECTILE_LIFETIME,
        }
    }

    pub fn with_tie_break(mut self, tie_break: TieBreak) -> Self {
        self.tie_break = tie_break;
        self
    }
}

impl Default for SkillConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Secondary ordering for candidates at identical distance.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, strum::Display, strum::EnumString)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum TieBreak {
    /// Lowest entity id wins. Deterministic regardless of query order.
    #[default]
    EntityId,
    /// First candidate returned by the spatial query wins.
    QueryOrder,
}
