//! Skill definition and its classification enums.

use std::fmt;

use super::error::DefinitionError;
use super::params::{
    AoeShape, BoxExtents, BuffParams, ConeParams, MovementParams, ProjectileKind,
    ProjectileParams, SummonParams,
};
use crate::config::SkillConfig;

/// Stable identifier of a skill definition.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct SkillId(pub u32);

impl fmt::Display for SkillId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "skill:{}", self.0)
    }
}

/// What a skill does when cast.
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
pub enum SkillCategory {
    /// Closest valid target in front of the caster.
    #[default]
    SingleNearest,
    /// Closest valid target inside a cone.
    SingleCone,
    /// Closest valid target inside a directional box.
    SingleBox,
    /// Every valid target inside a directional box.
    AoeBox,
    /// Every valid target inside a cone.
    AoeCone,
    /// Every valid target inside a circle or world-axis rectangle.
    AreaOfEffect,
    Buff,
    Heal,
    Summon,
    Projectile,
}

impl SkillCategory {
    /// Returns true if geometry resolution reduces to one target.
    pub fn is_single_target(self) -> bool {
        matches!(
            self,
            SkillCategory::SingleNearest | SkillCategory::SingleCone | SkillCategory::SingleBox
        )
    }

    /// Returns true if this category deals damage through the geometry resolver.
    pub fn is_damaging(self) -> bool {
        matches!(
            self,
            SkillCategory::SingleNearest
                | SkillCategory::SingleCone
                | SkillCategory::SingleBox
                | SkillCategory::AoeBox
                | SkillCategory::AoeCone
                | SkillCategory::AreaOfEffect
        )
    }
}

/// Faction-based eligibility filter for a skill's targets.
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
pub enum Affinity {
    /// Factions hostile to the caster.
    #[default]
    Enemy,
    /// The caster's own faction.
    #[strum(to_string = "self")]
    #[cfg_attr(feature = "serde", serde(alias = "Self"))]
    SelfOnly,
    /// The caster's faction and its allies.
    Ally,
    /// Everything.
    All,
}

/// When damage is checked.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DamageTiming {
    /// One instantaneous check on cast.
    #[default]
    Frame,
    /// Repeated checks every `tick_interval` for `duration` seconds.
    TimeWindow { duration: f32 },
}

impl DamageTiming {
    pub fn is_time_window(&self) -> bool {
        matches!(self, DamageTiming::TimeWindow { .. })
    }
}

/// Cue names played on cast start and on each successful hit.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SkillCues {
    pub start: Option<String>,
    pub hit: Option<String>,
}

/// Immutable description of one skill.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SkillDefinition {
    pub id: SkillId,
    pub name: String,
    pub category: SkillCategory,
    pub affinity: Affinity,

    /// Damage per application.
    pub damage: f32,
    /// Radius for nearest, circle AOE, buff and heal searches.
    pub range: f32,
    pub cone: ConeParams,
    /// Directional box for `SingleBox` / `AoeBox`.
    pub extents: BoxExtents,
    pub aoe: AoeShape,

    pub buff: Option<BuffParams>,
    pub heal_amount: f32,

    pub timing: DamageTiming,
    /// Re-damage targets on every tick instead of once per session.
    pub multi_hit: bool,
    /// Seconds between ticks of a time-window skill.
    pub tick_interval: f32,

    pub projectile: Option<ProjectileParams>,
    pub summon: Option<SummonParams>,
    pub movement: Option<MovementParams>,

    pub cues: SkillCues,
}

impl Default for SkillDefinition {
    fn default() -> Self {
        Self {
            id: SkillId::default(),
            name: String::new(),
            category: SkillCategory::default(),
            affinity: Affinity::default(),
            damage: 0.0,
            range: 3.0,
            cone: ConeParams::default(),
            extents: BoxExtents::default(),
            aoe: AoeShape::default(),
            buff: None,
            heal_amount: 0.0,
            timing: DamageTiming::Frame,
            multi_hit: false,
            tick_interval: 0.1,
            projectile: None,
            summon: None,
            movement: None,
            cues: SkillCues::default(),
        }
    }
}

impl SkillDefinition {
    /// Creates a definition with default parameters for the given category.
    pub fn new(id: u32, name: impl Into<String>, category: SkillCategory) -> Self {
        Self {
            id: SkillId(id),
            name: name.into(),
            category,
            ..Self::default()
        }
    }

    pub fn with_affinity(mut self, affinity: Affinity) -> Self {
        self.affinity = affinity;
        self
    }

    pub fn with_damage(mut self, damage: f32) -> Self {
        self.damage = damage;
        self
    }

    pub fn with_range(mut self, range: f32) -> Self {
        self.range = range;
        self
    }

    pub fn with_cone(mut self, angle_deg: f32, radius: f32) -> Self {
        self.cone = ConeParams::new(angle_deg, radius);
        self
    }

    pub fn with_extents(mut self, extents: BoxExtents) -> Self {
        self.extents = extents;
        self
    }

    pub fn with_aoe(mut self, aoe: AoeShape) -> Self {
        self.aoe = aoe;
        self
    }

    pub fn with_buff(mut self, buff: BuffParams) -> Self {
        self.buff = Some(buff);
        self
    }

    pub fn with_heal(mut self, amount: f32) -> Self {
        self.heal_amount = amount;
        self
    }

    /// Switches to time-window timing.
    pub fn with_time_window(mut self, duration: f32, tick_interval: f32, multi_hit: bool) -> Self {
        self.timing = DamageTiming::TimeWindow { duration };
        self.tick_interval = tick_interval;
        self.multi_hit = multi_hit;
        self
    }

    pub fn with_projectile(mut self, projectile: ProjectileParams) -> Self {
        self.projectile = Some(projectile);
        self
    }

    pub fn with_summon(mut self, summon: SummonParams) -> Self {
        self.summon = Some(summon);
        self
    }

    pub fn with_movement(mut self, movement: MovementParams) -> Self {
        self.movement = Some(movement);
        self
    }

    pub fn with_cues(mut self, start: Option<&str>, hit: Option<&str>) -> Self {
        self.cues = SkillCues {
            start: start.map(str::to_owned),
            hit: hit.map(str::to_owned),
        };
        self
    }

    /// Self-affinity buffs and heals land on the caster without a geometry
    /// query.
    pub fn is_self_cast(&self) -> bool {
        matches!(self.category, SkillCategory::Buff | SkillCategory::Heal)
            && self.affinity == Affinity::SelfOnly
    }

    /// Amount applied per hit: heal amount for heals, damage otherwise.
    pub fn hit_amount(&self) -> f32 {
        match self.category {
            SkillCategory::Heal => self.heal_amount,
            _ => self.damage,
        }
    }

    /// Checks that every parameter the category reads is usable.
    ///
    /// # Errors
    ///
    /// Returns the first [`DefinitionError`] found.
    pub fn validate(&self) -> Result<(), DefinitionError> {
        non_negative("damage", self.damage)?;
        non_negative("range", self.range)?;
        non_negative("heal_amount", self.heal_amount)?;

        if let DamageTiming::TimeWindow { duration } = self.timing {
            if duration <= 0.0 {
                return Err(DefinitionError::NonPositiveDuration(duration));
            }
            if self.tick_interval <= 0.0 {
                return Err(DefinitionError::NonPositiveTickInterval(self.tick_interval));
            }
        }

        match self.category {
            SkillCategory::SingleCone | SkillCategory::AoeCone => {
                let angle = self.cone.angle_deg;
                if angle <= 0.0 || angle > 360.0 {
                    return Err(DefinitionError::ConeAngleOutOfRange(angle));
                }
                non_negative("cone.radius", self.cone.radius)?;
            }
            SkillCategory::SingleBox | SkillCategory::AoeBox => {
                check_extents(&self.extents)?;
            }
            SkillCategory::AreaOfEffect => {
                if let AoeShape::Rectangle(extents) = &self.aoe {
                    check_extents(extents)?;
                }
            }
            SkillCategory::Buff => {
                if self.buff.is_none() {
                    return Err(DefinitionError::MissingBuff);
                }
            }
            SkillCategory::Projectile => {
                let projectile = self
                    .projectile
                    .as_ref()
                    .ok_or(DefinitionError::MissingProjectile)?;
                if projectile.prefab.is_none() {
                    return Err(DefinitionError::MissingProjectilePrefab);
                }
                non_negative("projectile.speed", projectile.speed)?;
                non_negative("projectile.max_range", projectile.max_range)?;
                match projectile.kind {
                    ProjectileKind::Homing => {
                        let count = projectile.homing_count;
                        if count == 0 || count as usize > SkillConfig::MAX_HOMING_TARGETS {
                            return Err(DefinitionError::HomingCountOutOfRange { count });
                        }
                    }
                    ProjectileKind::Dot => {
                        if projectile.dot_interval <= 0.0 {
                            return Err(DefinitionError::NonPositiveTickInterval(
                                projectile.dot_interval,
                            ));
                        }
                        if projectile.dot_duration <= 0.0 {
                            return Err(DefinitionError::NonPositiveDuration(
                                projectile.dot_duration,
                            ));
                        }
                    }
                    ProjectileKind::Aoe => {
                        non_negative("projectile.aoe_radius", projectile.aoe_radius)?
                    }
                    ProjectileKind::Standard => {}
                }
            }
            SkillCategory::Summon => {
                let summon = self.summon.as_ref().ok_or(DefinitionError::MissingSummon)?;
                if summon.prefab.is_none() {
                    return Err(DefinitionError::MissingSummonPrefab);
                }
            }
            SkillCategory::SingleNearest | SkillCategory::Heal => {}
        }

        if let Some(movement) = &self.movement {
            non_negative("movement.distance", movement.distance)?;
            non_negative("movement.duration", movement.duration)?;
            if !movement.curve.is_well_formed() {
                return Err(DefinitionError::UnsortedKeyframes);
            }
        }

        Ok(())
    }
}

fn non_negative(field: &'static str, value: f32) -> Result<(), DefinitionError> {
    if value < 0.0 || value.is_nan() {
        return Err(DefinitionError::NegativeValue { field, value });
    }
    Ok(())
}

fn check_extents(extents: &BoxExtents) -> Result<(), DefinitionError> {
    match extents.has_negative() {
        Some((field, value)) => Err(DefinitionError::NegativeValue { field, value }),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_nearest_skill_is_valid() {
        let skill = SkillDefinition::new(1, "slash", SkillCategory::SingleNearest).with_damage(5.0);
        assert_eq!(skill.validate(), Ok(()));
    }

    #[test]
    fn time_window_requires_positive_interval() {
        let skill = SkillDefinition::new(2, "burn", SkillCategory::AreaOfEffect)
            .with_time_window(1.0, 0.0, false);
        assert_eq!(
            skill.validate(),
            Err(DefinitionError::NonPositiveTickInterval(0.0))
        );
    }

    #[test]
    fn projectile_requires_prefab() {
        let mut params = ProjectileParams::new("arrow", ProjectileKind::Standard);
        params.prefab = None;
        let skill =
            SkillDefinition::new(3, "arrow", SkillCategory::Projectile).with_projectile(params);
        assert_eq!(skill.validate(), Err(DefinitionError::MissingProjectilePrefab));

        let bare = SkillDefinition::new(4, "bare", SkillCategory::Projectile);
        assert_eq!(bare.validate(), Err(DefinitionError::MissingProjectile));
    }

    #[test]
    fn homing_count_is_bounded() {
        let mut params = ProjectileParams::new("orb", ProjectileKind::Homing);
        params.homing_count = 0;
        let skill = SkillDefinition::new(5, "orbs", SkillCategory::Projectile)
            .with_projectile(params.clone());
        assert_eq!(
            skill.validate(),
            Err(DefinitionError::HomingCountOutOfRange { count: 0 })
        );

        params.homing_count = 17;
        let skill =
            SkillDefinition::new(5, "orbs", SkillCategory::Projectile).with_projectile(params);
        assert!(skill.validate().is_err());
    }

    #[test]
    fn cone_angle_range() {
        let skill = SkillDefinition::new(6, "fan", SkillCategory::AoeCone).with_cone(0.0, 4.0);
        assert_eq!(skill.validate(), Err(DefinitionError::ConeAngleOutOfRange(0.0)));

        let skill = SkillDefinition::new(6, "fan", SkillCategory::AoeCone).with_cone(360.0, 4.0);
        assert_eq!(skill.validate(), Ok(()));
    }

    #[test]
    fn negative_box_extent_is_rejected() {
        let skill = SkillDefinition::new(7, "sweep", SkillCategory::AoeBox)
            .with_extents(BoxExtents::new(1.0, -1.0, 1.0, 1.0));
        assert_eq!(
            skill.validate(),
            Err(DefinitionError::NegativeValue {
                field: "backward",
                value: -1.0
            })
        );
    }

    #[test]
    fn heal_uses_heal_amount() {
        let skill = SkillDefinition::new(8, "mend", SkillCategory::Heal)
            .with_damage(3.0)
            .with_heal(12.0);
        assert_eq!(skill.hit_amount(), 12.0);
    }

    #[test]
    fn affinity_self_has_keyword_name() {
        assert_eq!(Affinity::SelfOnly.to_string(), "self");
        assert_eq!("self".parse::<Affinity>().ok(), Some(Affinity::SelfOnly));
    }
}
