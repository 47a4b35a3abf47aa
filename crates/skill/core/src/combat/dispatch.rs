use crate::env::{EffectSink, EntityOracle};
use crate::state::{DamageRoute, EntityId};

/// What happened to one damage or heal application.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DispatchOutcome {
    Damaged(DamageRoute),
    Healed,
    /// Projectiles never take skill damage.
    SkippedProjectile,
    /// Target unknown to the oracle or already dead.
    TargetMissing,
}

impl DispatchOutcome {
    pub fn is_applied(self) -> bool {
        matches!(self, DispatchOutcome::Damaged(_) | DispatchOutcome::Healed)
    }
}

/// Routes amounts to the correct sink for a target's faction.
pub struct DamageDispatcher<'a> {
    entities: &'a dyn EntityOracle,
    hit_cue: Option<&'a str>,
}

impl<'a> DamageDispatcher<'a> {
    pub fn new(entities: &'a dyn EntityOracle) -> Self {
        Self {
            entities,
            hit_cue: None,
        }
    }

    /// Cue played after each successful application.
    pub fn with_hit_cue(mut self, cue: Option<&'a str>) -> Self {
        self.hit_cue = cue;
        self
    }

    pub fn apply(
        &self,
        target: EntityId,
        amount: f32,
        sink: &mut dyn EffectSink,
    ) -> DispatchOutcome {
        let Some(info) = self.entities.entity(target).filter(|info| info.alive) else {
            return DispatchOutcome::TargetMissing;
        };
        if info.is_projectile() {
            tracing::trace!(%target, "projectile ignored by damage dispatch");
            return DispatchOutcome::SkippedProjectile;
        }

        let route = info.faction.damage_route();
        match route {
            DamageRoute::Hostile => sink.damage_hostile(target, amount),
            DamageRoute::Friendly => sink.damage_friendly(target, amount),
        }
        self.play_hit(sink);
        tracing::trace!(%target, amount, %route, "damage applied");
        DispatchOutcome::Damaged(route)
    }

    pub fn heal(
        &self,
        target: EntityId,
        amount: f32,
        sink: &mut dyn EffectSink,
    ) -> DispatchOutcome {
        let Some(info) = self.entities.entity(target).filter(|info| info.alive) else {
            return DispatchOutcome::TargetMissing;
        };
        if info.is_projectile() {
            return DispatchOutcome::SkippedProjectile;
        }

        sink.heal(target, amount);
        self.play_hit(sink);
        tracing::trace!(%target, amount, "heal applied");
        DispatchOutcome::Healed
    }

    fn play_hit(&self, sink: &mut dyn EffectSink) {
        if let Some(cue) = self.hit_cue {
            sink.play_cue(cue);
        }
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec2;

    use super::*;
    use crate::state::{EntityInfo, EntityKind, Faction};
    use crate::testing::{Effect, RecordingSink, Scene};

    fn scene() -> Scene {
        let mut scene = Scene::default();
        scene
            .add(1, 0.0, 0.0, Faction::Hostile)
            .add(2, 1.0, 0.0, Faction::Ally)
            .insert(
                EntityInfo::actor(EntityId(3), Vec2::ZERO, Faction::Hostile)
                    .with_kind(EntityKind::Projectile),
            );
        scene
    }

    #[test]
    fn routes_by_faction_and_plays_cue() {
        let scene = scene();
        let mut sink = RecordingSink::default();
        let dispatcher = DamageDispatcher::new(&scene).with_hit_cue(Some("hit"));

        assert_eq!(
            dispatcher.apply(EntityId(1), 4.0, &mut sink),
            DispatchOutcome::Damaged(DamageRoute::Hostile)
        );
        assert_eq!(
            dispatcher.apply(EntityId(2), 4.0, &mut sink),
            DispatchOutcome::Damaged(DamageRoute::Friendly)
        );
        assert_eq!(sink.cues(), vec!["hit", "hit"]);
        assert_eq!(
            sink.effects[0],
            Effect::Damage(EntityId(1), 4.0, DamageRoute::Hostile)
        );
    }

    #[test]
    fn projectiles_and_missing_targets_are_skipped() {
        let mut scene = scene();
        scene.kill(1);
        let mut sink = RecordingSink::default();
        let dispatcher = DamageDispatcher::new(&scene).with_hit_cue(Some("hit"));

        assert_eq!(
            dispatcher.apply(EntityId(3), 4.0, &mut sink),
            DispatchOutcome::SkippedProjectile
        );
        assert_eq!(
            dispatcher.apply(EntityId(1), 4.0, &mut sink),
            DispatchOutcome::TargetMissing
        );
        assert_eq!(
            dispatcher.heal(EntityId(99), 4.0, &mut sink),
            DispatchOutcome::TargetMissing
        );
        assert!(sink.effects.is_empty());
    }

    #[test]
    fn heal_goes_to_heal_sink() {
        let scene = scene();
        let mut sink = RecordingSink::default();
        let outcome = DamageDispatcher::new(&scene).heal(EntityId(2), 6.0, &mut sink);
        assert_eq!(outcome, DispatchOutcome::Healed);
        assert_eq!(sink.effects, vec![Effect::Heal(EntityId(2), 6.0)]);
    }
}
