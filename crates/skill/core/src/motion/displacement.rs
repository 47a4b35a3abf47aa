use glam::Vec2;

use super::MotionCurve;
use crate::config::SkillConfig;
use crate::env::{CollisionProbe, EffectSink};
use crate::skill::MovementParams;
use crate::state::{EntityId, Facing};

/// Direction family of a displacement.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, strum::Display, strum::EnumString,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum MoveType {
    /// Along the caster's facing.
    #[default]
    Dash,
    /// Opposite to the caster's facing.
    Backstep,
    /// World up.
    Vertical,
    /// World right, regardless of facing.
    Horizontal,
}

impl MoveType {
    /// Unit direction for a caster facing `facing`.
    pub fn direction(self, facing: Facing) -> Vec2 {
        match self {
            MoveType::Dash => facing.vector(),
            MoveType::Backstep => -facing.vector(),
            MoveType::Vertical => Vec2::Y,
            MoveType::Horizontal => Vec2::X,
        }
    }
}

/// Where a displacement state machine currently is.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum DisplacementPhase {
    #[default]
    Idle,
    Moving,
    /// Stopped by a collision or cancellation. Position is frozen.
    Interrupted,
    Completed,
}

impl DisplacementPhase {
    pub fn is_finished(self) -> bool {
        matches!(
            self,
            DisplacementPhase::Interrupted | DisplacementPhase::Completed
        )
    }
}

/// Parameters of one displacement, with the direction already resolved.
///
/// Direction is fixed at start; later facing changes do not steer it.
#[derive(Clone, Debug, PartialEq)]
pub struct DisplacementRequest {
    pub direction: Vec2,
    pub distance: f32,
    pub duration: f32,
    pub curve: MotionCurve,
    pub stop_on_collision: bool,
    pub invincible: bool,
}

impl DisplacementRequest {
    pub fn from_params(params: &MovementParams, facing: Facing) -> Self {
        Self {
            direction: params.move_type.direction(facing),
            distance: params.distance,
            duration: params.duration,
            curve: params.curve.clone(),
            stop_on_collision: params.stop_on_collision,
            invincible: params.invincible,
        }
    }
}

/// Progress of an active displacement.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DisplacementState {
    pub start: Vec2,
    /// `start + direction * distance`.
    pub target: Vec2,
    /// Last position written to the sink.
    pub position: Vec2,
    pub elapsed: f32,
    pub duration: f32,
    pub curve: MotionCurve,
    pub stop_on_collision: bool,
    pub interrupted: bool,
    /// Invincibility currently granted by this displacement.
    pub invincible: bool,
}

impl DisplacementState {
    /// Normalised progress in `[0, 1]`.
    pub fn progress(&self) -> f32 {
        if self.duration <= 0.0 {
            return 1.0;
        }
        (self.elapsed / self.duration).clamp(0.0, 1.0)
    }

    /// Curve-interpolated position at the current progress.
    pub fn sample(&self) -> Vec2 {
        let progress = self.progress();
        if progress >= 1.0 {
            return self.target;
        }
        self.start.lerp(self.target, self.curve.evaluate(progress))
    }
}

/// Moves one entity along a curve, frame by frame.
#[derive(Clone, Debug)]
pub struct DisplacementExecutor {
    entity: EntityId,
    phase: DisplacementPhase,
    state: Option<DisplacementState>,
}

impl DisplacementExecutor {
    pub fn new(entity: EntityId) -> Self {
        Self {
            entity,
            phase: DisplacementPhase::Idle,
            state: None,
        }
    }

    pub fn entity(&self) -> EntityId {
        self.entity
    }

    pub fn phase(&self) -> DisplacementPhase {
        self.phase
    }

    pub fn state(&self) -> Option<&DisplacementState> {
        self.state.as_ref()
    }

    pub fn position(&self) -> Option<Vec2> {
        self.state.as_ref().map(|state| state.position)
    }

    /// Enters `Moving` from `start`. A displacement already in progress is
    /// interrupted first, so its invincibility never leaks into the new one.
    pub fn start(&mut self, start: Vec2, request: DisplacementRequest, sink: &mut dyn EffectSink) {
        if self.phase == DisplacementPhase::Moving {
            self.finish(DisplacementPhase::Interrupted, sink);
        }

        let target = start + request.direction * request.distance;
        if request.invincible {
            sink.set_invincible(self.entity, true);
        }

        tracing::debug!(
            entity = %self.entity,
            ?start,
            ?target,
            duration = request.duration,
            "displacement started"
        );

        self.state = Some(DisplacementState {
            start,
            target,
            position: start,
            elapsed: 0.0,
            duration: request.duration,
            curve: request.curve,
            stop_on_collision: request.stop_on_collision,
            interrupted: false,
            invincible: request.invincible,
        });
        self.phase = DisplacementPhase::Moving;
    }

    /// Advances by `dt` seconds and returns the resulting phase.
    ///
    /// Without a probe no collision can be detected and the displacement
    /// always runs to completion.
    pub fn tick(
        &mut self,
        dt: f32,
        probe: Option<&dyn CollisionProbe>,
        sink: &mut dyn EffectSink,
    ) -> DisplacementPhase {
        if self.phase != DisplacementPhase::Moving {
            return self.phase;
        }
        let Some(state) = self.state.as_mut() else {
            self.phase = DisplacementPhase::Idle;
            return self.phase;
        };

        state.elapsed += dt;
        let done = state.elapsed + SkillConfig::TIMING_EPSILON >= state.duration;
        if done {
            state.elapsed = state.elapsed.max(state.duration);
        }
        let desired = state.sample();
        let delta = desired - state.position;

        if state.stop_on_collision && delta != Vec2::ZERO {
            let blocked = probe.is_some_and(|probe| probe.probe(state.position, delta));
            if blocked {
                state.interrupted = true;
                tracing::debug!(
                    entity = %self.entity,
                    position = ?state.position,
                    "displacement blocked"
                );
                self.finish(DisplacementPhase::Interrupted, sink);
                return self.phase;
            }
        }

        state.position = desired;
        sink.move_entity(self.entity, desired);

        if done {
            self.finish(DisplacementPhase::Completed, sink);
        }
        self.phase
    }

    /// Stops an active displacement where it stands.
    pub fn cancel(&mut self, sink: &mut dyn EffectSink) {
        if self.phase == DisplacementPhase::Moving {
            if let Some(state) = self.state.as_mut() {
                state.interrupted = true;
            }
            self.finish(DisplacementPhase::Interrupted, sink);
        }
    }

    // Every exit from Moving goes through here.
    fn finish(&mut self, phase: DisplacementPhase, sink: &mut dyn EffectSink) {
        if let Some(state) = self.state.as_mut() {
            if state.invincible {
                sink.set_invincible(self.entity, false);
                state.invincible = false;
            }
        }
        self.phase = phase;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{Effect, RecordingSink};

    fn moves(sink: &RecordingSink) -> Vec<Vec2> {
        sink.effects
            .iter()
            .filter_map(|effect| match effect {
                Effect::Moved(_, position) => Some(*position),
                _ => None,
            })
            .collect()
    }

    fn invincibility(sink: &RecordingSink) -> Vec<bool> {
        sink.effects
            .iter()
            .filter_map(|effect| match effect {
                Effect::Invincible(_, on) => Some(*on),
                _ => None,
            })
            .collect()
    }

    /// Wall at a fixed x coordinate.
    struct Wall(f32);

    impl CollisionProbe for Wall {
        fn probe(&self, from: Vec2, delta: Vec2) -> bool {
            (from.x + delta.x) >= self.0
        }
    }

    fn dash(distance: f32, duration: f32, invincible: bool) -> DisplacementRequest {
        DisplacementRequest {
            direction: Vec2::X,
            distance,
            duration,
            curve: MotionCurve::Linear,
            stop_on_collision: true,
            invincible,
        }
    }

    #[test]
    fn move_type_directions() {
        assert_eq!(MoveType::Dash.direction(Facing::Left), Vec2::new(-1.0, 0.0));
        assert_eq!(MoveType::Backstep.direction(Facing::Left), Vec2::X);
        assert_eq!(MoveType::Vertical.direction(Facing::Left), Vec2::Y);
        assert_eq!(MoveType::Horizontal.direction(Facing::Left), Vec2::X);
    }

    #[test]
    fn uninterrupted_displacement_lands_on_target() {
        let mut sink = RecordingSink::default();
        let mut exec = DisplacementExecutor::new(EntityId(1));
        exec.start(Vec2::new(1.0, 1.0), dash(4.0, 0.5, false), &mut sink);

        let mut phase = exec.phase();
        for _ in 0..100 {
            phase = exec.tick(0.1, None, &mut sink);
            if phase.is_finished() {
                break;
            }
        }
        assert_eq!(phase, DisplacementPhase::Completed);
        assert_eq!(exec.position(), Some(Vec2::new(5.0, 1.0)));
        assert_eq!(moves(&sink).last(), Some(&Vec2::new(5.0, 1.0)));
    }

    #[test]
    fn collision_freezes_position_and_clears_invincibility() {
        let mut sink = RecordingSink::default();
        let mut exec = DisplacementExecutor::new(EntityId(1));
        exec.start(Vec2::ZERO, dash(10.0, 1.0, true), &mut sink);
        assert_eq!(invincibility(&sink), vec![true]);

        let wall = Wall(2.5);
        let mut phase = DisplacementPhase::Moving;
        while phase == DisplacementPhase::Moving {
            phase = exec.tick(0.1, Some(&wall), &mut sink);
        }
        assert_eq!(phase, DisplacementPhase::Interrupted);
        let frozen = exec.position();
        assert!(frozen.is_some_and(|p| (p - Vec2::new(2.0, 0.0)).length() < 1e-4));
        assert_eq!(invincibility(&sink), vec![true, false]);
        assert!(exec.state().is_some_and(|state| state.interrupted && !state.invincible));

        // Further ticks do not move the entity.
        exec.tick(0.1, Some(&wall), &mut sink);
        assert_eq!(exec.position(), frozen);
    }

    #[test]
    fn completion_clears_invincibility() {
        let mut sink = RecordingSink::default();
        let mut exec = DisplacementExecutor::new(EntityId(2));
        exec.start(Vec2::ZERO, dash(1.0, 0.2, true), &mut sink);
        exec.tick(0.1, None, &mut sink);
        assert_eq!(exec.tick(0.1, None, &mut sink), DisplacementPhase::Completed);
        assert_eq!(invincibility(&sink), vec![true, false]);
    }

    #[test]
    fn restart_interrupts_previous_run() {
        let mut sink = RecordingSink::default();
        let mut exec = DisplacementExecutor::new(EntityId(3));
        exec.start(Vec2::ZERO, dash(5.0, 1.0, true), &mut sink);
        exec.start(Vec2::ZERO, dash(5.0, 1.0, false), &mut sink);
        assert_eq!(invincibility(&sink), vec![true, false]);
        assert_eq!(exec.phase(), DisplacementPhase::Moving);
    }

    #[test]
    fn zero_duration_snaps_in_one_tick() {
        let mut sink = RecordingSink::default();
        let mut exec = DisplacementExecutor::new(EntityId(4));
        exec.start(Vec2::ZERO, dash(3.0, 0.0, false), &mut sink);
        assert_eq!(exec.tick(0.016, None, &mut sink), DisplacementPhase::Completed);
        assert_eq!(exec.position(), Some(Vec2::new(3.0, 0.0)));
    }
}
