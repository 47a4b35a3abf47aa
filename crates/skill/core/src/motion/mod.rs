//! Curve-driven caster displacement.
mod curve;
mod displacement;

pub use curve::MotionCurve;
pub use displacement::{
    DisplacementExecutor, DisplacementPhase, DisplacementRequest, DisplacementState, MoveType,
};
