//! Target selection: faction validation, shape resolution, homing locks.
//!
//! Every path follows the same order: query the spatial provider, drop
//! candidates the [`TargetValidator`] rejects, and only then compare
//! distances. A rejected candidate can never shadow a valid one farther away.
mod homing;
mod resolver;
mod shape;
mod validator;

pub use homing::{HomingQuery, HomingSelection, HomingSelector};
pub use resolver::{GeometryResolver, TargetingMode};
pub use shape::{GizmoShape, QueryShape, directional_box};
pub use validator::TargetValidator;
