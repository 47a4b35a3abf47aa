//! Damage application and continuous effects.
mod continuous;
mod dispatch;
mod schedule;

pub use continuous::{
    ContinuousScheduler, ContinuousSession, SchedulerReport, SessionEnd, SessionId, SessionKey,
    SessionRegistry,
};
pub use dispatch::{DamageDispatcher, DispatchOutcome};
pub use schedule::TickSchedule;
