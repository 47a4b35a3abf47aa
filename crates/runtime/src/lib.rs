//! In-memory host for the skill engine.
//!
//! [`MemoryWorld`] implements every collaborator trait `skill-core` expects,
//! [`Simulation`] drives a [`skill_core::SkillEngine`] over it at a fixed
//! frame rate, and [`EventLog`] keeps a serializable record of every effect
//! the engine produced.
//!
//! Modules are organized by responsibility:
//! - [`world`] holds entities, walls and the spatial/entity/collision oracles
//! - [`events`] defines the effect record and the buffering sink
//! - [`driver`] owns the frame loop
//! - [`config`] and [`logging`] cover process setup for binaries
pub mod config;
pub mod driver;
pub mod error;
pub mod events;
pub mod logging;
pub mod world;

pub use config::SimulationConfig;
pub use driver::{RunSummary, Simulation};
pub use error::{Result, SimulationError};
pub use events::{CommandBuffer, EventLog, LoggedEvent, SimEvent};
pub use logging::{LogConfig, init_logging};
pub use world::{ActiveBuff, Body, Hit, MemoryWorld, Wall};
