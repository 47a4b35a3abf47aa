//! Identities and per-entity facts the skill pipeline reasons about.
//!
//! The engine never owns world entities. It sees them through
//! [`EntityInfo`] snapshots handed out by an [`crate::env::EntityOracle`].
mod common;
mod faction;
mod facing;

pub use common::{EntityId, Frame, SlotIndex};
pub use faction::{DamageRoute, EntityInfo, EntityKind, Faction};
pub use facing::Facing;
