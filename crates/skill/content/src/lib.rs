//! Data-driven skill content.
//!
//! Skill catalogs are authored in RON, engine tuning in TOML. The bundled
//! files under `data/` are embedded at compile time; hosts can also load
//! their own from disk through [`ContentFactory`].
//!
//! Every definition is validated on load, so anything that comes out of a
//! [`SkillCatalog`] can be cast without an `InvalidConfiguration` failure.

#[cfg(feature = "loaders")]
pub mod loaders;

#[cfg(feature = "loaders")]
pub use loaders::{ConfigLoader, ContentFactory, SkillCatalog, SkillLoader};
