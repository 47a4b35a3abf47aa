//! Content factory for loading skills and configuration from a data directory.

use std::path::{Path, PathBuf};

use skill_core::SkillConfig;

use crate::loaders::{ConfigLoader, LoadResult, SkillCatalog};

/// Loads all skill content from a data directory.
///
/// # Directory Structure
///
/// ```text
/// data_dir/
/// ├── config.toml
/// └── skills/
///     ├── melee.ron
///     └── spells.ron
/// ```
pub struct ContentFactory {
    data_dir: PathBuf,
}

impl ContentFactory {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Factory over the `data/` directory shipped with this crate.
    pub fn bundled_dir() -> Self {
        Self::new(Path::new(env!("CARGO_MANIFEST_DIR")).join("data"))
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Load engine configuration from `config.toml`.
    pub fn load_config(&self) -> LoadResult<SkillConfig> {
        ConfigLoader::load(&self.data_dir.join("config.toml"))
    }

    /// Load every catalog under `skills/`.
    pub fn load_skills(&self) -> LoadResult<SkillCatalog> {
        SkillCatalog::load_dir(&self.data_dir.join("skills"))
    }
}
