//! Engine configuration loader.

use std::path::Path;

use skill_core::SkillConfig;

use crate::loaders::{LoadResult, read_file};

const BUNDLED_CONFIG: &str = include_str!("../../data/config.toml");

/// Loader for [`SkillConfig`] from TOML files.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load config data from a TOML file. Missing keys keep their defaults.
    pub fn load(path: &Path) -> LoadResult<SkillConfig> {
        let content = read_file(path)?;
        Self::parse(&content)
            .map_err(|e| anyhow::anyhow!("{} ({})", e, path.display()))
    }

    /// Configuration shipped with the crate.
    pub fn bundled() -> LoadResult<SkillConfig> {
        Self::parse(BUNDLED_CONFIG)
    }

    pub fn parse(content: &str) -> LoadResult<SkillConfig> {
        let config: SkillConfig = toml::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse config TOML: {}", e))?;

        if config.projectile_hit_radius < 0.0 {
            anyhow::bail!(
                "projectile_hit_radius must be non-negative, got {}",
                config.projectile_hit_radius
            );
        }
        if config.max_projectile_lifetime <= 0.0 {
            anyhow::bail!(
                "max_projectile_lifetime must be positive, got {}",
                config.max_projectile_lifetime
            );
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use skill_core::TieBreak;

    use super::*;

    #[test]
    fn bundled_config_parses() {
        let config = ConfigLoader::bundled().unwrap();
        assert_eq!(config.tie_break, TieBreak::EntityId);
        assert!(config.projectile_hit_radius > 0.0);
    }

    #[test]
    fn partial_file_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "tie_break = \"QueryOrder\"").unwrap();

        let config = ConfigLoader::load(file.path()).unwrap();
        assert_eq!(config.tie_break, TieBreak::QueryOrder);
        assert_eq!(
            config.projectile_hit_radius,
            SkillConfig::DEFAULT_PROJECTILE_HIT_RADIUS
        );
    }

    #[test]
    fn rejects_non_positive_lifetime() {
        let err = ConfigLoader::parse("max_projectile_lifetime = 0.0").unwrap_err();
        assert!(err.to_string().contains("max_projectile_lifetime"));
    }

    #[test]
    fn missing_file_names_the_path() {
        let err = ConfigLoader::load(Path::new("/nonexistent/skills.toml")).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/skills.toml"));
    }
}
