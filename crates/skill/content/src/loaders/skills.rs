//! Skill catalog loader.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use skill_core::{SkillDefinition, SkillId};

use crate::loaders::{LoadResult, read_file};

/// Bundled catalog files, in load order.
const BUNDLED: &[(&str, &str)] = &[
    ("melee.ron", include_str!("../../data/skills/melee.ron")),
    ("spells.ron", include_str!("../../data/skills/spells.ron")),
    ("support.ron", include_str!("../../data/skills/support.ron")),
];

/// On-disk layout of one catalog file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogFile {
    pub skills: Vec<SkillDefinition>,
}

/// Loader for skill definitions from RON files.
pub struct SkillLoader;

impl SkillLoader {
    /// Load every definition of a RON catalog file.
    pub fn load(path: &Path) -> LoadResult<Vec<SkillDefinition>> {
        let content = read_file(path)?;
        Self::parse(&content, &path.display().to_string())
    }

    /// Parse catalog text; `source` names it in error messages.
    pub fn parse(content: &str, source: &str) -> LoadResult<Vec<SkillDefinition>> {
        let file: CatalogFile = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse skill catalog {}: {}", source, e))?;
        Ok(file.skills)
    }
}

/// Validated skill definitions indexed by id.
#[derive(Debug, Clone, Default)]
pub struct SkillCatalog {
    skills: BTreeMap<SkillId, SkillDefinition>,
}

impl SkillCatalog {
    /// Catalog built from the files embedded in this crate.
    pub fn bundled() -> LoadResult<Self> {
        let mut catalog = Self::default();
        for (name, content) in BUNDLED {
            catalog.extend(SkillLoader::parse(content, name)?)?;
        }
        tracing::debug!(skills = catalog.len(), "bundled skill catalog loaded");
        Ok(catalog)
    }

    /// Catalog built from every `*.ron` file in `dir`, in file-name order.
    pub fn load_dir(dir: &Path) -> LoadResult<Self> {
        let entries = std::fs::read_dir(dir)
            .map_err(|e| anyhow::anyhow!("Failed to read directory {}: {}", dir.display(), e))?;

        let mut paths = Vec::new();
        for entry in entries {
            let path = entry?.path();
            if path.extension().is_some_and(|ext| ext == "ron") {
                paths.push(path);
            }
        }
        paths.sort();

        let mut catalog = Self::default();
        for path in &paths {
            catalog.extend(SkillLoader::load(path)?)?;
        }
        tracing::debug!(dir = %dir.display(), skills = catalog.len(), "skill catalog loaded");
        Ok(catalog)
    }

    /// Validates and adds definitions. Ids must be unique across the catalog.
    pub fn extend(&mut self, skills: impl IntoIterator<Item = SkillDefinition>) -> LoadResult<()> {
        for skill in skills {
            skill.validate().map_err(|e| {
                anyhow::anyhow!("Invalid skill {} ({}): {}", skill.id, skill.name, e)
            })?;
            if let Some(existing) = self.skills.get(&skill.id) {
                anyhow::bail!(
                    "Duplicate skill id {}: {} and {}",
                    skill.id,
                    existing.name,
                    skill.name
                );
            }
            self.skills.insert(skill.id, skill);
        }
        Ok(())
    }

    pub fn get(&self, id: SkillId) -> Option<&SkillDefinition> {
        self.skills.get(&id)
    }

    /// First definition named `name`.
    pub fn by_name(&self, name: &str) -> Option<&SkillDefinition> {
        self.skills.values().find(|skill| skill.name == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &SkillDefinition> {
        self.skills.values()
    }

    pub fn len(&self) -> usize {
        self.skills.len()
    }

    pub fn is_empty(&self) -> bool {
        self.skills.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use skill_core::{Affinity, DamageTiming, ProjectileKind, SkillCategory};

    use super::*;

    #[test]
    fn bundled_catalog_loads_and_validates() {
        let catalog = SkillCatalog::bundled().expect("bundled catalog");
        assert!(catalog.len() >= 10);
        assert!(catalog.iter().all(|skill| skill.validate().is_ok()));

        let storm = catalog.by_name("storm").unwrap();
        assert_eq!(storm.category, SkillCategory::AreaOfEffect);
        assert!(matches!(storm.timing, DamageTiming::TimeWindow { .. }));
        assert!(storm.multi_hit);

        let seekers = catalog.by_name("seekers").unwrap();
        let projectile = seekers.projectile.as_ref().unwrap();
        assert_eq!(projectile.kind, ProjectileKind::Homing);
        assert_eq!(projectile.homing_count, 3);

        let rally = catalog.by_name("rally").unwrap();
        assert_eq!(rally.affinity, Affinity::SelfOnly);
    }

    #[test]
    fn ids_index_the_catalog() {
        let catalog = SkillCatalog::bundled().unwrap();
        for skill in catalog.iter() {
            assert_eq!(catalog.get(skill.id).map(|s| &s.name), Some(&skill.name));
        }
        assert!(catalog.get(SkillId(9999)).is_none());
    }

    #[test]
    fn omitted_fields_take_defaults() {
        let skills = SkillLoader::parse(
            r#"(skills: [(id: 7, name: "poke", category: SingleNearest, damage: 2.0)])"#,
            "inline",
        )
        .unwrap();
        assert_eq!(skills.len(), 1);
        assert_eq!(skills[0].id, SkillId(7));
        assert_eq!(skills[0].affinity, Affinity::Enemy);
        assert_eq!(skills[0].timing, DamageTiming::Frame);
    }

    #[test]
    fn invalid_definition_fails_the_load() {
        let skills = SkillLoader::parse(
            r#"(skills: [(id: 1, name: "broken", category: Projectile)])"#,
            "inline",
        )
        .unwrap();
        let err = SkillCatalog::default().extend(skills).unwrap_err();
        assert!(err.to_string().contains("broken"));
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let mut catalog = SkillCatalog::default();
        let skill = SkillDefinition::new(1, "a", SkillCategory::SingleNearest);
        catalog.extend([skill.clone()]).unwrap();
        let err = catalog.extend([skill]).unwrap_err();
        assert!(err.to_string().contains("Duplicate"));
    }

    #[test]
    fn loads_a_directory_in_name_order() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("b.ron"),
            r#"(skills: [(id: 2, name: "second", category: SingleNearest)])"#,
        )
        .unwrap();
        fs::write(
            dir.path().join("a.ron"),
            r#"(skills: [(id: 1, name: "first", category: SingleNearest)])"#,
        )
        .unwrap();
        fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let catalog = SkillCatalog::load_dir(dir.path()).unwrap();
        let names: Vec<&str> = catalog.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["first", "second"]);
    }

    #[test]
    fn parse_errors_name_the_source() {
        let err = SkillLoader::parse("(skills: [", "broken.ron").unwrap_err();
        assert!(err.to_string().contains("broken.ron"));
    }
}
