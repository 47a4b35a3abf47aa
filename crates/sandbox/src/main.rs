//! Scenario runner for the skill engine.
//!
//! Scatters a seeded group of enemies around a player, casts a scripted
//! rotation from the bundled catalog and prints what happened.
//!
//! ```bash
//! SIM_FRAMES=900 SIM_SEED=3 RUST_LOG=skill_core=debug cargo run -p skill-sandbox
//! ```

use anyhow::{Context, Result};
use glam::Vec2;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use skill_content::{ConfigLoader, SkillCatalog};
use skill_core::{CastResult, EntityId, Faction, SlotIndex};
use skill_runtime::{LogConfig, MemoryWorld, SimulationConfig, Simulation, Wall, init_logging};

/// Skills the player fires, by name, and the frame each is cast on.
const ROTATION: &[(u32, &str)] = &[
    (0, "rally"),
    (5, "storm"),
    (70, "seekers"),
    (90, "lunge"),
    (140, "cleave"),
    (180, "venom_dart"),
    (200, "wolves"),
    (240, "fireball"),
    (300, "mend"),
    (320, "fire_pillar"),
    (420, "slash"),
];

const ENEMIES: usize = 8;

fn main() -> Result<()> {
    // Load .env file if it exists (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let config = SimulationConfig::from_env();
    let _guard = init_logging(
        &LogConfig {
            file_name: "sandbox.log".to_string(),
            ..LogConfig::default()
        }
        .with_dir(config.log_dir.clone()),
    )?;

    let catalog = SkillCatalog::bundled().context("loading bundled skills")?;
    let engine_config = ConfigLoader::bundled().context("loading bundled config")?;
    tracing::info!(
        skills = catalog.len(),
        frames = config.frames,
        seed = config.seed,
        "sandbox starting"
    );

    let (world, player) = scene(config.seed);
    let mut sim = Simulation::new(world, catalog, engine_config, config.frame_rate);

    let mut slot = 0u8;
    let mut casts = 0usize;
    for frame in 0..config.frames {
        for (_, name) in ROTATION.iter().filter(|(at, _)| *at == frame) {
            let Some(skill) = sim.catalog().by_name(name).map(|skill| skill.id) else {
                tracing::warn!(%name, "skill missing from catalog");
                continue;
            };
            match sim.cast(player, skill, SlotIndex(slot)) {
                Ok(CastResult::Success(outcome)) => {
                    casts += 1;
                    tracing::info!(%name, targets = outcome.targets.len(), "cast");
                }
                Ok(CastResult::NoTarget) => tracing::info!(%name, "cast found no target"),
                Ok(CastResult::Failure(err)) => tracing::warn!(%name, "cast failed: {err}"),
                Err(err) => tracing::warn!(%name, "cast rejected: {err}"),
            }
            slot = slot.wrapping_add(1) % 4;
        }
        sim.step()?;
    }

    print_summary(&sim, player, casts);

    if let Some(dir) = &config.log_dir {
        std::fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;
        let path = dir.join("events.jsonl");
        sim.log().write_json_lines(&path)?;
        println!("events written to {}", path.display());
    }
    Ok(())
}

/// Player at the origin with one ally, enemies scattered in front, one wall
/// behind.
fn scene(seed: u64) -> (MemoryWorld, EntityId) {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut world = MemoryWorld::new();
    let player = world.spawn(Faction::Player, Vec2::ZERO);
    world.spawn(Faction::Ally, Vec2::new(-1.5, 0.5));
    for _ in 0..ENEMIES {
        let position = Vec2::new(rng.gen_range(0.5..7.0), rng.gen_range(-3.0..3.0));
        let hp = rng.gen_range(40.0..120.0);
        world.spawn_with(Faction::Hostile, position, Default::default(), hp);
    }
    world.add_wall(Wall::new(Vec2::new(-4.0, -2.0), Vec2::new(-3.5, 2.0)));
    (world, player)
}

fn print_summary(sim: &Simulation, player: EntityId, casts: usize) {
    let log = sim.log();
    println!("════════════════════════════════════════");
    println!("  frames simulated : {}", sim.frame());
    println!("  successful casts : {casts}");
    println!("  events logged    : {}", log.len());
    println!("  damage dealt     : {:.1}", log.total_damage());
    println!("  healing done     : {:.1}", log.total_healing());
    println!("  deaths           : {}", log.deaths().len());
    println!("  enemies alive    : {}", sim.world().living(Faction::Hostile));
    if let Some(body) = sim.world().body(player) {
        println!(
            "  player           : hp {:.0}/{:.0} at ({:.2}, {:.2})",
            body.hp, body.max_hp, body.info.position.x, body.info.position.y
        );
    }
    println!("════════════════════════════════════════");
    if let Ok(json) = serde_json::to_string(&sim.engine().config()) {
        tracing::debug!(config = %json, "engine config");
    }
}
