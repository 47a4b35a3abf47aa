//! End-to-end scenarios over the bundled skill catalog.

use glam::Vec2;
use skill_content::{ConfigLoader, SkillCatalog};
use skill_core::{CastResult, EntityKind, Faction, SkillId, SlotIndex};
use skill_runtime::{MemoryWorld, SimEvent, Simulation, Wall};

const SLASH: SkillId = SkillId(1);
const LUNGE: SkillId = SkillId(4);
const STORM: SkillId = SkillId(10);
const FIRE_PILLAR: SkillId = SkillId(11);
const ARROW: SkillId = SkillId(13);
const SEEKERS: SkillId = SkillId(14);
const VENOM_DART: SkillId = SkillId(15);
const FIREBALL: SkillId = SkillId(16);
const RALLY: SkillId = SkillId(20);
const MEND: SkillId = SkillId(22);
const WOLVES: SkillId = SkillId(24);

fn simulation(world: MemoryWorld) -> Simulation {
    simulation_at(world, 60.0)
}

fn simulation_at(world: MemoryWorld, frame_rate: f32) -> Simulation {
    let catalog = SkillCatalog::bundled().expect("bundled catalog");
    let config = ConfigLoader::bundled().expect("bundled config");
    Simulation::new(world, catalog, config, frame_rate)
}

#[test]
fn storm_ticks_twenty_times_in_one_second() {
    let mut world = MemoryWorld::new();
    let player = world.spawn(Faction::Player, Vec2::ZERO);
    let enemy = world.spawn(Faction::Hostile, Vec2::new(2.0, 0.0));
    let ally = world.spawn(Faction::Ally, Vec2::new(-1.0, 0.0));
    let mut sim = simulation(world);

    let result = sim.cast(player, STORM, SlotIndex(0)).unwrap();
    assert!(result.outcome().is_some_and(|o| o.session.is_some()));
    sim.run(90).unwrap();

    assert_eq!(sim.log().hits_on(enemy), 20);
    assert_eq!(sim.log().hits_on(ally), 0);
    assert_eq!(sim.world().hp(enemy), Some(60.0));
    assert!(!sim.engine().is_session_active(player, SlotIndex(0)));
}

#[test]
fn recasting_the_same_slot_replaces_the_session() {
    let mut world = MemoryWorld::new();
    let player = world.spawn(Faction::Player, Vec2::ZERO);
    let enemy = world.spawn(Faction::Hostile, Vec2::new(2.0, 0.0));
    let mut sim = simulation(world);

    sim.cast(player, STORM, SlotIndex(0)).unwrap();
    sim.run(30).unwrap();
    sim.cast(player, STORM, SlotIndex(0)).unwrap();
    sim.run(90).unwrap();

    // 10 ticks from the first session, 20 from its replacement.
    assert_eq!(sim.log().hits_on(enemy), 30);
    assert_eq!(sim.engine().scheduler().active_count(), 0);
}

#[test]
fn caster_death_ends_its_session() {
    let mut world = MemoryWorld::new();
    let player = world.spawn(Faction::Player, Vec2::ZERO);
    let enemy = world.spawn(Faction::Hostile, Vec2::new(2.0, 0.0));
    let mut sim = simulation(world);

    sim.cast(player, STORM, SlotIndex(1)).unwrap();
    sim.run(10).unwrap();
    sim.world_mut().kill(player);
    sim.run(60).unwrap();

    let hits = sim.log().hits_on(enemy);
    assert!(hits > 0 && hits < 20, "hits = {hits}");
    assert!(!sim.engine().is_session_active(player, SlotIndex(1)));
}

#[test]
fn single_hit_window_damages_each_target_once() {
    let mut world = MemoryWorld::new();
    let player = world.spawn(Faction::Player, Vec2::ZERO);
    let near = world.spawn(Faction::Hostile, Vec2::new(2.0, 0.0));
    let far = world.spawn(Faction::Hostile, Vec2::new(3.0, 0.5));
    let mut sim = simulation(world);

    sim.cast(player, FIRE_PILLAR, SlotIndex(0)).unwrap();
    sim.run(60).unwrap();
    assert_eq!(sim.log().hits_on(near), 1);
    assert_eq!(sim.log().hits_on(far), 1);
}

#[test]
fn dash_stops_at_wall_and_drops_invincibility() {
    let mut world = MemoryWorld::new();
    let player = world.spawn(Faction::Player, Vec2::ZERO);
    world.spawn(Faction::Hostile, Vec2::new(3.5, 0.0));
    world.add_wall(Wall::new(Vec2::new(1.5, -1.0), Vec2::new(1.6, 1.0)));
    let mut sim = simulation(world);

    let result = sim.cast(player, LUNGE, SlotIndex(0)).unwrap();
    assert!(result.outcome().is_some_and(|o| o.displaced));
    assert!(sim.world().body(player).is_some_and(|b| b.invincible));
    sim.run(30).unwrap();

    let body = sim.world().body(player).unwrap();
    assert!(body.info.position.x > 0.0 && body.info.position.x < 1.5);
    assert!(!body.invincible);
    let toggles: Vec<bool> = sim
        .log()
        .events()
        .filter_map(|event| match event {
            SimEvent::Invincible { on, .. } => Some(*on),
            _ => None,
        })
        .collect();
    assert_eq!(toggles, vec![true, false]);
}

#[test]
fn seekers_lock_three_targets() {
    let mut world = MemoryWorld::new();
    let player = world.spawn(Faction::Player, Vec2::ZERO);
    let enemies = [
        world.spawn(Faction::Hostile, Vec2::new(3.0, 0.0)),
        world.spawn(Faction::Hostile, Vec2::new(-2.0, 1.0)),
        world.spawn(Faction::Hostile, Vec2::new(0.0, 4.0)),
    ];
    let mut sim = simulation(world);

    let result = sim.cast(player, SEEKERS, SlotIndex(0)).unwrap();
    assert_eq!(result.outcome().map(|o| o.projectiles.len()), Some(3));
    sim.run(120).unwrap();

    for enemy in enemies {
        assert_eq!(sim.log().hits_on(enemy), 1, "{enemy}");
    }
    assert!(sim.world().projectiles().is_empty());
    assert!(sim.engine().projectiles().is_empty());
}

#[test]
fn seekers_with_nothing_in_range_spawn_nothing() {
    let mut world = MemoryWorld::new();
    let player = world.spawn(Faction::Player, Vec2::ZERO);
    world.spawn(Faction::Hostile, Vec2::new(30.0, 0.0));
    let mut sim = simulation(world);

    assert_eq!(
        sim.cast(player, SEEKERS, SlotIndex(0)).unwrap(),
        CastResult::NoTarget
    );
    assert!(
        !sim.log()
            .events()
            .any(|event| matches!(event, SimEvent::ProjectileSpawned { .. }))
    );
}

#[test]
fn venom_dart_ticks_for_its_duration() {
    let mut world = MemoryWorld::new();
    let player = world.spawn(Faction::Player, Vec2::ZERO);
    let enemy = world.spawn(Faction::Hostile, Vec2::new(3.0, 0.0));
    let mut sim = simulation(world);

    sim.cast(player, VENOM_DART, SlotIndex(0)).unwrap();
    sim.run(300).unwrap();
    assert_eq!(sim.log().hits_on(enemy), 6);
    assert!(sim.engine().projectiles().is_empty());
}

#[test]
fn arrow_hits_at_low_frame_rate() {
    let mut world = MemoryWorld::new();
    let player = world.spawn(Faction::Player, Vec2::ZERO);
    let enemy = world.spawn(Faction::Hostile, Vec2::new(4.0, 0.0));
    let mut sim = simulation_at(world, 10.0);

    sim.cast(player, ARROW, SlotIndex(0)).unwrap();
    sim.run(20).unwrap();
    assert_eq!(sim.log().hits_on(enemy), 1);
    assert!(sim.world().projectiles().is_empty());
}

#[test]
fn fireball_splashes_around_impact() {
    let mut world = MemoryWorld::new();
    let player = world.spawn(Faction::Player, Vec2::ZERO);
    let first = world.spawn(Faction::Hostile, Vec2::new(4.0, 0.0));
    let splashed = world.spawn(Faction::Hostile, Vec2::new(5.0, 1.0));
    let outside = world.spawn(Faction::Hostile, Vec2::new(4.0, 5.0));
    let mut sim = simulation(world);

    sim.cast(player, FIREBALL, SlotIndex(0)).unwrap();
    sim.run(120).unwrap();
    assert_eq!(sim.log().hits_on(first), 1);
    assert_eq!(sim.log().hits_on(splashed), 1);
    assert_eq!(sim.log().hits_on(outside), 0);
}

#[test]
fn lethal_damage_kills_and_later_casts_find_nothing() {
    let mut world = MemoryWorld::new();
    let player = world.spawn(Faction::Player, Vec2::ZERO);
    let enemy = world.spawn_with(Faction::Hostile, Vec2::new(1.0, 0.0), Default::default(), 20.0);
    let mut sim = simulation(world);

    assert!(sim.cast(player, SLASH, SlotIndex(0)).unwrap().is_success());
    assert!(sim.cast(player, SLASH, SlotIndex(0)).unwrap().is_success());
    assert!(!sim.world().is_alive(enemy));
    assert_eq!(sim.log().deaths(), vec![enemy]);
    assert_eq!(
        sim.cast(player, SLASH, SlotIndex(0)).unwrap(),
        CastResult::NoTarget
    );
}

#[test]
fn support_skills_buff_heal_and_summon() {
    let mut world = MemoryWorld::new();
    let player = world.spawn(Faction::Player, Vec2::ZERO);
    let ally = world.spawn(Faction::Ally, Vec2::new(2.0, 0.0));
    world.spawn(Faction::Hostile, Vec2::new(1.0, 0.0));
    let mut sim = simulation(world);

    sim.cast(player, RALLY, SlotIndex(0)).unwrap();
    assert_eq!(sim.world().body(player).map(|b| b.attack_bonus()), Some(4.0));

    sim.world_mut().damage(ally, 30.0);
    sim.cast(player, MEND, SlotIndex(1)).unwrap();
    assert_eq!(sim.world().hp(ally), Some(85.0));
    assert_eq!(sim.log().total_healing(), 15.0);

    sim.cast(player, WOLVES, SlotIndex(2)).unwrap();
    let summons: Vec<Vec2> = sim
        .world()
        .bodies()
        .filter(|b| b.info.kind == EntityKind::Summon)
        .map(|b| b.info.position)
        .collect();
    assert_eq!(summons, vec![Vec2::new(1.5, 0.0), Vec2::new(2.5, 0.0)]);
}

#[test]
fn event_log_round_trips_through_json() {
    let mut world = MemoryWorld::new();
    let player = world.spawn(Faction::Player, Vec2::ZERO);
    world.spawn(Faction::Hostile, Vec2::new(2.0, 0.0));
    let mut sim = simulation(world);

    sim.cast(player, SEEKERS, SlotIndex(0)).unwrap();
    sim.run(60).unwrap();

    let text = sim.log().to_json_lines().unwrap();
    let reloaded = skill_runtime::EventLog::from_json_lines(&text).unwrap();
    assert_eq!(&reloaded, sim.log());
}
