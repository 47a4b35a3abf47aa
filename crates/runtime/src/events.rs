//! Effect records and the sink that buffers them.
//!
//! The engine borrows the world immutably while it runs, so effects cannot be
//! applied as they are emitted. [`CommandBuffer`] collects them; the driver
//! applies the buffer once the engine returns and appends what actually
//! happened to the [`EventLog`].
use std::path::Path;

use glam::Vec2;
use serde::{Deserialize, Serialize};
use skill_core::{
    BuffParams, DamageRoute, EffectSink, EntityId, Frame, ProjectileId, ProjectileSpawn, SkillId,
    SlotIndex, SummonSpawn,
};

/// Something that happened in the simulation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SimEvent {
    CastStarted {
        caster: EntityId,
        skill: SkillId,
        slot: SlotIndex,
    },
    CastRejected {
        caster: EntityId,
        skill: SkillId,
        code: String,
        reason: String,
    },
    Damage {
        target: EntityId,
        amount: f32,
        route: DamageRoute,
    },
    /// Damage the world refused (invincible, dead or missing target).
    Blocked {
        target: EntityId,
        amount: f32,
    },
    Heal {
        target: EntityId,
        amount: f32,
    },
    Buff {
        target: EntityId,
        buff: BuffParams,
    },
    ProjectileSpawned {
        spawn: ProjectileSpawn,
    },
    ProjectileMoved {
        id: ProjectileId,
        position: Vec2,
    },
    ProjectileDespawned {
        id: ProjectileId,
    },
    SummonSpawned {
        entity: EntityId,
        summon: SummonSpawn,
    },
    Moved {
        entity: EntityId,
        position: Vec2,
    },
    Invincible {
        entity: EntityId,
        on: bool,
    },
    Cue {
        name: String,
    },
    Died {
        entity: EntityId,
    },
    Despawned {
        entity: EntityId,
    },
}

/// [`EffectSink`] that records effects for later application.
#[derive(Debug, Default)]
pub struct CommandBuffer {
    events: Vec<SimEvent>,
}

impl CommandBuffer {
    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn into_events(self) -> Vec<SimEvent> {
        self.events
    }
}

impl EffectSink for CommandBuffer {
    fn damage_hostile(&mut self, target: EntityId, amount: f32) {
        self.events.push(SimEvent::Damage {
            target,
            amount,
            route: DamageRoute::Hostile,
        });
    }

    fn damage_friendly(&mut self, target: EntityId, amount: f32) {
        self.events.push(SimEvent::Damage {
            target,
            amount,
            route: DamageRoute::Friendly,
        });
    }

    fn heal(&mut self, target: EntityId, amount: f32) {
        self.events.push(SimEvent::Heal { target, amount });
    }

    fn apply_buff(&mut self, target: EntityId, buff: BuffParams) {
        self.events.push(SimEvent::Buff { target, buff });
    }

    fn spawn_projectile(&mut self, spawn: &ProjectileSpawn) {
        self.events.push(SimEvent::ProjectileSpawned {
            spawn: spawn.clone(),
        });
    }

    fn move_projectile(&mut self, id: ProjectileId, position: Vec2) {
        self.events.push(SimEvent::ProjectileMoved { id, position });
    }

    fn despawn_projectile(&mut self, id: ProjectileId) {
        self.events.push(SimEvent::ProjectileDespawned { id });
    }

    fn spawn_summon(&mut self, summon: &SummonSpawn) {
        // Entity id is assigned when the world applies the spawn.
        self.events.push(SimEvent::SummonSpawned {
            entity: EntityId::default(),
            summon: summon.clone(),
        });
    }

    fn move_entity(&mut self, entity: EntityId, position: Vec2) {
        self.events.push(SimEvent::Moved { entity, position });
    }

    fn set_invincible(&mut self, entity: EntityId, on: bool) {
        self.events.push(SimEvent::Invincible { entity, on });
    }

    fn play_cue(&mut self, cue: &str) {
        self.events.push(SimEvent::Cue {
            name: cue.to_owned(),
        });
    }
}

/// Event stamped with the frame it happened on.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LoggedEvent {
    pub frame: Frame,
    #[serde(flatten)]
    pub event: SimEvent,
}

/// Append-only record of a simulation run.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct EventLog {
    entries: Vec<LoggedEvent>,
}

impl EventLog {
    pub fn push(&mut self, frame: Frame, event: SimEvent) {
        tracing::trace!(%frame, ?event, "event");
        self.entries.push(LoggedEvent { frame, event });
    }

    pub fn entries(&self) -> &[LoggedEvent] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn events(&self) -> impl Iterator<Item = &SimEvent> {
        self.entries.iter().map(|entry| &entry.event)
    }

    /// Total damage that landed.
    pub fn total_damage(&self) -> f32 {
        self.events()
            .map(|event| match event {
                SimEvent::Damage { amount, .. } => *amount,
                _ => 0.0,
            })
            .sum()
    }

    /// Number of damage applications that landed on `target`.
    pub fn hits_on(&self, target: EntityId) -> usize {
        self.events()
            .filter(|event| matches!(event, SimEvent::Damage { target: t, .. } if *t == target))
            .count()
    }

    /// Health actually restored.
    pub fn total_healing(&self) -> f32 {
        self.events()
            .map(|event| match event {
                SimEvent::Heal { amount, .. } => *amount,
                _ => 0.0,
            })
            .sum()
    }

    pub fn deaths(&self) -> Vec<EntityId> {
        self.events()
            .filter_map(|event| match event {
                SimEvent::Died { entity } => Some(*entity),
                _ => None,
            })
            .collect()
    }

    /// One JSON object per line.
    pub fn to_json_lines(&self) -> serde_json::Result<String> {
        let mut out = String::new();
        for entry in &self.entries {
            out.push_str(&serde_json::to_string(entry)?);
            out.push('\n');
        }
        Ok(out)
    }

    pub fn from_json_lines(text: &str) -> serde_json::Result<Self> {
        let entries = text
            .lines()
            .filter(|line| !line.trim().is_empty())
            .map(serde_json::from_str)
            .collect::<serde_json::Result<Vec<LoggedEvent>>>()?;
        Ok(Self { entries })
    }

    pub fn write_json_lines(&self, path: &Path) -> anyhow::Result<()> {
        let text = self.to_json_lines()?;
        std::fs::write(path, text)
            .map_err(|e| anyhow::anyhow!("Failed to write event log {}: {}", path.display(), e))
    }
}
