//! Continuous (time-window) effects.
//!
//! A session re-resolves its skill's geometry on a fixed cadence and applies
//! the skill's amount to every target it finds. Sessions are keyed by
//! `(caster, slot)` in a [`SessionRegistry`] owned by the scheduler:
//!
//! - Starting a session for a key that already has one cancels the old one.
//! - Stopping removes the key from the registry. The session notices at its
//!   next tick boundary and terminates as [`SessionEnd::Stale`].
//! - A session's hit set lives and dies with the session.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use super::dispatch::DamageDispatcher;
use super::schedule::TickSchedule;
use crate::env::{EffectSink, EntityOracle};
use crate::skill::{CastContext, DamageTiming, SkillCategory, SkillDefinition};
use crate::state::{EntityId, SlotIndex};
use crate::targeting::GeometryResolver;

/// Registry key: one running session per caster slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SessionKey {
    pub caster: EntityId,
    pub slot: SlotIndex,
}

impl SessionKey {
    pub fn new(caster: EntityId, slot: SlotIndex) -> Self {
        Self { caster, slot }
    }
}

impl fmt::Display for SessionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.caster, self.slot)
    }
}

/// Unique id of one session instance; never reused by a scheduler.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SessionId(pub u64);

/// Why a session terminated.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum SessionEnd {
    /// Ran for its full duration.
    Completed,
    /// A newer session took over its key.
    Replaced,
    /// Its key was removed from the registry (explicit stop).
    Stale,
    /// The caster no longer exists or died.
    CasterLost,
}

/// Which session currently owns each key.
#[derive(Clone, Debug, Default)]
pub struct SessionRegistry {
    active: BTreeMap<SessionKey, SessionId>,
}

impl SessionRegistry {
    pub fn get(&self, key: &SessionKey) -> Option<SessionId> {
        self.active.get(key).copied()
    }

    pub fn is_current(&self, key: &SessionKey, id: SessionId) -> bool {
        self.get(key) == Some(id)
    }

    fn insert(&mut self, key: SessionKey, id: SessionId) -> Option<SessionId> {
        self.active.insert(key, id)
    }

    fn remove(&mut self, key: &SessionKey) -> Option<SessionId> {
        self.active.remove(key)
    }

    /// Removes `key` only if `id` still owns it.
    fn release(&mut self, key: &SessionKey, id: SessionId) {
        if self.is_current(key, id) {
            self.active.remove(key);
        }
    }

    pub fn len(&self) -> usize {
        self.active.len()
    }

    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &SessionKey> {
        self.active.keys()
    }
}

/// One running time-window effect.
#[derive(Clone, Debug)]
pub struct ContinuousSession {
    id: SessionId,
    key: SessionKey,
    skill: SkillDefinition,
    context: CastContext,
    schedule: TickSchedule,
    hit: BTreeSet<EntityId>,
    cancelled: bool,
}

impl ContinuousSession {
    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn key(&self) -> SessionKey {
        self.key
    }

    pub fn skill(&self) -> &SkillDefinition {
        &self.skill
    }

    pub fn ticks_fired(&self) -> u32 {
        self.schedule.fired()
    }

    /// Targets already damaged by this session (unused for multi-hit skills).
    pub fn hit_targets(&self) -> &BTreeSet<EntityId> {
        &self.hit
    }
}

/// Per-frame summary of scheduler work.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SchedulerReport {
    pub ticks_fired: u32,
    pub applications: u32,
    pub finished: Vec<(SessionKey, SessionEnd)>,
}

/// Owns every continuous session and advances them once per frame.
#[derive(Clone, Debug, Default)]
pub struct ContinuousScheduler {
    registry: SessionRegistry,
    sessions: Vec<ContinuousSession>,
    next_id: u64,
}

impl ContinuousScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a session for `key`, cancelling any session it replaces.
    ///
    /// Returns `None` if the skill is not time-window timed.
    pub fn start(
        &mut self,
        key: SessionKey,
        skill: &SkillDefinition,
        context: CastContext,
    ) -> Option<SessionId> {
        let DamageTiming::TimeWindow { duration } = skill.timing else {
            return None;
        };

        let id = SessionId(self.next_id);
        self.next_id += 1;

        if let Some(previous) = self.registry.insert(key, id) {
            if let Some(old) = self.sessions.iter_mut().find(|session| session.id == previous) {
                old.cancelled = true;
            }
            tracing::debug!(%key, old = previous.0, new = id.0, "session replaced");
        }

        self.sessions.push(ContinuousSession {
            id,
            key,
            skill: skill.clone(),
            context,
            schedule: TickSchedule::new(skill.tick_interval, duration),
            hit: BTreeSet::new(),
            cancelled: false,
        });
        tracing::info!(%key, session = id.0, skill = %skill.id, duration, "session started");
        Some(id)
    }

    /// Removes `key` from the registry. Idempotent.
    ///
    /// The session itself terminates at its next tick.
    pub fn stop(&mut self, key: SessionKey) -> bool {
        let removed = self.registry.remove(&key).is_some();
        if removed {
            tracing::debug!(%key, "session stop requested");
        }
        removed
    }

    /// Stops every session of `caster`. Returns how many keys were removed.
    pub fn stop_caster(&mut self, caster: EntityId) -> usize {
        let keys: Vec<SessionKey> = self
            .registry
            .keys()
            .filter(|key| key.caster == caster)
            .copied()
            .collect();
        keys.into_iter().filter(|key| self.stop(*key)).count()
    }

    /// Returns true if `key` has a registered, uncancelled session.
    pub fn is_active(&self, key: SessionKey) -> bool {
        self.registry.get(&key).is_some_and(|id| {
            self.sessions
                .iter()
                .any(|session| session.id == id && !session.cancelled)
        })
    }

    pub fn active_count(&self) -> usize {
        self.registry.len()
    }

    pub fn registry(&self) -> &SessionRegistry {
        &self.registry
    }

    pub fn session(&self, key: SessionKey) -> Option<&ContinuousSession> {
        let id = self.registry.get(&key)?;
        self.sessions.iter().find(|session| session.id == id)
    }

    /// Advances every session by one frame.
    ///
    /// Per session: termination checks first, then at most one tick (resolve,
    /// then dispatch), then the clock advances by `dt`.
    pub fn tick(
        &mut self,
        dt: f32,
        resolver: &GeometryResolver<'_>,
        sink: &mut dyn EffectSink,
    ) -> SchedulerReport {
        let mut report = SchedulerReport::default();
        let entities = resolver.entities();
        let registry = &mut self.registry;

        self.sessions.retain_mut(|session| {
            match step(session, registry, dt, resolver, entities, sink, &mut report) {
                Some(end) => {
                    registry.release(&session.key, session.id);
                    tracing::info!(
                        key = %session.key,
                        session = session.id.0,
                        ticks = session.schedule.fired(),
                        %end,
                        "session finished"
                    );
                    report.finished.push((session.key, end));
                    false
                }
                None => true,
            }
        });
        report
    }
}

fn step(
    session: &mut ContinuousSession,
    registry: &SessionRegistry,
    dt: f32,
    resolver: &GeometryResolver<'_>,
    entities: &dyn EntityOracle,
    sink: &mut dyn EffectSink,
    report: &mut SchedulerReport,
) -> Option<SessionEnd> {
    if session.cancelled {
        return Some(SessionEnd::Replaced);
    }
    if !registry.is_current(&session.key, session.id) {
        tracing::debug!(key = %session.key, "stale session tick");
        return Some(SessionEnd::Stale);
    }
    if session.schedule.is_finished() {
        return Some(SessionEnd::Completed);
    }
    let Some(caster) = entities
        .entity(session.key.caster)
        .filter(|info| info.alive)
    else {
        return Some(SessionEnd::CasterLost);
    };
    session.context = session.context.follow(&caster);

    if session.schedule.is_due() {
        session.schedule.fire();
        report.ticks_fired += 1;
        report.applications += fire(session, resolver, entities, sink);
    }
    session.schedule.advance(dt);
    None
}

fn fire(
    session: &mut ContinuousSession,
    resolver: &GeometryResolver<'_>,
    entities: &dyn EntityOracle,
    sink: &mut dyn EffectSink,
) -> u32 {
    let skill = &session.skill;
    let targets = resolver.resolve_targets(skill, &session.context);
    let dispatcher = DamageDispatcher::new(entities).with_hit_cue(skill.cues.hit.as_deref());
    let amount = skill.hit_amount();

    let mut applied = 0;
    for target in targets {
        if !skill.multi_hit && session.hit.contains(&target) {
            continue;
        }
        let outcome = match skill.category {
            SkillCategory::Heal => dispatcher.heal(target, amount, sink),
            _ => dispatcher.apply(target, amount, sink),
        };
        if outcome.is_applied() {
            applied += 1;
            if !skill.multi_hit {
                session.hit.insert(target);
            }
        }
    }

    tracing::trace!(
        key = %session.key,
        tick = session.schedule.fired(),
        applied,
        "session tick"
    );
    applied
}
