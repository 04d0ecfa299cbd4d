//! Typed events in and notifications out.
//!
//! Collaborators (physics, triggers, input) push [`SessionEvent`]s between
//! ticks; the engine drains them once per tick. Everything the session
//! wants the outside world to know about leaves as a [`Notification`].

use hecs::Entity;
use serde::Serialize;

use crate::components::Evidence;

/// Something that happened to the agent since the previous tick.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    /// Bumped into furniture.
    ObstacleHit,
    /// Touched a dust pile. `entity` is despawned if the pickup is accepted.
    DustPickup { entity: Option<Entity> },
    /// Touched a piece of evidence.
    EvidencePickup {
        evidence: Evidence,
        entity: Option<Entity>,
    },
    ZoneEnter,
    ZoneExit,
    Damage(u32),
    Repair,
}

/// Buffered events awaiting the next tick.
#[derive(Debug, Default)]
pub struct EventInbox {
    events: Vec<SessionEvent>,
}

impl EventInbox {
    pub fn push(&mut self, event: SessionEvent) {
        self.events.push(event);
    }

    pub fn extend<I>(&mut self, events: I)
    where
        I: IntoIterator<Item = SessionEvent>,
    {
        self.events.extend(events);
    }

    pub fn drain(&mut self) -> std::vec::Drain<'_, SessionEvent> {
        self.events.drain(..)
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

/// Why a pickup was turned away.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PickupRefusal {
    Broken,
    BagFull,
    Dead,
}

/// Output for presentation and game-flow collaborators.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Notification {
    ScoreChanged { delta: i64, total: i64 },
    UnitStored { current: u32, max: u32 },
    PickupRefused(PickupRefusal),
    Broke,
    Repaired,
    DashStarted,
    DashReady,
    ScanStarted { revealed: usize },
    ScanEnded,
    ScanReady,
    PromptShown,
    PromptHidden,
    EmptyingStarted,
    EmptyRefused,
    DepositSpawned,
    Won,
    Damaged { health: u32 },
    HealthRestored { health: u32 },
    Died,
    GameOver,
}
