//! Session engine - owns the world and runs one tick at a time

use hecs::{Entity, World};
use rand::rngs::StdRng;
use rand::SeedableRng;
use scrubbot_logic::canvas::{MaskSnapshot, SourceBitmap};
use scrubbot_logic::condition::{ConditionFlags, ConditionMachine};
use scrubbot_logic::config::SessionConfig;
use scrubbot_logic::ledger::CapacityLedger;
use scrubbot_logic::movement::FloorBounds;
use serde::Serialize;

use crate::components::*;
use crate::context::{SessionContext, SessionOutcome};
use crate::error::SessionError;
use crate::events::{EventInbox, Notification, SessionEvent};
use crate::generation::{scatter_dust, spawn_agent, spawn_surface};
use crate::hud::HudSnapshot;
use crate::probe::{FloorProbe, ProbeHit, SurfaceProbe};
use crate::systems::*;

/// Everything the player and the physics layer supply for one tick.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TickInput {
    pub movement: MoveInput,
    pub dash: bool,
    pub scan: bool,
    pub dispose: bool,
    /// Probe result from the host. When `None` the engine's own probe runs.
    pub probe: Option<ProbeHit>,
}

/// What one tick did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct TickReport {
    pub tick: u64,
    pub cleaned: u32,
    pub speed: f32,
}

/// One cleaning session: a floor, an agent, and everything lying around.
pub struct SessionEngine {
    /// ECS world containing the agent, the surface and the floor items
    pub world: World,
    config: SessionConfig,
    context: SessionContext,
    inbox: EventInbox,
    agent: Entity,
    surface: Entity,
    bounds: FloorBounds,
    probe: Box<dyn SurfaceProbe>,
    rng: StdRng,
}

impl SessionEngine {
    /// Start a session on a fully contaminated floor.
    pub fn new(config: SessionConfig) -> Result<Self, SessionError> {
        Self::with_source(config, None)
    }

    /// Start a session whose contamination is read from `source`.
    pub fn with_source(
        config: SessionConfig,
        source: Option<&SourceBitmap>,
    ) -> Result<Self, SessionError> {
        config.validate()?;

        let mut world = World::new();
        let surface = spawn_surface(&mut world, &config, source)?;
        let bounds = FloorBounds::new(config.surface.floor_min, config.surface.floor_max);
        let (cx, cz) = bounds.center();
        let agent = spawn_agent(&mut world, &config, Vec2::new(cx, cz));

        log::info!(
            "session started: {}x{} surface, bag of {}, {} Hz",
            config.surface.resolution,
            config.surface.resolution,
            config.capacity.max_units,
            config.tick_rate
        );

        Ok(Self {
            world,
            context: SessionContext::new(&config),
            inbox: EventInbox::default(),
            agent,
            surface,
            bounds,
            probe: Box::new(FloorProbe),
            rng: StdRng::seed_from_u64(config.scatter.seed),
            config,
        })
    }

    /// Replace the default straight-down floor probe.
    pub fn with_probe(mut self, probe: impl SurfaceProbe + 'static) -> Self {
        self.probe = Box::new(probe);
        self
    }

    /// Scatter dust using the session's seeded RNG. Returns how many piles landed.
    pub fn scatter_dust(&mut self) -> usize {
        scatter_dust(&mut self.world, &self.config.scatter, &mut self.rng).len()
    }

    pub fn spawn_dust(&mut self, at: Vec2) -> Entity {
        self.world.spawn((Dust, Position(at)))
    }

    pub fn spawn_evidence(&mut self, evidence: Evidence, at: Vec2) -> Entity {
        self.world.spawn((evidence, Position(at)))
    }

    pub fn spawn_obstacle(&mut self, at: Vec2, radius: f32) -> Entity {
        self.world.spawn((Obstacle { radius }, Position(at)))
    }

    /// Queue an event for the next tick.
    pub fn push_event(&mut self, event: SessionEvent) {
        self.inbox.push(event);
    }

    pub fn extend_events<I>(&mut self, events: I)
    where
        I: IntoIterator<Item = SessionEvent>,
    {
        self.inbox.extend(events);
    }

    /// Advance the session by one tick.
    ///
    /// Order: timers, queued events, ability and disposal input, the brush
    /// stroke, then movement. A finished session ignores further ticks.
    pub fn update(&mut self, input: &TickInput) -> TickReport {
        if self.context.is_finished() {
            return TickReport {
                tick: self.context.now,
                ..TickReport::default()
            };
        }
        self.context.now += 1;

        condition_system(&mut self.world, &mut self.context, self.agent);
        if self.context.is_finished() {
            return TickReport {
                tick: self.context.now,
                ..TickReport::default()
            };
        }

        event_system(
            &mut self.world,
            &mut self.context,
            &self.config,
            self.agent,
            self.inbox.drain(),
        );

        if input.dash {
            dash_system(&mut self.world, &mut self.context, self.agent);
        }
        if input.scan {
            scan_system(&mut self.world, &mut self.context, self.agent);
        }
        if input.dispose {
            if let Err(reason) = request_empty(&mut self.world, &mut self.context, self.agent) {
                log::debug!("dispose input ignored at tick {}: {:?}", self.context.now, reason);
            }
        }

        let hit = input
            .probe
            .or_else(|| self.probe.probe(&self.world, self.agent));
        let cleaned = cleaning_system(
            &mut self.world,
            &mut self.context,
            &self.config,
            self.agent,
            hit,
        );

        let speed = movement_system(
            &mut self.world,
            &self.config.speed,
            self.agent,
            input.movement,
            &self.bounds,
            self.config.tick_seconds(),
        );

        TickReport {
            tick: self.context.now,
            cleaned,
            speed,
        }
    }

    /// Run `ticks` idle ticks.
    pub fn idle(&mut self, ticks: u64) {
        for _ in 0..ticks {
            self.update(&TickInput::default());
        }
    }

    pub fn hud(&self) -> Result<HudSnapshot, SessionError> {
        HudSnapshot::capture(
            &self.world,
            &self.context,
            &self.config,
            self.agent,
            self.surface,
        )
    }

    /// Hand over every notification produced since the last drain.
    pub fn drain_notifications(&mut self) -> Vec<Notification> {
        std::mem::take(&mut self.context.outbox)
    }

    /// Immutable copy of the surface mask for renderers.
    pub fn mask_snapshot(&self) -> Result<MaskSnapshot, SessionError> {
        self.world
            .get::<&Surface>(self.surface)
            .map(|s| s.canvas.snapshot())
            .map_err(|_| SessionError::NotASurface(self.surface))
    }

    /// Place the agent directly, clamped to the floor.
    pub fn teleport_agent(&mut self, at: Vec2) -> Result<(), SessionError> {
        let radius = self
            .world
            .get::<&Agent>(self.agent)
            .map(|a| a.radius)
            .map_err(|_| SessionError::NotAnAgent(self.agent))?;
        let (x, z) = self.bounds.clamp(at.x, at.z, radius);
        let mut pos = self
            .world
            .get::<&mut Position>(self.agent)
            .map_err(|_| SessionError::NotAnAgent(self.agent))?;
        pos.0 = Vec2::new(x, z);
        Ok(())
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn context(&self) -> &SessionContext {
        &self.context
    }

    pub fn agent(&self) -> Entity {
        self.agent
    }

    pub fn surface(&self) -> Entity {
        self.surface
    }

    pub fn tick(&self) -> u64 {
        self.context.now
    }

    pub fn score(&self) -> i64 {
        self.context.score.score()
    }

    pub fn outcome(&self) -> Option<SessionOutcome> {
        self.context.outcome
    }

    pub fn ledger(&self) -> Option<CapacityLedger> {
        self.world.get::<&CapacityLedger>(self.agent).ok().map(|l| *l)
    }

    pub fn flags(&self) -> Option<ConditionFlags> {
        self.world
            .get::<&ConditionMachine>(self.agent)
            .ok()
            .map(|m| m.flags())
    }

    pub fn agent_position(&self) -> Option<Vec2> {
        self.world.get::<&Position>(self.agent).ok().map(|p| p.0)
    }

    /// Count dust piles still on the floor
    pub fn dust_count(&self) -> usize {
        self.world.query::<&Dust>().iter().count()
    }

    /// Count evidence still on the floor
    pub fn evidence_count(&self) -> usize {
        self.world.query::<&Evidence>().iter().count()
    }
}
