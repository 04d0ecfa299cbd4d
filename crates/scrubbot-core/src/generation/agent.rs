//! Agent and surface spawning.

use hecs::{Entity, World};
use scrubbot_logic::accumulator::Accumulator;
use scrubbot_logic::canvas::{Brush, SourceBitmap, StainCanvas};
use scrubbot_logic::condition::{ConditionMachine, ConditionTimings};
use scrubbot_logic::config::{ConfigError, SessionConfig};
use scrubbot_logic::health::Health;
use scrubbot_logic::ledger::CapacityLedger;
use scrubbot_logic::movement::FloorBounds;

use crate::components::{Agent, Position, Surface, Vec2, Velocity, ZonePresence};

/// Spawn a cleaning agent with empty bag, full health and every ability ready.
pub fn spawn_agent(world: &mut World, config: &SessionConfig, at: Vec2) -> Entity {
    world.spawn((
        Agent::default(),
        Position(at),
        Velocity::default(),
        ZonePresence::default(),
        CapacityLedger::new(config.capacity.max_units),
        Accumulator::new(config.cleaning.unit_threshold),
        ConditionMachine::new(ConditionTimings::from_config(config)),
        Health::new(config.health.max_health),
    ))
}

/// Spawn the floor surface described by `config.surface`, contaminated from
/// `source` if one is given.
pub fn spawn_surface(
    world: &mut World,
    config: &SessionConfig,
    source: Option<&SourceBitmap>,
) -> Result<Entity, ConfigError> {
    let s = &config.surface;
    let canvas = StainCanvas::new(s.resolution, source)?;
    Ok(world.spawn((Surface {
        canvas,
        brush: Brush::circular(s.brush_radius),
        bounds: FloorBounds::new(s.floor_min, s.floor_max),
    },)))
}
