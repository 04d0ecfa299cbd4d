//! Movement system - resolve speed, steer relative to the camera, stay on the floor.

use hecs::{Entity, World};
use scrubbot_logic::condition::ConditionMachine;
use scrubbot_logic::config::SpeedConfig;
use scrubbot_logic::ledger::CapacityLedger;
use scrubbot_logic::movement::{camera_relative, resolve_speed, FloorBounds, SpeedFlags};

use crate::components::{Agent, Position, Vec2, Velocity};

/// Raw directional input for one tick.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MoveInput {
    pub x: f32,
    pub z: f32,
    /// Camera yaw in radians.
    pub yaw: f32,
}

/// Move the agent for `delta_seconds`. Returns the resolved speed.
pub fn movement_system(
    world: &mut World,
    speeds: &SpeedConfig,
    agent: Entity,
    input: MoveInput,
    bounds: &FloorBounds,
    delta_seconds: f32,
) -> f32 {
    let Ok((body, pos, vel, ledger, machine)) = world.query_one_mut::<(
        &mut Agent,
        &mut Position,
        &mut Velocity,
        &CapacityLedger,
        &ConditionMachine,
    )>(agent) else {
        return 0.0;
    };

    let flags = machine.flags();
    let speed = resolve_speed(
        speeds,
        SpeedFlags {
            disabled: flags.is_disabled(),
            dashing: flags.dashing,
            full: ledger.is_full(),
            slowed: flags.slowed,
        },
    );
    let (dx, dz) = camera_relative(input.x, input.z, input.yaw);
    vel.0 = Vec2::new(dx, dz) * speed;

    let moved = pos.0 + vel.0 * delta_seconds;
    let (x, z) = bounds.clamp(moved.x, moved.z, body.radius);
    pos.0 = Vec2::new(x, z);
    body.speed = speed;
    speed
}
