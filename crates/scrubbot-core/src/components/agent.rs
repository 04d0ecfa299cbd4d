//! Agent components: the cleaning robot itself.
//!
//! An agent entity carries `Agent`, `Position`, `Velocity`, `ZonePresence`
//! and the logic crate's `CapacityLedger`, `Accumulator`,
//! `ConditionMachine` and `Health`.

use serde::{Deserialize, Serialize};

/// Marker plus body data for a cleaning agent.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Agent {
    /// Body radius, keeps the agent this far from the floor edge.
    pub radius: f32,
    /// Speed resolved on the last tick.
    pub speed: f32,
}

impl Default for Agent {
    fn default() -> Self {
        Self {
            radius: 0.5,
            speed: 0.0,
        }
    }
}

/// Whether the agent is standing in the disposal zone.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ZonePresence {
    pub in_disposal_zone: bool,
}
