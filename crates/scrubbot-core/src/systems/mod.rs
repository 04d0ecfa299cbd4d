//! Systems - logic that operates on the agent and the floor

mod abilities;
mod cleaning;
mod conditions;
mod disposal;
mod pickups;
mod movement;

pub use abilities::*;
pub use cleaning::*;
pub use conditions::*;
pub use disposal::*;
pub use pickups::*;
pub use movement::*;
