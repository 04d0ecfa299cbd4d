//! Generation - spawning the agent, the floor, and the things on it.

mod agent;
mod dust;

pub use agent::*;
pub use dust::*;
