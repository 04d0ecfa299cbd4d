//! Component definitions for the ECS session.
//!
//! Components are plain data attached to entities. Agent state reuses the
//! logic crate's types directly (ledger, accumulator, condition machine);
//! behaviour lives in systems.

mod agent;
mod common;
mod floor;

pub use agent::*;
pub use common::*;
pub use floor::*;
