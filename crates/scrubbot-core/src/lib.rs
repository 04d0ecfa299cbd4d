//! Scrubbot Core - crime scene cleaning session
//!
//! An ECS-based session for a cleaning robot working a stained floor: it
//! brushes contamination off the surface, banks what it removes as bag
//! capacity, collects dust and evidence, and empties the bag at the
//! disposal zone.
//!
//! # Architecture
//!
//! The session uses an Entity Component System (ECS) architecture via `hecs`:
//! - **Entities**: the agent, the stained surface, dust, evidence, furniture
//! - **Components**: plain data (Position, Surface, Dust) plus the logic
//!   crate's ledger, accumulator, condition machine and health
//! - **Systems**: per-tick functions that query and update components
//!
//! Session-wide state (score, objectives, outgoing notifications) lives in
//! a [`SessionContext`](context::SessionContext) owned by the engine.
//!
//! # Example
//!
//! ```rust,no_run
//! use scrubbot_core::prelude::*;
//! use scrubbot_logic::config::SessionConfig;
//!
//! let mut engine = SessionEngine::new(SessionConfig::default()).unwrap();
//! engine.scatter_dust();
//!
//! loop {
//!     let report = engine.update(&TickInput::default());
//!     if engine.outcome().is_some() {
//!         break;
//!     }
//!     let _ = report.cleaned;
//! }
//! ```

pub mod components;
pub mod context;
pub mod engine;
pub mod error;
pub mod events;
pub mod generation;
pub mod hud;
pub mod probe;
pub mod systems;

/// Commonly used types for convenient importing
pub mod prelude {
    pub use crate::components::*;
    pub use crate::context::SessionOutcome;
    pub use crate::engine::{SessionEngine, TickInput, TickReport};
    pub use crate::error::SessionError;
    pub use crate::events::{Notification, PickupRefusal, SessionEvent};
    pub use crate::hud::HudSnapshot;
    pub use crate::probe::{FloorProbe, ProbeHit, SurfaceProbe};
    pub use crate::systems::MoveInput;
}
