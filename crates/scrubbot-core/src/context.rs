//! Session-wide state shared by systems.
//!
//! Owned by the [`SessionEngine`](crate::engine::SessionEngine) and handed
//! to systems by `&mut`, so score, objectives and the outbox have exactly
//! one owner for the lifetime of a session.

use scrubbot_logic::config::SessionConfig;
use scrubbot_logic::objectives::{ObjectiveTracker, ScoreLedger};

use serde::Serialize;

use crate::events::Notification;

/// How a session ended. Once set, ticks stop advancing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SessionOutcome {
    Won,
    GameOver,
}

#[derive(Debug)]
pub struct SessionContext {
    /// Current tick.
    pub now: u64,
    pub score: ScoreLedger,
    pub objectives: ObjectiveTracker,
    pub outbox: Vec<Notification>,
    pub outcome: Option<SessionOutcome>,
}

impl SessionContext {
    pub fn new(config: &SessionConfig) -> Self {
        Self {
            now: 0,
            score: ScoreLedger::new(),
            objectives: ObjectiveTracker::new(&config.objectives),
            outbox: Vec::new(),
            outcome: None,
        }
    }

    pub fn notify(&mut self, notification: Notification) {
        self.outbox.push(notification);
    }

    /// Apply a score delta and announce it.
    pub fn add_score(&mut self, delta: i64) {
        if delta == 0 {
            return;
        }
        let total = self.score.add(delta);
        self.notify(Notification::ScoreChanged { delta, total });
    }

    pub fn is_finished(&self) -> bool {
        self.outcome.is_some()
    }
}
