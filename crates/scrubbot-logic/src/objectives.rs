//! Score ledger and the objective tracker that decides the win.
//!
//! The session wins when enough dust has been collected, the murder weapon
//! has been found (if the level requires it), and the bag has just been
//! emptied.

use serde::{Deserialize, Serialize};

use crate::config::ObjectiveConfig;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreLedger {
    score: i64,
}

impl ScoreLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, delta: i64) -> i64 {
        self.score += delta;
        self.score
    }

    pub fn score(&self) -> i64 {
        self.score
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectiveTracker {
    pub dust_collected: u32,
    pub dust_required: u32,
    pub has_weapon: bool,
    pub require_weapon: bool,
    pub evidence_found: Vec<String>,
    won: bool,
}

impl ObjectiveTracker {
    pub fn new(cfg: &ObjectiveConfig) -> Self {
        Self {
            dust_collected: 0,
            dust_required: cfg.dust_required,
            has_weapon: false,
            require_weapon: cfg.require_weapon,
            evidence_found: Vec::new(),
            won: false,
        }
    }

    pub fn record_dust(&mut self) {
        self.dust_collected += 1;
    }

    pub fn record_evidence(&mut self, name: &str, is_weapon: bool) {
        self.evidence_found.push(name.to_string());
        if is_weapon {
            self.has_weapon = true;
        }
    }

    /// Would the session be won with `capacity_after_disposal` units left?
    pub fn is_met(&self, capacity_after_disposal: u32) -> bool {
        self.dust_collected >= self.dust_required
            && (self.has_weapon || !self.require_weapon)
            && capacity_after_disposal == 0
    }

    /// Run the win check; returns `true` only the first time it passes.
    pub fn check_win(&mut self, capacity_after_disposal: u32) -> bool {
        if self.won || !self.is_met(capacity_after_disposal) {
            return false;
        }
        self.won = true;
        true
    }

    pub fn is_won(&self) -> bool {
        self.won
    }
}
