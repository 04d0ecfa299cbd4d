//! Condition state machine for the cleaning agent.
//!
//! Conditions are independent flags rather than one exclusive state:
//!
//! | Flag | Entry | Exit |
//! |------|-------|------|
//! | broken | `hit_limit` obstacle hits | `broken` ticks elapse |
//! | slowed | any pickup | `slow` ticks elapse |
//! | dashing | dash input while ready | `dash` ticks, then `dash_cooldown` before ready again |
//! | emptying | disposal accepted | `empty` ticks elapse |
//! | scanning | scan input while ready | `scan` ticks, then `scan_cooldown` |
//! | dead | health depleted | never (game over after `death_delay`) |
//!
//! Every timed exit goes through a [`TimerQueue`], so a timer scheduled by
//! an earlier trigger cannot clear a flag that a later trigger set.
//!
//! ```
//! use scrubbot_logic::condition::{ConditionMachine, ConditionTimings, HitOutcome};
//! use scrubbot_logic::config::SessionConfig;
//!
//! let mut m = ConditionMachine::new(ConditionTimings::from_config(&SessionConfig::default()));
//! m.on_obstacle_hit(0);
//! m.on_obstacle_hit(1);
//! assert_eq!(m.on_obstacle_hit(2), HitOutcome::Broke);
//! assert!(m.flags().broken);
//! assert_eq!(m.flags().hits, 0);
//! ```

use serde::{Deserialize, Serialize};

use crate::config::{SessionConfig, SlowRetrigger};
use crate::timers::{TimerKind, TimerQueue};

/// Tick durations derived from [`SessionConfig`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConditionTimings {
    pub hit_limit: u32,
    pub broken: u64,
    pub slow: u64,
    pub dash: u64,
    pub dash_cooldown: u64,
    pub empty: u64,
    pub scan: u64,
    pub scan_cooldown: u64,
    pub death_delay: u64,
    pub cleaning_linger: u64,
    pub slow_retrigger: SlowRetrigger,
}

impl ConditionTimings {
    pub fn from_config(cfg: &SessionConfig) -> Self {
        let c = &cfg.conditions;
        Self {
            hit_limit: c.hit_limit,
            broken: cfg.ticks(c.broken_secs),
            slow: cfg.ticks(c.slow_secs),
            dash: cfg.ticks(c.dash_secs),
            dash_cooldown: cfg.ticks(c.dash_cooldown_secs),
            empty: cfg.ticks(c.empty_secs),
            scan: cfg.ticks(c.scan_secs),
            scan_cooldown: cfg.ticks(c.scan_cooldown_secs),
            death_delay: cfg.ticks(cfg.health.death_delay_secs),
            cleaning_linger: cfg.ticks(cfg.cleaning.activity_linger),
            slow_retrigger: c.slow_retrigger,
        }
    }
}

/// Snapshot of every flag, for systems and the HUD.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ConditionFlags {
    pub broken: bool,
    pub slowed: bool,
    pub dashing: bool,
    pub can_dash: bool,
    pub emptying: bool,
    pub scanning: bool,
    pub can_scan: bool,
    pub dead: bool,
    pub cleaning: bool,
    /// Hits counted towards the next breakdown.
    pub hits: u32,
    /// Every obstacle hit that was counted this session.
    pub total_hits: u32,
}

impl ConditionFlags {
    /// Broken, emptying and dead all pin the agent in place.
    pub fn is_disabled(&self) -> bool {
        self.broken || self.emptying || self.dead
    }
}

/// What an obstacle collision did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitOutcome {
    /// Already broken (or dead); nothing changed.
    Ignored,
    /// Counted; `hits` is the new running count.
    Counted { hits: u32 },
    /// This hit reached the limit and the agent broke down.
    Broke,
}

/// Why an ability request was turned down.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Refusal {
    /// The ability is already running.
    Active,
    /// The ability is recharging.
    Cooldown,
    /// The agent is broken, emptying, or dead.
    Disabled,
}

/// A flag change produced by a timer coming due.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Repaired,
    SlowEnded,
    DashEnded,
    DashReady,
    EmptyingFinished,
    ScanEnded,
    ScanReady,
    GameOver,
    CleaningIdle,
}

#[derive(Debug, Clone)]
pub struct ConditionMachine {
    timings: ConditionTimings,
    flags: ConditionFlags,
    timers: TimerQueue,
}

impl ConditionMachine {
    pub fn new(timings: ConditionTimings) -> Self {
        Self {
            timings,
            flags: ConditionFlags {
                can_dash: true,
                can_scan: true,
                ..ConditionFlags::default()
            },
            timers: TimerQueue::new(),
        }
    }

    pub fn flags(&self) -> ConditionFlags {
        self.flags
    }

    pub fn timings(&self) -> &ConditionTimings {
        &self.timings
    }

    pub fn is_disabled(&self) -> bool {
        self.flags.is_disabled()
    }

    /// Ticks left on the latest timer of `kind`, if one is pending.
    pub fn remaining(&self, kind: TimerKind, now: u64) -> Option<u64> {
        self.timers.remaining(kind, now)
    }

    pub fn on_obstacle_hit(&mut self, now: u64) -> HitOutcome {
        if self.flags.broken || self.flags.dead {
            return HitOutcome::Ignored;
        }
        self.flags.hits += 1;
        self.flags.total_hits += 1;

        if self.flags.hits >= self.timings.hit_limit {
            self.flags.broken = true;
            self.flags.hits = 0;
            self.timers.schedule(TimerKind::Broken, now, self.timings.broken);
            HitOutcome::Broke
        } else {
            HitOutcome::Counted {
                hits: self.flags.hits,
            }
        }
    }

    /// A dust or evidence pickup slows the agent for a moment.
    pub fn on_pickup(&mut self, now: u64) {
        self.flags.slowed = true;
        match self.timings.slow_retrigger {
            SlowRetrigger::Sequenced => {
                self.timers.schedule(TimerKind::Slowed, now, self.timings.slow);
            }
            SlowRetrigger::Legacy => {
                self.timers
                    .schedule_unguarded(TimerKind::Slowed, now, self.timings.slow);
            }
        }
    }

    pub fn request_dash(&mut self, now: u64) -> Result<(), Refusal> {
        if self.flags.dashing {
            return Err(Refusal::Active);
        }
        if !self.flags.can_dash {
            return Err(Refusal::Cooldown);
        }
        if self.is_disabled() {
            return Err(Refusal::Disabled);
        }
        self.flags.dashing = true;
        self.flags.can_dash = false;
        self.timers.schedule(TimerKind::Dashing, now, self.timings.dash);
        Ok(())
    }

    /// Start the emptying timer. Zone and capacity gating is the caller's job.
    pub fn begin_emptying(&mut self, now: u64) -> Result<(), Refusal> {
        if self.flags.emptying {
            return Err(Refusal::Active);
        }
        if self.flags.dead {
            return Err(Refusal::Disabled);
        }
        self.flags.emptying = true;
        self.timers.schedule(TimerKind::Emptying, now, self.timings.empty);
        Ok(())
    }

    pub fn request_scan(&mut self, now: u64) -> Result<(), Refusal> {
        if self.flags.scanning {
            return Err(Refusal::Active);
        }
        if !self.flags.can_scan {
            return Err(Refusal::Cooldown);
        }
        if self.flags.dead {
            return Err(Refusal::Disabled);
        }
        self.flags.scanning = true;
        self.flags.can_scan = false;
        self.timers.schedule(TimerKind::Scanning, now, self.timings.scan);
        Ok(())
    }

    /// Health reached zero. Returns `false` if the agent was already dead.
    pub fn on_depleted(&mut self, now: u64) -> bool {
        if self.flags.dead {
            return false;
        }
        self.flags.dead = true;
        self.flags.dashing = false;
        self.timers.cancel(TimerKind::Dashing);
        self.timers.schedule(TimerKind::Dying, now, self.timings.death_delay);
        true
    }

    /// A stroke cleaned something; keep the cleaning indicator lit.
    pub fn mark_cleaning(&mut self, now: u64) {
        self.flags.cleaning = true;
        self.timers
            .schedule(TimerKind::CleaningActivity, now, self.timings.cleaning_linger);
    }

    /// Fire every timer due at `now` and return the resulting transitions.
    pub fn advance(&mut self, now: u64) -> Vec<Transition> {
        let mut transitions = Vec::new();
        for expired in self.timers.expire(now) {
            let transition = match expired.kind {
                TimerKind::Broken => {
                    self.flags.broken = false;
                    Transition::Repaired
                }
                TimerKind::Slowed => {
                    if !self.flags.slowed {
                        continue;
                    }
                    self.flags.slowed = false;
                    Transition::SlowEnded
                }
                TimerKind::Dashing => {
                    self.flags.dashing = false;
                    self.timers.schedule(
                        TimerKind::DashCooldown,
                        expired.expires_at,
                        self.timings.dash_cooldown,
                    );
                    Transition::DashEnded
                }
                TimerKind::DashCooldown => {
                    self.flags.can_dash = true;
                    Transition::DashReady
                }
                TimerKind::Emptying => {
                    self.flags.emptying = false;
                    Transition::EmptyingFinished
                }
                TimerKind::Scanning => {
                    self.flags.scanning = false;
                    self.timers.schedule(
                        TimerKind::ScanCooldown,
                        expired.expires_at,
                        self.timings.scan_cooldown,
                    );
                    Transition::ScanEnded
                }
                TimerKind::ScanCooldown => {
                    self.flags.can_scan = true;
                    Transition::ScanReady
                }
                TimerKind::Dying => Transition::GameOver,
                TimerKind::CleaningActivity => {
                    self.flags.cleaning = false;
                    Transition::CleaningIdle
                }
            };
            transitions.push(transition);
        }
        transitions
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SessionConfig;

    fn machine() -> ConditionMachine {
        ConditionMachine::new(ConditionTimings::from_config(&SessionConfig::default()))
    }

    fn machine_with(f: impl FnOnce(&mut SessionConfig)) -> ConditionMachine {
        let mut cfg = SessionConfig::default();
        f(&mut cfg);
        ConditionMachine::new(ConditionTimings::from_config(&cfg))
    }

    #[test]
    fn third_hit_breaks_and_resets_hits() {
        let mut m = machine();
        assert_eq!(m.on_obstacle_hit(0), HitOutcome::Counted { hits: 1 });
        assert_eq!(m.on_obstacle_hit(0), HitOutcome::Counted { hits: 2 });
        assert_eq!(m.on_obstacle_hit(0), HitOutcome::Broke);
        let f = m.flags();
        assert!(f.broken && f.is_disabled());
        assert_eq!(f.hits, 0);
        assert_eq!(f.total_hits, 3);
    }

    #[test]
    fn hits_while_broken_are_ignored() {
        let mut m = machine();
        for _ in 0..3 {
            m.on_obstacle_hit(0);
        }
        let before = m.remaining(TimerKind::Broken, 10);
        assert_eq!(m.on_obstacle_hit(10), HitOutcome::Ignored);
        assert_eq!(m.flags().hits, 0);
        assert_eq!(m.flags().total_hits, 3);
        assert_eq!(m.remaining(TimerKind::Broken, 10), before);
    }

    #[test]
    fn broken_clears_after_duration() {
        let mut m = machine();
        for _ in 0..3 {
            m.on_obstacle_hit(0);
        }
        let broken = m.timings().broken;
        assert!(m.advance(broken - 1).is_empty());
        assert!(m.flags().broken);
        assert_eq!(m.advance(broken), vec![Transition::Repaired]);
        assert!(!m.flags().broken);
        assert_eq!(m.on_obstacle_hit(broken), HitOutcome::Counted { hits: 1 });
    }

    #[test]
    fn repeated_pickups_extend_slowdown() {
        let mut m = machine();
        let slow = m.timings().slow;
        m.on_pickup(0);
        m.on_pickup(slow / 2);
        // The first timer is stale and must not clear the second pickup.
        assert!(m.advance(slow).is_empty());
        assert!(m.flags().slowed);
        assert_eq!(m.advance(slow / 2 + slow), vec![Transition::SlowEnded]);
        assert!(!m.flags().slowed);
    }

    #[test]
    fn legacy_retrigger_lets_first_timer_win() {
        let mut m = machine_with(|c| c.conditions.slow_retrigger = SlowRetrigger::Legacy);
        let slow = m.timings().slow;
        m.on_pickup(0);
        m.on_pickup(slow / 2);
        assert_eq!(m.advance(slow), vec![Transition::SlowEnded]);
        assert!(!m.flags().slowed);
        // The second timer finds nothing left to clear.
        assert!(m.advance(slow * 2).is_empty());
    }

    #[test]
    fn dash_then_cooldown() {
        let mut m = machine();
        let (dash, cooldown) = (m.timings().dash, m.timings().dash_cooldown);
        assert_eq!(m.request_dash(0), Ok(()));
        assert_eq!(m.request_dash(1), Err(Refusal::Active));

        assert_eq!(m.advance(dash), vec![Transition::DashEnded]);
        assert!(!m.flags().dashing);
        assert_eq!(m.request_dash(dash + 1), Err(Refusal::Cooldown));
        assert_eq!(
            m.request_dash(dash + cooldown - 1),
            Err(Refusal::Cooldown)
        );

        assert_eq!(m.advance(dash + cooldown), vec![Transition::DashReady]);
        assert_eq!(m.request_dash(dash + cooldown), Ok(()));
    }

    #[test]
    fn dash_refused_while_broken() {
        let mut m = machine();
        for _ in 0..3 {
            m.on_obstacle_hit(0);
        }
        assert_eq!(m.request_dash(1), Err(Refusal::Disabled));
        assert!(m.flags().can_dash);
    }

    #[test]
    fn emptying_runs_once() {
        let mut m = machine();
        let empty = m.timings().empty;
        assert_eq!(m.begin_emptying(0), Ok(()));
        assert_eq!(m.begin_emptying(5), Err(Refusal::Active));
        assert!(m.is_disabled());
        assert_eq!(m.advance(empty), vec![Transition::EmptyingFinished]);
        assert!(!m.is_disabled());
    }

    #[test]
    fn scan_cycle() {
        let mut m = machine();
        let (scan, cooldown) = (m.timings().scan, m.timings().scan_cooldown);
        assert_eq!(m.request_scan(0), Ok(()));
        assert_eq!(m.advance(scan), vec![Transition::ScanEnded]);
        assert_eq!(m.request_scan(scan), Err(Refusal::Cooldown));
        assert_eq!(m.advance(scan + cooldown), vec![Transition::ScanReady]);
        assert!(m.flags().can_scan);
    }

    #[test]
    fn death_schedules_game_over() {
        let mut m = machine();
        let delay = m.timings().death_delay;
        assert!(m.on_depleted(0));
        assert!(!m.on_depleted(1));
        assert_eq!(m.on_obstacle_hit(2), HitOutcome::Ignored);
        assert_eq!(m.advance(delay), vec![Transition::GameOver]);
        assert!(m.flags().dead);
    }

    #[test]
    fn cleaning_indicator_lingers() {
        let mut m = machine();
        let linger = m.timings().cleaning_linger;
        m.mark_cleaning(0);
        m.mark_cleaning(3);
        assert!(m.advance(linger).is_empty());
        assert!(m.flags().cleaning);
        assert_eq!(m.advance(linger + 3), vec![Transition::CleaningIdle]);
    }
}
