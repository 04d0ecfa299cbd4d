//! Per-tick timer queue with sequence-number supersession.
//!
//! Every scheduled timer gets a fresh sequence number. Rescheduling a kind
//! makes the older entry stale: when it comes due it is dropped instead of
//! fired. Unguarded timers skip that check and always fire, which models
//! the legacy "first timer to finish wins" behaviour.
//!
//! ```
//! use scrubbot_logic::timers::{TimerKind, TimerQueue};
//!
//! let mut q = TimerQueue::new();
//! q.schedule(TimerKind::Slowed, 0, 60);
//! q.schedule(TimerKind::Slowed, 30, 60); // restart, first entry is now stale
//! assert!(q.expire(60).is_empty());
//! assert_eq!(q.expire(90).len(), 1);
//! ```

use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap};

use serde::{Deserialize, Serialize};

/// Everything in the session that runs on a timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TimerKind {
    Broken,
    Slowed,
    Dashing,
    DashCooldown,
    Emptying,
    Scanning,
    ScanCooldown,
    Dying,
    CleaningActivity,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
struct Entry {
    expires_at: u64,
    seq: u64,
    kind: TimerKind,
    guarded: bool,
}

/// A timer that came due this tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Expired {
    pub kind: TimerKind,
    pub seq: u64,
    pub expires_at: u64,
}

#[derive(Debug, Clone, Default)]
pub struct TimerQueue {
    heap: BinaryHeap<Reverse<Entry>>,
    /// Latest (sequence, expiry) per kind.
    latest: HashMap<TimerKind, (u64, u64)>,
    next_seq: u64,
}

impl TimerQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule `kind` to fire `duration` ticks after `now`, superseding any
    /// pending timer of the same kind. Returns the sequence number.
    pub fn schedule(&mut self, kind: TimerKind, now: u64, duration: u64) -> u64 {
        self.push(kind, now, duration, true)
    }

    /// Like [`schedule`](Self::schedule) but the entry fires even if a later
    /// timer of the same kind was scheduled after it.
    pub fn schedule_unguarded(&mut self, kind: TimerKind, now: u64, duration: u64) -> u64 {
        self.push(kind, now, duration, false)
    }

    fn push(&mut self, kind: TimerKind, now: u64, duration: u64, guarded: bool) -> u64 {
        self.next_seq += 1;
        let seq = self.next_seq;
        let expires_at = now.saturating_add(duration);
        self.heap.push(Reverse(Entry {
            expires_at,
            seq,
            kind,
            guarded,
        }));
        self.latest.insert(kind, (seq, expires_at));
        seq
    }

    /// Drop every pending timer of `kind`.
    pub fn cancel(&mut self, kind: TimerKind) {
        self.latest.remove(&kind);
        self.heap.retain(|Reverse(e)| e.kind != kind);
    }

    pub fn is_pending(&self, kind: TimerKind) -> bool {
        self.latest.contains_key(&kind)
    }

    /// Ticks until the latest timer of `kind` fires.
    pub fn remaining(&self, kind: TimerKind, now: u64) -> Option<u64> {
        self.latest
            .get(&kind)
            .map(|&(_, expires_at)| expires_at.saturating_sub(now))
    }

    /// Pop every entry due at or before `now`, in expiry order, and return
    /// the ones that still own their kind.
    pub fn expire(&mut self, now: u64) -> Vec<Expired> {
        let mut fired = Vec::new();
        while let Some(Reverse(top)) = self.heap.peek().copied() {
            if top.expires_at > now {
                break;
            }
            self.heap.pop();

            let current = self.latest.get(&top.kind).map(|&(seq, _)| seq) == Some(top.seq);
            if current {
                self.latest.remove(&top.kind);
            }
            if current || !top.guarded {
                fired.push(Expired {
                    kind: top.kind,
                    seq: top.seq,
                    expires_at: top.expires_at,
                });
            }
        }
        fired
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }
}
