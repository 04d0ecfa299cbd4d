//! Bounded inventory counter for the agent's bag.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapacityLedger {
    current: u32,
    max: u32,
}

impl CapacityLedger {
    pub fn new(max: u32) -> Self {
        Self { current: 0, max }
    }

    pub fn current(&self) -> u32 {
        self.current
    }

    pub fn max(&self) -> u32 {
        self.max
    }

    pub fn is_full(&self) -> bool {
        self.current >= self.max
    }

    pub fn is_empty(&self) -> bool {
        self.current == 0
    }

    /// Add one unit unless full. Returns whether the unit was stored.
    pub fn try_add_unit(&mut self) -> bool {
        if self.is_full() {
            return false;
        }
        self.current += 1;
        true
    }

    /// Add up to `units`, stopping at the limit. Returns how many were stored.
    pub fn add_units(&mut self, units: u32) -> u32 {
        let accepted = units.min(self.max - self.current.min(self.max));
        self.current += accepted;
        accepted
    }

    pub fn reset(&mut self) {
        self.current = 0;
    }

    /// `(current, max)` for the HUD.
    pub fn snapshot(&self) -> (u32, u32) {
        (self.current, self.max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn never_exceeds_max() {
        let mut ledger = CapacityLedger::new(3);
        let stored = (0..10).filter(|_| ledger.try_add_unit()).count();
        assert_eq!(stored, 3);
        assert_eq!(ledger.current(), 3);
        assert!(ledger.is_full());
    }

    #[test]
    fn bulk_add_clamps() {
        let mut ledger = CapacityLedger::new(10);
        assert_eq!(ledger.add_units(7), 7);
        assert_eq!(ledger.add_units(7), 3);
        assert_eq!(ledger.add_units(1), 0);
        assert_eq!(ledger.snapshot(), (10, 10));
    }

    #[test]
    fn reset_empties() {
        let mut ledger = CapacityLedger::new(2);
        ledger.try_add_unit();
        assert!(!ledger.is_empty());
        ledger.reset();
        assert!(ledger.is_empty());
        assert!(!ledger.is_full());
    }
}
