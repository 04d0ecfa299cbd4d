//! Agent health: damage, repair, and the HUD health band.

use serde::{Deserialize, Serialize};

/// Health bands shown on the HUD face.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HealthBand {
    /// Above two thirds.
    Healthy,
    /// Above one third.
    Hurt,
    /// One third or less; the agent smokes.
    Critical,
}

impl HealthBand {
    pub fn from_fraction(fraction: f32) -> Self {
        if fraction > 0.66 {
            Self::Healthy
        } else if fraction > 0.33 {
            Self::Hurt
        } else {
            Self::Critical
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Health {
    current: u32,
    max: u32,
}

impl Health {
    pub fn new(max: u32) -> Self {
        Self { current: max, max }
    }

    pub fn current(&self) -> u32 {
        self.current
    }

    pub fn max(&self) -> u32 {
        self.max
    }

    pub fn fraction(&self) -> f32 {
        if self.max == 0 {
            return 0.0;
        }
        self.current as f32 / self.max as f32
    }

    pub fn band(&self) -> HealthBand {
        HealthBand::from_fraction(self.fraction())
    }

    pub fn is_smoking(&self) -> bool {
        self.fraction() <= 0.33
    }

    pub fn is_depleted(&self) -> bool {
        self.current == 0
    }

    /// Apply damage, flooring at zero. Returns `true` on the hit that
    /// depletes health.
    pub fn take_damage(&mut self, amount: u32) -> bool {
        if self.current == 0 {
            return false;
        }
        self.current = self.current.saturating_sub(amount);
        self.current == 0
    }

    pub fn repair_full(&mut self) {
        self.current = self.max;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bands() {
        assert_eq!(HealthBand::from_fraction(1.0), HealthBand::Healthy);
        assert_eq!(HealthBand::from_fraction(0.66), HealthBand::Hurt);
        assert_eq!(HealthBand::from_fraction(0.34), HealthBand::Hurt);
        assert_eq!(HealthBand::from_fraction(0.33), HealthBand::Critical);
    }

    #[test]
    fn damage_floors_and_reports_depletion_once() {
        let mut h = Health::new(10);
        assert!(!h.take_damage(4));
        assert_eq!(h.band(), HealthBand::Hurt);
        assert!(h.take_damage(40));
        assert_eq!(h.current(), 0);
        assert!(!h.take_damage(1));
        assert!(h.is_smoking());
        h.repair_full();
        assert_eq!(h.current(), 10);
        assert!(!h.is_smoking());
    }
}
