//! Pixel → capacity-unit conversion.
//!
//! Cleaned pixel counts flow into a carry. Each time the carry reaches the
//! unit threshold one capacity unit is produced and the threshold is
//! subtracted, so `0 <= carry < threshold` holds after every fold. The
//! score delta for a stroke is a tenth of its pixel count, never less
//! than one.

use serde::{Deserialize, Serialize};

/// Score awarded for a single stroke that cleaned `cleaned` pixels.
pub fn score_for_stroke(cleaned: u32) -> i64 {
    (cleaned as i64 / 10).max(1)
}

/// Result of folding one stroke into the accumulator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Conversion {
    pub score_delta: i64,
    pub units: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Accumulator {
    carry: f64,
    unit_threshold: f64,
}

impl Accumulator {
    /// `unit_threshold` should be positive; callers validate it through
    /// [`crate::config::SessionConfig::validate`]. Other values score
    /// strokes but never emit units.
    pub fn new(unit_threshold: f64) -> Self {
        Self {
            carry: 0.0,
            unit_threshold,
        }
    }

    pub fn carry(&self) -> f64 {
        self.carry
    }

    pub fn unit_threshold(&self) -> f64 {
        self.unit_threshold
    }

    /// Fold a stroke's cleaned count. Zero-pixel strokes produce nothing.
    ///
    /// A threshold that is not a positive finite number never produces
    /// units; the stroke still scores and the carry is left untouched.
    pub fn fold(&mut self, cleaned: u32) -> Conversion {
        if cleaned == 0 {
            return Conversion::default();
        }
        if !(self.unit_threshold.is_finite() && self.unit_threshold > 0.0) {
            return Conversion {
                score_delta: score_for_stroke(cleaned),
                units: 0,
            };
        }
        self.carry += cleaned as f64;

        let mut units = 0;
        while self.carry >= self.unit_threshold {
            self.carry -= self.unit_threshold;
            units += 1;
        }

        Conversion {
            score_delta: score_for_stroke(cleaned),
            units,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn score_floor_is_one() {
        assert_eq!(score_for_stroke(1), 1);
        assert_eq!(score_for_stroke(9), 1);
        assert_eq!(score_for_stroke(10), 1);
        assert_eq!(score_for_stroke(709), 70);
    }

    #[test]
    fn exact_threshold_emits_one_unit() {
        let mut acc = Accumulator::new(500.0);
        let a = acc.fold(300);
        assert_eq!(a.units, 0);
        let b = acc.fold(200);
        assert_eq!(b.units, 1);
        assert_eq!(acc.carry(), 0.0);
    }

    #[test]
    fn unusable_threshold_scores_without_units() {
        for threshold in [0.0, -5.0, f64::NAN] {
            let mut acc = Accumulator::new(threshold);
            let c = acc.fold(709);
            assert_eq!(c.units, 0);
            assert_eq!(c.score_delta, 70);
            assert_eq!(acc.carry(), 0.0);
        }
    }

    #[test]
    fn large_stroke_emits_multiple_units() {
        let mut acc = Accumulator::new(100.0);
        let c = acc.fold(709);
        assert_eq!(c.units, 7);
        assert_eq!(acc.carry(), 9.0);
        assert_eq!(c.score_delta, 70);
    }

    #[test]
    fn units_equal_floor_of_total() {
        let strokes = [13u32, 709, 0, 45, 500, 1, 999, 250, 88];
        let threshold = 137.0;
        let mut acc = Accumulator::new(threshold);
        let mut units = 0;
        for s in strokes {
            units += acc.fold(s).units;
            assert!(acc.carry() >= 0.0 && acc.carry() < threshold);
        }
        let total: u32 = strokes.iter().sum();
        assert_eq!(units, total / 137);
        assert_eq!(acc.carry(), (total % 137) as f64);
    }

    #[test]
    fn zero_stroke_is_inert() {
        let mut acc = Accumulator::new(10.0);
        assert_eq!(acc.fold(0), Conversion::default());
        assert_eq!(acc.carry(), 0.0);
    }
}
