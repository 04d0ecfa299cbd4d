//! Pure movement logic: speed resolution, camera-relative steering, floor bounds.
//!
//! Speed resolution order (first match wins):
//! 1. Disabled (broken, emptying, or dead) → 0
//! 2. Dashing → dash speed
//! 3. Full / slowed penalties, ordered by [`SpeedPrecedence`]
//! 4. Baseline

use crate::config::{SpeedConfig, SpeedPrecedence};

/// Input magnitude below which the agent stands still.
pub const INPUT_DEADZONE: f32 = 0.1;

/// Flags that feed speed resolution for one tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SpeedFlags {
    pub disabled: bool,
    pub dashing: bool,
    pub full: bool,
    pub slowed: bool,
}

pub fn resolve_speed(cfg: &SpeedConfig, flags: SpeedFlags) -> f32 {
    if flags.disabled {
        return 0.0;
    }
    if flags.dashing {
        return cfg.dash;
    }
    match cfg.precedence {
        SpeedPrecedence::FullFirst => {
            if flags.full {
                cfg.full
            } else if flags.slowed {
                cfg.slowed
            } else {
                cfg.base
            }
        }
        SpeedPrecedence::SlowedFirst => {
            if flags.slowed {
                cfg.slowed
            } else if flags.full {
                cfg.full
            } else {
                cfg.base
            }
        }
    }
}

/// Rotate raw stick input `(x, z)` by the camera yaw (radians) and normalise.
///
/// Returns `(0, 0)` inside the deadzone.
pub fn camera_relative(x: f32, z: f32, yaw: f32) -> (f32, f32) {
    let len = (x * x + z * z).sqrt();
    if !len.is_finite() || len < INPUT_DEADZONE {
        return (0.0, 0.0);
    }
    let (nx, nz) = (x / len, z / len);
    let (sin, cos) = yaw.sin_cos();
    let rx = nx * cos + nz * sin;
    let rz = -nx * sin + nz * cos;
    let rlen = (rx * rx + rz * rz).sqrt();
    if rlen > 0.0 {
        (rx / rlen, rz / rlen)
    } else {
        (0.0, 0.0)
    }
}

/// Axis-aligned floor rectangle in world space (x, z).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FloorBounds {
    pub min_x: f32,
    pub min_z: f32,
    pub max_x: f32,
    pub max_z: f32,
}

impl FloorBounds {
    pub fn new(min: [f32; 2], max: [f32; 2]) -> Self {
        Self {
            min_x: min[0].min(max[0]),
            min_z: min[1].min(max[1]),
            max_x: min[0].max(max[0]),
            max_z: min[1].max(max[1]),
        }
    }

    pub fn width(&self) -> f32 {
        self.max_x - self.min_x
    }

    pub fn depth(&self) -> f32 {
        self.max_z - self.min_z
    }

    pub fn contains(&self, x: f32, z: f32) -> bool {
        x >= self.min_x && x <= self.max_x && z >= self.min_z && z <= self.max_z
    }

    /// Clamp a point inside the floor, keeping `radius` away from the edges.
    /// A radius wider than the floor pins the point to the centre.
    pub fn clamp(&self, x: f32, z: f32, radius: f32) -> (f32, f32) {
        let lo_x = (self.min_x + radius).min(self.center().0);
        let hi_x = (self.max_x - radius).max(self.center().0);
        let lo_z = (self.min_z + radius).min(self.center().1);
        let hi_z = (self.max_z - radius).max(self.center().1);
        (x.clamp(lo_x, hi_x), z.clamp(lo_z, hi_z))
    }

    pub fn center(&self) -> (f32, f32) {
        (
            (self.min_x + self.max_x) / 2.0,
            (self.min_z + self.max_z) / 2.0,
        )
    }

    /// Normalized surface coordinate of a world point, `None` off the floor.
    pub fn uv(&self, x: f32, z: f32) -> Option<(f32, f32)> {
        if !self.contains(x, z) || self.width() <= 0.0 || self.depth() <= 0.0 {
            return None;
        }
        Some((
            (x - self.min_x) / self.width(),
            (z - self.min_z) / self.depth(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flags(disabled: bool, dashing: bool, full: bool, slowed: bool) -> SpeedFlags {
        SpeedFlags {
            disabled,
            dashing,
            full,
            slowed,
        }
    }

    #[test]
    fn disabled_beats_everything() {
        let cfg = SpeedConfig::default();
        assert_eq!(resolve_speed(&cfg, flags(true, true, true, true)), 0.0);
    }

    #[test]
    fn dash_beats_penalties() {
        let cfg = SpeedConfig::default();
        assert_eq!(resolve_speed(&cfg, flags(false, true, true, true)), 25.0);
    }

    #[test]
    fn full_first_ordering() {
        let cfg = SpeedConfig::default();
        assert_eq!(resolve_speed(&cfg, flags(false, false, true, true)), 5.0);
        assert_eq!(resolve_speed(&cfg, flags(false, false, false, true)), 2.0);
        assert_eq!(resolve_speed(&cfg, flags(false, false, false, false)), 10.0);
    }

    #[test]
    fn slowed_first_ordering() {
        let cfg = SpeedConfig {
            precedence: SpeedPrecedence::SlowedFirst,
            ..SpeedConfig::default()
        };
        assert_eq!(resolve_speed(&cfg, flags(false, false, true, true)), 2.0);
        assert_eq!(resolve_speed(&cfg, flags(false, false, true, false)), 5.0);
    }

    #[test]
    fn deadzone_and_normalisation() {
        assert_eq!(camera_relative(0.05, 0.0, 0.0), (0.0, 0.0));
        let (x, z) = camera_relative(3.0, 4.0, 0.0);
        assert!((x - 0.6).abs() < 1e-5 && (z - 0.8).abs() < 1e-5);
    }

    #[test]
    fn yaw_rotates_forward() {
        // Forward (+z) with the camera turned 90° points along +x.
        let (x, z) = camera_relative(0.0, 1.0, std::f32::consts::FRAC_PI_2);
        assert!((x - 1.0).abs() < 1e-5, "x={x}");
        assert!(z.abs() < 1e-5, "z={z}");
    }

    #[test]
    fn floor_clamp_and_uv() {
        let floor = FloorBounds::new([-10.0, -10.0], [10.0, 10.0]);
        assert_eq!(floor.clamp(50.0, -50.0, 0.5), (9.5, -9.5));
        assert_eq!(floor.uv(0.0, 0.0), Some((0.5, 0.5)));
        assert_eq!(floor.uv(-10.0, 10.0), Some((0.0, 1.0)));
        assert_eq!(floor.uv(11.0, 0.0), None);
    }
}
