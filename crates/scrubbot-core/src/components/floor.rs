//! Floor components: the stained surface and the things lying on it.

use scrubbot_logic::canvas::{Brush, StainCanvas};
use scrubbot_logic::movement::FloorBounds;
use serde::{Deserialize, Serialize};

/// A cleanable surface: contamination grid, brush, and the world rectangle
/// the grid is stretched over.
#[derive(Debug, Clone)]
pub struct Surface {
    pub canvas: StainCanvas,
    pub brush: Brush,
    pub bounds: FloorBounds,
}

/// A dust pile waiting to be sucked up.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Dust;

/// A piece of evidence.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Evidence {
    pub name: String,
    pub score_value: i64,
    pub capacity_value: u32,
    /// The murder weapon needed to win.
    pub is_knife: bool,
}

impl Evidence {
    pub fn new(name: impl Into<String>, score_value: i64, capacity_value: u32) -> Self {
        Self {
            name: name.into(),
            score_value,
            capacity_value,
            is_knife: false,
        }
    }

    pub fn knife(mut self) -> Self {
        self.is_knife = true;
        self
    }
}

/// Furniture footprint. Dust is never scattered on top of one.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Obstacle {
    pub radius: f32,
}
