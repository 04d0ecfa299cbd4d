//! Contamination canvas and circular brush.
//!
//! The canvas is a square grid of cells that are either contaminated or
//! clean. A brush stroke clears every contaminated cell inside a circle
//! centred on a normalized surface coordinate and reports how many cells
//! changed. Cells are never re-contaminated.
//!
//! The grid doubles as the renderable mask: `255` is contaminated, `0` is
//! clean. Presentation code reads it through [`MaskSnapshot`], which is an
//! immutable copy tagged with the revision it was taken at.
//!
//! ```
//! use scrubbot_logic::canvas::{Brush, StainCanvas};
//!
//! let mut canvas = StainCanvas::new(512, None).unwrap();
//! let brush = Brush::circular(15);
//! assert_eq!(canvas.clear_at(&brush, 0.5, 0.5), 709);
//! assert_eq!(canvas.clear_at(&brush, 0.5, 0.5), 0);
//! ```

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::config::ConfigError;

/// Mask value of a contaminated cell.
pub const CONTAMINATED: u8 = 255;

/// Mask value of a clean cell.
pub const CLEAN: u8 = 0;

/// Source pixels with alpha below this are treated as already clean.
pub const CLEAN_ALPHA: f32 = 0.1;

/// An RGBA8 image used to seed the initial contamination pattern.
#[derive(Debug, Clone)]
pub struct SourceBitmap {
    width: u32,
    height: u32,
    rgba: Vec<u8>,
}

impl SourceBitmap {
    /// Wrap raw RGBA8 bytes, row-major, four bytes per pixel.
    pub fn from_rgba(width: u32, height: u32, rgba: Vec<u8>) -> Result<Self, ConfigError> {
        let expected = width as usize * height as usize * 4;
        if width == 0 || height == 0 || rgba.len() != expected {
            return Err(ConfigError::BitmapSize {
                width,
                height,
                expected,
                found: rgba.len(),
            });
        }
        Ok(Self { width, height, rgba })
    }

    /// Build a bitmap from a per-pixel alpha function (handy for fixtures).
    pub fn from_alpha_fn(width: u32, height: u32, alpha: impl Fn(u32, u32) -> u8) -> Self {
        let mut rgba = Vec::with_capacity(width as usize * height as usize * 4);
        for y in 0..height {
            for x in 0..width {
                rgba.extend_from_slice(&[255, 255, 255, alpha(x, y)]);
            }
        }
        Self { width, height, rgba }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Normalized alpha of a pixel.
    pub fn alpha(&self, x: u32, y: u32) -> f32 {
        let idx = (y as usize * self.width as usize + x as usize) * 4 + 3;
        self.rgba.get(idx).copied().unwrap_or(0) as f32 / 255.0
    }
}

/// Circular brush: every integer offset within `radius` of the centre.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Brush {
    radius: u32,
    offsets: Vec<(i32, i32)>,
}

impl Brush {
    pub fn circular(radius: u32) -> Self {
        let r = radius as i32;
        let r2 = (radius as i64) * (radius as i64);
        let mut offsets = Vec::new();
        for dx in -r..=r {
            for dy in -r..=r {
                if (dx as i64) * (dx as i64) + (dy as i64) * (dy as i64) <= r2 {
                    offsets.push((dx, dy));
                }
            }
        }
        Self { radius, offsets }
    }

    pub fn radius(&self) -> u32 {
        self.radius
    }

    pub fn offsets(&self) -> &[(i32, i32)] {
        &self.offsets
    }

    /// Number of cells a stroke covers when nothing is clipped.
    pub fn area(&self) -> usize {
        self.offsets.len()
    }
}

/// Read-only copy of the mask handed to renderers.
#[derive(Debug, Clone)]
pub struct MaskSnapshot {
    pub revision: u64,
    pub width: u32,
    pub height: u32,
    pub data: Arc<[u8]>,
}

/// The contamination grid.
#[derive(Debug, Clone)]
pub struct StainCanvas {
    width: u32,
    height: u32,
    cells: Vec<u8>,
    contaminated: usize,
    initial_contaminated: usize,
    revision: u64,
}

impl StainCanvas {
    /// Allocate a `resolution`×`resolution` grid.
    ///
    /// With a source bitmap each cell samples the nearest source pixel and
    /// starts clean when its alpha is below [`CLEAN_ALPHA`]. Without one,
    /// every cell starts contaminated.
    pub fn new(resolution: u32, source: Option<&SourceBitmap>) -> Result<Self, ConfigError> {
        if resolution == 0 {
            return Err(ConfigError::ZeroResolution);
        }
        let side = resolution as usize;
        let cells = match source {
            Some(src) => {
                let mut cells = Vec::with_capacity(side * side);
                for y in 0..resolution {
                    let sy = (y as u64 * src.height() as u64 / resolution as u64) as u32;
                    for x in 0..resolution {
                        let sx = (x as u64 * src.width() as u64 / resolution as u64) as u32;
                        let cell = if src.alpha(sx, sy) < CLEAN_ALPHA {
                            CLEAN
                        } else {
                            CONTAMINATED
                        };
                        cells.push(cell);
                    }
                }
                cells
            }
            None => vec![CONTAMINATED; side * side],
        };
        let contaminated = cells.iter().filter(|&&c| c == CONTAMINATED).count();

        Ok(Self {
            width: resolution,
            height: resolution,
            cells,
            contaminated,
            initial_contaminated: contaminated,
            revision: 0,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Clear every contaminated cell under the brush centred on `(u, v)`.
    ///
    /// Returns the number of cells that changed. The mask revision only
    /// advances when at least one cell changed.
    pub fn clear_at(&mut self, brush: &Brush, u: f32, v: f32) -> u32 {
        if !u.is_finite() || !v.is_finite() {
            return 0;
        }
        let w = self.width as i64;
        let h = self.height as i64;
        let fx = (u * self.width as f32).floor();
        let fy = (v * self.height as f32).floor();
        let reach = brush.radius() as f32 + 1.0;
        if fx < -reach || fy < -reach || fx > w as f32 + reach || fy > h as f32 + reach {
            return 0;
        }
        let x = fx as i64;
        let y = fy as i64;

        let mut cleaned = 0u32;
        for &(dx, dy) in brush.offsets() {
            let px = x + dx as i64;
            let py = y + dy as i64;
            if px < 0 || py < 0 || px >= w || py >= h {
                continue;
            }
            let idx = (py * w + px) as usize;
            if let Some(cell) = self.cells.get_mut(idx) {
                if *cell == CONTAMINATED {
                    *cell = CLEAN;
                    cleaned += 1;
                }
            }
        }

        if cleaned > 0 {
            self.contaminated -= cleaned as usize;
            self.revision += 1;
        }
        cleaned
    }

    pub fn is_contaminated(&self, x: u32, y: u32) -> bool {
        if x >= self.width || y >= self.height {
            return false;
        }
        let idx = y as usize * self.width as usize + x as usize;
        self.cells.get(idx) == Some(&CONTAMINATED)
    }

    pub fn contaminated_cells(&self) -> usize {
        self.contaminated
    }

    /// Fraction of the initially contaminated area that has been cleaned.
    pub fn cleaned_fraction(&self) -> f32 {
        if self.initial_contaminated == 0 {
            return 1.0;
        }
        1.0 - self.contaminated as f32 / self.initial_contaminated as f32
    }

    /// Bumped once per stroke that changed at least one cell.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Borrow the live mask (row-major, one byte per cell).
    pub fn mask(&self) -> &[u8] {
        &self.cells
    }

    pub fn snapshot(&self) -> MaskSnapshot {
        MaskSnapshot {
            revision: self.revision,
            width: self.width,
            height: self.height,
            data: Arc::from(self.cells.as_slice()),
        }
    }
}
