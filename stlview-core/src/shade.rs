/// Depth quantization into printable glyphs
use std::fmt;

use crate::raster::DepthBuffer;

/// Blank followed by the block-shading ramp, dimmest to brightest
pub const DEFAULT_GLYPHS: &str = " ░▒▓█";

/// Depth ranges within a few ulps of the frame's magnitude are rounding
/// noise from interpolation, not relief
const FLAT_ULPS: f32 = 8.0;

/// Glyphs used for a frame: one for empty cells, and an ordered ramp for
/// covered cells from farthest (dimmest) to nearest (brightest)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlyphRamp {
    blank: char,
    glyphs: Vec<char>,
}

impl GlyphRamp {
    /// The first character is the blank, the rest form the ramp.
    ///
    /// Returns `None` unless there is at least one ramp glyph.
    pub fn parse(spec: &str) -> Option<Self> {
        let mut chars = spec.chars();
        let blank = chars.next()?;
        let glyphs: Vec<char> = chars.collect();
        if glyphs.is_empty() {
            return None;
        }
        Some(Self { blank, glyphs })
    }

    pub fn blank(&self) -> char {
        self.blank
    }

    pub fn brightest(&self) -> char {
        self.glyphs[self.glyphs.len() - 1]
    }

    pub fn len(&self) -> usize {
        self.glyphs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.glyphs.is_empty()
    }

    /// Glyph for a normalised depth `t` in `[0, 1]`; out-of-range values clamp
    pub fn glyph(&self, t: f32) -> char {
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        let index = (t * (self.glyphs.len() - 1) as f32).round() as usize;
        self.glyphs[index.min(self.glyphs.len() - 1)]
    }
}

impl Default for GlyphRamp {
    fn default() -> Self {
        Self {
            blank: ' ',
            glyphs: DEFAULT_GLYPHS.chars().skip(1).collect(),
        }
    }
}

/// Character grid produced by one render, row-major
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    width: usize,
    height: usize,
    cells: Vec<char>,
    blank: char,
}

impl Frame {
    pub fn blank(width: usize, height: usize, blank: char) -> Self {
        Self {
            width,
            height,
            cells: vec![blank; width * height],
            blank,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn get(&self, x: usize, y: usize) -> Option<char> {
        if x < self.width && y < self.height {
            Some(self.cells[y * self.width + x])
        } else {
            None
        }
    }

    pub fn cells(&self) -> &[char] {
        &self.cells
    }

    pub fn rows(&self) -> impl Iterator<Item = String> + '_ {
        self.cells
            .chunks(self.width.max(1))
            .take(self.height)
            .map(|row| row.iter().collect())
    }

    /// Number of non-blank cells
    pub fn covered_count(&self) -> usize {
        self.cells.iter().filter(|&&c| c != self.blank).count()
    }

    /// Inclusive `(min_x, min_y, max_x, max_y)` of non-blank cells
    pub fn covered_bounds(&self) -> Option<(usize, usize, usize, usize)> {
        let mut bounds: Option<(usize, usize, usize, usize)> = None;
        for (i, &c) in self.cells.iter().enumerate() {
            if c == self.blank {
                continue;
            }
            let (x, y) = (i % self.width, i / self.width);
            bounds = Some(match bounds {
                None => (x, y, x, y),
                Some((x0, y0, x1, y1)) => (x0.min(x), y0.min(y), x1.max(x), y1.max(y)),
            });
        }
        bounds
    }
}

impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, row) in self.rows().enumerate() {
            if i > 0 {
                f.write_str("\n")?;
            }
            f.write_str(&row)?;
        }
        Ok(())
    }
}

/// Per-frame relative depth shading
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Shader {
    pub ramp: GlyphRamp,
}

impl Shader {
    pub fn new(ramp: GlyphRamp) -> Self {
        Self { ramp }
    }

    pub fn shade(&self, depth: &DepthBuffer) -> Frame {
        let mut frame = Frame::blank(depth.width(), depth.height(), self.ramp.blank());

        let Some((min, max)) = depth.covered().fold(None, |acc, d| match acc {
            None => Some((d, d)),
            Some((lo, hi)) => Some((d.min(lo), d.max(hi))),
        }) else {
            return frame;
        };

        let range = max - min;
        let flat = range == 0.0 || range <= FLAT_ULPS * f32::EPSILON * min.abs().max(max.abs());
        for (cell, &d) in frame.cells.iter_mut().zip(depth.as_slice()) {
            if d == DepthBuffer::EMPTY {
                continue;
            }
            *cell = if flat {
                self.ramp.brightest()
            } else {
                self.ramp.glyph((d - min) / range)
            };
        }
        frame
    }
}
