/// Depth-only triangle rasterizer.
///
/// Triangles are set up once per frame (clamped bounding box, barycentric
/// denominator) and then rasterized in parallel over disjoint row bands of
/// the depth buffer. Every band walks the full triangle list but only writes
/// its own rows, so the "greater depth wins" test never races and the result
/// does not depend on how many bands there are.
use std::ops::Range;

use rayon::prelude::*;

use crate::projection::ScreenVertex;

/// Per-pixel store of the nearest depth seen so far
#[derive(Debug, Clone, PartialEq)]
pub struct DepthBuffer {
    width: usize,
    height: usize,
    data: Vec<f32>,
}

impl DepthBuffer {
    /// Value of a cell no triangle has covered
    pub const EMPTY: f32 = f32::NEG_INFINITY;

    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            data: vec![Self::EMPTY; width * height],
        }
    }

    /// Wrap existing row-major depths; `None` if the length doesn't match
    pub fn from_depths(width: usize, height: usize, data: Vec<f32>) -> Option<Self> {
        (data.len() == width * height).then_some(Self {
            width,
            height,
            data,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn clear(&mut self) {
        self.data.fill(Self::EMPTY);
    }

    /// Resize and clear
    pub fn reset(&mut self, width: usize, height: usize) {
        self.width = width;
        self.height = height;
        self.data.clear();
        self.data.resize(width * height, Self::EMPTY);
    }

    pub fn get(&self, x: usize, y: usize) -> Option<f32> {
        if x < self.width && y < self.height {
            Some(self.data[y * self.width + x])
        } else {
            None
        }
    }

    pub fn is_covered(&self, x: usize, y: usize) -> bool {
        self.get(x, y).is_some_and(|d| d != Self::EMPTY)
    }

    /// Depths of covered cells, row-major
    pub fn covered(&self) -> impl Iterator<Item = f32> + '_ {
        self.data.iter().copied().filter(|&d| d != Self::EMPTY)
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }
}

/// A triangle ready for scan conversion
#[derive(Debug, Clone, Copy)]
struct TriangleSetup {
    v: [ScreenVertex; 3],
    denom: f32,
    min_x: usize,
    max_x: usize,
    min_y: usize,
    max_y: usize,
}

impl TriangleSetup {
    /// `None` for zero-area triangles and triangles entirely off canvas
    fn new(v: [ScreenVertex; 3], width: usize, height: usize, epsilon: f32) -> Option<Self> {
        let [v0, v1, v2] = v;
        let denom = (v1.y - v2.y) * (v0.x - v2.x) + (v2.x - v1.x) * (v0.y - v2.y);
        if denom.is_nan() || denom.abs() < epsilon {
            return None;
        }

        let lo_x = v0.x.min(v1.x).min(v2.x).floor();
        let hi_x = v0.x.max(v1.x).max(v2.x).ceil();
        let lo_y = v0.y.min(v1.y).min(v2.y).floor();
        let hi_y = v0.y.max(v1.y).max(v2.y).ceil();

        let (max_x, max_y) = ((width - 1) as f32, (height - 1) as f32);
        if hi_x < 0.0 || hi_y < 0.0 || lo_x > max_x || lo_y > max_y {
            return None;
        }

        Some(Self {
            v,
            denom,
            min_x: lo_x.max(0.0) as usize,
            max_x: hi_x.min(max_x) as usize,
            min_y: lo_y.max(0.0) as usize,
            max_y: hi_y.min(max_y) as usize,
        })
    }

    /// Rasterize the rows of `rows` that this triangle touches into `band`,
    /// which holds exactly those rows of a `width`-wide buffer.
    fn rasterize_band(&self, band: &mut [f32], rows: Range<usize>, width: usize) {
        let y_start = self.min_y.max(rows.start);
        let y_end = (self.max_y + 1).min(rows.end);
        let [v0, v1, v2] = self.v;

        for y in y_start..y_end {
            let py = y as f32;
            let row = &mut band[(y - rows.start) * width..][..width];
            for x in self.min_x..=self.max_x {
                let px = x as f32;
                // Edge functions, each evaluated on its own so points on a
                // shared edge test as exactly zero for both triangles
                let e0 = (v1.y - v2.y) * (px - v2.x) + (v2.x - v1.x) * (py - v2.y);
                let e1 = (v2.y - v0.y) * (px - v2.x) + (v0.x - v2.x) * (py - v2.y);
                let e2 = (v0.y - v1.y) * (px - v1.x) + (v1.x - v0.x) * (py - v1.y);
                let inside = if self.denom > 0.0 {
                    e0 >= 0.0 && e1 >= 0.0 && e2 >= 0.0
                } else {
                    e0 <= 0.0 && e1 <= 0.0 && e2 <= 0.0
                };

                if inside {
                    let z = (e0 * v0.z + e1 * v1.z + e2 * v2.z) / self.denom;
                    let cell = &mut row[x];
                    if z > *cell {
                        *cell = z;
                    }
                }
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rasterizer {
    /// Triangles with `|D|` below this (in pixels²) are skipped as degenerate
    pub degenerate_epsilon: f32,
    /// Rows per parallel band; `None` splits evenly across the rayon pool
    pub band_rows: Option<usize>,
}

impl Default for Rasterizer {
    fn default() -> Self {
        Self {
            degenerate_epsilon: 1e-6,
            band_rows: None,
        }
    }
}

impl Rasterizer {
    pub fn new(degenerate_epsilon: f32, band_rows: Option<usize>) -> Self {
        Self {
            degenerate_epsilon,
            band_rows,
        }
    }

    fn rows_per_band(&self, height: usize) -> usize {
        match self.band_rows {
            Some(rows) => rows.max(1),
            None => height.div_ceil(rayon::current_num_threads().max(1)).max(1),
        }
    }

    /// Rasterize every triangle into `buffer`, keeping the greater depth.
    ///
    /// Returns the number of triangles that survived setup.
    pub fn rasterize(&self, triangles: &[[ScreenVertex; 3]], buffer: &mut DepthBuffer) -> usize {
        let (width, height) = (buffer.width, buffer.height);
        if width == 0 || height == 0 {
            return 0;
        }

        let setups: Vec<TriangleSetup> = triangles
            .iter()
            .filter_map(|t| TriangleSetup::new(*t, width, height, self.degenerate_epsilon))
            .collect();

        let band_rows = self.rows_per_band(height);
        buffer
            .data
            .par_chunks_mut(band_rows * width)
            .enumerate()
            .for_each(|(index, band)| {
                let start = index * band_rows;
                let rows = start..start + band.len() / width;
                for setup in &setups {
                    if setup.max_y >= rows.start && setup.min_y < rows.end {
                        setup.rasterize_band(band, rows.clone(), width);
                    }
                }
            });

        setups.len()
    }
}
