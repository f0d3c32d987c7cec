/// Orthographic fit of camera-space geometry onto a character canvas
use nalgebra::Point3;

/// Fixed parameters of the projection
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProjectionParams {
    /// Horizontal stretch applied to x; a terminal cell is roughly twice as
    /// tall as it is wide.
    pub aspect_correction: f32,
    /// Stand-in extent for an axis along which the mesh is flat
    pub min_span: f32,
}

impl Default for ProjectionParams {
    fn default() -> Self {
        Self {
            aspect_correction: 2.0,
            min_span: 1.0,
        }
    }
}

/// A projected vertex: canvas pixel position plus camera-space depth
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenVertex {
    pub x: f32,
    pub y: f32,
    /// Larger is nearer to the viewer
    pub z: f32,
}

impl ScreenVertex {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }
}

/// Uniform scale and centring offsets for one frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    pub min_x: f32,
    pub min_y: f32,
    pub scale: f32,
    pub offset_x: f32,
    pub offset_y: f32,
    pub aspect_correction: f32,
    pub canvas_height: usize,
}

impl Projection {
    /// Fit the (x, y) extent of every vertex into a `width × height` canvas.
    ///
    /// Returns `None` when there is nothing to fit or nowhere to draw.
    pub fn fit(
        triangles: &[[Point3<f32>; 3]],
        width: usize,
        height: usize,
        zoom: f32,
        params: &ProjectionParams,
    ) -> Option<Self> {
        if width == 0 || height == 0 {
            return None;
        }

        let mut vertices = triangles.iter().flat_map(|t| t.iter());
        let first = vertices.next()?;
        let (mut min_x, mut max_x, mut min_y, mut max_y) = (first.x, first.x, first.y, first.y);
        for v in vertices {
            min_x = min_x.min(v.x);
            max_x = max_x.max(v.x);
            min_y = min_y.min(v.y);
            max_y = max_y.max(v.y);
        }

        let span = |lo: f32, hi: f32| {
            let s = hi - lo;
            if s == 0.0 {
                params.min_span
            } else {
                s
            }
        };
        let span_x = span(min_x, max_x);
        let span_y = span(min_y, max_y);
        let aspect = params.aspect_correction;

        let fit_x = (width as f32 - 1.0) / (span_x * aspect);
        let fit_y = (height as f32 - 1.0) / span_y;
        let scale = fit_x.min(fit_y) * zoom;

        Some(Self {
            min_x,
            min_y,
            scale,
            offset_x: (width as f32 - span_x * scale * aspect) / 2.0,
            offset_y: (height as f32 - span_y * scale) / 2.0,
            aspect_correction: aspect,
            canvas_height: height,
        })
    }

    /// Convert a camera-space point to canvas pixels; rows grow downwards
    pub fn project(&self, point: &Point3<f32>) -> ScreenVertex {
        let x = (point.x - self.min_x) * self.scale * self.aspect_correction + self.offset_x;
        let y = (self.canvas_height as f32 - 1.0)
            - ((point.y - self.min_y) * self.scale + self.offset_y);
        ScreenVertex::new(x, y, point.z)
    }

    pub fn project_triangles(&self, triangles: &[[Point3<f32>; 3]]) -> Vec<[ScreenVertex; 3]> {
        triangles
            .iter()
            .map(|t| t.map(|v| self.project(&v)))
            .collect()
    }
}
