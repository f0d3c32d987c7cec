/// Transform → project → rasterize → shade, once per frame
use std::time::Instant;

use crate::camera::CameraState;
use crate::config::RenderConfig;
use crate::geometry::Model;
use crate::projection::{Projection, ProjectionParams};
use crate::raster::{DepthBuffer, Rasterizer};
use crate::shade::{Frame, Shader};
use crate::transform::Transform;

/// Frame-independent render settings plus a depth buffer reused across frames
pub struct Renderer {
    projection: ProjectionParams,
    rasterizer: Rasterizer,
    shader: Shader,
    depth: DepthBuffer,
}

impl Renderer {
    pub fn new(config: &RenderConfig) -> Self {
        Self {
            projection: config.projection(),
            rasterizer: config.rasterizer(),
            shader: config.shader(),
            depth: DepthBuffer::new(0, 0),
        }
    }

    /// Depth buffer of the last frame
    pub fn depth(&self) -> &DepthBuffer {
        &self.depth
    }

    /// Render `model` as seen by `camera` onto a `width × height` grid.
    ///
    /// An empty model produces an all-blank frame.
    pub fn render(&mut self, model: &Model, camera: &CameraState, width: usize, height: usize) -> Frame {
        let started = Instant::now();
        self.depth.reset(width, height);

        let camera_space = Transform::to_camera_space(model, &camera.rotation);
        let drawn = match Projection::fit(&camera_space, width, height, camera.zoom, &self.projection) {
            Some(projection) => {
                let screen = projection.project_triangles(&camera_space);
                self.rasterizer.rasterize(&screen, &mut self.depth)
            }
            None => 0,
        };

        let frame = self.shader.shade(&self.depth);
        log::debug!(
            "rendered {}x{} frame: {}/{} triangles in {:?}",
            width,
            height,
            drawn,
            model.mesh.len(),
            started.elapsed()
        );
        frame
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new(&RenderConfig::default())
    }
}
