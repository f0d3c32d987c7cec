/// stlview core library - mesh to ASCII rendering and interaction logic
///
/// The render pipeline is stateless apart from a reusable depth buffer:
/// a `Model` and a `CameraState` snapshot go in, a character `Frame` comes
/// out. STL loading and mass properties live alongside as the mesh source.

pub mod camera;
pub mod config;
pub mod controller;
pub mod geometry;
pub mod mass;
pub mod projection;
pub mod raster;
pub mod render;
pub mod scheduler;
pub mod shade;
pub mod stl;
pub mod transform;

// Re-export commonly used types
pub use camera::{AutoRotate, CameraState, ViewPreset};
pub use config::{Config, ConfigError, ControlConfig, RenderConfig};
pub use controller::{Axis, Command, Direction, InteractionController, ZoomDirection};
pub use geometry::{Mesh, Model, Triangle};
pub use mass::MassProperties;
pub use projection::{Projection, ProjectionParams, ScreenVertex};
pub use raster::{DepthBuffer, Rasterizer};
pub use render::Renderer;
pub use scheduler::FrameScheduler;
pub use shade::{Frame, GlyphRamp, Shader};
pub use stl::StlError;
pub use transform::{RotationState, Transform};
