/// Mass properties of a closed triangle mesh.
///
/// Volume and centre of gravity come from summing the signed tetrahedra each
/// facet forms with the origin. Accumulation happens in `f64` so large,
/// finely tessellated models do not lose the small per-facet contributions.
use nalgebra::{Point3, Vector3};

use crate::geometry::Mesh;

/// Volumes below this are treated as an open or flat mesh
const MIN_VOLUME: f64 = 1e-12;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MassProperties {
    /// Enclosed volume in model units cubed (0 for open meshes)
    pub volume: f64,
    pub surface_area: f64,
    pub center_of_gravity: Point3<f32>,
    pub min: Point3<f32>,
    pub max: Point3<f32>,
}

impl MassProperties {
    pub fn compute(mesh: &Mesh) -> Self {
        let Some((min, max)) = mesh.bounds() else {
            return Self {
                volume: 0.0,
                surface_area: 0.0,
                center_of_gravity: Point3::origin(),
                min: Point3::origin(),
                max: Point3::origin(),
            };
        };

        let mut volume = 0.0f64;
        let mut moment = Vector3::<f64>::zeros();
        let mut surface_area = 0.0f64;
        let mut vertex_sum = Vector3::<f64>::zeros();

        for triangle in &mesh.triangles {
            let [a, b, c] = triangle.vertices.map(|v| v.coords.cast::<f64>());
            let signed = a.dot(&b.cross(&c)) / 6.0;
            volume += signed;
            moment += (a + b + c) * (signed / 4.0);
            surface_area += (b - a).cross(&(c - a)).norm() * 0.5;
            vertex_sum += a + b + c;
        }

        let center = if volume.abs() > MIN_VOLUME {
            moment / volume
        } else {
            log::debug!("mesh encloses no volume, using vertex mean as centre");
            vertex_sum / (mesh.len() * 3) as f64
        };

        Self {
            volume: volume.abs(),
            surface_area,
            center_of_gravity: Point3::from(center.cast::<f32>()),
            min,
            max,
        }
    }

    pub fn dimensions(&self) -> Vector3<f32> {
        self.max - self.min
    }
}
