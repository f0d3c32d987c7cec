/// Geometry primitives shared by the loader and the render pipeline
use nalgebra::{Point3, Vector3};

use crate::mass::MassProperties;

/// A triangle face defined by three vertices
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Triangle {
    pub vertices: [Point3<f32>; 3],
    /// Facet normal as stored in the source file (may be zero)
    pub normal: Vector3<f32>,
}

impl Triangle {
    pub fn new(v0: Point3<f32>, v1: Point3<f32>, v2: Point3<f32>) -> Self {
        let mut triangle = Self {
            vertices: [v0, v1, v2],
            normal: Vector3::zeros(),
        };
        triangle.normal = triangle.calculate_normal().unwrap_or_else(Vector3::zeros);
        triangle
    }

    pub fn with_normal(vertices: [Point3<f32>; 3], normal: Vector3<f32>) -> Self {
        Self { vertices, normal }
    }

    /// Calculate the face normal from the triangle's vertices.
    ///
    /// Returns `None` for zero-area triangles.
    pub fn calculate_normal(&self) -> Option<Vector3<f32>> {
        let [v0, v1, v2] = self.vertices;
        (v1 - v0).cross(&(v2 - v0)).try_normalize(f32::EPSILON)
    }

    pub fn area(&self) -> f32 {
        let [v0, v1, v2] = self.vertices;
        (v1 - v0).cross(&(v2 - v0)).norm() * 0.5
    }
}

/// A 3D mesh composed of triangles
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mesh {
    pub triangles: Vec<Triangle>,
}

impl Mesh {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            triangles: Vec::with_capacity(capacity),
        }
    }

    pub fn add_triangle(&mut self, triangle: Triangle) {
        self.triangles.push(triangle);
    }

    pub fn len(&self) -> usize {
        self.triangles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }

    pub fn vertices(&self) -> impl Iterator<Item = &Point3<f32>> + '_ {
        self.triangles.iter().flat_map(|t| t.vertices.iter())
    }

    /// Axis-aligned bounds `(min, max)`, or `None` for an empty mesh
    pub fn bounds(&self) -> Option<(Point3<f32>, Point3<f32>)> {
        let mut vertices = self.vertices();
        let first = *vertices.next()?;
        Some(vertices.fold((first, first), |(min, max), v| {
            (min.inf(v), max.sup(v))
        }))
    }

    /// Axis-aligned cube of edge `size` centred on the origin, 12 triangles
    /// wound counter-clockwise when seen from outside.
    pub fn cube(size: f32) -> Self {
        let h = size / 2.0;
        let p = |x: f32, y: f32, z: f32| Point3::new(x * h, y * h, z * h);
        let quads = [
            // Front (+Z)
            [p(-1., -1., 1.), p(1., -1., 1.), p(1., 1., 1.), p(-1., 1., 1.)],
            // Back (-Z)
            [p(1., -1., -1.), p(-1., -1., -1.), p(-1., 1., -1.), p(1., 1., -1.)],
            // Top (+Y)
            [p(-1., 1., 1.), p(1., 1., 1.), p(1., 1., -1.), p(-1., 1., -1.)],
            // Bottom (-Y)
            [p(-1., -1., -1.), p(1., -1., -1.), p(1., -1., 1.), p(-1., -1., 1.)],
            // Right (+X)
            [p(1., -1., 1.), p(1., -1., -1.), p(1., 1., -1.), p(1., 1., 1.)],
            // Left (-X)
            [p(-1., -1., -1.), p(-1., -1., 1.), p(-1., 1., 1.), p(-1., 1., -1.)],
        ];

        let mut mesh = Self::with_capacity(12);
        for [a, b, c, d] in quads {
            mesh.add_triangle(Triangle::new(a, b, c));
            mesh.add_triangle(Triangle::new(a, c, d));
        }
        mesh
    }
}

/// A mesh together with the point it spins around.
///
/// This is everything the render pipeline needs from the loader.
#[derive(Debug, Clone)]
pub struct Model {
    pub mesh: Mesh,
    pub center_of_gravity: Point3<f32>,
}

impl Model {
    pub fn new(mesh: Mesh, center_of_gravity: Point3<f32>) -> Self {
        Self {
            mesh,
            center_of_gravity,
        }
    }

    /// Build a model, taking the rotation centre from the mesh's mass properties
    pub fn from_mesh(mesh: Mesh) -> Self {
        let center_of_gravity = MassProperties::compute(&mesh).center_of_gravity;
        Self::new(mesh, center_of_gravity)
    }

    pub fn empty() -> Self {
        Self::new(Mesh::new(), Point3::origin())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cube_counts() {
        let cube = Mesh::cube(2.0);
        assert_eq!(cube.len(), 12);
        assert_eq!(cube.vertices().count(), 36);
    }

    #[test]
    fn test_cube_normals_point_outwards() {
        let cube = Mesh::cube(1.0);
        for triangle in &cube.triangles {
            let centroid = triangle
                .vertices
                .iter()
                .fold(Vector3::zeros(), |acc, v| acc + v.coords)
                / 3.0;
            assert!(triangle.normal.dot(&centroid) > 0.0);
        }
    }

    #[test]
    fn test_bounds() {
        let cube = Mesh::cube(2.0);
        let (min, max) = cube.bounds().unwrap();
        assert_eq!(min, Point3::new(-1.0, -1.0, -1.0));
        assert_eq!(max, Point3::new(1.0, 1.0, 1.0));
        assert!(Mesh::new().bounds().is_none());
    }

    #[test]
    fn test_degenerate_triangle_has_no_normal() {
        let triangle = Triangle::new(
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(2.0, 0.0, 0.0),
        );
        assert!(triangle.calculate_normal().is_none());
        assert_eq!(triangle.normal, Vector3::zeros());
        assert_eq!(triangle.area(), 0.0);
    }
}
