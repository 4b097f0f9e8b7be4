//! A trait for any surface which can be represented by triangles
use crate::float_types::Real;
use crate::mesh::IndexedTriMesh;
use crate::triangle::Triangle;
use nalgebra::{Point3, Vector3};

/// A triangulated 3D surface.
///
/// Anything that can present itself as a bunch of triangles in 3D
/// can automatically use all the triangle-based IO backends.
pub trait Triangulated3D {
    /// Call `f` for each triangle with its corner positions and facet normal.
    fn visit_triangles<F>(&self, f: F)
    where
        F: FnMut([Point3<Real>; 3], Vector3<Real>);
}

impl Triangulated3D for IndexedTriMesh {
    fn visit_triangles<F>(&self, mut f: F)
    where
        F: FnMut([Point3<Real>; 3], Vector3<Real>),
    {
        for i in 0..self.face_count() {
            f(self.face_points(i), self.face_normal(i));
        }
    }
}

impl Triangulated3D for [Triangle] {
    fn visit_triangles<F>(&self, mut f: F)
    where
        F: FnMut([Point3<Real>; 3], Vector3<Real>),
    {
        for tri in self {
            let normal = tri
                .normal()
                .try_normalize(Real::EPSILON)
                .unwrap_or_else(Vector3::zeros);
            f(tri.points, normal);
        }
    }
}
