//! Test support library
//! Builds small synthetic volume fields with exact sampled normals.

#![allow(dead_code)]

use nalgebra::{Point3, Vector3};
use sharpcubes::{LatticeShape, NormalIndexGrid, Real, ScalarGrid, VolumeField};

/// Sample `sdf` on `shape` and attach `normal(p)` at every lattice point.
pub fn field_with_normals<F, N>(shape: LatticeShape, sdf: F, normal: N) -> VolumeField
where
    F: Fn(&Point3<Real>) -> Real,
    N: Fn(&Point3<Real>) -> Vector3<Real>,
{
    let point = |i: usize| {
        let [x, y, z] = shape.delinearize(i);
        Point3::new(x as Real, y as Real, z as Real)
    };
    let scalars = ScalarGrid::from_fn(shape, |x, y, z| {
        sdf(&Point3::new(x as Real, y as Real, z as Real))
    });
    let normals: Vec<Vector3<Real>> = (0..shape.size()).map(|i| normal(&point(i))).collect();
    let indices = NormalIndexGrid::new(shape, (0..shape.size()).map(Some).collect()).unwrap();
    VolumeField::new(scalars, indices, normals).unwrap()
}

/// Quarter space `x < a && y < b`: a straight sharp edge parallel to z.
pub fn edge_field(shape: LatticeShape, a: Real, b: Real) -> VolumeField {
    field_with_normals(
        shape,
        |p| (p.x - a).max(p.y - b),
        |p| {
            if p.x - a >= p.y - b {
                Vector3::x()
            } else {
                Vector3::y()
            }
        },
    )
}

/// Octant `x < c.x && y < c.y && z < c.z`: a sharp corner at `c`.
pub fn corner_field(shape: LatticeShape, c: Point3<Real>) -> VolumeField {
    field_with_normals(
        shape,
        |p| (p.x - c.x).max(p.y - c.y).max(p.z - c.z),
        |p| {
            let d = p - c;
            if d.x >= d.y && d.x >= d.z {
                Vector3::x()
            } else if d.y >= d.z {
                Vector3::y()
            } else {
                Vector3::z()
            }
        },
    )
}

/// Sphere of `radius` around `center` with radial normals.
pub fn sphere_field(shape: LatticeShape, center: Point3<Real>, radius: Real) -> VolumeField {
    field_with_normals(
        shape,
        |p| (p - center).norm() - radius,
        |p| (p - center).try_normalize(1e-9).unwrap_or_else(Vector3::z),
    )
}

/// Whether `p` lies inside the sample lattice of `shape`.
pub fn inside_lattice(p: &Point3<Real>, shape: LatticeShape) -> bool {
    let dims = shape.as_array();
    (0..3).all(|axis| p[axis] >= 0.0 && p[axis] <= (dims[axis] - 1) as Real)
}
