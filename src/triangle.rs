//! Position-based triangles and edges.
//!
//! Triangles carry positions rather than vertex indices until the very end of
//! the pipeline, so every comparison between them is a tolerance comparison on
//! Euclidean distance, never an identity check.

use crate::float_types::Real;
use nalgebra::{Point3, Vector3};
use std::cmp::Ordering;

/// Total lexicographic order on positions (x, then y, then z).
#[inline]
pub fn point_cmp(a: &Point3<Real>, b: &Point3<Real>) -> Ordering {
    a.x.total_cmp(&b.x)
        .then_with(|| a.y.total_cmp(&b.y))
        .then_with(|| a.z.total_cmp(&b.z))
}

/// `true` when `a` and `b` are closer than `tolerance`.
#[inline]
pub fn points_coincide(a: &Point3<Real>, b: &Point3<Real>, tolerance: Real) -> bool {
    (a - b).norm() < tolerance
}

/// A segment between two positions, stored in canonical (sorted) order so
/// that the same geometric edge taken from either winding compares equal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Edge {
    pub a: Point3<Real>,
    pub b: Point3<Real>,
}

impl Edge {
    pub fn new(p: Point3<Real>, q: Point3<Real>) -> Self {
        if point_cmp(&q, &p) == Ordering::Less {
            Edge { a: q, b: p }
        } else {
            Edge { a: p, b: q }
        }
    }

    /// Endpoint-wise tolerance match of two canonical edges.
    #[inline]
    pub fn approx_eq(&self, other: &Edge, tolerance: Real) -> bool {
        points_coincide(&self.a, &other.a, tolerance) && points_coincide(&self.b, &other.b, tolerance)
    }

    pub fn length(&self) -> Real {
        (self.b - self.a).norm()
    }
}

/// A triangle given by its three corner positions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Triangle {
    pub points: [Point3<Real>; 3],
}

impl Triangle {
    pub const fn new(p0: Point3<Real>, p1: Point3<Real>, p2: Point3<Real>) -> Self {
        Triangle {
            points: [p0, p1, p2],
        }
    }

    /// Build a triangle unless one of its edges is shorter than `tolerance`.
    pub fn non_degenerate(
        p0: Point3<Real>,
        p1: Point3<Real>,
        p2: Point3<Real>,
        tolerance: Real,
    ) -> Option<Self> {
        let tri = Triangle::new(p0, p1, p2);
        (!tri.is_degenerate(tolerance)).then_some(tri)
    }

    pub fn is_degenerate(&self, tolerance: Real) -> bool {
        let [p0, p1, p2] = &self.points;
        points_coincide(p0, p1, tolerance)
            || points_coincide(p1, p2, tolerance)
            || points_coincide(p2, p0, tolerance)
    }

    /// The three canonical edges `(p0,p1)`, `(p1,p2)`, `(p2,p0)`.
    pub fn edges(&self) -> [Edge; 3] {
        let [p0, p1, p2] = self.points;
        [Edge::new(p0, p1), Edge::new(p1, p2), Edge::new(p2, p0)]
    }

    pub fn contains_edge(&self, edge: &Edge, tolerance: Real) -> bool {
        self.edges().iter().any(|e| e.approx_eq(edge, tolerance))
    }

    /// Unnormalized face normal following the winding order.
    pub fn normal(&self) -> Vector3<Real> {
        let [p0, p1, p2] = &self.points;
        (p1 - p0).cross(&(p2 - p0))
    }
}

/// Canonical edges of every triangle in `triangles`, in triangle order.
pub fn collect_edges(triangles: &[Triangle]) -> Vec<Edge> {
    triangles.iter().flat_map(Triangle::edges).collect()
}
