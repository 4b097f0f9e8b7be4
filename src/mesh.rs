//! Final indexed mesh and the tolerance-based point indexer that builds it.

use crate::errors::MeshingError;
use crate::float_types::Real;
use crate::triangle::Triangle;
use hashbrown::HashMap;
use nalgebra::{Point3, Vector3};

/// Spatial hash assigning every distinct position a stable id in first-seen order.
///
/// Positions are bucketed on a grid whose spacing equals the tolerance, so any
/// point within tolerance of a stored one lives in one of the 27 surrounding
/// buckets.
#[derive(Debug, Clone)]
pub struct PointIndexer {
    tolerance: Real,
    buckets: HashMap<[i64; 3], Vec<usize>>,
    points: Vec<Point3<Real>>,
}

impl PointIndexer {
    pub fn new(tolerance: Real) -> Self {
        Self {
            tolerance: tolerance.max(Real::EPSILON),
            buckets: HashMap::new(),
            points: Vec::new(),
        }
    }

    /// Index every corner of `triangles`, in triangle order.
    pub fn from_triangles(triangles: &[Triangle], tolerance: Real) -> Self {
        let mut indexer = Self::new(tolerance);
        for tri in triangles {
            for p in &tri.points {
                indexer.insert(*p);
            }
        }
        indexer
    }

    #[inline]
    fn bucket(&self, p: &Point3<Real>) -> [i64; 3] {
        [
            (p.x / self.tolerance).floor() as i64,
            (p.y / self.tolerance).floor() as i64,
            (p.z / self.tolerance).floor() as i64,
        ]
    }

    /// Id of the first stored point within tolerance of `p`, if any.
    pub fn index(&self, p: &Point3<Real>) -> Option<usize> {
        let [bx, by, bz] = self.bucket(p);
        let mut best: Option<usize> = None;
        for dx in -1..=1 {
            for dy in -1..=1 {
                for dz in -1..=1 {
                    let Some(ids) = self.buckets.get(&[bx + dx, by + dy, bz + dz]) else {
                        continue;
                    };
                    let hit = ids
                        .iter()
                        .copied()
                        .find(|&id| (self.points[id] - p).norm() < self.tolerance);
                    best = match (best, hit) {
                        (Some(b), Some(h)) => Some(b.min(h)),
                        (b, h) => b.or(h),
                    };
                }
            }
        }
        best
    }

    /// Id for `p`, allocating a new one if no stored point is within tolerance.
    pub fn insert(&mut self, p: Point3<Real>) -> usize {
        if let Some(id) = self.index(&p) {
            return id;
        }
        let id = self.points.len();
        self.points.push(p);
        let key = self.bucket(&p);
        self.buckets.entry(key).or_default().push(id);
        id
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn into_points(self) -> Vec<Point3<Real>> {
        self.points
    }
}

/// Deduplicated vertex list plus triangle index list.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IndexedTriMesh {
    pub vertices: Vec<Point3<Real>>,
    pub faces: Vec<[usize; 3]>,
}

impl IndexedTriMesh {
    /// Deduplicate the corners of `triangles` within `tolerance` and index them.
    ///
    /// A corner that cannot be resolved back to an id means the stages disagree
    /// on float comparisons; that is reported as
    /// [`MeshingError::IndexResolution`] and no mesh is produced.
    pub fn from_triangles(triangles: &[Triangle], tolerance: Real) -> Result<Self, MeshingError> {
        let indexer = PointIndexer::from_triangles(triangles, tolerance);

        let resolve = |p: &Point3<Real>| {
            indexer.index(p).ok_or_else(|| {
                log::warn!("vertex index lookup failed for {p}");
                MeshingError::IndexResolution { position: *p }
            })
        };

        let faces = triangles
            .iter()
            .map(|tri| {
                Ok([
                    resolve(&tri.points[0])?,
                    resolve(&tri.points[1])?,
                    resolve(&tri.points[2])?,
                ])
            })
            .collect::<Result<Vec<_>, MeshingError>>()?;

        Ok(Self {
            vertices: indexer.into_points(),
            faces,
        })
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.faces.is_empty()
    }

    /// Corner positions of face `i`.
    pub fn face_points(&self, i: usize) -> [Point3<Real>; 3] {
        self.faces[i].map(|v| self.vertices[v])
    }

    /// Unit normal of face `i` following its winding, or zero for a sliver.
    pub fn face_normal(&self, i: usize) -> Vector3<Real> {
        let [a, b, c] = self.face_points(i);
        let n = (b - a).cross(&(c - a));
        n.try_normalize(Real::EPSILON).unwrap_or_else(Vector3::zeros)
    }

    /// Axis-aligned bounds of all vertices, `None` for an empty mesh.
    pub fn bounding_box(&self) -> Option<(Point3<Real>, Point3<Real>)> {
        let first = *self.vertices.first()?;
        Some(self.vertices.iter().fold((first, first), |(mins, maxs), p| {
            (mins.inf(p), maxs.sup(p))
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOL: Real = 1e-5;

    #[test]
    fn nearby_points_share_an_id() {
        let mut indexer = PointIndexer::new(TOL);
        let a = indexer.insert(Point3::new(1.0, 2.0, 3.0));
        let b = indexer.insert(Point3::new(1.000004, 2.0, 3.000004));
        assert_eq!(a, b);
        assert_eq!(indexer.len(), 1);
    }

    #[test]
    fn separated_points_get_distinct_ids() {
        let mut indexer = PointIndexer::new(TOL);
        let a = indexer.insert(Point3::new(0.5, 0.5, 0.5));
        let b = indexer.insert(Point3::new(0.5 + 1e-4, 0.5, 0.5));
        assert_ne!(a, b);
        assert_eq!(indexer.index(&Point3::new(0.5 + 1e-4, 0.5, 0.5)), Some(b));
    }

    #[test]
    fn points_across_bucket_boundaries_are_found() {
        let mut indexer = PointIndexer::new(TOL);
        let a = indexer.insert(Point3::new(-0.000001, 0.0, 0.0));
        assert_eq!(indexer.index(&Point3::new(0.000001, 0.0, 0.0)), Some(a));
    }

    #[test]
    fn ids_follow_first_seen_order() {
        let tri = Triangle::new(
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
        );
        let tri2 = Triangle::new(
            Point3::new(1.0, 1.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
        );
        let mesh = IndexedTriMesh::from_triangles(&[tri, tri2], TOL).unwrap();
        assert_eq!(mesh.vertex_count(), 4);
        assert_eq!(mesh.faces, vec![[0, 1, 2], [3, 2, 1]]);
        assert_eq!(mesh.face_points(1), tri2.points);
        approx::assert_relative_eq!(mesh.face_normal(0), Vector3::z());
        assert_eq!(
            mesh.bounding_box(),
            Some((Point3::new(0.0, 0.0, 0.0), Point3::new(1.0, 1.0, 0.0)))
        );
    }

    #[test]
    fn empty_input_gives_empty_mesh() {
        let mesh = IndexedTriMesh::from_triangles(&[], TOL).unwrap();
        assert!(mesh.is_empty());
        assert_eq!(mesh.bounding_box(), None);
    }
}
