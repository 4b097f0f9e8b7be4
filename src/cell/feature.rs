//! Feature classification and feature-point placement.
//!
//! ## Classification
//! Over every pair of sampled corner normals the smallest cosine is tracked.
//! If it stays above the feature threshold the cell is flat. Otherwise the two
//! most divergent normals span a plane with axis `n★ = n₀ × n₁`; when some
//! normal has a large component along `n★` the normals spread along three
//! directions (corner), else along two (edge).
//!
//! ## Feature point (QEF)
//! With `c` the cell centroid, every corner `pᵢ` with normal `nᵢ` contributes
//! one row of the least-squares system
//! ```text
//! nᵢ · x = nᵢ · (pᵢ - c)
//! ```
//! solved through the SVD of the stacked normals. Edges drop the smallest
//! singular direction (the edge tangent, which the normals do not constrain);
//! corners are solved at full rank. The feature point is `c + x`.

use super::FeatureKind;
use crate::float_types::{Real, SINGULAR_VALUE_GUARD};
use nalgebra::{DMatrix, DVector, Point3, Vector3};

/// Classify a cell from the normals sampled at its corners (in corner order).
///
/// Fewer than two normals can never reveal a feature.
pub fn classify_feature(
    normals: &[Vector3<Real>],
    feature_threshold: Real,
    corner_threshold: Real,
) -> FeatureKind {
    let mut most_divergent: Option<(Real, usize, usize)> = None;
    for n in 0..normals.len() {
        for m in (n + 1)..normals.len() {
            let cosine = normals[n].dot(&normals[m]);
            if most_divergent.is_none_or(|(min, _, _)| cosine < min) {
                most_divergent = Some((cosine, n, m));
            }
        }
    }

    let Some((min_cosine, i, j)) = most_divergent else {
        return FeatureKind::None;
    };
    if min_cosine >= feature_threshold {
        return FeatureKind::None;
    }

    let n_star = normals[i].cross(&normals[j]);
    let max_alignment = normals
        .iter()
        .map(|n| n.dot(&n_star).abs())
        .fold(0.0, Real::max);

    if max_alignment > corner_threshold {
        FeatureKind::Corner
    } else {
        FeatureKind::Edge
    }
}

/// Solve the cell's QEF for its feature point.
///
/// `samples` are `(corner position, corner normal)` pairs and `centroid` the
/// shift origin. Returns `None` for [`FeatureKind::None`] or when no normals
/// were sampled.
pub fn solve_feature_point(
    samples: &[(Point3<Real>, Vector3<Real>)],
    centroid: Point3<Real>,
    kind: FeatureKind,
) -> Option<Point3<Real>> {
    if samples.is_empty() || !kind.is_feature() {
        return None;
    }

    let rows = samples.len();
    let a = DMatrix::from_fn(rows, 3, |r, c| samples[r].1[c]);
    let b = DVector::from_fn(rows, |r, _| {
        let (p, n) = &samples[r];
        n.dot(&(p - centroid))
    });

    let svd = a.svd(true, true);
    let max = svd.singular_values.iter().copied().fold(0.0, Real::max);
    let min = svd.singular_values.iter().copied().fold(Real::MAX, Real::min);
    if max <= SINGULAR_VALUE_GUARD {
        // Normals carry no usable direction; stay at the centroid.
        return Some(centroid);
    }

    let eps = match kind {
        FeatureKind::Edge => min / (max - SINGULAR_VALUE_GUARD) * max,
        _ => Real::EPSILON * max * 3.0,
    };

    let shift = svd
        .solve(&b, eps)
        .map(|x| Vector3::new(x[0], x[1], x[2]))
        .unwrap_or_else(|_| Vector3::zeros());
    Some(centroid + shift)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const FEATURE: Real = 0.9;
    const CORNER: Real = 0.7;

    fn unit_cube_corners() -> [Point3<Real>; 8] {
        [
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(1.0, 1.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
            Point3::new(0.0, 0.0, 1.0),
            Point3::new(1.0, 0.0, 1.0),
            Point3::new(1.0, 1.0, 1.0),
            Point3::new(0.0, 1.0, 1.0),
        ]
    }

    #[test]
    fn parallel_normals_are_flat() {
        let normals = vec![Vector3::z(); 8];
        assert_eq!(classify_feature(&normals, FEATURE, CORNER), FeatureKind::None);
    }

    #[test]
    fn too_few_normals_are_flat() {
        assert_eq!(classify_feature(&[], FEATURE, CORNER), FeatureKind::None);
        assert_eq!(classify_feature(&[Vector3::x()], FEATURE, CORNER), FeatureKind::None);
    }

    #[test]
    fn two_directions_make_an_edge() {
        let normals = vec![Vector3::x(), Vector3::x(), Vector3::y(), Vector3::y()];
        assert_eq!(classify_feature(&normals, FEATURE, CORNER), FeatureKind::Edge);
    }

    #[test]
    fn three_directions_make_a_corner() {
        let normals = vec![
            Vector3::x(),
            Vector3::y(),
            Vector3::z(),
            Vector3::x(),
            Vector3::y(),
            Vector3::z(),
            Vector3::x(),
            Vector3::z(),
        ];
        assert_eq!(classify_feature(&normals, FEATURE, CORNER), FeatureKind::Corner);
    }

    #[test]
    fn edge_point_lies_on_both_planes() {
        // Planes x = 0.25 (normal +x) and y = 0.75 (normal +y) meet along a line parallel to z.
        let corners = unit_cube_corners();
        let centroid = Point3::new(0.5, 0.5, 0.5);
        let samples: Vec<_> = corners
            .iter()
            .enumerate()
            .map(|(i, p)| {
                let on_x_face = i % 2 == 0;
                let normal = if on_x_face { Vector3::x() } else { Vector3::y() };
                let anchor = if on_x_face {
                    Point3::new(0.25, p.y, p.z)
                } else {
                    Point3::new(p.x, 0.75, p.z)
                };
                (anchor, normal)
            })
            .collect();

        let point = solve_feature_point(&samples, centroid, FeatureKind::Edge).unwrap();
        assert_relative_eq!(point.x, 0.25, epsilon = 1e-6);
        assert_relative_eq!(point.y, 0.75, epsilon = 1e-6);
        // The unconstrained tangent direction keeps the centroid's coordinate.
        assert_relative_eq!(point.z, 0.5, epsilon = 1e-6);
    }

    #[test]
    fn corner_point_is_plane_intersection() {
        let centroid = Point3::new(0.5, 0.5, 0.5);
        let target = Point3::new(0.2, 0.6, 0.9);
        let samples = vec![
            (Point3::new(target.x, 0.0, 0.0), Vector3::x()),
            (Point3::new(1.0, target.y, 1.0), Vector3::y()),
            (Point3::new(0.0, 1.0, target.z), Vector3::z()),
            (Point3::new(target.x, 1.0, 1.0), Vector3::x()),
        ];

        let point = solve_feature_point(&samples, centroid, FeatureKind::Corner).unwrap();
        assert_relative_eq!(point, target, epsilon = 1e-6);
    }

    #[test]
    fn solve_is_deterministic() {
        let centroid = Point3::new(0.5, 0.5, 0.5);
        let samples: Vec<_> = unit_cube_corners()
            .iter()
            .enumerate()
            .map(|(i, p)| {
                let n = Vector3::new(1.0, (i as Real) * 0.3, 0.2).normalize();
                (*p, n)
            })
            .collect();
        let normals: Vec<_> = samples.iter().map(|(_, n)| *n).collect();

        let kind = classify_feature(&normals, FEATURE, CORNER);
        let first = solve_feature_point(&samples, centroid, kind);
        for _ in 0..10 {
            assert_eq!(classify_feature(&normals, FEATURE, CORNER), kind);
            assert_eq!(solve_feature_point(&samples, centroid, kind), first);
        }
    }

    #[test]
    fn no_samples_no_point() {
        let centroid = Point3::new(0.5, 0.5, 0.5);
        assert!(solve_feature_point(&[], centroid, FeatureKind::Edge).is_none());
        let samples = vec![(Point3::origin(), Vector3::x())];
        assert!(solve_feature_point(&samples, centroid, FeatureKind::None).is_none());
    }
}
