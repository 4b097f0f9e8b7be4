//! Table-driven polygonization of a single cell.
//!
//! Flat cells get the classical marching-cubes triangulation. Feature cells get
//! a fan: the boundary of their classical triangulation is kept and every
//! boundary edge is connected to the cell's feature point, which is what lets
//! a sharp edge or corner show up in the output.

pub mod tables;

use crate::cell::GridCell;
use crate::float_types::{INTERPOLATION_EPSILON, Real};
use crate::triangle::{Edge, Triangle, collect_edges, point_cmp};
use nalgebra::Point3;
use std::cmp::Ordering;
use tables::{EDGE_CORNERS, EDGE_TABLE, TRI_TABLE};

/// 8-bit configuration index: bit `n` is set when corner `n` is below `isolevel`.
pub fn cube_index(values: &[Real; 8], isolevel: Real) -> usize {
    values
        .iter()
        .enumerate()
        .filter(|(_, v)| **v < isolevel)
        .fold(0, |index, (n, _)| index | (1 << n))
}

/// Point where the isosurface crosses the segment `p1`–`p2`.
///
/// Endpoints are put in canonical order first, so swapping the arguments
/// yields the identical point. When the two samples are (almost) equal the
/// first canonical endpoint is returned.
pub fn vertex_interp(
    isolevel: Real,
    p1: Point3<Real>,
    p2: Point3<Real>,
    valp1: Real,
    valp2: Real,
) -> Point3<Real> {
    let ((p1, valp1), (p2, valp2)) = if point_cmp(&p2, &p1) == Ordering::Less {
        ((p2, valp2), (p1, valp1))
    } else {
        ((p1, valp1), (p2, valp2))
    };

    if (valp1 - valp2).abs() > INTERPOLATION_EPSILON {
        let t = (isolevel - valp1) / (valp2 - valp1);
        p1 + (p2 - p1) * t
    } else {
        p1
    }
}

/// Crossing point on every cube edge flagged for `cube_index`; unflagged edges stay `None`.
pub fn edge_crossings(cell: &GridCell, cube_index: usize, isolevel: Real) -> [Option<Point3<Real>>; 12] {
    let flags = EDGE_TABLE[cube_index];
    std::array::from_fn(|e| {
        (flags & (1 << e) != 0).then(|| {
            let [a, b] = EDGE_CORNERS[e];
            vertex_interp(
                isolevel,
                cell.corners[a],
                cell.corners[b],
                cell.values[a],
                cell.values[b],
            )
        })
    })
}

/// Classical triangulation for `cube_index`, degenerate triangles dropped.
pub fn raw_triangles(
    cell: &GridCell,
    cube_index: usize,
    isolevel: Real,
    tolerance: Real,
) -> Vec<Triangle> {
    let crossings = edge_crossings(cell, cube_index, isolevel);
    TRI_TABLE[cube_index]
        .chunks_exact(3)
        .take_while(|tri| tri[0] != -1)
        .filter_map(|tri| {
            let p0 = crossings[tri[0] as usize]?;
            let p1 = crossings[tri[1] as usize]?;
            let p2 = crossings[tri[2] as usize]?;
            Triangle::non_degenerate(p0, p1, p2, tolerance)
        })
        .collect()
}

/// Edges occurring exactly once among `triangles`, i.e. the boundary of the patch.
pub fn boundary_edges(triangles: &[Triangle], tolerance: Real) -> Vec<Edge> {
    let edges = collect_edges(triangles);
    edges
        .iter()
        .enumerate()
        .filter(|&(i, edge)| {
            !edges
                .iter()
                .enumerate()
                .any(|(j, other)| i != j && edge.approx_eq(other, tolerance))
        })
        .map(|(_, edge)| *edge)
        .collect()
}

/// Replace a patch with a fan: one triangle per boundary edge, closed at `apex`.
pub fn feature_fan(triangles: &[Triangle], apex: Point3<Real>, tolerance: Real) -> Vec<Triangle> {
    boundary_edges(triangles, tolerance)
        .into_iter()
        .filter_map(|edge| Triangle::non_degenerate(edge.a, edge.b, apex, tolerance))
        .collect()
}

impl GridCell {
    /// Populate `triangles` for this cell and set `on_surface`.
    pub fn polygonize(&mut self, isolevel: Real, tolerance: Real) {
        let index = cube_index(&self.values, isolevel);
        if EDGE_TABLE[index] == 0 {
            self.on_surface = false;
            return;
        }
        self.on_surface = true;

        let raw = raw_triangles(self, index, isolevel, tolerance);
        self.triangles = match self.feature_point {
            Some(apex) if self.is_feature() => feature_fan(&raw, apex, tolerance),
            _ => raw,
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cell::FeatureKind;
    use crate::polygonize::tables::CORNER_OFFSETS;

    const TOL: Real = 1e-5;

    fn unit_cell(values: [Real; 8]) -> GridCell {
        let corners = CORNER_OFFSETS.map(|[x, y, z]| Point3::new(x as Real, y as Real, z as Real));
        GridCell {
            corners,
            values,
            normals: [None; 8],
            feature: FeatureKind::None,
            feature_point: None,
            on_surface: false,
            triangles: Vec::new(),
        }
    }

    fn values_for_case(case: usize) -> [Real; 8] {
        std::array::from_fn(|n| if case & (1 << n) != 0 { -1.0 } else { 1.0 })
    }

    #[test]
    fn every_case_matches_tables() {
        for case in 0..256 {
            let mut cell = unit_cell(values_for_case(case));
            assert_eq!(cube_index(&cell.values, 0.0), case);

            let crossings = edge_crossings(&cell, case, 0.0);
            for (e, crossing) in crossings.iter().enumerate() {
                assert_eq!(
                    crossing.is_some(),
                    EDGE_TABLE[case] & (1 << e) != 0,
                    "case {case} edge {e}"
                );
                if let Some(p) = crossing {
                    let [a, b] = EDGE_CORNERS[e];
                    let mid = nalgebra::center(&cell.corners[a], &cell.corners[b]);
                    approx::assert_relative_eq!(*p, mid);
                }
            }

            let expected = TRI_TABLE[case].iter().take_while(|&&e| e != -1).count() / 3;
            cell.polygonize(0.0, TOL);
            assert_eq!(cell.triangles.len(), expected, "case {case}");
            assert_eq!(cell.on_surface, expected > 0);
        }
    }

    #[test]
    fn uniform_cells_produce_nothing() {
        for case in [0, 255] {
            let mut cell = unit_cell(values_for_case(case));
            cell.polygonize(0.0, TOL);
            assert!(!cell.on_surface);
            assert!(cell.triangles.is_empty());
        }
    }

    #[test]
    fn interpolation_is_order_invariant() {
        let p1 = Point3::new(2.0, 0.0, 1.0);
        let p2 = Point3::new(2.0, 1.0, 1.0);
        for (v1, v2, iso) in [(0.3, -1.7, 0.0), (-2.0, 5.0, 1.0), (0.1, 0.9, 0.25)] {
            let forward = vertex_interp(iso, p1, p2, v1, v2);
            let backward = vertex_interp(iso, p2, p1, v2, v1);
            assert_eq!(forward, backward);
        }
        approx::assert_relative_eq!(
            vertex_interp(0.0, p1, p2, -1.0, 3.0),
            Point3::new(2.0, 0.25, 1.0)
        );
    }

    #[test]
    fn equal_values_fall_back_to_first_corner() {
        let p1 = Point3::new(0.0, 0.0, 0.0);
        let p2 = Point3::new(1.0, 0.0, 0.0);
        assert_eq!(vertex_interp(0.0, p1, p2, 0.5, 0.500001), p1);
        assert_eq!(vertex_interp(0.0, p2, p1, 0.5, 0.500001), p1);
    }

    #[test]
    fn interpolation_cutoff_sits_at_epsilon() {
        let p1 = Point3::new(0.0, 0.0, 0.0);
        let p2 = Point3::new(0.0, 0.0, 1.0);
        let below = INTERPOLATION_EPSILON * 0.5;
        assert_eq!(vertex_interp(below * 0.5, p1, p2, 0.0, below), p1);

        let above = INTERPOLATION_EPSILON * 4.0;
        let crossing = vertex_interp(above * 0.5, p1, p2, 0.0, above);
        approx::assert_relative_eq!(crossing, Point3::new(0.0, 0.0, 0.5), epsilon = 1e-9);
    }

    #[test]
    fn degenerate_triangles_are_dropped() {
        // Corner 0 sits exactly on the isolevel, collapsing edges 0, 3 and 8 onto it.
        let mut values = [1.0; 8];
        values[0] = -1.0;
        let mut cell = unit_cell(values);
        cell.polygonize(-1.0 + 1e-9, TOL);
        assert!(cell.on_surface);
        assert!(cell.triangles.is_empty());
    }

    #[test]
    fn boundary_of_quad_is_four_edges() {
        // Case 15: corners 0..3 inside, a two-triangle quad at z = 0.5.
        let cell = unit_cell(values_for_case(15));
        let raw = raw_triangles(&cell, 15, 0.0, TOL);
        assert_eq!(raw.len(), 2);
        let boundary = boundary_edges(&raw, TOL);
        assert_eq!(boundary.len(), 4);
        for edge in &boundary {
            approx::assert_relative_eq!(edge.length(), 1.0);
        }
    }

    #[test]
    fn feature_cell_becomes_fan() {
        let mut cell = unit_cell(values_for_case(15));
        let apex = Point3::new(0.5, 0.5, 0.7);
        cell.feature = FeatureKind::Edge;
        cell.feature_point = Some(apex);
        cell.polygonize(0.0, TOL);

        assert_eq!(cell.triangles.len(), 4);
        for tri in &cell.triangles {
            assert_eq!(tri.points[2], apex);
            assert!(!tri.is_degenerate(TOL));
        }
        // The diagonal shared by the two raw triangles is gone.
        let diagonal = Edge::new(Point3::new(0.0, 0.0, 0.5), Point3::new(1.0, 1.0, 0.5));
        let diagonal2 = Edge::new(Point3::new(1.0, 0.0, 0.5), Point3::new(0.0, 1.0, 0.5));
        assert!(
            !cell
                .triangles
                .iter()
                .any(|t| t.contains_edge(&diagonal, TOL) || t.contains_edge(&diagonal2, TOL))
        );
    }

    #[test]
    fn fan_skips_apex_on_boundary_edge() {
        let cell = unit_cell(values_for_case(15));
        let raw = raw_triangles(&cell, 15, 0.0, TOL);
        let apex = Point3::new(0.0, 0.0, 0.5);
        // Two boundary edges touch the apex and collapse.
        assert_eq!(feature_fan(&raw, apex, TOL).len(), 2);
    }
}
