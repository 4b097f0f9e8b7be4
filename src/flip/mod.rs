//! Cross-cell edge flipping.
//!
//! Two axis-adjacent feature cells each fan their triangulation around their
//! own feature point. Wherever the two fans share a boundary edge `(a, b)`,
//! the two triangles owning that edge are replaced by
//! `(f_cell, f_neighbor, a)` and `(f_cell, f_neighbor, b)`, which joins the
//! feature points directly and keeps the feature line continuous across the
//! cell face.
//!
//! The pass is split in two so no cell is ever read after one of its
//! triangles has been scheduled for removal:
//! 1. **Plan**: every unordered neighbour pair is inspected once against a
//!    snapshot of the triangle lists. Planning a pair is a pure function of
//!    the two cells, so pairs can be planned in any order or in parallel.
//! 2. **Commit**: candidates are resolved in pair order (a triangle can be
//!    consumed by at most one flip), claimed triangles are compacted away and
//!    the new triangles are handed back.

use crate::cell::GridCell;
use crate::float_types::Real;
use crate::grid::LatticeShape;
use crate::triangle::{Edge, Triangle};
use hashbrown::HashSet;

/// One flip proposed for a neighbour pair.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EdgeFlip {
    pub edge: Edge,
    /// Index of the triangle owning `edge` in the cell's list.
    pub cell_triangle: usize,
    /// Index of the triangle owning `edge` in the neighbour's list.
    pub neighbor_triangle: usize,
}

/// All flips proposed for one unordered neighbour pair, `cell < neighbor`.
#[derive(Debug, Clone, PartialEq)]
pub struct PairFlips {
    pub cell: usize,
    pub neighbor: usize,
    pub flips: Vec<EdgeFlip>,
}

/// Resolved flips, ready to be committed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FlipPlan {
    /// `(cell, triangle index)` of every triangle to remove.
    pub removals: Vec<(usize, usize)>,
    /// Triangles created by the flips, in plan order.
    pub triangles: Vec<Triangle>,
    pub report: FlipReport,
}

/// Counters describing a flip pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FlipReport {
    /// Neighbour pairs where both cells are feature cells on the surface.
    pub pairs_examined: usize,
    /// Shared edges actually flipped.
    pub edges_flipped: usize,
    /// Shared edges skipped because a triangle was already consumed.
    pub edges_skipped: usize,
}

/// Whether `cell` takes part in edge flipping.
#[inline]
pub fn is_flip_candidate(cell: &GridCell) -> bool {
    cell.is_feature() && cell.on_surface && cell.feature_point.is_some()
}

/// Every unordered pair of axis-adjacent flip candidates, lower index first,
/// ordered by lower index then by axis.
pub fn candidate_pairs(cells: &[GridCell], shape: LatticeShape) -> Vec<(usize, usize)> {
    (0..cells.len())
        .filter(|&i| is_flip_candidate(&cells[i]))
        .flat_map(|i| {
            shape
                .forward_neighbors(i)
                .filter(|&j| is_flip_candidate(&cells[j]))
                .map(move |j| (i, j))
        })
        .collect()
}

/// Index of the first triangle in `triangles` that contains `edge`.
fn owning_triangle(triangles: &[Triangle], edge: &Edge, tolerance: Real) -> Option<usize> {
    triangles.iter().position(|t| t.contains_edge(edge, tolerance))
}

/// Shared edges between two cells' current triangle lists, with the first
/// owning triangle on each side. Each shared edge is reported once.
pub fn plan_pair(cell: &GridCell, neighbor: &GridCell, tolerance: Real) -> Vec<EdgeFlip> {
    let mut flips: Vec<EdgeFlip> = Vec::new();

    for edge in cell.triangles.iter().flat_map(Triangle::edges) {
        if flips.iter().any(|f| f.edge.approx_eq(&edge, tolerance)) {
            continue;
        }
        let Some(neighbor_triangle) = owning_triangle(&neighbor.triangles, &edge, tolerance) else {
            continue;
        };
        let Some(cell_triangle) = owning_triangle(&cell.triangles, &edge, tolerance) else {
            continue;
        };
        flips.push(EdgeFlip {
            edge,
            cell_triangle,
            neighbor_triangle,
        });
    }

    flips
}

/// Plan every candidate pair of `pairs` in order.
pub fn plan_pairs(cells: &[GridCell], pairs: &[(usize, usize)], tolerance: Real) -> Vec<PairFlips> {
    pairs
        .iter()
        .map(|&(cell, neighbor)| PairFlips {
            cell,
            neighbor,
            flips: plan_pair(&cells[cell], &cells[neighbor], tolerance),
        })
        .collect()
}

/// Resolve planned pairs into a [`FlipPlan`].
///
/// Pairs are consumed in the given order; a flip whose triangles were
/// already claimed by an earlier flip is skipped, so each triangle is
/// removed at most once and each physical shared edge is flipped once.
pub fn resolve(cells: &[GridCell], planned: Vec<PairFlips>, tolerance: Real) -> FlipPlan {
    let mut claimed: HashSet<(usize, usize)> = HashSet::new();
    let mut plan = FlipPlan::default();
    plan.report.pairs_examined = planned.len();

    for PairFlips {
        cell,
        neighbor,
        flips,
    } in planned
    {
        let (Some(f_cell), Some(f_neighbor)) =
            (cells[cell].feature_point, cells[neighbor].feature_point)
        else {
            continue;
        };

        for flip in flips {
            let own = (cell, flip.cell_triangle);
            let other = (neighbor, flip.neighbor_triangle);
            if claimed.contains(&own) || claimed.contains(&other) {
                plan.report.edges_skipped += 1;
                continue;
            }
            claimed.insert(own);
            claimed.insert(other);
            plan.removals.push(own);
            plan.removals.push(other);
            plan.report.edges_flipped += 1;

            log::trace!(
                "flip edge {} - {} between cells {cell} and {neighbor}",
                flip.edge.a,
                flip.edge.b
            );

            plan.triangles.extend(
                [flip.edge.a, flip.edge.b]
                    .into_iter()
                    .filter_map(|p| Triangle::non_degenerate(f_cell, f_neighbor, p, tolerance)),
            );
        }
    }

    plan
}

/// Remove every triangle listed in `plan.removals` from its cell and return
/// the flip-generated triangles. Surviving triangles keep their relative order.
pub fn commit(cells: &mut [GridCell], plan: FlipPlan) -> (Vec<Triangle>, FlipReport) {
    let mut removals = plan.removals;
    removals.sort_unstable();

    for chunk in removals.chunk_by(|a, b| a.0 == b.0) {
        let cell = chunk[0].0;
        let doomed: HashSet<usize> = chunk.iter().map(|&(_, t)| t).collect();
        let mut index = 0;
        cells[cell].triangles.retain(|_| {
            let keep = !doomed.contains(&index);
            index += 1;
            keep
        });
    }

    (plan.triangles, plan.report)
}

/// Sequential flip pass over all cells.
pub fn flip_edges(cells: &mut [GridCell], shape: LatticeShape, tolerance: Real) -> (Vec<Triangle>, FlipReport) {
    let pairs = candidate_pairs(cells, shape);
    let planned = plan_pairs(cells, &pairs, tolerance);
    let plan = resolve(cells, planned, tolerance);
    commit(cells, plan)
}
