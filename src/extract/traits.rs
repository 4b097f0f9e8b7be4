//! Traits defining the extraction pipeline for dependency inversion

use super::ExtractionParams;
use crate::cell::GridCell;
use crate::errors::MeshingError;
use crate::flip::{self, FlipReport, PairFlips};
use crate::float_types::{Real, tolerance};
use crate::grid::VolumeField;
use crate::mesh::IndexedTriMesh;
use crate::triangle::Triangle;

/// Per-phase operations of the extraction pipeline.
///
/// Implementors only decide how the cell-local phases are scheduled. The
/// cross-cell parts (flip resolution and commit, vertex deduplication) are
/// shared provided methods and always run sequentially, so every
/// implementation produces the same mesh.
pub trait ExtractOps {
    /// Build (and, if enabled, classify) every cell of the lattice in flat index order.
    fn build_cells(&self, field: &VolumeField, params: &ExtractionParams) -> Vec<GridCell>;

    /// Polygonize every cell in place.
    fn polygonize(&self, cells: &mut [GridCell], isolevel: Real, tolerance: Real);

    /// Plan the flips of every candidate pair, keeping the order of `pairs`.
    fn plan_flips(
        &self,
        cells: &[GridCell],
        pairs: &[(usize, usize)],
        tolerance: Real,
    ) -> Vec<PairFlips>;

    /// Run cell building, polygonization and edge flipping and return the
    /// global triangle list: surviving cell triangles in cell order, then the
    /// flip-generated triangles.
    fn triangles(
        &self,
        field: &VolumeField,
        params: &ExtractionParams,
    ) -> (Vec<Triangle>, FlipReport) {
        let tolerance = tolerance();
        let shape = field.cell_shape();

        let mut cells = self.build_cells(field, params);
        log::debug!(
            "built {} cells, {} feature cells",
            cells.len(),
            cells.iter().filter(|c| c.is_feature()).count()
        );

        self.polygonize(&mut cells, params.isolevel, tolerance);
        log::debug!(
            "polygonized {} surface cells into {} triangles",
            cells.iter().filter(|c| c.on_surface).count(),
            cells.iter().map(|c| c.triangles.len()).sum::<usize>()
        );

        let (flipped, report) = if params.use_features {
            let pairs = flip::candidate_pairs(&cells, shape);
            let planned = self.plan_flips(&cells, &pairs, tolerance);
            let plan = flip::resolve(&cells, planned, tolerance);
            flip::commit(&mut cells, plan)
        } else {
            (Vec::new(), FlipReport::default())
        };
        log::debug!(
            "edge flips: {} pairs examined, {} flipped, {} skipped",
            report.pairs_examined,
            report.edges_flipped,
            report.edges_skipped
        );

        let mut triangles: Vec<Triangle> = cells.into_iter().flat_map(|c| c.triangles).collect();
        triangles.extend(flipped);
        (triangles, report)
    }

    /// Full pipeline: triangles, then vertex deduplication into an indexed mesh.
    fn extract(
        &self,
        field: &VolumeField,
        params: &ExtractionParams,
    ) -> Result<IndexedTriMesh, MeshingError> {
        let (triangles, _) = self.triangles(field, params);
        let mesh = IndexedTriMesh::from_triangles(&triangles, tolerance())?;
        log::debug!(
            "assembled mesh with {} vertices and {} faces",
            mesh.vertex_count(),
            mesh.face_count()
        );
        Ok(mesh)
    }
}
