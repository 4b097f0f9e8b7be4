//! Isosurface extraction pipeline
//!
//! Cells are built and classified, polygonized, edge-flipped and finally
//! deduplicated into an [`IndexedTriMesh`]. The cell-local phases are
//! scheduled by an [`ExtractOps`] implementation (serial, or rayon-backed
//! with the `parallel` feature).

pub mod traits;

pub mod serial;

#[cfg(feature = "parallel")]
pub mod parallel;

pub use traits::ExtractOps;

pub use serial::SerialExtractOps;

#[cfg(feature = "parallel")]
pub use parallel::ParallelExtractOps;

use crate::cell::GridCellBuilder;
use crate::errors::MeshingError;
use crate::float_types::{DEFAULT_CORNER_THRESHOLD, DEFAULT_FEATURE_THRESHOLD, Real};
use crate::grid::VolumeField;
use crate::mesh::IndexedTriMesh;

/// Parameters of one extraction run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExtractionParams {
    /// Scalar value of the extracted surface.
    pub isolevel: Real,
    /// Cosine below which two corner normals indicate a sharp feature.
    pub feature_threshold: Real,
    /// Alignment with `n★` above which a feature is a corner rather than an edge.
    pub corner_threshold: Real,
    /// When false every cell is treated as flat and no flipping happens.
    pub use_features: bool,
}

impl Default for ExtractionParams {
    fn default() -> Self {
        Self {
            isolevel: 0.0,
            feature_threshold: DEFAULT_FEATURE_THRESHOLD,
            corner_threshold: DEFAULT_CORNER_THRESHOLD,
            use_features: true,
        }
    }
}

impl ExtractionParams {
    pub const fn with_isolevel(mut self, isolevel: Real) -> Self {
        self.isolevel = isolevel;
        self
    }

    pub const fn with_feature_threshold(mut self, threshold: Real) -> Self {
        self.feature_threshold = threshold;
        self
    }

    pub const fn with_corner_threshold(mut self, threshold: Real) -> Self {
        self.corner_threshold = threshold;
        self
    }

    pub const fn with_features(mut self, enabled: bool) -> Self {
        self.use_features = enabled;
        self
    }

    /// Cell builder configured for these parameters.
    pub const fn cell_builder<'a>(&self, field: &'a VolumeField) -> GridCellBuilder<'a> {
        let builder = GridCellBuilder::new(field);
        if self.use_features {
            builder.with_features(self.feature_threshold, self.corner_threshold)
        } else {
            builder
        }
    }
}

/// Extract the isosurface of `field` with the default scheduler for the enabled features.
pub fn extract_mesh(
    field: &VolumeField,
    params: &ExtractionParams,
) -> Result<IndexedTriMesh, MeshingError> {
    #[cfg(not(feature = "parallel"))]
    let ops = SerialExtractOps::new();
    #[cfg(feature = "parallel")]
    let ops = ParallelExtractOps::new();

    ops.extract(field, params)
}

impl IndexedTriMesh {
    /// Return a mesh extracted from `field`, see [`extract_mesh`].
    pub fn extract(field: &VolumeField, params: &ExtractionParams) -> Result<Self, MeshingError> {
        extract_mesh(field, params)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::{LatticeShape, ScalarGrid};

    #[test]
    fn defaults_match_usual_thresholds() {
        let params = ExtractionParams::default();
        assert_eq!(params.isolevel, 0.0);
        assert_eq!(params.feature_threshold, 0.9);
        assert_eq!(params.corner_threshold, 0.7);
        assert!(params.use_features);

        let tuned = params
            .with_isolevel(0.5)
            .with_feature_threshold(0.8)
            .with_corner_threshold(0.6)
            .with_features(false);
        assert_eq!(tuned.isolevel, 0.5);
        assert_eq!(tuned.feature_threshold, 0.8);
        assert_eq!(tuned.corner_threshold, 0.6);
        assert!(!tuned.use_features);
    }

    #[test]
    fn single_cell_quad() {
        let shape = LatticeShape::new(2, 2, 2);
        let scalars = ScalarGrid::from_fn(shape, |_, _, z| if z == 0 { -1.0 } else { 1.0 });
        let field = VolumeField::without_normals(scalars).unwrap();
        let params = ExtractionParams::default().with_features(false);

        let (triangles, report) = SerialExtractOps::new().triangles(&field, &params);
        assert_eq!(triangles.len(), 2);
        assert_eq!(report, Default::default());

        let mesh = extract_mesh(&field, &params).unwrap();
        assert_eq!(mesh.vertex_count(), 4);
        assert_eq!(mesh.face_count(), 2);
        for v in &mesh.vertices {
            assert_eq!(v.z, 0.5);
        }
    }
}
