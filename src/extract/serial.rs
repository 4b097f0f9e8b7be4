//! Serial implementation of the extraction pipeline

use super::ExtractionParams;
use super::traits::ExtractOps;
use crate::cell::GridCell;
use crate::flip::{self, PairFlips};
use crate::float_types::Real;
use crate::grid::VolumeField;

/// Serial implementation of the extraction pipeline
#[derive(Debug, Clone, Copy)]
pub struct SerialExtractOps;

impl SerialExtractOps {
    pub const fn new() -> Self {
        Self
    }
}

impl Default for SerialExtractOps {
    fn default() -> Self {
        Self::new()
    }
}

impl ExtractOps for SerialExtractOps {
    fn build_cells(&self, field: &VolumeField, params: &ExtractionParams) -> Vec<GridCell> {
        params.cell_builder(field).build_all()
    }

    fn polygonize(&self, cells: &mut [GridCell], isolevel: Real, tolerance: Real) {
        for cell in cells.iter_mut() {
            cell.polygonize(isolevel, tolerance);
        }
    }

    fn plan_flips(
        &self,
        cells: &[GridCell],
        pairs: &[(usize, usize)],
        tolerance: Real,
    ) -> Vec<PairFlips> {
        flip::plan_pairs(cells, pairs, tolerance)
    }
}
