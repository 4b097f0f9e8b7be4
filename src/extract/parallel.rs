//! Parallel implementation of the extraction pipeline

use super::ExtractionParams;
use super::traits::ExtractOps;
use crate::cell::GridCell;
use crate::flip::{PairFlips, plan_pair};
use crate::float_types::Real;
use crate::grid::VolumeField;
use rayon::prelude::*;

/// Parallel implementation of the extraction pipeline.
///
/// Cell building, classification, polygonization and per-pair flip planning
/// run on the rayon pool. Indexed collects keep every result in the serial
/// order, so the resulting mesh is identical to [`super::SerialExtractOps`].
#[derive(Debug, Clone, Copy)]
pub struct ParallelExtractOps;

impl ParallelExtractOps {
    pub const fn new() -> Self {
        Self
    }
}

impl Default for ParallelExtractOps {
    fn default() -> Self {
        Self::new()
    }
}

impl ExtractOps for ParallelExtractOps {
    fn build_cells(&self, field: &VolumeField, params: &ExtractionParams) -> Vec<GridCell> {
        let builder = params.cell_builder(field);
        (0..builder.cell_shape().size())
            .into_par_iter()
            .map(|i| builder.build(i))
            .collect()
    }

    fn polygonize(&self, cells: &mut [GridCell], isolevel: Real, tolerance: Real) {
        cells
            .par_iter_mut()
            .for_each(|cell| cell.polygonize(isolevel, tolerance));
    }

    fn plan_flips(
        &self,
        cells: &[GridCell],
        pairs: &[(usize, usize)],
        tolerance: Real,
    ) -> Vec<PairFlips> {
        pairs
            .par_iter()
            .map(|&(cell, neighbor)| PairFlips {
                cell,
                neighbor,
                flips: plan_pair(&cells[cell], &cells[neighbor], tolerance),
            })
            .collect()
    }
}
