//! Meshing errors

use crate::float_types::Real;
use crate::io::IoError;
use nalgebra::Point3;

/// All the failures extraction can surface to the caller.
///
/// Geometric edge cases (degenerate triangles, cells without normals,
/// ill-conditioned feature solves) are resolved locally and never show up here;
/// only broken inputs and internal-consistency violations do.
#[derive(Debug, thiserror::Error)]
pub enum MeshingError {
    /// (IndexResolution) A triangle corner was not found in the vertex index at export time
    #[error("(IndexResolution) Point not found in vertex index: {position}")]
    IndexResolution { position: Point3<Real> },

    /// (DimensionMismatch) An input array does not match the lattice shape
    #[error("(DimensionMismatch) Expected {expected} samples but found {found}")]
    DimensionMismatch { expected: usize, found: usize },

    /// (GridTooSmall) Every axis needs at least two samples to form a cell
    #[error("(GridTooSmall) Grid of dimensions {dims:?} contains no cells")]
    GridTooSmall { dims: [usize; 3] },

    /// (NormalIndexOutOfRange) A normal index points past the end of the normal pool
    #[error("(NormalIndexOutOfRange) Normal index {index} exceeds pool of {pool_len} normals")]
    NormalIndexOutOfRange { index: usize, pool_len: usize },

    /// Export failure while serializing an assembled mesh
    #[error(transparent)]
    Io(#[from] IoError),
}
