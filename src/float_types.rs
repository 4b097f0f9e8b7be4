// Our Real scalar type:
#[cfg(feature = "f32")]
pub type Real = f32;
#[cfg(feature = "f64")]
pub type Real = f64;

use core::str::FromStr;
use std::sync::OnceLock;

/// Lazily-initialized tolerance used across the crate for every positional
/// comparison: degenerate-triangle rejection, edge matching and vertex
/// deduplication all share it so the stages stay consistent with each other.
///
/// Defaults to `1e-5` (in lattice units), but can be overridden:
///  1) **Build-time**: set env var `SHARPCUBES_TOLERANCE` (e.g. `SHARPCUBES_TOLERANCE=1e-6 cargo build`)
///  2) **Runtime**: call [`set_tolerance`] once before using the library
static TOLERANCE_CELL: OnceLock<Real> = OnceLock::new();

/// Tolerance used when nothing else has been configured.
pub const DEFAULT_TOLERANCE: Real = 1e-5;

/// Returns the current tolerance value.
/// If not set yet, it tries `SHARPCUBES_TOLERANCE` (parsed as the active `Real`) and
/// falls back to [`DEFAULT_TOLERANCE`].
pub fn tolerance() -> Real {
    *TOLERANCE_CELL.get_or_init(|| {
        // Compile-time env if provided
        if let Some(environment_variable) = option_env!("SHARPCUBES_TOLERANCE") {
            if let Ok(value) = Real::from_str(environment_variable) {
                return value.max(Real::EPSILON);
            }
        }
        DEFAULT_TOLERANCE
    })
}

/// Set the tolerance programmatically once (subsequent calls are ignored).
/// Call near program start: `sharpcubes::float_types::set_tolerance(1e-6);`
pub fn set_tolerance(value: Real) {
    let _ = TOLERANCE_CELL.set(value.max(Real::EPSILON));
}

/// Default cosine threshold below which two corner normals indicate a feature
/// (roughly 25 degrees of opening angle).
pub const DEFAULT_FEATURE_THRESHOLD: Real = 0.9;

/// Default threshold on `|n · n★|` above which a feature is a corner.
pub const DEFAULT_CORNER_THRESHOLD: Real = 0.7;

/// Sample difference at or below which edge interpolation returns the first
/// endpoint instead of dividing by a near-zero span.
pub const INTERPOLATION_EPSILON: Real = 1e-5;

/// Offset subtracted from the largest singular value when deriving the
/// rank-reduction threshold for edge features.
pub const SINGULAR_VALUE_GUARD: Real = 1e-4;
