//! Feature-preserving **extended marching cubes**: triangulated isosurfaces
//! from regular 3D scalar fields that keep sharp edges and corners.
//!
//! A [`VolumeField`] bundles the scalar samples, a per-sample index into a
//! pool of surface normals and the pool itself. Extraction then runs five
//! stages:
//! 1. [`GridCellBuilder`] slides the 8-corner window over the cell lattice.
//! 2. Feature classification tags each cell flat, edge or corner from its
//!    corner normals and places a feature point by a QEF solve.
//! 3. Polygonization emits the classical marching-cubes triangles, or a fan
//!    around the feature point for feature cells.
//! 4. Edge flipping joins the fans of adjacent feature cells.
//! 5. Vertices are deduplicated into an [`IndexedTriMesh`].
//!
//! ```rust
//! # use sharpcubes::{ExtractionParams, IndexedTriMesh, LatticeShape, Real, ScalarGrid, VolumeField};
//! # fn main() -> Result<(), sharpcubes::MeshingError> {
//! let shape = LatticeShape::new(2, 2, 2);
//! let scalars = ScalarGrid::from_fn(shape, |_, _, z| if z == 0 { -1.0 } else { 1.0 });
//! let field = VolumeField::without_normals(scalars)?;
//! let mesh = IndexedTriMesh::extract(&field, &ExtractionParams::default().with_features(false))?;
//! assert_eq!((mesh.vertex_count(), mesh.face_count()), (4, 2));
//! # Ok(())
//! # }
//! ```
//!
//! # Features
//! #### Default
//! - **f64**: use f64 as Real
//! - [**stl-io**](https://en.wikipedia.org/wiki/STL_(file_format)): `.stl` export
//!
//! #### Optional
//! - **f32**: use f32 as Real, this conflicts with f64
//! - **parallel**: use rayon for the cell-local stages

#![forbid(unsafe_code)]
#![warn(clippy::missing_const_for_fn, clippy::approx_constant, clippy::all)]

pub mod cell;
pub mod errors;
pub mod extract;
pub mod flip;
pub mod float_types;
pub mod grid;
pub mod io;
pub mod mesh;
pub mod polygonize;
pub mod triangle;
pub mod triangulated;

#[cfg(any(
    all(feature = "f64", feature = "f32"),
    not(any(feature = "f64", feature = "f32"))
))]
compile_error!("Either 'f64' or 'f32' feature must be specified, but not both");

pub use cell::{FeatureKind, GridCell, GridCellBuilder};
pub use errors::MeshingError;
pub use extract::{ExtractOps, ExtractionParams, SerialExtractOps, extract_mesh};
pub use float_types::Real;
pub use grid::{LatticeShape, NormalIndexGrid, ScalarGrid, VolumeField};
pub use mesh::{IndexedTriMesh, PointIndexer};
pub use triangle::{Edge, Triangle};
pub use triangulated::Triangulated3D;

#[cfg(feature = "parallel")]
pub use extract::ParallelExtractOps;
