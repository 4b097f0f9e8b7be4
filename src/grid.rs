//! Input lattices: the scalar field, its parallel normal-index grid and the normal pool.

use crate::errors::MeshingError;
use crate::float_types::Real;
use nalgebra::Vector3;

/// Dimensions of a dense 3D lattice stored **x-major** (then y, then z).
///
/// The same layout is used for sample grids and for the cell lattice, so a
/// flat cell index can be turned back into `(x, y, z)` and neighbours can be
/// found by index arithmetic alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LatticeShape {
    pub nx: usize,
    pub ny: usize,
    pub nz: usize,
}

impl LatticeShape {
    pub const fn new(nx: usize, ny: usize, nz: usize) -> Self {
        Self { nx, ny, nz }
    }

    #[inline]
    pub const fn as_array(&self) -> [usize; 3] {
        [self.nx, self.ny, self.nz]
    }

    #[inline]
    pub const fn size(&self) -> usize {
        self.nx * self.ny * self.nz
    }

    #[inline]
    pub const fn linearize(&self, coords: [usize; 3]) -> usize {
        let [x, y, z] = coords;
        (x * self.ny + y) * self.nz + z
    }

    #[inline]
    pub const fn delinearize(&self, i: usize) -> [usize; 3] {
        let slab = self.ny * self.nz;
        let x = i / slab;
        let yz = i % slab;
        [x, yz / self.nz, yz % self.nz]
    }

    /// Shape of the cell lattice spanned by this sample lattice, or `None`
    /// when some axis has fewer than two samples.
    pub const fn cell_lattice(&self) -> Option<LatticeShape> {
        if self.nx < 2 || self.ny < 2 || self.nz < 2 {
            return None;
        }
        Some(LatticeShape::new(self.nx - 1, self.ny - 1, self.nz - 1))
    }

    /// Neighbours in the +x, +y, +z directions only, so every unordered
    /// neighbour pair is reached exactly once from its lower index.
    pub fn forward_neighbors(&self, i: usize) -> impl Iterator<Item = usize> + '_ {
        let coords = self.delinearize(i);
        let dims = self.as_array();
        (0..3).filter_map(move |axis| {
            (coords[axis] + 1 < dims[axis]).then(|| {
                let mut c = coords;
                c[axis] += 1;
                self.linearize(c)
            })
        })
    }
}

/// Dense scalar samples, immutable once built.
#[derive(Debug, Clone, PartialEq)]
pub struct ScalarGrid {
    shape: LatticeShape,
    values: Vec<Real>,
}

impl ScalarGrid {
    /// Wrap `values` (x-major order) as a grid of the given shape.
    pub fn new(shape: LatticeShape, values: Vec<Real>) -> Result<Self, MeshingError> {
        if values.len() != shape.size() {
            return Err(MeshingError::DimensionMismatch {
                expected: shape.size(),
                found: values.len(),
            });
        }
        Ok(Self { shape, values })
    }

    /// Sample `f(x, y, z)` at every lattice point.
    pub fn from_fn<F>(shape: LatticeShape, mut f: F) -> Self
    where
        F: FnMut(usize, usize, usize) -> Real,
    {
        let values = (0..shape.size())
            .map(|i| {
                let [x, y, z] = shape.delinearize(i);
                f(x, y, z)
            })
            .collect();
        Self { shape, values }
    }

    #[inline]
    pub const fn shape(&self) -> LatticeShape {
        self.shape
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize, z: usize) -> Real {
        self.values[self.shape.linearize([x, y, z])]
    }

    pub fn values(&self) -> &[Real] {
        &self.values
    }
}

/// Sentinel used by upstream producers for "no normal sampled here".
pub const NO_NORMAL: i64 = -1;

/// Per-sample reference into the normal pool; `None` where no normal was sampled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalIndexGrid {
    shape: LatticeShape,
    indices: Vec<Option<usize>>,
}

impl NormalIndexGrid {
    pub fn new(shape: LatticeShape, indices: Vec<Option<usize>>) -> Result<Self, MeshingError> {
        if indices.len() != shape.size() {
            return Err(MeshingError::DimensionMismatch {
                expected: shape.size(),
                found: indices.len(),
            });
        }
        Ok(Self { shape, indices })
    }

    /// Build from raw upstream indices, where any negative value
    /// (conventionally [`NO_NORMAL`]) means "no normal".
    pub fn from_raw(shape: LatticeShape, raw: &[i64]) -> Result<Self, MeshingError> {
        let indices = raw
            .iter()
            .map(|&i| usize::try_from(i).ok())
            .collect();
        Self::new(shape, indices)
    }

    /// A grid with no sampled normals at all.
    pub fn empty(shape: LatticeShape) -> Self {
        Self {
            shape,
            indices: vec![None; shape.size()],
        }
    }

    #[inline]
    pub const fn shape(&self) -> LatticeShape {
        self.shape
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize, z: usize) -> Option<usize> {
        self.indices[self.shape.linearize([x, y, z])]
    }
}

/// The three upstream inputs bundled and validated against each other.
///
/// Fields are only reachable through accessors, so a field can never
/// reference a normal outside its pool or disagree with its own shape.
#[derive(Debug, Clone)]
pub struct VolumeField {
    scalars: ScalarGrid,
    normal_indices: NormalIndexGrid,
    normals: Vec<Vector3<Real>>,
}

impl VolumeField {
    /// Validate that both grids share a shape with at least one cell and that
    /// every normal reference resolves into `normals`.
    pub fn new(
        scalars: ScalarGrid,
        normal_indices: NormalIndexGrid,
        normals: Vec<Vector3<Real>>,
    ) -> Result<Self, MeshingError> {
        let shape = scalars.shape();
        if shape.cell_lattice().is_none() {
            return Err(MeshingError::GridTooSmall {
                dims: shape.as_array(),
            });
        }
        if normal_indices.shape() != shape {
            return Err(MeshingError::DimensionMismatch {
                expected: shape.size(),
                found: normal_indices.shape().size(),
            });
        }
        if let Some(&index) = normal_indices
            .indices
            .iter()
            .flatten()
            .find(|&&index| index >= normals.len())
        {
            return Err(MeshingError::NormalIndexOutOfRange {
                index,
                pool_len: normals.len(),
            });
        }

        Ok(Self {
            scalars,
            normal_indices,
            normals,
        })
    }

    /// A field without any normal samples, e.g. for plain marching cubes.
    pub fn without_normals(scalars: ScalarGrid) -> Result<Self, MeshingError> {
        let normal_indices = NormalIndexGrid::empty(scalars.shape());
        Self::new(scalars, normal_indices, Vec::new())
    }

    #[inline]
    pub const fn scalars(&self) -> &ScalarGrid {
        &self.scalars
    }

    #[inline]
    pub const fn normal_indices(&self) -> &NormalIndexGrid {
        &self.normal_indices
    }

    /// The normal pool every index of [`Self::normal_indices`] points into.
    #[inline]
    pub fn normals(&self) -> &[Vector3<Real>] {
        &self.normals
    }

    #[inline]
    pub const fn shape(&self) -> LatticeShape {
        self.scalars.shape()
    }

    /// Shape of the cell lattice; always valid after construction.
    #[inline]
    pub fn cell_shape(&self) -> LatticeShape {
        let [nx, ny, nz] = self.shape().as_array();
        LatticeShape::new(nx - 1, ny - 1, nz - 1)
    }
}
