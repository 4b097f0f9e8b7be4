//! Lattice cells: the 8-corner sampling window, its feature tag and its triangles.

use crate::float_types::Real;
use crate::grid::{LatticeShape, VolumeField};
use crate::polygonize::tables::CORNER_OFFSETS;
use crate::triangle::Triangle;
use nalgebra::{Point3, Vector3};

pub mod feature;

pub use feature::{classify_feature, solve_feature_point};

/// Sharp-feature classification of a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FeatureKind {
    /// Corner normals are nearly parallel (flat region) or missing.
    #[default]
    None,
    /// Normals spread along two directions: a sharp edge crosses the cell.
    Edge,
    /// Normals spread along three independent directions.
    Corner,
}

impl FeatureKind {
    #[inline]
    pub const fn is_feature(self) -> bool {
        !matches!(self, FeatureKind::None)
    }
}

/// One lattice cell.
///
/// Created by [`GridCellBuilder`], tagged by feature classification, filled by
/// polygonization and later thinned out by edge flipping.
#[derive(Debug, Clone, PartialEq)]
pub struct GridCell {
    /// Corner positions in lattice coordinates, classical corner numbering.
    pub corners: [Point3<Real>; 8],
    /// Scalar sample at each corner.
    pub values: [Real; 8],
    /// Index into the normal pool for each corner, if a normal was sampled there.
    pub normals: [Option<usize>; 8],
    pub feature: FeatureKind,
    /// Present exactly when `feature` is not [`FeatureKind::None`].
    pub feature_point: Option<Point3<Real>>,
    /// Whether the isosurface crosses this cell.
    pub on_surface: bool,
    pub triangles: Vec<Triangle>,
}

impl GridCell {
    /// Read the 8 corner samples of the cell whose base sample is `base`.
    pub fn sample(field: &VolumeField, base: [usize; 3]) -> Self {
        let mut corners = [Point3::origin(); 8];
        let mut values = [0.0; 8];
        let mut normals = [None; 8];

        for (n, offset) in CORNER_OFFSETS.iter().enumerate() {
            let x = base[0] + offset[0];
            let y = base[1] + offset[1];
            let z = base[2] + offset[2];
            corners[n] = Point3::new(x as Real, y as Real, z as Real);
            values[n] = field.scalars().get(x, y, z);
            normals[n] = field.normal_indices().get(x, y, z);
        }

        GridCell {
            corners,
            values,
            normals,
            feature: FeatureKind::None,
            feature_point: None,
            on_surface: false,
            triangles: Vec::new(),
        }
    }

    /// Corner positions paired with their sampled normals, corners without a normal skipped.
    pub fn normal_samples<'a>(
        &'a self,
        pool: &'a [Vector3<Real>],
    ) -> impl Iterator<Item = (Point3<Real>, Vector3<Real>)> + 'a {
        self.corners
            .iter()
            .zip(self.normals.iter())
            .filter_map(move |(p, n)| n.map(|i| (*p, pool[i])))
    }

    /// Mean of the 8 corner positions.
    pub fn centroid(&self) -> Point3<Real> {
        let sum = self
            .corners
            .iter()
            .fold(Vector3::zeros(), |acc, p| acc + p.coords);
        Point3::from(sum / 8.0)
    }

    #[inline]
    pub const fn is_feature(&self) -> bool {
        self.feature.is_feature()
    }

    /// Tag this cell from its corner normals and, for feature cells, place the feature point.
    pub fn classify(
        &mut self,
        pool: &[Vector3<Real>],
        feature_threshold: Real,
        corner_threshold: Real,
    ) {
        let samples: Vec<(Point3<Real>, Vector3<Real>)> = self.normal_samples(pool).collect();
        let normals: Vec<Vector3<Real>> = samples.iter().map(|(_, n)| *n).collect();

        self.feature = classify_feature(&normals, feature_threshold, corner_threshold);
        self.feature_point = if self.feature.is_feature() {
            solve_feature_point(&samples, self.centroid(), self.feature)
        } else {
            None
        };
        if self.feature_point.is_none() {
            self.feature = FeatureKind::None;
        }
    }
}

/// Slides the 8-corner window over the cell lattice of a [`VolumeField`].
///
/// Cells come out in flat x-major order of the cell lattice; edge flipping
/// relies on that order to find neighbours by index arithmetic.
#[derive(Debug, Clone, Copy)]
pub struct GridCellBuilder<'a> {
    field: &'a VolumeField,
    features: Option<(Real, Real)>,
}

impl<'a> GridCellBuilder<'a> {
    /// Builder that only samples corners, without feature classification.
    pub const fn new(field: &'a VolumeField) -> Self {
        Self {
            field,
            features: None,
        }
    }

    /// Classify every cell with the given feature (cosine) and corner thresholds.
    pub const fn with_features(mut self, feature_threshold: Real, corner_threshold: Real) -> Self {
        self.features = Some((feature_threshold, corner_threshold));
        self
    }

    #[inline]
    pub fn cell_shape(&self) -> LatticeShape {
        self.field.cell_shape()
    }

    /// Build the cell at flat lattice index `index`.
    pub fn build(&self, index: usize) -> GridCell {
        let base = self.cell_shape().delinearize(index);
        let mut cell = GridCell::sample(self.field, base);
        if let Some((feature_threshold, corner_threshold)) = self.features {
            cell.classify(self.field.normals(), feature_threshold, corner_threshold);
        }
        cell
    }

    pub fn build_all(&self) -> Vec<GridCell> {
        (0..self.cell_shape().size()).map(|i| self.build(i)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::{LatticeShape, NormalIndexGrid, ScalarGrid};

    fn ramp_field(shape: LatticeShape) -> VolumeField {
        let scalars = ScalarGrid::from_fn(shape, |x, y, z| (100 * x + 10 * y + z) as Real);
        VolumeField::without_normals(scalars).unwrap()
    }

    #[test]
    fn corner_numbering_follows_formula() {
        for (n, offset) in CORNER_OFFSETS.iter().enumerate() {
            let expected = [
                usize::from(n % 4 == 1 || n % 4 == 2),
                (n % 4) / 2,
                n / 4,
            ];
            assert_eq!(*offset, expected, "corner {n}");
        }
    }

    #[test]
    fn cells_are_built_in_x_major_order() {
        let field = ramp_field(LatticeShape::new(3, 4, 2));
        let cells = GridCellBuilder::new(&field).build_all();
        assert_eq!(cells.len(), 2 * 3);

        let shape = field.cell_shape();
        for (i, cell) in cells.iter().enumerate() {
            let [x, y, z] = shape.delinearize(i);
            assert_eq!(cell.corners[0], Point3::new(x as Real, y as Real, z as Real));
            assert_eq!(cell.values[0], (100 * x + 10 * y + z) as Real);
            assert_eq!(cell.values[6], (100 * (x + 1) + 10 * (y + 1) + z + 1) as Real);
            assert_eq!(cell.feature, FeatureKind::None);
            assert!(cell.feature_point.is_none());
        }
        assert_eq!(cells[1].corners[0], Point3::new(0.0, 1.0, 0.0));
    }

    #[test]
    fn centroid_is_cell_center() {
        let field = ramp_field(LatticeShape::new(3, 3, 3));
        let cell = GridCellBuilder::new(&field).build(field.cell_shape().linearize([1, 0, 1]));
        assert_eq!(cell.centroid(), Point3::new(1.5, 0.5, 1.5));
    }

    #[test]
    fn classification_without_normals_is_none() {
        let field = ramp_field(LatticeShape::new(2, 2, 2));
        let cell = GridCellBuilder::new(&field).with_features(0.9, 0.7).build(0);
        assert_eq!(cell.feature, FeatureKind::None);
        assert!(cell.feature_point.is_none());
    }

    #[test]
    fn normal_samples_skip_missing_corners() {
        let shape = LatticeShape::new(2, 2, 2);
        let scalars = ScalarGrid::from_fn(shape, |_, _, z| z as Real);
        let mut indices = vec![None; 8];
        indices[shape.linearize([1, 1, 1])] = Some(0);
        let field = VolumeField::new(
            scalars,
            NormalIndexGrid::new(shape, indices).unwrap(),
            vec![Vector3::x()],
        )
        .unwrap();

        let cell = GridCellBuilder::new(&field).build(0);
        let samples: Vec<_> = cell.normal_samples(field.normals()).collect();
        assert_eq!(samples, vec![(Point3::new(1.0, 1.0, 1.0), Vector3::x())]);
    }
}
