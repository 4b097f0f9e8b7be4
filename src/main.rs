// main.rs
//
// Extract a box from a sampled signed distance field twice, once with sharp
// feature handling and once with plain marching cubes, and write both meshes.

use nalgebra::{Point3, Vector3};
use sharpcubes::{
    ExtractionParams, IndexedTriMesh, LatticeShape, NormalIndexGrid, Real, ScalarGrid, VolumeField,
};
use std::error::Error;
use std::fs;

const DIM: usize = 24;

/// Signed distance to an axis-aligned box.
fn box_sdf(p: &Point3<Real>, center: &Point3<Real>, half: &Vector3<Real>) -> Real {
    let q = (p - center).abs() - half;
    let outside = q.sup(&Vector3::zeros()).norm();
    let inside = q.max().min(0.0);
    outside + inside
}

/// Sample the box and attach a gradient normal to every sample close to the surface.
fn box_field() -> Result<VolumeField, Box<dyn Error>> {
    let shape = LatticeShape::new(DIM, DIM, DIM);
    let center = Point3::new(11.7, 12.2, 11.9);
    let half = Vector3::new(6.3, 5.4, 7.1);
    let sdf = |p: &Point3<Real>| box_sdf(p, &center, &half);

    let scalars = ScalarGrid::from_fn(shape, |x, y, z| {
        sdf(&Point3::new(x as Real, y as Real, z as Real))
    });

    let h: Real = 1e-3;
    let mut normals = Vec::new();
    let mut indices = Vec::with_capacity(shape.size());
    for i in 0..shape.size() {
        let [x, y, z] = shape.delinearize(i);
        let p = Point3::new(x as Real, y as Real, z as Real);
        if sdf(&p).abs() > 2.0 {
            indices.push(None);
            continue;
        }
        let gradient = Vector3::new(
            sdf(&(p + Vector3::x() * h)) - sdf(&(p - Vector3::x() * h)),
            sdf(&(p + Vector3::y() * h)) - sdf(&(p - Vector3::y() * h)),
            sdf(&(p + Vector3::z() * h)) - sdf(&(p - Vector3::z() * h)),
        );
        match gradient.try_normalize(Real::EPSILON) {
            Some(n) => {
                indices.push(Some(normals.len()));
                normals.push(n);
            },
            None => indices.push(None),
        }
    }

    Ok(VolumeField::new(
        scalars,
        NormalIndexGrid::new(shape, indices)?,
        normals,
    )?)
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    // Ensure the /out folder exists
    fs::create_dir_all("out")?;

    let field = box_field()?;

    let sharp = IndexedTriMesh::extract(&field, &ExtractionParams::default())?;
    println!(
        "sharp box: {} vertices, {} faces",
        sharp.vertex_count(),
        sharp.face_count()
    );
    sharp.write_ply_file("out/box_sharp.ply")?;

    let smooth =
        IndexedTriMesh::extract(&field, &ExtractionParams::default().with_features(false))?;
    println!(
        "plain box: {} vertices, {} faces",
        smooth.vertex_count(),
        smooth.face_count()
    );
    smooth.write_ply_file("out/box_plain.ply")?;

    #[cfg(feature = "stl-io")]
    {
        fs::write("out/box_sharp.stl", sharp.to_stl_ascii("box_sharp"))?;
        fs::write("out/box_plain.stl", smooth.to_stl_binary("box_plain")?)?;
    }

    Ok(())
}
