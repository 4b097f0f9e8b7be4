#![cfg(feature = "stl-io")]

mod support;

use nalgebra::Point3;
use sharpcubes::{ExtractOps, ExtractionParams, IndexedTriMesh, LatticeShape, SerialExtractOps};
use support::sphere_field;

fn sphere() -> IndexedTriMesh {
    let field = sphere_field(LatticeShape::new(8, 8, 8), Point3::new(3.5, 3.5, 3.5), 2.2);
    IndexedTriMesh::extract(&field, &ExtractionParams::default()).unwrap()
}

#[test]
fn mesh_to_stl_ascii() {
    let mesh = sphere();
    let stl_str = mesh.to_stl_ascii("test_sphere");
    // Basic checks
    assert!(stl_str.contains("solid test_sphere"));
    assert!(stl_str.contains("endsolid test_sphere"));

    assert_eq!(stl_str.matches("facet normal").count(), mesh.face_count());
    assert_eq!(stl_str.matches("vertex ").count(), 3 * mesh.face_count());
}

#[test]
fn mesh_to_stl_binary() -> Result<(), Box<dyn std::error::Error>> {
    let mesh = sphere();
    let bytes = mesh.to_stl_binary("A sphere")?;
    assert_eq!(bytes.len(), 84 + 50 * mesh.face_count());

    let count = u32::from_le_bytes([bytes[80], bytes[81], bytes[82], bytes[83]]);
    assert_eq!(count as usize, mesh.face_count());
    Ok(())
}

#[test]
fn raw_triangles_to_stl() {
    let field = sphere_field(LatticeShape::new(8, 8, 8), Point3::new(3.5, 3.5, 3.5), 2.2);
    let (triangles, _) = SerialExtractOps::new().triangles(&field, &ExtractionParams::default());
    assert!(!triangles.is_empty());

    let text = sharpcubes::io::to_stl_ascii(triangles.as_slice(), "raw");
    assert_eq!(text.matches("facet normal").count(), triangles.len());

    let bytes = sharpcubes::io::to_stl_binary(triangles.as_slice(), "raw").unwrap();
    assert_eq!(bytes.len(), 84 + 50 * triangles.len());

    // Same facets as the deduplicated mesh built from them.
    let mesh = IndexedTriMesh::extract(&field, &ExtractionParams::default()).unwrap();
    assert_eq!(mesh.face_count(), triangles.len());
}
