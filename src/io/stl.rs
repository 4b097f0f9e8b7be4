use crate::mesh::IndexedTriMesh;
use crate::triangulated::Triangulated3D;
use std::io::Cursor;

/// Export to ASCII STL
/// Convert a triangulated surface to an **ASCII STL** string with the given `name`.
///
/// ```rust
/// # use sharpcubes::{ExtractionParams, IndexedTriMesh, LatticeShape, Real, ScalarGrid, VolumeField};
/// # use std::error::Error;
/// # fn main() -> Result<(), Box<dyn Error>> {
/// let shape = LatticeShape::new(2, 2, 2);
/// let scalars = ScalarGrid::from_fn(shape, |_, _, z| z as Real - 0.5);
/// let field = VolumeField::without_normals(scalars)?;
/// let mesh = IndexedTriMesh::extract(&field, &ExtractionParams::default())?;
/// let text = mesh.to_stl_ascii("slab");
/// assert!(text.starts_with("solid slab"));
/// # Ok(())
/// # }
/// ```
pub fn to_stl_ascii<T: Triangulated3D + ?Sized>(shape: &T, name: &str) -> String {
    let mut out = String::new();
    out.push_str(&format!("solid {name}\n"));

    shape.visit_triangles(|tri, n| {
        out.push_str(&format!(
            "  facet normal {:.6} {:.6} {:.6}\n",
            n.x, n.y, n.z
        ));
        out.push_str("    outer loop\n");
        for p in &tri {
            out.push_str(&format!(
                "      vertex {:.6} {:.6} {:.6}\n",
                p.x, p.y, p.z
            ));
        }
        out.push_str("    endloop\n");
        out.push_str("  endfacet\n");
    });

    out.push_str(&format!("endsolid {name}\n"));
    out
}

/// Export to BINARY STL (returns `Vec<u8>`)
///
/// The binary header carries no name, so `_name` is accepted only for
/// symmetry with [`to_stl_ascii`].
pub fn to_stl_binary<T: Triangulated3D + ?Sized>(
    shape: &T,
    _name: &str,
) -> std::io::Result<Vec<u8>> {
    use stl_io::{Normal, Triangle, Vertex, write_stl};

    let mut triangles = Vec::<Triangle>::new();

    shape.visit_triangles(|tri, n| {
        #[allow(clippy::unnecessary_cast)]
        {
            triangles.push(Triangle {
                normal: Normal::new([n.x as f32, n.y as f32, n.z as f32]),
                vertices: tri.map(|p| Vertex::new([p.x as f32, p.y as f32, p.z as f32])),
            });
        }
    });

    let mut cursor = Cursor::new(Vec::new());
    write_stl(&mut cursor, triangles.iter())?;
    Ok(cursor.into_inner())
}

impl IndexedTriMesh {
    pub fn to_stl_ascii(&self, name: &str) -> String {
        self::to_stl_ascii(self, name)
    }
    pub fn to_stl_binary(&self, name: &str) -> std::io::Result<Vec<u8>> {
        self::to_stl_binary(self, name)
    }
}
