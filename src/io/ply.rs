//! ASCII PLY export.
//!
//! ```text
//! ply
//! format ascii 1.0
//! element vertex N
//! property float x
//! property float y
//! property float z
//! element face M
//! property list uchar int vertex_indices
//! end_header
//! x y z            (N lines)
//! 3 i j k          (M lines)
//! ```

use super::IoError;
use crate::mesh::IndexedTriMesh;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Write `mesh` as ASCII PLY to `writer`.
pub fn write_ply<W: Write>(mesh: &IndexedTriMesh, mut writer: W) -> Result<(), IoError> {
    writer.write_all(mesh.to_ply_ascii().as_bytes())?;
    writer.flush()?;
    Ok(())
}

impl IndexedTriMesh {
    /// ASCII PLY text of this mesh.
    pub fn to_ply_ascii(&self) -> String {
        let mut out = String::new();
        out.push_str("ply\n");
        out.push_str("format ascii 1.0\n");
        out.push_str(&format!("element vertex {}\n", self.vertex_count()));
        out.push_str("property float x\n");
        out.push_str("property float y\n");
        out.push_str("property float z\n");
        out.push_str(&format!("element face {}\n", self.face_count()));
        out.push_str("property list uchar int vertex_indices\n");
        out.push_str("end_header\n");

        for v in &self.vertices {
            out.push_str(&format!("{} {} {}\n", v.x, v.y, v.z));
        }
        for [a, b, c] in &self.faces {
            out.push_str(&format!("3 {a} {b} {c}\n"));
        }
        out
    }

    pub fn write_ply<W: Write>(&self, writer: W) -> Result<(), IoError> {
        write_ply(self, writer)
    }

    /// Write ASCII PLY to the file at `path`, creating or truncating it.
    pub fn write_ply_file<P: AsRef<Path>>(&self, path: P) -> Result<(), IoError> {
        let path = path.as_ref();
        if path.file_name().is_none() {
            return Err(IoError::MalformedPath(path.display().to_string()));
        }
        let file = File::create(path)?;
        write_ply(self, BufWriter::new(file))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Point3;

    fn two_faces() -> IndexedTriMesh {
        IndexedTriMesh {
            vertices: vec![
                Point3::new(0.0, 0.0, 0.5),
                Point3::new(1.0, 0.0, 0.5),
                Point3::new(0.0, 1.0, 0.5),
                Point3::new(1.0, 1.0, 0.5),
            ],
            faces: vec![[0, 1, 2], [3, 2, 1]],
        }
    }

    #[test]
    fn ply_layout() {
        let text = two_faces().to_ply_ascii();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            &lines[..9],
            &[
                "ply",
                "format ascii 1.0",
                "element vertex 4",
                "property float x",
                "property float y",
                "property float z",
                "element face 2",
                "property list uchar int vertex_indices",
                "end_header",
            ]
        );
        assert_eq!(lines[9], "0 0 0.5");
        assert_eq!(lines[12], "1 1 0.5");
        assert_eq!(lines[13], "3 0 1 2");
        assert_eq!(lines[14], "3 3 2 1");
        assert_eq!(lines.len(), 15);
    }

    #[test]
    fn empty_mesh_has_header_only() {
        let text = IndexedTriMesh::default().to_ply_ascii();
        assert!(text.contains("element vertex 0\n"));
        assert!(text.contains("element face 0\n"));
        assert!(text.ends_with("end_header\n"));
    }

    struct ClosedPipe;

    impl Write for ClosedPipe {
        fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
            Err(std::io::Error::new(std::io::ErrorKind::BrokenPipe, "closed"))
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn writer_failure_is_returned() {
        let err = two_faces().write_ply(ClosedPipe).unwrap_err();
        assert!(matches!(err, IoError::StdIo(ref e) if e.kind() == std::io::ErrorKind::BrokenPipe));
    }

    #[test]
    fn path_without_file_name_is_rejected() {
        let err = two_faces().write_ply_file("..").unwrap_err();
        assert!(matches!(err, IoError::MalformedPath(_)));
    }
}
