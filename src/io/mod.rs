//! Mesh export backends.

mod ply;

#[cfg(feature = "stl-io")]
mod stl;

pub use ply::write_ply;

#[cfg(feature = "stl-io")]
pub use stl::{to_stl_ascii, to_stl_binary};

/// Failures while writing an assembled mesh out.
#[derive(Debug)]
pub enum IoError {
    StdIo(std::io::Error),

    /// The output path cannot name a file.
    MalformedPath(String),
}

impl std::fmt::Display for IoError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        use IoError::*;

        match self {
            StdIo(error) => write!(f, "std::io::Error: {error}"),

            MalformedPath(msg) => write!(f, "The path is malformed: {msg}"),
        }
    }
}

impl std::error::Error for IoError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            IoError::StdIo(error) => Some(error),
            _ => None,
        }
    }
}

impl From<std::io::Error> for IoError {
    fn from(value: std::io::Error) -> Self {
        Self::StdIo(value)
    }
}
