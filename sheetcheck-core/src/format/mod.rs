//! Sidecar and raster header formats
//!
//! Pure parsers over text and byte slices. Locating and reading the files is
//! left to the caller.

pub mod constants;
pub mod jpeg;
pub mod world_file;

use std::path::Path;

pub use jpeg::{scan_jpeg_dimensions, ImageDimensions};
pub use world_file::parse_world_file;

/// Raster types an upload may carry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImageKind {
    Jpeg,
    Tiff,
}

impl ImageKind {
    /// Match a file extension, ignoring case
    pub fn from_extension(extension: &str) -> Option<Self> {
        if extension.eq_ignore_ascii_case("jpg") {
            Some(ImageKind::Jpeg)
        } else if extension.eq_ignore_ascii_case("tif") {
            Some(ImageKind::Tiff)
        } else {
            None
        }
    }

    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(Self::from_extension)
    }
}

/// Extension of `path` as written, with its leading dot; empty when there is none
pub fn dotted_extension(path: &Path) -> String {
    path.extension()
        .map(|ext| format!(".{}", ext.to_string_lossy()))
        .unwrap_or_default()
}
