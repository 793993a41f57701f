//! Pixel dimensions of extracted rasters

use crate::mapped::MappedFile;
use sheetcheck_core::{
    dotted_extension, scan_jpeg_dimensions, ByteSource, ImageDimensions, ImageFormatError,
    ImageKind,
};
use std::path::Path;

/// Read a JPEG's frame size from its header
pub fn read_jpeg_dimensions(image_path: &Path) -> Result<ImageDimensions, ImageFormatError> {
    let mapped = MappedFile::open(image_path).map_err(|err| ImageFormatError::Unreadable {
        reason: err.to_string(),
    })?;
    scan_jpeg_dimensions(mapped.as_slice())
}

/// Read the pixel size of any supported raster
///
/// Only JPEG is implemented. TIFF and anything else report
/// [`ImageFormatError::UnsupportedFormat`].
pub fn read_dimensions(image_path: &Path) -> Result<ImageDimensions, ImageFormatError> {
    match ImageKind::from_path(image_path) {
        Some(ImageKind::Jpeg) => read_jpeg_dimensions(image_path),
        Some(ImageKind::Tiff) | None => Err(ImageFormatError::UnsupportedFormat {
            extension: dotted_extension(image_path),
        }),
    }
}
