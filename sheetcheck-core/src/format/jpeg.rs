//! JPEG frame-size scanning
//!
//! Walks the marker segments at the front of a JPEG stream until it reaches a
//! start-of-frame segment and reads the frame size from it. Entropy-coded data
//! is never touched.

use super::constants::jpeg::{MARKER_PREFIX, SOF_MARKERS, SOF_PREAMBLE_LEN, SOI};
use crate::ImageFormatError;

/// Pixel size of a raster
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ImageDimensions {
    pub width: u32,
    pub height: u32,
}

impl ImageDimensions {
    /// Both sides must be non-zero
    pub fn new(width: u32, height: u32) -> Option<Self> {
        (width > 0 && height > 0).then_some(Self { width, height })
    }
}

/// Forward-only reader over a byte slice
struct ByteCursor<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> ByteCursor<'a> {
    fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    fn take(&mut self, len: usize) -> Option<&'a [u8]> {
        let end = self.pos.checked_add(len)?;
        let bytes = self.data.get(self.pos..end)?;
        self.pos = end;
        Some(bytes)
    }

    fn read_u16_be(&mut self) -> Option<u16> {
        self.take(2).map(|b| u16::from_be_bytes([b[0], b[1]]))
    }

    /// Skipping past the end is allowed; the next read reports truncation
    fn skip(&mut self, len: usize) {
        self.pos = self.pos.saturating_add(len);
    }
}

/// Read width and height from the first start-of-frame segment
pub fn scan_jpeg_dimensions(data: &[u8]) -> Result<ImageDimensions, ImageFormatError> {
    let mut cursor = ByteCursor::new(data);

    if cursor.take(2) != Some(&SOI[..]) {
        return Err(ImageFormatError::NotAJpeg);
    }

    loop {
        let marker = cursor.take(2).ok_or(ImageFormatError::TruncatedFile)?;
        if marker[0] != MARKER_PREFIX {
            return Err(ImageFormatError::InvalidMarker(marker[0]));
        }

        if SOF_MARKERS.contains(&marker[1]) {
            cursor.skip(SOF_PREAMBLE_LEN);
            let height = cursor.read_u16_be().ok_or(ImageFormatError::TruncatedFile)?;
            let width = cursor.read_u16_be().ok_or(ImageFormatError::TruncatedFile)?;
            return ImageDimensions::new(u32::from(width), u32::from(height))
                .ok_or(ImageFormatError::ZeroDimensions);
        }

        let length = cursor.read_u16_be().ok_or(ImageFormatError::TruncatedFile)?;
        if length < 2 {
            return Err(ImageFormatError::InvalidSegmentLength(length));
        }
        cursor.skip(usize::from(length - 2));
    }
}
