//! Error types for map sheet validation
//!
//! Every failure the engine can report is a value of one of these enums. The
//! `Display` text is the message shown to whoever uploaded the file, so it
//! names the filename, sheet numbers or bounds involved.

use crate::geometry::GeoBounds;
use thiserror::Error;

/// Reasons a filename does not follow `[seamID]_[SheetNumber].zip`
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GrammarError {
    /// No `_` anywhere in the name
    #[error(
        "Invalid filename format: '{filename}'. Missing mandatory underscore separator. \
         Expected format: [seamID]_[SheetNumber].zip (e.g., '16516_433857.zip')"
    )]
    MissingSeparator { filename: String },

    /// Nothing (or only the separator) in front of the sheet number
    #[error(
        "Invalid filename format: '{filename}'. Missing mandatory seam ID before underscore. \
         Expected format: [seamID]_[SheetNumber].zip (e.g., '16516_433857.zip')"
    )]
    MissingSeamId { filename: String },

    /// Seam id contains something other than letters and digits
    #[error(
        "Invalid filename format: '{filename}'. Seam ID '{seam_id}' may only contain letters and digits. \
         Expected format: [seamID]_[SheetNumber].zip (e.g., '16516_433857.zip')"
    )]
    InvalidSeamId { filename: String, seam_id: String },

    #[error(
        "Invalid filename format: '{filename}'. No digits found in sheet number part. \
         Sheet number must be exactly 6 digits in format XXXXXX or XX_XXXX."
    )]
    NoDigits { filename: String },

    #[error(
        "Invalid filename format: '{filename}'. Sheet number must be exactly 6 digits, found {found} digits. \
         Expected format: [seamID]_[SheetNumber].zip (e.g., '16516_433857.zip' or '16516_43_3857.zip')"
    )]
    TooFewDigits { filename: String, found: usize },

    #[error(
        "Invalid filename format: '{filename}'. Sheet number must be exactly 6 digits, found {found} digits. \
         Expected format: [seamID]_[SheetNumber].zip (e.g., '16516_433857.zip' or '16516_43_3857.zip')"
    )]
    TooManyDigits { filename: String, found: usize },

    /// Six digits are present but not as `XXXXXX` or `XX_XXXX` after the seam id
    #[error(
        "Invalid filename format: '{filename}'. Sheet number format is incorrect. \
         Expected 6 digits immediately after the seam ID and underscore in format XXXXXX or XX_XXXX. \
         Valid examples: '16516_433857.zip' or '16516_43_3857.zip'"
    )]
    MisplacedSheetNumber { filename: String },
}

/// Problems opening the upload or finding its single raster member
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ArchiveError {
    #[error("Invalid ZIP file")]
    CorruptArchive { reason: String },

    /// The scratch directory could not be created or written
    #[error("Could not extract ZIP file: {reason}")]
    Extraction { reason: String },

    #[error("No image files (.jpg or .tif) found in ZIP")]
    NoImageFound,

    #[error("Found {count} image files in ZIP. Expected exactly 1.")]
    MultipleImagesFound { count: usize },
}

/// Problems with the world file sidecar or the transform it holds
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GeoreferencingError {
    #[error("No world file (.jgw or .jgwx) found for georeferencing")]
    MissingWorldFile,

    #[error("Invalid world file format")]
    InvalidWorldFile,

    /// Translation terms both sit within the origin guard, i.e. an unset transform
    #[error("Georeferencing transformation is invalid (coordinates near origin)")]
    NearOrigin,
}

/// Problems reading pixel dimensions from the raster header
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ImageFormatError {
    #[error("Not a valid JPEG file")]
    NotAJpeg,

    #[error("Unexpected end of JPEG file")]
    TruncatedFile,

    #[error("Invalid JPEG marker 0x{0:02X}")]
    InvalidMarker(u8),

    #[error("Invalid JPEG segment length {0}")]
    InvalidSegmentLength(u16),

    #[error("JPEG frame header declares a zero width or height")]
    ZeroDimensions,

    #[error("Cannot read dimensions for {extension} files without additional libraries")]
    UnsupportedFormat { extension: String },

    #[error("{reason}")]
    Unreadable { reason: String },
}

/// Coarse grouping of [`ValidationError`] variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    Grammar,
    Archive,
    Georeferencing,
    ImageFormat,
    SheetMismatch,
    Bounds,
    Io,
}

impl ErrorCategory {
    pub const fn as_str(self) -> &'static str {
        match self {
            ErrorCategory::Grammar => "grammar",
            ErrorCategory::Archive => "archive",
            ErrorCategory::Georeferencing => "georeferencing",
            ErrorCategory::ImageFormat => "image_format",
            ErrorCategory::SheetMismatch => "sheet_mismatch",
            ErrorCategory::Bounds => "bounds",
            ErrorCategory::Io => "io",
        }
    }
}

impl core::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Terminal failure of one validation call
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error(transparent)]
    Grammar(#[from] GrammarError),

    #[error(transparent)]
    Archive(#[from] ArchiveError),

    #[error(transparent)]
    Georeferencing(#[from] GeoreferencingError),

    #[error("Could not read image dimensions: {0}")]
    ImageFormat(#[from] ImageFormatError),

    /// Extracted image has an extension the engine has no branch for
    #[error("Unsupported image format: {extension}")]
    UnsupportedImage { extension: String },

    #[error(
        "Sheet number validation failed for '{image_name}': extracted sheet number '{filename_sheet}' \
         does not match the georeferenced area. The correct sheet number appears to be '{actual_sheet}'. \
         Please rename the file to include the correct sheet number."
    )]
    SheetMismatch {
        image_name: String,
        filename_sheet: String,
        actual_sheet: String,
    },

    #[error(
        "Image bounds do not contain expected map area for sheet {sheet_number}. \
         Image: {image}, Expected map: {}",
        .expected.whole_meters()
    )]
    BoundsNotCovered {
        sheet_number: String,
        image: GeoBounds,
        expected: GeoBounds,
    },

    #[error("Validation error: {0}")]
    Io(#[from] std::io::Error),
}

impl ValidationError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            ValidationError::Grammar(_) => ErrorCategory::Grammar,
            ValidationError::Archive(_) => ErrorCategory::Archive,
            ValidationError::Georeferencing(_) => ErrorCategory::Georeferencing,
            ValidationError::ImageFormat(_) | ValidationError::UnsupportedImage { .. } => {
                ErrorCategory::ImageFormat
            }
            ValidationError::SheetMismatch { .. } => ErrorCategory::SheetMismatch,
            ValidationError::BoundsNotCovered { .. } => ErrorCategory::Bounds,
            ValidationError::Io(_) => ErrorCategory::Io,
        }
    }
}

/// Result type for validation operations
pub type Result<T> = core::result::Result<T, ValidationError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_the_input() {
        let err = GrammarError::TooFewDigits {
            filename: "16519_45385_.zip".to_string(),
            found: 5,
        };
        let msg = err.to_string();
        assert!(msg.starts_with("Invalid filename format: '16519_45385_.zip'."));
        assert!(msg.contains("found 5 digits"));

        let err = ValidationError::SheetMismatch {
            image_name: "map.jpg".to_string(),
            filename_sheet: "123456".to_string(),
            actual_sheet: "123457".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("'map.jpg'"));
        assert!(msg.contains("'123456'"));
        assert!(msg.contains("'123457'"));
    }

    #[test]
    fn test_image_errors_are_prefixed() {
        let err = ValidationError::from(ImageFormatError::NotAJpeg);
        assert_eq!(
            err.to_string(),
            "Could not read image dimensions: Not a valid JPEG file"
        );
        assert_eq!(err.category(), ErrorCategory::ImageFormat);
    }

    #[test]
    fn test_categories() {
        assert_eq!(
            ValidationError::from(ArchiveError::NoImageFound).category(),
            ErrorCategory::Archive
        );
        assert_eq!(
            ValidationError::from(GeoreferencingError::NearOrigin).category(),
            ErrorCategory::Georeferencing
        );
        assert_eq!(ErrorCategory::SheetMismatch.to_string(), "sheet_mismatch");
    }
}
