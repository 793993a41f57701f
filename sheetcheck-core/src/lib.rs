//! sheetcheck core - map sheet naming and georeferencing rules
//!
//! This crate holds the pure parts of map sheet upload validation: the
//! filename grammar, world file and JPEG header parsers, sheet geometry and
//! the error taxonomy. Nothing here touches the filesystem.

pub mod error;
pub mod format;
pub mod geometry;
pub mod result;
pub mod traits;
pub mod validation;

pub use error::*;
pub use format::{
    dotted_extension, parse_world_file, scan_jpeg_dimensions, ImageDimensions, ImageKind,
};
pub use geometry::{
    image_bounds, sheet_bounds, sheet_number_from_coords, AffineTransform, GeoBounds, WholeMeters,
};
pub use result::ValidationResult;
pub use traits::ByteSource;
pub use validation::{parse_filename, FilenameComponents, InvalidSheetNumber, SheetNumber};
