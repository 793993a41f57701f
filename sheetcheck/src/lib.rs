//! sheetcheck - map sheet upload validation
//!
//! Checks that an uploaded zip holds exactly one georeferenced raster whose
//! world file places it on the sheet named in the upload's filename, and
//! that the raster covers that sheet.
//!
//! ## Architecture
//!
//! - **sheetcheck-core**: filename grammar, header parsers, sheet geometry
//!   and errors (no I/O)
//! - **sheetcheck**: archive extraction, file access, the validator and the
//!   intake gate
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use sheetcheck::{Validator, ValidatorConfig};
//! use std::path::Path;
//!
//! let validator = Validator::new(ValidatorConfig::default().with_shrink_meters(2.0));
//! let result = validator.validate(Path::new("/tmp/upload-5f2c.zip"), Some("16516_433857.zip"));
//! if !result.valid {
//!     eprintln!("rejected: {}", result.error.unwrap_or_default());
//! }
//! ```

pub use sheetcheck_core::{
    // Rules
    image_bounds, parse_filename, parse_world_file, scan_jpeg_dimensions, sheet_bounds,
    sheet_number_from_coords,
    // Types
    AffineTransform, FilenameComponents, GeoBounds, ImageDimensions, ImageKind, SheetNumber,
    ValidationResult,
    // Error handling
    ArchiveError, ErrorCategory, GeoreferencingError, GrammarError, ImageFormatError,
    ValidationError,
};

pub mod archive;
pub mod intake;
pub mod mapped;
pub mod raster;
pub mod sidecar;
pub mod validator;

pub use archive::{ArchiveExtractor, ExtractedImage};
pub use intake::{
    Admission, IntakeError, IntakeGate, IntakeRequest, MapStatus, MemoryStatusStore,
    StatusRecord, StatusStore,
};
pub use mapped::MappedFile;
pub use validator::{Upload, Validator, ValidatorConfig, TIFF_WARNING};
