//! Map sheet upload validation
//!
//! [`Validator::validate`] runs every check on one upload and folds the
//! outcome into a [`ValidationResult`]. Steps run in order and the first
//! failure ends the run:
//!
//! 1. parse the submitted filename into seam id and sheet number
//! 2. unpack the archive and find its single raster
//! 3. TIFF rasters are accepted with a warning (their georeferencing is not
//!    checked yet); JPEG rasters go on to steps 4-7
//! 4. read the world file and reject a transform left at the origin
//! 5. read the pixel size from the JPEG header
//! 6. derive the sheet number from the georeferencing and compare
//! 7. require the image footprint to cover the (shrunk) nominal sheet

use crate::archive::{ArchiveExtractor, ExtractedImage};
use crate::{raster, sidecar};
use rayon::prelude::*;
use sheetcheck_core::format::constants::{DEFAULT_SHRINK_M, ORIGIN_GUARD_M};
use sheetcheck_core::{
    image_bounds, parse_filename, sheet_bounds, sheet_number_from_coords, GeoreferencingError,
    ImageKind, SheetNumber, ValidationError, ValidationResult,
};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Warning attached to accepted TIFF uploads
pub const TIFF_WARNING: &str =
    "TIF file validation not yet implemented. Upload will proceed but may fail during processing.";

/// Tunables for a [`Validator`]
#[derive(Debug, Clone)]
pub struct ValidatorConfig {
    /// Inward margin applied to the nominal sheet before the coverage check
    pub shrink_meters: f64,
    /// Transforms with |c| and |f| both below this are treated as unset
    pub origin_guard_meters: f64,
    /// Where scratch directories are created; system temp dir when unset
    pub scratch_dir: Option<PathBuf>,
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            shrink_meters: DEFAULT_SHRINK_M,
            origin_guard_meters: ORIGIN_GUARD_M,
            scratch_dir: None,
        }
    }
}

impl ValidatorConfig {
    /// Set the sheet shrink margin in meters
    pub fn with_shrink_meters(mut self, meters: f64) -> Self {
        self.shrink_meters = meters;
        self
    }

    /// Set the near-origin guard in meters
    pub fn with_origin_guard_meters(mut self, meters: f64) -> Self {
        self.origin_guard_meters = meters;
        self
    }

    /// Create scratch directories under `dir`
    pub fn with_scratch_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.scratch_dir = Some(dir.into());
        self
    }
}

/// One upload to validate
#[derive(Debug, Clone)]
pub struct Upload {
    pub archive: PathBuf,
    /// Name as submitted; the archive's own file name is used when absent
    pub original_filename: Option<String>,
}

impl Upload {
    pub fn new(archive: impl Into<PathBuf>, original_filename: Option<String>) -> Self {
        Self {
            archive: archive.into(),
            original_filename,
        }
    }
}

/// Stateless validator; every call gets its own scratch directory
#[derive(Debug, Clone, Default)]
pub struct Validator {
    config: ValidatorConfig,
    extractor: ArchiveExtractor,
}

impl Validator {
    pub fn new(config: ValidatorConfig) -> Self {
        let extractor = match &config.scratch_dir {
            Some(dir) => ArchiveExtractor::with_scratch_root(dir),
            None => ArchiveExtractor::new(),
        };
        Self { config, extractor }
    }

    pub fn config(&self) -> &ValidatorConfig {
        &self.config
    }

    /// Validate one archive
    ///
    /// `original_filename` is the name the file was submitted under. The
    /// archive may sit on disk under a temporary name, so the grammar is
    /// checked against the submitted name when one is given.
    pub fn validate(&self, archive: &Path, original_filename: Option<&str>) -> ValidationResult {
        let archive_name = archive
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        let filename = original_filename.unwrap_or(&archive_name);

        let mut result = ValidationResult::default();
        match self.check(archive, filename, &mut result) {
            Ok(()) => {
                info!(filename, warning = result.warning.is_some(), "upload accepted");
                result.accept();
            }
            Err(err) => {
                warn!(filename, category = %err.category(), error = %err, "upload rejected");
                result.reject(&err);
            }
        }
        result
    }

    /// Run the checks, recording sheet numbers and warnings in `result` as they become known
    pub fn check(
        &self,
        archive: &Path,
        filename: &str,
        result: &mut ValidationResult,
    ) -> Result<(), ValidationError> {
        let components = parse_filename(filename)?;
        debug!(
            seam_id = %components.seam_id,
            sheet_number = %components.sheet_number,
            "parsed filename"
        );
        result.filename_sheet_number = Some(components.sheet_number.to_string());

        let image = self.extractor.extract_file(archive)?;
        match image.kind() {
            Some(ImageKind::Tiff) => {
                warn!(image = %image.file_name(), "TIFF georeferencing is not checked");
                result.warning = Some(TIFF_WARNING.to_string());
                Ok(())
            }
            Some(ImageKind::Jpeg) => self.check_jpeg(&image, &components.sheet_number, result),
            None => Err(ValidationError::UnsupportedImage {
                extension: image.extension(),
            }),
        }
    }

    fn check_jpeg(
        &self,
        image: &ExtractedImage,
        filename_sheet: &SheetNumber,
        result: &mut ValidationResult,
    ) -> Result<(), ValidationError> {
        let transform = sidecar::read_world_file(image.path())?;
        if transform.is_near_origin(self.config.origin_guard_meters) {
            return Err(GeoreferencingError::NearOrigin.into());
        }

        let dims = raster::read_dimensions(image.path())?;
        debug!(width = dims.width, height = dims.height, "read image size");

        let actual_sheet = sheet_number_from_coords(dims, &transform);
        result.actual_sheet_number = Some(actual_sheet.clone());
        if filename_sheet.as_str() != actual_sheet {
            return Err(ValidationError::SheetMismatch {
                image_name: image.file_name(),
                filename_sheet: filename_sheet.to_string(),
                actual_sheet,
            });
        }

        let expected = sheet_bounds(filename_sheet, self.config.shrink_meters);
        let footprint = image_bounds(dims, &transform);
        if !footprint.contains(&expected) {
            return Err(ValidationError::BoundsNotCovered {
                sheet_number: filename_sheet.to_string(),
                image: footprint,
                expected,
            });
        }
        Ok(())
    }

    /// Validate many uploads in parallel, results in input order
    pub fn validate_all(&self, uploads: &[Upload]) -> Vec<ValidationResult> {
        uploads
            .par_iter()
            .map(|upload| self.validate(&upload.archive, upload.original_filename.as_deref()))
            .collect()
    }
}
