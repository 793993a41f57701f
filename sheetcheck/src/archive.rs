//! Upload archive extraction
//!
//! An upload is a zip holding one raster (`.jpg` or `.tif`) and its sidecar
//! files. The whole archive is unpacked into a private scratch directory so
//! the sidecar can be found next to the raster. The directory is removed when
//! the returned [`ExtractedImage`] is dropped, whichever way validation ends.

use crate::mapped::MappedFile;
use sheetcheck_core::{dotted_extension, ArchiveError, ByteSource, ImageKind, ValidationError};
use std::fs::{self, File};
use std::io::{self, Cursor, Read, Seek};
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use tracing::debug;
use zip::ZipArchive;

const S_IFMT: u32 = 0o170000;
const S_IFLNK: u32 = 0o120000;

/// The single raster found in an upload, kept alive with its scratch directory
#[derive(Debug)]
pub struct ExtractedImage {
    path: PathBuf,
    scratch: TempDir,
}

impl ExtractedImage {
    /// Location of the raster inside the scratch directory
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Root of the scratch directory the archive was unpacked into
    pub fn scratch_dir(&self) -> &Path {
        self.scratch.path()
    }

    /// File name of the raster, without any archive folders
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    pub fn kind(&self) -> Option<ImageKind> {
        ImageKind::from_path(&self.path)
    }

    /// Extension as written in the archive, with its leading dot
    pub fn extension(&self) -> String {
        dotted_extension(&self.path)
    }
}

/// Raster member test: known extension and not a hidden file
fn is_image_member(path: &Path) -> bool {
    let hidden = path
        .file_name()
        .and_then(|name| name.to_str())
        .map_or(true, |name| name.starts_with('.'));
    !hidden && ImageKind::from_path(path).is_some()
}

fn corrupt(err: zip::result::ZipError) -> ArchiveError {
    ArchiveError::CorruptArchive {
        reason: err.to_string(),
    }
}

/// Unpacks uploads into scratch directories
#[derive(Debug, Clone, Default)]
pub struct ArchiveExtractor {
    scratch_root: Option<PathBuf>,
}

impl ArchiveExtractor {
    /// Extract into directories under the system temp dir
    pub fn new() -> Self {
        Self::default()
    }

    /// Extract into directories under `root` instead of the system temp dir
    pub fn with_scratch_root(root: impl Into<PathBuf>) -> Self {
        Self {
            scratch_root: Some(root.into()),
        }
    }

    fn scratch_dir(&self) -> Result<TempDir, ArchiveError> {
        let mut builder = tempfile::Builder::new();
        builder.prefix("sheetcheck-");
        match &self.scratch_root {
            Some(root) => builder.tempdir_in(root),
            None => builder.tempdir(),
        }
        .map_err(|err| ArchiveError::Extraction {
            reason: err.to_string(),
        })
    }

    /// Map an archive from disk and extract it
    pub fn extract_file(&self, archive: &Path) -> Result<ExtractedImage, ValidationError> {
        let mapped = MappedFile::open(archive)?;
        Ok(self.extract_bytes(mapped.as_slice())?)
    }

    /// Extract an in-memory archive and locate its single raster
    pub fn extract_bytes(&self, bytes: &[u8]) -> Result<ExtractedImage, ArchiveError> {
        let mut archive = ZipArchive::new(Cursor::new(bytes)).map_err(corrupt)?;
        let scratch = self.scratch_dir()?;
        let mut images = unpack(&mut archive, scratch.path())?;
        debug!(
            entries = archive.len(),
            dir = %scratch.path().display(),
            "extracted archive"
        );

        match images.len() {
            0 => Err(ArchiveError::NoImageFound),
            1 => {
                let path = images.remove(0);
                debug!(image = %path.display(), "found raster member");
                Ok(ExtractedImage { path, scratch })
            }
            count => Err(ArchiveError::MultipleImagesFound { count }),
        }
    }
}

fn is_symlink(mode: Option<u32>) -> bool {
    mode.is_some_and(|mode| mode & S_IFMT == S_IFLNK)
}

fn extraction(err: std::io::Error) -> ArchiveError {
    ArchiveError::Extraction {
        reason: err.to_string(),
    }
}

/// Write every regular member under `root`, returning the raster paths
///
/// Symlink members and names escaping `root` are skipped, so nothing written
/// here points outside the scratch directory.
fn unpack<R: Read + Seek>(
    archive: &mut ZipArchive<R>,
    root: &Path,
) -> Result<Vec<PathBuf>, ArchiveError> {
    let mut images = Vec::new();
    for index in 0..archive.len() {
        let mut entry = archive.by_index(index).map_err(corrupt)?;
        let Some(relative) = entry.enclosed_name() else {
            debug!(name = entry.name(), "skipping member outside archive root");
            continue;
        };
        let target = root.join(&relative);

        if entry.is_dir() {
            fs::create_dir_all(&target).map_err(extraction)?;
            continue;
        }
        if is_symlink(entry.unix_mode()) {
            debug!(name = entry.name(), "skipping symlink member");
            continue;
        }

        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent).map_err(extraction)?;
        }
        let mut out = File::create(&target).map_err(extraction)?;
        io::copy(&mut entry, &mut out).map_err(|err| ArchiveError::CorruptArchive {
            reason: err.to_string(),
        })?;

        if is_image_member(&relative) {
            images.push(target);
        }
    }
    Ok(images)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use zip::write::SimpleFileOptions;
    use zip::{CompressionMethod, ZipWriter};

    fn zip_of(entries: &[(&str, &str)]) -> Vec<u8> {
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        let options = SimpleFileOptions::default().compression_method(CompressionMethod::Stored);
        for (name, data) in entries {
            writer.start_file(*name, options).unwrap();
            writer.write_all(data.as_bytes()).unwrap();
        }
        writer.finish().unwrap().into_inner()
    }

    #[test]
    fn test_single_image() {
        let bytes = zip_of(&[("maps/sheet.jpg", "jpeg"), ("maps/sheet.jgw", "1\n")]);
        let image = ArchiveExtractor::new().extract_bytes(&bytes).unwrap();
        assert_eq!(image.file_name(), "sheet.jpg");
        assert_eq!(image.kind(), Some(ImageKind::Jpeg));
        assert!(image.path().is_file());
        assert!(image.path().with_extension("jgw").is_file());
    }

    #[test]
    fn test_case_insensitive_and_hidden() {
        let bytes = zip_of(&[
            ("SHEET.TIF", "tiff"),
            (".preview.jpg", "jpeg"),
            ("__MACOSX/._SHEET.TIF", "resource fork"),
            ("notes.txt", "hello"),
        ]);
        let image = ArchiveExtractor::new().extract_bytes(&bytes).unwrap();
        assert_eq!(image.file_name(), "SHEET.TIF");
        assert_eq!(image.kind(), Some(ImageKind::Tiff));
        assert_eq!(image.extension(), ".TIF");
    }

    #[test]
    fn test_no_image() {
        let bytes = zip_of(&[("sheet.png", "png"), ("sheet.jgw", "1\n")]);
        assert_eq!(
            ArchiveExtractor::new().extract_bytes(&bytes).err(),
            Some(ArchiveError::NoImageFound)
        );
    }

    #[test]
    fn test_multiple_images() {
        let bytes = zip_of(&[("a.jpg", "a"), ("b.jpg", "b")]);
        assert_eq!(
            ArchiveExtractor::new().extract_bytes(&bytes).err(),
            Some(ArchiveError::MultipleImagesFound { count: 2 })
        );
    }

    #[test]
    fn test_corrupt_archive() {
        let err = ArchiveExtractor::new()
            .extract_bytes(b"definitely not a zip")
            .err()
            .unwrap();
        assert!(matches!(err, ArchiveError::CorruptArchive { .. }));
        assert_eq!(err.to_string(), "Invalid ZIP file");
    }

    #[test]
    fn test_symlink_members_not_written() {
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        let options = SimpleFileOptions::default().compression_method(CompressionMethod::Stored);
        writer.start_file("sheet.jpg", options).unwrap();
        writer.write_all(b"jpeg").unwrap();
        writer.add_symlink("sheet.jgw", "/etc/hostname", options).unwrap();
        writer.add_symlink("decoy.jpg", "/etc/hostname", options).unwrap();
        let bytes = writer.finish().unwrap().into_inner();

        let image = ArchiveExtractor::new().extract_bytes(&bytes).unwrap();
        assert_eq!(image.file_name(), "sheet.jpg");
        assert!(image.path().is_file());
        assert!(fs::symlink_metadata(image.scratch_dir().join("sheet.jgw")).is_err());
        assert!(fs::symlink_metadata(image.scratch_dir().join("decoy.jpg")).is_err());
    }

    #[test]
    fn test_symlink_mode() {
        assert!(is_symlink(Some(0o120777)));
        assert!(!is_symlink(Some(0o100644)));
        assert!(!is_symlink(None));
    }

    #[test]
    fn test_scratch_dir_removed_on_drop() {
        let root = tempfile::tempdir().unwrap();
        let extractor = ArchiveExtractor::with_scratch_root(root.path());

        let bytes = zip_of(&[("sheet.jpg", "jpeg")]);
        let image = extractor.extract_bytes(&bytes).unwrap();
        let scratch = image.scratch_dir().to_path_buf();
        assert!(scratch.starts_with(root.path()));
        assert!(scratch.is_dir());
        drop(image);
        assert!(!scratch.exists());

        // failures clean up too
        let bytes = zip_of(&[("a.jpg", "a"), ("b.jpg", "b")]);
        assert!(extractor.extract_bytes(&bytes).is_err());
        assert_eq!(std::fs::read_dir(root.path()).unwrap().count(), 0);
    }
}
