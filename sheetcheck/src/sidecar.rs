//! World file lookup next to an extracted raster

use sheetcheck_core::format::constants::world_file::EXTENSIONS;
use sheetcheck_core::{parse_world_file, AffineTransform, GeoreferencingError};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// First existing sidecar for `image_path`, `.jgwx` preferred over `.jgw`
pub fn find_world_file(image_path: &Path) -> Option<PathBuf> {
    EXTENSIONS
        .iter()
        .map(|ext| image_path.with_extension(ext))
        .find(|candidate| candidate.is_file())
}

/// Read and parse the world file belonging to `image_path`
pub fn read_world_file(image_path: &Path) -> Result<AffineTransform, GeoreferencingError> {
    let world_file = find_world_file(image_path).ok_or(GeoreferencingError::MissingWorldFile)?;
    debug!(world_file = %world_file.display(), "reading georeferencing");

    let text =
        fs::read_to_string(&world_file).map_err(|_| GeoreferencingError::InvalidWorldFile)?;
    parse_world_file(&text)
}

#[cfg(test)]
mod tests {
    use super::*;

    const WORLD: &str = "100.0\n0.0\n0.0\n-100.0\n500000.0\n6000000.0\n";

    #[test]
    fn test_prefers_jgwx() {
        let dir = tempfile::tempdir().unwrap();
        let image = dir.path().join("sheet.jpg");
        fs::write(dir.path().join("sheet.jgw"), "1\n0\n0\n-1\n10\n20\n").unwrap();
        fs::write(dir.path().join("sheet.jgwx"), WORLD).unwrap();

        assert_eq!(find_world_file(&image), Some(dir.path().join("sheet.jgwx")));
        assert_eq!(
            read_world_file(&image),
            Ok(AffineTransform::new(100.0, 0.0, 0.0, -100.0, 500000.0, 6000000.0))
        );
    }

    #[test]
    fn test_falls_back_to_jgw() {
        let dir = tempfile::tempdir().unwrap();
        let image = dir.path().join("sheet.jpg");
        fs::write(dir.path().join("sheet.jgw"), WORLD).unwrap();
        assert_eq!(read_world_file(&image).map(|t| t.c), Ok(500000.0));
    }

    #[test]
    fn test_missing_and_invalid() {
        let dir = tempfile::tempdir().unwrap();
        let image = dir.path().join("sheet.jpg");
        assert_eq!(
            read_world_file(&image),
            Err(GeoreferencingError::MissingWorldFile)
        );

        fs::write(dir.path().join("sheet.jgw"), "1\n2\n3\n").unwrap();
        assert_eq!(
            read_world_file(&image),
            Err(GeoreferencingError::InvalidWorldFile)
        );

        // a sidecar that is not text
        fs::write(dir.path().join("sheet.jgw"), [0xFFu8, 0xFE, 0x00]).unwrap();
        assert_eq!(
            read_world_file(&image),
            Err(GeoreferencingError::InvalidWorldFile)
        );
    }
}
