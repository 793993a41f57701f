//! Read-only memory-mapped files
//!
//! Archives and rasters are mapped instead of read so that header scans only
//! fault in the pages they touch.

use memmap2::{Mmap, MmapOptions};
use sheetcheck_core::ByteSource;
use std::{fs::File, io, path::Path};

/// A whole file mapped into memory
///
/// Zero-length files are not mapped (mapping them fails on some platforms)
/// and read as an empty slice.
pub struct MappedFile {
    map: Option<Mmap>,
}

impl MappedFile {
    pub fn open<P: AsRef<Path>>(path: P) -> io::Result<Self> {
        let file = File::open(path.as_ref())?;
        if file.metadata()?.len() == 0 {
            return Ok(Self { map: None });
        }

        // SAFETY: the map is read-only and private to this value. Uploads are
        // written once before validation starts and are not modified while
        // the mapping is alive.
        let map = unsafe { MmapOptions::new().map(&file)? };
        Ok(Self { map: Some(map) })
    }
}

impl ByteSource for MappedFile {
    fn as_slice(&self) -> &[u8] {
        self.map.as_deref().unwrap_or(&[])
    }
}
