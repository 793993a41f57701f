//! Byte access abstraction for header scanning

/// Anything that can expose its contents as one contiguous byte slice
///
/// Memory-mapped files, in-memory buffers and test fixtures all qualify. The
/// header scanners only ever look at a prefix of the slice.
pub trait ByteSource {
    /// Get a slice of the underlying data
    fn as_slice(&self) -> &[u8];

    /// Get the size of the data in bytes
    fn size(&self) -> usize {
        self.as_slice().len()
    }
}

impl ByteSource for [u8] {
    fn as_slice(&self) -> &[u8] {
        self
    }
}

impl ByteSource for Vec<u8> {
    fn as_slice(&self) -> &[u8] {
        self
    }
}
