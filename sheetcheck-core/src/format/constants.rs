//! Format constants for map sheet uploads

/// Separator between seam id and sheet number in upload filenames
pub const SEPARATOR: char = '_';

/// Number of digits in a sheet number
pub const SHEET_NUMBER_LEN: usize = 6;

/// Sheet extent along x, in meters
pub const SHEET_WIDTH_M: f64 = 2000.0;

/// Sheet extent along y, in meters
pub const SHEET_HEIGHT_M: f64 = 1000.0;

/// Grid step that sheet corners snap to, in meters
pub const SHEET_GRID_M: f64 = 1000.0;

/// Inward margin applied to the nominal sheet before the containment check
pub const DEFAULT_SHRINK_M: f64 = 2.0;

/// Transforms whose c and f both fall inside (-guard, guard) are treated as unset
pub const ORIGIN_GUARD_M: f64 = 5.0;

/// World file constants
pub mod world_file {
    /// Sidecar extensions, in lookup order
    pub const EXTENSIONS: [&str; 2] = ["jgwx", "jgw"];

    /// Number of coefficient lines
    pub const LINE_COUNT: usize = 6;
}

/// JPEG marker constants
pub mod jpeg {
    /// Start-of-image marker
    pub const SOI: [u8; 2] = [0xFF, 0xD8];

    /// First byte of every marker
    pub const MARKER_PREFIX: u8 = 0xFF;

    /// Baseline, extended sequential and progressive start-of-frame markers
    pub const SOF_MARKERS: [u8; 3] = [0xC0, 0xC1, 0xC2];

    /// Segment length (2) plus sample precision (1) preceding the frame size
    pub const SOF_PREAMBLE_LEN: usize = 3;
}
