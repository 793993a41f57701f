//! Naming rules for uploads
//!
//! Pure string checks with no I/O dependencies.

pub mod filename;

pub use filename::{parse_filename, FilenameComponents, InvalidSheetNumber, SheetNumber};
