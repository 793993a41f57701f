//! Upload filename grammar
//!
//! Filenames look like `[seamID]_[SheetNumber][suffix].zip`, for example
//! `16516_433857.zip` or `17836_26_9285_UpperHirst.zip`. The sheet number is
//! located first, as six digits written `XXXXXX` or `XX?XXXX` with any single
//! non-digit in the middle. Whatever precedes it must be the seam id followed
//! by `_`. Locating the number first lets seam ids carry digits and
//! underscores next to each other without confusing the split.

use crate::format::constants::{SEPARATOR, SHEET_NUMBER_LEN};
use crate::GrammarError;
use core::fmt;
use thiserror::Error;

/// Six ASCII digits identifying a 2000 m x 1000 m sheet
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "String", into = "String"))]
pub struct SheetNumber(String);

/// A string that is not six ASCII digits
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("sheet number must be exactly 6 ASCII digits, got '{0}'")]
pub struct InvalidSheetNumber(pub String);

impl SheetNumber {
    /// Accepts exactly six ASCII digits
    pub fn new(value: &str) -> Option<Self> {
        (value.len() == SHEET_NUMBER_LEN && value.bytes().all(|b| b.is_ascii_digit()))
            .then(|| Self(value.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Numeric value of each digit, leading zeros kept
    pub fn digits(&self) -> [u8; SHEET_NUMBER_LEN] {
        let mut digits = [0u8; SHEET_NUMBER_LEN];
        for (slot, c) in digits.iter_mut().zip(self.0.chars()) {
            *slot = c.to_digit(10).map_or(0, |d| d as u8);
        }
        digits
    }
}

impl TryFrom<String> for SheetNumber {
    type Error = InvalidSheetNumber;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(&value).ok_or(InvalidSheetNumber(value))
    }
}

impl From<SheetNumber> for String {
    fn from(sheet: SheetNumber) -> Self {
        sheet.0
    }
}

impl fmt::Display for SheetNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl PartialEq<str> for SheetNumber {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for SheetNumber {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// Seam id and sheet number pulled from an upload filename
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FilenameComponents {
    pub seam_id: String,
    pub sheet_number: SheetNumber,
}

/// Why the text in front of a sheet-number candidate is not a seam id
#[derive(Debug, Clone, PartialEq, Eq)]
enum SeamFailure {
    Empty,
    NotSeparated,
    NonAlphanumeric(String),
}

impl SeamFailure {
    fn into_error(self, filename: &str) -> GrammarError {
        let filename = filename.to_owned();
        match self {
            SeamFailure::Empty => GrammarError::MissingSeamId { filename },
            SeamFailure::NotSeparated => GrammarError::MisplacedSheetNumber { filename },
            SeamFailure::NonAlphanumeric(seam_id) => {
                GrammarError::InvalidSeamId { filename, seam_id }
            }
        }
    }
}

fn is_seam_id(s: &str) -> bool {
    s.chars().all(|c| c.is_ascii_alphanumeric())
}

/// Filename without its final extension
fn strip_extension(filename: &str) -> &str {
    filename
        .rsplit_once('.')
        .map_or(filename, |(stem, _)| stem)
}

/// First `n` bytes of `s` if they are all ASCII digits
fn take_digits(s: &str, n: usize) -> Option<&str> {
    let head = s.get(..n)?;
    head.bytes().all(|b| b.is_ascii_digit()).then_some(head)
}

/// Sheet number starting at byte `start`, if one does
///
/// The candidate must not continue a longer digit run on either side.
fn match_sheet_pattern(stem: &str, start: usize) -> Option<SheetNumber> {
    if start > 0 && stem.as_bytes()[start - 1].is_ascii_digit() {
        return None;
    }
    let rest = stem.get(start..)?;

    let (number, tail) = match take_digits(rest, SHEET_NUMBER_LEN) {
        Some(six) => (six.to_owned(), &rest[SHEET_NUMBER_LEN..]),
        None => {
            let head = take_digits(rest, 2)?;
            let middle = rest[2..].chars().next().filter(|c| !c.is_ascii_digit())?;
            let after = &rest[2 + middle.len_utf8()..];
            let body = take_digits(after, 4)?;
            (format!("{head}{body}"), &after[4..])
        }
    };

    if tail.bytes().next().is_some_and(|b| b.is_ascii_digit()) {
        return None;
    }
    SheetNumber::new(&number)
}

/// Seam id in front of a candidate, with its trailing separator removed
fn check_seam_segment(segment: &str) -> Result<&str, SeamFailure> {
    let Some(seam) = segment.strip_suffix(SEPARATOR) else {
        return Err(if segment.is_empty() {
            SeamFailure::Empty
        } else {
            SeamFailure::NotSeparated
        });
    };
    if seam.is_empty() {
        Err(SeamFailure::Empty)
    } else if !is_seam_id(seam) {
        Err(SeamFailure::NonAlphanumeric(seam.to_owned()))
    } else {
        Ok(seam)
    }
}

/// Explain a name with a separator but no sheet-number candidate at all
fn diagnose_unmatched(filename: &str, stem: &str) -> GrammarError {
    let filename_owned = filename.to_owned();
    let (head, tail) = stem.split_once(SEPARATOR).unwrap_or((stem, ""));

    if head.is_empty() {
        return GrammarError::MissingSeamId {
            filename: filename_owned,
        };
    }
    if !is_seam_id(head) {
        return GrammarError::InvalidSeamId {
            filename: filename_owned,
            seam_id: head.to_owned(),
        };
    }

    let found = tail.bytes().filter(u8::is_ascii_digit).count();
    match found {
        0 => GrammarError::NoDigits {
            filename: filename_owned,
        },
        n if n < SHEET_NUMBER_LEN => GrammarError::TooFewDigits {
            filename: filename_owned,
            found: n,
        },
        n if n > SHEET_NUMBER_LEN => GrammarError::TooManyDigits {
            filename: filename_owned,
            found: n,
        },
        _ => GrammarError::MisplacedSheetNumber {
            filename: filename_owned,
        },
    }
}

/// Split an upload filename into seam id and sheet number
///
/// Candidates are tried left to right and the first one preceded by a valid
/// `seamID_` wins. When none qualifies, the error describes the first
/// candidate's problem, or the digit count when there is no candidate.
pub fn parse_filename(filename: &str) -> Result<FilenameComponents, GrammarError> {
    let stem = strip_extension(filename);
    if !stem.contains(SEPARATOR) {
        return Err(GrammarError::MissingSeparator {
            filename: filename.to_owned(),
        });
    }

    let mut first_failure = None;
    for (start, byte) in stem.bytes().enumerate() {
        if !byte.is_ascii_digit() {
            continue;
        }
        let Some(sheet_number) = match_sheet_pattern(stem, start) else {
            continue;
        };
        match check_seam_segment(&stem[..start]) {
            Ok(seam_id) => {
                return Ok(FilenameComponents {
                    seam_id: seam_id.to_owned(),
                    sheet_number,
                })
            }
            Err(failure) => {
                first_failure.get_or_insert(failure);
            }
        }
    }

    Err(match first_failure {
        Some(failure) => failure.into_error(filename),
        None => diagnose_unmatched(filename, stem),
    })
}
