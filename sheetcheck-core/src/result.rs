//! Outcome of one validation call

use crate::ValidationError;

/// Flat, serializable validation outcome
///
/// Sheet numbers are filled in as soon as they are known, so a failed
/// result still shows how far validation got.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ValidationResult {
    pub valid: bool,
    pub error: Option<String>,
    pub filename_sheet_number: Option<String>,
    pub actual_sheet_number: Option<String>,
    pub warning: Option<String>,
}

impl ValidationResult {
    /// Mark the result as accepted
    pub fn accept(&mut self) {
        self.valid = true;
        self.error = None;
    }

    /// Mark the result as rejected with the error's message
    pub fn reject(&mut self, error: &ValidationError) {
        self.valid = false;
        self.error = Some(error.to_string());
    }

    pub fn is_valid(&self) -> bool {
        self.valid
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ArchiveError;

    #[test]
    fn test_accept_and_reject() {
        let mut result = ValidationResult {
            filename_sheet_number: Some("269285".to_string()),
            ..Default::default()
        };
        result.reject(&ValidationError::from(ArchiveError::NoImageFound));
        assert!(!result.is_valid());
        assert_eq!(
            result.error.as_deref(),
            Some("No image files (.jpg or .tif) found in ZIP")
        );
        assert_eq!(result.filename_sheet_number.as_deref(), Some("269285"));

        result.accept();
        assert!(result.valid);
        assert_eq!(result.error, None);
    }
}
