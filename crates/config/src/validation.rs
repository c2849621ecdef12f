//! Validation for configuration values
//!
//! Each config section implements [`ConfigSection`]; [`Validator`] holds the
//! shared field checks.

pub use crate::error::ValidationError;
use std::path::Path;

/// A config section that can validate and merge itself
pub trait ConfigSection: Default {
    /// Returns every problem found. Empty means valid.
    fn validate(&self) -> Result<(), Vec<ValidationError>>;

    /// Merges another section into this one; values from `other` win
    fn merge(&mut self, other: Self);

    /// Returns the section name for error reporting
    fn section_name(&self) -> &'static str;
}

/// Common validators for config values
pub struct Validator;

impl Validator {
    /// Validates that a numeric value is within a range
    pub fn in_range<T>(value: T, min: T, max: T, field: &str) -> Result<(), ValidationError>
    where
        T: PartialOrd + std::fmt::Display + Copy,
    {
        if value < min || value > max {
            Err(ValidationError::with_value(
                field,
                format!("must be between {} and {}", min, max),
                value,
            ))
        } else {
            Ok(())
        }
    }

    pub fn path_exists(path: &Path, field: &str) -> Result<(), ValidationError> {
        if !path.exists() {
            Err(ValidationError::with_value(
                field,
                "path does not exist",
                path.display(),
            ))
        } else {
            Ok(())
        }
    }

    pub fn not_empty(value: &str, field: &str) -> Result<(), ValidationError> {
        if value.trim().is_empty() {
            Err(ValidationError::new(field, "must not be empty"))
        } else {
            Ok(())
        }
    }

    /// Validates an absolute http(s) URL; empty passes
    pub fn http_url(value: &str, field: &str) -> Result<(), ValidationError> {
        if value.is_empty() || value.starts_with("https://") || value.starts_with("http://") {
            Ok(())
        } else {
            Err(ValidationError::with_value(
                field,
                "must start with http:// or https://",
                value,
            ))
        }
    }

    /// Collects multiple validation results into a single result
    pub fn collect_errors(
        results: Vec<Result<(), ValidationError>>,
    ) -> Result<(), Vec<ValidationError>> {
        let errors: Vec<ValidationError> = results.into_iter().filter_map(|r| r.err()).collect();

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}
