//! Error types for story validation
//!
//! - [`ValidationError`]: one path-addressed violation with a stable code
//! - [`ValidationResult`]: either a normalized value or a non-empty error list
//! - [`ConfigError`]: loading a [`crate::ValidationConfig`]

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Stable failure class; callers branch on this, never on message text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorCode {
    /// Wrong JSON kind, missing required field, or non-integer where an integer is required
    #[serde(rename = "invalid_type")]
    InvalidType,
    /// Below a minimum length, count, or value
    #[serde(rename = "too_small")]
    TooSmall,
    /// Above a maximum length, count, or value
    #[serde(rename = "too_big")]
    TooBig,
    /// Domain rule that is not a plain type or bound check
    #[serde(rename = "custom")]
    Custom,
    /// Chapter without an image description
    #[serde(rename = "MISSING_IMAGE_DESCRIPTION")]
    MissingImageDescription,
    /// Unexpected failure inside the validation machinery
    #[serde(rename = "UNKNOWN_ERROR")]
    UnknownError,
    /// Trait update normalization was given a non-array
    #[serde(rename = "NORMALIZATION_ERROR")]
    NormalizationError,
}

impl ErrorCode {
    /// Wire representation
    #[inline]
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::InvalidType => "invalid_type",
            Self::TooSmall => "too_small",
            Self::TooBig => "too_big",
            Self::Custom => "custom",
            Self::MissingImageDescription => "MISSING_IMAGE_DESCRIPTION",
            Self::UnknownError => "UNKNOWN_ERROR",
            Self::NormalizationError => "NORMALIZATION_ERROR",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single violated constraint
///
/// `path` is the field-access chain from the validated root, array indices
/// rendered as decimal strings: `["chapters", "2", "imageDescription"]`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, thiserror::Error)]
#[error("{code} at '{}': {message}", .path.join("."))]
pub struct ValidationError {
    /// Field path from the root
    pub path: Vec<String>,
    /// Human-readable description
    pub message: String,
    /// Failure class
    pub code: ErrorCode,
}

impl ValidationError {
    /// Create error at path
    pub fn new(path: Vec<String>, code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            path,
            message: message.into(),
            code,
        }
    }

    /// Create error from borrowed path segments
    pub fn at(path: &[&str], code: ErrorCode, message: impl Into<String>) -> Self {
        Self::new(path.iter().map(|s| (*s).to_string()).collect(), code, message)
    }

    /// Wrap an unexpected failure
    pub fn unknown(message: impl Into<String>) -> Self {
        Self::new(Vec::new(), ErrorCode::UnknownError, message)
    }

    /// Wrap a normalization entry-point failure
    pub fn normalization(err: &tale_traits::NormalizationError) -> Self {
        Self::new(Vec::new(), ErrorCode::NormalizationError, err.to_string())
    }

    /// Missing image description for chapter `index`
    #[must_use]
    pub fn missing_image_description(index: usize) -> Self {
        Self::new(
            vec!["chapters".into(), index.to_string(), "imageDescription".into()],
            ErrorCode::MissingImageDescription,
            format!("Chapter {} is missing an image description", index + 1),
        )
    }

    /// First path segment, if any
    #[inline]
    #[must_use]
    pub fn root(&self) -> Option<&str> {
        self.path.first().map(String::as_str)
    }

    /// Dotted path for logs
    #[must_use]
    pub fn dotted_path(&self) -> String {
        self.path.join(".")
    }
}

/// Outcome of a validation call
///
/// Exactly one of `errors` (non-empty) and `normalized` is present. Fields are
/// private so that invariant only comes from [`ValidationResult::valid`] and
/// [`ValidationResult::invalid`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResult<T> {
    is_valid: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    errors: Option<Vec<ValidationError>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    normalized: Option<T>,
}

impl<T> ValidationResult<T> {
    /// Successful result carrying the normalized value
    pub fn valid(normalized: T) -> Self {
        Self {
            is_valid: true,
            errors: None,
            normalized: Some(normalized),
        }
    }

    /// Failed result
    ///
    /// An empty list is replaced with a single `UNKNOWN_ERROR` entry; a failed
    /// result never has zero errors.
    pub fn invalid(mut errors: Vec<ValidationError>) -> Self {
        if errors.is_empty() {
            errors.push(ValidationError::unknown("validation failed without a reported cause"));
        }
        Self {
            is_valid: false,
            errors: Some(errors),
            normalized: None,
        }
    }

    /// Build from a possibly-built value and the collected errors
    ///
    /// Errors win: any recorded error yields an invalid result.
    pub fn from_parts(value: Option<T>, errors: Vec<ValidationError>) -> Self {
        match value {
            Some(value) if errors.is_empty() => Self::valid(value),
            _ => Self::invalid(errors),
        }
    }

    /// Whether validation passed
    #[inline]
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.is_valid
    }

    /// Errors (empty slice when valid)
    #[must_use]
    pub fn errors(&self) -> &[ValidationError] {
        self.errors.as_deref().unwrap_or_default()
    }

    /// Normalized value, when valid
    #[inline]
    #[must_use]
    pub fn normalized(&self) -> Option<&T> {
        self.normalized.as_ref()
    }

    /// Convert to a standard `Result`
    ///
    /// # Errors
    /// Returns the error list when validation failed.
    pub fn into_result(self) -> Result<T, Vec<ValidationError>> {
        match (self.normalized, self.errors) {
            (Some(value), None) => Ok(value),
            (_, errors) => Err(errors.unwrap_or_default()),
        }
    }

    /// Map the normalized value
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> ValidationResult<U> {
        ValidationResult {
            is_valid: self.is_valid,
            errors: self.errors,
            normalized: self.normalized.map(f),
        }
    }
}

/// Errors loading validation configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Config file could not be read
    #[error("io error reading {path}: {source}")]
    Io {
        /// File that was read
        path: PathBuf,
        /// Underlying failure
        #[source]
        source: std::io::Error,
    },

    /// Config file is not valid TOML for this schema
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),

    /// Bounds are inconsistent
    #[error("inconsistent limits: {0}")]
    Inconsistent(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn code_serializes_to_stable_strings() {
        assert_eq!(serde_json::to_value(ErrorCode::TooSmall).unwrap(), json!("too_small"));
        assert_eq!(
            serde_json::to_value(ErrorCode::MissingImageDescription).unwrap(),
            json!("MISSING_IMAGE_DESCRIPTION")
        );
        for code in [ErrorCode::InvalidType, ErrorCode::Custom, ErrorCode::UnknownError] {
            assert_eq!(serde_json::to_value(code).unwrap(), json!(code.as_str()));
        }
    }

    #[test]
    fn error_display_includes_path_and_code() {
        let err = ValidationError::missing_image_description(2);
        assert_eq!(
            err.to_string(),
            "MISSING_IMAGE_DESCRIPTION at 'chapters.2.imageDescription': Chapter 3 is missing an image description"
        );
    }

    #[test]
    fn valid_result_shape() {
        let result = ValidationResult::valid(json!({"a": 1}));
        assert_eq!(
            serde_json::to_value(&result).unwrap(),
            json!({"isValid": true, "normalized": {"a": 1}})
        );
    }

    #[test]
    fn invalid_result_is_never_empty() {
        let result: ValidationResult<()> = ValidationResult::invalid(Vec::new());
        assert!(!result.is_valid());
        assert_eq!(result.errors()[0].code, ErrorCode::UnknownError);
    }

    #[test]
    fn from_parts_prefers_errors() {
        let err = ValidationError::at(&["title"], ErrorCode::TooSmall, "short");
        let result = ValidationResult::from_parts(Some(1), vec![err.clone()]);
        assert_eq!(result.into_result(), Err(vec![err]));

        let ok = ValidationResult::from_parts(Some(1), Vec::new());
        assert_eq!(ok.into_result(), Ok(1));
    }
}
