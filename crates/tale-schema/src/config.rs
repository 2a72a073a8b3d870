//! Validation limits
//!
//! Defaults reproduce the story contract; deployments may override any limit
//! from a TOML file:
//!
//! ```toml
//! max_chapters = 12
//! recommended_min_chapters = 4
//! ```

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Numeric limits used by the validator and the report heuristics
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationConfig {
    /// Story title minimum length
    pub title_min: usize,
    /// Story title maximum length
    pub title_max: usize,
    /// Story description minimum length
    pub description_min: usize,
    /// Story description maximum length
    pub description_max: usize,
    /// Minimum chapter title length
    pub chapter_title_min: usize,
    /// Minimum chapter content length
    pub chapter_content_min: usize,
    /// Minimum length of a text image description or of `scene`/`mainScene`
    pub image_description_min: usize,
    /// Smallest accepted chapter count
    pub min_chapters: usize,
    /// Largest accepted chapter count
    pub max_chapters: usize,
    /// Largest accepted absolute trait change
    pub max_trait_change: i64,
    /// Below this chapter count the report emits a warning
    pub recommended_min_chapters: usize,
    /// Minimum learning outcome description length
    pub outcome_description_min: usize,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            title_min: 3,
            title_max: 100,
            description_min: 10,
            description_max: 500,
            chapter_title_min: 3,
            chapter_content_min: 50,
            image_description_min: 10,
            min_chapters: 1,
            max_chapters: 20,
            max_trait_change: 10,
            recommended_min_chapters: 3,
            outcome_description_min: 10,
        }
    }
}

impl ValidationConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With chapter count bounds
    #[inline]
    #[must_use]
    pub fn with_chapter_bounds(mut self, min: usize, max: usize) -> Self {
        self.min_chapters = min;
        self.max_chapters = max;
        self
    }

    /// With trait change limit
    #[inline]
    #[must_use]
    pub fn with_max_trait_change(mut self, limit: i64) -> Self {
        self.max_trait_change = limit;
        self
    }

    /// With recommended chapter count for the report heuristic
    #[inline]
    #[must_use]
    pub fn with_recommended_min_chapters(mut self, count: usize) -> Self {
        self.recommended_min_chapters = count;
        self
    }

    /// Parse from TOML; missing keys keep their defaults
    ///
    /// # Errors
    /// Returns error if TOML is invalid or limits are inconsistent
    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(raw)?;
        config.check()?;
        Ok(config)
    }

    /// Load from a TOML file
    ///
    /// # Errors
    /// Returns error if the file cannot be read or parsed
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::debug!(path = %path.display(), "loading validation config");
        Self::from_toml_str(&raw)
    }

    /// Check bounds are consistent
    ///
    /// # Errors
    /// Returns [`ConfigError::Inconsistent`] naming the first bad pair
    pub fn check(&self) -> Result<(), ConfigError> {
        let pairs = [
            ("title", self.title_min, self.title_max),
            ("description", self.description_min, self.description_max),
            ("chapters", self.min_chapters, self.max_chapters),
        ];
        for (name, min, max) in pairs {
            if min > max {
                return Err(ConfigError::Inconsistent(format!(
                    "{name}: min {min} exceeds max {max}"
                )));
            }
        }
        if self.max_trait_change < 0 {
            return Err(ConfigError::Inconsistent(format!(
                "max_trait_change must not be negative, got {}",
                self.max_trait_change
            )));
        }
        Ok(())
    }
}
