//! Tale Schema
//!
//! Structural validation of generated story payloads.
//!
//! # Core Operations
//!
//! - **validate_story_response**: full payload → normalized [`StoryResponse`] or path-addressed errors
//! - **validate_chapter**: one chapter, for re-validation after regenerating it
//! - **validate_avatar_developments**: developments only, normalized first
//! - **build_report**: the above plus heuristics (chapter count, growth, image descriptions)
//!
//! # Architecture
//!
//! ```text
//! raw JSON → normalize_developments → Walk (path stack, all errors) → ValidationResult<T>
//!                                                                    ↓
//!                                                 ReportBuilder → ValidationReport
//! ```
//!
//! # Example
//!
//! ```rust
//! use serde_json::json;
//! use tale_schema::{validate_story_response, ErrorCode};
//!
//! let result = validate_story_response(&json!({"title": "Hi"}));
//! assert!(!result.is_valid());
//! assert_eq!(result.errors()[0].path, vec!["title".to_string()]);
//! assert_eq!(result.errors()[0].code, ErrorCode::TooSmall);
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod config;
pub mod error;
pub mod model;
pub mod report;
pub mod validator;

// Re-exports for convenience
pub use config::ValidationConfig;
pub use error::{ConfigError, ErrorCode, ValidationError, ValidationResult};
pub use model::{
    AvatarDevelopment, Chapter, CharacterDetails, CharacterMap, CompositionDetails,
    CoverImageDescription, CoverScene, Described, EnvironmentDetails, ImageDescription,
    LearningOutcome, SceneDescription, StoryResponse, TraitChange,
};
pub use report::{build_report, ReportBuilder, ValidationReport};
pub use validator::{
    validate_avatar_developments, validate_chapter, validate_story_response, StoryValidation,
    StoryValidator, RUNS_COUNTER,
};

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for validating story payloads
    pub use crate::{
        build_report, validate_avatar_developments, validate_chapter, validate_story_response,
        ErrorCode, StoryResponse, StoryValidator, ValidationConfig, ValidationError,
        ValidationReport, ValidationResult,
    };
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
