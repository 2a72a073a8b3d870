//! Tale Tools
//!
//! Tool-invocation boundary for the story validation pipeline.
//!
//! # Tools
//!
//! | Tool | Arguments | Result |
//! |------|-----------|--------|
//! | `validate_story_response` | `{storyData: object}` | `ValidationResult` |
//! | `validate_avatar_developments` | `{developments: object[]}` | `ValidationResult` |
//! | `normalize_trait_updates` | `{updates: object[]}` | `ValidationResult` of canonical changes |
//! | `get_validation_report` | `{storyData: object}` | `ValidationReport` |
//!
//! Calls are independent and stateless. A request missing its required field
//! is rejected with [`ToolError::InvalidRequest`]; anything else returns a
//! value, including validation failures.
//!
//! # Example
//!
//! ```rust
//! use serde_json::json;
//! use tale_tools::ToolRegistry;
//!
//! let registry = ToolRegistry::default();
//! let result = registry
//!     .call(
//!         "normalize_trait_updates",
//!         json!({"updates": [{"trait": "warmth", "change": 3}, {"trait": "Mut", "change": 2}]}),
//!     )
//!     .unwrap();
//!
//! assert_eq!(
//!     result,
//!     json!({"isValid": true, "normalized": [{"trait": "courage", "change": 2, "originalTrait": "Mut"}]})
//! );
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod error;
pub mod registry;
pub mod server;
pub mod tools;

// Re-exports for convenience
pub use error::{ToolError, ToolResult};
pub use registry::ToolRegistry;
pub use server::{handle_line, serve, Request, Response, ServeStats, LIST_TOOLS};
pub use tools::{descriptors, ToolDescriptor, ToolName};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
