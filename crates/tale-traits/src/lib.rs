//! Tale Traits
//!
//! Canonical trait identifiers and normalization of trait deltas found in
//! generated stories.
//!
//! # Overview
//!
//! - **TraitId**: closed set of base traits plus `knowledge.<subject>` tokens
//! - **normalize_trait**: lenient resolution of any spelling (aliases, German labels)
//! - **normalize_changes**: list of `{trait, change}` deltas → canonical list
//! - **normalize_developments**: avatar developments, map form → array form
//!
//! # Example
//!
//! ```rust
//! use tale_traits::{normalize_changes, normalize_trait, TraitUpdate};
//!
//! assert_eq!(normalize_trait("Bravery").map(|t| t.as_str()), Some("courage"));
//!
//! let result = normalize_changes(&[
//!     TraitUpdate::new("warmth", 3),
//!     TraitUpdate::new("courage", 2),
//! ]);
//! assert_eq!(result.changes.len(), 1);
//! assert_eq!(result.dropped[0].trait_name, "warmth");
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod alias;
pub mod changes;
pub mod developments;
pub mod trait_id;

// Re-exports
pub use alias::{normalize_trait, TraitCatalog, LEGACY_ALIASES};
pub use changes::{
    json_kind, normalize_change_values, normalize_changes, ChangeNormalization, DropReason,
    DroppedTrait, NormalizationError, NormalizedTraitChange, TraitUpdate, DROPPED_COUNTER,
};
pub use developments::{normalize_development, normalize_developments, DevelopmentNormalization};
pub use trait_id::{BaseTrait, KnowledgeSubject, TraitId, UnknownTraitId, KNOWLEDGE_PREFIX};

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for trait normalization
    pub use crate::{
        normalize_changes, normalize_developments, normalize_trait, DroppedTrait,
        NormalizedTraitChange, TraitId, TraitUpdate,
    };
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
