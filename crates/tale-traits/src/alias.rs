//! Legacy alias table and trait-name resolution
//!
//! Generated stories arrive with trait names in whatever vocabulary the
//! model chose: German labels from the early prompt templates, English
//! synonyms, bare subject names. The table below is the single place those
//! spellings are mapped onto [`TraitId`]. Adding an alias is a one-line edit.

use crate::trait_id::{BaseTrait, KnowledgeSubject, TraitId, KNOWLEDGE_PREFIX};
use once_cell::sync::Lazy;
use std::collections::HashMap;

use crate::trait_id::BaseTrait::{
    Adventure, Courage, Creativity, Curiosity, Empathy, Humor, Intelligence, Leadership, Patience,
    Strength, Teamwork,
};
use crate::trait_id::KnowledgeSubject::{Astronomy, Biology, Chemistry, Geography, History, Mathematics, Physics};

const fn base(t: BaseTrait) -> TraitId {
    TraitId::Base(t)
}

const fn knowledge(s: KnowledgeSubject) -> TraitId {
    TraitId::Knowledge(s)
}

/// Accepted legacy spellings, lower-case and trimmed
pub static LEGACY_ALIASES: &[(&str, TraitId)] = &[
    // courage
    ("mut", base(Courage)),
    ("tapferkeit", base(Courage)),
    ("mutig", base(Courage)),
    ("bravery", base(Courage)),
    ("brave", base(Courage)),
    ("boldness", base(Courage)),
    // intelligence
    ("intelligenz", base(Intelligence)),
    ("klugheit", base(Intelligence)),
    ("klug", base(Intelligence)),
    ("weisheit", base(Intelligence)),
    ("smart", base(Intelligence)),
    ("clever", base(Intelligence)),
    ("wisdom", base(Intelligence)),
    // creativity
    ("kreativität", base(Creativity)),
    ("kreativitaet", base(Creativity)),
    ("fantasie", base(Creativity)),
    ("phantasie", base(Creativity)),
    ("imagination", base(Creativity)),
    ("creative", base(Creativity)),
    // empathy
    ("empathie", base(Empathy)),
    ("mitgefühl", base(Empathy)),
    ("mitgefuehl", base(Empathy)),
    ("freundlichkeit", base(Empathy)),
    ("kindness", base(Empathy)),
    ("compassion", base(Empathy)),
    // strength
    ("stärke", base(Strength)),
    ("staerke", base(Strength)),
    ("kraft", base(Strength)),
    ("power", base(Strength)),
    ("strong", base(Strength)),
    // humor
    ("humour", base(Humor)),
    ("witz", base(Humor)),
    ("lustig", base(Humor)),
    ("funny", base(Humor)),
    // adventure
    ("abenteuer", base(Adventure)),
    ("abenteuerlust", base(Adventure)),
    ("adventurous", base(Adventure)),
    // patience
    ("geduld", base(Patience)),
    ("geduldig", base(Patience)),
    ("patient", base(Patience)),
    // curiosity
    ("neugier", base(Curiosity)),
    ("neugierde", base(Curiosity)),
    ("wissbegierde", base(Curiosity)),
    ("curious", base(Curiosity)),
    // leadership
    ("führung", base(Leadership)),
    ("fuehrung", base(Leadership)),
    ("führungsstärke", base(Leadership)),
    ("leader", base(Leadership)),
    // teamwork
    ("teamarbeit", base(Teamwork)),
    ("zusammenarbeit", base(Teamwork)),
    ("teamgeist", base(Teamwork)),
    ("cooperation", base(Teamwork)),
    ("collaboration", base(Teamwork)),
    // knowledge subjects
    ("history", knowledge(History)),
    ("geschichte", knowledge(History)),
    ("biology", knowledge(Biology)),
    ("biologie", knowledge(Biology)),
    ("physics", knowledge(Physics)),
    ("physik", knowledge(Physics)),
    ("geography", knowledge(Geography)),
    ("geografie", knowledge(Geography)),
    ("geographie", knowledge(Geography)),
    ("erdkunde", knowledge(Geography)),
    ("astronomy", knowledge(Astronomy)),
    ("astronomie", knowledge(Astronomy)),
    ("mathematics", knowledge(Mathematics)),
    ("mathematik", knowledge(Mathematics)),
    ("mathe", knowledge(Mathematics)),
    ("math", knowledge(Mathematics)),
    ("maths", knowledge(Mathematics)),
    ("chemistry", knowledge(Chemistry)),
    ("chemie", knowledge(Chemistry)),
];

static ALIAS_INDEX: Lazy<HashMap<&'static str, TraitId>> =
    Lazy::new(|| LEGACY_ALIASES.iter().copied().collect());

/// Resolve an arbitrary trait name to its canonical identifier
///
/// Trims and lower-cases the input, then tries in order: the base-trait set,
/// the `knowledge.<subject>` pattern, the legacy alias table (also applied to
/// the subject part of a prefixed name such as `knowledge.physik`).
///
/// Returns `None` when nothing matches; that is a normal outcome, not an error.
#[must_use]
pub fn normalize_trait(raw: &str) -> Option<TraitId> {
    let key = raw.trim().to_lowercase();
    if key.is_empty() {
        return None;
    }

    if let Some(id) = TraitId::from_canonical(&key) {
        return Some(id);
    }

    if let Some(id) = ALIAS_INDEX.get(key.as_str()) {
        return Some(*id);
    }

    key.strip_prefix(KNOWLEDGE_PREFIX)
        .and_then(|subject| ALIAS_INDEX.get(subject.trim()))
        .copied()
        .filter(|id| id.is_knowledge())
}

/// Read-only view over the canonical set and the alias table
#[derive(Debug, Clone, Copy, Default)]
pub struct TraitCatalog;

impl TraitCatalog {
    /// Create catalog view
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Resolve a raw name (same as [`normalize_trait`])
    #[inline]
    #[must_use]
    pub fn resolve(&self, raw: &str) -> Option<TraitId> {
        normalize_trait(raw)
    }

    /// All canonical identifiers
    #[must_use]
    pub fn canonical(&self) -> Vec<TraitId> {
        TraitId::all().collect()
    }

    /// Aliases that map onto `id`, in table order
    #[must_use]
    pub fn aliases_for(&self, id: TraitId) -> Vec<&'static str> {
        LEGACY_ALIASES
            .iter()
            .filter(|(_, target)| *target == id)
            .map(|(alias, _)| *alias)
            .collect()
    }

    /// Number of alias entries
    #[inline]
    #[must_use]
    pub fn alias_count(&self) -> usize {
        LEGACY_ALIASES.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn canonical_names_resolve_to_themselves() {
        for id in TraitId::all() {
            assert_eq!(normalize_trait(id.as_str()), Some(id));
        }
    }

    #[test]
    fn trims_and_lowercases() {
        assert_eq!(normalize_trait("  Courage "), Some(base(Courage)));
        assert_eq!(normalize_trait("KNOWLEDGE.Physics"), Some(knowledge(Physics)));
        assert_eq!(normalize_trait("Stärke"), Some(base(Strength)));
    }

    #[test]
    fn english_synonyms() {
        assert_eq!(normalize_trait("bravery"), Some(base(Courage)));
        assert_eq!(normalize_trait("smart"), Some(base(Intelligence)));
        assert_eq!(normalize_trait("clever"), Some(base(Intelligence)));
        assert_eq!(normalize_trait("wisdom"), Some(base(Intelligence)));
    }

    #[test]
    fn subject_names_resolve_with_and_without_prefix() {
        assert_eq!(normalize_trait("Geschichte"), Some(knowledge(History)));
        assert_eq!(normalize_trait("biology"), Some(knowledge(Biology)));
        assert_eq!(normalize_trait("knowledge.mathe"), Some(knowledge(Mathematics)));
    }

    #[test]
    fn prefixed_base_alias_is_not_a_subject() {
        assert_eq!(normalize_trait("knowledge.mut"), None);
        assert_eq!(normalize_trait("knowledge.courage"), None);
    }

    #[test]
    fn unknown_and_empty_yield_none() {
        assert_eq!(normalize_trait("warmth"), None);
        assert_eq!(normalize_trait(""), None);
        assert_eq!(normalize_trait("   "), None);
        assert_eq!(normalize_trait("knowledge.music"), None);
    }

    #[test]
    fn table_keys_are_normalized_and_unique() {
        let mut seen = std::collections::HashSet::new();
        for (alias, _) in LEGACY_ALIASES {
            assert_eq!(*alias, alias.trim().to_lowercase(), "alias '{alias}' not normalized");
            assert!(seen.insert(*alias), "duplicate alias '{alias}'");
            assert!(TraitId::from_canonical(alias).is_none(), "alias '{alias}' shadows a canonical id");
        }
    }

    #[test]
    fn every_trait_has_at_least_one_alias() {
        let catalog = TraitCatalog::new();
        for id in catalog.canonical() {
            assert!(!catalog.aliases_for(id).is_empty(), "no alias for {id}");
        }
    }

    #[test]
    fn alias_closure() {
        for (alias, target) in LEGACY_ALIASES {
            assert_eq!(normalize_trait(alias), normalize_trait(target.as_str()));
        }
    }

    proptest! {
        #[test]
        fn resolution_ignores_case_and_padding(idx in 0..LEGACY_ALIASES.len(), pad in 0..4usize) {
            let (alias, target) = LEGACY_ALIASES[idx];
            let padded = format!("{}{}{}", " ".repeat(pad), alias.to_uppercase(), "\t".repeat(pad));
            prop_assert_eq!(normalize_trait(&padded), Some(target));
        }

        #[test]
        fn never_panics_on_arbitrary_input(raw in ".*") {
            let _ = normalize_trait(&raw);
        }
    }
}
