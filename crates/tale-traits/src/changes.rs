//! Trait change normalization
//!
//! Maps raw `{trait, change}` deltas onto canonical identifiers. Entries
//! whose trait cannot be resolved are dropped and reported; they never
//! fail the list they appear in.

use crate::alias::normalize_trait;
use crate::trait_id::TraitId;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};

/// Metrics counter incremented for every dropped entry
pub const DROPPED_COUNTER: &str = "tale_traits_dropped_total";

/// Raw trait delta as produced by the generator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraitUpdate {
    /// Trait name in any accepted spelling
    #[serde(rename = "trait")]
    pub trait_name: String,
    /// Delta, kept as the exact JSON number
    pub change: Number,
    /// Audit annotation carried over from an earlier normalization pass
    #[serde(default, rename = "originalTrait", skip_serializing_if = "Option::is_none")]
    pub original_trait: Option<String>,
}

impl TraitUpdate {
    /// Create update from an integer delta
    #[must_use]
    pub fn new(trait_name: impl Into<String>, change: i64) -> Self {
        Self {
            trait_name: trait_name.into(),
            change: Number::from(change),
            original_trait: None,
        }
    }
}

/// Trait delta with a canonical identifier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedTraitChange {
    /// Canonical identifier
    #[serde(rename = "trait")]
    pub trait_id: TraitId,
    /// Delta, untouched (range checks belong to the schema validator)
    pub change: Number,
    /// Input spelling when it differed from the canonical token
    #[serde(default, rename = "originalTrait", skip_serializing_if = "Option::is_none")]
    pub original_trait: Option<String>,
}

impl NormalizedTraitChange {
    /// JSON object form: `{trait, change, originalTrait?}`
    #[must_use]
    pub fn to_value(&self) -> Value {
        let mut obj = Map::new();
        obj.insert("trait".into(), Value::String(self.trait_id.as_str().to_string()));
        obj.insert("change".into(), Value::Number(self.change.clone()));
        if let Some(original) = &self.original_trait {
            obj.insert("originalTrait".into(), Value::String(original.clone()));
        }
        Value::Object(obj)
    }
}

/// Why an entry was dropped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DropReason {
    /// Name matched neither the canonical set nor any alias
    Unresolvable,
    /// Entry did not have the expected shape
    Malformed,
}

impl DropReason {
    /// Label used for logs and metrics
    #[inline]
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Unresolvable => "unresolvable",
            Self::Malformed => "malformed",
        }
    }
}

/// Record of a dropped entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DroppedTrait {
    /// Raw trait name (empty when the entry had none)
    #[serde(rename = "trait")]
    pub trait_name: String,
    /// Drop classification
    pub reason: DropReason,
    /// Index of the owning development, when dropped during development normalization
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub development: Option<usize>,
}

impl DroppedTrait {
    pub(crate) fn record(trait_name: impl Into<String>, reason: DropReason) -> Self {
        let dropped = Self {
            trait_name: trait_name.into(),
            reason,
            development: None,
        };
        tracing::warn!(
            trait_name = %dropped.trait_name,
            reason = reason.as_str(),
            "dropping trait change"
        );
        metrics::counter!(DROPPED_COUNTER, "reason" => reason.as_str()).increment(1);
        dropped
    }
}

/// Output of change normalization
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChangeNormalization {
    /// Surviving entries, in input order
    pub changes: Vec<NormalizedTraitChange>,
    /// Entries removed, in input order
    pub dropped: Vec<DroppedTrait>,
}

/// Errors from the JSON entry point
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NormalizationError {
    /// Input was not a JSON array
    #[error("trait updates must be an array, got {found}")]
    NotAnArray {
        /// JSON kind that was supplied
        found: &'static str,
    },
}

impl NormalizationError {
    /// Stable machine-readable code
    #[inline]
    #[must_use]
    pub const fn code(&self) -> &'static str {
        "NORMALIZATION_ERROR"
    }
}

/// JSON kind name for diagnostics
#[must_use]
pub fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Resolve one delta
///
/// `carried` is an `originalTrait` annotation from an earlier pass; it is
/// kept only when the input is already canonical.
pub(crate) fn resolve_change(
    raw_name: &str,
    change: Number,
    carried: Option<String>,
) -> Result<NormalizedTraitChange, DroppedTrait> {
    let Some(trait_id) = normalize_trait(raw_name) else {
        return Err(DroppedTrait::record(raw_name, DropReason::Unresolvable));
    };

    let original_trait = if trait_id.as_str() == raw_name {
        carried
    } else {
        Some(raw_name.to_string())
    };

    Ok(NormalizedTraitChange {
        trait_id,
        change,
        original_trait,
    })
}

/// Resolve one JSON array entry of shape `{trait, change, originalTrait?}`
pub(crate) fn resolve_change_value(entry: &Value) -> Result<NormalizedTraitChange, DroppedTrait> {
    let Some(obj) = entry.as_object() else {
        return Err(DroppedTrait::record("", DropReason::Malformed));
    };
    let Some(name) = obj.get("trait").and_then(Value::as_str) else {
        return Err(DroppedTrait::record("", DropReason::Malformed));
    };
    let Some(change) = obj.get("change").and_then(as_number) else {
        return Err(DroppedTrait::record(name, DropReason::Malformed));
    };
    let carried = obj
        .get("originalTrait")
        .and_then(Value::as_str)
        .map(str::to_string);

    resolve_change(name, change, carried)
}

fn as_number(value: &Value) -> Option<Number> {
    match value {
        Value::Number(n) => Some(n.clone()),
        _ => None,
    }
}

/// Normalize a list of typed updates
///
/// Unresolvable names are dropped and recorded; order of survivors matches input.
#[must_use]
pub fn normalize_changes(updates: &[TraitUpdate]) -> ChangeNormalization {
    let mut out = ChangeNormalization::default();
    for update in updates {
        match resolve_change(
            &update.trait_name,
            update.change.clone(),
            update.original_trait.clone(),
        ) {
            Ok(change) => out.changes.push(change),
            Err(dropped) => out.dropped.push(dropped),
        }
    }
    out
}

/// Normalize a JSON array of updates
///
/// Entries that are not `{trait: string, change: number}` objects are dropped
/// as malformed.
///
/// # Errors
/// Returns [`NormalizationError::NotAnArray`] for any non-array input.
pub fn normalize_change_values(raw: &Value) -> Result<ChangeNormalization, NormalizationError> {
    let Value::Array(entries) = raw else {
        return Err(NormalizationError::NotAnArray {
            found: json_kind(raw),
        });
    };

    let mut out = ChangeNormalization::default();
    for entry in entries {
        match resolve_change_value(entry) {
            Ok(change) => out.changes.push(change),
            Err(dropped) => out.dropped.push(dropped),
        }
    }
    tracing::debug!(
        kept = out.changes.len(),
        dropped = out.dropped.len(),
        "normalized trait updates"
    );
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trait_id::{BaseTrait, KnowledgeSubject};
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;
    use serde_json::json;

    #[test]
    fn unknown_trait_is_dropped_not_fatal() {
        let result = normalize_changes(&[TraitUpdate::new("warmth", 3), TraitUpdate::new("courage", 2)]);

        assert_eq!(
            result.changes,
            vec![NormalizedTraitChange {
                trait_id: TraitId::Base(BaseTrait::Courage),
                change: Number::from(2),
                original_trait: None,
            }]
        );
        assert_eq!(result.dropped.len(), 1);
        assert_eq!(result.dropped[0].trait_name, "warmth");
        assert_eq!(result.dropped[0].reason, DropReason::Unresolvable);
    }

    #[test]
    fn alias_keeps_original_spelling() {
        let result = normalize_changes(&[TraitUpdate::new("Physik", 4)]);
        let change = &result.changes[0];
        assert_eq!(change.trait_id, TraitId::Knowledge(KnowledgeSubject::Physics));
        assert_eq!(change.original_trait.as_deref(), Some("Physik"));
    }

    #[test]
    fn case_difference_counts_as_differing_input() {
        let result = normalize_changes(&[TraitUpdate::new("Courage", 1)]);
        assert_eq!(result.changes[0].original_trait.as_deref(), Some("Courage"));
    }

    #[test]
    fn out_of_range_values_pass_through() {
        let result = normalize_changes(&[TraitUpdate::new("courage", 42)]);
        assert_eq!(result.changes[0].change, Number::from(42));
    }

    #[test]
    fn json_entry_point_rejects_non_array() {
        let err = normalize_change_values(&json!({"trait": "courage"})).unwrap_err();
        assert_eq!(err, NormalizationError::NotAnArray { found: "object" });
        assert_eq!(err.code(), "NORMALIZATION_ERROR");
    }

    #[test]
    fn json_entry_point_drops_malformed_entries() {
        let result = normalize_change_values(&json!([
            {"trait": "mut", "change": 5},
            {"trait": "courage"},
            {"change": 3},
            "curiosity",
            {"trait": "humor", "change": "lots"},
            {"trait": "humor", "change": -2.5}
        ]))
        .unwrap();

        assert_eq!(result.changes.len(), 2);
        assert_eq!(result.changes[0].to_value(), json!({"trait": "courage", "change": 5, "originalTrait": "mut"}));
        assert_eq!(result.changes[1].to_value(), json!({"trait": "humor", "change": -2.5}));
        assert!(result.dropped.iter().all(|d| d.reason == DropReason::Malformed));
        assert_eq!(result.dropped.len(), 4);
    }

    #[test]
    fn serde_shape_matches_wire_format() {
        let update: TraitUpdate = serde_json::from_value(json!({"trait": "Mut", "change": 3})).unwrap();
        assert_eq!(update, TraitUpdate::new("Mut", 3));

        let normalized = normalize_changes(&[update]);
        assert_eq!(
            serde_json::to_value(&normalized.changes).unwrap(),
            json!([{"trait": "courage", "change": 3, "originalTrait": "Mut"}])
        );
    }

    proptest! {
        #[test]
        fn survivors_preserve_input_order(names in proptest::collection::vec(
            prop_oneof![Just("courage"), Just("mut"), Just("warmth"), Just("physik"), Just("zzz")],
            0..20,
        )) {
            let updates: Vec<_> = names.iter().enumerate().map(|(i, n)| TraitUpdate::new(*n, i as i64)).collect();
            let result = normalize_changes(&updates);

            let indices: Vec<i64> = result.changes.iter().map(|c| c.change.as_i64().unwrap()).collect();
            let mut sorted = indices.clone();
            sorted.sort_unstable();
            prop_assert_eq!(&indices, &sorted);
            prop_assert_eq!(result.changes.len() + result.dropped.len(), updates.len());
        }

        #[test]
        fn renormalizing_is_idempotent(names in proptest::collection::vec(
            prop_oneof![Just("Courage"), Just("mut"), Just("warmth"), Just("knowledge.physik"), Just("teamwork")],
            0..12,
        )) {
            let updates: Vec<_> = names.iter().map(|n| TraitUpdate::new(*n, 1)).collect();
            let first = normalize_changes(&updates);

            let again: Vec<TraitUpdate> = first
                .changes
                .iter()
                .map(|c| serde_json::from_value(serde_json::to_value(c).unwrap()).unwrap())
                .collect();
            let second = normalize_changes(&again);

            prop_assert_eq!(first.changes, second.changes);
            prop_assert!(second.dropped.is_empty());
        }
    }
}
