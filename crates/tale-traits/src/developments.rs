//! Avatar development normalization
//!
//! Runs on raw JSON before shape checking. `changedTraits` arrives either as
//! an array of deltas or as a map `{trait: {before, after, reason?}}`; the
//! output always uses the array form. Anything this pass cannot interpret is
//! left in place for the schema validator to reject.

use crate::changes::{resolve_change, resolve_change_value, DropReason, DroppedTrait};
use serde_json::{Map, Number, Value};

/// Output of development normalization
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DevelopmentNormalization {
    /// Developments with canonical `changedTraits`, same order and length as input
    pub developments: Vec<Value>,
    /// Entries removed across all developments
    pub dropped: Vec<DroppedTrait>,
}

/// Normalize a list of raw developments
#[must_use]
pub fn normalize_developments(raw: &[Value]) -> DevelopmentNormalization {
    let mut out = DevelopmentNormalization::default();
    for (index, development) in raw.iter().enumerate() {
        let mut dropped = Vec::new();
        out.developments.push(normalize_development(development, &mut dropped));
        out.dropped.extend(dropped.into_iter().map(|mut d| {
            d.development = Some(index);
            d
        }));
    }
    out
}

/// Normalize one development, appending dropped entries to `dropped`
///
/// Non-object developments and `changedTraits` values that are neither an
/// array nor an object are returned unchanged. Every other field is kept.
#[must_use]
pub fn normalize_development(raw: &Value, dropped: &mut Vec<DroppedTrait>) -> Value {
    let Value::Object(fields) = raw else {
        return raw.clone();
    };

    let mut out = fields.clone();
    if let Some(changed) = fields.get("changedTraits") {
        let canonical = match changed {
            Value::Array(entries) => Some(from_array(entries, dropped)),
            Value::Object(map) => Some(from_map(map, dropped)),
            _ => None,
        };
        if let Some(entries) = canonical {
            out.insert("changedTraits".into(), Value::Array(entries));
        }
    }
    Value::Object(out)
}

fn from_array(entries: &[Value], dropped: &mut Vec<DroppedTrait>) -> Vec<Value> {
    entries
        .iter()
        .filter_map(|entry| match resolve_change_value(entry) {
            Ok(change) => Some(change.to_value()),
            Err(d) => {
                dropped.push(d);
                None
            }
        })
        .collect()
}

fn from_map(map: &Map<String, Value>, dropped: &mut Vec<DroppedTrait>) -> Vec<Value> {
    let mut out = Vec::with_capacity(map.len());
    for (name, transition) in map {
        let Some(change) = transition_delta(transition) else {
            dropped.push(DroppedTrait::record(name.as_str(), DropReason::Malformed));
            continue;
        };
        match resolve_change(name, change, None) {
            Ok(change) => out.push(change.to_value()),
            Err(d) => dropped.push(d),
        }
    }
    out
}

/// `after - before`, in integer arithmetic when both sides are integers
fn transition_delta(transition: &Value) -> Option<Number> {
    let before = transition.get("before")?;
    let after = transition.get("after")?;

    if let (Some(b), Some(a)) = (before.as_i64(), after.as_i64()) {
        return a.checked_sub(b).map(Number::from);
    }
    Number::from_f64(after.as_f64()? - before.as_f64()?)
}
