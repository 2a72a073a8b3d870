//! Tool catalog
//!
//! The four operations an orchestrator can invoke, their argument shapes,
//! and descriptors with JSON Schemas derived from those shapes.

use crate::error::ToolError;
use schemars::schema::RootSchema;
use schemars::{schema_for, JsonSchema};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

/// Operation exposed at the boundary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ToolName {
    /// Full story validation
    ValidateStoryResponse,
    /// Avatar developments only
    ValidateAvatarDevelopments,
    /// Trait delta normalization
    NormalizeTraitUpdates,
    /// Validation plus quality heuristics
    GetValidationReport,
}

impl ToolName {
    /// Every tool, in catalog order
    pub const ALL: [ToolName; 4] = [
        Self::ValidateStoryResponse,
        Self::ValidateAvatarDevelopments,
        Self::NormalizeTraitUpdates,
        Self::GetValidationReport,
    ];

    /// Wire name
    #[inline]
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ValidateStoryResponse => "validate_story_response",
            Self::ValidateAvatarDevelopments => "validate_avatar_developments",
            Self::NormalizeTraitUpdates => "normalize_trait_updates",
            Self::GetValidationReport => "get_validation_report",
        }
    }

    /// Human-readable summary for tool discovery
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::ValidateStoryResponse => {
                "Validate a generated story payload and return the normalized story or every violation with its path and code"
            }
            Self::ValidateAvatarDevelopments => {
                "Normalize and validate a list of avatar developments"
            }
            Self::NormalizeTraitUpdates => {
                "Map trait deltas onto canonical trait identifiers, dropping unknown traits"
            }
            Self::GetValidationReport => {
                "Validate a story and evaluate quality heuristics, reporting which facet failed"
            }
        }
    }

    /// JSON Schema of the arguments object
    #[must_use]
    pub fn input_schema(self) -> RootSchema {
        match self {
            Self::ValidateStoryResponse | Self::GetValidationReport => schema_for!(StoryArgs),
            Self::ValidateAvatarDevelopments => schema_for!(DevelopmentsArgs),
            Self::NormalizeTraitUpdates => schema_for!(TraitUpdatesArgs),
        }
    }

    /// Descriptor for tool discovery
    #[must_use]
    pub fn descriptor(self) -> ToolDescriptor {
        ToolDescriptor {
            name: self.as_str(),
            description: self.description(),
            input_schema: self.input_schema(),
        }
    }
}

impl fmt::Display for ToolName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ToolName {
    type Err = ToolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|tool| tool.as_str() == s)
            .ok_or_else(|| ToolError::UnknownTool(s.to_string()))
    }
}

/// Name, description and argument schema of one tool
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolDescriptor {
    /// Wire name
    pub name: &'static str,
    /// Summary
    pub description: &'static str,
    /// Schema of the arguments object
    pub input_schema: RootSchema,
}

/// Descriptors for every tool
#[must_use]
pub fn descriptors() -> Vec<ToolDescriptor> {
    ToolName::ALL.into_iter().map(ToolName::descriptor).collect()
}

/// Arguments of `validate_story_response` and `get_validation_report`
#[derive(Debug, Clone, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct StoryArgs {
    /// Story payload as produced by the generator
    pub story_data: Map<String, Value>,
}

/// Arguments of `validate_avatar_developments`
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct DevelopmentsArgs {
    /// Avatar developments, array or map form for `changedTraits`
    pub developments: Vec<Value>,
}

/// Arguments of `normalize_trait_updates`
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct TraitUpdatesArgs {
    /// `{trait, change}` entries; malformed entries are dropped
    pub updates: Vec<Value>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_round_trip() {
        for tool in ToolName::ALL {
            assert_eq!(tool.as_str().parse::<ToolName>(), Ok(tool));
        }
        assert_eq!(
            "validate_everything".parse::<ToolName>(),
            Err(ToolError::UnknownTool("validate_everything".into()))
        );
    }

    #[test]
    fn schemas_name_the_required_field() {
        let required = |tool: ToolName| {
            let schema = serde_json::to_value(tool.input_schema()).unwrap();
            schema["required"].clone()
        };
        assert_eq!(required(ToolName::ValidateStoryResponse), serde_json::json!(["storyData"]));
        assert_eq!(required(ToolName::ValidateAvatarDevelopments), serde_json::json!(["developments"]));
        assert_eq!(required(ToolName::NormalizeTraitUpdates), serde_json::json!(["updates"]));
        assert_eq!(required(ToolName::GetValidationReport), serde_json::json!(["storyData"]));
    }

    #[test]
    fn descriptor_uses_camel_case() {
        let value = serde_json::to_value(ToolName::NormalizeTraitUpdates.descriptor()).unwrap();
        assert_eq!(value["name"], "normalize_trait_updates");
        assert!(value.get("inputSchema").is_some());
        assert_eq!(descriptors().len(), 4);
    }
}
