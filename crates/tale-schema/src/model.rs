//! Story payload data model
//!
//! Canonical shapes only. Alternate encodings accepted on input (map-form
//! `changedTraits`, alias trait names) are resolved before a value of these
//! types is built. Serialized field names are camelCase to match the wire.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tale_traits::TraitId;

/// Free text or a structured object
///
/// Serialized untagged: a JSON string is `Text`, an object is `Structured`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Described<T> {
    /// Free-text description
    Text(String),
    /// Structured description
    Structured(T),
}

impl<T> Described<T> {
    /// Text content, if this is the text form
    #[inline]
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            Self::Structured(_) => None,
        }
    }

    /// Structured content, if this is the structured form
    #[inline]
    #[must_use]
    pub fn as_structured(&self) -> Option<&T> {
        match self {
            Self::Text(_) => None,
            Self::Structured(value) => Some(value),
        }
    }
}

/// Per-character pose and appearance
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CharacterDetails {
    /// Facial expression
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expression: Option<String>,
    /// What the character is doing
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,
    /// Placement in the frame
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<String>,
    /// Clothing
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clothing: Option<String>,
}

/// Characters in a scene, keyed by name
pub type CharacterMap = IndexMap<String, Described<CharacterDetails>>;

/// Scene environment
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnvironmentDetails {
    /// Where the scene takes place
    pub setting: String,
    /// Lighting
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lighting: Option<String>,
    /// Atmosphere
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub atmosphere: Option<String>,
    /// Notable props
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub objects: Option<Vec<String>>,
}

/// Framing hints for the illustrator
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompositionDetails {
    /// Foreground
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub foreground: Option<String>,
    /// Background
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background: Option<String>,
    /// Point of attention
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub focus: Option<String>,
    /// Camera angle
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub camera_angle: Option<String>,
}

/// Structured chapter illustration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SceneDescription {
    /// What the illustration shows
    pub scene: String,
    /// Characters present
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub characters: Option<Described<CharacterMap>>,
    /// Environment
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub environment: Option<Described<EnvironmentDetails>>,
    /// Composition
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub composition: Option<Described<CompositionDetails>>,
}

/// Structured cover illustration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoverScene {
    /// What the cover shows
    pub main_scene: String,
    /// Characters present
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub characters: Option<Described<CharacterMap>>,
    /// Environment
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub environment: Option<Described<EnvironmentDetails>>,
    /// Art style
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub art_style: Option<String>,
    /// Color palette
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color_palette: Option<String>,
}

/// Chapter image description
pub type ImageDescription = Described<SceneDescription>;

/// Cover image description
pub type CoverImageDescription = Described<CoverScene>;

/// One chapter of a story
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Chapter {
    /// Title
    pub title: String,
    /// Chapter prose
    pub content: String,
    /// Position in the story, as generated
    pub order: u32,
    /// Illustration brief; required for image generation
    pub image_description: ImageDescription,
}

/// Canonical trait delta; `change` is within the configured limit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TraitChange {
    /// Canonical trait
    #[serde(rename = "trait")]
    pub trait_id: TraitId,
    /// Signed delta
    pub change: i64,
    /// Spelling found in the input, when it was not canonical
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_trait: Option<String>,
}

/// Personality growth of one avatar over the story
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvatarDevelopment {
    /// Avatar name
    pub name: String,
    /// Deltas in input order
    pub changed_traits: Vec<TraitChange>,
}

/// Educational takeaway
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LearningOutcome {
    /// Subject area
    pub category: String,
    /// What the reader learns
    pub description: String,
}

/// Root story payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoryResponse {
    /// Title
    pub title: String,
    /// Short summary
    pub description: String,
    /// Chapters in reading order
    pub chapters: Vec<Chapter>,
    /// Cover illustration brief
    pub cover_image_description: CoverImageDescription,
    /// Character growth per avatar
    pub avatar_developments: Vec<AvatarDevelopment>,
    /// Educational takeaways, when the story has any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub learning_outcomes: Option<Vec<LearningOutcome>>,
}

impl StoryResponse {
    /// Sum of changes per trait across all developments
    #[must_use]
    pub fn trait_totals(&self) -> IndexMap<TraitId, i64> {
        let mut totals = IndexMap::new();
        for change in self.avatar_developments.iter().flat_map(|d| &d.changed_traits) {
            *totals.entry(change.trait_id).or_insert(0) += change.change;
        }
        totals
    }
}
