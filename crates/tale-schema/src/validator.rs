//! Structural schema validator
//!
//! Walks raw JSON against the story contract and builds the typed model.
//! Every violation is recorded with its path; nothing returns early, so one
//! call reports all independent problems in a payload.
//!
//! Avatar developments are normalized (aliases resolved, map form turned into
//! array form) before the walk, since the map form is not a valid final shape.

use crate::config::ValidationConfig;
use crate::error::{ErrorCode, ValidationError, ValidationResult};
use crate::model::{
    AvatarDevelopment, Chapter, CharacterDetails, CharacterMap, CompositionDetails, CoverScene,
    CoverImageDescription, Described, EnvironmentDetails, ImageDescription, LearningOutcome,
    SceneDescription, StoryResponse, TraitChange,
};
use serde_json::{Map, Value};
use tale_traits::{json_kind, normalize_developments, DroppedTrait, TraitId};

/// Metrics counter incremented once per validation call
pub const RUNS_COUNTER: &str = "tale_validation_runs_total";

type Object = Map<String, Value>;

/// Full-story validation plus the trait entries dropped while normalizing
#[derive(Debug, Clone, PartialEq)]
pub struct StoryValidation {
    /// Validation outcome
    pub result: ValidationResult<StoryResponse>,
    /// Trait entries removed during development normalization
    pub dropped: Vec<DroppedTrait>,
}

/// Schema validator bound to a set of limits
#[derive(Debug, Clone, Default)]
pub struct StoryValidator {
    config: ValidationConfig,
}

impl StoryValidator {
    /// Create validator with custom limits
    #[inline]
    #[must_use]
    pub fn new(config: ValidationConfig) -> Self {
        Self { config }
    }

    /// Active limits
    #[inline]
    #[must_use]
    pub fn config(&self) -> &ValidationConfig {
        &self.config
    }

    /// Validate a full story payload
    #[must_use]
    pub fn validate_story(&self, raw: &Value) -> ValidationResult<StoryResponse> {
        self.validate_story_detailed(raw).result
    }

    /// Validate a full story payload, also returning dropped trait entries
    #[must_use]
    pub fn validate_story_detailed(&self, raw: &Value) -> StoryValidation {
        let (prepared, dropped) = prepare_story(raw);

        let mut walk = Walk::new(&self.config);
        let story = walk.story(&prepared);
        let result = ValidationResult::from_parts(story, walk.errors);

        record_run("story", &result);
        StoryValidation { result, dropped }
    }

    /// Validate a single chapter in isolation
    ///
    /// Paths are relative to the chapter (`["imageDescription"]`).
    #[must_use]
    pub fn validate_chapter(&self, raw: &Value) -> ValidationResult<Chapter> {
        let mut walk = Walk::new(&self.config);
        let chapter = walk.chapter(raw);
        let result = ValidationResult::from_parts(chapter, walk.errors);

        record_run("chapter", &result);
        result
    }

    /// Validate a list of developments in isolation, normalizing first
    ///
    /// Paths start at the list index (`["0", "changedTraits", "1", "change"]`).
    #[must_use]
    pub fn validate_avatar_developments(&self, raw: &[Value]) -> ValidationResult<Vec<AvatarDevelopment>> {
        let normalized = normalize_developments(raw);

        let mut walk = Walk::new(&self.config);
        let developments = walk.development_items(&normalized.developments);
        let result = ValidationResult::from_parts(developments, walk.errors);

        record_run("avatar_developments", &result);
        result
    }
}

/// Validate a story with default limits
#[must_use]
pub fn validate_story_response(raw: &Value) -> ValidationResult<StoryResponse> {
    StoryValidator::default().validate_story(raw)
}

/// Validate one chapter with default limits
#[must_use]
pub fn validate_chapter(raw: &Value) -> ValidationResult<Chapter> {
    StoryValidator::default().validate_chapter(raw)
}

/// Validate developments with default limits
#[must_use]
pub fn validate_avatar_developments(raw: &[Value]) -> ValidationResult<Vec<AvatarDevelopment>> {
    StoryValidator::default().validate_avatar_developments(raw)
}

/// Copy of the payload with `avatarDevelopments` normalized
fn prepare_story(raw: &Value) -> (Value, Vec<DroppedTrait>) {
    let mut prepared = raw.clone();
    let mut dropped = Vec::new();
    if let Some(Value::Array(developments)) = prepared.get_mut("avatarDevelopments") {
        let normalized = normalize_developments(developments);
        *developments = normalized.developments;
        dropped = normalized.dropped;
    }
    (prepared, dropped)
}

fn record_run<T>(kind: &'static str, result: &ValidationResult<T>) {
    let outcome = if result.is_valid() { "valid" } else { "invalid" };
    tracing::debug!(kind, outcome, errors = result.errors().len(), "validation finished");
    metrics::counter!(RUNS_COUNTER, "kind" => kind, "outcome" => outcome).increment(1);
}

/// Is this value an absent image description?
pub(crate) fn is_missing_description(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::String(text)) => text.trim().is_empty(),
        Some(_) => false,
    }
}

/// Path-tracking visitor; each method returns `None` once it has recorded an error
struct Walk<'c> {
    config: &'c ValidationConfig,
    path: Vec<String>,
    errors: Vec<ValidationError>,
}

impl<'c> Walk<'c> {
    fn new(config: &'c ValidationConfig) -> Self {
        Self {
            config,
            path: Vec::new(),
            errors: Vec::new(),
        }
    }

    fn fail(&mut self, code: ErrorCode, message: impl Into<String>) {
        self.errors.push(ValidationError::new(self.path.clone(), code, message));
    }

    fn within<R>(&mut self, segment: impl ToString, f: impl FnOnce(&mut Self) -> R) -> R {
        self.path.push(segment.to_string());
        let out = f(self);
        self.path.pop();
        out
    }

    fn type_mismatch(&mut self, expected: &str, found: &Value) {
        self.fail(
            ErrorCode::InvalidType,
            format!("Expected {expected}, received {}", json_kind(found)),
        );
    }

    // --- primitives -------------------------------------------------------

    fn object<'v>(&mut self, value: &'v Value) -> Option<&'v Object> {
        match value {
            Value::Object(obj) => Some(obj),
            other => {
                self.type_mismatch("object", other);
                None
            }
        }
    }

    fn string(&mut self, value: &Value, min: usize, max: Option<usize>) -> Option<String> {
        let Value::String(text) = value else {
            self.type_mismatch("string", value);
            return None;
        };
        let len = text.chars().count();
        if len < min {
            self.fail(
                ErrorCode::TooSmall,
                format!("String must contain at least {min} character(s)"),
            );
            return None;
        }
        if let Some(max) = max.filter(|max| len > *max) {
            self.fail(
                ErrorCode::TooBig,
                format!("String must contain at most {max} character(s)"),
            );
            return None;
        }
        Some(text.clone())
    }

    fn integer(&mut self, value: &Value, min: Option<i64>, max: Option<i64>) -> Option<i64> {
        let Value::Number(number) = value else {
            self.type_mismatch("number", value);
            return None;
        };
        let whole = match (number.as_i64(), number.as_f64()) {
            (Some(n), _) => Some(n),
            (None, Some(f)) if f.is_finite() && f.fract() == 0.0 => Some(f as i64),
            _ => None,
        };
        let Some(n) = whole else {
            self.fail(ErrorCode::InvalidType, "Expected integer, received float");
            return None;
        };
        if let Some(min) = min.filter(|min| n < *min) {
            self.fail(
                ErrorCode::TooSmall,
                format!("Number must be greater than or equal to {min}"),
            );
            return None;
        }
        if let Some(max) = max.filter(|max| n > *max) {
            self.fail(
                ErrorCode::TooBig,
                format!("Number must be less than or equal to {max}"),
            );
            return None;
        }
        Some(n)
    }

    fn array<'v>(&mut self, value: &'v Value, min: usize, max: Option<usize>) -> Option<&'v [Value]> {
        let Value::Array(items) = value else {
            self.type_mismatch("array", value);
            return None;
        };
        if items.len() < min {
            self.fail(
                ErrorCode::TooSmall,
                format!("Array must contain at least {min} element(s)"),
            );
        } else if let Some(max) = max.filter(|max| items.len() > *max) {
            self.fail(
                ErrorCode::TooBig,
                format!("Array must contain at most {max} element(s)"),
            );
        }
        // Elements are still walked so their own errors are reported too.
        Some(items)
    }

    /// Required field; missing records `invalid_type` "Required"
    fn required<'v>(&mut self, obj: &'v Object, key: &str) -> Option<&'v Value> {
        let value = obj.get(key);
        if value.is_none() {
            self.within(key, |w| w.fail(ErrorCode::InvalidType, "Required"));
        }
        value
    }

    fn required_string(&mut self, obj: &Object, key: &str, min: usize, max: Option<usize>) -> Option<String> {
        let value = self.required(obj, key)?;
        self.within(key, |w| w.string(value, min, max))
    }

    /// Optional string; absent or null is `Some(None)`, a bad value is `None`
    fn optional_string(&mut self, obj: &Object, key: &str) -> Option<Option<String>> {
        match obj.get(key) {
            None | Some(Value::Null) => Some(None),
            Some(value) => self.within(key, |w| w.string(value, 0, None)).map(Some),
        }
    }

    /// Optional field walked by `f`; absent or null is `Some(None)`
    fn optional<T>(
        &mut self,
        obj: &Object,
        key: &str,
        f: impl FnOnce(&mut Self, &Value) -> Option<T>,
    ) -> Option<Option<T>> {
        match obj.get(key) {
            None | Some(Value::Null) => Some(None),
            Some(value) => self.within(key, |w| f(w, value)).map(Some),
        }
    }

    /// Walk each element under its index; `None` if any element failed
    fn each<T>(&mut self, items: &[Value], mut f: impl FnMut(&mut Self, &Value) -> Option<T>) -> Option<Vec<T>> {
        let mut out = Vec::with_capacity(items.len());
        let mut ok = true;
        for (index, item) in items.iter().enumerate() {
            match self.within(index, |w| f(w, item)) {
                Some(value) => out.push(value),
                None => ok = false,
            }
        }
        ok.then_some(out)
    }

    /// `string | T`
    fn described<T>(
        &mut self,
        value: &Value,
        text_min: usize,
        structured: impl FnOnce(&mut Self, &Object) -> Option<T>,
    ) -> Option<Described<T>> {
        match value {
            Value::String(_) => self.string(value, text_min, None).map(Described::Text),
            Value::Object(obj) => structured(self, obj).map(Described::Structured),
            other => {
                self.type_mismatch("string or object", other);
                None
            }
        }
    }

    // --- story ------------------------------------------------------------

    fn story(&mut self, value: &Value) -> Option<StoryResponse> {
        let obj = self.object(value)?;
        let c = self.config;

        let title = self.required_string(obj, "title", c.title_min, Some(c.title_max));
        let description =
            self.required_string(obj, "description", c.description_min, Some(c.description_max));
        let chapters = self.required(obj, "chapters").and_then(|value| {
            self.within("chapters", |w| {
                let items = w.array(value, c.min_chapters, Some(c.max_chapters))?;
                let chapters = w.each(items, Self::chapter)?;
                let count_ok = (c.min_chapters..=c.max_chapters).contains(&chapters.len());
                count_ok.then_some(chapters)
            })
        });
        let cover = self
            .required(obj, "coverImageDescription")
            .and_then(|value| self.within("coverImageDescription", |w| w.cover(value)));
        let developments = self.required(obj, "avatarDevelopments").and_then(|value| {
            self.within("avatarDevelopments", |w| {
                let items = w.array(value, 0, None)?;
                w.development_items(items)
            })
        });
        let outcomes = self.optional(obj, "learningOutcomes", |w, value| {
            let items = w.array(value, 0, None)?;
            w.each(items, Self::learning_outcome)
        });

        Some(StoryResponse {
            title: title?,
            description: description?,
            chapters: chapters?,
            cover_image_description: cover?,
            avatar_developments: developments?,
            learning_outcomes: outcomes?,
        })
    }

    fn chapter(&mut self, value: &Value) -> Option<Chapter> {
        let obj = self.object(value)?;
        let c = self.config;

        let title = self.required_string(obj, "title", c.chapter_title_min, None);
        let content = self.required_string(obj, "content", c.chapter_content_min, None);
        let order = self.required(obj, "order").and_then(|value| {
            self.within("order", |w| w.integer(value, Some(0), Some(i64::from(u32::MAX))))
        });
        let image = self.within("imageDescription", |w| w.image_description(obj.get("imageDescription")));

        Some(Chapter {
            title: title?,
            content: content?,
            order: u32::try_from(order?).ok()?,
            image_description: image?,
        })
    }

    fn image_description(&mut self, value: Option<&Value>) -> Option<ImageDescription> {
        if is_missing_description(value) {
            self.fail(
                ErrorCode::MissingImageDescription,
                "Chapter is missing an image description",
            );
            return None;
        }
        let value = value?;
        let min = self.config.image_description_min;
        self.described(value, min, |w, obj| {
            let scene = w.required_string(obj, "scene", min, None);
            let characters = w.optional(obj, "characters", Self::characters);
            let environment = w.optional(obj, "environment", Self::environment);
            let composition = w.optional(obj, "composition", Self::composition);
            Some(SceneDescription {
                scene: scene?,
                characters: characters?,
                environment: environment?,
                composition: composition?,
            })
        })
    }

    fn cover(&mut self, value: &Value) -> Option<CoverImageDescription> {
        let min = self.config.image_description_min;
        self.described(value, min, |w, obj| {
            let main_scene = w.required_string(obj, "mainScene", min, None);
            let characters = w.optional(obj, "characters", Self::characters);
            let environment = w.optional(obj, "environment", Self::environment);
            let art_style = w.optional_string(obj, "artStyle");
            let color_palette = w.optional_string(obj, "colorPalette");
            Some(CoverScene {
                main_scene: main_scene?,
                characters: characters?,
                environment: environment?,
                art_style: art_style?,
                color_palette: color_palette?,
            })
        })
    }

    fn characters(&mut self, value: &Value) -> Option<Described<CharacterMap>> {
        self.described(value, 1, |w, obj| {
            let mut map = CharacterMap::with_capacity(obj.len());
            let mut ok = true;
            for (name, details) in obj {
                let entry = w.within(name, |w| {
                    if name.trim().is_empty() {
                        w.fail(ErrorCode::Custom, "Character name must not be empty");
                        return None;
                    }
                    w.described(details, 1, |w, fields| {
                        let expression = w.optional_string(fields, "expression");
                        let action = w.optional_string(fields, "action");
                        let position = w.optional_string(fields, "position");
                        let clothing = w.optional_string(fields, "clothing");
                        Some(CharacterDetails {
                            expression: expression?,
                            action: action?,
                            position: position?,
                            clothing: clothing?,
                        })
                    })
                });
                match entry {
                    Some(entry) => {
                        map.insert(name.clone(), entry);
                    }
                    None => ok = false,
                }
            }
            ok.then_some(map)
        })
    }

    fn environment(&mut self, value: &Value) -> Option<Described<EnvironmentDetails>> {
        self.described(value, 1, |w, obj| {
            let setting = w.required_string(obj, "setting", 1, None);
            let lighting = w.optional_string(obj, "lighting");
            let atmosphere = w.optional_string(obj, "atmosphere");
            let objects = w.optional(obj, "objects", |w, value| {
                let items = w.array(value, 0, None)?;
                w.each(items, |w, item| w.string(item, 1, None))
            });
            Some(EnvironmentDetails {
                setting: setting?,
                lighting: lighting?,
                atmosphere: atmosphere?,
                objects: objects?,
            })
        })
    }

    fn composition(&mut self, value: &Value) -> Option<Described<CompositionDetails>> {
        self.described(value, 1, |w, obj| {
            let foreground = w.optional_string(obj, "foreground");
            let background = w.optional_string(obj, "background");
            let focus = w.optional_string(obj, "focus");
            let camera_angle = w.optional_string(obj, "cameraAngle");
            Some(CompositionDetails {
                foreground: foreground?,
                background: background?,
                focus: focus?,
                camera_angle: camera_angle?,
            })
        })
    }

    // --- developments -----------------------------------------------------

    fn development_items(&mut self, items: &[Value]) -> Option<Vec<AvatarDevelopment>> {
        self.each(items, Self::development)
    }

    fn development(&mut self, value: &Value) -> Option<AvatarDevelopment> {
        let obj = self.object(value)?;

        let name = self.required_string(obj, "name", 1, None);
        let changed = self.required(obj, "changedTraits").and_then(|value| {
            self.within("changedTraits", |w| {
                let items = w.array(value, 0, None)?;
                w.each(items, Self::trait_change)
            })
        });

        Some(AvatarDevelopment {
            name: name?,
            changed_traits: changed?,
        })
    }

    fn trait_change(&mut self, value: &Value) -> Option<TraitChange> {
        let obj = self.object(value)?;
        let limit = self.config.max_trait_change;

        let trait_id = self.required(obj, "trait").and_then(|value| {
            self.within("trait", |w| {
                let name = w.string(value, 1, None)?;
                let id = TraitId::from_canonical(&name);
                if id.is_none() {
                    w.fail(ErrorCode::Custom, format!("Unknown trait '{name}'"));
                }
                id
            })
        });
        let change = self
            .required(obj, "change")
            .and_then(|value| self.within("change", |w| w.integer(value, Some(-limit), Some(limit))));
        let original_trait = self.optional_string(obj, "originalTrait");

        Some(TraitChange {
            trait_id: trait_id?,
            change: change?,
            original_trait: original_trait?,
        })
    }

    fn learning_outcome(&mut self, value: &Value) -> Option<LearningOutcome> {
        let obj = self.object(value)?;
        let min = self.config.outcome_description_min;

        let category = self.required_string(obj, "category", 1, None);
        let description = self.required_string(obj, "description", min, None);

        Some(LearningOutcome {
            category: category?,
            description: description?,
        })
    }
}
