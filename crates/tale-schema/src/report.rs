//! Validation report
//!
//! Layers quality heuristics over the structural validator. Hard errors block
//! acceptance; warnings are informational. A chapter without an image
//! description is both: image generation cannot run without it.

use crate::config::ValidationConfig;
use crate::error::{ErrorCode, ValidationError};
use crate::validator::{is_missing_description, StoryValidator};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tale_traits::{DropReason, DroppedTrait};

const STRUCTURE_FIELDS: [&str; 3] = ["title", "description", "coverImageDescription"];

/// Combined structural and heuristic verdict on a story payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationReport {
    /// No hard errors at all
    pub overall: bool,
    /// Title, description and cover description are valid
    pub story_structure: bool,
    /// Chapter list and every chapter are valid
    pub chapters: bool,
    /// Avatar developments are valid
    pub avatar_developments: bool,
    /// Learning outcomes are valid (or absent)
    pub learning_outcomes: bool,
    /// Hard errors
    pub errors: Vec<ValidationError>,
    /// Soft findings
    pub warnings: Vec<String>,
}

impl ValidationReport {
    fn from_findings(errors: Vec<ValidationError>, warnings: Vec<String>) -> Self {
        let root_failed = errors.iter().any(|e| e.path.is_empty());
        let facet_ok = |matches: &dyn Fn(&str) -> bool| {
            !root_failed && !errors.iter().any(|e| e.root().is_some_and(matches))
        };

        Self {
            overall: errors.is_empty(),
            story_structure: facet_ok(&|root: &str| STRUCTURE_FIELDS.contains(&root)),
            chapters: facet_ok(&|root: &str| root == "chapters"),
            avatar_developments: facet_ok(&|root: &str| root == "avatarDevelopments"),
            learning_outcomes: facet_ok(&|root: &str| root == "learningOutcomes"),
            errors,
            warnings,
        }
    }

    /// Errors with a given code
    pub fn errors_with_code(&self, code: ErrorCode) -> impl Iterator<Item = &ValidationError> {
        self.errors.iter().filter(move |e| e.code == code)
    }
}

/// Builds [`ValidationReport`]s
#[derive(Debug, Clone, Default)]
pub struct ReportBuilder {
    validator: StoryValidator,
}

impl ReportBuilder {
    /// Create builder with custom limits
    #[inline]
    #[must_use]
    pub fn new(config: ValidationConfig) -> Self {
        Self {
            validator: StoryValidator::new(config),
        }
    }

    /// Validate `raw` and evaluate heuristics
    #[must_use]
    pub fn build(&self, raw: &Value) -> ValidationReport {
        let detailed = self.validator.validate_story_detailed(raw);
        let mut errors = detailed.result.errors().to_vec();
        let mut warnings = Vec::new();

        if let Value::Object(story) = raw {
            self.check_chapters(story.get("chapters"), &mut errors, &mut warnings);
            check_developments(story.get("avatarDevelopments"), &mut warnings);
        }
        warnings.extend(detailed.dropped.iter().map(dropped_warning));

        let report = ValidationReport::from_findings(errors, warnings);
        tracing::debug!(
            overall = report.overall,
            errors = report.errors.len(),
            warnings = report.warnings.len(),
            "validation report built"
        );
        report
    }

    fn check_chapters(
        &self,
        chapters: Option<&Value>,
        errors: &mut Vec<ValidationError>,
        warnings: &mut Vec<String>,
    ) {
        let Some(Value::Array(chapters)) = chapters else {
            return;
        };

        let recommended = self.validator.config().recommended_min_chapters;
        if chapters.len() < recommended {
            warnings.push(format!(
                "Story has {} chapter(s); at least {recommended} are recommended",
                chapters.len()
            ));
        }

        for (index, chapter) in chapters.iter().enumerate() {
            let Value::Object(chapter) = chapter else {
                continue;
            };
            if !is_missing_description(chapter.get("imageDescription")) {
                continue;
            }
            warnings.push(format!("Chapter {} is missing an image description", index + 1));
            let escalated = ValidationError::missing_image_description(index);
            let already = errors
                .iter()
                .any(|e| e.code == escalated.code && e.path == escalated.path);
            if !already {
                errors.push(escalated);
            }
        }
    }
}

fn check_developments(developments: Option<&Value>, warnings: &mut Vec<String>) {
    let empty = match developments {
        Some(Value::Array(items)) => items.is_empty(),
        Some(_) => false,
        None => true,
    };
    if empty {
        warnings.push("No avatar developments; the story records no character growth".to_string());
    }
}

fn dropped_warning(dropped: &DroppedTrait) -> String {
    let location = dropped
        .development
        .map(|i| format!(" in avatarDevelopments[{i}]"))
        .unwrap_or_default();
    match dropped.reason {
        DropReason::Unresolvable => {
            format!("Dropped unknown trait '{}'{location}", dropped.trait_name)
        }
        DropReason::Malformed => {
            format!("Dropped malformed trait entry '{}'{location}", dropped.trait_name)
        }
    }
}

/// Build a report with default limits
#[must_use]
pub fn build_report(raw: &Value) -> ValidationReport {
    ReportBuilder::default().build(raw)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn non_object_fails_every_facet() {
        let report = build_report(&json!("story"));
        assert!(!report.overall);
        assert!(!report.story_structure);
        assert!(!report.chapters);
        assert!(!report.avatar_developments);
        assert!(!report.learning_outcomes);
        assert!(report.warnings.is_empty());
    }

    #[test]
    fn facets_follow_error_roots() {
        let errors = vec![
            ValidationError::at(&["coverImageDescription"], ErrorCode::InvalidType, "Required"),
            ValidationError::at(&["learningOutcomes", "0", "category"], ErrorCode::InvalidType, "Required"),
        ];
        let report = ValidationReport::from_findings(errors, Vec::new());

        assert!(!report.overall);
        assert!(!report.story_structure);
        assert!(report.chapters);
        assert!(report.avatar_developments);
        assert!(!report.learning_outcomes);
    }

    #[test]
    fn dropped_warning_mentions_location() {
        let dropped = DroppedTrait {
            trait_name: "warmth".into(),
            reason: DropReason::Unresolvable,
            development: Some(2),
        };
        assert_eq!(
            dropped_warning(&dropped),
            "Dropped unknown trait 'warmth' in avatarDevelopments[2]"
        );
    }

    #[test]
    fn serialized_field_names() {
        let report = ValidationReport::from_findings(Vec::new(), vec!["note".into()]);
        assert_eq!(
            serde_json::to_value(&report).unwrap(),
            json!({
                "overall": true,
                "storyStructure": true,
                "chapters": true,
                "avatarDevelopments": true,
                "learningOutcomes": true,
                "errors": [],
                "warnings": ["note"]
            })
        );
    }
}
