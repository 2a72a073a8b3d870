//! End-to-end checks of the story contract.
//!
//! Each test builds a payload from the shared fixtures, breaks it in one or
//! more specific ways, and asserts on the exact error paths and codes a repair
//! loop would branch on.

use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use tale_schema::{
    build_report, validate_story_response, Described, ErrorCode, ReportBuilder, ValidationConfig,
    ValidationError,
};
use tale_test_utils::{chapters, remove_at, story_with_chapters, valid_story};
use tale_traits::{BaseTrait, TraitId};

fn codes_at(errors: &[ValidationError]) -> Vec<(Vec<String>, ErrorCode)> {
    errors.iter().map(|e| (e.path.clone(), e.code)).collect()
}

fn path(segments: &[&str]) -> Vec<String> {
    segments.iter().map(|s| (*s).to_string()).collect()
}

#[test]
fn valid_story_normalizes() {
    let result = validate_story_response(&valid_story());
    assert!(result.is_valid(), "{:?}", result.errors());

    let story = result.normalized().unwrap();
    assert_eq!(story.chapters.len(), 3);
    assert_eq!(story.avatar_developments[0].changed_traits[0].trait_id, TraitId::Base(BaseTrait::Courage));
    assert!(matches!(story.cover_image_description, Described::Structured(_)));
}

#[test]
fn chapter_count_boundaries() {
    for (count, expected) in [(0, Some(ErrorCode::TooSmall)), (1, None), (20, None), (21, Some(ErrorCode::TooBig))] {
        let result = validate_story_response(&story_with_chapters(count));
        match expected {
            None => assert!(result.is_valid(), "{count} chapters: {:?}", result.errors()),
            Some(code) => assert_eq!(codes_at(result.errors()), vec![(path(&["chapters"]), code)], "{count} chapters"),
        }
    }
}

#[test]
fn map_form_development_is_canonical_in_output() {
    let mut story = valid_story();
    story["avatarDevelopments"] = json!([
        {"name": "Mia", "changedTraits": {"courage": {"before": 40, "after": 55}}}
    ]);

    // 15 exceeds the per-change limit, so validate the normalization under a wider limit.
    let validator = tale_schema::StoryValidator::new(ValidationConfig::new().with_max_trait_change(20));
    let result = validator.validate_story(&story);
    let normalized = serde_json::to_value(result.normalized().unwrap()).unwrap();

    assert_eq!(
        normalized["avatarDevelopments"],
        json!([{"name": "Mia", "changedTraits": [{"trait": "courage", "change": 15}]}])
    );
}

#[test]
fn trait_change_range_is_enforced_in_story() {
    for (change, code) in [(11, Some(ErrorCode::TooBig)), (-11, Some(ErrorCode::TooSmall)), (10, None), (-10, None)] {
        let mut story = valid_story();
        story["avatarDevelopments"][0]["changedTraits"][0]["change"] = json!(change);

        let result = validate_story_response(&story);
        match code {
            None => assert!(result.is_valid(), "change {change}"),
            Some(code) => assert_eq!(
                codes_at(result.errors()),
                vec![(path(&["avatarDevelopments", "0", "changedTraits", "0", "change"]), code)]
            ),
        }
    }
}

#[test]
fn missing_image_description_has_its_own_code() {
    let mut story = valid_story();
    remove_at(&mut story, &["chapters", "1", "imageDescription"]);

    let result = validate_story_response(&story);
    assert_eq!(
        codes_at(result.errors()),
        vec![(path(&["chapters", "1", "imageDescription"]), ErrorCode::MissingImageDescription)]
    );
}

#[test]
fn independent_violations_are_all_reported() {
    let mut story = valid_story();
    story["title"] = json!("Hi");
    story["chapters"] = json!([]);
    story["avatarDevelopments"][0]["changedTraits"][1]["change"] = json!(-11);

    let result = validate_story_response(&story);
    assert_eq!(
        codes_at(result.errors()),
        vec![
            (path(&["title"]), ErrorCode::TooSmall),
            (path(&["chapters"]), ErrorCode::TooSmall),
            (path(&["avatarDevelopments", "0", "changedTraits", "1", "change"]), ErrorCode::TooSmall),
        ]
    );
}

#[test]
fn unknown_traits_are_dropped_before_validation() {
    let mut story = valid_story();
    story["avatarDevelopments"][0]["changedTraits"] = json!([
        {"trait": "warmth", "change": 3},
        {"trait": "Tapferkeit", "change": 2}
    ]);

    let result = validate_story_response(&story);
    let changes = &result.normalized().unwrap().avatar_developments[0].changed_traits;
    assert_eq!(changes.len(), 1);
    assert_eq!(changes[0].trait_id, TraitId::Base(BaseTrait::Courage));
    assert_eq!(changes[0].original_trait.as_deref(), Some("Tapferkeit"));
}

#[test]
fn learning_outcomes_are_optional_but_checked() {
    let mut story = valid_story();
    remove_at(&mut story, &["learningOutcomes"]);
    assert!(validate_story_response(&story).is_valid());

    story["learningOutcomes"] = json!([{"category": "", "description": "short"}]);
    assert_eq!(
        codes_at(validate_story_response(&story).errors()),
        vec![
            (path(&["learningOutcomes", "0", "category"]), ErrorCode::TooSmall),
            (path(&["learningOutcomes", "0", "description"]), ErrorCode::TooSmall),
        ]
    );
}

#[test]
fn title_and_description_upper_bounds() {
    let mut story = valid_story();
    story["title"] = Value::String("t".repeat(101));
    story["description"] = Value::String("d".repeat(501));

    assert_eq!(
        codes_at(validate_story_response(&story).errors()),
        vec![(path(&["title"]), ErrorCode::TooBig), (path(&["description"]), ErrorCode::TooBig)]
    );
}

#[test]
fn report_sub_flags_are_independent() {
    let mut story = valid_story();
    story["coverImageDescription"] = json!({"artStyle": "watercolor"});

    let report = build_report(&story);
    assert!(!report.overall);
    assert!(!report.story_structure);
    assert!(report.chapters);
    assert!(report.avatar_developments);
    assert!(report.learning_outcomes);
}

#[test]
fn report_warnings_for_short_story_without_growth() {
    let mut story = story_with_chapters(2);
    story["avatarDevelopments"] = json!([]);

    let report = build_report(&story);
    assert!(report.overall, "{:?}", report.errors);
    assert_eq!(
        report.warnings,
        vec![
            "Story has 2 chapter(s); at least 3 are recommended".to_string(),
            "No avatar developments; the story records no character growth".to_string(),
        ]
    );
}

#[test]
fn report_escalates_missing_image_description_once() {
    let mut story = valid_story();
    story["chapters"] = Value::Array(chapters(4));
    remove_at(&mut story, &["chapters", "0", "imageDescription"]);
    story["chapters"][2]["imageDescription"] = json!("");

    let report = build_report(&story);
    let missing: Vec<_> = report
        .errors_with_code(ErrorCode::MissingImageDescription)
        .map(|e| e.path.clone())
        .collect();

    assert_eq!(
        missing,
        vec![path(&["chapters", "0", "imageDescription"]), path(&["chapters", "2", "imageDescription"])]
    );
    assert_eq!(report.errors.len(), 2);
    assert!(report.warnings.contains(&"Chapter 1 is missing an image description".to_string()));
    assert!(report.warnings.contains(&"Chapter 3 is missing an image description".to_string()));
    assert!(!report.chapters);
    assert!(report.story_structure);
}

#[test]
fn report_surfaces_dropped_traits_as_warnings() {
    let mut story = valid_story();
    story["avatarDevelopments"][0]["changedTraits"][0]["trait"] = json!("warmth");

    let report = build_report(&story);
    assert!(report.overall);
    assert_eq!(
        report.warnings,
        vec!["Dropped unknown trait 'warmth' in avatarDevelopments[0]".to_string()]
    );
}

#[test]
fn report_uses_configured_recommendation() {
    let builder = ReportBuilder::new(ValidationConfig::new().with_recommended_min_chapters(5));
    let report = builder.build(&valid_story());
    assert_eq!(report.warnings, vec!["Story has 3 chapter(s); at least 5 are recommended".to_string()]);
}

mod properties {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn change_is_valid_exactly_within_limit(change in -30i64..30) {
            let mut story = valid_story();
            story["avatarDevelopments"][0]["changedTraits"][0]["change"] = json!(change);
            prop_assert_eq!(validate_story_response(&story).is_valid(), change.abs() <= 10);
        }

        #[test]
        fn chapter_count_is_valid_exactly_within_bounds(count in 0usize..25) {
            let result = validate_story_response(&story_with_chapters(count));
            prop_assert_eq!(result.is_valid(), (1..=20).contains(&count));
        }

        #[test]
        fn validation_never_panics_on_arbitrary_titles(title in ".{0,120}") {
            let mut story = valid_story();
            story["title"] = json!(title);
            let _ = build_report(&story);
        }
    }
}
