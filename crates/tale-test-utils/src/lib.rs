//! Testing utilities for the Tale Guard workspace
//!
//! Shared payload fixtures. Every builder returns raw JSON so tests can
//! mutate fields into invalid shapes before validating.

#![allow(missing_docs)]

use serde_json::{json, Value};

pub const CHAPTER_CONTENT: &str =
    "Mia packed her lantern, waved goodbye to the village, and followed the silver river into the hills.";

pub fn chapter(order: usize) -> Value {
    json!({
        "title": format!("Chapter {}", order + 1),
        "content": CHAPTER_CONTENT,
        "order": order,
        "imageDescription": {
            "scene": format!("Mia on the riverbank, moment {}", order + 1),
            "characters": {"Mia": {"expression": "curious", "action": "walking"}},
            "environment": "misty hills at sunrise"
        }
    })
}

pub fn chapters(count: usize) -> Vec<Value> {
    (0..count).map(chapter).collect()
}

pub fn cover() -> Value {
    json!({
        "mainScene": "Mia and her fox friend looking over the silver river",
        "artStyle": "watercolor",
        "colorPalette": "soft blues and greens"
    })
}

pub fn development() -> Value {
    json!({
        "name": "Mia",
        "changedTraits": [
            {"trait": "courage", "change": 5},
            {"trait": "knowledge.geography", "change": 3}
        ]
    })
}

/// Valid story with `chapter_count` chapters
pub fn story_with_chapters(chapter_count: usize) -> Value {
    json!({
        "title": "The Silver River",
        "description": "Mia follows a river into the hills and learns to trust herself.",
        "chapters": chapters(chapter_count),
        "coverImageDescription": cover(),
        "avatarDevelopments": [development()],
        "learningOutcomes": [
            {"category": "geography", "description": "Rivers flow from hills down to the sea."}
        ]
    })
}

/// Valid three-chapter story
pub fn valid_story() -> Value {
    story_with_chapters(3)
}

/// Remove a top-level or nested object key addressed by `path`
pub fn remove_at(value: &mut Value, path: &[&str]) {
    let Some((last, parents)) = path.split_last() else {
        return;
    };
    let mut current = value;
    for segment in parents {
        current = match current {
            Value::Object(map) => match map.get_mut(*segment) {
                Some(next) => next,
                None => return,
            },
            Value::Array(items) => match segment.parse::<usize>().ok().and_then(|i| items.get_mut(i)) {
                Some(next) => next,
                None => return,
            },
            _ => return,
        };
    }
    if let Value::Object(map) = current {
        map.remove(*last);
    }
}
