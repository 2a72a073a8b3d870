//! Tool dispatch
//!
//! [`ToolRegistry`] turns `(name, arguments)` into a JSON result. Apart from
//! rejected requests every call returns a value: validation failures are
//! `ValidationResult`s, and a panic inside the validator becomes a single
//! `UNKNOWN_ERROR` entry.

use crate::error::{ToolError, ToolResult};
use crate::tools::{DevelopmentsArgs, StoryArgs, ToolName, TraitUpdatesArgs};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::any::Any;
use std::panic::{catch_unwind, AssertUnwindSafe};
use tale_schema::{
    ReportBuilder, StoryValidator, ValidationConfig, ValidationError, ValidationResult,
};
use tale_traits::{normalize_change_values, NormalizedTraitChange};

/// Dispatches boundary calls against a fixed configuration
///
/// Stateless between calls; share it freely.
#[derive(Debug, Clone, Default)]
pub struct ToolRegistry {
    validator: StoryValidator,
    reports: ReportBuilder,
}

impl ToolRegistry {
    /// Create registry with custom limits
    #[must_use]
    pub fn new(config: ValidationConfig) -> Self {
        Self {
            validator: StoryValidator::new(config.clone()),
            reports: ReportBuilder::new(config),
        }
    }

    /// Limits in effect
    #[inline]
    #[must_use]
    pub fn config(&self) -> &ValidationConfig {
        self.validator.config()
    }

    /// Invoke a tool by wire name
    ///
    /// # Errors
    /// [`ToolError::UnknownTool`] for an unrecognized name and
    /// [`ToolError::InvalidRequest`] when the arguments lack the required field.
    pub fn call(&self, name: &str, arguments: Value) -> ToolResult<Value> {
        let tool: ToolName = name.parse()?;
        self.invoke(tool, arguments)
    }

    /// Invoke a known tool
    ///
    /// # Errors
    /// [`ToolError::InvalidRequest`] when the arguments lack the required field.
    pub fn invoke(&self, tool: ToolName, arguments: Value) -> ToolResult<Value> {
        tracing::debug!(tool = %tool, "tool call");
        match tool {
            ToolName::ValidateStoryResponse => {
                let args: StoryArgs = parse_args(tool, arguments)?;
                let story = Value::Object(args.story_data);
                Ok(guarded(|| self.validator.validate_story(&story)))
            }
            ToolName::ValidateAvatarDevelopments => {
                let args: DevelopmentsArgs = parse_args(tool, arguments)?;
                Ok(guarded(|| {
                    self.validator.validate_avatar_developments(&args.developments)
                }))
            }
            ToolName::NormalizeTraitUpdates => {
                let args: TraitUpdatesArgs = parse_args(tool, arguments)?;
                let updates = Value::Array(args.updates);
                Ok(guarded(|| normalize_updates(&updates)))
            }
            ToolName::GetValidationReport => {
                let args: StoryArgs = parse_args(tool, arguments)?;
                let story = Value::Object(args.story_data);
                Ok(report_value(&self.reports, &story))
            }
        }
    }
}

fn parse_args<T: DeserializeOwned>(tool: ToolName, arguments: Value) -> ToolResult<T> {
    serde_json::from_value(arguments).map_err(|e| ToolError::InvalidRequest {
        tool: tool.as_str(),
        reason: e.to_string(),
    })
}

fn normalize_updates(updates: &Value) -> ValidationResult<Vec<NormalizedTraitChange>> {
    match normalize_change_values(updates) {
        Ok(normalized) => ValidationResult::valid(normalized.changes),
        Err(err) => ValidationResult::invalid(vec![ValidationError::normalization(&err)]),
    }
}

/// Run `f`, converting panics and serialization failures into `UNKNOWN_ERROR`
fn guarded<T: Serialize>(f: impl FnOnce() -> ValidationResult<T>) -> Value {
    let result = catch_unwind(AssertUnwindSafe(f))
        .unwrap_or_else(|payload| unknown(panic_message(payload.as_ref())));
    serde_json::to_value(&result)
        .unwrap_or_else(|e| unknown_value(&format!("failed to encode result: {e}")))
}

fn report_value(reports: &ReportBuilder, story: &Value) -> Value {
    match catch_unwind(AssertUnwindSafe(|| reports.build(story))) {
        Ok(report) => serde_json::to_value(&report)
            .unwrap_or_else(|e| unknown_value(&format!("failed to encode report: {e}"))),
        Err(payload) => unknown_value(&panic_message(payload.as_ref())),
    }
}

fn unknown<T>(message: String) -> ValidationResult<T> {
    tracing::error!(%message, "validation aborted");
    ValidationResult::invalid(vec![ValidationError::unknown(message)])
}

fn unknown_value(message: &str) -> Value {
    let result: ValidationResult<Value> = unknown(message.to_string());
    serde_json::to_value(&result).unwrap_or(Value::Null)
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    payload
        .downcast_ref::<&str>()
        .map(|s| (*s).to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "validation panicked".to_string())
}
