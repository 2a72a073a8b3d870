//! Newline-delimited JSON tool server
//!
//! One request per line:
//!
//! ```text
//! {"id": 1, "tool": "validate_story_response", "arguments": {"storyData": {...}}}
//! ```
//!
//! One response per line, `{"id", "result"}` or `{"id", "error": {"kind", "message"}}`.
//! `{"tool": "list_tools"}` returns the tool descriptors. A bad line gets an
//! error response; the loop only ends at end of input.

use crate::registry::ToolRegistry;
use crate::tools::descriptors;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

/// Request name that lists the tool descriptors
pub const LIST_TOOLS: &str = "list_tools";

/// One protocol request
#[derive(Debug, Clone, Deserialize)]
pub struct Request {
    /// Echoed in the response
    #[serde(default)]
    pub id: Value,
    /// Tool wire name or [`LIST_TOOLS`]
    pub tool: String,
    /// Tool arguments
    #[serde(default)]
    pub arguments: Value,
}

/// One protocol response
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Response {
    /// Request id, `null` when the line could not be parsed
    pub id: Value,
    /// Tool output
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    /// Rejection
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorBody>,
}

/// Error part of a [`Response`]
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ErrorBody {
    /// `parse_error`, `unknown_tool` or `invalid_request`
    pub kind: &'static str,
    /// Description
    pub message: String,
}

impl Response {
    fn ok(id: Value, result: Value) -> Self {
        Self {
            id,
            result: Some(result),
            error: None,
        }
    }

    fn err(id: Value, kind: &'static str, message: String) -> Self {
        Self {
            id,
            result: None,
            error: Some(ErrorBody { kind, message }),
        }
    }
}

/// Totals for one server session
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ServeStats {
    /// Non-blank lines read
    pub requests: usize,
    /// Lines answered with an error
    pub errors: usize,
}

/// Answer a single request line
#[must_use]
pub fn handle_line(registry: &ToolRegistry, line: &str) -> Response {
    let request: Request = match serde_json::from_str(line) {
        Ok(request) => request,
        Err(e) => return Response::err(Value::Null, "parse_error", e.to_string()),
    };

    if request.tool == LIST_TOOLS {
        return match serde_json::to_value(descriptors()) {
            Ok(list) => Response::ok(request.id, list),
            Err(e) => Response::err(request.id, "parse_error", e.to_string()),
        };
    }

    match registry.call(&request.tool, request.arguments) {
        Ok(result) => Response::ok(request.id, result),
        Err(e) => {
            tracing::warn!(tool = %request.tool, error = %e, "request rejected");
            Response::err(request.id, e.kind(), e.to_string())
        }
    }
}

/// Serve requests from `reader` until end of input
///
/// # Errors
/// Only I/O failures on `reader` or `writer`.
pub async fn serve<R, W>(registry: &ToolRegistry, reader: R, mut writer: W) -> std::io::Result<ServeStats>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    tracing::info!("tool server started");
    let mut stats = ServeStats::default();
    let mut lines = reader.lines();

    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }
        stats.requests += 1;

        let response = handle_line(registry, &line);
        if response.error.is_some() {
            stats.errors += 1;
        }

        let mut encoded = serde_json::to_vec(&response).map_err(std::io::Error::other)?;
        encoded.push(b'\n');
        writer.write_all(&encoded).await?;
        writer.flush().await?;
    }

    tracing::info!(requests = stats.requests, errors = stats.errors, "tool server stopped");
    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn unparseable_line_has_null_id() {
        let response = handle_line(&ToolRegistry::default(), "{not json");
        assert_eq!(response.id, Value::Null);
        assert_eq!(response.error.map(|e| e.kind), Some("parse_error"));
    }

    #[test]
    fn list_tools_returns_descriptors() {
        let response = handle_line(&ToolRegistry::default(), r#"{"id": 7, "tool": "list_tools"}"#);
        assert_eq!(response.id, json!(7));
        assert_eq!(response.result.map(|r| r.as_array().map(Vec::len)), Some(Some(4)));
    }

    #[test]
    fn response_omits_absent_parts() {
        let response = Response::ok(json!("a"), json!({"isValid": true}));
        assert_eq!(
            serde_json::to_value(&response).unwrap(),
            json!({"id": "a", "result": {"isValid": true}})
        );
    }
}
