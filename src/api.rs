//! Request boundary: the JSON request/response contract of `POST /process`.
//!
//! Transport wiring (server, routing) lives outside this crate; this module
//! owns the shape of the exchange so any HTTP layer can delegate to
//! [`handle_process`] and pass the status code + body through unchanged.
//!
//! - `400 { success: false, error }` for malformed JSON, a missing/unknown
//!   `type`, or missing/empty `content`.
//! - `500 { success: false, error }` when an abort-class stage fails.
//! - `200 { success: true, post }` otherwise; degraded image/publish results
//!   are still `200`, carrying a non-published status label.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{info, warn};

use crate::config::PipelineConfig;
use crate::contract::{
    AnalysisCapability, ImageCapability, InputItem, InputKind, PipelineError, ProcessedPost,
    PublishCapability, SelectionPolicy,
};
use crate::process;

/// Wire shape of the process request body.
///
/// Both fields are optional at the serde level so that a missing field is
/// reported as a client error, not a deserialization failure.
#[derive(Debug, Deserialize)]
pub struct ProcessRequest {
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub content: Option<String>,
}

/// Wire shape of a processed post.
#[derive(Debug, Serialize)]
pub struct PostView {
    pub id: String,
    pub title: String,
    /// Truncated body preview, not the full article.
    pub content: String,
    #[serde(rename = "imageUrl")]
    pub image_url: String,
    /// Human-readable status label.
    pub status: String,
    /// Locale-style local timestamp.
    pub timestamp: String,
}

impl From<ProcessedPost> for PostView {
    fn from(post: ProcessedPost) -> Self {
        PostView {
            id: post.id,
            title: post.title,
            content: post.content_preview,
            image_url: post.image.0,
            status: post.outcome.label().to_string(),
            timestamp: post.produced_at.format("%d/%m/%Y %H:%M:%S").to_string(),
        }
    }
}

/// Handles one process request, returning the HTTP status code and JSON
/// body a transport layer should respond with.
pub async fn handle_process<A, I, P>(
    config: &PipelineConfig,
    topic_policy: &dyn SelectionPolicy,
    analysis: &A,
    images: &I,
    target: &P,
    body: &str,
) -> (u16, Value)
where
    A: AnalysisCapability + ?Sized,
    I: ImageCapability + ?Sized,
    P: PublishCapability + ?Sized,
{
    let item = match parse_request(body) {
        Ok(item) => item,
        Err(message) => {
            warn!(error = %message, "Rejected process request");
            return (400, error_body(&message));
        }
    };

    match process::process_item(config, topic_policy, analysis, images, target, item).await {
        Ok(post) => {
            info!(id = %post.id, "Returning processed post");
            (200, json!({ "success": true, "post": PostView::from(post) }))
        }
        Err(PipelineError::Validation(message)) => {
            warn!(error = %message, "Rejected process request");
            (400, error_body(&message))
        }
        Err(err) => {
            // Abort-class failure past validation: analysis or internal.
            warn!(error = %err, "Process request failed");
            (500, error_body("failed to process the request"))
        }
    }
}

fn parse_request(body: &str) -> Result<InputItem, String> {
    let request: ProcessRequest =
        serde_json::from_str(body).map_err(|e| format!("invalid request body: {e}"))?;
    let kind = request.kind.ok_or("content and type are required")?;
    let content = request.content.ok_or("content and type are required")?;
    let kind: InputKind = serde_json::from_value(Value::String(kind.clone()))
        .map_err(|_| format!("unrecognized input type: {kind}"))?;
    Ok(InputItem { kind, content })
}

fn error_body(message: &str) -> Value {
    json!({ "success": false, "error": message })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_accepts_the_three_wire_kinds() {
        for (wire, kind) in [
            ("text", InputKind::Text),
            ("voice", InputKind::Voice),
            ("link", InputKind::Link),
        ] {
            let body = format!(r#"{{"type":"{wire}","content":"hello"}}"#);
            let item = parse_request(&body).unwrap();
            assert_eq!(item.kind, kind);
            assert_eq!(item.content, "hello");
        }
    }

    #[test]
    fn parse_rejects_missing_fields() {
        assert!(parse_request(r#"{"content":"hello"}"#).is_err());
        assert!(parse_request(r#"{"type":"text"}"#).is_err());
        assert!(parse_request("{}").is_err());
    }

    #[test]
    fn parse_rejects_unknown_kind_and_malformed_json() {
        assert!(parse_request(r#"{"type":"video","content":"x"}"#).is_err());
        assert!(parse_request("not json").is_err());
    }
}
