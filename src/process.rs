//! High-level pipeline: orchestrates validate → analyze → compose →
//! illustrate → publish for a single content item.
//!
//! This module provides the top-level orchestration for processing one item
//! into a [`ProcessedPost`]. It implements a coordinated pipeline that:
//!   - Validates the raw item (empty content is rejected up front)
//!   - Normalizes the content through the analysis capability
//!   - Composes a structured markdown article with a policy-selected topic
//!   - Selects an illustrative image and submits the article for publishing
//!   - Assembles the single result record returned to the caller.
//!
//! # Failure policy
//! Stage failures are asymmetric by design. Failures while validating,
//! analyzing or composing abort the run with a typed error and no partial
//! result. Failures while selecting an image or publishing degrade instead:
//! by then a coherent article exists, so the run completes with a placeholder
//! image and/or a `Failed` outcome rather than discarding the article.
//!
//! # Concurrency
//! One invocation processes exactly one item; stages run strictly
//! sequentially and share nothing with concurrent invocations. Every
//! external call is bounded by the configured stage timeout, and
//! cancellation is cooperative at each `.await` boundary.
//!
//! # Callable from
//! - The request boundary in [`crate::api`]
//! - The CLI entrypoint and integration tests, with mock capabilities.

use tracing::{info, warn};
use uuid::Uuid;

use crate::config::PipelineConfig;
use crate::contract::{
    AnalysisCapability, ImageCapability, ImageRef, InputItem, PipelineError, ProcessedPost,
    PublishCapability, PublishOutcome, SelectionPolicy,
};
use crate::{analyze, compose, illustrate, publish, validate};

/// Pipeline stage, in execution order. Drives log context and marks where a
/// run ended up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Validating,
    Analyzing,
    Composing,
    Selecting,
    Publishing,
    Done,
    Aborted,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Validating => "validating",
            Stage::Analyzing => "analyzing",
            Stage::Composing => "composing",
            Stage::Selecting => "selecting",
            Stage::Publishing => "publishing",
            Stage::Done => "done",
            Stage::Aborted => "aborted",
        }
    }
}

/// Processes one content item end to end.
///
/// Returns the assembled [`ProcessedPost`] on success (possibly degraded),
/// or the typed error of the aborting stage.
pub async fn process_item<A, I, P>(
    config: &PipelineConfig,
    topic_policy: &dyn SelectionPolicy,
    analysis: &A,
    images: &I,
    target: &P,
    item: InputItem,
) -> Result<ProcessedPost, PipelineError>
where
    A: AnalysisCapability + ?Sized,
    I: ImageCapability + ?Sized,
    P: PublishCapability + ?Sized,
{
    let kind = item.kind;
    info!(kind = kind.as_str(), stage = Stage::Validating.as_str(), "Pipeline run starting");

    let item = validate::validate(item).map_err(|e| abort(Stage::Validating, kind, e))?;

    let analyzed = analyze::run(analysis, &item, config.stage_timeout)
        .await
        .map_err(|e| abort(Stage::Analyzing, kind, e))?;

    let article = compose::compose(config, topic_policy, &analyzed)
        .map_err(|e| abort(Stage::Composing, kind, e))?;

    // From here on a coherent article exists; failures degrade instead of
    // aborting.
    let image = match illustrate::run(images, &article.title, config.stage_timeout).await {
        Ok(image) => image,
        Err(e) => {
            warn!(
                stage = Stage::Selecting.as_str(),
                kind = kind.as_str(),
                error = %e,
                "Degrading to placeholder image"
            );
            ImageRef(config.placeholder_image.clone())
        }
    };

    let outcome = match publish::run(target, &article, &image, config.stage_timeout).await {
        Ok(outcome) => outcome,
        Err(e) => {
            warn!(
                stage = Stage::Publishing.as_str(),
                kind = kind.as_str(),
                error = %e,
                "Publish failed, returning article with Failed outcome"
            );
            PublishOutcome::Failed
        }
    };

    let post = ProcessedPost {
        id: Uuid::new_v4().to_string(),
        title: article.title,
        content_preview: truncate_preview(&article.body, config.preview_chars),
        image,
        outcome,
        produced_at: chrono::Local::now(),
    };
    info!(
        stage = Stage::Done.as_str(),
        id = %post.id,
        outcome = post.outcome.label(),
        "Pipeline run completed"
    );
    Ok(post)
}

fn abort(stage: Stage, kind: crate::contract::InputKind, err: PipelineError) -> PipelineError {
    warn!(
        stage = stage.as_str(),
        kind = kind.as_str(),
        to = Stage::Aborted.as_str(),
        error = %err,
        "Pipeline run aborted"
    );
    err
}

/// Truncates a body for display: at most `limit` characters, with an
/// ellipsis appended when anything was cut. Char-boundary safe.
pub fn truncate_preview(body: &str, limit: usize) -> String {
    if body.chars().count() <= limit {
        body.to_string()
    } else {
        let mut preview: String = body.chars().take(limit).collect();
        preview.push_str("...");
        preview
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_body_is_untouched() {
        assert_eq!(truncate_preview("short", 200), "short");
    }

    #[test]
    fn long_body_is_cut_to_limit_plus_ellipsis() {
        let body = "x".repeat(500);
        let preview = truncate_preview(&body, 200);
        assert_eq!(preview.chars().count(), 203);
        assert!(preview.ends_with("..."));
    }

    #[test]
    fn truncation_respects_multibyte_boundaries() {
        let body = "ß".repeat(300);
        let preview = truncate_preview(&body, 200);
        assert!(preview.starts_with(&"ß".repeat(200)));
        assert!(preview.ends_with("..."));
    }

    #[test]
    fn exact_limit_gets_no_ellipsis() {
        let body = "y".repeat(200);
        assert_eq!(truncate_preview(&body, 200), body);
    }
}
