//! Publish stage: submits a finished article and image to the publishing
//! target.
//!
//! This is the only stage with an externally observable, non-idempotent side
//! effect: each call is an at-most-once submission, and the target is not
//! assumed to deduplicate. [`StubPublisher`] simulates a target that always
//! accepts; [`HttpPublishTarget`] is the production wiring that POSTs the
//! article to a configured endpoint.

use std::time::Duration;

use async_trait::async_trait;
use tracing::{error, info};

use crate::config::PublishTargetConfig;
use crate::contract::{
    Article, CapabilityError, ImageRef, PipelineError, PublishCapability, PublishOutcome,
};

/// Runs the publish stage, bounded by the per-stage timeout. The error is
/// typed here; whether it aborts or degrades is the orchestrator's call.
pub async fn run<P>(
    target: &P,
    article: &Article,
    image: &ImageRef,
    timeout: Duration,
) -> Result<PublishOutcome, PipelineError>
where
    P: PublishCapability + ?Sized,
{
    let result = tokio::time::timeout(
        timeout,
        target.publish(&article.title, &article.body, image.as_str()),
    )
    .await;
    match result {
        Ok(Ok(outcome)) => {
            info!(title = %article.title, outcome = outcome.label(), "Publish submission completed");
            Ok(outcome)
        }
        Ok(Err(e)) => {
            error!(title = %article.title, error = ?e, "Publish target rejected or unreachable");
            Err(PipelineError::Publish(e.to_string()))
        }
        Err(_) => {
            error!(
                title = %article.title,
                timeout_ms = timeout.as_millis() as u64,
                "Publish target timed out"
            );
            Err(PipelineError::Publish("publish target timed out".to_string()))
        }
    }
}

/// Simulated publishing target that always reports success.
#[derive(Debug, Default)]
pub struct StubPublisher {
    /// Artificial latency to mimic a remote target.
    pub latency: Duration,
}

impl StubPublisher {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PublishCapability for StubPublisher {
    async fn publish(
        &self,
        _title: &str,
        _body: &str,
        _image_url: &str,
    ) -> Result<PublishOutcome, CapabilityError> {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        Ok(PublishOutcome::Published)
    }
}

/// Production publish target: POSTs the article as JSON to a configured
/// endpoint, optionally with a bearer token.
pub struct HttpPublishTarget {
    client: reqwest::Client,
    endpoint: String,
    token: Option<String>,
}

impl HttpPublishTarget {
    pub fn new(config: &PublishTargetConfig) -> Self {
        HttpPublishTarget {
            client: reqwest::Client::new(),
            endpoint: config.endpoint.clone(),
            token: config.token.clone(),
        }
    }
}

#[async_trait]
impl PublishCapability for HttpPublishTarget {
    async fn publish(
        &self,
        title: &str,
        body: &str,
        image_url: &str,
    ) -> Result<PublishOutcome, CapabilityError> {
        let payload = serde_json::json!({
            "title": title,
            "body": body,
            "imageUrl": image_url,
        });
        let mut request = self.client.post(&self.endpoint).json(&payload);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }
        let response = request.send().await?;
        outcome_for_status(response.status())
    }
}

/// Maps the publish endpoint's HTTP status to an outcome: 202 means the
/// target queued the post for moderation/scheduling, any other 2xx means it
/// went live, anything else is a rejection.
fn outcome_for_status(status: reqwest::StatusCode) -> Result<PublishOutcome, CapabilityError> {
    if status == reqwest::StatusCode::ACCEPTED {
        Ok(PublishOutcome::Pending)
    } else if status.is_success() {
        Ok(PublishOutcome::Published)
    } else {
        Err(format!("publish endpoint returned {status}").into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn article() -> Article {
        Article {
            title: "Fixed Income: Analysis and Market Outlook".to_string(),
            body: "# Fixed Income: Detailed Analysis\n\nbody".to_string(),
        }
    }

    #[tokio::test]
    async fn stub_publisher_reports_published() {
        let outcome = run(
            &StubPublisher::new(),
            &article(),
            &ImageRef("https://example.com/a.png".to_string()),
            Duration::from_secs(1),
        )
        .await
        .unwrap();
        assert_eq!(outcome, PublishOutcome::Published);
    }

    #[test]
    fn accepted_status_maps_to_pending() {
        let outcome = outcome_for_status(reqwest::StatusCode::ACCEPTED).unwrap();
        assert_eq!(outcome, PublishOutcome::Pending);
    }

    #[test]
    fn other_success_statuses_map_to_published() {
        for status in [
            reqwest::StatusCode::OK,
            reqwest::StatusCode::CREATED,
            reqwest::StatusCode::NO_CONTENT,
        ] {
            let outcome = outcome_for_status(status).unwrap();
            assert_eq!(outcome, PublishOutcome::Published, "status {status}");
        }
    }

    #[test]
    fn non_success_statuses_are_rejections() {
        for status in [
            reqwest::StatusCode::BAD_REQUEST,
            reqwest::StatusCode::UNAUTHORIZED,
            reqwest::StatusCode::SERVICE_UNAVAILABLE,
        ] {
            assert!(outcome_for_status(status).is_err(), "status {status}");
        }
    }

    #[tokio::test]
    async fn slow_target_times_out_as_publish_error() {
        let target = StubPublisher {
            latency: Duration::from_millis(200),
        };
        let err = run(
            &target,
            &article(),
            &ImageRef("https://example.com/a.png".to_string()),
            Duration::from_millis(10),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, PipelineError::Publish(_)));
    }
}
