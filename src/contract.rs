//! # contract: capability interfaces and shared data model
//!
//! This module defines the data shapes that flow through the pipeline and the
//! traits for the three external capabilities the pipeline depends on:
//! content analysis, image selection, and publishing.
//!
//! ## Interface & Extensibility
//! - Implement [`AnalysisCapability`], [`ImageCapability`] or
//!   [`PublishCapability`] to plug in a concrete provider (API client, local
//!   stub, test mock).
//! - All capability methods are async, returning results with boxed error
//!   types so transport/auth details never leak into the core.
//! - [`SelectionPolicy`] isolates the randomness used for topic and image
//!   choice; tests pin it, production wiring supplies a random policy.
//!
//! ## Mocking & Testing
//! - The traits are annotated for `mockall` so consumers can generate
//!   deterministic mocks for unit/integration tests.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[cfg(any(test, feature = "test-export-mocks"))]
use mockall::automock;

/// Kind of content item arriving from the messaging channel.
///
/// Serialized in lowercase so the wire values `"text"`, `"voice"` and
/// `"link"` round-trip unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputKind {
    Text,
    Voice,
    Link,
}

impl InputKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            InputKind::Text => "text",
            InputKind::Voice => "voice",
            InputKind::Link => "link",
        }
    }
}

/// A single content item as received from the channel. Immutable once
/// validated; consumed exactly once by the analysis stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputItem {
    pub kind: InputKind,
    pub content: String,
}

/// Normalized textual representation produced by the analysis stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalyzedContent(pub String);

impl AnalyzedContent {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// A composed article: non-empty title plus a markdown body that carries the
/// analyzed content verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Article {
    pub title: String,
    pub body: String,
}

/// Opaque reference (URL or identifier) to an illustrative image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageRef(pub String);

impl ImageRef {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Result of a publish submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublishOutcome {
    Published,
    Pending,
    Failed,
}

impl PublishOutcome {
    /// Human-readable label rendered at the external boundary.
    pub fn label(&self) -> &'static str {
        match self {
            PublishOutcome::Published => "✅ Published",
            PublishOutcome::Pending => "⏳ Pending",
            PublishOutcome::Failed => "❌ Failed",
        }
    }
}

/// The externally visible result of one pipeline run. Assembled once per
/// request and never updated in place.
#[derive(Debug, Clone)]
pub struct ProcessedPost {
    /// Unique per request (UUIDv4), even for identical inputs.
    pub id: String,
    pub title: String,
    /// Body truncated for display; composition itself never truncates.
    pub content_preview: String,
    pub image: ImageRef,
    pub outcome: PublishOutcome,
    pub produced_at: chrono::DateTime<chrono::Local>,
}

/// Uniform boxed error type crossing every capability boundary.
pub type CapabilityError = Box<dyn std::error::Error + Send + Sync>;

/// Error taxonomy for the pipeline.
///
/// Validation, analysis and internal errors abort the run; image and publish
/// failures are absorbed by the orchestrator into a degraded result and never
/// escape it (see the `process` module).
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Client input malformed; user-correctable.
    #[error("invalid input: {0}")]
    Validation(String),
    /// The analysis capability failed or timed out.
    #[error("content analysis failed: {0}")]
    Analysis(String),
    /// The image capability failed or timed out.
    #[error("image selection failed: {0}")]
    ImageUnavailable(String),
    /// The publish target rejected the submission or was unreachable.
    #[error("publish submission failed: {0}")]
    Publish(String),
    /// Programming/invariant violation; never user-correctable.
    #[error("internal pipeline error: {0}")]
    Internal(String),
}

/// Trait for the external content-analysis capability (e.g. a language
/// model). Implementations must satisfy the minimum analysis contract:
/// text passes through unchanged, voice transcripts are preserved in full,
/// links are reduced to a bounded prefix with link provenance noted.
#[cfg_attr(any(test, feature = "test-export-mocks"), automock)]
#[async_trait]
pub trait AnalysisCapability: Send + Sync {
    /// Produce a normalized textual representation of the raw content.
    async fn analyze(&self, kind: InputKind, content: &str) -> Result<String, CapabilityError>;
}

/// Trait for the external image capability. Given an article title, returns
/// a URL or identifier of a thematically relevant image.
#[cfg_attr(any(test, feature = "test-export-mocks"), automock)]
#[async_trait]
pub trait ImageCapability: Send + Sync {
    async fn select_image(&self, title: &str) -> Result<String, CapabilityError>;
}

/// Trait for the publishing target. Submission is at-most-once: the core
/// never retries, and the target is not assumed to deduplicate.
#[cfg_attr(any(test, feature = "test-export-mocks"), automock)]
#[async_trait]
pub trait PublishCapability: Send + Sync {
    async fn publish(
        &self,
        title: &str,
        body: &str,
        image_url: &str,
    ) -> Result<PublishOutcome, CapabilityError>;
}

/// Pluggable choice over a fixed option set. Implementations must return an
/// index strictly below `len` for any `len >= 1`.
#[cfg_attr(any(test, feature = "test-export-mocks"), automock)]
pub trait SelectionPolicy: Send + Sync {
    fn choose(&self, len: usize) -> usize;
}

/// Production policy: uniform random choice.
#[derive(Debug, Default)]
pub struct RandomSelection;

impl SelectionPolicy for RandomSelection {
    fn choose(&self, len: usize) -> usize {
        use rand::Rng;
        debug_assert!(len >= 1, "selection over an empty option set");
        rand::rng().random_range(0..len)
    }
}

/// Deterministic policy for tests and reproducible runs: always picks the
/// given index, clamped to the option set.
#[derive(Debug, Clone, Copy)]
pub struct PinnedSelection(pub usize);

impl SelectionPolicy for PinnedSelection {
    fn choose(&self, len: usize) -> usize {
        self.0.min(len.saturating_sub(1))
    }
}
