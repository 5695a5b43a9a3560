//! Content analysis stage: turns a validated input item into a normalized
//! textual representation, branching by input kind.
//!
//! The stage delegates to an [`AnalysisCapability`]; [`StubAnalysis`] is the
//! built-in simulated provider that satisfies the minimum analysis contract
//! without any network access. This is the only stage permitted to abort the
//! pipeline on an external-dependency failure.

use std::time::Duration;

use async_trait::async_trait;
use tracing::{error, info};

use crate::contract::{
    AnalysisCapability, AnalyzedContent, CapabilityError, InputItem, InputKind, PipelineError,
};

/// Characters of a link's content kept in the analysis, so downstream
/// composition has traceable provenance without unbounded growth.
pub const LINK_PREFIX_CHARS: usize = 50;

/// Runs the analysis stage against the given capability, bounded by the
/// per-stage timeout. A capability error or an elapsed timeout surfaces as
/// [`PipelineError::Analysis`].
pub async fn run<A>(
    capability: &A,
    item: &InputItem,
    timeout: Duration,
) -> Result<AnalyzedContent, PipelineError>
where
    A: AnalysisCapability + ?Sized,
{
    let result = tokio::time::timeout(timeout, capability.analyze(item.kind, &item.content)).await;
    match result {
        Ok(Ok(normalized)) => {
            info!(
                kind = item.kind.as_str(),
                analyzed_len = normalized.len(),
                "Content analysis succeeded"
            );
            Ok(AnalyzedContent(normalized))
        }
        Ok(Err(e)) => {
            error!(kind = item.kind.as_str(), error = ?e, "Content analysis failed");
            Err(PipelineError::Analysis(e.to_string()))
        }
        Err(_) => {
            error!(
                kind = item.kind.as_str(),
                timeout_ms = timeout.as_millis() as u64,
                "Content analysis timed out"
            );
            Err(PipelineError::Analysis("analysis capability timed out".to_string()))
        }
    }
}

/// Simulated analysis provider. Stands in for a real language-model call and
/// implements exactly the minimum contract:
/// - `Text`: identity transform.
/// - `Voice`: transcript framing, transcript preserved in full.
/// - `Link`: link provenance plus the first [`LINK_PREFIX_CHARS`] characters.
#[derive(Debug, Default)]
pub struct StubAnalysis {
    /// Artificial latency to mimic a remote provider. Zero by default so
    /// tests stay fast.
    pub latency: Duration,
}

impl StubAnalysis {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AnalysisCapability for StubAnalysis {
    async fn analyze(&self, kind: InputKind, content: &str) -> Result<String, CapabilityError> {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        Ok(match kind {
            InputKind::Link => {
                let prefix: String = content.chars().take(LINK_PREFIX_CHARS).collect();
                format!("Analysis of the linked source: {prefix}...")
            }
            InputKind::Voice => format!("Analyzed transcript: {content}"),
            InputKind::Text => content.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(kind: InputKind, content: &str) -> InputItem {
        InputItem {
            kind,
            content: content.to_string(),
        }
    }

    #[tokio::test]
    async fn text_analysis_is_identity() {
        let stub = StubAnalysis::new();
        let out = run(
            &stub,
            &item(InputKind::Text, "Markets closed higher today."),
            Duration::from_secs(1),
        )
        .await
        .unwrap();
        assert_eq!(out.as_str(), "Markets closed higher today.");
    }

    #[tokio::test]
    async fn voice_analysis_preserves_full_transcript() {
        let transcript = "buy low, sell high, rebalance quarterly";
        let stub = StubAnalysis::new();
        let out = run(
            &stub,
            &item(InputKind::Voice, transcript),
            Duration::from_secs(1),
        )
        .await
        .unwrap();
        assert!(out.as_str().contains(transcript));
    }

    #[tokio::test]
    async fn link_analysis_bounds_the_prefix() {
        let long_url = format!("https://example.com/{}", "a".repeat(200));
        let stub = StubAnalysis::new();
        let out = run(
            &stub,
            &item(InputKind::Link, &long_url),
            Duration::from_secs(1),
        )
        .await
        .unwrap();
        let prefix: String = long_url.chars().take(LINK_PREFIX_CHARS).collect();
        assert!(out.as_str().contains(&prefix));
        // Nothing beyond the bounded prefix leaks through.
        let over: String = long_url.chars().take(LINK_PREFIX_CHARS + 1).collect();
        assert!(!out.as_str().contains(&over));
    }

    #[tokio::test]
    async fn link_prefix_respects_multibyte_boundaries() {
        let content = "é".repeat(80);
        let stub = StubAnalysis::new();
        let out = run(
            &stub,
            &item(InputKind::Link, &content),
            Duration::from_secs(1),
        )
        .await
        .unwrap();
        assert!(out.as_str().contains(&"é".repeat(LINK_PREFIX_CHARS)));
    }

    #[tokio::test]
    async fn slow_capability_times_out_as_analysis_error() {
        let stub = StubAnalysis {
            latency: Duration::from_millis(200),
        };
        let err = run(
            &stub,
            &item(InputKind::Text, "anything"),
            Duration::from_millis(10),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, PipelineError::Analysis(_)));
    }
}
