//! Image selection stage: chooses an illustrative image for a composed
//! article through the [`ImageCapability`].
//!
//! [`StubImageProvider`] is the built-in provider: it picks from a curated
//! catalog via an injected [`SelectionPolicy`], standing in for a real
//! generation/search service. Whether a capability failure here is fatal is
//! decided by the orchestrator, not by this stage.

use std::time::Duration;

use async_trait::async_trait;
use tracing::{error, info};

use crate::contract::{
    CapabilityError, ImageCapability, ImageRef, PipelineError, SelectionPolicy,
};

/// Runs the image selection stage, bounded by the per-stage timeout.
pub async fn run<I>(
    capability: &I,
    title: &str,
    timeout: Duration,
) -> Result<ImageRef, PipelineError>
where
    I: ImageCapability + ?Sized,
{
    let result = tokio::time::timeout(timeout, capability.select_image(title)).await;
    match result {
        Ok(Ok(url)) => {
            info!(title = %title, image = %url, "Image selected");
            Ok(ImageRef(url))
        }
        Ok(Err(e)) => {
            error!(title = %title, error = ?e, "Image capability failed");
            Err(PipelineError::ImageUnavailable(e.to_string()))
        }
        Err(_) => {
            error!(
                title = %title,
                timeout_ms = timeout.as_millis() as u64,
                "Image capability timed out"
            );
            Err(PipelineError::ImageUnavailable(
                "image capability timed out".to_string(),
            ))
        }
    }
}

/// Simulated image provider choosing from a fixed curated catalog.
pub struct StubImageProvider {
    catalog: Vec<String>,
    policy: Box<dyn SelectionPolicy>,
    /// Artificial latency to mimic a remote provider.
    pub latency: Duration,
}

impl StubImageProvider {
    pub fn new(catalog: Vec<String>, policy: Box<dyn SelectionPolicy>) -> Self {
        StubImageProvider {
            catalog,
            policy,
            latency: Duration::ZERO,
        }
    }
}

#[async_trait]
impl ImageCapability for StubImageProvider {
    async fn select_image(&self, _title: &str) -> Result<String, CapabilityError> {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        if self.catalog.is_empty() {
            return Err("image catalog is empty".into());
        }
        let idx = self.policy.choose(self.catalog.len());
        self.catalog
            .get(idx)
            .cloned()
            .ok_or_else(|| format!("catalog index {idx} out of range").into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PipelineConfig;
    use crate::contract::PinnedSelection;

    #[tokio::test]
    async fn stub_provider_picks_the_pinned_catalog_entry() {
        let catalog = PipelineConfig::default().image_catalog;
        let provider = StubImageProvider::new(catalog.clone(), Box::new(PinnedSelection(3)));
        let image = run(&provider, "any title", Duration::from_secs(1))
            .await
            .unwrap();
        assert_eq!(image.as_str(), catalog[3]);
    }

    #[tokio::test]
    async fn empty_catalog_surfaces_as_image_unavailable() {
        let provider = StubImageProvider::new(vec![], Box::new(PinnedSelection(0)));
        let err = run(&provider, "any title", Duration::from_secs(1))
            .await
            .unwrap_err();
        assert!(matches!(err, PipelineError::ImageUnavailable(_)));
    }

    #[tokio::test]
    async fn slow_provider_times_out_as_image_unavailable() {
        let mut provider = StubImageProvider::new(
            vec!["https://example.com/a.png".to_string()],
            Box::new(PinnedSelection(0)),
        );
        provider.latency = Duration::from_millis(200);
        let err = run(&provider, "any title", Duration::from_millis(10))
            .await
            .unwrap_err();
        assert!(matches!(err, PipelineError::ImageUnavailable(_)));
    }
}
