use std::time::Duration;

use tracing::{debug, info};

/// Immutable configuration data injected into the pipeline.
///
/// Topic and image sets are deployment data, not module constants: a
/// deployment can swap in its own topics/catalog without touching code, and
/// tests can isolate themselves with a minimal set.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Fixed finite set of domain topics the composer chooses from.
    pub topics: Vec<String>,
    /// Curated set of thematically relevant image URLs for the stub image
    /// provider.
    pub image_catalog: Vec<String>,
    /// Image used when the image capability fails and the run degrades.
    pub placeholder_image: String,
    /// Maximum characters of body kept in the display preview.
    pub preview_chars: usize,
    /// Upper bound for each external capability call.
    pub stage_timeout: Duration,
    /// Provenance label appended to every composed article body.
    pub provenance: String,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        PipelineConfig {
            topics: [
                "Stock Market",
                "Cryptocurrencies",
                "Real Estate Investing",
                "Financial Planning",
                "Global Economy",
                "Fixed Income",
                "Investment Funds",
                "Technical Analysis",
            ]
            .map(str::to_string)
            .to_vec(),
            image_catalog: [
                "https://images.unsplash.com/photo-1611974789855-9c2a0a7236a3?w=800&q=80",
                "https://images.unsplash.com/photo-1634704784915-aacf363b021f?w=800&q=80",
                "https://images.unsplash.com/photo-1460925895917-afdab827c52f?w=800&q=80",
                "https://images.unsplash.com/photo-1590283603385-17ffb3a7f29f?w=800&q=80",
                "https://images.unsplash.com/photo-1579621970563-ebec7560ff3e?w=800&q=80",
            ]
            .map(str::to_string)
            .to_vec(),
            placeholder_image: "https://placehold.co/800x450?text=autopress".to_string(),
            preview_chars: 200,
            stage_timeout: Duration::from_secs(10),
            provenance: "autopress automation - Source: Telegram".to_string(),
        }
    }
}

impl PipelineConfig {
    pub fn trace_loaded(&self) {
        info!(
            topics = self.topics.len(),
            images = self.image_catalog.len(),
            preview_chars = self.preview_chars,
            stage_timeout_ms = self.stage_timeout.as_millis() as u64,
            "Loaded PipelineConfig"
        );
        debug!(?self, "PipelineConfig loaded (full debug)");
    }
}

/// Wiring for the real HTTP publish target. Absent in deployments that run
/// with the stub publisher.
#[derive(Debug, Clone)]
pub struct PublishTargetConfig {
    pub endpoint: String,
    pub token: Option<String>,
}

/// Full application configuration: pipeline data plus optional publish
/// target wiring merged from the environment.
#[derive(Debug, Clone, Default)]
pub struct AppConfig {
    pub pipeline: PipelineConfig,
    pub publish: Option<PublishTargetConfig>,
}
