use std::fs;
use std::path::Path;
use std::time::Duration;

use anyhow::Result;
use serde::Deserialize;
use tracing::{error, info};

use crate::config::{AppConfig, PipelineConfig, PublishTargetConfig};

#[derive(Deserialize, Default)]
struct StaticConfig {
    #[serde(default)]
    pipeline: PipelineSection,
}

/// Static YAML view of the pipeline configuration. Every field is optional;
/// absent fields fall back to the built-in defaults.
#[derive(Deserialize, Default)]
struct PipelineSection {
    topics: Option<Vec<String>>,
    images: Option<Vec<String>>,
    placeholder_image: Option<String>,
    preview_chars: Option<usize>,
    stage_timeout_ms: Option<u64>,
    provenance: Option<String>,
}

/// Loads a static YAML config file (no secrets) and merges env vars for the
/// optional publish target. Returns a fully merged [`AppConfig`] or an error.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<AppConfig> {
    let path_ref = path.as_ref();
    info!(config_path = ?path_ref, "Loading configuration from file");

    let config_content = match fs::read_to_string(path_ref) {
        Ok(content) => content,
        Err(e) => {
            error!(error = ?e, config_path = ?path_ref, "Failed to read config file");
            return Err(anyhow::anyhow!(
                "Failed to read config file {:?}: {}",
                path_ref,
                e
            ));
        }
    };

    let static_conf: StaticConfig = match serde_yaml::from_str(&config_content) {
        Ok(conf) => {
            info!(config_path = ?path_ref, "Parsed config YAML successfully");
            conf
        }
        Err(e) => {
            error!(error = ?e, config_path = ?path_ref, "Failed to parse config YAML");
            return Err(anyhow::anyhow!("Failed to parse config YAML: {e}"));
        }
    };

    let defaults = PipelineConfig::default();
    let section = static_conf.pipeline;
    let pipeline = PipelineConfig {
        topics: section.topics.unwrap_or(defaults.topics),
        image_catalog: section.images.unwrap_or(defaults.image_catalog),
        placeholder_image: section
            .placeholder_image
            .unwrap_or(defaults.placeholder_image),
        preview_chars: section.preview_chars.unwrap_or(defaults.preview_chars),
        stage_timeout: section
            .stage_timeout_ms
            .map(Duration::from_millis)
            .unwrap_or(defaults.stage_timeout),
        provenance: section.provenance.unwrap_or(defaults.provenance),
    };

    if pipeline.topics.is_empty() {
        anyhow::bail!("pipeline.topics must not be empty");
    }
    if pipeline.image_catalog.is_empty() {
        anyhow::bail!("pipeline.images must not be empty");
    }
    pipeline.trace_loaded();

    Ok(AppConfig {
        pipeline,
        publish: publish_target_from_env(),
    })
}

/// Reads the optional real publish target from the environment. With no
/// `PUBLISH_ENDPOINT` set, deployments run against the stub publisher.
pub fn publish_target_from_env() -> Option<PublishTargetConfig> {
    match std::env::var("PUBLISH_ENDPOINT") {
        Ok(endpoint) if !endpoint.trim().is_empty() => {
            info!(endpoint = %endpoint, "PUBLISH_ENDPOINT found in env, using HTTP publish target");
            Some(PublishTargetConfig {
                endpoint,
                token: std::env::var("PUBLISH_TOKEN").ok(),
            })
        }
        _ => {
            info!("No PUBLISH_ENDPOINT in env, using stub publisher");
            None
        }
    }
}
