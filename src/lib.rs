pub mod analyze;
pub mod api;
pub mod compose;
pub mod config;
pub mod contract;
pub mod illustrate;
pub mod load_config;
pub mod process;
pub mod publish;
pub mod validate;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::contract::{PublishCapability, RandomSelection};
use crate::illustrate::StubImageProvider;
use crate::publish::{HttpPublishTarget, StubPublisher};

#[derive(Parser)]
#[clap(
    name = "autopress",
    version,
    about = "Turn a channel message (text, voice transcript or link) into a published blog article"
)]
pub struct Cli {
    #[clap(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Process one content item through the full pipeline and print the
    /// resulting post as JSON
    Process {
        /// Input kind: text, voice or link
        #[clap(long = "type", value_name = "KIND")]
        kind: String,
        /// The raw content payload
        #[clap(long)]
        content: String,
        /// Optional path to a YAML config file; defaults apply without it
        #[clap(long)]
        config: Option<PathBuf>,
    },
}

/// Extracted async CLI logic entrypoint for integration tests and main().
pub async fn run(cli: Cli) -> Result<()> {
    tracing::info!("trace_initialised");

    match cli.command {
        Commands::Process {
            kind,
            content,
            config,
        } => {
            let app = match config {
                Some(path) => load_config::load_config(path)?,
                None => config::AppConfig {
                    pipeline: config::PipelineConfig::default(),
                    publish: load_config::publish_target_from_env(),
                },
            };

            let analysis = analyze::StubAnalysis::new();
            let images = StubImageProvider::new(
                app.pipeline.image_catalog.clone(),
                Box::new(RandomSelection),
            );
            let target: Box<dyn PublishCapability> = match &app.publish {
                Some(publish_config) => Box::new(HttpPublishTarget::new(publish_config)),
                None => Box::new(StubPublisher::new()),
            };

            let body = serde_json::json!({ "type": kind, "content": content }).to_string();
            let (status, response) = api::handle_process(
                &app.pipeline,
                &RandomSelection,
                &analysis,
                &images,
                target.as_ref(),
                &body,
            )
            .await;

            println!("{}", serde_json::to_string_pretty(&response)?);
            if status != 200 {
                anyhow::bail!("processing failed with status {status}");
            }
            Ok(())
        }
    }
}
