mod app;
mod config;
mod entities;
mod util;

use std::path::PathBuf;

use anyhow::{Result, anyhow};
use clap::{ArgGroup, Parser};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use crate::app::{GraphApp, GraphOrigin};
use crate::config::EngineConfig;
use crate::entities::ExtractionClient;

#[derive(Debug, Parser)]
#[command(author, version, about)]
#[command(group(ArgGroup::new("source").required(true).args(["document_id", "snapshot"])))]
struct Args {
    /// Document whose entity graph is fetched from the extraction service.
    #[arg(long)]
    document_id: Option<String>,

    /// Offline graph snapshot (JSON) instead of the extraction service.
    #[arg(long)]
    snapshot: Option<PathBuf>,

    /// Base URL of the extraction service. Overrides the config file.
    #[arg(long)]
    api_url: Option<String>,

    /// TOML file with physics, view and extraction settings.
    #[arg(long)]
    config: Option<PathBuf>,
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();
    let mut config = EngineConfig::load_or_default(args.config.as_deref())?;
    if let Some(api_url) = args.api_url {
        config.extraction.api_url = api_url;
    }

    let origin = match (args.snapshot, args.document_id) {
        (Some(path), _) => GraphOrigin::File(path),
        (None, Some(document_id)) => GraphOrigin::Remote {
            client: ExtractionClient::new(
                &config.extraction.api_url,
                config.extraction.request_timeout(),
            )?,
            document_id,
        },
        (None, None) => return Err(anyhow!("either --document-id or --snapshot is required")),
    };
    tracing::info!(?origin, "starting contract-graph");

    let [width, height] = config.view.initial_viewport;
    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default()
            .with_inner_size([width + 600.0, height + 80.0]),
        ..Default::default()
    };

    eframe::run_native(
        "contract-graph",
        options,
        Box::new(move |cc| Ok(Box::new(GraphApp::new(cc, config, origin)))),
    )
    .map_err(|error| anyhow!("failed to run the graph window: {error}"))
}
