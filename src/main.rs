use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use futures::future::join_all;

use upper_bounds::config::AppConfig;
use upper_bounds::core::bounds::{Label, PageMode, PagePipeline};
use upper_bounds::core::llm::StructuredGateway;

/// Detect where each problem's solution begins on rendered assignment pages
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Page images (JPEG, PNG, ...) already rendered from the source document
    #[arg(required = true, value_name = "IMAGE")]
    images: Vec<PathBuf>,

    /// Comma-separated labels to resolve; skips label discovery
    #[arg(long, value_delimiter = ',', value_name = "LABELS", conflicts_with = "unlabeled")]
    labels: Option<Vec<String>>,

    /// Detect boundaries without associating them to labels
    #[arg(long)]
    unlabeled: bool,

    /// Configuration file (defaults to the user config directory)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Log level used when RUST_LOG is unset
    #[arg(long, default_value = "info", value_name = "LEVEL")]
    log_level: String,
}

impl Args {
    fn mode(&self) -> PageMode {
        if self.unlabeled {
            return PageMode::Unlabeled;
        }
        PageMode::Labeled(
            self.labels
                .as_ref()
                .map(|labels| labels.iter().map(|l| Label::from(l.trim())).collect()),
        )
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let _log_guard = upper_bounds::core::logging::init(&args.log_level);
    log::info!("{} v{} starting", upper_bounds::NAME, upper_bounds::VERSION);

    let config = match &args.config {
        Some(path) => AppConfig::load_from(path)?,
        None => AppConfig::load(),
    };

    let gateway: Arc<dyn StructuredGateway> = Arc::new(
        config
            .build_gateway()
            .context("Failed to configure the extraction gateway")?,
    );
    let pipeline = PagePipeline::new(gateway, config.labeled_instruction.clone());
    let mode = args.mode();

    // pages are independent; run them side by side
    let reports = join_all(
        args.images
            .iter()
            .map(|path| pipeline.process_file(path, &mode)),
    )
    .await;

    let failures = reports.iter().filter(|r| r.is_failed()).count();
    println!("{}", serde_json::to_string_pretty(&reports)?);

    if failures > 0 {
        anyhow::bail!("{failures} of {} pages failed", reports.len());
    }
    Ok(())
}
