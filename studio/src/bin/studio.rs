//! Headless studio binary.
//!
//! Loads the given images, replays an optional event script, then writes
//! binarized previews, a JSON report and optionally a print payload.

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use density_engine::{PaintController, SampleChannel, SessionBatch};
use density_studio_lib::config::AppConfig;
use density_studio_lib::services::{export, loader, print_payload, script};
use escpos_raster::parse_number_list;

#[derive(Debug, Parser)]
#[command(name = "density-studio", version, about = "Paint per-pixel print density and preview the thermal output")]
struct Cli {
    /// Images to load, in print order.
    #[arg(required = true)]
    images: Vec<PathBuf>,

    /// JSON array of input events to replay after loading.
    #[arg(long)]
    events: Option<PathBuf>,

    /// Output directory (overrides OUTPUT_DIR).
    #[arg(long)]
    out: Option<PathBuf>,

    /// Global density (overrides DEFAULT_DENSITY).
    #[arg(long)]
    density: Option<u8>,

    /// Brush radius in image pixels (overrides BRUSH_RADIUS).
    #[arg(long)]
    brush_radius: Option<u32>,

    /// Source channel: luma or red (overrides SAMPLE_CHANNEL).
    #[arg(long)]
    channel: Option<SampleChannel>,

    /// Copies per image, comma separated (e.g. "1,2").
    #[arg(long, requires = "payload")]
    counts: Option<String>,

    /// Print order as image indices, comma separated (e.g. "1,0").
    #[arg(long, requires = "payload")]
    order: Option<String>,

    /// Write the ESC/POS print payload to this file.
    #[arg(long)]
    payload: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    density_studio_lib::load_dotenv();

    let mut config = AppConfig::load();
    if let Some(d) = cli.density {
        config.default_density = d;
    }
    if let Some(r) = cli.brush_radius {
        config.brush_radius = r;
    }
    if let Some(c) = cli.channel {
        config.sample_channel = c;
    }
    if let Some(out) = cli.out.clone() {
        config.output_dir = out;
    }
    tracing::info!(?config, "Starting density studio");

    let mut controller = PaintController::new(config.default_density, config.brush_radius);
    let mut batch = SessionBatch::new();

    let decoded = loader::decode_batch(&cli.images, config.sample_channel).await;
    let failures = controller.load(&mut batch, decoded);
    for f in &failures {
        tracing::warn!("Skipped {}: {}", f.name, f.error);
    }
    if batch.is_empty() {
        anyhow::bail!("no image could be loaded");
    }

    if let Some(path) = &cli.events {
        let events = script::load_events(path)?;
        script::replay(&mut controller, &mut batch, &events);
    }

    let previews = export::write_previews(&batch, &controller, &config.output_dir)?;
    let mut report = export::build_report(&batch, &controller, &failures, &previews);

    if let Some(path) = &cli.payload {
        let counts = cli.counts.as_deref().map(parse_number_list);
        let order = cli.order.as_deref().map(|s| {
            parse_number_list(s)
                .into_iter()
                .map(|i| i as usize)
                .collect()
        });
        let summary = print_payload::write_payload(
            &batch,
            counts,
            order,
            controller.density(),
            config.feed_lines,
            path,
        )
        .with_context(|| format!("print payload for {} images", batch.len()))?;
        report.total_prints = Some(summary.total_prints);
    }

    let report_path = export::write_report(&report, &config.output_dir)?;
    tracing::info!(path = %report_path.display(), "Report written");

    Ok(())
}
