//! Print payload assembly from rendered sessions.
//!
//! Produces the raw byte stream a thermal printer expects for the current
//! batch. Delivery to a device is not handled here.

use std::path::Path;

use anyhow::Context;
use density_engine::SessionBatch;
use escpos_raster::{Bitmap, EscPosProtocol, PrintJob, PrintOptions};

/// What a written payload contains.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PayloadSummary {
    pub bytes: usize,
    pub total_prints: u64,
}

/// The job for `image_count` images.
///
/// `counts`/`order` default to one copy of every image in load order.
fn plan_job(
    image_count: usize,
    counts: Option<Vec<u32>>,
    order: Option<Vec<usize>>,
    density: u8,
    feed_lines: u8,
) -> PrintJob {
    let mut job = PrintJob::single_copies(image_count).with_options(
        PrintOptions::new()
            .with_density(density)
            .with_feed_lines(feed_lines),
    );
    if let Some(counts) = counts {
        job.counts = counts;
    }
    if let Some(order) = order {
        job.order = order;
    }
    job
}

fn encode(batch: &SessionBatch, job: &PrintJob) -> anyhow::Result<Vec<u8>> {
    let bitmaps: Vec<(Vec<u8>, u32)> = batch
        .iter()
        .map(|s| (s.output().to_print_bitmap(), s.output().width()))
        .collect();
    let images: Vec<Bitmap<'_>> = bitmaps
        .iter()
        .map(|(pixels, width)| Bitmap::new(pixels, *width))
        .collect();

    let commands = job
        .build_payload(&EscPosProtocol::new(), &images)
        .context("building print payload")?;
    Ok(commands.concat())
}

/// Build the ESC/POS byte stream for `batch`.
pub fn build_payload(
    batch: &SessionBatch,
    counts: Option<Vec<u32>>,
    order: Option<Vec<usize>>,
    density: u8,
    feed_lines: u8,
) -> anyhow::Result<Vec<u8>> {
    let job = plan_job(batch.len(), counts, order, density, feed_lines);
    encode(batch, &job)
}

/// Build and write the payload to `path`.
pub fn write_payload(
    batch: &SessionBatch,
    counts: Option<Vec<u32>>,
    order: Option<Vec<usize>>,
    density: u8,
    feed_lines: u8,
    path: &Path,
) -> anyhow::Result<PayloadSummary> {
    let job = plan_job(batch.len(), counts, order, density, feed_lines);
    let payload = encode(batch, &job)?;
    std::fs::write(path, &payload)
        .with_context(|| format!("writing print payload {}", path.display()))?;

    let summary = PayloadSummary {
        bytes: payload.len(),
        total_prints: job.total_prints(),
    };
    tracing::info!(
        bytes = summary.bytes,
        prints = summary.total_prints,
        path = %path.display(),
        "Print payload written"
    );
    Ok(summary)
}
