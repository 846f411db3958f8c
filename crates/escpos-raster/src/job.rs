//! Multi-image print jobs: copy counts, print order and payload assembly.

use tracing::{debug, info};

use crate::options::PrintOptions;
use crate::protocol::PrinterProtocol;
use crate::{PrinterError, Result};

/// Upper bound on copies of a single image within one job.
pub const MAX_COPIES: u32 = 100;

/// A monochrome bitmap borrowed from the caller (1 byte per pixel, 1 = black).
#[derive(Debug, Clone, Copy)]
pub struct Bitmap<'a> {
    pub pixels: &'a [u8],
    pub width: u32,
}

impl<'a> Bitmap<'a> {
    pub fn new(pixels: &'a [u8], width: u32) -> Self {
        Self { pixels, width }
    }
}

/// Which images to print, how often, and in what sequence.
///
/// `counts[i]` is the number of copies of image `i`; `order` lists image
/// indices in print sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrintJob {
    pub counts: Vec<u32>,
    pub order: Vec<usize>,
    pub options: PrintOptions,
}

impl PrintJob {
    pub fn new(counts: Vec<u32>, order: Vec<usize>) -> Self {
        Self {
            counts,
            order,
            options: PrintOptions::default(),
        }
    }

    /// One copy of each image, in load order.
    pub fn single_copies(image_count: usize) -> Self {
        Self::new(vec![1; image_count], (0..image_count).collect())
    }

    /// Builder: set job options.
    pub fn with_options(mut self, options: PrintOptions) -> Self {
        self.options = options;
        self
    }

    /// Every problem with this job for a batch of `image_count` images.
    pub fn problems(&self, image_count: usize) -> Vec<PrinterError> {
        let mut problems = Vec::new();
        if image_count < 1 {
            problems.push(PrinterError::NoImages);
        }
        if self.counts.len() != image_count {
            problems.push(PrinterError::CountMismatch {
                counts: self.counts.len(),
                images: image_count,
            });
        }
        let excess = self.counts.iter().enumerate().find(|(_, c)| **c > MAX_COPIES);
        if let Some((index, &count)) = excess {
            problems.push(PrinterError::TooManyCopies {
                index,
                count,
                max: MAX_COPIES,
            });
        }
        if let Some(&index) = self.order.iter().find(|&&i| i >= image_count) {
            problems.push(PrinterError::OrderOutOfRange {
                index,
                images: image_count,
            });
        }
        problems
    }

    /// Fail with the first problem, if any.
    pub fn validate(&self, image_count: usize) -> Result<()> {
        match self.problems(image_count).into_iter().next() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    /// Copies that the job will print in total.
    pub fn total_prints(&self) -> u64 {
        self.order
            .iter()
            .filter_map(|&i| self.counts.get(i))
            .map(|&c| u64::from(c))
            .sum()
    }

    /// Build the command stream: init once, then every copy in print order
    /// followed by a feed.
    pub fn build_payload(
        &self,
        protocol: &dyn PrinterProtocol,
        images: &[Bitmap<'_>],
    ) -> Result<Vec<Vec<u8>>> {
        self.validate(images.len())?;

        let encoded = images
            .iter()
            .map(|img| protocol.encode_raster(img.pixels, img.width))
            .collect::<Result<Vec<_>>>()?;

        let mut commands = protocol.build_init_sequence(self.options.density);
        let feed = protocol.build_feed_command(self.options.feed_lines);
        for &index in &self.order {
            debug!(index, copies = self.counts[index], "Queueing image");
            for _ in 0..self.counts[index] {
                commands.push(encoded[index].clone());
                commands.push(feed.clone());
            }
        }

        info!(
            protocol = protocol.name(),
            images = images.len(),
            prints = self.total_prints(),
            commands = commands.len(),
            "Print payload built"
        );
        Ok(commands)
    }
}

/// Parse a comma-separated list of non-negative integers.
///
/// Tokens that are not plain digit runs (after trimming) are dropped.
pub fn parse_number_list(input: &str) -> Vec<u32> {
    input
        .split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty() && t.chars().all(|c| c.is_ascii_digit()))
        .filter_map(|t| t.parse().ok())
        .collect()
}
