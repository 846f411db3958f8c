//! Batch image decoding.
//!
//! Each selected file is decoded on the blocking pool; results are joined
//! back in selection order so sessions keep the user's ordering.

use std::path::{Path, PathBuf};

use density_engine::{EngineError, RasterBuffer, SampleChannel};
use futures::future::join_all;

use crate::config::validation::is_allowed_image;

/// Display name for a file: its file name, or the whole path as a fallback.
pub fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Decode every path into a raster, keeping input order.
///
/// Files with an unsupported extension are not opened and come back as
/// [`EngineError::InvalidImage`].
pub async fn decode_batch(
    paths: &[PathBuf],
    channel: SampleChannel,
) -> Vec<(String, density_engine::Result<RasterBuffer>)> {
    let tasks = paths.iter().cloned().map(move |path| async move {
        let name = display_name(&path);
        if !is_allowed_image(&path) {
            tracing::warn!("Invalid file skipped: {name}");
            return (
                name,
                Err(EngineError::InvalidImage(format!(
                    "unsupported file type: {}",
                    path.display()
                ))),
            );
        }

        let result = tokio::task::spawn_blocking(move || RasterBuffer::open(&path, channel))
            .await
            .unwrap_or_else(|e| Err(EngineError::Decode(format!("decoder task failed: {e}"))));
        (name, result)
    });

    join_all(tasks).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GrayImage, Luma};

    fn temp_dir(tag: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "density-studio-loader-{tag}-{}",
            std::process::id()
        ));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_display_name() {
        assert_eq!(display_name(Path::new("/a/b/photo.png")), "photo.png");
    }

    #[tokio::test]
    async fn test_decode_batch_keeps_order_and_reports_failures() {
        let dir = temp_dir("order");
        let first = dir.join("first.png");
        let second = dir.join("second.png");
        let broken = dir.join("broken.png");
        let text = dir.join("notes.txt");

        GrayImage::from_pixel(3, 2, Luma([10])).save(&first).unwrap();
        GrayImage::from_pixel(1, 4, Luma([200])).save(&second).unwrap();
        std::fs::write(&broken, b"not a png").unwrap();
        std::fs::write(&text, b"hello").unwrap();

        let results = decode_batch(
            &[first, text, broken, second],
            SampleChannel::Luma,
        )
        .await;

        let names: Vec<_> = results.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, vec!["first.png", "notes.txt", "broken.png", "second.png"]);

        assert_eq!(results[0].1.as_ref().unwrap().dimensions(), (3, 2));
        assert!(matches!(results[1].1, Err(EngineError::InvalidImage(_))));
        assert!(matches!(results[2].1, Err(EngineError::Decode(_))));
        assert_eq!(results[3].1.as_ref().unwrap().dimensions(), (1, 4));

        std::fs::remove_dir_all(&dir).ok();
    }
}
