//! Preview PNG and JSON report export.

use std::path::{Path, PathBuf};

use anyhow::Context;
use density_engine::{
    EditSession, LoadFailure, PaintController, SessionBatch, SessionState, render_with_cursor,
};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct SessionReport {
    pub id: String,
    pub name: String,
    pub width: u32,
    pub height: u32,
    pub black_pixels: usize,
    pub state: SessionState,
    pub preview: PathBuf,
}

#[derive(Debug, Serialize)]
pub struct FailureReport {
    pub name: String,
    pub error: String,
}

#[derive(Debug, Serialize)]
pub struct BatchReport {
    pub generated_at: String,
    pub density: u8,
    pub brush_radius: u32,
    /// Copies in the written print payload, if one was written.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_prints: Option<u64>,
    pub sessions: Vec<SessionReport>,
    pub failures: Vec<FailureReport>,
}

/// File name for a session's preview, unique within the batch.
fn preview_file_name(index: usize, session: &EditSession) -> String {
    let stem = Path::new(session.name())
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "image".to_string());
    format!("{index:02}-{stem}.png")
}

/// Write one binarized preview per session, plus a cursor overlay for the
/// session the brush cursor is currently over.
pub fn write_previews(
    batch: &SessionBatch,
    controller: &PaintController,
    out_dir: &Path,
) -> anyhow::Result<Vec<PathBuf>> {
    std::fs::create_dir_all(out_dir)
        .with_context(|| format!("creating output directory {}", out_dir.display()))?;

    let cursor = controller.cursor();
    let mut written = Vec::with_capacity(batch.len());
    for (index, session) in batch.iter().enumerate() {
        let path = out_dir.join(preview_file_name(index, session));
        session
            .output()
            .to_gray_image()
            .save(&path)
            .with_context(|| format!("writing preview {}", path.display()))?;
        tracing::info!(name = session.name(), path = %path.display(), "Preview written");

        if cursor.visible && cursor.session == Some(index) {
            if let Some(center) = cursor.buffer_pos {
                let overlay_path = path.with_extension("cursor.png");
                render_with_cursor(session.output(), center, controller.brush_radius())
                    .save(&overlay_path)
                    .with_context(|| format!("writing cursor overlay {}", overlay_path.display()))?;
            }
        }
        written.push(path);
    }
    Ok(written)
}

/// Assemble the run report.
pub fn build_report(
    batch: &SessionBatch,
    controller: &PaintController,
    failures: &[LoadFailure],
    previews: &[PathBuf],
) -> BatchReport {
    let sessions = batch
        .iter()
        .zip(previews)
        .map(|(session, preview)| {
            let (width, height) = session.dimensions();
            SessionReport {
                id: session.id().to_string(),
                name: session.name().to_string(),
                width,
                height,
                black_pixels: session.output().black_count(),
                state: session.state(),
                preview: preview.clone(),
            }
        })
        .collect();

    BatchReport {
        generated_at: chrono::Local::now().to_rfc3339(),
        density: controller.density(),
        brush_radius: controller.brush_radius(),
        total_prints: None,
        sessions,
        failures: failures
            .iter()
            .map(|f| FailureReport {
                name: f.name.clone(),
                error: f.error.to_string(),
            })
            .collect(),
    }
}

/// Write `report` as pretty JSON to `<out_dir>/report.json`.
pub fn write_report(report: &BatchReport, out_dir: &Path) -> anyhow::Result<PathBuf> {
    let path = out_dir.join("report.json");
    let json = serde_json::to_string_pretty(report)?;
    std::fs::write(&path, json).with_context(|| format!("writing report {}", path.display()))?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use density_engine::{EngineError, InputEvent, RasterBuffer, SurfaceRect};

    fn temp_dir(tag: &str) -> PathBuf {
        std::env::temp_dir().join(format!(
            "density-studio-export-{tag}-{}",
            std::process::id()
        ))
    }

    #[test]
    fn test_previews_and_report() {
        let dir = temp_dir("report");
        let mut controller = PaintController::new(127, 1);
        let mut batch = SessionBatch::new();
        let failures = controller.load(
            &mut batch,
            vec![
                ("dark.png", RasterBuffer::new(4, 4, vec![100; 16])),
                ("bad.jpg", Err(EngineError::Decode("truncated".into()))),
                ("light.png", RasterBuffer::new(2, 2, vec![250; 4])),
            ],
        );

        controller
            .handle(&mut batch, InputEvent::PointerEnter { session: 0 })
            .unwrap();
        controller
            .handle(
                &mut batch,
                InputEvent::PointerMove {
                    session: 0,
                    x: 2.0,
                    y: 2.0,
                    surface: SurfaceRect::native(4, 4),
                },
            )
            .unwrap();

        let previews = write_previews(&batch, &controller, &dir).unwrap();
        assert_eq!(previews.len(), 2);
        assert!(previews[0].ends_with("00-dark.png"));
        assert!(previews[1].ends_with("01-light.png"));
        assert!(dir.join("00-dark.cursor.png").exists());
        assert!(!dir.join("01-light.cursor.png").exists());

        let written = image::open(&previews[0]).unwrap().to_luma8();
        assert_eq!(written.dimensions(), (4, 4));
        assert!(written.pixels().all(|p| p.0[0] == 0));

        let report = build_report(&batch, &controller, &failures, &previews);
        assert_eq!(report.sessions.len(), 2);
        assert_eq!(report.sessions[0].black_pixels, 16);
        assert_eq!(report.sessions[1].black_pixels, 0);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].name, "bad.jpg");

        let mut report = report;
        let path = write_report(&report, &dir).unwrap();
        let parsed: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(parsed["sessions"][0]["state"], "ready");
        assert_eq!(parsed["density"], 127);
        assert!(parsed.get("total_prints").is_none());

        report.total_prints = Some(4);
        write_report(&report, &dir).unwrap();
        let parsed: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(parsed["total_prints"], 4);

        std::fs::remove_dir_all(&dir).ok();
    }
}
