//! Input-event scripts.
//!
//! A script is a JSON array of [`InputEvent`]s, replayed in order against
//! the controller as if a host had delivered them live.

use std::path::Path;

use anyhow::Context;
use density_engine::{EventOutcome, InputEvent, PaintController, SessionBatch};

/// Counters from one replay.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReplaySummary {
    pub applied: usize,
    pub strokes: usize,
    pub resets: usize,
    pub rejected: usize,
}

/// Read and parse a script file.
pub fn load_events(path: &Path) -> anyhow::Result<Vec<InputEvent>> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("reading event script {}", path.display()))?;
    parse_events(&raw).with_context(|| format!("parsing event script {}", path.display()))
}

pub fn parse_events(raw: &str) -> anyhow::Result<Vec<InputEvent>> {
    Ok(serde_json::from_str(raw)?)
}

/// Feed every event to the controller.
///
/// A rejected event (unknown session, faulted session) is logged and the
/// replay continues with the next one.
pub fn replay(
    controller: &mut PaintController,
    batch: &mut SessionBatch,
    events: &[InputEvent],
) -> ReplaySummary {
    let mut summary = ReplaySummary::default();
    for (step, event) in events.iter().enumerate() {
        match controller.handle(batch, *event) {
            Ok(outcome) => {
                summary.applied += 1;
                match outcome {
                    EventOutcome::Painted { .. } => summary.strokes += 1,
                    EventOutcome::ResetAll => summary.resets += 1,
                    EventOutcome::Ignored | EventOutcome::Updated => {}
                }
            }
            Err(e) => {
                tracing::warn!(step, ?event, "Event rejected: {e}");
                summary.rejected += 1;
            }
        }
    }
    tracing::info!(
        applied = summary.applied,
        strokes = summary.strokes,
        resets = summary.resets,
        rejected = summary.rejected,
        "Event script replayed"
    );
    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use density_engine::RasterBuffer;

    const SCRIPT: &str = r#"[
        {"type": "pointer_enter", "session": 0},
        {"type": "density_changed", "value": 50},
        {"type": "brush_radius_changed", "radius": 0},
        {"type": "pointer_down", "session": 0},
        {"type": "pointer_move", "session": 0, "x": 5.0, "y": 5.0,
         "surface": {"left": 0.0, "top": 0.0, "width": 8.0, "height": 8.0}},
        {"type": "pointer_move", "session": 7, "x": 1.0, "y": 1.0,
         "surface": {"left": 0.0, "top": 0.0, "width": 8.0, "height": 8.0}},
        {"type": "pointer_up"}
    ]"#;

    fn batch_of_one(controller: &mut PaintController) -> SessionBatch {
        let mut batch = SessionBatch::new();
        controller.load(
            &mut batch,
            vec![("a.png", RasterBuffer::new(4, 4, vec![100; 16]))],
        );
        batch
    }

    #[test]
    fn test_replay_paints_and_counts() {
        let events = parse_events(SCRIPT).unwrap();
        let mut controller = PaintController::new(127, 3);
        let mut batch = batch_of_one(&mut controller);

        let summary = replay(&mut controller, &mut batch, &events);
        assert_eq!(
            summary,
            ReplaySummary {
                applied: 6,
                strokes: 1,
                resets: 0,
                rejected: 1,
            }
        );

        // 8px surface over a 4px buffer: (5,5) -> (2,2)
        let session = batch.get(0).unwrap();
        assert_eq!(session.output().get(2, 2), Some(255));
        assert_eq!(session.output().black_count(), 15);
        assert!(!controller.is_painting());
    }

    #[test]
    fn test_reset_event_counts() {
        let events = parse_events(r#"[{"type": "reset"}]"#).unwrap();
        let mut controller = PaintController::default();
        let mut batch = batch_of_one(&mut controller);
        let summary = replay(&mut controller, &mut batch, &events);
        assert_eq!(summary.resets, 1);
    }

    #[test]
    fn test_malformed_script_is_an_error() {
        assert!(parse_events(r#"[{"type": "teleport"}]"#).is_err());
        assert!(parse_events("{").is_err());
    }
}
