//! The ordered set of sessions for the current image batch.

use tracing::{info, warn};

use crate::raster::RasterBuffer;
use crate::session::EditSession;
use crate::{EngineError, Result};

/// A batch input that produced no session.
#[derive(Debug)]
pub struct LoadFailure {
    /// Position of the input in the submitted batch.
    pub index: usize,
    pub name: String,
    pub error: EngineError,
}

/// Sessions in load/selection order.
#[derive(Debug, Default)]
pub struct SessionBatch {
    sessions: Vec<EditSession>,
}

impl SessionBatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Discard every existing session and build one per decoded input.
    ///
    /// Inputs that failed to decode (or fail to build) are reported and
    /// skipped; the rest of the batch still loads, keeping input order.
    pub fn replace<I, S>(&mut self, inputs: I, default_density: u8) -> Vec<LoadFailure>
    where
        I: IntoIterator<Item = (S, Result<RasterBuffer>)>,
        S: Into<String>,
    {
        self.clear();

        let mut failures = Vec::new();
        for (index, (name, decoded)) in inputs.into_iter().enumerate() {
            let name = name.into();
            let built = decoded.and_then(|raster| EditSession::new(name.clone(), raster, default_density));
            match built {
                Ok(session) => self.sessions.push(session),
                Err(error) => {
                    warn!(index, name = %name, error = %error, "Image skipped");
                    failures.push(LoadFailure { index, name, error });
                }
            }
        }

        info!(
            loaded = self.sessions.len(),
            failed = failures.len(),
            default_density,
            "Batch loaded"
        );
        failures
    }

    /// Drop all sessions and their buffers.
    pub fn clear(&mut self) {
        if !self.sessions.is_empty() {
            info!(count = self.sessions.len(), "Discarding sessions");
        }
        self.sessions.clear();
    }

    /// Reset every session to its snapshot.
    ///
    /// A faulted session does not stop the others; the first error is
    /// returned after all sessions were visited.
    pub fn reset_all(&mut self) -> Result<()> {
        let mut first_err = None;
        for session in &mut self.sessions {
            if let Err(e) = session.reset() {
                warn!(id = %session.id(), error = %e, "Reset failed");
                first_err.get_or_insert(e);
            }
        }
        match first_err {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    pub fn get(&self, index: usize) -> Option<&EditSession> {
        self.sessions.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut EditSession> {
        self.sessions.get_mut(index)
    }

    /// Like [`get_mut`](Self::get_mut) but with a typed error.
    pub fn session_mut(&mut self, index: usize) -> Result<&mut EditSession> {
        self.sessions
            .get_mut(index)
            .ok_or(EngineError::SessionNotFound(index))
    }

    pub fn iter(&self) -> std::slice::Iter<'_, EditSession> {
        self.sessions.iter()
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

impl<'a> IntoIterator for &'a SessionBatch {
    type Item = &'a EditSession;
    type IntoIter = std::slice::Iter<'a, EditSession>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::brush::BrushConfig;
    use crate::session::SessionState;

    fn raster(width: u32, height: u32, sample: u8) -> Result<RasterBuffer> {
        RasterBuffer::new(width, height, vec![sample; (width * height) as usize])
    }

    #[test]
    fn test_failed_inputs_are_skipped_in_order() {
        let mut batch = SessionBatch::new();
        let failures = batch.replace(
            vec![
                ("a.png", raster(2, 2, 10)),
                ("broken.png", Err(EngineError::Decode("bad header".into()))),
                ("empty.png", raster(0, 3, 0)),
                ("b.png", raster(3, 1, 200)),
            ],
            127,
        );

        assert_eq!(batch.len(), 2);
        assert_eq!(batch.get(0).unwrap().name(), "a.png");
        assert_eq!(batch.get(1).unwrap().name(), "b.png");

        assert_eq!(failures.len(), 2);
        assert_eq!(failures[0].index, 1);
        assert!(matches!(failures[0].error, EngineError::Decode(_)));
        assert_eq!(failures[1].name, "empty.png");
        assert!(matches!(failures[1].error, EngineError::InvalidImage(_)));
    }

    #[test]
    fn test_replace_discards_previous_sessions() {
        let mut batch = SessionBatch::new();
        batch.replace(vec![("old.png", raster(1, 1, 0))], 127);
        let old_id = batch.get(0).unwrap().id();

        batch.replace(vec![("new1.png", raster(1, 1, 0)), ("new2.png", raster(1, 1, 0))], 127);
        assert_eq!(batch.len(), 2);
        assert!(batch.iter().all(|s| s.id() != old_id));
    }

    #[test]
    fn test_sessions_are_independent() {
        let mut batch = SessionBatch::new();
        batch.replace(vec![("a.png", raster(4, 4, 100)), ("b.png", raster(4, 4, 100))], 127);
        let b_before = batch.get(1).unwrap().output().clone();

        batch
            .session_mut(0)
            .unwrap()
            .paint(1, 1, BrushConfig::new(2, 0))
            .unwrap();

        let b = batch.get(1).unwrap();
        assert!(b.density().thresholds().iter().all(|&t| t == 127));
        assert_eq!(b.output(), &b_before);
        assert!(batch.get(0).unwrap().output().black_count() < 16);
    }

    #[test]
    fn test_reset_all() {
        let mut batch = SessionBatch::new();
        batch.replace(vec![("a.png", raster(3, 3, 50)), ("b.png", raster(3, 3, 50))], 60);
        for i in 0..2 {
            batch
                .session_mut(i)
                .unwrap()
                .paint(1, 1, BrushConfig::new(1, 0))
                .unwrap();
        }

        batch.reset_all().unwrap();
        for session in &batch {
            assert_eq!(session.density().thresholds(), session.snapshot().thresholds());
            assert_eq!(session.output().black_count(), 9);
        }
    }

    #[test]
    fn test_reset_all_continues_past_faulted_session() {
        let mut batch = SessionBatch::new();
        batch.replace(vec![("a.png", raster(3, 3, 50)), ("b.png", raster(3, 3, 50))], 60);
        batch.session_mut(0).unwrap().break_density_shape();
        batch
            .session_mut(1)
            .unwrap()
            .paint(1, 1, BrushConfig::new(1, 0))
            .unwrap();

        let result = batch.reset_all();
        assert!(matches!(result, Err(EngineError::DimensionMismatch { .. })));
        assert_eq!(batch.get(0).unwrap().state(), SessionState::Faulted);

        let b = batch.get(1).unwrap();
        assert_eq!(b.density().thresholds(), b.snapshot().thresholds());
        assert_eq!(b.output().black_count(), 9);
        assert_eq!(b.state(), SessionState::Editing);

        let b = batch.session_mut(1).unwrap();
        b.paint(0, 0, BrushConfig::new(0, 0)).unwrap();
        assert_eq!(b.output().black_count(), 8);
        assert!(matches!(
            batch.session_mut(0).unwrap().reset(),
            Err(EngineError::SessionFaulted(_))
        ));
    }

    #[test]
    fn test_session_mut_out_of_range() {
        let mut batch = SessionBatch::new();
        assert!(matches!(
            batch.session_mut(3),
            Err(EngineError::SessionNotFound(3))
        ));
    }
}
