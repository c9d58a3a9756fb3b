use anyhow::Result;

use crate::detect::backend::DetectorBackend;
use crate::detect::result::Detection;
use crate::frame::Frame;

/// Backend that never detects anything. Lets the loop run without a model.
#[derive(Default)]
pub struct StubBackend {
    frames_seen: u64,
}

impl StubBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn frames_seen(&self) -> u64 {
        self.frames_seen
    }
}

impl DetectorBackend for StubBackend {
    fn name(&self) -> &'static str {
        "stub"
    }

    fn detect(&mut self, _frame: &Frame) -> Result<Vec<Detection>> {
        self.frames_seen += 1;
        Ok(Vec::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stub_backend_reports_nothing() -> Result<()> {
        let mut backend = StubBackend::new();
        let frame = Frame::new(vec![0u8; 12], 2, 2)?;

        assert!(backend.detect(&frame)?.is_empty());
        assert!(backend.detect(&frame)?.is_empty());
        assert_eq!(backend.frames_seen(), 2);
        Ok(())
    }
}
