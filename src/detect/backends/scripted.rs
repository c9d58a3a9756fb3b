use anyhow::{anyhow, Result};
use std::collections::VecDeque;

use crate::detect::backend::DetectorBackend;
use crate::detect::result::Detection;
use crate::frame::Frame;

/// Replays a fixed list of per-frame detections.
///
/// Each call to `detect` pops the next script entry. Once the script is
/// exhausted the backend either repeats the last entry (`looping`) or fails.
pub struct ScriptedBackend {
    script: VecDeque<Vec<Detection>>,
    last: Option<Vec<Detection>>,
    repeat_last: bool,
}

impl ScriptedBackend {
    pub fn new(script: Vec<Vec<Detection>>) -> Self {
        Self {
            script: script.into(),
            last: None,
            repeat_last: false,
        }
    }

    /// Keep returning the final entry after the script runs out.
    pub fn looping(mut self) -> Self {
        self.repeat_last = true;
        self
    }
}

impl DetectorBackend for ScriptedBackend {
    fn name(&self) -> &'static str {
        "scripted"
    }

    fn detect(&mut self, _frame: &Frame) -> Result<Vec<Detection>> {
        if let Some(next) = self.script.pop_front() {
            self.last = Some(next.clone());
            return Ok(next);
        }
        match (&self.last, self.repeat_last) {
            (Some(last), true) => Ok(last.clone()),
            _ => Err(anyhow!("detection script exhausted")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detect::result::BoundingBox;

    fn person(confidence: f32) -> Detection {
        Detection::new(BoundingBox::new(1.0, 1.0, 5.0, 5.0), 0, confidence)
    }

    #[test]
    fn script_is_replayed_in_order_then_fails() -> Result<()> {
        let frame = Frame::new(vec![0u8; 12], 2, 2)?;
        let mut backend = ScriptedBackend::new(vec![vec![person(0.9)], vec![]]);

        assert_eq!(backend.detect(&frame)?, vec![person(0.9)]);
        assert!(backend.detect(&frame)?.is_empty());
        assert!(backend.detect(&frame).is_err());
        Ok(())
    }

    #[test]
    fn looping_script_repeats_last_entry() -> Result<()> {
        let frame = Frame::new(vec![0u8; 12], 2, 2)?;
        let mut backend = ScriptedBackend::new(vec![vec![person(0.8)]]).looping();

        for _ in 0..3 {
            assert_eq!(backend.detect(&frame)?, vec![person(0.8)]);
        }
        Ok(())
    }
}
