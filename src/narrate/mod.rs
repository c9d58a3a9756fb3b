//! Spoken narration of detected objects.
//!
//! A `Narrator` speaks one utterance at a time and blocks until playback ends.
//! The detection loop owns its narrator; there is no process-wide engine.

mod command;

use anyhow::Result;

use crate::config::SpeechSettings;

pub use command::CommandNarrator;

pub trait Narrator {
    /// Speak `text`, returning once the utterance has finished.
    fn speak(&mut self, text: &str) -> Result<()>;
}

impl<N: Narrator + ?Sized> Narrator for Box<N> {
    fn speak(&mut self, text: &str) -> Result<()> {
        (**self).speak(text)
    }
}

/// Utterance for a tick's labels, or `None` when nothing was detected.
pub fn narration_text(labels: &[String]) -> Option<String> {
    if labels.is_empty() {
        None
    } else {
        Some(format!("Detected: {}", labels.join(", ")))
    }
}

/// Build the narrator described by the speech settings.
pub fn open_narrator(settings: &SpeechSettings) -> Box<dyn Narrator> {
    if settings.enabled {
        Box::new(CommandNarrator::new(
            settings.command.clone(),
            settings.args.clone(),
        ))
    } else {
        Box::new(SilentNarrator)
    }
}

/// Narrator used when speech is disabled.
#[derive(Clone, Copy, Debug, Default)]
pub struct SilentNarrator;

impl Narrator for SilentNarrator {
    fn speak(&mut self, text: &str) -> Result<()> {
        log::debug!("speech disabled, skipping: {}", text);
        Ok(())
    }
}

/// Records utterances instead of playing them.
#[derive(Clone, Debug, Default)]
pub struct MemoryNarrator {
    spoken: Vec<String>,
}

impl MemoryNarrator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn spoken(&self) -> &[String] {
        &self.spoken
    }
}

impl Narrator for MemoryNarrator {
    fn speak(&mut self, text: &str) -> Result<()> {
        self.spoken.push(text.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(names: &[&str]) -> Vec<String> {
        names.iter().map(|n| format!("{} ", n)).collect()
    }

    #[test]
    fn narration_joins_labels_with_trailing_spaces() {
        assert_eq!(
            narration_text(&labels(&["person"])).as_deref(),
            Some("Detected: person ")
        );
        assert_eq!(
            narration_text(&labels(&["car", "car"])).as_deref(),
            Some("Detected: car , car ")
        );
    }

    #[test]
    fn empty_labels_produce_no_narration() {
        assert_eq!(narration_text(&[]), None);
    }

    #[test]
    fn disabled_speech_selects_silent_narrator() -> Result<()> {
        let settings = SpeechSettings {
            enabled: false,
            command: String::new(),
            args: Vec::new(),
        };
        open_narrator(&settings).speak("Detected: cat ")?;
        Ok(())
    }

    #[test]
    fn memory_narrator_records_in_order() -> Result<()> {
        let mut narrator = MemoryNarrator::new();
        narrator.speak("one")?;
        narrator.speak("two")?;
        assert_eq!(narrator.spoken(), ["one", "two"]);
        Ok(())
    }
}
