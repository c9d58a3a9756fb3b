use anyhow::{anyhow, Context, Result};
use std::process::{Command, Stdio};

use super::Narrator;

/// Speaks through an external text-to-speech program (`espeak-ng`, `say`, ...).
///
/// The utterance is passed as the final argument. `speak` waits for the
/// program to exit, so playback blocks the caller.
pub struct CommandNarrator {
    program: String,
    args: Vec<String>,
}

impl CommandNarrator {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    fn command(&self, text: &str) -> Command {
        let mut command = Command::new(&self.program);
        command
            .args(&self.args)
            .arg(text)
            .stdin(Stdio::null())
            .stdout(Stdio::null());
        command
    }
}

impl Narrator for CommandNarrator {
    fn speak(&mut self, text: &str) -> Result<()> {
        log::debug!("speaking via {}: {}", self.program, text);
        let status = self
            .command(text)
            .status()
            .with_context(|| format!("run speech command {}", self.program))?;
        if !status.success() {
            return Err(anyhow!(
                "speech command {} exited with {}",
                self.program,
                status
            ));
        }
        Ok(())
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    #[test]
    fn successful_command_is_ok() -> Result<()> {
        let mut narrator = CommandNarrator::new("true", Vec::new());
        narrator.speak("Detected: person ")?;
        Ok(())
    }

    #[test]
    fn failing_command_is_an_error() {
        let mut narrator = CommandNarrator::new("false", Vec::new());
        let err = narrator.speak("Detected: person ").err().expect("must fail");
        assert!(err.to_string().contains("exited with"));
    }

    #[test]
    fn missing_program_is_an_error() {
        let mut narrator = CommandNarrator::new("definitely-not-a-tts-binary", Vec::new());
        let err = narrator.speak("hello").err().expect("must fail");
        assert!(err.to_string().contains("run speech command"));
    }

    #[test]
    fn utterance_is_the_last_argument() {
        let narrator = CommandNarrator::new("espeak-ng", vec!["-s".into(), "150".into()]);
        let command = narrator.command("Detected: cup ");
        let args: Vec<_> = command
            .get_args()
            .map(|a| a.to_string_lossy().into_owned())
            .collect();
        assert_eq!(args, ["-s", "150", "Detected: cup "]);
    }
}
