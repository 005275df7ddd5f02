//! Narration output. Calls are one-way: nothing reports when playback ends.

use std::process::{Command, Stdio};

use shared::domain::Utterance;
use tracing::{info, warn};

pub trait SpeechOutput: Send + Sync {
    fn speak(&self, utterance: Utterance);
}

/// Speaks through the `espeak-ng` CLI. The child process is spawned and left
/// running; if it cannot be spawned the utterance is only logged.
pub struct EspeakSpeechOutput {
    bin: String,
}

impl EspeakSpeechOutput {
    pub fn new(bin: impl Into<String>) -> Self {
        Self { bin: bin.into() }
    }

    pub fn command(&self, utterance: &Utterance) -> Command {
        let mut cmd = Command::new(&self.bin);
        cmd.arg("-v")
            .arg(espeak_voice(&utterance.language))
            .arg(&utterance.text)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null());
        cmd
    }
}

impl Default for EspeakSpeechOutput {
    fn default() -> Self {
        Self::new("espeak-ng")
    }
}

impl SpeechOutput for EspeakSpeechOutput {
    fn speak(&self, utterance: Utterance) {
        match self.command(&utterance).spawn() {
            Ok(mut child) => {
                info!(
                    pid = child.id(),
                    language = %utterance.language,
                    chars = utterance.text.chars().count(),
                    "narration started"
                );
                // Reaped off-thread; nobody waits on narration.
                std::thread::spawn(move || {
                    let _ = child.wait();
                });
            }
            Err(err) => warn!(
                bin = %self.bin,
                language = %utterance.language,
                "speech engine unavailable ({err}); narration text: {}",
                utterance.text
            ),
        }
    }
}

/// `en-US` -> `en-us`; espeak voice names are lowercase.
pub fn espeak_voice(language: &str) -> String {
    language.trim().to_ascii_lowercase()
}
