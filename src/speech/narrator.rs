//! Speaking state for the story card
//!
//! A new [`Narrator::speak`] while another utterance is active cancels the
//! old one and replaces it. Events from the cancelled utterance are ignored,
//! so a late `Ended` can never clear the flag of its replacement.

use crate::speech::text::prepare_for_speech;
use crate::speech::{SpeechEvent, SpeechSynthesizer, Utterance, Voice};
use crate::{Result, StorytimeError};
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Slightly higher than natural for a storyteller voice
pub const STORY_PITCH: f32 = 1.2;
/// Slightly slower than natural
pub const STORY_RATE: f32 = 0.9;

const PREFERRED_VOICE_PATTERNS: [&str; 2] = ["female", "girl"];

/// First voice whose name suggests a female speaker
pub fn select_voice(voices: &[Voice]) -> Option<&Voice> {
    voices.iter().find(|voice| {
        let name = voice.name.to_lowercase();
        PREFERRED_VOICE_PATTERNS
            .iter()
            .any(|pattern| name.contains(pattern))
    })
}

pub struct Narrator {
    synthesizer: Box<dyn SpeechSynthesizer>,
    current: Option<Uuid>,
    is_speaking: bool,
    last_error: Option<String>,
}

impl Narrator {
    pub fn new(synthesizer: Box<dyn SpeechSynthesizer>) -> Self {
        Self {
            synthesizer,
            current: None,
            is_speaking: false,
            last_error: None,
        }
    }

    pub fn is_speaking(&self) -> bool {
        self.is_speaking
    }

    /// An utterance has been submitted and not yet finished or stopped
    pub fn is_active(&self) -> bool {
        self.current.is_some()
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Start reading `text`, replacing anything already being read
    pub fn speak(&mut self, text: &str) -> Result<()> {
        let spoken = prepare_for_speech(text);
        if spoken.is_empty() {
            return Err(StorytimeError::TTSError("Nothing to read".into()));
        }

        if self.current.is_some() {
            debug!("Replacing active utterance");
            self.stop_speaking();
        }

        let voices = self.synthesizer.voices();
        let voice = select_voice(&voices).cloned();
        let utterance = Utterance::new(spoken)
            .with_voice(voice)
            .with_pitch(STORY_PITCH)
            .with_rate(STORY_RATE);
        let id = utterance.id;

        info!(
            "Reading story aloud with voice {:?}",
            utterance.voice.as_ref().map(|v| v.name.as_str())
        );

        match self.synthesizer.speak(utterance) {
            Ok(()) => {
                self.current = Some(id);
                self.last_error = None;
                Ok(())
            }
            Err(e) => {
                warn!("Speech failed to start: {}", e);
                self.last_error = Some(e.user_message());
                Err(e)
            }
        }
    }

    /// Cancel any utterance; always leaves the narrator silent
    pub fn stop_speaking(&mut self) {
        self.synthesizer.cancel();
        self.current = None;
        self.is_speaking = false;
    }

    /// Apply backend events; call once per frame
    pub fn poll(&mut self) {
        while let Some(event) = self.synthesizer.poll_event() {
            match event {
                SpeechEvent::Started { id } if self.current == Some(id) => {
                    self.is_speaking = true;
                }
                SpeechEvent::Ended { id } if self.current == Some(id) => {
                    self.current = None;
                    self.is_speaking = false;
                }
                SpeechEvent::Failed { id, error } if self.current == Some(id) => {
                    warn!("Speech failed: {}", error);
                    self.current = None;
                    self.is_speaking = false;
                    self.last_error = Some(StorytimeError::TTSError(error).user_message());
                }
                stale => debug!("Ignoring stale speech event {:?}", stale),
            }
        }
    }
}

impl Drop for Narrator {
    fn drop(&mut self) {
        if self.current.is_some() {
            self.synthesizer.cancel();
        }
    }
}
