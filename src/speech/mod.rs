//! Reading stories aloud
//!
//! This module provides:
//! - [`SpeechSynthesizer`], the capability the UI drives
//! - [`Narrator`], the speaking/stopped state for the story card
//! - [`VitsSpeech`], a sherpa-rs VITS backend (with the `audio-io` feature)

pub mod narrator;
pub mod text;
#[cfg(feature = "audio-io")]
pub mod tts;

use crate::{Result, StorytimeError};
use uuid::Uuid;

pub use narrator::{select_voice, Narrator, STORY_PITCH, STORY_RATE};
pub use text::prepare_for_speech;
#[cfg(feature = "audio-io")]
pub use tts::{TTSConfig, VitsSpeech};

/// A voice offered by the speech backend
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Voice {
    pub name: String,
    /// Backend-specific identifier (a speaker id for VITS models)
    pub id: i32,
}

impl Voice {
    pub fn new(name: impl Into<String>, id: i32) -> Self {
        Self {
            name: name.into(),
            id,
        }
    }
}

/// One request to read text aloud
#[derive(Debug, Clone, PartialEq)]
pub struct Utterance {
    pub id: Uuid,
    pub text: String,
    pub voice: Option<Voice>,
    /// 1.0 is the voice's natural pitch
    pub pitch: f32,
    /// 1.0 is the voice's natural tempo
    pub rate: f32,
}

impl Utterance {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            text: text.into(),
            voice: None,
            pitch: 1.0,
            rate: 1.0,
        }
    }

    pub fn with_voice(mut self, voice: Option<Voice>) -> Self {
        self.voice = voice;
        self
    }

    pub fn with_pitch(mut self, pitch: f32) -> Self {
        self.pitch = pitch;
        self
    }

    pub fn with_rate(mut self, rate: f32) -> Self {
        self.rate = rate;
        self
    }
}

/// Lifecycle notifications for an utterance
#[derive(Debug, Clone, PartialEq)]
pub enum SpeechEvent {
    Started { id: Uuid },
    Ended { id: Uuid },
    Failed { id: Uuid, error: String },
}

/// Host speech capability
pub trait SpeechSynthesizer: Send {
    /// Voices available for [`Utterance::voice`]
    fn voices(&self) -> Vec<Voice>;

    /// Queue an utterance; lifecycle arrives through [`poll_event`](Self::poll_event)
    fn speak(&mut self, utterance: Utterance) -> Result<()>;

    /// Stop the current utterance and drop anything queued
    fn cancel(&mut self);

    fn poll_event(&mut self) -> Option<SpeechEvent>;
}

/// Backend used when speech output is disabled or the model is missing
#[derive(Debug, Default)]
pub struct UnavailableSpeech {
    reason: String,
}

impl UnavailableSpeech {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

impl SpeechSynthesizer for UnavailableSpeech {
    fn voices(&self) -> Vec<Voice> {
        Vec::new()
    }

    fn speak(&mut self, _utterance: Utterance) -> Result<()> {
        Err(StorytimeError::TTSError(self.reason.clone()))
    }

    fn cancel(&mut self) {}

    fn poll_event(&mut self) -> Option<SpeechEvent> {
        None
    }
}
