//! Building the backends the UI talks to
//!
//! Every capability has a real implementation and an unavailable fallback.
//! A missing API key, model file or audio device degrades one feature and
//! never stops the app from starting.

use crate::audio::{AudioPlayback, UnavailablePlayback};
use crate::emotion::{EmotionService, HttpEmotionService};
use crate::integration::config::AppConfig;
use crate::llm::{GeminiClient, StoryGenerator, UnavailableGenerator};
use crate::speech::{SpeechSynthesizer, UnavailableSpeech};
use crate::Result;
use std::sync::Arc;
use tracing::{info, warn};

/// The capabilities injected into the UI state
pub struct Services {
    pub generator: Arc<dyn StoryGenerator>,
    pub emotion: Arc<dyn EmotionService>,
    pub speech: Box<dyn SpeechSynthesizer>,
    pub playback: Box<dyn AudioPlayback>,
}

impl Services {
    /// Connect every backend described by `config`
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        config.validate()?;

        let generator: Arc<dyn StoryGenerator> = match &config.gemini {
            Some(gemini) => {
                info!("Using Gemini model {}", gemini.model);
                Arc::new(GeminiClient::new(gemini.clone())?)
            }
            None => {
                warn!("GEMINI_API_KEY is not set; story generation is disabled");
                Arc::new(UnavailableGenerator::new("No API key configured"))
            }
        };

        info!("Using emotion service at {}", config.emotion.base_url);
        let emotion: Arc<dyn EmotionService> =
            Arc::new(HttpEmotionService::new(config.emotion.clone())?);

        Ok(Self {
            generator,
            emotion,
            speech: build_speech(config),
            playback: build_playback(config),
        })
    }
}

#[cfg(feature = "audio-io")]
fn build_speech(config: &AppConfig) -> Box<dyn SpeechSynthesizer> {
    use crate::speech::VitsSpeech;

    if !config.enable_audio_output {
        return Box::new(UnavailableSpeech::new("Speech output is disabled"));
    }

    let Some(tts) = &config.tts else {
        warn!("No speech model configured; reading aloud is disabled");
        return Box::new(UnavailableSpeech::new("No speech model configured"));
    };

    match VitsSpeech::new(tts.clone()) {
        Ok(speech) => {
            info!("Speech model loaded");
            Box::new(speech)
        }
        Err(e) => {
            warn!("Speech unavailable: {}", e);
            Box::new(UnavailableSpeech::new(e.to_string()))
        }
    }
}

#[cfg(not(feature = "audio-io"))]
fn build_speech(_config: &AppConfig) -> Box<dyn SpeechSynthesizer> {
    Box::new(UnavailableSpeech::new("Built without audio support"))
}

#[cfg(feature = "audio-io")]
fn build_playback(config: &AppConfig) -> Box<dyn AudioPlayback> {
    use crate::audio::StreamPlayer;

    if !config.enable_audio_output {
        return Box::new(UnavailablePlayback::new("Audio output is disabled"));
    }

    match StreamPlayer::new() {
        Ok(player) => Box::new(player),
        Err(e) => {
            warn!("Audio playback unavailable: {}", e);
            Box::new(UnavailablePlayback::new(e.to_string()))
        }
    }
}

#[cfg(not(feature = "audio-io"))]
fn build_playback(_config: &AppConfig) -> Box<dyn AudioPlayback> {
    Box::new(UnavailablePlayback::new("Built without audio support"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::emotion::EmotionServiceConfig;

    #[test]
    fn test_text_only_services() {
        let config = AppConfig::default().without_audio_output();
        let mut services = Services::from_config(&config).unwrap();

        assert!(services.speech.voices().is_empty());
        assert!(services.playback.play().is_err());
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let config = AppConfig::default().with_emotion(EmotionServiceConfig::new("::"));
        assert!(Services::from_config(&config).is_err());
    }

    #[tokio::test]
    async fn test_missing_key_disables_generation() {
        let services = Services::from_config(&AppConfig::default().without_audio_output()).unwrap();
        let result = services.generator.generate("prompt").await;
        assert!(result.is_err());
    }
}
