//! Configuration for the integration layer
//!
//! Provides centralized configuration for all components. Values come from
//! builder methods or from environment variables, never from files.

use crate::emotion::EmotionServiceConfig;
use crate::llm::config::{GeminiConfig, DEFAULT_GEMINI_MODEL};
use crate::story::generation::DEFAULT_COOLDOWN_SECS;
use crate::{Result, StorytimeError};
use reqwest::Url;

#[cfg(feature = "audio-io")]
use crate::speech::TTSConfig;

pub const ENV_GEMINI_API_KEY: &str = "GEMINI_API_KEY";
pub const ENV_GEMINI_MODEL: &str = "STORYTIME_GEMINI_MODEL";
pub const ENV_EMOTION_URL: &str = "STORYTIME_EMOTION_URL";
pub const ENV_TTS_MODEL: &str = "STORYTIME_TTS_MODEL";
pub const ENV_TTS_TOKENS: &str = "STORYTIME_TTS_TOKENS";
pub const ENV_TTS_DATA_DIR: &str = "STORYTIME_TTS_DATA_DIR";
pub const ENV_COOLDOWN_SECS: &str = "STORYTIME_COOLDOWN_SECS";

/// Configuration for the complete application
#[derive(Clone, Debug)]
pub struct AppConfig {
    /// Story API settings; `None` when no API key is available
    pub gemini: Option<GeminiConfig>,

    /// Emotion/story backend settings
    pub emotion: EmotionServiceConfig,

    /// Speech model; `None` disables reading aloud
    #[cfg(feature = "audio-io")]
    pub tts: Option<TTSConfig>,

    /// Seconds to wait after a rate-limit rejection
    pub cooldown_secs: u32,

    /// Whether to open the audio output device at all
    pub enable_audio_output: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            gemini: None,
            emotion: EmotionServiceConfig::default(),
            #[cfg(feature = "audio-io")]
            tts: None,
            cooldown_secs: DEFAULT_COOLDOWN_SECS,
            enable_audio_output: true,
        }
    }
}

impl AppConfig {
    /// Read the configuration from the process environment
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from any key lookup
    ///
    /// Empty values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let mut config = Self::default();

        if let Some(api_key) = get(ENV_GEMINI_API_KEY) {
            let model = get(ENV_GEMINI_MODEL).unwrap_or_else(|| DEFAULT_GEMINI_MODEL.to_string());
            config.gemini = Some(GeminiConfig::new(api_key).with_model(model));
        }

        if let Some(url) = get(ENV_EMOTION_URL) {
            config.emotion = EmotionServiceConfig::new(url);
        }

        if let Some(secs) = get(ENV_COOLDOWN_SECS) {
            config.cooldown_secs = secs.parse().map_err(|_| {
                StorytimeError::ConfigError(format!("{} must be a whole number, got {:?}", ENV_COOLDOWN_SECS, secs))
            })?;
        }

        #[cfg(feature = "audio-io")]
        if let (Some(model), Some(tokens)) = (get(ENV_TTS_MODEL), get(ENV_TTS_TOKENS)) {
            let mut tts = TTSConfig::new(model, tokens);
            if let Some(data_dir) = get(ENV_TTS_DATA_DIR) {
                tts = tts.with_data_dir(data_dir);
            }
            config.tts = Some(tts);
        }

        Ok(config)
    }

    /// Set the story API configuration
    pub fn with_gemini(mut self, gemini: GeminiConfig) -> Self {
        self.gemini = Some(gemini);
        self
    }

    /// Set the emotion backend configuration
    pub fn with_emotion(mut self, emotion: EmotionServiceConfig) -> Self {
        self.emotion = emotion;
        self
    }

    /// Set the speech model
    #[cfg(feature = "audio-io")]
    pub fn with_tts(mut self, tts: TTSConfig) -> Self {
        self.tts = Some(tts);
        self
    }

    pub fn with_cooldown_secs(mut self, secs: u32) -> Self {
        self.cooldown_secs = secs;
        self
    }

    /// Disable audio output (text-only mode)
    pub fn without_audio_output(mut self) -> Self {
        self.enable_audio_output = false;
        self
    }

    /// Validate the configuration
    ///
    /// Missing optional services are not errors; the app runs with fallbacks.
    pub fn validate(&self) -> Result<()> {
        Url::parse(&self.emotion.base_url).map_err(|e| {
            StorytimeError::ConfigError(format!(
                "Invalid emotion service URL {}: {}",
                self.emotion.base_url, e
            ))
        })?;

        if let Some(gemini) = &self.gemini {
            if gemini.model.trim().is_empty() {
                return Err(StorytimeError::ConfigError("Gemini model name is empty".into()));
            }
        }

        if self.cooldown_secs == 0 {
            return Err(StorytimeError::ConfigError(
                "Cooldown must be at least one second".into(),
            ));
        }

        #[cfg(feature = "audio-io")]
        if self.enable_audio_output {
            if let Some(tts) = &self.tts {
                tts.validate()?;
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert!(config.gemini.is_none());
        assert!(config.enable_audio_output);
        assert_eq!(config.cooldown_secs, 60);
        assert_eq!(config.emotion.base_url, "http://localhost:5000");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_from_lookup() {
        let config = AppConfig::from_lookup(lookup(&[
            (ENV_GEMINI_API_KEY, "secret"),
            (ENV_GEMINI_MODEL, "gemini-1.5-flash"),
            (ENV_EMOTION_URL, "http://stories.local:8080"),
            (ENV_COOLDOWN_SECS, "30"),
        ]))
        .unwrap();

        assert_eq!(config.gemini.as_ref().map(|g| g.model.as_str()), Some("gemini-1.5-flash"));
        assert_eq!(config.emotion.base_url, "http://stories.local:8080");
        assert_eq!(config.cooldown_secs, 30);
    }

    #[test]
    fn test_blank_key_counts_as_missing() {
        let config = AppConfig::from_lookup(lookup(&[(ENV_GEMINI_API_KEY, "  ")])).unwrap();
        assert!(config.gemini.is_none());
    }

    #[test]
    fn test_bad_cooldown_is_rejected() {
        let result = AppConfig::from_lookup(lookup(&[(ENV_COOLDOWN_SECS, "soon")]));
        assert!(matches!(result, Err(StorytimeError::ConfigError(_))));
    }

    #[test]
    fn test_config_builder() {
        let config = AppConfig::default()
            .with_gemini(GeminiConfig::new("key"))
            .with_cooldown_secs(5)
            .without_audio_output();

        assert!(config.gemini.is_some());
        assert_eq!(config.cooldown_secs, 5);
        assert!(!config.enable_audio_output);
    }

    #[test]
    fn test_validate() {
        let bad_url = AppConfig::default().with_emotion(EmotionServiceConfig::new("not a url"));
        assert!(bad_url.validate().is_err());

        let no_cooldown = AppConfig::default().with_cooldown_secs(0);
        assert!(no_cooldown.validate().is_err());
    }
}
