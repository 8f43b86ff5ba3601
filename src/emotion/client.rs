//! Emotion/story backend capability and its HTTP client
//!
//! The backend exposes two JSON endpoints:
//!
//! - `POST /detect-emotion` `{ "text": .. }` -> `{ "emotion": .. }`
//! - `POST /generate-story` `{ "emotion": .. }` -> `{ "story": .., "audio_url": "/audio/x.mp3" }`
//!
//! `audio_url` is a path on the service origin.

use crate::{Result, StorytimeError};
use async_trait::async_trait;
use reqwest::Url;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

pub const DEFAULT_EMOTION_SERVICE_URL: &str = "http://localhost:5000";

/// A story produced by the backend for a detected emotion
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmotionStory {
    pub story: String,
    /// Absolute URL of the narrated audio
    pub audio_url: String,
}

#[async_trait]
pub trait EmotionService: Send + Sync {
    /// Classify free text into an emotion label
    async fn detect_emotion(&self, text: &str) -> Result<String>;

    /// Produce a story and narration for an emotion label
    async fn generate_story(&self, emotion: &str) -> Result<EmotionStory>;
}

#[derive(Debug, Serialize)]
struct DetectEmotionRequest<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct DetectEmotionResponse {
    emotion: String,
}

#[derive(Debug, Serialize)]
struct GenerateStoryRequest<'a> {
    emotion: &'a str,
}

#[derive(Debug, Deserialize)]
struct GenerateStoryResponse {
    story: String,
    audio_url: String,
}

/// Configuration for [`HttpEmotionService`]
#[derive(Clone, Debug)]
pub struct EmotionServiceConfig {
    pub base_url: String,
    pub timeout: Duration,
}

impl Default for EmotionServiceConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_EMOTION_SERVICE_URL.to_string(),
            // Story and narration are generated synchronously by the backend
            timeout: Duration::from_secs(120),
        }
    }
}

impl EmotionServiceConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

pub struct HttpEmotionService {
    http: reqwest::Client,
    origin: Url,
}

impl HttpEmotionService {
    pub fn new(config: EmotionServiceConfig) -> Result<Self> {
        let origin = Url::parse(&config.base_url).map_err(|e| {
            StorytimeError::ConfigError(format!("Invalid emotion service URL {}: {}", config.base_url, e))
        })?;

        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| StorytimeError::ConfigError(format!("HTTP client: {}", e)))?;

        Ok(Self { http, origin })
    }

    /// Resolve a path against the service origin
    pub fn resolve(&self, path: &str) -> Result<Url> {
        self.origin
            .join(path)
            .map_err(|e| StorytimeError::EmotionServiceError(format!("Invalid path {}: {}", path, e)))
    }

    async fn post<B, R>(&self, path: &str, body: &B) -> Result<R>
    where
        B: Serialize + ?Sized,
        R: for<'de> Deserialize<'de>,
    {
        let url = self.resolve(path)?;
        debug!("POST {}", url);

        let response = self
            .http
            .post(url)
            .json(body)
            .send()
            .await
            .and_then(|response| response.error_for_status())
            .map_err(|e| StorytimeError::EmotionServiceError(format!("{}: {}", path, e)))?;

        response
            .json::<R>()
            .await
            .map_err(|e| StorytimeError::EmotionServiceError(format!("{}: invalid response: {}", path, e)))
    }
}

#[async_trait]
impl EmotionService for HttpEmotionService {
    async fn detect_emotion(&self, text: &str) -> Result<String> {
        let response: DetectEmotionResponse =
            self.post("/detect-emotion", &DetectEmotionRequest { text }).await?;
        Ok(response.emotion)
    }

    async fn generate_story(&self, emotion: &str) -> Result<EmotionStory> {
        let response: GenerateStoryResponse =
            self.post("/generate-story", &GenerateStoryRequest { emotion }).await?;

        Ok(EmotionStory {
            story: response.story,
            audio_url: self.resolve(&response.audio_url)?.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_audio_url_resolves_against_origin() {
        let service =
            HttpEmotionService::new(EmotionServiceConfig::new("http://localhost:5000")).unwrap();
        assert_eq!(
            service.resolve("/audio/tmp123.mp3").unwrap().as_str(),
            "http://localhost:5000/audio/tmp123.mp3"
        );
    }

    #[test]
    fn test_absolute_paths_ignore_base_path() {
        let service =
            HttpEmotionService::new(EmotionServiceConfig::new("http://example.com/api/")).unwrap();
        assert_eq!(
            service.resolve("/generate-story").unwrap().as_str(),
            "http://example.com/generate-story"
        );
    }

    #[test]
    fn test_invalid_base_url() {
        let result = HttpEmotionService::new(EmotionServiceConfig::new("not a url"));
        assert!(matches!(result, Err(StorytimeError::ConfigError(_))));
    }

    #[test]
    fn test_wire_format() {
        let body = serde_json::to_value(DetectEmotionRequest { text: "I feel lonely" }).unwrap();
        assert_eq!(body, serde_json::json!({"text": "I feel lonely"}));

        let story: GenerateStoryResponse =
            serde_json::from_str(r#"{"story":"A bird sang.","audio_url":"/audio/a.mp3"}"#).unwrap();
        assert_eq!(story.audio_url, "/audio/a.mp3");
    }
}
