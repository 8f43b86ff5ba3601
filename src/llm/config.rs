//! Gemini API configuration

use secrecy::SecretString;
use std::time::Duration;

pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.0-flash";
pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Configuration for the story generator
#[derive(Clone, Debug)]
pub struct GeminiConfig {
    /// API key, sent as the `key` query parameter
    pub api_key: SecretString,

    /// Model name, e.g. `gemini-2.0-flash`
    pub model: String,

    /// API root, without a trailing `/models`
    pub base_url: String,

    /// Sampling temperature; `None` keeps the model default
    pub temperature: Option<f32>,

    /// Whole-request timeout
    pub timeout: Duration,
}

impl GeminiConfig {
    /// Create a configuration with the default model and endpoint
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: SecretString::from(api_key.into()),
            model: DEFAULT_GEMINI_MODEL.to_string(),
            base_url: DEFAULT_GEMINI_BASE_URL.to_string(),
            temperature: None,
            timeout: Duration::from_secs(30),
        }
    }

    /// Set the model name
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Point the client at a different API root (used by tests and proxies)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Set the temperature
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Set the request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Full `generateContent` URL for the configured model
    pub fn endpoint(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            self.model
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;

    #[test]
    fn test_default_config() {
        let config = GeminiConfig::new("secret");
        assert_eq!(config.model, "gemini-2.0-flash");
        assert_eq!(config.api_key.expose_secret(), "secret");
        assert!(config.temperature.is_none());
    }

    #[test]
    fn test_endpoint() {
        let config = GeminiConfig::new("k")
            .with_base_url("http://localhost:8080/v1beta/")
            .with_model("gemini-test");
        assert_eq!(
            config.endpoint(),
            "http://localhost:8080/v1beta/models/gemini-test:generateContent"
        );
    }

    #[test]
    fn test_debug_hides_key() {
        let config = GeminiConfig::new("super-secret-key");
        assert!(!format!("{:?}", config).contains("super-secret-key"));
    }
}
