pub mod audio;
pub mod emotion;
pub mod integration;
pub mod llm;
pub mod speech;
pub mod story;
pub mod ui;

use thiserror::Error;

/// Markers that identify a quota or rate-limit rejection from the story API.
const RATE_LIMIT_MARKERS: [&str; 2] = ["429", "quota"];

#[derive(Error, Debug, Clone)]
pub enum StorytimeError {
    #[error("Story generation error: {0}")]
    GenerationError(String),

    #[error("Emotion service error: {0}")]
    EmotionServiceError(String),

    #[error("Audio device error: {0}")]
    AudioDeviceError(String),

    #[error("Audio playback error: {0}")]
    PlaybackError(String),

    #[error("Model load error: {0}")]
    ModelLoadError(String),

    #[error("TTS error: {0}")]
    TTSError(String),

    #[error("IO error: {0}")]
    IOError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Channel error: {0}")]
    ChannelError(String),

    #[error("Request cancelled")]
    Cancelled,
}

impl From<std::io::Error> for StorytimeError {
    fn from(e: std::io::Error) -> Self {
        StorytimeError::IOError(e.to_string())
    }
}

impl StorytimeError {
    /// Check if this error is recoverable
    pub fn is_recoverable(&self) -> bool {
        match self {
            // The user can always press the button again
            StorytimeError::GenerationError(_) => true,
            StorytimeError::EmotionServiceError(_) => true,
            StorytimeError::PlaybackError(_) => true,
            StorytimeError::TTSError(_) => true,
            StorytimeError::Cancelled => true,
            // Hardware, model files and settings need user intervention
            StorytimeError::AudioDeviceError(_) => false,
            StorytimeError::ModelLoadError(_) => false,
            StorytimeError::IOError(_) => false,
            StorytimeError::ConfigError(_) => false,
            StorytimeError::ChannelError(_) => false,
        }
    }

    /// Whether the story API rejected the request because of a rate limit or quota.
    ///
    /// The API only reports this through its error text, so the check looks for
    /// the status code or the exact, case-sensitive word "quota" in the message.
    pub fn is_rate_limited(&self) -> bool {
        match self {
            StorytimeError::GenerationError(message) => {
                RATE_LIMIT_MARKERS.iter().any(|marker| message.contains(marker))
            }
            _ => false,
        }
    }

    /// Get a user-friendly description
    pub fn user_message(&self) -> String {
        match self {
            StorytimeError::GenerationError(_) => {
                "Oops! Something went wrong while creating your story. Please try again."
                    .to_string()
            }
            StorytimeError::EmotionServiceError(_) => {
                "The story helper is not answering right now. Please try again.".to_string()
            }
            StorytimeError::AudioDeviceError(_) => {
                "Audio device error. Please check your speakers.".to_string()
            }
            StorytimeError::PlaybackError(_) => {
                "The story audio could not be played.".to_string()
            }
            StorytimeError::ModelLoadError(_) => {
                "Failed to load the voice model. Please verify model files are present."
                    .to_string()
            }
            StorytimeError::TTSError(_) => {
                "Reading aloud failed. The story is still shown as text.".to_string()
            }
            StorytimeError::IOError(_) => "File system error occurred.".to_string(),
            StorytimeError::ConfigError(_) => {
                "Configuration error. Please check settings.".to_string()
            }
            StorytimeError::ChannelError(_) => {
                "Internal communication error. Please restart the application.".to_string()
            }
            StorytimeError::Cancelled => "The request was cancelled.".to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, StorytimeError>;
