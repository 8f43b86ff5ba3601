use crate::{Result, StorytimeError};

/// Notifications from an audio backend
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlaybackEvent {
    /// The audio at this URL is buffered and ready to play
    Loaded { url: String },
    /// Playback reached the end of the audio
    Ended,
    /// Loading or playback failed
    Failed(String),
}

/// A single audio element bound to one URL at a time
pub trait AudioPlayback: Send {
    /// Bind to `url`, replacing (and stopping) any previous audio
    fn load(&mut self, url: &str) -> Result<()>;

    /// Start or resume; restarts from the beginning after `Ended`
    fn play(&mut self) -> Result<()>;

    fn pause(&mut self);

    /// Next pending event, if any
    fn poll_event(&mut self) -> Option<PlaybackEvent>;
}

/// Backend used when audio output is disabled or unavailable
#[derive(Debug, Default)]
pub struct UnavailablePlayback {
    reason: String,
}

impl UnavailablePlayback {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

impl AudioPlayback for UnavailablePlayback {
    fn load(&mut self, _url: &str) -> Result<()> {
        Ok(())
    }

    fn play(&mut self) -> Result<()> {
        Err(StorytimeError::AudioDeviceError(self.reason.clone()))
    }

    fn pause(&mut self) {}

    fn poll_event(&mut self) -> Option<PlaybackEvent> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unavailable_playback_refuses_to_play() {
        let mut playback = UnavailablePlayback::new("audio output disabled");
        assert!(playback.load("http://localhost/a.mp3").is_ok());
        let error = playback.play().unwrap_err();
        assert!(error.to_string().contains("audio output disabled"));
        assert!(playback.poll_event().is_none());
    }
}
