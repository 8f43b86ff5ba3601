//! State of the "How are you feeling today?" panel

use crate::audio::{AudioPlayback, PlaybackEvent};
use crate::emotion::client::EmotionService;
use crate::emotion::pipeline::{EmotionEvent, EmotionPipeline, PipelineStep};
use crate::Result;
use crossbeam_channel::Receiver;
use std::sync::Arc;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Called with each newly detected emotion label
pub type EmotionCallback = Box<dyn FnMut(&str) + Send>;

/// A failure shown in the panel
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionError {
    /// `None` for playback failures
    pub step: Option<PipelineStep>,
    pub message: String,
}

impl SessionError {
    fn for_step(step: PipelineStep) -> Self {
        let message = match step {
            PipelineStep::DetectEmotion => {
                "We couldn't understand those feelings right now. Please try again."
            }
            PipelineStep::GenerateStory => {
                "We couldn't create your feelings story right now. Please try again."
            }
        };
        Self {
            step: Some(step),
            message: message.to_string(),
        }
    }

    fn playback(message: impl Into<String>) -> Self {
        Self {
            step: None,
            message: message.into(),
        }
    }
}

pub struct EmotionSession {
    /// Text being typed in the feelings box
    pub input_text: String,
    detected_emotion: String,
    story: String,
    audio_url: Option<String>,
    is_playing: bool,
    loading: bool,
    error: Option<SessionError>,
    current_request: Option<Uuid>,
    pipeline: EmotionPipeline,
    events: Receiver<EmotionEvent>,
    player: Box<dyn AudioPlayback>,
    on_emotion_detected: Option<EmotionCallback>,
}

impl EmotionSession {
    /// Create a session and start its pipeline worker
    pub fn new(service: Arc<dyn EmotionService>, player: Box<dyn AudioPlayback>) -> Result<Self> {
        let mut pipeline = EmotionPipeline::new(service);
        pipeline.start_worker()?;
        let events = pipeline.event_receiver();

        Ok(Self {
            input_text: String::new(),
            detected_emotion: String::new(),
            story: String::new(),
            audio_url: None,
            is_playing: false,
            loading: false,
            error: None,
            current_request: None,
            pipeline,
            events,
            player,
            on_emotion_detected: None,
        })
    }

    /// Register the parent's emotion callback
    pub fn with_emotion_callback(mut self, callback: impl FnMut(&str) + Send + 'static) -> Self {
        self.on_emotion_detected = Some(Box::new(callback));
        self
    }

    pub fn detected_emotion(&self) -> &str {
        &self.detected_emotion
    }

    pub fn story(&self) -> &str {
        &self.story
    }

    pub fn audio_url(&self) -> Option<&str> {
        self.audio_url.as_deref()
    }

    pub fn is_playing(&self) -> bool {
        self.is_playing
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&SessionError> {
        self.error.as_ref()
    }

    pub fn can_submit(&self) -> bool {
        !self.loading && !self.input_text.trim().is_empty()
    }

    /// Send the feelings text through the pipeline
    ///
    /// Returns false without side effects while a submission is running or
    /// when the text is blank.
    pub fn submit_feelings(&mut self, text: &str) -> bool {
        if self.loading || text.trim().is_empty() {
            return false;
        }

        let request_id = Uuid::new_v4();
        info!("Submitting feelings ({} chars)", text.len());

        match self.pipeline.submit(request_id, text.to_string()) {
            Ok(()) => {
                self.loading = true;
                self.error = None;
                self.current_request = Some(request_id);
                true
            }
            Err(e) => {
                warn!("Failed to submit feelings: {}", e);
                self.error = Some(SessionError::for_step(PipelineStep::DetectEmotion));
                false
            }
        }
    }

    /// Submit whatever is in the input box
    pub fn submit_input(&mut self) -> bool {
        let text = self.input_text.clone();
        self.submit_feelings(&text)
    }

    /// Play or pause the narrated audio; no-op until a story has audio
    pub fn toggle_playback(&mut self) {
        if self.audio_url.is_none() {
            return;
        }

        if self.is_playing {
            self.player.pause();
            self.is_playing = false;
        } else {
            match self.player.play() {
                Ok(()) => self.is_playing = true,
                Err(e) => {
                    warn!("Playback failed: {}", e);
                    self.error = Some(SessionError::playback(e.user_message()));
                }
            }
        }
    }

    /// Apply pipeline and playback events; call once per frame
    pub fn poll(&mut self) {
        while let Ok(event) = self.events.try_recv() {
            self.apply(event);
        }

        while let Some(event) = self.player.poll_event() {
            match event {
                PlaybackEvent::Loaded { url } => debug!("Audio ready: {}", url),
                PlaybackEvent::Ended => self.is_playing = false,
                PlaybackEvent::Failed(message) => {
                    warn!("Playback error: {}", message);
                    self.is_playing = false;
                    self.error = Some(SessionError::playback("The story audio could not be played."));
                }
            }
        }
    }

    fn apply(&mut self, event: EmotionEvent) {
        match event {
            EmotionEvent::EmotionDetected { emotion, request_id } => {
                if self.current_request != Some(request_id) {
                    return;
                }
                self.detected_emotion = emotion;
                if let Some(callback) = self.on_emotion_detected.as_mut() {
                    callback(&self.detected_emotion);
                }
            }
            EmotionEvent::StoryReady { story, request_id } => {
                if self.current_request != Some(request_id) {
                    return;
                }
                self.current_request = None;
                self.loading = false;
                self.story = story.story;

                // New audio replaces whatever was bound before
                self.is_playing = false;
                match self.player.load(&story.audio_url) {
                    Ok(()) => self.audio_url = Some(story.audio_url),
                    Err(e) => {
                        warn!("Failed to load audio: {}", e);
                        self.audio_url = None;
                        self.error = Some(SessionError::playback(e.user_message()));
                    }
                }
            }
            EmotionEvent::Failed {
                step,
                error,
                request_id,
            } => {
                if self.current_request != Some(request_id) {
                    return;
                }
                warn!("Feelings pipeline failed at {}: {}", step, error);
                self.current_request = None;
                self.loading = false;
                self.error = Some(SessionError::for_step(step));
            }
            EmotionEvent::Shutdown => debug!("Emotion pipeline shut down"),
        }
    }
}
