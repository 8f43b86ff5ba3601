//! Application state management
//!
//! This module provides the central state for the Storytime UI. Widgets
//! mutate it directly; background results arrive through [`AppState::poll_events`].

use crate::emotion::EmotionSession;
use crate::integration::Services;
use crate::llm::{StoryEvent, StoryPipeline};
use crate::speech::Narrator;
use crate::story::{GenerationState, Profile};
use crate::Result;
use crossbeam_channel::Receiver;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info};

const MAX_LOG_MESSAGES: usize = 100;

/// Debug information displayed in the debug panel
#[derive(Debug, Clone, Default)]
pub struct DebugInfo {
    /// Last story generation timing
    pub generation_stats: String,
    /// Current frame rate
    pub fps: f32,
    /// Recent log messages
    pub log_messages: VecDeque<String>,
}

impl DebugInfo {
    pub fn new() -> Self {
        Self {
            log_messages: VecDeque::with_capacity(MAX_LOG_MESSAGES),
            ..Default::default()
        }
    }

    pub fn add_log(&mut self, message: String) {
        if self.log_messages.len() >= MAX_LOG_MESSAGES {
            self.log_messages.pop_front();
        }
        self.log_messages.push_back(message);
    }
}

/// Central application state
pub struct AppState {
    /// Name, mood and theme from the form
    pub profile: Profile,

    /// Story request lifecycle
    pub generation: GenerationState,

    /// Read-aloud state for the story card
    pub narrator: Narrator,

    /// The feelings panel
    pub emotion: EmotionSession,

    /// Debug information
    pub debug_info: DebugInfo,

    /// Whether to show the debug panel
    pub show_debug_panel: bool,

    /// Written by the feelings panel callback
    detected_emotion: Arc<Mutex<String>>,

    story_pipeline: StoryPipeline,
    story_events: Receiver<StoryEvent>,

    /// Frame time tracking for FPS
    frame_times: VecDeque<f64>,
}

impl AppState {
    /// Create the state and start the background workers
    pub fn new(services: Services, cooldown_secs: u32) -> Result<Self> {
        let mut story_pipeline = StoryPipeline::new(services.generator);
        story_pipeline.start_worker()?;
        let story_events = story_pipeline.event_receiver();

        let detected_emotion = Arc::new(Mutex::new(String::new()));
        let reported = Arc::clone(&detected_emotion);
        let emotion = EmotionSession::new(services.emotion, services.playback)?
            .with_emotion_callback(move |emotion| *reported.lock() = emotion.to_string());

        Ok(Self {
            profile: Profile::default(),
            generation: GenerationState::new(cooldown_secs),
            narrator: Narrator::new(services.speech),
            emotion,
            debug_info: DebugInfo::new(),
            show_debug_panel: false,
            detected_emotion,
            story_pipeline,
            story_events,
            frame_times: VecDeque::with_capacity(60),
        })
    }

    /// Latest emotion reported by the feelings panel
    pub fn detected_emotion(&self) -> String {
        self.detected_emotion.lock().clone()
    }

    /// Whether the "Create My Story" button is enabled
    pub fn can_request_story(&self) -> bool {
        self.generation.can_request(&self.profile)
    }

    /// Ask for a story for the current profile
    ///
    /// A no-op returning false while generating, cooling down or without a name.
    pub fn request_story(&mut self, now: Instant) -> bool {
        let Some(request) = self.generation.begin(&self.profile) else {
            return false;
        };

        // The story being read is about to be replaced
        if self.narrator.is_active() {
            self.narrator.stop_speaking();
        }

        if let Err(e) = self.story_pipeline.generate(request.request_id, request.prompt) {
            self.debug_info.add_log(format!("Story request failed: {}", e));
            self.generation.fail(request.request_id, &e, now);
            return false;
        }

        self.debug_info.add_log(format!(
            "Story requested for {}",
            self.profile.display_name()
        ));
        true
    }

    /// Read the story aloud, or stop if it is already being read
    pub fn toggle_reading(&mut self) {
        if self.narrator.is_active() {
            self.narrator.stop_speaking();
            return;
        }

        let story = self.generation.story().to_string();
        if story.is_empty() {
            return;
        }
        if let Err(e) = self.narrator.speak(&story) {
            self.debug_info.add_log(format!("Read aloud failed: {}", e));
        }
    }

    /// Process incoming events from background workers and advance the cooldown
    pub fn poll_events(&mut self, now: Instant) {
        while let Ok(event) = self.story_events.try_recv() {
            match event {
                StoryEvent::Complete {
                    text,
                    request_id,
                    total_ms,
                } => {
                    if self.generation.complete(request_id, text) {
                        info!("Story ready in {}ms", total_ms);
                        self.debug_info.generation_stats = format!("Last story: {}ms", total_ms);
                        self.debug_info.add_log("Story received".to_string());
                    }
                }
                StoryEvent::Error { error, request_id } => {
                    self.debug_info.add_log(format!("Generation error: {}", error));
                    if let Some(request_id) = request_id {
                        self.generation.fail(request_id, &error, now);
                    }
                }
                StoryEvent::Shutdown => {
                    self.debug_info.add_log("Story pipeline shutdown".to_string());
                }
            }
        }

        self.generation.tick(now);
        self.narrator.poll();

        let was_loading = self.emotion.is_loading();
        self.emotion.poll();
        if was_loading && !self.emotion.is_loading() {
            match self.emotion.error() {
                Some(error) => self.debug_info.add_log(format!("Feelings story failed: {}", error.message)),
                None => self.debug_info.add_log("Feelings story received".to_string()),
            }
        }
    }

    /// How soon the UI must repaint to keep countdowns and polling current
    pub fn next_repaint(&self, now: Instant) -> Option<Duration> {
        const POLL_INTERVAL: Duration = Duration::from_millis(100);

        let busy = self.generation.is_generating()
            || self.narrator.is_active()
            || self.emotion.is_loading()
            || self.emotion.is_playing();

        match (self.generation.cooldown().until_next_tick(now), busy) {
            (Some(tick), true) => Some(tick.min(POLL_INTERVAL)),
            (Some(tick), false) => Some(tick),
            (None, true) => Some(POLL_INTERVAL),
            (None, false) => None,
        }
    }

    /// Update FPS calculation
    pub fn update_fps(&mut self, delta_time: f64) {
        self.frame_times.push_back(delta_time);
        if self.frame_times.len() > 60 {
            self.frame_times.pop_front();
        }

        if !self.frame_times.is_empty() {
            let avg_time: f64 = self.frame_times.iter().sum::<f64>() / self.frame_times.len() as f64;
            self.debug_info.fps = if avg_time > 0.0 { 1.0 / avg_time as f32 } else { 0.0 };
        }
    }

    /// Stop speech and background work before the window closes
    pub fn shutdown(&mut self) {
        debug!("Shutting down app state");
        self.narrator.stop_speaking();
        self.generation.reset();
        self.story_pipeline.shutdown();
    }
}
