//! Scripted backends shared by the integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::{Duration, Instant};
use storytime::audio::{AudioPlayback, PlaybackEvent};
use storytime::emotion::{EmotionService, EmotionStory};
use storytime::integration::Services;
use storytime::llm::StoryGenerator;
use storytime::speech::{SpeechEvent, SpeechSynthesizer, Utterance, Voice};
use storytime::ui::AppState;
use storytime::{Result, StorytimeError};

pub const STARLIT_STORY: &str = "Once upon a starlit night...";

/// Answers story prompts from a queue of scripted results
#[derive(Clone, Default)]
pub struct ScriptedGenerator {
    pub prompts: Arc<Mutex<Vec<String>>>,
    replies: Arc<Mutex<VecDeque<Result<String>>>>,
    delay: Duration,
}

impl ScriptedGenerator {
    pub fn replying(reply: Result<String>) -> Self {
        let generator = Self::default();
        generator.replies.lock().push_back(reply);
        generator
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn calls(&self) -> usize {
        self.prompts.lock().len()
    }
}

#[async_trait]
impl StoryGenerator for ScriptedGenerator {
    async fn generate(&self, prompt: &str) -> Result<String> {
        self.prompts.lock().push(prompt.to_string());
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        self.replies
            .lock()
            .pop_front()
            .unwrap_or_else(|| Err(StorytimeError::GenerationError("no scripted reply".into())))
    }
}

/// Emotion backend that classifies everything as one emotion
#[derive(Clone)]
pub struct ScriptedEmotion {
    pub emotion: String,
    pub detect_calls: Arc<Mutex<Vec<String>>>,
    pub story_calls: Arc<Mutex<Vec<String>>>,
}

impl ScriptedEmotion {
    pub fn new(emotion: &str) -> Self {
        Self {
            emotion: emotion.to_string(),
            detect_calls: Arc::default(),
            story_calls: Arc::default(),
        }
    }
}

#[async_trait]
impl EmotionService for ScriptedEmotion {
    async fn detect_emotion(&self, text: &str) -> Result<String> {
        self.detect_calls.lock().push(text.to_string());
        Ok(self.emotion.clone())
    }

    async fn generate_story(&self, emotion: &str) -> Result<EmotionStory> {
        self.story_calls.lock().push(emotion.to_string());
        Ok(EmotionStory {
            story: format!("A gentle story for feeling {}.", emotion),
            audio_url: "http://localhost:5000/audio/story.mp3".to_string(),
        })
    }
}

/// Records utterances; lifecycle events are pushed by the test
#[derive(Clone, Default)]
pub struct RecordingSpeech {
    pub spoken: Arc<Mutex<Vec<Utterance>>>,
    pub cancels: Arc<Mutex<usize>>,
    pub events: Arc<Mutex<VecDeque<SpeechEvent>>>,
}

impl SpeechSynthesizer for RecordingSpeech {
    fn voices(&self) -> Vec<Voice> {
        vec![Voice::new("en_US-male", 0), Voice::new("en_US-female", 1)]
    }

    fn speak(&mut self, utterance: Utterance) -> Result<()> {
        self.spoken.lock().push(utterance);
        Ok(())
    }

    fn cancel(&mut self) {
        *self.cancels.lock() += 1;
    }

    fn poll_event(&mut self) -> Option<SpeechEvent> {
        self.events.lock().pop_front()
    }
}

/// Records playback calls
#[derive(Clone, Default)]
pub struct RecordingPlayback {
    pub calls: Arc<Mutex<Vec<String>>>,
    pub events: Arc<Mutex<VecDeque<PlaybackEvent>>>,
}

impl AudioPlayback for RecordingPlayback {
    fn load(&mut self, url: &str) -> Result<()> {
        self.calls.lock().push(format!("load {}", url));
        Ok(())
    }

    fn play(&mut self) -> Result<()> {
        self.calls.lock().push("play".to_string());
        Ok(())
    }

    fn pause(&mut self) {
        self.calls.lock().push("pause".to_string());
    }

    fn poll_event(&mut self) -> Option<PlaybackEvent> {
        self.events.lock().pop_front()
    }
}

/// Handles to every fake behind an [`AppState`]
pub struct Fakes {
    pub generator: ScriptedGenerator,
    pub emotion: ScriptedEmotion,
    pub speech: RecordingSpeech,
    pub playback: RecordingPlayback,
}

impl Fakes {
    pub fn new(generator: ScriptedGenerator) -> Self {
        Self {
            generator,
            emotion: ScriptedEmotion::new("sad"),
            speech: RecordingSpeech::default(),
            playback: RecordingPlayback::default(),
        }
    }

    pub fn services(&self) -> Services {
        Services {
            generator: Arc::new(self.generator.clone()),
            emotion: Arc::new(self.emotion.clone()),
            speech: Box::new(self.speech.clone()),
            playback: Box::new(self.playback.clone()),
        }
    }

    pub fn app_state(&self) -> AppState {
        AppState::new(self.services(), 60).expect("app state should start")
    }
}

/// Poll until `done` holds; returns the instant of the final poll
pub fn poll_until(state: &mut AppState, done: impl Fn(&AppState) -> bool) -> Instant {
    let deadline = Instant::now() + Duration::from_secs(5);
    loop {
        let now = Instant::now();
        state.poll_events(now);
        if done(state) {
            return now;
        }
        assert!(now < deadline, "state did not settle in time");
        std::thread::sleep(Duration::from_millis(10));
    }
}
