//! Emotion-to-story panel
//!
//! - **client**: the [`EmotionService`] capability and its HTTP implementation
//! - **pipeline**: detect-then-generate worker with per-step outcomes
//! - **session**: panel state, audio playback and the emotion callback

pub mod client;
pub mod pipeline;
pub mod session;

pub use client::{EmotionService, EmotionServiceConfig, EmotionStory, HttpEmotionService};
pub use pipeline::{run_pipeline, EmotionCommand, EmotionEvent, EmotionPipeline, PipelineStep};
pub use session::{EmotionCallback, EmotionSession, SessionError};
