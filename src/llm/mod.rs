//! Story generation through the Gemini API
//!
//! # Architecture
//!
//! - **config**: endpoint, model and API key settings
//! - **client**: the [`StoryGenerator`] capability and its Gemini implementation
//! - **pipeline**: channel-based worker that runs requests off the UI thread
//! - **prompts**: prompt templates
//!
//! # Usage
//!
//! ```rust,ignore
//! use storytime::llm::{GeminiClient, GeminiConfig, StoryCommand, StoryEvent, StoryPipeline};
//! use std::sync::Arc;
//! use uuid::Uuid;
//!
//! let generator = Arc::new(GeminiClient::new(GeminiConfig::new("api-key"))?);
//! let mut pipeline = StoryPipeline::new(generator);
//! let cmd_tx = pipeline.command_sender();
//! let event_rx = pipeline.event_receiver();
//! pipeline.start_worker()?;
//!
//! cmd_tx.send(StoryCommand::Generate {
//!     prompt: "Tell me a story".to_string(),
//!     request_id: Uuid::new_v4(),
//! })?;
//!
//! match event_rx.recv()? {
//!     StoryEvent::Complete { text, .. } => println!("{}", text),
//!     StoryEvent::Error { error, .. } => eprintln!("{}", error),
//!     _ => {}
//! }
//! ```

pub mod client;
pub mod config;
pub mod pipeline;
pub mod prompts;

pub use client::{GeminiClient, StoryGenerator, UnavailableGenerator};
pub use config::GeminiConfig;
pub use pipeline::{StoryCommand, StoryEvent, StoryPipeline};
pub use prompts::bedtime_story_prompt;
