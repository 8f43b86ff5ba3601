//! Story pipeline for running generation requests off the UI thread
//!
//! The UI sends [`StoryCommand`]s and polls [`StoryEvent`]s once per frame.
//! Dropping the [`StoryPipeline`] cancels any in-flight request and stops the
//! worker, so a closed view never receives a late story.

use crate::llm::client::StoryGenerator;
use crate::{Result, StorytimeError};
use crossbeam_channel::{bounded, Receiver, Sender};
use std::sync::Arc;
use std::thread;
use std::time::Instant;
use tokio::runtime::Runtime;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};
use uuid::Uuid;

/// Commands that can be sent to the story pipeline
#[derive(Debug, Clone)]
pub enum StoryCommand {
    /// Generate a story for the given prompt
    Generate {
        prompt: String,
        /// Unique request ID for tracking
        request_id: Uuid,
    },

    /// Shutdown the pipeline
    Shutdown,
}

/// Events emitted by the story pipeline
#[derive(Debug, Clone)]
pub enum StoryEvent {
    /// Generation completed
    Complete {
        text: String,
        request_id: Uuid,
        /// Total generation time in milliseconds
        total_ms: u64,
    },

    /// Generation failed
    Error {
        error: StorytimeError,
        request_id: Option<Uuid>,
    },

    /// Pipeline has shut down
    Shutdown,
}

/// Story pipeline with channel-based communication
pub struct StoryPipeline {
    generator: Arc<dyn StoryGenerator>,
    command_tx: Sender<StoryCommand>,
    command_rx: Receiver<StoryCommand>,
    event_tx: Sender<StoryEvent>,
    event_rx: Receiver<StoryEvent>,
    cancel: CancellationToken,
    worker: Option<thread::JoinHandle<()>>,
}

impl StoryPipeline {
    /// Create a new story pipeline
    pub fn new(generator: Arc<dyn StoryGenerator>) -> Self {
        let (command_tx, command_rx) = bounded(16);
        let (event_tx, event_rx) = bounded(16);

        Self {
            generator,
            command_tx,
            command_rx,
            event_tx,
            event_rx,
            cancel: CancellationToken::new(),
            worker: None,
        }
    }

    /// Get a sender for commands
    pub fn command_sender(&self) -> Sender<StoryCommand> {
        self.command_tx.clone()
    }

    /// Get a receiver for events
    pub fn event_receiver(&self) -> Receiver<StoryEvent> {
        self.event_rx.clone()
    }

    /// Submit a prompt
    pub fn generate(&self, request_id: Uuid, prompt: String) -> Result<()> {
        self.command_tx
            .send(StoryCommand::Generate { prompt, request_id })
            .map_err(|e| StorytimeError::ChannelError(e.to_string()))
    }

    /// Start the pipeline worker thread
    pub fn start_worker(&mut self) -> Result<()> {
        if self.worker.is_some() {
            return Ok(());
        }

        let generator = Arc::clone(&self.generator);
        let command_rx = self.command_rx.clone();
        let event_tx = self.event_tx.clone();
        let cancel = self.cancel.clone();

        let runtime = Runtime::new()
            .map_err(|e| StorytimeError::ChannelError(format!("Runtime creation failed: {}", e)))?;

        let handle = thread::Builder::new()
            .name("story-pipeline".into())
            .spawn(move || {
                info!("Story pipeline worker ready");

                loop {
                    match command_rx.recv() {
                        Ok(StoryCommand::Generate { prompt, request_id }) => {
                            debug!("Processing story request: {}", request_id);
                            let start_time = Instant::now();

                            let result = runtime.block_on(async {
                                tokio::select! {
                                    _ = cancel.cancelled() => Err(StorytimeError::Cancelled),
                                    result = generator.generate(&prompt) => result,
                                }
                            });

                            let event = match result {
                                Ok(text) => {
                                    let total_ms = start_time.elapsed().as_millis() as u64;
                                    debug!("Story complete: {} chars in {}ms", text.len(), total_ms);
                                    StoryEvent::Complete {
                                        text,
                                        request_id,
                                        total_ms,
                                    }
                                }
                                Err(StorytimeError::Cancelled) => {
                                    info!("Story request {} cancelled", request_id);
                                    break;
                                }
                                Err(e) => {
                                    error!("Story generation failed: {}", e);
                                    StoryEvent::Error {
                                        error: e,
                                        request_id: Some(request_id),
                                    }
                                }
                            };

                            if event_tx.send(event).is_err() {
                                break;
                            }
                        }

                        Ok(StoryCommand::Shutdown) => {
                            info!("Story pipeline worker shutting down");
                            let _ = event_tx.try_send(StoryEvent::Shutdown);
                            break;
                        }

                        Err(e) => {
                            debug!("Command channel closed: {}", e);
                            break;
                        }
                    }
                }

                info!("Story pipeline worker stopped");
            })?;

        self.worker = Some(handle);
        Ok(())
    }

    /// Cancel in-flight work and stop the worker
    pub fn shutdown(&mut self) {
        self.cancel.cancel();
        let _ = self.command_tx.try_send(StoryCommand::Shutdown);
        if let Some(handle) = self.worker.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for StoryPipeline {
    fn drop(&mut self) {
        self.shutdown();
    }
}
