//! Two-step emotion pipeline: detect an emotion, then fetch a story for it
//!
//! Each step reports its own event, so the detected label reaches the UI
//! even when the story step fails. A failure names the step that failed.

use crate::emotion::client::{EmotionService, EmotionStory};
use crate::{Result, StorytimeError};
use crossbeam_channel::{bounded, Receiver, Sender};
use std::fmt;
use std::sync::Arc;
use std::thread;
use tokio::runtime::Runtime;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineStep {
    DetectEmotion,
    GenerateStory,
}

impl fmt::Display for PipelineStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PipelineStep::DetectEmotion => f.write_str("emotion detection"),
            PipelineStep::GenerateStory => f.write_str("story generation"),
        }
    }
}

#[derive(Debug, Clone)]
pub enum EmotionCommand {
    Submit { text: String, request_id: Uuid },
    Shutdown,
}

#[derive(Debug, Clone)]
pub enum EmotionEvent {
    /// First step succeeded
    EmotionDetected { emotion: String, request_id: Uuid },

    /// Second step succeeded
    StoryReady { story: EmotionStory, request_id: Uuid },

    /// A step failed; later steps were not attempted
    Failed {
        step: PipelineStep,
        error: StorytimeError,
        request_id: Uuid,
    },

    Shutdown,
}

/// Run both steps in order, reporting each outcome through `emit`
///
/// The story step is only attempted once detection has succeeded.
pub async fn run_pipeline<F>(
    service: &dyn EmotionService,
    text: &str,
    request_id: Uuid,
    mut emit: F,
) where
    F: FnMut(EmotionEvent),
{
    let emotion = match service.detect_emotion(text).await {
        Ok(emotion) => emotion,
        Err(error) => {
            warn!("Emotion detection failed: {}", error);
            emit(EmotionEvent::Failed {
                step: PipelineStep::DetectEmotion,
                error,
                request_id,
            });
            return;
        }
    };

    debug!("Detected emotion: {}", emotion);
    emit(EmotionEvent::EmotionDetected {
        emotion: emotion.clone(),
        request_id,
    });

    match service.generate_story(&emotion).await {
        Ok(story) => emit(EmotionEvent::StoryReady { story, request_id }),
        Err(error) => {
            warn!("Emotion story generation failed: {}", error);
            emit(EmotionEvent::Failed {
                step: PipelineStep::GenerateStory,
                error,
                request_id,
            });
        }
    }
}

/// Worker that runs submissions one at a time
pub struct EmotionPipeline {
    service: Arc<dyn EmotionService>,
    command_tx: Sender<EmotionCommand>,
    command_rx: Receiver<EmotionCommand>,
    event_tx: Sender<EmotionEvent>,
    event_rx: Receiver<EmotionEvent>,
    cancel: CancellationToken,
    worker: Option<thread::JoinHandle<()>>,
}

impl EmotionPipeline {
    pub fn new(service: Arc<dyn EmotionService>) -> Self {
        let (command_tx, command_rx) = bounded(16);
        let (event_tx, event_rx) = bounded(32);

        Self {
            service,
            command_tx,
            command_rx,
            event_tx,
            event_rx,
            cancel: CancellationToken::new(),
            worker: None,
        }
    }

    pub fn event_receiver(&self) -> Receiver<EmotionEvent> {
        self.event_rx.clone()
    }

    pub fn submit(&self, request_id: Uuid, text: String) -> Result<()> {
        self.command_tx
            .send(EmotionCommand::Submit { text, request_id })
            .map_err(|e| StorytimeError::ChannelError(e.to_string()))
    }

    pub fn start_worker(&mut self) -> Result<()> {
        if self.worker.is_some() {
            return Ok(());
        }

        let service = Arc::clone(&self.service);
        let command_rx = self.command_rx.clone();
        let event_tx = self.event_tx.clone();
        let cancel = self.cancel.clone();

        let runtime = Runtime::new()
            .map_err(|e| StorytimeError::ChannelError(format!("Runtime creation failed: {}", e)))?;

        let handle = thread::Builder::new()
            .name("emotion-pipeline".into())
            .spawn(move || {
                info!("Emotion pipeline worker ready");

                while let Ok(command) = command_rx.recv() {
                    match command {
                        EmotionCommand::Submit { text, request_id } => {
                            let tx = event_tx.clone();
                            let finished = runtime.block_on(async {
                                tokio::select! {
                                    _ = cancel.cancelled() => false,
                                    _ = run_pipeline(service.as_ref(), &text, request_id, |event| {
                                        let _ = tx.send(event);
                                    }) => true,
                                }
                            });

                            if !finished {
                                info!("Emotion request {} cancelled", request_id);
                                break;
                            }
                        }
                        EmotionCommand::Shutdown => {
                            let _ = event_tx.try_send(EmotionEvent::Shutdown);
                            break;
                        }
                    }
                }

                info!("Emotion pipeline worker stopped");
            })?;

        self.worker = Some(handle);
        Ok(())
    }

    pub fn shutdown(&mut self) {
        self.cancel.cancel();
        let _ = self.command_tx.try_send(EmotionCommand::Shutdown);
        if let Some(handle) = self.worker.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for EmotionPipeline {
    fn drop(&mut self) {
        self.shutdown();
    }
}
