//! Text-to-speech implementation with sherpa-rs (VITS models)
//!
//! Synthesis and playback run on one worker thread that owns the VITS model
//! and the rodio output stream. Pitch is applied as a playback speed factor,
//! and the synthesis speed is divided by the same factor so the delivered
//! tempo matches the requested rate.

use crate::speech::{SpeechEvent, SpeechSynthesizer, Utterance, Voice};
use crate::{Result, StorytimeError};
use crossbeam_channel::{bounded, unbounded, Receiver, RecvTimeoutError, Sender};
use parking_lot::Mutex;
use rodio::buffer::SamplesBuffer;
use rodio::{OutputStream, OutputStreamHandle, Sink, Source};
use sherpa_rs::tts::{VitsTts, VitsTtsConfig};
use std::path::Path;
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use tracing::{debug, info, warn};
use uuid::Uuid;

const END_POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Configuration for the TTS engine
#[derive(Clone, Debug)]
pub struct TTSConfig {
    /// Path to the ONNX model file
    pub model_path: String,

    /// Path to the tokens file
    pub tokens_path: String,

    /// Path to the lexicon file (optional for some models)
    pub lexicon_path: Option<String>,

    /// Path to the espeak-ng data directory (optional)
    pub data_dir: Option<String>,

    /// Path to dict directory (optional)
    pub dict_dir: Option<String>,

    /// Length scale for speech rate (1.0 = normal, >1.0 = slower)
    pub length_scale: f32,

    /// Noise scale for variation
    pub noise_scale: f32,

    /// Noise scale width
    pub noise_scale_w: f32,

    /// Named speakers of the model, offered as voices
    pub voices: Vec<Voice>,
}

impl Default for TTSConfig {
    fn default() -> Self {
        Self {
            model_path: String::new(),
            tokens_path: String::new(),
            lexicon_path: None,
            data_dir: None,
            dict_dir: None,
            length_scale: 1.0,
            noise_scale: 0.667,
            noise_scale_w: 0.8,
            voices: vec![Voice::new("default", 0)],
        }
    }
}

impl TTSConfig {
    /// Create a new TTS config with required paths
    pub fn new(model_path: impl Into<String>, tokens_path: impl Into<String>) -> Self {
        Self {
            model_path: model_path.into(),
            tokens_path: tokens_path.into(),
            ..Default::default()
        }
    }

    /// Set the espeak-ng data directory (needed by Piper models)
    pub fn with_data_dir(mut self, data_dir: impl Into<String>) -> Self {
        self.data_dir = Some(data_dir.into());
        self
    }

    /// Set the lexicon path
    pub fn with_lexicon(mut self, lexicon_path: impl Into<String>) -> Self {
        self.lexicon_path = Some(lexicon_path.into());
        self
    }

    /// Replace the voice list with the model's named speakers
    pub fn with_voices(mut self, voices: Vec<Voice>) -> Self {
        self.voices = voices;
        self
    }

    /// Check the model files before starting a worker
    pub fn validate(&self) -> Result<()> {
        if self.model_path.is_empty() {
            return Err(StorytimeError::ConfigError("TTS model path is required".into()));
        }
        if self.tokens_path.is_empty() {
            return Err(StorytimeError::ConfigError("TTS tokens path is required".into()));
        }
        if !Path::new(&self.model_path).exists() {
            return Err(StorytimeError::ModelLoadError(format!(
                "Model not found: {}",
                self.model_path
            )));
        }
        if !Path::new(&self.tokens_path).exists() {
            return Err(StorytimeError::ModelLoadError(format!(
                "Tokens file not found: {}",
                self.tokens_path
            )));
        }
        Ok(())
    }
}

/// TTS Engine wrapping sherpa-rs VitsTts
struct TTSEngine {
    tts: VitsTts,
}

impl TTSEngine {
    fn new(config: &TTSConfig) -> Self {
        info!("Loading VITS TTS model from: {}", config.model_path);

        let vits_config = VitsTtsConfig {
            model: config.model_path.clone(),
            tokens: config.tokens_path.clone(),
            lexicon: config.lexicon_path.clone().unwrap_or_default(),
            data_dir: config.data_dir.clone().unwrap_or_default(),
            dict_dir: config.dict_dir.clone().unwrap_or_default(),
            length_scale: config.length_scale,
            noise_scale: config.noise_scale,
            noise_scale_w: config.noise_scale_w,
            ..Default::default()
        };

        Self {
            tts: VitsTts::new(vits_config),
        }
    }

    /// Synthesize text to mono samples and their sample rate
    fn synthesize(&mut self, text: &str, speaker_id: i32, speed: f32) -> Result<(Vec<f32>, u32)> {
        debug!("Synthesizing {} chars with speaker {}", text.len(), speaker_id);

        let audio = self
            .tts
            .create(text, speaker_id, speed)
            .map_err(|e| StorytimeError::TTSError(format!("Synthesis failed: {}", e)))?;

        Ok((audio.samples, audio.sample_rate as u32))
    }
}

enum SpeechCommand {
    Speak(Utterance),
    Shutdown,
}

/// Speech backend backed by a VITS model and the default output device
pub struct VitsSpeech {
    voices: Vec<Voice>,
    /// Utterance the caller still wants to hear; `None` after cancel
    active: Arc<Mutex<Option<Uuid>>>,
    command_tx: Sender<SpeechCommand>,
    event_rx: Receiver<SpeechEvent>,
    worker: Option<thread::JoinHandle<()>>,
}

impl VitsSpeech {
    /// Load the model and open the output device on a worker thread
    pub fn new(config: TTSConfig) -> Result<Self> {
        config.validate()?;

        let (command_tx, command_rx) = unbounded();
        let (event_tx, event_rx) = unbounded();
        let (ready_tx, ready_rx) = bounded::<Result<()>>(1);
        let active = Arc::new(Mutex::new(None));
        let worker_active = Arc::clone(&active);
        let voices = config.voices.clone();

        let worker = thread::Builder::new()
            .name("speech".into())
            .spawn(move || {
                let (_stream, handle) = match OutputStream::try_default() {
                    Ok(output) => output,
                    Err(e) => {
                        let _ = ready_tx.send(Err(StorytimeError::AudioDeviceError(format!(
                            "No output device available: {}",
                            e
                        ))));
                        return;
                    }
                };

                let engine = TTSEngine::new(&config);
                let _ = ready_tx.send(Ok(()));
                info!("Speech worker ready");

                run_speech(engine, &handle, worker_active, command_rx, event_tx);
                info!("Speech worker stopped");
            })?;

        ready_rx
            .recv()
            .map_err(|e| StorytimeError::ChannelError(e.to_string()))??;

        Ok(Self {
            voices,
            active,
            command_tx,
            event_rx,
            worker: Some(worker),
        })
    }
}

impl SpeechSynthesizer for VitsSpeech {
    fn voices(&self) -> Vec<Voice> {
        self.voices.clone()
    }

    fn speak(&mut self, utterance: Utterance) -> Result<()> {
        *self.active.lock() = Some(utterance.id);
        self.command_tx
            .send(SpeechCommand::Speak(utterance))
            .map_err(|e| StorytimeError::ChannelError(e.to_string()))
    }

    fn cancel(&mut self) {
        *self.active.lock() = None;
    }

    fn poll_event(&mut self) -> Option<SpeechEvent> {
        self.event_rx.try_recv().ok()
    }
}

impl Drop for VitsSpeech {
    fn drop(&mut self) {
        *self.active.lock() = None;
        let _ = self.command_tx.send(SpeechCommand::Shutdown);
        if let Some(handle) = self.worker.take() {
            let _ = handle.join();
        }
    }
}

fn run_speech(
    mut engine: TTSEngine,
    handle: &OutputStreamHandle,
    active: Arc<Mutex<Option<Uuid>>>,
    command_rx: Receiver<SpeechCommand>,
    event_tx: Sender<SpeechEvent>,
) {
    let is_active = |id: Uuid| *active.lock() == Some(id);
    let mut playing: Option<(Uuid, Sink)> = None;

    loop {
        match command_rx.recv_timeout(END_POLL_INTERVAL) {
            Ok(SpeechCommand::Speak(utterance)) => {
                if let Some((_, sink)) = playing.take() {
                    sink.stop();
                }

                let id = utterance.id;
                if !is_active(id) {
                    debug!("Skipping cancelled utterance {}", id);
                    continue;
                }

                let pitch = utterance.pitch.max(0.1);
                let speed = utterance.rate.max(0.1) / pitch;
                let speaker_id = utterance.voice.as_ref().map(|v| v.id).unwrap_or(0);

                let samples = engine.synthesize(&utterance.text, speaker_id, speed);

                // Cancelled while synthesizing
                if !is_active(id) {
                    continue;
                }

                let result = samples.and_then(|(samples, sample_rate)| {
                    let sink = Sink::try_new(handle).map_err(|e| {
                        StorytimeError::AudioDeviceError(format!("Failed to open sink: {}", e))
                    })?;
                    sink.append(SamplesBuffer::new(1, sample_rate, samples).speed(pitch));
                    Ok(sink)
                });

                match result {
                    Ok(sink) => {
                        sink.play();
                        let _ = event_tx.send(SpeechEvent::Started { id });
                        playing = Some((id, sink));
                    }
                    Err(e) => {
                        warn!("Utterance {} failed: {}", id, e);
                        let _ = event_tx.send(SpeechEvent::Failed {
                            id,
                            error: e.to_string(),
                        });
                    }
                }
            }

            Ok(SpeechCommand::Shutdown) | Err(RecvTimeoutError::Disconnected) => break,

            Err(RecvTimeoutError::Timeout) => {}
        }

        let finished = match &playing {
            Some((id, sink)) if !is_active(*id) => {
                sink.stop();
                debug!("Utterance {} cancelled", id);
                true
            }
            Some((id, sink)) if sink.empty() => {
                let _ = event_tx.send(SpeechEvent::Ended { id: *id });
                true
            }
            _ => false,
        };
        if finished {
            playing = None;
        }
    }

    if let Some((_, sink)) = playing.take() {
        sink.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tts_config_default() {
        let config = TTSConfig::default();
        assert_eq!(config.voices, vec![Voice::new("default", 0)]);
        assert!(config.lexicon_path.is_none());
        assert_eq!(config.length_scale, 1.0);
    }

    #[test]
    fn test_tts_config_builder() {
        let config = TTSConfig::new("model.onnx", "tokens.txt")
            .with_lexicon("lexicon.txt")
            .with_data_dir("espeak-ng-data")
            .with_voices(vec![Voice::new("female", 2)]);

        assert_eq!(config.model_path, "model.onnx");
        assert_eq!(config.tokens_path, "tokens.txt");
        assert_eq!(config.lexicon_path, Some("lexicon.txt".to_string()));
        assert_eq!(config.data_dir, Some("espeak-ng-data".to_string()));
        assert_eq!(config.voices[0].id, 2);
    }

    #[test]
    fn test_validate_requires_paths() {
        assert!(matches!(
            TTSConfig::default().validate(),
            Err(StorytimeError::ConfigError(_))
        ));
        assert!(matches!(
            TTSConfig::new("/nonexistent/model.onnx", "/nonexistent/tokens.txt").validate(),
            Err(StorytimeError::ModelLoadError(_))
        ));
    }

    #[test]
    fn test_missing_model_fails_fast() {
        let result = VitsSpeech::new(TTSConfig::new("/nonexistent/model.onnx", "tokens.txt"));
        assert!(result.is_err());
    }
}
