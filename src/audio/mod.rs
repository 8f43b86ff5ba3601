//! Narrated-audio playback for the emotion panel
//!
//! [`AudioPlayback`] is the capability the UI talks to. With the `audio-io`
//! feature, [`StreamPlayer`] downloads the audio and plays it through rodio.

pub mod playback;
#[cfg(feature = "audio-io")]
pub mod player;

pub use playback::{AudioPlayback, PlaybackEvent, UnavailablePlayback};
#[cfg(feature = "audio-io")]
pub use player::StreamPlayer;
