//! Story request state for the root view
//!
//! - **profile**: the child's name, mood and story theme
//! - **cooldown**: the one-second countdown after a rate-limit rejection
//! - **generation**: the request lifecycle state machine

pub mod cooldown;
pub mod generation;
pub mod profile;

pub use cooldown::{Cooldown, CooldownTick};
pub use generation::{
    rate_limit_message, GenerationState, RequestPhase, StoryRequest, GENERIC_ERROR_MESSAGE,
};
pub use profile::{Mood, Profile, StoryTheme};
