//! Story request lifecycle
//!
//! ```text
//! Idle -> Generating -> Idle                 (story received)
//!                    -> Idle                 (other error)
//!                    -> CoolingDown -> Idle  (rate limited, after the countdown)
//! ```
//!
//! The state machine never performs I/O. [`GenerationState::begin`] hands back
//! the request to send, and the caller reports the outcome through
//! [`GenerationState::complete`] or [`GenerationState::fail`].

use crate::llm::prompts::bedtime_story_prompt;
use crate::story::cooldown::{Cooldown, CooldownTick};
use crate::story::profile::Profile;
use crate::StorytimeError;
use std::time::Instant;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Default lockout after a rate-limit rejection
pub const DEFAULT_COOLDOWN_SECS: u32 = 60;

/// Shown for any failure that is not a rate limit
pub const GENERIC_ERROR_MESSAGE: &str =
    "Oops! Something went wrong while creating your story. Please try again.";

/// Shown while the rate-limit countdown runs
pub fn rate_limit_message(cooldown_secs: u32) -> String {
    format!(
        "We've reached our story limit for now. Please try again in {} seconds.",
        cooldown_secs
    )
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestPhase {
    Idle,
    Generating { request_id: Uuid },
    CoolingDown,
}

/// A request ready to be sent to the story generator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoryRequest {
    pub request_id: Uuid,
    pub prompt: String,
}

#[derive(Debug, Clone)]
pub struct GenerationState {
    phase: RequestPhase,
    story: String,
    error_message: String,
    cooldown: Cooldown,
    cooldown_secs: u32,
}

impl Default for GenerationState {
    fn default() -> Self {
        Self::new(DEFAULT_COOLDOWN_SECS)
    }
}

impl GenerationState {
    pub fn new(cooldown_secs: u32) -> Self {
        Self {
            phase: RequestPhase::Idle,
            story: String::new(),
            error_message: String::new(),
            cooldown: Cooldown::new(),
            cooldown_secs,
        }
    }

    pub fn phase(&self) -> RequestPhase {
        self.phase
    }

    pub fn story(&self) -> &str {
        &self.story
    }

    pub fn error_message(&self) -> &str {
        &self.error_message
    }

    pub fn is_generating(&self) -> bool {
        matches!(self.phase, RequestPhase::Generating { .. })
    }

    pub fn cooldown_seconds(&self) -> u32 {
        self.cooldown.remaining()
    }

    pub fn cooldown(&self) -> &Cooldown {
        &self.cooldown
    }

    /// Whether the trigger should be enabled for this profile
    pub fn can_request(&self, profile: &Profile) -> bool {
        profile.has_name() && self.phase == RequestPhase::Idle && self.cooldown_seconds() == 0
    }

    /// Start a request for `profile`
    ///
    /// Returns `None` and leaves the state untouched when the name is empty,
    /// a request is in flight, or the cooldown has not expired.
    pub fn begin(&mut self, profile: &Profile) -> Option<StoryRequest> {
        if !self.can_request(profile) {
            debug!("Story request ignored in phase {:?}", self.phase);
            return None;
        }

        let request_id = Uuid::new_v4();
        self.phase = RequestPhase::Generating { request_id };
        self.error_message.clear();

        info!(
            "Requesting {} story for {} ({})",
            profile.theme,
            profile.display_name(),
            profile.mood
        );

        Some(StoryRequest {
            request_id,
            prompt: bedtime_story_prompt(profile),
        })
    }

    fn is_current(&self, request_id: Uuid) -> bool {
        self.phase == RequestPhase::Generating { request_id }
    }

    /// Record a successful generation. Returns false for a stale request.
    pub fn complete(&mut self, request_id: Uuid, text: String) -> bool {
        if !self.is_current(request_id) {
            debug!("Ignoring story for stale request {}", request_id);
            return false;
        }

        self.story = text;
        self.error_message.clear();
        self.phase = RequestPhase::Idle;
        true
    }

    /// Record a failed generation. Returns false for a stale request.
    pub fn fail(&mut self, request_id: Uuid, error: &StorytimeError, now: Instant) -> bool {
        if !self.is_current(request_id) {
            debug!("Ignoring failure for stale request {}", request_id);
            return false;
        }

        warn!("Story generation failed: {}", error);
        self.story.clear();

        if error.is_rate_limited() && self.cooldown_secs > 0 {
            self.error_message = rate_limit_message(self.cooldown_secs);
            self.cooldown.start(self.cooldown_secs, now);
            self.phase = RequestPhase::CoolingDown;
        } else {
            self.error_message = GENERIC_ERROR_MESSAGE.to_string();
            self.phase = RequestPhase::Idle;
        }
        true
    }

    /// Advance the cooldown; clears the error once it expires
    pub fn tick(&mut self, now: Instant) {
        if let CooldownTick::Expired = self.cooldown.tick(now) {
            info!("Story cooldown expired");
            self.error_message.clear();
            if self.phase == RequestPhase::CoolingDown {
                self.phase = RequestPhase::Idle;
            }
        }
    }

    /// Drop any in-flight request and countdown, e.g. when the view closes
    pub fn reset(&mut self) {
        self.cooldown.cancel();
        self.phase = RequestPhase::Idle;
    }
}
