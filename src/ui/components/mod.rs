//! UI components
//!
//! Reusable widgets for the story window. Each takes the state it edits and
//! the theme, and renders with `show`.

pub mod debug_panel;
pub mod emotion_panel;
pub mod profile_form;
pub mod story_card;

pub use debug_panel::DebugPanel;
pub use emotion_panel::EmotionPanel;
pub use profile_form::ProfileForm;
pub use story_card::StoryCard;
