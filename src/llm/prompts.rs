//! Prompt templates for story generation

use crate::story::Profile;

/// Build the bedtime story prompt for a child's profile
pub fn bedtime_story_prompt(profile: &Profile) -> String {
    format!(
        "Create a short, engaging bedtime story for a child named {name} who is feeling {mood}. \
         The story should be themed around {theme} and should be appropriate for bedtime. \
         Make it magical, positive, and end with a gentle message that encourages sweet dreams. \
         Keep it around 4-5 sentences long.",
        name = profile.display_name(),
        mood = profile.mood,
        theme = profile.theme,
    )
}
