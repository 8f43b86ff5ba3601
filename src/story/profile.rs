use serde::{Deserialize, Serialize};
use std::fmt;

/// How the child says they are feeling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mood {
    #[default]
    Happy,
    Sleepy,
    Excited,
    Calm,
}

impl Mood {
    pub const ALL: [Mood; 4] = [Mood::Happy, Mood::Sleepy, Mood::Excited, Mood::Calm];

    /// Lowercase name used in prompts
    pub fn as_str(&self) -> &'static str {
        match self {
            Mood::Happy => "happy",
            Mood::Sleepy => "sleepy",
            Mood::Excited => "excited",
            Mood::Calm => "calm",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Mood::Happy => "Happy",
            Mood::Sleepy => "Sleepy",
            Mood::Excited => "Excited",
            Mood::Calm => "Calm",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            Mood::Happy => "☀",
            Mood::Sleepy => "🌙",
            Mood::Excited => "✨",
            Mood::Calm => "☁",
        }
    }
}

impl fmt::Display for Mood {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Narrative setting for the story
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoryTheme {
    Space,
    Nature,
    #[default]
    Magic,
    Animals,
}

impl StoryTheme {
    pub const ALL: [StoryTheme; 4] = [
        StoryTheme::Space,
        StoryTheme::Nature,
        StoryTheme::Magic,
        StoryTheme::Animals,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            StoryTheme::Space => "space",
            StoryTheme::Nature => "nature",
            StoryTheme::Magic => "magic",
            StoryTheme::Animals => "animals",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            StoryTheme::Space => "Space",
            StoryTheme::Nature => "Nature",
            StoryTheme::Magic => "Magic",
            StoryTheme::Animals => "Animals",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            StoryTheme::Space => "⭐",
            StoryTheme::Nature => "🌈",
            StoryTheme::Magic => "♥",
            StoryTheme::Animals => "🎵",
        }
    }
}

impl fmt::Display for StoryTheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What the child entered in the form
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub name: String,
    pub mood: Mood,
    pub theme: StoryTheme,
}

impl Profile {
    pub fn new(name: impl Into<String>, mood: Mood, theme: StoryTheme) -> Self {
        Self {
            name: name.into(),
            mood,
            theme,
        }
    }

    /// The name with surrounding whitespace removed
    pub fn display_name(&self) -> &str {
        self.name.trim()
    }

    /// A story can only be requested once a name is entered
    pub fn has_name(&self) -> bool {
        !self.display_name().is_empty()
    }
}
