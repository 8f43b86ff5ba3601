//! Profile form component
//!
//! Name input plus the mood and theme pickers.

use crate::story::{Mood, Profile, StoryTheme};
use crate::ui::theme::Theme;
use egui::{self, RichText, Vec2};

/// Form for the child's name, mood and story theme
pub struct ProfileForm<'a> {
    profile: &'a mut Profile,
    theme: &'a Theme,
}

impl<'a> ProfileForm<'a> {
    pub fn new(profile: &'a mut Profile, theme: &'a Theme) -> Self {
        Self { profile, theme }
    }

    pub fn show(mut self, ui: &mut egui::Ui) {
        self.section_label(ui, "What's your name, little storyteller?");
        let name_response = ui.add(
            egui::TextEdit::singleline(&mut self.profile.name)
                .hint_text("Enter your name")
                .desired_width(f32::INFINITY)
                .id(egui::Id::new("name_input")),
        );
        name_response.widget_info(|| {
            egui::WidgetInfo::labeled(egui::WidgetType::TextEdit, true, "Name input")
        });

        ui.add_space(self.theme.spacing);
        self.section_label(ui, "How are you feeling today?");
        let mood = self.profile.mood;
        if let Some(choice) = self.option_row(ui, "Mood", &Mood::ALL, mood, |m| (m.icon(), m.label())) {
            self.profile.mood = choice;
        }

        ui.add_space(self.theme.spacing);
        self.section_label(ui, "Choose your story theme");
        let story_theme = self.profile.theme;
        if let Some(choice) =
            self.option_row(ui, "Theme", &StoryTheme::ALL, story_theme, |t| (t.icon(), t.label()))
        {
            self.profile.theme = choice;
        }
    }

    fn section_label(&self, ui: &mut egui::Ui, text: &str) {
        ui.label(
            RichText::new(text)
                .strong()
                .color(self.theme.text_secondary),
        );
    }

    /// One selectable button per option; returns the clicked option
    fn option_row<T: Copy + PartialEq>(
        &self,
        ui: &mut egui::Ui,
        kind: &str,
        options: &[T],
        selected: T,
        describe: impl Fn(&T) -> (&'static str, &'static str),
    ) -> Option<T> {
        let mut clicked = None;
        let width = (ui.available_width() - self.theme.spacing_sm * 3.0) / 4.0;

        ui.horizontal(|ui| {
            for option in options {
                let (icon, label) = describe(option);
                let is_selected = *option == selected;
                let color = if is_selected {
                    self.theme.accent
                } else {
                    self.theme.text_secondary
                };

                let button = egui::Button::new(
                    RichText::new(format!("{}\n{}", icon, label)).color(color),
                )
                .selected(is_selected)
                .min_size(Vec2::new(width.max(60.0), 56.0))
                .rounding(self.theme.button_rounding);

                let response = ui.add(button);
                let accessible = format!("{}: {}", kind, label);
                response.widget_info(|| {
                    egui::WidgetInfo::selected(egui::WidgetType::Button, true, is_selected, &accessible)
                });

                if response.clicked() {
                    clicked = Some(*option);
                }
            }
        });

        clicked
    }
}
