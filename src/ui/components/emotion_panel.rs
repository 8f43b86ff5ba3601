//! Feelings panel component
//!
//! Free-text feelings, the detected emotion and the narrated story.

use crate::emotion::EmotionSession;
use crate::ui::theme::Theme;
use egui::{self, RichText, Vec2};

pub struct EmotionPanel<'a> {
    session: &'a mut EmotionSession,
    theme: &'a Theme,
}

impl<'a> EmotionPanel<'a> {
    pub fn new(session: &'a mut EmotionSession, theme: &'a Theme) -> Self {
        Self { session, theme }
    }

    pub fn show(mut self, ui: &mut egui::Ui) {
        ui.label(
            RichText::new("How are you feeling today?")
                .heading()
                .color(self.theme.accent),
        );
        ui.add_space(self.theme.spacing_sm);

        let input = ui.add(
            egui::TextEdit::multiline(&mut self.session.input_text)
                .hint_text("Share your feelings...")
                .desired_rows(4)
                .desired_width(f32::INFINITY)
                .id(egui::Id::new("feelings_input")),
        );
        input.widget_info(|| {
            egui::WidgetInfo::labeled(egui::WidgetType::TextEdit, true, "Feelings input")
        });

        ui.add_space(self.theme.spacing_sm);

        let loading = self.session.is_loading();
        let enabled = self.session.can_submit();
        let text = if loading { "Processing..." } else { "Generate Story" };
        let button = egui::Button::new(RichText::new(text).strong().color(self.theme.text_primary))
            .fill(self.theme.primary)
            .min_size(Vec2::new(ui.available_width(), 40.0))
            .rounding(self.theme.button_rounding);

        let response = ui.add_enabled(enabled, button);
        response.widget_info(|| {
            egui::WidgetInfo::labeled(egui::WidgetType::Button, enabled, "Generate feelings story")
        });
        if response.clicked() {
            self.session.submit_input();
        }

        if let Some(error) = self.session.error() {
            ui.add_space(self.theme.spacing_sm);
            let response = ui.label(RichText::new(&error.message).color(self.theme.error));
            response.widget_info(|| {
                egui::WidgetInfo::labeled(egui::WidgetType::Label, true, "Feelings error")
            });
        }

        if !self.session.detected_emotion().is_empty() {
            ui.add_space(self.theme.spacing);
            self.show_emotion(ui);
        }

        if !self.session.story().is_empty() {
            ui.add_space(self.theme.spacing);
            self.show_story(ui);
        }
    }

    fn show_emotion(&self, ui: &mut egui::Ui) {
        egui::Frame::none()
            .fill(self.theme.bg_tertiary)
            .rounding(self.theme.button_rounding)
            .inner_margin(self.theme.spacing)
            .show(ui, |ui| {
                ui.set_width(ui.available_width());
                ui.label(RichText::new("Detected Emotion").strong().color(self.theme.accent));

                let emotion = capitalize(self.session.detected_emotion());
                let response = ui.label(RichText::new(&emotion).color(self.theme.text_primary));
                let accessible = format!("Detected emotion: {}", self.session.detected_emotion());
                response.widget_info(|| {
                    egui::WidgetInfo::labeled(egui::WidgetType::Label, true, &accessible)
                });
            });
    }

    fn show_story(self, ui: &mut egui::Ui) {
        let session = self.session;
        let theme = self.theme;

        egui::Frame::none()
            .fill(theme.bg_tertiary)
            .rounding(theme.button_rounding)
            .inner_margin(theme.spacing)
            .show(ui, |ui| {
                ui.set_width(ui.available_width());

                ui.horizontal(|ui| {
                    ui.label(RichText::new("Your Story").strong().color(theme.accent));

                    if session.audio_url().is_some() {
                        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                            let (text, accessible) = if session.is_playing() {
                                ("⏸ Pause", "Pause story audio")
                            } else {
                                ("▶ Play", "Play story audio")
                            };
                            let response = ui.button(text);
                            response.widget_info(|| {
                                egui::WidgetInfo::labeled(egui::WidgetType::Button, true, accessible)
                            });
                            if response.clicked() {
                                session.toggle_playback();
                            }
                        });
                    }
                });

                let response = ui.label(RichText::new(session.story()).color(theme.text_primary));
                let accessible = format!("Feelings story: {}", session.story());
                response.widget_info(|| {
                    egui::WidgetInfo::labeled(egui::WidgetType::Label, true, &accessible)
                });
            });
    }
}

/// Emotion labels arrive lowercase from the backend
fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capitalize() {
        assert_eq!(capitalize("sad"), "Sad");
        assert_eq!(capitalize(""), "");
    }
}
