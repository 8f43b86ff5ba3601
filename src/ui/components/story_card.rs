//! Story card component
//!
//! Error banner with the cooldown countdown, the create button and the story
//! with its read-aloud toggle.

use crate::ui::state::AppState;
use crate::ui::theme::Theme;
use egui::{self, RichText, Vec2};
use std::time::Instant;

pub struct StoryCard<'a> {
    state: &'a mut AppState,
    theme: &'a Theme,
}

impl<'a> StoryCard<'a> {
    pub fn new(state: &'a mut AppState, theme: &'a Theme) -> Self {
        Self { state, theme }
    }

    pub fn show(mut self, ui: &mut egui::Ui) {
        self.show_error(ui);
        self.show_create_button(ui);

        if !self.state.generation.story().is_empty() {
            ui.add_space(self.theme.spacing_lg);
            self.show_story(ui);
        }
    }

    fn show_error(&self, ui: &mut egui::Ui) {
        let message = self.state.generation.error_message();
        if message.is_empty() {
            return;
        }

        egui::Frame::none()
            .fill(self.theme.error_bg)
            .rounding(self.theme.button_rounding)
            .inner_margin(self.theme.spacing)
            .show(ui, |ui| {
                ui.set_width(ui.available_width());
                let response = ui.label(RichText::new(message).color(self.theme.error));
                response.widget_info(|| {
                    egui::WidgetInfo::labeled(egui::WidgetType::Label, true, "Story error")
                });

                let remaining = self.state.generation.cooldown_seconds();
                if remaining > 0 {
                    ui.label(
                        RichText::new(format!("Try again in: {} seconds", remaining))
                            .small()
                            .color(self.theme.error),
                    );
                }
            });

        ui.add_space(self.theme.spacing_sm);
    }

    fn show_create_button(&mut self, ui: &mut egui::Ui) {
        let enabled = self.state.can_request_story();
        let text = if self.state.generation.is_generating() {
            "Creating Your Story..."
        } else {
            "Create My Story"
        };

        let button = egui::Button::new(RichText::new(text).strong().color(self.theme.text_primary))
            .fill(if enabled {
                self.theme.primary
            } else {
                self.theme.bg_tertiary
            })
            .min_size(Vec2::new(ui.available_width(), 44.0))
            .rounding(self.theme.button_rounding);

        let response = ui.add_enabled(enabled, button);
        response.widget_info(|| {
            egui::WidgetInfo::labeled(egui::WidgetType::Button, enabled, "Create story")
        });

        if response.clicked() {
            self.state.request_story(Instant::now());
        }
    }

    fn show_story(&mut self, ui: &mut egui::Ui) {
        egui::Frame::none()
            .fill(self.theme.bg_tertiary)
            .rounding(self.theme.card_rounding)
            .inner_margin(self.theme.spacing)
            .show(ui, |ui| {
                ui.set_width(ui.available_width());

                ui.horizontal(|ui| {
                    ui.label(
                        RichText::new(format!(
                            "{}'s Bedtime Adventure",
                            self.state.profile.display_name()
                        ))
                        .heading()
                        .color(self.theme.accent),
                    );

                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        self.show_read_toggle(ui);
                    });
                });

                ui.add_space(self.theme.spacing_sm);
                let response = ui.label(
                    RichText::new(self.state.generation.story()).color(self.theme.text_primary),
                );
                let story_label = format!("Story: {}", self.state.generation.story());
                response.widget_info(|| {
                    egui::WidgetInfo::labeled(egui::WidgetType::Label, true, &story_label)
                });

                if let Some(error) = self.state.narrator.last_error() {
                    ui.label(RichText::new(error).small().color(self.theme.text_muted));
                }
            });
    }

    fn show_read_toggle(&mut self, ui: &mut egui::Ui) {
        let reading = self.state.narrator.is_active();
        let (icon, tooltip) = if reading {
            ("🔇", "Stop Reading")
        } else {
            ("🔊", "Read Story")
        };

        let response = ui
            .add(egui::Button::new(RichText::new(icon).size(20.0)).frame(false))
            .on_hover_text(tooltip);
        response.widget_info(|| egui::WidgetInfo::labeled(egui::WidgetType::Button, true, tooltip));

        if response.clicked() {
            self.state.toggle_reading();
        }
    }
}
