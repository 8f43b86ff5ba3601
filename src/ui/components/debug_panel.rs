//! Debug panel component
//!
//! Displays internal state information for debugging.

use crate::story::RequestPhase;
use crate::ui::state::AppState;
use crate::ui::theme::Theme;
use egui::{self, RichText, ScrollArea};

/// Debug panel component
pub struct DebugPanel<'a> {
    state: &'a AppState,
    theme: &'a Theme,
}

impl<'a> DebugPanel<'a> {
    pub fn new(state: &'a AppState, theme: &'a Theme) -> Self {
        Self { state, theme }
    }

    pub fn show(self, ui: &mut egui::Ui) {
        egui::Frame::none()
            .fill(self.theme.bg_secondary)
            .rounding(self.theme.card_rounding)
            .inner_margin(self.theme.spacing)
            .show(ui, |ui| {
                ui.vertical(|ui| {
                    ui.horizontal(|ui| {
                        ui.label(
                            RichText::new("Debug Panel")
                                .strong()
                                .color(self.theme.text_primary),
                        );

                        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                            ui.label(
                                RichText::new(format!("{:.1} FPS", self.state.debug_info.fps))
                                    .size(12.0)
                                    .family(egui::FontFamily::Monospace)
                                    .color(self.theme.text_muted),
                            );
                        });
                    });

                    ui.separator();

                    egui::Grid::new("debug_stats")
                        .num_columns(2)
                        .spacing([20.0, 4.0])
                        .show(ui, |ui| {
                            self.stat_row(ui, "Generation", &self.phase_status());
                            self.stat_row(
                                ui,
                                "Cooldown",
                                &format!("{}s", self.state.generation.cooldown_seconds()),
                            );
                            self.stat_row(ui, "Reading", &self.reading_status());
                            self.stat_row(ui, "Feelings", &self.feelings_status());
                            self.stat_row(ui, "Emotion", &self.state.detected_emotion());
                            self.stat_row(ui, "Stats", &self.state.debug_info.generation_stats);
                        });

                    ui.add_space(self.theme.spacing_sm);
                    ui.separator();

                    ui.label(
                        RichText::new("Recent Logs")
                            .size(12.0)
                            .strong()
                            .color(self.theme.text_secondary),
                    );

                    ScrollArea::vertical()
                        .max_height(120.0)
                        .auto_shrink([false, false])
                        .stick_to_bottom(true)
                        .show(ui, |ui| {
                            for msg in &self.state.debug_info.log_messages {
                                ui.label(
                                    RichText::new(msg)
                                        .size(11.0)
                                        .family(egui::FontFamily::Monospace)
                                        .color(self.theme.text_muted),
                                );
                            }

                            if self.state.debug_info.log_messages.is_empty() {
                                ui.label(
                                    RichText::new("No log messages")
                                        .size(11.0)
                                        .color(self.theme.text_muted)
                                        .italics(),
                                );
                            }
                        });
                });
            });
    }

    fn stat_row(&self, ui: &mut egui::Ui, label: &str, value: &str) {
        ui.label(RichText::new(label).size(12.0).color(self.theme.text_muted));

        let display_value = if value.is_empty() { "-" } else { value };
        ui.label(
            RichText::new(display_value)
                .size(12.0)
                .family(egui::FontFamily::Monospace)
                .color(self.theme.text_primary),
        );

        ui.end_row();
    }

    fn phase_status(&self) -> String {
        match self.state.generation.phase() {
            RequestPhase::Idle => "Idle".to_string(),
            RequestPhase::Generating { request_id } => {
                format!("Generating ({})", &request_id.to_string()[..8])
            }
            RequestPhase::CoolingDown => "Cooling down".to_string(),
        }
    }

    fn reading_status(&self) -> String {
        let narrator = &self.state.narrator;
        if narrator.is_speaking() {
            "Speaking".to_string()
        } else if narrator.is_active() {
            "Starting...".to_string()
        } else {
            "Silent".to_string()
        }
    }

    fn feelings_status(&self) -> String {
        let session = &self.state.emotion;
        if session.is_loading() {
            "Processing...".to_string()
        } else if session.is_playing() {
            "Playing audio".to_string()
        } else if session.story().is_empty() {
            "Idle".to_string()
        } else {
            "Story ready".to_string()
        }
    }
}
