//! Main application struct and eframe integration
//!
//! This module contains the main StoryApp that implements eframe::App.

use crate::ui::components::{DebugPanel, EmotionPanel, ProfileForm, StoryCard};
use crate::ui::state::AppState;
use crate::ui::theme::Theme;
use egui::{self, CentralPanel, RichText, ScrollArea, SidePanel, TopBottomPanel};
use std::time::Instant;

/// Main Storytime application
pub struct StoryApp {
    /// Application state
    state: AppState,
    /// Visual theme
    theme: Theme,
    /// Last frame time for FPS calculation
    last_frame_time: Instant,
}

impl StoryApp {
    pub fn new(cc: &eframe::CreationContext<'_>, state: AppState) -> Self {
        let theme = Theme::night();
        theme.apply(&cc.egui_ctx);

        let mut state = state;
        state.debug_info.add_log("Storytime UI initialized".to_string());

        Self {
            state,
            theme,
            last_frame_time: Instant::now(),
        }
    }

    fn show_header(&mut self, ctx: &egui::Context) {
        TopBottomPanel::top("header")
            .frame(egui::Frame::none().fill(self.theme.bg_secondary).inner_margin(12.0))
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.label(
                        RichText::new("📖 Magical Bedtime Stories")
                            .size(22.0)
                            .strong()
                            .color(self.theme.accent),
                    );

                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if ui.button("🔍").on_hover_text("Toggle Debug Panel").clicked() {
                            self.state.show_debug_panel = !self.state.show_debug_panel;
                        }

                        let emotion = self.state.detected_emotion();
                        if !emotion.is_empty() {
                            ui.label(
                                RichText::new(format!("Feeling {}", emotion))
                                    .color(self.theme.text_secondary),
                            );
                        }
                    });
                });
                ui.label(
                    RichText::new("Create a special story just for you!")
                        .color(self.theme.text_secondary),
                );
            });
    }

    fn show_debug_panel(&mut self, ctx: &egui::Context) {
        if !self.state.show_debug_panel {
            return;
        }

        SidePanel::right("debug_panel")
            .resizable(true)
            .default_width(300.0)
            .min_width(250.0)
            .max_width(500.0)
            .frame(egui::Frame::none().fill(self.theme.bg_primary).inner_margin(self.theme.spacing))
            .show(ctx, |ui| {
                DebugPanel::new(&self.state, &self.theme).show(ui);
            });
    }

    fn show_content(&mut self, ctx: &egui::Context) {
        CentralPanel::default()
            .frame(egui::Frame::none().fill(self.theme.bg_primary).inner_margin(self.theme.spacing))
            .show(ctx, |ui| {
                ScrollArea::vertical().auto_shrink([false, false]).show(ui, |ui| {
                    let theme = &self.theme;

                    theme.card_frame().show(ui, |ui| {
                        ui.set_width(ui.available_width());
                        EmotionPanel::new(&mut self.state.emotion, theme).show(ui);
                    });

                    ui.add_space(theme.spacing_lg);

                    theme.card_frame().show(ui, |ui| {
                        ui.set_width(ui.available_width());
                        ProfileForm::new(&mut self.state.profile, theme).show(ui);
                        ui.add_space(theme.spacing);
                        StoryCard::new(&mut self.state, theme).show(ui);
                    });
                });
            });
    }
}

impl eframe::App for StoryApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let now = Instant::now();
        let delta = now.duration_since(self.last_frame_time).as_secs_f64();
        self.last_frame_time = now;
        self.state.update_fps(delta);

        self.state.poll_events(now);

        self.show_header(ctx);
        self.show_debug_panel(ctx);
        self.show_content(ctx);

        // Keep polling workers and counting down even without input
        if let Some(delay) = self.state.next_repaint(now) {
            ctx.request_repaint_after(delay);
        }
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        self.state.debug_info.add_log("Storytime shutting down".to_string());
        self.state.shutdown();
    }
}
