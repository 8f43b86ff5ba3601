//! egui/eframe user interface
//!
//! [`run`] opens the window. [`AppState`] and the components are public so
//! tests can render them in a headless harness.

mod app;
pub mod components;
mod state;
mod theme;

pub use app::StoryApp;
pub use state::{AppState, DebugInfo};
pub use theme::Theme;

use crate::integration::{AppConfig, Services};

/// Build the services from `config` and run the window until it closes
pub fn run(config: AppConfig) -> anyhow::Result<()> {
    let services = Services::from_config(&config)?;
    let state = AppState::new(services, config.cooldown_secs)?;

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([720.0, 900.0])
            .with_min_inner_size([420.0, 500.0])
            .with_title("Storytime"),
        ..Default::default()
    };

    eframe::run_native(
        "Storytime",
        options,
        Box::new(|cc| Ok(Box::new(StoryApp::new(cc, state)))),
    )
    .map_err(|e| anyhow::anyhow!("Window error: {}", e))
}
