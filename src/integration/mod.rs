//! Integration layer: configuration and backend wiring
//!
//! [`AppConfig`] gathers settings from the environment and [`Services`]
//! turns them into the capabilities the UI state is built from.

pub mod config;
pub mod services;

pub use config::AppConfig;
pub use services::Services;
