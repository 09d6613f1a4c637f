//! Application module
//!
//! This module contains the view state, configuration and the screen
//! controller that drives a capture.

pub mod config;
pub mod controller;
mod state;

pub use config::AppConfig;
pub use controller::{CaptureController, ControllerSettings, Services};
pub use state::ViewState;
