//! Host process: configuration, event loop, effect execution and rendering.
mod app;
mod config;
mod effects;
mod ui;

pub use app::run_app;
