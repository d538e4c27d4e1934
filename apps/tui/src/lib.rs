// Export our modules for the binary and tests
pub mod app;
pub mod cli;
pub mod config;
pub mod data;
pub mod event;
pub mod logging;
pub mod terminal;
pub mod ui;

pub use app::App;
pub use config::AppConfig;
