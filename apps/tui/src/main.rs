use std::path::Path;

use clap::Parser;
use color_eyre::Result;
use tech_radar_tui::cli::CliArgs;
use tech_radar_tui::{event, logging, terminal, App, AppConfig};

#[tokio::main]
async fn main() -> Result<()> {
    // Setup error handling
    color_eyre::install()?;

    let args = CliArgs::parse();
    args.apply_env_overrides();
    let config = AppConfig::from_env()?;

    let interactive = !args.is_batch() && is_terminal();
    logging::init(&config, interactive)?;

    if let Some(path) = args.svg.as_deref() {
        return event::export_svg(&config, Path::new(path), args.size).await;
    }

    if !interactive {
        // Run in headless mode
        return event::run_headless(&config, args.json).await;
    }

    let mut app = App::new(config);
    app.load().await;

    let mut terminal = terminal::setup()?;
    let result = event::run(&mut terminal, &mut app).await;

    // Restore terminal
    terminal::cleanup(true, true);

    result
}

// Check if we're running in a terminal
fn is_terminal() -> bool {
    atty::is(atty::Stream::Stdout)
}
