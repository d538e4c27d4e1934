// UI module for the tech radar terminal host
// Handles all UI rendering functions

pub mod layout;
pub mod legend;
pub mod screens;
pub mod widgets;

use crate::app::App;
use ratatui::Frame;

pub fn ui(app: &App, f: &mut Frame<'_>) {
    screens::main::render_main(app, f);
}
