mod headless;
mod loop_handler;

pub use headless::{export_svg, run_headless};
pub use loop_handler::run;
