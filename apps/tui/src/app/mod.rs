// App module for the tech radar terminal host
// Holds application state and the actions that drive it

pub mod actions;
pub mod input;
pub mod state;

pub use input::{handle_input, handle_mouse};
pub use state::App;
