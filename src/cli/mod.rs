//! Command-line layer: argument types, command dispatch and the interactive browser.

pub mod dispatcher;
pub mod interactive_display;
pub mod main_types;
