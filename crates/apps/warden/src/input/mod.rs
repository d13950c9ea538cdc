//! Input handling: the line command grammar and its help text

pub mod commands;
pub mod help;

pub use commands::{AddCommand, Command, parse};
pub use help::render_help;
