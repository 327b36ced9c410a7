pub mod args;
pub mod commands;

pub use args::{Cli, Commands, InputArgs, OutputFormat};
pub use commands::run;
