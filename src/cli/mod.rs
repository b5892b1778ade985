pub mod commands;
pub mod handlers;
pub mod output;

pub use commands::{BuildArgs, CheckArgs, CliArgs, Commands};
pub use output::{CheckReport, ConsoleHandler, OutputFormat};
