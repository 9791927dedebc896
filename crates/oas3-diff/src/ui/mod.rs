pub mod cli;
pub mod colors;
pub mod commands;

pub use cli::{Cli, Commands, CompareCommand, ReportFormat, ServeCommand};
pub use colors::Colors;
