use std::{net::SocketAddr, path::PathBuf};

use clap::{Args, Parser, Subcommand, ValueEnum};

use super::colors::{ColorMode, Colors, ThemeMode};

#[derive(Parser, Debug)]
#[command(name = "oas3-diff")]
#[command(author, version, about = "Breaking change detection for OpenAPI specifications")]
#[command(styles = Colors::clap_styles())]
pub struct Cli {
  #[command(subcommand)]
  pub command: Commands,

  /// Control color output
  #[arg(long, value_enum, default_value = "auto", global = true)]
  pub color: ColorMode,

  /// Terminal theme (dark or light background)
  #[arg(long, value_enum, default_value = "auto", global = true)]
  pub theme: ThemeMode,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
  /// Compare two OpenAPI specifications and classify every difference
  Compare(CompareCommand),
  /// Serve the comparison over HTTP
  Serve(ServeCommand),
}

#[derive(Args, Debug)]
#[allow(clippy::struct_excessive_bools)]
pub struct CompareCommand {
  /// Baseline specification: a JSON/YAML file path or an http(s) URL
  #[arg(short, long, value_name = "LOCATION")]
  pub source: String,

  /// Candidate specification compared against the baseline
  #[arg(short, long, value_name = "LOCATION")]
  pub target: String,

  /// Report layout
  #[arg(short, long, value_enum, default_value = "nested")]
  pub format: ReportFormat,

  /// Write the report to this file instead of stdout
  #[arg(short, long, value_name = "FILE")]
  pub output: Option<PathBuf>,

  /// Exit with status 1 when any Major change is found
  #[arg(long, default_value_t = false)]
  pub fail_on_major: bool,

  /// Enable verbose output with detailed progress information
  #[arg(short, long, default_value_t = false)]
  pub verbose: bool,

  /// Suppress non-essential output (errors only)
  #[arg(short, long, default_value_t = false)]
  pub quiet: bool,
}

#[derive(Args, Debug)]
pub struct ServeCommand {
  /// Address to listen on
  #[arg(short, long, value_name = "ADDR", default_value = "127.0.0.1:8080")]
  pub bind: SocketAddr,

  /// Suppress per-request logging
  #[arg(short, long, default_value_t = false)]
  pub quiet: bool,
}

#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ReportFormat {
  /// Findings grouped by route, method, media type and status code (JSON)
  #[default]
  Nested,
  /// One JSON entry per finding with its location spelled out
  Flat,
}
