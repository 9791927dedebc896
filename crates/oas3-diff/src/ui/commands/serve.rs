use std::net::SocketAddr;

use chrono::{Local, Timelike};
use crossterm::style::Stylize;
use oas3_diff::{
  comparator::ComparisonReport,
  server::{CompareObserver, CompareRequest},
  utils::LoadError,
};
use tokio::net::TcpListener;

use crate::ui::{Colors, ServeCommand};

fn format_timestamp() -> String {
  let now = Local::now();
  format!("[{:02}:{:02}:{:02}]", now.hour(), now.minute(), now.second())
}

#[derive(Debug, Clone, Copy)]
pub struct ServeConfig {
  pub bind: SocketAddr,
  pub quiet: bool,
}

impl From<ServeCommand> for ServeConfig {
  fn from(command: ServeCommand) -> Self {
    Self {
      bind: command.bind,
      quiet: command.quiet,
    }
  }
}

/// Per-request log lines on stderr. Rejections are always printed.
#[derive(Debug, Clone, Copy)]
struct ServeLogger {
  colors: Colors,
  quiet: bool,
}

impl ServeLogger {
  fn info(&self, message: &str) {
    if !self.quiet {
      eprintln!("{} {message}", format_timestamp().with(self.colors.timestamp()));
    }
  }

  fn log_listening(&self, address: SocketAddr) {
    self.info(
      &format!("Listening on http://{address}")
        .with(self.colors.success())
        .to_string(),
    );
  }

  fn log_shutdown(&self) {
    self.info(&"Shut down".with(self.colors.primary()).to_string());
  }
}

impl CompareObserver for ServeLogger {
  fn compared(&self, request: &CompareRequest, report: &ComparisonReport) {
    let major = report.major_count();
    let counts = format!("{major} major, {} minor", report.minor_count());
    let counts = if major > 0 {
      counts.with(self.colors.major())
    } else {
      counts.with(self.colors.value())
    };
    self.info(&format!(
      "{} {} {} {counts}",
      request.source_location.as_str().with(self.colors.primary()),
      "->".with(self.colors.label()),
      request.target_location.as_str().with(self.colors.primary()),
    ));
  }

  fn rejected(&self, request: &CompareRequest, error: &LoadError) {
    eprintln!(
      "{} {} {} {}",
      format_timestamp().with(self.colors.timestamp()),
      "Rejected".with(self.colors.major()),
      format!("{} -> {}:", request.source_location, request.target_location).with(self.colors.primary()),
      error.to_string().with(self.colors.value())
    );
  }
}

async fn shutdown_signal() {
  if tokio::signal::ctrl_c().await.is_err() {
    std::future::pending::<()>().await;
  }
}

pub async fn serve(config: ServeConfig, colors: &Colors) -> anyhow::Result<()> {
  let listener = TcpListener::bind(config.bind).await?;
  let logger = ServeLogger {
    colors: *colors,
    quiet: config.quiet,
  };

  logger.log_listening(listener.local_addr()?);
  oas3_diff::server::serve(listener, logger, shutdown_signal()).await?;
  logger.log_shutdown();

  Ok(())
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_config_from_command() {
    let command = ServeCommand {
      bind: "0.0.0.0:9000".parse().unwrap(),
      quiet: true,
    };
    let config = ServeConfig::from(command);
    assert_eq!(config.bind.port(), 9000);
    assert!(config.quiet);
  }
}
