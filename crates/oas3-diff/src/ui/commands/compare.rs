use std::{path::PathBuf, process::ExitCode};

use chrono::{Local, Timelike};
use crossterm::style::Stylize;
use oas3_diff::{
  comparator::{ChangeRecord, Comparison, ComparisonStats, Location, Scope, Severity},
  model::Document,
  utils::load_document,
};
use tokio::io::AsyncWriteExt;

use crate::ui::{Colors, CompareCommand, ReportFormat};

fn format_timestamp() -> String {
  let now = Local::now();
  format!("[{:02}:{:02}:{:02}]", now.hour(), now.minute(), now.second())
}

#[derive(Debug, Clone)]
pub struct CompareConfig {
  pub source: String,
  pub target: String,
  pub format: ReportFormat,
  pub output: Option<PathBuf>,
  pub fail_on_major: bool,
  pub verbose: bool,
  pub quiet: bool,
}

impl CompareConfig {
  pub fn from_command(command: CompareCommand) -> anyhow::Result<Self> {
    let CompareCommand {
      source,
      target,
      format,
      output,
      fail_on_major,
      verbose,
      quiet,
    } = command;

    if verbose && quiet {
      anyhow::bail!("--verbose and --quiet cannot be used together");
    }

    Ok(Self {
      source: require_location(source, "source")?,
      target: require_location(target, "target")?,
      format,
      output,
      fail_on_major,
      verbose,
      quiet,
    })
  }

  async fn load_documents(&self) -> anyhow::Result<(Document, Document)> {
    Ok(tokio::try_join!(load_document(&self.source), load_document(&self.target))?)
  }

  fn render(&self, comparison: &Comparison) -> anyhow::Result<String> {
    let rendered = match self.format {
      ReportFormat::Nested => serde_json::to_string_pretty(&comparison.report())?,
      ReportFormat::Flat => serde_json::to_string_pretty(&comparison.flat_report())?,
    };
    Ok(rendered)
  }

  async fn write_output(&self, report: String) -> anyhow::Result<()> {
    match &self.output {
      Some(path) => {
        if let Some(parent) = path.parent() {
          tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(path, report).await?;
      }
      None => {
        let mut stdout = tokio::io::stdout();
        stdout.write_all(report.as_bytes()).await?;
        stdout.write_all(b"\n").await?;
        stdout.flush().await?;
      }
    }
    Ok(())
  }
}

fn require_location(location: String, side: &str) -> anyhow::Result<String> {
  let trimmed = location.trim();
  if trimmed.is_empty() {
    anyhow::bail!("The {side} location must not be empty");
  }
  Ok(trimmed.to_string())
}

/// What the process reports back once the comparison is written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompareOutcome {
  pub major: usize,
  pub minor: usize,
  fail_on_major: bool,
}

impl CompareOutcome {
  fn is_failure(&self) -> bool {
    self.fail_on_major && self.major > 0
  }

  pub fn exit_code(&self) -> ExitCode {
    if self.is_failure() {
      ExitCode::FAILURE
    } else {
      ExitCode::SUCCESS
    }
  }
}

fn describe_location(location: &Location) -> String {
  let scope = match &location.scope {
    Scope::Route { route } => route.clone(),
    Scope::Operation { route, method } => format!("{method} {route}"),
    Scope::RequestBody {
      route,
      method,
      content_type,
    } => format!("{method} {route} body {content_type}"),
    Scope::Response {
      route,
      method,
      status,
      content_type,
    } => format!("{method} {route} {status} {content_type}"),
    Scope::Schema { name } => format!("schema {name}"),
  };

  if location.property_path.is_empty() {
    scope
  } else {
    format!("{scope} > {}", location.property_path.join("."))
  }
}

fn severity_color(severity: Severity, colors: &Colors) -> crossterm::style::Color {
  match severity {
    Severity::Major => colors.major(),
    Severity::Minor => colors.minor(),
  }
}

struct CompareLogger<'a> {
  config: &'a CompareConfig,
  colors: &'a Colors,
}

impl<'a> CompareLogger<'a> {
  fn new(config: &'a CompareConfig, colors: &'a Colors) -> Self {
    Self { config, colors }
  }

  fn info(&self, message: &str) {
    if !self.config.quiet {
      eprintln!("{} {message}", format_timestamp().with(self.colors.timestamp()));
    }
  }

  fn stat(&self, label: &str, value: String) {
    if !self.config.quiet {
      eprintln!(
        "           {:<25} {}",
        label.with(self.colors.label()),
        value.with(self.colors.value())
      );
    }
  }

  fn log_loading(&self) {
    self.info(
      &format!("Loading source: {}", self.config.source)
        .with(self.colors.primary())
        .to_string(),
    );
    self.info(
      &format!("Loading target: {}", self.config.target)
        .with(self.colors.primary())
        .to_string(),
    );
  }

  fn log_comparing(&self) {
    self.info(&"Comparing specifications...".with(self.colors.primary()).to_string());
  }

  fn print_statistics(&self, stats: &ComparisonStats) {
    if self.config.quiet {
      return;
    }

    self.stat("Routes compared:", stats.routes_compared.to_string());
    if stats.routes_added > 0 || stats.routes_removed > 0 {
      self.stat(
        "",
        format!("{} added, {} removed", stats.routes_added, stats.routes_removed),
      );
    }
    self.stat("Operations compared:", stats.operations_compared.to_string());
    self.stat("Schemas compared:", stats.schemas_compared.to_string());
    self.stat("Major changes:", stats.major_changes.to_string());
    self.stat("Minor changes:", stats.minor_changes.to_string());
    if stats.unresolved_references > 0 {
      self.stat("Unresolved references:", stats.unresolved_references.to_string());
    }
  }

  fn print_findings(&self, records: &[ChangeRecord]) {
    if !self.config.verbose || records.is_empty() {
      return;
    }

    eprintln!();
    for record in records {
      eprintln!(
        "{} {} {}",
        format!("{:<6}", record.severity).with(severity_color(record.severity, self.colors)),
        describe_location(&record.location).with(self.colors.label()),
        record.message().with(self.colors.primary())
      );
    }
    eprintln!();
  }

  fn log_writing(&self) {
    let destination = self
      .config
      .output
      .as_ref()
      .map_or_else(|| "stdout".to_string(), |path| path.display().to_string());
    self.info(
      &format!("Writing {:?} report to: {destination}", self.config.format)
        .to_lowercase()
        .with(self.colors.primary())
        .to_string(),
    );
  }

  fn log_result(&self, outcome: &CompareOutcome) {
    if self.config.quiet {
      return;
    }

    let message = if outcome.major > 0 {
      format!("Found {} breaking change(s)", outcome.major).with(self.colors.major())
    } else {
      "No breaking changes".to_string().with(self.colors.success())
    };
    eprintln!("{} {message}", format_timestamp().with(self.colors.timestamp()));
  }
}

pub async fn compare_specs(config: &CompareConfig, colors: &Colors) -> anyhow::Result<CompareOutcome> {
  let logger = CompareLogger::new(config, colors);

  logger.log_loading();
  let (source, target) = config.load_documents().await?;

  logger.log_comparing();
  let comparison = Comparison::run(&source, &target);
  logger.print_statistics(comparison.stats());
  logger.print_findings(comparison.records());

  logger.log_writing();
  let report = config.render(&comparison)?;
  config.write_output(report).await?;

  let outcome = CompareOutcome {
    major: comparison.stats().major_changes,
    minor: comparison.stats().minor_changes,
    fail_on_major: config.fail_on_major,
  };
  logger.log_result(&outcome);
  Ok(outcome)
}

#[cfg(test)]
mod tests {
  use oas3_diff::model::HttpMethod;

  use super::*;

  fn command(source: &str, target: &str) -> CompareCommand {
    CompareCommand {
      source: source.to_string(),
      target: target.to_string(),
      format: ReportFormat::Nested,
      output: None,
      fail_on_major: false,
      verbose: false,
      quiet: false,
    }
  }

  #[test]
  fn test_from_command_trims_locations() {
    let config = CompareConfig::from_command(command(" old.yaml ", "https://example.com/new.json")).unwrap();
    assert_eq!(config.source, "old.yaml");
    assert_eq!(config.target, "https://example.com/new.json");
  }

  #[test]
  fn test_from_command_rejects_empty_location() {
    let err = CompareConfig::from_command(command("old.yaml", "   ")).unwrap_err();
    assert!(err.to_string().contains("target location must not be empty"));
  }

  #[test]
  fn test_from_command_rejects_verbose_and_quiet() {
    let mut command = command("old.yaml", "new.yaml");
    command.verbose = true;
    command.quiet = true;
    assert!(CompareConfig::from_command(command).is_err());
  }

  #[test]
  fn test_outcome_only_fails_when_requested() {
    let lenient = CompareOutcome {
      major: 2,
      minor: 0,
      fail_on_major: false,
    };
    let strict = CompareOutcome {
      fail_on_major: true,
      ..lenient
    };
    let clean = CompareOutcome { major: 0, ..strict };

    assert!(!lenient.is_failure());
    assert!(strict.is_failure());
    assert!(!clean.is_failure());
  }

  #[test]
  fn test_describe_location_appends_property_path() {
    let location = Location {
      scope: Scope::RequestBody {
        route: "/offers".into(),
        method: HttpMethod::Put,
        content_type: "application/json".into(),
      },
      property_path: vec!["tags".into(), "[]".into()],
    };
    assert_eq!(
      describe_location(&location),
      "PUT /offers body application/json > tags.[]"
    );
  }
}
