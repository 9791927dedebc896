//! Classifies every difference between a source and a target [`Document`].
//!
//! The run is two passes over the pair: routes (with their operations,
//! parameters and content), then the component schema tables. Findings are
//! collected as [`ChangeRecord`]s and only turned into text by the report
//! types.

mod bodies;
pub mod changes;
mod operations;
mod parameters;
mod properties;
pub mod report;
pub mod resolver;
mod routes;
mod schemas;
mod stats;

#[cfg(test)]
mod tests;

pub use changes::{Change, ChangeRecord, Location, Scope, Severity, Side};
pub use report::{ComparisonReport, FlatChange, FlatReport};
pub use stats::ComparisonStats;

use crate::model::Document;

#[derive(Debug, Clone, Copy)]
pub(crate) struct DocumentPair<'a> {
  pub(crate) source: &'a Document,
  pub(crate) target: &'a Document,
}

/// The outcome of comparing two documents.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Comparison {
  records: Vec<ChangeRecord>,
  stats: ComparisonStats,
}

impl Comparison {
  /// Compares `source` (the baseline) against `target` (the candidate).
  ///
  /// Never fails: unresolvable references inside either document become
  /// findings rather than errors.
  #[must_use]
  pub fn run(source: &Document, target: &Document) -> Self {
    let documents = DocumentPair { source, target };
    let mut records = vec![];
    let mut stats = ComparisonStats::default();

    let tally = routes::compare_routes(documents, &mut records);
    stats.record_routes(tally.routes_compared);
    stats.record_operations(tally.operations_compared);

    let schemas_compared = schemas::compare_component_schemas(documents, &mut records);
    stats.record_schemas(schemas_compared);
    stats.record_changes(&records);

    Self { records, stats }
  }

  #[must_use]
  pub fn records(&self) -> &[ChangeRecord] {
    &self.records
  }

  #[must_use]
  pub fn into_records(self) -> Vec<ChangeRecord> {
    self.records
  }

  #[must_use]
  pub fn stats(&self) -> &ComparisonStats {
    &self.stats
  }

  #[must_use]
  pub fn has_breaking_changes(&self) -> bool {
    self.records.iter().any(ChangeRecord::is_major)
  }

  #[must_use]
  pub fn report(&self) -> ComparisonReport {
    ComparisonReport::from_records(&self.records)
  }

  #[must_use]
  pub fn flat_report(&self) -> FlatReport {
    FlatReport::from_records(&self.records)
  }
}

/// Compares two documents and returns the nested report.
#[must_use]
pub fn compare(source: &Document, target: &Document) -> ComparisonReport {
  Comparison::run(source, target).report()
}
