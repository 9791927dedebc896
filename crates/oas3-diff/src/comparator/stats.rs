use serde::Serialize;

use super::changes::{Change, ChangeRecord, Scope, Severity};

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonStats {
  pub routes_compared: usize,
  pub routes_added: usize,
  pub routes_removed: usize,
  pub operations_compared: usize,
  pub schemas_compared: usize,
  pub major_changes: usize,
  pub minor_changes: usize,
  pub unresolved_references: usize,
}

impl ComparisonStats {
  pub fn record_change(&mut self, record: &ChangeRecord) {
    match record.severity {
      Severity::Major => self.major_changes += 1,
      Severity::Minor => self.minor_changes += 1,
    }

    match (&record.location.scope, &record.change) {
      (Scope::Route { .. }, Change::Added) => self.routes_added += 1,
      (Scope::Route { .. }, Change::Removed) => self.routes_removed += 1,
      (_, Change::ParameterUnresolved { .. }) => self.unresolved_references += 1,
      _ => {}
    }
  }

  pub fn record_changes<'r>(&mut self, records: impl IntoIterator<Item = &'r ChangeRecord>) {
    for record in records {
      self.record_change(record);
    }
  }

  pub fn record_routes(&mut self, count: usize) {
    self.routes_compared += count;
  }

  pub fn record_operations(&mut self, count: usize) {
    self.operations_compared += count;
  }

  pub fn record_schemas(&mut self, count: usize) {
    self.schemas_compared += count;
  }

  #[must_use]
  pub fn total_changes(&self) -> usize {
    self.major_changes + self.minor_changes
  }
}
