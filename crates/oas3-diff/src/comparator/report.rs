//! Serializable views over a list of [`ChangeRecord`]s.
//!
//! [`ComparisonReport`] groups messages by route, method, media type and status
//! code. [`FlatReport`] keeps one entry per record for machine consumers.

use std::collections::BTreeMap;

use serde::Serialize;

use super::changes::{ChangeRecord, Scope, Severity};
use crate::model::HttpMethod;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeSummary {
  pub major_changes: Vec<String>,
  pub minor_changes: Vec<String>,
}

impl ChangeSummary {
  fn push(&mut self, record: &ChangeRecord) {
    match record.severity {
      Severity::Major => self.major_changes.push(record.message()),
      Severity::Minor => self.minor_changes.push(record.message()),
    }
  }

  #[must_use]
  pub fn is_empty(&self) -> bool {
    self.major_changes.is_empty() && self.minor_changes.is_empty()
  }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OperationReport {
  #[serde(flatten)]
  pub changes: ChangeSummary,
  /// Media type to findings.
  #[serde(skip_serializing_if = "BTreeMap::is_empty")]
  pub request_body_changes: BTreeMap<String, ChangeSummary>,
  /// Status code to media type to findings.
  #[serde(skip_serializing_if = "BTreeMap::is_empty")]
  pub response_content_changes: BTreeMap<String, BTreeMap<String, ChangeSummary>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteReport {
  pub route: String,
  #[serde(flatten)]
  pub changes: ChangeSummary,
  #[serde(flatten)]
  pub methods: BTreeMap<HttpMethod, OperationReport>,
}

impl RouteReport {
  fn new(route: &str) -> Self {
    Self {
      route: route.to_string(),
      changes: ChangeSummary::default(),
      methods: BTreeMap::new(),
    }
  }

  #[must_use]
  pub fn method(&self, method: HttpMethod) -> Option<&OperationReport> {
    self.methods.get(&method)
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemaReport {
  pub schema: String,
  #[serde(flatten)]
  pub changes: ChangeSummary,
}

/// Findings nested by route and method, plus component schemas.
///
/// Only locations with at least one finding appear.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonReport {
  pub routes: Vec<RouteReport>,
  pub schemas: Vec<SchemaReport>,
}

impl ComparisonReport {
  #[must_use]
  pub fn from_records(records: &[ChangeRecord]) -> Self {
    let mut routes = BTreeMap::<String, RouteReport>::new();
    let mut schemas = BTreeMap::<String, SchemaReport>::new();

    for record in records {
      match &record.location.scope {
        Scope::Route { route } => route_entry(&mut routes, route).changes.push(record),
        Scope::Operation { route, method } => operation_entry(&mut routes, route, *method).changes.push(record),
        Scope::RequestBody {
          route,
          method,
          content_type,
        } => operation_entry(&mut routes, route, *method)
          .request_body_changes
          .entry(content_type.clone())
          .or_default()
          .push(record),
        Scope::Response {
          route,
          method,
          status,
          content_type,
        } => operation_entry(&mut routes, route, *method)
          .response_content_changes
          .entry(status.clone())
          .or_default()
          .entry(content_type.clone())
          .or_default()
          .push(record),
        Scope::Schema { name } => schemas
          .entry(name.clone())
          .or_insert_with(|| SchemaReport {
            schema: name.clone(),
            changes: ChangeSummary::default(),
          })
          .changes
          .push(record),
      }
    }

    Self {
      routes: routes.into_values().collect(),
      schemas: schemas.into_values().collect(),
    }
  }

  #[must_use]
  pub fn route(&self, route: &str) -> Option<&RouteReport> {
    self.routes.iter().find(|report| report.route == route)
  }

  #[must_use]
  pub fn schema(&self, name: &str) -> Option<&SchemaReport> {
    self.schemas.iter().find(|report| report.schema == name)
  }

  #[must_use]
  pub fn is_empty(&self) -> bool {
    self.routes.is_empty() && self.schemas.is_empty()
  }

  #[must_use]
  pub fn major_count(&self) -> usize {
    self.summaries().map(|summary| summary.major_changes.len()).sum()
  }

  #[must_use]
  pub fn minor_count(&self) -> usize {
    self.summaries().map(|summary| summary.minor_changes.len()).sum()
  }

  #[must_use]
  pub fn has_breaking_changes(&self) -> bool {
    self.major_count() > 0
  }

  fn summaries(&self) -> impl Iterator<Item = &ChangeSummary> {
    let route_summaries = self.routes.iter().flat_map(|route| {
      std::iter::once(&route.changes).chain(route.methods.values().flat_map(|operation| {
        std::iter::once(&operation.changes)
          .chain(operation.request_body_changes.values())
          .chain(operation.response_content_changes.values().flat_map(BTreeMap::values))
      }))
    });
    route_summaries.chain(self.schemas.iter().map(|schema| &schema.changes))
  }
}

fn route_entry<'r>(routes: &'r mut BTreeMap<String, RouteReport>, route: &str) -> &'r mut RouteReport {
  routes
    .entry(route.to_string())
    .or_insert_with(|| RouteReport::new(route))
}

fn operation_entry<'r>(
  routes: &'r mut BTreeMap<String, RouteReport>,
  route: &str,
  method: HttpMethod,
) -> &'r mut OperationReport {
  route_entry(routes, route).methods.entry(method).or_default()
}

/// One finding with its location spelled out field by field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FlatChange {
  pub severity: Severity,
  pub kind: &'static str,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub route: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub method: Option<HttpMethod>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub content_type: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub status_code: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub schema: Option<String>,
  #[serde(skip_serializing_if = "Vec::is_empty")]
  pub property_path: Vec<String>,
  pub message: String,
}

impl From<&ChangeRecord> for FlatChange {
  fn from(record: &ChangeRecord) -> Self {
    let scope = &record.location.scope;
    let (content_type, status_code, schema) = match scope {
      Scope::RequestBody { content_type, .. } => (Some(content_type.clone()), None, None),
      Scope::Response {
        status, content_type, ..
      } => (Some(content_type.clone()), Some(status.clone()), None),
      Scope::Schema { name } => (None, None, Some(name.clone())),
      Scope::Route { .. } | Scope::Operation { .. } => (None, None, None),
    };

    Self {
      severity: record.severity,
      kind: record.change.kind(),
      route: scope.route().map(str::to_string),
      method: scope.method(),
      content_type,
      status_code,
      schema,
      property_path: record.location.property_path.clone(),
      message: record.message(),
    }
  }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FlatReport {
  pub major: usize,
  pub minor: usize,
  pub changes: Vec<FlatChange>,
}

impl FlatReport {
  #[must_use]
  pub fn from_records(records: &[ChangeRecord]) -> Self {
    let changes = records.iter().map(FlatChange::from).collect::<Vec<_>>();
    let major = changes
      .iter()
      .filter(|change| change.severity == Severity::Major)
      .count();

    Self {
      major,
      minor: changes.len() - major,
      changes,
    }
  }
}
