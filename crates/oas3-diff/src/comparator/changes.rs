use std::fmt;

use serde::Serialize;
use strum::Display;

use crate::model::{HttpMethod, ParameterLocation, Reference, SchemaKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display, Serialize)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Severity {
  Major,
  Minor,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Side {
  Source,
  Target,
}

/// Where in the contract a change was observed.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Scope {
  Route {
    route: String,
  },
  Operation {
    route: String,
    method: HttpMethod,
  },
  RequestBody {
    route: String,
    method: HttpMethod,
    content_type: String,
  },
  Response {
    route: String,
    method: HttpMethod,
    status: String,
    content_type: String,
  },
  Schema {
    name: String,
  },
}

impl Scope {
  #[must_use]
  pub fn route(&self) -> Option<&str> {
    match self {
      Self::Route { route }
      | Self::Operation { route, .. }
      | Self::RequestBody { route, .. }
      | Self::Response { route, .. } => Some(route),
      Self::Schema { .. } => None,
    }
  }

  #[must_use]
  pub fn method(&self) -> Option<HttpMethod> {
    match self {
      Self::Operation { method, .. } | Self::RequestBody { method, .. } | Self::Response { method, .. } => {
        Some(*method)
      }
      Self::Route { .. } | Self::Schema { .. } => None,
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Location {
  pub scope: Scope,
  /// Property or parameter names walked below the scope, `[]` for array items.
  pub property_path: Vec<String>,
}

impl Location {
  #[must_use]
  pub fn new(scope: Scope) -> Self {
    Self {
      scope,
      property_path: vec![],
    }
  }
}

/// Names listed in one batched finding, rendered comma separated.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NameList(pub Vec<String>);

impl NameList {
  pub fn from_names<'n>(names: impl IntoIterator<Item = &'n str>) -> Self {
    Self(names.into_iter().map(str::to_string).collect())
  }

  #[must_use]
  pub fn is_empty(&self) -> bool {
    self.0.is_empty()
  }

  #[must_use]
  pub fn contains(&self, name: &str) -> bool {
    self.0.iter().any(|candidate| candidate == name)
  }
}

impl fmt::Display for NameList {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.0.join(", "))
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum RequiredSubject {
  Parameters,
  Properties,
}

/// A declared primitive type, or `unspecified` when the schema declares none.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TypeName(pub Option<SchemaKind>);

impl fmt::Display for TypeName {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self.0 {
      Some(kind) => write!(f, "{kind}"),
      None => f.write_str("unspecified"),
    }
  }
}

/// Either a declared type or a `$ref`, for findings that mix the two.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Shape {
  Type(SchemaKind),
  Ref(Reference),
}

impl fmt::Display for Shape {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::Type(kind) => write!(f, "type: {kind}"),
      Self::Ref(reference) => write!(f, "ref: {reference}"),
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EnumDelta {
  pub added: Vec<String>,
  pub removed: Vec<String>,
}

impl fmt::Display for EnumDelta {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let mut parts = vec![];
    if !self.added.is_empty() {
      parts.push(format!("new values: [{}]", self.added.join(" ")));
    }
    if !self.removed.is_empty() {
      parts.push(format!("removed values: [{}]", self.removed.join(" ")));
    }
    f.write_str(&parts.join(" "))
  }
}

/// The raw facts of one difference. Message text is only produced by `Display`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Display)]
pub enum Change {
  #[strum(to_string = "Added in target")]
  Added,
  #[strum(to_string = "Removed from target")]
  Removed,
  #[strum(to_string = "Added {method} operation")]
  OperationAdded { method: HttpMethod },
  #[strum(to_string = "Removed {method} operation")]
  OperationRemoved { method: HttpMethod },
  #[strum(to_string = "Parameters added to target: {names}")]
  ParametersAdded { names: NameList },
  #[strum(to_string = "Parameters removed from target: {names}")]
  ParametersRemoved { names: NameList },
  #[strum(to_string = "Parameter reference {reference} cannot be resolved in {side}")]
  ParameterUnresolved { reference: Reference, side: Side },
  #[strum(to_string = "Parameter {name} is {source} in source and {target} in target")]
  ParameterLocationChanged {
    name: String,
    source: ParameterLocation,
    target: ParameterLocation,
  },
  #[strum(to_string = "{subject} marked as required in target: [{names}]")]
  RequiredAdded { subject: RequiredSubject, names: NameList },
  #[strum(to_string = "{subject} marked as not required in target: [{names}]")]
  RequiredRemoved { subject: RequiredSubject, names: NameList },
  #[strum(to_string = "Request body added on target")]
  RequestBodyAdded,
  #[strum(to_string = "Request body removed from target")]
  RequestBodyRemoved,
  #[strum(to_string = "Response added to target")]
  ResponseAdded,
  #[strum(to_string = "Response removed from target")]
  ResponseRemoved,
  #[strum(to_string = "Response {status} added to target")]
  ResponseStatusAdded { status: String },
  #[strum(to_string = "Response {status} removed from target")]
  ResponseStatusRemoved { status: String },
  #[strum(to_string = "Content schema changed")]
  ContentChanged,
  #[strum(to_string = "Properties added to target: {names}")]
  PropertiesAdded { names: NameList },
  #[strum(to_string = "Properties deleted from target: {names}")]
  PropertiesRemoved { names: NameList },
  #[strum(to_string = "Property {source} renamed to {target} in target")]
  PropertyRenamed { source: String, target: String },
  #[strum(to_string = "{subject} has ref: {source} in source and ref: {target} in target")]
  RefChanged {
    subject: String,
    source: Reference,
    target: Reference,
  },
  #[strum(to_string = "{subject} has {source} in source and {target} in target")]
  TypeReplacedByRef { subject: String, source: Shape, target: Shape },
  #[strum(to_string = "{subject} has type: {source} in source and type: {target} in target")]
  TypeChanged {
    subject: String,
    source: TypeName,
    target: TypeName,
  },
  #[strum(to_string = "Enum: {subject} has {delta}")]
  EnumChanged { subject: String, delta: EnumDelta },
  #[strum(to_string = "Schema {name} is missing or not an object on {side}")]
  SchemaMissing { name: String, side: Side },
}

impl Change {
  /// Stable machine-readable name, used by the flat report.
  #[must_use]
  pub fn kind(&self) -> &'static str {
    match self {
      Self::Added => "added",
      Self::Removed => "removed",
      Self::OperationAdded { .. } => "operation_added",
      Self::OperationRemoved { .. } => "operation_removed",
      Self::ParametersAdded { .. } => "parameters_added",
      Self::ParametersRemoved { .. } => "parameters_removed",
      Self::ParameterUnresolved { .. } => "parameter_unresolved",
      Self::ParameterLocationChanged { .. } => "parameter_location_changed",
      Self::RequiredAdded { .. } => "required_added",
      Self::RequiredRemoved { .. } => "required_removed",
      Self::RequestBodyAdded => "request_body_added",
      Self::RequestBodyRemoved => "request_body_removed",
      Self::ResponseAdded => "response_added",
      Self::ResponseRemoved => "response_removed",
      Self::ResponseStatusAdded { .. } => "response_status_added",
      Self::ResponseStatusRemoved { .. } => "response_status_removed",
      Self::ContentChanged => "content_changed",
      Self::PropertiesAdded { .. } => "properties_added",
      Self::PropertiesRemoved { .. } => "properties_removed",
      Self::PropertyRenamed { .. } => "property_renamed",
      Self::RefChanged { .. } => "ref_changed",
      Self::TypeReplacedByRef { .. } => "type_replaced_by_ref",
      Self::TypeChanged { .. } => "type_changed",
      Self::EnumChanged { .. } => "enum_changed",
      Self::SchemaMissing { .. } => "schema_missing",
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ChangeRecord {
  pub severity: Severity,
  pub location: Location,
  pub change: Change,
}

impl ChangeRecord {
  #[must_use]
  pub fn is_major(&self) -> bool {
    self.severity == Severity::Major
  }

  #[must_use]
  pub fn message(&self) -> String {
    self.change.to_string()
  }
}

impl fmt::Display for ChangeRecord {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "[{}] {}", self.severity, self.change)
  }
}

/// Sink that stamps every finding with the current location.
pub(crate) struct Findings<'r> {
  location: Location,
  records: &'r mut Vec<ChangeRecord>,
}

impl<'r> Findings<'r> {
  pub(crate) fn new(scope: Scope, records: &'r mut Vec<ChangeRecord>) -> Self {
    Self {
      location: Location::new(scope),
      records,
    }
  }

  pub(crate) fn major(&mut self, change: Change) {
    self.push(Severity::Major, change);
  }

  pub(crate) fn minor(&mut self, change: Change) {
    self.push(Severity::Minor, change);
  }

  fn push(&mut self, severity: Severity, change: Change) {
    self.records.push(ChangeRecord {
      severity,
      location: self.location.clone(),
      change,
    });
  }

  /// Findings under a different scope, keeping the property path.
  pub(crate) fn scoped(&mut self, scope: Scope) -> Findings<'_> {
    Findings {
      location: Location {
        scope,
        property_path: self.location.property_path.clone(),
      },
      records: &mut *self.records,
    }
  }

  /// Findings one property (or `[]` for array items) deeper.
  pub(crate) fn at(&mut self, segment: &str) -> Findings<'_> {
    let mut location = self.location.clone();
    location.property_path.push(segment.to_string());
    Findings {
      location,
      records: &mut *self.records,
    }
  }
}
