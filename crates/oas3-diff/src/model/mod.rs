//! In-memory contract model compared by the engine.
//!
//! A [`Document`] is produced once per input by [`Document::from_spec`] and is
//! read-only afterwards. Schema and parameter `$ref`s are kept as
//! [`Reference`] values; looking them up is the job of
//! [`crate::comparator::resolver`].

pub mod lower;
mod schema;

#[cfg(test)]
mod tests;

use std::collections::BTreeMap;

use oas3::spec::ParameterIn;
use serde::Serialize;
use strum::{Display, EnumIter};

pub use lower::ParseError;
pub use schema::{ArraySchema, ObjectSchema, Reference, ScalarKind, ScalarSchema, Schema, SchemaKind};

pub(crate) const SCHEMA_REF_PREFIX: &str = "#/components/schemas/";
pub(crate) const PARAMETER_REF_PREFIX: &str = "#/components/parameters/";

/// Media type to optional body schema.
pub type ContentMap = BTreeMap<String, Option<Schema>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display, EnumIter, Serialize)]
#[strum(serialize_all = "UPPERCASE")]
#[serde(rename_all = "lowercase")]
pub enum HttpMethod {
  Get,
  Put,
  Post,
  Delete,
  Options,
  Head,
  Patch,
  Trace,
}

impl HttpMethod {
  #[must_use]
  pub fn from_http(method: &http::Method) -> Option<Self> {
    match *method {
      http::Method::GET => Some(Self::Get),
      http::Method::PUT => Some(Self::Put),
      http::Method::POST => Some(Self::Post),
      http::Method::DELETE => Some(Self::Delete),
      http::Method::OPTIONS => Some(Self::Options),
      http::Method::HEAD => Some(Self::Head),
      http::Method::PATCH => Some(Self::Patch),
      http::Method::TRACE => Some(Self::Trace),
      _ => None,
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ParameterLocation {
  Query,
  Path,
  Header,
  Cookie,
}

impl From<ParameterIn> for ParameterLocation {
  fn from(value: ParameterIn) -> Self {
    match value {
      ParameterIn::Path => Self::Path,
      ParameterIn::Query => Self::Query,
      ParameterIn::Header => Self::Header,
      ParameterIn::Cookie => Self::Cookie,
    }
  }
}

/// A parsed API contract: routes plus the reusable component tables.
#[derive(Debug, Clone, Default, PartialEq, bon::Builder)]
pub struct Document {
  #[builder(default)]
  pub routes: BTreeMap<String, RouteItem>,
  #[builder(default)]
  pub components: Components,
}

impl Document {
  #[must_use]
  pub fn route(&self, route: &str) -> Option<&RouteItem> {
    self.routes.get(route)
  }
}

#[derive(Debug, Clone, Default, PartialEq, bon::Builder)]
pub struct Components {
  #[builder(default)]
  pub schemas: BTreeMap<String, Schema>,
  #[builder(default)]
  pub parameters: BTreeMap<String, Parameter>,
}

#[derive(Debug, Clone, Default, PartialEq, bon::Builder)]
pub struct RouteItem {
  #[builder(default)]
  pub operations: BTreeMap<HttpMethod, Operation>,
}

impl RouteItem {
  #[must_use]
  pub fn operation(&self, method: HttpMethod) -> Option<&Operation> {
    self.operations.get(&method)
  }
}

#[derive(Debug, Clone, Default, PartialEq, bon::Builder)]
pub struct Operation {
  #[builder(default)]
  pub parameters: Vec<ParameterOrRef>,
  pub request_body: Option<ContentMap>,
  /// Status code to content map. Empty when the operation declares no responses.
  #[builder(default)]
  pub responses: BTreeMap<String, ContentMap>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ParameterOrRef {
  Inline(Parameter),
  Ref(Reference),
}

impl From<Parameter> for ParameterOrRef {
  fn from(value: Parameter) -> Self {
    Self::Inline(value)
  }
}

impl From<Reference> for ParameterOrRef {
  fn from(value: Reference) -> Self {
    Self::Ref(value)
  }
}

#[derive(Debug, Clone, PartialEq, bon::Builder)]
pub struct Parameter {
  #[builder(into)]
  pub name: String,
  pub location: ParameterLocation,
  pub required: Option<bool>,
  pub schema: Option<Schema>,
}

impl Parameter {
  /// Absent and explicit `false` both count as optional.
  #[must_use]
  pub fn is_required(&self) -> bool {
    self.required.unwrap_or(false)
  }
}
