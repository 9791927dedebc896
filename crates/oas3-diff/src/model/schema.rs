use std::collections::{BTreeMap, BTreeSet};

use indexmap::IndexSet;
use serde::Serialize;
use strum::Display;

use super::{PARAMETER_REF_PREFIX, SCHEMA_REF_PREFIX};

/// A structural type description, one variant per schema kind.
#[derive(Debug, Clone, PartialEq)]
pub enum Schema {
  Reference(Reference),
  Object(ObjectSchema),
  Array(ArraySchema),
  Scalar(ScalarSchema),
  /// No single primitive type: compositions, free-form values, multi-type sets.
  Untyped,
}

impl Schema {
  #[must_use]
  pub fn reference(path: impl Into<String>) -> Self {
    Self::Reference(Reference::new(path))
  }

  #[must_use]
  pub fn scalar(kind: ScalarKind) -> Self {
    Self::Scalar(ScalarSchema { kind, enum_values: None })
  }

  #[must_use]
  pub fn string_enum<I, S>(values: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: Into<String>,
  {
    Self::Scalar(ScalarSchema {
      kind: ScalarKind::String,
      enum_values: Some(values.into_iter().map(Into::into).collect()),
    })
  }

  #[must_use]
  pub fn array_of(items: Self) -> Self {
    Self::Array(ArraySchema {
      items: Some(Box::new(items)),
    })
  }

  /// The declared primitive type, if any. References and untyped schemas have none.
  #[must_use]
  pub fn kind(&self) -> Option<SchemaKind> {
    match self {
      Self::Object(_) => Some(SchemaKind::Object),
      Self::Array(_) => Some(SchemaKind::Array),
      Self::Scalar(scalar) => Some(scalar.kind.into()),
      Self::Reference(_) | Self::Untyped => None,
    }
  }

  #[must_use]
  pub fn as_reference(&self) -> Option<&Reference> {
    match self {
      Self::Reference(reference) => Some(reference),
      _ => None,
    }
  }

  #[must_use]
  pub fn as_object(&self) -> Option<&ObjectSchema> {
    match self {
      Self::Object(object) => Some(object),
      _ => None,
    }
  }

  #[must_use]
  pub fn enum_values(&self) -> Option<&IndexSet<String>> {
    match self {
      Self::Scalar(scalar) => scalar.enum_values.as_ref(),
      _ => None,
    }
  }

  #[must_use]
  pub fn array_items(&self) -> Option<&Self> {
    match self {
      Self::Array(array) => array.items.as_deref(),
      _ => None,
    }
  }
}

#[derive(Debug, Clone, Default, PartialEq, bon::Builder)]
pub struct ObjectSchema {
  #[builder(default)]
  pub properties: BTreeMap<String, Schema>,
  #[builder(default)]
  pub required: BTreeSet<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ArraySchema {
  pub items: Option<Box<Schema>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScalarSchema {
  pub kind: ScalarKind,
  /// Declared `enum` values in declaration order, `None` when no `enum` is present.
  pub enum_values: Option<IndexSet<String>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarKind {
  String,
  Integer,
  Number,
  Boolean,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum SchemaKind {
  Object,
  Array,
  String,
  Integer,
  Number,
  Boolean,
}

impl From<ScalarKind> for SchemaKind {
  fn from(value: ScalarKind) -> Self {
    match value {
      ScalarKind::String => Self::String,
      ScalarKind::Integer => Self::Integer,
      ScalarKind::Number => Self::Number,
      ScalarKind::Boolean => Self::Boolean,
    }
  }
}

/// A `$ref` as written in the document.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Reference {
  path: String,
}

impl Reference {
  #[must_use]
  pub fn new(path: impl Into<String>) -> Self {
    Self { path: path.into() }
  }

  #[must_use]
  pub fn schema(name: &str) -> Self {
    Self::new(format!("{SCHEMA_REF_PREFIX}{name}"))
  }

  #[must_use]
  pub fn parameter(name: &str) -> Self {
    Self::new(format!("{PARAMETER_REF_PREFIX}{name}"))
  }

  #[must_use]
  pub fn path(&self) -> &str {
    &self.path
  }

  /// Component name when this points into the local schema table.
  #[must_use]
  pub fn schema_name(&self) -> Option<&str> {
    self.path.strip_prefix(SCHEMA_REF_PREFIX)
  }

  /// Component name when this points into the local parameter table.
  #[must_use]
  pub fn parameter_name(&self) -> Option<&str> {
    self.path.strip_prefix(PARAMETER_REF_PREFIX)
  }
}

impl std::fmt::Display for Reference {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.write_str(&self.path)
  }
}
