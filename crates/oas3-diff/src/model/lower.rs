//! Lowering from a parsed `oas3::Spec` into the comparison [`Document`].

use std::collections::{BTreeMap, BTreeSet};

use oas3::{
  Spec,
  spec::{
    ObjectOrReference, ObjectSchema as SpecObjectSchema, Operation as SpecOperation, Parameter as SpecParameter,
    PathItem, Schema as SpecSchema, SchemaType, SchemaTypeSet,
  },
};
use serde_json::Value;
use thiserror::Error;

use super::{
  ArraySchema, Components, ContentMap, Document, HttpMethod, ObjectSchema, Operation, Parameter, ParameterOrRef,
  Reference, RouteItem, ScalarKind, ScalarSchema, Schema,
};

/// A contract that could not be turned into a [`Document`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("failed to parse OpenAPI document: {}", .diagnostics.join("; "))]
pub struct ParseError {
  pub diagnostics: Vec<String>,
}

impl ParseError {
  #[must_use]
  pub fn new(diagnostics: Vec<String>) -> Self {
    Self { diagnostics }
  }

  #[must_use]
  pub fn single(diagnostic: impl Into<String>) -> Self {
    Self::new(vec![diagnostic.into()])
  }
}

impl Document {
  /// Builds a document from a parsed spec.
  ///
  /// Schema and parameter references stay unresolved. Request body and response
  /// references are resolved here since the model has no table for them; any
  /// that fail are reported together in the returned [`ParseError`].
  pub fn from_spec(spec: &Spec) -> Result<Self, ParseError> {
    let mut lowering = Lowering::new(spec);
    let document = lowering.document();

    if lowering.diagnostics.is_empty() {
      Ok(document)
    } else {
      Err(ParseError::new(lowering.diagnostics))
    }
  }
}

struct Lowering<'a> {
  spec: &'a Spec,
  diagnostics: Vec<String>,
}

impl<'a> Lowering<'a> {
  fn new(spec: &'a Spec) -> Self {
    Self {
      spec,
      diagnostics: vec![],
    }
  }

  fn document(&mut self) -> Document {
    let spec = self.spec;
    let mut routes = BTreeMap::new();

    for (route, path_item) in spec.paths.iter().flatten() {
      routes.insert(route.clone(), self.route_item(route, path_item));
    }

    let mut components = Components::default();
    if let Some(spec_components) = &spec.components {
      for (name, schema_ref) in &spec_components.schemas {
        components.schemas.insert(name.clone(), lower_schema(schema_ref));
      }
      for (name, parameter_ref) in &spec_components.parameters {
        match parameter_ref.resolve(spec) {
          Ok(parameter) => {
            components.parameters.insert(name.clone(), lower_parameter(&parameter));
          }
          Err(error) => self
            .diagnostics
            .push(format!("components.parameters.{name}: {error}")),
        }
      }
    }

    Document { routes, components }
  }

  fn route_item(&mut self, route: &str, path_item: &PathItem) -> RouteItem {
    let shared = path_item.parameters.iter().map(lower_parameter_slot).collect::<Vec<_>>();
    let mut operations = BTreeMap::new();

    for (method, operation) in path_item.methods() {
      let Some(method) = HttpMethod::from_http(&method) else {
        continue;
      };
      operations.insert(method, self.operation(route, method, operation, &shared));
    }

    RouteItem { operations }
  }

  fn operation(
    &mut self,
    route: &str,
    method: HttpMethod,
    operation: &SpecOperation,
    shared: &[ParameterOrRef],
  ) -> Operation {
    let own = operation.parameters.iter().map(lower_parameter_slot).collect();
    let parameters = merge_parameters(own, shared);

    let request_body = operation
      .request_body
      .as_ref()
      .and_then(|body_ref| match body_ref.resolve(self.spec) {
        Ok(body) => Some(lower_content(&body.content)),
        Err(error) => {
          self.diagnostics.push(format!("{method} {route}: request body: {error}"));
          None
        }
      });

    let mut responses = BTreeMap::new();
    for (status, response_ref) in operation.responses.iter().flatten() {
      match response_ref.resolve(self.spec) {
        Ok(response) => {
          responses.insert(status.clone(), lower_content(&response.content));
        }
        Err(error) => self
          .diagnostics
          .push(format!("{method} {route}: response {status}: {error}")),
      }
    }

    Operation {
      parameters,
      request_body,
      responses,
    }
  }
}

/// Operation-level parameters come first and win over a path-level parameter
/// with the same name and location, or the same `$ref`.
fn merge_parameters(own: Vec<ParameterOrRef>, shared: &[ParameterOrRef]) -> Vec<ParameterOrRef> {
  let mut merged = own;
  for slot in shared {
    if !merged.iter().any(|existing| overrides(existing, slot)) {
      merged.push(slot.clone());
    }
  }
  merged
}

fn overrides(existing: &ParameterOrRef, shared: &ParameterOrRef) -> bool {
  match (existing, shared) {
    (ParameterOrRef::Inline(a), ParameterOrRef::Inline(b)) => a.name == b.name && a.location == b.location,
    (ParameterOrRef::Ref(a), ParameterOrRef::Ref(b)) => a == b,
    _ => false,
  }
}

fn lower_parameter_slot(slot: &ObjectOrReference<SpecParameter>) -> ParameterOrRef {
  match slot {
    ObjectOrReference::Ref { ref_path, .. } => ParameterOrRef::Ref(Reference::new(ref_path.clone())),
    ObjectOrReference::Object(parameter) => ParameterOrRef::Inline(lower_parameter(parameter)),
  }
}

fn lower_parameter(parameter: &SpecParameter) -> Parameter {
  Parameter {
    name: parameter.name.clone(),
    location: parameter.location.into(),
    required: parameter.required,
    schema: parameter.schema.as_ref().map(lower_schema),
  }
}

fn lower_content(content: &BTreeMap<String, oas3::spec::MediaType>) -> ContentMap {
  content
    .iter()
    .map(|(content_type, media_type)| (content_type.clone(), media_type.schema.as_ref().map(lower_schema)))
    .collect()
}

pub(crate) fn lower_schema(schema_ref: &ObjectOrReference<SpecObjectSchema>) -> Schema {
  match schema_ref {
    ObjectOrReference::Ref { ref_path, .. } => Schema::Reference(Reference::new(ref_path.clone())),
    ObjectOrReference::Object(schema) => lower_object_schema(schema),
  }
}

fn lower_object_schema(schema: &SpecObjectSchema) -> Schema {
  let Some(schema_type) = declared_type(schema) else {
    return if schema.properties.is_empty() {
      Schema::Untyped
    } else {
      Schema::Object(lower_object_body(schema))
    };
  };

  let scalar = |kind| {
    Schema::Scalar(ScalarSchema {
      kind,
      enum_values: enum_values(schema),
    })
  };

  match schema_type {
    SchemaType::Object => Schema::Object(lower_object_body(schema)),
    SchemaType::Array => Schema::Array(ArraySchema {
      items: schema.items.as_deref().map(lower_items).map(Box::new),
    }),
    SchemaType::String => scalar(ScalarKind::String),
    SchemaType::Integer => scalar(ScalarKind::Integer),
    SchemaType::Number => scalar(ScalarKind::Number),
    SchemaType::Boolean => scalar(ScalarKind::Boolean),
    SchemaType::Null => Schema::Untyped,
  }
}

fn lower_object_body(schema: &SpecObjectSchema) -> ObjectSchema {
  ObjectSchema {
    properties: schema
      .properties
      .iter()
      .map(|(name, property)| (name.clone(), lower_schema(property)))
      .collect(),
    required: schema.required.iter().cloned().collect::<BTreeSet<_>>(),
  }
}

fn lower_items(items: &SpecSchema) -> Schema {
  match items {
    SpecSchema::Object(schema_ref) => lower_schema(schema_ref),
    SpecSchema::Boolean(_) => Schema::Untyped,
  }
}

/// A single type, or the non-null half of a `[T, "null"]` pair.
fn declared_type(schema: &SpecObjectSchema) -> Option<SchemaType> {
  match &schema.schema_type {
    Some(SchemaTypeSet::Single(schema_type)) => Some(*schema_type),
    Some(SchemaTypeSet::Multiple(types)) if types.len() == 2 && types.contains(&SchemaType::Null) => {
      types.iter().copied().find(|schema_type| *schema_type != SchemaType::Null)
    }
    _ => None,
  }
}

fn enum_values(schema: &SpecObjectSchema) -> Option<indexmap::IndexSet<String>> {
  if schema.enum_values.is_empty() {
    return None;
  }

  Some(
    schema
      .enum_values
      .iter()
      .map(|value| match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
      })
      .collect(),
  )
}
