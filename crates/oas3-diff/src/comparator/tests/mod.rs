mod resolver;

use std::collections::BTreeMap;

use serde_json::Value;

use super::{
  Comparison, DocumentPair,
  changes::{Change, ChangeRecord, Findings, Scope, Severity},
};
use crate::model::{
  Components, ContentMap, Document, HttpMethod, ObjectSchema, Operation, RouteItem, ScalarKind, Schema,
};

pub(super) fn fixture() -> Value {
  serde_json::from_str(include_str!("../../../fixtures/offers_api.json")).expect("fixture should be valid JSON")
}

pub(super) fn document_from(value: &Value) -> Document {
  let spec = serde_json::from_value::<oas3::Spec>(value.clone()).expect("failed to parse test spec");
  Document::from_spec(&spec).expect("fixture should lower")
}

pub(super) fn compare_values(source: &Value, target: &Value) -> Comparison {
  Comparison::run(&document_from(source), &document_from(target))
}

/// Replaces the value at a JSON pointer. Route keys escape `/` as `~1`.
pub(super) fn set(value: &mut Value, pointer: &str, replacement: Value) {
  *value
    .pointer_mut(pointer)
    .unwrap_or_else(|| panic!("no value at {pointer}")) = replacement;
}

pub(super) fn remove(value: &mut Value, pointer: &str, key: &str) {
  value
    .pointer_mut(pointer)
    .and_then(Value::as_object_mut)
    .unwrap_or_else(|| panic!("no object at {pointer}"))
    .remove(key)
    .unwrap_or_else(|| panic!("no key {key} under {pointer}"));
}

pub(super) fn rename_key(value: &mut Value, pointer: &str, from: &str, to: &str) {
  let object = value
    .pointer_mut(pointer)
    .and_then(Value::as_object_mut)
    .unwrap_or_else(|| panic!("no object at {pointer}"));
  let moved = object.remove(from).unwrap_or_else(|| panic!("no key {from} under {pointer}"));
  object.insert(to.to_string(), moved);
}

pub(super) fn majors(records: &[ChangeRecord]) -> Vec<&ChangeRecord> {
  records.iter().filter(|record| record.severity == Severity::Major).collect()
}

pub(super) fn minors(records: &[ChangeRecord]) -> Vec<&ChangeRecord> {
  records.iter().filter(|record| record.severity == Severity::Minor).collect()
}

pub(super) fn in_scope<'r>(records: &'r [ChangeRecord], scope: &Scope) -> Vec<&'r ChangeRecord> {
  records.iter().filter(|record| &record.location.scope == scope).collect()
}

pub(super) fn messages(records: &[ChangeRecord]) -> Vec<String> {
  records.iter().map(ChangeRecord::message).collect()
}

pub(super) fn string() -> Schema {
  Schema::scalar(ScalarKind::String)
}

pub(super) fn integer() -> Schema {
  Schema::scalar(ScalarKind::Integer)
}

pub(super) fn object(properties: &[(&str, Schema)], required: &[&str]) -> Schema {
  Schema::Object(
    ObjectSchema::builder()
      .properties(
        properties
          .iter()
          .map(|(name, schema)| ((*name).to_string(), schema.clone()))
          .collect(),
      )
      .required(required.iter().map(|name| (*name).to_string()).collect())
      .build(),
  )
}

pub(super) fn with_schemas(schemas: &[(&str, Schema)]) -> Document {
  Document::builder()
    .components(
      Components::builder()
        .schemas(
          schemas
            .iter()
            .map(|(name, schema)| ((*name).to_string(), schema.clone()))
            .collect(),
        )
        .build(),
    )
    .build()
}

pub(super) fn with_operation(route: &str, method: HttpMethod, operation: Operation) -> Document {
  Document::builder()
    .routes(BTreeMap::from([(
      route.to_string(),
      RouteItem::builder()
        .operations(BTreeMap::from([(method, operation)]))
        .build(),
    )]))
    .build()
}

pub(super) fn json_content(schema: Schema) -> ContentMap {
  BTreeMap::from([("application/json".to_string(), Some(schema))])
}

/// Runs a comparison step against a throwaway record list.
pub(super) fn collect(scope: Scope, step: impl FnOnce(&mut Findings<'_>)) -> Vec<ChangeRecord> {
  let mut records = vec![];
  step(&mut Findings::new(scope, &mut records));
  records
}

pub(super) fn pair<'a>(source: &'a Document, target: &'a Document) -> DocumentPair<'a> {
  DocumentPair { source, target }
}

pub(super) fn schema_scope(name: &str) -> Scope {
  Scope::Schema { name: name.to_string() }
}

pub(super) fn kinds(records: &[ChangeRecord]) -> Vec<&'static str> {
  records.iter().map(|record| record.change.kind()).collect()
}

pub(super) fn has_change(records: &[ChangeRecord], expected: &Change) -> bool {
  records.iter().any(|record| &record.change == expected)
}
