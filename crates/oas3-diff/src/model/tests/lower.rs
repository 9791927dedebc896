use serde_json::json;

use super::{lower_json, lower_ok};
use crate::model::{HttpMethod, ParameterLocation, ParameterOrRef, Reference, ScalarKind, Schema, SchemaKind};

fn spec_with_paths(paths: serde_json::Value) -> serde_json::Value {
  json!({
    "openapi": "3.1.0",
    "info": { "title": "Test", "version": "1.0.0" },
    "paths": paths,
  })
}

#[test]
fn path_level_parameters_merge_after_operation_parameters() {
  let document = lower_ok(spec_with_paths(json!({
    "/items/{id}": {
      "parameters": [
        { "name": "id", "in": "path", "required": true, "schema": { "type": "string" } },
        { "name": "trace", "in": "header", "schema": { "type": "string" } }
      ],
      "get": {
        "parameters": [
          { "name": "id", "in": "path", "required": true, "schema": { "type": "integer" } }
        ],
        "responses": {}
      }
    }
  })));

  let operation = document
    .route("/items/{id}")
    .and_then(|route| route.operation(HttpMethod::Get))
    .expect("GET /items/{id} should be lowered");

  let names = operation
    .parameters
    .iter()
    .map(|slot| match slot {
      ParameterOrRef::Inline(parameter) => parameter.name.as_str(),
      ParameterOrRef::Ref(reference) => reference.path(),
    })
    .collect::<Vec<_>>();
  assert_eq!(names, vec!["id", "trace"]);

  let ParameterOrRef::Inline(id) = &operation.parameters[0] else {
    panic!("id should be inline");
  };
  assert_eq!(id.location, ParameterLocation::Path);
  assert_eq!(id.schema.as_ref().and_then(Schema::kind), Some(SchemaKind::Integer));
}

#[test]
fn parameter_references_stay_unresolved() {
  let mut spec = spec_with_paths(json!({
    "/items": {
      "get": {
        "parameters": [{ "$ref": "#/components/parameters/Missing" }],
        "responses": {}
      }
    }
  }));
  spec["components"] = json!({
    "parameters": {
      "Limit": { "name": "limit", "in": "query", "schema": { "type": "integer" } }
    }
  });
  let document = lower_ok(spec);

  let operation = document
    .route("/items")
    .and_then(|route| route.operation(HttpMethod::Get))
    .expect("GET /items should be lowered");
  assert_eq!(
    operation.parameters,
    vec![ParameterOrRef::Ref(Reference::parameter("Missing"))]
  );

  let limit = document
    .components
    .parameters
    .get("Limit")
    .expect("component parameter should be lowered");
  assert_eq!(limit.name, "limit");
  assert!(!limit.is_required());
}

#[test]
fn schema_shapes_are_lowered_by_declared_type() {
  let mut spec = spec_with_paths(json!({}));
  spec["components"] = json!({
    "schemas": {
      "Implicit": { "properties": { "id": { "type": "string" } } },
      "Nullable": { "type": ["integer", "null"] },
      "Mixed": { "type": ["integer", "string"] },
      "Composed": { "oneOf": [{ "type": "string" }, { "type": "integer" }] },
      "Alias": { "$ref": "#/components/schemas/Implicit" },
      "Status": { "type": "string", "enum": ["OPEN", "CLOSED"] },
      "Tags": { "type": "array", "items": { "type": "string" } }
    }
  });
  let document = lower_ok(spec);
  let schemas = &document.components.schemas;

  let implicit = schemas["Implicit"].as_object().expect("properties imply an object");
  assert!(implicit.properties.contains_key("id"));
  assert_eq!(schemas["Nullable"].kind(), Some(SchemaKind::Integer));
  assert_eq!(schemas["Mixed"], Schema::Untyped);
  assert_eq!(schemas["Composed"], Schema::Untyped);
  assert_eq!(schemas["Alias"], Schema::reference("#/components/schemas/Implicit"));
  assert_eq!(
    schemas["Status"].enum_values().map(|values| values.iter().cloned().collect::<Vec<_>>()),
    Some(vec!["OPEN".to_string(), "CLOSED".to_string()])
  );
  assert_eq!(
    schemas["Tags"].array_items(),
    Some(&Schema::scalar(ScalarKind::String))
  );
}

#[test]
fn non_string_enum_values_keep_their_json_text() {
  let mut spec = spec_with_paths(json!({}));
  spec["components"] = json!({
    "schemas": {
      "Priority": { "type": "integer", "enum": [1, 2, 3] }
    }
  });
  let document = lower_ok(spec);

  let values = document.components.schemas["Priority"]
    .enum_values()
    .expect("enum should be kept")
    .iter()
    .cloned()
    .collect::<Vec<_>>();
  assert_eq!(values, vec!["1", "2", "3"]);
}

#[test]
fn request_body_and_response_references_are_resolved() {
  let mut spec = spec_with_paths(json!({
    "/orders": {
      "post": {
        "requestBody": { "$ref": "#/components/requestBodies/NewOrder" },
        "responses": {
          "201": { "$ref": "#/components/responses/Created" },
          "204": { "description": "No content" }
        }
      }
    }
  }));
  spec["components"] = json!({
    "requestBodies": {
      "NewOrder": {
        "content": {
          "application/json": { "schema": { "$ref": "#/components/schemas/Order" } }
        }
      }
    },
    "responses": {
      "Created": {
        "description": "Created",
        "content": {
          "application/json": { "schema": { "$ref": "#/components/schemas/Order" } }
        }
      }
    },
    "schemas": {
      "Order": { "type": "object", "properties": { "id": { "type": "string" } } }
    }
  });
  let document = lower_ok(spec);

  let operation = document
    .route("/orders")
    .and_then(|route| route.operation(HttpMethod::Post))
    .expect("POST /orders should be lowered");

  let body = operation.request_body.as_ref().expect("request body should resolve");
  assert_eq!(
    body.get("application/json"),
    Some(&Some(Schema::reference("#/components/schemas/Order")))
  );
  assert!(operation.responses["201"].contains_key("application/json"));
  assert!(operation.responses["204"].is_empty());
}

#[test]
fn unresolvable_response_reference_is_a_parse_error() {
  let error = lower_json(spec_with_paths(json!({
    "/orders": {
      "get": {
        "responses": {
          "200": { "$ref": "#/components/responses/Nowhere" }
        }
      }
    }
  })))
  .expect_err("a dangling response reference should fail lowering");

  assert_eq!(error.diagnostics.len(), 1);
  assert!(
    error.diagnostics[0].starts_with("GET /orders: response 200"),
    "unexpected diagnostic: {}",
    error.diagnostics[0]
  );
}
