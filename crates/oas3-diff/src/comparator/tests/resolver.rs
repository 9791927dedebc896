use super::{object, string, with_schemas};
use crate::{
  comparator::resolver::{ReferenceResolutionError, lookup_schema, resolve_parameter, resolve_schema},
  model::{Document, ParameterOrRef, Reference, Schema},
};

#[test]
fn schema_lookup_is_one_step() {
  let document = with_schemas(&[
    ("Alias", Schema::reference("#/components/schemas/Offer")),
    ("Offer", object(&[("id", string())], &[])),
  ]);

  let resolved = resolve_schema(&Reference::schema("Alias"), &document).expect("alias should resolve");

  assert_eq!(resolved, &Schema::reference("#/components/schemas/Offer"));
  assert!(lookup_schema("Offer", &document).is_some_and(|schema| schema.as_object().is_some()));
}

#[test]
fn missing_schema_names_the_component() {
  let document = Document::default();

  let error = resolve_schema(&Reference::schema("Gone"), &document).expect_err("nothing to resolve");

  assert_eq!(
    error,
    ReferenceResolutionError::Missing {
      reference: Reference::schema("Gone"),
      name: "Gone".into(),
    }
  );
}

#[test]
fn external_references_are_not_followed() {
  let document = Document::default();
  let external = Reference::new("common.yaml#/components/schemas/Money");

  let error = resolve_schema(&external, &document).expect_err("external refs stay unresolved");

  assert!(matches!(error, ReferenceResolutionError::NotLocal { .. }));
  assert_eq!(error.reference(), &external);
}

#[test]
fn schema_reference_is_not_a_parameter_reference() {
  let document = with_schemas(&[("Limit", string())]);
  let slot = ParameterOrRef::Ref(Reference::schema("Limit"));

  let error = resolve_parameter(&slot, &document).expect_err("wrong component table");

  assert!(matches!(error, ReferenceResolutionError::NotLocal { .. }));
}
