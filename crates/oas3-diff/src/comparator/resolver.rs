//! Lookups of `$ref`s against the component tables of a single document.
//!
//! References never cross documents: a source-side reference is looked up in
//! the source, a target-side one in the target.

use thiserror::Error;

use crate::model::{Document, Parameter, ParameterOrRef, Reference, Schema};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReferenceResolutionError {
  #[error("reference '{reference}' does not point into this document's components")]
  NotLocal { reference: Reference },
  #[error("component '{name}' referenced by '{reference}' does not exist")]
  Missing { reference: Reference, name: String },
}

impl ReferenceResolutionError {
  #[must_use]
  pub fn reference(&self) -> &Reference {
    match self {
      Self::NotLocal { reference } | Self::Missing { reference, .. } => reference,
    }
  }
}

/// A parameter slot after lookup, remembering the reference it came through.
#[derive(Debug, Clone, Copy)]
pub struct ResolvedParameter<'a> {
  pub parameter: &'a Parameter,
  pub reference: Option<&'a Reference>,
}

pub fn resolve_parameter<'a>(
  slot: &'a ParameterOrRef,
  document: &'a Document,
) -> Result<ResolvedParameter<'a>, ReferenceResolutionError> {
  match slot {
    ParameterOrRef::Inline(parameter) => Ok(ResolvedParameter {
      parameter,
      reference: None,
    }),
    ParameterOrRef::Ref(reference) => {
      let name = reference
        .parameter_name()
        .ok_or_else(|| ReferenceResolutionError::NotLocal {
          reference: reference.clone(),
        })?;
      let parameter = document
        .components
        .parameters
        .get(name)
        .ok_or_else(|| ReferenceResolutionError::Missing {
          reference: reference.clone(),
          name: name.to_string(),
        })?;
      Ok(ResolvedParameter {
        parameter,
        reference: Some(reference),
      })
    }
  }
}

/// One lookup step. The result may itself be a [`Schema::Reference`].
pub fn resolve_schema<'a>(reference: &Reference, document: &'a Document) -> Result<&'a Schema, ReferenceResolutionError> {
  let name = reference
    .schema_name()
    .ok_or_else(|| ReferenceResolutionError::NotLocal {
      reference: reference.clone(),
    })?;
  lookup_schema(name, document).ok_or_else(|| ReferenceResolutionError::Missing {
    reference: reference.clone(),
    name: name.to_string(),
  })
}

#[must_use]
pub fn lookup_schema<'a>(name: &str, document: &'a Document) -> Option<&'a Schema> {
  document.components.schemas.get(name)
}
