use indexmap::{IndexMap, IndexSet};

use super::{
  DocumentPair,
  changes::{Change, Findings, NameList, RequiredSubject, Side},
  properties::compare_property,
  resolver::resolve_parameter,
  schemas::compare_required,
};
use crate::model::{Document, Parameter, ParameterOrRef, Schema};

static UNTYPED: Schema = Schema::Untyped;

/// Compares two operation parameter lists matched by exact name.
///
/// Every finding is Major. A slot whose `$ref` cannot be resolved yields one
/// finding for that slot and the rest of the list is still compared.
pub(crate) fn compare_parameters(
  documents: DocumentPair<'_>,
  source: &[ParameterOrRef],
  target: &[ParameterOrRef],
  findings: &mut Findings<'_>,
) {
  let source = resolve_all(source, documents.source, Side::Source, findings);
  let target = resolve_all(target, documents.target, Side::Target, findings);

  let added = NameList::from_names(target.keys().filter(|name| !source.contains_key(*name)).copied());
  if !added.is_empty() {
    findings.major(Change::ParametersAdded { names: added });
  }

  let removed = NameList::from_names(source.keys().filter(|name| !target.contains_key(*name)).copied());
  if !removed.is_empty() {
    findings.major(Change::ParametersRemoved { names: removed });
  }

  compare_required(
    RequiredSubject::Parameters,
    &required_names(&source),
    &required_names(&target),
    findings,
  );

  for (name, source_parameter) in &source {
    let Some(target_parameter) = target.get(name) else {
      continue;
    };
    let mut findings = findings.at(name);

    compare_property(
      name,
      source_parameter.schema.as_ref().unwrap_or(&UNTYPED),
      target_parameter.schema.as_ref().unwrap_or(&UNTYPED),
      &mut findings,
    );

    if source_parameter.location != target_parameter.location {
      findings.major(Change::ParameterLocationChanged {
        name: (*name).to_string(),
        source: source_parameter.location,
        target: target_parameter.location,
      });
    }
  }
}

/// First occurrence of a name wins.
fn resolve_all<'d>(
  slots: &'d [ParameterOrRef],
  document: &'d Document,
  side: Side,
  findings: &mut Findings<'_>,
) -> IndexMap<&'d str, &'d Parameter> {
  let mut resolved = IndexMap::with_capacity(slots.len());
  for slot in slots {
    match resolve_parameter(slot, document) {
      Ok(resolved_parameter) => {
        let parameter = resolved_parameter.parameter;
        resolved.entry(parameter.name.as_str()).or_insert(parameter);
      }
      Err(error) => findings.major(Change::ParameterUnresolved {
        reference: error.reference().clone(),
        side,
      }),
    }
  }
  resolved
}

fn required_names<'d>(parameters: &IndexMap<&'d str, &'d Parameter>) -> IndexSet<&'d str> {
  parameters
    .iter()
    .filter(|(_, parameter)| parameter.is_required())
    .map(|(name, _)| *name)
    .collect()
}
