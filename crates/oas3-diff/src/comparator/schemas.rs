use std::collections::{BTreeMap, HashMap, HashSet};

use indexmap::IndexSet;
use itertools::Itertools;

use super::{
  DocumentPair,
  changes::{Change, ChangeRecord, Findings, NameList, RequiredSubject, Scope, Side},
  properties::compare_property,
  resolver::lookup_schema,
};
use crate::model::{ObjectSchema, Schema};

/// Compares named component schemas, following alias chains in each document.
///
/// Pairs currently being compared are remembered so a cyclic alias chain
/// terminates instead of recursing forever.
pub(crate) struct SchemaComparator<'a> {
  documents: DocumentPair<'a>,
  visiting: HashSet<(String, String)>,
}

impl<'a> SchemaComparator<'a> {
  pub(crate) fn new(documents: DocumentPair<'a>) -> Self {
    Self {
      documents,
      visiting: HashSet::new(),
    }
  }

  pub(crate) fn compare_named(&mut self, source_name: &str, target_name: &str, findings: &mut Findings<'_>) {
    let pair = (source_name.to_string(), target_name.to_string());
    if !self.visiting.insert(pair.clone()) {
      return;
    }

    match (
      lookup_schema(source_name, self.documents.source),
      lookup_schema(target_name, self.documents.target),
    ) {
      (None, _) => findings.major(Change::SchemaMissing {
        name: source_name.to_string(),
        side: Side::Source,
      }),
      (_, None) => findings.major(Change::SchemaMissing {
        name: target_name.to_string(),
        side: Side::Target,
      }),
      (Some(source), Some(target)) => self.compare_resolved(source_name, target_name, source, target, findings),
    }

    self.visiting.remove(&pair);
  }

  fn compare_resolved(
    &mut self,
    source_name: &str,
    target_name: &str,
    source: &Schema,
    target: &Schema,
    findings: &mut Findings<'_>,
  ) {
    match (source, target) {
      // Identical refs outside the local schema table cannot be followed.
      (Schema::Reference(source_alias), Schema::Reference(target_alias))
        if source_alias == target_alias && source_alias.schema_name().is_none() => {}
      (Schema::Reference(alias), _) => match alias.schema_name() {
        Some(next) => self.compare_named(next, target_name, findings),
        None => findings.major(Change::SchemaMissing {
          name: source_name.to_string(),
          side: Side::Source,
        }),
      },
      (_, Schema::Reference(alias)) => match alias.schema_name() {
        Some(next) => self.compare_named(source_name, next, findings),
        None => findings.major(Change::SchemaMissing {
          name: target_name.to_string(),
          side: Side::Target,
        }),
      },
      (Schema::Object(source), Schema::Object(target)) => compare_objects(source, target, findings),
      (Schema::Object(_), _) => findings.major(Change::SchemaMissing {
        name: target_name.to_string(),
        side: Side::Target,
      }),
      (_, Schema::Object(_)) => findings.major(Change::SchemaMissing {
        name: source_name.to_string(),
        side: Side::Source,
      }),
      _ => compare_property(source_name, source, target, findings),
    }
  }

  /// Compares two inline schemas, such as request bodies that declare their
  /// shape without a `$ref`.
  pub(crate) fn compare_inline(&mut self, subject: &str, source: &Schema, target: &Schema, findings: &mut Findings<'_>) {
    match (source, target) {
      (Schema::Object(source), Schema::Object(target)) => compare_objects(source, target, findings),
      _ => compare_property(subject, source, target, findings),
    }
  }
}

/// Property additions and removals are Minor and matched case-insensitively.
/// Case-only renames (including a new spelling next to a kept one), required-set
/// changes and changes to same-named properties are Major.
pub(crate) fn compare_objects(source: &ObjectSchema, target: &ObjectSchema, findings: &mut Findings<'_>) {
  let source_folded = fold_names(&source.properties);
  let target_folded = fold_names(&target.properties);

  let added = target
    .properties
    .keys()
    .filter(|name| !source_folded.contains_key(&name.to_lowercase()))
    .map(String::as_str);
  let added = NameList::from_names(added);
  if !added.is_empty() {
    findings.minor(Change::PropertiesAdded { names: added });
  }

  let removed = source
    .properties
    .keys()
    .filter(|name| !target_folded.contains_key(&name.to_lowercase()))
    .map(String::as_str);
  let removed = NameList::from_names(removed);
  if !removed.is_empty() {
    findings.minor(Change::PropertiesRemoved { names: removed });
  }

  // A spelling present on one side only, matching the other side when case
  // is ignored, is a rename in either direction.
  let mut renamed = IndexSet::new();
  for name in target.properties.keys() {
    if !source.properties.contains_key(name)
      && let Some(original) = source_folded.get(&name.to_lowercase())
    {
      renamed.insert((*original, name.as_str()));
    }
  }
  for name in source.properties.keys() {
    if !target.properties.contains_key(name)
      && let Some(replacement) = target_folded.get(&name.to_lowercase())
    {
      renamed.insert((name.as_str(), *replacement));
    }
  }
  for (original, replacement) in renamed {
    findings.major(Change::PropertyRenamed {
      source: original.to_string(),
      target: replacement.to_string(),
    });
  }

  let source_required = source.required.iter().map(String::as_str).collect::<IndexSet<_>>();
  let target_required = target.required.iter().map(String::as_str).collect::<IndexSet<_>>();
  compare_required(RequiredSubject::Properties, &source_required, &target_required, findings);

  for (name, source_property) in &source.properties {
    if let Some(target_property) = target.properties.get(name) {
      compare_property(name, source_property, target_property, &mut findings.at(name));
    }
  }
}

/// Emits at most two Major findings: names newly required, names no longer required.
pub(crate) fn compare_required(
  subject: RequiredSubject,
  source: &IndexSet<&str>,
  target: &IndexSet<&str>,
  findings: &mut Findings<'_>,
) {
  let added = NameList::from_names(target.difference(source).copied());
  if !added.is_empty() {
    findings.major(Change::RequiredAdded { subject, names: added });
  }

  let removed = NameList::from_names(source.difference(target).copied());
  if !removed.is_empty() {
    findings.major(Change::RequiredRemoved { subject, names: removed });
  }
}

/// Lowercased name to the first spelling declared.
fn fold_names(properties: &BTreeMap<String, Schema>) -> HashMap<String, &str> {
  let mut folded = HashMap::with_capacity(properties.len());
  for name in properties.keys() {
    folded.entry(name.to_lowercase()).or_insert(name.as_str());
  }
  folded
}

/// Compares the component schema tables: additions and removals are Major,
/// schemas present on both sides go through [`SchemaComparator::compare_named`].
/// Returns how many schema pairs were compared.
pub(crate) fn compare_component_schemas(documents: DocumentPair<'_>, records: &mut Vec<ChangeRecord>) -> usize {
  let source = &documents.source.components.schemas;
  let target = &documents.target.components.schemas;
  let mut comparator = SchemaComparator::new(documents);
  let mut compared = 0;

  for name in source.keys().merge(target.keys()).dedup() {
    let mut findings = Findings::new(Scope::Schema { name: name.clone() }, records);
    match (source.contains_key(name), target.contains_key(name)) {
      (true, true) => {
        comparator.compare_named(name, name, &mut findings);
        compared += 1;
      }
      (false, true) => findings.major(Change::Added),
      (true, false) => findings.major(Change::Removed),
      (false, false) => {}
    }
  }

  compared
}
