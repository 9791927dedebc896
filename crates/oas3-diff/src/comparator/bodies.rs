use super::{
  changes::{Change, Findings, Scope},
  schemas::SchemaComparator,
};
use crate::model::{ContentMap, Schema};

/// Compares request body or response content keyed by media type.
///
/// `scope_for` builds the scope each media type's findings are filed under.
pub(crate) fn compare_content(
  schemas: &mut SchemaComparator<'_>,
  source: &ContentMap,
  target: &ContentMap,
  scope_for: impl Fn(&str) -> Scope,
  findings: &mut Findings<'_>,
) {
  for content_type in target.keys().filter(|content_type| !source.contains_key(*content_type)) {
    findings.scoped(scope_for(content_type)).major(Change::Added);
  }

  for content_type in source.keys().filter(|content_type| !target.contains_key(*content_type)) {
    findings.scoped(scope_for(content_type)).major(Change::Removed);
  }

  for (content_type, source_schema) in source {
    if let Some(target_schema) = target.get(content_type) {
      compare_media(
        schemas,
        source_schema.as_ref(),
        target_schema.as_ref(),
        &mut findings.scoped(scope_for(content_type)),
      );
    }
  }
}

fn compare_media(
  schemas: &mut SchemaComparator<'_>,
  source: Option<&Schema>,
  target: Option<&Schema>,
  findings: &mut Findings<'_>,
) {
  match (source, target) {
    (None, None) => {}
    (Some(Schema::Reference(source_ref)), Some(Schema::Reference(target_ref))) if source_ref == target_ref => {
      // Identical refs outside the local schema table cannot be followed.
      if let Some(name) = source_ref.schema_name() {
        schemas.compare_named(name, name, findings);
      }
    }
    (Some(source), Some(target)) if source.as_reference().is_none() && target.as_reference().is_none() => {
      schemas.compare_inline("body", source, target, findings);
    }
    _ => findings.major(Change::ContentChanged),
  }
}
