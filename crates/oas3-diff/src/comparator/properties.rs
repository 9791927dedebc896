use super::changes::{Change, EnumDelta, Findings, Shape, TypeName};
use crate::model::Schema;

/// Compares two property (or parameter) schemas by shape: declared type,
/// `$ref` target and enum values. Arrays on both sides are compared one level
/// into their items.
///
/// Every finding here is Major.
pub(crate) fn compare_property(subject: &str, source: &Schema, target: &Schema, findings: &mut Findings<'_>) {
  compare_shape(subject, source, target, findings);

  if let (Some(source_items), Some(target_items)) = (source.array_items(), target.array_items()) {
    compare_shape(&format!("{subject}[]"), source_items, target_items, &mut findings.at("[]"));
  }
}

fn compare_shape(subject: &str, source: &Schema, target: &Schema, findings: &mut Findings<'_>) {
  match (source.kind(), target.kind()) {
    (Some(source_kind), Some(target_kind)) => {
      if source_kind != target_kind {
        findings.major(Change::TypeChanged {
          subject: subject.to_string(),
          source: TypeName(Some(source_kind)),
          target: TypeName(Some(target_kind)),
        });
      }
    }
    (None, None) => {
      if let (Some(source_ref), Some(target_ref)) = (source.as_reference(), target.as_reference())
        && source_ref != target_ref
      {
        findings.major(Change::RefChanged {
          subject: subject.to_string(),
          source: source_ref.clone(),
          target: target_ref.clone(),
        });
      }
    }
    (Some(source_kind), None) => match target.as_reference() {
      Some(target_ref) => findings.major(Change::TypeReplacedByRef {
        subject: subject.to_string(),
        source: Shape::Type(source_kind),
        target: Shape::Ref(target_ref.clone()),
      }),
      None => findings.major(Change::TypeChanged {
        subject: subject.to_string(),
        source: TypeName(Some(source_kind)),
        target: TypeName(None),
      }),
    },
    (None, Some(target_kind)) => match source.as_reference() {
      Some(source_ref) => findings.major(Change::TypeReplacedByRef {
        subject: subject.to_string(),
        source: Shape::Ref(source_ref.clone()),
        target: Shape::Type(target_kind),
      }),
      None => findings.major(Change::TypeChanged {
        subject: subject.to_string(),
        source: TypeName(None),
        target: TypeName(Some(target_kind)),
      }),
    },
  }

  if let (Some(source_values), Some(target_values)) = (source.enum_values(), target.enum_values()) {
    let delta = EnumDelta {
      added: target_values.difference(source_values).cloned().collect(),
      removed: source_values.difference(target_values).cloned().collect(),
    };
    if !delta.added.is_empty() || !delta.removed.is_empty() {
      findings.major(Change::EnumChanged {
        subject: subject.to_string(),
        delta,
      });
    }
  }
}
