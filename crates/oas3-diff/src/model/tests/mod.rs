mod lower;

use super::{Document, ParseError};

pub(super) fn lower_json(spec: serde_json::Value) -> Result<Document, ParseError> {
  let spec = serde_json::from_value::<oas3::Spec>(spec).expect("failed to parse test spec");
  Document::from_spec(&spec)
}

pub(super) fn lower_ok(spec: serde_json::Value) -> Document {
  lower_json(spec).expect("lowering should succeed")
}
