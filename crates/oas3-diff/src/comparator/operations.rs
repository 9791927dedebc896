use std::collections::BTreeMap;

use super::{
  DocumentPair,
  bodies::compare_content,
  changes::{Change, ChangeRecord, Findings, Scope},
  parameters::compare_parameters,
  schemas::SchemaComparator,
};
use crate::model::{ContentMap, HttpMethod, Operation};

/// Compares one method slot of a route present in both documents.
pub(crate) struct OperationComparator<'a> {
  documents: DocumentPair<'a>,
  schemas: SchemaComparator<'a>,
}

impl<'a> OperationComparator<'a> {
  pub(crate) fn new(documents: DocumentPair<'a>) -> Self {
    Self {
      documents,
      schemas: SchemaComparator::new(documents),
    }
  }

  pub(crate) fn compare(
    &mut self,
    route: &str,
    method: HttpMethod,
    source: Option<&Operation>,
    target: Option<&Operation>,
    records: &mut Vec<ChangeRecord>,
  ) {
    let mut findings = Findings::new(
      Scope::Operation {
        route: route.to_string(),
        method,
      },
      records,
    );

    match (source, target) {
      (None, None) => {}
      (None, Some(_)) => findings.major(Change::OperationAdded { method }),
      (Some(_), None) => findings.major(Change::OperationRemoved { method }),
      (Some(source), Some(target)) => {
        compare_parameters(self.documents, &source.parameters, &target.parameters, &mut findings);
        self.compare_request_bodies(route, method, source, target, &mut findings);
        self.compare_responses(route, method, &source.responses, &target.responses, &mut findings);
      }
    }
  }

  fn compare_request_bodies(
    &mut self,
    route: &str,
    method: HttpMethod,
    source: &Operation,
    target: &Operation,
    findings: &mut Findings<'_>,
  ) {
    match (&source.request_body, &target.request_body) {
      (None, None) => {}
      (None, Some(_)) => findings.major(Change::RequestBodyAdded),
      (Some(_), None) => findings.major(Change::RequestBodyRemoved),
      (Some(source_body), Some(target_body)) => compare_content(
        &mut self.schemas,
        source_body,
        target_body,
        |content_type| Scope::RequestBody {
          route: route.to_string(),
          method,
          content_type: content_type.to_string(),
        },
        findings,
      ),
    }
  }

  fn compare_responses(
    &mut self,
    route: &str,
    method: HttpMethod,
    source: &BTreeMap<String, ContentMap>,
    target: &BTreeMap<String, ContentMap>,
    findings: &mut Findings<'_>,
  ) {
    match (source.is_empty(), target.is_empty()) {
      (true, true) => {}
      (true, false) => {
        for (status, content) in target {
          announce(route, method, status, content, Change::ResponseAdded, findings, || {
            Change::ResponseStatusAdded { status: status.clone() }
          });
        }
      }
      (false, true) => {
        for (status, content) in source {
          announce(route, method, status, content, Change::ResponseRemoved, findings, || {
            Change::ResponseStatusRemoved { status: status.clone() }
          });
        }
      }
      (false, false) => {
        for (status, content) in target.iter().filter(|(status, _)| !source.contains_key(*status)) {
          announce(route, method, status, content, Change::Added, findings, || {
            Change::ResponseStatusAdded { status: status.clone() }
          });
        }
        for (status, content) in source.iter().filter(|(status, _)| !target.contains_key(*status)) {
          announce(route, method, status, content, Change::Removed, findings, || {
            Change::ResponseStatusRemoved { status: status.clone() }
          });
        }
        for (status, source_content) in source {
          if let Some(target_content) = target.get(status) {
            compare_content(
              &mut self.schemas,
              source_content,
              target_content,
              |content_type| response_scope(route, method, status, content_type),
              findings,
            );
          }
        }
      }
    }
  }
}

/// Files one Major finding per media type of a status code that exists on one
/// side only. A status code without content is reported at operation level.
fn announce(
  route: &str,
  method: HttpMethod,
  status: &str,
  content: &ContentMap,
  per_media_type: Change,
  findings: &mut Findings<'_>,
  without_content: impl FnOnce() -> Change,
) {
  if content.is_empty() {
    findings.major(without_content());
    return;
  }

  for content_type in content.keys() {
    findings
      .scoped(response_scope(route, method, status, content_type))
      .major(per_media_type.clone());
  }
}

fn response_scope(route: &str, method: HttpMethod, status: &str, content_type: &str) -> Scope {
  Scope::Response {
    route: route.to_string(),
    method,
    status: status.to_string(),
    content_type: content_type.to_string(),
  }
}
