use super::{
  DocumentPair,
  changes::{Change, ChangeRecord, Findings, Scope},
  operations::OperationComparator,
};
use strum::IntoEnumIterator;

use crate::model::HttpMethod;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct RouteTally {
  pub(crate) routes_compared: usize,
  pub(crate) operations_compared: usize,
}

/// Route-level added/removed findings, then every method slot of the routes
/// both documents declare.
pub(crate) fn compare_routes(documents: DocumentPair<'_>, records: &mut Vec<ChangeRecord>) -> RouteTally {
  let source = &documents.source.routes;
  let target = &documents.target.routes;
  let mut tally = RouteTally::default();

  for route in target.keys().filter(|route| !source.contains_key(*route)) {
    Findings::new(Scope::Route { route: route.clone() }, records).major(Change::Added);
  }

  for route in source.keys().filter(|route| !target.contains_key(*route)) {
    Findings::new(Scope::Route { route: route.clone() }, records).major(Change::Removed);
  }

  let mut operations = OperationComparator::new(documents);
  for (route, source_item) in source {
    let Some(target_item) = target.get(route) else {
      continue;
    };
    tally.routes_compared += 1;

    for method in HttpMethod::iter() {
      let (source_operation, target_operation) = (source_item.operation(method), target_item.operation(method));
      if source_operation.is_none() && target_operation.is_none() {
        continue;
      }
      operations.compare(route, method, source_operation, target_operation, records);
      tally.operations_compared += 1;
    }
  }

  tally
}
