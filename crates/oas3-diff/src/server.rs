//! HTTP surface: `POST /compare` (also served as `/open-api-spec/compare`).

use std::future::Future;

use axum::{
  Json, Router,
  extract::State,
  http::StatusCode,
  response::{IntoResponse, Response},
  routing::post,
};
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;

use crate::{
  comparator::{ComparisonReport, compare},
  utils::{LoadError, load_document},
};

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompareRequest {
  #[serde(alias = "sourcePath")]
  pub source_location: String,
  #[serde(alias = "targetPath")]
  pub target_location: String,
}

/// Hooks for observing requests handled by the router.
pub trait CompareObserver: Send + Sync {
  fn compared(&self, _request: &CompareRequest, _report: &ComparisonReport) {}

  fn rejected(&self, _request: &CompareRequest, _error: &LoadError) {}
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl CompareObserver for NoopObserver {}

#[derive(Debug, Serialize)]
struct ErrorBody {
  errors: Vec<String>,
}

/// A load failure mapped onto a status code: 422 for contracts that do not
/// parse, 400 for locations that cannot be read.
#[derive(Debug)]
pub struct ApiError(pub LoadError);

impl From<LoadError> for ApiError {
  fn from(value: LoadError) -> Self {
    Self(value)
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let status = if self.0.is_parse() {
      StatusCode::UNPROCESSABLE_ENTITY
    } else {
      StatusCode::BAD_REQUEST
    };
    let body = ErrorBody {
      errors: self.0.diagnostics(),
    };
    (status, Json(body)).into_response()
  }
}

pub async fn compare_specs<S>(
  State(observer): State<S>,
  Json(request): Json<CompareRequest>,
) -> Result<Json<ComparisonReport>, ApiError>
where
  S: CompareObserver + Clone + Send + Sync + 'static,
{
  let loaded = tokio::try_join!(
    load_document(&request.source_location),
    load_document(&request.target_location)
  );

  match loaded {
    Ok((source, target)) => {
      let report = compare(&source, &target);
      observer.compared(&request, &report);
      Ok(Json(report))
    }
    Err(error) => {
      observer.rejected(&request, &error);
      Err(error.into())
    }
  }
}

pub fn router<S>(observer: S) -> Router
where
  S: CompareObserver + Clone + Send + Sync + 'static,
{
  Router::new()
    .route("/compare", post(compare_specs::<S>))
    .route("/open-api-spec/compare", post(compare_specs::<S>))
    .with_state(observer)
}

/// Serves [`router`] on `listener` until `shutdown` resolves.
pub async fn serve<S>(
  listener: TcpListener,
  observer: S,
  shutdown: impl Future<Output = ()> + Send + 'static,
) -> std::io::Result<()>
where
  S: CompareObserver + Clone + Send + Sync + 'static,
{
  axum::serve(listener, router(observer))
    .with_graceful_shutdown(shutdown)
    .await
}

#[cfg(test)]
mod tests {
  use std::io::Write;

  use axum::{Json, body::to_bytes, extract::State, http::StatusCode, response::IntoResponse};
  use serde_json::{Value, json};

  use super::{CompareRequest, NoopObserver, compare_specs};

  fn spec_file(required: bool) -> tempfile::NamedTempFile {
    let spec = json!({
      "openapi": "3.1.0",
      "info": { "title": "Offers", "version": "1.0.0" },
      "paths": {
        "/offers": {
          "get": {
            "parameters": [
              { "name": "tenantId", "in": "query", "required": required, "schema": { "type": "string" } }
            ],
            "responses": { "200": { "description": "ok" } }
          }
        }
      }
    });
    let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
    file.write_all(spec.to_string().as_bytes()).unwrap();
    file
  }

  async fn respond(request: Value) -> (StatusCode, Value) {
    let request = serde_json::from_value::<CompareRequest>(request).unwrap();
    let response = compare_specs(State(NoopObserver), Json(request)).await.into_response();
    let status = response.status();
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&body).unwrap())
  }

  #[test]
  fn legacy_field_names_are_accepted() {
    let request = serde_json::from_value::<CompareRequest>(json!({
      "sourcePath": "a.json",
      "targetPath": "b.json"
    }))
    .unwrap();

    assert_eq!(request.source_location, "a.json");
    assert_eq!(request.target_location, "b.json");
  }

  #[tokio::test]
  async fn comparison_returns_the_nested_report() {
    let source = spec_file(true);
    let target = spec_file(false);

    let (status, body) = respond(json!({
      "sourceLocation": source.path(),
      "targetLocation": target.path()
    }))
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
      body["routes"][0]["get"]["majorChanges"],
      json!(["Parameters marked as not required in target: [tenantId]"])
    );
  }

  #[tokio::test]
  async fn unparseable_contracts_are_unprocessable() {
    let source = spec_file(true);
    let mut broken = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
    broken.write_all(b"{\"openapi\": 3}").unwrap();

    let (status, body) = respond(json!({
      "sourceLocation": source.path(),
      "targetLocation": broken.path()
    }))
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["errors"].as_array().map(Vec::len), Some(1));
  }

  #[tokio::test]
  async fn unreadable_locations_are_bad_requests() {
    let source = spec_file(true);

    let (status, body) = respond(json!({
      "sourceLocation": source.path(),
      "targetLocation": "/definitely/not/here.json"
    }))
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["errors"][0].as_str().unwrap().contains("/definitely/not/here.json"));
  }
}
