use std::io::Write;

use super::{LoadError, SpecFormat, SpecLoader, SpecLocation, load_document};
use crate::model::HttpMethod;

const MINIMAL_YAML: &str = r"
openapi: 3.1.0
info:
  title: Pets
  version: 1.0.0
paths:
  /pets:
    get:
      responses:
        '200':
          description: ok
";

fn write_temp(suffix: &str, contents: &str) -> tempfile::NamedTempFile {
  let mut file = tempfile::Builder::new()
    .suffix(suffix)
    .tempfile()
    .expect("temp file should be created");
  file.write_all(contents.as_bytes()).expect("temp file should be writable");
  file
}

#[test]
fn locations_distinguish_urls_from_paths() {
  assert!(matches!(
    SpecLocation::parse("https://example.com/openapi.yaml"),
    SpecLocation::Url(_)
  ));
  assert!(matches!(SpecLocation::parse("specs/openapi.json"), SpecLocation::Path(_)));
}

#[test]
fn format_sniffing_falls_back_to_yaml() {
  assert_eq!(SpecFormat::sniff(b"  \n{\"openapi\": \"3.1.0\"}"), SpecFormat::Json);
  assert_eq!(SpecFormat::sniff(b"openapi: 3.1.0"), SpecFormat::Yaml);
  assert_eq!(SpecFormat::from_extension("yml"), Some(SpecFormat::Yaml));
  assert_eq!(SpecFormat::from_extension("txt"), None);
}

#[tokio::test]
async fn yaml_files_load_into_documents() {
  let file = write_temp(".yaml", MINIMAL_YAML);

  let document = load_document(file.path().to_str().expect("utf-8 temp path"))
    .await
    .expect("yaml spec should load");

  assert!(
    document
      .route("/pets")
      .and_then(|route| route.operation(HttpMethod::Get))
      .is_some()
  );
}

#[tokio::test]
async fn extensionless_files_are_sniffed() {
  let file = write_temp("", MINIMAL_YAML);

  let loader = SpecLoader::open(file.path()).await.expect("file should open");

  assert_eq!(loader.format(), SpecFormat::Yaml);
  assert!(loader.document().is_ok());
}

#[tokio::test]
async fn json_errors_carry_the_deserializer_message() {
  let file = write_temp(
    ".json",
    r#"{"openapi": "3.1.0", "info": {"title": "Pets", "version": 1}, "paths": {}}"#,
  );

  let error = load_document(file.path().to_str().expect("utf-8 temp path"))
    .await
    .expect_err("a numeric version should not parse");

  assert!(error.is_parse());
  let diagnostics = error.diagnostics();
  assert_eq!(diagnostics.len(), 1);
  assert!(
    diagnostics[0].contains("invalid type"),
    "unexpected diagnostic: {}",
    diagnostics[0]
  );
}

#[tokio::test]
async fn missing_files_are_io_errors() {
  let error = load_document("/definitely/not/here/openapi.json")
    .await
    .expect_err("missing file should fail");

  assert!(matches!(error, LoadError::Io { .. }));
  assert!(!error.is_parse());
}
