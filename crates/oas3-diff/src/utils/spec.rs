use std::{ffi::OsStr, path::Path};

use fmmap::tokio::{AsyncMmapFile, AsyncMmapFileExt};
use oas3::OpenApiV3Spec;
use thiserror::Error;

use crate::model::{Document, ParseError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SpecFormat {
  #[default]
  Json,
  Yaml,
}

impl SpecFormat {
  #[must_use]
  pub fn from_extension(ext: &str) -> Option<Self> {
    match ext {
      "yaml" | "yml" => Some(Self::Yaml),
      "json" => Some(Self::Json),
      _ => None,
    }
  }

  /// JSON documents start with `{`; anything else is read as YAML.
  #[must_use]
  pub fn sniff(bytes: &[u8]) -> Self {
    match bytes.iter().find(|byte| !byte.is_ascii_whitespace()) {
      Some(b'{') => Self::Json,
      Some(_) => Self::Yaml,
      None => Self::default(),
    }
  }
}

/// Where a contract is read from: a local path or an `http(s)` URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpecLocation<'a> {
  Path(&'a Path),
  Url(&'a str),
}

impl<'a> SpecLocation<'a> {
  #[must_use]
  pub fn parse(location: &'a str) -> Self {
    if location.starts_with("http://") || location.starts_with("https://") {
      Self::Url(location)
    } else {
      Self::Path(Path::new(location))
    }
  }

  fn extension(&self) -> Option<&'a str> {
    match self {
      Self::Path(path) => path.extension().and_then(OsStr::to_str),
      Self::Url(url) => {
        let path = url.split(['?', '#']).next().unwrap_or(url);
        path.rsplit_once('/').map_or(path, |(_, last)| last).rsplit_once('.').map(|(_, ext)| ext)
      }
    }
  }
}

#[derive(Debug, Error)]
pub enum LoadError {
  #[error("failed to read '{location}': {message}")]
  Io { location: String, message: String },
  #[error("failed to fetch '{location}': {source}")]
  Fetch {
    location: String,
    #[source]
    source: reqwest::Error,
  },
  #[error("'{location}': {source}")]
  Parse {
    location: String,
    #[source]
    source: ParseError,
  },
}

impl LoadError {
  /// Human-readable problems, one per entry.
  #[must_use]
  pub fn diagnostics(&self) -> Vec<String> {
    match self {
      Self::Parse { location, source } => source
        .diagnostics
        .iter()
        .map(|diagnostic| format!("{location}: {diagnostic}"))
        .collect(),
      Self::Io { .. } | Self::Fetch { .. } => vec![self.to_string()],
    }
  }

  #[must_use]
  pub fn is_parse(&self) -> bool {
    matches!(self, Self::Parse { .. })
  }
}

enum SpecContents {
  Mapped(AsyncMmapFile),
  Fetched(Vec<u8>),
}

impl SpecContents {
  fn as_slice(&self) -> &[u8] {
    match self {
      Self::Mapped(file) => file.as_slice(),
      Self::Fetched(bytes) => bytes,
    }
  }
}

pub struct SpecLoader {
  contents: SpecContents,
  format: SpecFormat,
  origin: String,
}

impl SpecLoader {
  pub async fn open(path: &Path) -> Result<Self, LoadError> {
    let origin = path.display().to_string();
    let file = AsyncMmapFile::open(path).await.map_err(|error| LoadError::Io {
      location: origin.clone(),
      message: error.to_string(),
    })?;
    let contents = SpecContents::Mapped(file);
    let format = SpecLocation::Path(path)
      .extension()
      .and_then(SpecFormat::from_extension)
      .unwrap_or_else(|| SpecFormat::sniff(contents.as_slice()));

    Ok(Self {
      contents,
      format,
      origin,
    })
  }

  pub async fn fetch(url: &str) -> Result<Self, LoadError> {
    let fetch_error = |source| LoadError::Fetch {
      location: url.to_string(),
      source,
    };
    let response = reqwest::get(url)
      .await
      .and_then(reqwest::Response::error_for_status)
      .map_err(fetch_error)?;
    let bytes = response.bytes().await.map_err(fetch_error)?.to_vec();
    let format = SpecLocation::Url(url)
      .extension()
      .and_then(SpecFormat::from_extension)
      .unwrap_or_else(|| SpecFormat::sniff(&bytes));

    Ok(Self {
      contents: SpecContents::Fetched(bytes),
      format,
      origin: url.to_string(),
    })
  }

  pub async fn from_location(location: &str) -> Result<Self, LoadError> {
    match SpecLocation::parse(location) {
      SpecLocation::Path(path) => Self::open(path).await,
      SpecLocation::Url(url) => Self::fetch(url).await,
    }
  }

  #[must_use]
  pub fn format(&self) -> SpecFormat {
    self.format
  }

  pub fn parse(&self) -> Result<oas3::Spec, ParseError> {
    let bytes = self.contents.as_slice();
    match self.format {
      SpecFormat::Json => {
        let deserializer = &mut serde_json::Deserializer::from_slice(bytes);
        serde_path_to_error::deserialize::<_, OpenApiV3Spec>(deserializer)
          .map_err(|error| ParseError::single(format!("at {}: {}", error.path(), error.inner())))
      }
      SpecFormat::Yaml => {
        let content = std::str::from_utf8(bytes).map_err(|error| ParseError::single(error.to_string()))?;
        oas3::from_yaml(content).map_err(|error| ParseError::single(error.to_string()))
      }
    }
  }

  pub fn document(&self) -> Result<Document, LoadError> {
    self
      .parse()
      .and_then(|spec| Document::from_spec(&spec))
      .map_err(|source| LoadError::Parse {
        location: self.origin.clone(),
        source,
      })
  }
}

/// Reads, parses and lowers the contract at `location`.
pub async fn load_document(location: &str) -> Result<Document, LoadError> {
  SpecLoader::from_location(location).await?.document()
}
