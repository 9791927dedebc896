//! Breaking-change detection between two OpenAPI v3 contracts.
//!
//! Load both sides into [`model::Document`]s, then run
//! [`comparator::Comparison::run`] (or the [`compare`] shortcut) to get every
//! difference classified as Major or Minor.

#![allow(clippy::doc_markdown)]
#![allow(clippy::missing_errors_doc)]

pub mod comparator;
pub mod model;
pub mod server;
pub mod utils;

pub use comparator::{Comparison, ComparisonReport, FlatReport, compare};
pub use model::Document;
pub use utils::{LoadError, load_document};
