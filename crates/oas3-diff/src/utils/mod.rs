pub mod spec;

#[cfg(test)]
mod tests;

pub use spec::{LoadError, SpecFormat, SpecLoader, SpecLocation, load_document};
