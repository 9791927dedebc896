#![allow(clippy::fn_params_excessive_bools)]
#![allow(clippy::struct_excessive_bools)]

pub mod compare;
pub mod serve;

pub use compare::{CompareConfig, compare_specs};
pub use serve::{ServeConfig, serve};
