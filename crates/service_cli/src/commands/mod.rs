//! CLI command implementations
//!
//! Each submodule implements a specific CLI command.

pub mod check;
pub mod import;
pub mod matrix;
pub mod pair;
pub mod summary;
