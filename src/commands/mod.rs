//! # CLI Command Implementations
//!
//! One module per subcommand of the `manifest-union` tool. Each holds an
//! `Args` struct derived with `clap` and an `execute` function that calls
//! into the `manifest_union` library.

pub mod classify;
pub mod completions;
pub mod generate;
pub mod revisions;
pub mod validate;
