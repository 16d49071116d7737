//! Command implementations for the restgen CLI.
//!
//! One module per pipeline stage plus shell completions. Each command loads
//! the pipeline configuration, runs its stage and prints a result in the
//! requested output format.

pub mod common;
pub mod completions;
pub mod download;
pub mod generate;
pub mod index;
pub mod publish;
