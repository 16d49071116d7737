//! restgen CLI library.
//!
//! Argument definitions, command implementations and output formatters of
//! the `restgen` binary, exposed as a library so they can be tested.

#![allow(clippy::missing_errors_doc)]
#![allow(clippy::unused_async)]

pub mod cli;
pub mod commands;
pub mod formatters;

pub use cli::{Cli, Commands, GlobalArgs};
