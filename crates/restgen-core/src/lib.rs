//! Core types, configuration and errors for the restgen pipeline.
//!
//! This crate provides the foundational types shared by every stage of the
//! pipeline: the service catalog, the code generator, the schema downloader
//! and the registry publisher.
//!
//! # Architecture
//!
//! The core consists of:
//! - Strong domain types (`ServiceName`, `ToolName`, `HttpMethod`, `ParamType`)
//! - The `Service` record produced by the catalog step
//! - Error hierarchy with contextual information
//! - The `SchemaSource` trait the generator reads documents through
//! - Pipeline configuration (`PipelineConfig`, `RuntimeBindings`)

#![deny(unsafe_code)]
#![warn(missing_docs, missing_debug_implementations)]

pub mod cli;
mod config;
mod error;
mod service;
pub mod traits;
mod types;

pub use config::{DEFAULT_DIRECTORY_URL, PipelineConfig, PipelineConfigBuilder, RuntimeBindings};
pub use error::{Error, Result};
pub use service::Service;
pub use types::{HttpMethod, ParamType, ServiceName, ToolName};
