//! Code generation for REST tools.
//!
//! Transforms OpenAPI 3.x and Swagger 2.0 documents into standalone
//! JavaScript tool functions, one per HTTP operation, using Handlebars
//! templates.
//!
//! The pipeline is:
//! 1. [`normalize`] flattens a document into [`Operation`]s
//! 2. [`naming`] derives tool names and keeps them unique per service
//! 3. [`FunctionRenderer`] renders each operation into a function body
//! 4. [`GenerationDriver`] runs the above across a catalog and builds the
//!    manifests and summary, which [`output::export_generated`] writes out

#![deny(unsafe_code)]
#![warn(missing_docs, missing_debug_implementations)]

pub mod driver;
pub mod naming;
pub mod normalize;
pub mod output;
pub mod render;
pub mod template_engine;
mod types;

pub use driver::{GenerationDriver, GenerationReport, SkipReason, SkippedService};
pub use normalize::normalize;
pub use render::FunctionRenderer;
pub use types::{
    GeneratedCode, GeneratedFile, GenerationSummary, ManifestEntry, Operation, Parameter,
    RenderedTool, ServiceSummary,
};
