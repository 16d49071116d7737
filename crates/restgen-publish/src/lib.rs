//! Registry synchronization for generated tools.
//!
//! Reads the tools produced by `restgen-codegen` back from disk and makes a
//! tool registry match them: stale generated tools are deleted, new tools are
//! created and existing ones are updated when their content changed.
//!
//! # Examples
//!
//! ```no_run
//! use restgen_publish::{LocalCatalog, Publisher, RegistryClient};
//!
//! # async fn run() -> Result<(), restgen_publish::PublishError> {
//! let catalog = LocalCatalog::scan("generated/tools")?;
//! let client = RegistryClient::new("http://localhost:3000", None)?;
//! let publisher = Publisher::new(client, "publish-state.json")
//!     .with_keep_list(["get_workers".to_string()]);
//!
//! let report = publisher.publish(&catalog).await?;
//! println!("{} created, {} updated", report.created, report.updated);
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs, missing_debug_implementations)]

pub mod checksum;
mod error;
pub mod local;
pub mod plan;
pub mod publisher;
pub mod registry;
pub mod state;

pub use error::{PublishError, Result};
pub use local::{LocalCatalog, LocalTool};
pub use plan::{PublishPlan, ToolAction};
pub use publisher::{Failure, PublishReport, Publisher};
pub use registry::{RegistryClient, RemoteTool, ToolPayload, ToolRegistry};
pub use state::{PublishAction, PublishState};
