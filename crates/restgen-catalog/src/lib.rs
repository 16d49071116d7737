//! Service catalog and schema acquisition.
//!
//! The first two pipeline stages:
//! - [`index`] reads and writes the service index and knows the curated list
//!   of production services
//! - [`store`] keeps one schema document per service on disk and serves them
//!   to the generator through [`SchemaSource`](restgen_core::traits::SchemaSource)
//! - [`download`] fetches missing documents sequentially, trying a fixed set
//!   of candidate URLs per service

#![deny(unsafe_code)]
#![warn(missing_docs, missing_debug_implementations)]

pub mod download;
pub mod index;
pub mod store;

pub use download::{DownloadOutcome, DownloadReport, HttpFetcher, SchemaDownloader, SchemaFetcher};
pub use index::{curated_services, load_index, save_index};
pub use store::SchemaStore;
