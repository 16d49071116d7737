//! Core traits for the restgen pipeline.
//!
//! The generation driver never touches the filesystem directly to find
//! schema documents; it asks a [`SchemaSource`]. The catalog crate provides
//! the on-disk implementation, tests use in-memory maps.
//!
//! # Examples
//!
//! ```
//! use restgen_core::traits::SchemaSource;
//! use restgen_core::{Result, Service};
//! use serde_json::{Value, json};
//! use std::collections::HashMap;
//!
//! struct MemorySource {
//!     documents: HashMap<String, Value>,
//! }
//!
//! impl SchemaSource for MemorySource {
//!     fn load(&self, service: &Service) -> Result<Option<Value>> {
//!         Ok(self.documents.get(&service.key()).cloned())
//!     }
//! }
//!
//! let mut documents = HashMap::new();
//! documents.insert("wql_v1".to_string(), json!({"openapi": "3.0.0", "paths": {}}));
//! let source = MemorySource { documents };
//!
//! assert!(source.load(&Service::new("wql", "v1")).unwrap().is_some());
//! assert!(source.load(&Service::new("graph", "v1")).unwrap().is_none());
//! ```

use crate::{Result, Service};
use serde_json::Value;
use std::collections::HashMap;

/// Provides raw schema documents keyed by service.
pub trait SchemaSource {
    /// Loads the schema document for a service.
    ///
    /// Returns `Ok(None)` when no document exists for the service (the
    /// driver reports it as skipped).
    ///
    /// # Errors
    ///
    /// Returns [`Error::SchemaUnreadable`](crate::Error::SchemaUnreadable)
    /// when a document exists but cannot be read or parsed.
    fn load(&self, service: &Service) -> Result<Option<Value>>;
}

impl SchemaSource for HashMap<String, Value> {
    fn load(&self, service: &Service) -> Result<Option<Value>> {
        Ok(self.get(&service.key()).cloned())
    }
}

impl<T: SchemaSource + ?Sized> SchemaSource for &T {
    fn load(&self, service: &Service) -> Result<Option<Value>> {
        (**self).load(service)
    }
}
