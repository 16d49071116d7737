//! Generation driver.
//!
//! Runs the normalizer, deriver and renderer over every catalogued service
//! and collects the results into one [`GeneratedCode`] set:
//!
//! - `{service}/{tool}.js` for every operation
//! - `{service}/manifest.json` per service
//! - `generation-summary.json` for the whole run
//!
//! Services whose schema is missing, unreadable or empty are skipped and
//! reported, never fatal.

use crate::naming::NameDeduplicator;
use crate::normalize::normalize;
use crate::render::FunctionRenderer;
use crate::types::{
    GeneratedCode, GeneratedFile, GenerationSummary, ManifestEntry, ServiceSummary,
};
use chrono::{DateTime, Utc};
use restgen_core::traits::SchemaSource;
use restgen_core::{Result, RuntimeBindings, Service, ServiceName};
use serde::Serialize;
use serde_json::Value;
use std::collections::HashSet;
use std::fmt;

/// Manifest file name inside each service directory.
pub const MANIFEST_FILE: &str = "manifest.json";

/// Summary file name at the root of the tools directory.
pub const SUMMARY_FILE: &str = "generation-summary.json";

/// Why a service produced no output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", rename_all = "camelCase")]
pub enum SkipReason {
    /// No schema document exists for the service
    MissingSchema,
    /// The schema document could not be read or parsed
    Unreadable {
        /// Underlying error message
        message: String,
    },
    /// The document contains no supported operations
    NoOperations,
    /// The service name cannot be used as a directory name
    UnsafeName,
    /// Another catalog entry with the same name was already generated
    DuplicateName,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingSchema => f.write_str("no schema file found"),
            Self::Unreadable { message } => write!(f, "schema unreadable: {message}"),
            Self::NoOperations => f.write_str("no operations found in schema"),
            Self::UnsafeName => f.write_str("service name is not a safe directory name"),
            Self::DuplicateName => f.write_str("service name already generated"),
        }
    }
}

/// A service the driver did not generate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedService {
    /// Service name
    pub name: ServiceName,
    /// Service version
    pub version: String,
    /// Why it was skipped
    #[serde(flatten)]
    pub reason: SkipReason,
}

/// Output of one service.
#[derive(Debug, Clone)]
pub struct ServiceArtifacts {
    /// Manifest entries in operation order
    pub manifest: Vec<ManifestEntry>,
    /// Tool sources plus the manifest file
    pub files: Vec<GeneratedFile>,
}

/// Everything a generation run produced.
#[derive(Debug, Clone)]
pub struct GenerationReport {
    /// Files to write below the tools directory
    pub code: GeneratedCode,
    /// Content of `generation-summary.json`
    pub summary: GenerationSummary,
    /// Operations found across all generated services
    pub operations_found: usize,
    /// Services that produced no output
    pub skipped: Vec<SkippedService>,
}

impl GenerationReport {
    /// Services with at least one generated tool.
    #[must_use]
    pub fn generated_services(&self) -> Vec<&ServiceName> {
        self.summary.services.iter().map(|s| &s.name).collect()
    }
}

/// Drives code generation for a whole catalog.
///
/// # Examples
///
/// ```
/// use chrono::Utc;
/// use restgen_codegen::GenerationDriver;
/// use restgen_core::{RuntimeBindings, Service};
/// use serde_json::json;
/// use std::collections::HashMap;
///
/// let mut schemas = HashMap::new();
/// schemas.insert(
///     "widgets_v1".to_string(),
///     json!({"openapi": "3.0.0", "paths": {"/widgets": {"get": {}}}}),
/// );
///
/// let driver = GenerationDriver::new(RuntimeBindings::default()).unwrap();
/// let services = [Service::new("widgets", "v1"), Service::new("gadgets", "v1")];
/// let report = driver.run(&services, &schemas, Utc::now()).unwrap();
///
/// assert_eq!(report.summary.total_tools, 1);
/// assert_eq!(report.skipped.len(), 1);
/// assert!(report.code.get("widgets/Widgets-Widgets-GET-getWidgets.js").is_some());
/// ```
#[derive(Debug)]
pub struct GenerationDriver<'a> {
    renderer: FunctionRenderer<'a>,
}

impl GenerationDriver<'_> {
    /// Creates a driver rendering with the given runtime bindings.
    ///
    /// # Errors
    ///
    /// Returns an error if the bindings are invalid.
    pub fn new(bindings: RuntimeBindings) -> Result<Self> {
        Ok(Self {
            renderer: FunctionRenderer::new(bindings)?,
        })
    }

    /// Generates the tools of one service from its schema document.
    ///
    /// Returns `None` when the document has no supported operations.
    ///
    /// # Errors
    ///
    /// Returns an error if a function fails to render or the manifest cannot
    /// be serialized.
    pub fn generate_service(
        &self,
        service: &Service,
        document: &Value,
    ) -> Result<Option<ServiceArtifacts>> {
        let mut operations = normalize(document, &service.name, service.display_name());
        if operations.is_empty() {
            return Ok(None);
        }

        let mut dedup = NameDeduplicator::new();
        for op in &mut operations {
            op.tool_name = dedup.claim(op.tool_name.clone());
        }

        let mut manifest = Vec::with_capacity(operations.len());
        let mut files = Vec::with_capacity(operations.len() + 1);

        for op in &operations {
            let rendered = self.renderer.render(op)?;
            let file = op.tool_name.file_name();

            files.push(GeneratedFile {
                path: format!("{}/{file}", service.name),
                content: rendered.source,
            });
            manifest.push(ManifestEntry {
                name: op.tool_name.clone(),
                description: op.manifest_description(),
                schema: rendered.schema,
                method: op.method,
                path: op.path.clone(),
                operation_id: op.operation_id.clone(),
                file,
            });
        }

        files.push(GeneratedFile {
            path: format!("{}/{MANIFEST_FILE}", service.name),
            content: serde_json::to_string_pretty(&manifest)?,
        });

        Ok(Some(ServiceArtifacts { manifest, files }))
    }

    /// Generates every service of a catalog.
    ///
    /// `generated_at` is recorded in the summary; everything else in the
    /// report depends only on the services and documents.
    ///
    /// # Errors
    ///
    /// Returns an error if a function fails to render or an output file
    /// cannot be serialized. Per-service input problems are reported in
    /// [`GenerationReport::skipped`] instead.
    pub fn run<S: SchemaSource + ?Sized>(
        &self,
        services: &[Service],
        source: &S,
        generated_at: DateTime<Utc>,
    ) -> Result<GenerationReport> {
        let mut code = GeneratedCode::new();
        let mut summaries = Vec::new();
        let mut skipped = Vec::new();
        let mut seen_names = HashSet::new();
        let mut operations_found = 0;
        let mut total_tools = 0;

        for service in services {
            let skip = |reason: SkipReason| {
                tracing::warn!("Skipping {service}: {reason}");
                SkippedService {
                    name: service.name.clone(),
                    version: service.version.clone(),
                    reason,
                }
            };

            if !service.name.is_safe_directory_name() {
                skipped.push(skip(SkipReason::UnsafeName));
                continue;
            }
            if seen_names.contains(&service.name) {
                skipped.push(skip(SkipReason::DuplicateName));
                continue;
            }

            let document = match source.load(service) {
                Ok(Some(document)) => document,
                Ok(None) => {
                    skipped.push(skip(SkipReason::MissingSchema));
                    continue;
                }
                Err(e) => {
                    skipped.push(skip(SkipReason::Unreadable {
                        message: e.to_string(),
                    }));
                    continue;
                }
            };

            let Some(artifacts) = self.generate_service(service, &document)? else {
                skipped.push(skip(SkipReason::NoOperations));
                continue;
            };

            let tools = artifacts.manifest.len();
            tracing::info!("Generated {tools} tools for {service}");

            seen_names.insert(service.name.clone());
            operations_found += tools;
            total_tools += tools;
            summaries.push(ServiceSummary {
                name: service.name.clone(),
                version: service.version.clone(),
                tools,
            });
            for file in artifacts.files {
                code.add_file(file);
            }
        }

        let summary = GenerationSummary {
            generated_at,
            total_services: summaries.len(),
            total_tools,
            services: summaries,
        };
        code.add_file(GeneratedFile {
            path: SUMMARY_FILE.to_string(),
            content: serde_json::to_string_pretty(&summary)?,
        });

        tracing::info!(
            "Generation complete: {} services, {} tools, {} skipped",
            summary.total_services,
            summary.total_tools,
            skipped.len()
        );

        Ok(GenerationReport {
            code,
            summary,
            operations_found,
            skipped,
        })
    }
}
