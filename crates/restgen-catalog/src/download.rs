//! Sequential schema downloader.
//!
//! For each service the downloader keeps an already stored valid document,
//! otherwise tries its candidate URLs in order until one returns a schema.
//! Services are processed one at a time with a fixed pause between network
//! attempts. Failures are recorded and never retried.

use crate::store::{SchemaStore, is_schema_document};
use async_trait::async_trait;
use restgen_core::{Error, Result, Service};
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;

/// Per-request timeout of [`HttpFetcher`].
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Fetches the body of a URL.
#[async_trait]
pub trait SchemaFetcher: Send + Sync {
    /// Returns the response body of a successful (200) GET request.
    ///
    /// # Errors
    ///
    /// Returns [`Error::HttpError`] for transport failures and non-200
    /// statuses.
    async fn fetch(&self, url: &str) -> Result<String>;
}

/// [`SchemaFetcher`] backed by `reqwest`. Redirects are followed.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    /// Creates a fetcher with [`REQUEST_TIMEOUT`].
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be initialized.
    pub fn new() -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| Error::ConfigError {
                message: format!("failed to build HTTP client: {e}"),
            })?;
        Ok(Self { client })
    }
}

#[async_trait]
impl SchemaFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<String> {
        let http_error = |message: String, source: Option<reqwest::Error>| Error::HttpError {
            url: url.to_string(),
            message,
            source: source.map(|e| Box::new(e) as Box<dyn std::error::Error + Send + Sync>),
        };

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| http_error(e.to_string(), Some(e)))?;

        let status = response.status();
        if status != reqwest::StatusCode::OK {
            return Err(http_error(format!("HTTP {}", status.as_u16()), None));
        }

        response
            .text()
            .await
            .map_err(|e| http_error(format!("failed to read body: {e}"), Some(e)))
    }
}

/// Returns the URLs tried for a service, in order.
///
/// An explicit schema URL comes first, followed by the fixed hosting
/// patterns under `directory_url`.
///
/// # Examples
///
/// ```
/// use restgen_catalog::download::candidate_urls;
/// use restgen_core::Service;
///
/// let urls = candidate_urls(&Service::new("wql", "v1"), "https://host/restapi/");
/// assert_eq!(urls[0], "https://host/restapi/wql/v1/wql.json");
/// assert_eq!(urls.len(), 7);
///
/// let pinned = Service::new("wql", "v1").with_schema_url("https://cdn/wql.json");
/// assert_eq!(candidate_urls(&pinned, "https://host/restapi")[0], "https://cdn/wql.json");
/// ```
#[must_use]
pub fn candidate_urls(service: &Service, directory_url: &str) -> Vec<String> {
    let base = directory_url.trim_end_matches('/');
    let name = service.name.as_str();
    let version = service.version.as_str();
    let number = version.strip_prefix('v').unwrap_or(version);

    let mut urls: Vec<String> = service
        .schema_url
        .iter()
        .filter(|url| !url.is_empty())
        .cloned()
        .collect();
    urls.extend([
        format!("{base}/{name}/{version}/{name}.json"),
        format!("{base}/{name}/{version}/openapi.json"),
        format!("{base}/{name}/{version}/schema.json"),
        format!("{base}/{name}/{version}/swagger.json"),
        format!("{base}/{name}/{version}/{name}_{version}.json"),
        format!("{base}/{name}/v{number}/{name}.json"),
        format!("{base}/{name}/{version}/api.json"),
    ]);
    urls
}

/// What happened to one service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum DownloadOutcome {
    /// A valid document was already stored
    AlreadyPresent,
    /// A document was fetched from `url`
    Downloaded {
        /// The URL that returned the document
        url: String,
    },
    /// No candidate URL returned a schema
    Failed {
        /// Per-URL failure messages, in the order tried
        attempts: Vec<String>,
    },
}

/// Result of a download run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct DownloadReport {
    /// `(service key, outcome)` in catalog order
    pub services: Vec<(String, DownloadOutcome)>,
}

impl DownloadReport {
    /// Services with a usable document after the run.
    #[must_use]
    pub fn available(&self) -> usize {
        self.services
            .iter()
            .filter(|(_, o)| !matches!(o, DownloadOutcome::Failed { .. }))
            .count()
    }

    /// Keys of the services that failed.
    #[must_use]
    pub fn failed(&self) -> Vec<&str> {
        self.services
            .iter()
            .filter(|(_, o)| matches!(o, DownloadOutcome::Failed { .. }))
            .map(|(key, _)| key.as_str())
            .collect()
    }
}

/// Downloads schema documents into a [`SchemaStore`].
///
/// # Examples
///
/// ```no_run
/// use restgen_catalog::{HttpFetcher, SchemaDownloader, SchemaStore, curated_services};
/// use std::time::Duration;
///
/// # async fn run() -> restgen_core::Result<()> {
/// let downloader = SchemaDownloader::new(
///     HttpFetcher::new()?,
///     "https://community.workday.com/sites/default/files/file-hosting/restapi",
///     Duration::from_millis(1500),
/// );
/// let mut services = curated_services();
/// let report = downloader.download_all(&mut services, &SchemaStore::new("schemas")).await?;
/// println!("{} available", report.available());
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct SchemaDownloader<F> {
    fetcher: F,
    directory_url: String,
    delay: Duration,
}

impl<F: SchemaFetcher> SchemaDownloader<F> {
    /// Creates a downloader.
    #[must_use]
    pub fn new(fetcher: F, directory_url: impl Into<String>, delay: Duration) -> Self {
        Self {
            fetcher,
            directory_url: directory_url.into(),
            delay,
        }
    }

    /// Downloads every service that has no valid stored document.
    ///
    /// The URL a document was found at is written back into the service's
    /// `schema_url`. The run pauses between services that needed network
    /// access, but not after the last one.
    ///
    /// # Errors
    ///
    /// Returns an error only if a fetched document cannot be written to the
    /// store. Fetch failures are reported per service.
    pub async fn download_all(
        &self,
        services: &mut [Service],
        store: &SchemaStore,
    ) -> Result<DownloadReport> {
        let mut report = DownloadReport::default();
        let total = services.len();

        for (i, service) in services.iter_mut().enumerate() {
            tracing::info!("[{}/{total}] {service}", i + 1);

            if store.has_valid(service) {
                tracing::info!("Schema for {service} already present, skipping");
                report
                    .services
                    .push((service.key(), DownloadOutcome::AlreadyPresent));
                continue;
            }

            let outcome = self.download_one(service, store).await?;
            if let DownloadOutcome::Failed { attempts } = &outcome {
                tracing::warn!(
                    "Could not download schema for {service} ({} URLs tried)",
                    attempts.len()
                );
            }
            report.services.push((service.key(), outcome));

            if i + 1 < total && !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
        }

        tracing::info!(
            "Download complete: {}/{total} available, {} failed",
            report.available(),
            report.failed().len()
        );
        Ok(report)
    }

    async fn download_one(
        &self,
        service: &mut Service,
        store: &SchemaStore,
    ) -> Result<DownloadOutcome> {
        let mut attempts = Vec::new();

        for url in candidate_urls(service, &self.directory_url) {
            tracing::debug!("Trying {url}");
            let document = match self.fetcher.fetch(&url).await {
                Ok(body) => serde_json::from_str::<Value>(&body).ok(),
                Err(e) => {
                    tracing::debug!("{e}");
                    attempts.push(format!("{url}: {e}"));
                    continue;
                }
            };

            match document {
                Some(document) if is_schema_document(&document) => {
                    let path = store.save(service, &document)?;
                    tracing::info!("Saved {} from {url}", path.display());
                    service.schema_url = Some(url.clone());
                    return Ok(DownloadOutcome::Downloaded { url });
                }
                _ => {
                    tracing::debug!("{url} did not return a schema document");
                    attempts.push(format!("{url}: not a schema document"));
                }
            }
        }

        Ok(DownloadOutcome::Failed { attempts })
    }
}
