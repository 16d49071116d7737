//! Tool registry access.
//!
//! The publisher talks to the registry through the [`ToolRegistry`] trait;
//! [`RegistryClient`] implements it over the registry's REST API:
//!
//! | operation | request |
//! |-----------|---------|
//! | list      | `GET /api/v1/tools` |
//! | create    | `POST /api/v1/tools` |
//! | update    | `PUT /api/v1/tools/{id}` |
//! | delete    | `DELETE /api/v1/tools/{id}` |

use crate::error::{PublishError, Result};
use async_trait::async_trait;
use reqwest::{Method, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde_json::Value;

/// Longest response body kept in error messages.
const MAX_ERROR_BODY: usize = 500;

/// A tool as listed by the registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RemoteTool {
    /// Registry id
    pub id: String,
    /// Tool name
    pub name: String,
}

/// Body of a create or update request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ToolPayload {
    /// Tool name
    pub name: String,
    /// One-line description
    pub description: String,
    /// Parameter schema, serialized as a JSON string
    pub schema: String,
    /// Function body
    pub func: String,
    /// Card color
    pub color: String,
}

/// Operations the publisher needs from a tool registry.
#[async_trait]
pub trait ToolRegistry: Send + Sync {
    /// Lists every tool in the registry.
    async fn list_tools(&self) -> Result<Vec<RemoteTool>>;

    /// Creates a tool and returns its id when the registry reports one.
    async fn create_tool(&self, payload: &ToolPayload) -> Result<Option<String>>;

    /// Overwrites the tool with the given id.
    async fn update_tool(&self, id: &str, payload: &ToolPayload) -> Result<()>;

    /// Deletes the tool with the given id.
    async fn delete_tool(&self, id: &str) -> Result<()>;
}

/// [`ToolRegistry`] over HTTP.
///
/// The API key, when set, is sent as a bearer token.
///
/// # Examples
///
/// ```
/// use restgen_publish::RegistryClient;
///
/// let client = RegistryClient::new("http://localhost:3000/", None).unwrap();
/// assert_eq!(client.tools_url(), "http://localhost:3000/api/v1/tools");
/// ```
#[derive(Debug)]
pub struct RegistryClient {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<SecretString>,
}

impl RegistryClient {
    /// Creates a client for the registry at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be initialized.
    pub fn new(base_url: impl Into<String>, api_key: Option<SecretString>) -> Result<Self> {
        let client = reqwest::Client::builder().build().map_err(|e| {
            restgen_core::Error::ConfigError {
                message: format!("failed to build HTTP client: {e}"),
            }
        })?;
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Ok(Self {
            client,
            base_url,
            api_key: api_key.filter(|key| !key.expose_secret().is_empty()),
        })
    }

    /// Returns the tools collection URL.
    #[must_use]
    pub fn tools_url(&self) -> String {
        format!("{}/api/v1/tools", self.base_url)
    }

    async fn send(
        &self,
        method: Method,
        url: String,
        body: Option<&ToolPayload>,
        accepted: &[StatusCode],
    ) -> Result<String> {
        let mut request = self.client.request(method.clone(), &url);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key.expose_secret());
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await.map_err(|source| PublishError::Request {
            method: method.to_string(),
            url: url.clone(),
            source,
        })?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|source| PublishError::Request {
                method: method.to_string(),
                url: url.clone(),
                source,
            })?;

        if !accepted.contains(&status) {
            return Err(PublishError::Status {
                method: method.to_string(),
                url,
                status: status.as_u16(),
                body: text.chars().take(MAX_ERROR_BODY).collect(),
            });
        }

        tracing::debug!("{method} {url} -> {}", status.as_u16());
        Ok(text)
    }
}

#[async_trait]
impl ToolRegistry for RegistryClient {
    async fn list_tools(&self) -> Result<Vec<RemoteTool>> {
        let url = self.tools_url();
        let body = self
            .send(Method::GET, url.clone(), None, &[StatusCode::OK])
            .await?;
        parse_tool_list(&body).map_err(|message| PublishError::InvalidResponse { url, message })
    }

    async fn create_tool(&self, payload: &ToolPayload) -> Result<Option<String>> {
        let body = self
            .send(
                Method::POST,
                self.tools_url(),
                Some(payload),
                &[StatusCode::OK, StatusCode::CREATED],
            )
            .await?;
        Ok(serde_json::from_str::<Value>(&body)
            .ok()
            .as_ref()
            .and_then(|value| value.get("id"))
            .and_then(id_string))
    }

    async fn update_tool(&self, id: &str, payload: &ToolPayload) -> Result<()> {
        let url = format!("{}/{id}", self.tools_url());
        self.send(Method::PUT, url, Some(payload), &[StatusCode::OK])
            .await
            .map(drop)
    }

    async fn delete_tool(&self, id: &str) -> Result<()> {
        let url = format!("{}/{id}", self.tools_url());
        self.send(
            Method::DELETE,
            url,
            None,
            &[StatusCode::OK, StatusCode::NO_CONTENT],
        )
        .await
        .map(drop)
    }
}

/// Parses a tool listing. Ids may be strings or numbers; entries without an
/// id or name are ignored.
fn parse_tool_list(body: &str) -> std::result::Result<Vec<RemoteTool>, String> {
    let value: Value = serde_json::from_str(body).map_err(|e| e.to_string())?;
    let entries = value
        .as_array()
        .ok_or_else(|| "expected a JSON array of tools".to_string())?;

    Ok(entries
        .iter()
        .filter_map(|entry| {
            Some(RemoteTool {
                id: entry.get("id").and_then(id_string)?,
                name: entry.get("name")?.as_str()?.to_string(),
            })
        })
        .collect())
}

fn id_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
