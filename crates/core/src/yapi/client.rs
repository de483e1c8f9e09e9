//! HTTP client for the documentation server.

use std::future::Future;
use std::time::Duration;

use serde::de::DeserializeOwned;
use tracing::{debug, warn};
use url::Url;

use super::model::{Category, Envelope, InterfaceDescriptor, InterfacePage, InterfaceSummary, Project};
use crate::error::TransportError;

const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Page size for `interface/list_cat`, large enough to get a whole category in one call.
pub const LIST_PAGE_LIMIT: u32 = 1000;

/// Read-only access to one documentation project.
pub trait DocSource {
    /// Base URL of the server, used for deep links and log context.
    fn server(&self) -> &str;

    /// Project metadata of the token's project.
    fn project(&self) -> impl Future<Output = Result<Project, TransportError>> + Send;

    /// Categories of a project, in server order.
    fn categories(
        &self,
        project_id: u64,
    ) -> impl Future<Output = Result<Vec<Category>, TransportError>> + Send;

    /// Interface summaries of a category, in server order.
    fn interfaces(
        &self,
        category_id: u64,
    ) -> impl Future<Output = Result<Vec<InterfaceSummary>, TransportError>> + Send;

    /// Full description of one interface.
    fn interface(
        &self,
        interface_id: u64,
    ) -> impl Future<Output = Result<InterfaceDescriptor, TransportError>> + Send;
}

/// [`DocSource`] over the server's REST API. One attempt per call, no retries.
#[derive(Debug, Clone)]
pub struct YapiClient {
    http: reqwest::Client,
    server: String,
    token: String,
}

impl YapiClient {
    /// Client for `server` authenticating with the project `token`.
    /// A trailing `/` on `server` is ignored.
    pub fn new(server: &str, token: &str) -> Result<Self, TransportError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|source| {
                warn!(error = %source, "Failed to build documentation HTTP client.");
                TransportError::Client { source }
            })?;
        Ok(Self {
            http,
            server: server.trim_end_matches('/').to_string(),
            token: token.to_string(),
        })
    }

    /// GET `<server>/api/<endpoint>` and unwrap the envelope. A missing `data` field
    /// yields `T::default()`.
    async fn request<T>(&self, endpoint: &str, params: &[(&str, String)]) -> Result<T, TransportError>
    where
        T: DeserializeOwned + Default,
    {
        // The query string carries the token: errors and logs only see `display_url`, and
        // reqwest errors are stripped of their URL.
        let display_url = format!("{}/api/{endpoint}", self.server);
        let query = std::iter::once(("token", self.token.as_str()))
            .chain(params.iter().map(|(k, v)| (*k, v.as_str())));
        let url = Url::parse_with_params(&display_url, query).map_err(|source| TransportError::Url {
            url: display_url.clone(),
            source,
        })?;

        debug!(url = %display_url, "Sending documentation request.");
        let response = self.http.get(url).send().await.map_err(|source| {
            let source = source.without_url();
            warn!(url = %display_url, error = %source, "Documentation request failed.");
            TransportError::Http {
                url: display_url.clone(),
                source,
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            warn!(url = %display_url, %status, "Documentation request returned an error status.");
            return Err(TransportError::Status {
                url: display_url,
                status: status.as_u16(),
            });
        }

        let envelope: Envelope<T> = response.json().await.map_err(|source| {
            let source = source.without_url();
            warn!(url = %display_url, error = %source, "Documentation response could not be decoded.");
            TransportError::Decode {
                url: display_url.clone(),
                source,
            }
        })?;

        if envelope.errcode != 0 {
            warn!(
                url = %display_url,
                code = envelope.errcode,
                message = %envelope.errmsg,
                "Documentation server reported an error."
            );
            return Err(TransportError::Api {
                url: display_url,
                code: envelope.errcode,
                message: envelope.errmsg,
            });
        }

        debug!(url = %display_url, "Received documentation response.");
        Ok(envelope.data.unwrap_or_default())
    }
}

impl DocSource for YapiClient {
    fn server(&self) -> &str {
        &self.server
    }

    async fn project(&self) -> Result<Project, TransportError> {
        self.request("project/get", &[]).await
    }

    async fn categories(&self, project_id: u64) -> Result<Vec<Category>, TransportError> {
        self.request("interface/getCatMenu", &[("project_id", project_id.to_string())])
            .await
    }

    async fn interfaces(&self, category_id: u64) -> Result<Vec<InterfaceSummary>, TransportError> {
        let page: InterfacePage = self
            .request(
                "interface/list_cat",
                &[
                    ("catid", category_id.to_string()),
                    ("page", "1".to_string()),
                    ("limit", LIST_PAGE_LIMIT.to_string()),
                ],
            )
            .await?;
        Ok(page.list)
    }

    async fn interface(&self, interface_id: u64) -> Result<InterfaceDescriptor, TransportError> {
        self.request("interface/get", &[("id", interface_id.to_string())])
            .await
    }
}
