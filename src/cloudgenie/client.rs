//! HTTP client for the CloudGenie REST API.

use std::time::Duration;

use reqwest::header::{HeaderValue, ACCEPT};
use reqwest::{Method, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::cloudgenie::models::{
    Blueprint, CreateResourceInput, HealthStatus, Resource, UpdateStatusRequest,
};
use crate::error::ClientError;

/// Client for the CloudGenie API.
///
/// Every request carries JSON headers and is bounded by a fixed timeout.
#[derive(Debug, Clone)]
pub struct CloudGenieClient {
    base_url: Url,
    http: reqwest::Client,
}

impl CloudGenieClient {
    /// Creates a client for the API rooted at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns an error if `base_url` is not an absolute URL that can carry
    /// path segments, or the HTTP client cannot be built.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ClientError> {
        let invalid = || ClientError::InvalidUrl {
            url: base_url.to_string(),
        };
        let base_url = Url::parse(base_url).map_err(|_| invalid())?;
        if base_url.cannot_be_a_base() {
            return Err(invalid());
        }

        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(ClientError::Build)?;

        tracing::info!(base_url = %base_url, timeout_secs = timeout.as_secs(), "Created CloudGenie client");
        Ok(Self { base_url, http })
    }

    /// The API base URL.
    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Sends a request to `segments` below the base URL.
    ///
    /// Segments are percent-encoded individually, so names containing `/` or
    /// spaces stay a single path segment.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure or timeout, or when the backend
    /// answers with a non-2xx status (carrying the status and body text).
    pub async fn request(
        &self,
        method: Method,
        segments: &[&str],
        body: Option<&Value>,
    ) -> Result<Vec<u8>, ClientError> {
        let url = self.endpoint(segments)?;
        tracing::debug!(method = %method, url = %url, "CloudGenie API request");

        let mut request = self
            .http
            .request(method.clone(), url.clone())
            .header(ACCEPT, HeaderValue::from_static("application/json"));
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await.map_err(|e| {
            tracing::warn!(method = %method, url = %url, error = %e, "CloudGenie API request failed");
            ClientError::Request(e)
        })?;

        let status = response.status();
        let bytes = response.bytes().await.map_err(ClientError::Request)?;

        if !status.is_success() {
            let body = String::from_utf8_lossy(&bytes).into_owned();
            tracing::warn!(method = %method, url = %url, status = status.as_u16(), "CloudGenie API error");
            return Err(ClientError::Status {
                status: status.as_u16(),
                body,
            });
        }

        tracing::debug!(status = status.as_u16(), bytes = bytes.len(), "CloudGenie API response");
        Ok(bytes.to_vec())
    }

    /// Checks backend health.
    ///
    /// # Errors
    ///
    /// See [`CloudGenieClient::request`]; also fails if the body does not decode.
    pub async fn health_check(&self) -> Result<HealthStatus, ClientError> {
        self.get_json(&["v1", "healthcheck"]).await
    }

    /// Lists all blueprints.
    ///
    /// # Errors
    ///
    /// See [`CloudGenieClient::health_check`].
    pub async fn blueprints(&self) -> Result<Vec<Blueprint>, ClientError> {
        self.get_json(&["v1", "blueprints"]).await
    }

    /// Fetches a blueprint by name.
    ///
    /// # Errors
    ///
    /// See [`CloudGenieClient::health_check`].
    pub async fn blueprint(&self, name: &str) -> Result<Blueprint, ClientError> {
        self.get_json(&["v1", "blueprints", name]).await
    }

    /// Lists all provisioned resources.
    ///
    /// # Errors
    ///
    /// See [`CloudGenieClient::health_check`].
    pub async fn resources(&self) -> Result<Vec<Resource>, ClientError> {
        self.get_json(&["v1", "resources"]).await
    }

    /// Fetches a resource by name.
    ///
    /// # Errors
    ///
    /// See [`CloudGenieClient::health_check`].
    pub async fn resource(&self, name: &str) -> Result<Resource, ClientError> {
        self.get_json(&["v1", "resources", name]).await
    }

    /// Creates a resource from a blueprint.
    ///
    /// # Errors
    ///
    /// See [`CloudGenieClient::health_check`].
    pub async fn create_resource(&self, input: &CreateResourceInput) -> Result<Resource, ClientError> {
        self.send_json(Method::POST, &["v1", "resources"], input).await
    }

    /// Sets the status of a resource.
    ///
    /// # Errors
    ///
    /// See [`CloudGenieClient::health_check`].
    pub async fn update_resource_status(&self, name: &str, status: &str) -> Result<Resource, ClientError> {
        self.send_json(
            Method::PATCH,
            &["v1", "resources", name, "status"],
            &UpdateStatusRequest { status },
        )
        .await
    }

    /// Deletes a resource.
    ///
    /// # Errors
    ///
    /// See [`CloudGenieClient::request`].
    pub async fn delete_resource(&self, name: &str) -> Result<(), ClientError> {
        self.request(Method::DELETE, &["v1", "resources", name], None)
            .await
            .map(drop)
    }

    async fn get_json<T: DeserializeOwned>(&self, segments: &[&str]) -> Result<T, ClientError> {
        let bytes = self.request(Method::GET, segments, None).await?;
        serde_json::from_slice(&bytes).map_err(ClientError::Decode)
    }

    async fn send_json<B, T>(&self, method: Method, segments: &[&str], body: &B) -> Result<T, ClientError>
    where
        B: Serialize + Sync,
        T: DeserializeOwned,
    {
        let body = serde_json::to_value(body).map_err(ClientError::Encode)?;
        let bytes = self.request(method, segments, Some(&body)).await?;
        serde_json::from_slice(&bytes).map_err(ClientError::Decode)
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url, ClientError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| ClientError::InvalidUrl {
                url: self.base_url.to_string(),
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }
}
