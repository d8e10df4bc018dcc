//! reqwest adapter implementing the [`DebateApi`] port.

use super::error::classify_response;
use async_trait::async_trait;
use parley_application::{BranchRequest, DebateApi};
use parley_domain::{ApiError, Branch, DebateConfig, DebateCreated, DebateId, DebateSummary};
use reqwest::header::RETRY_AFTER;
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use tracing::debug;
use uuid::Uuid;

/// Header identifying each outbound request for server-side tracing.
const CORRELATION_HEADER: &str = "x-correlation-id";

/// HTTP client for the one-shot debate endpoints.
///
/// Every call resolves to a payload or exactly one [`ApiError`] variant;
/// failures without an HTTP status fold into [`ApiError::Network`].
pub struct HttpDebateApi {
    client: Client,
    base_url: String,
    correlation_id: Option<String>,
}

impl HttpDebateApi {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            client: Client::new(),
            base_url,
            correlation_id: None,
        }
    }

    /// Pin a fixed correlation id instead of minting a fresh UUID per request.
    pub fn with_correlation_id(mut self, id: impl Into<String>) -> Self {
        self.correlation_id = Some(id.into());
        self
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let correlation = self
            .correlation_id
            .clone()
            .unwrap_or_else(|| Uuid::new_v4().to_string());
        debug!(%method, path, %correlation, "debate api request");
        self.client
            .request(method, format!("{}{path}", self.base_url))
            .header(CORRELATION_HEADER, correlation)
    }

    async fn send<T: DeserializeOwned>(
        &self,
        builder: RequestBuilder,
        resource: &str,
        id: &str,
    ) -> Result<T, ApiError> {
        let response = Self::checked(builder, resource, id).await?;
        response
            .json()
            .await
            .map_err(|e| ApiError::network_caused_by("failed to decode response body", &e))
    }

    async fn checked(
        builder: RequestBuilder,
        resource: &str,
        id: &str,
    ) -> Result<Response, ApiError> {
        let response = builder
            .send()
            .await
            .map_err(|e| ApiError::network_caused_by("request failed", &e))?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let retry_after = response
            .headers()
            .get(RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned);
        let body = response.text().await.unwrap_or_default();
        Err(classify_response(
            status,
            retry_after.as_deref(),
            &body,
            resource,
            id,
        ))
    }
}

#[async_trait]
impl DebateApi for HttpDebateApi {
    async fn create_debate(&self, config: &DebateConfig) -> Result<DebateCreated, ApiError> {
        self.send(
            self.request(Method::POST, "/debates").json(config),
            "debate",
            "new",
        )
        .await
    }

    async fn get_debate(&self, id: &DebateId) -> Result<DebateSummary, ApiError> {
        self.send(
            self.request(Method::GET, &format!("/debates/{}", id.as_str())),
            "debate",
            id.as_str(),
        )
        .await
    }

    async fn list_debates(&self) -> Result<Vec<DebateSummary>, ApiError> {
        self.send(self.request(Method::GET, "/debates"), "debates", "")
            .await
    }

    async fn delete_debate(&self, id: &DebateId) -> Result<(), ApiError> {
        Self::checked(
            self.request(Method::DELETE, &format!("/debates/{}", id.as_str())),
            "debate",
            id.as_str(),
        )
        .await
        .map(|_| ())
    }

    async fn create_branch(
        &self,
        debate_id: &DebateId,
        request: &BranchRequest,
    ) -> Result<Branch, ApiError> {
        self.send(
            self.request(
                Method::POST,
                &format!("/debates/{}/branches", debate_id.as_str()),
            )
            .json(request),
            "branch",
            debate_id.as_str(),
        )
        .await
    }
}
