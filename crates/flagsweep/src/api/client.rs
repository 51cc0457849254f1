//! Flag service API client.
//!
//! A thin client over the transport boundary: every request goes through
//! the retrying executor, and an optional [`ApiRateLimiter`] paces all
//! traffic, retries included.

use std::sync::Arc;
use std::time::Duration;

use serde::de::DeserializeOwned;

use crate::http::{HttpMethod, HttpRequest, HttpTransport, ReqwestTransport};
use crate::rate_limit::ApiRateLimiter;
use crate::retry::{RetryConfig, execute_with_retry};

use super::error::ApiError;
use super::types::{FlagPage, FlagRecord, PatchRequest};

/// Default flag service host.
pub const DEFAULT_HOST: &str = "https://app.launchdarkly.com";

/// Transport-level timeout per request.
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Client for the flag service REST API.
#[derive(Clone)]
pub struct FlagsClient {
    transport: Arc<dyn HttpTransport>,
    host: String,
    token: String,
    retry: RetryConfig,
    rate_limiter: Option<ApiRateLimiter>,
}

impl std::fmt::Debug for FlagsClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FlagsClient")
            .field("host", &self.host)
            .finish_non_exhaustive()
    }
}

impl FlagsClient {
    /// Create a client backed by a real reqwest transport.
    ///
    /// # Arguments
    ///
    /// * `host` - Service host URL (e.g., [`DEFAULT_HOST`])
    /// * `token` - API access token with read and write access to the project
    pub fn new(
        host: &str,
        token: &str,
        retry: RetryConfig,
        rate_limiter: Option<ApiRateLimiter>,
    ) -> Result<Self, ApiError> {
        let transport = ReqwestTransport::with_timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .map_err(|e| ApiError::Config(e.to_string()))?;
        Self::new_with_transport(host, token, retry, rate_limiter, Arc::new(transport))
    }

    pub fn new_with_transport(
        host: &str,
        token: &str,
        retry: RetryConfig,
        rate_limiter: Option<ApiRateLimiter>,
        transport: Arc<dyn HttpTransport>,
    ) -> Result<Self, ApiError> {
        if token.trim().is_empty() {
            return Err(ApiError::Config("access token must not be empty".to_string()));
        }
        let host = host.trim_end_matches('/').to_string();
        if host.is_empty() {
            return Err(ApiError::Config("service host must not be empty".to_string()));
        }

        Ok(Self {
            transport,
            host,
            token: token.to_string(),
            retry,
            rate_limiter,
        })
    }

    /// The configured host URL.
    #[must_use]
    pub fn host(&self) -> &str {
        &self.host
    }

    fn headers(&self, with_body: bool) -> Vec<(String, String)> {
        let mut headers = vec![
            ("Authorization".to_string(), self.token.clone()),
            ("Accept".to_string(), "application/json".to_string()),
            ("User-Agent".to_string(), "flagsweep".to_string()),
        ];
        if with_body {
            headers.push(("Content-Type".to_string(), "application/json".to_string()));
        }
        headers
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let request = HttpRequest {
            method: HttpMethod::Get,
            url: format!("{}{}", self.host, path),
            headers: self.headers(false),
            body: Vec::new(),
        };

        let response = execute_with_retry(
            self.transport.as_ref(),
            self.rate_limiter.as_ref(),
            &request,
            &self.retry,
        )
        .await?;

        serde_json::from_slice(&response.body).map_err(ApiError::from)
    }

    /// Fetch one page of the project's flags.
    pub async fn list_flags_page(
        &self,
        project: &str,
        limit: u32,
        offset: u64,
    ) -> Result<FlagPage, ApiError> {
        self.get(&format!(
            "/api/v2/flags/{project}?limit={limit}&offset={offset}"
        ))
        .await
    }

    /// Fetch a single flag by key. A 404 means the flag does not exist and
    /// is reported as `None` rather than an error.
    pub async fn get_flag(&self, project: &str, key: &str) -> Result<Option<FlagRecord>, ApiError> {
        match self
            .get::<FlagRecord>(&format!("/api/v2/flags/{project}/{key}"))
            .await
        {
            Ok(flag) => Ok(Some(flag)),
            Err(e) if e.is_not_found() => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Apply a JSON patch to a single flag.
    ///
    /// Unlike [`get_flag`](Self::get_flag), a 404 here is an error: writing
    /// to a missing flag is a failure the caller records per item.
    pub async fn patch_flag(
        &self,
        project: &str,
        key: &str,
        patch: &PatchRequest,
    ) -> Result<(), ApiError> {
        let body = serde_json::to_vec(patch)?;
        let request = HttpRequest {
            method: HttpMethod::Patch,
            url: format!("{}/api/v2/flags/{project}/{key}", self.host),
            headers: self.headers(true),
            body,
        };

        execute_with_retry(
            self.transport.as_ref(),
            self.rate_limiter.as_ref(),
            &request,
            &self.retry,
        )
        .await?;

        Ok(())
    }
}
