//! GitHub REST client
//!
//! A [`GitHubClient`] is bound to one base URL and one credential state. It is
//! cheap to build (no network I/O) and immutable afterwards; a credential
//! change means building a new one, see [`ClientProvider`](super::ClientProvider).

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, USER_AGENT};
use reqwest::StatusCode;
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use url::Url;

use crate::core::config::Config;
use crate::error::{ReposcopeError, Result};
use crate::github::error_handler::{classify_failure, FailureDescriptor, GitHubError};
use crate::github::rate_limit::{RateLimitObserver, RateLimitSnapshot};

/// Media type requested on every call
pub const GITHUB_MEDIA_TYPE: &str = "application/vnd.github+json";

/// Pinned REST API version
pub const API_VERSION: &str = "2022-11-28";

/// Header carrying the API version
pub const API_VERSION_HEADER: &str = "x-github-api-version";

/// Headers sent with every request for the given credential
///
/// Pure: the same credential always yields the same header set.
pub fn request_headers(credential: Option<&SecretString>) -> Result<HeaderMap> {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static(GITHUB_MEDIA_TYPE));
    headers.insert(API_VERSION_HEADER, HeaderValue::from_static(API_VERSION));
    headers.insert(
        USER_AGENT,
        HeaderValue::from_static(concat!("reposcope/", env!("CARGO_PKG_VERSION"))),
    );

    if let Some(token) = credential {
        let mut value = HeaderValue::from_str(&format!("Bearer {}", token.expose_secret()))
            .map_err(|_| {
                ReposcopeError::Credential(
                    "GitHub token contains characters that cannot be sent in a header".into(),
                )
            })?;
        value.set_sensitive(true);
        headers.insert(AUTHORIZATION, value);
    }

    Ok(headers)
}

/// Raw successful response
pub(crate) struct ApiResponse {
    pub status: StatusCode,
    pub body: String,
}

/// GitHub API client bound to one credential state
#[derive(Debug)]
pub struct GitHubClient {
    http: reqwest::Client,
    base_url: Url,
    headers: HeaderMap,
    rate_limit: RateLimitObserver,
}

impl GitHubClient {
    /// Build a client for the given credential and configuration
    pub fn build(credential: Option<&SecretString>, config: &Config) -> Result<Self> {
        let base_url = config.api_url()?;
        let headers = request_headers(credential)?;

        let http = reqwest::Client::builder()
            .default_headers(headers.clone())
            .timeout(config.request_timeout())
            .build()
            .map_err(|e| ReposcopeError::Config(format!("Cannot build HTTP client: {}", e)))?;

        tracing::debug!(
            base_url = %base_url,
            authenticated = credential.is_some(),
            "Built GitHub client"
        );

        Ok(Self {
            http,
            base_url,
            headers,
            rate_limit: RateLimitObserver::new(),
        })
    }

    /// Headers attached to every request
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Whether requests carry an `Authorization` header
    pub fn is_authenticated(&self) -> bool {
        self.headers.contains_key(AUTHORIZATION)
    }

    /// API base URL
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Latest quota observed on a successful response
    pub fn rate_limit(&self) -> Option<RateLimitSnapshot> {
        self.rate_limit.latest()
    }

    /// Resolve path segments against the base URL, percent-encoding each
    fn endpoint(&self, segments: &[&str]) -> Option<Url> {
        let mut url = self.base_url.clone();
        {
            let mut path = url.path_segments_mut().ok()?;
            path.pop_if_empty().extend(segments);
        }
        Some(url)
    }

    /// Issue one GET; non-2xx and transport failures come back classified
    pub(crate) async fn get(
        &self,
        segments: &[&str],
        query: &[(&str, String)],
        action: &str,
    ) -> std::result::Result<ApiResponse, GitHubError> {
        let result = self.send(segments, query).await;
        match result {
            Ok(response) => Ok(response),
            Err(failure) => {
                let err = classify_failure(&failure, action);
                tracing::debug!(
                    kind = %err.kind,
                    status = ?err.status,
                    "GitHub call failed: {}",
                    err.message
                );
                Err(err)
            }
        }
    }

    async fn send(
        &self,
        segments: &[&str],
        query: &[(&str, String)],
    ) -> std::result::Result<ApiResponse, FailureDescriptor> {
        let url = self.endpoint(segments).ok_or_else(|| {
            FailureDescriptor::not_sent(format!("cannot build a request URL from {}", self.base_url))
        })?;

        let mut request = self.http.get(url);
        if !query.is_empty() {
            request = request.query(query);
        }

        let response = request.send().await.map_err(transport_failure)?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(FailureDescriptor::response(status.as_u16(), body));
        }

        self.rate_limit.observe(response.headers());

        let body = response.text().await.map_err(transport_failure)?;
        Ok(ApiResponse { status, body })
    }

    /// GET and decode a JSON body
    pub(crate) async fn get_json<T: DeserializeOwned>(
        &self,
        segments: &[&str],
        query: &[(&str, String)],
        action: &str,
    ) -> std::result::Result<T, GitHubError> {
        let response = self.get(segments, query, action).await?;
        decode(&response, action)
    }

    /// GET a listing; `204 No Content` or an empty body is an empty list
    ///
    /// GitHub answers some listings, such as contributors of an empty
    /// repository, with 204 and no body.
    pub(crate) async fn get_list<T: DeserializeOwned>(
        &self,
        segments: &[&str],
        query: &[(&str, String)],
        action: &str,
    ) -> std::result::Result<Vec<T>, GitHubError> {
        let response = self.get(segments, query, action).await?;
        if response.status == StatusCode::NO_CONTENT || response.body.trim().is_empty() {
            return Ok(Vec::new());
        }
        decode(&response, action)
    }
}

/// Decode a successful body, classifying malformed payloads
pub(crate) fn decode<T: DeserializeOwned>(
    response: &ApiResponse,
    action: &str,
) -> std::result::Result<T, GitHubError> {
    serde_json::from_str(&response.body).map_err(|e| {
        classify_failure(
            &FailureDescriptor::undecodable(
                response.status.as_u16(),
                format!("invalid response body: {}", e),
            ),
            action,
        )
    })
}

/// Map a reqwest error to the failure descriptor
fn transport_failure(err: reqwest::Error) -> FailureDescriptor {
    if err.is_builder() {
        FailureDescriptor::not_sent(err.to_string())
    } else if err.is_timeout() {
        FailureDescriptor::no_response(format!("request timed out: {}", err))
    } else {
        FailureDescriptor::no_response(err.to_string())
    }
}
