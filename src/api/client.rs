use crate::api::token::TokenProvider;
use crate::api::types::{Article, ArticlesEnvelope};
use async_trait::async_trait;
use futures::StreamExt;
use reqwest::header::CACHE_CONTROL;
use reqwest::redirect::Policy;
use reqwest::StatusCode;
use secrecy::ExposeSecret;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use url::{Host, Url};

/// Default request timeout for both endpoints.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

const MAX_RESPONSE_SIZE: usize = 5 * 1024 * 1024; // 5MB

/// Endpoints exposed by the remote news API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    TopHeadlines,
    Search,
}

impl Endpoint {
    pub fn path(self) -> &'static str {
        match self {
            Endpoint::TopHeadlines => "top-headlines",
            Endpoint::Search => "search",
        }
    }
}

/// Raw failures from the HTTP layer.
///
/// These never leave the repository; callers above it only see
/// [`DomainError`](crate::error::DomainError).
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("No API key configured")]
    MissingApiKey,
    #[error("Invalid request URL")]
    InvalidUrl,
    #[error("Insecure base URL: HTTPS required (except localhost for testing)")]
    InsecureBaseUrl,
    #[error("Request timed out after {0}s")]
    Timeout(u64),
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("Authentication required: status {0}")]
    AuthRequired(u16),
    #[error("Rate limited by server")]
    RateLimited,
    #[error("Invalid response: status {0}")]
    InvalidResponse(u16),
    #[error("Response too large (exceeds {0} bytes)")]
    ResponseTooLarge(usize),
    #[error("Failed to decode response: {0}")]
    Decoding(#[from] serde_json::Error),
}

/// Data-source seam for the repository. Implemented by [`NewsClient`] and by
/// test stubs.
#[async_trait]
pub trait NewsApi: Send + Sync {
    async fn top_headlines(
        &self,
        language: &str,
        max: u32,
        country: Option<&str>,
    ) -> Result<Vec<Article>, FetchError>;

    async fn search(&self, query: &str, language: &str, max: u32)
        -> Result<Vec<Article>, FetchError>;
}

/// HTTP client for a GNews-compatible API.
pub struct NewsClient {
    http: reqwest::Client,
    base_url: Url,
    tokens: Arc<dyn TokenProvider>,
    timeout: Duration,
}

impl NewsClient {
    /// Create a client rooted at `base_url` (e.g. `https://gnews.io/api/v4`).
    ///
    /// Plain HTTP is only accepted for loopback hosts so the token is never
    /// sent in cleartext to a remote server.
    pub fn new(
        http: reqwest::Client,
        base_url: &str,
        tokens: Arc<dyn TokenProvider>,
    ) -> Result<Self, FetchError> {
        let base_url = Url::parse(base_url).map_err(|_| FetchError::InvalidUrl)?;

        match base_url.scheme() {
            "https" => {}
            "http" if is_loopback(&base_url) => {
                tracing::warn!(base_url = %base_url, "Using non-HTTPS news API base URL (localhost only)");
            }
            _ => {
                tracing::error!(base_url = %base_url, "Rejecting non-HTTPS base URL (HTTPS required except for localhost)");
                return Err(FetchError::InsecureBaseUrl);
            }
        }
        if base_url.cannot_be_a_base() {
            return Err(FetchError::InvalidUrl);
        }

        Ok(Self {
            http,
            base_url,
            tokens,
            timeout: DEFAULT_TIMEOUT,
        })
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn token(&self) -> Result<String, FetchError> {
        let token = self.tokens.token();
        let token = token.expose_secret().trim();
        if token.is_empty() {
            tracing::warn!("No API key configured, skipping request");
            return Err(FetchError::MissingApiKey);
        }
        Ok(token.to_string())
    }

    /// Build the full request URL for `endpoint` with `params` as query items.
    pub fn endpoint_url(&self, endpoint: Endpoint, params: &[(&str, &str)]) -> Result<Url, FetchError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| FetchError::InvalidUrl)?
            .pop_if_empty()
            .push(endpoint.path());
        url.query_pairs_mut().clear().extend_pairs(params);
        Ok(url)
    }

    async fn fetch_articles(
        &self,
        endpoint: Endpoint,
        params: &[(&str, &str)],
    ) -> Result<Vec<Article>, FetchError> {
        let url = self.endpoint_url(endpoint, params)?;
        tracing::debug!(endpoint = endpoint.path(), "Requesting articles");

        let request = self.http.get(url).header(CACHE_CONTROL, "no-cache");
        let response = tokio::time::timeout(self.timeout, request.send())
            .await
            .map_err(|_| FetchError::Timeout(self.timeout.as_secs()))?
            .map_err(FetchError::Network)?;

        check_status(response.status())?;

        let body = tokio::time::timeout(self.timeout, read_limited(response, MAX_RESPONSE_SIZE))
            .await
            .map_err(|_| FetchError::Timeout(self.timeout.as_secs()))??;

        let envelope: ArticlesEnvelope = serde_json::from_slice(&body)?;
        tracing::debug!(
            endpoint = endpoint.path(),
            count = envelope.articles.len(),
            total = ?envelope.total_articles,
            "Decoded articles"
        );
        Ok(envelope.articles)
    }
}

#[async_trait]
impl NewsApi for NewsClient {
    async fn top_headlines(
        &self,
        language: &str,
        max: u32,
        country: Option<&str>,
    ) -> Result<Vec<Article>, FetchError> {
        let token = self.token()?;
        let max = max.to_string();
        let mut params = vec![("lang", language), ("max", max.as_str()), ("token", token.as_str())];
        if let Some(country) = country {
            params.push(("country", country));
        }
        self.fetch_articles(Endpoint::TopHeadlines, &params).await
    }

    async fn search(
        &self,
        query: &str,
        language: &str,
        max: u32,
    ) -> Result<Vec<Article>, FetchError> {
        let token = self.token()?;
        let max = max.to_string();
        let params = [
            ("q", query),
            ("lang", language),
            ("max", max.as_str()),
            ("token", token.as_str()),
        ];
        self.fetch_articles(Endpoint::Search, &params).await
    }
}

/// Build the shared `reqwest` client used by [`NewsClient`].
pub fn build_http_client() -> reqwest::Result<reqwest::Client> {
    reqwest::Client::builder()
        .redirect(redirect_policy())
        .pool_max_idle_per_host(2)
        .pool_idle_timeout(Duration::from_secs(30))
        .tcp_keepalive(Duration::from_secs(60))
        .build()
}

/// Follow at most 3 redirects, never to another host or port.
///
/// The token travels in the query string, so a cross-host redirect would hand
/// it to a third party.
fn redirect_policy() -> Policy {
    Policy::custom(|attempt| {
        if attempt.previous().len() >= 3 {
            return attempt.error("Too many redirects (max 3)");
        }

        let url = attempt.url();
        for prev in attempt.previous() {
            if prev.as_str() == url.as_str() {
                return attempt.error("Redirect loop detected");
            }
        }

        let origin = attempt
            .previous()
            .first()
            .map(|u| (u.host_str(), u.port_or_known_default()));
        if origin != Some((url.host_str(), url.port_or_known_default())) {
            tracing::warn!(to = %url.host_str().unwrap_or(""), "Refusing cross-host redirect");
            return attempt.stop();
        }

        tracing::debug!(
            to = %url.path(),
            hop = attempt.previous().len() + 1,
            "Following redirect"
        );
        attempt.follow()
    })
}

/// Map a response status onto the fetch error taxonomy.
fn check_status(status: StatusCode) -> Result<(), FetchError> {
    if status.is_success() {
        return Ok(());
    }
    tracing::warn!(status = status.as_u16(), "News API returned error status");
    match status.as_u16() {
        401 | 403 => Err(FetchError::AuthRequired(status.as_u16())),
        429 => Err(FetchError::RateLimited),
        code => Err(FetchError::InvalidResponse(code)),
    }
}

fn is_loopback(url: &Url) -> bool {
    match url.host() {
        Some(Host::Domain(domain)) => domain == "localhost",
        Some(Host::Ipv4(ip)) => ip.is_loopback(),
        Some(Host::Ipv6(ip)) => ip.is_loopback(),
        None => false,
    }
}

async fn read_limited(response: reqwest::Response, limit: usize) -> Result<Vec<u8>, FetchError> {
    // Fast path: check Content-Length header
    if let Some(len) = response.content_length() {
        if len as usize > limit {
            return Err(FetchError::ResponseTooLarge(limit));
        }
    }

    let mut bytes = Vec::new();
    let mut stream = response.bytes_stream();

    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(FetchError::Network)?;
        if bytes.len().saturating_add(chunk.len()) > limit {
            return Err(FetchError::ResponseTooLarge(limit));
        }
        bytes.extend_from_slice(&chunk);
    }

    Ok(bytes)
}
