//! The transport primitive.
//!
//! A [`Transport`] performs exactly one HTTP exchange: it sends a fully
//! resolved request and returns the status, headers, and raw body. Anything
//! beyond that (pooling, TLS, timeouts, redirects) is the transport's own
//! business. [`ReqwestTransport`] is the default implementation.
//!
//! Implementations must be safe to share between concurrent calls.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;

use crate::clients::errors::TransportError;
use crate::clients::headers::Headers;
use crate::clients::http_request::HttpMethod;

/// A fully resolved request, ready to go on the wire.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TransportRequest {
    /// The HTTP method.
    pub method: HttpMethod,
    /// The absolute URL, including the query string.
    pub url: String,
    /// The final request headers.
    pub headers: Headers,
    /// The encoded body, if any.
    pub body: Option<String>,
}

/// The raw result of one HTTP exchange.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TransportResponse {
    /// The HTTP status code.
    pub status: u16,
    /// Response headers keyed by lower-cased name (headers may have multiple values).
    pub headers: HashMap<String, Vec<String>>,
    /// The raw response body.
    pub body: String,
}

impl TransportResponse {
    /// Returns the first value of a header, ignoring case.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .and_then(|values| values.first())
            .map(String::as_str)
    }
}

/// Executes a single HTTP request.
///
/// # Example
///
/// ```rust
/// use async_trait::async_trait;
/// use rest_dispatch::clients::{Transport, TransportError, TransportRequest, TransportResponse};
///
/// #[derive(Debug)]
/// struct Teapot;
///
/// #[async_trait]
/// impl Transport for Teapot {
///     async fn perform(
///         &self,
///         _request: TransportRequest,
///     ) -> Result<TransportResponse, TransportError> {
///         Ok(TransportResponse {
///             status: 418,
///             ..TransportResponse::default()
///         })
///     }
/// }
/// ```
#[async_trait]
pub trait Transport: std::fmt::Debug + Send + Sync {
    /// Sends `request` and returns the raw response.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError`] if no response could be obtained.
    async fn perform(&self, request: TransportRequest)
        -> Result<TransportResponse, TransportError>;
}

/// The default transport, backed by a [`reqwest::Client`].
///
/// Connection pooling lives in the inner client, which is safe to share
/// between concurrent requests.
#[derive(Clone, Debug)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    /// Creates a transport with reqwest's default settings.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError`] if the underlying client cannot be created
    /// (e.g., TLS initialization failure).
    pub fn new() -> Result<Self, TransportError> {
        Self::build(reqwest::Client::builder())
    }

    /// Creates a transport whose requests time out after `timeout`.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError`] if the underlying client cannot be created.
    pub fn with_timeout(timeout: Duration) -> Result<Self, TransportError> {
        Self::build(reqwest::Client::builder().timeout(timeout))
    }

    /// Wraps an existing [`reqwest::Client`].
    #[must_use]
    pub const fn from_client(client: reqwest::Client) -> Self {
        Self { client }
    }

    fn build(builder: reqwest::ClientBuilder) -> Result<Self, TransportError> {
        let client = builder.use_rustls_tls().build()?;
        Ok(Self { client })
    }

    /// Parses response headers into a `HashMap`.
    fn parse_response_headers(
        headers: &reqwest::header::HeaderMap,
    ) -> HashMap<String, Vec<String>> {
        let mut result: HashMap<String, Vec<String>> = HashMap::new();
        for (name, value) in headers {
            let key = name.as_str().to_lowercase();
            let value = String::from_utf8_lossy(value.as_bytes()).into_owned();
            result.entry(key).or_default().push(value);
        }
        result
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn perform(
        &self,
        request: TransportRequest,
    ) -> Result<TransportResponse, TransportError> {
        let mut req_builder = self.client.request(request.method.into(), &request.url);

        for (name, value) in &request.headers {
            req_builder = req_builder.header(name.as_str(), value.as_str());
        }

        if let Some(body) = request.body {
            req_builder = req_builder.body(body);
        }

        let res = req_builder.send().await?;

        let status = res.status().as_u16();
        let headers = Self::parse_response_headers(res.headers());
        let body = res.text().await?;

        Ok(TransportResponse {
            status,
            headers,
            body,
        })
    }
}

// Verify ReqwestTransport is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<ReqwestTransport>();
};
