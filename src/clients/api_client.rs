//! The request dispatcher.
//!
//! This module provides [`ApiClient`], the single entry point endpoint
//! methods call into. It composes headers, assembles the query string,
//! encodes the payload, hands the request to a [`Transport`], and normalizes
//! the response.

use std::sync::Arc;

use crate::auth::{AuthStrategy, NoAuth};
use crate::clients::encoding::encode_payload;
use crate::clients::errors::{DispatchError, TransportError};
use crate::clients::headers::{compose_headers, header_value, set_header};
use crate::clients::http_request::{HttpMethod, Payload, RequestSpec};
use crate::clients::http_response::{RawExchange, RawRequest, RawResponse, ResponseResult};
use crate::clients::query::append_query;
use crate::clients::transport::{ReqwestTransport, Transport, TransportRequest};
use crate::config::ClientConfig;

/// Dispatches API calls for one configured API.
///
/// The client is transport-faithful: it never retries, never follows
/// redirects on its own, and never turns a non-2xx status into an error.
///
/// # Thread Safety
///
/// `ApiClient` is `Send + Sync` and cheap to clone. Its configuration is
/// read-only, so concurrent calls share one instance without locking.
///
/// # Example
///
/// ```rust,ignore
/// use rest_dispatch::{ApiClient, BaseUrl, ClientConfig, HttpMethod, RequestSpec};
/// use rest_dispatch::auth::BearerAuth;
///
/// let config = ClientConfig::builder()
///     .base_url(BaseUrl::new("https://api.example.com")?)
///     .credential("token", "EXAMPLE_API_TOKEN", None::<String>)
///     .build()?;
///
/// let client = ApiClient::new(config, BearerAuth::new("token"))?;
///
/// let request = RequestSpec::builder(HttpMethod::Get, "/items")
///     .query_param("limit", 50)
///     .build();
///
/// let result = client.api_call(request).await?;
/// if result.is_success() {
///     println!("{:?}", result.data);
/// }
/// ```
#[derive(Clone, Debug)]
pub struct ApiClient {
    config: Arc<ClientConfig>,
    auth: Arc<dyn AuthStrategy>,
    transport: Arc<dyn Transport>,
}

// Verify ApiClient is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<ApiClient>();
};

impl ApiClient {
    /// Creates a client that sends requests with [`ReqwestTransport`].
    ///
    /// # Errors
    ///
    /// Returns [`TransportError`] if the HTTP client cannot be created.
    pub fn new(
        config: ClientConfig,
        auth: impl AuthStrategy + 'static,
    ) -> Result<Self, TransportError> {
        Ok(Self::with_transport(config, auth, ReqwestTransport::new()?))
    }

    /// Creates a client that sends requests through `transport`.
    #[must_use]
    pub fn with_transport(
        config: ClientConfig,
        auth: impl AuthStrategy + 'static,
        transport: impl Transport + 'static,
    ) -> Self {
        Self::from_parts(Arc::new(config), Arc::new(auth), Arc::new(transport))
    }

    /// Creates a client from shared parts.
    #[must_use]
    pub fn from_parts(
        config: Arc<ClientConfig>,
        auth: Arc<dyn AuthStrategy>,
        transport: Arc<dyn Transport>,
    ) -> Self {
        Self {
            config,
            auth,
            transport,
        }
    }

    /// Creates an unauthenticated client using [`ReqwestTransport`].
    ///
    /// # Errors
    ///
    /// Returns [`TransportError`] if the HTTP client cannot be created.
    pub fn unauthenticated(config: ClientConfig) -> Result<Self, TransportError> {
        Self::new(config, NoAuth)
    }

    /// Returns the client configuration.
    #[must_use]
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Dispatches one API call.
    ///
    /// Steps, in order: compose headers, append the query string, encode the
    /// payload with the resolved `Content-Type`, join the base URL, perform
    /// the request, normalize the response, and attach diagnostics when the
    /// client has `include_raw` enabled.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError::Encoding`] if the payload cannot be encoded
    /// (nothing is sent), or [`DispatchError::Transport`] if the transport
    /// fails before a response arrives (no body is parsed).
    pub async fn api_call(&self, request: RequestSpec) -> Result<ResponseResult, DispatchError> {
        let RequestSpec {
            method,
            path,
            query,
            payload,
            headers: overrides,
        } = request;

        let mut headers = compose_headers(&self.config, self.auth.as_ref(), &overrides);
        let resolved_path = append_query(&path, &query);

        let encoded = encode_payload(header_value(&headers, "Content-Type"), &payload)?;
        if let Some(content_type) = encoded.content_type {
            set_header(&mut headers, "Content-Type", content_type);
        }

        let url = self.config.base_url().join(&resolved_path);

        tracing::debug!(%method, %url, "Dispatching API request");

        let transport_request = TransportRequest {
            method,
            url,
            headers,
            body: encoded.body,
        };

        let raw_request = self.config.include_raw().then(|| RawRequest {
            method: transport_request.method,
            url: transport_request.url.clone(),
            headers: transport_request.headers.clone(),
            body: transport_request.body.clone(),
        });

        let response = match self.transport.perform(transport_request).await {
            Ok(response) => response,
            Err(error) => {
                tracing::debug!(%method, %path, %error, "Transport failed");
                return Err(error.into());
            }
        };

        tracing::debug!(%method, %path, status = response.status, "Received API response");

        let mut result = ResponseResult::from_transport(&response);

        if let Some(error) = &result.parse_error {
            tracing::warn!(
                "Response from {} {} declared {} but failed to parse: {}",
                method,
                path,
                error.content_type,
                error.message
            );
        }

        if let Some(request) = raw_request {
            result.raw = Some(RawExchange {
                request,
                response: RawResponse {
                    status: response.status,
                    headers: response.headers,
                    body: response.body,
                },
            });
        }

        Ok(result)
    }

    /// Sends a GET request.
    ///
    /// # Errors
    ///
    /// See [`api_call`](Self::api_call).
    pub async fn get(&self, path: impl Into<String>) -> Result<ResponseResult, DispatchError> {
        self.api_call(RequestSpec::new(HttpMethod::Get, path)).await
    }

    /// Sends a POST request with `payload`.
    ///
    /// # Errors
    ///
    /// See [`api_call`](Self::api_call).
    pub async fn post(
        &self,
        path: impl Into<String>,
        payload: impl Into<Payload>,
    ) -> Result<ResponseResult, DispatchError> {
        self.send_with_payload(HttpMethod::Post, path, payload).await
    }

    /// Sends a PUT request with `payload`.
    ///
    /// # Errors
    ///
    /// See [`api_call`](Self::api_call).
    pub async fn put(
        &self,
        path: impl Into<String>,
        payload: impl Into<Payload>,
    ) -> Result<ResponseResult, DispatchError> {
        self.send_with_payload(HttpMethod::Put, path, payload).await
    }

    /// Sends a PATCH request with `payload`.
    ///
    /// # Errors
    ///
    /// See [`api_call`](Self::api_call).
    pub async fn patch(
        &self,
        path: impl Into<String>,
        payload: impl Into<Payload>,
    ) -> Result<ResponseResult, DispatchError> {
        self.send_with_payload(HttpMethod::Patch, path, payload).await
    }

    /// Sends a DELETE request.
    ///
    /// # Errors
    ///
    /// See [`api_call`](Self::api_call).
    pub async fn delete(&self, path: impl Into<String>) -> Result<ResponseResult, DispatchError> {
        self.api_call(RequestSpec::new(HttpMethod::Delete, path)).await
    }

    async fn send_with_payload(
        &self,
        method: HttpMethod,
        path: impl Into<String>,
        payload: impl Into<Payload>,
    ) -> Result<ResponseResult, DispatchError> {
        let request = RequestSpec::builder(method, path).payload(payload).build();
        self.api_call(request).await
    }
}
