//! Response types for the dispatcher.
//!
//! Every endpoint method returns the same shape, [`ResponseResult`],
//! whatever the API's own response format is.

use std::collections::HashMap;

use serde::de::DeserializeOwned;

use crate::clients::encoding;
use crate::clients::errors::ResponseParseError;
use crate::clients::headers::Headers;
use crate::clients::http_request::HttpMethod;
use crate::clients::transport::TransportResponse;

/// A parsed response body.
#[derive(Clone, Debug, PartialEq)]
pub enum ResponseData {
    /// A JSON-family body that parsed successfully.
    Json(serde_json::Value),
    /// Any other body, kept as text. Also used when a JSON body fails to
    /// parse, and for empty bodies.
    Text(String),
}

impl ResponseData {
    /// Returns the JSON value, if the body was parsed as JSON.
    #[must_use]
    pub const fn as_json(&self) -> Option<&serde_json::Value> {
        match self {
            Self::Json(value) => Some(value),
            Self::Text(_) => None,
        }
    }

    /// Returns the text body, if the body was kept as text.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Json(_) => None,
            Self::Text(text) => Some(text),
        }
    }
}

/// The request as it was handed to the transport.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RawRequest {
    /// The HTTP method.
    pub method: HttpMethod,
    /// The absolute URL that was dispatched.
    pub url: String,
    /// The final request headers.
    pub headers: Headers,
    /// The encoded body, if any.
    pub body: Option<String>,
}

/// The response as it came back from the transport.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RawResponse {
    /// The HTTP status code.
    pub status: u16,
    /// Response headers keyed by lower-cased name.
    pub headers: HashMap<String, Vec<String>>,
    /// The unparsed body.
    pub body: String,
}

/// Diagnostics attached to a [`ResponseResult`] when the client was built
/// with `include_raw(true)`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RawExchange {
    /// The resolved request.
    pub request: RawRequest,
    /// The raw response.
    pub response: RawResponse,
}

/// The uniform result of an API call.
///
/// Non-2xx responses are returned here like any other; check
/// [`status_code`](Self::status_code) or [`is_success`](Self::is_success).
///
/// # Example
///
/// ```rust
/// use rest_dispatch::clients::{ResponseData, ResponseResult};
/// use std::collections::HashMap;
/// use serde_json::json;
///
/// let result = ResponseResult::new(404, HashMap::new(), ResponseData::Json(json!({"error": "missing"})));
/// assert!(!result.is_success());
/// assert_eq!(result.data.as_json().unwrap()["error"], "missing");
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct ResponseResult {
    /// The HTTP status code.
    pub status_code: u16,
    /// Response headers keyed by lower-cased name.
    pub headers: HashMap<String, Vec<String>>,
    /// The parsed body.
    pub data: ResponseData,
    /// Set when a body declared as JSON failed to parse.
    pub parse_error: Option<ResponseParseError>,
    /// Request/response diagnostics, present only when enabled on the client.
    pub raw: Option<RawExchange>,
}

impl ResponseResult {
    /// Creates a result without a parse error or diagnostics.
    #[must_use]
    pub const fn new(
        status_code: u16,
        headers: HashMap<String, Vec<String>>,
        data: ResponseData,
    ) -> Self {
        Self {
            status_code,
            headers,
            data,
            parse_error: None,
            raw: None,
        }
    }

    /// Normalizes a transport response, parsing the body by its
    /// `Content-Type`.
    ///
    /// JSON-family bodies are parsed into [`ResponseData::Json`]. When that
    /// fails, the body is kept as [`ResponseData::Text`] and
    /// [`parse_error`](Self::parse_error) is set. Empty bodies and every
    /// other content type are kept as text.
    #[must_use]
    pub fn from_transport(response: &TransportResponse) -> Self {
        let content_type = response.header("content-type").unwrap_or_default();

        let (data, parse_error) = if encoding::is_json(content_type)
            && !response.body.trim().is_empty()
        {
            match serde_json::from_str(&response.body) {
                Ok(value) => (ResponseData::Json(value), None),
                Err(e) => (
                    ResponseData::Text(response.body.clone()),
                    Some(ResponseParseError {
                        content_type: content_type.to_string(),
                        message: e.to_string(),
                    }),
                ),
            }
        } else {
            (ResponseData::Text(response.body.clone()), None)
        };

        Self {
            status_code: response.status,
            headers: response.headers.clone(),
            data,
            parse_error,
            raw: None,
        }
    }

    /// Returns `true` if the status code is in the 2xx range.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.status_code >= 200 && self.status_code <= 299
    }

    /// Returns the first value of a response header, ignoring case.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .and_then(|values| values.first())
            .map(String::as_str)
    }

    /// Returns the `X-Request-Id` header value, if present.
    #[must_use]
    pub fn request_id(&self) -> Option<&str> {
        self.header("x-request-id")
    }

    /// Deserializes the JSON body into `T`.
    ///
    /// # Errors
    ///
    /// Returns a [`serde_json::Error`] if the body was not JSON or does not
    /// match `T`.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        match &self.data {
            ResponseData::Json(value) => T::deserialize(value),
            ResponseData::Text(text) => serde_json::from_str(text),
        }
    }

    /// Returns the body as text, re-serializing JSON bodies.
    #[must_use]
    pub fn text(&self) -> String {
        match &self.data {
            ResponseData::Json(value) => value.to_string(),
            ResponseData::Text(text) => text.clone(),
        }
    }
}
