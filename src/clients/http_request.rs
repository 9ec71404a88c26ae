//! Request types for the dispatcher.
//!
//! This module provides [`RequestSpec`], the per-call description an
//! endpoint method hands to [`ApiClient::api_call`](crate::clients::ApiClient::api_call),
//! along with its builder and the [`HttpMethod`], [`Payload`] and
//! [`QueryValue`] types it is made of.

use std::fmt;

use indexmap::IndexMap;

use crate::clients::headers::{set_header, Headers};

/// HTTP methods the dispatcher can send.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    /// HTTP GET method for retrieving resources.
    Get,
    /// HTTP POST method for creating resources.
    Post,
    /// HTTP PUT method for replacing resources.
    Put,
    /// HTTP PATCH method for partially updating resources.
    Patch,
    /// HTTP DELETE method for removing resources.
    Delete,
    /// HTTP HEAD method.
    Head,
    /// HTTP OPTIONS method.
    Options,
}

impl HttpMethod {
    /// Returns the upper-case method token sent on the wire.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
            Self::Head => "HEAD",
            Self::Options => "OPTIONS",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<HttpMethod> for reqwest::Method {
    fn from(method: HttpMethod) -> Self {
        match method {
            HttpMethod::Get => Self::GET,
            HttpMethod::Post => Self::POST,
            HttpMethod::Put => Self::PUT,
            HttpMethod::Patch => Self::PATCH,
            HttpMethod::Delete => Self::DELETE,
            HttpMethod::Head => Self::HEAD,
            HttpMethod::Options => Self::OPTIONS,
        }
    }
}

/// A scalar query parameter value.
///
/// Only scalars are representable. Array and object encodings vary between
/// APIs (`a=1&a=2`, `a[]=1`, `a=1,2`) and would be added as new variants.
#[derive(Clone, Debug, PartialEq)]
pub enum QueryValue {
    /// A string value.
    String(String),
    /// An integer value.
    Integer(i64),
    /// A floating point value.
    Float(f64),
    /// A boolean value, sent as `true` or `false`.
    Bool(bool),
}

impl fmt::Display for QueryValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String(value) => f.write_str(value),
            Self::Integer(value) => write!(f, "{value}"),
            Self::Float(value) => write!(f, "{value}"),
            Self::Bool(value) => write!(f, "{value}"),
        }
    }
}

impl From<&str> for QueryValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for QueryValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<&String> for QueryValue {
    fn from(value: &String) -> Self {
        Self::String(value.clone())
    }
}

impl From<bool> for QueryValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<f64> for QueryValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

macro_rules! query_value_from_int {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for QueryValue {
                fn from(value: $ty) -> Self {
                    Self::Integer(i64::from(value))
                }
            }
        )*
    };
}

query_value_from_int!(i8, i16, i32, i64, u8, u16, u32);

/// A request body before encoding.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum Payload {
    /// No body.
    #[default]
    Empty,
    /// A mapping or sequence, encoded according to the request content type.
    Structured(serde_json::Value),
    /// A pre-serialized body, sent unchanged.
    Raw(String),
}

impl Payload {
    /// Returns `true` if this payload produces no body.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Empty => true,
            Self::Raw(body) => body.is_empty(),
            Self::Structured(_) => false,
        }
    }
}

impl From<serde_json::Value> for Payload {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Self::Empty,
            serde_json::Value::String(body) => Self::Raw(body),
            other => Self::Structured(other),
        }
    }
}

impl From<String> for Payload {
    fn from(body: String) -> Self {
        Self::Raw(body)
    }
}

impl From<&str> for Payload {
    fn from(body: &str) -> Self {
        Self::Raw(body.to_string())
    }
}

/// One API call as described by an endpoint method.
///
/// Use [`RequestSpec::builder`] to construct requests with the builder pattern.
///
/// # Example
///
/// ```rust
/// use rest_dispatch::clients::{HttpMethod, Payload, RequestSpec};
/// use serde_json::json;
///
/// let request = RequestSpec::builder(HttpMethod::Post, "/items")
///     .query_param("dry_run", true)
///     .payload(json!({"name": "widget"}))
///     .header("Idempotency-Key", "abc-123")
///     .build();
///
/// assert_eq!(request.method, HttpMethod::Post);
/// assert!(matches!(request.payload, Payload::Structured(_)));
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct RequestSpec {
    /// The HTTP method.
    pub method: HttpMethod,
    /// The path, relative to the client's base URL.
    pub path: String,
    /// Query parameters, in insertion order.
    pub query: IndexMap<String, QueryValue>,
    /// The request body.
    pub payload: Payload,
    /// Header overrides applied on top of the client's base headers, in
    /// insertion order. Names are unique ignoring case.
    pub headers: Headers,
}

impl RequestSpec {
    /// Creates a request with no query, payload, or header overrides.
    #[must_use]
    pub fn new(method: HttpMethod, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: IndexMap::new(),
            payload: Payload::Empty,
            headers: Headers::new(),
        }
    }

    /// Creates a new builder for constructing a `RequestSpec`.
    #[must_use]
    pub fn builder(method: HttpMethod, path: impl Into<String>) -> RequestSpecBuilder {
        RequestSpecBuilder {
            spec: Self::new(method, path),
        }
    }
}

/// Builder for constructing [`RequestSpec`] instances.
#[derive(Debug)]
pub struct RequestSpecBuilder {
    spec: RequestSpec,
}

impl RequestSpecBuilder {
    /// Adds a single query parameter.
    #[must_use]
    pub fn query_param(mut self, key: impl Into<String>, value: impl Into<QueryValue>) -> Self {
        self.spec.query.insert(key.into(), value.into());
        self
    }

    /// Adds a query parameter when `value` is `Some`.
    #[must_use]
    pub fn query_param_opt<V: Into<QueryValue>>(
        self,
        key: impl Into<String>,
        value: Option<V>,
    ) -> Self {
        match value {
            Some(value) => self.query_param(key, value),
            None => self,
        }
    }

    /// Replaces all query parameters at once.
    #[must_use]
    pub fn query(mut self, query: IndexMap<String, QueryValue>) -> Self {
        self.spec.query = query;
        self
    }

    /// Sets the request body.
    #[must_use]
    pub fn payload(mut self, payload: impl Into<Payload>) -> Self {
        self.spec.payload = payload.into();
        self
    }

    /// Adds a single header override.
    ///
    /// An existing override with the same name, in any case, is replaced.
    #[must_use]
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        set_header(&mut self.spec.headers, key, value);
        self
    }

    /// Replaces all header overrides at once.
    ///
    /// Pairs are applied in iteration order, so of two names differing only
    /// in case the later one is kept.
    #[must_use]
    pub fn headers<I, K, V>(mut self, headers: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.spec.headers.clear();
        for (key, value) in headers {
            set_header(&mut self.spec.headers, key, value);
        }
        self
    }

    /// Builds the [`RequestSpec`].
    #[must_use]
    pub fn build(self) -> RequestSpec {
        self.spec
    }
}
