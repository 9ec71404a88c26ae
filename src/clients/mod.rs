//! Request dispatch for REST API clients.
//!
//! This module holds the pipeline every endpoint method goes through:
//! header composition, query assembly, payload encoding, the transport call,
//! and response normalization.
//!
//! # Overview
//!
//! The main types in this module are:
//!
//! - [`ApiClient`]: The dispatcher endpoint methods call into
//! - [`RequestSpec`]: One API call as described by an endpoint method
//! - [`ResponseResult`]: The uniform result of every call
//! - [`HttpMethod`], [`Payload`], [`QueryValue`]: The parts of a request
//! - [`Transport`] and [`ReqwestTransport`]: The HTTP primitive and its default implementation
//! - [`DispatchError`]: Errors returned by [`ApiClient::api_call`]
//!
//! # Example
//!
//! ```rust,ignore
//! use rest_dispatch::clients::{ApiClient, HttpMethod, RequestSpec};
//! use serde_json::json;
//!
//! // One endpoint method of a hand-written client
//! async fn create_item(client: &ApiClient, name: &str) -> Result<ResponseResult, DispatchError> {
//!     let request = RequestSpec::builder(HttpMethod::Post, "/items")
//!         .payload(json!({ "name": name }))
//!         .build();
//!     client.api_call(request).await
//! }
//! ```

mod api_client;
mod encoding;
mod errors;
mod headers;
mod http_request;
mod http_response;
mod query;
mod transport;

pub use api_client::ApiClient;
pub use encoding::{
    encode_payload, is_json, normalize_content_type, ContentKind, EncodedBody, FORM_URLENCODED,
    MULTIPART_FORM_DATA,
};
pub use errors::{
    DispatchError, EncodingError, ResponseParseError, TransportError, TransportErrorKind,
};
pub use headers::{
    compose_headers, default_headers, header_value, set_header, Headers, DEFAULT_MEDIA_TYPE,
};
pub use http_request::{HttpMethod, Payload, QueryValue, RequestSpec, RequestSpecBuilder};
pub use http_response::{RawExchange, RawRequest, RawResponse, ResponseData, ResponseResult};
pub use query::append_query;
pub use transport::{ReqwestTransport, Transport, TransportRequest, TransportResponse};
