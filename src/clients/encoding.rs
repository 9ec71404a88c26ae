//! Payload encoding.
//!
//! A request body is encoded according to the request's `Content-Type`. The
//! content type is normalized (parameters dropped, lower-cased), classified
//! into a [`ContentKind`], and the matching entry of a small dispatch table
//! encodes structured payloads. Pre-serialized strings always pass through
//! unchanged, and empty payloads never produce a body.
//!
//! The encoder does not look at the HTTP method. A GET with a payload is
//! sent with a body.

use rand::distributions::Alphanumeric;
use rand::Rng;
use serde_json::Value;

use crate::clients::errors::EncodingError;
use crate::clients::http_request::Payload;

/// The form content type.
pub const FORM_URLENCODED: &str = "application/x-www-form-urlencoded";

/// The multipart content type.
pub const MULTIPART_FORM_DATA: &str = "multipart/form-data";

/// Length of generated multipart boundary tokens.
const BOUNDARY_TOKEN_LEN: usize = 24;

/// Encoding families recognized by the encoder.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ContentKind {
    /// `application/json`, `text/json`, and any `+json` suffix type.
    Json,
    /// `application/x-www-form-urlencoded`.
    FormUrlEncoded,
    /// `multipart/form-data`.
    Multipart,
    /// Anything else.
    Other,
}

impl ContentKind {
    /// Classifies a `Content-Type` header value.
    #[must_use]
    pub fn of(content_type: &str) -> Self {
        let normalized = normalize_content_type(content_type);
        match normalized.as_str() {
            "application/json" | "text/json" => Self::Json,
            FORM_URLENCODED => Self::FormUrlEncoded,
            MULTIPART_FORM_DATA => Self::Multipart,
            other if other.ends_with("+json") => Self::Json,
            _ => Self::Other,
        }
    }
}

/// Strips parameters and whitespace from a content type and lower-cases it.
#[must_use]
pub fn normalize_content_type(content_type: &str) -> String {
    content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase()
}

/// Returns `true` if `content_type` is a JSON-family type.
#[must_use]
pub fn is_json(content_type: &str) -> bool {
    ContentKind::of(content_type) == ContentKind::Json
}

/// The wire form of a payload.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EncodedBody {
    /// The serialized body, or `None` when nothing should be sent.
    pub body: Option<String>,
    /// A replacement `Content-Type`, set when encoding changed it (e.g. a
    /// generated multipart boundary).
    pub content_type: Option<String>,
}

impl EncodedBody {
    fn body(body: String) -> Self {
        Self {
            body: Some(body),
            content_type: None,
        }
    }
}

type EncodeFn = fn(&str, &Value) -> Result<EncodedBody, EncodingError>;

/// Encoders for structured payloads, keyed by content kind.
const ENCODERS: &[(ContentKind, EncodeFn)] = &[
    (ContentKind::Json, encode_json),
    (ContentKind::FormUrlEncoded, encode_form_urlencoded),
    (ContentKind::Multipart, encode_multipart),
];

/// Encodes `payload` for `content_type`.
///
/// A missing content type is treated as JSON.
///
/// # Errors
///
/// Returns [`EncodingError`] when a structured payload cannot be expressed in
/// the content type: a non-mapping or nested value under a form type, or any
/// structured payload under a type with no encoder.
///
/// # Example
///
/// ```rust
/// use rest_dispatch::clients::{encode_payload, Payload};
/// use serde_json::json;
///
/// let payload = Payload::Structured(json!({"name": "a b", "id": 5}));
/// let encoded = encode_payload(Some("application/x-www-form-urlencoded"), &payload).unwrap();
/// assert_eq!(encoded.body.as_deref(), Some("name=a%20b&id=5"));
/// ```
pub fn encode_payload(
    content_type: Option<&str>,
    payload: &Payload,
) -> Result<EncodedBody, EncodingError> {
    if payload.is_empty() {
        return Ok(EncodedBody::default());
    }

    let value = match payload {
        Payload::Structured(value) => value,
        Payload::Raw(body) => return Ok(EncodedBody::body(body.clone())),
        Payload::Empty => return Ok(EncodedBody::default()),
    };

    let content_type = content_type.unwrap_or("application/json");
    let kind = ContentKind::of(content_type);

    let encoder = ENCODERS
        .iter()
        .find(|(entry, _)| *entry == kind)
        .map(|(_, encoder)| *encoder)
        .ok_or_else(|| EncodingError::UnsupportedContentType {
            content_type: normalize_content_type(content_type),
        })?;

    encoder(content_type, value)
}

fn encode_json(_content_type: &str, value: &Value) -> Result<EncodedBody, EncodingError> {
    Ok(EncodedBody::body(serde_json::to_string(value)?))
}

fn encode_form_urlencoded(
    content_type: &str,
    value: &Value,
) -> Result<EncodedBody, EncodingError> {
    let fields = form_fields(content_type, value)?;
    let body = fields
        .iter()
        .map(|(name, value)| {
            format!(
                "{}={}",
                urlencoding::encode(name),
                urlencoding::encode(value)
            )
        })
        .collect::<Vec<_>>()
        .join("&");
    Ok(EncodedBody::body(body))
}

fn encode_multipart(content_type: &str, value: &Value) -> Result<EncodedBody, EncodingError> {
    let fields = form_fields(content_type, value)?;

    let (boundary, effective_content_type) = match boundary_param(content_type) {
        Some(boundary) => (boundary, None),
        None => {
            let boundary = generate_boundary();
            let header = format!("{MULTIPART_FORM_DATA}; boundary={boundary}");
            (boundary, Some(header))
        }
    };

    let mut body = String::new();
    for (name, value) in &fields {
        if name.contains(&boundary) || value.contains(&boundary) {
            return Err(EncodingError::BoundaryInContent {
                field: name.clone(),
                boundary,
            });
        }
        body.push_str(&format!("--{boundary}\r\n"));
        body.push_str(&format!(
            "Content-Disposition: form-data; name=\"{}\"\r\n\r\n",
            escape_field_name(name)
        ));
        body.push_str(value);
        body.push_str("\r\n");
    }
    body.push_str(&format!("--{boundary}--\r\n"));

    Ok(EncodedBody {
        body: Some(body),
        content_type: effective_content_type,
    })
}

/// Percent-encodes the characters that would break out of a quoted
/// `Content-Disposition` parameter.
fn escape_field_name(name: &str) -> String {
    name.replace('"', "%22")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}

/// Flattens a mapping payload into scalar form fields, in mapping order.
fn form_fields(content_type: &str, value: &Value) -> Result<Vec<(String, String)>, EncodingError> {
    let Value::Object(map) = value else {
        return Err(EncodingError::NotAMapping {
            content_type: normalize_content_type(content_type),
        });
    };

    map.iter()
        .map(|(name, value)| {
            let rendered = match value {
                Value::String(s) => s.clone(),
                Value::Number(n) => n.to_string(),
                Value::Bool(b) => b.to_string(),
                Value::Null => String::new(),
                Value::Array(_) | Value::Object(_) => {
                    return Err(EncodingError::NestedFormValue {
                        field: name.clone(),
                        content_type: normalize_content_type(content_type),
                    })
                }
            };
            Ok((name.clone(), rendered))
        })
        .collect()
}

/// Extracts the `boundary` parameter from a multipart content type.
fn boundary_param(content_type: &str) -> Option<String> {
    content_type.split(';').skip(1).find_map(|param| {
        let (key, value) = param.split_once('=')?;
        if key.trim().eq_ignore_ascii_case("boundary") {
            let value = value.trim().trim_matches('"');
            (!value.is_empty()).then(|| value.to_string())
        } else {
            None
        }
    })
}

fn generate_boundary() -> String {
    let token: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(BOUNDARY_TOKEN_LEN)
        .map(char::from)
        .collect();
    format!("----rest-dispatch-{token}")
}
