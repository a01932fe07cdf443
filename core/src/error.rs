//! Error types for the Zabbix API client.
//!
//! # Design
//! Remote failures keep the JSON-RPC error object intact (`Rpc`) so callers
//! can branch on the numeric code. Results that decode as JSON but lack the
//! expected structure are reported as `MalformedResponse`, separate from
//! plain deserialization failures of the envelope itself. The two count
//! checks performed by the `httptest` wrappers get dedicated variants.

use std::fmt;

/// Errors returned by `ZabbixClient` and its resource wrappers.
#[derive(Debug)]
pub enum ApiError {
    /// The host transport failed before an HTTP response was produced.
    Transport(String),

    /// The endpoint answered with a non-200 HTTP status.
    HttpError { status: u16, body: String },

    /// The remote API returned a JSON-RPC error object.
    Rpc {
        code: i64,
        message: String,
        data: String,
    },

    /// The response body could not be deserialized into the expected type.
    DeserializationError(String),

    /// The request payload could not be serialized to JSON.
    SerializationError(String),

    /// The `result` member did not have the shape the operation expects.
    MalformedResponse(String),

    /// A lookup by identifier matched zero or several records.
    ExpectedOneResult(usize),

    /// The remote confirmed a different number of identifiers than were sent.
    ExpectedMore { expected: usize, actual: usize },

    /// Client configuration is missing or invalid.
    Config(String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Transport(msg) => write!(f, "transport failed: {msg}"),
            ApiError::HttpError { status, body } => {
                write!(f, "HTTP {status}: {body}")
            }
            ApiError::Rpc {
                code,
                message,
                data,
            } => {
                write!(f, "{code} ({message}): {data}")
            }
            ApiError::DeserializationError(msg) => {
                write!(f, "deserialization failed: {msg}")
            }
            ApiError::SerializationError(msg) => {
                write!(f, "serialization failed: {msg}")
            }
            ApiError::MalformedResponse(msg) => {
                write!(f, "malformed response: {msg}")
            }
            ApiError::ExpectedOneResult(got) => {
                write!(f, "expected exactly one result, got {got}")
            }
            ApiError::ExpectedMore { expected, actual } => {
                write!(f, "expected {expected} results, got {actual}")
            }
            ApiError::Config(msg) => write!(f, "invalid configuration: {msg}"),
        }
    }
}

impl std::error::Error for ApiError {}
