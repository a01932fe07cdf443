//! HTTP transport types for the host-does-IO pattern.
//!
//! # Design
//! Requests and responses are plain data. The core builds an `HttpRequest`
//! for every JSON-RPC call and hands it to a `Transport` supplied by the
//! caller; the core itself never opens a socket. Tests plug in a scripted
//! transport, applications plug in whatever HTTP client they already use.
//!
//! The Zabbix API is a single JSON-RPC endpoint, so every request is a POST.

use crate::error::ApiError;

/// An HTTP POST described as plain data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

/// An HTTP response described as plain data.
///
/// Produced by a `Transport` after executing an `HttpRequest`.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

/// Executes HTTP round trips on behalf of `ZabbixClient`.
///
/// Implementations should return non-2xx responses as data; only failures
/// that prevent a response from existing belong in `Err`, usually as
/// `ApiError::Transport`.
pub trait Transport {
    fn execute(&self, request: HttpRequest) -> Result<HttpResponse, ApiError>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn execute(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        (**self).execute(request)
    }
}
