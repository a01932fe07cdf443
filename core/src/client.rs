//! Generic JSON-RPC call primitive for the Zabbix API.
//!
//! # Design
//! `ZabbixClient` holds the endpoint, an optional session token and a request
//! id counter. Every call is split into `build_request` (produces an
//! `HttpRequest`) and `parse_response` (consumes an `HttpResponse`); the
//! `Transport` executes the round trip in between. Resource wrappers such as
//! `httptest_get` are built on `call_with_error` and `call_with_error_parse`.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::http::{HttpRequest, HttpResponse, Transport};
use crate::rpc::{self, RpcResponse};

pub const CONTENT_TYPE: &str = "application/json-rpc";

/// Synchronous client for the Zabbix JSON-RPC API.
#[derive(Debug)]
pub struct ZabbixClient<T> {
    endpoint: String,
    auth: Option<String>,
    transport: T,
    next_id: AtomicU64,
}

impl<T: Transport> ZabbixClient<T> {
    pub fn new(url: &str, transport: T) -> Self {
        Self::from_config(&ClientConfig::new(url), transport)
    }

    pub fn from_config(config: &ClientConfig, transport: T) -> Self {
        Self {
            endpoint: config.endpoint(),
            auth: config.auth.clone(),
            transport,
            next_id: AtomicU64::new(1),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn auth(&self) -> Option<&str> {
        self.auth.as_deref()
    }

    /// Replace the session token attached to subsequent calls.
    pub fn set_auth(&mut self, token: Option<String>) {
        self.auth = token;
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Build the HTTP request for one call, consuming a request id.
    pub fn build_request<P: Serialize>(&self, method: &str, params: P) -> Result<HttpRequest, ApiError> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let body = rpc::encode_request(method, params, self.auth.as_deref(), id)?;
        debug!(method, id, "zabbix rpc call");
        Ok(HttpRequest {
            url: self.endpoint.clone(),
            headers: vec![("content-type".to_string(), CONTENT_TYPE.to_string())],
            body,
        })
    }

    pub fn parse_response(&self, response: HttpResponse) -> Result<RpcResponse, ApiError> {
        if response.status != 200 {
            return Err(ApiError::HttpError {
                status: response.status,
                body: response.body,
            });
        }
        rpc::decode_response(&response.body)
    }

    /// Call `method` and return the raw response; a JSON-RPC error member
    /// becomes `ApiError::Rpc`.
    pub fn call_with_error<P: Serialize>(&self, method: &str, params: P) -> Result<RpcResponse, ApiError> {
        let request = self.build_request(method, params)?;
        let response = self.transport.execute(request)?;
        self.parse_response(response).inspect_err(|e| {
            if let ApiError::Rpc { code, message, .. } = e {
                warn!(method, code, message = %message, "zabbix rpc error");
            }
        })
    }

    /// Call `method` and decode `result` into `R`.
    pub fn call_with_error_parse<P: Serialize, R: DeserializeOwned>(
        &self,
        method: &str,
        params: P,
    ) -> Result<R, ApiError> {
        let response = self.call_with_error(method, params)?;
        serde_json::from_value(response.result).map_err(|e| ApiError::DeserializationError(e.to_string()))
    }
}
