//! Synchronous client core for the Zabbix JSON-RPC API.
//!
//! # Overview
//! Typed records and CRUD wrappers for the web scenario (`httptest`)
//! resource, built on a generic JSON-RPC call primitive. The caller supplies
//! a `Transport` that executes HTTP round trips (host-does-IO pattern), so
//! the core stays deterministic and testable.
//!
//! # Design
//! - `ZabbixClient` owns only the endpoint, an optional session token and a
//!   request id counter.
//! - `call_with_error` / `call_with_error_parse` are the single path to the
//!   remote API; resource wrappers add typed decoding and reconciliation.
//! - Records are defined independently from the mock-server crate;
//!   integration tests catch schema drift.

pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod httptest;
pub mod rpc;
pub mod types;

#[cfg(test)]
mod testing;

pub use client::ZabbixClient;
pub use config::ClientConfig;
pub use error::ApiError;
pub use http::{HttpRequest, HttpResponse, Transport};
pub use httptest::{reconcile_created, reconcile_deleted, Header, HttpTest, Step};
pub use rpc::RpcResponse;
pub use types::{Params, TemplateId};
