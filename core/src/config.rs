//! Client configuration.

use serde::Deserialize;

use crate::error::ApiError;

pub const URL_ENV: &str = "ZABBIX_URL";
pub const AUTH_ENV: &str = "ZABBIX_AUTH";

/// Where the API lives and which session token to attach to calls.
///
/// `url` may be the frontend base URL or the full `api_jsonrpc.php` endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ClientConfig {
    pub url: String,
    #[serde(default)]
    pub auth: Option<String>,
}

impl ClientConfig {
    pub fn new(url: &str) -> Self {
        Self {
            url: url.to_string(),
            auth: None,
        }
    }

    pub fn with_auth(mut self, token: &str) -> Self {
        self.auth = Some(token.to_string());
        self
    }

    /// Read `ZABBIX_URL` and, if set, `ZABBIX_AUTH`.
    pub fn from_env() -> Result<Self, ApiError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ApiError> {
        let url = lookup(URL_ENV)
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| ApiError::Config(format!("{URL_ENV} is not set")))?;
        let auth = lookup(AUTH_ENV).filter(|v| !v.is_empty());
        Ok(Self { url, auth })
    }

    /// The JSON-RPC endpoint derived from `url`.
    pub fn endpoint(&self) -> String {
        let base = self.url.trim_end_matches('/');
        if base.ends_with("api_jsonrpc.php") {
            base.to_string()
        } else {
            format!("{base}/api_jsonrpc.php")
        }
    }
}
