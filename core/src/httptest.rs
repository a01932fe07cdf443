//! Web scenario (`httptest`) records and their API wrappers.
//!
//! # Design
//! Records mirror the remote object: every field has an explicit wire key and
//! optional fields are left out of the encoded form when empty. `steps` is
//! always sent because the remote API requires it on create.
//!
//! Identifiers returned by `httptest.create` and `httptest.delete` are decoded
//! into a typed `HttpTestIds` and checked against the number of records sent
//! before any record is touched, so a failed call never leaves a collection
//! half reconciled.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

use crate::client::ZabbixClient;
use crate::error::ApiError;
use crate::http::Transport;
use crate::types::{Params, TemplateId};

/// A web scenario: a named, ordered sequence of HTTP steps run against a host.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct HttpTest {
    /// Empty until the record has been created remotely.
    #[serde(rename = "httptestid", default, skip_serializing_if = "String::is_empty")]
    pub http_test_id: String,
    #[serde(rename = "hostid", default, skip_serializing_if = "String::is_empty")]
    pub host_id: String,
    /// Templates to unlink and clear on update.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub templates_clear: Vec<TemplateId>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[serde(default)]
    pub steps: Vec<Step>,
}

impl HttpTest {
    pub fn new(name: &str, host_id: &str) -> Self {
        Self {
            name: name.to_string(),
            host_id: host_id.to_string(),
            ..Self::default()
        }
    }

    /// Append a step, numbering it after the steps already present.
    pub fn with_step(mut self, mut step: Step) -> Self {
        if step.no.is_empty() {
            step.no = (self.steps.len() + 1).to_string();
        }
        self.steps.push(step);
        self
    }

    pub fn is_persisted(&self) -> bool {
        !self.http_test_id.is_empty()
    }
}

/// One HTTP request within a scenario.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Step {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub url: String,
    /// Comma separated list or ranges, e.g. `"200,301-302"`.
    #[serde(default)]
    pub status_codes: String,
    /// `"0"` or `"1"`.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub follow_redirects: String,
    /// Position of the step within its scenario, starting at `"1"`.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub no: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub headers: Vec<Header>,
}

impl Step {
    pub fn new(name: &str, url: &str) -> Self {
        Self {
            name: name.to_string(),
            url: url.to_string(),
            ..Self::default()
        }
    }

    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.headers.push(Header {
            name: name.to_string(),
            value: value.to_string(),
        });
        self
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Header {
    pub name: String,
    pub value: String,
}

/// `result` of `httptest.create`, `httptest.update` and `httptest.delete`.
#[derive(Debug, Clone, Deserialize)]
struct HttpTestIds {
    httptestids: Vec<String>,
}

/// Copy identifiers assigned by `httptest.create` into `tests` by position.
///
/// Nothing is written unless `ids` has exactly one non-empty entry per
/// record.
pub fn reconcile_created(tests: &mut [HttpTest], ids: &[String]) -> Result<(), ApiError> {
    check_count(tests.len(), ids.len())?;
    if let Some(pos) = ids.iter().position(|id| id.is_empty()) {
        return Err(ApiError::MalformedResponse(format!(
            "empty httptestid at position {pos}"
        )));
    }
    for (test, id) in tests.iter_mut().zip(ids) {
        test.http_test_id = id.clone();
    }
    Ok(())
}

/// Mark every record as no longer persisted.
pub fn reconcile_deleted(tests: &mut [HttpTest]) {
    for test in tests {
        test.http_test_id.clear();
    }
}

fn check_count(expected: usize, actual: usize) -> Result<(), ApiError> {
    if expected != actual {
        warn!(expected, actual, "httptest id count mismatch");
        return Err(ApiError::ExpectedMore { expected, actual });
    }
    Ok(())
}

impl<T: Transport> ZabbixClient<T> {
    /// Wrapper for `httptest.get`. `output` defaults to `"extend"`.
    pub fn httptest_get(&self, mut params: Params) -> Result<Vec<HttpTest>, ApiError> {
        params
            .entry("output")
            .or_insert_with(|| Value::from("extend"));
        self.call_with_error_parse("httptest.get", params)
    }

    /// Fetch one scenario, steps included. Fails unless exactly one record
    /// matches `id`.
    pub fn httptest_get_by_id(&self, id: &str) -> Result<HttpTest, ApiError> {
        let mut params = Params::new();
        params.insert("httptestids".to_string(), Value::from(id));
        params.insert("selectSteps".to_string(), Value::from("extend"));

        let mut tests = self.httptest_get(params)?;
        match tests.len() {
            1 => Ok(tests.remove(0)),
            n => Err(ApiError::ExpectedOneResult(n)),
        }
    }

    /// Wrapper for `httptest.create`. On success every record in `tests`
    /// carries its new identifier; the assigned identifiers are also
    /// returned in input order.
    pub fn httptest_create(&self, tests: &mut [HttpTest]) -> Result<Vec<String>, ApiError> {
        let response = self.call_with_error("httptest.create", &*tests)?;
        let HttpTestIds { httptestids } = response.decode_result()?;
        reconcile_created(tests, &httptestids)?;
        Ok(httptestids)
    }

    /// Wrapper for `httptest.update`. Records must already be persisted.
    pub fn httptest_update(&self, tests: &[HttpTest]) -> Result<(), ApiError> {
        self.call_with_error("httptest.update", tests)?;
        Ok(())
    }

    /// Delete `tests` remotely and clear their identifiers.
    pub fn httptest_delete(&self, tests: &mut [HttpTest]) -> Result<(), ApiError> {
        let ids: Vec<String> = tests.iter().map(|t| t.http_test_id.clone()).collect();
        self.httptest_delete_by_ids(&ids)?;
        reconcile_deleted(tests);
        Ok(())
    }

    /// Wrapper for `httptest.delete`. Only the number of confirmed
    /// identifiers is checked, not their values.
    pub fn httptest_delete_by_ids(&self, ids: &[String]) -> Result<Vec<String>, ApiError> {
        let response = self.call_with_error("httptest.delete", ids)?;
        let HttpTestIds { httptestids } = response.decode_result()?;
        check_count(ids.len(), httptestids.len())?;
        Ok(httptestids)
    }
}
