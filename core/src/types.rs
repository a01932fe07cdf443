//! Types shared by every resource wrapper.
//!
//! # Design
//! Filter parameters stay an open JSON map: the remote API accepts dozens of
//! per-method options and the wrappers only ever inspect `output`.

use serde::{Deserialize, Serialize};

/// Options passed to a `*.get` method.
pub type Params = serde_json::Map<String, serde_json::Value>;

/// Reference to a template by identifier, encoded as `{"templateid": "..."}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct TemplateId {
    #[serde(rename = "templateid")]
    pub template_id: String,
}

impl TemplateId {
    pub fn new(id: &str) -> Self {
        Self {
            template_id: id.to_string(),
        }
    }
}
