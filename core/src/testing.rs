use std::cell::RefCell;
use std::collections::VecDeque;

use serde_json::{json, Value};

use crate::error::ApiError;
use crate::http::{HttpRequest, HttpResponse, Transport};

/// Replays queued responses in order and records every request it sees.
/// An empty queue behaves like an unreachable host.
#[derive(Default)]
pub(crate) struct ScriptedTransport {
    responses: RefCell<VecDeque<HttpResponse>>,
    requests: RefCell<Vec<HttpRequest>>,
}

impl ScriptedTransport {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push_response(&self, status: u16, body: &str) {
        self.responses.borrow_mut().push_back(HttpResponse {
            status,
            headers: Vec::new(),
            body: body.to_string(),
        });
    }

    pub(crate) fn push_result(&self, result: Value) {
        let body = json!({"jsonrpc": "2.0", "result": result, "id": 1});
        self.push_response(200, &body.to_string());
    }

    pub(crate) fn push_rpc_error(&self, code: i64, message: &str, data: &str) {
        let body = json!({
            "jsonrpc": "2.0",
            "error": {"code": code, "message": message, "data": data},
            "id": 1,
        });
        self.push_response(200, &body.to_string());
    }

    pub(crate) fn request_count(&self) -> usize {
        self.requests.borrow().len()
    }

    /// Decoded JSON-RPC body of the most recent request.
    pub(crate) fn last_body(&self) -> Value {
        let requests = self.requests.borrow();
        let last = requests.last().expect("no request was sent");
        serde_json::from_str(&last.body).expect("request body is JSON")
    }
}

impl Transport for ScriptedTransport {
    fn execute(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        self.requests.borrow_mut().push(request);
        self.responses
            .borrow_mut()
            .pop_front()
            .ok_or_else(|| ApiError::Transport("connection refused".to_string()))
    }
}
