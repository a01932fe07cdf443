use std::{collections::BTreeMap, sync::Arc};

use axum::{extract::State, routing::post, Json, Router};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::{net::TcpListener, sync::RwLock};
use tracing::info;

pub const API_PATH: &str = "/api_jsonrpc.php";

const NO_OBJECT: &str = "No permissions to referred object or it does not exist!";

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Header {
    pub name: String,
    pub value: String,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Step {
    pub name: String,
    pub url: String,
    #[serde(default)]
    pub status_codes: String,
    #[serde(default)]
    pub follow_redirects: String,
    #[serde(default)]
    pub no: String,
    #[serde(default)]
    pub headers: Vec<Header>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct HttpTest {
    pub httptestid: String,
    pub hostid: String,
    pub name: String,
    pub description: String,
    pub steps: Vec<Step>,
}

#[derive(Deserialize)]
pub struct CreateHttpTest {
    #[serde(default)]
    pub hostid: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub steps: Vec<Step>,
}

#[derive(Deserialize)]
pub struct UpdateHttpTest {
    pub httptestid: String,
    pub name: Option<String>,
    pub description: Option<String>,
    pub steps: Option<Vec<Step>>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany<T> {
    Many(Vec<T>),
    One(T),
}

impl<T> OneOrMany<T> {
    fn into_vec(self) -> Vec<T> {
        match self {
            OneOrMany::Many(v) => v,
            OneOrMany::One(t) => vec![t],
        }
    }
}

#[derive(Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GetParams {
    output: Option<Value>,
    httptestids: Option<OneOrMany<String>>,
    hostids: Option<OneOrMany<String>>,
    select_steps: Option<Value>,
}

#[derive(Deserialize)]
struct RpcRequest {
    method: String,
    #[serde(default)]
    params: Value,
    #[serde(default)]
    id: Value,
}

#[derive(Debug)]
struct RpcError {
    code: i64,
    message: &'static str,
    data: String,
}

impl RpcError {
    fn invalid_params(data: impl Into<String>) -> Self {
        Self {
            code: -32602,
            message: "Invalid params.",
            data: data.into(),
        }
    }
}

#[derive(Default)]
pub struct Store {
    last_id: u64,
    tests: BTreeMap<u64, HttpTest>,
}

pub type Db = Arc<RwLock<Store>>;

pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(Store::default()));
    Router::new().route(API_PATH, post(rpc)).with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

async fn rpc(State(db): State<Db>, body: String) -> Json<Value> {
    let request: RpcRequest = match serde_json::from_str(&body) {
        Ok(r) => r,
        Err(e) => {
            let error = RpcError {
                code: -32700,
                message: "Parse error.",
                data: e.to_string(),
            };
            return Json(envelope(Err(error), Value::Null));
        }
    };
    info!(method = %request.method, "dispatch");

    let mut store = db.write().await;
    let outcome = match request.method.as_str() {
        "httptest.get" => store.get(request.params),
        "httptest.create" => store.create(request.params),
        "httptest.update" => store.update(request.params),
        "httptest.delete" => store.delete(request.params),
        other => Err(RpcError {
            code: -32601,
            message: "Method not found.",
            data: format!("Incorrect method \"{other}\"."),
        }),
    };
    Json(envelope(outcome, request.id))
}

fn envelope(outcome: Result<Value, RpcError>, id: Value) -> Value {
    match outcome {
        Ok(result) => json!({"jsonrpc": "2.0", "result": result, "id": id}),
        Err(e) => json!({
            "jsonrpc": "2.0",
            "error": {"code": e.code, "message": e.message, "data": e.data},
            "id": id,
        }),
    }
}

fn decode<T: serde::de::DeserializeOwned>(params: Value) -> Result<T, RpcError> {
    serde_json::from_value(params).map_err(|e| RpcError::invalid_params(e.to_string()))
}

fn ids_result(ids: Vec<String>) -> Value {
    json!({ "httptestids": ids })
}

fn number_steps(steps: &mut [Step]) {
    for (i, step) in steps.iter_mut().enumerate() {
        if step.no.is_empty() {
            step.no = (i + 1).to_string();
        }
    }
}

impl Store {
    fn lookup(&self, id: &str) -> Option<u64> {
        id.parse().ok().filter(|key| self.tests.contains_key(key))
    }

    fn name_taken(&self, hostid: &str, name: &str, except: Option<u64>) -> bool {
        self.tests
            .iter()
            .any(|(key, t)| Some(*key) != except && t.hostid == hostid && t.name == name)
    }

    fn get(&self, params: Value) -> Result<Value, RpcError> {
        let params: GetParams = if params.is_null() {
            GetParams::default()
        } else {
            decode(params)?
        };
        let ids = params.httptestids.map(OneOrMany::into_vec);
        let hosts = params.hostids.map(OneOrMany::into_vec);

        let mut out = Vec::new();
        for test in self.tests.values() {
            if ids.as_ref().is_some_and(|ids| !ids.contains(&test.httptestid)) {
                continue;
            }
            if hosts.as_ref().is_some_and(|hosts| !hosts.contains(&test.hostid)) {
                continue;
            }
            let Value::Object(mut fields) = json!(test) else {
                continue;
            };
            if params.select_steps.is_none() {
                fields.remove("steps");
            }
            if let Some(Value::Array(wanted)) = &params.output {
                let wanted: Vec<&str> = wanted.iter().filter_map(Value::as_str).collect();
                fields.retain(|key, _| key == "httptestid" || key == "steps" || wanted.contains(&key.as_str()));
            }
            out.push(Value::Object(fields));
        }
        Ok(Value::Array(out))
    }

    fn create(&mut self, params: Value) -> Result<Value, RpcError> {
        let inputs = decode::<OneOrMany<CreateHttpTest>>(params)?.into_vec();
        for (i, input) in inputs.iter().enumerate() {
            if input.name.is_empty() {
                return Err(RpcError::invalid_params("Incorrect value for field \"name\": cannot be empty."));
            }
            if input.hostid.is_empty() {
                return Err(RpcError::invalid_params("Incorrect value for field \"hostid\": cannot be empty."));
            }
            let repeated = inputs[..i]
                .iter()
                .any(|other| other.hostid == input.hostid && other.name == input.name);
            if repeated || self.name_taken(&input.hostid, &input.name, None) {
                return Err(RpcError::invalid_params(format!(
                    "Web scenario \"{}\" already exists.",
                    input.name
                )));
            }
        }

        let mut ids = Vec::with_capacity(inputs.len());
        for input in inputs {
            self.last_id += 1;
            let mut steps = input.steps;
            number_steps(&mut steps);
            let test = HttpTest {
                httptestid: self.last_id.to_string(),
                hostid: input.hostid,
                name: input.name,
                description: input.description,
                steps,
            };
            ids.push(test.httptestid.clone());
            self.tests.insert(self.last_id, test);
        }
        Ok(ids_result(ids))
    }

    fn update(&mut self, params: Value) -> Result<Value, RpcError> {
        let inputs = decode::<OneOrMany<UpdateHttpTest>>(params)?.into_vec();
        let mut keys = Vec::with_capacity(inputs.len());
        for input in &inputs {
            let key = self
                .lookup(&input.httptestid)
                .ok_or_else(|| RpcError::invalid_params(NO_OBJECT))?;
            if let Some(name) = &input.name {
                if name.is_empty() {
                    return Err(RpcError::invalid_params("Incorrect value for field \"name\": cannot be empty."));
                }
                let hostid = &self.tests[&key].hostid;
                if self.name_taken(hostid, name, Some(key)) {
                    return Err(RpcError::invalid_params(format!(
                        "Web scenario \"{name}\" already exists."
                    )));
                }
            }
            keys.push(key);
        }

        let mut ids = Vec::with_capacity(inputs.len());
        for (key, input) in keys.into_iter().zip(inputs) {
            let Some(test) = self.tests.get_mut(&key) else {
                continue;
            };
            if let Some(name) = input.name {
                test.name = name;
            }
            if let Some(description) = input.description {
                test.description = description;
            }
            if let Some(mut steps) = input.steps {
                number_steps(&mut steps);
                test.steps = steps;
            }
            ids.push(test.httptestid.clone());
        }
        Ok(ids_result(ids))
    }

    fn delete(&mut self, params: Value) -> Result<Value, RpcError> {
        let ids: Vec<String> = decode(params)?;
        if ids.is_empty() {
            return Err(RpcError::invalid_params("Empty input parameter."));
        }
        let mut keys = Vec::with_capacity(ids.len());
        for id in &ids {
            let key = self.lookup(id).ok_or_else(|| RpcError::invalid_params(NO_OBJECT))?;
            if keys.contains(&key) {
                return Err(RpcError::invalid_params(format!("Duplicate ID \"{id}\".")));
            }
            keys.push(key);
        }
        for key in keys {
            self.tests.remove(&key);
        }
        Ok(ids_result(ids))
    }
}
