use jsonrpsee_types::ErrorObjectOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A request id, echoed verbatim on the response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RequestId {
    Number(i64),
    String(String),
}

/// A wire-agnostic JSON-RPC-shaped request. The dispatcher never reads from or
/// writes to a socket itself; a transport layer decodes bytes into this type
/// and encodes [`EngineResponse`] back out.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineRequest {
    #[serde(rename = "version")]
    pub version: String,
    pub method: String,
    #[serde(default)]
    pub params: Vec<Value>,
    pub id: RequestId,
}

impl EngineRequest {
    pub fn new(method: impl Into<String>, params: Vec<Value>, id: RequestId) -> Self {
        Self { version: "2.0".to_string(), method: method.into(), params, id }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineResponse {
    pub version: String,
    pub id: RequestId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorObjectOwned>,
}

impl EngineResponse {
    pub fn success(id: RequestId, result: Value) -> Self {
        Self { version: "2.0".to_string(), id, result: Some(result), error: None }
    }

    pub fn failure(id: RequestId, error: ErrorObjectOwned) -> Self {
        Self { version: "2.0".to_string(), id, result: None, error: Some(error) }
    }
}
