//! JSON-RPC 2.0 envelope types
//!
//! Decodes request envelopes out of already-parsed JSON and encodes response envelopes,
//! including the response `id` encoding policy.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};

use crate::errors::RpcError;

pub const JSONRPC_VERSION: &str = "2.0";

/// How a request id is written back into its response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IdEncoding {
    /// Every id is rendered as a JSON string, so `0` comes back as `"0"`.
    #[default]
    Stringify,
    /// Ids come back with the JSON type they were sent with.
    Preserve,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestId {
    String(String),
    Number(Number),
}

impl RequestId {
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::String(id) => Some(Self::String(id.clone())),
            Value::Number(id) => Some(Self::Number(id.clone())),
            _ => None,
        }
    }

    /// Integers within the i64/u64 range keep their exact digits. Other numbers were
    /// already parsed as f64, so they come back in that form (`1e3` becomes `"1000.0"`).
    pub fn encode(&self, encoding: IdEncoding) -> Value {
        match (self, encoding) {
            (Self::String(id), _) => Value::String(id.clone()),
            (Self::Number(id), IdEncoding::Stringify) => Value::String(id.to_string()),
            (Self::Number(id), IdEncoding::Preserve) => Value::Number(id.clone()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Params {
    Positional(Vec<Value>),
    Named(Map<String, Value>),
}

impl Default for Params {
    fn default() -> Self {
        Self::Positional(Vec::new())
    }
}

impl Params {
    pub fn len(&self) -> usize {
        match self {
            Self::Positional(values) => values.len(),
            Self::Named(values) => values.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug, Deserialize)]
struct RawRequest {
    jsonrpc: String,
    method: String,
    #[serde(default)]
    params: Option<Params>,
}

/// A validated request. `id` is `None` for notifications.
#[derive(Debug, Clone, PartialEq)]
pub struct Request {
    pub method: String,
    pub params: Params,
    pub id: Option<RequestId>,
}

/// A payload that could not be turned into a [`Request`], with whatever id it carried.
#[derive(Debug, Clone, PartialEq)]
pub struct Rejection {
    pub id: Option<RequestId>,
    pub error: RpcError,
}

impl Rejection {
    fn invalid(id: Option<RequestId>) -> Self {
        Self {
            id,
            error: RpcError::InvalidRequest,
        }
    }
}

impl Request {
    pub fn from_value(payload: Value) -> Result<Self, Rejection> {
        let Value::Object(object) = payload else {
            return Err(Rejection::invalid(None));
        };

        let id = match object.get("id") {
            None => None,
            Some(value) => Some(RequestId::from_value(value).ok_or_else(|| Rejection::invalid(None))?),
        };

        let raw: RawRequest = serde_json::from_value(Value::Object(object))
            .map_err(|_| Rejection::invalid(id.clone()))?;

        if raw.jsonrpc != JSONRPC_VERSION || raw.method.trim().is_empty() {
            return Err(Rejection::invalid(id));
        }

        Ok(Self {
            method: raw.method,
            params: raw.params.unwrap_or_default(),
            id,
        })
    }

    pub fn is_notification(&self) -> bool {
        self.id.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ErrorObject {
    pub code: i64,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl From<&RpcError> for ErrorObject {
    fn from(error: &RpcError) -> Self {
        Self {
            code: error.code(),
            message: error.message().to_string(),
            data: error.data(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Result(Value),
    Error(ErrorObject),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Response {
    pub jsonrpc: &'static str,
    #[serde(flatten)]
    pub outcome: Outcome,
    pub id: Value,
}

impl Response {
    pub fn success(id: Value, result: Value) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION,
            outcome: Outcome::Result(result),
            id,
        }
    }

    pub fn error(id: Value, error: &RpcError) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION,
            outcome: Outcome::Error(ErrorObject::from(error)),
            id,
        }
    }

    pub fn from_result(id: Value, result: Result<Value, RpcError>) -> Self {
        match result {
            Ok(value) => Self::success(id, value),
            Err(error) => Self::error(id, &error),
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self.outcome, Outcome::Error(_))
    }
}
