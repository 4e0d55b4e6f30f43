//! The JSON-RPC request pipeline
//!
//! Validates a decoded payload, dispatches it through the method registry, audits the
//! call, and builds the response envelope. Notifications produce no response.

use serde_json::Value;
use tracing::{error, info};

use crate::errors::RpcError;
use crate::rpc::envelope::{IdEncoding, Request, RequestId, Response};
use crate::AppState;

pub async fn handle_json_rpc_value(state: &AppState, payload: Value) -> Option<Response> {
    let request = match Request::from_value(payload) {
        Ok(request) => request,
        Err(rejection) => {
            let id = encode_optional_id(rejection.id.as_ref(), state.id_encoding);
            return Some(Response::error(id, &rejection.error));
        }
    };

    let param_count = request.params.len();
    let result = state
        .registry
        .dispatch(&request.method, request.params)
        .await;

    if let Err(RpcError::Internal(detail)) = &result {
        error!(method = %request.method, error = %detail, "rpc call failed with internal error");
    }

    info!(
        method = %request.method,
        param_count,
        notification = request.id.is_none(),
        outcome = if result.is_ok() { "success" } else { "failure" },
        "rpc call audited"
    );

    let id = request.id?;
    Some(Response::from_result(id.encode(state.id_encoding), result))
}

/// Builds the response to a body that is not valid JSON.
pub fn parse_error_response() -> Response {
    Response::error(Value::Null, &RpcError::ParseError)
}

fn encode_optional_id(id: Option<&RequestId>, encoding: IdEncoding) -> Value {
    id.map(|id| id.encode(encoding)).unwrap_or(Value::Null)
}
