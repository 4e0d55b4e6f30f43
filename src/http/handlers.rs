//! Axum HTTP handlers for the web server
//!
//! Provides the JSON-RPC endpoint at the server root, plus health and discovery endpoints.

use axum::{
    body::Bytes,
    extract::{rejection::BytesRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::Value;
use tracing::warn;

use crate::rpc::server::{handle_json_rpc_value, parse_error_response};
use crate::AppState;

pub const RPC_ENDPOINT: &str = "/";

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

#[derive(Debug, Serialize)]
pub struct DiscoveryResponse {
    pub name: &'static str,
    pub version: &'static str,
    pub rpc_endpoint: &'static str,
    pub methods: Vec<&'static str>,
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

pub async fn discovery(State(state): State<AppState>) -> Json<DiscoveryResponse> {
    Json(DiscoveryResponse {
        name: env!("CARGO_PKG_NAME"),
        version: env!("CARGO_PKG_VERSION"),
        rpc_endpoint: RPC_ENDPOINT,
        methods: state.registry.names(),
    })
}

pub async fn rpc_endpoint(
    State(state): State<AppState>,
    body: Result<Bytes, BytesRejection>,
) -> Response {
    let body = match body {
        Ok(body) => body,
        Err(rejection) => {
            warn!(
                rejected_status = rejection.status().as_u16(),
                reason = %rejection.body_text(),
                "request body could not be read"
            );
            return (StatusCode::BAD_REQUEST, Json(parse_error_response())).into_response();
        }
    };

    let payload: Value = match serde_json::from_slice(&body) {
        Ok(value) => value,
        Err(_) => return (StatusCode::BAD_REQUEST, Json(parse_error_response())).into_response(),
    };

    match handle_json_rpc_value(&state, payload).await {
        Some(response) => (StatusCode::OK, Json(response)).into_response(),
        None => StatusCode::NO_CONTENT.into_response(),
    }
}
