use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};

pub mod config;
pub mod errors;
pub mod http;
pub mod logging;
pub mod methods;
pub mod rpc;

use config::Config;
use methods::MethodRegistry;
use rpc::envelope::IdEncoding;

#[derive(Clone)]
pub struct AppState {
    pub registry: Arc<MethodRegistry>,
    pub id_encoding: IdEncoding,
}

impl AppState {
    pub fn new(registry: MethodRegistry, id_encoding: IdEncoding) -> Self {
        Self {
            registry: Arc::new(registry),
            id_encoding,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        let id_encoding = if config.preserve_id_type {
            IdEncoding::Preserve
        } else {
            IdEncoding::Stringify
        };
        Self::new(MethodRegistry::builtin(), id_encoding)
    }
}

pub fn build_app(state: AppState) -> Router {
    Router::new()
        .route(http::handlers::RPC_ENDPOINT, post(http::handlers::rpc_endpoint))
        .route("/health", get(http::handlers::health))
        .route("/.well-known/jsonrpc", get(http::handlers::discovery))
        .layer(middleware::from_fn(logging::request_logging_middleware))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use axum::{
        body::{Body, Bytes},
        http::{header, Request, StatusCode},
    };
    use http_body_util::BodyExt;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::*;

    fn app() -> Router {
        build_app(AppState::from_config(&Config::default()))
    }

    fn app_preserving_ids() -> Router {
        build_app(AppState::new(
            MethodRegistry::builtin(),
            IdEncoding::Preserve,
        ))
    }

    async fn post_rpc(app: Router, body: impl Into<Body>) -> (StatusCode, Bytes) {
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/")
                    .method("POST")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(body.into())
                    .expect("request build"),
            )
            .await
            .expect("request execution");

        let status = response.status();
        let body = response
            .into_body()
            .collect()
            .await
            .expect("collect body")
            .to_bytes();
        (status, body)
    }

    fn as_json(body: &Bytes) -> Value {
        serde_json::from_slice(body).expect("valid json response")
    }

    #[tokio::test]
    async fn echo_reference_request_round_trips() {
        let (status, body) = post_rpc(
            app(),
            r#"{"method":"echo","params":["echome!"],"jsonrpc":"2.0","id":0}"#,
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, r#"{"jsonrpc":"2.0","result":"echome!","id":"0"}"#);
    }

    #[tokio::test]
    async fn echo_returns_scalars_unchanged() {
        for (request, expected) in [
            (
                r#"{"jsonrpc":"2.0","method":"echo","params":[42],"id":1}"#,
                json!(42),
            ),
            (
                r#"{"jsonrpc":"2.0","method":"echo","params":[false],"id":1}"#,
                json!(false),
            ),
            (
                r#"{"jsonrpc":"2.0","method":"echo","params":[3.25,"second"],"id":1}"#,
                json!(3.25),
            ),
            (
                r#"{"jsonrpc":"2.0","method":"echo","params":[null],"id":1}"#,
                Value::Null,
            ),
        ] {
            let (status, body) = post_rpc(app(), request).await;
            let body_json = as_json(&body);

            assert_eq!(status, StatusCode::OK);
            assert_eq!(body_json["jsonrpc"], "2.0");
            assert_eq!(body_json["id"], "1");
            assert_eq!(body_json.get("result"), Some(&expected));
            assert!(body_json.get("error").is_none());
        }
    }

    #[tokio::test]
    async fn string_ids_are_returned_verbatim() {
        let (_, body) = post_rpc(
            app(),
            r#"{"jsonrpc":"2.0","method":"echo","params":["x"],"id":"abc-1"}"#,
        )
        .await;

        assert_eq!(as_json(&body)["id"], "abc-1");
    }

    #[tokio::test]
    async fn preserve_mode_returns_numeric_ids() {
        let (_, body) = post_rpc(
            app_preserving_ids(),
            r#"{"method":"echo","params":["echome!"],"jsonrpc":"2.0","id":0}"#,
        )
        .await;

        assert_eq!(body, r#"{"jsonrpc":"2.0","result":"echome!","id":0}"#);
    }

    #[tokio::test]
    async fn empty_params_return_error_not_result() {
        let (status, body) =
            post_rpc(app(), r#"{"jsonrpc":"2.0","method":"echo","params":[],"id":4}"#).await;
        let body_json = as_json(&body);

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body_json["error"]["code"], -32602);
        assert_eq!(body_json["error"]["message"], "Invalid params");
        assert_eq!(body_json["id"], "4");
        assert!(body_json.get("result").is_none());
    }

    #[tokio::test]
    async fn unknown_method_returns_method_not_found() {
        let (status, body) =
            post_rpc(app(), r#"{"jsonrpc":"2.0","id":1,"method":"unknown"}"#).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            "{\"jsonrpc\":\"2.0\",\"error\":{\"code\":-32601,\"message\":\"Method not found\"},\"id\":\"1\"}"
        );
    }

    #[tokio::test]
    async fn missing_version_returns_invalid_request() {
        let (status, body) = post_rpc(app(), r#"{"method":"echo","params":["x"],"id":8}"#).await;
        let body_json = as_json(&body);

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body_json["jsonrpc"], "2.0");
        assert_eq!(body_json["error"]["code"], -32600);
        assert_eq!(body_json["id"], "8");
    }

    #[tokio::test]
    async fn wrong_version_returns_invalid_request() {
        let (_, body) = post_rpc(
            app(),
            r#"{"jsonrpc":"1.0","method":"echo","params":["x"],"id":8}"#,
        )
        .await;

        assert_eq!(as_json(&body)["error"]["code"], -32600);
    }

    #[tokio::test]
    async fn malformed_json_returns_parse_error_with_bad_request() {
        let (status, body) = post_rpc(app(), r#"{"jsonrpc":"2.0","method":"echo""#).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            body,
            "{\"jsonrpc\":\"2.0\",\"error\":{\"code\":-32700,\"message\":\"Parse error\"},\"id\":null}"
        );
    }

    #[tokio::test]
    async fn oversized_body_returns_parse_error_envelope() {
        let padding = "a".repeat(3 * 1024 * 1024);
        let request =
            format!(r#"{{"jsonrpc":"2.0","method":"echo","params":["{padding}"],"id":1}}"#);

        let (status, body) = post_rpc(app(), request).await;
        let body_json = as_json(&body);

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body_json["jsonrpc"], "2.0");
        assert_eq!(body_json["error"]["code"], -32700);
        assert_eq!(body_json["error"]["message"], "Parse error");
        assert_eq!(body_json["id"], Value::Null);
        assert!(body_json.get("result").is_none());
    }

    #[tokio::test]
    async fn batch_payload_is_invalid_request() {
        let (status, body) = post_rpc(
            app(),
            r#"[{"jsonrpc":"2.0","method":"echo","params":["x"],"id":1}]"#,
        )
        .await;
        let body_json = as_json(&body);

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body_json["error"]["code"], -32600);
        assert_eq!(body_json["id"], Value::Null);
    }

    #[tokio::test]
    async fn notification_returns_no_content() {
        let (status, body) =
            post_rpc(app(), r#"{"jsonrpc":"2.0","method":"echo","params":["x"]}"#).await;

        assert_eq!(status, StatusCode::NO_CONTENT);
        assert!(body.is_empty());
    }

    #[tokio::test]
    async fn health_is_available() {
        let response = app()
            .oneshot(
                Request::builder()
                    .uri("/health")
                    .method("GET")
                    .body(Body::empty())
                    .expect("request build"),
            )
            .await
            .expect("request execution");

        assert_eq!(response.status(), StatusCode::OK);
        let body = response
            .into_body()
            .collect()
            .await
            .expect("collect body")
            .to_bytes();
        assert_eq!(body, "{\"status\":\"ok\"}");
    }

    #[tokio::test]
    async fn discovery_lists_registered_methods() {
        let response = app()
            .oneshot(
                Request::builder()
                    .uri("/.well-known/jsonrpc")
                    .method("GET")
                    .body(Body::empty())
                    .expect("request build"),
            )
            .await
            .expect("request execution");

        assert_eq!(response.status(), StatusCode::OK);
        let body = response
            .into_body()
            .collect()
            .await
            .expect("collect body")
            .to_bytes();
        let body_json = as_json(&body);
        assert_eq!(body_json["name"], env!("CARGO_PKG_NAME"));
        assert_eq!(body_json["rpc_endpoint"], "/");
        assert_eq!(body_json["methods"], json!(["echo"]));
    }

    #[tokio::test]
    async fn unrouted_path_is_not_found() {
        let response = app()
            .oneshot(
                Request::builder()
                    .uri("/rpc")
                    .method("POST")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(r#"{"jsonrpc":"2.0","method":"echo","id":1}"#))
                    .expect("request build"),
            )
            .await
            .expect("request execution");

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn get_on_root_is_not_allowed() {
        let response = app()
            .oneshot(
                Request::builder()
                    .uri("/")
                    .method("GET")
                    .body(Body::empty())
                    .expect("request build"),
            )
            .await
            .expect("request execution");

        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    }
}
