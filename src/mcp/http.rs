//! HTTP transport: one JSON-RPC envelope per POST to `/mcp`.
//!
//! Every POST is handled with a fresh [`Session`]; nothing carries over
//! between requests.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

use axum::{
    body::Bytes,
    extract::{Request, State},
    http::StatusCode,
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};

use crate::mcp::protocol::decode;
use crate::mcp::server::{McpServer, Session};
use crate::mcp::transport::shutdown_signal;

/// Path of the MCP endpoint.
pub const MCP_PATH: &str = "/mcp";

/// Builds the HTTP application around a server.
///
/// Only `POST /mcp` is routed; other verbs on that path get
/// `405 Method Not Allowed`.
pub fn router(server: Arc<McpServer>) -> Router {
    Router::new()
        .route(MCP_PATH, post(mcp_endpoint))
        .layer(middleware::from_fn(request_logging_middleware))
        .with_state(server)
}

/// Serves MCP over HTTP on `addr` until a termination signal arrives.
///
/// # Errors
///
/// Returns an error if the listener cannot be bound or serving fails.
pub async fn serve(server: Arc<McpServer>, addr: SocketAddr) -> std::io::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    let local_addr = listener.local_addr()?;

    let (tools, resources, prompts) = server.registries().counts();
    tracing::info!(
        address = %local_addr,
        path = MCP_PATH,
        tools,
        resources,
        prompts,
        "Serving MCP over HTTP"
    );

    axum::serve(listener, router(server))
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn mcp_endpoint(State(server): State<Arc<McpServer>>, body: Bytes) -> Response {
    let message = match decode(&body) {
        Ok(message) => message,
        Err(parse_error) => {
            tracing::debug!(bytes = body.len(), "Rejected undecodable request body");
            return (StatusCode::BAD_REQUEST, Json(parse_error)).into_response();
        }
    };

    let mut session = Session::new();
    match server.handle_message(&mut session, message).await {
        Some(response) => (StatusCode::OK, Json(response)).into_response(),
        None => StatusCode::NO_CONTENT.into_response(),
    }
}

async fn request_logging_middleware(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let started_at = Instant::now();

    let response = next.run(request).await;
    let status = response.status();

    tracing::info!(
        method = %method,
        path = %path,
        status = status.as_u16(),
        duration_ms = started_at.elapsed().as_millis(),
        "HTTP request"
    );

    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mcp::registry::{handler_fn, Registries};
    use crate::mcp::types::{Content, InputSchema, Tool};
    use axum::{
        body::Body,
        http::{header, Request},
    };
    use http_body_util::BodyExt;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    fn app() -> Router {
        let mut registries = Registries::new();
        registries.register_tool(
            Tool::new("hello", "Says hello", InputSchema::object()),
            handler_fn(|_| Ok(vec![Content::text("hello")])),
        );
        router(Arc::new(McpServer::new(registries)))
    }

    fn post_mcp(body: &'static str) -> Request<Body> {
        Request::builder()
            .uri(MCP_PATH)
            .method("POST")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body))
            .expect("request build")
    }

    async fn body_json(response: Response) -> Value {
        let bytes = response
            .into_body()
            .collect()
            .await
            .expect("collect body")
            .to_bytes();
        serde_json::from_slice(&bytes).expect("JSON body")
    }

    #[tokio::test]
    async fn ping_returns_ok() {
        let response = app()
            .oneshot(post_mcp(r#"{"jsonrpc":"2.0","id":1,"method":"ping"}"#))
            .await
            .expect("request execution");

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            body_json(response).await,
            json!({"jsonrpc": "2.0", "id": 1, "result": {}})
        );
    }

    #[tokio::test]
    async fn tool_call_over_http() {
        let response = app()
            .oneshot(post_mcp(
                r#"{"jsonrpc":"2.0","id":"x","method":"tools/call","params":{"name":"hello"}}"#,
            ))
            .await
            .expect("request execution");

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["id"], "x");
        assert_eq!(body["result"]["content"][0]["text"], "hello");
    }

    #[tokio::test]
    async fn unknown_method_is_ok_with_error_envelope() {
        let response = app()
            .oneshot(post_mcp(r#"{"jsonrpc":"2.0","id":2,"method":"nope"}"#))
            .await
            .expect("request execution");

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["error"]["code"], -32601);
    }

    #[tokio::test]
    async fn get_is_method_not_allowed() {
        let response = app()
            .oneshot(
                Request::builder()
                    .uri(MCP_PATH)
                    .method("GET")
                    .body(Body::empty())
                    .expect("request build"),
            )
            .await
            .expect("request execution");

        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    }

    #[tokio::test]
    async fn malformed_body_is_bad_request() {
        let response = app()
            .oneshot(post_mcp("{not json"))
            .await
            .expect("request execution");

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["id"], Value::Null);
        assert_eq!(body["error"]["code"], -32700);
    }

    #[tokio::test]
    async fn notification_is_no_content() {
        let response = app()
            .oneshot(post_mcp(
                r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#,
            ))
            .await
            .expect("request execution");

        assert_eq!(response.status(), StatusCode::NO_CONTENT);
    }

    #[tokio::test]
    async fn other_paths_are_not_found() {
        let response = app()
            .oneshot(
                Request::builder()
                    .uri("/")
                    .method("POST")
                    .body(Body::from("{}"))
                    .expect("request build"),
            )
            .await
            .expect("request execution");

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
