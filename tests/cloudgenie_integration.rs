//! Integration tests for the CloudGenie tools.
//!
//! A stub CloudGenie API runs in-process on an ephemeral port; requests go
//! through the real client, registries, dispatcher and HTTP transport.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Body,
    extract::Path,
    http::{header, Request, StatusCode},
    response::IntoResponse,
    routing::{get, patch},
    Json, Router,
};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use cloudgenie_mcp::cloudgenie::{self, CloudGenieClient};
use cloudgenie_mcp::mcp::server::{McpServer, Session};
use cloudgenie_mcp::mcp::http;

// =============================================================================
// Stub backend
// =============================================================================

fn blueprint() -> Value {
    json!({
        "name": "xGitRepo",
        "description": "create repository",
        "version": "1.0.0",
        "category": "repository",
        "parameters": {"visibility": "private"}
    })
}

fn resource(name: &str, status: &str) -> Value {
    json!({
        "id": "r-1",
        "name": name,
        "blueprint_name": "xGitRepo",
        "status": {"phase": status},
        "created_at": "2025-01-01T00:00:00Z",
        "updated_at": "2025-01-01T00:00:00Z",
        "spec": {"visibility": "private"}
    })
}

async fn get_blueprint(Path(name): Path<String>) -> impl IntoResponse {
    if name == "xGitRepo" {
        (StatusCode::OK, Json(blueprint())).into_response()
    } else {
        (StatusCode::NOT_FOUND, format!("blueprint {name} not found")).into_response()
    }
}

async fn create_resource(Json(body): Json<Value>) -> Json<Value> {
    let name = body["name"].as_str().unwrap_or_default().to_string();
    Json(resource(&name, "Provisioning"))
}

async fn update_status(Path(name): Path<String>, Json(body): Json<Value>) -> Json<Value> {
    Json(resource(&name, body["status"].as_str().unwrap_or_default()))
}

async fn spawn_backend() -> SocketAddr {
    let api = Router::new()
        .route("/v1/healthcheck", get(|| async { Json(json!({"status": "ok", "message": "healthy"})) }))
        .route("/v1/blueprints", get(|| async { Json(json!([blueprint()])) }))
        .route("/v1/blueprints/{name}", get(get_blueprint))
        .route(
            "/v1/resources",
            get(|| async { Json(json!([resource("repo-1", "Ready")])) }).post(create_resource),
        )
        .route(
            "/v1/resources/{name}",
            get(|Path(name): Path<String>| async move { Json(resource(&name, "Ready")) })
                .delete(|| async { StatusCode::NO_CONTENT }),
        )
        .route("/v1/resources/{name}/status", patch(update_status));
    let app = Router::new().nest("/cloud-genie", api);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

async fn server() -> McpServer {
    let addr = spawn_backend().await;
    let client = CloudGenieClient::new(
        &format!("http://{addr}/cloud-genie"),
        Duration::from_secs(5),
    )
    .unwrap();
    McpServer::new(cloudgenie::registries(&Arc::new(client)))
}

async fn call_tool(server: &McpServer, name: &str, arguments: Value) -> Value {
    let request = json!({
        "jsonrpc": "2.0",
        "id": 1,
        "method": "tools/call",
        "params": {"name": name, "arguments": arguments}
    });
    let response = server
        .handle_bytes(&mut Session::new(), request.to_string().as_bytes())
        .await
        .expect("tools/call yields a response");
    serde_json::to_value(response).unwrap()["result"].clone()
}

fn text(result: &Value) -> &str {
    result["content"][0]["text"].as_str().expect("text content")
}

fn text_json(result: &Value) -> Value {
    serde_json::from_str(text(result)).expect("tool output is JSON")
}

// =============================================================================
// Tool Tests
// =============================================================================

#[tokio::test]
async fn test_get_blueprints() {
    let server = server().await;
    let result = call_tool(&server, "get_blueprints", json!({})).await;

    assert_eq!(result["isError"], false);
    assert_eq!(text_json(&result), json!({"blueprints": [blueprint()]}));
    assert!(text(&result).contains('\n'), "output is pretty-printed");
}

#[tokio::test]
async fn test_get_blueprint_info() {
    let server = server().await;
    let result = call_tool(&server, "get_blueprint_info", json!({"blueprint_name": "xGitRepo"})).await;

    assert_eq!(result["isError"], false);
    assert_eq!(text_json(&result)["blueprint"]["category"], "repository");
}

#[tokio::test]
async fn test_backend_error_status_is_reported() {
    let server = server().await;
    let result = call_tool(&server, "get_blueprint_info", json!({"blueprint_name": "nope"})).await;

    assert_eq!(result["isError"], true);
    assert_eq!(
        text(&result),
        "Error: API error (status 404): blueprint nope not found"
    );
}

#[tokio::test]
async fn test_create_resource() {
    let server = server().await;
    let result = call_tool(
        &server,
        "create_resource",
        json!({"name": "repo-2", "blueprintName": "xGitRepo", "spec": {"visibility": "private"}}),
    )
    .await;

    assert_eq!(result["isError"], false);
    assert_eq!(
        text_json(&result),
        json!({"name": "repo-2", "status": {"phase": "Provisioning"}})
    );
}

#[tokio::test]
async fn test_create_resource_missing_spec() {
    let server = server().await;
    let result = call_tool(
        &server,
        "create_resource",
        json!({"name": "repo-2", "blueprintName": "xGitRepo"}),
    )
    .await;

    assert_eq!(result["isError"], true);
    assert_eq!(text(&result), "Error: missing required argument 'spec'");
}

#[tokio::test]
async fn test_get_resources_and_by_name() {
    let server = server().await;

    let all = call_tool(&server, "get_resources", json!({})).await;
    assert_eq!(text_json(&all)["resources"][0]["name"], "repo-1");

    let one = call_tool(&server, "get_resource_by_name", json!({"name": "repo-9"})).await;
    assert_eq!(text_json(&one)["resource"]["name"], "repo-9");
}

#[tokio::test]
async fn test_update_and_delete_resource() {
    let server = server().await;

    let updated = call_tool(
        &server,
        "update_resource_status",
        json!({"name": "repo-1", "status": "Stopped"}),
    )
    .await;
    assert_eq!(text_json(&updated)["resource"]["status"]["phase"], "Stopped");

    let deleted = call_tool(&server, "delete_resource", json!({"name": "repo-1"})).await;
    assert_eq!(deleted["isError"], false);
    assert_eq!(text(&deleted), "Resource 'repo-1' deleted");
}

#[tokio::test]
async fn test_health_check() {
    let server = server().await;
    let result = call_tool(&server, "health_check", json!({})).await;

    assert_eq!(text_json(&result), json!({"status": "ok", "message": "healthy"}));
}

// =============================================================================
// Discovery over HTTP
// =============================================================================

#[tokio::test]
async fn test_discovery_over_http() {
    let app = http::router(Arc::new(server().await));

    let response = app
        .oneshot(
            Request::builder()
                .uri("/mcp")
                .method("POST")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(r#"{"jsonrpc":"2.0","id":1,"method":"tools/list"}"#))
                .expect("request build"),
        )
        .await
        .expect("request execution");

    assert_eq!(response.status(), StatusCode::OK);
    let body = response.into_body().collect().await.unwrap().to_bytes();
    let body: Value = serde_json::from_slice(&body).unwrap();
    let names: Vec<_> = body["result"]["tools"]
        .as_array()
        .unwrap()
        .iter()
        .map(|tool| tool["name"].as_str().unwrap())
        .collect();
    assert_eq!(
        names,
        vec![
            "get_blueprints",
            "get_blueprint_info",
            "create_resource",
            "get_resources",
            "get_resource_by_name",
            "update_resource_status",
            "delete_resource",
            "health_check"
        ]
    );
}

#[tokio::test]
async fn test_read_catalogue_resource() {
    let server = server().await;
    let response = server
        .handle_bytes(
            &mut Session::new(),
            br#"{"jsonrpc":"2.0","id":1,"method":"resources/read","params":{"uri":"cloudgenie://blueprints"}}"#,
        )
        .await
        .unwrap();
    let response = serde_json::to_value(response).unwrap();

    let contents = &response["result"]["contents"][0];
    assert_eq!(contents["uri"], "cloudgenie://blueprints");
    assert_eq!(contents["mimeType"], "text/plain");
    assert!(contents["text"].as_str().unwrap().contains("blueprint"));
}

#[tokio::test]
async fn test_blueprint_info_prompt() {
    let server = server().await;
    let response = server
        .handle_bytes(
            &mut Session::new(),
            br#"{"jsonrpc":"2.0","id":1,"method":"prompts/get","params":{"name":"blueprint_info","arguments":{"blueprint_id":"xGitRepo"}}}"#,
        )
        .await
        .unwrap();
    let response = serde_json::to_value(response).unwrap();

    assert_eq!(
        response["result"]["messages"][0]["content"]["text"],
        "Prompt: blueprint_info"
    );
}
