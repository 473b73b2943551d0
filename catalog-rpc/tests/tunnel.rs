use std::sync::Arc;

use catalog_core::RpcError;
use catalog_rpc::prelude::*;
use catalog_rpc::{http, NO_HANDLER_MESSAGE};
use catalog_test::TestApp;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

#[derive(Debug, Serialize, Deserialize, PartialEq)]
struct Lookup {
    id: i64,
}

fn router() -> Arc<RpcRouter> {
    Arc::new(
        RpcRouter::new()
            .route("lookup", |req: Lookup| async move {
                if req.id == 1 {
                    Ok(json!({"id": 1, "name": "Keyboard"}))
                } else {
                    Err(RpcError::not_found(format!("Product with id #{} not found", req.id)))
                }
            })
            .route("raise_string", |_: Value| async {
                Err::<Value, _>(RpcError {
                    message: json!("plain text failure"),
                    status: 400,
                })
            }),
    )
}

#[tokio::test]
async fn tunnel_returns_handler_response() {
    TestApp::new(http::tunnel(router()))
        .rpc("lookup", &json!({"id": 1}))
        .await
        .assert_ok()
        .assert_json_path("name", "Keyboard");
}

#[tokio::test]
async fn tunnel_renders_normalized_error() {
    TestApp::new(http::tunnel(router()))
        .rpc("lookup", &json!({"id": 7}))
        .await
        .assert_not_found()
        .assert_rpc_error(404, "Product with id #7 not found");
}

#[tokio::test]
async fn tunnel_unknown_pattern() {
    TestApp::new(http::tunnel(router()))
        .rpc("nope", &json!({}))
        .await
        .assert_not_found()
        .assert_rpc_error(404, NO_HANDLER_MESSAGE);
}

#[tokio::test]
async fn tunnel_rejects_bad_payload() {
    let app = TestApp::new(http::tunnel(router()));
    app.rpc("lookup", &json!({"id": "one"}))
        .await
        .assert_bad_request()
        .assert_json_path("status", 400);
    app.post("/rpc/lookup")
        .body("{broken")
        .send()
        .await
        .assert_bad_request();
}

#[tokio::test]
async fn health_is_up() {
    TestApp::new(http::tunnel(router()))
        .get("/health")
        .send()
        .await
        .assert_ok()
        .assert_json_path("status", "UP");
}

#[tokio::test]
async fn local_client_typed_call() {
    let client = LocalRpcClient::new(router());
    let found: Value = client.call("lookup", &Lookup { id: 1 }).await.unwrap();
    assert_eq!(found["name"], "Keyboard");

    let err = client
        .call::<_, Value>("lookup", &Lookup { id: 2 })
        .await
        .unwrap_err();
    assert_eq!(err, RpcError::not_found("Product with id #2 not found"));
}
