use axum::body::Body;
use axum::Router;
use bytes::Bytes;
use http::header::{HeaderMap, CONTENT_TYPE};
use http::{Method, Request, StatusCode};
use http_body_util::BodyExt;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tower::util::ServiceExt;

/// In-process client for an axum `Router`.
///
/// Requests go through `oneshot`, so no socket is bound.
pub struct TestApp {
    router: Router,
}

impl TestApp {
    pub fn new(router: Router) -> Self {
        Self { router }
    }

    pub fn get(&self, path: &str) -> TestRequest<'_> {
        TestRequest::new(self, Method::GET, path)
    }

    pub fn post(&self, path: &str) -> TestRequest<'_> {
        TestRequest::new(self, Method::POST, path)
    }

    /// Call `pattern` through the HTTP tunnel with a JSON payload.
    pub async fn rpc(&self, pattern: &str, payload: &impl Serialize) -> TestResponse {
        self.post(&format!("/rpc/{pattern}")).json(payload).send().await
    }
}

pub struct TestRequest<'a> {
    app: &'a TestApp,
    method: Method,
    path: String,
    content_type: Option<&'static str>,
    body: Vec<u8>,
}

impl<'a> TestRequest<'a> {
    fn new(app: &'a TestApp, method: Method, path: &str) -> Self {
        Self {
            app,
            method,
            path: path.to_string(),
            content_type: None,
            body: Vec::new(),
        }
    }

    /// JSON body with a matching `Content-Type`.
    pub fn json(mut self, body: &impl Serialize) -> Self {
        self.body = serde_json::to_vec(body).expect("request body must serialize");
        self.content_type = Some("application/json");
        self
    }

    pub fn body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = body.into();
        self
    }

    pub async fn send(self) -> TestResponse {
        let mut builder = Request::builder().method(self.method).uri(&self.path);
        if let Some(content_type) = self.content_type {
            builder = builder.header(CONTENT_TYPE, content_type);
        }
        let request = builder
            .body(Body::from(self.body))
            .expect("invalid test request");

        let response = self
            .app
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("router is infallible");

        let status = response.status();
        let headers = response.headers().clone();
        let body = response
            .into_body()
            .collect()
            .await
            .expect("failed to read response body")
            .to_bytes();

        TestResponse { status, headers, body }
    }
}

/// Look up a dotted path such as `data.0.name` or `data.len`.
///
/// Numeric segments index arrays; `len` yields the length of an array or
/// object. Missing segments resolve to `null`.
pub fn resolve_path(root: &Value, path: &str) -> Value {
    let mut current = root;
    let mut segments = path.split('.').filter(|s| !s.is_empty()).peekable();
    while let Some(segment) = segments.next() {
        let next = match (current, segment.parse::<usize>()) {
            (Value::Array(items), Ok(index)) => items.get(index),
            (Value::Array(items), Err(_)) if segment == "len" && segments.peek().is_none() => {
                return Value::from(items.len());
            }
            (Value::Object(map), _) if segment == "len" && !map.contains_key("len") => {
                return Value::from(map.len());
            }
            (Value::Object(map), _) => map.get(segment),
            _ => None,
        };
        match next {
            Some(value) => current = value,
            None => return Value::Null,
        }
    }
    current.clone()
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl TestResponse {
    pub fn assert_ok(self) -> Self {
        self.assert_status(StatusCode::OK)
    }

    pub fn assert_bad_request(self) -> Self {
        self.assert_status(StatusCode::BAD_REQUEST)
    }

    pub fn assert_not_found(self) -> Self {
        self.assert_status(StatusCode::NOT_FOUND)
    }

    pub fn assert_status(self, expected: StatusCode) -> Self {
        assert_eq!(
            self.status,
            expected,
            "expected {expected}, got {}\nbody: {}",
            self.status,
            self.text()
        );
        self
    }

    /// Assert the body is a normalized RPC error with this status and message.
    pub fn assert_rpc_error(self, status: u16, message: &str) -> Self {
        let body: Value = self.json();
        assert_eq!(
            body,
            serde_json::json!({ "message": message, "status": status }),
            "unexpected error body"
        );
        self
    }

    pub fn assert_json_path(self, path: &str, expected: impl Into<Value>) -> Self {
        let root: Value = self.json();
        let actual = resolve_path(&root, path);
        let expected = expected.into();
        assert_eq!(
            actual, expected,
            "JSON path \"{path}\"\n  expected: {expected}\n  actual:   {actual}\n  body: {root}",
        );
        self
    }

    pub fn json<T: DeserializeOwned>(&self) -> T {
        serde_json::from_slice(&self.body).unwrap_or_else(|e| {
            panic!("response body is not the expected JSON: {e}\nbody: {}", self.text())
        })
    }

    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}
