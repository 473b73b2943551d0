use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Status used when a raised value is a bare string or carries a non-numeric status.
pub const DEFAULT_ERROR_STATUS: u16 = 400;

/// Status used for error shapes that cannot be interpreted.
pub const UNRECOGNIZED_ERROR_STATUS: u16 = 500;

/// The normalized `{ message, status }` shape of every caller-visible failure.
///
/// `message` is usually a string but is kept as raw JSON: a handler may raise
/// a list of validation messages, and an unrecognized raised value is carried
/// through as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RpcError {
    pub message: Value,
    pub status: u16,
}

impl RpcError {
    pub fn new(status: u16, message: impl Into<String>) -> Self {
        Self {
            message: Value::String(message.into()),
            status,
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(400, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(404, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(500, message)
    }

    /// Coerce any raised value into the normalized shape.
    ///
    /// - a string becomes `{message: <string>, status: 400}`
    /// - an object with both `status` and `message` keeps its message; a
    ///   non-numeric status becomes 400
    /// - anything else becomes `{message: <value>, status: 500}`
    pub fn normalize(raised: &Value) -> Self {
        match raised {
            Value::String(message) => Self::new(DEFAULT_ERROR_STATUS, message.clone()),
            Value::Object(map) => match (map.get("status"), map.get("message")) {
                (Some(status), Some(message)) => Self {
                    message: message.clone(),
                    status: coerce_status(status),
                },
                _ => Self::unrecognized(raised),
            },
            other => Self::unrecognized(other),
        }
    }

    fn unrecognized(raised: &Value) -> Self {
        Self {
            message: raised.clone(),
            status: UNRECOGNIZED_ERROR_STATUS,
        }
    }

    /// HTTP status for rendering; statuses outside the HTTP range render as 500.
    pub fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.status)
            .ok()
            .filter(|code| code.as_u16() >= 100 && code.as_u16() <= 599)
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }

    /// The message as text, without JSON quoting for string messages.
    pub fn message_text(&self) -> String {
        match &self.message {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        }
    }

    pub fn to_value(&self) -> Value {
        serde_json::json!({ "message": self.message, "status": self.status })
    }
}

/// Numeric value of a raised status, following loose JSON-to-number rules:
/// `null`, `false`, `""` and `[]` are 0, `true` is 1, a string or a
/// one-element array converts through its text. Objects are never numeric.
fn numeric_value(status: &Value) -> Option<f64> {
    match status {
        Value::Null => Some(0.0),
        Value::Bool(flag) => Some(if *flag { 1.0 } else { 0.0 }),
        Value::Number(n) => n.as_f64(),
        Value::String(s) => parse_numeric_text(s),
        Value::Array(items) => match items.as_slice() {
            [] => Some(0.0),
            [Value::Bool(_)] | [Value::Object(_)] => None,
            [single] => numeric_value(single),
            _ => None,
        },
        Value::Object(_) => None,
    }
}

fn parse_numeric_text(text: &str) -> Option<f64> {
    let text = text.trim();
    if text.is_empty() {
        return Some(0.0);
    }
    match text {
        "Infinity" | "+Infinity" => return Some(f64::INFINITY),
        "-Infinity" => return Some(f64::NEG_INFINITY),
        _ => {}
    }
    // Rust also accepts "inf" and "nan", which are not numbers here.
    if text.chars().any(|c| c.is_ascii_alphabetic() && c != 'e' && c != 'E') {
        return None;
    }
    text.parse::<f64>().ok()
}

/// Non-numeric statuses become 400. Numeric ones that are not a whole `u16`
/// cannot be a status and collapse to 500.
fn coerce_status(status: &Value) -> u16 {
    match numeric_value(status) {
        None => DEFAULT_ERROR_STATUS,
        Some(n) if n.fract() == 0.0 && (0.0..=f64::from(u16::MAX)).contains(&n) => n as u16,
        Some(_) => UNRECOGNIZED_ERROR_STATUS,
    }
}

impl From<Value> for RpcError {
    fn from(raised: Value) -> Self {
        Self::normalize(&raised)
    }
}

impl std::fmt::Display for RpcError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "RPC error ({}): {}", self.status, self.message_text())
    }
}

impl std::error::Error for RpcError {}

impl IntoResponse for RpcError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        (status, Json(self.to_value())).into_response()
    }
}
