use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::router::RpcResult;

/// A request as it travels over the transport.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RpcRequest {
    /// Method address, e.g. `find_one_product`.
    pub pattern: String,
    #[serde(default)]
    pub data: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

impl RpcRequest {
    pub fn new(pattern: impl Into<String>, data: Value) -> Self {
        Self {
            pattern: pattern.into(),
            data,
            id: None,
        }
    }
}

/// The single reply to an [`RpcRequest`]. Exactly one of `response`/`err` is meaningful.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RpcReply {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub err: Option<Value>,
    #[serde(default)]
    pub is_disposed: bool,
}

impl RpcReply {
    pub fn from_result(id: Option<String>, result: RpcResult) -> Self {
        let (response, err) = match result {
            Ok(response) => (Some(response), None),
            Err(err) => (None, Some(err)),
        };
        Self {
            id,
            response,
            err,
            is_disposed: true,
        }
    }

    pub fn into_result(self) -> RpcResult {
        match self.err {
            Some(err) => Err(err),
            None => Ok(self.response.unwrap_or(Value::Null)),
        }
    }
}
