use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use catalog_core::RpcError;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::packet::{RpcReply, RpcRequest};

/// Outcome of one call: the JSON response, or the raised error value.
///
/// The error side stays raw JSON until a boundary normalizes it with
/// [`RpcError::normalize`].
pub type RpcResult = Result<Value, Value>;

/// Message returned when no handler is registered for a pattern.
pub const NO_HANDLER_MESSAGE: &str =
    "There is no matching message handler defined in the remote service.";

type Handler =
    Arc<dyn Fn(Value) -> Pin<Box<dyn Future<Output = RpcResult> + Send>> + Send + Sync>;

/// Pattern-addressed dispatch table.
///
/// Each pattern maps to one async handler taking a typed payload. Payloads are
/// decoded from JSON before the handler runs; a payload that does not decode
/// is answered with a 400 without reaching the handler.
///
/// `RpcRouter` is cheap to clone and is usually shared behind an `Arc`.
#[derive(Clone, Default)]
pub struct RpcRouter {
    handlers: HashMap<String, Handler>,
}

impl RpcRouter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `handler` for `pattern`, replacing any previous handler.
    pub fn route<Req, Res, E, F, Fut>(mut self, pattern: &str, handler: F) -> Self
    where
        Req: DeserializeOwned + Send + 'static,
        Res: Serialize + Send + 'static,
        E: Into<RpcError> + Send + 'static,
        F: Fn(Req) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Res, E>> + Send + 'static,
    {
        let handler = Arc::new(handler);
        let erased: Handler = Arc::new(move |payload: Value| {
            let handler = handler.clone();
            Box::pin(async move {
                let request: Req = serde_json::from_value(payload).map_err(|e| {
                    RpcError::bad_request(format!("invalid payload: {e}")).to_value()
                })?;
                match handler(request).await {
                    Ok(response) => serde_json::to_value(response).map_err(|e| {
                        RpcError::internal(format!("unserializable response: {e}")).to_value()
                    }),
                    Err(err) => Err(err.into().to_value()),
                }
            })
        });
        if self.handlers.insert(pattern.to_string(), erased).is_some() {
            tracing::warn!(pattern, "RPC handler replaced");
        }
        self
    }

    /// Registered patterns, sorted.
    pub fn patterns(&self) -> Vec<&str> {
        let mut patterns: Vec<&str> = self.handlers.keys().map(String::as_str).collect();
        patterns.sort_unstable();
        patterns
    }

    /// Run the handler registered for `pattern`.
    pub async fn dispatch(&self, pattern: &str, payload: Value) -> RpcResult {
        let Some(handler) = self.handlers.get(pattern) else {
            tracing::warn!(pattern, "No handler for RPC pattern");
            return Err(RpcError::not_found(NO_HANDLER_MESSAGE).to_value());
        };
        tracing::debug!(pattern, "Dispatching RPC call");
        let result = handler(payload).await;
        if let Err(err) = &result {
            tracing::debug!(pattern, error = %err, "RPC call failed");
        }
        result
    }

    /// Answer a wire request, echoing its id.
    pub async fn handle(&self, request: RpcRequest) -> RpcReply {
        let result = self.dispatch(&request.pattern, request.data).await;
        RpcReply::from_result(request.id, result)
    }
}

impl std::fmt::Debug for RpcRouter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RpcRouter")
            .field("patterns", &self.patterns())
            .finish()
    }
}
