use std::future::Future;
use std::sync::Arc;

use catalog_core::RpcError;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::router::{RpcResult, RpcRouter};

/// Request/response over some transport, addressed by pattern.
///
/// Uses RPITIT (return-position `impl Trait` in traits), no `async-trait` needed.
pub trait RpcClient: Send + Sync {
    fn send(&self, pattern: &str, payload: Value) -> impl Future<Output = RpcResult> + Send;

    /// Typed call; failures come back normalized.
    fn call<Req, Res>(
        &self,
        pattern: &str,
        request: &Req,
    ) -> impl Future<Output = Result<Res, RpcError>> + Send
    where
        Req: Serialize + Sync,
        Res: DeserializeOwned + Send,
    {
        async move {
            let payload = serde_json::to_value(request)
                .map_err(|e| RpcError::bad_request(format!("unserializable request: {e}")))?;
            let response = self
                .send(pattern, payload)
                .await
                .map_err(|raised| RpcError::normalize(&raised))?;
            serde_json::from_value(response)
                .map_err(|e| RpcError::internal(format!("unexpected response shape: {e}")))
        }
    }
}

/// In-process client dispatching straight into a shared [`RpcRouter`].
#[derive(Clone, Debug)]
pub struct LocalRpcClient {
    router: Arc<RpcRouter>,
}

impl LocalRpcClient {
    pub fn new(router: Arc<RpcRouter>) -> Self {
        Self { router }
    }
}

impl RpcClient for LocalRpcClient {
    async fn send(&self, pattern: &str, payload: Value) -> RpcResult {
        self.router.dispatch(pattern, payload).await
    }
}
