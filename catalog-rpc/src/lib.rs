//! # catalog-rpc
//!
//! Message-addressed request/response for the catalog services.
//!
//! | Type | Description |
//! |------|-------------|
//! | [`RpcRouter`] | pattern -> async handler dispatch table |
//! | [`RpcRequest`] / [`RpcReply`] | wire packets |
//! | [`RpcClient`] / [`LocalRpcClient`] | typed calls, in-process client |
//! | [`AmqpServer`] | RabbitMQ consumer answering on `reply_to` |
//! | [`http::tunnel`] | axum router carrying calls over HTTP |

pub mod amqp;
pub mod client;
pub mod http;
pub mod packet;
pub mod router;

pub use amqp::{AmqpServer, TransportError};
pub use client::{LocalRpcClient, RpcClient};
pub use packet::{RpcReply, RpcRequest};
pub use router::{RpcResult, RpcRouter, NO_HANDLER_MESSAGE};

pub mod prelude {
    //! Re-exports of the most commonly used RPC types.
    pub use crate::{LocalRpcClient, RpcClient, RpcRouter};
    pub use catalog_core::RpcError;
}
