//! # bridge-core
//!
//! Wire-format types, error taxonomy, and method catalog for the AI-native
//! VS Code bridge protocol (`v1-draft`).
//!
//! The bridge speaks JSON-RPC 2.0 over a loopback WebSocket served by the
//! editor extension. This crate holds everything both ends of a
//! conversation agree on:
//! - frame shapes ([`protocol`])
//! - the `E_*` error vocabulary and the client-facing [`BridgeError`]
//!   taxonomy ([`errors`])
//! - the method catalog ([`methods`])
//! - protocol defaults such as the endpoint and credential locations
//!   ([`constants`])
//!
//! The connection machinery lives in `bridge-client`.

#![deny(unsafe_code)]

pub mod constants;
pub mod errors;
pub mod methods;
pub mod protocol;

pub use errors::BridgeError;
pub use protocol::{InboundFrame, RpcErrorBody, RpcNotification, RpcRequest, RpcResponse};
