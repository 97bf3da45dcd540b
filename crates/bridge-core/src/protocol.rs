//! JSON-RPC 2.0 wire-format types for the bridge WebSocket protocol.
//!
//! Every frame is one JSON text message. Client→server frames are
//! requests. Server→client frames are either responses (they carry the
//! echoed `id`, or `id: null` when the server could not read the request)
//! or unsolicited notifications (`method` present, no `id`).

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::BridgeError;

/// JSON-RPC version tag carried by every request.
pub const JSONRPC_VERSION: &str = "2.0";

/// Outgoing request frame.
#[derive(Clone, Debug, Serialize)]
pub struct RpcRequest {
    /// Always `"2.0"`.
    pub jsonrpc: &'static str,
    /// Request identifier, echoed back in the matching response.
    pub id: u64,
    /// Method name (e.g. `bridge.ping`).
    pub method: String,
    /// Parameters object. Always present on the wire: the client injects
    /// `auth` even when the caller passed no params.
    pub params: Value,
}

impl RpcRequest {
    /// Build a request frame.
    pub fn new(id: u64, method: impl Into<String>, params: Value) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION,
            id,
            method: method.into(),
            params,
        }
    }
}

/// Incoming response frame.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RpcResponse {
    /// Echoed request identifier. `Some(Value::Null)` when the server
    /// answered a request it could not parse.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,
    /// Result payload (success).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    /// Error payload (failure).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<RpcErrorBody>,
}

impl RpcResponse {
    /// Whether this response echoes the given numeric request id.
    pub fn answers(&self, id: u64) -> bool {
        matches!(&self.id, Some(Value::Number(n)) if n.as_u64() == Some(id))
    }

    /// Collapse into the caller-facing result, normalizing protocol
    /// errors into [`BridgeError::Rpc`].
    ///
    /// A well-formed response carries exactly one of `result` / `error`;
    /// if a server ever sends both, the error wins.
    pub fn into_result(self) -> Result<Value, BridgeError> {
        if let Some(body) = self.error {
            return Err(BridgeError::Rpc {
                code: body.code,
                message: body.message,
                data: body.data,
            });
        }
        match self.result {
            Some(result) => Ok(result),
            None => Err(BridgeError::Malformed {
                message: "response carries neither result nor error".into(),
            }),
        }
    }
}

/// Structured error body inside a failed response.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RpcErrorBody {
    /// Machine-readable code (e.g. `E_NOT_FOUND`). Forwarded verbatim.
    pub code: String,
    /// Human-readable message.
    pub message: String,
    /// Optional structured details.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

/// Incoming notification frame (server push, never answered).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RpcNotification {
    /// Notification method; event pushes use `events.notification`.
    pub method: String,
    /// Notification payload.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub params: Option<Value>,
}

impl RpcNotification {
    /// Payload of this notification, defaulting to an empty object when
    /// the server sent none.
    pub fn into_payload(self) -> Value {
        self.params
            .unwrap_or_else(|| Value::Object(serde_json::Map::new()))
    }
}

/// A classified server→client frame.
#[derive(Clone, Debug)]
pub enum InboundFrame {
    /// Response to a request this client sent.
    Response(RpcResponse),
    /// Unsolicited notification.
    Notification(RpcNotification),
}

impl InboundFrame {
    /// Parse and classify one text frame.
    pub fn parse(text: &str) -> Result<Self, BridgeError> {
        let value: Value = serde_json::from_str(text)?;
        Self::classify(value)
    }

    /// Classify an already-parsed frame.
    ///
    /// A frame with a `method` and no meaningful `id` is a notification.
    /// A frame carrying an `id`, a `result`, or an `error` is a response;
    /// the `error` case includes `id: null` answers to unparseable
    /// requests. Anything else is malformed.
    pub fn classify(value: Value) -> Result<Self, BridgeError> {
        let has_id = value.get("id").is_some_and(|id| !id.is_null());
        if !has_id && value.get("method").is_some() {
            return Ok(Self::Notification(serde_json::from_value(value)?));
        }
        if has_id || value.get("result").is_some() || value.get("error").is_some() {
            return Ok(Self::Response(serde_json::from_value(value)?));
        }
        Err(BridgeError::Malformed {
            message: "frame is neither a response nor a notification".into(),
        })
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
