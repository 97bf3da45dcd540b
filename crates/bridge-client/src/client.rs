//! The one-shot RPC client.

use std::fmt;

use serde_json::{Map, Value, json};
use tracing::debug;

use bridge_core::BridgeError;
use bridge_core::protocol::RpcRequest;

use crate::auth;
use crate::config::{ClientConfig, Endpoint};
use crate::subscription::{SubscribeOptions, Subscription};
use crate::transport;

/// Request id used on one-shot connections. Every call gets a fresh
/// connection, so the id never needs to vary.
const ONESHOT_REQUEST_ID: u64 = 1;

/// Client for the editor bridge.
///
/// Construction resolves the credential once; every call reuses it.
/// Calls are fully independent: each opens its own connection, performs
/// one request/response exchange, and closes. For a stream of events see
/// [`BridgeClient::subscribe`].
pub struct BridgeClient {
    endpoint: Endpoint,
    token: String,
}

impl fmt::Debug for BridgeClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BridgeClient")
            .field("endpoint", &self.endpoint)
            .field("token", &"***")
            .finish()
    }
}

impl BridgeClient {
    /// Build a client from explicit configuration.
    ///
    /// Fails with [`BridgeError::Auth`] when no credential source yields
    /// a token, so misconfiguration surfaces here instead of on the
    /// first call.
    pub fn from_config(config: &ClientConfig) -> Result<Self, BridgeError> {
        if config.port == 0 {
            return Err(BridgeError::Config {
                message: "port must be non-zero".into(),
            });
        }
        let token = auth::resolve_token(
            config.token.as_deref(),
            config.token_file.as_deref(),
            config.workspace_dir.as_deref(),
        )?;
        Ok(Self {
            endpoint: config.endpoint(),
            token,
        })
    }

    /// Build a client for the current workspace: default endpoint plus
    /// environment overrides, credential from the standard sources.
    pub fn from_workspace() -> Result<Self, BridgeError> {
        Self::from_config(&ClientConfig::from_env())
    }

    /// Endpoint this client talks to.
    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    /// Invoke one RPC method and return its `result` payload.
    ///
    /// `params` must be a JSON object or `None`; the client adds the
    /// `auth` envelope itself. A rejection from the editor surfaces as
    /// [`BridgeError::Rpc`] with the server's code intact; connectivity
    /// problems surface as transport errors. The two are distinguishable
    /// via [`BridgeError::is_transport`].
    pub async fn call(&self, method: &str, params: Option<Value>) -> Result<Value, BridgeError> {
        let params = inject_auth(params, &self.token)?;
        let request = RpcRequest::new(ONESHOT_REQUEST_ID, method, params);
        debug!(method, endpoint = %self.endpoint, "bridge call");
        let response = transport::exchange(&self.endpoint.url(), &request).await?;
        response.into_result()
    }

    /// Open an event subscription session on a dedicated connection.
    pub async fn subscribe(&self, options: SubscribeOptions) -> Result<Subscription, BridgeError> {
        Subscription::open(&self.endpoint.url(), &self.token, options).await
    }
}

/// Merge the auth envelope into caller params.
///
/// The caller's map is taken by value and extended; a caller-supplied
/// `auth` key is overwritten. Non-object params cannot carry the envelope
/// and are rejected before any connection is opened.
pub(crate) fn inject_auth(params: Option<Value>, token: &str) -> Result<Value, BridgeError> {
    let mut map = match params {
        None => Map::new(),
        Some(Value::Object(map)) => map,
        Some(_) => {
            return Err(BridgeError::InvalidParams {
                message: "params must be a JSON object".into(),
            });
        }
    };
    let _ = map.insert("auth".into(), json!({ "token": token }));
    Ok(Value::Object(map))
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
