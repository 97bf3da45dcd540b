//! Bridge error codes and the client-facing error type.

use serde_json::Value;
use tokio_tungstenite::tungstenite;

// ── Protocol error code constants ───────────────────────────────────

/// Missing or rejected credential.
pub const E_AUTH: &str = "E_AUTH";
/// Requested resource does not exist.
pub const E_NOT_FOUND: &str = "E_NOT_FOUND";
/// Required parameter missing or wrong shape.
pub const E_INVALID_PARAMS: &str = "E_INVALID_PARAMS";
/// Operation was attempted and failed.
pub const E_FAILED: &str = "E_FAILED";
/// Method or capability not offered by this editor.
pub const E_UNSUPPORTED: &str = "E_UNSUPPORTED";
/// Caller is not allowed to perform the operation.
pub const E_PERMISSION: &str = "E_PERMISSION";

/// Everything a bridge call can fail with.
///
/// Two families matter to callers: [`BridgeError::Rpc`] is the editor
/// rejecting a request it received and understood, everything else is the
/// request never completing (no credential, no connection, garbled frame).
/// [`BridgeError::is_transport`] separates the two.
#[derive(Debug, thiserror::Error)]
pub enum BridgeError {
    /// No credential could be resolved from any source.
    #[error(
        "E_AUTH: no bridge token found; pass one explicitly, set $BRIDGE_TOKEN, or pair the extension to create .vscode/bridge.token"
    )]
    Auth,

    /// Client configuration is unusable.
    #[error("invalid configuration: {message}")]
    Config {
        /// Description of what is wrong.
        message: String,
    },

    /// Caller-supplied params cannot be sent.
    #[error("invalid params: {message}")]
    InvalidParams {
        /// Description of what is wrong.
        message: String,
    },

    /// The editor answered with a protocol error.
    ///
    /// The `code` is forwarded verbatim and never interpreted by the
    /// client; servers may extend the vocabulary beyond the `E_*`
    /// constants in this module.
    #[error("{code}: {message}")]
    Rpc {
        /// Machine-readable code (e.g. [`E_NOT_FOUND`]).
        code: String,
        /// Human-readable message.
        message: String,
        /// Optional structured details.
        data: Option<Value>,
    },

    /// WebSocket connectivity failure.
    #[error("transport error: {0}")]
    Transport(#[from] tungstenite::Error),

    /// An inbound frame was not a valid protocol message.
    #[error("malformed frame: {message}")]
    Malformed {
        /// Description of what could not be parsed.
        message: String,
    },

    /// The connection ended before the expected response arrived.
    #[error("connection closed before a response arrived")]
    ConnectionClosed,
}

impl BridgeError {
    /// Protocol error code, when the editor reported one.
    ///
    /// `None` for every locally-produced failure, so callers can branch on
    /// specific server codes without string-matching [`Display`] output.
    ///
    /// [`Display`]: std::fmt::Display
    pub fn rpc_code(&self) -> Option<&str> {
        match self {
            Self::Rpc { code, .. } => Some(code),
            _ => None,
        }
    }

    /// Whether this failure happened below the protocol: the request was
    /// never delivered or the reply never made it back intact.
    ///
    /// Transport failures may be worth retrying once the editor is back;
    /// protocol errors generally are not.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            Self::Transport(_) | Self::ConnectionClosed | Self::Malformed { .. }
        )
    }
}

impl From<serde_json::Error> for BridgeError {
    fn from(err: serde_json::Error) -> Self {
        Self::Malformed {
            message: err.to_string(),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn rpc_display_is_code_colon_message() {
        let err = BridgeError::Rpc {
            code: E_NOT_FOUND.into(),
            message: "no editor for untitled:1".into(),
            data: None,
        };
        assert_eq!(err.to_string(), "E_NOT_FOUND: no editor for untitled:1");
    }

    #[test]
    fn auth_display_names_every_credential_source() {
        let text = BridgeError::Auth.to_string();
        assert!(text.contains("E_AUTH"));
        assert!(text.contains("BRIDGE_TOKEN"));
        assert!(text.contains(".vscode/bridge.token"));
    }

    #[test]
    fn unknown_server_codes_pass_through() {
        // Servers may use codes outside the canonical vocabulary.
        let err = BridgeError::Rpc {
            code: "E_NOT_READY".into(),
            message: "still indexing".into(),
            data: None,
        };
        assert_eq!(err.rpc_code(), Some("E_NOT_READY"));
        assert!(!err.is_transport());
    }

    #[test]
    fn local_failures_have_no_rpc_code() {
        assert_eq!(BridgeError::Auth.rpc_code(), None);
        assert_eq!(BridgeError::ConnectionClosed.rpc_code(), None);
    }

    #[test]
    fn transport_classification() {
        let transport: BridgeError = tungstenite::Error::ConnectionClosed.into();
        assert!(transport.is_transport());
        assert!(BridgeError::ConnectionClosed.is_transport());
        assert!(
            BridgeError::Malformed {
                message: "not json".into()
            }
            .is_transport()
        );
        assert!(!BridgeError::Auth.is_transport());
        assert!(
            !BridgeError::InvalidParams {
                message: "params must be an object".into()
            }
            .is_transport()
        );
    }

    #[test]
    fn serde_failures_become_malformed() {
        let serde_err = serde_json::from_str::<Value>("{not json").unwrap_err();
        let err: BridgeError = serde_err.into();
        assert_matches!(err, BridgeError::Malformed { .. });
    }
}
