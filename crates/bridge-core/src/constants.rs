//! Protocol defaults shared by every bridge client.

/// Crate version (sourced from Cargo.toml).
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Protocol revision this crate family implements.
pub const PROTOCOL_VERSION: &str = "v1-draft";

/// Host the extension listens on. The bridge is loopback-only and is never
/// exposed beyond the local machine.
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Default WebSocket port the extension listens on.
pub const DEFAULT_PORT: u16 = 57110;

/// Environment variable overriding the default host.
pub const HOST_ENV: &str = "BRIDGE_HOST";

/// Environment variable overriding the default port.
pub const PORT_ENV: &str = "BRIDGE_PORT";

/// Primary environment variable consulted for the bearer token.
pub const TOKEN_ENV: &str = "BRIDGE_TOKEN";

/// Legacy alias for [`TOKEN_ENV`], consulted second.
pub const TOKEN_ENV_ALIAS: &str = "TOKEN";

/// Token file written by the extension on pairing, relative to the
/// workspace root.
pub const TOKEN_FILE_RELATIVE: &str = ".vscode/bridge.token";

/// Marketplace identifier of the editor extension serving the bridge.
pub const EXTENSION_ID: &str = "ai-native.vscode-bridge";
