//! Bearer-token resolution.
//!
//! Sources in precedence order: explicit token, `$BRIDGE_TOKEN`, `$TOKEN`,
//! then the token file the extension writes on pairing. The first
//! non-empty source wins; file contents are trimmed. Empty values never
//! count as a credential, so a blank env var falls through instead of
//! producing an unusable token.

use std::path::{Path, PathBuf};

use tracing::debug;

use bridge_core::BridgeError;
use bridge_core::constants::{TOKEN_ENV, TOKEN_ENV_ALIAS, TOKEN_FILE_RELATIVE};

/// Resolve the bearer token from the standard sources.
///
/// `token_file` overrides where the file is looked for; `workspace_dir`
/// anchors the default location (falling back to the current directory).
pub fn resolve_token(
    explicit: Option<&str>,
    token_file: Option<&Path>,
    workspace_dir: Option<&Path>,
) -> Result<String, BridgeError> {
    resolve_token_with(explicit, token_file, workspace_dir, |name| {
        std::env::var(name).ok()
    })
}

/// [`resolve_token`] with an injected environment, so precedence is
/// testable without mutating process state.
pub(crate) fn resolve_token_with(
    explicit: Option<&str>,
    token_file: Option<&Path>,
    workspace_dir: Option<&Path>,
    env: impl Fn(&str) -> Option<String>,
) -> Result<String, BridgeError> {
    if let Some(token) = explicit {
        if !token.is_empty() {
            return Ok(token.to_owned());
        }
    }

    for name in [TOKEN_ENV, TOKEN_ENV_ALIAS] {
        if let Some(value) = env(name) {
            if !value.is_empty() {
                return Ok(value);
            }
        }
    }

    let path = token_file_path(token_file, workspace_dir);
    match std::fs::read_to_string(&path) {
        Ok(contents) => {
            let token = contents.trim();
            if !token.is_empty() {
                return Ok(token.to_owned());
            }
        }
        Err(err) => debug!(path = %path.display(), "token file not readable: {err}"),
    }

    Err(BridgeError::Auth)
}

/// Where the token file is expected for this workspace.
pub fn token_file_path(token_file: Option<&Path>, workspace_dir: Option<&Path>) -> PathBuf {
    match token_file {
        Some(path) => path.to_path_buf(),
        None => {
            let base = match workspace_dir {
                Some(dir) => dir.to_path_buf(),
                None => std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
            };
            base.join(TOKEN_FILE_RELATIVE)
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
