//! # bridge-cli
//!
//! `bridge` — command-line access to the editor bridge: one-shot calls,
//! a connection doctor, and event tailing.
//!
//! Results go to stdout as JSON; logs and problems go to stderr, so the
//! output stays pipeable. Exit codes: 0 ok, 1 failure, 2 missing
//! credential.

#![deny(unsafe_code)]

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use serde_json::Value;

use bridge_client::{BridgeClient, BridgeError, ClientConfig, SubscribeOptions, auth};
use bridge_core::constants::EXTENSION_ID;
use bridge_core::methods;

/// Command-line client for the AI-native VS Code bridge.
#[derive(Parser, Debug)]
#[command(name = "bridge", about = "Talk to the VS Code bridge", version)]
struct Cli {
    #[command(flatten)]
    connect: ConnectArgs,

    /// Log level when RUST_LOG is unset.
    #[arg(long, default_value = "warn", global = true)]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

/// Connection options shared by every subcommand.
#[derive(Args, Debug, Default)]
struct ConnectArgs {
    /// Bridge host (default 127.0.0.1, or $BRIDGE_HOST).
    #[arg(long, global = true)]
    host: Option<String>,

    /// Bridge port (default 57110, or $BRIDGE_PORT).
    #[arg(long, global = true)]
    port: Option<u16>,

    /// Bearer token (default: $BRIDGE_TOKEN, $TOKEN, or the token file).
    #[arg(long, global = true)]
    token: Option<String>,

    /// Token file (default: <workspace>/.vscode/bridge.token).
    #[arg(long, global = true)]
    token_file: Option<PathBuf>,

    /// Workspace root anchoring the default token file.
    #[arg(long, global = true)]
    workspace_dir: Option<PathBuf>,
}

impl ConnectArgs {
    fn to_config(&self) -> ClientConfig {
        self.layer_onto(ClientConfig::from_env())
    }

    /// Flags override whatever the base (defaults plus env) carries.
    fn layer_onto(&self, mut config: ClientConfig) -> ClientConfig {
        if let Some(host) = &self.host {
            config.host.clone_from(host);
        }
        if let Some(port) = self.port {
            config.port = port;
        }
        if self.token.is_some() {
            config.token.clone_from(&self.token);
        }
        if self.token_file.is_some() {
            config.token_file.clone_from(&self.token_file);
        }
        if self.workspace_dir.is_some() {
            config.workspace_dir.clone_from(&self.workspace_dir);
        }
        config
    }
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Invoke one RPC method and print its result as JSON.
    Call {
        /// Method name, e.g. bridge.ping.
        method: String,
        /// Params as inline JSON (must be an object).
        #[arg(long, conflicts_with = "params_file")]
        params: Option<String>,
        /// Read params from a JSON file instead.
        #[arg(long)]
        params_file: Option<PathBuf>,
    },
    /// Check that the editor, extension, and bridge are reachable.
    Doctor,
    /// Subscribe to bridge events and print one JSON object per line.
    Events {
        /// Only these event names (comma-separated or repeated).
        #[arg(long, value_delimiter = ',')]
        events: Vec<String>,
        /// Replay up to this many recent events first.
        #[arg(long, default_value_t = 0)]
        replay: u32,
        /// Exit after printing this many events.
        #[arg(long)]
        count: Option<u64>,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_logging(&cli.log_level);

    let code = match run(cli).await {
        Ok(code) => code,
        Err(err) => {
            eprintln!("error: {err:#}");
            match err.downcast_ref::<BridgeError>() {
                Some(BridgeError::Auth) => 2,
                _ => 1,
            }
        }
    };
    std::process::exit(code);
}

async fn run(cli: Cli) -> Result<i32> {
    let config = cli.connect.to_config();
    match cli.command {
        Command::Call {
            method,
            params,
            params_file,
        } => cmd_call(&config, &method, params.as_deref(), params_file.as_deref()).await,
        Command::Doctor => cmd_doctor(&config).await,
        Command::Events {
            events,
            replay,
            count,
        } => cmd_events(&config, events, replay, count).await,
    }
}

// ── call ────────────────────────────────────────────────────────────

async fn cmd_call(
    config: &ClientConfig,
    method: &str,
    params: Option<&str>,
    params_file: Option<&Path>,
) -> Result<i32> {
    let params = read_params(params, params_file)?;
    let client = BridgeClient::from_config(config)?;
    let result = client.call(method, params).await?;
    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(0)
}

/// Load params from the inline flag or a file; `None` when neither is
/// given. Validation beyond "is JSON" is left to the client and server.
fn read_params(inline: Option<&str>, file: Option<&Path>) -> Result<Option<Value>> {
    let raw = match (inline, file) {
        (Some(text), _) => Some(text.to_owned()),
        (None, Some(path)) => Some(
            std::fs::read_to_string(path)
                .with_context(|| format!("reading params file {}", path.display()))?,
        ),
        (None, None) => None,
    };
    raw.map(|text| serde_json::from_str(&text).context("params is not valid JSON"))
        .transpose()
}

// ── doctor ──────────────────────────────────────────────────────────

async fn cmd_doctor(config: &ClientConfig) -> Result<i32> {
    let mut problems: Vec<String> = Vec::new();

    if editor_version().await.is_none() {
        problems.push("`code --version` failed; is the VS Code CLI on PATH?".to_owned());
    }
    match extension_installed().await {
        Some(true) => {}
        Some(false) => problems.push(format!("extension {EXTENSION_ID} is not installed")),
        None => {
            problems.push("`code --list-extensions` failed; cannot verify the extension".to_owned());
        }
    }

    let mut protocol = None;
    match BridgeClient::from_config(config) {
        Ok(client) => match client.call(methods::BRIDGE_PING, None).await {
            Ok(result) => {
                protocol = result
                    .get("protocol")
                    .and_then(Value::as_str)
                    .map(str::to_owned);
            }
            Err(err) => {
                problems.push(format!("no bridge at {}: {err}", config.endpoint().url()));
            }
        },
        Err(err @ BridgeError::Auth) => {
            let path =
                auth::token_file_path(config.token_file.as_deref(), config.workspace_dir.as_deref());
            problems.push(format!("{err} (expected token file: {})", path.display()));
        }
        Err(err) => problems.push(err.to_string()),
    }

    if problems.is_empty() {
        println!(
            "ok: bridge at {} speaks {}",
            config.endpoint().url(),
            protocol.as_deref().unwrap_or("unknown")
        );
        Ok(0)
    } else {
        eprintln!("doctor found {} problem(s):", problems.len());
        for problem in &problems {
            eprintln!("  - {problem}");
        }
        Ok(1)
    }
}

/// First line of `code --version`, if the CLI is available.
async fn editor_version() -> Option<String> {
    let output = tokio::process::Command::new("code")
        .arg("--version")
        .output()
        .await
        .ok()?;
    if !output.status.success() {
        return None;
    }
    String::from_utf8(output.stdout)
        .ok()?
        .lines()
        .next()
        .map(str::to_owned)
}

/// Whether the bridge extension shows up in `code --list-extensions`.
async fn extension_installed() -> Option<bool> {
    let output = tokio::process::Command::new("code")
        .arg("--list-extensions")
        .output()
        .await
        .ok()?;
    if !output.status.success() {
        return None;
    }
    let listed = String::from_utf8(output.stdout).ok()?;
    Some(listed.lines().any(|line| line.trim() == EXTENSION_ID))
}

// ── events ──────────────────────────────────────────────────────────

async fn cmd_events(
    config: &ClientConfig,
    events: Vec<String>,
    replay: u32,
    count: Option<u64>,
) -> Result<i32> {
    let client = BridgeClient::from_config(config)?;
    let options = if events.is_empty() {
        SubscribeOptions::all().with_replay(replay)
    } else {
        SubscribeOptions::events(events).with_replay(replay)
    };

    let mut sub = client.subscribe(options).await?;
    tracing::info!(subscription_id = %sub.subscription_id(), "subscribed");

    let mut printed = 0u64;
    loop {
        if count.is_some_and(|limit| printed >= limit) {
            break;
        }
        tokio::select! {
            event = sub.next() => match event? {
                Some(payload) => {
                    println!("{payload}");
                    printed += 1;
                }
                None => break,
            },
            _ = tokio::signal::ctrl_c() => break,
        }
    }
    sub.close().await?;
    Ok(0)
}

// ── logging ─────────────────────────────────────────────────────────

/// Set up the tracing subscriber. `RUST_LOG` wins; the flag is the
/// fallback. Output goes to stderr so stdout stays valid JSON.
fn init_logging(level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .compact();

    // try_init is a no-op if a subscriber is already set
    let _ = subscriber.try_init();
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn flags_layer_over_defaults() {
        let args = ConnectArgs {
            host: Some("10.1.1.1".into()),
            port: Some(6001),
            token: Some("tok".into()),
            ..ConnectArgs::default()
        };
        let config = args.layer_onto(ClientConfig::default());
        assert_eq!(config.host, "10.1.1.1");
        assert_eq!(config.port, 6001);
        assert_eq!(config.token.as_deref(), Some("tok"));
    }

    #[test]
    fn absent_flags_keep_the_base() {
        let config = ConnectArgs::default().layer_onto(ClientConfig::default());
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 57110);
        assert!(config.token.is_none());
    }

    #[test]
    fn inline_params_are_parsed() {
        let params = read_params(Some(r#"{"uri":"file:///a.rs"}"#), None).unwrap();
        assert_eq!(params.unwrap()["uri"], "file:///a.rs");
    }

    #[test]
    fn file_params_are_parsed() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("params.json");
        std::fs::write(&path, r#"{"detail": true}"#).unwrap();
        let params = read_params(None, Some(&path)).unwrap();
        assert_eq!(params.unwrap()["detail"], true);
    }

    #[test]
    fn missing_params_stay_none() {
        assert!(read_params(None, None).unwrap().is_none());
    }

    #[test]
    fn invalid_params_are_rejected() {
        assert!(read_params(Some("{nope"), None).is_err());
    }

    #[test]
    fn missing_params_file_is_an_error() {
        assert!(read_params(None, Some(Path::new("/does/not/exist.json"))).is_err());
    }
}
