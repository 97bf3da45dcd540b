//! # bridge-agent
//!
//! Demo agent for the bridge: observe, decide, act, verify.
//!
//! Lists workspace diagnostics, previews the editor's code-action fixes
//! for each one, applies the first available action, and re-checks what
//! remains. `--dry-run` previews without touching the workspace.

#![deny(unsafe_code)]

use std::time::Duration;

use anyhow::Result;
use clap::{Parser, ValueEnum};
use serde_json::{Value, json};
use tracing::warn;

use bridge_client::{BridgeClient, BridgeError, ClientConfig};
use bridge_core::methods;

/// Fix workspace diagnostics through the VS Code bridge.
#[derive(Parser, Debug)]
#[command(name = "bridge-agent", about = "Fix workspace diagnostics through the bridge")]
struct Cli {
    /// Bridge host (default 127.0.0.1, or $BRIDGE_HOST).
    #[arg(long)]
    host: Option<String>,

    /// Bridge port (default 57110, or $BRIDGE_PORT).
    #[arg(long)]
    port: Option<u16>,

    /// Minimum severity to fix (warning = errors plus warnings).
    #[arg(long, value_enum, default_value = "warning")]
    severity: Severity,

    /// Preview fixes without applying them.
    #[arg(long)]
    dry_run: bool,

    /// Log level when RUST_LOG is unset.
    #[arg(long, default_value = "warn")]
    log_level: String,
}

/// Diagnostic severity floor, matching the editor's numeric ranks.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Severity {
    Error,
    Warning,
    Info,
    Hint,
}

impl Severity {
    /// Editor rank: 0 is most severe.
    fn rank(self) -> u64 {
        match self {
            Self::Error => 0,
            Self::Warning => 1,
            Self::Info => 2,
            Self::Hint => 3,
        }
    }
}

fn severity_label(rank: u64) -> &'static str {
    match rank {
        0 => "Error",
        1 => "Warning",
        2 => "Info",
        3 => "Hint",
        _ => "Unknown",
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli.log_level);

    let mut config = ClientConfig::from_env();
    if let Some(host) = cli.host {
        config.host = host;
    }
    if let Some(port) = cli.port {
        config.port = port;
    }
    let client = BridgeClient::from_config(&config)?;
    run_agent(&client, cli.severity.rank(), cli.dry_run).await
}

async fn run_agent(client: &BridgeClient, min_rank: u64, dry_run: bool) -> Result<()> {
    println!("connecting to the bridge ...");
    let pong = client.call(methods::BRIDGE_PING, None).await?;
    println!(
        "  connected (protocol: {})",
        pong.get("protocol").and_then(Value::as_str).unwrap_or("?")
    );

    println!("fetching workspace diagnostics ...");
    let listing = client.call(methods::DIAGNOSTICS_LIST, None).await?;
    let files = listing["files"].as_array().cloned().unwrap_or_default();
    if files.is_empty() {
        println!("  no diagnostics, workspace is clean");
        return Ok(());
    }

    let mut total = 0usize;
    let mut targets: Vec<(String, Vec<Value>)> = Vec::new();
    for file in &files {
        let Some(uri) = file["uri"].as_str() else {
            continue;
        };
        let all = file["diagnostics"].as_array().cloned().unwrap_or_default();
        let matching = filter_by_severity(&all, min_rank);
        if matching.is_empty() {
            continue;
        }
        println!("\n  {}", short_uri(uri));
        for diag in &matching {
            println!("{}", fmt_diagnostic(diag));
        }
        total += matching.len();
        targets.push((uri.to_owned(), matching));
    }
    println!(
        "\n  found {total} diagnostic(s) across {} file(s)",
        targets.len()
    );
    if total == 0 {
        println!("  nothing to fix at this severity");
        return Ok(());
    }

    let (fixed, skipped) = fix_all(client, &targets, dry_run).await;

    println!("\nsummary");
    println!("  fixed: {fixed}{}", if dry_run { " (dry-run)" } else { "" });
    println!("  skipped: {skipped}");

    if !dry_run && fixed > 0 {
        // Give the editor a moment to recompute diagnostics.
        tokio::time::sleep(Duration::from_millis(1500)).await;
        let after = client.call(methods::DIAGNOSTICS_LIST, None).await?;
        println!("  remaining diagnostics: {}", count_diagnostics(&after));
    }
    Ok(())
}

/// Apply the first previewed action for every target diagnostic.
///
/// Per-item failures are warned about and skipped; one stubborn
/// diagnostic never aborts the run. Returns `(fixed, skipped)` counts.
async fn fix_all(
    client: &BridgeClient,
    targets: &[(String, Vec<Value>)],
    dry_run: bool,
) -> (usize, usize) {
    let mut fixed = 0usize;
    let mut skipped = 0usize;
    for (uri, diagnostics) in targets {
        for diag in diagnostics {
            match fix_one(client, uri, diag, dry_run).await {
                Ok(FixOutcome::Fixed(title)) => {
                    fixed += 1;
                    if dry_run {
                        println!("  [dry-run] would apply: {title} ({})", short_uri(uri));
                    } else {
                        println!("  fixed: {title} ({})", short_uri(uri));
                    }
                }
                Ok(FixOutcome::NoAction) => skipped += 1,
                Ok(FixOutcome::NotApplied(title)) => {
                    skipped += 1;
                    println!("  could not apply: {title} ({})", short_uri(uri));
                }
                Err(err) => {
                    skipped += 1;
                    warn!(uri = %short_uri(uri), "skipping one diagnostic: {err}");
                }
            }
        }
    }
    (fixed, skipped)
}

enum FixOutcome {
    /// An action was applied (or would be, in dry-run).
    Fixed(String),
    /// The editor offered no action for this diagnostic.
    NoAction,
    /// The editor had an action but reported it was not applied.
    NotApplied(String),
}

/// Preview the actions for one diagnostic and apply the first.
async fn fix_one(
    client: &BridgeClient,
    uri: &str,
    diag: &Value,
    dry_run: bool,
) -> Result<FixOutcome, BridgeError> {
    let preview = client
        .call(
            methods::DIAGNOSTICS_FIX_PREVIEW,
            Some(json!({
                "uri": uri,
                "diagnosticRange": diag["range"],
            })),
        )
        .await?;

    let Some(action) = preview["actions"].get(0) else {
        return Ok(FixOutcome::NoAction);
    };
    let title = action["title"].as_str().unwrap_or("(untitled)").to_owned();
    if dry_run {
        return Ok(FixOutcome::Fixed(title));
    }

    let committed = client
        .call(
            methods::DIAGNOSTICS_FIX_COMMIT,
            Some(json!({
                "uri": uri,
                "diagnosticRange": diag["range"],
                "actionIndex": action["index"].as_u64().unwrap_or(0),
            })),
        )
        .await?;
    if committed["applied"].as_bool().unwrap_or(false) {
        Ok(FixOutcome::Fixed(title))
    } else {
        Ok(FixOutcome::NotApplied(title))
    }
}

/// Diagnostics at or above the severity floor (lower rank = more severe).
fn filter_by_severity(diagnostics: &[Value], min_rank: u64) -> Vec<Value> {
    diagnostics
        .iter()
        .filter(|diag| diag["severity"].as_u64().unwrap_or(0) <= min_rank)
        .cloned()
        .collect()
}

/// Total diagnostics across a `diagnostics.list` result.
fn count_diagnostics(listing: &Value) -> usize {
    listing["files"].as_array().map_or(0, |files| {
        files
            .iter()
            .map(|file| file["diagnostics"].as_array().map_or(0, Vec::len))
            .sum()
    })
}

/// Strip the file:// prefix for readability.
fn short_uri(uri: &str) -> &str {
    uri.strip_prefix("file://").unwrap_or(uri)
}

fn fmt_diagnostic(diag: &Value) -> String {
    let label = severity_label(diag["severity"].as_u64().unwrap_or(0));
    let start = &diag["range"]["start"];
    let line = start["line"]
        .as_u64()
        .map_or_else(|| "?".to_owned(), |n| n.to_string());
    let character = start["character"]
        .as_u64()
        .map_or_else(|| "?".to_owned(), |n| n.to_string());
    let message = diag["message"].as_str().unwrap_or("(no message)");
    format!("  [{label}] L{line}:{character} {message}")
}

/// Set up the tracing subscriber. `RUST_LOG` wins; the flag is the
/// fallback.
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
