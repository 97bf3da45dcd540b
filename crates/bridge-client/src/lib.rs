//! # bridge-client
//!
//! WebSocket client for the AI-native VS Code bridge.
//!
//! Two ways to talk to the editor:
//! - [`BridgeClient::call`] — one-shot JSON-RPC over a dedicated
//!   connection per call. No shared state, no connection pool: a broken
//!   exchange can only ever strand itself.
//! - [`BridgeClient::subscribe`] — a long-lived [`Subscription`] that
//!   replays recent events and then streams live ones until closed.
//!
//! Credentials are resolved once at construction, from an explicit token,
//! `$BRIDGE_TOKEN` / `$TOKEN`, or the `.vscode/bridge.token` file the
//! extension writes on pairing. Tokens are injected into every request
//! and never logged.
//!
//! ```no_run
//! use bridge_client::{BridgeClient, SubscribeOptions};
//!
//! # async fn demo() -> Result<(), bridge_core::BridgeError> {
//! let client = BridgeClient::from_workspace()?;
//! let pong = client.call("bridge.ping", None).await?;
//! println!("editor says {pong}");
//!
//! let mut sub = client.subscribe(SubscribeOptions::all().with_replay(10)).await?;
//! while let Some(event) = sub.next().await? {
//!     println!("{event}");
//! }
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]

pub mod auth;
pub mod client;
pub mod config;
pub mod flow;
pub mod subscription;

mod transport;

pub use client::BridgeClient;
pub use config::{ClientConfig, Endpoint};
pub use subscription::{SubscribeOptions, Subscription};

pub use bridge_core::BridgeError;
