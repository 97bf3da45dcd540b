//! Event subscription sessions.
//!
//! A subscription owns one long-lived connection through four phases:
//! subscribe, replay, stream, unsubscribe. Replayed history arrives as
//! ordinary notifications ahead of live ones, in server order; the
//! client does not tell the two apart. However the session ends, the
//! connection is released exactly once.

use std::fmt;

use serde_json::{Value, json};
use tokio_tungstenite::connect_async;
use tracing::{debug, warn};

use bridge_core::BridgeError;
use bridge_core::methods::{EVENTS_NOTIFICATION, EVENTS_SUBSCRIBE, EVENTS_UNSUBSCRIBE};
use bridge_core::protocol::{InboundFrame, RpcRequest};

use crate::transport::{self, WsStream};

/// First request id on a subscription connection. Administrative
/// messages share the connection, so ids count up from here: subscribe
/// takes 1, unsubscribe the next.
const SUBSCRIBE_REQUEST_ID: u64 = 1;

/// Options for opening a subscription.
#[derive(Clone, Debug, Default)]
pub struct SubscribeOptions {
    /// Event names to receive; `None` means every event.
    pub events: Option<Vec<String>>,
    /// How many recent events the server replays on subscribe.
    pub replay: u32,
}

impl SubscribeOptions {
    /// Subscribe to every event, no replay.
    pub fn all() -> Self {
        Self::default()
    }

    /// Subscribe to the named events only.
    pub fn events(names: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            events: Some(names.into_iter().map(Into::into).collect()),
            replay: 0,
        }
    }

    /// Request replay of up to `count` recent events.
    #[must_use]
    pub fn with_replay(mut self, count: u32) -> Self {
        self.replay = count;
        self
    }
}

/// A live event subscription.
///
/// Yields event payloads via [`next`]. Call [`close`] for a clean
/// unsubscribe; dropping without closing still releases the connection,
/// with a best-effort detached unsubscribe when a runtime is available.
///
/// [`next`]: Subscription::next
/// [`close`]: Subscription::close
pub struct Subscription {
    /// `None` once the session is over; the connection is released when
    /// this is taken, and it is only ever taken once.
    ws: Option<WsStream>,
    subscription_id: String,
    token: String,
    next_request_id: u64,
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("subscription_id", &self.subscription_id)
            .field("closed", &self.ws.is_none())
            .field("token", &"***")
            .finish()
    }
}

impl Subscription {
    /// Connect, subscribe, and wait for the acknowledgment.
    pub(crate) async fn open(
        url: &str,
        token: &str,
        options: SubscribeOptions,
    ) -> Result<Self, BridgeError> {
        debug!(%url, replay = options.replay, "opening subscription");
        let (mut ws, _) = connect_async(url).await?;
        match subscribe_handshake(&mut ws, token, &options).await {
            Ok(subscription_id) => {
                debug!(%subscription_id, "subscription established");
                Ok(Self {
                    ws: Some(ws),
                    subscription_id,
                    token: token.to_owned(),
                    next_request_id: SUBSCRIBE_REQUEST_ID + 1,
                })
            }
            Err(err) => {
                let _ = ws.close(None).await;
                Err(err)
            }
        }
    }

    /// Server-assigned identifier for this subscription.
    pub fn subscription_id(&self) -> &str {
        &self.subscription_id
    }

    /// Whether the session is over.
    pub fn is_closed(&self) -> bool {
        self.ws.is_none()
    }

    /// Wait for the next event payload.
    ///
    /// Returns `Ok(None)` once the session has been closed. A transport
    /// failure mid-stream ends the session and surfaces as an error;
    /// anomalous frames (stray responses, unknown notification methods,
    /// unparseable text) are logged and skipped so a sleeping consumer
    /// is never woken by garbage.
    pub async fn next(&mut self) -> Result<Option<Value>, BridgeError> {
        loop {
            let Some(ws) = self.ws.as_mut() else {
                return Ok(None);
            };
            match transport::read_frame(ws).await {
                Ok(InboundFrame::Notification(notification))
                    if notification.method == EVENTS_NOTIFICATION =>
                {
                    return Ok(Some(notification.into_payload()));
                }
                Ok(InboundFrame::Notification(notification)) => {
                    warn!(
                        method = %notification.method,
                        "ignoring unknown notification method"
                    );
                }
                Ok(InboundFrame::Response(response)) => {
                    warn!(id = ?response.id, "ignoring stray response while streaming");
                }
                Err(BridgeError::Malformed { message }) => {
                    warn!(%message, "skipping malformed frame");
                }
                Err(err) => {
                    // Dead connection; release it so close() and Drop
                    // have nothing left to do.
                    drop(self.ws.take());
                    return Err(err);
                }
            }
        }
    }

    /// Unsubscribe and close the connection.
    ///
    /// Best-effort on the wire: the unsubscribe is sent and one
    /// acknowledgment read is attempted, but no failure along the way
    /// prevents the close. Idempotent; later calls and `Drop` do
    /// nothing.
    pub async fn close(&mut self) -> Result<(), BridgeError> {
        let Some(ws) = self.ws.take() else {
            return Ok(());
        };
        debug!(subscription_id = %self.subscription_id, "closing subscription");
        let request = self.unsubscribe_request();
        unsubscribe_and_close(ws, request).await;
        Ok(())
    }

    fn unsubscribe_request(&mut self) -> RpcRequest {
        let id = self.next_request_id;
        self.next_request_id += 1;
        RpcRequest::new(
            id,
            EVENTS_UNSUBSCRIBE,
            json!({
                "subscriptionId": self.subscription_id,
                "auth": { "token": self.token },
            }),
        )
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        let Some(ws) = self.ws.take() else { return };
        let request = self.unsubscribe_request();
        // Without a runtime there is nowhere to run the unsubscribe;
        // dropping the stream still closes the socket.
        if let Ok(handle) = tokio::runtime::Handle::try_current() {
            debug!(
                subscription_id = %self.subscription_id,
                "subscription dropped while open; detaching unsubscribe"
            );
            drop(handle.spawn(unsubscribe_and_close(ws, request)));
        }
    }
}

/// Send `events.subscribe` and wait for its acknowledgment.
///
/// The server acknowledges before replaying, but a notification that
/// arrives early is skipped rather than treated as fatal.
async fn subscribe_handshake(
    ws: &mut WsStream,
    token: &str,
    options: &SubscribeOptions,
) -> Result<String, BridgeError> {
    let mut params = json!({
        "replay": options.replay,
        "auth": { "token": token },
    });
    if let Some(events) = &options.events {
        params["events"] = json!(events);
    }
    let request = RpcRequest::new(SUBSCRIBE_REQUEST_ID, EVENTS_SUBSCRIBE, params);
    transport::send(ws, &request).await?;

    let response = loop {
        match transport::read_frame(ws).await? {
            InboundFrame::Response(response) => break response,
            InboundFrame::Notification(notification) => {
                warn!(
                    method = %notification.method,
                    "ignoring notification before subscribe acknowledgment"
                );
            }
        }
    };
    let result = response.into_result()?;
    result
        .get("subscriptionId")
        .and_then(Value::as_str)
        .map(str::to_owned)
        .ok_or_else(|| BridgeError::Malformed {
            message: "subscribe acknowledgment carries no subscriptionId".into(),
        })
}

/// Best-effort unsubscribe, acknowledgment read, close. Never fails.
async fn unsubscribe_and_close(mut ws: WsStream, request: RpcRequest) {
    if transport::send(&mut ws, &request).await.is_ok() {
        let _ = transport::read_frame(&mut ws).await;
    }
    let _ = ws.close(None).await;
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    // Wire-level behavior is covered by the stub-server integration
    // tests; these cover the option builders.

    #[test]
    fn default_options_subscribe_to_everything() {
        let options = SubscribeOptions::all();
        assert!(options.events.is_none());
        assert_eq!(options.replay, 0);
    }

    #[test]
    fn named_events_are_collected() {
        let options = SubscribeOptions::events(["diagnostics.changed", "tasks.ended"]);
        assert_eq!(
            options.events.as_deref(),
            Some(&["diagnostics.changed".to_owned(), "tasks.ended".to_owned()][..])
        );
    }

    #[test]
    fn replay_builder_sets_the_count() {
        let options = SubscribeOptions::all().with_replay(25);
        assert_eq!(options.replay, 25);
    }
}
