//! Connection plumbing shared by one-shot calls and subscriptions.
//!
//! Every call opens its own WebSocket. That trades connection setup cost
//! for fault isolation: a wedged exchange can only ever strand the one
//! call that opened it, and there is no pool to poison.

use futures::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};
use tracing::{debug, warn};

use bridge_core::BridgeError;
use bridge_core::protocol::{InboundFrame, RpcRequest, RpcResponse};

pub(crate) type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Connect, send one request, wait for its response, close.
///
/// The connection is released on every path out of this function: with a
/// close frame after the exchange, by drop when connecting itself fails.
pub(crate) async fn exchange(url: &str, request: &RpcRequest) -> Result<RpcResponse, BridgeError> {
    debug!(%url, method = %request.method, "opening one-shot connection");
    let (mut ws, _) = connect_async(url).await?;
    let outcome = send_and_wait(&mut ws, request).await;
    let _ = ws.close(None).await;
    outcome
}

async fn send_and_wait(
    ws: &mut WsStream,
    request: &RpcRequest,
) -> Result<RpcResponse, BridgeError> {
    send(ws, request).await?;
    loop {
        match read_frame(ws).await? {
            InboundFrame::Response(response) => {
                if !response.answers(request.id) {
                    warn!(
                        expected = request.id,
                        got = ?response.id,
                        "response id mismatch on one-shot connection; accepting"
                    );
                }
                return Ok(response);
            }
            InboundFrame::Notification(notification) => {
                warn!(
                    method = %notification.method,
                    "ignoring notification on a one-shot connection"
                );
            }
        }
    }
}

/// Serialize and send one request frame.
pub(crate) async fn send(ws: &mut WsStream, request: &RpcRequest) -> Result<(), BridgeError> {
    let payload = serde_json::to_string(request)?;
    ws.send(Message::Text(payload.into())).await?;
    Ok(())
}

/// Read the next data frame, skipping WebSocket control traffic.
///
/// Pings are answered by the transport itself. Binary frames are not part
/// of the protocol and are dropped with a warning.
pub(crate) async fn read_frame(ws: &mut WsStream) -> Result<InboundFrame, BridgeError> {
    loop {
        let message = match ws.next().await {
            Some(Ok(message)) => message,
            Some(Err(err)) => return Err(BridgeError::Transport(err)),
            None => return Err(BridgeError::ConnectionClosed),
        };
        match message {
            Message::Text(text) => return InboundFrame::parse(&text),
            Message::Close(_) => return Err(BridgeError::ConnectionClosed),
            Message::Binary(_) => warn!("ignoring binary frame"),
            Message::Ping(_) | Message::Pong(_) | Message::Frame(_) => {}
        }
    }
}
