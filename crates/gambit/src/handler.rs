//! Per-connection handler: outbound writer plus inbound read loop.
//!
//! Each accepted connection gets its own Tokio task running this handler.
//! The flow is:
//!   1. Register an outbound channel with the relay
//!   2. Spawn a writer that drains the channel into the socket
//!   3. Loop: receive frames, decode client events, hand them to the relay
//!   4. On close or error, report the disconnect to the relay

use std::sync::Arc;

use gambit_protocol::{ClientEvent, Codec, ServerEvent};
use gambit_room::RelayHandle;
use gambit_transport::{Connection, TransportError, WebSocketConnection};
use tokio::sync::mpsc;

use crate::GambitError;

/// Handles a single connection from accept to close.
pub(crate) async fn handle_connection<C: Codec + Clone>(
    conn: WebSocketConnection,
    relay: RelayHandle,
    codec: C,
) -> Result<(), GambitError> {
    let conn = Arc::new(conn);
    let conn_id = conn.id();
    tracing::info!(%conn_id, peer = %conn.peer_addr(), "client connected");

    let (tx, rx) = mpsc::unbounded_channel();
    relay.connect(conn_id, tx).await?;

    let writer = tokio::spawn(write_loop(Arc::clone(&conn), rx, codec.clone()));

    let result = read_loop(&conn, &relay, &codec).await;

    // Always runs, whatever ended the read loop. Unregistering drops the
    // relay's copy of the sender, so the writer drains and exits on its own.
    match relay.disconnect(conn_id).await {
        Ok(rooms_closed) => {
            tracing::info!(%conn_id, rooms_closed, "client disconnected");
        }
        Err(e) => {
            tracing::warn!(%conn_id, error = %e, "disconnect not delivered");
            writer.abort();
        }
    }
    let _ = writer.await;
    let _ = conn.close().await;

    result
}

/// Reads frames until the peer closes or the socket fails.
async fn read_loop<C: Codec>(
    conn: &WebSocketConnection,
    relay: &RelayHandle,
    codec: &C,
) -> Result<(), GambitError> {
    let conn_id = conn.id();

    loop {
        let frame = match conn.recv().await {
            Ok(Some(frame)) => frame,
            Ok(None) => {
                tracing::debug!(%conn_id, "connection closed cleanly");
                return Ok(());
            }
            Err(TransportError::InvalidFrame) => {
                tracing::debug!(%conn_id, "dropping non-UTF-8 binary frame");
                continue;
            }
            Err(e) => {
                tracing::debug!(%conn_id, error = %e, "recv error");
                return Err(e.into());
            }
        };

        let event: ClientEvent = match codec.decode(&frame) {
            Ok(event) => event,
            Err(e) => {
                tracing::debug!(%conn_id, error = %e, "dropping undecodable frame");
                continue;
            }
        };

        relay.dispatch(conn_id, event).await?;
    }
}

/// Drains the outbound channel into the socket.
///
/// Ends when the relay drops the channel's sender or a send fails.
async fn write_loop<C: Codec>(
    conn: Arc<WebSocketConnection>,
    mut rx: mpsc::UnboundedReceiver<ServerEvent>,
    codec: C,
) {
    let conn_id = conn.id();

    while let Some(event) = rx.recv().await {
        let frame = match codec.encode(&event) {
            Ok(frame) => frame,
            Err(e) => {
                tracing::error!(%conn_id, error = %e, "failed to encode event");
                continue;
            }
        };
        if let Err(e) = conn.send(&frame).await {
            tracing::debug!(%conn_id, error = %e, "send failed, writer stopping");
            break;
        }
    }
}
