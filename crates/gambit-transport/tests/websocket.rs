//! Integration tests for the WebSocket transport.
//!
//! These spin up a real listener on a loopback port and talk to it with a
//! `tokio-tungstenite` client.

#[cfg(feature = "websocket")]
mod websocket {
    use futures_util::{SinkExt, StreamExt};
    use gambit_transport::{
        Connection, ConnectionId, Transport, TransportError, WebSocketTransport,
    };
    use tokio_tungstenite::tungstenite::Message;

    type ClientWs = tokio_tungstenite::WebSocketStream<
        tokio_tungstenite::MaybeTlsStream<tokio::net::TcpStream>,
    >;

    async fn connect_client(addr: &str) -> ClientWs {
        let url = format!("ws://{addr}");
        let (ws, _) = tokio_tungstenite::connect_async(&url)
            .await
            .expect("client should connect");
        ws
    }

    /// Binds on an OS-assigned port and accepts one client.
    async fn accept_one()
    -> (gambit_transport::WebSocketConnection, ClientWs) {
        let mut transport = WebSocketTransport::bind("127.0.0.1:0")
            .await
            .expect("should bind");
        let addr = transport.local_addr().expect("local addr").to_string();

        let server_handle = tokio::spawn(async move {
            transport.accept().await.expect("should accept")
        });
        let client = connect_client(&addr).await;
        let server_conn = server_handle.await.expect("task should complete");
        (server_conn, client)
    }

    #[tokio::test]
    async fn test_websocket_accept_and_exchange_text_frames() {
        let (server_conn, mut client_ws) = accept_one().await;
        assert!(server_conn.id() > ConnectionId::new(0));

        server_conn
            .send(r#"{"type":"opponentJoined"}"#)
            .await
            .expect("send should succeed");
        let msg = client_ws.next().await.unwrap().unwrap();
        assert_eq!(msg.to_text().unwrap(), r#"{"type":"opponentJoined"}"#);

        client_ws
            .send(Message::text(r#"{"type":"joinRoom","roomCode":"R1"}"#))
            .await
            .unwrap();
        let received = server_conn
            .recv()
            .await
            .expect("recv should succeed")
            .expect("should have data");
        assert_eq!(received, r#"{"type":"joinRoom","roomCode":"R1"}"#);

        server_conn.close().await.expect("close should succeed");
    }

    #[tokio::test]
    async fn test_websocket_accepts_utf8_binary_frames() {
        let (server_conn, mut client_ws) = accept_one().await;

        client_ws
            .send(Message::Binary(b"{\"type\":\"x\"}".to_vec().into()))
            .await
            .unwrap();
        let received = server_conn.recv().await.unwrap().unwrap();
        assert_eq!(received, "{\"type\":\"x\"}");
    }

    #[tokio::test]
    async fn test_websocket_rejects_non_utf8_binary_frames() {
        let (server_conn, mut client_ws) = accept_one().await;

        client_ws
            .send(Message::Binary(vec![0xff, 0xfe, 0xfd].into()))
            .await
            .unwrap();
        let result = server_conn.recv().await;
        assert!(matches!(result, Err(TransportError::InvalidFrame)));
    }

    #[tokio::test]
    async fn test_websocket_recv_returns_none_on_client_close() {
        let (server_conn, mut client_ws) = accept_one().await;

        client_ws.send(Message::Close(None)).await.unwrap();

        let result = server_conn.recv().await.expect("recv should not error");
        assert!(result.is_none(), "should return None on client close");
    }

    #[tokio::test]
    async fn test_websocket_send_while_recv_pending() {
        let (server_conn, mut client_ws) = accept_one().await;
        let server_conn = std::sync::Arc::new(server_conn);

        // Park a reader; the writer must not wait for it.
        let reader = {
            let conn = std::sync::Arc::clone(&server_conn);
            tokio::spawn(async move { conn.recv().await })
        };
        tokio::time::sleep(std::time::Duration::from_millis(10)).await;

        tokio::time::timeout(
            std::time::Duration::from_secs(1),
            server_conn.send("ping"),
        )
        .await
        .expect("send should not block on reader")
        .expect("send should succeed");

        let msg = client_ws.next().await.unwrap().unwrap();
        assert_eq!(msg.to_text().unwrap(), "ping");

        client_ws.send(Message::Close(None)).await.unwrap();
        let result = reader.await.unwrap().unwrap();
        assert!(result.is_none());
    }
}
