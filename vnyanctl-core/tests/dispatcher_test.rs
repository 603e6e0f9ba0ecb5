use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::time::{timeout, Duration};
use tokio_tungstenite::{accept_async, tungstenite::Message as WsMessage};
use vnyanctl_core::dispatcher::{DispatchOutcome, Dispatcher};
use vnyanctl_core::models::PayloadFormat;

/// Bind a local listener on an ephemeral port and return it with the port
async fn bind_server() -> (TcpListener, u16) {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("failed to bind websocket server");
    let port = listener.local_addr().expect("no local addr").port();
    (listener, port)
}

#[tokio::test]
async fn structured_dispatch_sends_exact_frame() {
    let (listener, port) = bind_server().await;
    let (frame_tx, frame_rx) = oneshot::channel();

    let server_handle = tokio::spawn(async move {
        let (stream, _) = listener
            .accept()
            .await
            .expect("failed to accept connection");
        let ws_stream = accept_async(stream)
            .await
            .expect("failed to upgrade to websocket");
        let (_, mut receiver) = ws_stream.split();
        if let Some(Ok(WsMessage::Text(text))) = receiver.next().await {
            let _ = frame_tx.send(text);
        }
    });

    let mut dispatcher =
        Dispatcher::with_target(port, "MMD_Stay".to_string(), PayloadFormat::Structured);
    let outcome = dispatcher.dispatch().await;
    assert_eq!(outcome, DispatchOutcome::Sent);

    let frame = frame_rx.await.expect("server did not receive a frame");
    assert_eq!(frame, r#"{"command":"MMD_Stay","data":{}}"#);

    dispatcher.shutdown().await;
    server_handle.await.expect("server panic");
}

#[tokio::test]
async fn raw_dispatch_sends_bare_string_and_closes() {
    let (listener, port) = bind_server().await;
    let (result_tx, result_rx) = oneshot::channel();

    let server_handle = tokio::spawn(async move {
        let (stream, _) = listener
            .accept()
            .await
            .expect("failed to accept connection");
        let ws_stream = accept_async(stream)
            .await
            .expect("failed to upgrade to websocket");
        let (mut sender, mut receiver) = ws_stream.split();

        let frame = match receiver.next().await {
            Some(Ok(WsMessage::Text(text))) => text,
            other => panic!("expected text frame, got {:?}", other),
        };
        // The client should close immediately after the send
        let closed = matches!(receiver.next().await, Some(Ok(WsMessage::Close(_))) | None);
        let _ = sender.close().await;
        let _ = result_tx.send((frame, closed));
    });

    let mut dispatcher = Dispatcher::with_target(port, "MMD_Stay".to_string(), PayloadFormat::Raw);
    let outcome = dispatcher.dispatch().await;
    assert_eq!(outcome, DispatchOutcome::SentAndClosed);

    let (frame, closed) = result_rx.await.expect("server did not report");
    assert_eq!(frame, "MMD_Stay");
    assert!(closed, "connection was not closed after the send");

    server_handle.await.expect("server panic");
}

#[tokio::test]
async fn dispatch_is_idempotent_while_connection_open() {
    let (listener, port) = bind_server().await;
    let (frame_tx, frame_rx) = oneshot::channel();

    let server_handle = tokio::spawn(async move {
        let (stream, _) = listener
            .accept()
            .await
            .expect("failed to accept connection");
        let ws_stream = accept_async(stream)
            .await
            .expect("failed to upgrade to websocket");
        let (_, mut receiver) = ws_stream.split();
        if let Some(Ok(WsMessage::Text(text))) = receiver.next().await {
            let _ = frame_tx.send(text);
        }
        // No second connection may arrive while the first is open
        let second = timeout(Duration::from_millis(200), listener.accept()).await;
        assert!(second.is_err(), "a second connection was opened");
    });

    let mut dispatcher =
        Dispatcher::with_target(port, "MMD_Stay".to_string(), PayloadFormat::Structured);
    assert_eq!(dispatcher.dispatch().await, DispatchOutcome::Sent);
    assert_eq!(dispatcher.dispatch().await, DispatchOutcome::Skipped);
    assert_eq!(dispatcher.dispatch().await, DispatchOutcome::Skipped);

    let frame = frame_rx.await.expect("server did not receive a frame");
    assert_eq!(frame, r#"{"command":"MMD_Stay","data":{}}"#);

    server_handle.await.expect("server panic");
    dispatcher.shutdown().await;
}

#[tokio::test]
async fn failed_connection_is_reported_as_outcome_not_panic() {
    // Bind then drop so the port is very likely unbound
    let (listener, port) = bind_server().await;
    drop(listener);

    let mut dispatcher =
        Dispatcher::with_target(port, "MMD_Stay".to_string(), PayloadFormat::Structured);
    let outcome = dispatcher.dispatch().await;
    assert_eq!(outcome, DispatchOutcome::Failed);

    // A later trigger may attempt again; it fails the same way
    assert_eq!(dispatcher.dispatch().await, DispatchOutcome::Failed);
}

#[tokio::test]
async fn empty_message_is_sent_not_rejected() {
    let (listener, port) = bind_server().await;
    let (frame_tx, frame_rx) = oneshot::channel();

    let server_handle = tokio::spawn(async move {
        let (stream, _) = listener.accept().await.expect("accept failed");
        let ws_stream = accept_async(stream).await.expect("upgrade failed");
        let (_, mut receiver) = ws_stream.split();
        if let Some(Ok(WsMessage::Text(text))) = receiver.next().await {
            let _ = frame_tx.send(text);
        }
    });

    let mut dispatcher = Dispatcher::with_target(port, String::new(), PayloadFormat::Structured);
    assert_eq!(dispatcher.dispatch().await, DispatchOutcome::Sent);

    let frame = frame_rx.await.expect("server did not receive a frame");
    assert_eq!(frame, r#"{"command":"","data":{}}"#);

    dispatcher.shutdown().await;
    server_handle.await.expect("server panic");
}
