//! WebSocket connection lifecycle: upgrade, handshake, event loop.

use axum::{
    extract::{
        ws::{Message, WebSocket},
        State, WebSocketUpgrade,
    },
    response::IntoResponse,
};
use futures_util::{SinkExt, StreamExt};
use serde::Deserialize;
use serde_json::json;
use tokio::sync::mpsc;

use crate::realtime::gate::{authenticate_handshake, rejection_frame};
use crate::server::state::AppState;

/// A frame emitted by the client after the handshake.
#[derive(Debug, Deserialize)]
struct ClientFrame {
    event: String,
    #[serde(default)]
    data: serde_json::Value,
}

/// GET /ws — upgrade and hand the socket to [`handle_socket`].
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<AppState>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// Drive one connection from handshake to close.
///
/// The first text frame must authenticate (see `gate`); anything else gets
/// the rejection frame and an immediate close, without ever touching the
/// hub. Admitted connections stay registered until the transport closes,
/// then unregister unconditionally — no drain.
pub async fn handle_socket(socket: WebSocket, state: AppState) {
    let (mut sink, mut stream) = socket.split();

    let handshake = loop {
        match stream.next().await {
            Some(Ok(Message::Text(frame))) => break frame,
            // Control frames may arrive before the handshake; keep waiting.
            Some(Ok(Message::Ping(_) | Message::Pong(_))) => continue,
            Some(Ok(Message::Binary(_))) => {
                tracing::warn!("realtime handshake rejected: binary first frame");
                let _ = sink.send(Message::Text(rejection_frame().into())).await;
                let _ = sink.close().await;
                return;
            }
            _ => {
                // Peer closed before authenticating.
                let _ = sink.close().await;
                return;
            }
        }
    };

    let claims = match authenticate_handshake(handshake.as_str(), state.config.secret_key.as_bytes())
    {
        Ok(claims) => claims,
        Err(error) => {
            tracing::warn!(%error, "realtime handshake rejected");
            let _ = sink.send(Message::Text(rejection_frame().into())).await;
            let _ = sink.close().await;
            return;
        }
    };

    tracing::info!(user_id = claims.sub, name = ?claims.name, "realtime client connected");

    let (tx, mut rx) = mpsc::unbounded_channel::<String>();
    let connection_id = state.hub.register(claims.clone(), tx);

    // Outbound: forward hub frames to the socket until the peer goes away.
    let mut send_task = tokio::spawn(async move {
        while let Some(frame) = rx.recv().await {
            if sink.send(Message::Text(frame.into())).await.is_err() {
                break;
            }
        }
    });

    // Inbound: relay client-emitted chat events to everyone, sender included.
    let hub = state.hub.clone();
    let sender_name = claims.name.clone();
    let mut recv_task = tokio::spawn(async move {
        while let Some(Ok(message)) = stream.next().await {
            match message {
                Message::Text(frame) => {
                    let Ok(client_frame) = serde_json::from_str::<ClientFrame>(frame.as_str())
                    else {
                        continue;
                    };
                    if client_frame.event == "chatMessage" {
                        hub.publish(
                            "chatMessage",
                            json!({ "user": sender_name, "msg": client_frame.data }),
                        );
                    }
                }
                Message::Close(_) => break,
                _ => {}
            }
        }
    });

    // Whichever side finishes first tears the other down.
    tokio::select! {
        _ = &mut send_task => recv_task.abort(),
        _ = &mut recv_task => send_task.abort(),
    }

    state.hub.unregister(connection_id);
    tracing::info!(user_id = claims.sub, "realtime client disconnected");
}
