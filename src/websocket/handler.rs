use axum::{
    extract::{
        ws::{CloseFrame, Message, WebSocket},
        Path, Query, State, WebSocketUpgrade,
    },
    response::{IntoResponse, Response},
};
use futures_util::{SinkExt, StreamExt};
use serde::Deserialize;
use tokio::sync::mpsc::{self, UnboundedSender};
use uuid::Uuid;

use crate::error::Result;
use crate::room::RoomHandle;
use crate::websocket::message::{ClientMessage, ServerMessage};
use crate::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct ConnectParams {
    #[serde(rename = "playerId")]
    pub player_id: Option<String>,
}

/// WebSocket upgrade into the default room
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    Query(params): Query<ConnectParams>,
    State(state): State<AppState>,
) -> Response {
    upgrade(ws, state.directory.default_room(), params)
}

/// WebSocket upgrade into a named room
pub async fn ws_room_handler(
    ws: WebSocketUpgrade,
    Path(room): Path<String>,
    Query(params): Query<ConnectParams>,
    State(state): State<AppState>,
) -> Response {
    upgrade(ws, state.directory.lookup(&room), params)
}

fn upgrade(ws: WebSocketUpgrade, room: Result<RoomHandle>, params: ConnectParams) -> Response {
    match room {
        Ok(room) => ws
            .on_upgrade(move |socket| handle_socket(socket, room, params.player_id))
            .into_response(),
        Err(e) => {
            tracing::warn!("Refusing upgrade: {}", e);
            e.into_response()
        }
    }
}

/// Handle a WebSocket connection
async fn handle_socket(socket: WebSocket, room: RoomHandle, player_id: Option<String>) {
    let (mut sender, mut receiver) = socket.split();

    // Outgoing messages from the room
    let (tx, mut rx) = mpsc::unbounded_channel::<Message>();

    let admission = match room.connect(player_id, tx.clone()).await {
        Ok(admission) => admission,
        Err(e) => {
            tracing::info!("Connection to room {} rejected: {}", room.room_id(), e);
            let _ = sender.send(ServerMessage::error(&e).to_ws_message()).await;
            let _ = sender
                .send(Message::Close(Some(CloseFrame {
                    code: e.close_code(),
                    reason: e.to_string().into(),
                })))
                .await;
            return;
        }
    };
    let session_id = admission.session_id;

    tracing::debug!(
        "Session {} open for player {} in room {}",
        session_id,
        admission.player_id,
        room.room_id()
    );

    let send_task = tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            if sender.send(msg).await.is_err() {
                break;
            }
        }
    });

    while let Some(result) = receiver.next().await {
        match result {
            Ok(Message::Text(text)) => {
                if handle_text_message(&room, session_id, &tx, &text).is_err() {
                    break;
                }
            }
            Ok(Message::Close(_)) => {
                tracing::info!("Player {} disconnected", admission.player_id);
                break;
            }
            Ok(_) => {
                // Binary, ping and pong frames carry nothing for the room
            }
            Err(e) => {
                tracing::warn!("WebSocket error for player {}: {}", admission.player_id, e);
                break;
            }
        }
    }

    let _ = room.disconnect(session_id);
    send_task.abort();
}

/// Forward a text frame to the room. Fails only when the room is gone.
fn handle_text_message(
    room: &RoomHandle,
    session_id: Uuid,
    tx: &UnboundedSender<Message>,
    text: &str,
) -> Result<()> {
    match ClientMessage::parse(text) {
        Ok(Some(ClientMessage::PlacePixel { x, y })) => room.place_pixel(session_id, x, y),
        Ok(None) => {
            tracing::debug!("Ignoring message from {}: {}", session_id, text);
            Ok(())
        }
        Err(e) => {
            tracing::debug!("Malformed message from {}: {}", session_id, text);
            let _ = tx.send(ServerMessage::error(&e).to_ws_message());
            Ok(())
        }
    }
}
