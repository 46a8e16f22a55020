pub mod handlers;
mod host;
mod player;

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        Query, State,
    },
    response::IntoResponse,
};
use futures::{sink::SinkExt, stream::StreamExt, Sink};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::protocol::{ClientMessage, ServerMessage};
use crate::state::AppState;
use crate::types::{ClientRole, ParticipantId};

#[derive(Debug, Deserialize)]
pub struct WsQuery {
    pub role: Option<String>,
    /// Join token of a returning participant
    pub token: Option<String>,
}

/// WebSocket upgrade handler
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    Query(params): Query<WsQuery>,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    tracing::info!("WebSocket connection request: role={:?}", params.role);

    ws.on_upgrade(move |socket| handle_socket(socket, params, state))
}

/// Serialize and send; false once the client is gone
async fn send<S>(sender: &mut S, msg: &impl Serialize) -> bool
where
    S: Sink<Message> + Unpin,
{
    match serde_json::to_string(msg) {
        Ok(json) => sender.send(Message::Text(json.into())).await.is_ok(),
        Err(e) => {
            tracing::error!("Failed to serialize message: {}", e);
            true
        }
    }
}

/// Handle individual WebSocket connection
async fn handle_socket(socket: WebSocket, params: WsQuery, state: Arc<AppState>) {
    let (mut sender, mut receiver) = socket.split();

    let role = match params.role.as_deref() {
        Some("host") => ClientRole::Host,
        _ => ClientRole::Player,
    };

    // Participant this connection speaks for, once known
    let mut participant_id: Option<ParticipantId> = match &params.token {
        Some(token) if role == ClientRole::Player => state
            .participant_by_token(token)
            .await
            .map(|p| p.id),
        _ => None,
    };

    tracing::info!("WebSocket connected with role: {:?}", role);

    let welcome = ServerMessage::Welcome {
        protocol: "1.0".to_string(),
        role: role.clone(),
        server_now: chrono::Utc::now().to_rfc3339(),
    };
    if !send(&mut sender, &welcome).await {
        tracing::error!("Failed to send welcome message");
        return;
    }

    // Bring a reconnecting client up to date
    match role {
        ClientRole::Host => {
            let participants = state.roster().await;
            send(&mut sender, &ServerMessage::Roster { participants }).await;
            if let Some(round) = state.host_round().await {
                send(&mut sender, &ServerMessage::HostRound { round }).await;
            }
        }
        ClientRole::Player => {
            if let Some(id) = &participant_id {
                if let Some(view) = state.player_view(id).await {
                    send(&mut sender, &ServerMessage::PlayerRound { view }).await;
                }
            }
        }
    }

    let mut broadcast_rx = state.broadcast.subscribe();
    let mut host_broadcast_rx = if role == ClientRole::Host {
        Some(state.host_broadcast.subscribe())
    } else {
        None
    };

    loop {
        tokio::select! {
            // General broadcasts (all clients)
            broadcast_msg = broadcast_rx.recv() => {
                let Ok(msg) = broadcast_msg else { continue };
                if !send(&mut sender, &msg).await {
                    break;
                }
                // Participants get their own view after every round change
                if let (ServerMessage::RoundChanged { .. }, Some(id)) = (&msg, &participant_id) {
                    if let Some(view) = state.player_view(id).await {
                        if !send(&mut sender, &ServerMessage::PlayerRound { view }).await {
                            break;
                        }
                    }
                }
            }

            // Host-only broadcasts
            host_msg = async {
                match &mut host_broadcast_rx {
                    Some(rx) => rx.recv().await.ok(),
                    None => std::future::pending::<Option<ServerMessage>>().await,
                }
            } => {
                if let Some(msg) = host_msg {
                    if !send(&mut sender, &msg).await {
                        break;
                    }
                }
            }

            // Client messages
            ws_msg = receiver.next() => {
                match ws_msg {
                    Some(Ok(Message::Text(text))) => {
                        tracing::debug!("Received message: {}", text);

                        let response = match serde_json::from_str::<ClientMessage>(&text) {
                            Ok(client_msg) => {
                                handlers::handle_message(client_msg, &role, &state).await
                            }
                            Err(e) => {
                                tracing::error!("Failed to parse client message: {}", e);
                                Some(ServerMessage::Error {
                                    code: "PARSE_ERROR".to_string(),
                                    msg: format!("Invalid message format: {}", e),
                                })
                            }
                        };

                        if let Some(ServerMessage::Joined { participant_id: id, .. }) = &response {
                            participant_id = Some(id.clone());
                        }
                        if let Some(response) = response {
                            if !send(&mut sender, &response).await {
                                tracing::error!("Failed to send response");
                                break;
                            }
                        }
                    }
                    Some(Ok(Message::Close(_))) => {
                        tracing::info!("WebSocket closed");
                        break;
                    }
                    Some(Ok(Message::Ping(data))) => {
                        if sender.send(Message::Pong(data)).await.is_err() {
                            break;
                        }
                    }
                    Some(Ok(_)) => {}
                    Some(Err(e)) => {
                        tracing::error!("WebSocket error: {}", e);
                        break;
                    }
                    None => break,
                }
            }
        }
    }

    tracing::info!("WebSocket connection closed for role: {:?}", role);
}
