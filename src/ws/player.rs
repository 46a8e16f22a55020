//! Participant message handlers
//!
//! Joining, hint submission, guessing and view requests. Every action is
//! keyed by the join token, which resolves to the participant id.

use crate::protocol::ServerMessage;
use crate::state::AppState;
use crate::types::Participant;
use std::sync::Arc;

fn invalid_token() -> ServerMessage {
    ServerMessage::Error {
        code: "INVALID_PLAYER_TOKEN".to_string(),
        msg: "Unknown player token".to_string(),
    }
}

async fn resolve(state: &Arc<AppState>, token: &str) -> Result<Participant, ServerMessage> {
    state
        .participant_by_token(token)
        .await
        .ok_or_else(invalid_token)
}

pub async fn handle_join(state: &Arc<AppState>, display_name: String) -> Option<ServerMessage> {
    match state.join(display_name).await {
        Ok(member) => Some(ServerMessage::Joined {
            participant_id: member.participant.id,
            token: member.token,
            display_name: member.participant.display_name,
        }),
        Err(e) => Some(e.into()),
    }
}

pub async fn handle_submit_hint(
    state: &Arc<AppState>,
    player_token: String,
    text: String,
) -> Option<ServerMessage> {
    let participant = match resolve(state, &player_token).await {
        Ok(p) => p,
        Err(msg) => return Some(msg),
    };
    tracing::debug!("Hint from {}: {} chars", participant.id, text.chars().count());

    match state.set_hint_text(&participant.id, text).await {
        Ok(()) => Some(ServerMessage::HintAccepted),
        Err(e) => Some(e.into()),
    }
}

pub async fn handle_submit_guess(
    state: &Arc<AppState>,
    player_token: String,
    text: String,
) -> Option<ServerMessage> {
    let participant = match resolve(state, &player_token).await {
        Ok(p) => p,
        Err(msg) => return Some(msg),
    };
    tracing::info!("Guess from {}: {}", participant.id, text);

    match state.submit_guess(&participant.id, &text).await {
        Ok(outcome) => Some(ServerMessage::GuessResult {
            correct: outcome.correct,
            resolved_topic: outcome.resolved_topic,
        }),
        Err(e) => Some(e.into()),
    }
}

pub async fn handle_get_round_view(
    state: &Arc<AppState>,
    player_token: String,
) -> Option<ServerMessage> {
    let participant = match resolve(state, &player_token).await {
        Ok(p) => p,
        Err(msg) => return Some(msg),
    };

    match state.player_view(&participant.id).await {
        Some(view) => Some(ServerMessage::PlayerRound { view }),
        None => Some(ServerMessage::Error {
            code: "NOT_SEATED".to_string(),
            msg: "You are not part of the current round".to_string(),
        }),
    }
}
