//! Host-only command handlers
//!
//! The host is the collecting party: it starts rounds, reviews hints,
//! locks, publishes and drives the timer. Authorization is checked in the
//! dispatch layer before calling these.

use crate::protocol::ServerMessage;
use crate::state::AppState;
use crate::types::{HintId, ParticipantId, TimerAction};
use std::sync::Arc;

/// Full round snapshot for the host after a successful action
async fn host_round(state: &Arc<AppState>) -> Option<ServerMessage> {
    state
        .host_round()
        .await
        .map(|round| ServerMessage::HostRound { round })
}

pub async fn handle_start_round(state: &Arc<AppState>) -> Option<ServerMessage> {
    tracing::info!("Host starting new round");
    match state.start_round().await {
        Ok(_) => host_round(state).await,
        Err(e) => Some(e.into()),
    }
}

pub async fn handle_toggle_removal(state: &Arc<AppState>, hint_id: HintId) -> Option<ServerMessage> {
    tracing::info!("Host toggling removal of hint {}", hint_id);
    match state.toggle_manual_removal(&hint_id).await {
        Ok(round) => Some(ServerMessage::HostRound { round }),
        Err(e) => Some(e.into()),
    }
}

pub async fn handle_lock_round(state: &Arc<AppState>) -> Option<ServerMessage> {
    tracing::info!("Host locking round");
    match state.lock_round().await {
        Ok(_) => host_round(state).await,
        Err(e) => Some(e.into()),
    }
}

pub async fn handle_timer(state: &Arc<AppState>, action: TimerAction) -> Option<ServerMessage> {
    match state.timer_action(action).await {
        Ok(timer) => Some(ServerMessage::timer(timer)),
        Err(e) => Some(e.into()),
    }
}

pub async fn handle_publish(state: &Arc<AppState>) -> Option<ServerMessage> {
    tracing::info!("Host publishing hints");
    match state.publish_round().await {
        Ok(_) => host_round(state).await,
        Err(e) => Some(e.into()),
    }
}

pub async fn handle_advance_round(
    state: &Arc<AppState>,
    refresh_roster: bool,
) -> Option<ServerMessage> {
    tracing::info!("Host advancing round (refresh_roster={})", refresh_roster);
    match state.advance_round(refresh_roster).await {
        Ok(_) => host_round(state).await,
        Err(e) => Some(e.into()),
    }
}

pub async fn handle_redraw_topic(state: &Arc<AppState>) -> Option<ServerMessage> {
    tracing::info!("Host redrawing topic");
    match state.redraw_topic().await {
        Ok(_) => host_round(state).await,
        Err(e) => Some(e.into()),
    }
}

pub async fn handle_remove_participant(
    state: &Arc<AppState>,
    participant_id: ParticipantId,
) -> Option<ServerMessage> {
    tracing::info!("Host removing participant {}", participant_id);
    match state.remove_participant(&participant_id).await {
        Ok(_) => Some(ServerMessage::Roster {
            participants: state.roster().await,
        }),
        Err(e) => Some(e.into()),
    }
}
