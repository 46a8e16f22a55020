//! WebSocket message dispatch
//!
//! Authorization is checked here, then dispatched to role-specific handler modules.

use crate::protocol::{ClientMessage, ServerMessage};
use crate::state::AppState;
use crate::types::ClientRole;
use std::sync::Arc;

use super::{host, player};

/// Macro to check host authorization and return early if unauthorized
macro_rules! check_host {
    ($role:expr, $action:expr) => {
        if *$role != ClientRole::Host {
            return Some(ServerMessage::Error {
                code: "UNAUTHORIZED".to_string(),
                msg: format!("Only host can {}", $action),
            });
        }
    };
}

/// Handle client messages and return optional response
pub async fn handle_message(
    msg: ClientMessage,
    role: &ClientRole,
    state: &Arc<AppState>,
) -> Option<ServerMessage> {
    match msg {
        // Participant messages
        ClientMessage::Join { display_name } => player::handle_join(state, display_name).await,

        ClientMessage::SubmitHint { player_token, text } => {
            player::handle_submit_hint(state, player_token, text).await
        }

        ClientMessage::SubmitGuess { player_token, text } => {
            player::handle_submit_guess(state, player_token, text).await
        }

        ClientMessage::GetRoundView { player_token } => {
            player::handle_get_round_view(state, player_token).await
        }

        // Host-only commands (authorization checked before dispatch)
        ClientMessage::HostStartRound => {
            check_host!(role, "start rounds");
            host::handle_start_round(state).await
        }

        ClientMessage::HostToggleRemoval { hint_id } => {
            check_host!(role, "remove hints");
            host::handle_toggle_removal(state, hint_id).await
        }

        ClientMessage::HostLockRound => {
            check_host!(role, "lock rounds");
            host::handle_lock_round(state).await
        }

        ClientMessage::HostTimer { action } => {
            check_host!(role, "control the timer");
            host::handle_timer(state, action).await
        }

        ClientMessage::HostPublish => {
            check_host!(role, "publish hints");
            host::handle_publish(state).await
        }

        ClientMessage::HostAdvanceRound { refresh_roster } => {
            check_host!(role, "advance rounds");
            host::handle_advance_round(state, refresh_roster).await
        }

        ClientMessage::HostRedrawTopic => {
            check_host!(role, "change the topic");
            host::handle_redraw_topic(state).await
        }

        ClientMessage::HostRemoveParticipant { participant_id } => {
            check_host!(role, "remove participants");
            host::handle_remove_participant(state, participant_id).await
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TimerAction;

    #[tokio::test]
    async fn test_unauthorized_host_command() {
        let state = Arc::new(AppState::default());

        for msg in [
            ClientMessage::HostStartRound,
            ClientMessage::HostLockRound,
            ClientMessage::HostPublish,
            ClientMessage::HostTimer {
                action: TimerAction::Start,
            },
        ] {
            match handle_message(msg, &ClientRole::Player, &state).await {
                Some(ServerMessage::Error { code, .. }) => assert_eq!(code, "UNAUTHORIZED"),
                other => panic!("Expected UNAUTHORIZED, got {:?}", other),
            }
        }
    }

    #[tokio::test]
    async fn test_join_returns_token() {
        let state = Arc::new(AppState::default());
        let result = handle_message(
            ClientMessage::Join {
                display_name: "Aki".to_string(),
            },
            &ClientRole::Player,
            &state,
        )
        .await;

        match result {
            Some(ServerMessage::Joined {
                token,
                display_name,
                ..
            }) => {
                assert_eq!(display_name, "Aki");
                assert!(state.participant_by_token(&token).await.is_some());
            }
            _ => panic!("Expected Joined message"),
        }
    }

    #[tokio::test]
    async fn test_start_round_error_code() {
        let state = Arc::new(AppState::default());
        let result = handle_message(ClientMessage::HostStartRound, &ClientRole::Host, &state).await;

        match result {
            Some(ServerMessage::Error { code, .. }) => {
                assert_eq!(code, "INSUFFICIENT_PARTICIPANTS")
            }
            _ => panic!("Expected Error message"),
        }
    }
}
