use super::AppState;
use crate::error::{GameError, GameResult};
use crate::protocol::ServerMessage;
use crate::types::*;
use rand::Rng;

/// Safe character set for join tokens (excludes 0/O, 1/I/L to avoid confusion)
const CODE_CHARS: &[u8] = b"ABCDEFGHJKMNPQRSTUVWXYZ23456789";
const CODE_LENGTH: usize = 5;

fn generate_short_code() -> String {
    let mut rng = rand::rng();
    (0..CODE_LENGTH)
        .map(|_| CODE_CHARS[rng.random_range(0..CODE_CHARS.len())] as char)
        .collect()
}

/// A joined participant and the token they act with
#[derive(Debug, Clone)]
pub struct Member {
    pub participant: Participant,
    pub token: String,
}

/// Participants in join order
#[derive(Debug, Default)]
pub struct Roster {
    members: Vec<Member>,
}

impl Roster {
    pub fn participants(&self) -> Vec<Participant> {
        self.members.iter().map(|m| m.participant.clone()).collect()
    }

    pub fn by_token(&self, token: &str) -> Option<&Member> {
        self.members.iter().find(|m| m.token == token)
    }
}

impl AppState {
    /// Add a participant. Display names may repeat; the id is what counts.
    pub async fn join(&self, display_name: String) -> GameResult<Member> {
        let display_name = display_name.trim().to_string();
        if display_name.is_empty() {
            return Err(GameError::validation("Display name must not be empty"));
        }

        let mut roster = self.roster.write().await;
        let token = loop {
            let code = generate_short_code();
            if roster.by_token(&code).is_none() {
                break code;
            }
            // Collision - try again (extremely rare with 28M combinations)
        };

        let member = Member {
            participant: Participant {
                id: ulid::Ulid::new().to_string(),
                display_name,
            },
            token,
        };
        roster.members.push(member.clone());
        let participants = roster.participants();
        drop(roster);

        tracing::info!(
            "Participant {} joined as {:?}",
            member.participant.id,
            member.participant.display_name
        );
        self.broadcast_to_host(ServerMessage::Roster { participants });

        Ok(member)
    }

    pub async fn roster(&self) -> Vec<Participant> {
        self.roster.read().await.participants()
    }

    pub async fn participant_by_token(&self, token: &str) -> Option<Participant> {
        self.roster
            .read()
            .await
            .by_token(token)
            .map(|m| m.participant.clone())
    }

    /// Remove a participant who is not seated in an unfinished round
    pub async fn remove_participant(&self, participant_id: &str) -> GameResult<Participant> {
        let mut roster = self.roster.write().await;
        let index = roster
            .members
            .iter()
            .position(|m| m.participant.id == participant_id)
            .ok_or_else(|| GameError::NotFound("Participant".to_string()))?;

        {
            let round = self.round.read().await;
            if let Some(session) = round.as_ref() {
                if session.phase() != RoundPhase::Resolved
                    && session.state().seat(participant_id).is_some()
                {
                    return Err(GameError::conflict(
                        "Cannot remove a participant during their round",
                    ));
                }
            }
        }

        let member = roster.members.remove(index);
        let participants = roster.participants();
        drop(roster);

        tracing::info!("Removed participant {}", member.participant.id);
        self.broadcast_to_host(ServerMessage::Roster { participants });

        Ok(member.participant)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_join_assigns_id_and_token() {
        let state = AppState::default();
        let member = state.join("  Aki ".to_string()).await.unwrap();

        assert_eq!(member.participant.display_name, "Aki");
        assert_eq!(member.token.len(), CODE_LENGTH);
        assert!(!member.participant.id.is_empty());
        assert_eq!(
            state.participant_by_token(&member.token).await,
            Some(member.participant)
        );
    }

    #[tokio::test]
    async fn test_join_rejects_blank_name() {
        let state = AppState::default();
        let err = state.join("   ".to_string()).await.unwrap_err();
        assert!(matches!(err, GameError::Validation(_)));
        assert!(state.roster().await.is_empty());
    }

    #[tokio::test]
    async fn test_duplicate_names_are_distinct_participants() {
        let state = AppState::default();
        let first = state.join("Yuki".to_string()).await.unwrap();
        let second = state.join("Yuki".to_string()).await.unwrap();

        assert_ne!(first.participant.id, second.participant.id);
        assert_ne!(first.token, second.token);
        assert_eq!(state.roster().await.len(), 2);
    }

    #[tokio::test]
    async fn test_remove_participant() {
        let state = AppState::default();
        let member = state.join("Aki".to_string()).await.unwrap();

        let removed = state
            .remove_participant(&member.participant.id)
            .await
            .unwrap();
        assert_eq!(removed.display_name, "Aki");
        assert!(state.participant_by_token(&member.token).await.is_none());

        let err = state
            .remove_participant(&member.participant.id)
            .await
            .unwrap_err();
        assert_eq!(err, GameError::NotFound("Participant".to_string()));
    }

    #[tokio::test]
    async fn test_cannot_remove_seated_participant_mid_round() {
        let state = AppState::default();
        let a = state.join("A".to_string()).await.unwrap();
        state.join("B".to_string()).await.unwrap();
        state.start_round().await.unwrap();

        let err = state
            .remove_participant(&a.participant.id)
            .await
            .unwrap_err();
        assert!(matches!(err, GameError::StateConflict(_)));
    }

    #[test]
    fn test_short_code_alphabet() {
        for _ in 0..50 {
            let code = generate_short_code();
            assert!(code.bytes().all(|b| CODE_CHARS.contains(&b)));
        }
    }
}
