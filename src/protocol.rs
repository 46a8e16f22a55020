use crate::error::GameError;
use crate::game::{format_clock, RoundSession};
use crate::types::*;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "t", rename_all = "snake_case")]
pub enum ClientMessage {
    /// Join the session roster
    Join {
        display_name: String,
    },
    SubmitHint {
        player_token: String,
        text: String,
    },
    SubmitGuess {
        player_token: String,
        text: String,
    },
    /// Ask for this participant's view of the current round
    GetRoundView {
        player_token: String,
    },
    // Host-only messages
    HostStartRound,
    HostToggleRemoval {
        hint_id: HintId,
    },
    HostLockRound,
    HostTimer {
        action: TimerAction,
    },
    HostPublish,
    /// Move to the next round; `refresh_roster` re-reads the joined roster
    HostAdvanceRound {
        #[serde(default)]
        refresh_roster: bool,
    },
    HostRedrawTopic,
    HostRemoveParticipant {
        participant_id: ParticipantId,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "t", rename_all = "snake_case")]
pub enum ServerMessage {
    Welcome {
        protocol: String,
        role: ClientRole,
        server_now: String,
    },
    Joined {
        participant_id: ParticipantId,
        token: String,
        display_name: String,
    },
    /// Host-only: joined participants
    Roster {
        participants: Vec<Participant>,
    },
    /// Host-only: the full round, including topic and every hint
    HostRound {
        round: HostRoundInfo,
    },
    /// Participant-specific view, never leaks what the viewer must not see
    PlayerRound {
        view: PlayerView,
    },
    /// Broadcast whenever the round changes; carries no secrets
    RoundChanged {
        round_no: u32,
        phase: RoundPhase,
    },
    Timer {
        timer: TimerState,
        clock: String,
        server_now: String,
    },
    GuessResult {
        correct: bool,
        resolved_topic: String,
    },
    HintAccepted,
    Error {
        code: String,
        msg: String,
    },
}

impl ServerMessage {
    pub fn timer(timer: TimerState) -> Self {
        Self::Timer {
            timer,
            clock: format_clock(timer.remaining),
            server_now: chrono::Utc::now().to_rfc3339(),
        }
    }

    pub fn round_changed(round: &RoundState) -> Self {
        Self::RoundChanged {
            round_no: round.number,
            phase: round.phase,
        }
    }
}

impl From<GameError> for ServerMessage {
    fn from(e: GameError) -> Self {
        Self::Error {
            code: e.code().to_string(),
            msg: e.to_string(),
        }
    }
}

/// Host snapshot of a round
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HostRoundInfo {
    pub round: RoundState,
    pub timer: TimerState,
    /// Hints that would reach the answerer right now
    pub remaining_hints: usize,
}

impl From<&RoundSession> for HostRoundInfo {
    fn from(session: &RoundSession) -> Self {
        Self {
            round: session.state().clone(),
            timer: session.timer_state(),
            remaining_hints: session.remaining_hint_count(),
        }
    }
}

/// Public round status for anyone who asks (no topic, no hint texts)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoundSummary {
    pub round_no: u32,
    pub phase: RoundPhase,
    pub answerer_name: String,
    pub hint_givers: usize,
    pub submitted: usize,
    pub timer: TimerState,
}

impl From<&RoundSession> for RoundSummary {
    fn from(session: &RoundSession) -> Self {
        let state = session.state();
        Self {
            round_no: state.number,
            phase: state.phase,
            answerer_name: state.answerer_name().to_string(),
            hint_givers: state.hints.len(),
            submitted: state.hints.iter().filter(|h| h.is_submitted()).count(),
            timer: session.timer_state(),
        }
    }
}

/// A hint as the answerer receives it
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PublishedHint {
    pub giver_name: String,
    pub text: String,
}

impl From<&Hint> for PublishedHint {
    fn from(h: &Hint) -> Self {
        Self {
            giver_name: h.giver_name.clone(),
            text: h.text.trim().to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerView {
    pub round_no: u32,
    pub phase: RoundPhase,
    pub role: Role,
    pub answerer_name: String,
    /// Hidden from the answerer until the guess is resolved
    pub topic: Option<String>,
    /// The viewer's own hint text (hint-givers only)
    pub own_hint: Option<String>,
    pub published_hints: Vec<PublishedHint>,
    pub timer: TimerState,
    pub outcome: Option<GuessOutcome>,
}

impl PlayerView {
    /// None when the participant has no seat in this round
    pub fn for_participant(session: &RoundSession, participant_id: &str) -> Option<Self> {
        let state = session.state();
        let seat = state.seat(participant_id)?;

        let topic = match seat.role {
            Role::HintGiver => Some(state.topic.clone()),
            Role::Answerer if state.phase == RoundPhase::Resolved => Some(state.topic.clone()),
            Role::Answerer => None,
        };

        let own_hint = state
            .hints
            .iter()
            .find(|h| h.giver_id == participant_id)
            .map(|h| h.text.clone());

        Some(Self {
            round_no: state.number,
            phase: state.phase,
            role: seat.role,
            answerer_name: state.answerer_name().to_string(),
            topic,
            own_hint,
            published_hints: session
                .published_hints()
                .into_iter()
                .map(PublishedHint::from)
                .collect(),
            timer: session.timer_state(),
            outcome: state.outcome.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::RoundRules;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn session() -> RoundSession {
        let participants: Vec<Participant> = ["a", "b", "c"]
            .iter()
            .map(|id| Participant {
                id: id.to_string(),
                display_name: id.to_uppercase(),
            })
            .collect();
        RoundSession::create(
            &participants,
            None,
            "富士山".to_string(),
            RoundRules::default(),
            &mut StdRng::seed_from_u64(5),
        )
        .unwrap()
    }

    #[test]
    fn test_client_message_format() {
        let msg: ClientMessage =
            serde_json::from_str(r#"{"t":"host_timer","action":"force_expire"}"#).unwrap();
        assert!(matches!(
            msg,
            ClientMessage::HostTimer {
                action: TimerAction::ForceExpire
            }
        ));

        let msg: ClientMessage = serde_json::from_str(r#"{"t":"host_advance_round"}"#).unwrap();
        assert!(matches!(
            msg,
            ClientMessage::HostAdvanceRound {
                refresh_roster: false
            }
        ));
    }

    #[test]
    fn test_answerer_view_hides_topic() {
        let session = session();
        let answerer = session.state().answerer.clone();
        let view = PlayerView::for_participant(&session, &answerer).unwrap();

        assert_eq!(view.role, Role::Answerer);
        assert!(view.topic.is_none());
        assert!(view.own_hint.is_none());
        assert!(view.published_hints.is_empty());
    }

    #[test]
    fn test_hint_giver_view_shows_topic() {
        let mut session = session();
        let giver = session.state().hints[0].giver_id.clone();
        session.set_hint_text(&giver, "volcano".to_string()).unwrap();

        let view = PlayerView::for_participant(&session, &giver).unwrap();
        assert_eq!(view.role, Role::HintGiver);
        assert_eq!(view.topic.as_deref(), Some("富士山"));
        assert_eq!(view.own_hint.as_deref(), Some("volcano"));
    }

    #[test]
    fn test_view_for_stranger() {
        assert!(PlayerView::for_participant(&session(), "nobody").is_none());
    }

    #[test]
    fn test_timer_message_clock() {
        let msg = ServerMessage::timer(TimerState {
            remaining: 75,
            running: true,
            expired: false,
        });
        match msg {
            ServerMessage::Timer { clock, .. } => assert_eq!(clock, "1:15"),
            _ => panic!("Expected Timer message"),
        }
    }
}
