use crate::game::RoundTimer;
use serde::{Deserialize, Serialize};

/// Opaque ID types for type safety
pub type ParticipantId = String;
pub type HintId = String;
pub type RoundId = String;

/// A member of the session roster. The id is the identity key; display
/// names may collide.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Participant {
    pub id: ParticipantId,
    pub display_name: String,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Answerer,
    HintGiver,
}

/// A participant's place in one round
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Seat {
    #[serde(flatten)]
    pub participant: Participant,
    pub role: Role,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Hint {
    pub id: HintId,
    pub giver_id: ParticipantId,
    pub giver_name: String,
    pub text: String,
    /// Set by the duplicate detector
    pub is_duplicate: bool,
    pub is_removed: bool,
    /// Excluded by the collecting party, independent of duplicate status
    pub manually_removed: bool,
}

impl Hint {
    pub fn new(giver: &Participant) -> Self {
        Self {
            id: ulid::Ulid::new().to_string(),
            giver_id: giver.id.clone(),
            giver_name: giver.display_name.clone(),
            text: String::new(),
            is_duplicate: false,
            is_removed: false,
            manually_removed: false,
        }
    }

    /// Whitespace-only text never counts as submitted
    pub fn is_submitted(&self) -> bool {
        !self.text.trim().is_empty()
    }

    /// Whether the answerer gets to see this hint
    pub fn is_visible(&self) -> bool {
        self.is_submitted() && !self.is_removed && !self.manually_removed
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RoundPhase {
    Assigning,
    Collecting,
    Locked,
    Published,
    Resolved,
}

/// Externally visible countdown state.
/// `expired` implies `!running` and `remaining == 0`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct TimerState {
    pub remaining: u32,
    pub running: bool,
    pub expired: bool,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TimerAction {
    Start,
    Pause,
    Reset,
    ForceExpire,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GuessOutcome {
    pub guess: String,
    pub correct: bool,
    pub resolved_topic: String,
}

/// Everything one round owns
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoundState {
    pub id: RoundId,
    pub number: u32,
    pub phase: RoundPhase,
    pub topic: String,
    pub answerer: ParticipantId,
    pub previous_answerer: Option<ParticipantId>,
    /// Roster order; the answerer is marked by role
    pub seats: Vec<Seat>,
    /// One per hint-giver, in seat order
    pub hints: Vec<Hint>,
    pub timer: RoundTimer,
    pub published: bool,
    pub outcome: Option<GuessOutcome>,
}

impl RoundState {
    pub fn seat(&self, participant_id: &str) -> Option<&Seat> {
        self.seats
            .iter()
            .find(|s| s.participant.id == participant_id)
    }

    pub fn answerer_name(&self) -> &str {
        self.seat(&self.answerer)
            .map(|s| s.participant.display_name.as_str())
            .unwrap_or_default()
    }

    /// Hints that would reach the answerer if published now
    pub fn visible_hints(&self) -> Vec<&Hint> {
        self.hints.iter().filter(|h| h.is_visible()).collect()
    }

    pub fn all_submitted(&self) -> bool {
        self.hints.iter().all(Hint::is_submitted)
    }

    pub fn participants(&self) -> Vec<Participant> {
        self.seats.iter().map(|s| s.participant.clone()).collect()
    }
}

/// Connection role on the transport
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum ClientRole {
    /// The collecting party that locks, reviews and publishes
    Host,
    Player,
}
