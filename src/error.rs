/// Result type for round operations
pub type GameResult<T> = Result<T, GameError>;

/// Errors surfaced by the round core to its callers
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GameError {
    /// Role assignment needs at least two distinct participants
    #[error("At least 2 participants are required, got {count}")]
    InsufficientParticipants { count: usize },

    /// Action attempted outside its valid phase or by an actor without rights
    #[error("{0}")]
    StateConflict(String),

    #[error("{0}")]
    Validation(String),

    #[error("{0} not found")]
    NotFound(String),
}

impl GameError {
    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::StateConflict(msg.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Stable code sent to clients in `ServerMessage::Error`
    pub fn code(&self) -> &'static str {
        match self {
            Self::InsufficientParticipants { .. } => "INSUFFICIENT_PARTICIPANTS",
            Self::StateConflict(_) => "STATE_CONFLICT",
            Self::Validation(_) => "VALIDATION_FAILED",
            Self::NotFound(_) => "NOT_FOUND",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(
            GameError::InsufficientParticipants { count: 1 }.code(),
            "INSUFFICIENT_PARTICIPANTS"
        );
        assert_eq!(GameError::conflict("x").code(), "STATE_CONFLICT");
        assert_eq!(GameError::validation("x").code(), "VALIDATION_FAILED");
        assert_eq!(GameError::NotFound("Hint".into()).code(), "NOT_FOUND");
    }

    #[test]
    fn test_error_messages() {
        let err = GameError::InsufficientParticipants { count: 1 };
        assert_eq!(err.to_string(), "At least 2 participants are required, got 1");
        assert_eq!(
            GameError::NotFound("Participant".into()).to_string(),
            "Participant not found"
        );
    }
}
