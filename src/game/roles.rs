use crate::error::{GameError, GameResult};
use crate::types::{Participant, ParticipantId};
use rand::seq::IndexedRandom;
use rand::Rng;
use std::collections::HashSet;

/// Pick the next answerer.
///
/// Candidates exclude both `current_answerer` and `previous_answerer`. When
/// that leaves nobody, only `previous_answerer` is excluded. When advancing
/// rounds, `previous_answerer` is the answerer of the round that just ended,
/// so nobody answers twice in a row while three or more participants remain.
pub fn select_answerer<'a, R: Rng + ?Sized>(
    participants: &'a [Participant],
    current_answerer: Option<&ParticipantId>,
    previous_answerer: Option<&ParticipantId>,
    rng: &mut R,
) -> GameResult<&'a Participant> {
    let distinct: HashSet<&str> = participants.iter().map(|p| p.id.as_str()).collect();
    if distinct.len() < 2 {
        return Err(GameError::InsufficientParticipants {
            count: distinct.len(),
        });
    }

    let is = |p: &Participant, id: Option<&ParticipantId>| id.is_some_and(|id| *id == p.id);

    let pool: Vec<&Participant> = participants
        .iter()
        .filter(|p| !is(p, current_answerer) && !is(p, previous_answerer))
        .collect();
    let pool = if pool.is_empty() {
        participants
            .iter()
            .filter(|p| !is(p, previous_answerer))
            .collect()
    } else {
        pool
    };

    pool.choose(rng)
        .copied()
        .ok_or(GameError::InsufficientParticipants {
            count: distinct.len(),
        })
}
