use super::dedup::detect_duplicates;
use super::normalize::is_correct_guess;
use super::roles::select_answerer;
use super::timer::RoundTimer;
use crate::error::{GameError, GameResult};
use crate::types::*;
use rand::Rng;
use std::collections::HashSet;

/// Per-round limits taken from the game configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoundRules {
    pub hint_seconds: u32,
    pub max_hint_chars: usize,
}

impl Default for RoundRules {
    fn default() -> Self {
        Self {
            hint_seconds: 60,
            max_hint_chars: 100,
        }
    }
}

/// Owns one round and enforces its phase machine:
/// `Assigning -> Collecting -> Locked -> Published -> Resolved`.
///
/// Every action checks the phase first and fails with `StateConflict`
/// outside of it.
#[derive(Debug, Clone)]
pub struct RoundSession {
    state: RoundState,
    rules: RoundRules,
}

impl RoundSession {
    /// Assign roles and open hint collection for the first round
    pub fn create<R: Rng + ?Sized>(
        participants: &[Participant],
        previous_answerer: Option<&ParticipantId>,
        topic: String,
        rules: RoundRules,
        rng: &mut R,
    ) -> GameResult<Self> {
        Self::assign(1, participants, None, previous_answerer, topic, rules, rng)
    }

    fn assign<R: Rng + ?Sized>(
        number: u32,
        participants: &[Participant],
        current_answerer: Option<&ParticipantId>,
        previous_answerer: Option<&ParticipantId>,
        topic: String,
        rules: RoundRules,
        rng: &mut R,
    ) -> GameResult<Self> {
        let answerer = select_answerer(participants, current_answerer, previous_answerer, rng)?
            .id
            .clone();

        let mut seen = HashSet::new();
        let seats: Vec<Seat> = participants
            .iter()
            .filter(|p| seen.insert(p.id.as_str()))
            .map(|p| Seat {
                participant: p.clone(),
                role: if p.id == answerer {
                    Role::Answerer
                } else {
                    Role::HintGiver
                },
            })
            .collect();

        let hints = seats
            .iter()
            .filter(|s| s.role == Role::HintGiver)
            .map(|s| Hint::new(&s.participant))
            .collect();

        let mut state = RoundState {
            id: ulid::Ulid::new().to_string(),
            number,
            phase: RoundPhase::Assigning,
            topic,
            answerer,
            previous_answerer: previous_answerer.cloned(),
            seats,
            hints,
            timer: RoundTimer::new(rules.hint_seconds),
            published: false,
            outcome: None,
        };

        tracing::info!(
            "Round {} assigned: answerer {} with {} hint-givers",
            state.number,
            state.answerer_name(),
            state.hints.len()
        );
        state.phase = RoundPhase::Collecting;

        Ok(Self { state, rules })
    }

    pub fn state(&self) -> &RoundState {
        &self.state
    }

    pub fn phase(&self) -> RoundPhase {
        self.state.phase
    }

    pub fn timer_state(&self) -> TimerState {
        self.state.timer.state()
    }

    fn expect_phase(&self, expected: RoundPhase, action: &str) -> GameResult<()> {
        if self.state.phase != expected {
            return Err(GameError::conflict(format!(
                "Cannot {} while round is {:?}",
                action, self.state.phase
            )));
        }
        Ok(())
    }

    /// A hint-giver replaces the text of their own hint
    pub fn set_hint_text(&mut self, giver_id: &str, text: String) -> GameResult<&RoundState> {
        self.expect_phase(RoundPhase::Collecting, "edit hints")?;
        if self.state.timer.is_expired() {
            return Err(GameError::conflict("Time is up, hints can no longer change"));
        }

        let seat = self
            .state
            .seat(giver_id)
            .ok_or_else(|| GameError::NotFound("Participant".to_string()))?;
        if seat.role == Role::Answerer {
            return Err(GameError::conflict("The answerer cannot give hints"));
        }

        let len = text.trim().chars().count();
        if len > self.rules.max_hint_chars {
            return Err(GameError::validation(format!(
                "Hint is {} characters, the limit is {}",
                len, self.rules.max_hint_chars
            )));
        }

        let hint = self
            .state
            .hints
            .iter_mut()
            .find(|h| h.giver_id == giver_id)
            .ok_or_else(|| GameError::NotFound("Hint".to_string()))?;
        hint.text = text;

        Ok(&self.state)
    }

    /// The collecting party flips a hint's exclusion. Allowed until publication.
    pub fn toggle_manual_removal(&mut self, hint_id: &str) -> GameResult<&RoundState> {
        if !matches!(self.state.phase, RoundPhase::Collecting | RoundPhase::Locked) {
            return Err(GameError::conflict(format!(
                "Cannot change hint removal while round is {:?}",
                self.state.phase
            )));
        }

        let hint = self
            .state
            .hints
            .iter_mut()
            .find(|h| h.id == hint_id)
            .ok_or_else(|| GameError::NotFound("Hint".to_string()))?;
        hint.manually_removed = !hint.manually_removed;

        Ok(&self.state)
    }

    /// Freeze hints and run duplicate detection once
    pub fn lock(&mut self) -> GameResult<&RoundState> {
        self.expect_phase(RoundPhase::Collecting, "lock")?;
        if !self.state.timer.is_expired() && !self.state.all_submitted() {
            return Err(GameError::conflict(
                "Cannot lock before every hint-giver has submitted or the timer expires",
            ));
        }

        detect_duplicates(&mut self.state.hints);
        self.state.timer.pause();
        self.state.phase = RoundPhase::Locked;

        let duplicates = self.state.hints.iter().filter(|h| h.is_duplicate).count();
        tracing::info!(
            "Round {} locked: {} hints, {} duplicates",
            self.state.number,
            self.state.hints.len(),
            duplicates
        );

        Ok(&self.state)
    }

    pub fn timer_action(&mut self, action: TimerAction) -> GameResult<TimerState> {
        self.expect_phase(RoundPhase::Collecting, "control the timer")?;
        Ok(self.state.timer.apply(action))
    }

    /// Advance the countdown by one unit. Returns true on the expiring tick.
    pub fn tick(&mut self) -> bool {
        if self.state.phase != RoundPhase::Collecting {
            return false;
        }
        let expired = self.state.timer.tick();
        if expired {
            tracing::info!("Round {} timer expired", self.state.number);
        }
        expired
    }

    pub fn publish(&mut self) -> GameResult<&RoundState> {
        self.expect_phase(RoundPhase::Locked, "publish")?;
        self.state.published = true;
        self.state.phase = RoundPhase::Published;

        tracing::info!(
            "Round {} published {} hints to the answerer",
            self.state.number,
            self.state.visible_hints().len()
        );

        Ok(&self.state)
    }

    /// What the answerer sees: nothing before publication
    pub fn published_hints(&self) -> Vec<&Hint> {
        if self.state.published {
            self.state.visible_hints()
        } else {
            Vec::new()
        }
    }

    /// Number of hints that would reach the answerer right now
    pub fn remaining_hint_count(&self) -> usize {
        self.state.visible_hints().len()
    }

    /// Grade the answerer's single guess
    pub fn submit_guess(&mut self, answerer_id: &str, guess: &str) -> GameResult<GuessOutcome> {
        self.expect_phase(RoundPhase::Published, "submit a guess")?;
        if answerer_id != self.state.answerer {
            return Err(GameError::conflict("Only the answerer can guess"));
        }
        if guess.trim().is_empty() {
            return Err(GameError::validation("Guess must not be empty"));
        }

        let outcome = GuessOutcome {
            guess: guess.trim().to_string(),
            correct: is_correct_guess(guess, &self.state.topic),
            resolved_topic: self.state.topic.clone(),
        };
        self.state.outcome = Some(outcome.clone());
        self.state.phase = RoundPhase::Resolved;

        tracing::info!(
            "Round {} resolved: guess {:?} is {}",
            self.state.number,
            outcome.guess,
            if outcome.correct { "correct" } else { "wrong" }
        );

        Ok(outcome)
    }

    /// Rotate roles into a fresh round. The answerer who just finished
    /// becomes the previous answerer. Without a new roster the current
    /// seats carry over.
    pub fn advance<R: Rng + ?Sized>(
        &self,
        roster: Option<&[Participant]>,
        topic: String,
        rng: &mut R,
    ) -> GameResult<RoundSession> {
        self.expect_phase(RoundPhase::Resolved, "start the next round")?;

        let participants = match roster {
            Some(list) => list.to_vec(),
            None => self.state.participants(),
        };

        Self::assign(
            self.state.number + 1,
            &participants,
            self.state.previous_answerer.as_ref(),
            Some(&self.state.answerer),
            topic,
            self.rules,
            rng,
        )
    }

    /// Swap the topic mid-collection: hints are cleared and the timer reset
    pub fn redraw_topic(&mut self, topic: String) -> GameResult<&RoundState> {
        self.expect_phase(RoundPhase::Collecting, "change the topic")?;

        self.state.topic = topic;
        for hint in &mut self.state.hints {
            hint.text.clear();
            hint.is_duplicate = false;
            hint.is_removed = false;
            hint.manually_removed = false;
        }
        self.state.timer.reset();

        Ok(&self.state)
    }
}
