use super::AppState;
use crate::error::{GameError, GameResult};
use crate::game::RoundSession;
use crate::protocol::{HostRoundInfo, PlayerView, RoundSummary, ServerMessage};
use crate::types::*;

fn no_round() -> GameError {
    GameError::conflict("No round has been started")
}

impl AppState {
    pub async fn current_round(&self) -> Option<RoundState> {
        self.round.read().await.as_ref().map(|r| r.state().clone())
    }

    pub async fn host_round(&self) -> Option<HostRoundInfo> {
        self.round.read().await.as_ref().map(HostRoundInfo::from)
    }

    pub async fn round_summary(&self) -> Option<RoundSummary> {
        self.round.read().await.as_ref().map(RoundSummary::from)
    }

    pub async fn player_view(&self, participant_id: &str) -> Option<PlayerView> {
        let round = self.round.read().await;
        PlayerView::for_participant(round.as_ref()?, participant_id)
    }

    /// Push the new round state out: full snapshot to the host,
    /// a change notice to everyone else
    fn broadcast_round(&self, session: &RoundSession) {
        self.broadcast_to_host(ServerMessage::HostRound {
            round: session.into(),
        });
        self.broadcast_to_all(ServerMessage::round_changed(session.state()));
    }

    /// Create a round from the joined roster. Only allowed when no round is
    /// running. After a resolved round this continues the numbering and
    /// rotation, like advancing with a refreshed roster.
    pub async fn start_round(&self) -> GameResult<RoundState> {
        let participants = self.roster().await;

        let mut round = self.round.write().await;
        let session = {
            let mut rng = rand::rng();
            let topic = self.config.topics.draw(&mut rng);
            match round.as_ref() {
                Some(r) if r.phase() != RoundPhase::Resolved => {
                    return Err(GameError::conflict(format!(
                        "Cannot start a round while the current round is {:?}",
                        r.phase()
                    )));
                }
                Some(r) => r.advance(Some(&participants), topic, &mut rng)?,
                None => RoundSession::create(
                    &participants,
                    None,
                    topic,
                    self.config.round_rules(),
                    &mut rng,
                )?,
            }
        };
        let state = session.state().clone();
        self.broadcast_round(&session);
        *round = Some(session);

        self.stop_ticker().await;
        Ok(state)
    }

    /// A hint-giver writes or rewrites their hint
    pub async fn set_hint_text(&self, participant_id: &str, text: String) -> GameResult<()> {
        let mut round = self.round.write().await;
        let session = round.as_mut().ok_or_else(no_round)?;
        session.set_hint_text(participant_id, text)?;
        self.broadcast_round(session);
        Ok(())
    }

    pub async fn toggle_manual_removal(&self, hint_id: &str) -> GameResult<HostRoundInfo> {
        let mut round = self.round.write().await;
        let session = round.as_mut().ok_or_else(no_round)?;
        session.toggle_manual_removal(hint_id)?;
        self.broadcast_round(session);
        Ok(HostRoundInfo::from(&*session))
    }

    /// Close hint collection and mark duplicates
    pub async fn lock_round(&self) -> GameResult<RoundState> {
        let mut round = self.round.write().await;
        let session = round.as_mut().ok_or_else(no_round)?;
        let state = session.lock()?.clone();
        self.broadcast_round(session);

        self.stop_ticker().await;
        Ok(state)
    }

    pub async fn publish_round(&self) -> GameResult<RoundState> {
        let mut round = self.round.write().await;
        let session = round.as_mut().ok_or_else(no_round)?;
        let state = session.publish()?.clone();
        self.broadcast_round(session);
        Ok(state)
    }

    pub async fn submit_guess(&self, participant_id: &str, guess: &str) -> GameResult<GuessOutcome> {
        let mut round = self.round.write().await;
        let session = round.as_mut().ok_or_else(no_round)?;
        let outcome = session.submit_guess(participant_id, guess)?;
        self.broadcast_round(session);
        self.broadcast_to_all(ServerMessage::GuessResult {
            correct: outcome.correct,
            resolved_topic: outcome.resolved_topic.clone(),
        });
        Ok(outcome)
    }

    /// Replace the resolved round with a freshly assigned one
    pub async fn advance_round(&self, refresh_roster: bool) -> GameResult<RoundState> {
        let roster = if refresh_roster {
            Some(self.roster().await)
        } else {
            None
        };

        let mut round = self.round.write().await;
        let current = round.as_ref().ok_or_else(no_round)?;
        let next = {
            let mut rng = rand::rng();
            let topic = self.config.topics.draw(&mut rng);
            current.advance(roster.as_deref(), topic, &mut rng)?
        };
        let state = next.state().clone();
        self.broadcast_round(&next);
        *round = Some(next);

        self.stop_ticker().await;
        Ok(state)
    }

    /// Draw another topic during collection, clearing all hints
    pub async fn redraw_topic(&self) -> GameResult<RoundState> {
        let mut round = self.round.write().await;
        let session = round.as_mut().ok_or_else(no_round)?;
        let topic = self.config.topics.draw(&mut rand::rng());
        let state = session.redraw_topic(topic)?.clone();
        self.broadcast_round(session);

        self.stop_ticker().await;
        self.broadcast_to_all(ServerMessage::timer(state.timer.state()));
        Ok(state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use crate::game::TopicPool;

    fn config() -> GameConfig {
        GameConfig {
            topics: TopicPool::new(vec!["Tokyo Tower".to_string()]),
            ..GameConfig::default()
        }
    }

    /// State with the given participants joined and a round started
    async fn started(names: &[&str]) -> AppState {
        let state = AppState::new(config());
        for name in names {
            state.join(name.to_string()).await.unwrap();
        }
        state.start_round().await.unwrap();
        state
    }

    async fn givers(state: &AppState) -> Vec<ParticipantId> {
        state
            .current_round()
            .await
            .unwrap()
            .hints
            .iter()
            .map(|h| h.giver_id.clone())
            .collect()
    }

    #[tokio::test]
    async fn test_start_round_needs_two_participants() {
        let state = AppState::new(config());
        state.join("Solo".to_string()).await.unwrap();
        let err = state.start_round().await.unwrap_err();
        assert_eq!(err, GameError::InsufficientParticipants { count: 1 });
        assert!(state.current_round().await.is_none());
    }

    #[tokio::test]
    async fn test_start_round_rejected_while_running() {
        let state = started(&["A", "B", "C"]).await;
        let err = state.start_round().await.unwrap_err();
        assert!(matches!(err, GameError::StateConflict(_)));
    }

    #[tokio::test]
    async fn test_actions_without_round() {
        let state = AppState::new(config());
        assert!(state.lock_round().await.is_err());
        assert!(state.publish_round().await.is_err());
        assert!(state.submit_guess("x", "y").await.is_err());
        assert!(state.advance_round(false).await.is_err());
    }

    #[tokio::test]
    async fn test_full_round_through_state() {
        let state = started(&["A", "B", "C", "D"]).await;
        let givers = givers(&state).await;
        let texts = ["tall building", "Tall Building", "red color"];
        for (giver, text) in givers.iter().zip(texts) {
            state.set_hint_text(giver, text.to_string()).await.unwrap();
        }

        let locked = state.lock_round().await.unwrap();
        assert_eq!(locked.phase, RoundPhase::Locked);
        assert!(locked.hints[0].is_duplicate && locked.hints[1].is_duplicate);

        // Edits after the lock are rejected, not merged
        let err = state
            .set_hint_text(&givers[2], "blue".to_string())
            .await
            .unwrap_err();
        assert!(matches!(err, GameError::StateConflict(_)));

        state.publish_round().await.unwrap();
        let answerer = state.current_round().await.unwrap().answerer;
        let view = state.player_view(&answerer).await.unwrap();
        assert_eq!(view.published_hints.len(), 1);
        assert_eq!(view.published_hints[0].text, "red color");
        assert!(view.topic.is_none());

        let outcome = state.submit_guess(&answerer, "tower").await.unwrap();
        assert!(outcome.correct);
        let view = state.player_view(&answerer).await.unwrap();
        assert_eq!(view.topic.as_deref(), Some("Tokyo Tower"));

        let next = state.advance_round(false).await.unwrap();
        assert_eq!(next.number, 2);
        assert_ne!(next.answerer, answerer);
        assert_eq!(next.previous_answerer, Some(answerer));
    }

    #[tokio::test]
    async fn test_advance_with_refreshed_roster() {
        let state = started(&["A", "B"]).await;
        let round = state.current_round().await.unwrap();
        state
            .set_hint_text(&round.hints[0].giver_id, "orange".to_string())
            .await
            .unwrap();
        state.lock_round().await.unwrap();
        state.publish_round().await.unwrap();
        state.submit_guess(&round.answerer, "tower").await.unwrap();

        state.join("C".to_string()).await.unwrap();
        let next = state.advance_round(true).await.unwrap();
        assert_eq!(next.seats.len(), 3);
        assert_ne!(next.answerer, round.answerer);
    }

    #[tokio::test]
    async fn test_host_broadcast_on_change() {
        let state = started(&["A", "B", "C"]).await;
        let mut host_rx = state.host_broadcast.subscribe();
        let giver = givers(&state).await.remove(0);

        state.set_hint_text(&giver, "red".to_string()).await.unwrap();

        match host_rx.recv().await.unwrap() {
            ServerMessage::HostRound { round } => {
                assert_eq!(round.round.hints[0].text, "red");
                assert_eq!(round.remaining_hints, 1);
            }
            other => panic!("Expected HostRound, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_redraw_topic_resets_hints() {
        let state = started(&["A", "B", "C"]).await;
        let giver = givers(&state).await.remove(0);
        state.set_hint_text(&giver, "red".to_string()).await.unwrap();

        let round = state.redraw_topic().await.unwrap();
        assert_eq!(round.topic, "Tokyo Tower");
        assert!(round.hints.iter().all(|h| h.text.is_empty()));
    }

    #[tokio::test]
    async fn test_concurrent_edits_and_lock_are_serialized() {
        let state = started(&["A", "B", "C", "D"]).await;
        let givers = givers(&state).await;
        for giver in &givers {
            state.set_hint_text(giver, "x".to_string()).await.unwrap();
        }

        let mut tasks = Vec::new();
        for (i, giver) in givers.iter().cloned().enumerate() {
            let state = state.clone();
            tasks.push(tokio::spawn(async move {
                state.set_hint_text(&giver, format!("hint {}", i)).await
            }));
        }
        let locked = state.lock_round().await.unwrap();
        let mut results = Vec::new();
        for task in tasks {
            results.push(task.await.unwrap());
        }

        // Whatever landed before the lock is in the locked set; the rest failed
        let final_round = state.current_round().await.unwrap();
        assert_eq!(final_round.hints, locked.hints);
        for (i, result) in results.iter().enumerate() {
            let text = &locked.hints[i].text;
            match result {
                Ok(()) => assert_eq!(text, &format!("hint {}", i)),
                Err(e) => {
                    assert!(matches!(e, GameError::StateConflict(_)));
                    assert_eq!(text, "x");
                }
            }
        }
    }

    #[tokio::test]
    async fn test_start_after_resolved_continues_rotation() {
        let state = started(&["A", "B", "C"]).await;
        let first = state.current_round().await.unwrap();
        for hint in &first.hints {
            state
                .set_hint_text(&hint.giver_id, "clue".to_string())
                .await
                .unwrap();
        }
        state.lock_round().await.unwrap();
        state.publish_round().await.unwrap();
        state.submit_guess(&first.answerer, "tower").await.unwrap();

        state.join("D".to_string()).await.unwrap();
        let next = state.start_round().await.unwrap();
        assert_eq!(next.number, 2);
        assert_eq!(next.seats.len(), 4);
        assert_ne!(next.answerer, first.answerer);
        assert_eq!(next.previous_answerer, Some(first.answerer));
    }
}

