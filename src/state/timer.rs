use super::AppState;
use crate::broadcast::spawn_timer_ticker;
use crate::error::{GameError, GameResult};
use crate::protocol::ServerMessage;
use crate::types::*;

impl AppState {
    /// Apply a host timer action and keep the ticker task in step with it.
    /// The ticker is adjusted under the round lock so racing actions cannot
    /// leave a running timer without its task.
    pub async fn timer_action(&self, action: TimerAction) -> GameResult<TimerState> {
        let mut round = self.round.write().await;
        let session = round
            .as_mut()
            .ok_or_else(|| GameError::conflict("No round has been started"))?;
        let was_running = session.timer_state().running;
        let timer = session.timer_action(action)?;
        if timer.expired {
            self.broadcast_to_host(ServerMessage::HostRound {
                round: (&*session).into(),
            });
        }

        tracing::info!("Timer {:?}: {} seconds left", action, timer.remaining);

        if timer.running && !was_running {
            self.start_ticker().await;
        } else if !timer.running {
            self.stop_ticker().await;
        }
        drop(round);

        self.broadcast_to_all(ServerMessage::timer(timer));
        Ok(timer)
    }

    /// One countdown step. None when there is no round.
    pub async fn tick_timer(&self) -> Option<TimerState> {
        let mut round = self.round.write().await;
        let session = round.as_mut()?;
        let expired = session.tick();
        let timer = session.timer_state();

        self.broadcast_to_all(ServerMessage::timer(timer));
        if expired {
            self.broadcast_to_host(ServerMessage::HostRound {
                round: (&*session).into(),
            });
            self.broadcast_to_all(ServerMessage::round_changed(session.state()));
        }
        Some(timer)
    }

    pub async fn ticker_active(&self) -> bool {
        self.ticker
            .lock()
            .await
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }

    async fn start_ticker(&self) {
        let mut ticker = self.ticker.lock().await;
        if let Some(old) = ticker.take() {
            old.abort();
        }
        *ticker = Some(spawn_timer_ticker(self.clone()));
    }

    pub(super) async fn stop_ticker(&self) {
        if let Some(handle) = self.ticker.lock().await.take() {
            handle.abort();
        }
    }
}
