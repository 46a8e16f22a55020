mod roster;
mod round;
mod timer;

pub use roster::{Member, Roster};

use crate::config::GameConfig;
use crate::protocol::ServerMessage;
use std::sync::Arc;
use tokio::sync::{broadcast, Mutex, RwLock};
use tokio::task::JoinHandle;

/// Shared session state.
///
/// Lock order is `roster` before `round`; no method holds `round` while
/// waiting on `roster`. Every round mutation happens under the `round`
/// write lock, so concurrent actors are serialized per session.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<GameConfig>,
    pub roster: Arc<RwLock<Roster>>,
    pub round: Arc<RwLock<Option<crate::game::RoundSession>>>,
    /// Broadcast channel for all clients
    pub broadcast: broadcast::Sender<ServerMessage>,
    /// Broadcast channel for the collecting party only
    pub host_broadcast: broadcast::Sender<ServerMessage>,
    /// Countdown task, present while the timer runs
    ticker: Arc<Mutex<Option<JoinHandle<()>>>>,
}

impl AppState {
    pub fn new(config: GameConfig) -> Self {
        let (tx, _rx) = broadcast::channel(100);
        let (host_tx, _host_rx) = broadcast::channel(100);
        Self {
            config: Arc::new(config),
            roster: Arc::new(RwLock::new(Roster::default())),
            round: Arc::new(RwLock::new(None)),
            broadcast: tx,
            host_broadcast: host_tx,
            ticker: Arc::new(Mutex::new(None)),
        }
    }

    /// Send to every connected client
    pub fn broadcast_to_all(&self, msg: ServerMessage) {
        // No receivers connected is fine
        let _ = self.broadcast.send(msg);
    }

    pub fn broadcast_to_host(&self, msg: ServerMessage) {
        let _ = self.host_broadcast.send(msg);
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(GameConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_new_state_is_empty() {
        let state = AppState::default();
        assert!(state.current_round().await.is_none());
        assert!(state.roster().await.is_empty());
    }

    #[tokio::test]
    async fn test_broadcast_reaches_subscribers() {
        let state = AppState::default();
        let mut rx = state.broadcast.subscribe();
        let mut host_rx = state.host_broadcast.subscribe();

        state.broadcast_to_all(ServerMessage::HintAccepted);
        state.broadcast_to_host(ServerMessage::Roster {
            participants: vec![],
        });

        assert!(matches!(rx.recv().await, Ok(ServerMessage::HintAccepted)));
        assert!(matches!(
            host_rx.recv().await,
            Ok(ServerMessage::Roster { .. })
        ));
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_broadcast_without_receivers() {
        let state = AppState::default();
        state.broadcast_to_all(ServerMessage::HintAccepted);
    }
}
