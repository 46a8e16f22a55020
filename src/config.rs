//! Game configuration loaded from the environment

use crate::game::{RoundRules, TopicPool};
use std::net::SocketAddr;

const DEFAULT_HINT_SECONDS: u32 = 60;
const DEFAULT_MAX_HINT_CHARS: usize = 100;
const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";

#[derive(Debug, Clone)]
pub struct GameConfig {
    /// Countdown length for hint collection
    pub hint_seconds: u32,
    pub max_hint_chars: usize,
    pub topics: TopicPool,
    pub bind_addr: SocketAddr,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            hint_seconds: DEFAULT_HINT_SECONDS,
            max_hint_chars: DEFAULT_MAX_HINT_CHARS,
            topics: TopicPool::default(),
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 3000)),
        }
    }
}

impl GameConfig {
    /// Load config from environment variables, falling back to defaults
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let hint_seconds = match std::env::var("HINT_SECONDS") {
            Ok(v) => match v.trim().parse::<u32>() {
                Ok(secs) if secs > 0 => secs,
                _ => {
                    tracing::warn!("Invalid HINT_SECONDS={:?}, using {}", v, DEFAULT_HINT_SECONDS);
                    DEFAULT_HINT_SECONDS
                }
            },
            Err(_) => defaults.hint_seconds,
        };

        let max_hint_chars = match std::env::var("MAX_HINT_CHARS") {
            Ok(v) => match v.trim().parse::<usize>() {
                Ok(n) if n > 0 => n,
                _ => {
                    tracing::warn!(
                        "Invalid MAX_HINT_CHARS={:?}, using {}",
                        v,
                        DEFAULT_MAX_HINT_CHARS
                    );
                    DEFAULT_MAX_HINT_CHARS
                }
            },
            Err(_) => defaults.max_hint_chars,
        };

        let topics = std::env::var("TOPICS")
            .map(|v| TopicPool::new(v.split(',').map(str::to_string).collect()))
            .unwrap_or(defaults.topics);

        let bind_addr = match std::env::var("BIND_ADDR") {
            Ok(v) => v.trim().parse().unwrap_or_else(|_| {
                tracing::warn!("Invalid BIND_ADDR={:?}, using {}", v, DEFAULT_BIND_ADDR);
                defaults.bind_addr
            }),
            Err(_) => defaults.bind_addr,
        };

        tracing::info!(
            hint_seconds,
            max_hint_chars,
            topics = topics.len(),
            %bind_addr,
            "Game config loaded"
        );

        Self {
            hint_seconds,
            max_hint_chars,
            topics,
            bind_addr,
        }
    }

    pub fn round_rules(&self) -> RoundRules {
        RoundRules {
            hint_seconds: self.hint_seconds,
            max_hint_chars: self.max_hint_chars,
        }
    }
}
