use crate::types::{TimerAction, TimerState};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TimerStatus {
    Idle,
    Running,
    Paused,
    Expired,
}

/// Cooperative countdown shared by all hint-givers.
///
/// Only `tick` moves a running timer to expired, and once expired it stays
/// there until `reset`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RoundTimer {
    initial: u32,
    remaining: u32,
    status: TimerStatus,
}

impl RoundTimer {
    pub fn new(seconds: u32) -> Self {
        Self {
            initial: seconds,
            remaining: seconds,
            status: TimerStatus::Idle,
        }
    }

    pub fn status(&self) -> TimerStatus {
        self.status
    }

    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    pub fn is_running(&self) -> bool {
        self.status == TimerStatus::Running
    }

    pub fn is_expired(&self) -> bool {
        self.status == TimerStatus::Expired
    }

    pub fn state(&self) -> TimerState {
        TimerState {
            remaining: self.remaining,
            running: self.is_running(),
            expired: self.is_expired(),
        }
    }

    pub fn start(&mut self) {
        match self.status {
            TimerStatus::Idle | TimerStatus::Paused if self.remaining == 0 => self.expire(),
            TimerStatus::Idle | TimerStatus::Paused => self.status = TimerStatus::Running,
            TimerStatus::Running | TimerStatus::Expired => {}
        }
    }

    pub fn pause(&mut self) {
        if self.status == TimerStatus::Running {
            self.status = TimerStatus::Paused;
        }
    }

    pub fn force_expire(&mut self) {
        if matches!(self.status, TimerStatus::Running | TimerStatus::Paused) {
            self.expire();
        }
    }

    pub fn reset(&mut self) {
        self.remaining = self.initial;
        self.status = TimerStatus::Idle;
    }

    /// One unit of time. Returns true only on the tick that expires the timer.
    pub fn tick(&mut self) -> bool {
        if self.status != TimerStatus::Running {
            return false;
        }
        self.remaining = self.remaining.saturating_sub(1);
        if self.remaining == 0 {
            self.expire();
            return true;
        }
        false
    }

    pub fn apply(&mut self, action: TimerAction) -> TimerState {
        match action {
            TimerAction::Start => self.start(),
            TimerAction::Pause => self.pause(),
            TimerAction::Reset => self.reset(),
            TimerAction::ForceExpire => self.force_expire(),
        }
        self.state()
    }

    fn expire(&mut self) {
        self.remaining = 0;
        self.status = TimerStatus::Expired;
    }
}

/// Format seconds as m:ss for clock displays
pub fn format_clock(seconds: u32) -> String {
    format!("{}:{:02}", seconds / 60, seconds % 60)
}
