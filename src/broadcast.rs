use crate::state::AppState;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};

/// Countdown resolution
pub const TICK_PERIOD: Duration = Duration::from_secs(1);

/// Spawn the task that drives the round timer while it runs.
/// It exits on its own once the timer stops running; pause, reset,
/// force-expire and lock abort it early.
pub fn spawn_timer_ticker(state: AppState) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = interval_at(Instant::now() + TICK_PERIOD, TICK_PERIOD);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            interval.tick().await;

            match state.tick_timer().await {
                Some(timer) if timer.running => continue,
                Some(timer) => {
                    tracing::debug!("Ticker stopping, timer expired={}", timer.expired);
                    break;
                }
                None => break,
            }
        }
    })
}
