//! Pure round logic: no I/O, no locking, no clocks.

mod dedup;
mod normalize;
mod roles;
mod round;
mod timer;
mod topics;

pub use dedup::detect_duplicates;
pub use normalize::{is_correct_guess, normalize, normalize_guess};
pub use roles::select_answerer;
pub use round::{RoundRules, RoundSession};
pub use timer::{format_clock, RoundTimer, TimerStatus};
pub use topics::{TopicPool, DEFAULT_TOPICS};
