//! Epoch clock.
//!
//! Wall-clock time is cut into fixed-length epochs. The epoch containing an
//! instant is its seed, and every client that agrees on the duration and
//! the time agrees on the seed.
//!
//! # Design Principles
//!
//! - All epoch arithmetic is checked or saturating; nothing overflows
//!   silently.
//! - The clock never reads time itself. Callers pass `now_ms`, usually from
//!   a [`TimeSource`], so tests and replays drive it deterministically.

use std::fmt::Debug;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use chrono::Utc;
use multiverse_types::Seed;

/// Milliseconds per second.
const MS_PER_SECOND: u64 = 1_000;

/// Seconds per minute.
const SECONDS_PER_MINUTE: u64 = 60;

/// Errors that can occur during clock operations.
#[derive(Debug, thiserror::Error)]
pub enum ClockError {
    /// Invalid epoch configuration (e.g. zero duration).
    #[error("invalid epoch configuration: {reason}")]
    InvalidConfig {
        /// Explanation of what is wrong with the configuration.
        reason: String,
    },
}

/// Derives seeds and countdowns from wall-clock milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EpochClock {
    /// Epoch length in milliseconds, at least 1.
    epoch_duration_ms: u64,
}

impl EpochClock {
    /// Create a clock for the given epoch length.
    ///
    /// # Errors
    ///
    /// Returns [`ClockError::InvalidConfig`] if `epoch_duration_ms` is 0.
    pub fn new(epoch_duration_ms: u64) -> Result<Self, ClockError> {
        if epoch_duration_ms == 0 {
            return Err(ClockError::InvalidConfig {
                reason: "epoch duration must be at least 1 ms".to_owned(),
            });
        }
        Ok(Self { epoch_duration_ms })
    }

    /// Return the configured epoch length in milliseconds.
    pub const fn epoch_duration_ms(&self) -> u64 {
        self.epoch_duration_ms
    }

    /// The seed of the epoch containing `now_ms`:
    /// `floor(now_ms / epoch_duration_ms)`.
    pub fn current_seed(&self, now_ms: u64) -> Seed {
        Seed::new(now_ms.checked_div(self.epoch_duration_ms).unwrap_or(0))
    }

    /// Time until the next epoch boundary, always in
    /// `(0, epoch_duration_ms]` unless the boundary is past `u64::MAX`.
    pub fn time_remaining(&self, now_ms: u64) -> Duration {
        let (_, next_boundary) = epoch_bounds(self.current_seed(now_ms), self.epoch_duration_ms);
        Duration::from_millis(next_boundary.saturating_sub(now_ms))
    }

    /// The countdown to the next boundary as `MM:SS`.
    pub fn countdown(&self, now_ms: u64) -> String {
        format_countdown(self.time_remaining(now_ms))
    }

    /// Start and end (exclusive) of the epoch identified by `seed`.
    pub fn epoch_bounds(&self, seed: Seed) -> (u64, u64) {
        epoch_bounds(seed, self.epoch_duration_ms)
    }
}

/// Start and end (exclusive) of an epoch, in milliseconds since the Unix
/// epoch. Saturates at `u64::MAX`.
pub fn epoch_bounds(seed: Seed, epoch_duration_ms: u64) -> (u64, u64) {
    let start = seed.value().saturating_mul(epoch_duration_ms);
    (start, start.saturating_add(epoch_duration_ms))
}

/// Format a remaining duration as `MM:SS`.
///
/// Seconds are rounded up, so any non-zero remainder renders as at least
/// `00:01` and `00:00` appears only for an exactly zero duration. Minutes
/// are not capped at 59.
pub fn format_countdown(remaining: Duration) -> String {
    let millis = u64::try_from(remaining.as_millis()).unwrap_or(u64::MAX);
    let total_seconds = millis.div_ceil(MS_PER_SECOND);
    let minutes = total_seconds.checked_div(SECONDS_PER_MINUTE).unwrap_or(0);
    let seconds = total_seconds.checked_rem(SECONDS_PER_MINUTE).unwrap_or(0);
    format!("{minutes:02}:{seconds:02}")
}

/// A source of wall-clock time in milliseconds since the Unix epoch.
pub trait TimeSource: Send + Sync + Debug {
    /// Current time in milliseconds since the Unix epoch.
    fn now_ms(&self) -> u64;
}

/// Reads the system clock through `chrono`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemTimeSource;

impl TimeSource for SystemTimeSource {
    fn now_ms(&self) -> u64 {
        // Times before 1970 clamp to zero.
        u64::try_from(Utc::now().timestamp_millis()).unwrap_or(0)
    }
}

/// A settable clock for tests and replays.
#[derive(Debug, Default)]
pub struct ManualTimeSource {
    now_ms: AtomicU64,
}

impl ManualTimeSource {
    /// Start at the given instant.
    pub const fn new(now_ms: u64) -> Self {
        Self {
            now_ms: AtomicU64::new(now_ms),
        }
    }

    /// Jump to an absolute instant.
    pub fn set(&self, now_ms: u64) {
        self.now_ms.store(now_ms, Ordering::SeqCst);
    }

    /// Move forward by `by_ms`, saturating.
    pub fn advance(&self, by_ms: u64) {
        let _ = self
            .now_ms
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |now| {
                Some(now.saturating_add(by_ms))
            });
    }
}

impl TimeSource for ManualTimeSource {
    fn now_ms(&self) -> u64 {
        self.now_ms.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const THIRTY_MINUTES: u64 = 1_800_000;

    fn clock() -> EpochClock {
        EpochClock::new(THIRTY_MINUTES).unwrap()
    }

    #[test]
    fn zero_duration_is_rejected() {
        assert!(matches!(
            EpochClock::new(0),
            Err(ClockError::InvalidConfig { .. })
        ));
    }

    #[test]
    fn seed_is_floor_of_time_over_duration() {
        let clock = clock();
        assert_eq!(clock.current_seed(0), Seed::new(0));
        assert_eq!(clock.current_seed(THIRTY_MINUTES - 1), Seed::new(0));
        assert_eq!(clock.current_seed(THIRTY_MINUTES), Seed::new(1));
        assert_eq!(clock.current_seed(1_800_000_000), Seed::new(1000));
    }

    #[test]
    fn seed_is_non_decreasing() {
        let clock = EpochClock::new(7_919).unwrap();
        let mut previous = Seed::new(0);
        for t in (0..2_000_000_u64).step_by(997) {
            let seed = clock.current_seed(t);
            assert!(seed >= previous);
            previous = seed;
        }
    }

    #[test]
    fn remaining_time_is_positive_and_bounded() {
        let clock = clock();
        for t in [0, 1, 999, 1_000, 1_799_999, 1_800_000, 5_400_001] {
            let remaining = clock.time_remaining(t);
            assert!(remaining > Duration::ZERO, "t = {t}");
            assert!(remaining <= Duration::from_millis(THIRTY_MINUTES), "t = {t}");
        }
        assert_eq!(clock.time_remaining(1_799_999), Duration::from_millis(1));
        assert_eq!(
            clock.time_remaining(1_800_000),
            Duration::from_millis(THIRTY_MINUTES)
        );
    }

    #[test]
    fn countdown_rounds_seconds_up() {
        let clock = clock();
        assert_eq!(clock.countdown(0), "30:00");
        assert_eq!(clock.countdown(1), "30:00");
        assert_eq!(clock.countdown(1_000), "29:59");
        assert_eq!(clock.countdown(1_799_999), "00:01");
        assert_eq!(clock.countdown(1_800_000), "30:00");
    }

    #[test]
    fn zero_only_at_rollover() {
        assert_eq!(format_countdown(Duration::ZERO), "00:00");
        assert_eq!(format_countdown(Duration::from_millis(1)), "00:01");
        assert_eq!(format_countdown(Duration::from_secs(61)), "01:01");
        assert_eq!(format_countdown(Duration::from_secs(6_000)), "100:00");
    }

    #[test]
    fn bounds_follow_seed() {
        let clock = clock();
        assert_eq!(clock.epoch_bounds(Seed::new(1000)), (1_800_000_000, 1_801_800_000));
        assert_eq!(epoch_bounds(Seed::new(u64::MAX), 2), (u64::MAX, u64::MAX));
    }

    #[test]
    fn manual_source_moves() {
        let time = ManualTimeSource::new(10);
        time.advance(5);
        assert_eq!(time.now_ms(), 15);
        time.set(3);
        assert_eq!(time.now_ms(), 3);
        time.set(u64::MAX);
        time.advance(1);
        assert_eq!(time.now_ms(), u64::MAX);
    }

    #[test]
    fn system_source_is_after_2020() {
        assert!(SystemTimeSource.now_ms() > 1_577_836_800_000);
    }
}
