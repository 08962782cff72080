//! The game clock: wall-clock instants in, elapsed-game-time stamps out.

use crate::domain::GameTime;
use chrono::{DateTime, Utc};

/// Elapsed-time source for one game.
///
/// While the game runs, elapsed time advances with the observation instant
/// passed in; once frozen, every later observation returns the same value.
/// Instants before the start clamp to zero rather than going negative.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameClock {
    started_at: DateTime<Utc>,
    completed_at: Option<DateTime<Utc>>,
}

impl GameClock {
    pub fn new(started_at: DateTime<Utc>) -> Self {
        GameClock {
            started_at,
            completed_at: None,
        }
    }

    pub fn with_completed(started_at: DateTime<Utc>, completed_at: DateTime<Utc>) -> Self {
        GameClock {
            started_at,
            completed_at: Some(completed_at),
        }
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    pub fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }

    pub fn is_frozen(&self) -> bool {
        self.completed_at.is_some()
    }

    /// Freeze the clock at the given instant. A second freeze is ignored.
    pub fn freeze(&mut self, at: DateTime<Utc>) {
        if self.completed_at.is_none() {
            self.completed_at = Some(at.max(self.started_at));
        }
    }

    /// The elapsed game time as observed at `now`.
    ///
    /// Historical instants (an event persisted before completion) still
    /// stamp correctly after the freeze: the cap applies to the
    /// observation, not retroactively to the whole timeline.
    pub fn elapsed_at(&self, now: DateTime<Utc>) -> GameTime {
        let effective = match self.completed_at {
            Some(completed) => now.min(completed),
            None => now,
        };
        let secs = (effective - self.started_at).num_seconds().max(0);
        GameTime::from_secs(secs as u32)
    }

    /// Total duration once frozen.
    pub fn frozen_duration(&self) -> Option<GameTime> {
        self.completed_at.map(|at| self.elapsed_at(at))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn start() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 1, 18, 0, 0).unwrap()
    }

    #[test]
    fn test_elapsed_advances_with_observation() {
        let clock = GameClock::new(start());
        assert_eq!(clock.elapsed_at(start()), GameTime::zero());
        assert_eq!(
            clock.elapsed_at(start() + Duration::seconds(65)),
            GameTime::from_secs(65)
        );
    }

    #[test]
    fn test_elapsed_is_monotonic() {
        let clock = GameClock::new(start());
        let mut last = GameTime::zero();
        for secs in [0i64, 1, 5, 5, 30, 3600] {
            let t = clock.elapsed_at(start() + Duration::seconds(secs));
            assert!(t >= last);
            last = t;
        }
    }

    #[test]
    fn test_elapsed_clamps_before_start() {
        let clock = GameClock::new(start());
        assert_eq!(
            clock.elapsed_at(start() - Duration::seconds(30)),
            GameTime::zero()
        );
    }

    #[test]
    fn test_frozen_clock_stops_advancing() {
        let mut clock = GameClock::new(start());
        clock.freeze(start() + Duration::seconds(600));

        assert!(clock.is_frozen());
        assert_eq!(clock.frozen_duration(), Some(GameTime::from_secs(600)));
        // Wall clock keeps moving; the observed value does not.
        assert_eq!(
            clock.elapsed_at(start() + Duration::seconds(9999)),
            GameTime::from_secs(600)
        );
    }

    #[test]
    fn test_freeze_is_idempotent() {
        let mut clock = GameClock::new(start());
        clock.freeze(start() + Duration::seconds(100));
        clock.freeze(start() + Duration::seconds(500));
        assert_eq!(clock.frozen_duration(), Some(GameTime::from_secs(100)));
    }

    #[test]
    fn test_historical_stamps_survive_the_freeze() {
        let mut clock = GameClock::new(start());
        clock.freeze(start() + Duration::seconds(300));
        // An event that happened at 2:00 still stamps as 2:00.
        assert_eq!(
            clock.elapsed_at(start() + Duration::seconds(120)),
            GameTime::from_secs(120)
        );
    }

    #[test]
    fn test_freeze_before_start_clamps() {
        let mut clock = GameClock::new(start());
        clock.freeze(start() - Duration::seconds(10));
        assert_eq!(clock.frozen_duration(), Some(GameTime::zero()));
    }
}
