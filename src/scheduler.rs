// Copyright 2025 Fernando Borretti
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! The review scheduler.
//!
//! A card climbs one mastery level for every correct answer and drops one for
//! every incorrect answer. The level it lands on decides how many days pass
//! before it is due again.

use crate::types::mastery::MasteryLevel;
use crate::types::outcome::Outcome;
use crate::types::timestamp::Timestamp;

/// Review interval in days, indexed by mastery level.
pub const INTERVALS: [i64; 6] = [1, 3, 7, 14, 30, 90];

/// Used for a level outside the table. Unreachable through `MasteryLevel`.
const FALLBACK_INTERVAL: i64 = 90;

/// The result of scoring an outcome.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Schedule {
    /// The card's new mastery level.
    pub mastery: MasteryLevel,
    /// When the card is next due.
    pub next_review: Timestamp,
}

/// The number of days until a card at `level` is due again.
pub fn interval_days(level: MasteryLevel) -> i64 {
    INTERVALS
        .get(level.value() as usize)
        .copied()
        .unwrap_or(FALLBACK_INTERVAL)
}

/// Compute a card's next mastery level and due date from its current level
/// and the outcome of a review performed at `now`.
///
/// The interval is that of the new level, counted from `now` rather than from
/// the card's previous due date.
pub fn score_outcome(mastery: MasteryLevel, outcome: Outcome, now: Timestamp) -> Schedule {
    let mastery = match outcome {
        Outcome::Correct => mastery.raised(),
        Outcome::Incorrect => mastery.lowered(),
    };
    Schedule {
        mastery,
        next_review: now.plus_days(interval_days(mastery)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Fallible;

    fn now() -> Fallible<Timestamp> {
        Timestamp::parse("2025-01-01T00:00:00Z")
    }

    #[test]
    fn test_mastery_clamp() -> Fallible<()> {
        for m in MasteryLevel::all() {
            let up = score_outcome(m, Outcome::Correct, now()?);
            assert_eq!(up.mastery.value(), (m.value() + 1).min(5));
            let down = score_outcome(m, Outcome::Incorrect, now()?);
            assert_eq!(down.mastery.value(), m.value().saturating_sub(1));
        }
        Ok(())
    }

    #[test]
    fn test_interval_uses_new_level() -> Fallible<()> {
        let now = now()?;
        for m in MasteryLevel::all() {
            for outcome in [Outcome::Correct, Outcome::Incorrect] {
                let schedule = score_outcome(m, outcome, now);
                let days = INTERVALS[schedule.mastery.value() as usize];
                assert_eq!(schedule.next_review, now.plus_days(days));
            }
        }
        Ok(())
    }

    #[test]
    fn test_interval_table() {
        let days: Vec<i64> = MasteryLevel::all().map(interval_days).collect();
        assert_eq!(days, vec![1, 3, 7, 14, 30, 90]);
    }

    #[test]
    fn test_correct_from_level_two() -> Fallible<()> {
        let schedule = score_outcome(MasteryLevel::clamped(2), Outcome::Correct, now()?);
        assert_eq!(schedule.mastery.value(), 3);
        assert_eq!(
            schedule.next_review,
            Timestamp::parse("2025-01-15T00:00:00Z")?
        );
        Ok(())
    }

    #[test]
    fn test_incorrect_at_floor() -> Fallible<()> {
        let now = now()?;
        let schedule = score_outcome(MasteryLevel::NEW, Outcome::Incorrect, now);
        assert_eq!(schedule.mastery, MasteryLevel::NEW);
        assert_eq!(schedule.next_review, now.plus_days(1));
        Ok(())
    }

    #[test]
    fn test_correct_at_ceiling() -> Fallible<()> {
        let now = now()?;
        let schedule = score_outcome(MasteryLevel::MAX, Outcome::Correct, now);
        assert_eq!(schedule.mastery, MasteryLevel::MAX);
        assert_eq!(schedule.next_review, now.plus_days(90));
        Ok(())
    }

    #[test]
    fn test_out_of_range_input_is_clamped() -> Fallible<()> {
        let schedule = score_outcome(MasteryLevel::clamped(17), Outcome::Correct, now()?);
        assert_eq!(schedule.mastery, MasteryLevel::MAX);
        let schedule = score_outcome(MasteryLevel::clamped(-4), Outcome::Incorrect, now()?);
        assert_eq!(schedule.mastery, MasteryLevel::NEW);
        Ok(())
    }
}
