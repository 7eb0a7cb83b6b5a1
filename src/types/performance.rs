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

use crate::scheduler::score_outcome;
use crate::types::mastery::MasteryLevel;
use crate::types::outcome::Outcome;
use crate::types::timestamp::Timestamp;

/// Represents scheduling information for a card.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Performance {
    /// The card's mastery level.
    pub mastery: MasteryLevel,
    /// The number of outcomes recorded for the card.
    pub review_count: u32,
    /// When the card was last reviewed. `None` if it never was.
    pub last_reviewed_at: Option<Timestamp>,
    /// When the card is next due. `None` means due now.
    pub next_review: Option<Timestamp>,
}

impl Performance {
    /// Performance of a card created at `created_at`.
    pub fn new(created_at: Timestamp) -> Self {
        Self {
            mastery: MasteryLevel::NEW,
            review_count: 0,
            last_reviewed_at: None,
            next_review: Some(created_at),
        }
    }

    pub fn is_due(&self, now: Timestamp) -> bool {
        self.next_review.is_none_or(|next| next <= now)
    }

    /// The performance after recording `outcome` at `now`.
    pub fn update(&self, outcome: Outcome, now: Timestamp) -> Self {
        let schedule = score_outcome(self.mastery, outcome, now);
        Self {
            mastery: schedule.mastery,
            review_count: self.review_count + 1,
            last_reviewed_at: Some(now),
            next_review: Some(schedule.next_review),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Fallible;

    #[test]
    fn test_update() -> Fallible<()> {
        let created = Timestamp::parse("2024-12-25T00:00:00Z")?;
        let now = Timestamp::parse("2025-01-01T00:00:00Z")?;
        let perf = Performance::new(created).update(Outcome::Correct, now);
        assert_eq!(perf.mastery.value(), 1);
        assert_eq!(perf.review_count, 1);
        assert_eq!(perf.last_reviewed_at, Some(now));
        assert_eq!(perf.next_review, Some(now.plus_days(3)));
        assert!(!perf.is_due(now));
        assert!(perf.is_due(now.plus_days(3)));

        let perf = perf.update(Outcome::Incorrect, now);
        assert_eq!(perf.mastery.value(), 0);
        assert_eq!(perf.review_count, 2);
        assert_eq!(perf.next_review, Some(now.plus_days(1)));
        Ok(())
    }

    #[test]
    fn test_missing_next_review_is_due() -> Fallible<()> {
        let now = Timestamp::parse("2025-01-01T00:00:00Z")?;
        let perf = Performance {
            next_review: None,
            ..Performance::new(now)
        };
        assert!(perf.is_due(now));
        Ok(())
    }
}
