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

//! The review loop.
//!
//! A session presents due cards one at a time, in selector order, and scores
//! each outcome as it is reported. Nothing is persisted here: the session
//! collects [`Review`]s, and the caller decides whether to save them.

use serde::Serialize;

use crate::error::Fallible;
use crate::error::fail;
use crate::selector::DueQueue;
use crate::types::card::Card;
use crate::types::outcome::Outcome;
use crate::types::review::Review;
use crate::types::timestamp::Timestamp;

/// Running counters for one session.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct SessionStats {
    pub reviewed: u32,
    pub correct: u32,
    /// Consecutive correct outcomes since the last incorrect one.
    pub streak: u32,
}

impl SessionStats {
    pub fn record(&mut self, outcome: Outcome) {
        self.reviewed += 1;
        if outcome.is_correct() {
            self.correct += 1;
            self.streak += 1;
        } else {
            self.streak = 0;
        }
    }

    /// Percentage of correct outcomes, rounded. Zero if nothing was reviewed.
    pub fn accuracy(&self) -> u32 {
        if self.reviewed == 0 {
            0
        } else {
            (self.correct as f64 * 100.0 / self.reviewed as f64).round() as u32
        }
    }
}

pub enum SessionState<'a> {
    /// No card is shown: the session is over.
    Idle,
    /// A card is shown and awaits an outcome.
    Presenting(&'a Card),
}

pub struct ReviewSession {
    queue: DueQueue,
    current: Option<Card>,
    /// How many more cards may be taken from the queue.
    remaining: usize,
    total: usize,
    stats: SessionStats,
    reviews: Vec<Review>,
}

/// What a finished (or abandoned) session produced.
pub struct SessionReport {
    pub stats: SessionStats,
    pub reviews: Vec<Review>,
}

impl ReviewSession {
    /// Start a session over the cards due at `now`. At most `limit` cards are
    /// presented, if given.
    pub fn start(cards: &[Card], now: Timestamp, limit: Option<usize>) -> Self {
        let queue = DueQueue::new(cards, now);
        let total = match limit {
            Some(limit) => limit.min(queue.len()),
            None => queue.len(),
        };
        log::debug!("Starting session with {total} of {} due cards.", queue.len());
        let mut session = Self {
            queue,
            current: None,
            remaining: total,
            total,
            stats: SessionStats::default(),
            reviews: Vec::new(),
        };
        session.advance();
        session
    }

    fn advance(&mut self) {
        self.current = if self.remaining > 0 {
            self.remaining -= 1;
            self.queue.pop()
        } else {
            None
        };
    }

    pub fn state(&self) -> SessionState<'_> {
        match &self.current {
            Some(card) => SessionState::Presenting(card),
            None => SessionState::Idle,
        }
    }

    pub fn current(&self) -> Option<&Card> {
        self.current.as_ref()
    }

    pub fn is_finished(&self) -> bool {
        self.current.is_none()
    }

    /// The number of cards this session will present if run to the end.
    pub fn total(&self) -> usize {
        self.total
    }

    pub fn stats(&self) -> SessionStats {
        self.stats
    }

    pub fn reviews(&self) -> &[Review] {
        &self.reviews
    }

    /// Score the presented card and move on to the next one.
    pub fn record(&mut self, outcome: Outcome, now: Timestamp) -> Fallible<Review> {
        let Some(card) = self.current.take() else {
            return fail("no card is being presented.");
        };
        let performance = card.performance().update(outcome, now);
        log::debug!(
            "{} {} m={}->{} due={}",
            card.id().short(),
            outcome.as_str(),
            card.mastery(),
            performance.mastery,
            performance
                .next_review
                .map(|ts| ts.to_string())
                .unwrap_or_default()
        );
        let review = Review {
            card_id: card.id(),
            reviewed_at: now,
            outcome,
            mastery_before: card.mastery(),
            performance,
        };
        self.stats.record(outcome);
        self.reviews.push(review.clone());
        self.advance();
        Ok(review)
    }

    pub fn into_report(self) -> SessionReport {
        SessionReport {
            stats: self.stats,
            reviews: self.reviews,
        }
    }
}

/// Run a whole session. `present` is shown each card with the stats so far,
/// and answers with an outcome, or `None` to stop early. `clock` supplies the
/// time at which each outcome is scored.
pub fn run_session<C, F>(
    cards: &[Card],
    limit: Option<usize>,
    clock: C,
    mut present: F,
) -> Fallible<SessionReport>
where
    C: Fn() -> Timestamp,
    F: FnMut(&Card, &SessionStats) -> Fallible<Option<Outcome>>,
{
    let mut session = ReviewSession::start(cards, clock(), limit);
    while let Some(card) = session.current() {
        let stats = session.stats();
        match present(card, &stats)? {
            Some(outcome) => {
                session.record(outcome, clock())?;
            }
            None => {
                log::debug!("Session abandoned.");
                break;
            }
        }
    }
    Ok(session.into_report())
}
