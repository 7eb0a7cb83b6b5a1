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

//! Choosing which cards to review, and in what order.
//!
//! Weakest cards come first. Among cards of equal mastery, the one that has
//! been due the longest comes first. A card with no due date sorts before
//! any card with one.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use crate::types::card::Card;
use crate::types::mastery::MasteryLevel;
use crate::types::timestamp::Timestamp;

type Priority = (MasteryLevel, Option<Timestamp>);

fn priority(card: &Card) -> Priority {
    (card.mastery(), card.next_review())
}

/// Return the cards due at `now`, in review order. The sort is stable, so
/// cards with equal priority keep their input order.
pub fn select_due_cards(cards: &[Card], now: Timestamp) -> Vec<Card> {
    let mut due: Vec<Card> = cards
        .iter()
        .filter(|card| card.is_due(now))
        .cloned()
        .collect();
    due.sort_by_key(priority);
    due
}

/// A priority queue of due cards which yields them in the same order as
/// [`select_due_cards`], without re-sorting as cards are taken out.
pub struct DueQueue {
    /// Priorities, tie-broken by insertion order, pointing into `cards`.
    heap: BinaryHeap<Reverse<(Priority, usize)>>,
    cards: Vec<Option<Card>>,
}

impl DueQueue {
    pub fn new(cards: &[Card], now: Timestamp) -> Self {
        let mut queue = Self {
            heap: BinaryHeap::new(),
            cards: Vec::new(),
        };
        for card in cards.iter().filter(|card| card.is_due(now)) {
            queue.push(card.clone());
        }
        queue
    }

    pub fn push(&mut self, card: Card) {
        let index = self.cards.len();
        self.heap.push(Reverse((priority(&card), index)));
        self.cards.push(Some(card));
    }

    pub fn pop(&mut self) -> Option<Card> {
        let Reverse((_, index)) = self.heap.pop()?;
        self.cards[index].take()
    }

    pub fn peek(&self) -> Option<&Card> {
        let Reverse((_, index)) = self.heap.peek()?;
        self.cards[*index].as_ref()
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }
}
