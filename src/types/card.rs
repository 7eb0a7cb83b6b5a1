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

use maud::Markup;
use maud::PreEscaped;
use maud::html;

use crate::markdown::markdown_to_html;
use crate::types::card_id::CardId;
use crate::types::difficulty::Difficulty;
use crate::types::mastery::MasteryLevel;
use crate::types::performance::Performance;
use crate::types::timestamp::Timestamp;

#[derive(Clone, Debug, PartialEq)]
pub struct Card {
    /// The card's identifier, fixed at creation.
    id: CardId,
    /// The name of the deck (subject) this card belongs to.
    deck_name: String,
    /// The card's content.
    content: CardContent,
    /// The author's difficulty tag.
    difficulty: Difficulty,
    /// Free-form tags.
    tags: Vec<String>,
    /// When the card was created.
    created_at: Timestamp,
    /// The card's scheduling state.
    performance: Performance,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CardContent {
    pub question: String,
    pub answer: String,
}

impl CardContent {
    pub fn new(question: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            question: question.into().trim().to_string(),
            answer: answer.into().trim().to_string(),
        }
    }
}

impl Card {
    /// Create a brand new card. It is immediately due.
    pub fn new(
        deck_name: impl Into<String>,
        content: CardContent,
        difficulty: Difficulty,
        tags: Vec<String>,
        created_at: Timestamp,
    ) -> Self {
        let deck_name = deck_name.into().trim().to_string();
        let id = CardId::derive(&deck_name, &content.question, &content.answer);
        Self {
            id,
            deck_name,
            content,
            difficulty,
            tags,
            created_at,
            performance: Performance::new(created_at),
        }
    }

    /// Reassemble a card that already exists, e.g. when loading it from the
    /// database.
    pub fn from_parts(
        id: CardId,
        deck_name: String,
        content: CardContent,
        difficulty: Difficulty,
        tags: Vec<String>,
        created_at: Timestamp,
        performance: Performance,
    ) -> Self {
        Self {
            id,
            deck_name,
            content,
            difficulty,
            tags,
            created_at,
            performance,
        }
    }

    pub fn id(&self) -> CardId {
        self.id
    }

    pub fn deck_name(&self) -> &str {
        &self.deck_name
    }

    pub fn content(&self) -> &CardContent {
        &self.content
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    pub fn created_at(&self) -> Timestamp {
        self.created_at
    }

    pub fn performance(&self) -> &Performance {
        &self.performance
    }

    pub fn set_performance(&mut self, performance: Performance) {
        self.performance = performance;
    }

    pub fn mastery(&self) -> MasteryLevel {
        self.performance.mastery
    }

    pub fn next_review(&self) -> Option<Timestamp> {
        self.performance.next_review
    }

    pub fn is_due(&self, now: Timestamp) -> bool {
        self.performance.is_due(now)
    }

    pub fn html_front(&self) -> Markup {
        html! {
            (PreEscaped(markdown_to_html(&self.content.question)))
        }
    }

    pub fn html_back(&self) -> Markup {
        html! {
            (PreEscaped(markdown_to_html(&self.content.answer)))
        }
    }
}
