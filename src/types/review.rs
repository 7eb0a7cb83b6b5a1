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

use crate::types::card_id::CardId;
use crate::types::mastery::MasteryLevel;
use crate::types::outcome::Outcome;
use crate::types::performance::Performance;
use crate::types::timestamp::Timestamp;

/// One recorded outcome during a session.
#[derive(Clone, Debug, PartialEq)]
pub struct Review {
    pub card_id: CardId,
    pub reviewed_at: Timestamp,
    pub outcome: Outcome,
    pub mastery_before: MasteryLevel,
    /// The card's performance after the outcome. This is what gets written
    /// back to the card when the session is saved.
    pub performance: Performance,
}

impl Review {
    pub fn mastery_after(&self) -> MasteryLevel {
        self.performance.mastery
    }

    pub fn next_review(&self) -> Option<Timestamp> {
        self.performance.next_review
    }
}
