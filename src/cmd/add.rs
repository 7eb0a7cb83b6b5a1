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

use crate::collection::Collection;
use crate::error::Fallible;
use crate::error::fail;
use crate::types::card::Card;
use crate::types::card::CardContent;
use crate::types::card_id::CardId;
use crate::types::difficulty::Difficulty;
use crate::types::timestamp::Timestamp;

pub struct NewCard {
    pub deck: String,
    pub question: String,
    pub answer: String,
    pub difficulty: Difficulty,
    pub tags: Vec<String>,
}

pub fn add_card(directory: Option<String>, new_card: NewCard) -> Fallible<()> {
    let coll = Collection::new(directory)?;
    let id = insert_new_card(&coll, new_card, Timestamp::now())?;
    println!("{id}");
    Ok(())
}

fn insert_new_card(coll: &Collection, new_card: NewCard, now: Timestamp) -> Fallible<CardId> {
    let content = CardContent::new(new_card.question, new_card.answer);
    if content.question.is_empty() || content.answer.is_empty() {
        return fail("question and answer must not be empty.");
    }
    let card = Card::new(
        new_card.deck,
        content,
        new_card.difficulty,
        new_card.tags,
        now,
    );
    coll.db.insert_card(&card)?;
    Ok(card.id())
}
