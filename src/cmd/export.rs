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


use serde::Serialize;

use crate::collection::Collection;
use crate::db::ReviewRecord;
use crate::db::SessionRecord;
use crate::error::Fallible;
use crate::types::card::Card;
use crate::types::card_id::CardId;
use crate::types::difficulty::Difficulty;
use crate::types::mastery::MasteryLevel;
use crate::types::outcome::Outcome;
use crate::types::timestamp::Timestamp;

pub fn export_collection(directory: Option<String>) -> Fallible<()> {
    let coll: Collection = Collection::new(directory)?;
    let export: Export = get_export(&coll)?;
    let json: String = serde_json::to_string_pretty(&export)?;
    println!("{json}");
    Ok(())
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Export {
    cards: Vec<CardExport>,
    sessions: Vec<SessionExport>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CardExport {
    id: CardId,
    deck_name: String,
    question: String,
    answer: String,
    difficulty: Difficulty,
    tags: Vec<String>,
    created_at: Timestamp,
    performance: PerformanceExport,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PerformanceExport {
    mastery: MasteryLevel,
    review_count: u32,
    last_reviewed_at: Option<Timestamp>,
    next_review: Option<Timestamp>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SessionExport {
    started_at: Timestamp,
    ended_at: Timestamp,
    reviewed: u32,
    correct: u32,
    streak: u32,
    reviews: Vec<ReviewExport>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ReviewExport {
    card_id: CardId,
    reviewed_at: Timestamp,
    outcome: Outcome,
    mastery_before: MasteryLevel,
    mastery_after: MasteryLevel,
    next_review: Option<Timestamp>,
}

fn get_export(coll: &Collection) -> Fallible<Export> {
    let cards: Vec<CardExport> = coll.cards()?.iter().map(card_export).collect();
    let sessions: Vec<SessionExport> = coll
        .db
        .sessions()?
        .into_iter()
        .map(session_export)
        .collect();
    Ok(Export { cards, sessions })
}

fn card_export(card: &Card) -> CardExport {
    let performance = card.performance();
    CardExport {
        id: card.id(),
        deck_name: card.deck_name().to_owned(),
        question: card.content().question.clone(),
        answer: card.content().answer.clone(),
        difficulty: card.difficulty(),
        tags: card.tags().to_vec(),
        created_at: card.created_at(),
        performance: PerformanceExport {
            mastery: performance.mastery,
            review_count: performance.review_count,
            last_reviewed_at: performance.last_reviewed_at,
            next_review: performance.next_review,
        },
    }
}

fn session_export(session: SessionRecord) -> SessionExport {
    SessionExport {
        started_at: session.started_at,
        ended_at: session.ended_at,
        reviewed: session.stats.reviewed,
        correct: session.stats.correct,
        streak: session.stats.streak,
        reviews: session.reviews.into_iter().map(review_export).collect(),
    }
}

fn review_export(review: ReviewRecord) -> ReviewExport {
    ReviewExport {
        card_id: review.card_id,
        reviewed_at: review.reviewed_at,
        outcome: review.outcome,
        mastery_before: review.mastery_before,
        mastery_after: review.mastery_after,
        next_review: review.next_review,
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;
    use crate::cmd::import::import_path;
    use crate::cmd::review::review_cards;
    use crate::helper::create_tmp_collection;

    #[test]
    fn test_export() -> Fallible<()> {
        let directory = create_tmp_collection()?;
        let mut coll = Collection::new(Some(directory.display().to_string()))?;
        import_path(&coll, &directory, Timestamp::now())?;
        let mut input = Cursor::new(b"\ny\n".to_vec());
        let mut output: Vec<u8> = Vec::new();
        review_cards(&mut coll, 20, &mut input, &mut output, Timestamp::now)?;

        let value = serde_json::to_value(get_export(&coll)?)?;
        let cards = value["cards"].as_array().unwrap();
        assert_eq!(cards.len(), 2);
        assert!(cards.iter().all(|c| c["deckName"] == "Biology"));
        let sessions = value["sessions"].as_array().unwrap();
        assert_eq!(sessions.len(), 1);
        assert_eq!(sessions[0]["reviewed"], 1);
        let review = &sessions[0]["reviews"][0];
        assert_eq!(review["outcome"], "correct");
        assert_eq!(review["masteryBefore"], 0);
        assert_eq!(review["masteryAfter"], 1);
        let reviewed = cards
            .iter()
            .find(|c| c["id"] == review["cardId"])
            .unwrap();
        assert_eq!(reviewed["performance"]["reviewCount"], 1);
        Ok(())
    }
}
