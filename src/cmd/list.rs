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

use crate::cmd::OutputFormat;
use crate::collection::Collection;
use crate::error::Fallible;
use crate::selector::select_due_cards;
use crate::types::card::Card;
use crate::types::card_id::CardId;
use crate::types::difficulty::Difficulty;
use crate::types::mastery::MasteryLevel;
use crate::types::timestamp::Timestamp;

pub fn list_cards(directory: Option<String>, due: bool, format: OutputFormat) -> Fallible<()> {
    let coll = Collection::new(directory)?;
    let cards = coll.cards()?;
    let now = Timestamp::now();
    let cards = if due {
        select_due_cards(&cards, now)
    } else {
        cards
    };
    print!("{}", render(&cards, format)?);
    Ok(())
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CardSummary<'a> {
    id: CardId,
    deck_name: &'a str,
    question: &'a str,
    answer: &'a str,
    difficulty: Difficulty,
    tags: &'a [String],
    mastery: MasteryLevel,
    review_count: u32,
    next_review: Option<Timestamp>,
}

pub(crate) fn render(cards: &[Card], format: OutputFormat) -> Fallible<String> {
    match format {
        OutputFormat::Json => {
            let summaries: Vec<CardSummary> = cards
                .iter()
                .map(|card| CardSummary {
                    id: card.id(),
                    deck_name: card.deck_name(),
                    question: &card.content().question,
                    answer: &card.content().answer,
                    difficulty: card.difficulty(),
                    tags: card.tags(),
                    mastery: card.mastery(),
                    review_count: card.performance().review_count,
                    next_review: card.next_review(),
                })
                .collect();
            let mut json = serde_json::to_string_pretty(&summaries)?;
            json.push('\n');
            Ok(json)
        }
        OutputFormat::Text => {
            let mut out = String::new();
            for card in cards {
                let due = card
                    .next_review()
                    .map(|ts| ts.local_display())
                    .unwrap_or_else(|| "now".to_string());
                out.push_str(&format!(
                    "{}  {:<12} {:<10} due {}  {}\n",
                    card.id().short(),
                    card.deck_name(),
                    card.mastery().label(),
                    due,
                    first_line(&card.content().question),
                ));
            }
            Ok(out)
        }
    }
}

fn first_line(s: &str) -> &str {
    s.lines().next().unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::card::CardContent;

    fn card(question: &str) -> Card {
        Card::new(
            "Geography",
            CardContent::new(question, "Paris"),
            Difficulty::Hard,
            vec!["europe".to_string()],
            Timestamp::parse("2025-01-01T00:00:00Z").unwrap(),
        )
    }

    #[test]
    fn test_text() -> Fallible<()> {
        let card = card("Capital of France?\nBe precise.");
        let text = render(&[card.clone()], OutputFormat::Text)?;
        assert_eq!(text.lines().count(), 1);
        assert!(text.starts_with(&card.id().short()));
        assert!(text.contains("Geography"));
        assert!(text.contains("New"));
        assert!(text.contains("Capital of France?"));
        assert!(!text.contains("Be precise."));
        Ok(())
    }

    #[test]
    fn test_json() -> Fallible<()> {
        let card = card("Capital of France?");
        let json = render(&[card.clone()], OutputFormat::Json)?;
        let value: serde_json::Value = serde_json::from_str(&json)?;
        let first = &value[0];
        assert_eq!(first["id"], card.id().to_hex());
        assert_eq!(first["deckName"], "Geography");
        assert_eq!(first["difficulty"], "hard");
        assert_eq!(first["mastery"], 0);
        assert_eq!(first["tags"][0], "europe");
        Ok(())
    }

    #[test]
    fn test_empty() -> Fallible<()> {
        assert_eq!(render(&[], OutputFormat::Text)?, "");
        assert_eq!(render(&[], OutputFormat::Json)?, "[]\n");
        Ok(())
    }
}
