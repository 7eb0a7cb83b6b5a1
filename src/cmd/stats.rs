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
use crate::types::mastery::MasteryLevel;
use crate::types::timestamp::Timestamp;

pub fn print_stats(directory: Option<String>, format: OutputFormat) -> Fallible<()> {
    let coll = Collection::new(directory)?;
    let stats = collect_stats(&coll, Timestamp::now())?;
    match format {
        OutputFormat::Json => {
            let stats_json = serde_json::to_string_pretty(&stats)?;
            println!("{stats_json}");
        }
        OutputFormat::Text => {
            print!("{}", stats.to_text());
        }
    }
    Ok(())
}

#[derive(Serialize, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Stats {
    total_cards: usize,
    due_cards: usize,
    /// Card counts indexed by mastery level.
    cards_by_mastery: Vec<usize>,
    total_reviews: usize,
    total_sessions: usize,
    /// Percentage of correct reviews, rounded.
    accuracy: u32,
}

pub fn collect_stats(coll: &Collection, now: Timestamp) -> Fallible<Stats> {
    let cards = coll.cards()?;
    let mut cards_by_mastery = vec![0; MasteryLevel::all().count()];
    for card in &cards {
        cards_by_mastery[card.mastery().value() as usize] += 1;
    }
    let total_reviews = coll.db.review_count()?;
    let correct = coll.db.correct_review_count()?;
    let accuracy = if total_reviews == 0 {
        0
    } else {
        (correct as f64 * 100.0 / total_reviews as f64).round() as u32
    };
    Ok(Stats {
        total_cards: cards.len(),
        due_cards: cards.iter().filter(|card| card.is_due(now)).count(),
        cards_by_mastery,
        total_reviews,
        total_sessions: coll.db.session_count()?,
        accuracy,
    })
}

impl Stats {
    fn to_text(&self) -> String {
        let mut out = String::new();
        out.push_str(&format!("Cards: {}\n", self.total_cards));
        out.push_str(&format!("Due now: {}\n", self.due_cards));
        for (level, count) in MasteryLevel::all().zip(&self.cards_by_mastery) {
            out.push_str(&format!("  {level} {:<10} {count}\n", level.label()));
        }
        out.push_str(&format!("Reviews: {}\n", self.total_reviews));
        out.push_str(&format!("Sessions: {}\n", self.total_sessions));
        out.push_str(&format!("Accuracy: {}%\n", self.accuracy));
        out
    }
}
