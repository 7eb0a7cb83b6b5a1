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


use std::collections::HashSet;
use std::fs::read_to_string;
use std::path::Path;
use std::path::PathBuf;

use serde::Deserialize;
use walkdir::WalkDir;

use crate::collection::Collection;
use crate::config::CONFIG_FILE;
use crate::error::ErrorReport;
use crate::error::Fallible;
use crate::error::fail;
use crate::types::card::Card;
use crate::types::card::CardContent;
use crate::types::card_id::CardId;
use crate::types::difficulty::Difficulty;
use crate::types::timestamp::Timestamp;

/// A deck file on disk.
#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct DeckFile {
    /// Defaults to the file stem.
    name: Option<String>,
    #[serde(default)]
    cards: Vec<DeckCard>,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct DeckCard {
    question: String,
    answer: String,
    #[serde(default)]
    difficulty: Difficulty,
    #[serde(default)]
    tags: Vec<String>,
}

#[derive(Debug, Default, PartialEq, Eq)]
pub struct ImportSummary {
    pub added: usize,
    pub skipped: usize,
}

pub fn import_decks(directory: Option<String>, path: &Path) -> Fallible<()> {
    let coll = Collection::new(directory)?;
    let summary = import_path(&coll, path, Timestamp::now())?;
    println!(
        "Imported {} cards ({} already present).",
        summary.added, summary.skipped
    );
    Ok(())
}

/// Import a deck file, or every deck file under a directory.
pub fn import_path(coll: &Collection, path: &Path, now: Timestamp) -> Fallible<ImportSummary> {
    // Parse everything first, so a bad file leaves the database untouched.
    let mut cards: Vec<Card> = Vec::new();
    for file in deck_files(path)? {
        log::debug!("Parsing {}", file.display());
        cards.extend(parse_deck_file(&file, now)?);
    }
    let mut known: HashSet<CardId> = coll.db.card_ids()?;
    let mut summary = ImportSummary::default();
    for card in cards {
        if known.insert(card.id()) {
            coll.db.insert_card(&card)?;
            summary.added += 1;
        } else {
            summary.skipped += 1;
        }
    }
    Ok(summary)
}

fn deck_files(path: &Path) -> Fallible<Vec<PathBuf>> {
    if !path.exists() {
        return fail(format!("no such file or directory: {}", path.display()));
    }
    if path.is_file() {
        return Ok(vec![path.to_path_buf()]);
    }
    let mut files = Vec::new();
    for entry in WalkDir::new(path).sort_by_file_name() {
        let entry = entry?;
        let path = entry.path();
        let is_deck = entry.file_type().is_file()
            && path.extension().is_some_and(|ext| ext == "toml")
            && path.file_name().is_some_and(|name| name != CONFIG_FILE);
        if is_deck {
            files.push(path.to_path_buf());
        }
    }
    Ok(files)
}

fn parse_deck_file(path: &Path, now: Timestamp) -> Fallible<Vec<Card>> {
    let content = read_to_string(path)?;
    let deck: DeckFile = toml::from_str(&content)
        .map_err(|e| ErrorReport::new(format!("{}: {e}", path.display())))?;
    let name = match deck.name {
        Some(name) => name,
        None => path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_default(),
    };
    let mut cards = Vec::new();
    for card in deck.cards {
        let content = CardContent::new(card.question, card.answer);
        if content.question.is_empty() || content.answer.is_empty() {
            return fail(format!(
                "{}: question and answer must not be empty.",
                path.display()
            ));
        }
        cards.push(Card::new(&name, content, card.difficulty, card.tags, now));
    }
    Ok(cards)
}
