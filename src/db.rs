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

use rusqlite::Connection;
use rusqlite::Row;
use rusqlite::Transaction;
use rusqlite::config::DbConfig;

use crate::error::Fallible;
use crate::error::fail;
use crate::session::SessionReport;
use crate::session::SessionStats;
use crate::types::card::Card;
use crate::types::card::CardContent;
use crate::types::card_id::CardId;
use crate::types::mastery::MasteryLevel;
use crate::types::outcome::Outcome;
use crate::types::performance::Performance;
use crate::types::review::Review;
use crate::types::timestamp::Timestamp;

pub struct Database {
    conn: Connection,
}

/// A saved session, as read back from the database.
pub struct SessionRecord {
    pub started_at: Timestamp,
    pub ended_at: Timestamp,
    pub stats: SessionStats,
    pub reviews: Vec<ReviewRecord>,
}

/// A saved review, as read back from the database.
pub struct ReviewRecord {
    pub card_id: CardId,
    pub reviewed_at: Timestamp,
    pub outcome: Outcome,
    pub mastery_before: MasteryLevel,
    pub mastery_after: MasteryLevel,
    pub next_review: Option<Timestamp>,
}

const CARD_COLUMNS: &str = "card_id, deck_name, question, answer, difficulty, tags, created_at, mastery_level, review_count, last_reviewed_at, next_review";

impl Database {
    pub fn new(database_path: &str) -> Fallible<Self> {
        let mut conn = Connection::open(database_path)?;
        conn.set_db_config(DbConfig::SQLITE_DBCONFIG_ENABLE_FKEY, true)?;
        {
            let tx = conn.transaction()?;
            if !schema_exists(&tx)? {
                log::debug!("Creating database schema.");
                tx.execute_batch(include_str!("schema.sql"))?;
                tx.commit()?;
            }
        }
        Ok(Self { conn })
    }

    /// Insert a new card in the database.
    ///
    /// If a card with the same ID exists, returns an error.
    pub fn insert_card(&self, card: &Card) -> Fallible<()> {
        if self.card_exists(card.id())? {
            return fail(format!("card already exists: {}", card.id()));
        }
        log::debug!("Adding new card: {}", card.id());
        let perf = card.performance();
        let tags = serde_json::to_string(card.tags())?;
        let sql = format!(
            "insert into cards ({CARD_COLUMNS}) values (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?);"
        );
        self.conn.execute(
            &sql,
            (
                card.id(),
                card.deck_name(),
                &card.content().question,
                &card.content().answer,
                card.difficulty(),
                tags,
                card.created_at(),
                perf.mastery,
                perf.review_count,
                perf.last_reviewed_at,
                perf.next_review,
            ),
        )?;
        Ok(())
    }

    pub fn card_exists(&self, card_id: CardId) -> Fallible<bool> {
        let sql = "select count(*) from cards where card_id = ?;";
        let count: i64 = self.conn.query_row(sql, [card_id], |row| row.get(0))?;
        Ok(count > 0)
    }

    /// Get a card by ID. Returns `None` if there is no such card.
    pub fn get_card(&self, card_id: CardId) -> Fallible<Option<Card>> {
        let sql = format!("select {CARD_COLUMNS} from cards where card_id = ?;");
        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query([card_id])?;
        match rows.next()? {
            Some(row) => Ok(Some(read_card(row)?)),
            None => Ok(None),
        }
    }

    /// Return every card, oldest first.
    pub fn all_cards(&self) -> Fallible<Vec<Card>> {
        let sql = format!("select {CARD_COLUMNS} from cards order by created_at, card_id;");
        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query([])?;
        let mut cards = Vec::new();
        while let Some(row) = rows.next()? {
            cards.push(read_card(row)?);
        }
        Ok(cards)
    }

    /// Return the set of all card IDs in the database.
    pub fn card_ids(&self) -> Fallible<HashSet<CardId>> {
        let mut ids = HashSet::new();
        let mut stmt = self.conn.prepare("select card_id from cards;")?;
        let mut rows = stmt.query([])?;
        while let Some(row) = rows.next()? {
            let id: CardId = row.get(0)?;
            ids.insert(id);
        }
        Ok(ids)
    }

    /// Resolve a full card ID, or a unique prefix of one, as printed by
    /// `list`.
    pub fn resolve_card_id(&self, prefix: &str) -> Fallible<CardId> {
        let prefix = prefix.to_ascii_lowercase();
        if prefix.is_empty() || !prefix.chars().all(|c| c.is_ascii_hexdigit()) {
            return fail(format!("invalid card id: {prefix}"));
        }
        let matches: Vec<CardId> = self
            .card_ids()?
            .into_iter()
            .filter(|id| id.to_hex().starts_with(&prefix))
            .collect();
        match matches.as_slice() {
            [id] => Ok(*id),
            [] => fail(format!("no card with id {prefix}")),
            _ => fail(format!("ambiguous card id: {prefix}")),
        }
    }

    /// Delete a card and its review history.
    ///
    /// If no card with the given ID exists, returns an error.
    pub fn delete_card(&self, card_id: CardId) -> Fallible<()> {
        let deleted = self
            .conn
            .execute("delete from cards where card_id = ?;", [card_id])?;
        if deleted == 0 {
            return fail(format!("no card with id {card_id}"));
        }
        log::debug!("Deleted card: {card_id}");
        Ok(())
    }

    /// Overwrite a card's performance information.
    ///
    /// If no card with the given ID exists, returns an error.
    pub fn update_performance(&self, card_id: CardId, performance: &Performance) -> Fallible<()> {
        let updated = update_performance(&self.conn, card_id, performance)?;
        if updated == 0 {
            return fail(format!("no card with id {card_id}"));
        }
        Ok(())
    }

    /// Save a session: the session row, every review in it, and the new
    /// performance of every reviewed card, in one transaction.
    pub fn save_session(
        &mut self,
        started_at: Timestamp,
        ended_at: Timestamp,
        report: &SessionReport,
    ) -> Fallible<()> {
        let tx = self.conn.transaction()?;
        let session_id = insert_session(&tx, started_at, ended_at, &report.stats)?;
        for review in &report.reviews {
            insert_review(&tx, session_id, review)?;
            if update_performance(&tx, review.card_id, &review.performance)? == 0 {
                return fail(format!("no card with id {}", review.card_id));
            }
        }
        tx.commit()?;
        log::debug!(
            "Saved session {session_id} with {} reviews.",
            report.reviews.len()
        );
        Ok(())
    }

    /// Every saved session with its reviews, oldest first.
    pub fn sessions(&self) -> Fallible<Vec<SessionRecord>> {
        let mut sessions = Vec::new();
        let mut stmt = self.conn.prepare(
            "select session_id, started_at, ended_at, reviewed, correct, streak from sessions order by started_at;",
        )?;
        let mut rows = stmt.query([])?;
        while let Some(row) = rows.next()? {
            let session_id: SessionId = row.get(0)?;
            sessions.push(SessionRecord {
                started_at: row.get(1)?,
                ended_at: row.get(2)?,
                stats: SessionStats {
                    reviewed: row.get(3)?,
                    correct: row.get(4)?,
                    streak: row.get(5)?,
                },
                reviews: self.session_reviews(session_id)?,
            });
        }
        Ok(sessions)
    }

    fn session_reviews(&self, session_id: SessionId) -> Fallible<Vec<ReviewRecord>> {
        let mut reviews = Vec::new();
        let mut stmt = self.conn.prepare(
            "select card_id, reviewed_at, outcome, mastery_before, mastery_after, next_review from reviews where session_id = ? order by review_id;",
        )?;
        let mut rows = stmt.query([session_id])?;
        while let Some(row) = rows.next()? {
            reviews.push(ReviewRecord {
                card_id: row.get(0)?,
                reviewed_at: row.get(1)?,
                outcome: row.get(2)?,
                mastery_before: row.get(3)?,
                mastery_after: row.get(4)?,
                next_review: row.get(5)?,
            });
        }
        Ok(reviews)
    }

    pub fn card_count(&self) -> Fallible<usize> {
        self.count("select count(*) from cards;")
    }

    pub fn session_count(&self) -> Fallible<usize> {
        self.count("select count(*) from sessions;")
    }

    pub fn review_count(&self) -> Fallible<usize> {
        self.count("select count(*) from reviews;")
    }

    pub fn correct_review_count(&self) -> Fallible<usize> {
        self.count("select count(*) from reviews where outcome = 'correct';")
    }

    fn count(&self, sql: &str) -> Fallible<usize> {
        let count: i64 = self.conn.query_row(sql, [], |row| row.get(0))?;
        Ok(count as usize)
    }
}

fn read_card(row: &Row<'_>) -> Fallible<Card> {
    let tags: String = row.get(5)?;
    let tags: Vec<String> = serde_json::from_str(&tags)?;
    let performance = Performance {
        mastery: row.get(7)?,
        review_count: row.get(8)?,
        last_reviewed_at: row.get(9)?,
        next_review: row.get(10)?,
    };
    Ok(Card::from_parts(
        row.get(0)?,
        row.get(1)?,
        CardContent {
            question: row.get(2)?,
            answer: row.get(3)?,
        },
        row.get(4)?,
        tags,
        row.get(6)?,
        performance,
    ))
}

fn update_performance(
    conn: &Connection,
    card_id: CardId,
    performance: &Performance,
) -> Fallible<usize> {
    let sql = "update cards set mastery_level = ?, review_count = ?, last_reviewed_at = ?, next_review = ? where card_id = ?;";
    let updated = conn.execute(
        sql,
        (
            performance.mastery,
            performance.review_count,
            performance.last_reviewed_at,
            performance.next_review,
            card_id,
        ),
    )?;
    Ok(updated)
}

type SessionId = i64;

fn insert_session(
    tx: &Transaction,
    started_at: Timestamp,
    ended_at: Timestamp,
    stats: &SessionStats,
) -> Fallible<SessionId> {
    let sql = "insert into sessions (started_at, ended_at, reviewed, correct, streak) values (?, ?, ?, ?, ?) returning session_id;";
    let session_id: SessionId = tx.query_row(
        sql,
        (
            started_at,
            ended_at,
            stats.reviewed,
            stats.correct,
            stats.streak,
        ),
        |row| row.get(0),
    )?;
    Ok(session_id)
}

type ReviewId = i64;

fn insert_review(tx: &Transaction, session_id: SessionId, review: &Review) -> Fallible<ReviewId> {
    let sql = "insert into reviews (session_id, card_id, reviewed_at, outcome, mastery_before, mastery_after, next_review) values (?, ?, ?, ?, ?, ?, ?) returning review_id;";
    let review_id: ReviewId = tx.query_row(
        sql,
        (
            session_id,
            review.card_id,
            review.reviewed_at,
            review.outcome,
            review.mastery_before,
            review.mastery_after(),
            review.next_review(),
        ),
        |row| row.get(0),
    )?;
    Ok(review_id)
}

fn schema_exists(tx: &Transaction) -> Fallible<bool> {
    let sql = "select count(*) from sqlite_master where type='table' AND name=?;";
    let count: i64 = tx.query_row(sql, ["cards"], |row| row.get(0))?;
    Ok(count > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::run_session;
    use crate::types::difficulty::Difficulty;

    fn now() -> Timestamp {
        Timestamp::parse("2025-01-01T00:00:00Z").unwrap()
    }

    fn make_card(question: &str) -> Card {
        Card::new(
            "Physics",
            CardContent::new(question, "answer"),
            Difficulty::Hard,
            vec!["mechanics".to_string(), "exam".to_string()],
            now(),
        )
    }

    #[test]
    fn test_schema_is_created_once() -> Fallible<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("test.db");
        let path = path.to_str().unwrap();
        let db = Database::new(path)?;
        db.insert_card(&make_card("Q"))?;
        drop(db);
        let db = Database::new(path)?;
        assert_eq!(db.card_count()?, 1);
        Ok(())
    }

    #[test]
    fn test_insert_and_get() -> Fallible<()> {
        let db = Database::new(":memory:")?;
        let card = make_card("What is inertia?");
        db.insert_card(&card)?;
        assert_eq!(db.get_card(card.id())?, Some(card.clone()));
        assert!(db.card_exists(card.id())?);
        assert_eq!(db.card_ids()?, HashSet::from([card.id()]));
        assert_eq!(db.all_cards()?, vec![card]);
        Ok(())
    }

    #[test]
    fn test_duplicate_insert_fails() -> Fallible<()> {
        let db = Database::new(":memory:")?;
        let card = make_card("Q");
        db.insert_card(&card)?;
        let err = db.insert_card(&card).unwrap_err();
        assert_eq!(err.message(), format!("card already exists: {}", card.id()));
        Ok(())
    }

    #[test]
    fn test_get_missing() -> Fallible<()> {
        let db = Database::new(":memory:")?;
        assert_eq!(db.get_card(make_card("Q").id())?, None);
        Ok(())
    }

    #[test]
    fn test_update_performance() -> Fallible<()> {
        let db = Database::new(":memory:")?;
        let card = make_card("Q");
        db.insert_card(&card)?;
        let perf = card
            .performance()
            .update(Outcome::Correct, now().plus_days(1));
        db.update_performance(card.id(), &perf)?;
        let loaded = db.get_card(card.id())?.unwrap();
        assert_eq!(loaded.performance(), &perf);
        assert!(db.update_performance(make_card("other").id(), &perf).is_err());
        Ok(())
    }

    #[test]
    fn test_delete() -> Fallible<()> {
        let db = Database::new(":memory:")?;
        let card = make_card("Q");
        db.insert_card(&card)?;
        db.delete_card(card.id())?;
        assert_eq!(db.card_count()?, 0);
        assert!(db.delete_card(card.id()).is_err());
        Ok(())
    }

    #[test]
    fn test_save_session() -> Fallible<()> {
        let mut db = Database::new(":memory:")?;
        let a = make_card("A");
        let b = make_card("B");
        db.insert_card(&a)?;
        db.insert_card(&b)?;
        let cards = db.all_cards()?;
        let mut outcomes = vec![Outcome::Correct, Outcome::Incorrect].into_iter();
        let report = run_session(&cards, None, now, |_, _| Ok(outcomes.next()))?;
        db.save_session(now(), now(), &report)?;

        assert_eq!(db.session_count()?, 1);
        assert_eq!(db.review_count()?, 2);
        assert_eq!(db.correct_review_count()?, 1);
        for review in &report.reviews {
            let card = db.get_card(review.card_id)?.unwrap();
            assert_eq!(card.performance(), &review.performance);
            assert_eq!(card.performance().review_count, 1);
        }

        let sessions = db.sessions()?;
        assert_eq!(sessions.len(), 1);
        assert_eq!(sessions[0].stats, report.stats);
        assert_eq!(sessions[0].reviews.len(), 2);
        assert_eq!(sessions[0].reviews[0].card_id, report.reviews[0].card_id);
        assert_eq!(sessions[0].reviews[1].outcome, Outcome::Incorrect);
        Ok(())
    }

    #[test]
    fn test_delete_cascades_to_reviews() -> Fallible<()> {
        let mut db = Database::new(":memory:")?;
        let card = make_card("Q");
        db.insert_card(&card)?;
        let report = run_session(&[card.clone()], None, now, |_, _| Ok(Some(Outcome::Correct)))?;
        db.save_session(now(), now(), &report)?;
        assert_eq!(db.review_count()?, 1);
        db.delete_card(card.id())?;
        assert_eq!(db.review_count()?, 0);
        Ok(())
    }

    #[test]
    fn test_corrupt_timestamp_is_rejected() -> Fallible<()> {
        let db = Database::new(":memory:")?;
        let card = make_card("Q");
        db.insert_card(&card)?;
        db.conn.execute(
            "update cards set next_review = 'not a date' where card_id = ?;",
            [card.id()],
        )?;
        assert!(db.get_card(card.id()).is_err());
        Ok(())
    }

    #[test]
    fn test_all_cards_in_creation_order() -> Fallible<()> {
        let db = Database::new(":memory:")?;
        let first = Timestamp::parse("2025-01-01T00:00:00.12Z")?;
        let second = Timestamp::parse("2025-01-01T00:00:00.120001Z")?;
        for (question, created_at) in [("second", second), ("first", first)] {
            let card = Card::new(
                "Deck",
                CardContent::new(question, "answer"),
                Difficulty::Medium,
                Vec::new(),
                created_at,
            );
            db.insert_card(&card)?;
        }
        let questions: Vec<String> = db
            .all_cards()?
            .iter()
            .map(|c| c.content().question.clone())
            .collect();
        assert_eq!(questions, vec!["first", "second"]);
        Ok(())
    }

    #[test]
    fn test_resolve_card_id() -> Fallible<()> {
        let db = Database::new(":memory:")?;
        let card = make_card("Q");
        db.insert_card(&card)?;
        assert_eq!(db.resolve_card_id(&card.id().to_hex())?, card.id());
        assert_eq!(db.resolve_card_id(&card.id().short())?, card.id());
        assert_eq!(
            db.resolve_card_id(&card.id().short().to_uppercase())?,
            card.id()
        );
        assert_eq!(
            db.resolve_card_id("xyz").unwrap_err().message(),
            "invalid card id: xyz"
        );
        assert!(db.resolve_card_id("").is_err());
        Ok(())
    }

    #[test]
    fn test_resolve_ambiguous_and_missing_prefix() -> Fallible<()> {
        let db = Database::new(":memory:")?;
        let mut cards = Vec::new();
        for i in 0..40 {
            let card = make_card(&format!("Q{i}"));
            db.insert_card(&card)?;
            cards.push(card);
        }
        // 40 ids over 16 leading digits: some digit is shared.
        let first_digits: Vec<char> = cards
            .iter()
            .filter_map(|c| c.id().to_hex().chars().next())
            .collect();
        let shared = first_digits
            .iter()
            .find(|d| first_digits.iter().filter(|e| e == d).count() > 1)
            .unwrap();
        let err = db.resolve_card_id(&shared.to_string()).unwrap_err();
        assert_eq!(err.message(), format!("ambiguous card id: {shared}"));

        let absent = "0123456789abcdef"
            .chars()
            .map(|d| format!("{d}{d}{d}{d}{d}{d}{d}{d}{d}{d}"))
            .find(|p| !cards.iter().any(|c| c.id().to_hex().starts_with(p.as_str())))
            .unwrap();
        let err = db.resolve_card_id(&absent).unwrap_err();
        assert_eq!(err.message(), format!("no card with id {absent}"));
        Ok(())
    }
}
