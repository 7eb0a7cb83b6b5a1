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


use std::io::BufRead;
use std::io::Write;
use std::io::stdin;
use std::io::stdout;

use crate::collection::Collection;
use crate::error::ErrorReport;
use crate::error::Fallible;
use crate::selector::select_due_cards;
use crate::session::SessionStats;
use crate::session::run_session;
use crate::types::card::Card;
use crate::types::outcome::Outcome;
use crate::types::timestamp::Timestamp;

pub fn review(directory: Option<String>, limit: Option<usize>) -> Fallible<()> {
    let mut coll = Collection::new(directory)?;
    let limit = limit.unwrap_or(coll.config.session_limit);
    let mut input = stdin().lock();
    let mut output = stdout();
    review_cards(&mut coll, limit, &mut input, &mut output, Timestamp::now)?;
    Ok(())
}

/// Review due cards interactively, reading answers from `input`. The session
/// is saved if at least one card was reviewed.
pub fn review_cards<R, W, C>(
    coll: &mut Collection,
    limit: usize,
    input: &mut R,
    output: &mut W,
    clock: C,
) -> Fallible<SessionStats>
where
    R: BufRead,
    W: Write,
    C: Fn() -> Timestamp,
{
    let cards = coll.cards()?;
    let started_at = clock();
    let total = select_due_cards(&cards, started_at).len().min(limit);
    if total == 0 {
        writeln!(output, "No cards due.")?;
        return Ok(SessionStats::default());
    }

    // A failed prompt ends the session like quitting: scored outcomes are
    // still saved.
    let mut failure: Option<ErrorReport> = None;
    let report = run_session(&cards, Some(limit), &clock, |card, stats| {
        match present(card, stats, total, input, output) {
            Ok(outcome) => Ok(outcome),
            Err(e) => {
                failure = Some(e);
                Ok(None)
            }
        }
    })?;
    let stats = report.stats;

    if !report.reviews.is_empty() {
        coll.db.save_session(started_at, clock(), &report)?;
    }
    if let Some(e) = failure {
        return Err(e);
    }

    writeln!(output)?;
    writeln!(output, "Reviewed: {}", stats.reviewed)?;
    writeln!(output, "Accuracy: {}%", stats.accuracy())?;
    writeln!(output, "Streak: {}", stats.streak)?;
    Ok(stats)
}

fn present<R: BufRead, W: Write>(
    card: &Card,
    stats: &SessionStats,
    total: usize,
    input: &mut R,
    output: &mut W,
) -> Fallible<Option<Outcome>> {
    writeln!(output)?;
    writeln!(
        output,
        "[{}/{}] {} (streak {})",
        stats.reviewed + 1,
        total,
        card.deck_name(),
        stats.streak
    )?;
    writeln!(output, "Q: {}", card.content().question)?;
    write!(output, "Press Enter to show the answer.")?;
    output.flush()?;
    if read_line(input)?.is_none() {
        return Ok(None);
    }
    writeln!(output, "A: {}", card.content().answer)?;
    loop {
        write!(output, "Correct? [y/n/q] ")?;
        output.flush()?;
        let Some(line) = read_line(input)? else {
            return Ok(None);
        };
        match line.to_lowercase().as_str() {
            "y" | "yes" => return Ok(Some(Outcome::Correct)),
            "n" | "no" => return Ok(Some(Outcome::Incorrect)),
            "q" | "quit" => return Ok(None),
            _ => continue,
        }
    }
}

/// Read a trimmed line, or `None` at end of input.
fn read_line<R: BufRead>(input: &mut R) -> Fallible<Option<String>> {
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}
