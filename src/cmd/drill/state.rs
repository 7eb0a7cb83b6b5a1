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


use std::sync::Arc;
use std::sync::Mutex;
use std::sync::MutexGuard;
use std::sync::PoisonError;

use crate::db::Database;
use crate::error::Fallible;
use crate::session::ReviewSession;
use crate::session::SessionReport;
use crate::types::timestamp::Timestamp;

#[derive(Clone)]
pub struct ServerState {
    pub total_cards: usize,
    pub session_started_at: Timestamp,
    pub mutable: Arc<Mutex<MutableState>>,
}

pub struct MutableState {
    pub reveal: bool,
    pub db: Database,
    pub session: ReviewSession,
    pub finished_at: Option<Timestamp>,
}

impl ServerState {
    pub fn lock(&self) -> MutexGuard<'_, MutableState> {
        self.mutable.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl MutableState {
    /// End the session and save whatever was reviewed. Idempotent.
    pub fn finish(&mut self, started_at: Timestamp) -> Fallible<()> {
        if self.finished_at.is_some() {
            return Ok(());
        }
        let ended_at = Timestamp::now();
        let report = SessionReport {
            stats: self.session.stats(),
            reviews: self.session.reviews().to_vec(),
        };
        if !report.reviews.is_empty() {
            self.db.save_session(started_at, ended_at, &report)?;
        }
        log::debug!("Session completed.");
        self.reveal = false;
        self.finished_at = Some(ended_at);
        Ok(())
    }
}
