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


use axum::Form;
use axum::extract::State;
use axum::response::Redirect;
use serde::Deserialize;

use crate::cmd::drill::state::ServerState;
use crate::error::Fallible;
use crate::types::outcome::Outcome;
use crate::types::timestamp::Timestamp;

#[derive(Debug, Deserialize)]
enum Action {
    Reveal,
    Correct,
    Incorrect,
    End,
}

impl Action {
    fn outcome(&self) -> Option<Outcome> {
        match self {
            Action::Correct => Some(Outcome::Correct),
            Action::Incorrect => Some(Outcome::Incorrect),
            Action::Reveal | Action::End => None,
        }
    }
}

#[derive(Deserialize)]
pub struct FormData {
    action: Action,
}

pub async fn post_handler(
    State(state): State<ServerState>,
    Form(form): Form<FormData>,
) -> Redirect {
    if let Err(e) = action_handler(&state, form.action) {
        log::error!("{e}");
    }
    Redirect::to("/")
}

fn action_handler(state: &ServerState, action: Action) -> Fallible<()> {
    let mut mutable = state.lock();
    if mutable.finished_at.is_some() {
        return Ok(());
    }
    match action {
        Action::Reveal => {
            mutable.reveal = true;
        }
        Action::End => {
            mutable.finish(state.session_started_at)?;
        }
        Action::Correct | Action::Incorrect => {
            if mutable.reveal {
                if let Some(outcome) = action.outcome() {
                    mutable.session.record(outcome, Timestamp::now())?;
                }
                mutable.reveal = false;
                if mutable.session.is_finished() {
                    mutable.finish(state.session_started_at)?;
                }
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_outcome() {
        assert_eq!(Action::Correct.outcome(), Some(Outcome::Correct));
        assert_eq!(Action::Incorrect.outcome(), Some(Outcome::Incorrect));
        assert_eq!(Action::Reveal.outcome(), None);
        assert_eq!(Action::End.outcome(), None);
    }
}
