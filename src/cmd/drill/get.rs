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


use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Html;
use maud::Markup;
use maud::html;

use crate::cmd::drill::state::MutableState;
use crate::cmd::drill::state::ServerState;
use crate::cmd::drill::template::page_template;
use crate::session::SessionState;

pub async fn get_handler(State(state): State<ServerState>) -> (StatusCode, Html<String>) {
    let mutable = state.lock();
    let body = match (mutable.finished_at, mutable.session.state()) {
        (None, SessionState::Presenting(card)) => {
            let stats = mutable.session.stats();
            let progress = format!("{} / {}", stats.reviewed, state.total_cards);
            let answer = if mutable.reveal {
                card.html_back()
            } else {
                html! {}
            };
            html! {
                div.root {
                    div.card {
                        div.header {
                            h1 {
                                (card.deck_name())
                            }
                            div.progress {
                                (progress)
                            }
                            div.streak {
                                "Streak: " (stats.streak)
                            }
                        }
                        div.content {
                            div .question .rich-text {
                                (card.html_front())
                            }
                            div .answer .rich-text {
                                (answer)
                            }
                        }
                        div.controls {
                            (controls(mutable.reveal))
                        }
                    }
                }
            }
        }
        _ => completed(&mutable),
    };
    let html = page_template(body);
    (StatusCode::OK, Html(html.into_string()))
}

fn controls(reveal: bool) -> Markup {
    if reveal {
        html! {
            form action="/" method="post" {
                input id="incorrect" type="submit" name="action" value="Incorrect";
                input id="correct" type="submit" name="action" value="Correct";
                div.spacer {}
                input id="end" type="submit" name="action" value="End";
            }
        }
    } else {
        html! {
            form action="/" method="post" {
                input id="reveal" type="submit" name="action" value="Reveal";
                div.spacer {}
                input id="end" type="submit" name="action" value="End";
            }
        }
    }
}

fn completed(mutable: &MutableState) -> Markup {
    let stats = mutable.session.stats();
    html! {
        div.finished {
            h1 {
                "Session Completed"
            }
            dl.summary {
                dt { "Reviewed" }
                dd { (stats.reviewed) }
                dt { "Accuracy" }
                dd { (stats.accuracy()) "%" }
                dt { "Streak" }
                dd { (stats.streak) }
            }
        }
    }
}
