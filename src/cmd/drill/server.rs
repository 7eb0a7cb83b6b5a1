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
use std::time::Duration;

use axum::Router;
use axum::http::HeaderName;
use axum::http::StatusCode;
use axum::http::header::CACHE_CONTROL;
use axum::http::header::CONTENT_TYPE;
use axum::response::Html;
use axum::routing::get;
use axum::routing::post;
use tokio::net::TcpListener;
use tokio::net::TcpStream;
use tokio::signal;
use tokio::time::sleep;

use crate::cmd::drill::get::get_handler;
use crate::cmd::drill::post::post_handler;
use crate::cmd::drill::state::MutableState;
use crate::cmd::drill::state::ServerState;
use crate::collection::Collection;
use crate::error::Fallible;
use crate::session::ReviewSession;
use crate::types::timestamp::Timestamp;

/// Command-line overrides for the drill. Unset values come from the
/// collection's configuration.
#[derive(Clone, Copy, Default)]
pub struct DrillOptions {
    pub port: Option<u16>,
    pub no_open: bool,
    pub limit: Option<usize>,
}

pub async fn start_server(directory: Option<String>, options: DrillOptions) -> Fallible<()> {
    let coll = Collection::new(directory)?;
    let port = options.port.unwrap_or(coll.config.port);
    let open_browser = coll.config.open_browser && !options.no_open;
    let limit = options.limit.unwrap_or(coll.config.session_limit);

    let cards = coll.cards()?;
    let session_started_at = Timestamp::now();
    let session = ReviewSession::start(&cards, session_started_at, Some(limit));
    if session.is_finished() {
        println!("No cards due.");
        return Ok(());
    }

    let state = ServerState {
        total_cards: session.total(),
        session_started_at,
        mutable: Arc::new(Mutex::new(MutableState {
            reveal: false,
            db: coll.db,
            session,
            finished_at: None,
        })),
    };
    let bind = format!("127.0.0.1:{port}");

    if open_browser {
        // Start a separate task to open the browser.
        let url = format!("http://{bind}/");
        let addr = bind.clone();
        tokio::spawn(async move {
            loop {
                if let Ok(stream) = TcpStream::connect(addr.as_str()).await {
                    drop(stream);
                    break;
                }
                sleep(Duration::from_millis(1)).await;
            }
            if let Err(e) = open::that(&url) {
                log::error!("failed to open {url}: {e}");
            }
        });
    }

    // Start the server.
    log::debug!("Starting server on {bind}");
    let listener = TcpListener::bind(bind.as_str()).await?;
    serve(listener, state, shutdown_signal()).await
}

/// Serve the drill until `shutdown` resolves, then save the session if it
/// was not already ended.
pub(crate) async fn serve<F>(listener: TcpListener, state: ServerState, shutdown: F) -> Fallible<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let app = Router::new();
    let app = app.route("/", get(get_handler));
    let app = app.route("/", post(post_handler));
    let app = app.route("/script.js", get(script));
    let app = app.route("/style.css", get(stylesheet));
    let app = app.fallback(not_found_handler);
    let app = app.with_state(state.clone());
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await?;
    state.lock().finish(state.session_started_at)?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = signal::ctrl_c().await {
        log::error!("failed to listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
    log::debug!("Shutting down.");
}

async fn script() -> (StatusCode, [(HeaderName, &'static str); 1], &'static str) {
    (
        StatusCode::OK,
        [(CONTENT_TYPE, "text/javascript")],
        include_str!("script.js"),
    )
}

async fn stylesheet() -> (StatusCode, [(HeaderName, &'static str); 2], &'static [u8]) {
    let bytes = include_bytes!("style.css");
    (
        StatusCode::OK,
        [
            (CONTENT_TYPE, "text/css"),
            (CACHE_CONTROL, "public, max-age=604800, immutable"),
        ],
        bytes,
    )
}

async fn not_found_handler() -> (StatusCode, Html<String>) {
    (StatusCode::NOT_FOUND, Html("Not Found".to_string()))
}
