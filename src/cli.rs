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


use std::path::PathBuf;

use clap::Parser;
use clap::Subcommand;

use crate::cmd::OutputFormat;
use crate::cmd::add::NewCard;
use crate::cmd::add::add_card;
use crate::cmd::delete::delete_card;
use crate::cmd::drill::server::DrillOptions;
use crate::cmd::drill::server::start_server;
use crate::cmd::export::export_collection;
use crate::cmd::import::import_decks;
use crate::cmd::list::list_cards;
use crate::cmd::review::review;
use crate::cmd::stats::print_stats;
use crate::collection::Collection;
use crate::collection::DB_FILE;
use crate::error::Fallible;
use crate::types::difficulty::Difficulty;

#[derive(Parser)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Path to the collection directory. Defaults to the current directory.
    #[arg(long, short = 'C', global = true)]
    directory: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Create the card database.
    Init,
    /// Add a card.
    Add {
        question: String,
        answer: String,
        /// Deck the card belongs to.
        #[arg(long, default_value = "Default")]
        deck: String,
        #[arg(long, value_enum, default_value_t = Difficulty::Medium)]
        difficulty: Difficulty,
        /// A tag. May be repeated.
        #[arg(long = "tag")]
        tags: Vec<String>,
    },
    /// Delete a card and its review history.
    Delete {
        /// The card's ID.
        id: String,
    },
    /// List cards.
    List {
        /// Only list due cards, in review order.
        #[arg(long)]
        due: bool,
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
    /// Import TOML deck files.
    Import {
        /// A deck file, or a directory to search for deck files.
        path: PathBuf,
    },
    /// Review due cards in the terminal.
    Review {
        /// Maximum number of cards to review.
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Review due cards in the browser.
    Drill {
        /// Port to serve on.
        #[arg(long)]
        port: Option<u16>,
        /// Don't open the browser.
        #[arg(long)]
        no_open: bool,
        /// Maximum number of cards to review.
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Print collection statistics.
    Stats {
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
    /// Export cards and sessions as JSON.
    Export,
}

pub async fn entrypoint() -> Fallible<()> {
    let cli: Cli = Cli::parse();
    let directory = cli.directory;
    match cli.command {
        Command::Init => {
            let coll = Collection::new(directory)?;
            println!("Initialized {}.", coll.directory.join(DB_FILE).display());
            Ok(())
        }
        Command::Add {
            question,
            answer,
            deck,
            difficulty,
            tags,
        } => add_card(
            directory,
            NewCard {
                deck,
                question,
                answer,
                difficulty,
                tags,
            },
        ),
        Command::Delete { id } => delete_card(directory, &id),
        Command::List { due, format } => list_cards(directory, due, format),
        Command::Import { path } => import_decks(directory, &path),
        Command::Review { limit } => review(directory, limit),
        Command::Drill {
            port,
            no_open,
            limit,
        } => {
            start_server(
                directory,
                DrillOptions {
                    port,
                    no_open,
                    limit,
                },
            )
            .await
        }
        Command::Stats { format } => print_stats(directory, format),
        Command::Export => export_collection(directory),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_add() {
        let cli = Cli::try_parse_from([
            "studydeck",
            "-C",
            "/tmp",
            "add",
            "Q",
            "A",
            "--difficulty",
            "hard",
            "--tag",
            "x",
            "--tag",
            "y",
        ])
        .unwrap();
        assert_eq!(cli.directory.as_deref(), Some("/tmp"));
        match cli.command {
            Command::Add {
                deck,
                difficulty,
                tags,
                ..
            } => {
                assert_eq!(deck, "Default");
                assert_eq!(difficulty, Difficulty::Hard);
                assert_eq!(tags, vec!["x".to_string(), "y".to_string()]);
            }
            _ => panic!("expected add"),
        }
    }

    #[test]
    fn test_parse_drill() {
        let cli = Cli::try_parse_from(["studydeck", "drill", "--no-open", "--port", "9000"]).unwrap();
        match cli.command {
            Command::Drill {
                port,
                no_open,
                limit,
            } => {
                assert_eq!(port, Some(9000));
                assert!(no_open);
                assert_eq!(limit, None);
            }
            _ => panic!("expected drill"),
        }
    }
}
