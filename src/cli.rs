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

use clap::Parser;
use wordcards_core::Difficulty;
use wordcards_core::ItemEdit;
use wordcards_core::ItemFilter;
use wordcards_core::error::ErrorReport;
use wordcards_core::error::Fallible;

use crate::cmd::drill::drill_collection;
use crate::cmd::items::ListFormat;
use crate::cmd::items::add_item;
use crate::cmd::items::edit_item;
use crate::cmd::items::list_items;
use crate::cmd::items::remove_item;
use crate::cmd::stats::StatsFormat;
use crate::cmd::stats::print_stats;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
enum Command {
    /// Add a new word to the collection.
    Add {
        /// The word or phrase to learn.
        prompt: String,
        /// What it means.
        answer: String,
        /// A sentence using it.
        example: String,
        /// How quickly reviews should spread out: easy, medium or hard.
        #[arg(long, default_value = "medium", value_parser = parse_difficulty)]
        difficulty: Difficulty,
        /// Path to the collection directory. By default, the current working directory is used.
        #[arg(long)]
        directory: Option<String>,
    },
    /// Change a word. Review history is kept.
    Edit {
        /// The word's id, or a unique prefix of it.
        id: String,
        #[arg(long)]
        prompt: Option<String>,
        #[arg(long)]
        answer: Option<String>,
        #[arg(long)]
        example: Option<String>,
        #[arg(long, value_parser = parse_difficulty)]
        difficulty: Option<Difficulty>,
        /// Path to the collection directory. By default, the current working directory is used.
        #[arg(long)]
        directory: Option<String>,
    },
    /// Remove a word from the collection.
    Remove {
        /// The word's id, or a unique prefix of it.
        id: String,
        /// Path to the collection directory. By default, the current working directory is used.
        #[arg(long)]
        directory: Option<String>,
    },
    /// List the words in the collection.
    List {
        /// Only show words whose prompt or meaning contains this text.
        #[arg(long)]
        search: Option<String>,
        /// Only show words of this difficulty.
        #[arg(long, value_parser = parse_difficulty)]
        difficulty: Option<Difficulty>,
        /// Which output format to use.
        #[arg(long, default_value_t = ListFormat::Text)]
        format: ListFormat,
        /// Path to the collection directory. By default, the current working directory is used.
        #[arg(long)]
        directory: Option<String>,
    },
    /// Review the words that are due.
    Drill {
        /// Maximum number of words in a session. Overrides `session_size` in wordcards.toml.
        #[arg(long)]
        session_size: Option<usize>,
        /// Path to the collection directory. By default, the current working directory is used.
        #[arg(long)]
        directory: Option<String>,
    },
    /// Print collection statistics.
    Stats {
        /// Which output format to use.
        #[arg(long, default_value_t = StatsFormat::Text)]
        format: StatsFormat,
        /// Path to the collection directory. By default, the current working directory is used.
        #[arg(long)]
        directory: Option<String>,
    },
}

fn parse_difficulty(s: &str) -> Result<Difficulty, ErrorReport> {
    Difficulty::try_from(s.to_string())
}

pub fn entrypoint() -> Fallible<()> {
    let cli: Command = Command::parse();
    match cli {
        Command::Add {
            prompt,
            answer,
            example,
            difficulty,
            directory,
        } => add_item(directory, prompt, answer, example, difficulty),
        Command::Edit {
            id,
            prompt,
            answer,
            example,
            difficulty,
            directory,
        } => {
            let edit = ItemEdit {
                prompt,
                answer,
                example,
                difficulty,
            };
            edit_item(directory, id, edit)
        }
        Command::Remove { id, directory } => remove_item(directory, id),
        Command::List {
            search,
            difficulty,
            format,
            directory,
        } => {
            let filter = ItemFilter {
                query: search,
                difficulty,
            };
            list_items(directory, filter, format)
        }
        Command::Drill {
            session_size,
            directory,
        } => drill_collection(directory, session_size),
        Command::Stats { format, directory } => print_stats(directory, format),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_add() {
        let cmd = Command::try_parse_from([
            "wordcards",
            "add",
            "lucid",
            "clear",
            "A lucid essay.",
            "--difficulty",
            "hard",
        ])
        .unwrap();
        match cmd {
            Command::Add {
                prompt, difficulty, ..
            } => {
                assert_eq!(prompt, "lucid");
                assert_eq!(difficulty, Difficulty::Hard);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_add_defaults_to_medium() {
        let cmd = Command::try_parse_from(["wordcards", "add", "a", "b", "c"]).unwrap();
        assert!(matches!(
            cmd,
            Command::Add {
                difficulty: Difficulty::Medium,
                ..
            }
        ));
    }

    #[test]
    fn test_unknown_difficulty_is_rejected() {
        let result =
            Command::try_parse_from(["wordcards", "add", "a", "b", "c", "--difficulty", "brutal"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_list_filters() {
        let cmd = Command::try_parse_from([
            "wordcards",
            "list",
            "--search",
            "luc",
            "--difficulty",
            "easy",
            "--format",
            "json",
        ])
        .unwrap();
        assert!(matches!(
            cmd,
            Command::List {
                difficulty: Some(Difficulty::Easy),
                format: ListFormat::Json,
                ..
            }
        ));
    }
}
