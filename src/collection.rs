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

use std::env::current_dir;
use std::path::PathBuf;

use wordcards_core::ItemId;
use wordcards_core::ItemStore;
use wordcards_core::error::Fallible;
use wordcards_core::error::fail;

use crate::config::Config;
use crate::db::Database;

/// A collection directory: its config and its database.
pub struct Collection {
    pub config: Config,
    pub db: Database,
}

impl Collection {
    /// Open the collection in `directory`, or the current directory if none
    /// is given.
    pub fn new(directory: Option<String>) -> Fallible<Self> {
        let directory: PathBuf = match directory {
            Some(dir) => PathBuf::from(dir),
            None => current_dir()?,
        };
        if !directory.exists() {
            return fail("directory does not exist.");
        }
        let directory = directory.canonicalize()?;
        let config = Config::load(&directory)?;
        let db = Database::open(&directory.join(&config.database))?;
        Ok(Self { config, db })
    }

    /// Find the item whose id starts with `prefix`. The prefix must match
    /// exactly one item.
    pub fn resolve_id(&self, prefix: &str) -> Fallible<ItemId> {
        let prefix = prefix.trim().to_lowercase();
        if prefix.is_empty() {
            return fail("item id must not be empty");
        }
        let matches: Vec<ItemId> = self
            .db
            .list()?
            .iter()
            .map(|item| item.id())
            .filter(|id| id.to_hex().starts_with(&prefix))
            .collect();
        match matches.as_slice() {
            [id] => Ok(*id),
            [] => fail(format!("no item with id '{prefix}'")),
            _ => fail(format!(
                "'{prefix}' matches {} items, use more characters",
                matches.len()
            )),
        }
    }
}
