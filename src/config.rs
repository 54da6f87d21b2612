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

use std::fs::read_to_string;
use std::path::Path;

use serde::Deserialize;
use wordcards_core::SESSION_SIZE;
use wordcards_core::error::ErrorReport;
use wordcards_core::error::Fallible;
use wordcards_core::error::fail;

/// The name of the optional config file in the collection directory.
pub const CONFIG_FILE: &str = "wordcards.toml";

const DEFAULT_DATABASE: &str = "wordcards.db";

/// Settings read from `wordcards.toml`. Every key is optional.
#[derive(Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Maximum number of items per drill session.
    pub session_size: usize,
    /// Database file name, relative to the collection directory.
    pub database: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            session_size: SESSION_SIZE,
            database: DEFAULT_DATABASE.to_string(),
        }
    }
}

impl Config {
    pub fn parse(text: &str) -> Fallible<Self> {
        let config: Config = toml::from_str(text)
            .map_err(|e| ErrorReport::new(format!("Failed to parse {CONFIG_FILE}: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Load the config from a collection directory, falling back to the
    /// defaults when there is no config file.
    pub fn load(directory: &Path) -> Fallible<Self> {
        let path = directory.join(CONFIG_FILE);
        if !path.exists() {
            log::debug!("No {CONFIG_FILE}, using defaults");
            return Ok(Config::default());
        }
        Config::parse(&read_to_string(path)?)
    }

    fn validate(&self) -> Fallible<()> {
        if self.session_size == 0 {
            return fail("session_size must be at least 1");
        }
        if self.database.trim().is_empty() {
            return fail("database must not be empty");
        }
        Ok(())
    }
}
