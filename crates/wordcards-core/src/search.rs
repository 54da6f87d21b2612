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

use crate::types::difficulty::Difficulty;
use crate::types::item::LearningItem;

/// Narrows a collection down for display.
#[derive(Clone, Debug, Default)]
pub struct ItemFilter {
    /// Case-insensitive substring matched against the prompt and the answer.
    pub query: Option<String>,
    pub difficulty: Option<Difficulty>,
}

impl ItemFilter {
    pub fn matches(&self, item: &LearningItem) -> bool {
        let matches_query = match &self.query {
            None => true,
            Some(query) => {
                let query = query.to_lowercase();
                item.prompt().to_lowercase().contains(&query)
                    || item.answer().to_lowercase().contains(&query)
            }
        };
        let matches_difficulty = match self.difficulty {
            None => true,
            Some(difficulty) => item.difficulty() == difficulty,
        };
        matches_query && matches_difficulty
    }

    /// The matching items, in their original order.
    pub fn apply<'a>(&self, items: &'a [LearningItem]) -> Vec<&'a LearningItem> {
        items.iter().filter(|item| self.matches(item)).collect()
    }
}
