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

use serde::Deserialize;
use serde::Serialize;

use crate::error::ErrorReport;
use crate::error::Fallible;
use crate::error::fail;
use crate::types::difficulty::Difficulty;
use crate::types::id::ItemId;
use crate::types::timestamp::Timestamp;

/// A word to learn, with its scheduling metadata.
///
/// Items are snapshots: scheduling operations return a new value and leave
/// the input untouched. Writing the new snapshot back is the store's job.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ItemParts")]
pub struct LearningItem {
    pub(crate) id: ItemId,
    pub(crate) prompt: String,
    pub(crate) answer: String,
    pub(crate) example: String,
    pub(crate) difficulty: Difficulty,
    pub(crate) created_at: Timestamp,
    pub(crate) last_reviewed_at: Option<Timestamp>,
    pub(crate) review_count: usize,
    /// Never exceeds `review_count`.
    pub(crate) correct_count: usize,
    pub(crate) next_review_at: Option<Timestamp>,
}

/// Changes to an item's content. `None` leaves a field as it is.
#[derive(Clone, Debug, Default)]
pub struct ItemEdit {
    pub prompt: Option<String>,
    pub answer: Option<String>,
    pub example: Option<String>,
    pub difficulty: Option<Difficulty>,
}

impl LearningItem {
    /// Create a never-reviewed item. Text fields are trimmed and must not be
    /// empty.
    pub fn new(
        prompt: &str,
        answer: &str,
        example: &str,
        difficulty: Difficulty,
        created_at: Timestamp,
    ) -> Fallible<Self> {
        let prompt = non_empty("prompt", prompt)?;
        let answer = non_empty("answer", answer)?;
        let example = non_empty("example", example)?;
        Ok(Self {
            id: ItemId::for_item(&prompt, created_at),
            prompt,
            answer,
            example,
            difficulty,
            created_at,
            last_reviewed_at: None,
            review_count: 0,
            correct_count: 0,
            next_review_at: None,
        })
    }

    /// A copy of this item with its content replaced. Identity and review
    /// history are kept.
    pub fn edited(&self, edit: ItemEdit) -> Fallible<Self> {
        let mut item = self.clone();
        if let Some(prompt) = edit.prompt {
            item.prompt = non_empty("prompt", &prompt)?;
        }
        if let Some(answer) = edit.answer {
            item.answer = non_empty("answer", &answer)?;
        }
        if let Some(example) = edit.example {
            item.example = non_empty("example", &example)?;
        }
        if let Some(difficulty) = edit.difficulty {
            item.difficulty = difficulty;
        }
        Ok(item)
    }

    pub fn id(&self) -> ItemId {
        self.id
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    pub fn answer(&self) -> &str {
        &self.answer
    }

    pub fn example(&self) -> &str {
        &self.example
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn created_at(&self) -> Timestamp {
        self.created_at
    }

    pub fn last_reviewed_at(&self) -> Option<Timestamp> {
        self.last_reviewed_at
    }

    pub fn review_count(&self) -> usize {
        self.review_count
    }

    pub fn correct_count(&self) -> usize {
        self.correct_count
    }

    pub fn next_review_at(&self) -> Option<Timestamp> {
        self.next_review_at
    }

    /// True if the item has never been reviewed.
    pub fn is_new(&self) -> bool {
        self.next_review_at.is_none()
    }

    /// An item is due if it has never been scheduled, or its next review time
    /// is at or before `now`.
    pub fn is_due(&self, now: Timestamp) -> bool {
        match self.next_review_at {
            None => true,
            Some(next) => next <= now,
        }
    }

    /// Percentage of correct answers, rounded. `None` before the first
    /// review.
    pub fn accuracy(&self) -> Option<u32> {
        if self.review_count == 0 {
            None
        } else {
            let ratio = self.correct_count as f64 / self.review_count as f64;
            Some((ratio * 100.0).round() as u32)
        }
    }
}

fn non_empty(field: &str, value: &str) -> Fallible<String> {
    let value = value.trim();
    if value.is_empty() {
        fail(format!("{field} must not be empty"))
    } else {
        Ok(value.to_string())
    }
}

/// The unvalidated fields of a [`LearningItem`], as read back from storage.
/// Converting into an item checks the text fields and the counts.
#[derive(Debug, Deserialize)]
pub struct ItemParts {
    pub id: ItemId,
    pub prompt: String,
    pub answer: String,
    pub example: String,
    pub difficulty: Difficulty,
    pub created_at: Timestamp,
    pub last_reviewed_at: Option<Timestamp>,
    pub review_count: usize,
    pub correct_count: usize,
    pub next_review_at: Option<Timestamp>,
}

impl TryFrom<ItemParts> for LearningItem {
    type Error = ErrorReport;

    fn try_from(raw: ItemParts) -> Result<Self, Self::Error> {
        if raw.correct_count > raw.review_count {
            return fail(format!(
                "item {} has {} correct answers but only {} reviews",
                raw.id, raw.correct_count, raw.review_count
            ));
        }
        Ok(Self {
            id: raw.id,
            prompt: non_empty("prompt", &raw.prompt)?,
            answer: non_empty("answer", &raw.answer)?,
            example: non_empty("example", &raw.example)?,
            difficulty: raw.difficulty,
            created_at: raw.created_at,
            last_reviewed_at: raw.last_reviewed_at,
            review_count: raw.review_count,
            correct_count: raw.correct_count,
            next_review_at: raw.next_review_at,
        })
    }
}
