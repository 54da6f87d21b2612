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

//! Persistence contracts. The core reads full snapshots through these
//! traits and hands back updated values; it never writes anywhere else.

use crate::error::Fallible;
use crate::error::fail;
use crate::types::id::ItemId;
use crate::types::item::LearningItem;
use crate::types::session_record::SessionRecord;

/// Where learning items live.
pub trait ItemStore {
    /// Every item in the collection.
    fn list(&self) -> Fallible<Vec<LearningItem>>;

    /// Insert the item, or replace the stored item with the same id.
    fn upsert(&mut self, item: &LearningItem) -> Fallible<()>;

    /// Add a new item. Fails if an item with the same id is already stored.
    fn insert(&mut self, item: &LearningItem) -> Fallible<()> {
        if self.get(item.id())?.is_some() {
            return fail(format!("an item with id {} already exists", item.id()));
        }
        self.upsert(item)
    }

    /// Delete the item with this id. Fails if there is no such item.
    fn remove(&mut self, id: ItemId) -> Fallible<()>;

    /// Look up a single item.
    fn get(&self, id: ItemId) -> Fallible<Option<LearningItem>> {
        Ok(self.list()?.into_iter().find(|item| item.id() == id))
    }
}

/// Append-only history of completed sessions.
pub trait SessionLog {
    fn append(&mut self, record: &SessionRecord) -> Fallible<()>;

    fn list_all(&self) -> Fallible<Vec<SessionRecord>>;
}

/// A store that keeps everything in memory, in insertion order.
#[derive(Default)]
pub struct MemoryStore {
    items: Vec<LearningItem>,
    sessions: Vec<SessionRecord>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_items(items: Vec<LearningItem>) -> Self {
        Self {
            items,
            sessions: Vec::new(),
        }
    }
}

impl ItemStore for MemoryStore {
    fn list(&self) -> Fallible<Vec<LearningItem>> {
        Ok(self.items.clone())
    }

    fn upsert(&mut self, item: &LearningItem) -> Fallible<()> {
        match self.items.iter_mut().find(|stored| stored.id() == item.id()) {
            Some(stored) => *stored = item.clone(),
            None => self.items.push(item.clone()),
        }
        Ok(())
    }

    fn remove(&mut self, id: ItemId) -> Fallible<()> {
        let before = self.items.len();
        self.items.retain(|item| item.id() != id);
        if self.items.len() == before {
            return fail(format!("no item with id {id}"));
        }
        Ok(())
    }
}

impl SessionLog for MemoryStore {
    fn append(&mut self, record: &SessionRecord) -> Fallible<()> {
        self.sessions.push(record.clone());
        Ok(())
    }

    fn list_all(&self) -> Fallible<Vec<SessionRecord>> {
        Ok(self.sessions.clone())
    }
}
