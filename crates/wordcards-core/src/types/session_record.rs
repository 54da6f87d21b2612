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

use crate::types::date::Date;
use crate::types::id::SessionId;
use crate::types::timestamp::Timestamp;

/// The outcome of one completed session. Written once to the session log
/// and never changed.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionRecord {
    pub id: SessionId,
    /// When the session ended.
    pub date: Timestamp,
    pub cards_studied: usize,
    pub correct_answers: usize,
    /// Wall-clock length of the session in whole seconds.
    pub duration_secs: u64,
}

impl SessionRecord {
    /// The calendar day the session counts towards.
    pub fn day(&self) -> Date {
        self.date.date()
    }
}
