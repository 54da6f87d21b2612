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

//! wordcards-core: the scheduling core of wordcards.
//!
//! This library has no I/O and never reads the clock on its own (unless the
//! `clock` feature is enabled, and then only through `Timestamp::now` and
//! `Date::today`). It provides:
//! - the review interval function for the three difficulty tiers
//! - session selection, answering and the session log record
//! - statistics derived from the session log
//! - the item store and session log contracts, with an in-memory store

pub mod error;
pub mod interval;
pub mod rng;
pub mod search;
pub mod session;
pub mod stats;
pub mod store;
pub mod types;

// Re-exports for convenience
pub use error::{ErrorReport, Fallible, fail};
pub use interval::{compute_next_review, interval_days};
pub use rng::{TinyRng, shuffle};
pub use search::ItemFilter;
pub use session::{
    SESSION_SIZE, Session, SessionError, SessionStart, SessionStatus, build_session,
    finalize_session, record_answer,
};
pub use stats::{SessionStats, compute_stats, stats_from};
pub use store::{ItemStore, MemoryStore, SessionLog};
pub use types::date::Date;
pub use types::difficulty::Difficulty;
pub use types::id::{ItemId, SessionId};
pub use types::item::{ItemEdit, ItemParts, LearningItem};
pub use types::session_record::SessionRecord;
pub use types::timestamp::Timestamp;
