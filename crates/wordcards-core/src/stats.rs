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

use std::collections::HashSet;

use serde::Serialize;

use crate::error::Fallible;
use crate::store::ItemStore;
use crate::store::SessionLog;
use crate::types::date::Date;
use crate::types::item::LearningItem;
use crate::types::session_record::SessionRecord;
use crate::types::timestamp::Timestamp;

/// Summary figures for the collection. Always recomputed from the session
/// log; never stored.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SessionStats {
    pub total_items: usize,
    /// Items due for review right now.
    pub due_items: usize,
    /// Items studied in sessions that ended today.
    pub studied_today: usize,
    /// Consecutive days with at least one session, counting back from today.
    pub streak: usize,
    /// Correct answers over all sessions, as a rounded percentage.
    pub accuracy: u32,
    /// Total session time in whole minutes.
    pub study_minutes: u64,
}

pub fn compute_stats(
    records: &[SessionRecord],
    items: &[LearningItem],
    now: Timestamp,
) -> SessionStats {
    let today: Date = now.date();
    let studied_today: usize = records
        .iter()
        .filter(|record| record.day() == today)
        .map(|record| record.cards_studied)
        .sum();
    let total_studied: usize = records.iter().map(|r| r.cards_studied).sum();
    let total_correct: usize = records.iter().map(|r| r.correct_answers).sum();
    let total_secs: u64 = records.iter().map(|r| r.duration_secs).sum();
    let accuracy = if total_studied == 0 {
        0
    } else {
        (total_correct as f64 / total_studied as f64 * 100.0).round() as u32
    };
    SessionStats {
        total_items: items.len(),
        due_items: items.iter().filter(|item| item.is_due(now)).count(),
        studied_today,
        streak: streak(records, today),
        accuracy,
        study_minutes: total_secs / 60,
    }
}

/// Read everything from the store and log, then compute the stats.
pub fn stats_from<S, L>(store: &S, log: &L, now: Timestamp) -> Fallible<SessionStats>
where
    S: ItemStore + ?Sized,
    L: SessionLog + ?Sized,
{
    let items = store.list()?;
    let records = log.list_all()?;
    Ok(compute_stats(&records, &items, now))
}

fn streak(records: &[SessionRecord], today: Date) -> usize {
    let days: HashSet<Date> = records.iter().map(|record| record.day()).collect();
    let mut streak = 0;
    let mut day = Some(today);
    while let Some(d) = day {
        if !days.contains(&d) {
            break;
        }
        streak += 1;
        day = d.pred();
    }
    streak
}
