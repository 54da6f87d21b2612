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

//! Selecting due items, running a session over them, and recording the
//! outcome.

use std::error::Error;
use std::fmt::Display;
use std::fmt::Formatter;

use crate::error::Fallible;
use crate::interval::compute_next_review;
use crate::rng::TinyRng;
use crate::rng::shuffle;
use crate::store::ItemStore;
use crate::store::SessionLog;
use crate::types::id::ItemId;
use crate::types::id::SessionId;
use crate::types::item::LearningItem;
use crate::types::session_record::SessionRecord;
use crate::types::timestamp::Timestamp;

/// The default maximum number of items in a session.
pub const SESSION_SIZE: usize = 10;

/// Pick the items to review: everything due at `now`, in random order, at
/// most `limit` of them. Returns an empty vector when nothing is due.
pub fn build_session(
    items: &[LearningItem],
    now: Timestamp,
    rng: &mut TinyRng,
    limit: usize,
) -> Vec<LearningItem> {
    let due: Vec<LearningItem> = items
        .iter()
        .filter(|item| item.is_due(now))
        .cloned()
        .collect();
    let mut due = shuffle(due, rng);
    due.truncate(limit);
    due
}

/// The item after one more review. The input is left untouched.
pub fn record_answer(item: &LearningItem, was_correct: bool, now: Timestamp) -> LearningItem {
    let review_count = item.review_count + 1;
    let correct_count = if was_correct {
        item.correct_count + 1
    } else {
        item.correct_count
    };
    LearningItem {
        last_reviewed_at: Some(now),
        review_count,
        correct_count,
        next_review_at: Some(compute_next_review(item.difficulty, review_count, now)),
        ..item.clone()
    }
}

/// Build the log entry for a finished session. A clock that went backwards
/// yields a zero duration rather than an error. `nonce` keeps the id fresh
/// when two sessions share their times and counts.
pub fn finalize_session(
    cards_studied: usize,
    correct_answers: usize,
    started_at: Timestamp,
    ended_at: Timestamp,
    nonce: u64,
) -> SessionRecord {
    let elapsed = ended_at.seconds_since(started_at);
    let duration_secs = match u64::try_from(elapsed) {
        Ok(secs) => secs,
        Err(_) => {
            log::warn!("Session ended at {ended_at}, before it started at {started_at}");
            0
        }
    };
    SessionRecord {
        id: SessionId::for_session(started_at, ended_at, cards_studied, correct_answers, nonce),
        date: ended_at,
        cards_studied,
        correct_answers,
        duration_secs,
    }
}

/// Contract violations by the caller of a [`Session`].
#[derive(Debug, PartialEq)]
pub enum SessionError {
    /// The answer was for some item other than the one being asked.
    OutOfSequenceAnswer { expected: ItemId, got: ItemId },
    /// Every item has already been answered.
    AlreadyComplete,
    /// The operation needs every item to have been answered first.
    NotComplete { remaining: usize },
}

impl Display for SessionError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            SessionError::OutOfSequenceAnswer { expected, got } => write!(
                f,
                "answer for item {} out of sequence, expected item {}",
                got.short(),
                expected.short()
            ),
            SessionError::AlreadyComplete => write!(f, "the session is already complete"),
            SessionError::NotComplete { remaining } => {
                write!(f, "the session still has {remaining} unanswered items")
            }
        }
    }
}

impl Error for SessionError {}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum SessionStatus {
    InProgress,
    Complete,
}

/// What happened when we tried to start a session.
#[derive(Debug)]
pub enum SessionStart {
    /// Nothing is due.
    AllCaughtUp,
    Started(Session),
}

/// A session in progress: a fixed set of items answered one at a time, in
/// order.
#[derive(Debug)]
pub struct Session {
    /// The selected items. Answered items are replaced by their updated
    /// snapshot, so a restart replays the latest state.
    items: Vec<LearningItem>,
    /// Index of the item being asked.
    position: usize,
    correct: usize,
    started_at: Timestamp,
    /// Drawn at every (re)start, for the session id.
    nonce: u64,
}

impl Session {
    /// Select due items and start a session over them.
    pub fn start(
        items: &[LearningItem],
        now: Timestamp,
        rng: &mut TinyRng,
        limit: usize,
    ) -> SessionStart {
        let selected = build_session(items, now, rng, limit);
        if selected.is_empty() {
            log::debug!("No items due at {now}");
            return SessionStart::AllCaughtUp;
        }
        log::debug!("Starting session with {} items", selected.len());
        SessionStart::Started(Session {
            items: selected,
            position: 0,
            correct: 0,
            started_at: now,
            nonce: rng.next_u64(),
        })
    }

    /// Like [`Session::start`], reading the collection from a store.
    pub fn from_store<S: ItemStore + ?Sized>(
        store: &S,
        now: Timestamp,
        rng: &mut TinyRng,
        limit: usize,
    ) -> Fallible<SessionStart> {
        let items = store.list()?;
        Ok(Session::start(&items, now, rng, limit))
    }

    /// The item waiting for an answer, or `None` once complete.
    pub fn current(&self) -> Option<&LearningItem> {
        self.items.get(self.position)
    }

    pub fn items(&self) -> &[LearningItem] {
        &self.items
    }

    /// How many items have been answered.
    pub fn position(&self) -> usize {
        self.position
    }

    /// How many items the session holds.
    pub fn total(&self) -> usize {
        self.items.len()
    }

    pub fn remaining(&self) -> usize {
        self.items.len() - self.position
    }

    /// How many answers so far were correct.
    pub fn correct(&self) -> usize {
        self.correct
    }

    pub fn started_at(&self) -> Timestamp {
        self.started_at
    }

    pub fn status(&self) -> SessionStatus {
        if self.position < self.items.len() {
            SessionStatus::InProgress
        } else {
            SessionStatus::Complete
        }
    }

    /// Fraction of items answered, in [0, 1].
    pub fn progress(&self) -> f64 {
        self.position as f64 / self.items.len() as f64
    }

    /// Answer the current item. `id` must be the current item's id. Returns
    /// the item's new snapshot for the caller to persist.
    pub fn answer(
        &mut self,
        id: ItemId,
        was_correct: bool,
        now: Timestamp,
    ) -> Result<LearningItem, SessionError> {
        let updated = record_answer(self.expect(id)?, was_correct, now);
        self.advance(updated.clone(), was_correct);
        Ok(updated)
    }

    /// Answer the current item and write the new snapshot to `store`. If the
    /// write fails the session does not advance.
    pub fn answer_into<S: ItemStore + ?Sized>(
        &mut self,
        store: &mut S,
        id: ItemId,
        was_correct: bool,
        now: Timestamp,
    ) -> Fallible<LearningItem> {
        let updated = record_answer(self.expect(id)?, was_correct, now);
        store.upsert(&updated)?;
        self.advance(updated.clone(), was_correct);
        Ok(updated)
    }

    /// The log entry for this session. Every item must have been answered.
    pub fn finish(&self, ended_at: Timestamp) -> Result<SessionRecord, SessionError> {
        if self.status() != SessionStatus::Complete {
            return Err(SessionError::NotComplete {
                remaining: self.remaining(),
            });
        }
        Ok(finalize_session(
            self.items.len(),
            self.correct,
            self.started_at,
            ended_at,
            self.nonce,
        ))
    }

    /// Like [`Session::finish`], appending the record to `log`.
    pub fn finish_into<L: SessionLog + ?Sized>(
        &self,
        log: &mut L,
        ended_at: Timestamp,
    ) -> Fallible<SessionRecord> {
        let record = self.finish(ended_at)?;
        log.append(&record)?;
        Ok(record)
    }

    /// Go through the same items again in a new order. Due-ness is not
    /// checked again.
    pub fn restart(&mut self, now: Timestamp, rng: &mut TinyRng) -> Result<(), SessionError> {
        if self.status() != SessionStatus::Complete {
            return Err(SessionError::NotComplete {
                remaining: self.remaining(),
            });
        }
        let items = std::mem::take(&mut self.items);
        self.items = shuffle(items, rng);
        self.position = 0;
        self.correct = 0;
        self.started_at = now;
        self.nonce = rng.next_u64();
        log::debug!("Restarting session with {} items", self.items.len());
        Ok(())
    }

    fn expect(&self, id: ItemId) -> Result<&LearningItem, SessionError> {
        let current = self.current().ok_or(SessionError::AlreadyComplete)?;
        if current.id() != id {
            return Err(SessionError::OutOfSequenceAnswer {
                expected: current.id(),
                got: id,
            });
        }
        Ok(current)
    }

    fn advance(&mut self, updated: LearningItem, was_correct: bool) {
        self.items[self.position] = updated;
        self.position += 1;
        if was_correct {
            self.correct += 1;
        }
        if self.status() == SessionStatus::Complete {
            log::debug!("Session complete: {}/{} correct", self.correct, self.items.len());
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use chrono::NaiveDate;

    use super::*;
    use crate::error::ErrorReport;
    use crate::store::MemoryStore;
    use crate::types::difficulty::Difficulty;

    fn at(day: u32, secs: u32) -> Timestamp {
        Timestamp::new(
            NaiveDate::from_ymd_opt(2024, 1, day)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap()
                + chrono::Duration::seconds(secs as i64),
        )
    }

    fn word(prompt: &str, difficulty: Difficulty) -> LearningItem {
        LearningItem::new(prompt, "meaning", "example", difficulty, at(1, 0)).unwrap()
    }

    fn words(n: usize) -> Vec<LearningItem> {
        (0..n)
            .map(|i| word(&format!("word{i}"), Difficulty::Medium))
            .collect()
    }

    fn scheduled(prompt: &str, next: Timestamp) -> LearningItem {
        let mut item = word(prompt, Difficulty::Easy);
        item.review_count = 1;
        item.correct_count = 1;
        item.last_reviewed_at = Some(at(1, 0));
        item.next_review_at = Some(next);
        item
    }

    fn ids(items: &[LearningItem]) -> HashSet<ItemId> {
        items.iter().map(|item| item.id()).collect()
    }

    fn started(items: &[LearningItem], seed: u64) -> Session {
        match Session::start(items, at(10, 0), &mut TinyRng::from_seed(seed), SESSION_SIZE) {
            SessionStart::Started(session) => session,
            SessionStart::AllCaughtUp => panic!("expected a session"),
        }
    }

    fn answer_all(session: &mut Session, correct: bool, now: Timestamp) {
        while let Some(item) = session.current() {
            let id = item.id();
            session.answer(id, correct, now).unwrap();
        }
    }

    #[test]
    fn test_build_session_selects_only_due_items() {
        let new = word("new", Difficulty::Hard);
        let overdue = scheduled("overdue", at(5, 0));
        let due_now = scheduled("due-now", at(10, 0));
        let later = scheduled("later", at(10, 1));
        let items = vec![new.clone(), overdue.clone(), due_now.clone(), later];
        let session = build_session(&items, at(10, 0), &mut TinyRng::from_seed(1), SESSION_SIZE);
        assert_eq!(ids(&session), ids(&[new, overdue, due_now]));
    }

    #[test]
    fn test_build_session_caps_at_limit() {
        let items = words(15);
        let session = build_session(&items, at(10, 0), &mut TinyRng::from_seed(1), SESSION_SIZE);
        assert_eq!(session.len(), 10);
        let selected = ids(&session);
        assert_eq!(selected.len(), 10);
        assert!(selected.is_subset(&ids(&items)));
    }

    #[test]
    fn test_build_session_respects_custom_limit() {
        let session = build_session(&words(5), at(10, 0), &mut TinyRng::from_seed(1), 3);
        assert_eq!(session.len(), 3);
    }

    #[test]
    fn test_build_session_empty_when_nothing_due() {
        let items = vec![scheduled("a", at(20, 0)), scheduled("b", at(11, 0))];
        assert!(build_session(&items, at(10, 0), &mut TinyRng::from_seed(1), SESSION_SIZE).is_empty());
        assert!(build_session(&[], at(10, 0), &mut TinyRng::from_seed(1), SESSION_SIZE).is_empty());
    }

    #[test]
    fn test_build_session_same_set_on_repeat() {
        let items = words(8);
        let a = build_session(&items, at(10, 0), &mut TinyRng::from_seed(1), SESSION_SIZE);
        let b = build_session(&items, at(10, 0), &mut TinyRng::from_seed(2), SESSION_SIZE);
        assert_eq!(ids(&a), ids(&b));
    }

    #[test]
    fn test_build_session_order_varies_with_seed() {
        let items = words(8);
        let orders: HashSet<Vec<ItemId>> = (0..20)
            .map(|seed| {
                build_session(&items, at(10, 0), &mut TinyRng::from_seed(seed), SESSION_SIZE)
                    .iter()
                    .map(|item| item.id())
                    .collect()
            })
            .collect();
        assert!(orders.len() > 1);
    }

    #[test]
    fn test_record_answer_hard_first_review() {
        let item = word("hard", Difficulty::Hard);
        let updated = record_answer(&item, true, at(1, 0));
        assert_eq!(updated.review_count(), 1);
        assert_eq!(updated.correct_count(), 1);
        assert_eq!(updated.last_reviewed_at(), Some(at(1, 0)));
        assert_eq!(updated.next_review_at(), Some(at(3, 0)));
        assert_eq!(updated.id(), item.id());
        // The input snapshot is unchanged.
        assert_eq!(item.review_count(), 0);
        assert!(item.next_review_at().is_none());
    }

    #[test]
    fn test_record_answer_easy_caps_at_thirty_days() {
        let mut item = word("easy", Difficulty::Easy);
        item.review_count = 4;
        item.correct_count = 4;
        let updated = record_answer(&item, false, at(1, 0));
        assert_eq!(updated.review_count(), 5);
        assert_eq!(updated.correct_count(), 4);
        assert_eq!(updated.next_review_at(), Some(at(31, 0)));
    }

    #[test]
    fn test_record_answer_medium_truncates() {
        let mut item = word("medium", Difficulty::Medium);
        item.review_count = 2;
        let updated = record_answer(&item, true, at(1, 0));
        assert_eq!(updated.review_count(), 3);
        assert_eq!(updated.next_review_at(), Some(at(4, 0)));
    }

    #[test]
    fn test_record_answer_keeps_counts_consistent() {
        let mut item = word("w", Difficulty::Medium);
        for i in 0..50 {
            item = record_answer(&item, i % 3 != 0, at(1, 0));
            assert!(item.correct_count() <= item.review_count());
        }
        assert_eq!(item.review_count(), 50);
        assert_eq!(item.correct_count(), 33);
    }

    #[test]
    fn test_finalize_session() {
        let record = finalize_session(5, 3, at(1, 0), at(1, 90), 0);
        assert_eq!(record.cards_studied, 5);
        assert_eq!(record.correct_answers, 3);
        assert_eq!(record.duration_secs, 90);
        assert_eq!(record.date, at(1, 90));
    }

    #[test]
    fn test_finalize_session_clamps_clock_skew() {
        let record = finalize_session(1, 1, at(1, 90), at(1, 0), 0);
        assert_eq!(record.duration_secs, 0);
    }

    #[test]
    fn test_start_all_caught_up() {
        let items = vec![scheduled("a", at(20, 0))];
        let start = Session::start(&items, at(10, 0), &mut TinyRng::from_seed(1), SESSION_SIZE);
        assert!(matches!(start, SessionStart::AllCaughtUp));
    }

    #[test]
    fn test_session_lifecycle() -> Result<(), SessionError> {
        let items = words(3);
        let mut session = started(&items, 4);
        assert_eq!(session.status(), SessionStatus::InProgress);
        assert_eq!(session.total(), 3);
        assert_eq!(session.progress(), 0.0);
        assert_eq!(session.finish(at(10, 5)), Err(SessionError::NotComplete { remaining: 3 }));

        let order: Vec<ItemId> = session.items().iter().map(|item| item.id()).collect();
        for (i, id) in order.iter().enumerate() {
            assert_eq!(session.current().map(|item| item.id()), Some(*id));
            let updated = session.answer(*id, i != 1, at(10, 10))?;
            assert_eq!(updated.review_count(), 1);
        }
        assert_eq!(session.status(), SessionStatus::Complete);
        assert!(session.current().is_none());
        assert_eq!(session.correct(), 2);
        assert_eq!(session.remaining(), 0);

        let record = session.finish(at(10, 45))?;
        assert_eq!(record.cards_studied, 3);
        assert_eq!(record.correct_answers, 2);
        assert_eq!(record.duration_secs, 45);
        Ok(())
    }

    #[test]
    fn test_out_of_sequence_answer_is_rejected() {
        let items = words(3);
        let mut session = started(&items, 4);
        let expected = session.items()[0].id();
        let other = session.items()[2].id();
        let err = session.answer(other, true, at(10, 0)).unwrap_err();
        assert_eq!(err, SessionError::OutOfSequenceAnswer { expected, got: other });
        // Nothing changed.
        assert_eq!(session.position(), 0);
        assert_eq!(session.items()[2].review_count(), 0);
    }

    #[test]
    fn test_answer_after_completion_is_rejected() {
        let items = words(1);
        let mut session = started(&items, 1);
        let id = items[0].id();
        session.answer(id, true, at(10, 0)).unwrap();
        assert_eq!(session.answer(id, true, at(10, 0)), Err(SessionError::AlreadyComplete));
        assert_eq!(session.correct(), 1);
    }

    #[test]
    fn test_restart_reuses_the_selected_set() {
        let items = words(6);
        let mut session = started(&items, 9);
        let selected = ids(session.items());
        assert_eq!(
            session.restart(at(10, 0), &mut TinyRng::from_seed(2)),
            Err(SessionError::NotComplete { remaining: 6 })
        );
        answer_all(&mut session, true, at(10, 0));

        // Every item is now scheduled in the future, but restart still uses
        // all of them.
        assert!(session.items().iter().all(|item| !item.is_due(at(10, 0))));
        session.restart(at(10, 60), &mut TinyRng::from_seed(2)).unwrap();
        assert_eq!(session.status(), SessionStatus::InProgress);
        assert_eq!(session.position(), 0);
        assert_eq!(session.correct(), 0);
        assert_eq!(session.started_at(), at(10, 60));
        assert_eq!(ids(session.items()), selected);

        answer_all(&mut session, false, at(10, 90));
        assert!(session.items().iter().all(|item| item.review_count() == 2));
        assert!(session.items().iter().all(|item| item.correct_count() == 1));
        let record = session.finish(at(10, 120)).unwrap();
        assert_eq!(record.correct_answers, 0);
        assert_eq!(record.duration_secs, 60);
    }

    #[test]
    fn test_identical_sessions_get_distinct_ids() -> Result<(), ErrorReport> {
        let items = words(2);
        let mut store = MemoryStore::new();
        let mut rng = TinyRng::from_seed(8);
        for _ in 0..2 {
            let mut session = match Session::start(&items, at(10, 0), &mut rng, SESSION_SIZE) {
                SessionStart::Started(session) => session,
                SessionStart::AllCaughtUp => panic!("expected a session"),
            };
            answer_all(&mut session, true, at(10, 20));
            session.finish_into(&mut store, at(10, 20))?;
        }
        let records = store.list_all()?;
        assert_eq!(records[0].cards_studied, records[1].cards_studied);
        assert_eq!(records[0].date, records[1].date);
        assert_ne!(records[0].id, records[1].id);
        Ok(())
    }

    #[test]
    fn test_restart_gets_a_new_session_id() {
        let items = words(1);
        let mut session = started(&items, 3);
        answer_all(&mut session, true, at(10, 0));
        let first = session.finish(at(10, 0)).unwrap();
        session.restart(at(10, 0), &mut TinyRng::from_seed(3)).unwrap();
        answer_all(&mut session, true, at(10, 0));
        let second = session.finish(at(10, 0)).unwrap();
        assert_eq!(first.duration_secs, second.duration_secs);
        assert_ne!(first.id, second.id);
    }

    #[test]
    fn test_session_against_store() -> Result<(), ErrorReport> {
        let mut store = MemoryStore::with_items(words(12));
        let mut rng = TinyRng::from_seed(5);
        let mut session = match Session::from_store(&store, at(10, 0), &mut rng, SESSION_SIZE)? {
            SessionStart::Started(session) => session,
            SessionStart::AllCaughtUp => panic!("expected a session"),
        };
        assert_eq!(session.total(), 10);
        while let Some(item) = session.current() {
            let id = item.id();
            session.answer_into(&mut store, id, true, at(10, 30))?;
        }
        let record = session.finish_into(&mut store, at(10, 30))?;
        assert_eq!(record.cards_studied, 10);
        assert_eq!(store.list_all()?, vec![record]);

        let reviewed = store
            .list()?
            .into_iter()
            .filter(|item| item.review_count() == 1)
            .count();
        assert_eq!(reviewed, 10);

        // Only the two unselected items are still due.
        let next = Session::from_store(&store, at(10, 31), &mut rng, SESSION_SIZE)?;
        match next {
            SessionStart::Started(session) => assert_eq!(session.total(), 2),
            SessionStart::AllCaughtUp => panic!("expected a session"),
        }
        Ok(())
    }

    #[test]
    fn test_error_messages() {
        let a = ItemId::from_hex(&format!("aaaaaaaa{}", "0".repeat(56))).unwrap();
        let b = ItemId::from_hex(&format!("bbbbbbbb{}", "0".repeat(56))).unwrap();
        let err = SessionError::OutOfSequenceAnswer { expected: a, got: b };
        assert_eq!(
            err.to_string(),
            "answer for item bbbbbbbb out of sequence, expected item aaaaaaaa"
        );
        let report: ErrorReport = SessionError::AlreadyComplete.into();
        assert_eq!(report.to_string(), "error: Session error: the session is already complete");
    }
}
