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

//! SQLite storage for items and the session log.

use std::path::Path;

use rusqlite::Connection;
use rusqlite::Row;
use rusqlite::params;
use wordcards_core::Difficulty;
use wordcards_core::ItemId;
use wordcards_core::ItemParts;
use wordcards_core::ItemStore;
use wordcards_core::LearningItem;
use wordcards_core::SessionId;
use wordcards_core::SessionLog;
use wordcards_core::SessionRecord;
use wordcards_core::Timestamp;
use wordcards_core::error::ErrorReport;
use wordcards_core::error::Fallible;
use wordcards_core::error::fail;

const SCHEMA: &str = "
create table if not exists items (
    id text primary key,
    prompt text not null,
    answer text not null,
    example text not null,
    difficulty text not null,
    created_at text not null,
    last_reviewed_at text,
    review_count integer not null,
    correct_count integer not null,
    next_review_at text
) strict;

create table if not exists sessions (
    id text primary key,
    date text not null,
    cards_studied integer not null,
    correct_answers integer not null,
    duration_secs integer not null
) strict;
";

pub struct Database {
    conn: Connection,
}

fn db_error(e: rusqlite::Error) -> ErrorReport {
    ErrorReport::new(format!("Database error: {e}"))
}

impl Database {
    /// Open the database at `path`, creating it and its tables if needed.
    pub fn open(path: &Path) -> Fallible<Self> {
        log::debug!("Opening database at {}", path.display());
        let conn = Connection::open(path).map_err(db_error)?;
        Self::init(conn)
    }

    /// An in-memory database, for tests.
    #[cfg(test)]
    pub fn in_memory() -> Fallible<Self> {
        Self::init(Connection::open_in_memory().map_err(db_error)?)
    }

    fn init(conn: Connection) -> Fallible<Self> {
        conn.execute_batch(SCHEMA).map_err(db_error)?;
        Ok(Self { conn })
    }
}

/// An item row with every column still in its stored form.
struct ItemRow {
    id: String,
    prompt: String,
    answer: String,
    example: String,
    difficulty: String,
    created_at: String,
    last_reviewed_at: Option<String>,
    review_count: i64,
    correct_count: i64,
    next_review_at: Option<String>,
}

impl ItemRow {
    fn read(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            prompt: row.get(1)?,
            answer: row.get(2)?,
            example: row.get(3)?,
            difficulty: row.get(4)?,
            created_at: row.get(5)?,
            last_reviewed_at: row.get(6)?,
            review_count: row.get(7)?,
            correct_count: row.get(8)?,
            next_review_at: row.get(9)?,
        })
    }

    fn into_item(self) -> Fallible<LearningItem> {
        let parts = ItemParts {
            id: ItemId::from_hex(&self.id)?,
            prompt: self.prompt,
            answer: self.answer,
            example: self.example,
            difficulty: Difficulty::try_from(self.difficulty)?,
            created_at: Timestamp::try_from(self.created_at)?,
            last_reviewed_at: self.last_reviewed_at.map(Timestamp::try_from).transpose()?,
            review_count: count(self.review_count)?,
            correct_count: count(self.correct_count)?,
            next_review_at: self.next_review_at.map(Timestamp::try_from).transpose()?,
        };
        LearningItem::try_from(parts)
    }
}

fn count(value: i64) -> Fallible<usize> {
    match usize::try_from(value) {
        Ok(n) => Ok(n),
        Err(_) => fail(format!("invalid count in database: {value}")),
    }
}

fn integer(value: usize) -> Fallible<i64> {
    match i64::try_from(value) {
        Ok(n) => Ok(n),
        Err(_) => fail(format!("count too large for database: {value}")),
    }
}

impl ItemStore for Database {
    fn list(&self) -> Fallible<Vec<LearningItem>> {
        let sql = "select id, prompt, answer, example, difficulty, created_at, last_reviewed_at, review_count, correct_count, next_review_at from items order by created_at, id;";
        let mut stmt = self.conn.prepare(sql).map_err(db_error)?;
        let rows = stmt
            .query_map([], ItemRow::read)
            .map_err(db_error)?
            .collect::<Result<Vec<ItemRow>, _>>()
            .map_err(db_error)?;
        rows.into_iter().map(ItemRow::into_item).collect()
    }

    fn upsert(&mut self, item: &LearningItem) -> Fallible<()> {
        let sql = "insert into items (id, prompt, answer, example, difficulty, created_at, last_reviewed_at, review_count, correct_count, next_review_at)
            values (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
            on conflict (id) do update set
                prompt = excluded.prompt,
                answer = excluded.answer,
                example = excluded.example,
                difficulty = excluded.difficulty,
                last_reviewed_at = excluded.last_reviewed_at,
                review_count = excluded.review_count,
                correct_count = excluded.correct_count,
                next_review_at = excluded.next_review_at;";
        self.conn
            .execute(
                sql,
                params![
                    item.id().to_hex(),
                    item.prompt(),
                    item.answer(),
                    item.example(),
                    item.difficulty().as_str(),
                    item.created_at().to_string(),
                    item.last_reviewed_at().map(|ts| ts.to_string()),
                    integer(item.review_count())?,
                    integer(item.correct_count())?,
                    item.next_review_at().map(|ts| ts.to_string()),
                ],
            )
            .map_err(db_error)?;
        Ok(())
    }

    fn insert(&mut self, item: &LearningItem) -> Fallible<()> {
        let sql = "insert into items (id, prompt, answer, example, difficulty, created_at, last_reviewed_at, review_count, correct_count, next_review_at)
            values (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10);";
        let result = self.conn.execute(
            sql,
            params![
                item.id().to_hex(),
                item.prompt(),
                item.answer(),
                item.example(),
                item.difficulty().as_str(),
                item.created_at().to_string(),
                item.last_reviewed_at().map(|ts| ts.to_string()),
                integer(item.review_count())?,
                integer(item.correct_count())?,
                item.next_review_at().map(|ts| ts.to_string()),
            ],
        );
        match result {
            Ok(_) => Ok(()),
            Err(rusqlite::Error::SqliteFailure(e, _))
                if e.code == rusqlite::ErrorCode::ConstraintViolation =>
            {
                fail(format!("an item with id {} already exists", item.id()))
            }
            Err(e) => Err(db_error(e)),
        }
    }

    fn remove(&mut self, id: ItemId) -> Fallible<()> {
        let deleted = self
            .conn
            .execute("delete from items where id = ?1;", params![id.to_hex()])
            .map_err(db_error)?;
        if deleted == 0 {
            return fail(format!("no item with id {id}"));
        }
        Ok(())
    }

    fn get(&self, id: ItemId) -> Fallible<Option<LearningItem>> {
        let sql = "select id, prompt, answer, example, difficulty, created_at, last_reviewed_at, review_count, correct_count, next_review_at from items where id = ?1;";
        let mut stmt = self.conn.prepare(sql).map_err(db_error)?;
        let mut rows = stmt
            .query_map(params![id.to_hex()], ItemRow::read)
            .map_err(db_error)?;
        match rows.next() {
            Some(row) => Ok(Some(row.map_err(db_error)?.into_item()?)),
            None => Ok(None),
        }
    }
}

impl SessionLog for Database {
    fn append(&mut self, record: &SessionRecord) -> Fallible<()> {
        let sql = "insert into sessions (id, date, cards_studied, correct_answers, duration_secs) values (?1, ?2, ?3, ?4, ?5);";
        let duration = i64::try_from(record.duration_secs)
            .map_err(|_| ErrorReport::new("session duration too large for database"))?;
        self.conn
            .execute(
                sql,
                params![
                    record.id.to_hex(),
                    record.date.to_string(),
                    integer(record.cards_studied)?,
                    integer(record.correct_answers)?,
                    duration,
                ],
            )
            .map_err(db_error)?;
        Ok(())
    }

    fn list_all(&self) -> Fallible<Vec<SessionRecord>> {
        let sql = "select id, date, cards_studied, correct_answers, duration_secs from sessions order by date;";
        let mut stmt = self.conn.prepare(sql).map_err(db_error)?;
        let rows = stmt
            .query_map([], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, i64>(2)?,
                    row.get::<_, i64>(3)?,
                    row.get::<_, i64>(4)?,
                ))
            })
            .map_err(db_error)?
            .collect::<Result<Vec<_>, _>>()
            .map_err(db_error)?;
        let mut records = Vec::with_capacity(rows.len());
        for (id, date, cards_studied, correct_answers, duration_secs) in rows {
            records.push(SessionRecord {
                id: SessionId::from_hex(&id)?,
                date: Timestamp::try_from(date)?,
                cards_studied: count(cards_studied)?,
                correct_answers: count(correct_answers)?,
                duration_secs: count(duration_secs)? as u64,
            });
        }
        Ok(records)
    }
}
