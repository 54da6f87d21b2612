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

//! Adding, editing, removing and listing items.

use std::fmt::Display;
use std::fmt::Formatter;

use clap::ValueEnum;
use wordcards_core::Difficulty;
use wordcards_core::ItemEdit;
use wordcards_core::ItemFilter;
use wordcards_core::ItemStore;
use wordcards_core::LearningItem;
use wordcards_core::Timestamp;
use wordcards_core::error::Fallible;
use wordcards_core::error::fail;

use crate::collection::Collection;

#[derive(ValueEnum, Clone, Copy, PartialEq, Debug)]
pub enum ListFormat {
    Text,
    Json,
}

impl Display for ListFormat {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ListFormat::Text => write!(f, "text"),
            ListFormat::Json => write!(f, "json"),
        }
    }
}

pub fn add_item(
    directory: Option<String>,
    prompt: String,
    answer: String,
    example: String,
    difficulty: Difficulty,
) -> Fallible<()> {
    let mut collection = Collection::new(directory)?;
    let item = LearningItem::new(&prompt, &answer, &example, difficulty, Timestamp::now())?;
    collection.db.insert(&item)?;
    println!("Added \"{}\" ({}).", item.prompt(), item.id().short());
    Ok(())
}

pub fn edit_item(directory: Option<String>, id: String, edit: ItemEdit) -> Fallible<()> {
    if edit.prompt.is_none()
        && edit.answer.is_none()
        && edit.example.is_none()
        && edit.difficulty.is_none()
    {
        return fail("nothing to change.");
    }
    let mut collection = Collection::new(directory)?;
    let id = collection.resolve_id(&id)?;
    let Some(item) = collection.db.get(id)? else {
        return fail(format!("no item with id {id}"));
    };
    let edited = item.edited(edit)?;
    collection.db.upsert(&edited)?;
    println!("Updated \"{}\" ({}).", edited.prompt(), id.short());
    Ok(())
}

pub fn remove_item(directory: Option<String>, id: String) -> Fallible<()> {
    let mut collection = Collection::new(directory)?;
    let id = collection.resolve_id(&id)?;
    collection.db.remove(id)?;
    println!("Removed {}.", id.short());
    Ok(())
}

pub fn list_items(
    directory: Option<String>,
    filter: ItemFilter,
    format: ListFormat,
) -> Fallible<()> {
    let collection = Collection::new(directory)?;
    let items = collection.db.list()?;
    let found = filter.apply(&items);
    print!("{}", render_list(&found, Timestamp::now(), format)?);
    Ok(())
}

fn render_list(items: &[&LearningItem], now: Timestamp, format: ListFormat) -> Fallible<String> {
    match format {
        ListFormat::Json => {
            let mut json = serde_json::to_string_pretty(items)?;
            json.push('\n');
            Ok(json)
        }
        ListFormat::Text => {
            if items.is_empty() {
                return Ok("No words found.\n".to_string());
            }
            let mut out = String::new();
            for item in items {
                let due = match item.next_review_at() {
                    None => "new".to_string(),
                    Some(_) if item.is_due(now) => "due".to_string(),
                    Some(next) => format!("next {}", next.date()),
                };
                out.push_str(&format!(
                    "{}  {:<6}  {:<15}  {}: {}\n",
                    item.id().short(),
                    item.difficulty(),
                    due,
                    item.prompt(),
                    item.answer()
                ));
            }
            Ok(out)
        }
    }
}

#[cfg(test)]
mod tests {
    use wordcards_core::record_answer;

    use super::*;

    fn ts(s: &str) -> Timestamp {
        Timestamp::try_from(s.to_string()).unwrap()
    }

    fn items() -> Vec<LearningItem> {
        let created = ts("2024-01-01T08:00:00.000");
        let fresh = LearningItem::new("lucid", "clear", "A lucid essay.", Difficulty::Easy, created)
            .unwrap();
        let reviewed = LearningItem::new(
            "terse",
            "brief",
            "A terse reply.",
            Difficulty::Hard,
            created,
        )
        .unwrap();
        let reviewed = record_answer(&reviewed, true, ts("2024-01-02T08:00:00.000"));
        vec![fresh, reviewed]
    }

    #[test]
    fn test_render_text() -> Fallible<()> {
        let items = items();
        let refs: Vec<&LearningItem> = items.iter().collect();
        let text = render_list(&refs, ts("2024-01-02T09:00:00.000"), ListFormat::Text)?;
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with(&items[0].id().short()));
        assert!(lines[0].contains("easy"));
        assert!(lines[0].contains("new"));
        assert!(lines[0].ends_with("lucid: clear"));
        assert!(lines[1].contains("next 2024-01-04"));

        let later = render_list(&refs, ts("2024-01-04T08:00:00.000"), ListFormat::Text)?;
        assert!(later.lines().nth(1).is_some_and(|line| line.contains("due")));
        Ok(())
    }

    #[test]
    fn test_render_empty() -> Fallible<()> {
        let text = render_list(&[], ts("2024-01-02T09:00:00.000"), ListFormat::Text)?;
        assert_eq!(text, "No words found.\n");
        Ok(())
    }

    #[test]
    fn test_render_json() -> Fallible<()> {
        let items = items();
        let refs: Vec<&LearningItem> = items.iter().collect();
        let json = render_list(&refs, ts("2024-01-02T09:00:00.000"), ListFormat::Json)?;
        let parsed: Vec<LearningItem> = serde_json::from_str(&json)?;
        assert_eq!(parsed, items);
        Ok(())
    }
}
