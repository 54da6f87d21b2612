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

use std::fmt::Display;
use std::fmt::Formatter;

use clap::ValueEnum;
use wordcards_core::SessionStats;
use wordcards_core::Timestamp;
use wordcards_core::error::Fallible;
use wordcards_core::stats_from;

use crate::collection::Collection;

#[derive(ValueEnum, Clone, Copy, PartialEq, Debug)]
pub enum StatsFormat {
    Text,
    Json,
}

impl Display for StatsFormat {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            StatsFormat::Text => write!(f, "text"),
            StatsFormat::Json => write!(f, "json"),
        }
    }
}

pub fn print_stats(directory: Option<String>, format: StatsFormat) -> Fallible<()> {
    let collection = Collection::new(directory)?;
    let stats = stats_from(&collection.db, &collection.db, Timestamp::now())?;
    print!("{}", render_stats(&stats, format)?);
    Ok(())
}

fn render_stats(stats: &SessionStats, format: StatsFormat) -> Fallible<String> {
    match format {
        StatsFormat::Json => {
            let mut json = serde_json::to_string_pretty(stats)?;
            json.push('\n');
            Ok(json)
        }
        StatsFormat::Text => Ok(format!(
            "Total words:    {}\nDue for review: {}\nStudied today:  {}\nDay streak:     {}\nAccuracy:       {}%\nStudy time:     {} min\n",
            stats.total_items,
            stats.due_items,
            stats.studied_today,
            stats.streak,
            stats.accuracy,
            stats.study_minutes
        )),
    }
}
