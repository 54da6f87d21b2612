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

//! A line-oriented drill in the terminal.

use std::io::BufRead;
use std::io::Write;
use std::io::stdin;
use std::io::stdout;
use std::time::SystemTime;
use std::time::UNIX_EPOCH;

use wordcards_core::ItemStore;
use wordcards_core::Session;
use wordcards_core::SessionLog;
use wordcards_core::SessionRecord;
use wordcards_core::SessionStart;
use wordcards_core::Timestamp;
use wordcards_core::TinyRng;
use wordcards_core::error::Fallible;

use crate::collection::Collection;

/// How a drill ended.
#[derive(Debug, PartialEq)]
pub enum DrillOutcome {
    /// Nothing was due.
    AllCaughtUp,
    /// The user quit partway. Answers given so far are saved, but no session
    /// is logged.
    Abandoned { answered: usize },
    /// One record per completed pass, including restarts.
    Completed { sessions: Vec<SessionRecord> },
}

pub fn drill_collection(directory: Option<String>, session_size: Option<usize>) -> Fallible<()> {
    let mut collection = Collection::new(directory)?;
    let limit = session_size.unwrap_or(collection.config.session_size).max(1);
    let seed = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or_default();
    let mut rng = TinyRng::from_seed(seed);
    let outcome = drill(
        &mut collection.db,
        stdin().lock(),
        &mut stdout(),
        &Timestamp::now,
        &mut rng,
        limit,
    )?;
    match outcome {
        DrillOutcome::AllCaughtUp => {}
        DrillOutcome::Abandoned { answered } => {
            log::info!("Saved {answered} answers without logging a session")
        }
        DrillOutcome::Completed { sessions } => log::info!("Logged {} sessions", sessions.len()),
    }
    Ok(())
}

/// Run a drill over the due items in `store`, reading answers from `input`.
pub fn drill<S, R, W>(
    store: &mut S,
    mut input: R,
    output: &mut W,
    clock: &dyn Fn() -> Timestamp,
    rng: &mut TinyRng,
    limit: usize,
) -> Fallible<DrillOutcome>
where
    S: ItemStore + SessionLog,
    R: BufRead,
    W: Write,
{
    let mut session = match Session::from_store(&*store, clock(), rng, limit)? {
        SessionStart::AllCaughtUp => {
            writeln!(output, "All caught up! No words are due for review right now.")?;
            return Ok(DrillOutcome::AllCaughtUp);
        }
        SessionStart::Started(session) => session,
    };
    let mut sessions = Vec::new();
    loop {
        while let Some(item) = session.current() {
            let item = item.clone();
            writeln!(output)?;
            writeln!(
                output,
                "[{}/{}] {}",
                session.position() + 1,
                session.total(),
                item.prompt()
            )?;
            write!(output, "Press Enter to reveal (q to quit): ")?;
            output.flush()?;
            match read_line(&mut input)? {
                Some(line) if line != "q" => {}
                _ => return abandon(output, &session),
            }
            writeln!(output, "Meaning: {}", item.answer())?;
            writeln!(output, "Example: {}", item.example())?;
            let correct = loop {
                write!(output, "Did you get it right? [y/n] ")?;
                output.flush()?;
                match read_line(&mut input)?.as_deref() {
                    Some("y") | Some("yes") => break true,
                    Some("n") | Some("no") => break false,
                    Some("q") | None => return abandon(output, &session),
                    Some(_) => writeln!(output, "Please answer y or n.")?,
                }
            };
            session.answer_into(store, item.id(), correct, clock())?;
        }

        let record = session.finish_into(store, clock())?;
        let accuracy = (record.correct_answers as f64 / record.cards_studied as f64 * 100.0).round();
        writeln!(output)?;
        writeln!(
            output,
            "Session complete! {}/{} correct ({accuracy}%) in {}m {}s.",
            record.correct_answers,
            record.cards_studied,
            record.duration_secs / 60,
            record.duration_secs % 60
        )?;
        sessions.push(record);

        write!(output, "Study again? [r to restart, Enter to finish] ")?;
        output.flush()?;
        if read_line(&mut input)?.as_deref() != Some("r") {
            return Ok(DrillOutcome::Completed { sessions });
        }
        session.restart(clock(), rng)?;
    }
}

fn abandon<W: Write>(output: &mut W, session: &Session) -> Fallible<DrillOutcome> {
    writeln!(output)?;
    writeln!(
        output,
        "Session ended early after {} of {} words.",
        session.position(),
        session.total()
    )?;
    Ok(DrillOutcome::Abandoned {
        answered: session.position(),
    })
}

/// Read one trimmed, lowercased line. `None` at end of input.
fn read_line<R: BufRead>(input: &mut R) -> Fallible<Option<String>> {
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_lowercase()))
}
