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

use chrono::Duration;
use chrono::NaiveDateTime;
use chrono::SubsecRound;
use serde::Deserialize;
use serde::Serialize;

use crate::error::ErrorReport;
use crate::types::date::Date;

const FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3f";

/// A timestamp without a timezone and millisecond precision.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Timestamp(NaiveDateTime);

impl Timestamp {
    pub fn new(ndt: NaiveDateTime) -> Self {
        Self(ndt.trunc_subsecs(3))
    }

    /// Converts a timestamp into a `NaiveDateTime`.
    pub fn into_inner(self) -> NaiveDateTime {
        self.0
    }

    /// The current timestamp in the user's local time.
    #[cfg(feature = "clock")]
    pub fn now() -> Self {
        Self(chrono::Local::now().naive_local().trunc_subsecs(3))
    }

    /// The date component of this timestamp.
    pub fn date(self) -> Date {
        Date::new(self.0.date())
    }

    /// This timestamp moved forward by a whole number of days. Saturates at
    /// the end of the representable range.
    pub fn add_days(self, days: i64) -> Self {
        let moved = Duration::try_days(days).and_then(|d| self.0.checked_add_signed(d));
        Self(moved.unwrap_or(NaiveDateTime::MAX))
    }

    /// Whole seconds elapsed from `earlier` to `self`, truncated toward zero.
    /// Negative when `earlier` is actually later.
    pub fn seconds_since(self, earlier: Timestamp) -> i64 {
        (self.0 - earlier.0).num_seconds()
    }
}

impl Display for Timestamp {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.format(FORMAT))
    }
}

impl TryFrom<String> for Timestamp {
    type Error = ErrorReport;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        let ndt = NaiveDateTime::parse_from_str(&value, FORMAT)
            .map_err(|_| ErrorReport::new(format!("Failed to parse timestamp: '{value}'.")))?;
        Ok(Timestamp::new(ndt))
    }
}

impl From<Timestamp> for String {
    fn from(ts: Timestamp) -> String {
        ts.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(s: &str) -> Timestamp {
        Timestamp::try_from(s.to_string()).unwrap()
    }

    #[test]
    fn test_timestamp_to_string() {
        let ndt = NaiveDateTime::parse_from_str("2023-10-05T14:30:15.123", FORMAT).unwrap();
        let ts = Timestamp(ndt);
        assert_eq!(ts.to_string(), "2023-10-05T14:30:15.123");
    }

    #[test]
    fn test_try_from_string() {
        let ts = parse("2023-10-05T14:30:15.123");
        let expected_ndt = NaiveDateTime::parse_from_str("2023-10-05T14:30:15.123", FORMAT).unwrap();
        assert_eq!(ts.0, expected_ndt);
    }

    #[test]
    fn test_try_from_garbage() {
        assert!(Timestamp::try_from("yesterday".to_string()).is_err());
    }

    #[test]
    fn test_serde() {
        let ts = parse("2023-10-05T14:30:15.123");
        let serialized = serde_json::to_string(&ts).unwrap();
        assert_eq!(serialized, "\"2023-10-05T14:30:15.123\"");
        let deserialized: Timestamp = serde_json::from_str(&serialized).unwrap();
        assert_eq!(deserialized, ts);
    }

    #[test]
    fn test_add_days_keeps_time_of_day() {
        let ts = parse("2024-02-28T23:15:00.000");
        assert_eq!(ts.add_days(2).to_string(), "2024-03-01T23:15:00.000");
        assert_eq!(ts.add_days(0), ts);
    }

    #[test]
    fn test_seconds_since() {
        let start = parse("2024-01-01T00:00:00.000");
        let end = parse("2024-01-01T00:01:30.900");
        assert_eq!(end.seconds_since(start), 90);
        assert_eq!(start.seconds_since(end), -90);
    }

    #[test]
    fn test_ordering() {
        assert!(parse("2024-01-01T00:00:00.000") < parse("2024-01-01T00:00:00.001"));
    }
}
