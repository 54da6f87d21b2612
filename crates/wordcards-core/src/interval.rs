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

use crate::types::difficulty::Difficulty;
use crate::types::timestamp::Timestamp;

/// Review intervals are whole days.
pub type IntervalDays = i64;

/// The longest interval for easy items, in days.
pub const EASY_MAX_INTERVAL: IntervalDays = 30;

/// The longest interval for medium items, in days.
pub const MEDIUM_MAX_INTERVAL: IntervalDays = 14;

/// The longest interval for hard items, in days.
pub const HARD_MAX_INTERVAL: IntervalDays = 7;

const EASY_GROWTH: f64 = 2.0;
const MEDIUM_GROWTH: f64 = 1.5;

/// The number of days until an item becomes due again, given its difficulty
/// and its review count including the review that just happened.
///
/// - easy: `min(30, 2^n)`
/// - medium: `min(14, 1.5^n)`, truncated to whole days
/// - hard: `min(7, n + 1)`
pub fn interval_days(difficulty: Difficulty, review_count: usize) -> IntervalDays {
    match difficulty {
        Difficulty::Easy => capped_power(EASY_GROWTH, review_count, EASY_MAX_INTERVAL),
        Difficulty::Medium => capped_power(MEDIUM_GROWTH, review_count, MEDIUM_MAX_INTERVAL),
        Difficulty::Hard => {
            let days = review_count.saturating_add(1);
            days.min(HARD_MAX_INTERVAL as usize) as IntervalDays
        }
    }
}

/// `min(cap, base^exp)` truncated toward zero. Large exponents overflow to
/// infinity in floating point, which the cap absorbs.
fn capped_power(base: f64, exp: usize, cap: IntervalDays) -> IntervalDays {
    let exp = i32::try_from(exp).unwrap_or(i32::MAX);
    let days = base.powi(exp).min(cap as f64);
    days.trunc() as IntervalDays
}

/// When an item next becomes eligible for review. `review_count` must
/// already include the review being recorded.
pub fn compute_next_review(
    difficulty: Difficulty,
    review_count: usize,
    now: Timestamp,
) -> Timestamp {
    now.add_days(interval_days(difficulty, review_count))
}
