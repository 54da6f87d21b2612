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

//! Content-derived identities for items and sessions.

use std::cmp::Ordering;
use std::fmt::Display;
use std::fmt::Formatter;

use serde::Deserialize;
use serde::Serialize;

use crate::error::ErrorReport;
use crate::error::Fallible;
use crate::types::timestamp::Timestamp;

/// Defines a newtype over a blake3 digest, hex-encoded on the wire. blake3
/// does not implement Ord and PartialOrd, so we compare the raw bytes.
macro_rules! digest_id {
    ($(#[$meta:meta])* $name:ident, $what:literal) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name {
            inner: blake3::Hash,
        }

        impl $name {
            pub fn to_hex(self) -> String {
                self.inner.to_hex().to_string()
            }

            pub fn from_hex(s: &str) -> Fallible<Self> {
                let inner = blake3::Hash::from_hex(s)
                    .map_err(|_| ErrorReport::new(format!("invalid {}: '{s}'", $what)))?;
                Ok(Self { inner })
            }

            /// The first eight hex digits, enough to tell items apart on a
            /// terminal.
            pub fn short(self) -> String {
                let mut hex = self.to_hex();
                hex.truncate(8);
                hex
            }
        }

        impl PartialOrd for $name {
            fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
                Some(self.cmp(other))
            }
        }

        impl Ord for $name {
            fn cmp(&self, other: &Self) -> Ordering {
                self.inner.as_bytes().cmp(other.inner.as_bytes())
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
                write!(f, "{}", self.to_hex())
            }
        }

        impl TryFrom<String> for $name {
            type Error = ErrorReport;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                $name::from_hex(&value)
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> String {
                id.to_hex()
            }
        }
    };
}

digest_id!(
    /// Identifies a learning item for its whole life, across edits.
    ItemId,
    "item id"
);

digest_id!(
    /// Identifies one completed session in the log.
    SessionId,
    "session id"
);

impl ItemId {
    /// Derive the identity of a freshly created item. Fields are separated
    /// by a NUL byte so that different splits cannot collide.
    pub fn for_item(prompt: &str, created_at: Timestamp) -> Self {
        let mut hasher = blake3::Hasher::new();
        hasher.update(prompt.as_bytes());
        hasher.update(&[0]);
        hasher.update(created_at.to_string().as_bytes());
        Self {
            inner: hasher.finalize(),
        }
    }
}

impl SessionId {
    /// Derive the identity of a finished session. Two sessions can share
    /// their times and counts, so the caller mixes in a random `nonce`.
    pub fn for_session(
        started_at: Timestamp,
        ended_at: Timestamp,
        cards_studied: usize,
        correct_answers: usize,
        nonce: u64,
    ) -> Self {
        let mut hasher = blake3::Hasher::new();
        hasher.update(started_at.to_string().as_bytes());
        hasher.update(&[0]);
        hasher.update(ended_at.to_string().as_bytes());
        hasher.update(&[0]);
        hasher.update(&(cards_studied as u64).to_le_bytes());
        hasher.update(&(correct_answers as u64).to_le_bytes());
        hasher.update(&nonce.to_le_bytes());
        Self {
            inner: hasher.finalize(),
        }
    }
}
