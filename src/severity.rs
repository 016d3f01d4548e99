// Copyright 2024 FastLabs Developers
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

//! The fixed severity scale.

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;
use serde::Deserializer;
use serde::Serialize;
use serde::Serializer;

use crate::Error;

/// Severity of a channel, ordered from the least to the most severe.
///
/// The numeric rank is what ends up in rendered records and what the `<name>+` directive compares
/// against.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum Severity {
    /// Rank 10.
    Debug = 10,
    /// Rank 20.
    Info = 20,
    /// Rank 30.
    Warn = 30,
    /// Rank 40.
    Error = 40,
    /// Rank 50.
    Fatal = 50,
}

impl Severity {
    /// Every severity, least severe first.
    pub const ALL: [Severity; 5] = [
        Severity::Debug,
        Severity::Info,
        Severity::Warn,
        Severity::Error,
        Severity::Fatal,
    ];

    /// The lowest value on the scale.
    pub const fn lowest() -> Severity {
        Severity::Debug
    }

    /// The numeric rank.
    pub const fn rank(self) -> u8 {
        self as u8
    }

    /// Look up a severity by its numeric rank.
    pub fn from_rank(rank: u8) -> Option<Severity> {
        Severity::ALL.into_iter().find(|s| s.rank() == rank)
    }

    /// Look up a severity by its exact lowercase name.
    pub fn from_name(name: &str) -> Option<Severity> {
        Severity::ALL.into_iter().find(|s| s.as_str() == name)
    }

    /// The severity a channel gets when nothing is configured: channels named after a severity get
    /// that severity, everything else the lowest.
    ///
    /// ```
    /// use leanlog::Severity;
    ///
    /// assert_eq!(Severity::implied_by("fatal"), Severity::Fatal);
    /// assert_eq!(Severity::implied_by("request"), Severity::Debug);
    /// ```
    pub fn implied_by(channel: &str) -> Severity {
        Severity::from_name(channel).unwrap_or(Severity::lowest())
    }

    /// Return the lowercase name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Debug => "debug",
            Severity::Info => "info",
            Severity::Warn => "warn",
            Severity::Error => "error",
            Severity::Fatal => "fatal",
        }
    }
}

impl fmt::Debug for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for Severity {
    type Err = Error;

    fn from_str(s: &str) -> Result<Severity, Self::Err> {
        Severity::ALL
            .into_iter()
            .find(|severity| s.eq_ignore_ascii_case(severity.as_str()))
            .ok_or_else(|| Error::config(format!("malformed severity: {s:?}")))
    }
}

impl Serialize for Severity {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u8(self.rank())
    }
}

impl<'de> Deserialize<'de> for Severity {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Rank(u8),
            Name(String),
        }

        match Repr::deserialize(deserializer)? {
            Repr::Rank(rank) => Severity::from_rank(rank).ok_or_else(|| {
                serde::de::Error::custom(format!("severity rank {rank} is not on the scale"))
            }),
            Repr::Name(name) => name.parse().map_err(serde::de::Error::custom),
        }
    }
}
