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

use jiff::Timestamp;

/// Where envelopes get their time from.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Clock {
    /// The system clock.
    #[default]
    System,
    /// Always the same instant; useful for reproducible output.
    Fixed(Timestamp),
}

impl Clock {
    pub fn now(&self) -> Timestamp {
        match self {
            Clock::System => Timestamp::now(),
            Clock::Fixed(ts) => *ts,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_clock_does_not_move() {
        let now: Timestamp = "2024-08-10T17:12:52+08:00".parse().unwrap();
        let clock = Clock::Fixed(now);
        assert_eq!(clock.now(), now);
        assert_eq!(clock.now().as_millisecond(), 1723281172000);
    }
}
