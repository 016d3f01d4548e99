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

//! Layouts (formatters) that render an envelope into a message.
//!
//! A layout is the first stage of every channel pipeline. Built-in layouts are registered under
//! the names [`JSON`] and [`CONSOLE`]; more can be added with
//! [`LoggerBuilder::layout`](crate::LoggerBuilder::layout).

use std::fmt;

use crate::Error;
use crate::record::Envelope;

mod console;
mod json;

pub use self::console::ConsoleLayout;
pub use self::json::JsonLayout;

/// Registry name of [`JsonLayout`], the default formatter.
pub const JSON: &str = "json";
/// Registry name of [`ConsoleLayout`].
pub const CONSOLE: &str = "console";

/// A layout for rendering envelopes.
pub trait Layout: fmt::Debug + Send + Sync + 'static {
    /// Render the envelope into the message handed to transports.
    fn format(&self, envelope: &Envelope) -> Result<String, Error>;
}

impl<T: Layout> From<T> for Box<dyn Layout> {
    fn from(value: T) -> Self {
        Box::new(value)
    }
}
