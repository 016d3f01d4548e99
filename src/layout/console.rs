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

use std::fmt::Write;

use serde_json::Value;

use crate::Error;
use crate::ErrorKind;
use crate::layout::Layout;
use crate::record::Arg;
use crate::record::Envelope;

/// A human readable layout.
///
/// Output format:
///
/// ```text
/// 2024-08-10T09:12:52 INFO: listening on 8080
/// 2024-08-10T09:12:52 REQUEST: GET /health {
///   "status": 200
/// }
/// ```
///
/// The time is UTC, trimmed to seconds and printed without a zone. Scalars and timestamps are
/// inlined, each followed by a space; objects and arrays are pretty-printed, each followed by a
/// newline. Extra fields are not rendered.
///
/// # Examples
///
/// ```
/// use leanlog::layout::ConsoleLayout;
///
/// let layout = ConsoleLayout::default();
/// ```
#[derive(Default, Debug, Clone)]
#[non_exhaustive]
pub struct ConsoleLayout {}

fn write_arg(text: &mut String, arg: &Arg) -> Result<(), Error> {
    match arg {
        Arg::Value(value @ (Value::Object(_) | Value::Array(_))) => {
            let pretty = serde_json::to_string_pretty(value).map_err(|err| {
                Error::new(ErrorKind::Format, "failed to pretty-print argument").with_source(err)
            })?;
            text.push_str(&pretty);
            text.push('\n');
        }
        Arg::Value(Value::String(s)) => {
            text.push_str(s);
            text.push(' ');
        }
        Arg::Value(value) => write!(text, "{value} ").map_err(Error::from_fmt_error)?,
        Arg::Time(ts) => write!(text, "{ts} ").map_err(Error::from_fmt_error)?,
    }
    Ok(())
}

impl Layout for ConsoleLayout {
    fn format(&self, envelope: &Envelope) -> Result<String, Error> {
        let mut text = String::new();

        let time = envelope.time().strftime("%Y-%m-%dT%H:%M:%S");
        let channel = envelope.channel().to_uppercase();
        write!(&mut text, "{time} {channel}: ").map_err(Error::from_fmt_error)?;

        for arg in envelope.data() {
            write_arg(&mut text, arg)?;
        }

        Ok(text)
    }
}
