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

use std::io;
use std::io::Write;

use crate::Error;
use crate::append::Append;
use crate::record::Envelope;

// One write per message keeps concurrent lines whole.
fn write_line(mut out: impl Write, message: &str) -> io::Result<()> {
    let mut line = String::with_capacity(message.len() + 1);
    line.push_str(message);
    line.push('\n');
    out.write_all(line.as_bytes())
}

/// A transport that prints messages to stdout.
///
/// Channels with no explicit transports and a severity of `warn` or below use this one.
#[derive(Default, Debug)]
#[non_exhaustive]
pub struct Stdout {}

impl Append for Stdout {
    fn append(&self, _: &Envelope, message: &str) -> Result<(), Error> {
        write_line(io::stdout().lock(), message).map_err(Error::from_io_error)
    }

    fn flush(&self) -> Result<(), Error> {
        io::stdout().flush().map_err(Error::from_io_error)
    }
}

/// A transport that prints messages to stderr.
///
/// Channels with no explicit transports and a severity above `warn` use this one.
#[derive(Default, Debug)]
#[non_exhaustive]
pub struct Stderr {}

impl Append for Stderr {
    fn append(&self, _: &Envelope, message: &str) -> Result<(), Error> {
        write_line(io::stderr().lock(), message).map_err(Error::from_io_error)
    }

    fn flush(&self) -> Result<(), Error> {
        io::stderr().flush().map_err(Error::from_io_error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_line_per_message() {
        let mut out = Vec::new();
        write_line(&mut out, "{\"channel\":\"INFO\"}").unwrap();
        write_line(&mut out, "second").unwrap();
        assert_eq!(out, b"{\"channel\":\"INFO\"}\nsecond\n");
    }
}
