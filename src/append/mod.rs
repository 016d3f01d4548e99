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

//! Transports that write rendered messages to their targets.

use std::fmt;

use crate::ChannelConfig;
use crate::Error;
use crate::record::Envelope;

mod file;
mod stdio;

pub use self::file::File;
pub use self::stdio::Stderr;
pub use self::stdio::Stdout;

/// Registry name of [`Stdout`].
pub const STDOUT: &str = "stdout";
/// Registry name of [`Stderr`].
pub const STDERR: &str = "stderr";
/// Registry name of [`File`].
pub const FILE: &str = "file";

/// A transport for rendered messages.
pub trait Append: fmt::Debug + Send + Sync + 'static {
    /// Check that a channel is configured well enough to use this transport.
    ///
    /// Called once per channel when the logger is built; an error aborts construction.
    ///
    /// Default to accepting every channel.
    fn check(&self, channel: &str, config: &ChannelConfig) -> Result<(), Error> {
        let _ = (channel, config);
        Ok(())
    }

    /// Write one rendered message.
    fn append(&self, envelope: &Envelope, message: &str) -> Result<(), Error>;

    /// Flush any buffered messages.
    ///
    /// Default to a no-op.
    fn flush(&self) -> Result<(), Error> {
        Ok(())
    }
}

impl<T: Append> From<T> for Box<dyn Append> {
    fn from(value: T) -> Self {
        Box::new(value)
    }
}
