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

use crate::Channel;
use crate::Error;
use crate::Extension;
use crate::LoggerSettings;
use crate::Severity;
use crate::Trap;
use crate::trap::DefaultTrap;

mod builder;
mod log_impl;

pub use self::builder::LoggerBuilder;
pub use self::builder::builder;
pub use self::log_impl::Logger;

/// Create a logger from the caller's settings and an optional extension.
///
/// The directive string is read from the process environment.
///
/// # Errors
///
/// See [`LoggerBuilder::build`].
pub fn create_logger(settings: LoggerSettings, extension: Option<Extension>) -> Result<Logger, Error> {
    let builder = builder().settings(settings);
    match extension {
        Some(extension) => builder.extension(extension),
        None => builder,
    }
    .build()
}

/// Create a debug channel, inactive unless the `DEBUG` variable activates it.
///
/// A configuration error is reported to the [`DefaultTrap`] and yields a no-op channel.
pub fn create_debug_logger(name: &str, severity: Option<Severity>) -> Channel {
    match builder().build_debug_channel(name, severity) {
        Ok(channel) => channel,
        Err(err) => {
            DefaultTrap::default().trap(&err);
            Channel::noop()
        }
    }
}
