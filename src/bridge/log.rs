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

use crate::Logger;

/// The channel a `log` level is routed to. `Trace` shares the `debug` channel.
pub fn channel_of(level: log::Level) -> &'static str {
    match level {
        log::Level::Error => "error",
        log::Level::Warn => "warn",
        log::Level::Info => "info",
        log::Level::Debug | log::Level::Trace => "debug",
    }
}

impl log::Log for Logger {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        self.resolve(channel_of(metadata.level())).is_active()
    }

    fn log(&self, record: &log::Record) {
        let message = record.args().to_string();
        Logger::log(self, channel_of(record.level()), [message]);
    }

    fn flush(&self) {
        Logger::flush(self);
    }
}

/// Set up the log crate global logger.
///
/// Records from the log crate are routed to the channel named after their level; the formatted
/// message is the only argument.
///
/// This function will set the global maximum log level to `Trace`. To override this, call
/// [`log::set_max_level`] after this function.
///
/// # Errors
///
/// Return an error if the log crate global logger has already been set.
pub fn try_setup_log_crate(logger: Logger) -> Result<(), log::SetLoggerError> {
    log::set_boxed_logger(Box::new(logger))?;
    log::set_max_level(log::LevelFilter::Trace);
    Ok(())
}

/// Set up the log crate global logger.
///
/// See [`try_setup_log_crate`].
///
/// # Panics
///
/// Panic if the log crate global logger has already been set.
///
/// # Examples
///
/// ```
/// let logger = leanlog::builder().build().unwrap();
/// leanlog::bridge::log::setup_log_crate(logger);
/// log::warn!("disk almost full");
/// ```
pub fn setup_log_crate(logger: Logger) {
    try_setup_log_crate(logger).expect(
        "leanlog::bridge::log::setup_log_crate must be called before the log crate global logger initialized",
    )
}
