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

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::PoisonError;

use crate::Arg;
use crate::Channel;
use crate::ChannelConfig;
use crate::Error;
use crate::LoggerConfig;
use crate::Trap;
use crate::config::wildcard_prefix;
use crate::pipeline::PipelineFactory;

#[derive(Debug)]
struct Wildcard {
    pattern: String,
    config: ChannelConfig,
}

impl Wildcard {
    fn matches(&self, channel: &str) -> bool {
        wildcard_prefix(&self.pattern).is_some_and(|prefix| channel.starts_with(prefix))
    }
}

/// A set of channels resolved from configuration and environment.
///
/// Channels are built once, when the logger is built. Names that are not configured resolve
/// through the wildcard channels, or to a no-op.
///
/// # Examples
///
/// ```
/// let logger = leanlog::builder()
///     .channel("module:*", true)
///     .env(|_: &str| None::<String>)
///     .build()
///     .unwrap();
///
/// assert!(logger.resolve("module:db").is_active());
/// assert!(!logger.resolve("module").is_active());
/// assert_eq!(logger.log("unknown", leanlog::args!["dropped"]), None);
/// ```
#[derive(Debug)]
pub struct Logger {
    config: LoggerConfig,
    order: Vec<String>,
    channels: HashMap<String, Channel>,
    wildcards: Vec<Wildcard>,
    resolved: Mutex<HashMap<String, Channel>>,
    factory: PipelineFactory,
}

impl Logger {
    pub(super) fn new(config: LoggerConfig, factory: PipelineFactory) -> Result<Logger, Error> {
        let mut order = vec![];
        let mut channels = HashMap::new();
        let mut wildcards = vec![];

        for (name, channel) in config.iter().filter(|(_, c)| c.active) {
            if wildcard_prefix(name).is_some() {
                wildcards.push(Wildcard {
                    pattern: name.to_owned(),
                    config: channel.clone(),
                });
            } else {
                channels.insert(name.to_owned(), factory.build(name, channel, None)?);
                order.push(name.to_owned());
            }
        }

        Ok(Logger {
            config,
            order,
            channels,
            wildcards,
            resolved: Mutex::new(HashMap::new()),
            factory,
        })
    }

    /// The active configured channel `name`, or a no-op. Wildcards are not consulted.
    pub fn get(&self, name: &str) -> Channel {
        self.channels.get(name).cloned().unwrap_or_default()
    }

    /// Resolve `name` to a channel.
    ///
    /// An active configured channel is returned as is. Otherwise the first active wildcard
    /// matching `name` is used as a template and the channel built from it is cached. Anything
    /// else resolves to a no-op.
    pub fn resolve(&self, name: &str) -> Channel {
        if let Some(channel) = self.channels.get(name) {
            return channel.clone();
        }

        let Some(wildcard) = self.wildcards.iter().find(|w| w.matches(name)) else {
            return Channel::noop();
        };

        let mut resolved = self.resolved.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(channel) = resolved.get(name) {
            return channel.clone();
        }

        match self
            .factory
            .build(name, &wildcard.config, Some(&wildcard.pattern))
        {
            Ok(channel) => {
                resolved.insert(name.to_owned(), channel.clone());
                channel
            }
            Err(err) => {
                self.factory.trap().trap(&err);
                Channel::noop()
            }
        }
    }

    /// Log to the channel `name`, resolving it first.
    pub fn log<I>(&self, name: &str, args: I) -> Option<String>
    where
        I: IntoIterator,
        I::Item: Into<Arg>,
    {
        self.resolve(name).log(args)
    }

    /// Log to the `debug` channel.
    pub fn debug<I>(&self, args: I) -> Option<String>
    where
        I: IntoIterator,
        I::Item: Into<Arg>,
    {
        self.log("debug", args)
    }

    /// Log to the `info` channel.
    pub fn info<I>(&self, args: I) -> Option<String>
    where
        I: IntoIterator,
        I::Item: Into<Arg>,
    {
        self.log("info", args)
    }

    /// Log to the `warn` channel.
    pub fn warn<I>(&self, args: I) -> Option<String>
    where
        I: IntoIterator,
        I::Item: Into<Arg>,
    {
        self.log("warn", args)
    }

    /// Log to the `error` channel.
    pub fn error<I>(&self, args: I) -> Option<String>
    where
        I: IntoIterator,
        I::Item: Into<Arg>,
    {
        self.log("error", args)
    }

    /// Log to the `fatal` channel.
    pub fn fatal<I>(&self, args: I) -> Option<String>
    where
        I: IntoIterator,
        I::Item: Into<Arg>,
    {
        self.log("fatal", args)
    }

    /// Names of the active configured channels, in merge order. Wildcards are not listed.
    pub fn channels(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    /// The configuration the logger was built from, inactive channels and wildcards included.
    pub fn config(&self) -> &LoggerConfig {
        &self.config
    }

    /// Flush every transport.
    pub fn flush(&self) {
        self.factory.flush();
    }
}
