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
use std::fmt;
use std::sync::Arc;

use crate::Append;
use crate::Channel;
use crate::ChannelConfig;
use crate::ChannelOverride;
use crate::Clock;
use crate::Error;
use crate::Extension;
use crate::Layout;
use crate::Logger;
use crate::LoggerConfig;
use crate::LoggerSettings;
use crate::Severity;
use crate::Trap;
use crate::append;
use crate::env;
use crate::env::Env;
use crate::env::SystemEnv;
use crate::layout;
use crate::pipeline::PipelineFactory;
use crate::trap::DefaultTrap;

/// Create a new empty [`LoggerBuilder`].
///
/// # Examples
///
/// ```
/// use leanlog::ChannelOverride;
///
/// let logger = leanlog::builder()
///     .channel("request", true)
///     .channel("audit", ChannelOverride::default().active(false))
///     .env(|_: &str| None::<String>)
///     .build()
///     .unwrap();
/// assert_eq!(
///     logger.channels().collect::<Vec<_>>(),
///     ["info", "warn", "error", "fatal", "request"]
/// );
/// ```
pub fn builder() -> LoggerBuilder {
    LoggerBuilder::new()
}

/// A builder for configuring a [`Logger`].
///
/// The built logger starts from the default channels, merges the caller's settings, and finally
/// applies the directive string read from the environment. Every channel is validated; an unknown
/// formatter or transport fails the build.
#[must_use = "call `build` to construct the logger"]
pub struct LoggerBuilder {
    settings: LoggerSettings,
    extension: Option<Extension>,
    env: Box<dyn Env>,
    directive_vars: Vec<String>,
    debug_var: String,
    layouts: HashMap<String, Arc<dyn Layout>>,
    appends: HashMap<String, Arc<dyn Append>>,
    clock: Clock,
    trap: Arc<dyn Trap>,
}

impl fmt::Debug for LoggerBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoggerBuilder")
            .field("settings", &self.settings)
            .field("extension", &self.extension)
            .field("directive_vars", &self.directive_vars)
            .field("debug_var", &self.debug_var)
            .field("layouts", &self.layouts)
            .field("appends", &self.appends)
            .field("clock", &self.clock)
            .field("trap", &self.trap)
            .finish_non_exhaustive()
    }
}

impl Default for LoggerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl LoggerBuilder {
    /// Create a builder with the built-in layouts and transports and the process environment.
    pub fn new() -> Self {
        let mut layouts: HashMap<String, Arc<dyn Layout>> = HashMap::new();
        layouts.insert(layout::JSON.to_owned(), Arc::new(layout::JsonLayout::default()));
        layouts.insert(
            layout::CONSOLE.to_owned(),
            Arc::new(layout::ConsoleLayout::default()),
        );

        let mut appends: HashMap<String, Arc<dyn Append>> = HashMap::new();
        appends.insert(append::STDOUT.to_owned(), Arc::new(append::Stdout::default()));
        appends.insert(append::STDERR.to_owned(), Arc::new(append::Stderr::default()));
        appends.insert(append::FILE.to_owned(), Arc::new(append::File::default()));

        LoggerBuilder {
            settings: LoggerSettings::new(),
            extension: None,
            env: Box::new(SystemEnv),
            directive_vars: env::DIRECTIVE_VARS.map(str::to_owned).to_vec(),
            debug_var: env::DEBUG_VAR.to_owned(),
            layouts,
            appends,
            clock: Clock::default(),
            trap: Arc::new(DefaultTrap::default()),
        }
    }

    /// Replace the caller settings.
    pub fn settings(mut self, settings: LoggerSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Add or replace the settings of one channel.
    pub fn channel(mut self, name: impl Into<String>, value: impl Into<ChannelOverride>) -> Self {
        self.settings = self.settings.channel(name, value);
        self
    }

    /// Set the extension.
    pub fn extension(mut self, extension: Extension) -> Self {
        self.extension = Some(extension);
        self
    }

    /// Set where environment variables are read from.
    ///
    /// Default to [`SystemEnv`].
    pub fn env(mut self, env: impl Env + 'static) -> Self {
        self.env = Box::new(env);
        self
    }

    /// Set the variables holding the directive string; the first non-empty one is used.
    ///
    /// Default to [`DIRECTIVE_VARS`](env::DIRECTIVE_VARS).
    pub fn directive_vars<I>(mut self, names: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        self.directive_vars = names.into_iter().map(Into::into).collect();
        self
    }

    /// Set the variable holding the directive string of debug channels.
    ///
    /// Default to [`DEBUG_VAR`](env::DEBUG_VAR).
    pub fn debug_var(mut self, name: impl Into<String>) -> Self {
        self.debug_var = name.into();
        self
    }

    /// Register a layout under `name`, replacing any layout of that name.
    pub fn layout(mut self, name: impl Into<String>, layout: impl Into<Box<dyn Layout>>) -> Self {
        self.layouts.insert(name.into(), Arc::from(layout.into()));
        self
    }

    /// Register a transport under `name`, replacing any transport of that name.
    pub fn append(mut self, name: impl Into<String>, append: impl Into<Box<dyn Append>>) -> Self {
        self.appends.insert(name.into(), Arc::from(append.into()));
        self
    }

    /// Set the clock.
    ///
    /// Default to [`Clock::System`].
    pub fn clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    /// Set the trap.
    ///
    /// Default to [`DefaultTrap`].
    pub fn trap(mut self, trap: impl Into<Box<dyn Trap>>) -> Self {
        self.trap = Arc::from(trap.into());
        self
    }

    fn factory(self) -> (PipelineFactory, Box<dyn Env>, LoggerSettings, Vec<String>, String) {
        let factory = PipelineFactory::new(
            self.layouts,
            self.appends,
            self.extension,
            self.clock,
            self.trap,
        );
        (
            factory,
            self.env,
            self.settings,
            self.directive_vars,
            self.debug_var,
        )
    }

    /// Build the logger.
    ///
    /// # Errors
    ///
    /// Return an error if a channel names an unknown formatter or transport, has an empty
    /// transport list, or uses the file transport without a file name.
    pub fn build(self) -> Result<Logger, Error> {
        let (factory, env, settings, directive_vars, _) = self.factory();

        let mut config = LoggerConfig::defaults();
        config.merge(&settings);
        if let Some(directives) = env::read_directive(&*env, directive_vars.as_slice()) {
            env::apply(&mut config, &directives);
        }

        for (name, channel) in config.iter() {
            factory.check(name, channel)?;
        }

        Logger::new(config, factory)
    }

    /// Build a single debug channel.
    ///
    /// Debug channels are inactive unless the debug directive string activates them, for example
    /// `DEBUG=db` or `DEBUG=app:*`. Caller settings for `name`, if any, still apply.
    ///
    /// # Errors
    ///
    /// Return an error under the same conditions as [`build`](Self::build).
    pub fn build_debug_channel(self, name: &str, severity: Option<Severity>) -> Result<Channel, Error> {
        let (factory, env, settings, _, debug_var) = self.factory();

        let mut channel = ChannelConfig::new(name);
        channel.active = false;
        if let Some(severity) = severity {
            channel.severity = severity;
        }
        if let Some((_, value)) = settings.iter().find(|(n, _)| *n == name) {
            channel.apply(value);
        }

        let mut config = LoggerConfig::empty();
        config.insert(name, channel);
        if let Some(directives) = env::read_directive(&*env, std::slice::from_ref(&debug_var)) {
            env::apply(&mut config, &directives);
        }

        let Some(channel) = config.get(name) else {
            return Ok(Channel::noop());
        };
        factory.check(name, channel)?;
        factory.build(name, channel, None)
    }
}
