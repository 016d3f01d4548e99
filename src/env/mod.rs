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

//! Environment overrides of the channel configuration.
//!
//! A directive string is a comma-separated list of tokens, applied left to right:
//!
//! | Token             | Effect                                                         |
//! |-------------------|----------------------------------------------------------------|
//! | `*`, `all`        | activate every known channel                                   |
//! | `-*`, `-all`      | deactivate every known channel                                 |
//! | `name`, `+name`   | activate `name`, creating it if unknown                        |
//! | `-name`           | deactivate `name` if known                                     |
//! | `warn+`           | activate exactly the channels at `warn` severity or above      |
//! | `module:*`        | activate every `module:` channel and keep `module:*` as a wildcard |
//!
//! Anything else is ignored.

mod parser;


pub use self::parser::Directive;
pub use self::parser::ParseResult;
pub use self::parser::parse_directives;

use crate::ChannelConfig;
use crate::LoggerConfig;
use crate::config::wildcard_prefix;

/// Environment variables holding the directive string, in lookup order.
pub const DIRECTIVE_VARS: [&str; 3] = ["LOG", "LOGGER", "LEANLOGGER"];

/// Environment variable holding the directive string of debug channels.
pub const DEBUG_VAR: &str = "DEBUG";

/// Read access to environment variables.
pub trait Env {
    /// The value of a variable, if set.
    fn var(&self, name: &str) -> Option<String>;
}

/// The environment of the current process.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemEnv;

impl Env for SystemEnv {
    fn var(&self, name: &str) -> Option<String> {
        std::env::var(name).ok()
    }
}

impl<F> Env for F
where
    F: Fn(&str) -> Option<String>,
{
    fn var(&self, name: &str) -> Option<String> {
        self(name)
    }
}

/// The first non-empty value among `names`.
///
/// ```
/// use leanlog::env::read_directive;
///
/// let env = |name: &str| (name == "LOGGER").then(|| "warn+".to_owned());
/// assert_eq!(read_directive(&env, &["LOG", "LOGGER"]).as_deref(), Some("warn+"));
/// ```
pub fn read_directive<S: AsRef<str>>(env: &dyn Env, names: &[S]) -> Option<String> {
    names
        .iter()
        .filter_map(|name| env.var(name.as_ref()))
        .find(|value| !value.is_empty())
}

fn activate(config: &mut LoggerConfig, name: &str) {
    match config.get_mut(name) {
        Some(channel) => channel.active = true,
        None => config.insert(name, ChannelConfig::new(name)),
    }
}

/// Apply one directive.
pub fn apply_directive(config: &mut LoggerConfig, directive: &Directive) {
    match directive {
        Directive::ActivateAll => config.iter_mut().for_each(|(_, c)| c.active = true),
        Directive::DeactivateAll => config.iter_mut().for_each(|(_, c)| c.active = false),
        Directive::Activate(name) => activate(config, name),
        Directive::Deactivate(name) => {
            if let Some(channel) = config.get_mut(name) {
                channel.active = false;
            }
        }
        Directive::Floor(floor) => config
            .iter_mut()
            .for_each(|(_, c)| c.active = c.severity >= *floor),
        Directive::Wildcard(pattern) => {
            if let Some(prefix) = wildcard_prefix(pattern) {
                config
                    .iter_mut()
                    .filter(|(name, _)| name.starts_with(prefix))
                    .for_each(|(_, c)| c.active = true);
            }
            activate(config, pattern);
        }
    }
}

/// Parse a directive string and apply its directives to `config` in order.
///
/// Returns the tokens that were ignored.
pub fn apply(config: &mut LoggerConfig, input: &str) -> Vec<String> {
    let ParseResult {
        directives,
        ignored,
    } = parse_directives(input);
    for directive in &directives {
        apply_directive(config, directive);
    }
    ignored
}
