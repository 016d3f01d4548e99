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

//! Channel configuration: the caller's partial settings and the resolved per-channel state.

use std::borrow::Cow;
use std::fmt;
use std::path::PathBuf;

use serde::Deserialize;
use serde::Deserializer;
use serde::de::MapAccess;
use serde::de::Visitor;
use serde_json::Map;
use serde_json::Value;

use crate::Error;
use crate::Severity;
use crate::append;
use crate::layout;

/// The channels every logger starts with, all active.
pub const DEFAULT_CHANNELS: [&str; 4] = ["info", "warn", "error", "fatal"];

/// A partial channel configuration supplied by the caller.
///
/// Every field is optional; unset fields keep the value of the channel being overridden. In JSON,
/// a channel is either a boolean (shorthand for `active`) or an object with the keys `active`,
/// `severity` (a name or a rank), `formatter`, `transports`, `boundData` and `fileName`.
///
/// # Examples
///
/// ```
/// use leanlog::ChannelOverride;
/// use leanlog::Severity;
///
/// let request = ChannelOverride::default()
///     .severity(Severity::Info)
///     .formatter("console")
///     .bind("service", "api");
/// ```
#[derive(Debug, Default, Clone, PartialEq, Deserialize)]
#[serde(from = "OverrideRepr")]
pub struct ChannelOverride {
    /// Whether calls produce output.
    pub active: Option<bool>,
    /// The channel's severity.
    pub severity: Option<Severity>,
    /// Name of the formatter.
    pub formatter: Option<String>,
    /// Names of the transports, in order.
    pub transports: Option<Vec<String>>,
    /// Fields merged into every message of the channel.
    pub bound_data: Option<Map<String, Value>>,
    /// Target of the file transport.
    pub file_name: Option<PathBuf>,
}

impl ChannelOverride {
    /// Set [`active`](Self::active).
    pub fn active(mut self, active: bool) -> Self {
        self.active = Some(active);
        self
    }

    /// Set [`severity`](Self::severity).
    pub fn severity(mut self, severity: Severity) -> Self {
        self.severity = Some(severity);
        self
    }

    /// Set [`formatter`](Self::formatter).
    pub fn formatter(mut self, formatter: impl Into<String>) -> Self {
        self.formatter = Some(formatter.into());
        self
    }

    /// Set [`transports`](Self::transports).
    pub fn transports<I>(mut self, transports: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        self.transports = Some(transports.into_iter().map(Into::into).collect());
        self
    }

    /// Replace [`bound_data`](Self::bound_data).
    pub fn bound_data(mut self, bound_data: Map<String, Value>) -> Self {
        self.bound_data = Some(bound_data);
        self
    }

    /// Add one bound field.
    pub fn bind(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.bound_data
            .get_or_insert_with(Map::new)
            .insert(key.into(), value.into());
        self
    }

    /// Set [`file_name`](Self::file_name).
    pub fn file_name(mut self, file_name: impl Into<PathBuf>) -> Self {
        self.file_name = Some(file_name.into());
        self
    }
}

impl From<bool> for ChannelOverride {
    fn from(active: bool) -> Self {
        ChannelOverride::default().active(active)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum OverrideRepr {
    Flag(bool),
    Fields(OverrideFields),
}

#[derive(Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct OverrideFields {
    active: Option<bool>,
    severity: Option<Severity>,
    formatter: Option<String>,
    transports: Option<Vec<String>>,
    bound_data: Option<Map<String, Value>>,
    file_name: Option<PathBuf>,
}

impl From<OverrideRepr> for ChannelOverride {
    fn from(repr: OverrideRepr) -> Self {
        match repr {
            OverrideRepr::Flag(active) => ChannelOverride::from(active),
            OverrideRepr::Fields(fields) => ChannelOverride {
                active: fields.active,
                severity: fields.severity,
                formatter: fields.formatter,
                transports: fields.transports,
                bound_data: fields.bound_data,
                file_name: fields.file_name,
            },
        }
    }
}

/// The caller's partial logger configuration: channel names to overrides, in insertion order.
///
/// # Examples
///
/// ```
/// use leanlog::LoggerSettings;
///
/// let settings = LoggerSettings::from_json(
///     r#"{ "request": true, "audit": { "transports": ["file"], "fileName": "audit.log" } }"#,
/// )
/// .unwrap();
/// assert_eq!(settings.len(), 2);
/// ```
#[derive(Debug, Default, Clone, PartialEq)]
pub struct LoggerSettings {
    channels: Vec<(String, ChannelOverride)>,
}

impl LoggerSettings {
    /// Create empty settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse settings from a JSON object.
    pub fn from_json(json: &str) -> Result<Self, Error> {
        serde_json::from_str(json)
            .map_err(|err| Error::config("failed to parse logger settings").with_source(err))
    }

    /// Add or replace the override of a channel.
    pub fn channel(mut self, name: impl Into<String>, value: impl Into<ChannelOverride>) -> Self {
        self.set(name.into(), value.into());
        self
    }

    fn set(&mut self, name: String, value: ChannelOverride) {
        match self.channels.iter_mut().find(|(n, _)| *n == name) {
            Some((_, existing)) => *existing = value,
            None => self.channels.push((name, value)),
        }
    }

    /// Iterate the overrides in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ChannelOverride)> {
        self.channels.iter().map(|(name, value)| (name.as_str(), value))
    }

    /// The number of channels overridden.
    pub fn len(&self) -> usize {
        self.channels.len()
    }

    /// Whether no channel is overridden.
    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for LoggerSettings
where
    K: Into<String>,
    V: Into<ChannelOverride>,
{
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut settings = LoggerSettings::new();
        for (name, value) in iter {
            settings.set(name.into(), value.into());
        }
        settings
    }
}

impl<'de> Deserialize<'de> for LoggerSettings {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct SettingsVisitor;

        impl<'de> Visitor<'de> for SettingsVisitor {
            type Value = LoggerSettings;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of channel names to booleans or channel objects")
            }

            fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut settings = LoggerSettings::new();
                while let Some((name, value)) = map.next_entry::<String, ChannelOverride>()? {
                    settings.set(name, value);
                }
                Ok(settings)
            }
        }

        deserializer.deserialize_map(SettingsVisitor)
    }
}

/// The resolved state of one channel.
#[derive(Debug, Clone, PartialEq)]
pub struct ChannelConfig {
    /// Whether calls produce output.
    pub active: bool,
    /// The channel's severity.
    pub severity: Severity,
    /// Name of the formatter; [`layout::JSON`] when unset.
    pub formatter: Option<String>,
    /// Names of the transports; chosen by severity when unset.
    pub transports: Option<Vec<String>>,
    /// Fields merged into every message of the channel.
    pub bound_data: Map<String, Value>,
    /// Target of the file transport.
    pub file_name: Option<PathBuf>,
}

impl ChannelConfig {
    /// An active channel with the severity implied by its name and nothing else set.
    pub fn new(name: &str) -> Self {
        ChannelConfig {
            active: true,
            severity: Severity::implied_by(name),
            formatter: None,
            transports: None,
            bound_data: Map::new(),
            file_name: None,
        }
    }

    /// Apply an override field by field; unset fields are left alone.
    pub fn apply(&mut self, value: &ChannelOverride) {
        if let Some(active) = value.active {
            self.active = active;
        }
        if let Some(severity) = value.severity {
            self.severity = severity;
        }
        if let Some(formatter) = &value.formatter {
            self.formatter = Some(formatter.clone());
        }
        if let Some(transports) = &value.transports {
            self.transports = Some(transports.clone());
        }
        if let Some(bound_data) = &value.bound_data {
            self.bound_data = bound_data.clone();
        }
        if let Some(file_name) = &value.file_name {
            self.file_name = Some(file_name.clone());
        }
    }

    /// The formatter in effect.
    pub fn formatter_name(&self) -> &str {
        self.formatter.as_deref().unwrap_or(layout::JSON)
    }

    /// The transports in effect: the configured list, or one sink picked by severity.
    pub fn transport_names(&self) -> Cow<'_, [String]> {
        match &self.transports {
            Some(transports) => Cow::Borrowed(transports),
            None if self.severity > Severity::Warn => Cow::Owned(vec![append::STDERR.to_owned()]),
            None => Cow::Owned(vec![append::STDOUT.to_owned()]),
        }
    }
}

/// The prefix of a wildcard channel name such as `module:*`.
pub(crate) fn wildcard_prefix(name: &str) -> Option<&str> {
    name.strip_suffix('*')
}

/// The resolved configuration of every known channel, in merge order.
#[derive(Debug, Clone, PartialEq)]
pub struct LoggerConfig {
    channels: Vec<(String, ChannelConfig)>,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self::defaults()
    }
}

impl LoggerConfig {
    /// A configuration with no channel at all.
    pub fn empty() -> Self {
        LoggerConfig { channels: vec![] }
    }

    /// The built-in channels: `info`, `warn`, `error` and `fatal`, active at their own severity.
    pub fn defaults() -> Self {
        DEFAULT_CHANNELS
            .into_iter()
            .map(|name| (name.to_owned(), ChannelConfig::new(name)))
            .collect()
    }

    /// Merge the caller's settings into this configuration.
    ///
    /// Known channels are updated field by field. Unknown channels are appended, starting from
    /// [`ChannelConfig::new`]. Channels the settings do not mention are kept as they are.
    pub fn merge(&mut self, settings: &LoggerSettings) {
        for (name, value) in settings.iter() {
            match self.get_mut(name) {
                Some(config) => config.apply(value),
                None => {
                    let mut config = ChannelConfig::new(name);
                    config.apply(value);
                    self.channels.push((name.to_owned(), config));
                }
            }
        }
    }

    /// Look up a channel.
    pub fn get(&self, name: &str) -> Option<&ChannelConfig> {
        self.channels
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, config)| config)
    }

    /// Look up a channel for modification.
    pub fn get_mut(&mut self, name: &str) -> Option<&mut ChannelConfig> {
        self.channels
            .iter_mut()
            .find(|(n, _)| n == name)
            .map(|(_, config)| config)
    }

    /// Whether the channel is known.
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Add a channel, or replace it in place if it is already known.
    pub fn insert(&mut self, name: impl Into<String>, config: ChannelConfig) {
        let name = name.into();
        match self.get_mut(&name) {
            Some(existing) => *existing = config,
            None => self.channels.push((name, config)),
        }
    }

    /// Iterate every channel in merge order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ChannelConfig)> {
        self.channels.iter().map(|(name, config)| (name.as_str(), config))
    }

    /// Iterate every channel mutably in merge order.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (&str, &mut ChannelConfig)> {
        self.channels
            .iter_mut()
            .map(|(name, config)| (name.as_str(), config))
    }

    /// Names of the active channels in merge order, wildcards included.
    pub fn active_channels(&self) -> impl Iterator<Item = &str> {
        self.iter()
            .filter(|(_, config)| config.active)
            .map(|(name, _)| name)
    }

    /// The number of known channels.
    pub fn len(&self) -> usize {
        self.channels.len()
    }

    /// Whether no channel is known.
    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }
}

impl FromIterator<(String, ChannelConfig)> for LoggerConfig {
    fn from_iter<T: IntoIterator<Item = (String, ChannelConfig)>>(iter: T) -> Self {
        let mut config = LoggerConfig::empty();
        for (name, channel) in iter {
            config.insert(name, channel);
        }
        config
    }
}
