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

//! Per-channel pipelines: a layout followed by one or more transports.

use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use std::sync::Arc;

use serde_json::Map;
use serde_json::Value;

use crate::Append;
use crate::ChannelConfig;
use crate::Clock;
use crate::Error;
use crate::Layout;
use crate::Severity;
use crate::Trap;
use crate::record::Arg;
use crate::record::Envelope;

/// Extra data mixed into the envelopes of selected channels.
#[derive(Clone)]
pub enum Mixin {
    /// Fields spread into every envelope ahead of the call arguments; the channel's bound data wins
    /// on conflicts.
    Static(Map<String, Value>),
    /// A function applied to every envelope before it is rendered.
    Dynamic(Arc<dyn Fn(Envelope) -> Envelope + Send + Sync>),
}

impl Mixin {
    /// Create a [`Mixin::Dynamic`].
    ///
    /// ```
    /// use leanlog::Mixin;
    ///
    /// let pid = Mixin::dynamic(|mut envelope| {
    ///     envelope.insert_field("pid", std::process::id());
    ///     envelope
    /// });
    /// ```
    pub fn dynamic<F>(inject: F) -> Self
    where
        F: Fn(Envelope) -> Envelope + Send + Sync + 'static,
    {
        Mixin::Dynamic(Arc::new(inject))
    }
}

impl fmt::Debug for Mixin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mixin::Static(fields) => f.debug_tuple("Static").field(fields).finish(),
            Mixin::Dynamic(_) => f.debug_tuple("Dynamic").field(&"<fn>").finish(),
        }
    }
}

impl From<Map<String, Value>> for Mixin {
    fn from(fields: Map<String, Value>) -> Self {
        Mixin::Static(fields)
    }
}

/// Which channels an [`Extension`] applies to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChannelSelector {
    /// Every channel; written `"*"` or `"all"`.
    All,
    /// The named channels only.
    Only(Vec<String>),
}

impl ChannelSelector {
    fn from_names<I>(names: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        let names: Vec<String> = names.into_iter().map(Into::into).collect();
        if names.iter().any(|name| name == "*" || name == "all") {
            ChannelSelector::All
        } else {
            ChannelSelector::Only(names)
        }
    }

    /// Whether `channel` is selected.
    pub fn matches(&self, channel: &str) -> bool {
        match self {
            ChannelSelector::All => true,
            ChannelSelector::Only(names) => names.iter().any(|name| name == channel),
        }
    }
}

impl From<&str> for ChannelSelector {
    fn from(name: &str) -> Self {
        ChannelSelector::from_names([name])
    }
}

impl From<String> for ChannelSelector {
    fn from(name: String) -> Self {
        ChannelSelector::from_names([name])
    }
}

impl From<Vec<&str>> for ChannelSelector {
    fn from(names: Vec<&str>) -> Self {
        ChannelSelector::from_names(names)
    }
}

impl From<Vec<String>> for ChannelSelector {
    fn from(names: Vec<String>) -> Self {
        ChannelSelector::from_names(names)
    }
}

impl<const N: usize> From<[&str; N]> for ChannelSelector {
    fn from(names: [&str; N]) -> Self {
        ChannelSelector::from_names(names)
    }
}

/// A [`Mixin`] scoped to a set of channels.
///
/// # Examples
///
/// ```
/// use leanlog::Extension;
/// use serde_json::json;
///
/// let mut fields = serde_json::Map::new();
/// fields.insert("service".to_owned(), json!("api"));
/// let extension = Extension::new(["error", "warn"], fields);
/// assert!(extension.applies_to("warn"));
/// assert!(!extension.applies_to("info"));
/// ```
#[derive(Debug, Clone)]
pub struct Extension {
    channels: ChannelSelector,
    inject: Mixin,
}

impl Extension {
    /// Create an extension.
    pub fn new(channels: impl Into<ChannelSelector>, inject: impl Into<Mixin>) -> Self {
        Extension {
            channels: channels.into(),
            inject: inject.into(),
        }
    }

    /// Whether the extension applies to `channel`.
    pub fn applies_to(&self, channel: &str) -> bool {
        self.channels.matches(channel)
    }

    /// The selected channels.
    pub fn channels(&self) -> &ChannelSelector {
        &self.channels
    }

    /// The injected data.
    pub fn inject(&self) -> &Mixin {
        &self.inject
    }
}

#[derive(Debug)]
struct Pipeline {
    channel: Arc<str>,
    severity: Severity,
    bound: Map<String, Value>,
    file_name: Option<Arc<Path>>,
    mixin: Option<Mixin>,
    layout: Arc<dyn Layout>,
    appends: Vec<Arc<dyn Append>>,
    clock: Clock,
    trap: Arc<dyn Trap>,
}

impl Pipeline {
    fn envelope(&self, data: Vec<Arg>) -> Envelope {
        // bound data wins over injected fields of the same name
        let injected = match &self.mixin {
            Some(Mixin::Static(fields)) => fields
                .iter()
                .filter(|(k, _)| !self.bound.contains_key(*k))
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
            _ => Map::new(),
        };

        let envelope = Envelope::builder(self.channel.clone())
            .severity(self.severity)
            .time(self.clock.now())
            .injected(injected)
            .data(data)
            .fields(self.bound.clone())
            .file_name(self.file_name.clone())
            .build();

        match &self.mixin {
            Some(Mixin::Dynamic(inject)) => inject(envelope),
            _ => envelope,
        }
    }

    fn run(&self, data: Vec<Arg>) -> Option<String> {
        let envelope = self.envelope(data);

        let message = match self.layout.format(&envelope) {
            Ok(message) => message,
            Err(err) => {
                self.trap.trap(&err);
                return None;
            }
        };

        for append in &self.appends {
            if let Err(err) = append.append(&envelope, &message) {
                self.trap.trap(&err);
            }
        }

        Some(message)
    }
}

/// The callable side of a channel.
///
/// A channel is either backed by a pipeline, or a no-op that ignores every call. Cloning is cheap.
///
/// # Examples
///
/// ```
/// use leanlog::Channel;
///
/// let channel = Channel::noop();
/// assert_eq!(channel.log(leanlog::args!["dropped"]), None);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Channel {
    pipeline: Option<Arc<Pipeline>>,
}

impl Channel {
    /// A channel that ignores every call.
    pub fn noop() -> Self {
        Channel { pipeline: None }
    }

    /// Whether calls produce output.
    pub fn is_active(&self) -> bool {
        self.pipeline.is_some()
    }

    /// The channel name, if active.
    pub fn name(&self) -> Option<&str> {
        self.pipeline.as_ref().map(|p| &*p.channel)
    }

    /// The channel severity, if active.
    pub fn severity(&self) -> Option<Severity> {
        self.pipeline.as_ref().map(|p| p.severity)
    }

    /// Render the arguments and hand them to every transport of the channel.
    ///
    /// Returns the rendered message, or `None` if the channel is inactive or the message could
    /// not be rendered. Transport failures are reported to the trap and do not change the result.
    pub fn log<I>(&self, args: I) -> Option<String>
    where
        I: IntoIterator,
        I::Item: Into<Arg>,
    {
        let pipeline = self.pipeline.as_ref()?;
        pipeline.run(args.into_iter().map(Into::into).collect())
    }

    /// Flush every transport of the channel, reporting failures to the trap.
    pub fn flush(&self) {
        if let Some(pipeline) = &self.pipeline {
            for append in &pipeline.appends {
                if let Err(err) = append.flush() {
                    pipeline.trap.trap(&err);
                }
            }
        }
    }
}

/// Builds pipelines out of channel configurations and the named layouts and transports.
#[derive(Debug)]
pub(crate) struct PipelineFactory {
    layouts: HashMap<String, Arc<dyn Layout>>,
    appends: HashMap<String, Arc<dyn Append>>,
    extension: Option<Extension>,
    clock: Clock,
    trap: Arc<dyn Trap>,
}

impl PipelineFactory {
    pub(crate) fn new(
        layouts: HashMap<String, Arc<dyn Layout>>,
        appends: HashMap<String, Arc<dyn Append>>,
        extension: Option<Extension>,
        clock: Clock,
        trap: Arc<dyn Trap>,
    ) -> Self {
        PipelineFactory {
            layouts,
            appends,
            extension,
            clock,
            trap,
        }
    }

    pub(crate) fn trap(&self) -> &dyn Trap {
        &*self.trap
    }

    /// Flush every registered transport, reporting failures to the trap.
    pub(crate) fn flush(&self) {
        for append in self.appends.values() {
            if let Err(err) = append.flush() {
                self.trap.trap(&err);
            }
        }
    }

    fn layout(&self, channel: &str, config: &ChannelConfig) -> Result<Arc<dyn Layout>, Error> {
        let name = config.formatter_name();
        self.layouts.get(name).cloned().ok_or_else(|| {
            Error::config("invalid formatter name")
                .with_context("channel", channel)
                .with_context("formatter", name)
        })
    }

    fn appends(&self, channel: &str, config: &ChannelConfig) -> Result<Vec<Arc<dyn Append>>, Error> {
        let names = config.transport_names();
        if names.is_empty() {
            return Err(Error::config("empty transport list").with_context("channel", channel));
        }

        let mut appends = Vec::with_capacity(names.len());
        for name in names.iter() {
            let append = self.appends.get(name).ok_or_else(|| {
                Error::config("invalid transport name")
                    .with_context("channel", channel)
                    .with_context("transport", name)
            })?;
            append.check(channel, config)?;
            appends.push(append.clone());
        }
        Ok(appends)
    }

    /// Check that the channel's formatter and transports resolve, whether it is active or not.
    pub(crate) fn check(&self, channel: &str, config: &ChannelConfig) -> Result<(), Error> {
        self.layout(channel, config)?;
        self.appends(channel, config)?;
        Ok(())
    }

    /// Build the channel `channel` from `config`.
    ///
    /// `template` names the wildcard entry `config` was taken from, if any; an extension selecting
    /// the wildcard also applies to the channels it resolves.
    pub(crate) fn build(
        &self,
        channel: &str,
        config: &ChannelConfig,
        template: Option<&str>,
    ) -> Result<Channel, Error> {
        if !config.active {
            return Ok(Channel::noop());
        }

        let layout = self.layout(channel, config)?;
        let appends = self.appends(channel, config)?;
        let mixin = self
            .extension
            .as_ref()
            .filter(|ext| ext.applies_to(channel) || template.is_some_and(|t| ext.applies_to(t)))
            .map(|ext| ext.inject.clone());

        let pipeline = Pipeline {
            channel: Arc::from(channel),
            severity: config.severity,
            bound: config.bound_data.clone(),
            file_name: config.file_name.as_deref().map(Arc::from),
            mixin,
            layout,
            appends,
            clock: self.clock.clone(),
            trap: self.trap.clone(),
        };
        Ok(Channel {
            pipeline: Some(Arc::new(pipeline)),
        })
    }
}
