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

//! The per-call envelope and its arguments.

use std::path::Path;
use std::sync::Arc;

use jiff::Timestamp;
use serde::Serialize;
use serde::Serializer;
use serde_json::Map;
use serde_json::Value;

use crate::Severity;

/// One argument of a log call.
///
/// Anything JSON-like is kept as a [`Value`]; timestamps are kept apart so that text layouts can
/// inline them instead of pretty-printing them as objects.
#[derive(Debug, Clone, PartialEq)]
pub enum Arg {
    /// A JSON value.
    Value(Value),
    /// A point in time.
    Time(Timestamp),
}

impl Serialize for Arg {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Arg::Value(value) => value.serialize(serializer),
            Arg::Time(ts) => serializer.collect_str(ts),
        }
    }
}

impl From<Value> for Arg {
    fn from(value: Value) -> Self {
        Arg::Value(value)
    }
}

impl From<Timestamp> for Arg {
    fn from(ts: Timestamp) -> Self {
        Arg::Time(ts)
    }
}

impl From<&str> for Arg {
    fn from(s: &str) -> Self {
        Arg::Value(Value::String(s.to_owned()))
    }
}

impl From<&String> for Arg {
    fn from(s: &String) -> Self {
        Arg::Value(Value::String(s.clone()))
    }
}

macro_rules! impl_arg_from {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Arg {
                fn from(v: $ty) -> Self {
                    Arg::Value(Value::from(v))
                }
            }
        )*
    };
}

impl_arg_from!(String, bool, i32, i64, u32, u64, usize, f64);

/// The data a single log call threads through its channel's pipeline.
///
/// An envelope is created fresh on every call and dropped once every transport has seen it.
#[derive(Debug, Clone)]
pub struct Envelope {
    channel: Arc<str>,
    severity: Severity,
    time: Timestamp,
    data: Vec<Arg>,
    injected: Map<String, Value>,
    fields: Map<String, Value>,
    file_name: Option<Arc<Path>>,
}

impl Envelope {
    /// Returns a new builder.
    pub fn builder(channel: impl Into<Arc<str>>) -> EnvelopeBuilder {
        EnvelopeBuilder {
            envelope: Envelope {
                channel: channel.into(),
                severity: Severity::lowest(),
                time: Timestamp::UNIX_EPOCH,
                data: vec![],
                injected: Map::new(),
                fields: Map::new(),
                file_name: None,
            },
        }
    }

    /// The channel name as it was requested, not upper-cased.
    pub fn channel(&self) -> &str {
        &self.channel
    }

    /// The channel's severity.
    pub fn severity(&self) -> Severity {
        self.severity
    }

    /// When the call happened.
    pub fn time(&self) -> Timestamp {
        self.time
    }

    /// The call arguments, in order.
    pub fn data(&self) -> &[Arg] {
        &self.data
    }

    /// Fields spread in by a static extension. They render ahead of the call arguments.
    pub fn injected(&self) -> &Map<String, Value> {
        &self.injected
    }

    /// Extra fields: bound to the channel or added by a dynamic extension. They render after the
    /// call arguments.
    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    /// Add or replace an extra field.
    pub fn insert_field(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.fields.insert(key.into(), value.into());
    }

    /// Remove an extra field.
    pub fn remove_field(&mut self, key: &str) -> Option<Value> {
        self.fields.remove(key)
    }

    /// The file the channel writes to, if it has a file transport.
    pub fn file_name(&self) -> Option<&Path> {
        self.file_name.as_deref()
    }
}

/// Builder for [`Envelope`].
#[derive(Debug)]
pub struct EnvelopeBuilder {
    envelope: Envelope,
}

impl EnvelopeBuilder {
    /// Set [`severity`](Envelope::severity).
    pub fn severity(mut self, severity: Severity) -> Self {
        self.envelope.severity = severity;
        self
    }

    /// Set [`time`](Envelope::time).
    pub fn time(mut self, time: Timestamp) -> Self {
        self.envelope.time = time;
        self
    }

    /// Set [`data`](Envelope::data).
    pub fn data(mut self, data: Vec<Arg>) -> Self {
        self.envelope.data = data;
        self
    }

    /// Set all [`injected`](Envelope::injected) fields at once.
    pub fn injected(mut self, injected: Map<String, Value>) -> Self {
        self.envelope.injected = injected;
        self
    }

    /// Set all [`fields`](Envelope::fields) at once.
    pub fn fields(mut self, fields: Map<String, Value>) -> Self {
        self.envelope.fields = fields;
        self
    }

    /// Set [`file_name`](Envelope::file_name).
    pub fn file_name(mut self, file_name: Option<Arc<Path>>) -> Self {
        self.envelope.file_name = file_name;
        self
    }

    /// Invoke the builder and return an `Envelope`.
    pub fn build(self) -> Envelope {
        self.envelope
    }
}

/// Build a `Vec<Arg>` from heterogeneous values.
///
/// ```
/// use leanlog::Arg;
/// use serde_json::json;
///
/// let args = leanlog::args!["information", 42, json!({ "ok": false })];
/// assert_eq!(args.len(), 3);
/// assert_eq!(args[1], Arg::from(42));
/// ```
#[macro_export]
macro_rules! args {
    () => {
        ::std::vec::Vec::<$crate::Arg>::new()
    };
    ($($arg:expr),+ $(,)?) => {
        ::std::vec![$($crate::Arg::from($arg)),+]
    };
}
