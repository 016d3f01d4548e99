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

use std::borrow::Cow;

use serde::Serialize;
use serde_json::Map;
use serde_json::Value;

use crate::Error;
use crate::ErrorKind;
use crate::Severity;
use crate::layout::Layout;
use crate::record::Arg;
use crate::record::Envelope;

// Extra fields may not shadow these.
const RESERVED: [&str; 4] = ["channel", "severity", "time", "messages"];

/// A JSON layout for rendering envelopes.
///
/// Output format:
///
/// ```json
/// {"channel":"INFO","severity":20,"time":1723281172000,"messages":["information",{"ok":false}]}
/// {"channel":"REQUEST","severity":10,"time":1723281172000,"region":"eu","messages":["GET /"],"service":"api"}
/// ```
///
/// `time` is milliseconds since the Unix epoch. Fields injected by a static extension come before
/// `messages`, the channel's bound data after it. A field named like one of the fixed keys is
/// dropped, and so is an injected field that is also bound.
///
/// # Examples
///
/// ```
/// use leanlog::layout::JsonLayout;
///
/// let json_layout = JsonLayout::default();
/// ```
#[derive(Default, Debug, Clone)]
#[non_exhaustive]
pub struct JsonLayout {}

#[derive(Debug, Serialize)]
struct RecordLine<'a> {
    channel: String,
    severity: Severity,
    time: i64,
    #[serde(flatten)]
    injected: Cow<'a, Map<String, Value>>,
    messages: &'a [Arg],
    #[serde(flatten)]
    fields: Cow<'a, Map<String, Value>>,
}

// Drop reserved keys and keys that appear in `shadowed`.
fn visible<'a>(
    fields: &'a Map<String, Value>,
    shadowed: &Map<String, Value>,
) -> Cow<'a, Map<String, Value>> {
    let hidden = |key: &str| RESERVED.iter().any(|r| *r == key) || shadowed.contains_key(key);
    if fields.keys().any(|key| hidden(key)) {
        let fields = fields
            .iter()
            .filter(|(key, _)| !hidden(key))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        Cow::Owned(fields)
    } else {
        Cow::Borrowed(fields)
    }
}

impl Layout for JsonLayout {
    fn format(&self, envelope: &Envelope) -> Result<String, Error> {
        let line = RecordLine {
            channel: envelope.channel().to_uppercase(),
            severity: envelope.severity(),
            time: envelope.time().as_millisecond(),
            injected: visible(envelope.injected(), envelope.fields()),
            messages: envelope.data(),
            fields: visible(envelope.fields(), &Map::new()),
        };

        serde_json::to_string(&line).map_err(|err| {
            Error::new(ErrorKind::Format, "failed to render json record")
                .with_context("channel", envelope.channel())
                .with_source(err)
        })
    }
}
