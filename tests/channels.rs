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

use std::sync::Arc;
use std::sync::Mutex;

use jiff::Timestamp;
use leanlog::Append;
use leanlog::ChannelOverride;
use leanlog::Clock;
use leanlog::Envelope;
use leanlog::Error;
use leanlog::ErrorKind;
use leanlog::Extension;
use leanlog::Layout;
use leanlog::LoggerBuilder;
use leanlog::Mixin;
use leanlog::Severity;
use leanlog::Trap;
use leanlog::args;
use serde_json::Map;
use serde_json::Value;
use serde_json::json;

#[derive(Debug, Clone, Default)]
struct Capture(Arc<Mutex<Vec<String>>>);

impl Capture {
    fn lines(&self) -> Vec<String> {
        self.0.lock().unwrap().clone()
    }
}

impl Append for Capture {
    fn append(&self, _: &Envelope, message: &str) -> Result<(), Error> {
        self.0.lock().unwrap().push(message.to_owned());
        Ok(())
    }
}

#[derive(Debug, Clone, Default)]
struct Collect(Arc<Mutex<Vec<String>>>);

impl Trap for Collect {
    fn trap(&self, err: &Error) {
        self.0.lock().unwrap().push(err.to_string());
    }
}

fn fixed_time() -> Timestamp {
    "2024-08-10T09:12:52Z".parse().unwrap()
}

fn env_of(vars: &[(&'static str, &'static str)]) -> impl Fn(&str) -> Option<String> + 'static {
    let vars = vars.to_vec();
    move |name: &str| {
        vars.iter()
            .find(|(key, _)| *key == name)
            .map(|(_, value)| value.to_string())
    }
}

// Every default channel writes to `capture` so that nothing reaches the real stdout.
fn rig(log: &'static str, capture: &Capture) -> LoggerBuilder {
    let mut builder = leanlog::builder()
        .env(env_of(&[("LOG", log)]))
        .clock(Clock::Fixed(fixed_time()))
        .append("capture", capture.clone());
    for name in leanlog::DEFAULT_CHANNELS {
        builder = builder.channel(name, ChannelOverride::default().transports(["capture"]));
    }
    builder
}

fn json(message: &str) -> Value {
    serde_json::from_str(message).unwrap()
}

#[test]
fn default_channels_emit_upper_cased_names() {
    let capture = Capture::default();
    let logger = rig("", &capture).build().unwrap();

    for name in ["info", "warn", "error", "fatal"] {
        let message = logger.log(name, args!["information", json!({ "ok": false })]).unwrap();
        let record = json(&message);
        assert_eq!(record["channel"], name.to_uppercase());
        assert_eq!(record["messages"], json!(["information", { "ok": false }]));
    }

    let mut lines = capture.lines();
    assert_eq!(lines.len(), 4);
    let first = lines.remove(0);
    insta::assert_snapshot!(first, @r#"{"channel":"INFO","severity":20,"time":1723281172000,"messages":["information",{"ok":false}]}"#);
}

#[test]
fn deactivate_all_then_reactivate() {
    let capture = Capture::default();
    let logger = rig("-all,request,+fatal", &capture)
        .channel("request", ChannelOverride::default().transports(["capture"]))
        .build()
        .unwrap();

    assert!(logger.log("request", args!["GET /"]).is_some());
    assert!(logger.fatal(args!["boom"]).is_some());
    assert_eq!(logger.info(args!["muted"]), None);
    assert_eq!(logger.warn(args!["muted"]), None);
    assert_eq!(logger.channels().collect::<Vec<_>>(), ["fatal", "request"]);
}

#[test]
fn deactivate_all_then_one() {
    let capture = Capture::default();
    let logger = rig("-*,error", &capture).build().unwrap();
    assert_eq!(logger.channels().collect::<Vec<_>>(), ["error"]);
}

#[test]
fn activate_all_then_deactivate_one() {
    let capture = Capture::default();
    let logger = rig("all,-info", &capture)
        .channel("warn", ChannelOverride::default().active(false).transports(["capture"]))
        .build()
        .unwrap();

    assert_eq!(logger.info(args!["muted"]), None);
    assert!(logger.warn(args!["back on"]).is_some());
    assert_eq!(logger.channels().collect::<Vec<_>>(), ["warn", "error", "fatal"]);
}

#[test]
fn severity_floor() {
    let capture = Capture::default();
    let logger = rig("warn+", &capture)
        .channel("request", ChannelOverride::default().transports(["capture"]))
        .build()
        .unwrap();

    assert_eq!(logger.channels().collect::<Vec<_>>(), ["warn", "error", "fatal"]);
    for name in logger.channels() {
        assert!(logger.resolve(name).severity().unwrap() >= Severity::Warn);
    }
}

#[test]
fn wildcard_resolution() {
    let capture = Capture::default();
    let logger = rig("module:*", &capture)
        .channel(
            "module:*",
            ChannelOverride::default()
                .transports(["capture"])
                .bind("component", "module"),
        )
        .build()
        .unwrap();

    let db = logger.resolve("module:db");
    assert!(db.is_active());
    assert_eq!(db.name(), Some("module:db"));
    assert!(logger.resolve("module:auth").is_active());
    assert!(!logger.resolve("module/err").is_active());
    assert!(!logger.resolve("module").is_active());

    let message = db.log(args!["connected"]).unwrap();
    insta::assert_snapshot!(message, @r#"{"channel":"MODULE:DB","severity":10,"time":1723281172000,"messages":["connected"],"component":"module"}"#);

    // wildcards are templates, not channels
    assert!(!logger.channels().any(|name| name == "module:*"));
    assert!(!logger.get("module:db").is_active());
}

#[test]
fn unknown_channels_are_noop() {
    let capture = Capture::default();
    let logger = rig("", &capture).build().unwrap();

    assert_eq!(logger.log("nope", args!["dropped"]), None);
    assert_eq!(logger.debug(args!["dropped"]), None);
    assert!(!logger.get("").is_active());
    assert!(capture.lines().is_empty());
}

#[test]
fn static_mixin_scoped_to_channels() {
    let capture = Capture::default();
    let mut fields = Map::new();
    fields.insert("service".to_owned(), json!("TEST-RIG"));
    let logger = rig("", &capture)
        .extension(Extension::new(["error", "warn"], fields))
        .build()
        .unwrap();

    let message = logger.error(args!["failed"]).unwrap();
    insta::assert_snapshot!(message, @r#"{"channel":"ERROR","severity":40,"time":1723281172000,"service":"TEST-RIG","messages":["failed"]}"#);
    let error = json(&message);
    let warn = json(&logger.warn(args!["careful"]).unwrap());
    let info = json(&logger.info(args!["fine"]).unwrap());

    assert_eq!(error["service"], "TEST-RIG");
    assert_eq!(warn["service"], "TEST-RIG");
    assert_eq!(info.get("service"), None);
}

#[test]
fn dynamic_mixin_for_all_channels() {
    let capture = Capture::default();
    let logger = rig("", &capture)
        .extension(Extension::new(
            "all",
            Mixin::dynamic(|mut envelope| {
                envelope.insert_field("rank", envelope.severity().rank());
                envelope
            }),
        ))
        .build()
        .unwrap();

    for name in ["info", "warn", "error", "fatal"] {
        let record = json(&logger.log(name, args!["x"]).unwrap());
        assert_eq!(record["rank"], record["severity"]);
    }
}

#[test]
fn identical_inputs_produce_identical_output() {
    let render = || {
        let capture = Capture::default();
        let logger = rig("request,module:*", &capture)
            .channel(
                "request",
                ChannelOverride::default()
                    .formatter("console")
                    .transports(["capture"]),
            )
            .channel("module:*", ChannelOverride::default().transports(["capture"]))
            .build()
            .unwrap();
        logger.info(args!["starting", json!({ "port": 8080 })]);
        logger.log("request", args!["GET /", 200, json!([1, 2])]);
        logger.log("module:db", args!["ready", fixed_time()]);
        capture.lines()
    };

    let first = render();
    assert_eq!(first.len(), 3);
    assert_eq!(first, render());
    assert_eq!(first[1], "2024-08-10T09:12:52 REQUEST: GET / 200 [\n  1,\n  2\n]\n");
}

#[test]
fn console_formatter_by_name() {
    let capture = Capture::default();
    let logger = rig("", &capture)
        .channel(
            "info",
            ChannelOverride::default()
                .formatter("console")
                .transports(["capture"]),
        )
        .build()
        .unwrap();

    let message = logger.info(args!["listening on", 8080]).unwrap();
    assert_eq!(message, "2024-08-10T09:12:52 INFO: listening on 8080 ");
}

#[derive(Debug)]
struct Plain;

impl Layout for Plain {
    fn format(&self, envelope: &Envelope) -> Result<String, Error> {
        Ok(format!("[{}] {}", envelope.severity(), envelope.data().len()))
    }
}

#[test]
fn custom_layout_by_name() {
    let capture = Capture::default();
    let logger = rig("", &capture)
        .layout("plain", Plain)
        .channel(
            "warn",
            ChannelOverride::default()
                .formatter("plain")
                .transports(["capture"]),
        )
        .build()
        .unwrap();

    assert_eq!(logger.warn(args!["a", "b"]).as_deref(), Some("[warn] 2"));
}

#[derive(Debug)]
struct Refuse;

impl Layout for Refuse {
    fn format(&self, envelope: &Envelope) -> Result<String, Error> {
        Err(Error::new(ErrorKind::Format, "refused").with_context("channel", envelope.channel()))
    }
}

#[test]
fn format_failures_are_trapped() {
    let capture = Capture::default();
    let trap = Collect::default();
    let logger = rig("", &capture)
        .layout("refuse", Refuse)
        .trap(trap.clone())
        .channel(
            "error",
            ChannelOverride::default()
                .formatter("refuse")
                .transports(["capture"]),
        )
        .build()
        .unwrap();

    assert_eq!(logger.error(args!["lost"]), None);
    assert!(capture.lines().is_empty());
    assert_eq!(*trap.0.lock().unwrap(), ["refused, context: { channel: error }"]);
}

#[test]
fn configuration_errors_abort_construction() {
    let capture = Capture::default();

    let err = rig("", &capture)
        .channel("request", ChannelOverride::default().formatter("xml"))
        .build()
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Config);
    assert_eq!(err.context("channel"), Some("request"));
    assert_eq!(err.context("formatter"), Some("xml"));

    let err = rig("", &capture)
        .channel("request", ChannelOverride::default().transports(["kafka"]))
        .build()
        .unwrap_err();
    assert_eq!(err.context("transport"), Some("kafka"));

    let err = rig("", &capture)
        .channel("request", ChannelOverride::default().transports(Vec::<String>::new()))
        .build()
        .unwrap_err();
    assert_eq!(err.message(), "empty transport list");

    // inactive channels are validated as well
    let err = rig("", &capture)
        .channel(
            "audit",
            ChannelOverride::default().active(false).transports(["file"]),
        )
        .build()
        .unwrap_err();
    assert_eq!(err.context("channel"), Some("audit"));
    assert_eq!(err.context("fileName"), Some("missing"));
}

#[test]
fn legacy_directive_variables() {
    let capture = Capture::default();
    let logger = rig("", &capture)
        .env(env_of(&[("LOG", ""), ("LOGGER", "-all"), ("LEANLOGGER", "all")]))
        .build()
        .unwrap();
    assert_eq!(logger.channels().count(), 0);

    let logger = rig("", &capture)
        .env(env_of(&[("LEANLOGGER", "-info")]))
        .build()
        .unwrap();
    assert_eq!(logger.channels().collect::<Vec<_>>(), ["warn", "error", "fatal"]);

    let logger = rig("", &capture)
        .env(env_of(&[("APP_LOG", "-warn")]))
        .directive_vars(["APP_LOG"])
        .build()
        .unwrap();
    assert_eq!(logger.channels().collect::<Vec<_>>(), ["info", "error", "fatal"]);
}

#[test]
fn malformed_directives_are_ignored() {
    let capture = Capture::default();
    let logger = rig("loud+,a b,,**,-nothing", &capture).build().unwrap();
    assert_eq!(logger.channels().collect::<Vec<_>>(), ["info", "warn", "error", "fatal"]);
}

#[test]
fn settings_from_json() {
    let capture = Capture::default();
    let settings = leanlog::LoggerSettings::from_json(
        r#"{ "info": { "transports": ["capture"], "boundData": { "pid": 7 } }, "warn": false }"#,
    )
    .unwrap();
    let logger = rig("", &capture).settings(settings).build().unwrap();

    // settings() replaces what rig() configured
    assert_eq!(logger.channels().collect::<Vec<_>>(), ["info", "error", "fatal"]);
    let record = json(&logger.info(args!["up"]).unwrap());
    assert_eq!(record["pid"], 7);
    assert!(logger.config().get("warn").is_some_and(|c| !c.active));
}

#[test]
fn debug_channels() {
    let capture = Capture::default();
    let debug_rig = |debug: &'static str| {
        leanlog::builder()
            .env(env_of(&[("DEBUG", debug)]))
            .clock(Clock::Fixed(fixed_time()))
            .append("capture", capture.clone())
            .channel("app:db", ChannelOverride::default().transports(["capture"]))
    };

    let channel = debug_rig("").build_debug_channel("app:db", None).unwrap();
    assert!(!channel.is_active());

    let channel = debug_rig("app:*").build_debug_channel("app:db", None).unwrap();
    assert!(channel.is_active());
    assert_eq!(channel.severity(), Some(Severity::Debug));

    let channel = debug_rig("app:db")
        .build_debug_channel("app:db", Some(Severity::Info))
        .unwrap();
    let message = channel.log(args!["query"]).unwrap();
    insta::assert_snapshot!(message, @r#"{"channel":"APP:DB","severity":20,"time":1723281172000,"messages":["query"]}"#);
    assert_eq!(capture.lines(), [message]);
}
