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

use leanlog::Append;
use leanlog::ChannelOverride;
use leanlog::Envelope;
use leanlog::Error;
use leanlog::bridge::log::channel_of;

#[derive(Debug, Clone, Default)]
struct Capture(Arc<Mutex<Vec<String>>>);

impl Append for Capture {
    fn append(&self, envelope: &Envelope, message: &str) -> Result<(), Error> {
        let line = format!("{}|{message}", envelope.channel());
        self.0.lock().unwrap().push(line);
        Ok(())
    }
}

#[test]
fn log_records_route_by_level() {
    assert_eq!(channel_of(log::Level::Trace), "debug");
    assert_eq!(channel_of(log::Level::Error), "error");

    let capture = Capture::default();
    let to_capture = || {
        ChannelOverride::default()
            .formatter("console")
            .transports(["capture"])
    };
    let logger = leanlog::builder()
        .env(|name: &str| (name == "LOG").then(|| "-info".to_owned()))
        .clock(leanlog::Clock::Fixed("2024-08-10T09:12:52Z".parse().unwrap()))
        .append("capture", capture.clone())
        .channel("info", to_capture())
        .channel("warn", to_capture())
        .channel("debug", to_capture())
        .build()
        .unwrap();

    leanlog::bridge::log::setup_log_crate(logger);

    log::info!("muted");
    log::warn!("disk {}% full", 93);
    log::trace!("tick");
    assert!(!log::log_enabled!(log::Level::Info));
    assert!(log::log_enabled!(log::Level::Warn));

    assert_eq!(
        *capture.0.lock().unwrap(),
        [
            "warn|2024-08-10T09:12:52 WARN: disk 93% full ",
            "debug|2024-08-10T09:12:52 DEBUG: tick ",
        ]
    );
}
