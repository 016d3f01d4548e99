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

use std::fs;
use std::sync::Arc;
use std::sync::Mutex;

use jiff::Timestamp;
use leanlog::ChannelOverride;
use leanlog::Clock;
use leanlog::Error;
use leanlog::Trap;
use leanlog::args;
use rand::Rng;
use rand::distr::Alphanumeric;
use serde_json::Value;
use tempfile::TempDir;

#[derive(Debug, Clone, Default)]
struct Collect(Arc<Mutex<Vec<String>>>);

impl Trap for Collect {
    fn trap(&self, err: &Error) {
        self.0.lock().unwrap().push(err.message().to_owned());
    }
}

fn generate_random_string() -> String {
    let mut rng = rand::rng();
    let len = rng.random_range(50..=100);
    std::iter::repeat(())
        .map(|()| rng.sample(Alphanumeric))
        .map(char::from)
        .take(len)
        .collect()
}

#[test]
fn channels_share_one_file() {
    let dir = TempDir::new().expect("failed to create a temporary directory");
    let path = dir.path().join("logs").join("app.log");
    let now: Timestamp = "2024-08-10T09:12:52Z".parse().unwrap();

    let to_file = |formatter: &str| {
        ChannelOverride::default()
            .formatter(formatter)
            .transports(["file"])
            .file_name(&path)
    };
    let logger = leanlog::builder()
        .env(|_: &str| None::<String>)
        .clock(Clock::Fixed(now))
        .channel("info", to_file("json"))
        .channel("audit", to_file("console"))
        .build()
        .unwrap();

    let payload = generate_random_string();
    let first = logger.info(args![payload.as_str()]).unwrap();
    let second = logger.log("audit", args!["user", 42]).unwrap();
    logger.flush();

    let written = fs::read_to_string(&path).unwrap();
    assert_eq!(written, format!("{first}\n{second}\n"));

    let record: Value = serde_json::from_str(written.lines().next().unwrap()).unwrap();
    assert_eq!(record["messages"][0], payload.as_str());
    assert_eq!(second, "2024-08-10T09:12:52 AUDIT: user 42 ");
}

#[test]
fn reopening_appends() {
    let dir = TempDir::new().expect("failed to create a temporary directory");
    let path = dir.path().join("audit.log");
    fs::write(&path, "existing\n").unwrap();

    for _ in 0..2 {
        let logger = leanlog::builder()
            .env(|_: &str| None::<String>)
            .channel(
                "audit",
                ChannelOverride::default()
                    .transports(["file"])
                    .file_name(&path),
            )
            .build()
            .unwrap();
        logger.log("audit", args![generate_random_string()]).unwrap();
    }

    let written = fs::read_to_string(&path).unwrap();
    let lines: Vec<&str> = written.lines().collect();
    assert_eq!(lines.len(), 3);
    assert_eq!(lines[0], "existing");
}

#[test]
fn open_failures_are_trapped() {
    let dir = TempDir::new().expect("failed to create a temporary directory");
    // a directory where the file should be
    let path = dir.path().join("taken");
    fs::create_dir(&path).unwrap();

    let trap = Collect::default();
    let logger = leanlog::builder()
        .env(|_: &str| None::<String>)
        .trap(trap.clone())
        .channel(
            "audit",
            ChannelOverride::default()
                .transports(["file"])
                .file_name(&path),
        )
        .build()
        .unwrap();

    // the message is still rendered and returned
    assert!(logger.log("audit", args!["lost"]).is_some());
    assert_eq!(*trap.0.lock().unwrap(), ["failed to open file transport"]);
}
