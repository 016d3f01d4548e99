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

//! Leanlog is a channel-based structured logging facade.
//!
//! # Overview
//!
//! Callers write to named channels such as `info`, `error` or `request`. Whether a channel emits,
//! at which severity, through which layout and to which transports is decided once, when the
//! [`Logger`] is built, from three sources applied in order:
//!
//! 1. the default channels `info`, `warn`, `error` and `fatal`;
//! 2. the caller's [`LoggerSettings`];
//! 3. the directive string in the `LOG` (or `LOGGER`, `LEANLOGGER`) environment variable, see
//!    [`env`].
//!
//! Every active channel gets a pipeline: a [`Layout`] renders the call into a message, then each
//! [`Append`] writes it. Failures during a call are reported to a [`Trap`] and never reach the
//! caller.
//!
//! # Examples
//!
//! ```
//! use leanlog::ChannelOverride;
//! use leanlog::LoggerSettings;
//! use serde_json::json;
//!
//! let settings = LoggerSettings::new()
//!     .channel("request", ChannelOverride::default().formatter("console"));
//! let logger = leanlog::create_logger(settings, None).unwrap();
//!
//! logger.info(leanlog::args!["listening", json!({ "port": 8080 })]);
//! logger.resolve("request").log(leanlog::args!["GET /health", 200]);
//! ```
//!
//! Directives, for example `LOG=-all,request,+fatal` or `LOG=warn+,module:*`:
//!
//! ```
//! let logger = leanlog::builder()
//!     .channel("request", true)
//!     .env(|name: &str| (name == "LOG").then(|| "-all,request,+fatal".to_owned()))
//!     .build()
//!     .unwrap();
//!
//! assert!(logger.resolve("request").is_active());
//! assert_eq!(logger.info(leanlog::args!["muted"]), None);
//! ```

#![cfg_attr(docsrs, feature(doc_auto_cfg))]

pub mod append;
pub mod bridge;
pub mod env;
pub mod layout;
pub mod trap;

mod clock;
mod config;
mod error;
mod logger;
mod pipeline;
mod record;
mod severity;

pub use self::append::Append;
pub use self::clock::Clock;
pub use self::config::ChannelConfig;
pub use self::config::ChannelOverride;
pub use self::config::DEFAULT_CHANNELS;
pub use self::config::LoggerConfig;
pub use self::config::LoggerSettings;
pub use self::env::Env;
pub use self::error::Error;
pub use self::error::ErrorKind;
pub use self::layout::Layout;
pub use self::logger::*;
pub use self::pipeline::Channel;
pub use self::pipeline::ChannelSelector;
pub use self::pipeline::Extension;
pub use self::pipeline::Mixin;
pub use self::record::Arg;
pub use self::record::Envelope;
pub use self::record::EnvelopeBuilder;
pub use self::severity::Severity;
pub use self::trap::Trap;
