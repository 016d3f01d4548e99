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
use std::fs;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::LazyLock;
use std::sync::Mutex;
use std::sync::MutexGuard;
use std::sync::PoisonError;

use anyhow::Context;

use crate::ChannelConfig;
use crate::Error;
use crate::ErrorKind;
use crate::append::Append;
use crate::record::Envelope;

type Handle = Arc<Mutex<fs::File>>;

// Process-wide: every channel (and every logger) naming the same path shares one handle.
static HANDLES: LazyLock<Mutex<HashMap<PathBuf, Handle>>> =
    LazyLock::new(|| Mutex::new(HashMap::new()));

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

fn open(path: &Path) -> anyhow::Result<fs::File> {
    if let Some(dir) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
        fs::create_dir_all(dir).context("failed to create log directory")?;
    }
    OpenOptions::new()
        .append(true)
        .create(true)
        .open(path)
        .context("failed to open log file")
}

fn handle(path: &Path) -> Result<Handle, Error> {
    let mut handles = lock(&*HANDLES);
    if let Some(handle) = handles.get(path) {
        return Ok(handle.clone());
    }

    let file = open(path).map_err(|err| {
        Error::new(ErrorKind::Io, "failed to open file transport")
            .with_context("path", path.display())
            .with_source(err)
    })?;
    let handle = Arc::new(Mutex::new(file));
    handles.insert(path.to_path_buf(), handle.clone());
    Ok(handle)
}

// Every item is flushed even if an earlier one fails; the first failure is returned.
fn flush_each<T>(
    items: impl IntoIterator<Item = T>,
    mut flush: impl FnMut(T) -> Result<(), Error>,
) -> Result<(), Error> {
    let mut first = None;
    for item in items {
        if let Err(err) = flush(item) {
            first.get_or_insert(err);
        }
    }
    first.map_or(Ok(()), Err)
}

#[cfg(test)]
pub(crate) fn open_handles(path: &Path) -> usize {
    lock(&*HANDLES).keys().filter(|p| p.as_path() == path).count()
}

/// A transport that appends messages, one per line, to the channel's `fileName`.
///
/// The file is opened in append mode on first use, and its parent directory is created if
/// missing. Open handles are cached for the life of the process, keyed by path.
///
/// # Examples
///
/// ```
/// use leanlog::ChannelOverride;
///
/// let audit = ChannelOverride::default()
///     .transports(["file"])
///     .file_name("/var/log/app/audit.log");
/// ```
#[derive(Default, Debug)]
#[non_exhaustive]
pub struct File {}

impl Append for File {
    fn check(&self, channel: &str, config: &ChannelConfig) -> Result<(), Error> {
        match config.file_name {
            Some(_) => Ok(()),
            None => Err(Error::config("file transport requires a file name")
                .with_context("channel", channel)
                .with_context("fileName", "missing")),
        }
    }

    fn append(&self, envelope: &Envelope, message: &str) -> Result<(), Error> {
        let path = envelope.file_name().ok_or_else(|| {
            Error::config("file transport requires a file name")
                .with_context("channel", envelope.channel())
        })?;

        let handle = handle(path)?;
        let mut line = String::with_capacity(message.len() + 1);
        line.push_str(message);
        line.push('\n');

        let mut file = lock(&*handle);
        file.write_all(line.as_bytes()).map_err(|err| {
            Error::from_io_error(err).with_context("path", path.display())
        })
    }

    fn flush(&self) -> Result<(), Error> {
        let handles: Vec<(PathBuf, Handle)> = lock(&*HANDLES)
            .iter()
            .map(|(path, handle)| (path.clone(), handle.clone()))
            .collect();
        flush_each(handles, |(path, handle)| {
            lock(&*handle)
                .flush()
                .map_err(|err| Error::from_io_error(err).with_context("path", path.display()))
        })
    }
}
