//! Directory Source
//!
//! Serves the resource catalog from a directory and turns on-disk edits of
//! resource files into change events for the host loop.
//!
//! ```text
//! notify watcher ──► watcher thread (filter + read) ──► mpsc ──► host loop
//! ```
//!
//! The watcher starts in `new`, so edits made while the module initializes
//! are buffered rather than lost. Only owned values cross the thread
//! boundary; the host itself never leaves the loop's thread.

mod filter;

pub use filter::{EventFilter, is_temp_file};

use std::path::{Path, PathBuf};

use notify::{RecommendedWatcher, RecursiveMode, Watcher};
use thiserror::Error;
use tokio::sync::mpsc;

/// Channel buffer size
const CHANNEL_BUFFER: usize = 64;

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("resource directory `{0}` does not exist")]
    MissingRoot(PathBuf),

    #[error("failed to watch `{0}`")]
    Watch(PathBuf, #[source] notify::Error),
}

/// Full new content of one resource
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceChange {
    pub name: String,
    pub content: Vec<u8>,
}

/// What the watcher thread delivers to the host loop
#[derive(Debug, PartialEq, Eq)]
pub enum SourceEvent {
    Changed(ResourceChange),
    /// Watcher or read failure, to be reported
    Error(String),
}

pub struct DirectorySource {
    root: PathBuf,
    filter: EventFilter,
    /// Channel fed by notify (sync callback)
    notify_rx: std::sync::mpsc::Receiver<notify::Result<notify::Event>>,
    /// Watcher handle (must be kept alive)
    _watcher: RecommendedWatcher,
}

impl DirectorySource {
    /// Start watching `root` (non-recursive) for edits of `names`.
    pub fn new<I>(root: &Path, names: I, ignore_temp: bool) -> Result<Self, SourceError>
    where
        I: IntoIterator<Item = String>,
    {
        if !root.is_dir() {
            return Err(SourceError::MissingRoot(root.to_path_buf()));
        }

        let (notify_tx, notify_rx) = std::sync::mpsc::channel();
        let mut watcher = notify::recommended_watcher(move |res| {
            let _ = notify_tx.send(res);
        })
        .map_err(|e| SourceError::Watch(root.to_path_buf(), e))?;

        watcher
            .watch(root, RecursiveMode::NonRecursive)
            .map_err(|e| SourceError::Watch(root.to_path_buf(), e))?;

        Ok(Self {
            root: root.to_path_buf(),
            filter: EventFilter::new(names, ignore_temp),
            notify_rx,
            _watcher: watcher,
        })
    }

    /// Mark content the host already holds, so saving it unchanged is quiet.
    pub fn seed(&mut self, name: &str, content: &[u8]) {
        self.filter.seed(name, content);
    }

    /// Move the watcher onto its own thread and return the event stream.
    ///
    /// The stream ends when the watcher stops or the receiver is dropped.
    pub fn spawn(self) -> mpsc::Receiver<SourceEvent> {
        let (tx, rx) = mpsc::channel(CHANNEL_BUFFER);

        std::thread::spawn(move || {
            let Self {
                root,
                mut filter,
                notify_rx,
                _watcher,
            } = self;
            pump(&root, &mut filter, &notify_rx, &tx);
        });

        rx
    }
}

/// Forward watcher results until the watcher stops or the receiver is dropped.
fn pump(
    root: &Path,
    filter: &mut EventFilter,
    notify_rx: &std::sync::mpsc::Receiver<notify::Result<notify::Event>>,
    tx: &mpsc::Sender<SourceEvent>,
) {
    while let Ok(result) = notify_rx.recv() {
        let events = match result {
            Ok(event) => {
                crate::debug!("watch"; "raw notify: {:?} {:?}", event.kind, event.paths);
                read_changes(root, filter, &event)
            }
            Err(e) => vec![SourceEvent::Error(format!("watch error: {e}"))],
        };

        for event in events {
            if tx.blocking_send(event).is_err() {
                return; // Receiver dropped
            }
        }
    }
}

/// Read every resource touched by `event`, skipping unchanged content.
fn read_changes(root: &Path, filter: &mut EventFilter, event: &notify::Event) -> Vec<SourceEvent> {
    filter
        .changed_names(event)
        .into_iter()
        .filter_map(|name| {
            let path = root.join(&name);
            match std::fs::read(&path) {
                Ok(content) if filter.is_fresh(&name, &content) => {
                    Some(SourceEvent::Changed(ResourceChange { name, content }))
                }
                Ok(_) => {
                    crate::debug!("watch"; "unchanged: {}", name);
                    None
                }
                // Transient during atomic saves; the rename event follows
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
                Err(e) => Some(SourceEvent::Error(format!(
                    "failed to read `{}`: {e}",
                    path.display()
                ))),
            }
        })
        .collect()
}
