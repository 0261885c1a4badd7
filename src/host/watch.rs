//! Watch Manager
//!
//! Name-keyed table of change callbacks. Each resource name holds at most one
//! callback: registering again replaces the previous one.
//!
//! ```text
//! watch(name, cb) ──► table[name] = cb        (last registration wins)
//! unwatch(name)   ──► table.remove(name)      (absent name: no-op)
//! notify(name, c) ──► table[name](name, c)    (absent name: dropped)
//!                         │
//!                         └─ Err / panic ──► ErrorReporter
//! ```

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

use rustc_hash::FxHashMap;

use super::reporter::ErrorReporter;

/// Change callback: receives the resource name and its full new content.
pub type Callback = Box<dyn FnMut(&str, &[u8]) -> anyhow::Result<()>>;

/// Outcome of a single notification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    /// Callback ran and returned `Ok`
    Delivered,
    /// Callback returned `Err` or panicked; the failure was reported
    Failed,
    /// No callback registered for the name
    Dropped,
}

#[derive(Default)]
pub struct WatchManager {
    callbacks: FxHashMap<String, Callback>,
}

impl WatchManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `callback` for `name`, replacing any previous registration.
    pub fn watch<F>(&mut self, name: &str, callback: F)
    where
        F: FnMut(&str, &[u8]) -> anyhow::Result<()> + 'static,
    {
        self.replace(name, Box::new(callback));
    }

    /// Install `callback` for `name` and return the one it displaced.
    pub fn replace(&mut self, name: &str, callback: Callback) -> Option<Callback> {
        let previous = self.callbacks.insert(name.to_owned(), callback);
        if previous.is_some() {
            crate::debug!("watch"; "replaced watcher for {}", name);
        }
        previous
    }

    /// Remove the registration for `name`, if any.
    pub fn unwatch(&mut self, name: &str) {
        self.remove(name);
    }

    /// Remove and return the callback for `name`.
    pub fn remove(&mut self, name: &str) -> Option<Callback> {
        let previous = self.callbacks.remove(name);
        if previous.is_some() {
            crate::debug!("watch"; "unwatched {}", name);
        }
        previous
    }

    /// Deliver `content` to the callback registered for `name`.
    ///
    /// Never fails: callback errors and panics go to `reporter` and the
    /// registration stays in place.
    pub fn notify(&mut self, name: &str, content: &[u8], reporter: &dyn ErrorReporter) -> Delivery {
        let Some(callback) = self.callbacks.get_mut(name) else {
            return Delivery::Dropped;
        };

        match panic::catch_unwind(AssertUnwindSafe(|| callback(name, content))) {
            Ok(Ok(())) => Delivery::Delivered,
            Ok(Err(err)) => {
                reporter.report(&format!("watcher for `{name}` failed: {err:#}"));
                Delivery::Failed
            }
            Err(payload) => {
                reporter.report(&format!(
                    "watcher for `{name}` panicked: {}",
                    panic_message(payload.as_ref())
                ));
                Delivery::Failed
            }
        }
    }

    pub fn is_watched(&self, name: &str) -> bool {
        self.callbacks.contains_key(name)
    }

    /// Registered names, unordered.
    pub fn watched(&self) -> Vec<String> {
        self.callbacks.keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.callbacks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.callbacks.is_empty()
    }

    pub fn clear(&mut self) {
        self.callbacks.clear();
    }
}

impl std::fmt::Debug for WatchManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WatchManager")
            .field("watched", &self.callbacks.keys().collect::<Vec<_>>())
            .finish()
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
