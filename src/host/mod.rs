//! Host Context
//!
//! The boundary layer between the editor side and the compiled module.
//!
//! ```text
//! Editor ──► EditBridge ──► Host::notify ──► WatchManager ──► module callback
//!                               │                 │
//!                          ResourceRegistry   ErrorReporter ◄── module / bootstrap
//! ```
//!
//! One `Host` is constructed by the entry point and passed by reference to
//! both the editor integration and module initialization; dropping it ends
//! the session. Everything runs on one thread, so the registration table
//! needs no locking.
//!
//! # Module Structure
//!
//! - `registry` - Resource catalog and last known contents
//! - `watch` - Single-callback-per-name watch table
//! - `bridge` - Editor change events to notifications
//! - `reporter` - Error sink
//! - `state` - Lifecycle state
//! - `error` - Lifecycle errors

pub mod bridge;
pub mod error;
pub mod registry;
pub mod reporter;
pub mod state;
pub mod watch;

use std::time::Duration;

use rustc_hash::{FxHashMap, FxHashSet};

pub use bridge::EditBridge;
pub use error::HostError;
pub use registry::ResourceRegistry;
pub use reporter::{ErrorReporter, LogReporter, NullReporter};
pub use state::HostState;
pub use watch::{Delivery, WatchManager};

use watch::Callback;

use crate::module::Module;

/// Default bound on the module readiness handshake
pub const DEFAULT_INIT_TIMEOUT: Duration = Duration::from_secs(5);

pub struct Host {
    registry: ResourceRegistry,
    watches: WatchManager,
    reporter: Box<dyn ErrorReporter>,
    state: HostState,
    init_timeout: Duration,
    /// Callbacks displaced while a module starts, restored if it fails
    displaced: Option<FxHashMap<String, Callback>>,
}

impl Host {
    pub fn new(registry: ResourceRegistry, reporter: impl ErrorReporter + 'static) -> Self {
        Self {
            registry,
            watches: WatchManager::new(),
            reporter: Box::new(reporter),
            state: HostState::Uninitialized,
            init_timeout: DEFAULT_INIT_TIMEOUT,
            displaced: None,
        }
    }

    pub fn with_init_timeout(mut self, timeout: Duration) -> Self {
        self.init_timeout = timeout;
        self
    }

    // =========================================================================
    // Module-facing operations
    // =========================================================================

    /// Resource names in catalog order.
    pub fn list_resources(&self) -> Vec<String> {
        self.registry.list_resources()
    }

    /// Register or replace the change callback for `name`.
    pub fn watch<F>(&mut self, name: &str, callback: F)
    where
        F: FnMut(&str, &[u8]) -> anyhow::Result<()> + 'static,
    {
        let previous = self.watches.replace(name, Box::new(callback));
        self.record_displaced(name, previous);
    }

    /// `watch`, then deliver the current content right away if it is known.
    ///
    /// Matches what a module expects from a file watch: the first callback
    /// carries the file as it is now, later ones carry edits.
    pub fn subscribe<F>(&mut self, name: &str, callback: F) -> Delivery
    where
        F: FnMut(&str, &[u8]) -> anyhow::Result<()> + 'static,
    {
        self.watch(name, callback);
        match self.registry.content(name) {
            Some(content) => self.watches.notify(name, content, self.reporter.as_ref()),
            None => Delivery::Dropped,
        }
    }

    /// Remove the callback for `name`; unknown names are ignored.
    pub fn unwatch(&mut self, name: &str) {
        let previous = self.watches.remove(name);
        self.record_displaced(name, previous);
    }

    /// Keep the first callback a starting module displaces for each name.
    fn record_displaced(&mut self, name: &str, previous: Option<Callback>) {
        if let (Some(journal), Some(callback)) = (self.displaced.as_mut(), previous) {
            journal.entry(name.to_owned()).or_insert(callback);
        }
    }

    /// Surface a problem through the configured reporter.
    pub fn report(&self, message: &str) {
        self.reporter.report(message);
    }

    // =========================================================================
    // Editor-facing operations
    // =========================================================================

    /// Record new content for `name` and deliver it to its watcher, if any.
    ///
    /// Callback failures are reported, never returned.
    pub fn notify(&mut self, name: &str, content: &[u8]) -> Delivery {
        self.registry.update(name, content);
        self.watches.notify(name, content, self.reporter.as_ref())
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Run the module's entry point and move to `Running` once it completes.
    ///
    /// Failure or timeout is reported, the registrations in place before the
    /// attempt are restored, and the host stays `Uninitialized` so the
    /// caller may retry.
    pub async fn initialize<M: Module>(&mut self, module: &mut M) -> Result<(), HostError> {
        if self.state.is_running() {
            return Err(HostError::AlreadyRunning);
        }

        let module_name = module.name().to_owned();
        let watched_before: FxHashSet<String> = self.watches.watched().into_iter().collect();
        let timeout = self.init_timeout;

        crate::debug!("module"; "initializing {}", module_name);
        self.displaced = Some(FxHashMap::default());
        let outcome = tokio::time::timeout(timeout, module.start(self)).await;
        let displaced = self.displaced.take().unwrap_or_default();

        let error = match outcome {
            Ok(Ok(())) => {
                self.state = HostState::Running;
                crate::debug!("module"; "{} running ({} watchers)", module_name, self.watches.len());
                return Ok(());
            }
            Ok(Err(err)) => HostError::Init {
                module: module_name,
                reason: format!("{err:#}"),
            },
            Err(_) => HostError::InitTimeout {
                module: module_name,
                timeout,
            },
        };

        for name in self.watches.watched() {
            if !watched_before.contains(&name) {
                self.watches.remove(&name);
            }
        }
        for (name, callback) in displaced {
            if watched_before.contains(&name) {
                self.watches.replace(&name, callback);
            }
        }
        self.report(&error.to_string());
        Err(error)
    }

    pub fn state(&self) -> HostState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state.is_running()
    }

    pub fn registry(&self) -> &ResourceRegistry {
        &self.registry
    }

    pub fn is_watched(&self, name: &str) -> bool {
        self.watches.is_watched(name)
    }
}

impl std::fmt::Debug for Host {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Host")
            .field("registry", &self.registry)
            .field("watches", &self.watches)
            .field("state", &self.state)
            .field("init_timeout", &self.init_timeout)
            .finish_non_exhaustive()
    }
}
