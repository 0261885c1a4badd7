//! Host lifecycle errors.

use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum HostError {
    #[error("host is already running, re-initialization is not supported")]
    AlreadyRunning,

    #[error("module `{module}` failed to initialize: {reason}")]
    Init { module: String, reason: String },

    #[error("module `{module}` did not signal readiness within {}ms", .timeout.as_millis())]
    InitTimeout { module: String, timeout: Duration },
}
