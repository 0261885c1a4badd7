//! Host lifecycle state.
//!
//! ```text
//! Uninitialized ──(module start succeeds)──► Running
//!       ▲    │
//!       └────┘ (start fails or times out: reported, stays)
//! ```
//!
//! There is no way back from `Running`; dropping the host ends the session.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HostState {
    /// Module entry point not yet completed
    #[default]
    Uninitialized,
    /// Module initialized and receiving notifications
    Running,
}

impl HostState {
    pub const fn is_running(self) -> bool {
        matches!(self, Self::Running)
    }
}
