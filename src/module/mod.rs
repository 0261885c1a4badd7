//! Compiled module contract.
//!
//! A module is started once by [`Host::initialize`]. During `start` it lists
//! the resources it needs and registers watchers; completing the returned
//! future is the readiness signal.
//!
//! - `shader` - Shader/texture consumer used by the `watch` command

pub mod shader;

pub use shader::ShaderModule;

use crate::host::Host;

#[allow(async_fn_in_trait)]
pub trait Module {
    /// Name used in diagnostics
    fn name(&self) -> &str;

    /// Entry point. Errors leave the host uninitialized.
    async fn start(&mut self, host: &mut Host) -> anyhow::Result<()>;
}
