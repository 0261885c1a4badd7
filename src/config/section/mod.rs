//! Configuration sections of `toolbox.toml`.
//!
//! | Section       | Purpose                                     |
//! |---------------|---------------------------------------------|
//! | `[resources]` | Resource catalog and its directory          |
//! | `[bridge]`    | Resource the editor document maps to        |
//! | `[module]`    | Module initialization bounds                |
//! | `[watch]`     | Filesystem watching                         |

mod bridge;
mod module;
mod resources;
mod watch;

pub use bridge::BridgeConfig;
pub use module::ModuleConfig;
pub use resources::ResourcesConfig;
pub use watch::WatchConfig;
