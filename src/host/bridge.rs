//! Edit Bridge
//!
//! Turns editor change events into resource notifications. Every change
//! forwards the whole document (no diffs) exactly once, in event order.

use super::Host;
use super::watch::Delivery;

/// Resource edited when nothing else is configured
pub const DEFAULT_DOCUMENT: &str = "shader.wgsl";

#[derive(Debug, Clone)]
pub struct EditBridge {
    /// Resource name the editor document maps to
    resource: String,
    /// Change events forwarded so far
    forwarded: u64,
}

impl EditBridge {
    pub fn new(resource: impl Into<String>) -> Self {
        Self {
            resource: resource.into(),
            forwarded: 0,
        }
    }

    pub fn resource(&self) -> &str {
        &self.resource
    }

    /// Forward the full current document to the watcher of the bridged resource.
    pub fn document_changed(&mut self, host: &mut Host, document: &str) -> Delivery {
        let encoded = document.as_bytes();
        self.forwarded += 1;
        crate::debug!("bridge"; "{} changed ({} bytes)", self.resource, encoded.len());
        host.notify(&self.resource, encoded)
    }

    pub fn changes_forwarded(&self) -> u64 {
        self.forwarded
    }
}

impl Default for EditBridge {
    fn default() -> Self {
        Self::new(DEFAULT_DOCUMENT)
    }
}
