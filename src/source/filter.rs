//! Event filtering: which notify events carry a resource edit.

use std::path::Path;

use notify::EventKind;
use notify::event::{AccessKind, AccessMode, ModifyKind, RenameMode};
use rustc_hash::{FxHashMap, FxHashSet};

/// Check if path is a temp/backup file (editor artifacts)
pub fn is_temp_file(path: &Path) -> bool {
    let name = path.file_name().and_then(|n| n.to_str()).unwrap_or("");
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");

    matches!(ext, "bck" | "bak" | "backup" | "swp" | "swo" | "tmp")
        || name.ends_with('~')
        || name.starts_with('.')
}

/// Backends that report close-after-write (inotify). Elsewhere a data
/// write is the only signal a save happened.
const REPORTS_CLOSE_WRITE: bool = cfg!(any(target_os = "linux", target_os = "android"));

/// Whether an event kind means a complete new version of a file.
///
/// A data write can be observed while the file is still truncated, so with
/// close-after-write available only that and a rename into place (atomic
/// save) count. Metadata changes and removals never do; resources are not
/// deleted during a session.
fn is_content_event(kind: &EventKind) -> bool {
    match kind {
        EventKind::Access(AccessKind::Close(AccessMode::Write)) => true,
        EventKind::Modify(ModifyKind::Name(RenameMode::To | RenameMode::Both)) => true,
        EventKind::Modify(ModifyKind::Metadata(_) | ModifyKind::Name(_)) => false,
        EventKind::Create(_) | EventKind::Modify(_) => !REPORTS_CLOSE_WRITE,
        _ => false,
    }
}

/// Maps raw watcher events to catalog names and drops repeated content.
#[derive(Debug)]
pub struct EventFilter {
    names: FxHashSet<String>,
    ignore_temp: bool,
    /// blake3 of the last forwarded content per name
    fingerprints: FxHashMap<String, blake3::Hash>,
}

impl EventFilter {
    pub fn new<I>(names: I, ignore_temp: bool) -> Self
    where
        I: IntoIterator<Item = String>,
    {
        Self {
            names: names.into_iter().collect(),
            ignore_temp,
            fingerprints: FxHashMap::default(),
        }
    }

    /// Record content already known to the host so an unchanged save is
    /// not forwarded.
    pub fn seed(&mut self, name: &str, content: &[u8]) {
        self.fingerprints
            .insert(name.to_owned(), blake3::hash(content));
    }

    /// Catalog names touched by `event`, in path order, without repeats.
    pub fn changed_names(&self, event: &notify::Event) -> Vec<String> {
        if !is_content_event(&event.kind) {
            return Vec::new();
        }

        let mut names: Vec<String> = Vec::new();
        for path in &event.paths {
            if self.ignore_temp && is_temp_file(path) {
                continue;
            }
            let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            if self.names.contains(name) && !names.iter().any(|n| n == name) {
                names.push(name.to_owned());
            }
        }
        names
    }

    /// Whether `content` differs from what was last forwarded for `name`.
    /// Records it when it does.
    pub fn is_fresh(&mut self, name: &str, content: &[u8]) -> bool {
        let hash = blake3::hash(content);
        match self.fingerprints.get(name) {
            Some(previous) if *previous == hash => false,
            _ => {
                self.fingerprints.insert(name.to_owned(), hash);
                true
            }
        }
    }
}
