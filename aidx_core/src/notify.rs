//! Change notification seam for the distribution server.
//!
//! After a successful index or unindex run the server must re-hash the
//! update directories whose contents changed. The jobs only know *which*
//! directory names they produced; the re-hashing itself belongs to the
//! server and is reached through this trait.

use std::collections::BTreeSet;
use tracing::info;

/// Receiver for "these update directories changed" notifications.
pub trait ChangeNotifier {
    /// Called once, after a job succeeds, with the names of the output
    /// directories it created.
    fn directories_changed(&self, names: &BTreeSet<String>);
}

/// Notifier that only logs the changed directories.
///
/// Used by the standalone CLI, where no server is attached.
#[derive(Debug, Default)]
pub struct LogNotifier;

impl ChangeNotifier for LogNotifier {
    fn directories_changed(&self, names: &BTreeSet<String>) {
        for name in names {
            info!(dir = %name, "update directory changed");
        }
    }
}

/// Notifier that discards notifications (for tests).
#[derive(Debug, Default)]
pub struct NullNotifier;

impl ChangeNotifier for NullNotifier {
    fn directories_changed(&self, _names: &BTreeSet<String>) {}
}

/// Test notifier that records every call.
#[cfg(test)]
pub(crate) struct RecordingNotifier {
    pub(crate) calls: std::cell::RefCell<Vec<BTreeSet<String>>>,
}

#[cfg(test)]
impl RecordingNotifier {
    pub(crate) fn new() -> Self {
        Self {
            calls: std::cell::RefCell::new(Vec::new()),
        }
    }
}

#[cfg(test)]
impl ChangeNotifier for RecordingNotifier {
    fn directories_changed(&self, names: &BTreeSet<String>) {
        self.calls.borrow_mut().push(names.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_notifier_captures_names() {
        let notifier = RecordingNotifier::new();
        let mut names = BTreeSet::new();
        names.insert("assets".to_string());
        notifier.directories_changed(&names);

        let calls = notifier.calls.borrow();
        assert_eq!(calls.len(), 1);
        assert!(calls[0].contains("assets"));
    }
}
