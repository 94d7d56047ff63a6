//! The toolkit handle: process-wide key tables plus configuration.
//!
//! Every registry and window manager holds a clone of the same [`Toolkit`];
//! clones share the key recognizer and key names. Create one with
//! [`Toolkit::init`] at startup and call [`Toolkit::shutdown`] when done.

use std::fmt;
use std::sync::Arc;

use parking_lot::{RwLock, RwLockReadGuard};
use tessera_core::logging::targets;
use tessera_style::StyleConfig;

use crate::key::{KeyNames, KeyRecognizer, SharedKeyRecognizer};

/// Shared handle to the toolkit's process-wide state.
#[derive(Clone)]
pub struct Toolkit {
    recognizer: SharedKeyRecognizer,
    names: Arc<RwLock<KeyNames>>,
    config: Arc<StyleConfig>,
}

impl Default for Toolkit {
    fn default() -> Self {
        Self::init(StyleConfig::default())
    }
}

impl fmt::Debug for Toolkit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Toolkit")
            .field("triggers_empty", &self.recognizer.read().is_empty())
            .field("general", self.config.general())
            .finish_non_exhaustive()
    }
}

impl Toolkit {
    /// Initialise the toolkit with a configuration.
    pub fn init(config: StyleConfig) -> Self {
        tracing::debug!(
            target: targets::KEYS,
            workspaces = config.workspaces().len(),
            "toolkit initialised"
        );
        Self {
            recognizer: KeyRecognizer::shared(),
            names: Arc::new(RwLock::new(KeyNames::xterm())),
            config: Arc::new(config),
        }
    }

    /// Tear down the shared key tables.
    ///
    /// Registries still alive after this call release nothing further.
    pub fn shutdown(self) {
        self.recognizer.write().clear();
        tracing::debug!(target: targets::KEYS, "toolkit shut down");
    }

    /// The recognizer of every bound trigger.
    pub fn recognizer(&self) -> &SharedKeyRecognizer {
        &self.recognizer
    }

    /// Read access to the key-name table.
    pub fn names(&self) -> RwLockReadGuard<'_, KeyNames> {
        self.names.read()
    }

    /// Override the sequence of a named key (from terminal capabilities).
    pub fn set_key_sequence(&self, name: &str, sequence: &[u8]) {
        self.names.write().set_sequence(name, sequence);
    }

    pub fn config(&self) -> &StyleConfig {
        &self.config
    }

    /// Human-readable key name to trigger bytes.
    pub fn translate(&self, human: &str) -> Option<Vec<u8>> {
        self.names.read().translate(human)
    }

    /// Trigger bytes to a human-readable key name.
    pub fn lookup(&self, trigger: &[u8]) -> Option<String> {
        self.names.read().lookup(trigger)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clones_share_recognizer() {
        let toolkit = Toolkit::default();
        let other = toolkit.clone();
        toolkit.recognizer().write().add(b"\x01");
        assert!(other.recognizer().read().contains(b"\x01"));
        other.shutdown();
        assert!(toolkit.recognizer().read().is_empty());
    }

    #[test]
    fn test_key_sequence_override() {
        let toolkit = Toolkit::default();
        toolkit.set_key_sequence("home", b"\x1b[1~");
        assert_eq!(toolkit.translate("home"), Some(b"\x1b[1~".to_vec()));
        assert_eq!(toolkit.lookup(b"\x1b[1~").as_deref(), Some("home"));
    }
}
