//! Longest-prefix matching of raw input bytes against bound triggers.

use std::collections::BTreeMap;
use std::sync::Arc;

use parking_lot::RwLock;
use tessera_core::logging::targets;

/// The recognizer shared by every binding registry of a toolkit instance.
pub type SharedKeyRecognizer = Arc<RwLock<KeyRecognizer>>;

/// Outcome of classifying a (possibly incomplete) input buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyMatch {
    /// The first `len` bytes are a registered trigger.
    ///
    /// `extendable` is set when the whole input is itself a prefix of some
    /// longer trigger, so more bytes could change the answer.
    Exact { len: usize, extendable: bool },
    /// The whole input is a proper prefix of a registered trigger, and no
    /// prefix of it is a trigger itself.
    Pending,
    /// No registered trigger starts the input.
    NoMatch,
}

impl KeyMatch {
    /// Whether more input could still change the outcome.
    pub fn wants_more(self) -> bool {
        matches!(self, KeyMatch::Pending | KeyMatch::Exact { extendable: true, .. })
    }

    /// Combine the answers of two recognizers over the same input.
    pub fn union(self, other: KeyMatch) -> KeyMatch {
        match (self, other) {
            (KeyMatch::NoMatch, m) | (m, KeyMatch::NoMatch) => m,
            (KeyMatch::Pending, KeyMatch::Pending) => KeyMatch::Pending,
            (KeyMatch::Pending, KeyMatch::Exact { len, .. }) | (KeyMatch::Exact { len, .. }, KeyMatch::Pending) => {
                KeyMatch::Exact { len, extendable: true }
            }
            (
                KeyMatch::Exact { len: a, extendable: ea },
                KeyMatch::Exact { len: b, extendable: eb },
            ) => KeyMatch::Exact {
                len: a.max(b),
                extendable: ea || eb,
            },
        }
    }
}

#[derive(Debug, Default, Clone)]
struct TrieNode {
    children: BTreeMap<u8, usize>,
    /// References to the trigger ending exactly here.
    terminal: usize,
    /// References to triggers ending here or below.
    weight: usize,
}

/// A reference-counted prefix tree over trigger byte strings.
///
/// Each `add` of a trigger must be balanced by a `remove`; a trigger stays
/// recognised while at least one reference remains.
///
/// # Example
///
/// ```
/// use tessera::key::{KeyMatch, KeyRecognizer};
///
/// let mut keys = KeyRecognizer::new();
/// keys.add(b"\x1b[A");
/// keys.add(b"\x1b");
///
/// assert_eq!(keys.match_prefix(b"\x1b[Axyz"), 3);
/// assert_eq!(keys.classify(b"\x1b"), KeyMatch::Exact { len: 1, extendable: true });
/// assert_eq!(keys.classify(b"\x1b["), KeyMatch::Exact { len: 1, extendable: true });
/// assert_eq!(keys.classify(b"q"), KeyMatch::NoMatch);
/// ```
#[derive(Debug, Clone)]
pub struct KeyRecognizer {
    nodes: Vec<TrieNode>,
}

impl Default for KeyRecognizer {
    fn default() -> Self {
        Self::new()
    }
}

impl KeyRecognizer {
    /// Create an empty recognizer.
    pub fn new() -> Self {
        Self {
            nodes: vec![TrieNode::default()],
        }
    }

    /// Create a recognizer wrapped for sharing.
    pub fn shared() -> SharedKeyRecognizer {
        Arc::new(RwLock::new(Self::new()))
    }

    /// Add one reference to `trigger`. Empty triggers are ignored.
    pub fn add(&mut self, trigger: &[u8]) {
        if trigger.is_empty() {
            return;
        }
        let mut index = 0;
        self.nodes[0].weight += 1;
        for &byte in trigger {
            index = match self.nodes[index].children.get(&byte) {
                Some(&child) => child,
                None => {
                    self.nodes.push(TrieNode::default());
                    let child = self.nodes.len() - 1;
                    self.nodes[index].children.insert(byte, child);
                    child
                }
            };
            self.nodes[index].weight += 1;
        }
        self.nodes[index].terminal += 1;
        tracing::trace!(target: targets::KEYS, ?trigger, refs = self.nodes[index].terminal, "trigger added");
    }

    /// Drop one reference to `trigger`. Returns `false` if it was not present.
    pub fn remove(&mut self, trigger: &[u8]) -> bool {
        let Some(path) = self.path(trigger) else {
            return false;
        };
        let Some(&end) = path.last() else {
            return false;
        };
        if self.nodes[end].terminal == 0 {
            return false;
        }
        self.nodes[end].terminal -= 1;
        self.nodes[0].weight -= 1;
        for index in path {
            self.nodes[index].weight -= 1;
        }
        tracing::trace!(target: targets::KEYS, ?trigger, refs = self.nodes[end].terminal, "trigger released");
        true
    }

    /// Remove every trigger.
    pub fn clear(&mut self) {
        *self = Self::new();
    }

    /// Node indices along `trigger`, excluding the root.
    fn path(&self, trigger: &[u8]) -> Option<Vec<usize>> {
        if trigger.is_empty() {
            return None;
        }
        let mut index = 0;
        let mut path = Vec::with_capacity(trigger.len());
        for byte in trigger {
            index = *self.nodes[index].children.get(byte)?;
            if self.nodes[index].weight == 0 {
                return None;
            }
            path.push(index);
        }
        Some(path)
    }

    /// Whether `trigger` is currently registered.
    pub fn contains(&self, trigger: &[u8]) -> bool {
        self.refcount(trigger) > 0
    }

    /// The number of outstanding references to `trigger`.
    pub fn refcount(&self, trigger: &[u8]) -> usize {
        self.path(trigger)
            .and_then(|path| path.last().map(|&end| self.nodes[end].terminal))
            .unwrap_or(0)
    }

    /// Whether no trigger is registered.
    pub fn is_empty(&self) -> bool {
        self.nodes[0].weight == 0
    }

    /// Length of the longest prefix of `input` that is a registered
    /// trigger, or 0.
    pub fn match_prefix(&self, input: &[u8]) -> usize {
        self.walk(input).0
    }

    /// Classify `input`, which may be an incomplete key sequence.
    pub fn classify(&self, input: &[u8]) -> KeyMatch {
        let (longest, end) = self.walk(input);
        let extends = end.is_some_and(|node| {
            let node = &self.nodes[node];
            node.weight > node.terminal
        });

        match (longest, extends) {
            (0, _) if input.is_empty() => KeyMatch::NoMatch,
            (len, true) if len == input.len() => KeyMatch::Exact { len, extendable: true },
            (_, true) if longest == 0 => KeyMatch::Pending,
            (len, true) => KeyMatch::Exact { len, extendable: true },
            (0, false) => KeyMatch::NoMatch,
            (len, false) => KeyMatch::Exact { len, extendable: false },
        }
    }

    /// Walk `input` through the trie. Returns the longest terminal depth and,
    /// if every byte was consumed, the node reached.
    fn walk(&self, input: &[u8]) -> (usize, Option<usize>) {
        let mut index = 0;
        let mut longest = 0;
        for (depth, byte) in input.iter().enumerate() {
            match self.nodes[index].children.get(byte) {
                Some(&child) if self.nodes[child].weight > 0 => index = child,
                _ => return (longest, None),
            }
            if self.nodes[index].terminal > 0 {
                longest = depth + 1;
            }
        }
        (longest, Some(index))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_match_prefix_longest() {
        let mut keys = KeyRecognizer::new();
        keys.add(b"ab");
        keys.add(b"abcd");
        assert_eq!(keys.match_prefix(b"abc"), 2);
        assert_eq!(keys.match_prefix(b"abcde"), 4);
        assert_eq!(keys.match_prefix(b"x"), 0);
    }

    #[test]
    fn test_classify_pending_and_exact() {
        let mut keys = KeyRecognizer::new();
        keys.add(b"\x1b[A");
        assert_eq!(keys.classify(b"\x1b"), KeyMatch::Pending);
        assert_eq!(keys.classify(b"\x1b["), KeyMatch::Pending);
        assert_eq!(keys.classify(b"\x1b[A"), KeyMatch::Exact { len: 3, extendable: false });
        assert_eq!(keys.classify(b"\x1b[Ax"), KeyMatch::Exact { len: 3, extendable: false });
        assert_eq!(keys.classify(b"\x1b[B"), KeyMatch::NoMatch);
        assert_eq!(keys.classify(b""), KeyMatch::NoMatch);
    }

    #[test]
    fn test_exact_inside_longer_pending_input() {
        let mut keys = KeyRecognizer::new();
        keys.add(b"\x1b");
        keys.add(b"\x1b[A");
        assert_eq!(keys.classify(b"\x1b[B"), KeyMatch::Exact { len: 1, extendable: false });
        assert!(keys.classify(b"\x1b[").wants_more());
    }

    #[test]
    fn test_refcounted_removal() {
        let mut keys = KeyRecognizer::new();
        keys.add(b"\x07");
        keys.add(b"\x07");
        assert_eq!(keys.refcount(b"\x07"), 2);
        assert!(keys.remove(b"\x07"));
        assert!(keys.contains(b"\x07"));
        assert!(keys.remove(b"\x07"));
        assert!(!keys.contains(b"\x07"));
        assert!(!keys.remove(b"\x07"));
        assert!(keys.is_empty());
    }

    #[test]
    fn test_removed_branch_no_longer_pending() {
        let mut keys = KeyRecognizer::new();
        keys.add(b"abc");
        keys.remove(b"abc");
        assert_eq!(keys.classify(b"ab"), KeyMatch::NoMatch);
        assert_eq!(keys.match_prefix(b"abc"), 0);
    }

    #[test]
    fn test_union() {
        let pending = KeyMatch::Pending;
        let exact = KeyMatch::Exact { len: 1, extendable: false };
        assert_eq!(pending.union(exact), KeyMatch::Exact { len: 1, extendable: true });
        assert_eq!(KeyMatch::NoMatch.union(exact), exact);
        assert_eq!(KeyMatch::NoMatch.union(KeyMatch::NoMatch), KeyMatch::NoMatch);
    }
}
