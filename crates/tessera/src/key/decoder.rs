//! Splitting the terminal byte stream into keys.

use tessera_core::logging::targets;

use super::recognizer::{KeyMatch, KeyRecognizer};

/// Incremental key decoder.
///
/// Bytes arrive in arbitrary chunks. The decoder cuts them into keys using
/// the bound triggers (and the named key sequences as a fallback), holding
/// back a tail that could still grow into a longer trigger. The caller arms
/// an escape-delay timer while [`has_pending`](Self::has_pending) is true and
/// calls [`flush`](Self::flush) when it fires.
///
/// Input no trigger claims is delivered one UTF-8 character at a time.
#[derive(Debug, Default, Clone)]
pub struct KeyDecoder {
    pending: Vec<u8>,
}

impl KeyDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether an ambiguous tail is being held back.
    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }

    /// The bytes currently held back.
    pub fn pending(&self) -> &[u8] {
        &self.pending
    }

    /// Feed bytes and return every key that is now complete.
    pub fn feed(&mut self, bytes: &[u8], bound: &KeyRecognizer, named: &KeyRecognizer) -> Vec<Vec<u8>> {
        self.pending.extend_from_slice(bytes);
        self.drain(bound, named, false)
    }

    /// Resolve the held-back tail as if no more bytes will follow.
    pub fn flush(&mut self, bound: &KeyRecognizer, named: &KeyRecognizer) -> Vec<Vec<u8>> {
        self.drain(bound, named, true)
    }

    fn drain(&mut self, bound: &KeyRecognizer, named: &KeyRecognizer, flushing: bool) -> Vec<Vec<u8>> {
        let mut keys = Vec::new();
        while !self.pending.is_empty() {
            let found = bound.classify(&self.pending).union(named.classify(&self.pending));
            if found.wants_more() && !flushing {
                break;
            }
            let len = match found {
                KeyMatch::Exact { len, .. } => len,
                KeyMatch::Pending | KeyMatch::NoMatch => match char_len(&self.pending) {
                    Some(len) => len,
                    None if flushing => 1,
                    // An incomplete UTF-8 character: wait for the rest.
                    None if utf8_incomplete(&self.pending) => break,
                    None => 1,
                },
            };
            let key: Vec<u8> = self.pending.drain(..len).collect();
            tracing::trace!(target: targets::KEYS, ?key, "key decoded");
            keys.push(key);
        }
        keys
    }
}

/// Byte length of the complete UTF-8 character at the start of `bytes`.
fn char_len(bytes: &[u8]) -> Option<usize> {
    let width = match bytes.first()? {
        0x00..=0x7f => 1,
        0xc2..=0xdf => 2,
        0xe0..=0xef => 3,
        0xf0..=0xf4 => 4,
        _ => return None,
    };
    let chunk = bytes.get(..width)?;
    std::str::from_utf8(chunk).ok().map(|_| width)
}

fn utf8_incomplete(bytes: &[u8]) -> bool {
    matches!(
        std::str::from_utf8(bytes),
        Err(e) if e.valid_up_to() == 0 && e.error_len().is_none()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::key::KeyNames;

    fn setup() -> (KeyRecognizer, KeyNames) {
        let mut bound = KeyRecognizer::new();
        bound.add(b"\x1bn");
        (bound, KeyNames::default())
    }

    #[test]
    fn test_splits_keys_and_text() {
        let (bound, names) = setup();
        let mut decoder = KeyDecoder::new();
        let keys = decoder.feed(b"a\x1bn\x1b[Bz", &bound, names.sequences());
        assert_eq!(
            keys,
            vec![b"a".to_vec(), b"\x1bn".to_vec(), b"\x1b[B".to_vec(), b"z".to_vec()]
        );
        assert!(!decoder.has_pending());
    }

    #[test]
    fn test_holds_ambiguous_escape() {
        let (bound, names) = setup();
        let mut decoder = KeyDecoder::new();
        assert!(decoder.feed(b"\x1b", &bound, names.sequences()).is_empty());
        assert!(decoder.has_pending());
        assert_eq!(decoder.feed(b"n", &bound, names.sequences()), vec![b"\x1bn".to_vec()]);
    }

    #[test]
    fn test_flush_delivers_lone_escape() {
        let (bound, names) = setup();
        let mut decoder = KeyDecoder::new();
        decoder.feed(b"\x1b", &bound, names.sequences());
        assert_eq!(decoder.flush(&bound, names.sequences()), vec![b"\x1b".to_vec()]);
        assert!(!decoder.has_pending());
    }

    #[test]
    fn test_partial_csi_flushes_as_escape_then_text() {
        let (bound, names) = setup();
        let mut decoder = KeyDecoder::new();
        assert!(decoder.feed(b"\x1b[", &bound, names.sequences()).is_empty());
        assert_eq!(
            decoder.flush(&bound, names.sequences()),
            vec![b"\x1b".to_vec(), b"[".to_vec()]
        );
    }

    #[test]
    fn test_utf8_split_across_reads() {
        let (bound, names) = setup();
        let mut decoder = KeyDecoder::new();
        let bytes = "é".as_bytes();
        assert!(decoder.feed(&bytes[..1], &bound, names.sequences()).is_empty());
        assert_eq!(decoder.feed(&bytes[1..], &bound, names.sequences()), vec![bytes.to_vec()]);
    }
}
