//! Human-readable key names and the byte sequences they stand for.
//!
//! Configuration files and help screens talk about keys as `c-a`, `a-n`,
//! `shift-tab` or `f10`; bindings and the recognizer work on the raw bytes a
//! terminal sends. [`KeyNames`] converts between the two.
//!
//! # Naming rules
//!
//! - Named keys (`up`, `pageup`, `f1`, `enter`, ...) map to the sequence the
//!   capability layer reports; the defaults are xterm's.
//! - `c-<char>` is a control chord: the character's control byte
//!   (`c-a` is `\x01`, `c-_` is `\x1f`).
//! - `a-<name>` is a meta chord: an escape byte followed by `<name>`, which
//!   may itself be any key name (`a-c-g`, `a-shift-tab`, `a-T`).
//! - Any other single character stands for itself.

use std::collections::HashMap;

use tessera_core::logging::targets;

use super::recognizer::KeyRecognizer;

const ESC: u8 = 0x1b;

/// Named keys with their xterm sequences.
const XTERM_KEYS: &[(&str, &[u8])] = &[
    ("up", b"\x1b[A"),
    ("down", b"\x1b[B"),
    ("right", b"\x1b[C"),
    ("left", b"\x1b[D"),
    ("home", b"\x1b[H"),
    ("end", b"\x1b[F"),
    ("pageup", b"\x1b[5~"),
    ("pagedown", b"\x1b[6~"),
    ("insert", b"\x1b[2~"),
    ("delete", b"\x1b[3~"),
    ("backspace", b"\x7f"),
    ("tab", b"\t"),
    ("shift-tab", b"\x1b[Z"),
    ("enter", b"\r"),
    ("escape", b"\x1b"),
    ("space", b" "),
    ("f1", b"\x1bOP"),
    ("f2", b"\x1bOQ"),
    ("f3", b"\x1bOR"),
    ("f4", b"\x1bOS"),
    ("f5", b"\x1b[15~"),
    ("f6", b"\x1b[17~"),
    ("f7", b"\x1b[18~"),
    ("f8", b"\x1b[19~"),
    ("f9", b"\x1b[20~"),
    ("f10", b"\x1b[21~"),
    ("f11", b"\x1b[23~"),
    ("f12", b"\x1b[24~"),
];

/// The bidirectional key-name table.
///
/// # Example
///
/// ```
/// use tessera::key::KeyNames;
///
/// let names = KeyNames::default();
/// assert_eq!(names.translate("c-a"), Some(vec![0x01]));
/// assert_eq!(names.translate("a-n"), Some(b"\x1bn".to_vec()));
/// assert_eq!(names.lookup(b"\x1b[A").as_deref(), Some("up"));
/// assert_eq!(names.lookup(b"\x1b\x07").as_deref(), Some("a-c-g"));
/// ```
#[derive(Debug, Clone)]
pub struct KeyNames {
    by_name: HashMap<String, Vec<u8>>,
    by_sequence: HashMap<Vec<u8>, String>,
    sequences: KeyRecognizer,
}

impl Default for KeyNames {
    fn default() -> Self {
        Self::xterm()
    }
}

impl KeyNames {
    /// The table with xterm's sequences for every named key.
    pub fn xterm() -> Self {
        let mut names = Self {
            by_name: HashMap::new(),
            by_sequence: HashMap::new(),
            sequences: KeyRecognizer::new(),
        };
        for (name, sequence) in XTERM_KEYS {
            names.by_name.insert(name.to_string(), sequence.to_vec());
            names.by_sequence.insert(sequence.to_vec(), name.to_string());
            names.sequences.add(sequence);
        }
        names
    }

    /// Override the sequence of a named key, as reported by the terminal's
    /// capabilities. New names are accepted as well.
    pub fn set_sequence(&mut self, name: &str, sequence: &[u8]) {
        if sequence.is_empty() {
            return;
        }
        if let Some(old) = self.by_name.insert(name.to_string(), sequence.to_vec()) {
            if self.by_sequence.get(&old).is_some_and(|n| n == name) {
                self.by_sequence.remove(&old);
            }
            self.sequences.remove(&old);
        }
        self.by_sequence.insert(sequence.to_vec(), name.to_string());
        self.sequences.add(sequence);
        tracing::debug!(target: targets::KEYS, name, ?sequence, "key sequence overridden");
    }

    /// The sequence of a named key (no chord parsing).
    pub fn sequence(&self, name: &str) -> Option<&[u8]> {
        self.by_name.get(name).map(Vec::as_slice)
    }

    /// All named keys, sorted.
    pub fn named_keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self.by_name.keys().map(String::as_str).collect();
        keys.sort_unstable();
        keys
    }

    /// A recognizer over every named key sequence, used to split input that
    /// no binding claims.
    pub fn sequences(&self) -> &KeyRecognizer {
        &self.sequences
    }

    /// Convert a human-readable key name to the bytes it stands for.
    pub fn translate(&self, human: &str) -> Option<Vec<u8>> {
        if let Some(sequence) = self.by_name.get(human) {
            return Some(sequence.clone());
        }
        if let Some(rest) = human.strip_prefix("a-").filter(|rest| !rest.is_empty()) {
            let mut sequence = vec![ESC];
            sequence.extend(self.translate(rest)?);
            return Some(sequence);
        }
        if let Some(rest) = human.strip_prefix("c-") {
            return single_char(rest).and_then(control_byte).map(|byte| vec![byte]);
        }
        single_char(human).map(|c| c.to_string().into_bytes())
    }

    /// Convert raw key bytes to their canonical human-readable name.
    pub fn lookup(&self, trigger: &[u8]) -> Option<String> {
        if let Some(name) = self.by_sequence.get(trigger) {
            return Some(name.clone());
        }
        match trigger {
            [ESC, rest @ ..] if !rest.is_empty() => self.lookup(rest).map(|name| format!("a-{name}")),
            [byte] if *byte < 0x20 => {
                let c = (byte ^ 0x40).to_ascii_lowercase() as char;
                Some(format!("c-{c}"))
            }
            _ => {
                let text = std::str::from_utf8(trigger).ok()?;
                single_char(text)
                    .filter(|c| !c.is_control())
                    .map(String::from)
            }
        }
    }
}

fn single_char(text: &str) -> Option<char> {
    let mut chars = text.chars();
    let c = chars.next()?;
    chars.next().is_none().then_some(c)
}

fn control_byte(c: char) -> Option<u8> {
    let upper = c.to_ascii_uppercase();
    matches!(upper, '@'..='_').then(|| upper as u8 ^ 0x40)
}
