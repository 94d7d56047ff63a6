//! Keys: recognizing triggers in the input stream and naming them.
//!
//! - [`KeyRecognizer`] - the process-wide set of bound triggers
//! - [`KeyNames`] - human-readable names for byte sequences
//! - [`KeyDecoder`] - cuts the byte stream into keys

mod decoder;
mod names;
mod recognizer;

pub use decoder::KeyDecoder;
pub use names::KeyNames;
pub use recognizer::{KeyMatch, KeyRecognizer, SharedKeyRecognizer};
