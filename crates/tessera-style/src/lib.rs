//! Configuration for Horizon Tessera.
//!
//! A single INI file controls shadows, colors and mouse support, overrides
//! per-kind key bindings and key remaps, and predefines workspaces with
//! window placement rules. See [`StyleConfig`] for the layout.

mod colors;
mod config;
mod error;

pub use colors::{ColorPair, ColorRole, Palette};
pub use config::{BindingEntry, GeneralSettings, KeyRemap, KindBindings, StyleConfig, WorkspaceRule};
pub use error::{Error, Result};
