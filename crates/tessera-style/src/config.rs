//! Loading the toolkit configuration from INI text.
//!
//! # Example
//!
//! ```
//! use tessera_style::StyleConfig;
//!
//! let config = StyleConfig::from_str(
//!     "[general]\nshadow = no\n\n[Box::binding]\nfocus-next = tab; down\n",
//! )?;
//! assert!(!config.general().shadow);
//! assert_eq!(config.actions_for("Box").bindings.len(), 2);
//! # Ok::<(), tessera_style::Error>(())
//! ```

use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;

use ini::{Ini, ParseOption};
use tessera_render::CellStyle;

use crate::colors::{ColorPair, ColorRole, Palette};
use crate::error::{Error, Result};

const TARGET: &str = "tessera::style";
const BINDING_SUFFIX: &str = "::binding";
const REMAP_SUFFIX: &str = "::remap";
const WORKSPACE_PREFIX: &str = "Workspace-";
const UNBIND_KEY: &str = "unbind";

/// Boolean toggles and timing from the `[general]` section.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GeneralSettings {
    /// Draw drop shadows behind windows.
    pub shadow: bool,
    /// Use colors (otherwise reverse/bold attributes only).
    pub color: bool,
    /// Report mouse events.
    pub mouse: bool,
    /// How long an ambiguous escape prefix waits for more bytes.
    pub escape_delay: Duration,
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self {
            shadow: true,
            color: true,
            mouse: true,
            escape_delay: Duration::from_millis(25),
        }
    }
}

/// One configured binding: an action name and a human-readable trigger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BindingEntry {
    pub action: String,
    pub trigger: String,
}

/// The `[<Kind>::binding]` section of one widget kind.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KindBindings {
    /// Bindings in file order.
    pub bindings: Vec<BindingEntry>,
    /// Human-readable triggers to unbind.
    pub unbind: Vec<String>,
}

impl KindBindings {
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty() && self.unbind.is_empty()
    }
}

/// A `raw = canonical` line of a `[<Kind>::remap]` section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyRemap {
    pub from: String,
    pub to: String,
}

/// A `[Workspace-N]` section: a named workspace plus placement rules.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorkspaceRule {
    pub name: String,
    /// Windows whose widget name matches go to this workspace.
    pub window_names: Vec<String>,
    /// Windows whose title matches go to this workspace.
    pub window_titles: Vec<String>,
}

impl WorkspaceRule {
    /// Whether a window with this name/title is placed here.
    pub fn matches(&self, name: Option<&str>, title: Option<&str>) -> bool {
        name.is_some_and(|n| self.window_names.iter().any(|w| w == n))
            || title.is_some_and(|t| self.window_titles.iter().any(|w| w == t))
    }
}

/// The parsed configuration consumed by the toolkit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StyleConfig {
    general: GeneralSettings,
    palette: Palette,
    bindings: HashMap<String, KindBindings>,
    remaps: HashMap<String, Vec<KeyRemap>>,
    workspaces: Vec<WorkspaceRule>,
}

impl StyleConfig {
    /// Parse configuration from INI text.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(text: &str) -> Result<Self> {
        let option = ParseOption {
            enabled_quote: false,
            enabled_escape: false,
            ..Default::default()
        };
        let ini = Ini::load_from_str_opt(text, option).map_err(|e| Error::Parse(e.to_string()))?;
        Self::from_ini(&ini)
    }

    /// Read and parse a configuration file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        let config = Self::from_str(&text)?;
        tracing::debug!(target: TARGET, path = %path.display(), "configuration loaded");
        Ok(config)
    }

    fn from_ini(ini: &Ini) -> Result<Self> {
        let mut config = Self::default();
        let mut numbered = Vec::new();

        for (section, props) in ini.iter() {
            let Some(section) = section else {
                if props.iter().next().is_some() {
                    tracing::warn!(target: TARGET, "ignoring keys outside of any section");
                }
                continue;
            };

            if section == "general" {
                config.general = parse_general(props)?;
            } else if section == "colors" {
                for (key, value) in props.iter() {
                    let Some(role) = ColorRole::from_name(key) else {
                        tracing::warn!(target: TARGET, key, "unknown color role");
                        continue;
                    };
                    let pair = ColorPair::parse(value).ok_or_else(|| {
                        Error::invalid_value(format!("colors.{key}"), format!("expected 'fg; bg', got '{value}'"))
                    })?;
                    config.palette.set(role, pair);
                }
            } else if let Some(kind) = section.strip_suffix(BINDING_SUFFIX) {
                let entry = config.bindings.entry(kind.to_string()).or_default();
                for (action, value) in props.iter() {
                    let triggers = split_list(value);
                    if action == UNBIND_KEY {
                        entry.unbind.extend(triggers);
                    } else {
                        entry.bindings.extend(triggers.into_iter().map(|trigger| BindingEntry {
                            action: action.to_string(),
                            trigger,
                        }));
                    }
                }
            } else if let Some(kind) = section.strip_suffix(REMAP_SUFFIX) {
                let entry = config.remaps.entry(kind.to_string()).or_default();
                entry.extend(props.iter().map(|(from, to)| KeyRemap {
                    from: from.trim().to_string(),
                    to: to.trim().to_string(),
                }));
            } else if let Some(number) = section.strip_prefix(WORKSPACE_PREFIX) {
                let Ok(number) = number.trim().parse::<u32>() else {
                    tracing::warn!(target: TARGET, section, "workspace section without a number");
                    continue;
                };
                let rule = WorkspaceRule {
                    name: props
                        .get("name")
                        .map(|n| n.trim().to_string())
                        .unwrap_or_else(|| number.to_string()),
                    window_names: props.get("window-names").map(split_list).unwrap_or_default(),
                    window_titles: props.get("window-titles").map(split_list).unwrap_or_default(),
                };
                numbered.push((number, rule));
            } else {
                tracing::warn!(target: TARGET, section, "unknown configuration section");
            }
        }

        numbered.sort_by_key(|(number, _)| *number);
        config.workspaces = numbered.into_iter().map(|(_, rule)| rule).collect();
        Ok(config)
    }

    /// The `[general]` settings.
    pub fn general(&self) -> &GeneralSettings {
        &self.general
    }

    /// The color palette.
    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    /// The cell style for a role, honoring the `color` toggle.
    pub fn style(&self, role: ColorRole) -> CellStyle {
        self.palette.style(role, self.general.color)
    }

    /// The configured bindings for a widget kind (empty when none).
    pub fn actions_for(&self, kind: &str) -> KindBindings {
        self.bindings.get(kind).cloned().unwrap_or_default()
    }

    /// The configured key remaps for a widget kind.
    pub fn keyremaps(&self, kind: &str) -> &[KeyRemap] {
        self.remaps.get(kind).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Workspace definitions in section-number order.
    pub fn workspaces(&self) -> &[WorkspaceRule] {
        &self.workspaces
    }
}

fn parse_general(props: &ini::Properties) -> Result<GeneralSettings> {
    let mut general = GeneralSettings::default();
    for (key, value) in props.iter() {
        match key {
            "shadow" => general.shadow = parse_bool(key, value)?,
            "color" => general.color = parse_bool(key, value)?,
            "mouse" => general.mouse = parse_bool(key, value)?,
            "escape_delay_ms" => {
                let millis = value.trim().parse::<u64>().map_err(|_| {
                    Error::invalid_value("general.escape_delay_ms", format!("expected milliseconds, got '{value}'"))
                })?;
                general.escape_delay = Duration::from_millis(millis);
            }
            other => tracing::warn!(target: TARGET, key = other, "unknown general setting"),
        }
    }
    Ok(general)
}

fn parse_bool(key: &str, value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "yes" | "on" | "1" => Ok(true),
        "false" | "no" | "off" | "0" => Ok(false),
        _ => Err(Error::invalid_value(
            format!("general.{key}"),
            format!("expected a boolean, got '{value}'"),
        )),
    }
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(';')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tessera_render::Color;

    #[test]
    fn test_defaults() {
        let config = StyleConfig::default();
        assert!(config.general().shadow);
        assert!(config.general().color);
        assert!(config.actions_for("Box").is_empty());
        assert!(config.keyremaps("Box").is_empty());
        assert!(config.workspaces().is_empty());
    }

    #[test]
    fn test_general_booleans() {
        let config =
            StyleConfig::from_str("[general]\nshadow = off\ncolor = 0\nmouse = yes\nescape_delay_ms = 40\n").unwrap();
        assert_eq!(
            *config.general(),
            GeneralSettings {
                shadow: false,
                color: false,
                mouse: true,
                escape_delay: Duration::from_millis(40),
            }
        );
    }

    #[test]
    fn test_invalid_boolean_is_an_error() {
        let err = StyleConfig::from_str("[general]\nshadow = maybe\n").unwrap_err();
        assert!(matches!(err, Error::InvalidValue { ref key, .. } if key == "general.shadow"));
    }

    #[test]
    fn test_colors() {
        let config = StyleConfig::from_str("[colors]\ntitle = red; green\nsparkle = red; red\n").unwrap();
        assert_eq!(
            config.palette().pair(ColorRole::Title),
            ColorPair::new(Color::Red, Color::Green)
        );
        assert!(StyleConfig::from_str("[colors]\ntitle = chartreuse; black\n").is_err());
    }

    #[test]
    fn test_bindings_and_unbind() {
        let config = StyleConfig::from_str(
            "[Box::binding]\nfocus-next = tab; down\nfocus-prev = shift-tab\nunbind = c-x; f11\n",
        )
        .unwrap();
        let box_bindings = config.actions_for("Box");
        let triggers: Vec<_> = box_bindings
            .bindings
            .iter()
            .map(|b| (b.action.as_str(), b.trigger.as_str()))
            .collect();
        assert_eq!(
            triggers,
            vec![("focus-next", "tab"), ("focus-next", "down"), ("focus-prev", "shift-tab")]
        );
        assert_eq!(box_bindings.unbind, vec!["c-x", "f11"]);
    }

    #[test]
    fn test_remaps() {
        let config = StyleConfig::from_str("[Window::remap]\nc-j = enter\n").unwrap();
        assert_eq!(
            config.keyremaps("Window"),
            &[KeyRemap {
                from: "c-j".into(),
                to: "enter".into()
            }]
        );
    }

    #[test]
    fn test_workspaces_in_numeric_order() {
        let config = StyleConfig::from_str(
            "[Workspace-10]\nname = last\n\n[Workspace-2]\nname = chat\nwindow-names = buddylist\nwindow-titles = Chat; IRC\n",
        )
        .unwrap();
        let names: Vec<_> = config.workspaces().iter().map(|w| w.name.as_str()).collect();
        assert_eq!(names, vec!["chat", "last"]);
        let chat = &config.workspaces()[0];
        assert!(chat.matches(Some("buddylist"), None));
        assert!(chat.matches(None, Some("IRC")));
        assert!(!chat.matches(Some("IRC"), Some("buddylist")));
    }
}
