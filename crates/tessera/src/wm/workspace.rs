//! Workspaces: named groups of windows, only one shown at a time.

use slotmap::new_key_type;
use tessera_style::WorkspaceRule;

use crate::widget::WidgetId;

new_key_type! {
    /// Identifier of a workspace.
    pub struct WorkspaceId;
}

/// A named set of windows.
///
/// `list` keeps placement order (used by `switch-window-n` and the shift
/// actions); `ordered` keeps focus history with the focused window first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Workspace {
    pub(crate) name: String,
    pub(crate) list: Vec<WidgetId>,
    pub(crate) ordered: Vec<WidgetId>,
    pub(crate) rule: Option<WorkspaceRule>,
}

impl Workspace {
    pub(crate) fn new(name: impl Into<String>, rule: Option<WorkspaceRule>) -> Self {
        Self {
            name: name.into(),
            list: Vec::new(),
            ordered: Vec::new(),
            rule,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Windows in placement order.
    pub fn windows(&self) -> &[WidgetId] {
        &self.list
    }

    /// The most recently focused window.
    pub fn focused(&self) -> Option<WidgetId> {
        self.ordered.first().copied()
    }

    pub fn contains(&self, window: WidgetId) -> bool {
        self.list.contains(&window)
    }

    pub fn len(&self) -> usize {
        self.list.len()
    }

    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }

    /// Whether a window with this name/title belongs here by rule.
    pub fn claims(&self, name: Option<&str>, title: Option<&str>) -> bool {
        self.rule.as_ref().is_some_and(|rule| rule.matches(name, title))
    }

    pub(crate) fn push(&mut self, window: WidgetId) {
        self.list.push(window);
        self.ordered.push(window);
    }

    pub(crate) fn remove(&mut self, window: WidgetId) {
        self.list.retain(|&w| w != window);
        self.ordered.retain(|&w| w != window);
    }

    /// Move `window` to the front of the focus history.
    pub(crate) fn bring_to_front(&mut self, window: WidgetId) {
        self.ordered.retain(|&w| w != window);
        self.ordered.insert(0, window);
    }
}

#[cfg(test)]
mod tests {
    use slotmap::SlotMap;

    use super::*;

    #[test]
    fn test_focus_history_is_separate_from_placement() {
        let mut ids: SlotMap<WidgetId, ()> = SlotMap::with_key();
        let (a, b, c) = (ids.insert(()), ids.insert(()), ids.insert(()));
        let mut ws = Workspace::new("main", None);
        ws.push(a);
        ws.push(b);
        ws.push(c);
        ws.bring_to_front(c);
        assert_eq!(ws.windows(), &[a, b, c]);
        assert_eq!(ws.focused(), Some(c));

        ws.remove(c);
        assert_eq!(ws.focused(), Some(a));
        assert_eq!(ws.len(), 2);
    }

    #[test]
    fn test_rule_claims_by_name_or_title() {
        let rule = WorkspaceRule {
            name: "chat".into(),
            window_names: vec!["buddylist".into()],
            window_titles: vec!["Conversations".into()],
        };
        let ws = Workspace::new("chat", Some(rule));
        assert!(ws.claims(Some("buddylist"), None));
        assert!(ws.claims(None, Some("Conversations")));
        assert!(!ws.claims(Some("other"), Some("Other")));
        assert!(!Workspace::new("plain", None).claims(Some("buddylist"), None));
    }
}
