//! Focus chains of root boxes.
//!
//! Only a box without a parent owns a chain: the focus-capable leaves of its
//! whole hierarchy, flattened depth-first (nested boxes contribute their
//! children, never themselves). The chain is built lazily the first time it
//! is needed and kept up to date by `add_widget`/`remove_widget`.

use tessera_core::logging::targets;

use super::tree::WidgetTree;
use super::WidgetId;

/// The ordered focus list of a root box and its active element.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FocusChain {
    pub(crate) list: Vec<WidgetId>,
    pub(crate) active: Option<WidgetId>,
}

impl FocusChain {
    pub fn list(&self) -> &[WidgetId] {
        &self.list
    }

    pub fn active(&self) -> Option<WidgetId> {
        self.active
    }
}

/// Focus direction for [`WidgetTree::move_focus`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusDirection {
    Forward,
    Backward,
}

impl WidgetTree {
    fn flatten_focus(&self, id: WidgetId, out: &mut Vec<WidgetId>) {
        for child in self.children(id) {
            if self.is_box(child) {
                self.flatten_focus(child, out);
            } else if self.base(child).is_some_and(|base| base.can_take_focus()) {
                out.push(child);
            }
        }
    }

    fn is_focus_candidate(&self, id: WidgetId) -> bool {
        self.base(id)
            .is_some_and(|base| base.is_visible() && base.can_take_focus())
    }

    /// Build the chain of a root box if it has none yet.
    pub(crate) fn ensure_focus_chain(&mut self, root: WidgetId) {
        if self.focus_chains.contains_key(root) || self.parent(root).is_some() || !self.contains(root) {
            return;
        }
        let mut list = Vec::new();
        self.flatten_focus(root, &mut list);
        let active = list.iter().copied().find(|&id| self.is_focus_candidate(id));
        tracing::trace!(target: targets::FOCUS, ?root, len = list.len(), "focus chain built");
        self.focus_chains.insert(root, FocusChain { list, active });
    }

    /// Rebuild the chain after the hierarchy changed, keeping the active
    /// element when it is still present.
    pub(crate) fn rebuild_focus_chain(&mut self, root: WidgetId) {
        let previous = self.focus_chains.remove(root).and_then(|chain| chain.active);
        self.ensure_focus_chain(root);
        if let Some(chain) = self.focus_chains.get_mut(root)
            && let Some(previous) = previous
            && chain.list.contains(&previous)
        {
            chain.active = Some(previous);
        }
    }

    /// Drop `removed` from a root's chain, moving the active element on if
    /// it was removed.
    pub(crate) fn remove_from_focus(&mut self, root: WidgetId, removed: &[WidgetId]) {
        let Some(chain) = self.focus_chains.get_mut(root) else {
            return;
        };
        let old_active = chain.active;
        let old_index = old_active.and_then(|active| chain.list.iter().position(|&id| id == active));
        chain.list.retain(|id| !removed.contains(id));

        let Some(old_active) = old_active.filter(|active| removed.contains(active)) else {
            return;
        };
        let list = chain.list.clone();
        let start = old_index.unwrap_or(0);
        let replacement = (0..list.len())
            .map(|offset| list[(start + offset) % list.len()])
            .find(|&id| self.is_focus_candidate(id));
        if let Some(chain) = self.focus_chains.get_mut(root) {
            chain.active = replacement;
        }

        let had_focus = self.base(old_active).is_some_and(|base| base.has_focus());
        if had_focus {
            self.set_focus(old_active, false);
            if let Some(replacement) = replacement {
                self.set_focus(replacement, true);
            }
        }
    }

    /// The chain of a root box, building it if needed.
    pub fn focus_chain(&mut self, root: WidgetId) -> Option<&FocusChain> {
        self.ensure_focus_chain(root);
        self.focus_chains.get(root)
    }

    /// The focus list of a root box.
    pub fn focus_list(&mut self, root: WidgetId) -> Vec<WidgetId> {
        self.focus_chain(root).map(|chain| chain.list.clone()).unwrap_or_default()
    }

    /// The active element of a root box.
    pub fn active(&mut self, root: WidgetId) -> Option<WidgetId> {
        self.focus_chain(root).and_then(FocusChain::active)
    }

    /// Step the active element of a root box circularly.
    ///
    /// Invisible elements are skipped; moving forward also skips elements
    /// that cannot take focus. Stops when a valid element is found or the
    /// walk returns to the start. Returns `true` if the active element
    /// changed.
    pub fn move_focus(&mut self, root: WidgetId, direction: FocusDirection) -> bool {
        let Some(chain) = self.focus_chain(root) else {
            return false;
        };
        let list = chain.list.clone();
        let old = chain.active;
        let len = list.len();
        if len == 0 {
            return false;
        }

        let start = old
            .and_then(|active| list.iter().position(|&id| id == active))
            .unwrap_or(match direction {
                FocusDirection::Forward => len - 1,
                FocusDirection::Backward => 0,
            });
        let mut index = start;
        let mut found = None;
        for _ in 0..len {
            index = match direction {
                FocusDirection::Forward => (index + 1) % len,
                FocusDirection::Backward => (index + len - 1) % len,
            };
            let candidate = list[index];
            if Some(candidate) == old {
                break;
            }
            let Some(base) = self.base(candidate) else {
                continue;
            };
            if !base.is_visible() {
                continue;
            }
            if direction == FocusDirection::Forward && !base.can_take_focus() {
                continue;
            }
            found = Some(candidate);
            break;
        }

        let Some(new) = found else {
            return false;
        };
        if let Some(chain) = self.focus_chains.get_mut(root) {
            chain.active = Some(new);
        }
        tracing::trace!(target: targets::FOCUS, ?root, from = ?old, to = ?new, "focus moved");
        if let Some(old) = old {
            self.set_focus(old, false);
        }
        self.set_focus(new, true);
        true
    }

    /// Make `child` the active element of its root box.
    pub fn give_focus_to_child(&mut self, root: WidgetId, child: WidgetId) -> bool {
        let Some(chain) = self.focus_chain(root) else {
            return false;
        };
        if !chain.list.contains(&child) {
            return false;
        }
        let old = chain.active;
        if old == Some(child) {
            return true;
        }
        if let Some(chain) = self.focus_chains.get_mut(root) {
            chain.active = Some(child);
        }
        if let Some(old) = old {
            self.set_focus(old, false);
        }
        self.set_focus(child, true);
        true
    }
}
