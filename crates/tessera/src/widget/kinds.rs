//! The built-in widget kinds and their default bindings.
//!
//! | kind     | parent  | actions (default triggers)                     |
//! |----------|---------|------------------------------------------------|
//! | `Widget` | -       | `context-menu` (`f11`, `c-x`)                  |
//! | `Box`    | Widget  | `focus-next` (`tab`), `focus-prev` (`shift-tab`) |
//! | `Window` | Box     | `show-menu` (`f10`)                            |
//! | `Label`  | Widget  | -                                              |

use crate::binding::{ActionCallback, KindBuilder, KindId, KindRegistry};

use super::focus::FocusDirection;
use super::tree::{TreeRequest, WidgetTree};

/// Ids of the kinds every [`WidgetTree`] registers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuiltinKinds {
    pub widget: KindId,
    pub box_kind: KindId,
    pub window: KindId,
    pub label: KindId,
}

pub(crate) fn register_builtin(kinds: &mut KindRegistry<WidgetTree>) -> BuiltinKinds {
    let widget = kinds.insert_kind("Widget", None, widget_class_init);
    let box_kind = kinds.insert_kind("Box", Some(widget), box_class_init);
    let window = kinds.insert_kind("Window", Some(box_kind), window_class_init);
    let label = kinds.insert_kind("Label", Some(widget), |_| {});
    BuiltinKinds {
        widget,
        box_kind,
        window,
        label,
    }
}

fn widget_class_init(k: &mut KindBuilder<'_, WidgetTree>) {
    k.action(
        "context-menu",
        ActionCallback::new(|tree: &mut WidgetTree, id| {
            tree.push_request(TreeRequest::ContextMenu(id));
            true
        }),
    )
    .bind("context-menu", "f11")
    .bind("context-menu", "c-x");
}

fn box_class_init(k: &mut KindBuilder<'_, WidgetTree>) {
    k.action(
        "focus-next",
        ActionCallback::new(|tree: &mut WidgetTree, id| tree.focus_step(id, FocusDirection::Forward)),
    )
    .action(
        "focus-prev",
        ActionCallback::new(|tree: &mut WidgetTree, id| tree.focus_step(id, FocusDirection::Backward)),
    )
    .bind("focus-next", "tab")
    .bind("focus-prev", "shift-tab");
}

fn window_class_init(k: &mut KindBuilder<'_, WidgetTree>) {
    k.action(
        "show-menu",
        ActionCallback::new(|tree: &mut WidgetTree, id| {
            let Some(menu) = tree.window_menu(id) else {
                return false;
            };
            tree.push_request(TreeRequest::ShowMenu { owner: id, menu });
            true
        }),
    )
    .bind("show-menu", "f10");
}
