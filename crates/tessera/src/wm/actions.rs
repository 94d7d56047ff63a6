//! The `WM` kind: window-manager actions and their default triggers.
//!
//! | action               | trigger        |
//! |----------------------|----------------|
//! | `window-next`        | `a-n`          |
//! | `window-prev`        | `a-p`          |
//! | `window-next-urgent` | `a-tab`        |
//! | `window-prev-urgent` | `a-shift-tab`  |
//! | `window-close`       | `a-c`          |
//! | `start-move`         | `a-m`          |
//! | `start-resize`       | `a-r`          |
//! | `window-scroll-down` | `a-c-j`        |
//! | `window-scroll-up`   | `a-c-k`        |
//! | `shift-left`         | `a-,`          |
//! | `shift-right`        | `a-.`          |
//! | `workspace-new`      | `f9`           |
//! | `workspace-next`     | `a->`          |
//! | `workspace-prev`     | `a-<`          |
//! | `window-tag`         | `a-t`          |
//! | `place-tagged`       | `a-T`          |
//! | `switch-window-n`    | `a-1` … `a-0`  |
//! | `ignore-keys-start`  | `c-g`          |
//! | `ignore-keys-end`    | `a-c-g`        |
//! | `refresh-screen`     | `a-l`          |

use tessera_core::logging::targets;

use super::manager::WindowManager;
use crate::binding::{ActionCallback, ActionParam, KindBuilder};
use crate::widget::{WidgetFlags, WidgetId};

pub(crate) fn wm_class_init(k: &mut KindBuilder<'_, WindowManager>) {
    k.action("window-next", plain(|wm| wm.cycle_window(true)))
        .action("window-prev", plain(|wm| wm.cycle_window(false)))
        .action("window-next-urgent", plain(|wm| wm.focus_urgent(true)))
        .action("window-prev-urgent", plain(|wm| wm.focus_urgent(false)))
        .action(
            "window-close",
            plain(|wm| wm.focused_window().is_some_and(|window| wm.close_window(window))),
        )
        .action("start-move", plain(WindowManager::start_move))
        .action("start-resize", plain(WindowManager::start_resize))
        .action(
            "window-scroll-down",
            plain(|wm| wm.focused_window().is_some_and(|window| wm.scroll_window(window, 1))),
        )
        .action(
            "window-scroll-up",
            plain(|wm| wm.focused_window().is_some_and(|window| wm.scroll_window(window, -1))),
        )
        .action(
            "shift-left",
            plain(|wm| wm.focused_window().is_some_and(|window| wm.shift_window(window, false))),
        )
        .action(
            "shift-right",
            plain(|wm| wm.focused_window().is_some_and(|window| wm.shift_window(window, true))),
        )
        .action(
            "workspace-new",
            plain(|wm| {
                let index = wm.new_workspace(None);
                wm.switch_workspace(index).is_ok()
            }),
        )
        .action("workspace-next", plain(|wm| wm.step_workspace(true)))
        .action("workspace-prev", plain(|wm| wm.step_workspace(false)))
        .action(
            "window-tag",
            plain(|wm| {
                let Some(window) = wm.focused_window() else {
                    return false;
                };
                wm.toggle_tag(window);
                true
            }),
        )
        .action("place-tagged", plain(|wm| wm.place_tagged() > 0))
        .action(
            "switch-window-n",
            ActionCallback::with_params(|wm: &mut WindowManager, (), params: &[ActionParam]| {
                let Some(n) = params.first().and_then(ActionParam::as_int) else {
                    return false;
                };
                wm.switch_window_n(n)
            }),
        )
        .action(
            "ignore-keys-start",
            plain(|wm| {
                wm.ignore_keys = true;
                tracing::debug!(target: targets::WM, "ignoring keys");
                true
            }),
        )
        .action(
            "ignore-keys-end",
            plain(|wm| {
                let was = wm.ignore_keys;
                wm.ignore_keys = false;
                was
            }),
        )
        .action(
            "refresh-screen",
            plain(|wm| {
                wm.refresh();
                true
            }),
        );

    k.bind("window-next", "a-n")
        .bind("window-prev", "a-p")
        .bind("window-next-urgent", "a-tab")
        .bind("window-prev-urgent", "a-shift-tab")
        .bind("window-close", "a-c")
        .bind("start-move", "a-m")
        .bind("start-resize", "a-r")
        .bind("window-scroll-down", "a-c-j")
        .bind("window-scroll-up", "a-c-k")
        .bind("shift-left", "a-,")
        .bind("shift-right", "a-.")
        .bind("workspace-new", "f9")
        .bind("workspace-next", "a->")
        .bind("workspace-prev", "a-<")
        .bind("window-tag", "a-t")
        .bind("place-tagged", "a-T")
        .bind("ignore-keys-start", "c-g")
        .bind("ignore-keys-end", "a-c-g")
        .bind("refresh-screen", "a-l");

    // a-1 selects the first window, ..., a-0 the tenth.
    for (digit, index) in ('1'..='9').zip(0..).chain(std::iter::once(('0', 9))) {
        k.bind_with("switch-window-n", &format!("a-{digit}"), vec![ActionParam::Int(index)]);
    }
}

fn plain(f: impl Fn(&mut WindowManager) -> bool + 'static) -> ActionCallback<WindowManager> {
    ActionCallback::new(move |wm: &mut WindowManager, ()| f(wm))
}

impl WindowManager {
    /// Focus the next or previous window of the current workspace, in
    /// placement order.
    pub fn cycle_window(&mut self, forward: bool) -> bool {
        let list = self.workspaces[self.current].windows().to_vec();
        let Some(next) = neighbour(&list, self.focused_window(), forward) else {
            return false;
        };
        self.give_focus(next)
    }

    /// Focus the next or previous urgent window on any workspace.
    pub fn focus_urgent(&mut self, forward: bool) -> bool {
        let all: Vec<WidgetId> = self
            .workspaces
            .iter()
            .flat_map(|ws| ws.windows().iter().copied())
            .collect();
        let focused = self.focused_window();
        let start = focused.and_then(|f| all.iter().position(|&w| w == f));
        let len = all.len();
        let found = (1..=len)
            .map(|step| match (start, forward) {
                (Some(start), true) => all[(start + step) % len],
                (Some(start), false) => all[(start + len * step - step) % len],
                (None, true) => all[step - 1],
                (None, false) => all[len - step],
            })
            .filter(|&w| Some(w) != focused)
            .find(|&w| self.tree.base(w).is_some_and(|base| base.has_flag(WidgetFlags::URGENT)));
        found.is_some_and(|window| self.give_focus(window))
    }

    /// Switch to the neighbouring workspace, wrapping around.
    pub fn step_workspace(&mut self, forward: bool) -> bool {
        let count = self.workspaces.len();
        if count < 2 {
            return false;
        }
        let index = if forward {
            (self.current + 1) % count
        } else {
            (self.current + count - 1) % count
        };
        self.switch_workspace(index).is_ok()
    }

    /// Focus the `n`th window (0-based) of the current workspace.
    pub fn switch_window_n(&mut self, n: i64) -> bool {
        let window = usize::try_from(n)
            .ok()
            .and_then(|n| self.workspaces[self.current].windows().get(n).copied());
        window.is_some_and(|window| self.give_focus(window))
    }
}

fn neighbour(list: &[WidgetId], current: Option<WidgetId>, forward: bool) -> Option<WidgetId> {
    if list.len() < 2 {
        return None;
    }
    let len = list.len();
    let index = current.and_then(|c| list.iter().position(|&w| w == c))?;
    let next = if forward { (index + 1) % len } else { (index + len - 1) % len };
    Some(list[next])
}
