//! Human-readable listings of a kind's bindings.

use super::registry::{KindId, KindRegistry};
use super::ActionHost;

/// One line of a bindings help screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BindingHelpRow {
    /// The trigger in human-readable form (`c-a`, `f10`).
    pub trigger: String,
    /// The action it runs.
    pub action: String,
}

impl<H: ActionHost> KindRegistry<H> {
    /// The bindings of a kind, sorted by human-readable trigger.
    ///
    /// Triggers without a name are shown as escaped bytes.
    pub fn binding_help(&mut self, kind: KindId) -> Vec<BindingHelpRow> {
        let bindings = self.resolved_bindings(kind);
        let names = self.toolkit().names();
        let mut rows: Vec<BindingHelpRow> = bindings
            .into_iter()
            .map(|(trigger, action)| BindingHelpRow {
                trigger: names
                    .lookup(&trigger)
                    .unwrap_or_else(|| trigger.escape_ascii().to_string()),
                action,
            })
            .collect();
        rows.sort_by(|a, b| a.trigger.cmp(&b.trigger).then_with(|| a.action.cmp(&b.action)));
        rows
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::binding::ActionCallback;
    use crate::toolkit::Toolkit;

    struct Host;

    impl ActionHost for Host {
        type Target = ();
    }

    #[test]
    fn test_help_rows_sorted_by_trigger() {
        let mut kinds = KindRegistry::<Host>::new(Toolkit::default());
        let kind = kinds
            .register_kind("Help", None, |k| {
                let noop = ActionCallback::new(|_: &mut Host, ()| true);
                k.action("next", noop.clone())
                    .action("close", noop)
                    .bind("next", "tab")
                    .bind("close", "a-c")
                    .bind_raw("close", b"\x1b[99~", None);
            })
            .unwrap();

        let rows = kinds.binding_help(kind);
        let triggers: Vec<&str> = rows.iter().map(|row| row.trigger.as_str()).collect();
        assert_eq!(triggers, vec!["\\x1b[99~", "a-c", "tab"]);
        assert_eq!(rows[2].action, "next");
    }
}
