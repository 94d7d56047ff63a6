//! Per-kind action and binding tables with inheritance by copy.

use std::collections::HashMap;
use std::fmt;

use slotmap::{SlotMap, new_key_type};
use tessera_core::logging::targets;
use tessera_core::{Result, TesseraError};

use super::{Action, ActionCallback, ActionHost, ActionParam, Binding, Invocation};
use crate::key::KeyRecognizer;
use crate::toolkit::Toolkit;

new_key_type! {
    /// Identifies a registered kind within one [`KindRegistry`].
    pub struct KindId;
}

/// A kind's own registrations, run once when the kind is first resolved.
pub type ClassInit<H> = fn(&mut KindBuilder<'_, H>);

/// The resolved tables of one kind.
pub(crate) struct KindTables<H: ActionHost> {
    pub(crate) actions: HashMap<String, Action<H>>,
    pub(crate) bindings: HashMap<Vec<u8>, Binding>,
    pub(crate) remaps: HashMap<Vec<u8>, Vec<u8>>,
}

impl<H: ActionHost> Default for KindTables<H> {
    fn default() -> Self {
        Self {
            actions: HashMap::new(),
            bindings: HashMap::new(),
            remaps: HashMap::new(),
        }
    }
}

impl<H: ActionHost> Clone for KindTables<H> {
    fn clone(&self) -> Self {
        Self {
            actions: self.actions.clone(),
            bindings: self.bindings.clone(),
            remaps: self.remaps.clone(),
        }
    }
}

impl<H: ActionHost> KindTables<H> {
    fn insert_action(&mut self, name: &str, callback: ActionCallback<H>) {
        self.actions.insert(
            name.to_string(),
            Action {
                name: name.to_string(),
                callback,
            },
        );
    }

    /// Bind `trigger` to `action`, or unbind it when `action` is empty.
    fn bind(
        &mut self,
        kind: &str,
        action: &str,
        trigger: &[u8],
        params: Option<Vec<ActionParam>>,
        recognizer: &mut KeyRecognizer,
    ) -> bool {
        if trigger.is_empty() {
            return false;
        }
        if action.is_empty() {
            return self.unbind(trigger, recognizer);
        }
        if !self.actions.contains_key(action) {
            tracing::warn!(
                target: targets::BINDINGS,
                kind,
                action,
                ?trigger,
                "binding refers to an unknown action; ignored"
            );
            return false;
        }

        let binding = Binding {
            action: action.to_string(),
            params,
        };
        if self.bindings.insert(trigger.to_vec(), binding).is_none() {
            recognizer.add(trigger);
        }
        true
    }

    fn unbind(&mut self, trigger: &[u8], recognizer: &mut KeyRecognizer) -> bool {
        match self.bindings.remove(trigger) {
            Some(_) => {
                recognizer.remove(trigger);
                true
            }
            None => false,
        }
    }
}

/// Registration context handed to a kind's [`ClassInit`].
///
/// Triggers are given as human-readable names (`"tab"`, `"a-n"`) and
/// translated through the toolkit's key names.
pub struct KindBuilder<'a, H: ActionHost> {
    kind: &'a str,
    tables: &'a mut KindTables<H>,
    toolkit: &'a Toolkit,
}

impl<H: ActionHost> KindBuilder<'_, H> {
    /// The name of the kind being initialised.
    pub fn kind_name(&self) -> &str {
        self.kind
    }

    /// Register (or replace) an action.
    pub fn action(&mut self, name: &str, callback: ActionCallback<H>) -> &mut Self {
        self.tables.insert_action(name, callback);
        self
    }

    /// Bind a trigger to an action.
    pub fn bind(&mut self, action: &str, trigger: &str) -> &mut Self {
        self.bind_params(action, trigger, None)
    }

    /// Bind a trigger to an action with a pre-bound parameter list.
    pub fn bind_with(&mut self, action: &str, trigger: &str, params: Vec<ActionParam>) -> &mut Self {
        self.bind_params(action, trigger, Some(params))
    }

    /// Remove an inherited binding.
    pub fn unbind(&mut self, trigger: &str) -> &mut Self {
        self.bind_params("", trigger, None)
    }

    /// Bind raw trigger bytes.
    pub fn bind_raw(&mut self, action: &str, trigger: &[u8], params: Option<Vec<ActionParam>>) -> &mut Self {
        let mut recognizer = self.toolkit.recognizer().write();
        self.tables.bind(self.kind, action, trigger, params, &mut recognizer);
        drop(recognizer);
        self
    }

    fn bind_params(&mut self, action: &str, trigger: &str, params: Option<Vec<ActionParam>>) -> &mut Self {
        let Some(bytes) = self.toolkit.translate(trigger) else {
            tracing::warn!(target: targets::BINDINGS, kind = self.kind, trigger, "unknown key name; binding ignored");
            return self;
        };
        self.bind_raw(action, &bytes, params)
    }
}

struct KindEntry<H: ActionHost> {
    name: String,
    parent: Option<KindId>,
    class_init: ClassInit<H>,
    tables: Option<KindTables<H>>,
}

/// The registry of kinds for one host type.
///
/// Kinds are registered with a parent and a [`ClassInit`]; nothing is built
/// until the kind is first used. Resolution copies the parent's resolved
/// tables (so later changes to the parent do not leak into the child), runs
/// the kind's own registrations, then applies the configuration's
/// `[<Kind>::binding]` and `[<Kind>::remap]` sections.
///
/// Every trigger a kind binds holds one reference in the toolkit's shared
/// [`KeyRecognizer`](crate::key::KeyRecognizer); dropping the registry
/// releases them.
///
/// # Example
///
/// ```
/// use tessera::Toolkit;
/// use tessera::binding::{ActionCallback, ActionHost, KindRegistry};
///
/// struct Counter(u32);
/// impl ActionHost for Counter {
///     type Target = ();
/// }
///
/// let toolkit = Toolkit::default();
/// let mut kinds = KindRegistry::<Counter>::new(toolkit.clone());
/// let kind = kinds
///     .register_kind("Counter", None, |k| {
///         k.action("bump", ActionCallback::new(|c: &mut Counter, ()| {
///             c.0 += 1;
///             true
///         }))
///         .bind("bump", "c-b");
///     })
///     .unwrap();
///
/// let mut counter = Counter(0);
/// assert!(kinds.perform_key(&mut counter, (), kind, b"\x02"));
/// assert!(kinds.perform_named(&mut counter, (), kind, "bump", &[]));
/// assert_eq!(counter.0, 2);
/// assert!(toolkit.recognizer().read().contains(b"\x02"));
/// ```
pub struct KindRegistry<H: ActionHost> {
    kinds: SlotMap<KindId, KindEntry<H>>,
    by_name: HashMap<String, KindId>,
    toolkit: Toolkit,
}

impl<H: ActionHost> fmt::Debug for KindRegistry<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&str> = self.by_name.keys().map(String::as_str).collect();
        names.sort_unstable();
        f.debug_struct("KindRegistry").field("kinds", &names).finish()
    }
}

impl<H: ActionHost> KindRegistry<H> {
    /// Create an empty registry bound to a toolkit instance.
    pub fn new(toolkit: Toolkit) -> Self {
        Self {
            kinds: SlotMap::with_key(),
            by_name: HashMap::new(),
            toolkit,
        }
    }

    /// The toolkit this registry binds triggers in.
    pub fn toolkit(&self) -> &Toolkit {
        &self.toolkit
    }

    /// Register a kind. Resolution is deferred until first use.
    pub fn register_kind(&mut self, name: &str, parent: Option<KindId>, class_init: ClassInit<H>) -> Result<KindId> {
        if self.by_name.contains_key(name) {
            return Err(TesseraError::DuplicateKind(name.to_string()));
        }
        if let Some(parent) = parent {
            self.entry(parent)?;
        }
        Ok(self.insert_kind(name, parent, class_init))
    }

    /// Register a kind whose name and parent are known to be valid.
    pub(crate) fn insert_kind(&mut self, name: &str, parent: Option<KindId>, class_init: ClassInit<H>) -> KindId {
        let id = self.kinds.insert(KindEntry {
            name: name.to_string(),
            parent,
            class_init,
            tables: None,
        });
        self.by_name.insert(name.to_string(), id);
        tracing::debug!(target: targets::BINDINGS, kind = name, "kind registered");
        id
    }

    fn entry(&self, kind: KindId) -> Result<&KindEntry<H>> {
        self.kinds
            .get(kind)
            .ok_or_else(|| TesseraError::UnknownKind(format!("{kind:?}")))
    }

    /// Find a kind by name.
    pub fn kind_id(&self, name: &str) -> Option<KindId> {
        self.by_name.get(name).copied()
    }

    /// The name a kind was registered under.
    pub fn kind_name(&self, kind: KindId) -> Option<&str> {
        self.kinds.get(kind).map(|entry| entry.name.as_str())
    }

    /// The parent of a kind.
    pub fn parent(&self, kind: KindId) -> Option<KindId> {
        self.kinds.get(kind).and_then(|entry| entry.parent)
    }

    /// Whether `kind` is `ancestor` or derives from it.
    pub fn is_a(&self, kind: KindId, ancestor: KindId) -> bool {
        let mut current = Some(kind);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.parent(id);
        }
        false
    }

    /// Whether a kind's tables have been built.
    pub fn is_resolved(&self, kind: KindId) -> bool {
        self.kinds.get(kind).is_some_and(|entry| entry.tables.is_some())
    }

    /// Build a kind's tables if that has not happened yet.
    pub fn resolve(&mut self, kind: KindId) -> Result<()> {
        let entry = self.entry(kind)?;
        if entry.tables.is_some() {
            return Ok(());
        }
        let (name, parent, class_init) = (entry.name.clone(), entry.parent, entry.class_init);

        let mut tables = match parent {
            Some(parent) => {
                self.resolve(parent)?;
                self.entry(parent)?.tables.clone().unwrap_or_default()
            }
            None => KindTables::default(),
        };
        {
            let mut recognizer = self.toolkit.recognizer().write();
            for trigger in tables.bindings.keys() {
                recognizer.add(trigger);
            }
        }

        let mut builder = KindBuilder {
            kind: &name,
            tables: &mut tables,
            toolkit: &self.toolkit,
        };
        class_init(&mut builder);
        self.apply_config(&name, &mut tables);

        tracing::debug!(
            target: targets::BINDINGS,
            kind = %name,
            actions = tables.actions.len(),
            bindings = tables.bindings.len(),
            "kind resolved"
        );
        if let Some(entry) = self.kinds.get_mut(kind) {
            entry.tables = Some(tables);
        }
        Ok(())
    }

    fn apply_config(&self, kind: &str, tables: &mut KindTables<H>) {
        let config = self.toolkit.config();
        let configured = config.actions_for(kind);
        let remaps = config.keyremaps(kind);
        if configured.is_empty() && remaps.is_empty() {
            return;
        }

        let names = self.toolkit.names();
        let mut recognizer = self.toolkit.recognizer().write();
        for human in &configured.unbind {
            match names.translate(human) {
                Some(trigger) => {
                    tables.unbind(&trigger, &mut recognizer);
                }
                None => tracing::warn!(target: targets::BINDINGS, kind, trigger = %human, "unknown key name in unbind"),
            }
        }
        for entry in &configured.bindings {
            match names.translate(&entry.trigger) {
                Some(trigger) => {
                    tables.bind(kind, &entry.action, &trigger, None, &mut recognizer);
                }
                None => tracing::warn!(
                    target: targets::BINDINGS,
                    kind,
                    action = %entry.action,
                    trigger = %entry.trigger,
                    "unknown key name in binding"
                ),
            }
        }
        for remap in remaps {
            match (names.translate(&remap.from), names.translate(&remap.to)) {
                (Some(from), Some(to)) => {
                    tables.remaps.insert(from, to);
                }
                _ => tracing::warn!(target: targets::BINDINGS, kind, from = %remap.from, to = %remap.to, "unknown key name in remap"),
            }
        }
    }

    fn tables_mut(&mut self, kind: KindId) -> Result<&mut KindTables<H>> {
        self.resolve(kind)?;
        self.kinds
            .get_mut(kind)
            .and_then(|entry| entry.tables.as_mut())
            .ok_or_else(|| TesseraError::UnknownKind(format!("{kind:?}")))
    }

    /// Insert or replace an action, optionally binding a default trigger.
    pub fn register_action(
        &mut self,
        kind: KindId,
        name: &str,
        callback: ActionCallback<H>,
        default_trigger: Option<&[u8]>,
        params: Option<Vec<ActionParam>>,
    ) -> Result<()> {
        self.tables_mut(kind)?.insert_action(name, callback);
        if let Some(trigger) = default_trigger {
            self.register_binding(kind, name, trigger, params)?;
        }
        Ok(())
    }

    /// Bind `trigger` to the action `name`; an empty name unbinds.
    ///
    /// Returns `false` when the action does not exist (the binding is
    /// dropped with a warning) or when unbinding a trigger that was not bound.
    pub fn register_binding(
        &mut self,
        kind: KindId,
        name: &str,
        trigger: &[u8],
        params: Option<Vec<ActionParam>>,
    ) -> Result<bool> {
        let recognizer = self.toolkit.recognizer().clone();
        let kind_name = self.entry(kind)?.name.clone();
        let tables = self.tables_mut(kind)?;
        let mut recognizer = recognizer.write();
        Ok(tables.bind(&kind_name, name, trigger, params, &mut recognizer))
    }

    /// Resolve the action a key would run, after remapping.
    pub fn lookup_key(&mut self, kind: KindId, key: &[u8]) -> Option<Invocation<H>> {
        let tables = self.tables_mut(kind).ok()?;
        let key = tables.remaps.get(key).map(Vec::as_slice).unwrap_or(key);
        let binding = tables.bindings.get(key)?;
        let action = tables.actions.get(&binding.action)?;
        Some(Invocation {
            action: binding.action.clone(),
            callback: action.callback.clone(),
            params: binding.params.clone(),
        })
    }

    /// Resolve a named action with explicit parameters.
    pub fn lookup_named(&mut self, kind: KindId, name: &str, params: &[ActionParam]) -> Option<Invocation<H>> {
        let tables = self.tables_mut(kind).ok()?;
        let action = tables.actions.get(name)?;
        Some(Invocation {
            action: name.to_string(),
            callback: action.callback.clone(),
            params: Some(params.to_vec()),
        })
    }

    /// Run the action bound to `key`. Returns whether it handled the key.
    pub fn perform_key(&mut self, host: &mut H, target: H::Target, kind: KindId, key: &[u8]) -> bool {
        self.lookup_key(kind, key)
            .is_some_and(|invocation| invocation.invoke(host, target))
    }

    /// Run an action by name.
    pub fn perform_named(
        &mut self,
        host: &mut H,
        target: H::Target,
        kind: KindId,
        name: &str,
        params: &[ActionParam],
    ) -> bool {
        self.lookup_named(kind, name, params)
            .is_some_and(|invocation| invocation.invoke(host, target))
    }

    /// The binding stored for a raw trigger (no remapping).
    pub fn binding(&mut self, kind: KindId, trigger: &[u8]) -> Option<&Binding> {
        self.tables_mut(kind).ok()?.bindings.get(trigger)
    }

    /// Whether a kind has an action with this name.
    pub fn has_action(&mut self, kind: KindId, name: &str) -> bool {
        self.tables_mut(kind)
            .is_ok_and(|tables| tables.actions.contains_key(name))
    }

    /// The name of the action a key would run, after remapping.
    pub fn bound_action(&mut self, kind: KindId, key: &[u8]) -> Option<String> {
        self.lookup_key(kind, key).map(|invocation| invocation.action)
    }

    /// Every trigger bound for a kind, sorted.
    pub fn triggers(&mut self, kind: KindId) -> Vec<Vec<u8>> {
        let mut triggers: Vec<Vec<u8>> = self
            .tables_mut(kind)
            .map(|tables| tables.bindings.keys().cloned().collect())
            .unwrap_or_default();
        triggers.sort();
        triggers
    }

    pub(crate) fn resolved_bindings(&mut self, kind: KindId) -> Vec<(Vec<u8>, String)> {
        self.tables_mut(kind)
            .map(|tables| {
                tables
                    .bindings
                    .iter()
                    .map(|(trigger, binding)| (trigger.clone(), binding.action.clone()))
                    .collect()
            })
            .unwrap_or_default()
    }
}

impl<H: ActionHost> Drop for KindRegistry<H> {
    fn drop(&mut self) {
        let mut recognizer = self.toolkit.recognizer().write();
        for entry in self.kinds.values() {
            if let Some(tables) = &entry.tables {
                for trigger in tables.bindings.keys() {
                    recognizer.remove(trigger);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tessera_style::StyleConfig;

    #[derive(Default)]
    struct Log(Vec<String>);

    impl ActionHost for Log {
        type Target = u32;
    }

    fn record(name: &'static str) -> ActionCallback<Log> {
        ActionCallback::new(move |log: &mut Log, target| {
            log.0.push(format!("{name}:{target}"));
            true
        })
    }

    fn base_init(k: &mut KindBuilder<'_, Log>) {
        k.action("first", record("first"))
            .action("second", record("second"))
            .bind("first", "c-a")
            .bind("second", "c-b");
    }

    fn child_init(k: &mut KindBuilder<'_, Log>) {
        k.action("second", record("child-second")).unbind("c-a").bind("second", "c-c");
    }

    #[test]
    fn test_child_inherits_by_copy() {
        let mut kinds = KindRegistry::<Log>::new(Toolkit::default());
        let base = kinds.register_kind("Base", None, base_init).unwrap();
        let child = kinds.register_kind("Child", Some(base), child_init).unwrap();
        let mut log = Log::default();

        assert!(kinds.perform_key(&mut log, 1, child, b"\x02"));
        assert!(kinds.perform_key(&mut log, 2, child, b"\x03"));
        assert!(!kinds.perform_key(&mut log, 3, child, b"\x01"));
        assert!(kinds.perform_key(&mut log, 4, base, b"\x01"));
        assert!(kinds.perform_key(&mut log, 5, base, b"\x02"));
        assert_eq!(
            log.0,
            vec!["child-second:1", "child-second:2", "first:4", "second:5"]
        );
    }

    #[test]
    fn test_parent_changes_after_resolution_do_not_leak() {
        let mut kinds = KindRegistry::<Log>::new(Toolkit::default());
        let base = kinds.register_kind("Base", None, base_init).unwrap();
        let child = kinds.register_kind("Child", Some(base), |_| {}).unwrap();
        kinds.resolve(child).unwrap();

        kinds
            .register_action(base, "third", record("third"), Some(b"\x04"), None)
            .unwrap();
        assert!(kinds.has_action(base, "third"));
        assert!(!kinds.has_action(child, "third"));
        assert!(kinds.binding(child, b"\x04").is_none());
    }

    #[test]
    fn test_unknown_action_binding_is_dropped() {
        let toolkit = Toolkit::default();
        let mut kinds = KindRegistry::<Log>::new(toolkit.clone());
        let base = kinds.register_kind("Base", None, base_init).unwrap();
        assert!(!kinds.register_binding(base, "missing", b"\x05", None).unwrap());
        assert!(!toolkit.recognizer().read().contains(b"\x05"));
    }

    #[test]
    fn test_bound_params_reach_callback() {
        let mut kinds = KindRegistry::<Log>::new(Toolkit::default());
        let kind = kinds.register_kind("Base", None, |_| {}).unwrap();
        kinds
            .register_action(
                kind,
                "jump",
                ActionCallback::with_params(|log: &mut Log, _, params| {
                    log.0.push(format!("{:?}", params.first().and_then(ActionParam::as_int)));
                    true
                }),
                Some(b"\x1b1"),
                Some(vec![ActionParam::Int(0)]),
            )
            .unwrap();

        let mut log = Log::default();
        assert!(kinds.perform_key(&mut log, 0, kind, b"\x1b1"));
        assert!(kinds.perform_named(&mut log, 0, kind, "jump", &[ActionParam::Int(7)]));
        assert!(kinds.perform_named(&mut log, 0, kind, "jump", &[]));
        assert_eq!(log.0, vec!["Some(0)", "Some(7)", "None"]);
    }

    #[test]
    fn test_trigger_shared_by_two_kinds_survives_one_unbind() {
        let toolkit = Toolkit::default();
        let mut kinds = KindRegistry::<Log>::new(toolkit.clone());
        let a = kinds.register_kind("A", None, base_init).unwrap();
        let b = kinds.register_kind("B", None, base_init).unwrap();
        kinds.resolve(a).unwrap();
        kinds.resolve(b).unwrap();
        assert_eq!(toolkit.recognizer().read().refcount(b"\x01"), 2);

        assert!(kinds.register_binding(a, "", b"\x01", None).unwrap());
        assert!(kinds.binding(a, b"\x01").is_none());
        assert!(toolkit.recognizer().read().contains(b"\x01"));

        assert!(kinds.register_binding(b, "", b"\x01", None).unwrap());
        assert!(!toolkit.recognizer().read().contains(b"\x01"));
    }

    #[test]
    fn test_config_bindings_remaps_and_unbind() {
        let config = StyleConfig::from_str(
            "[Base::binding]\nsecond = c-x\nunbind = c-a\nghost = c-y\n\n[Base::remap]\nc-j = c-b\n",
        )
        .unwrap();
        let toolkit = Toolkit::init(config);
        let mut kinds = KindRegistry::<Log>::new(toolkit.clone());
        let base = kinds.register_kind("Base", None, base_init).unwrap();
        let mut log = Log::default();

        assert!(kinds.perform_key(&mut log, 0, base, b"\x18"));
        assert!(!kinds.perform_key(&mut log, 0, base, b"\x01"));
        assert!(kinds.perform_key(&mut log, 0, base, b"\n"));
        assert!(!kinds.perform_key(&mut log, 0, base, b"\x19"));
        assert_eq!(log.0, vec!["second:0", "second:0"]);
        assert!(!toolkit.recognizer().read().contains(b"\x19"));
    }

    #[test]
    fn test_drop_releases_triggers() {
        let toolkit = Toolkit::default();
        {
            let mut kinds = KindRegistry::<Log>::new(toolkit.clone());
            let base = kinds.register_kind("Base", None, base_init).unwrap();
            kinds.resolve(base).unwrap();
            assert!(!toolkit.recognizer().read().is_empty());
        }
        assert!(toolkit.recognizer().read().is_empty());
    }

    #[test]
    fn test_duplicate_and_unknown_kinds() {
        let mut kinds = KindRegistry::<Log>::new(Toolkit::default());
        let base = kinds.register_kind("Base", None, base_init).unwrap();
        assert!(matches!(
            kinds.register_kind("Base", None, base_init),
            Err(TesseraError::DuplicateKind(_))
        ));
        let child = kinds.register_kind("Child", Some(base), child_init).unwrap();
        assert!(kinds.is_a(child, base));
        assert!(!kinds.is_a(base, child));
        assert_eq!(kinds.kind_id("Child"), Some(child));
        assert_eq!(kinds.kind_name(child), Some("Child"));
    }
}
