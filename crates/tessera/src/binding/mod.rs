//! Named actions and the key bindings that trigger them.
//!
//! Every widget kind (and the window manager) owns a table of named
//! [`Action`]s and a table of trigger → [`Binding`] entries. A kind starts
//! from a copy of its parent kind's resolved tables, adds its own
//! registrations, then applies the user's configuration. See
//! [`KindRegistry`] for the lifecycle.
//!
//! Callbacks receive the host that owns the registry (the widget tree or the
//! window manager) plus a target (the widget that received the key).

mod help;
mod registry;

use std::fmt;
use std::rc::Rc;

pub use help::BindingHelpRow;
pub use registry::{ClassInit, KindBuilder, KindId, KindRegistry};

/// Something that owns a [`KindRegistry`] and dispatches actions on itself.
pub trait ActionHost: 'static {
    /// What an action is performed on.
    type Target: Copy + fmt::Debug;
}

/// An opaque parameter pre-bound to a trigger or passed to a named action.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ActionParam {
    Int(i64),
    Str(String),
    Bool(bool),
}

impl ActionParam {
    pub fn as_int(&self) -> Option<i64> {
        match self {
            ActionParam::Int(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            ActionParam::Str(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ActionParam::Bool(value) => Some(*value),
            _ => None,
        }
    }
}

type PlainFn<H> = dyn Fn(&mut H, <H as ActionHost>::Target) -> bool;
type ParamFn<H> = dyn Fn(&mut H, <H as ActionHost>::Target, &[ActionParam]) -> bool;

/// The callback of an action. Returns `true` when the input was handled.
pub enum ActionCallback<H: ActionHost> {
    /// Ignores any parameters.
    NoParams(Rc<PlainFn<H>>),
    /// Receives the bound (or passed) parameter list.
    WithParams(Rc<ParamFn<H>>),
}

impl<H: ActionHost> ActionCallback<H> {
    /// A callback that takes no parameters.
    pub fn new<F>(callback: F) -> Self
    where
        F: Fn(&mut H, H::Target) -> bool + 'static,
    {
        ActionCallback::NoParams(Rc::new(callback))
    }

    /// A callback that receives a parameter list.
    pub fn with_params<F>(callback: F) -> Self
    where
        F: Fn(&mut H, H::Target, &[ActionParam]) -> bool + 'static,
    {
        ActionCallback::WithParams(Rc::new(callback))
    }
}

impl<H: ActionHost> Clone for ActionCallback<H> {
    fn clone(&self) -> Self {
        match self {
            ActionCallback::NoParams(f) => ActionCallback::NoParams(Rc::clone(f)),
            ActionCallback::WithParams(f) => ActionCallback::WithParams(Rc::clone(f)),
        }
    }
}

impl<H: ActionHost> fmt::Debug for ActionCallback<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActionCallback::NoParams(_) => f.write_str("NoParams(..)"),
            ActionCallback::WithParams(_) => f.write_str("WithParams(..)"),
        }
    }
}

/// A named action.
pub struct Action<H: ActionHost> {
    pub name: String,
    pub callback: ActionCallback<H>,
}

impl<H: ActionHost> Clone for Action<H> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            callback: self.callback.clone(),
        }
    }
}

impl<H: ActionHost> fmt::Debug for Action<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Action")
            .field("name", &self.name)
            .field("callback", &self.callback)
            .finish()
    }
}

/// A trigger's entry: which action it runs and with what parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Binding {
    pub action: String,
    pub params: Option<Vec<ActionParam>>,
}

/// A resolved action call, detached from the registry so the host can be
/// borrowed mutably while it runs.
pub struct Invocation<H: ActionHost> {
    action: String,
    callback: ActionCallback<H>,
    params: Option<Vec<ActionParam>>,
}

impl<H: ActionHost> Invocation<H> {
    /// The name of the action that will run.
    pub fn action(&self) -> &str {
        &self.action
    }

    /// Run the action.
    pub fn invoke(self, host: &mut H, target: H::Target) -> bool {
        tracing::trace!(
            target: tessera_core::logging::targets::BINDINGS,
            action = %self.action,
            ?target,
            "performing action"
        );
        match (&self.callback, &self.params) {
            (ActionCallback::NoParams(f), _) => f(host, target),
            (ActionCallback::WithParams(f), Some(params)) => f(host, target, params),
            (ActionCallback::WithParams(f), None) => f(host, target, &[]),
        }
    }
}
