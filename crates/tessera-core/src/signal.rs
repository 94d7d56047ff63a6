//! Signal/slot system for Horizon Tessera.
//!
//! Signals notify observers about window-manager and widget state changes
//! (a window was created, focus moved, a workspace was switched). The toolkit
//! is single-threaded, so every slot runs synchronously inside `emit`.
//!
//! # Key Types
//!
//! - [`Signal<Args>`] - Notification with any number of observers
//! - [`VetoSignal<Args>`] - Confirmation hook; any slot may refuse
//! - [`ConnectionId`] - Returned when connecting a slot
//! - [`ConnectionGuard`] - RAII guard that disconnects when dropped
//!
//! # Example
//!
//! ```
//! use tessera_core::{Signal, VetoSignal};
//!
//! let closed = Signal::<String>::new();
//! let id = closed.connect(|title| println!("closed {title}"));
//! closed.emit("Buddy List".to_string());
//! closed.disconnect(id);
//!
//! let confirm_close = VetoSignal::<u32>::new();
//! confirm_close.connect(|&window| window != 7);
//! assert!(confirm_close.emit(&1));
//! assert!(!confirm_close.emit(&7));
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::Mutex;
use slotmap::{SlotMap, new_key_type};

use crate::logging::targets;

new_key_type! {
    /// A unique identifier for a signal-slot connection.
    ///
    /// Returned by [`Signal::connect`] and [`VetoSignal::connect`], used to
    /// disconnect the slot later.
    pub struct ConnectionId;
}

type Slot<Args> = Arc<dyn Fn(&Args) + Send + Sync>;
type VetoSlot<Args> = Arc<dyn Fn(&Args) -> bool + Send + Sync>;

/// A type-safe signal that can have multiple connected slots.
///
/// Use `()` for signals with no arguments, or a tuple for several.
pub struct Signal<Args> {
    connections: Mutex<SlotMap<ConnectionId, Slot<Args>>>,
    blocked: AtomicBool,
}

impl<Args> Default for Signal<Args> {
    fn default() -> Self {
        Self::new()
    }
}

impl<Args> std::fmt::Debug for Signal<Args> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Signal")
            .field("connections", &self.connection_count())
            .field("blocked", &self.is_blocked())
            .finish()
    }
}

impl<Args> Signal<Args> {
    /// Create a new signal with no connections.
    pub fn new() -> Self {
        Self {
            connections: Mutex::new(SlotMap::with_key()),
            blocked: AtomicBool::new(false),
        }
    }

    /// Connect a slot (closure) to this signal.
    pub fn connect<F>(&self, slot: F) -> ConnectionId
    where
        F: Fn(&Args) + Send + Sync + 'static,
    {
        self.connections.lock().insert(Arc::new(slot))
    }

    /// Connect a slot that is disconnected when the returned guard drops.
    pub fn connect_scoped<F>(&self, slot: F) -> ConnectionGuard<'_, Args>
    where
        F: Fn(&Args) + Send + Sync + 'static,
    {
        let id = self.connect(slot);
        ConnectionGuard { signal: self, id }
    }

    /// Disconnect a specific slot by its connection ID.
    ///
    /// Returns `true` if the connection was found and removed.
    pub fn disconnect(&self, id: ConnectionId) -> bool {
        self.connections.lock().remove(id).is_some()
    }

    /// Disconnect all slots from this signal.
    pub fn disconnect_all(&self) {
        self.connections.lock().clear();
    }

    /// Get the number of connected slots.
    pub fn connection_count(&self) -> usize {
        self.connections.lock().len()
    }

    /// Block signal emission temporarily.
    pub fn set_blocked(&self, blocked: bool) {
        self.blocked.store(blocked, Ordering::SeqCst);
    }

    /// Check if signal emission is currently blocked.
    pub fn is_blocked(&self) -> bool {
        self.blocked.load(Ordering::SeqCst)
    }

    /// Emit the signal, invoking all connected slots in connection order.
    ///
    /// Slots are snapshotted before any is called, so a slot may connect or
    /// disconnect other slots without deadlocking.
    pub fn emit(&self, args: Args) {
        if self.is_blocked() {
            tracing::trace!(target: targets::SIGNAL, "signal blocked, skipping emit");
            return;
        }

        let slots: Vec<Slot<Args>> = self.connections.lock().values().cloned().collect();
        tracing::trace!(target: targets::SIGNAL, connection_count = slots.len(), "emitting signal");
        for slot in slots {
            slot(&args);
        }
    }
}

/// A confirmation hook: every connected slot may veto the request.
///
/// `emit` returns `true` when no slot objects (including when nothing is
/// connected) and stops at the first slot that returns `false`.
pub struct VetoSignal<Args> {
    connections: Mutex<SlotMap<ConnectionId, VetoSlot<Args>>>,
}

impl<Args> Default for VetoSignal<Args> {
    fn default() -> Self {
        Self::new()
    }
}

impl<Args> std::fmt::Debug for VetoSignal<Args> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VetoSignal")
            .field("connections", &self.connection_count())
            .finish()
    }
}

impl<Args> VetoSignal<Args> {
    /// Create a new veto signal with no connections.
    pub fn new() -> Self {
        Self {
            connections: Mutex::new(SlotMap::with_key()),
        }
    }

    /// Connect a slot that approves (`true`) or vetoes (`false`) a request.
    pub fn connect<F>(&self, slot: F) -> ConnectionId
    where
        F: Fn(&Args) -> bool + Send + Sync + 'static,
    {
        self.connections.lock().insert(Arc::new(slot))
    }

    /// Disconnect a specific slot by its connection ID.
    pub fn disconnect(&self, id: ConnectionId) -> bool {
        self.connections.lock().remove(id).is_some()
    }

    /// Get the number of connected slots.
    pub fn connection_count(&self) -> usize {
        self.connections.lock().len()
    }

    /// Ask every slot for approval.
    pub fn emit(&self, args: &Args) -> bool {
        let slots: Vec<VetoSlot<Args>> = self.connections.lock().values().cloned().collect();
        for slot in slots {
            if !slot(args) {
                tracing::trace!(target: targets::SIGNAL, "request vetoed");
                return false;
            }
        }
        true
    }
}

/// RAII guard returned by [`Signal::connect_scoped`].
pub struct ConnectionGuard<'a, Args> {
    signal: &'a Signal<Args>,
    id: ConnectionId,
}

impl<Args> ConnectionGuard<'_, Args> {
    /// The ID of the guarded connection.
    pub fn id(&self) -> ConnectionId {
        self.id
    }
}

impl<Args> Drop for ConnectionGuard<'_, Args> {
    fn drop(&mut self) {
        self.signal.disconnect(self.id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    #[test]
    fn test_signal_emit_in_connection_order() {
        let signal = Signal::<i32>::new();
        let received = Arc::new(Mutex::new(Vec::new()));

        for offset in [0, 100] {
            let received = received.clone();
            signal.connect(move |&value| received.lock().push(value + offset));
        }

        signal.emit(1);
        assert_eq!(*received.lock(), vec![1, 101]);
    }

    #[test]
    fn test_signal_disconnect() {
        let signal = Signal::<i32>::new();
        let received = Arc::new(Mutex::new(Vec::new()));

        let received_clone = received.clone();
        let conn_id = signal.connect(move |&value| {
            received_clone.lock().push(value);
        });

        signal.emit(1);
        assert!(signal.disconnect(conn_id));
        assert!(!signal.disconnect(conn_id));
        signal.emit(2);

        assert_eq!(*received.lock(), vec![1]);
    }

    #[test]
    fn test_signal_blocked() {
        let signal = Signal::<i32>::new();
        let count = Arc::new(AtomicUsize::new(0));

        let count_clone = count.clone();
        signal.connect(move |_| {
            count_clone.fetch_add(1, Ordering::SeqCst);
        });

        signal.emit(1);
        signal.set_blocked(true);
        signal.emit(2);
        signal.set_blocked(false);
        signal.emit(3);

        assert_eq!(count.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_connection_guard() {
        let signal = Signal::<i32>::new();
        let count = Arc::new(AtomicUsize::new(0));

        {
            let count_clone = count.clone();
            let _guard = signal.connect_scoped(move |_| {
                count_clone.fetch_add(1, Ordering::SeqCst);
            });
            signal.emit(1);
        }

        signal.emit(2);
        assert_eq!(count.load(Ordering::SeqCst), 1);
        assert_eq!(signal.connection_count(), 0);
    }

    #[test]
    fn test_veto_signal_without_slots_approves() {
        let veto = VetoSignal::<()>::new();
        assert!(veto.emit(&()));
    }

    #[test]
    fn test_veto_signal_stops_at_first_veto() {
        let veto = VetoSignal::<i32>::new();
        let calls = Arc::new(AtomicUsize::new(0));

        veto.connect(|&n| n > 0);
        let calls_clone = calls.clone();
        veto.connect(move |_| {
            calls_clone.fetch_add(1, Ordering::SeqCst);
            true
        });

        assert!(veto.emit(&5));
        assert!(!veto.emit(&-1));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
