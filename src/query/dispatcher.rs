//! Subscriber registry with an arm switch.
//!
//! While disarmed, mutations are silent. Re-arming does not replay them.

use super::codec::QueryMap;
use std::fmt;
use std::rc::Rc;

/// Called once per settled batch of mutations with the current params.
pub type Listener = Rc<dyn Fn(&QueryMap)>;

/// Handle returned by `subscribe`, used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

/// Ordered set of listeners plus the armed flag.
pub struct Dispatcher {
    listeners: Vec<(SubscriptionId, Listener)>,
    next_id: u64,
    armed: bool,
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl Dispatcher {
    /// Create an armed dispatcher without listeners.
    pub fn new() -> Self {
        Self {
            listeners: Vec::new(),
            next_id: 0,
            armed: true,
        }
    }

    /// Register `listener`; listeners run in subscription order.
    pub fn subscribe(&mut self, listener: Listener) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.listeners.push((id, listener));
        id
    }

    /// Remove a listener. Returns `false` if it was already gone.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(existing, _)| *existing != id);
        self.listeners.len() != before
    }

    /// Start notifying.
    pub fn arm(&mut self) {
        self.armed = true;
    }

    /// Stop notifying.
    pub fn disarm(&mut self) {
        self.armed = false;
    }

    /// Whether mutations currently notify.
    pub fn is_armed(&self) -> bool {
        self.armed
    }

    /// Number of listeners.
    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    /// Whether there are no listeners.
    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }

    /// Snapshot of listeners, so they can be called without holding a borrow
    /// of the owner.
    pub fn listeners(&self) -> Vec<Listener> {
        self.listeners
            .iter()
            .map(|(_, listener)| Rc::clone(listener))
            .collect()
    }
}

impl fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dispatcher")
            .field("listeners", &self.listeners.len())
            .field("armed", &self.armed)
            .finish()
    }
}
