//=========================================================================
// Event Channel
//=========================================================================
//
// Observer list with token-based listener removal.
//
// Listeners are stored as Rc<dyn Fn()> keyed by a monotonically
// assigned ListenerId. Dispatch iterates a snapshot of the list, so
// listeners may subscribe or unsubscribe re-entrantly without
// corrupting the traversal.
//
// Pattern: subscribe → emit (N listeners) → unsubscribe by token
//
//=========================================================================

//=== External Dependencies ===============================================

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

//=== Listener Id =========================================================

/// Token identifying a subscribed listener.
///
/// Returned by [`EventChannel::subscribe`] and required for removal, so
/// unsubscription never depends on comparing closures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

//=== Channel Internals ===================================================

struct ChannelInner {
    next_id: u64,
    listeners: Vec<(ListenerId, Rc<dyn Fn()>)>,
}

impl ChannelInner {
    fn remove(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(listener_id, _)| *listener_id != id);
        self.listeners.len() != before
    }
}

//=== Event Channel =======================================================

/// A single subscribable event stream.
///
/// Emission dispatches to every listener subscribed at emit time:
/// listeners added during dispatch do not fire until the next emit, and
/// listeners removed during dispatch still receive the in-flight event.
pub struct EventChannel {
    inner: Rc<RefCell<ChannelInner>>,
}

impl EventChannel {
    /// Creates a channel with no listeners.
    pub fn new() -> Self {
        Self {
            inner: Rc::new(RefCell::new(ChannelInner {
                next_id: 0,
                listeners: Vec::new(),
            })),
        }
    }

    //--- Subscription -----------------------------------------------------

    /// Subscribes a listener and returns its removal token.
    pub fn subscribe<F>(&self, listener: F) -> ListenerId
    where
        F: Fn() + 'static,
    {
        let mut inner = self.inner.borrow_mut();
        let id = ListenerId(inner.next_id);
        inner.next_id += 1;
        inner.listeners.push((id, Rc::new(listener)));
        id
    }

    /// Removes a listener by token.
    ///
    /// Returns false when the token is unknown (never subscribed, or
    /// already removed).
    pub fn unsubscribe(&self, id: ListenerId) -> bool {
        self.inner.borrow_mut().remove(id)
    }

    /// Subscribes a listener that fires at most once.
    ///
    /// The wrapper deregisters itself from the channel *before* invoking
    /// the wrapped callback, so neither a completion event that re-fires
    /// nor a re-entrant emit from inside the callback can double-fire it.
    pub fn subscribe_once<F>(&self, listener: F) -> ListenerId
    where
        F: FnOnce() + 'static,
    {
        let channel: Weak<RefCell<ChannelInner>> = Rc::downgrade(&self.inner);
        let token: Rc<Cell<Option<ListenerId>>> = Rc::new(Cell::new(None));
        let slot = RefCell::new(Some(listener));

        let hook = {
            let token = Rc::clone(&token);
            move || {
                if let Some(id) = token.take() {
                    if let Some(inner) = channel.upgrade() {
                        inner.borrow_mut().remove(id);
                    }
                }
                if let Some(callback) = slot.borrow_mut().take() {
                    callback();
                }
            }
        };

        let id = self.subscribe(hook);
        token.set(Some(id));
        id
    }

    //--- Dispatch ---------------------------------------------------------

    /// Dispatches the event to every listener subscribed at emit time.
    pub fn emit(&self) {
        let snapshot: Vec<Rc<dyn Fn()>> = self
            .inner
            .borrow()
            .listeners
            .iter()
            .map(|(_, listener)| Rc::clone(listener))
            .collect();

        for listener in snapshot {
            listener();
        }
    }

    //--- Query API --------------------------------------------------------

    /// Number of currently subscribed listeners.
    pub fn listener_count(&self) -> usize {
        self.inner.borrow().listeners.len()
    }

    /// Returns true if no listeners are subscribed.
    pub fn is_empty(&self) -> bool {
        self.listener_count() == 0
    }
}

impl Default for EventChannel {
    fn default() -> Self {
        Self::new()
    }
}

//=========================================================================
// Tests
//=========================================================================
