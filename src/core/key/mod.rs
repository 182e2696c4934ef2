//=========================================================================
// Screen Key Registry
//=========================================================================
//
// Stable identity objects that address screens without holding the
// manager directly.
//
// A key binds to at most one manager at a time. The manager registers
// its configured keys on activation and deregisters them on
// deactivation; callers then route show/hide requests through the key.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use log::{error, warn};

//=== Internal Dependencies ===============================================

use crate::core::screen::ScreenId;
use crate::core::stack::ManagerCore;

//=== Screen Key ==========================================================

/// Addressable identity for a single screen.
///
/// Keys are long-lived: create them once, hand them to the manager
/// configuration, and share them with whatever UI wiring needs to
/// request visibility changes. While the owning manager is active the
/// key forwards requests to it; an unbound key reports an error and
/// leaves all state untouched.
pub struct ScreenKey<K: ScreenId> {
    id: K,
    manager: RefCell<Option<Weak<ManagerCore<K>>>>,
}

impl<K: ScreenId> ScreenKey<K> {
    /// Creates an unbound key for the given screen id.
    pub fn new(id: K) -> Rc<Self> {
        Rc::new(Self {
            id,
            manager: RefCell::new(None),
        })
    }

    /// The screen id this key addresses.
    pub fn id(&self) -> K {
        self.id
    }

    //--- Requests ---------------------------------------------------------

    /// Asks the bound manager to show this key's screen.
    ///
    /// Logs an error and leaves all state untouched when the key is not
    /// registered to a live manager.
    pub fn request_show(&self) {
        match self.bound() {
            Some(core) => core.show_screen(self.id, None),
            None => error!("Cannot show screen {:?} through an unregistered key", self.id),
        }
    }

    /// Asks the bound manager to hide this key's screen.
    ///
    /// Logs an error and leaves all state untouched when the key is not
    /// registered to a live manager.
    pub fn request_hide(&self) {
        match self.bound() {
            Some(core) => core.hide_screen(self.id, None),
            None => error!("Cannot hide screen {:?} through an unregistered key", self.id),
        }
    }

    //--- Query API --------------------------------------------------------

    /// True while the key is bound to a live manager.
    pub fn is_registered(&self) -> bool {
        self.bound().is_some()
    }

    /// True while this key's screen sits on the bound manager's stack.
    /// An unbound key is never shown.
    pub fn is_shown(&self) -> bool {
        self.bound()
            .map_or(false, |core| core.is_screen_shown(self.id))
    }

    //--- Binding (manager-driven) ----------------------------------------

    pub(crate) fn register(&self, core: &Rc<ManagerCore<K>>) {
        if self.bound().is_some() {
            warn!(
                "Screen key {:?} is already registered; keeping only the latest registration",
                self.id
            );
        }
        *self.manager.borrow_mut() = Some(Rc::downgrade(core));
    }

    pub(crate) fn deregister(&self) {
        if self.bound().is_none() {
            warn!("Attempted to deregister screen key {:?}, which is not registered", self.id);
        }
        *self.manager.borrow_mut() = None;
    }

    fn bound(&self) -> Option<Rc<ManagerCore<K>>> {
        self.manager.borrow().as_ref().and_then(Weak::upgrade)
    }
}

//=========================================================================
// Tests
//=========================================================================
