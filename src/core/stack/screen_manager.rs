//=========================================================================
// Screen Manager
//=========================================================================
//
// Owns the key→screen lookup and the visibility stack, and drives the
// show/hide protocol.
//
// Screens are configured once and addressed by id. The stack records
// which screens are visible, newest-first: index 0 is the current
// (topmost) screen, and an id appears at most once. The lookup is built
// eagerly at construction and never changes afterwards; only the stack
// and the listener caches are mutable.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::{Rc, Weak};

use log::{debug, warn};

//=== Internal Dependencies ===============================================

use crate::core::events::ListenerId;
use crate::core::key::ScreenKey;
use crate::core::screen::{Screen, ScreenId};

//=== Configuration =======================================================

/// A configured (key, screen) pair.
///
/// A binding without a screen is invalid: its key still registers with
/// the manager on activation, but the binding is excluded from stack
/// logic and event hookup, and resolving it reports "not found".
pub struct ScreenBinding<K: ScreenId> {
    pub key: Rc<ScreenKey<K>>,
    pub screen: Option<Rc<dyn Screen>>,
}

impl<K: ScreenId> ScreenBinding<K> {
    /// Creates a valid binding.
    pub fn new(key: Rc<ScreenKey<K>>, screen: Rc<dyn Screen>) -> Self {
        Self {
            key,
            screen: Some(screen),
        }
    }
}

/// Static host-side configuration for a [`ScreenManager`].
pub struct ScreenManagerConfig<K: ScreenId> {
    /// Screen shown by `start()` after the initial forced hide.
    pub starting_key: Option<K>,

    /// All bindings this manager owns. Binding order determines event
    /// hookup order.
    pub screens: Vec<ScreenBinding<K>>,
}

//=== Completion Callback =================================================

type Completion = Box<dyn FnOnce()>;

//=== Listener Hooks ======================================================

// Tokens for the internal listeners attached on activation, kept per
// channel in hookup order so deactivation removes exactly the listeners
// that were added.
struct ListenerHooks<K: ScreenId> {
    show_started: Vec<(K, ListenerId)>,
    show_completed: Vec<(K, ListenerId)>,
    hide_started: Vec<(K, ListenerId)>,
    hide_completed: Vec<(K, ListenerId)>,
}

impl<K: ScreenId> ListenerHooks<K> {
    fn new() -> Self {
        Self {
            show_started: Vec::new(),
            show_completed: Vec::new(),
            hide_started: Vec::new(),
            hide_completed: Vec::new(),
        }
    }
}

//=== Manager Core ========================================================

// Shared state reachable from registered keys and internal listeners.
//
// Invariants: the stack only holds ids present in the lookup, and no
// borrow of `stack` or `hooks` is held across Screen::show(),
// Screen::hide(), or any event dispatch, so re-entrant requests from
// completion callbacks re-borrow fresh state.
pub(crate) struct ManagerCore<K: ScreenId> {
    starting_key: Option<K>,
    keys: Vec<Rc<ScreenKey<K>>>,
    lookup: HashMap<K, Rc<dyn Screen>>,
    order: Vec<K>,
    stack: RefCell<Vec<K>>,
    hooks: RefCell<ListenerHooks<K>>,
    initialized: Cell<bool>,
}

impl<K: ScreenId> ManagerCore<K> {
    //--- Construction -----------------------------------------------------

    fn new(config: ScreenManagerConfig<K>) -> Self {
        let mut keys = Vec::new();
        let mut lookup: HashMap<K, Rc<dyn Screen>> = HashMap::new();
        let mut order = Vec::new();

        for binding in config.screens {
            let id = binding.key.id();
            keys.push(binding.key);

            if let Some(screen) = binding.screen {
                if lookup.insert(id, screen).is_some() {
                    warn!("Screen {:?} was already bound and has been replaced", id);
                } else {
                    order.push(id);
                }
            }
        }

        Self {
            starting_key: config.starting_key,
            keys,
            lookup,
            order,
            stack: RefCell::new(Vec::new()),
            hooks: RefCell::new(ListenerHooks::new()),
            initialized: Cell::new(false),
        }
    }

    //--- Stack Operations -------------------------------------------------

    pub(crate) fn show_screen(&self, id: K, on_complete: Option<Completion>) {
        self.append_internal(id, true, on_complete);
    }

    fn append_screen(&self, id: K, on_complete: Option<Completion>) {
        self.append_internal(id, false, on_complete);
    }

    fn append_internal(&self, id: K, hide_others: bool, on_complete: Option<Completion>) {
        let Some(screen) = self.try_get_screen(id) else {
            return;
        };

        if hide_others {
            self.hide_all_screens_except(id);
        }

        {
            let stack = self.stack.borrow();
            if stack.first() == Some(&id) {
                return;
            }
            if stack.contains(&id) {
                return;
            }
        }

        screen.show();

        // Fire and remove: the one-shot detaches itself on the screen's
        // next show-completed event.
        if let Some(on_complete) = on_complete {
            screen.events().show_completed.subscribe_once(on_complete);
        }

        // A show-started listener may have re-entered and stacked the id
        // already; re-validate before inserting.
        let mut stack = self.stack.borrow_mut();
        if !stack.contains(&id) {
            stack.insert(0, id);
        }
    }

    fn hide_current_screen(&self, on_complete: Option<Completion>) {
        let Some(current) = self.current_screen() else {
            return;
        };
        self.hide_internal(current, on_complete);
    }

    pub(crate) fn hide_screen(&self, id: K, on_complete: Option<Completion>) {
        if self.try_get_screen(id).is_none() {
            return;
        }
        if !self.is_screen_shown(id) {
            return;
        }
        self.hide_internal(id, on_complete);
    }

    fn hide_internal(&self, id: K, on_complete: Option<Completion>) {
        // The stack only holds resolvable ids.
        let Some(screen) = self.lookup.get(&id).cloned() else {
            return;
        };

        screen.hide();

        if let Some(on_complete) = on_complete {
            screen.events().hide_completed.subscribe_once(on_complete);
        }

        self.stack.borrow_mut().retain(|stacked| *stacked != id);
    }

    fn hide_all_screens(&self) {
        while self.stack_len() > 0 {
            self.hide_current_screen(None);
        }
    }

    fn hide_all_screens_except(&self, id: K) {
        loop {
            let (len, current) = {
                let stack = self.stack.borrow();
                (stack.len(), stack.first().copied())
            };

            if len == 0 {
                break;
            }

            if current != Some(id) {
                self.hide_current_screen(None);
            } else if len > 1 {
                // The target is current with screens buried below it:
                // hide its immediate neighbor, one per iteration, rather
                // than cycling the target through a hide/re-show.
                let below = self.stack.borrow()[1];
                self.hide_internal(below, None);
            } else {
                break;
            }
        }
    }

    //--- Query API --------------------------------------------------------

    fn current_screen(&self) -> Option<K> {
        self.stack.borrow().first().copied()
    }

    pub(crate) fn is_screen_shown(&self, id: K) -> bool {
        self.stack.borrow().contains(&id)
    }

    fn try_get_screen(&self, id: K) -> Option<Rc<dyn Screen>> {
        let screen = self.lookup.get(&id).cloned();
        if screen.is_none() {
            warn!("Screen {:?} does not exist in this manager", id);
        }
        screen
    }

    fn stack_len(&self) -> usize {
        self.stack.borrow().len()
    }

    fn stack_keys(&self) -> Vec<K> {
        self.stack.borrow().clone()
    }

    //--- Lifecycle --------------------------------------------------------

    fn initialize(&self) {
        if self.initialized.replace(true) {
            warn!("Screen manager initialized more than once");
            return;
        }

        for key in &self.keys {
            let id = key.id();
            if !self.lookup.contains_key(&id) {
                warn!(
                    "Screen {:?} has no screen object; its key registers but requests will not resolve",
                    id
                );
            }
        }
    }

    fn start(&self) {
        self.force_hide_all_screens();
        self.show_starting_screen();
    }

    fn activate(core: &Rc<Self>) {
        core.hook_screen_events();
        Self::register_screen_keys(core);
    }

    fn deactivate(&self) {
        self.unhook_screen_events();
        self.deregister_screen_keys();
    }

    // Direct state reset bypassing the show/hide protocol: no events, no
    // hide animation, just both flags forced off.
    fn force_hide_all_screens(&self) {
        self.stack.borrow_mut().clear();

        for id in &self.order {
            if let Some(screen) = self.lookup.get(id) {
                screen.set_interactable(false);
                screen.set_active(false);
            }
        }
    }

    fn show_starting_screen(&self) {
        if let Some(id) = self.starting_key {
            debug!("Showing starting screen {:?}", id);
            self.show_screen(id, None);
        }
    }

    //--- Event Hookup -----------------------------------------------------

    fn hook_screen_events(&self) {
        let mut hooks = self.hooks.borrow_mut();

        for &id in &self.order {
            let Some(screen) = self.lookup.get(&id) else {
                continue;
            };
            let events = screen.events();
            let weak = Rc::downgrade(screen);

            hooks.show_started.push((
                id,
                events.show_started.subscribe({
                    let weak = Weak::clone(&weak);
                    move || {
                        debug!("Show: {:?}", id);
                        if let Some(screen) = weak.upgrade() {
                            screen.set_interactable(false);
                            screen.set_active(true);
                        }
                    }
                }),
            ));

            hooks.show_completed.push((
                id,
                events.show_completed.subscribe({
                    let weak = Weak::clone(&weak);
                    move || {
                        debug!("Show complete: {:?}", id);
                        if let Some(screen) = weak.upgrade() {
                            screen.set_interactable(true);
                        }
                    }
                }),
            ));

            hooks.hide_started.push((
                id,
                events.hide_started.subscribe({
                    let weak = Weak::clone(&weak);
                    move || {
                        debug!("Hide: {:?}", id);
                        if let Some(screen) = weak.upgrade() {
                            screen.set_interactable(false);
                        }
                    }
                }),
            ));

            hooks.hide_completed.push((
                id,
                events.hide_completed.subscribe({
                    let weak = Weak::clone(&weak);
                    move || {
                        debug!("Hide complete: {:?}", id);
                        if let Some(screen) = weak.upgrade() {
                            screen.set_active(false);
                        }
                    }
                }),
            ));
        }
    }

    fn unhook_screen_events(&self) {
        let mut hooks = self.hooks.borrow_mut();

        for (id, token) in hooks.show_started.drain(..) {
            if let Some(screen) = self.lookup.get(&id) {
                screen.events().show_started.unsubscribe(token);
            }
        }
        for (id, token) in hooks.show_completed.drain(..) {
            if let Some(screen) = self.lookup.get(&id) {
                screen.events().show_completed.unsubscribe(token);
            }
        }
        for (id, token) in hooks.hide_started.drain(..) {
            if let Some(screen) = self.lookup.get(&id) {
                screen.events().hide_started.unsubscribe(token);
            }
        }
        for (id, token) in hooks.hide_completed.drain(..) {
            if let Some(screen) = self.lookup.get(&id) {
                screen.events().hide_completed.unsubscribe(token);
            }
        }
    }

    fn register_screen_keys(core: &Rc<Self>) {
        for key in &core.keys {
            key.register(core);
        }
    }

    fn deregister_screen_keys(&self) {
        for key in &self.keys {
            key.deregister();
        }
    }
}

//=== Screen Manager ======================================================

/// Stack-based screen manager.
///
/// Owns an ordered stack of visible screens, newest-first, and drives
/// each screen's show/hide protocol. Cloning yields another handle to
/// the same manager, so completion callbacks can capture one and issue
/// follow-up requests re-entrantly.
///
/// # Lifecycle
///
/// The host invokes the four entry points in a fixed order: first
/// [`initialize`](Self::initialize), then [`activate`](Self::activate)
/// (hooks screen events and registers keys), then
/// [`start`](Self::start) (forces every screen hidden and shows the
/// configured starting screen). [`deactivate`](Self::deactivate)
/// reverses activation on teardown. The manager never assumes control
/// of when these are called.
///
/// # Example
///
/// ```
/// use std::rc::Rc;
/// use screendeck::prelude::*;
///
/// #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// enum Menu { Main, Settings }
/// impl ScreenId for Menu {}
///
/// let main_key = ScreenKey::new(Menu::Main);
/// let settings_key = ScreenKey::new(Menu::Settings);
/// let manager = ScreenManager::new(ScreenManagerConfig {
///     starting_key: Some(Menu::Main),
///     screens: vec![
///         ScreenBinding::new(Rc::clone(&main_key), Rc::new(BasicScreen::new())),
///         ScreenBinding::new(Rc::clone(&settings_key), Rc::new(BasicScreen::new())),
///     ],
/// });
///
/// manager.initialize();
/// manager.activate();
/// manager.start();
/// assert_eq!(manager.current_screen(), Some(Menu::Main));
///
/// settings_key.request_show();
/// assert_eq!(manager.current_screen(), Some(Menu::Settings));
/// assert!(!manager.is_screen_shown(Menu::Main));
/// ```
pub struct ScreenManager<K: ScreenId> {
    core: Rc<ManagerCore<K>>,
}

impl<K: ScreenId> Clone for ScreenManager<K> {
    fn clone(&self) -> Self {
        Self {
            core: Rc::clone(&self.core),
        }
    }
}

impl<K: ScreenId> ScreenManager<K> {
    //--- Construction -----------------------------------------------------

    /// Creates a manager from its static configuration.
    ///
    /// The key→screen lookup is built eagerly here; duplicate bindings
    /// for the same id are replaced with a warning.
    pub fn new(config: ScreenManagerConfig<K>) -> Self {
        Self {
            core: Rc::new(ManagerCore::new(config)),
        }
    }

    //--- Lifecycle --------------------------------------------------------

    /// One-time setup; reports bindings without a screen object.
    /// Warns and no-ops when called again.
    pub fn initialize(&self) {
        self.core.initialize();
    }

    /// Hooks the internal listeners onto every valid screen's channels
    /// and registers all configured keys to this manager.
    pub fn activate(&self) {
        ManagerCore::activate(&self.core);
    }

    /// Forces every valid screen into the hidden state (a direct flag
    /// reset, not a hide transition), clears the stack, then shows the
    /// configured starting screen, if any.
    pub fn start(&self) {
        self.core.start();
    }

    /// Unsubscribes the cached listeners in the order they were added,
    /// then deregisters all configured keys.
    pub fn deactivate(&self) {
        self.core.deactivate();
    }

    //--- Stack Operations -------------------------------------------------

    /// Hides every other screen and shows `key`'s screen.
    ///
    /// If the screen is already somewhere on the stack it surfaces to
    /// the top without re-running its show transition. An unresolvable
    /// key warns and leaves the stack untouched.
    pub fn show_screen(&self, key: K) {
        self.core.show_screen(key, None);
    }

    /// Like [`show_screen`](Self::show_screen), invoking `on_complete`
    /// exactly once on the screen's next show-completed event.
    pub fn show_screen_then<F>(&self, key: K, on_complete: F)
    where
        F: FnOnce() + 'static,
    {
        self.core.show_screen(key, Some(Box::new(on_complete)));
    }

    /// Shows `key`'s screen on top of whatever is already stacked.
    pub fn append_screen(&self, key: K) {
        self.core.append_screen(key, None);
    }

    /// Like [`append_screen`](Self::append_screen), invoking
    /// `on_complete` exactly once on the screen's next show-completed
    /// event.
    pub fn append_screen_then<F>(&self, key: K, on_complete: F)
    where
        F: FnOnce() + 'static,
    {
        self.core.append_screen(key, Some(Box::new(on_complete)));
    }

    /// Hides the topmost screen. No-op on an empty stack.
    pub fn hide_current_screen(&self) {
        self.core.hide_current_screen(None);
    }

    /// Like [`hide_current_screen`](Self::hide_current_screen), invoking
    /// `on_complete` exactly once on the screen's next hide-completed
    /// event.
    pub fn hide_current_screen_then<F>(&self, on_complete: F)
    where
        F: FnOnce() + 'static,
    {
        self.core.hide_current_screen(Some(Box::new(on_complete)));
    }

    /// Hides `key`'s screen from any stack position. No-op when the key
    /// does not resolve or the screen is not stacked.
    pub fn hide_screen(&self, key: K) {
        self.core.hide_screen(key, None);
    }

    /// Like [`hide_screen`](Self::hide_screen), invoking `on_complete`
    /// exactly once on the screen's next hide-completed event.
    pub fn hide_screen_then<F>(&self, key: K, on_complete: F)
    where
        F: FnOnce() + 'static,
    {
        self.core.hide_screen(key, Some(Box::new(on_complete)));
    }

    /// Hides the current screen repeatedly until the stack is empty.
    pub fn hide_all_screens(&self) {
        self.core.hide_all_screens();
    }

    /// Hides screens until only `key`'s screen remains, or the stack is
    /// empty if it was never shown. A buried target surfaces to the top
    /// without re-running its show transition.
    pub fn hide_all_screens_except(&self, key: K) {
        self.core.hide_all_screens_except(key);
    }

    //--- Query API --------------------------------------------------------

    /// The topmost screen's id, if any.
    pub fn current_screen(&self) -> Option<K> {
        self.core.current_screen()
    }

    /// True while `key`'s screen sits anywhere on the stack.
    pub fn is_screen_shown(&self, key: K) -> bool {
        self.core.is_screen_shown(key)
    }

    /// Resolves a key to its screen. Warns and returns `None` for an
    /// unknown id or an invalid binding.
    pub fn try_get_screen(&self, key: K) -> Option<Rc<dyn Screen>> {
        self.core.try_get_screen(key)
    }

    /// Snapshot of the stack, topmost first.
    pub fn stack_keys(&self) -> Vec<K> {
        self.core.stack_keys()
    }
}

//=========================================================================
// Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::screen::BasicScreen;

    #[derive(Clone, Copy, Eq, PartialEq, Hash, Debug)]
    enum TestScreen {
        A,
        B,
        C,
    }

    impl ScreenId for TestScreen {}

    use TestScreen::{A, B, C};

    fn build(bindings: &[(TestScreen, bool)]) -> (ScreenManager<TestScreen>, Vec<Rc<BasicScreen>>) {
        build_with_start(None, bindings)
    }

    // Builds an initialized, activated manager. `true` marks a screen as
    // manually completed. Returned screens parallel the binding order.
    fn build_with_start(
        starting_key: Option<TestScreen>,
        bindings: &[(TestScreen, bool)],
    ) -> (ScreenManager<TestScreen>, Vec<Rc<BasicScreen>>) {
        let mut screens = Vec::new();
        let mut bound = Vec::new();

        for &(id, manual) in bindings {
            let screen = Rc::new(if manual {
                BasicScreen::with_manual_completion()
            } else {
                BasicScreen::new()
            });
            screens.push(Rc::clone(&screen));
            bound.push(ScreenBinding::new(ScreenKey::new(id), screen));
        }

        let manager = ScreenManager::new(ScreenManagerConfig {
            starting_key,
            screens: bound,
        });
        manager.initialize();
        manager.activate();
        (manager, screens)
    }

    fn count_events(channel: &crate::core::events::EventChannel) -> Rc<Cell<u32>> {
        let count = Rc::new(Cell::new(0));
        let hits = Rc::clone(&count);
        channel.subscribe(move || hits.set(hits.get() + 1));
        count
    }

    //--- Show -------------------------------------------------------------

    #[test]
    fn show_screen_places_target_on_top() {
        let (manager, screens) = build(&[(A, false), (B, false)]);

        manager.show_screen(A);

        assert_eq!(manager.stack_keys(), vec![A]);
        assert_eq!(manager.current_screen(), Some(A));
        assert!(screens[0].is_active());
        assert!(screens[0].is_interactable());
    }

    #[test]
    fn show_screen_twice_is_idempotent() {
        let (manager, _screens) = build(&[(A, false)]);

        manager.show_screen(A);
        manager.show_screen(A);

        assert_eq!(manager.stack_keys(), vec![A]);
    }

    #[test]
    fn show_screen_hides_other_screens() {
        let (manager, screens) = build(&[(A, false), (B, false)]);

        manager.show_screen(A);
        manager.show_screen(B);

        assert_eq!(manager.stack_keys(), vec![B]);
        assert!(!screens[0].is_active());
        assert!(screens[1].is_active());
    }

    #[test]
    fn show_screen_promotes_buried_target_without_reshow() {
        let (manager, screens) = build(&[(A, false), (B, false)]);
        let show_started = count_events(&screens[0].events().show_started);

        manager.show_screen(A);
        manager.append_screen(B);
        assert_eq!(manager.stack_keys(), vec![B, A]);
        assert_eq!(show_started.get(), 1);

        manager.show_screen(A);

        assert_eq!(manager.stack_keys(), vec![A]);
        assert_eq!(show_started.get(), 1);
        assert!(!screens[1].is_active());
        assert!(screens[0].is_active());
    }

    #[test]
    fn show_unknown_screen_is_noop() {
        let (manager, _screens) = build(&[(A, false)]);

        manager.show_screen(A);
        manager.show_screen(B);

        assert_eq!(manager.stack_keys(), vec![A]);
    }

    //--- Append -----------------------------------------------------------

    #[test]
    fn append_screen_layers_over_existing() {
        let (manager, screens) = build(&[(A, false), (B, false)]);

        manager.show_screen(A);
        manager.append_screen(B);

        assert_eq!(manager.stack_keys(), vec![B, A]);
        assert!(screens[0].is_active());
        assert!(screens[1].is_active());
    }

    #[test]
    fn append_screen_already_stacked_is_noop() {
        let (manager, screens) = build(&[(A, false), (B, false)]);
        let show_started = count_events(&screens[0].events().show_started);

        manager.show_screen(A);
        manager.append_screen(B);
        manager.append_screen(A);
        manager.append_screen(B);

        assert_eq!(manager.stack_keys(), vec![B, A]);
        assert_eq!(show_started.get(), 1);
    }

    //--- Hide -------------------------------------------------------------

    #[test]
    fn hide_current_screen_on_empty_stack_is_noop() {
        let (manager, _screens) = build(&[(A, false)]);

        manager.hide_current_screen();

        assert!(manager.stack_keys().is_empty());
        assert_eq!(manager.current_screen(), None);
    }

    #[test]
    fn hide_current_screen_removes_topmost() {
        let (manager, screens) = build(&[(A, false), (B, false)]);

        manager.show_screen(A);
        manager.append_screen(B);
        manager.hide_current_screen();

        assert_eq!(manager.stack_keys(), vec![A]);
        assert!(!screens[1].is_active());
    }

    #[test]
    fn hide_screen_removes_from_any_position() {
        let (manager, screens) = build(&[(A, false), (B, false), (C, false)]);

        manager.show_screen(A);
        manager.append_screen(B);
        manager.append_screen(C);
        manager.hide_screen(B);

        assert_eq!(manager.stack_keys(), vec![C, A]);
        assert!(!screens[1].is_active());
        assert!(screens[0].is_active());
        assert!(screens[2].is_active());
    }

    #[test]
    fn hide_screen_not_stacked_is_noop() {
        let (manager, screens) = build(&[(A, false), (B, false)]);
        let hide_started = count_events(&screens[1].events().hide_started);

        manager.show_screen(A);
        manager.hide_screen(B);

        assert_eq!(manager.stack_keys(), vec![A]);
        assert_eq!(hide_started.get(), 0);
    }

    #[test]
    fn hide_unknown_screen_is_noop() {
        let (manager, _screens) = build(&[(A, false)]);

        manager.show_screen(A);
        manager.hide_screen(B);

        assert_eq!(manager.stack_keys(), vec![A]);
    }

    #[test]
    fn hide_all_screens_empties_stack() {
        let (manager, screens) = build(&[(A, false), (B, false), (C, false)]);

        manager.show_screen(A);
        manager.append_screen(B);
        manager.append_screen(C);
        manager.hide_all_screens();

        assert!(manager.stack_keys().is_empty());
        assert!(screens.iter().all(|screen| !screen.is_active()));
    }

    #[test]
    fn hide_all_screens_except_keeps_only_target() {
        let (manager, screens) = build(&[(A, false), (B, false), (C, false)]);
        let show_started = count_events(&screens[0].events().show_started);

        manager.show_screen(A);
        manager.append_screen(B);
        manager.append_screen(C);
        manager.hide_all_screens_except(A);

        assert_eq!(manager.stack_keys(), vec![A]);
        assert_eq!(show_started.get(), 1);
    }

    #[test]
    fn hide_all_screens_except_absent_target_empties_stack() {
        let (manager, _screens) = build(&[(A, false), (B, false), (C, false)]);

        manager.show_screen(A);
        manager.append_screen(B);
        manager.hide_all_screens_except(C);

        assert!(manager.stack_keys().is_empty());
    }

    //--- Deferred Completion ----------------------------------------------

    #[test]
    fn show_completion_callback_fires_exactly_once() {
        let (manager, screens) = build(&[(A, true)]);
        let count = Rc::new(Cell::new(0));

        let hits = Rc::clone(&count);
        manager.show_screen_then(A, move || hits.set(hits.get() + 1));
        assert_eq!(count.get(), 0);

        screens[0].complete_show();
        screens[0].complete_show();

        assert_eq!(count.get(), 1);
    }

    #[test]
    fn hide_completion_callback_fires_exactly_once() {
        let (manager, screens) = build(&[(A, true)]);
        let count = Rc::new(Cell::new(0));

        manager.show_screen(A);
        screens[0].complete_show();

        let hits = Rc::clone(&count);
        manager.hide_screen_then(A, move || hits.set(hits.get() + 1));
        assert_eq!(count.get(), 0);

        screens[0].complete_hide();
        screens[0].complete_hide();

        assert_eq!(count.get(), 1);
    }

    #[test]
    fn hide_current_completion_callback_runs_on_completion() {
        let (manager, screens) = build(&[(A, true)]);
        let count = Rc::new(Cell::new(0));

        manager.show_screen(A);
        screens[0].complete_show();

        let hits = Rc::clone(&count);
        manager.hide_current_screen_then(move || hits.set(hits.get() + 1));
        screens[0].complete_hide();

        assert_eq!(count.get(), 1);
    }

    // Inherited protocol ordering: the callback is attached after show()
    // returns, so a screen that completes inline keeps it pending until
    // the next completion event.
    #[test]
    fn completion_pends_when_screen_completes_inline() {
        let (manager, screens) = build(&[(A, false)]);
        let count = Rc::new(Cell::new(0));

        let hits = Rc::clone(&count);
        manager.show_screen_then(A, move || hits.set(hits.get() + 1));
        assert_eq!(count.get(), 0);

        screens[0].complete_show();
        assert_eq!(count.get(), 1);
    }

    //--- Choreography -----------------------------------------------------

    #[test]
    fn manual_show_choreography() {
        let (manager, screens) = build(&[(A, true)]);

        manager.show_screen(A);
        assert!(screens[0].is_active());
        assert!(!screens[0].is_interactable());

        screens[0].complete_show();
        assert!(screens[0].is_interactable());
    }

    #[test]
    fn manual_hide_choreography() {
        let (manager, screens) = build(&[(A, true)]);

        manager.show_screen(A);
        screens[0].complete_show();

        manager.hide_screen(A);
        assert!(manager.stack_keys().is_empty());
        assert!(!screens[0].is_interactable());
        assert!(screens[0].is_active());

        screens[0].complete_hide();
        assert!(!screens[0].is_active());
    }

    // There is no timeout: a manual screen whose driver never signals
    // completion stays suspended in its transitional state. Accepted
    // limitation of the protocol.
    #[test]
    fn manual_screen_without_driver_stays_suspended() {
        let (manager, screens) = build(&[(A, true)]);

        manager.show_screen(A);

        assert_eq!(manager.stack_keys(), vec![A]);
        assert!(screens[0].is_active());
        assert!(!screens[0].is_interactable());
    }

    //--- Lifecycle --------------------------------------------------------

    #[test]
    fn start_shows_starting_screen() {
        let (manager, screens) = build_with_start(Some(A), &[(A, false), (B, false)]);

        manager.start();

        assert_eq!(manager.stack_keys(), vec![A]);
        assert!(screens[0].is_active());
        assert!(screens[0].is_interactable());
    }

    #[test]
    fn start_force_hides_screens_first() {
        let (manager, screens) = build_with_start(Some(A), &[(A, false), (B, false)]);
        let hide_started = count_events(&screens[1].events().hide_started);

        manager.show_screen(B);
        manager.start();

        // Forced hide is a direct flag reset, not a hide transition.
        assert_eq!(hide_started.get(), 0);
        assert!(!screens[1].is_active());
        assert!(!screens[1].is_interactable());
        assert_eq!(manager.stack_keys(), vec![A]);
    }

    #[test]
    fn start_without_starting_screen_leaves_stack_empty() {
        let (manager, _screens) = build(&[(A, false)]);

        manager.start();

        assert!(manager.stack_keys().is_empty());
    }

    #[test]
    fn deactivate_unhooks_screen_listeners() {
        let (manager, screens) = build(&[(A, false)]);

        manager.deactivate();
        screens[0].show();

        assert!(!screens[0].is_active());
        assert!(screens[0].events().show_started.is_empty());
        assert!(screens[0].events().show_completed.is_empty());
        assert!(screens[0].events().hide_started.is_empty());
        assert!(screens[0].events().hide_completed.is_empty());
    }

    #[test]
    fn reactivation_rehooks_listeners() {
        let (manager, screens) = build(&[(A, false)]);

        manager.deactivate();
        manager.activate();
        manager.show_screen(A);

        assert!(screens[0].is_active());
        assert!(screens[0].is_interactable());
    }

    //--- Bindings ---------------------------------------------------------

    #[test]
    fn invalid_binding_is_excluded_from_stack_logic() {
        let key_a = ScreenKey::new(A);
        let key_b = ScreenKey::new(B);
        let manager = ScreenManager::new(ScreenManagerConfig {
            starting_key: None,
            screens: vec![
                ScreenBinding::new(Rc::clone(&key_a), Rc::new(BasicScreen::new())),
                ScreenBinding {
                    key: Rc::clone(&key_b),
                    screen: None,
                },
            ],
        });
        manager.initialize();
        manager.activate();

        manager.show_screen(B);
        assert!(manager.stack_keys().is_empty());
        assert!(manager.try_get_screen(B).is_none());

        // The invalid binding's key still registers.
        assert!(key_b.is_registered());
    }

    #[test]
    fn try_get_screen_resolves_valid_bindings() {
        let (manager, _screens) = build(&[(A, false)]);

        assert!(manager.try_get_screen(A).is_some());
        assert!(manager.try_get_screen(B).is_none());
    }

    //--- Invariants -------------------------------------------------------

    #[test]
    fn stack_never_holds_duplicates() {
        let (manager, _screens) = build(&[(A, false), (B, false)]);

        manager.show_screen(A);
        manager.append_screen(B);
        manager.append_screen(B);
        manager.show_screen(B);
        manager.append_screen(A);
        manager.show_screen(A);

        let keys = manager.stack_keys();
        for id in [A, B, C] {
            assert!(keys.iter().filter(|stacked| **stacked == id).count() <= 1);
        }
        assert_eq!(keys, vec![A]);
    }

    #[test]
    fn reentrant_show_from_completion_callback_is_safe() {
        let (manager, screens) = build(&[(A, true), (B, false)]);

        let chained = manager.clone();
        manager.show_screen_then(A, move || chained.show_screen(B));
        screens[0].complete_show();

        assert_eq!(manager.stack_keys(), vec![B]);
        assert!(screens[1].is_active());
        // A's hide never completes (manual), so it stays active but
        // non-interactable: suspended mid-Hiding.
        assert!(screens[0].is_active());
        assert!(!screens[0].is_interactable());
    }

    #[test]
    fn current_screen_tracks_topmost() {
        let (manager, _screens) = build(&[(A, false), (B, false)]);

        assert_eq!(manager.current_screen(), None);

        manager.show_screen(A);
        assert_eq!(manager.current_screen(), Some(A));

        manager.append_screen(B);
        assert_eq!(manager.current_screen(), Some(B));

        manager.hide_current_screen();
        assert_eq!(manager.current_screen(), Some(A));
    }
}
