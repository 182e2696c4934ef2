//=========================================================================
// Basic Screen
//=========================================================================
//
// A ready-made Screen implementation backed by plain flags.
//
// Completion policy is chosen per instance: immediate screens complete
// inside show()/hide(); manually completed screens wait for an external
// driver to call complete_show()/complete_hide().
//
//=========================================================================

//=== External Dependencies ===============================================

use std::cell::Cell;

//=== Internal Dependencies ===============================================

use crate::core::events::ScreenEvents;

use super::Screen;

//=== Basic Screen ========================================================

/// Basic implementation of the [`Screen`] contract.
///
/// Starts hidden (inactive and non-interactable); the stack manager's
/// event hooks drive both flags through the show/hide protocol.
pub struct BasicScreen {
    manual_completion: bool,
    events: ScreenEvents,
    interactable: Cell<bool>,
    active: Cell<bool>,
}

impl BasicScreen {
    //--- Construction -----------------------------------------------------

    /// Creates a screen that completes its transitions inline.
    pub fn new() -> Self {
        Self::with_completion(false)
    }

    /// Creates a screen whose completion events are raised manually by
    /// an external driver via [`complete_show`](Self::complete_show) /
    /// [`complete_hide`](Self::complete_hide).
    pub fn with_manual_completion() -> Self {
        Self::with_completion(true)
    }

    fn with_completion(manual_completion: bool) -> Self {
        Self {
            manual_completion,
            events: ScreenEvents::new(),
            interactable: Cell::new(false),
            active: Cell::new(false),
        }
    }

    //--- Completion Entry Points ------------------------------------------

    /// Raises `show_completed`.
    ///
    /// External drivers call this for screens configured with manual
    /// completion once their show transition has finished. There is no
    /// timeout: a screen whose driver never signals stays in the Showing
    /// state indefinitely.
    pub fn complete_show(&self) {
        self.events.show_completed.emit();
    }

    /// Raises `hide_completed`. Symmetric to [`complete_show`](Self::complete_show).
    pub fn complete_hide(&self) {
        self.events.hide_completed.emit();
    }

    //--- Query API --------------------------------------------------------

    /// Whether completion events are raised by an external driver.
    pub fn manual_completion(&self) -> bool {
        self.manual_completion
    }

    /// Current interactivity flag.
    pub fn is_interactable(&self) -> bool {
        self.interactable.get()
    }

    /// Current activation flag.
    pub fn is_active(&self) -> bool {
        self.active.get()
    }
}

impl Default for BasicScreen {
    fn default() -> Self {
        Self::new()
    }
}

impl Screen for BasicScreen {
    fn show(&self) {
        self.events.show_started.emit();
        if !self.manual_completion {
            self.complete_show();
        }
    }

    fn hide(&self) {
        self.events.hide_started.emit();
        if !self.manual_completion {
            self.complete_hide();
        }
    }

    fn events(&self) -> &ScreenEvents {
        &self.events
    }

    fn set_interactable(&self, interactable: bool) {
        self.interactable.set(interactable);
    }

    fn set_active(&self, active: bool) {
        self.active.set(active);
    }
}

//=========================================================================
// Tests
//=========================================================================
