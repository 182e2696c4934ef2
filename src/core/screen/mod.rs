//=========================================================================
// Screen System
//=========================================================================
//
// The capability contract required of any object the stack manager
// drives, plus a basic ready-made implementation.
//
// Architecture:
//   Screen (trait) ← BasicScreen
//     ├─ show() / hide()
//     ├─ events(): &ScreenEvents
//     └─ set_interactable() / set_active()
//
//=========================================================================

//=== External Dependencies ===============================================

use std::fmt::Debug;
use std::hash::Hash;

//=== Internal Dependencies ===============================================

use crate::core::events::ScreenEvents;

//=== Module Declarations =================================================

mod basic_screen;

//=== Public API ==========================================================

pub use basic_screen::BasicScreen;

//=== Screen Id Trait =====================================================

/// Marker trait for screen identifiers.
///
/// Screen ids address screens in the manager's lookup and on the
/// visibility stack. Typically implemented by host-specific enums.
pub trait ScreenId: Clone + Copy + Eq + Hash + Debug + 'static {}

//=== Screen Trait ========================================================

/// Capability contract for a visual unit managed by the screen stack.
///
/// The host engine owns the object behind this trait; the manager only
/// begins transitions and toggles the two control flags. A screen
/// reports progress through its four event channels.
///
/// # Completion policy
///
/// `show()` must raise `show_started`. Screens with immediate completion
/// raise `show_completed` synchronously before returning; manually
/// completed screens leave it to an external driver (an animation or
/// effects system) to raise later. `hide()` mirrors this with the hide
/// channels.
pub trait Screen {
    /// Begins the showing transition.
    fn show(&self);

    /// Begins the hiding transition.
    fn hide(&self);

    /// The four lifecycle channels of this screen.
    fn events(&self) -> &ScreenEvents;

    /// Sets whether the screen currently accepts interaction.
    fn set_interactable(&self, interactable: bool);

    /// Sets the underlying visual object's activation flag.
    fn set_active(&self, active: bool);
}
