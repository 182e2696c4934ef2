//=========================================================================
// Prelude
//=========================================================================
//
// Convenience module that re-exports commonly used types and traits.
//
// Usage:
//   use screendeck::prelude::*;
//
//=========================================================================

//=== Public API ==========================================================

// Stack manager
pub use crate::core::stack::{ScreenBinding, ScreenManager, ScreenManagerConfig};

// Screen contract
pub use crate::core::screen::{BasicScreen, Screen, ScreenId};

// Key registry
pub use crate::core::key::ScreenKey;

// Event channels
pub use crate::core::events::{EventChannel, ListenerId, ScreenEvents};
