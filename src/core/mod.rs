//=========================================================================
// Core Systems
//=========================================================================
//
// Central home for the screen-management subsystems.
//
// Architecture:
//   events: token-based observer channels for lifecycle signals
//   screen: capability contract + basic ready-made implementation
//   key:    registry of addressable screen identities
//   stack:  visibility stack and the show/hide protocol
//
// Control flow:
//   caller → ScreenKey request → ScreenManager stack operation
//          → Screen::show()/hide() → event channels → manager hooks
//
//=========================================================================

//=== Module Declarations =================================================

pub mod events;
pub mod key;
pub mod screen;
pub mod stack;
