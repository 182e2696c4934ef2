//=========================================================================
// Screendeck — Library Root
//
// This crate defines the public API surface of Screendeck, a stack-based
// UI screen manager for engine-hosted applications.
//
// Responsibilities:
// - Expose the screen stack manager (`ScreenManager`) and its
//   configuration types
// - Expose the capability contract (`Screen`) that host-managed visual
//   objects implement
// - Expose the key registry (`ScreenKey`) used to request visibility
//   changes without holding the manager directly
//
// Typical usage:
// ```
// use std::rc::Rc;
// use screendeck::prelude::*;
//
// #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
// enum Menu { Main }
// impl ScreenId for Menu {}
//
// let key = ScreenKey::new(Menu::Main);
// let screen = Rc::new(BasicScreen::new());
// let manager = ScreenManager::new(ScreenManagerConfig {
//     starting_key: Some(Menu::Main),
//     screens: vec![ScreenBinding::new(Rc::clone(&key), screen)],
// });
// manager.initialize();
// manager.activate();
// manager.start();
// ```
//
//=========================================================================

//--- Public Modules ------------------------------------------------------
//
// `core` contains all screen-management systems (events, contract, key
// registry, stack). It is exposed publicly for host-level extensibility,
// but normal application code will mostly use the prelude.
//
pub mod core;

//--- Prelude -------------------------------------------------------------
//
// Convenience re-exports of the commonly used types and traits.
//
pub mod prelude;

//--- Public Exports ------------------------------------------------------
//
// Re-exports the `ScreenManager` struct as the main entry point. This
// allows users to simply `use screendeck::ScreenManager;` without having
// to know the internal module structure.
//
pub use crate::core::stack::ScreenManager;
